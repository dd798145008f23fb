pub mod deploy;
pub mod destroy;
pub mod render;
pub mod validate;

pub use deploy::DeployCommand;
pub use destroy::DestroyCommand;
pub use render::RenderCommand;
pub use validate::ValidateCommand;
