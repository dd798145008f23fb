pub mod error;
pub mod executor;
pub mod provisioner;
pub mod terraform;

pub use error::{IacError, IacResult, Step};
pub use executor::{IacExecutor, StepOutcome};
pub use provisioner::{Provisioner, should_teardown};
pub use terraform::TerraformExecutor;
