//! The fixed web stack: one instance behind an application load balancer.

use crate::configuration::Configuration;
use crate::hcl::{Block, Document, Value};
use crate::traits::FileSystem;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// File the stack is rendered into, inside the working directory
pub const RENDERED_FILE_NAME: &str = "main.tf";

/// `Name` tag carried by the web server; the validator looks instances up by it
pub const WEB_SERVER_TAG: &str = "stackup-WebServer";

pub const TARGET_GROUP_NAME: &str = "stackup-web-target-group";

const VPC_ID: &str = "data.aws_vpc.main.id";
const TARGET_GROUP_ARN: &str = "aws_lb_target_group.web_target_group.arn";

/// Build the stack document for a configuration
pub fn build(config: &Configuration) -> Document {
    Document::new()
        .block(Block::new("provider").label("aws").attr("region", config.region()))
        .block(Block::data("aws_vpc", "main").attr("default", true))
        .block(
            Block::data("aws_security_group", "default")
                .attr("vpc_id", Value::expr(VPC_ID))
                .block(filter("group-name", Value::string("default"))),
        )
        .block(Block::data("aws_subnets", "public").block(filter("vpc-id", Value::expr(VPC_ID))))
        .block(
            Block::resource("aws_instance", "web_server")
                .attr("ami", config.image_identifier())
                .attr("instance_type", config.instance_size().as_str())
                .attr("availability_zone", config.zone().as_str())
                .attr(
                    "tags",
                    Value::Object(vec![("Name".to_string(), Value::string(WEB_SERVER_TAG))]),
                ),
        )
        .block(
            Block::resource("aws_lb", "application_lb")
                .attr("name", config.resource_name())
                .attr("internal", false)
                .attr("load_balancer_type", "application")
                .attr(
                    "security_groups",
                    Value::List(vec![Value::expr("data.aws_security_group.default.id")]),
                )
                .attr("subnets", Value::List(vec![subnet(0), subnet(1)])),
        )
        .block(
            Block::resource("aws_lb_listener", "http_listener")
                .attr("load_balancer_arn", Value::expr("aws_lb.application_lb.arn"))
                .attr("port", 80_i64)
                .attr("protocol", "HTTP")
                .block(
                    Block::new("default_action")
                        .attr("type", "forward")
                        .attr("target_group_arn", Value::expr(TARGET_GROUP_ARN)),
                ),
        )
        .block(
            Block::resource("aws_lb_target_group", "web_target_group")
                .attr("name", TARGET_GROUP_NAME)
                .attr("port", 80_i64)
                .attr("protocol", "HTTP")
                .attr("vpc_id", Value::expr(VPC_ID)),
        )
        .block(
            Block::resource("aws_lb_target_group_attachment", "web_instance_attachment")
                .attr("target_group_arn", Value::expr(TARGET_GROUP_ARN))
                .attr("target_id", Value::expr("aws_instance.web_server.id")),
        )
}

fn filter(name: &str, value: Value) -> Block {
    Block::new("filter")
        .attr("name", name)
        .attr("values", Value::List(vec![value]))
}

fn subnet(index: i64) -> Value {
    Value::call(
        "element",
        &[Value::expr("data.aws_subnets.public.ids"), Value::Number(index)],
    )
}

/// Writes the rendered stack into a working directory
pub struct StackRenderer<'a> {
    fs: &'a dyn FileSystem,
}

impl<'a> StackRenderer<'a> {
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self { fs }
    }

    /// Render the stack to `<working_dir>/main.tf`, replacing any previous file
    pub fn render(&self, config: &Configuration, working_dir: &Path) -> Result<PathBuf> {
        info!("Generating Terraform configuration based on input...");

        let path = working_dir.join(RENDERED_FILE_NAME);
        let rendered = build(config).render();

        self.fs
            .write(&path, &rendered)
            .with_context(|| format!("Failed to write Terraform configuration to {:?}", path))?;

        info!("Terraform configuration generated successfully at {}", path.display());

        Ok(path)
    }
}
