use super::{Configuration, RawAnswers, SUPPORTED_REGION};
use crate::traits::UserInput;
use anyhow::Result;
use tracing::{debug, info, warn};

/// Asks the five configuration questions and coerces the answers
pub struct InputCollector<'a> {
    input: &'a dyn UserInput,
}

impl<'a> InputCollector<'a> {
    pub fn new(input: &'a dyn UserInput) -> Self {
        Self { input }
    }

    /// Prompt for image, size, region, zone and name, in that order
    pub fn collect(&self) -> Result<Configuration> {
        let answers = RawAnswers {
            image: self.ask(
                "Choose AMI:",
                "ubuntu / amazon linux (default is ubuntu)",
            )?,
            size: self.ask(
                "Choose Instance Type:",
                "t3.small / t3.medium (default is t3.small)",
            )?,
            region: self.ask("Enter AWS Region:", "only us-east-1 allowed")?,
            zone: self.ask(
                "Enter Availability Zone:",
                "us-east-1a / us-east-1b (default is us-east-1a)",
            )?,
            name: self.ask("Enter Load Balancer Name:", "used as the load balancer name")?,
        };

        if !answers.region_is_supported() {
            warn!(
                "Invalid region '{}'! Defaulting to {}.",
                answers.region, SUPPORTED_REGION
            );
        }

        if !answers.zone_is_supported() {
            warn!("Invalid availability zone '{}'! Defaulting to us-east-1a.", answers.zone);
        }

        let config = Configuration::from_answers(&answers);

        info!(
            "Using {} ({}) in {}/{} for '{}'",
            config.image_identifier(),
            config.instance_size(),
            config.region(),
            config.zone(),
            config.resource_name()
        );
        debug!("Configuration: {}", serde_json::to_string(&config)?);

        Ok(config)
    }

    fn ask(&self, prompt: &str, help: &str) -> Result<String> {
        debug!("{} ({})", prompt, help);
        let answer = self.input.text(prompt, Some(help))?;
        debug!("Answer to '{}': {:?}", prompt, answer);
        Ok(answer)
    }
}
