//! The values a run provisions with.
//!
//! Every choice has a closed set of accepted spellings and a default; anything
//! outside the set is coerced to the default instead of being rejected.

pub mod collector;

pub use collector::InputCollector;

use serde::Serialize;
use std::fmt;

/// The only region resources are created in
pub const SUPPORTED_REGION: &str = "us-east-1";

/// Machine image the web server boots from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MachineImage {
    #[default]
    Ubuntu,
    AmazonLinux,
}

impl MachineImage {
    /// Match a user choice case-insensitively
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.to_lowercase().as_str() {
            "ubuntu" => Some(Self::Ubuntu),
            "amazon linux" => Some(Self::AmazonLinux),
            _ => None,
        }
    }

    pub fn ami_id(&self) -> &'static str {
        match self {
            Self::Ubuntu => "ami-0dee1ac7107ae9f8c",
            Self::AmazonLinux => "ami-0f1a6835595fb9246",
        }
    }
}

/// Instance type of the web server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum InstanceSize {
    #[default]
    #[serde(rename = "t3.small")]
    T3Small,
    #[serde(rename = "t3.medium")]
    T3Medium,
}

impl InstanceSize {
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.to_lowercase().as_str() {
            "t3.small" => Some(Self::T3Small),
            "t3.medium" => Some(Self::T3Medium),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::T3Small => "t3.small",
            Self::T3Medium => "t3.medium",
        }
    }
}

/// Availability zone of the web server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum AvailabilityZone {
    #[default]
    #[serde(rename = "us-east-1a")]
    UsEast1a,
    #[serde(rename = "us-east-1b")]
    UsEast1b,
}

impl AvailabilityZone {
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.to_lowercase().as_str() {
            "us-east-1a" => Some(Self::UsEast1a),
            "us-east-1b" => Some(Self::UsEast1b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UsEast1a => "us-east-1a",
            Self::UsEast1b => "us-east-1b",
        }
    }
}

impl fmt::Display for InstanceSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for AvailabilityZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the rendered infrastructure depends on. Built once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Configuration {
    image: MachineImage,
    instance_size: InstanceSize,
    zone: AvailabilityZone,
    resource_name: String,
}

impl Configuration {
    /// Build a configuration from raw answers, coercing anything unrecognized.
    ///
    /// The region answer is accepted only for logging purposes: resources are
    /// always created in [`SUPPORTED_REGION`].
    pub fn from_answers(answers: &RawAnswers) -> Self {
        Self {
            image: MachineImage::from_choice(&answers.image).unwrap_or_default(),
            instance_size: InstanceSize::from_choice(&answers.size).unwrap_or_default(),
            zone: AvailabilityZone::from_choice(&answers.zone).unwrap_or_default(),
            resource_name: answers.name.clone(),
        }
    }

    #[allow(dead_code)]
    pub fn new(
        image: MachineImage,
        instance_size: InstanceSize,
        zone: AvailabilityZone,
        resource_name: impl Into<String>,
    ) -> Self {
        Self {
            image,
            instance_size,
            zone,
            resource_name: resource_name.into(),
        }
    }

    pub fn image_identifier(&self) -> &'static str {
        self.image.ami_id()
    }

    #[allow(dead_code)]
    pub fn image(&self) -> MachineImage {
        self.image
    }

    pub fn instance_size(&self) -> InstanceSize {
        self.instance_size
    }

    pub fn region(&self) -> &'static str {
        SUPPORTED_REGION
    }

    pub fn zone(&self) -> AvailabilityZone {
        self.zone
    }

    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }
}

/// Answers exactly as typed, before coercion
#[derive(Debug, Clone, Default)]
pub struct RawAnswers {
    pub image: String,
    pub size: String,
    pub region: String,
    pub zone: String,
    pub name: String,
}

impl RawAnswers {
    pub fn region_is_supported(&self) -> bool {
        self.region.to_lowercase() == SUPPORTED_REGION
    }

    pub fn zone_is_supported(&self) -> bool {
        AvailabilityZone::from_choice(&self.zone).is_some()
    }
}
