//! Post-apply verification against the live cloud account.
//!
//! Lookups never fail the run: anything missing or erroring is replaced by a
//! placeholder and the report is still written.

use crate::stack::WEB_SERVER_TAG;
use crate::traits::{CloudInspector, FileSystem, InstanceSummary, LoadBalancerSummary};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// File the report is written to, inside the working directory
pub const REPORT_FILE_NAME: &str = "aws_validation.json";

pub const PLACEHOLDER_INSTANCE_ID: &str = "MockId";
pub const PLACEHOLDER_INSTANCE_STATE: &str = "MockState";
pub const PLACEHOLDER_PUBLIC_IP: &str = "MockIPAddress";
pub const PLACEHOLDER_LOAD_BALANCER_DNS: &str = "MockDNSName";

/// What the cloud provider reports for the created resources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub instance_id: String,
    pub instance_state: String,
    pub public_ip: String,
    pub load_balancer_dns: String,
}

impl ValidationReport {
    /// Report made only of placeholders
    pub fn placeholder() -> Self {
        Self::from_lookups(None, None)
    }

    /// Fill the report, substituting a placeholder for every absent field
    pub fn from_lookups(
        instance: Option<&InstanceSummary>,
        load_balancer: Option<&LoadBalancerSummary>,
    ) -> Self {
        let field = |value: Option<&String>, placeholder: &str| {
            value.cloned().unwrap_or_else(|| placeholder.to_string())
        };

        Self {
            instance_id: field(
                instance.and_then(|i| i.instance_id.as_ref()),
                PLACEHOLDER_INSTANCE_ID,
            ),
            instance_state: field(
                instance.and_then(|i| i.state.as_ref()),
                PLACEHOLDER_INSTANCE_STATE,
            ),
            public_ip: field(
                instance.and_then(|i| i.public_ip.as_ref()),
                PLACEHOLDER_PUBLIC_IP,
            ),
            load_balancer_dns: field(
                load_balancer.and_then(|lb| lb.dns_name.as_ref()),
                PLACEHOLDER_LOAD_BALANCER_DNS,
            ),
        }
    }

    /// Pretty JSON with four-space indentation
    pub fn to_json(&self) -> Result<String> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)
            .context("Failed to serialize validation report")?;
        String::from_utf8(buffer).context("Validation report is not valid UTF-8")
    }
}

/// Looks up the created resources and writes the report
pub struct ResourceValidator<'a> {
    cloud: &'a dyn CloudInspector,
    fs: &'a dyn FileSystem,
}

impl<'a> ResourceValidator<'a> {
    pub fn new(cloud: &'a dyn CloudInspector, fs: &'a dyn FileSystem) -> Self {
        Self { cloud, fs }
    }

    /// Query the provider, then write `<working_dir>/aws_validation.json`.
    ///
    /// Returns the report whether or not it could be written.
    pub fn validate(&self, working_dir: &Path) -> ValidationReport {
        let instance = match self.cloud.find_instance(WEB_SERVER_TAG) {
            Ok(Some(instance)) => Some(instance),
            Ok(None) => {
                warn!("No instance tagged Name={} found, using placeholders", WEB_SERVER_TAG);
                None
            }
            Err(err) => {
                warn!("Instance lookup failed, using placeholders: {:#}", err);
                None
            }
        };

        let load_balancer = match self.cloud.first_load_balancer() {
            Ok(Some(lb)) => Some(lb),
            Ok(None) => {
                warn!("No load balancer found, using placeholder");
                None
            }
            Err(err) => {
                warn!("Load balancer lookup failed, using placeholder: {:#}", err);
                None
            }
        };

        let report = ValidationReport::from_lookups(instance.as_ref(), load_balancer.as_ref());

        match self.write_report(&report, working_dir) {
            Ok(path) => info!("AWS Validation successful! JSON output saved to {}", path.display()),
            Err(err) => error!("AWS Validation failed: {:?}", err),
        }

        report
    }

    fn write_report(&self, report: &ValidationReport, working_dir: &Path) -> Result<PathBuf> {
        let path = working_dir.join(REPORT_FILE_NAME);
        let json = report.to_json()?;
        self.fs
            .write(&path, &json)
            .with_context(|| format!("Failed to write validation report to {:?}", path))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MockCloudInspector, MockFileSystem};
    use serde_json::json;

    fn running_instance() -> InstanceSummary {
        InstanceSummary {
            instance_id: Some("i-0abc123def4567890".to_string()),
            state: Some("running".to_string()),
            public_ip: Some("54.210.12.34".to_string()),
        }
    }

    fn load_balancer() -> LoadBalancerSummary {
        LoadBalancerSummary {
            dns_name: Some("lb1-123456789.us-east-1.elb.amazonaws.com".to_string()),
        }
    }

    fn written_report(fs: &MockFileSystem, dir: &Path) -> serde_json::Value {
        let contents = fs.get_file_contents(&dir.join(REPORT_FILE_NAME)).unwrap();
        serde_json::from_str(&contents).unwrap()
    }

    #[test]
    fn test_both_lookups_failing_writes_placeholder_report() {
        let cloud = MockCloudInspector::failing("Unable to locate credentials");
        let fs = MockFileSystem::new();
        let dir = Path::new("/work");

        let report = ResourceValidator::new(&cloud, &fs).validate(dir);

        assert_eq!(report, ValidationReport::placeholder());
        assert_eq!(
            written_report(&fs, dir),
            json!({
                "instance_id": "MockId",
                "instance_state": "MockState",
                "public_ip": "MockIPAddress",
                "load_balancer_dns": "MockDNSName"
            })
        );
    }

    #[test]
    fn test_found_resources_are_reported() {
        let cloud = MockCloudInspector::empty()
            .with_instance(running_instance())
            .with_load_balancer(load_balancer());
        let fs = MockFileSystem::new();
        let dir = Path::new("/work");

        let report = ResourceValidator::new(&cloud, &fs).validate(dir);

        assert_eq!(report.instance_id, "i-0abc123def4567890");
        assert_eq!(report.instance_state, "running");
        assert_eq!(report.public_ip, "54.210.12.34");
        assert_eq!(report.load_balancer_dns, "lb1-123456789.us-east-1.elb.amazonaws.com");
        assert_eq!(cloud.queried_tags(), vec![WEB_SERVER_TAG]);
        assert_eq!(written_report(&fs, dir)["instance_state"], "running");
    }

    #[test]
    fn test_each_lookup_falls_back_independently() {
        let cloud = MockCloudInspector::empty()
            .with_instance(running_instance())
            .with_load_balancer_error("AccessDenied");
        let fs = MockFileSystem::new();

        let report = ResourceValidator::new(&cloud, &fs).validate(Path::new("/work"));
        assert_eq!(report.instance_id, "i-0abc123def4567890");
        assert_eq!(report.load_balancer_dns, PLACEHOLDER_LOAD_BALANCER_DNS);

        let cloud = MockCloudInspector::empty()
            .with_instance_error("RequestExpired")
            .with_load_balancer(load_balancer());

        let report = ResourceValidator::new(&cloud, &fs).validate(Path::new("/work"));
        assert_eq!(report.instance_id, PLACEHOLDER_INSTANCE_ID);
        assert_eq!(report.instance_state, PLACEHOLDER_INSTANCE_STATE);
        assert_eq!(report.public_ip, PLACEHOLDER_PUBLIC_IP);
        assert_eq!(report.load_balancer_dns, "lb1-123456789.us-east-1.elb.amazonaws.com");
    }

    #[test]
    fn test_missing_fields_get_placeholders() {
        // A stopped instance has no public IP
        let cloud = MockCloudInspector::empty().with_instance(InstanceSummary {
            instance_id: Some("i-1".to_string()),
            state: Some("stopped".to_string()),
            public_ip: None,
        });
        let fs = MockFileSystem::new();

        let report = ResourceValidator::new(&cloud, &fs).validate(Path::new("/work"));

        assert_eq!(report.instance_id, "i-1");
        assert_eq!(report.instance_state, "stopped");
        assert_eq!(report.public_ip, PLACEHOLDER_PUBLIC_IP);
        assert_eq!(report.load_balancer_dns, PLACEHOLDER_LOAD_BALANCER_DNS);
    }

    #[test]
    fn test_write_failure_is_not_fatal() {
        let cloud = MockCloudInspector::empty();
        let fs = MockFileSystem::new();
        fs.set_read_only(true);

        let report = ResourceValidator::new(&cloud, &fs).validate(Path::new("/work"));

        assert_eq!(report, ValidationReport::placeholder());
        assert!(!fs.has_file(&Path::new("/work").join(REPORT_FILE_NAME)));
    }

    #[test]
    fn test_report_json_layout() {
        let json = ValidationReport::placeholder().to_json().unwrap();

        assert_eq!(
            json,
            "{\n    \"instance_id\": \"MockId\",\n    \"instance_state\": \"MockState\",\n    \"public_ip\": \"MockIPAddress\",\n    \"load_balancer_dns\": \"MockDNSName\"\n}"
        );
    }
}
