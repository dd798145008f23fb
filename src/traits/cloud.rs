use anyhow::{Context, Result};
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_ec2::error::DisplayErrorContext;
use aws_sdk_ec2::types::Filter;
use tokio::runtime::Runtime;
use tracing::debug;

/// Identifying fields of a compute instance, as reported by the cloud provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceSummary {
    pub instance_id: Option<String>,
    pub state: Option<String>,
    pub public_ip: Option<String>,
}

/// Identifying fields of a load balancer, as reported by the cloud provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadBalancerSummary {
    pub dns_name: Option<String>,
}

/// Trait for read-only cloud lookups, allowing for mocking in tests
pub trait CloudInspector: Send + Sync {
    /// First instance whose `Name` tag equals `name_tag`, if any
    fn find_instance(&self, name_tag: &str) -> Result<Option<InstanceSummary>>;

    /// First load balancer in the account/region, if any
    fn first_load_balancer(&self) -> Result<Option<LoadBalancerSummary>>;
}

/// AWS implementation backed by the EC2 and ELBv2 SDK clients.
///
/// The SDK is async; every lookup is driven to completion on its own runtime
/// so callers stay synchronous.
pub struct AwsCloudInspector {
    region: String,
}

impl AwsCloudInspector {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
        }
    }

    /// Current-thread runtime so SDK events stay inside the run's log dispatcher
    fn runtime() -> Result<Runtime> {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to create tokio runtime")
    }

    async fn load_config(&self) -> SdkConfig {
        aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()))
            .load()
            .await
    }
}

impl CloudInspector for AwsCloudInspector {
    fn find_instance(&self, name_tag: &str) -> Result<Option<InstanceSummary>> {
        debug!("Describing EC2 instances tagged Name={} in {}", name_tag, self.region);

        Self::runtime()?.block_on(async {
            let config = self.load_config().await;
            let client = aws_sdk_ec2::Client::new(&config);

            let filter = Filter::builder()
                .name("tag:Name")
                .values(name_tag)
                .build();

            let response = client
                .describe_instances()
                .filters(filter)
                .send()
                .await
                .map_err(|err| {
                    anyhow::anyhow!("DescribeInstances failed: {}", DisplayErrorContext(&err))
                })?;

            let instance = response
                .reservations()
                .first()
                .and_then(|reservation| reservation.instances().first());

            Ok(instance.map(|instance| InstanceSummary {
                instance_id: instance.instance_id().map(str::to_string),
                state: instance
                    .state()
                    .and_then(|state| state.name())
                    .map(|name| name.as_str().to_string()),
                public_ip: instance.public_ip_address().map(str::to_string),
            }))
        })
    }

    fn first_load_balancer(&self) -> Result<Option<LoadBalancerSummary>> {
        debug!("Describing load balancers in {}", self.region);

        Self::runtime()?.block_on(async {
            let config = self.load_config().await;
            let client = aws_sdk_elasticloadbalancingv2::Client::new(&config);

            let response = client
                .describe_load_balancers()
                .send()
                .await
                .map_err(|err| {
                    anyhow::anyhow!(
                        "DescribeLoadBalancers failed: {}",
                        aws_sdk_elasticloadbalancingv2::error::DisplayErrorContext(&err)
                    )
                })?;

            Ok(response
                .load_balancers()
                .first()
                .map(|lb| LoadBalancerSummary {
                    dns_name: lb.dns_name().map(str::to_string),
                }))
        })
    }
}

/// Mock inspector returning canned lookups for testing
#[cfg(test)]
pub struct MockCloudInspector {
    instance: std::result::Result<Option<InstanceSummary>, String>,
    load_balancer: std::result::Result<Option<LoadBalancerSummary>, String>,
    queried_tags: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockCloudInspector {
    /// Both lookups succeed but find nothing
    pub fn empty() -> Self {
        Self {
            instance: Ok(None),
            load_balancer: Ok(None),
            queried_tags: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Both lookups fail
    pub fn failing(message: &str) -> Self {
        Self {
            instance: Err(message.to_string()),
            load_balancer: Err(message.to_string()),
            queried_tags: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn with_instance(mut self, instance: InstanceSummary) -> Self {
        self.instance = Ok(Some(instance));
        self
    }

    pub fn with_instance_error(mut self, message: &str) -> Self {
        self.instance = Err(message.to_string());
        self
    }

    pub fn with_load_balancer(mut self, load_balancer: LoadBalancerSummary) -> Self {
        self.load_balancer = Ok(Some(load_balancer));
        self
    }

    pub fn with_load_balancer_error(mut self, message: &str) -> Self {
        self.load_balancer = Err(message.to_string());
        self
    }

    /// Tags passed to `find_instance` so far
    pub fn queried_tags(&self) -> Vec<String> {
        self.queried_tags.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl CloudInspector for MockCloudInspector {
    fn find_instance(&self, name_tag: &str) -> Result<Option<InstanceSummary>> {
        self.queried_tags.lock().unwrap().push(name_tag.to_string());
        self.instance.clone().map_err(|message| anyhow::anyhow!(message))
    }

    fn first_load_balancer(&self) -> Result<Option<LoadBalancerSummary>> {
        self.load_balancer
            .clone()
            .map_err(|message| anyhow::anyhow!(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::runtime::RuntimeFlavor;
    use tracing_subscriber::prelude::*;

    #[test]
    fn test_lookup_runtime_is_current_thread() {
        let runtime = AwsCloudInspector::runtime().unwrap();
        assert_eq!(runtime.handle().runtime_flavor(), RuntimeFlavor::CurrentThread);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_spawned_task_events_reach_scoped_dispatcher() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(move || writer.clone()),
        );
        let dispatch = tracing::Dispatch::new(subscriber);

        tracing::dispatcher::with_default(&dispatch, || {
            AwsCloudInspector::runtime().unwrap().block_on(async {
                tokio::spawn(async { tracing::warn!("emitted from a spawned task") })
                    .await
                    .unwrap();
            });
        });

        let logged = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("emitted from a spawned task"));
    }
}
