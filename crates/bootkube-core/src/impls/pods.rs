//! KubectlPodWaiter - 必須 workload が Running になるまで kubectl で polling する
//!
//! pod 名は `<workload>-<suffix>` の形になるので、前方一致で判定します。

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::kubectl::{DEFAULT_POLL_INTERVAL, Kubectl, deadline_after, expired, jittered};
use crate::ports::{PodWaiter, SetupError};

const NAMESPACE: &str = "kube-system";
const RUNNING: &str = "Running";

/// The subset of `kubectl get pods -o json` we look at.
#[derive(Debug, Clone, Deserialize)]
pub struct PodList {
    #[serde(default)]
    pub items: Vec<Pod>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pod {
    pub metadata: PodMetadata,
    #[serde(default)]
    pub status: PodStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PodMetadata {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PodStatus {
    #[serde(default)]
    pub phase: Option<String>,
}

impl Pod {
    fn is_running(&self) -> bool {
        self.status.phase.as_deref() == Some(RUNNING)
    }
}

/// Required names with no running pod yet.
pub fn missing_pods<'a>(required: &'a [String], pods: &PodList) -> Vec<&'a str> {
    required
        .iter()
        .filter(|name| {
            !pods
                .items
                .iter()
                .any(|pod| pod.is_running() && pod.metadata.name.starts_with(name.as_str()))
        })
        .map(String::as_str)
        .collect()
}

pub struct KubectlPodWaiter {
    kubectl: Kubectl,
    poll_interval: Duration,
}

impl KubectlPodWaiter {
    pub fn new(kubectl: impl Into<PathBuf>, server: impl Into<String>) -> Self {
        Self {
            kubectl: Kubectl::new(kubectl, server),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

#[async_trait]
impl PodWaiter for KubectlPodWaiter {
    async fn wait_until_running(
        &self,
        names: &[String],
        timeout: Duration,
    ) -> Result<(), SetupError> {
        let deadline = deadline_after(timeout);
        let mut missing: Vec<&str> = names.iter().map(String::as_str).collect();

        loop {
            let namespace = format!("--namespace={NAMESPACE}");
            let output = self
                .kubectl
                .run(&["get", "pods", namespace.as_str(), "--output=json"])
                .await?;

            if output.success {
                let pods: PodList = serde_json::from_str(&output.stdout).map_err(|source| {
                    SetupError::Decode {
                        what: "pod list",
                        source,
                    }
                })?;
                missing = missing_pods(names, &pods);
                if missing.is_empty() {
                    tracing::info!(pods = ?names, "all required pods are running");
                    return Ok(());
                }
                tracing::info!(missing = ?missing, "waiting for pods");
            } else {
                tracing::debug!(stderr = %output.stderr.trim(), "api server not reachable yet");
            }

            if expired(deadline) {
                return Err(SetupError::DeadlineExceeded(format!(
                    "pods not running before deadline: {}",
                    missing.join(", ")
                )));
            }
            tokio::time::sleep(jittered(self.poll_interval)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::REQUIRED_PODS;

    const PODS: &str = r#"{
        "apiVersion": "v1",
        "kind": "List",
        "items": [
            {"metadata": {"name": "kubelet-x7f2p"}, "status": {"phase": "Running"}},
            {"metadata": {"name": "kube-apiserver-node1"}, "status": {"phase": "Running"}},
            {"metadata": {"name": "kube-scheduler-5d9c7-abcde"}, "status": {"phase": "Pending"}},
            {"metadata": {"name": "kube-dns-v11-3kz9q"}, "status": {"phase": "Running"}},
            {"metadata": {"name": "kube-controller-manager-7c9f8"}}
        ]
    }"#;

    fn required() -> Vec<String> {
        REQUIRED_PODS.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn only_running_prefix_matches_count() {
        let pods: PodList = serde_json::from_str(PODS).unwrap();
        let required = required();
        assert_eq!(
            missing_pods(&required, &pods),
            vec!["kube-scheduler", "kube-controller-manager"]
        );
    }

    #[test]
    fn empty_list_misses_everything() {
        let pods: PodList = serde_json::from_str(r#"{"items": []}"#).unwrap();
        let required = required();
        assert_eq!(missing_pods(&required, &pods).len(), REQUIRED_PODS.len());
    }

    #[tokio::test]
    async fn missing_kubectl_is_reported() {
        let waiter = KubectlPodWaiter::new("/nonexistent/kubectl", "http://127.0.0.1:8081");
        let err = waiter
            .wait_until_running(&required(), Duration::from_secs(60))
            .await
            .unwrap_err();
        assert!(matches!(err, SetupError::Command { .. }));
    }

    #[tokio::test]
    async fn unbounded_timeout_does_not_overflow() {
        let waiter = KubectlPodWaiter::new("/nonexistent/kubectl", "http://127.0.0.1:8081");
        let err = waiter
            .wait_until_running(&required(), Duration::MAX)
            .await
            .unwrap_err();
        assert!(matches!(err, SetupError::Command { .. }));
    }

    #[tokio::test]
    async fn unreachable_api_server_hits_the_deadline() {
        let waiter = KubectlPodWaiter::new("false", "http://127.0.0.1:8081")
            .with_poll_interval(Duration::from_millis(10));
        let err = waiter
            .wait_until_running(&required(), Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(
            matches!(&err, SetupError::DeadlineExceeded(msg) if msg.contains("kube-apiserver")),
            "{err}"
        );
    }
}
