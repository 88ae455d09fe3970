//! PodWaiter port - 指定した workload が Running になるまで待つ
//!
//! どうやって Running を判定するか（API、polling 間隔）は実装側の自由です。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::setup::{SetupAction, SetupError};

#[async_trait]
pub trait PodWaiter: Send + Sync {
    async fn wait_until_running(&self, names: &[String], timeout: Duration)
    -> Result<(), SetupError>;
}

/// Adapts a `PodWaiter` into the `wait-for-pods` setup task.
pub struct WaitForPods {
    waiter: Arc<dyn PodWaiter>,
    names: Vec<String>,
}

impl WaitForPods {
    pub fn new(waiter: Arc<dyn PodWaiter>, names: Vec<String>) -> Self {
        Self { waiter, names }
    }
}

#[async_trait]
impl SetupAction for WaitForPods {
    async fn run(&self, timeout: Duration) -> Result<(), SetupError> {
        self.waiter.wait_until_running(&self.names, timeout).await
    }
}
