//! ProcessComponent - control-plane バイナリを子プロセスとして起動する Component
//!
//! 子プロセスは `kill_on_drop` しません。bootstrap が失敗して終了する時も、
//! 生き残っている component は止めずに残します。

use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;

use crate::domain::ComponentSettings;
use crate::ports::{Component, ComponentError, ComponentFactory};

pub struct ProcessComponent {
    settings: ComponentSettings,
}

impl ProcessComponent {
    pub fn new(settings: ComponentSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl Component for ProcessComponent {
    async fn run(&self) -> Result<(), ComponentError> {
        let mut child = Command::new(&self.settings.binary)
            .args(&self.settings.args)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| ComponentError::Spawn {
                binary: self.settings.binary.clone(),
                source,
            })?;

        tracing::info!(
            pid = ?child.id(),
            binary = %self.settings.binary.display(),
            "component process started"
        );

        let status = child
            .wait()
            .await
            .map_err(|e| ComponentError::Failed(format!("waiting for process: {e}")))?;
        Err(ComponentError::Exited(status))
    }
}

/// Default factory: every component is a child process.
pub struct ProcessComponentFactory;

impl ComponentFactory for ProcessComponentFactory {
    fn create(&self, settings: ComponentSettings) -> Arc<dyn Component> {
        Arc::new(ProcessComponent::new(settings))
    }
}
