//! AssetCreator port - マニフェストを API server に投入する
//!
//! 証明書やマニフェストの生成はこの crate の外側で済んでいる前提です。

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::setup::{SetupAction, SetupError};

#[async_trait]
pub trait AssetCreator: Send + Sync {
    /// Create every manifest found in `manifest_dir`, giving up after `timeout`.
    async fn create_assets(&self, manifest_dir: &Path, timeout: Duration)
    -> Result<(), SetupError>;
}

/// Adapts an `AssetCreator` into the `create-assets` setup task.
pub struct CreateAssets {
    creator: Arc<dyn AssetCreator>,
    manifest_dir: PathBuf,
}

impl CreateAssets {
    pub fn new(creator: Arc<dyn AssetCreator>, manifest_dir: PathBuf) -> Self {
        Self {
            creator,
            manifest_dir,
        }
    }
}

#[async_trait]
impl SetupAction for CreateAssets {
    async fn run(&self, timeout: Duration) -> Result<(), SetupError> {
        self.creator
            .create_assets(&self.manifest_dir, timeout)
            .await
    }
}
