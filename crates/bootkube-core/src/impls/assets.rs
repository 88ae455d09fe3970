//! KubectlAssetCreator - マニフェストを kubectl create で API server に投入する
//!
//! # フロー
//! 1. マニフェストディレクトリから `.yaml` / `.yml` / `.json` を名前順に列挙
//! 2. 未作成のファイルごとに `kubectl create -f` を実行
//! 3. `AlreadyExists` は作成済みとして扱う
//! 4. 残りがあれば間隔を空けて 2 に戻る（締め切りまで）

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use super::kubectl::{DEFAULT_POLL_INTERVAL, Kubectl, deadline_after, expired, jittered};
use crate::ports::{AssetCreator, SetupError};

const MANIFEST_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

pub struct KubectlAssetCreator {
    kubectl: Kubectl,
    poll_interval: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CreateResult {
    Created,
    AlreadyExists,
    NotYet(String),
}

impl KubectlAssetCreator {
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

    async fn create(&self, manifest: &Path) -> Result<CreateResult, SetupError> {
        let path = manifest.to_string_lossy();
        let output = self.kubectl.run(&["create", "-f", &*path]).await?;
        Ok(classify(output.success, &output.stderr))
    }
}

fn classify(success: bool, stderr: &str) -> CreateResult {
    if success {
        CreateResult::Created
    } else if stderr.contains("AlreadyExists") || stderr.contains("already exists") {
        CreateResult::AlreadyExists
    } else {
        CreateResult::NotYet(stderr.trim().to_string())
    }
}

/// Manifest files directly under `dir`, sorted by file name.
pub async fn manifest_files(dir: &Path) -> Result<Vec<PathBuf>, SetupError> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let is_manifest = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| MANIFEST_EXTENSIONS.contains(&ext));
        if is_manifest {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[async_trait]
impl AssetCreator for KubectlAssetCreator {
    async fn create_assets(
        &self,
        manifest_dir: &Path,
        timeout: Duration,
    ) -> Result<(), SetupError> {
        let deadline = deadline_after(timeout);
        let mut pending = manifest_files(manifest_dir).await?;
        if pending.is_empty() {
            return Err(SetupError::Failed(format!(
                "no manifests found in {}",
                manifest_dir.display()
            )));
        }
        tracing::info!(manifests = pending.len(), server = self.kubectl.server(), "creating assets");

        loop {
            let mut remaining = Vec::new();
            for manifest in pending {
                match self.create(&manifest).await? {
                    CreateResult::Created => {
                        tracing::info!(manifest = %manifest.display(), "created")
                    }
                    CreateResult::AlreadyExists => {
                        tracing::info!(manifest = %manifest.display(), "already exists")
                    }
                    CreateResult::NotYet(reason) => {
                        tracing::debug!(manifest = %manifest.display(), reason = %reason, "not created yet");
                        remaining.push(manifest);
                    }
                }
            }

            if remaining.is_empty() {
                tracing::info!("all assets created");
                return Ok(());
            }
            if expired(deadline) {
                return Err(SetupError::DeadlineExceeded(format!(
                    "{} manifests not created before deadline",
                    remaining.len()
                )));
            }
            pending = remaining;
            tokio::time::sleep(jittered(self.poll_interval)).await;
        }
    }
}
