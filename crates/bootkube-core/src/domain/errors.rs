//! Errors - エラー型と分類
//!
//! - `ConstructionError`: 設定から unit 一式を組み立てられない（起動前に確定）
//! - `UnitError`: 起動済み unit の終了理由（どれが届いても bootstrap は失敗）

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use super::unit::UnitName;

/// ConstructionError は unit を 1 つも起動する前に返るエラー
#[derive(Debug, thiserror::Error)]
pub enum ConstructionError {
    #[error("asset directory must not be empty")]
    EmptyAssetDir,

    #[error("asset directory {0:?} is not valid UTF-8")]
    NonUtf8AssetDir(PathBuf),

    #[error("invalid coordination endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        source: url::ParseError,
    },

    #[error("coordination endpoint '{0}' has no host")]
    EndpointWithoutHost(String),

    #[error("asset timeout must be greater than zero")]
    ZeroTimeout,

    #[error("failed to read config file {path:?}: {source}")]
    ReadConfig { path: PathBuf, source: io::Error },

    #[error("failed to parse config file {path:?}: {source}")]
    ParseConfig {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// UnitError は unit の終了理由
///
/// Component はそもそも終了しない前提なので、戻ってきた時点で `ComponentExit`。
/// SetupTask は「失敗して終わった」と「終わらなかった」を区別できるように
/// `SetupTask` と `SetupTaskTimeout` を分けています。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnitError {
    #[error("component {unit} exited: {reason}")]
    ComponentExit { unit: UnitName, reason: String },

    #[error("setup task {unit} failed: {reason}")]
    SetupTask { unit: UnitName, reason: String },

    #[error("setup task {unit} timed out after {timeout:?}")]
    SetupTaskTimeout { unit: UnitName, timeout: Duration },

    #[error("unit {unit} panicked: {detail}")]
    Panicked { unit: UnitName, detail: String },
}

impl UnitError {
    pub fn unit(&self) -> &UnitName {
        match self {
            UnitError::ComponentExit { unit, .. }
            | UnitError::SetupTask { unit, .. }
            | UnitError::SetupTaskTimeout { unit, .. }
            | UnitError::Panicked { unit, .. } => unit,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, UnitError::SetupTaskTimeout { .. })
    }

    /// Stable label for logs and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            UnitError::ComponentExit { .. } => "component_exit",
            UnitError::SetupTask { .. } => "setup_task_failed",
            UnitError::SetupTaskTimeout { .. } => "setup_task_timeout",
            UnitError::Panicked { .. } => "panicked",
        }
    }
}
