//! SetupAction port - timeout 付きで一度だけ実行される bootstrap 処理
//!
//! timeout の強制は runner（`app::setup`）の責務です。
//! action 側は渡された timeout を自分の polling の締め切りとして使ってよいですが、
//! 守らなかった場合でも runner が先に timeout を報告します。

use std::io;
use std::time::Duration;

use async_trait::async_trait;

/// SetupError は setup action 固有の失敗
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("failed to run {command}: {source}")]
    Command { command: String, source: io::Error },

    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        source: serde_json::Error,
    },

    #[error("{0}")]
    Failed(String),

    /// The action gave up at its own polling deadline.
    #[error("{0}")]
    DeadlineExceeded(String),
}

impl SetupError {
    pub fn is_deadline(&self) -> bool {
        matches!(self, SetupError::DeadlineExceeded(_))
    }
}

/// A bounded bootstrap step.
///
/// Return `SetupError::DeadlineExceeded` when giving up because `timeout` ran out,
/// so the runner reports it as a timeout.
#[async_trait]
pub trait SetupAction: Send + Sync {
    async fn run(&self, timeout: Duration) -> Result<(), SetupError>;
}
