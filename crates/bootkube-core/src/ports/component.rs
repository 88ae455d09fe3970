//! Component port - 長時間動き続ける control-plane プロセスの抽象化
//!
//! # 契約
//! - `run()` は正常運転中は戻らない
//! - 戻ってきたら（Ok でも Err でも）その component は終了したとみなす

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ComponentSettings;

/// ComponentError は component の entry point が返すエラー
#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    #[error("failed to spawn {binary:?}: {source}")]
    Spawn { binary: PathBuf, source: io::Error },

    #[error("process exited with {0}")]
    Exited(ExitStatus),

    #[error("{0}")]
    Failed(String),
}

/// A long-running control-plane service.
#[async_trait]
pub trait Component: Send + Sync {
    /// Blocks until the component stops.
    async fn run(&self) -> Result<(), ComponentError>;
}

/// ComponentFactory は settings から Component を作る
///
/// Bootstrap の構築時に一度だけ呼ばれます。テストではここを差し替えて、
/// 実プロセスの代わりに任意のタイミングで失敗する component を注入します。
pub trait ComponentFactory: Send + Sync {
    fn create(&self, settings: ComponentSettings) -> Arc<dyn Component>;
}
