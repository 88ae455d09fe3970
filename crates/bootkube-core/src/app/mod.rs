//! App - アプリケーション層
//!
//! ports を組み合わせて bootstrap の起動・監視ロジックを実装します。
//!
//! # 主要コンポーネント
//! - **Bootstrap / BootstrapBuilder**: unit 一式の構築と起動
//! - **OutcomeCollector**: 全 unit の Outcome の合流点（最初の失敗を返す）
//! - **launch_component**: 終了しない前提の component を起動
//! - **run_setup_task**: timeout 付きの setup task を実行

pub mod collector;
pub mod launcher;
pub mod orchestrator;
pub mod setup;
pub mod units;

// 主要な型を再エクスポート
pub use self::collector::{OutcomeCollector, OutcomeSink};
pub use self::launcher::launch_component;
pub use self::orchestrator::{Bootstrap, BootstrapBuilder, CREATE_ASSETS, WAIT_FOR_PODS};
pub use self::setup::run_setup_task;
pub use self::units::{ComponentUnit, SetupTask, Unit};
