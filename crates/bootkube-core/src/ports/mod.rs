//! Ports - 外部コラボレータの抽象化レイヤー
//!
//! Bootstrap が呼び出すだけで中身には関与しないものを trait として定義します。
//! - **Component**: control-plane プロセス（API server など）
//! - **SetupAction**: timeout 付きの有限処理
//! - **AssetCreator**: マニフェストの投入
//! - **PodWaiter**: workload の Running 待ち

pub mod assets;
pub mod component;
pub mod readiness;
pub mod setup;

pub use self::assets::{AssetCreator, CreateAssets};
pub use self::component::{Component, ComponentError, ComponentFactory};
pub use self::readiness::{PodWaiter, WaitForPods};
pub use self::setup::{SetupAction, SetupError};
