//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **ProcessComponent**: control-plane バイナリを子プロセスとして起動
//! - **KubectlAssetCreator**: マニフェストを `kubectl create` で投入
//! - **KubectlPodWaiter**: `kubectl get pods` で Running を待つ

pub mod assets;
pub mod kubectl;
pub mod pods;
pub mod process;

pub use self::assets::KubectlAssetCreator;
pub use self::kubectl::Kubectl;
pub use self::pods::KubectlPodWaiter;
pub use self::process::{ProcessComponent, ProcessComponentFactory};
