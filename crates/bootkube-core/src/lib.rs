//! bootkube-core
//!
//! Self-hosted control plane を立ち上げるための一時的な control plane を起動し、
//! どれか一つでも失敗した瞬間に bootstrap 全体を失敗として返します。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（config, unit, outcome, errors, control_plane, assets）
//! - **ports**: 外部コラボレータの抽象化（Component, SetupAction, AssetCreator, PodWaiter）
//! - **app**: 起動ロジック（Bootstrap, OutcomeCollector, launcher, setup runner）
//! - **impls**: 実装（子プロセス、kubectl）
//! - **observability**: Outcome のシリアライズ可能なビュー

pub mod app;
pub mod domain;
pub mod impls;
pub mod observability;
pub mod ports;

pub use app::{Bootstrap, BootstrapBuilder};
pub use domain::{BootstrapConfig, ConstructionError, Outcome, UnitError};
