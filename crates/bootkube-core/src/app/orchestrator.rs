//! Bootstrap - control plane の起動オーケストレーション
//!
//! # Fail-fast 設計
//! - 構築時（`build()`）に設定を検証し、起動する unit を全て作り切る
//! - `run()` は全 unit を並行に起動し、最初の失敗 Outcome で即座に返る
//! - 失敗していない unit は止めない（呼び出し側がプロセスごと終了する）
//!
//! # 使用例
//! ```ignore
//! let bootstrap = Bootstrap::new(BootstrapConfig::new("/opt/assets", "http://127.0.0.1:2379"))?;
//! let outcome = bootstrap.run().await;
//! // outcome は必ず失敗。ログに出してプロセスを終了する。
//! ```

use std::sync::Arc;

use tracing::Instrument;

use super::collector::OutcomeCollector;
use super::launcher::launch_component;
use super::setup::run_setup_task;
use super::units::{ComponentUnit, SetupTask, Unit};
use crate::domain::{
    BootstrapConfig, BootstrapId, ConstructionError, INSECURE_API_ADDR, Outcome, REQUIRED_PODS,
    ResolvedConfig, control_plane,
};
use crate::impls::{KubectlAssetCreator, KubectlPodWaiter, ProcessComponentFactory};
use crate::ports::{AssetCreator, ComponentFactory, CreateAssets, PodWaiter, WaitForPods};

pub const CREATE_ASSETS: &str = "create-assets";
pub const WAIT_FOR_PODS: &str = "wait-for-pods";

/// BootstrapBuilder は Bootstrap を構築
///
/// コラボレータを差し替えなければ、実プロセスと kubectl を使う実装が入ります。
pub struct BootstrapBuilder {
    config: BootstrapConfig,
    factory: Option<Arc<dyn ComponentFactory>>,
    asset_creator: Option<Arc<dyn AssetCreator>>,
    pod_waiter: Option<Arc<dyn PodWaiter>>,
    extra_units: Vec<Unit>,
}

impl BootstrapBuilder {
    pub fn new(config: BootstrapConfig) -> Self {
        Self {
            config,
            factory: None,
            asset_creator: None,
            pod_waiter: None,
            extra_units: Vec::new(),
        }
    }

    pub fn component_factory(mut self, factory: Arc<dyn ComponentFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    pub fn asset_creator(mut self, creator: Arc<dyn AssetCreator>) -> Self {
        self.asset_creator = Some(creator);
        self
    }

    pub fn pod_waiter(mut self, waiter: Arc<dyn PodWaiter>) -> Self {
        self.pod_waiter = Some(waiter);
        self
    }

    /// Append a unit after the fixed control-plane set.
    pub fn with_unit(mut self, unit: impl Into<Unit>) -> Self {
        self.extra_units.push(unit.into());
        self
    }

    /// Validate the config and materialize every unit.
    ///
    /// Nothing is started here.
    pub fn build(self) -> Result<Bootstrap, ConstructionError> {
        let config = self.config.resolve()?;
        let timeout = config.asset_timeout();

        let factory = self
            .factory
            .unwrap_or_else(|| Arc::new(ProcessComponentFactory));
        let asset_creator = self.asset_creator.unwrap_or_else(|| {
            Arc::new(KubectlAssetCreator::new(config.kubectl(), INSECURE_API_ADDR))
        });
        let pod_waiter = self
            .pod_waiter
            .unwrap_or_else(|| Arc::new(KubectlPodWaiter::new(config.kubectl(), INSECURE_API_ADDR)));

        let mut units: Vec<Unit> = Vec::new();
        for settings in control_plane(&config)? {
            let name = settings.name.clone();
            units.push(ComponentUnit::new(name, factory.create(settings)).into());
        }
        units.push(
            SetupTask::new(
                CREATE_ASSETS,
                timeout,
                Arc::new(CreateAssets::new(asset_creator, config.layout().manifests())),
            )
            .into(),
        );
        let required = REQUIRED_PODS.iter().map(|s| s.to_string()).collect();
        units.push(
            SetupTask::new(
                WAIT_FOR_PODS,
                timeout,
                Arc::new(WaitForPods::new(pod_waiter, required)),
            )
            .into(),
        );
        units.extend(self.extra_units);

        Ok(Bootstrap {
            id: BootstrapId::generate(),
            config,
            units,
        })
    }
}

/// A fully constructed, not yet started bootstrap.
pub struct Bootstrap {
    id: BootstrapId,
    config: ResolvedConfig,
    units: Vec<Unit>,
}

impl Bootstrap {
    pub fn new(config: BootstrapConfig) -> Result<Self, ConstructionError> {
        Self::builder(config).build()
    }

    pub fn builder(config: BootstrapConfig) -> BootstrapBuilder {
        BootstrapBuilder::new(config)
    }

    pub fn id(&self) -> BootstrapId {
        self.id
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Start every unit and wait for the first failure.
    ///
    /// The returned outcome is always an error. Units still running when this
    /// returns are left alone.
    pub async fn run(self) -> Outcome {
        let span = tracing::info_span!("bootstrap", id = %self.id);
        let units = self.units;

        async move {
            let mut collector = OutcomeCollector::with_capacity(units.len());
            tracing::info!(units = units.len(), "launching bootstrap units");

            for unit in units {
                let sink = collector.sink();
                // Handles are dropped on purpose: the units outlive `run`.
                match unit {
                    Unit::Component(component) => {
                        launch_component(component, sink);
                    }
                    Unit::Setup(task) => {
                        run_setup_task(task, sink);
                    }
                }
            }

            let outcome = collector.first().await;
            if let Some(error) = outcome.error() {
                tracing::error!(
                    unit = %outcome.unit(),
                    kind = %outcome.kind(),
                    reason = error.label(),
                    error = %error,
                    completed = collector.completed().len(),
                    "bootstrap failed"
                );
            }
            outcome
        }
        .instrument(span)
        .await
    }
}
