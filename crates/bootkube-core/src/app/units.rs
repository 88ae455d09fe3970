//! Units - 起動単位の定義
//!
//! Bootstrap は構築時に `Unit` の一覧を作り切り、`run()` でそれを順に起動します。

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{UnitKind, UnitName};
use crate::ports::{Component, SetupAction};

/// A long-running component. Any return from it is fatal.
#[derive(Clone)]
pub struct ComponentUnit {
    pub name: UnitName,
    pub component: Arc<dyn Component>,
}

/// A bounded step with its own deadline.
#[derive(Clone)]
pub struct SetupTask {
    pub name: UnitName,
    pub timeout: Duration,
    pub action: Arc<dyn SetupAction>,
}

#[derive(Clone)]
pub enum Unit {
    Component(ComponentUnit),
    Setup(SetupTask),
}

impl ComponentUnit {
    pub fn new(name: impl Into<UnitName>, component: Arc<dyn Component>) -> Self {
        Self {
            name: name.into(),
            component,
        }
    }
}

impl SetupTask {
    pub fn new(name: impl Into<UnitName>, timeout: Duration, action: Arc<dyn SetupAction>) -> Self {
        Self {
            name: name.into(),
            timeout,
            action,
        }
    }
}

impl Unit {
    pub fn name(&self) -> &UnitName {
        match self {
            Unit::Component(c) => &c.name,
            Unit::Setup(s) => &s.name,
        }
    }

    pub fn kind(&self) -> UnitKind {
        match self {
            Unit::Component(_) => UnitKind::Component,
            Unit::Setup(_) => UnitKind::SetupTask,
        }
    }

    /// Deadline of a setup task; components have none.
    pub fn timeout(&self) -> Option<Duration> {
        match self {
            Unit::Component(_) => None,
            Unit::Setup(s) => Some(s.timeout),
        }
    }
}

impl From<ComponentUnit> for Unit {
    fn from(unit: ComponentUnit) -> Self {
        Unit::Component(unit)
    }
}

impl From<SetupTask> for Unit {
    fn from(task: SetupTask) -> Self {
        Unit::Setup(task)
    }
}
