//! Unit - 起動単位の名前と種別

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a launched unit (component or setup task).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitName(String);

impl UnitName {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for UnitName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// UnitKind は起動単位の分類
///
/// - `Component`: 終了しない前提の control-plane プロセス
/// - `SetupTask`: timeout 付きの有限タスク
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Component,
    SetupTask,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitKind::Component => f.write_str("component"),
            UnitKind::SetupTask => f.write_str("setup_task"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_name_displays_raw_value() {
        let name = UnitName::new("kube-apiserver");
        assert_eq!(name.to_string(), "kube-apiserver");
        assert_eq!(name.as_str(), "kube-apiserver");
    }

    #[test]
    fn unit_kind_serializes_as_snake_case() {
        let s = serde_json::to_string(&UnitKind::SetupTask).unwrap();
        assert_eq!(s, "\"setup_task\"");
    }
}
