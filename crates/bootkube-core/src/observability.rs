//! Observability - Outcome の機械可読なビュー

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Outcome, UnitKind, UnitName};

/// Serializable view of a terminal outcome, printed by the CLI with `--json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeSummary {
    pub unit: UnitName,
    pub kind: UnitKind,
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub finished_at: DateTime<Utc>,
}

impl From<&Outcome> for OutcomeSummary {
    fn from(outcome: &Outcome) -> Self {
        let (status, error) = match outcome.error() {
            None => ("succeeded".to_string(), None),
            Some(err) => (err.label().to_string(), Some(err.to_string())),
        };
        Self {
            unit: outcome.unit().clone(),
            kind: outcome.kind(),
            status,
            error,
            finished_at: outcome.finished_at(),
        }
    }
}
