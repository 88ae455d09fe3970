//! Outcome model: terminal result of a launched unit.
//!
//! Outcome は「成功した」「失敗した」を明示的に区別します。
//! Collector はこの区別を見て、成功は記録だけ、失敗で bootstrap を打ち切ります。

use chrono::{DateTime, Utc};

use super::errors::UnitError;
use super::unit::{UnitKind, UnitName};

/// The terminal result of one unit. Exactly one is produced per started unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    unit: UnitName,
    kind: UnitKind,
    result: Result<(), UnitError>,
    finished_at: DateTime<Utc>,
}

impl Outcome {
    pub fn success(unit: UnitName, kind: UnitKind) -> Self {
        Self {
            unit,
            kind,
            result: Ok(()),
            finished_at: Utc::now(),
        }
    }

    /// The unit name is taken from the error so the two can never disagree.
    pub fn failure(kind: UnitKind, error: UnitError) -> Self {
        Self {
            unit: error.unit().clone(),
            kind,
            result: Err(error),
            finished_at: Utc::now(),
        }
    }

    pub fn unit(&self) -> &UnitName {
        &self.unit
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    pub fn result(&self) -> &Result<(), UnitError> {
        &self.result
    }

    pub fn error(&self) -> Option<&UnitError> {
        self.result.as_ref().err()
    }

    pub fn is_error(&self) -> bool {
        self.result.is_err()
    }

    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    pub fn into_result(self) -> Result<(), UnitError> {
        self.result
    }
}
