//! BootstrapId - 起動試行ごとの識別子
//!
//! ULID を使うので、ログを時刻順に並べたときに試行の順序とも一致します。

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// One bootstrap attempt. Attached to every unit's tracing span.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BootstrapId(Ulid);

impl BootstrapId {
    /// 新しい BootstrapId を生成
    pub fn generate() -> Self {
        Self(Ulid::new())
    }

    pub fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }

    pub fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl From<Ulid> for BootstrapId {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl fmt::Display for BootstrapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bootstrap-{}", self.0)
    }
}
