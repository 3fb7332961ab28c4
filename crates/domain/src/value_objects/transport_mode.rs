//! Transport mode of a computed commute

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the commute was routed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// Public transportation
    Transit,
    /// Cycling
    Riding,
    /// The row could not be resolved
    Error,
}

impl TransportMode {
    /// Machine name as used by the routing provider
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Transit => "transit",
            Self::Riding => "riding",
            Self::Error => "error",
        }
    }

    /// Localized label written to the result spreadsheet
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Transit => "公交",
            Self::Riding => "骑行",
            Self::Error => "计算失败",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
