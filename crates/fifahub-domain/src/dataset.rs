//! Dataset domain types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Storage flavour of a dataset.
///
/// Wire and column format: `"uvl"` | `"tabular"`. Rows written before the
/// tabular flavour existed carry `"uvl"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    Uvl,
    Tabular,
}

impl DatasetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uvl => "uvl",
            Self::Tabular => "tabular",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dataset kind: {0}")]
pub struct UnknownDatasetKind(pub String);

impl FromStr for DatasetKind {
    type Err = UnknownDatasetKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uvl" => Ok(Self::Uvl),
            "tabular" => Ok(Self::Tabular),
            other => Err(UnknownDatasetKind(other.to_owned())),
        }
    }
}
