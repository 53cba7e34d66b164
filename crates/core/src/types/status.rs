//! Item lifecycle status.

use serde::{Deserialize, Serialize};

/// Lifecycle status of an inventory item.
///
/// Stored as lowercase text. The system currently only produces `Available`;
/// a consumption/archival flow does not exist yet, so the remaining variants
/// are reserved for that future lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Available,
    Consumed,
    Discarded,
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Consumed => write!(f, "consumed"),
            Self::Discarded => write!(f, "discarded"),
        }
    }
}

impl std::str::FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "consumed" => Ok(Self::Consumed),
            "discarded" => Ok(Self::Discarded),
            _ => Err(format!("invalid item status: {s}")),
        }
    }
}
