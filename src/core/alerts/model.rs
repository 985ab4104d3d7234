// Alert model types: severity, lifecycle, identifiers and notifications.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity of a condition. Ordered so lists can be sorted and thresholded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum AlertLevel {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl AlertLevel {
    /// Get the display name for this level
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }

    /// Get all levels, lowest first
    pub fn all() -> &'static [AlertLevel] {
        &[Self::Low, Self::Medium, Self::High, Self::Critical]
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Lifecycle of one condition data.
///
/// `New` until the predicate first holds, then `Active`. `Acknowledged` and
/// `Done` are operator actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AlertStatus {
    #[default]
    New,
    Active,
    Acknowledged,
    Done,
}

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

arena_id!(
    /// Handle to an [`AlertSource`](super::source::AlertSource) owned by the engine.
    SourceId
);
arena_id!(
    /// Handle to an [`AlertTarget`](super::target::AlertTarget) owned by the engine.
    TargetId
);
arena_id!(
    /// Handle to a graphics feed owned by the engine.
    FeedId
);
arena_id!(
    /// Handle to an [`AlertCondition`](super::condition::AlertCondition).
    ConditionId
);

/// Condition data are identified by uuid so filters and exports can refer to
/// them outside the engine.
pub type DataId = Uuid;

/// Everything the engine tells its dependents, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertNotification {
    DataAdded { condition: ConditionId, data: DataId },
    DataRemoved { condition: ConditionId, data: DataId },
    /// Predicate started holding
    DataTriggered { data: DataId },
    /// Predicate stopped holding
    DataCleared { data: DataId },
    StatusChanged { data: DataId, status: AlertStatus },
    /// Name or level changed
    ConditionChanged { condition: ConditionId },
    ConditionNoLongerValid { condition: ConditionId },
    SourceNoLongerValid { source: SourceId },
    TargetNoLongerValid { target: TargetId },
}
