// Condition data: one (source, target) pair watched under one condition.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::model::{AlertLevel, AlertStatus, ConditionId, DataId, SourceId, TargetId};

/// Live binding plus alert state for one source/target pair.
///
/// The owning condition and the bound source/target are referred to by id;
/// the engine keeps them alive and removes this record when any of them goes
/// away.
#[derive(Debug, Clone, Serialize)]
pub struct AlertConditionData {
    id: DataId,
    name: String,
    condition: ConditionId,
    source: SourceId,
    target: TargetId,
    level: AlertLevel,
    status: AlertStatus,
    triggered: bool,
    created_at: DateTime<Utc>,
    last_triggered: Option<DateTime<Utc>>,
}

/// What a re-evaluation changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    /// Predicate began holding; `activated` when this moved the status to Active
    Triggered { activated: bool },
    Cleared,
}

impl AlertConditionData {
    pub fn new(
        name: String,
        condition: ConditionId,
        source: SourceId,
        target: TargetId,
        level: AlertLevel,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            condition,
            source,
            target,
            level,
            status: AlertStatus::New,
            triggered: false,
            created_at: Utc::now(),
            last_triggered: None,
        }
    }

    pub fn id(&self) -> DataId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn condition(&self) -> ConditionId {
        self.condition
    }

    pub fn source(&self) -> SourceId {
        self.source
    }

    pub fn target(&self) -> TargetId {
        self.target
    }

    pub fn level(&self) -> AlertLevel {
        self.level
    }

    pub fn status(&self) -> AlertStatus {
        self.status
    }

    /// Whether the predicate held at the last evaluation.
    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_triggered(&self) -> Option<DateTime<Utc>> {
        self.last_triggered
    }

    /// Record a fresh predicate result.
    pub fn apply_result(&mut self, holds: bool) -> Transition {
        match (self.triggered, holds) {
            (false, true) => {
                self.triggered = true;
                self.last_triggered = Some(Utc::now());
                let activated = self.status == AlertStatus::New;
                if activated {
                    self.status = AlertStatus::Active;
                }
                Transition::Triggered { activated }
            }
            (true, false) => {
                self.triggered = false;
                Transition::Cleared
            }
            _ => Transition::Unchanged,
        }
    }

    /// Operator acknowledged an active alert.
    pub fn acknowledge(&mut self) -> bool {
        if self.status != AlertStatus::Active {
            return false;
        }
        self.status = AlertStatus::Acknowledged;
        true
    }

    /// Operator closed the alert. Done is terminal.
    pub fn dismiss(&mut self) -> bool {
        if self.status == AlertStatus::Done {
            return false;
        }
        self.status = AlertStatus::Done;
        true
    }
}
