// Filters deciding which triggered condition data get surfaced.

use std::collections::HashSet;

use super::condition_data::AlertConditionData;
use super::model::{AlertLevel, AlertStatus, DataId};

/// Predicate over a condition data. Must not depend on anything but its
/// argument and its own configuration.
pub trait AlertFilter {
    fn passes_filter(&self, data: &AlertConditionData) -> bool;
}

/// Passes only condition data whose id has been added.
#[derive(Debug, Clone, Default)]
pub struct IdsAlertFilter {
    ids: HashSet<DataId>,
}

impl IdsAlertFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent.
    pub fn add_id(&mut self, id: DataId) {
        self.ids.insert(id);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl AlertFilter for IdsAlertFilter {
    fn passes_filter(&self, data: &AlertConditionData) -> bool {
        self.ids.contains(&data.id())
    }
}

/// Passes data at or above a minimum level.
#[derive(Debug, Clone, Copy)]
pub struct LevelAlertFilter {
    pub min_level: AlertLevel,
}

impl AlertFilter for LevelAlertFilter {
    fn passes_filter(&self, data: &AlertConditionData) -> bool {
        data.level() >= self.min_level
    }
}

/// Hides data in any of the listed statuses.
#[derive(Debug, Clone, Default)]
pub struct StatusAlertFilter {
    hidden: HashSet<AlertStatus>,
}

impl StatusAlertFilter {
    pub fn hiding(statuses: &[AlertStatus]) -> Self {
        Self {
            hidden: statuses.iter().copied().collect(),
        }
    }
}

impl AlertFilter for StatusAlertFilter {
    fn passes_filter(&self, data: &AlertConditionData) -> bool {
        !self.hidden.contains(&data.status())
    }
}

/// All filters must pass. An empty chain passes everything.
#[derive(Default)]
pub struct AlertFilterChain {
    filters: Vec<Box<dyn AlertFilter>>,
}

impl AlertFilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, filter: impl AlertFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn push(&mut self, filter: Box<dyn AlertFilter>) {
        self.filters.push(filter);
    }

    pub fn passes(&self, data: &AlertConditionData) -> bool {
        self.filters.iter().all(|f| f.passes_filter(data))
    }
}
