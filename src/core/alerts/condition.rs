// Alert conditions: a named, leveled rule applied to every source it is fed.

use super::model::{AlertLevel, ConditionId, DataId, FeedId, SourceId, TargetId};
use super::triggers::AlertQuery;

/// How a condition was initialised. Kept so a second `init` can be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionBinding {
    Unbound,
    Source { source: SourceId, target: TargetId },
    Feed { feed: FeedId, target: TargetId },
}

/// A named rule monitoring one or more (source, target) pairs.
///
/// The condition owns its data (by id; the records themselves live in the
/// engine arena) in creation order.
#[derive(Debug, Clone)]
pub struct AlertCondition {
    id: ConditionId,
    level: AlertLevel,
    name: String,
    query: AlertQuery,
    binding: ConditionBinding,
    data: Vec<DataId>,
}

impl AlertCondition {
    pub fn new(id: ConditionId, level: AlertLevel, name: impl Into<String>, query: AlertQuery) -> Self {
        Self {
            id,
            level,
            name: name.into(),
            query,
            binding: ConditionBinding::Unbound,
            data: Vec::new(),
        }
    }

    pub fn id(&self) -> ConditionId {
        self.id
    }

    pub fn level(&self) -> AlertLevel {
        self.level
    }

    /// Returns false when `level` is already the current level. Existing data
    /// keep the level they were created with.
    pub fn set_level(&mut self, level: AlertLevel) -> bool {
        if level == self.level {
            return false;
        }
        self.level = level;
        true
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns false when `name` is already the current name. Existing data
    /// keep their display names.
    pub fn set_name(&mut self, name: &str) -> bool {
        if name == self.name {
            return false;
        }
        self.name = name.to_string();
        true
    }

    pub fn query(&self) -> &AlertQuery {
        &self.query
    }

    pub fn binding(&self) -> ConditionBinding {
        self.binding
    }

    pub(crate) fn bind(&mut self, binding: ConditionBinding) {
        self.binding = binding;
    }

    /// Owned data in creation order.
    pub fn data(&self) -> &[DataId] {
        &self.data
    }

    /// Name for the next condition data, e.g. `"Perimeter (2)"` when two data
    /// already exist. The suffix is the current count, so it can repeat after
    /// a removal.
    pub fn new_condition_data_name(&self) -> String {
        format!("{} ({})", self.name, self.data.len())
    }

    pub(crate) fn push_data(&mut self, data: DataId) {
        self.data.push(data);
    }

    pub(crate) fn remove_data(&mut self, data: DataId) -> bool {
        let before = self.data.len();
        self.data.retain(|d| *d != data);
        self.data.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn make_condition() -> AlertCondition {
        AlertCondition::new(ConditionId(1), AlertLevel::High, "Perimeter", AlertQuery::WithinArea)
    }

    #[test]
    fn test_data_name_uses_current_count() {
        let mut condition = make_condition();
        assert_eq!(condition.new_condition_data_name(), "Perimeter (0)");

        condition.push_data(Uuid::new_v4());
        condition.push_data(Uuid::new_v4());
        assert_eq!(condition.new_condition_data_name(), "Perimeter (2)");
    }

    #[test]
    fn test_suffix_repeats_after_removal() {
        let mut condition = make_condition();
        let first = Uuid::new_v4();
        condition.push_data(first);
        condition.push_data(Uuid::new_v4());

        assert!(condition.remove_data(first));
        assert!(!condition.remove_data(first));
        assert_eq!(condition.new_condition_data_name(), "Perimeter (1)");
    }

    #[test]
    fn test_setters_report_changes_only() {
        let mut condition = make_condition();
        assert!(!condition.set_level(AlertLevel::High));
        assert!(condition.set_level(AlertLevel::Critical));
        assert_eq!(condition.level(), AlertLevel::Critical);

        assert!(!condition.set_name("Perimeter"));
        assert!(condition.set_name("Outer Perimeter"));
        assert_eq!(condition.new_condition_data_name(), "Outer Perimeter (0)");
    }
}
