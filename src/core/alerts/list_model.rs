//! Registry of every live condition data, in insertion order.
//!
//! The registry never owns condition data; it lists ids and is kept in step
//! with the engine, which removes entries as their data go away. List views
//! consume the add/remove events it queues.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use lazy_static::lazy_static;

use super::model::DataId;
use super::queue::BoundedQueue;

/// Undrained row events kept before the oldest are dropped.
pub const MAX_QUEUED_EVENTS: usize = 4096;

/// Row-level change for list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListModelEvent {
    Added { row: usize, data: DataId },
    Removed { row: usize, data: DataId },
}

pub type SharedAlertListModel = Arc<Mutex<AlertListModel>>;

lazy_static! {
    static ref INSTANCE: Mutex<Option<SharedAlertListModel>> = Mutex::new(None);
}

#[derive(Debug)]
pub struct AlertListModel {
    rows: Vec<DataId>,
    members: HashSet<DataId>,
    events: BoundedQueue<ListModelEvent>,
}

impl AlertListModel {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            members: HashSet::new(),
            events: BoundedQueue::new("List model event", MAX_QUEUED_EVENTS),
        }
    }

    /// Process-wide registry, created on first use.
    pub fn instance() -> SharedAlertListModel {
        let mut guard = INSTANCE.lock().unwrap_or_else(PoisonError::into_inner);
        guard
            .get_or_insert_with(|| {
                log::debug!("Creating process-wide alert list model");
                Arc::new(Mutex::new(Self::new()))
            })
            .clone()
    }

    /// Drop the process-wide registry. Handles already given out stay valid;
    /// the next `instance()` starts empty. Returns false if none existed.
    pub fn teardown() -> bool {
        INSTANCE
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
    }

    /// Append unless already listed. Returns whether it was added.
    pub fn add_alert_condition_data(&mut self, data: DataId) -> bool {
        if !self.members.insert(data) {
            return false;
        }
        self.rows.push(data);
        self.events.push(ListModelEvent::Added {
            row: self.rows.len() - 1,
            data,
        });
        true
    }

    /// Remove if listed. Safe to call from several teardown paths.
    pub fn remove_alert_condition_data(&mut self, data: DataId) -> bool {
        if !self.members.remove(&data) {
            return false;
        }
        if let Some(row) = self.rows.iter().position(|d| *d == data) {
            self.rows.remove(row);
            self.events.push(ListModelEvent::Removed { row, data });
        }
        true
    }

    pub fn contains(&self, data: DataId) -> bool {
        self.members.contains(&data)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn at(&self, row: usize) -> Option<DataId> {
        self.rows.get(row).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = DataId> + '_ {
        self.rows.iter().copied()
    }

    /// Take queued row events, oldest first. At most [`MAX_QUEUED_EVENTS`]
    /// are kept between calls.
    pub fn take_events(&mut self) -> Vec<ListModelEvent> {
        self.events.drain()
    }
}

impl Default for AlertListModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alerts::engine::AlertEngine;
    use crate::core::alerts::model::AlertLevel;
    use crate::core::alerts::source::FixedAlertSource;
    use crate::core::alerts::target::GeometryAlertTarget;
    use crate::core::alerts::triggers::AlertQuery;
    use crate::core::geometry::{Geometry, Point};
    use uuid::Uuid;

    #[test]
    fn test_add_is_idempotent() {
        let mut model = AlertListModel::new();
        let a = Uuid::new_v4();
        assert!(model.add_alert_condition_data(a));
        assert!(!model.add_alert_condition_data(a));
        assert_eq!(model.len(), 1);
        assert_eq!(model.take_events(), vec![ListModelEvent::Added { row: 0, data: a }]);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut model = AlertListModel::new();
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        for id in [a, b, c] {
            model.add_alert_condition_data(id);
        }
        model.take_events();

        assert!(model.remove_alert_condition_data(b));
        assert!(!model.remove_alert_condition_data(b));
        assert_eq!(model.iter().collect::<Vec<_>>(), vec![a, c]);
        assert_eq!(model.at(1), Some(c));
        assert!(!model.contains(b));
        assert_eq!(model.take_events(), vec![ListModelEvent::Removed { row: 1, data: b }]);
        assert!(model.take_events().is_empty());
    }

    #[test]
    fn test_undrained_events_are_bounded() {
        let mut model = AlertListModel::new();
        let ids: Vec<DataId> = (0..MAX_QUEUED_EVENTS).map(|_| Uuid::new_v4()).collect();
        for id in &ids {
            model.add_alert_condition_data(*id);
            model.remove_alert_condition_data(*id);
        }
        let last = ids[ids.len() - 1];

        let events = model.take_events();
        assert_eq!(events.len(), MAX_QUEUED_EVENTS);
        assert_eq!(events.last(), Some(&ListModelEvent::Removed { row: 0, data: last }));
        assert!(model.is_empty());
        assert!(model.take_events().is_empty());
    }

    // The only test touching the process-wide instance.
    #[test]
    fn test_instance_lifecycle() {
        let first = AlertListModel::instance();
        let again = AlertListModel::instance();
        assert!(Arc::ptr_eq(&first, &again));

        let id = Uuid::new_v4();
        first.lock().unwrap().add_alert_condition_data(id);

        // Engines built with new()/default() publish here until dropped
        let mut engine = AlertEngine::new();
        assert!(Arc::ptr_eq(&engine.registry(), &first));
        let target = engine.add_target(Box::new(GeometryAlertTarget::new(
            "Zone",
            vec![Geometry::Point(Point::new(0.0, 0.0))],
        )));
        let source = engine.add_source(Box::new(FixedAlertSource::new("OP", Point::new(0.0, 0.0))));
        let condition = engine.add_condition(
            AlertLevel::High,
            "Here",
            AlertQuery::WithinDistance { meters: 10.0 },
        );
        engine.init_with_source(condition, source, target);
        let data = engine.condition(condition).unwrap().data()[0];
        assert!(first.lock().unwrap().contains(data));
        drop(engine);
        assert!(!first.lock().unwrap().contains(data));
        assert!(first.lock().unwrap().contains(id));

        let other = AlertEngine::default();
        assert!(Arc::ptr_eq(&other.registry(), &first));
        drop(other);

        assert!(AlertListModel::teardown());
        assert!(!AlertListModel::teardown());

        let fresh = AlertListModel::instance();
        assert!(!Arc::ptr_eq(&first, &fresh));
        assert!(!fresh.lock().unwrap().contains(id));
        AlertListModel::teardown();
    }
}
