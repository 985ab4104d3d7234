// Alert engine - owns sources, targets, feeds, conditions and condition data,
// and dispatches change notifications to the data that depend on them.
//
// Everything runs on the caller's thread. A change to a source or target
// re-evaluates exactly the condition data bound to it, in creation order.
// Removing a source, target or condition emits one "no longer valid"
// notification and detaches every dependent, including its registry rows.

use std::collections::HashMap;
use std::sync::PoisonError;

use serde_json::Value;

use super::condition::{AlertCondition, ConditionBinding};
use super::condition_data::{AlertConditionData, Transition};
use super::filter::AlertFilterChain;
use super::list_model::{AlertListModel, SharedAlertListModel};
use super::model::{
    AlertLevel, AlertNotification, AlertStatus, ConditionId, DataId, FeedId, SourceId, TargetId,
};
use super::queue::BoundedQueue;
use super::source::{AlertSource, GraphicAlertSource};
use super::target::{AlertTarget, GeometryAlertTarget};
use super::triggers::{evaluate_trigger, AlertQuery};
use crate::core::config::AlertSettings;
use crate::core::feed::GraphicsFeed;
use crate::core::geometry::Geometry;
use crate::core::model::Graphic;

/// Undrained notifications kept before the oldest are dropped.
pub const MAX_QUEUED_NOTIFICATIONS: usize = 4096;

pub struct AlertEngine {
    registry: SharedAlertListModel,
    sources: HashMap<SourceId, Box<dyn AlertSource>>,
    targets: HashMap<TargetId, Box<dyn AlertTarget>>,
    feeds: HashMap<FeedId, GraphicsFeed>,
    conditions: HashMap<ConditionId, AlertCondition>,
    data: HashMap<DataId, AlertConditionData>,
    /// Data bound to each source / target, in creation order
    source_watchers: HashMap<SourceId, Vec<DataId>>,
    target_watchers: HashMap<TargetId, Vec<DataId>>,
    /// Feed each graphic source belongs to
    source_feeds: HashMap<SourceId, FeedId>,
    notifications: BoundedQueue<AlertNotification>,
    last_id: u64,
}

impl AlertEngine {
    /// Engine publishing into the process-wide [`AlertListModel`].
    pub fn new() -> Self {
        Self::with_registry(AlertListModel::instance())
    }

    pub fn with_registry(registry: SharedAlertListModel) -> Self {
        Self {
            registry,
            sources: HashMap::new(),
            targets: HashMap::new(),
            feeds: HashMap::new(),
            conditions: HashMap::new(),
            data: HashMap::new(),
            source_watchers: HashMap::new(),
            target_watchers: HashMap::new(),
            source_feeds: HashMap::new(),
            notifications: BoundedQueue::new("Alert notification", MAX_QUEUED_NOTIFICATIONS),
            last_id: 0,
        }
    }

    pub fn registry(&self) -> SharedAlertListModel {
        self.registry.clone()
    }

    fn with_registry_mut<R>(&self, f: impl FnOnce(&mut AlertListModel) -> R) -> R {
        let mut guard = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    // ---- sources ---------------------------------------------------------

    pub fn add_source(&mut self, source: Box<dyn AlertSource>) -> SourceId {
        let id = SourceId(self.next_id());
        log::debug!("Registered {} ({})", id, source.describe());
        self.sources.insert(id, source);
        id
    }

    pub fn source(&self, id: SourceId) -> Option<&dyn AlertSource> {
        self.sources.get(&id).map(|s| &**s)
    }

    /// Move a source and re-evaluate its data. Returns false if the source is
    /// unknown, immovable or already there.
    pub fn move_source(&mut self, id: SourceId, geometry: Geometry) -> bool {
        let moved = self
            .sources
            .get_mut(&id)
            .map(|s| s.move_to(geometry))
            .unwrap_or(false);
        if moved {
            self.notify_source_changed(id);
        }
        moved
    }

    /// Update a source attribute and re-evaluate its data.
    pub fn set_source_value(&mut self, id: SourceId, attribute: &str, value: Value) -> bool {
        let changed = self
            .sources
            .get_mut(&id)
            .map(|s| s.set_value(attribute, value))
            .unwrap_or(false);
        if changed {
            self.notify_source_changed(id);
        }
        changed
    }

    /// "Source changed": re-evaluate every data bound to `id`.
    pub fn notify_source_changed(&mut self, id: SourceId) -> bool {
        if !self.sources.contains_key(&id) {
            return false;
        }
        let watchers = self.source_watchers.get(&id).cloned().unwrap_or_default();
        for data in watchers {
            self.evaluate(data);
        }
        true
    }

    /// Source is permanently gone. Emits `SourceNoLongerValid` once and drops
    /// every data bound to it.
    pub fn remove_source(&mut self, id: SourceId) -> bool {
        let Some(source) = self.sources.remove(&id) else {
            return false;
        };
        log::info!("{} ({}) no longer valid", id, source.describe());
        self.notifications.push(AlertNotification::SourceNoLongerValid { source: id });

        if let Some(feed) = self.source_feeds.remove(&id).and_then(|f| self.feeds.get_mut(&f)) {
            feed.forget(id);
        }
        for data in self.source_watchers.remove(&id).unwrap_or_default() {
            self.remove_data_record(data);
        }
        true
    }

    // ---- targets ---------------------------------------------------------

    pub fn add_target(&mut self, target: Box<dyn AlertTarget>) -> TargetId {
        let id = TargetId(self.next_id());
        log::debug!("Registered {} ({})", id, target.describe());
        self.targets.insert(id, target);
        id
    }

    pub fn target(&self, id: TargetId) -> Option<&dyn AlertTarget> {
        self.targets.get(&id).map(|t| &**t)
    }

    pub fn move_target(&mut self, id: TargetId, geometry: Geometry) -> bool {
        let moved = self
            .targets
            .get_mut(&id)
            .map(|t| t.move_to(geometry))
            .unwrap_or(false);
        if moved {
            self.notify_target_changed(id);
        }
        moved
    }

    /// "Target changed": re-evaluate every data bound to `id`.
    pub fn notify_target_changed(&mut self, id: TargetId) -> bool {
        if !self.targets.contains_key(&id) {
            return false;
        }
        let watchers = self.target_watchers.get(&id).cloned().unwrap_or_default();
        for data in watchers {
            self.evaluate(data);
        }
        true
    }

    /// Target is permanently gone. Emits `TargetNoLongerValid` once, drops
    /// every data bound to it and stops feed conditions from binding new
    /// elements to it.
    pub fn remove_target(&mut self, id: TargetId) -> bool {
        let Some(target) = self.targets.remove(&id) else {
            return false;
        };
        log::info!("{} ({}) no longer valid", id, target.describe());
        self.notifications.push(AlertNotification::TargetNoLongerValid { target: id });

        for condition in self.conditions.values() {
            if let ConditionBinding::Feed { feed, target } = condition.binding() {
                if target == id {
                    if let Some(feed) = self.feeds.get_mut(&feed) {
                        feed.unsubscribe(condition.id());
                    }
                }
            }
        }
        for data in self.target_watchers.remove(&id).unwrap_or_default() {
            self.remove_data_record(data);
        }
        true
    }

    // ---- feeds -----------------------------------------------------------

    pub fn add_feed(&mut self, name: impl Into<String>) -> FeedId {
        let id = FeedId(self.next_id());
        let feed = GraphicsFeed::new(id, name);
        log::info!("Added feed {} ({})", feed.name(), id);
        self.feeds.insert(id, feed);
        id
    }

    pub fn feed(&self, id: FeedId) -> Option<&GraphicsFeed> {
        self.feeds.get(&id)
    }

    pub fn feed_by_name(&self, name: &str) -> Option<FeedId> {
        self.feeds.values().find(|f| f.name() == name).map(GraphicsFeed::id)
    }

    /// Append a graphic to a feed. The graphic becomes a source, and every
    /// condition subscribed to the feed gets one new data for it.
    pub fn append_graphic(&mut self, feed: FeedId, graphic: Graphic) -> Option<SourceId> {
        if !self.feeds.contains_key(&feed) {
            log::warn!("Cannot append graphic to unknown {}", feed);
            return None;
        }
        let source = self.add_source(Box::new(GraphicAlertSource::new(graphic)));
        self.source_feeds.insert(source, feed);

        let subscribers = match self.feeds.get_mut(&feed) {
            Some(f) => {
                f.push(source);
                f.subscribers().to_vec()
            }
            None => Vec::new(),
        };
        for condition in subscribers {
            self.on_feed_element_added(condition, source);
        }
        Some(source)
    }

    fn on_feed_element_added(&mut self, condition: ConditionId, source: SourceId) {
        let Some(ConditionBinding::Feed { target, .. }) = self.conditions.get(&condition).map(AlertCondition::binding) else {
            return;
        };
        let data = self.create_data(condition, source, target);
        self.add_data(data);
    }

    // ---- conditions ------------------------------------------------------

    pub fn add_condition(&mut self, level: AlertLevel, name: &str, query: AlertQuery) -> ConditionId {
        let id = ConditionId(self.next_id());
        log::info!("Added condition \"{}\" ({}, {})", name, level, query.display_name());
        self.conditions.insert(id, AlertCondition::new(id, level, name, query));
        id
    }

    pub fn condition(&self, id: ConditionId) -> Option<&AlertCondition> {
        self.conditions.get(&id)
    }

    pub fn conditions(&self) -> impl Iterator<Item = &AlertCondition> {
        self.conditions.values()
    }

    fn warn_if_bound(&self, id: ConditionId) {
        if let Some(condition) = self.conditions.get(&id) {
            if condition.binding() != ConditionBinding::Unbound {
                log::warn!(
                    "Condition \"{}\" initialised twice; data will be duplicated",
                    condition.name()
                );
            }
        }
    }

    /// Bind one source to one target. Use once per condition: a second call
    /// creates another data alongside the first.
    /// A missing condition, source or target leaves the condition unbound.
    pub fn init_with_source(&mut self, condition: ConditionId, source: SourceId, target: TargetId) {
        if !self.conditions.contains_key(&condition) {
            log::warn!("Cannot initialise unknown {}", condition);
            return;
        }
        if !self.sources.contains_key(&source) {
            log::debug!("{} has no {}; condition stays empty", condition, source);
            return;
        }
        if !self.targets.contains_key(&target) {
            log::debug!("{} has no {}; condition stays empty", condition, target);
            return;
        }
        self.warn_if_bound(condition);
        if let Some(c) = self.conditions.get_mut(&condition) {
            c.bind(ConditionBinding::Source { source, target });
        }
        let data = self.create_data(condition, source, target);
        self.add_data(data);
    }

    /// Bind every element of `feed`, present and future, to `target`.
    ///
    /// Existing elements are processed in feed order; later appends create
    /// data for the new element only. A missing feed or target leaves the
    /// condition without data. Elements leaving the feed are not tracked.
    pub fn init_with_feed(&mut self, condition: ConditionId, feed: FeedId, target: TargetId) {
        if !self.conditions.contains_key(&condition) {
            log::warn!("Cannot initialise unknown {}", condition);
            return;
        }
        let Some(elements) = self.feeds.get(&feed).map(|f| f.elements().to_vec()) else {
            log::debug!("{} has no {}; condition stays empty", condition, feed);
            return;
        };
        if !self.targets.contains_key(&target) {
            log::debug!("{} has no {}; condition stays empty", condition, target);
            return;
        }
        self.warn_if_bound(condition);

        if let Some(c) = self.conditions.get_mut(&condition) {
            c.bind(ConditionBinding::Feed { feed, target });
        }
        if let Some(f) = self.feeds.get_mut(&feed) {
            f.subscribe(condition);
        }
        for source in elements {
            self.on_feed_element_added(condition, source);
        }
    }

    /// Build (but do not register) a data for `source`/`target` under
    /// `condition`, named after the condition's current data count.
    pub fn create_data(&self, condition: ConditionId, source: SourceId, target: TargetId) -> Option<AlertConditionData> {
        let owner = self.conditions.get(&condition)?;
        if !self.sources.contains_key(&source) || !self.targets.contains_key(&target) {
            return None;
        }
        Some(AlertConditionData::new(
            owner.new_condition_data_name(),
            condition,
            source,
            target,
            owner.level(),
        ))
    }

    /// Append `data` to its condition, publish it to the registry and give it
    /// its first evaluation. `None` is ignored.
    pub fn add_data(&mut self, data: Option<AlertConditionData>) -> Option<DataId> {
        let data = data?;
        let id = data.id();
        if self.data.contains_key(&id) {
            return None;
        }
        if !self.sources.contains_key(&data.source()) || !self.targets.contains_key(&data.target()) {
            log::warn!("Dropping \"{}\": source or target no longer valid", data.name());
            return None;
        }
        let Some(condition) = self.conditions.get_mut(&data.condition()) else {
            log::warn!("Dropping \"{}\": unknown {}", data.name(), data.condition());
            return None;
        };
        condition.push_data(id);

        let condition = data.condition();
        self.source_watchers.entry(data.source()).or_default().push(id);
        self.target_watchers.entry(data.target()).or_default().push(id);
        log::debug!("Added condition data \"{}\"", data.name());
        self.data.insert(id, data);

        self.with_registry_mut(|registry| registry.add_alert_condition_data(id));
        self.notifications.push(AlertNotification::DataAdded { condition, data: id });
        self.evaluate(id);
        Some(id)
    }

    pub fn set_condition_level(&mut self, id: ConditionId, level: AlertLevel) -> bool {
        let changed = self.conditions.get_mut(&id).map(|c| c.set_level(level)).unwrap_or(false);
        if changed {
            self.notifications.push(AlertNotification::ConditionChanged { condition: id });
        }
        changed
    }

    pub fn set_condition_name(&mut self, id: ConditionId, name: &str) -> bool {
        let changed = self.conditions.get_mut(&id).map(|c| c.set_name(name)).unwrap_or(false);
        if changed {
            self.notifications.push(AlertNotification::ConditionChanged { condition: id });
        }
        changed
    }

    /// Destroy a condition. Emits `ConditionNoLongerValid` once; its data
    /// leave the registry and the engine.
    pub fn remove_condition(&mut self, id: ConditionId) -> bool {
        let Some(condition) = self.conditions.remove(&id) else {
            return false;
        };
        log::info!("Condition \"{}\" no longer valid", condition.name());
        self.notifications.push(AlertNotification::ConditionNoLongerValid { condition: id });

        if let ConditionBinding::Feed { feed, .. } = condition.binding() {
            if let Some(feed) = self.feeds.get_mut(&feed) {
                feed.unsubscribe(id);
            }
        }
        for data in condition.data() {
            self.remove_data_record(*data);
        }
        true
    }

    // ---- condition data --------------------------------------------------

    pub fn data(&self, id: DataId) -> Option<&AlertConditionData> {
        self.data.get(&id)
    }

    /// Data of one condition in creation order.
    pub fn condition_data(&self, condition: ConditionId) -> Vec<&AlertConditionData> {
        self.conditions
            .get(&condition)
            .map(|c| c.data().iter().filter_map(|d| self.data.get(d)).collect())
            .unwrap_or_default()
    }

    pub fn acknowledge(&mut self, id: DataId) -> bool {
        self.change_status(id, AlertConditionData::acknowledge)
    }

    pub fn dismiss(&mut self, id: DataId) -> bool {
        self.change_status(id, AlertConditionData::dismiss)
    }

    fn change_status(&mut self, id: DataId, action: fn(&mut AlertConditionData) -> bool) -> bool {
        let Some(data) = self.data.get_mut(&id) else {
            return false;
        };
        if !action(data) {
            return false;
        }
        let status = data.status();
        log::info!("\"{}\" is now {:?}", data.name(), status);
        self.notifications.push(AlertNotification::StatusChanged { data: id, status });
        true
    }

    /// Triggered data in registry order that pass every filter in `chain`.
    pub fn triggered_alerts(&self, chain: &AlertFilterChain) -> Vec<&AlertConditionData> {
        let rows: Vec<DataId> = self.with_registry_mut(|registry| registry.iter().collect());
        rows.iter()
            .filter_map(|id| self.data.get(id))
            .filter(|d| d.is_triggered() && chain.passes(d))
            .collect()
    }

    /// Take queued notifications, oldest first. At most
    /// [`MAX_QUEUED_NOTIFICATIONS`] are kept between drains.
    pub fn drain_notifications(&mut self) -> Vec<AlertNotification> {
        self.notifications.drain()
    }

    fn evaluate(&mut self, id: DataId) {
        let Some(data) = self.data.get_mut(&id) else {
            return;
        };
        let (Some(source), Some(target), Some(condition)) = (
            self.sources.get(&data.source()),
            self.targets.get(&data.target()),
            self.conditions.get(&data.condition()),
        ) else {
            return;
        };

        let holds = evaluate_trigger(condition.query(), &**source, &**target);
        match data.apply_result(holds) {
            Transition::Unchanged => {}
            Transition::Triggered { activated } => {
                log::info!("Alert \"{}\" triggered ({})", data.name(), data.level());
                self.notifications.push(AlertNotification::DataTriggered { data: id });
                if activated {
                    self.notifications.push(AlertNotification::StatusChanged {
                        data: id,
                        status: AlertStatus::Active,
                    });
                }
            }
            Transition::Cleared => {
                log::debug!("Alert \"{}\" cleared", data.name());
                self.notifications.push(AlertNotification::DataCleared { data: id });
            }
        }
    }

    /// Detach one data from everything that refers to it.
    fn remove_data_record(&mut self, id: DataId) {
        let Some(data) = self.data.remove(&id) else {
            return;
        };
        if let Some(condition) = self.conditions.get_mut(&data.condition()) {
            condition.remove_data(id);
        }
        if let Some(watchers) = self.source_watchers.get_mut(&data.source()) {
            watchers.retain(|d| *d != id);
        }
        if let Some(watchers) = self.target_watchers.get_mut(&data.target()) {
            watchers.retain(|d| *d != id);
        }
        self.with_registry_mut(|registry| registry.remove_alert_condition_data(id));
        self.notifications.push(AlertNotification::DataRemoved {
            condition: data.condition(),
            data: id,
        });
    }

    // ---- configuration ---------------------------------------------------

    /// Create a condition per enabled entry, each watching its named feed
    /// against a fixed-geometry target. Unknown feeds give empty conditions.
    pub fn load_conditions(&mut self, settings: &AlertSettings) -> Vec<ConditionId> {
        let mut created = Vec::new();
        for config in settings.conditions.iter().filter(|c| c.enabled) {
            let target = self.add_target(Box::new(GeometryAlertTarget::new(
                config.name.clone(),
                config.target.clone(),
            )));
            let condition = self.add_condition(config.level, &config.name, config.query.clone());
            match self.feed_by_name(&config.feed) {
                Some(feed) => self.init_with_feed(condition, feed, target),
                None => log::warn!("Condition \"{}\" refers to unknown feed \"{}\"", config.name, config.feed),
            }
            created.push(condition);
        }
        created
    }
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AlertEngine {
    /// Conditions die with the engine, so their rows leave the registry.
    fn drop(&mut self) {
        let ids: Vec<DataId> = self.data.keys().copied().collect();
        self.with_registry_mut(|registry| {
            for id in ids {
                registry.remove_alert_condition_data(id);
            }
        });
    }
}
