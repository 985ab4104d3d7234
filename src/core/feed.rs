//! Graphics feeds: ordered collections of monitorable graphics.
//!
//! A feed is append-only here. Each element is registered with the engine as
//! a source, and the feed remembers which conditions want to hear about new
//! elements, in subscription order.

use crate::core::alerts::model::{ConditionId, FeedId, SourceId};

#[derive(Debug, Clone)]
pub struct GraphicsFeed {
    id: FeedId,
    name: String,
    elements: Vec<SourceId>,
    subscribers: Vec<ConditionId>,
}

impl GraphicsFeed {
    pub fn new(id: FeedId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            elements: Vec::new(),
            subscribers: Vec::new(),
        }
    }

    pub fn id(&self) -> FeedId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn at(&self, index: usize) -> Option<SourceId> {
        self.elements.get(index).copied()
    }

    /// Elements in insertion order.
    pub fn elements(&self) -> &[SourceId] {
        &self.elements
    }

    /// Returns the index of the new element.
    pub(crate) fn push(&mut self, source: SourceId) -> usize {
        self.elements.push(source);
        self.elements.len() - 1
    }

    pub(crate) fn forget(&mut self, source: SourceId) {
        self.elements.retain(|s| *s != source);
    }

    pub fn subscribers(&self) -> &[ConditionId] {
        &self.subscribers
    }

    pub(crate) fn subscribe(&mut self, condition: ConditionId) {
        self.subscribers.push(condition);
    }

    pub(crate) fn unsubscribe(&mut self, condition: ConditionId) {
        self.subscribers.retain(|c| *c != condition);
    }
}
