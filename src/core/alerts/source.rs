// Alert sources: the moving side of a condition.
//
// A source only answers questions about its current state. Change and
// invalidity are delivered by the engine that owns it (see engine.rs), so a
// source never needs to know who is watching it.

use serde_json::Value;

use crate::core::geometry::{Geometry, Point};
use crate::core::model::Graphic;

/// Capability: something whose position and attributes are monitored.
pub trait AlertSource {
    /// Current geometry, if the source has one yet.
    fn location(&self) -> Option<Geometry>;

    /// Current value of a named attribute.
    fn value(&self, attribute: &str) -> Option<&Value>;

    /// Replace the geometry. Returns false when the source is not movable or
    /// nothing changed, in which case no re-evaluation is needed.
    fn move_to(&mut self, _geometry: Geometry) -> bool {
        false
    }

    /// Replace an attribute value. Same return contract as [`move_to`](Self::move_to).
    fn set_value(&mut self, _attribute: &str, _value: Value) -> bool {
        false
    }

    /// Short label for logs.
    fn describe(&self) -> String;
}

/// Adapter exposing a feed [`Graphic`] as an [`AlertSource`].
#[derive(Debug, Clone)]
pub struct GraphicAlertSource {
    graphic: Graphic,
}

impl GraphicAlertSource {
    pub fn new(graphic: Graphic) -> Self {
        Self { graphic }
    }

    pub fn graphic(&self) -> &Graphic {
        &self.graphic
    }
}

impl AlertSource for GraphicAlertSource {
    fn location(&self) -> Option<Geometry> {
        self.graphic.geometry.clone()
    }

    fn value(&self, attribute: &str) -> Option<&Value> {
        self.graphic.attributes.get(attribute)
    }

    fn move_to(&mut self, geometry: Geometry) -> bool {
        if self.graphic.geometry.as_ref() == Some(&geometry) {
            return false;
        }
        self.graphic.geometry = Some(geometry);
        true
    }

    fn set_value(&mut self, attribute: &str, value: Value) -> bool {
        if self.graphic.attributes.get(attribute) == Some(&value) {
            return false;
        }
        self.graphic.attributes.insert(attribute.to_string(), value);
        true
    }

    fn describe(&self) -> String {
        format!("graphic {}", self.graphic.id)
    }
}

/// A stationary source, e.g. a fixed observation post.
#[derive(Debug, Clone)]
pub struct FixedAlertSource {
    name: String,
    position: Point,
}

impl FixedAlertSource {
    pub fn new(name: impl Into<String>, position: Point) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

impl AlertSource for FixedAlertSource {
    fn location(&self) -> Option<Geometry> {
        Some(Geometry::Point(self.position))
    }

    fn value(&self, _attribute: &str) -> Option<&Value> {
        None
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}
