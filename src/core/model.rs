use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::geometry::Geometry;

pub type AttributeName = String;

/// One element of a real-time feed: a vehicle, a contact report, a message
/// symbol. The map host renders it; the alert core only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graphic {
    pub id: Uuid,
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub attributes: HashMap<AttributeName, Value>,
}

impl Graphic {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: Uuid::new_v4(),
            geometry: Some(geometry),
            attributes: HashMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<AttributeName>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}
