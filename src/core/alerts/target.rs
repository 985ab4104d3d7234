// Alert targets: the region or object a source is compared against.

use crate::core::geometry::Geometry;
use crate::core::model::Graphic;

/// Capability: a monitored geometry or set of geometries.
///
/// A target may be removed from the engine while conditions still refer to
/// it. The engine then emits `TargetNoLongerValid` and drops every condition
/// data bound to it; nothing holds the target itself.
pub trait AlertTarget {
    /// Current geometries. Empty means "nothing to compare against".
    fn geometries(&self) -> Vec<Geometry>;

    /// Replace the geometry. Returns false when immovable or unchanged.
    fn move_to(&mut self, _geometry: Geometry) -> bool {
        false
    }

    fn describe(&self) -> String;
}

/// A fixed area or set of areas, e.g. a drawn perimeter.
#[derive(Debug, Clone)]
pub struct GeometryAlertTarget {
    name: String,
    geometries: Vec<Geometry>,
}

impl GeometryAlertTarget {
    pub fn new(name: impl Into<String>, geometries: Vec<Geometry>) -> Self {
        Self {
            name: name.into(),
            geometries,
        }
    }
}

impl AlertTarget for GeometryAlertTarget {
    fn geometries(&self) -> Vec<Geometry> {
        self.geometries.clone()
    }

    /// Redraws the area as a single geometry.
    fn move_to(&mut self, geometry: Geometry) -> bool {
        if self.geometries.len() == 1 && self.geometries[0] == geometry {
            return false;
        }
        self.geometries = vec![geometry];
        true
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

/// A single moving graphic used as target, e.g. the own vehicle position.
#[derive(Debug, Clone)]
pub struct GraphicAlertTarget {
    graphic: Graphic,
}

impl GraphicAlertTarget {
    pub fn new(graphic: Graphic) -> Self {
        Self { graphic }
    }
}

impl AlertTarget for GraphicAlertTarget {
    fn geometries(&self) -> Vec<Geometry> {
        self.graphic.geometry.iter().cloned().collect()
    }

    fn move_to(&mut self, geometry: Geometry) -> bool {
        if self.graphic.geometry.as_ref() == Some(&geometry) {
            return false;
        }
        self.graphic.geometry = Some(geometry);
        true
    }

    fn describe(&self) -> String {
        format!("graphic {}", self.graphic.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Point;

    #[test]
    fn test_graphic_target_without_geometry_is_empty() {
        let mut graphic = Graphic::new(Geometry::Point(Point::new(0.0, 0.0)));
        graphic.geometry = None;
        let mut target = GraphicAlertTarget::new(graphic);
        assert!(target.geometries().is_empty());

        assert!(target.move_to(Geometry::Point(Point::new(1.0, 1.0))));
        assert_eq!(target.geometries().len(), 1);
    }

    #[test]
    fn test_geometry_target_redraw() {
        let point = Geometry::Point(Point::new(0.0, 0.0));
        let mut target = GeometryAlertTarget::new("LZ", vec![point.clone()]);
        assert!(!target.move_to(point));
        assert!(target.move_to(Geometry::Point(Point::new(3.0, 3.0))));
        assert_eq!(target.geometries(), vec![Geometry::Point(Point::new(3.0, 3.0))]);
    }
}
