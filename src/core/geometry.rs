//! Geometry value types shared by feeds, sources and targets.
//!
//! Coordinates are WGS84 degrees (`x` = longitude, `y` = latitude). Only the
//! handful of measurements the alert predicates need live here; projection
//! and rendering belong to the map host.

use serde::{Deserialize, Serialize};

/// Mean earth radius in meters (IUGG).
const EARTH_RADIUS_M: f64 = 6_371_008.8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Great-circle (haversine) distance in meters.
    pub fn distance_meters(&self, other: &Point) -> f64 {
        let lat1 = self.y.to_radians();
        let lat2 = other.y.to_radians();
        let d_lat = lat2 - lat1;
        let d_lon = (other.x - self.x).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().asin()
    }
}

/// A monitored shape: a single position or a closed area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Point),
    /// Outer ring; closing vertex optional.
    Polygon(Vec<Point>),
}

impl Geometry {
    /// Representative position used when this geometry is the moving side of a
    /// comparison. Polygons use the vertex average, counting a closing vertex
    /// once.
    pub fn anchor(&self) -> Option<Point> {
        match self {
            Self::Point(p) => Some(*p),
            Self::Polygon(ring) => {
                let open = match ring.as_slice() {
                    [first, .., last] if first == last => &ring[..ring.len() - 1],
                    all => all,
                };
                if open.is_empty() {
                    return None;
                }
                let n = open.len() as f64;
                let (sx, sy) = open.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
                Some(Point::new(sx / n, sy / n))
            }
        }
    }

    /// Even-odd ray cast. A point geometry contains only an identical point.
    pub fn contains(&self, point: &Point) -> bool {
        match self {
            Self::Point(p) => p == point,
            Self::Polygon(ring) => {
                if ring.len() < 3 {
                    return false;
                }
                let mut inside = false;
                let mut j = ring.len() - 1;
                for i in 0..ring.len() {
                    let (a, b) = (ring[i], ring[j]);
                    if (a.y > point.y) != (b.y > point.y)
                        && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
                    {
                        inside = !inside;
                    }
                    j = i;
                }
                inside
            }
        }
    }

    /// Distance in meters from `point` to this geometry; zero inside a polygon.
    pub fn distance_to(&self, point: &Point) -> Option<f64> {
        match self {
            Self::Point(p) => Some(p.distance_meters(point)),
            Self::Polygon(ring) if ring.is_empty() => None,
            Self::Polygon(_) if self.contains(point) => Some(0.0),
            Self::Polygon(ring) => {
                let mut best = f64::INFINITY;
                for (i, a) in ring.iter().enumerate() {
                    let b = &ring[(i + 1) % ring.len()];
                    best = best.min(segment_distance(point, a, b));
                }
                Some(best)
            }
        }
    }
}

/// Nearest point on segment `a`-`b` found in a local equirectangular plane
/// around `p`, then measured on the sphere. Fine for the short ranges alert
/// zones cover.
fn segment_distance(p: &Point, a: &Point, b: &Point) -> f64 {
    let k = p.y.to_radians().cos();
    let (ax, ay) = ((a.x - p.x) * k, a.y - p.y);
    let (bx, by) = ((b.x - p.x) * k, b.y - p.y);
    let (dx, dy) = (bx - ax, by - ay);
    let len2 = dx * dx + dy * dy;

    let t = if len2 == 0.0 {
        0.0
    } else {
        (-(ax * dx + ay * dy) / len2).clamp(0.0, 1.0)
    };
    let nearest = Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);
    p.distance_meters(&nearest)
}
