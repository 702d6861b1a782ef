use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{BoundingRect, Centroid, Coord, Distance, Euclidean, Geometry, GeometryCollection, Haversine, Line, MultiLineString, Point};
use rstar::{RTree, AABB};
use serde::{Deserialize, Serialize};

use crate::bbox::{rect_envelope, ArenaExtent};

/// Lower bound on metres per degree of latitude, so envelopes err on the large side.
const METRES_PER_DEGREE: f64 = 111_000.0;

/// How distances between points are measured for radius queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Euclidean distance in coordinate units.
    #[default]
    Planar,
    /// Great-circle distance in metres; coordinates are lon/lat degrees.
    Haversine,
}

impl DistanceMetric {
    pub fn distance(&self, a: Point<f64>, b: Point<f64>) -> f64 {
        match self {
            DistanceMetric::Planar => Euclidean.distance(a, b),
            DistanceMetric::Haversine => Haversine.distance(a, b),
        }
    }

    /// An axis-aligned envelope, in coordinate units, guaranteed to contain
    /// every point within `radius` of `center`.
    pub fn envelope(&self, center: Point<f64>, radius: f64) -> AABB<[f64; 2]> {
        let (dx, dy) = match self {
            DistanceMetric::Planar => (radius, radius),
            DistanceMetric::Haversine => {
                let dy = radius / METRES_PER_DEGREE;
                let cos = center.y().to_radians().cos().abs().max(1e-6);
                ((dy / cos).min(360.0), dy)
            }
        };
        AABB::from_corners([center.x() - dx, center.y() - dy], [center.x() + dx, center.y() + dy])
    }
}

/// Intersection of two polylines.
///
/// Returns `None` when they do not touch, a `Point` when they cross exactly
/// once, and otherwise a `GeometryCollection` of every crossing point and
/// every collinear overlap.
pub fn intersect(a: &MultiLineString<f64>, b: &MultiLineString<f64>) -> Option<Geometry<f64>> {
    let lines_b: Vec<Line<f64>> = b.0.iter().flat_map(|ls| ls.lines()).collect();
    let rtree = RTree::bulk_load(
        lines_b.iter().enumerate()
            .map(|(i, line)| ArenaExtent::new(i, line.bounding_rect()))
            .collect()
    );

    let mut points: Vec<Coord<f64>> = Vec::new();
    let mut overlaps: Vec<Line<f64>> = Vec::new();
    for line_a in a.0.iter().flat_map(|ls| ls.lines()) {
        let envelope = rect_envelope(&line_a.bounding_rect());
        for candidate in rtree.locate_in_envelope_intersecting(&envelope) {
            match line_intersection(line_a, lines_b[candidate.slot()]) {
                Some(LineIntersection::SinglePoint { intersection, .. }) => {
                    // Adjacent segments report shared vertices twice.
                    if !points.contains(&intersection) { points.push(intersection) }
                }
                Some(LineIntersection::Collinear { intersection }) => overlaps.push(intersection),
                None => {}
            }
        }
    }

    match (points.len(), overlaps.len()) {
        (0, 0) => None,
        (1, 0) => Some(Geometry::Point(Point::from(points[0]))),
        _ => Some(Geometry::GeometryCollection(GeometryCollection(
            points.into_iter().map(|c| Geometry::Point(Point::from(c)))
                .chain(overlaps.into_iter().map(Geometry::Line))
                .collect()
        ))),
    }
}

/// A single point standing for `geometry`: the point itself, or the centroid.
pub fn representative_point(geometry: &Geometry<f64>) -> Option<Point<f64>> {
    match geometry {
        Geometry::Point(point) => Some(*point),
        other => other.centroid(),
    }
}

/// The point a building footprint is reduced to: the point itself, the first
/// vertex of a multipoint, or the centroid of anything else.
pub fn building_point(geometry: &Geometry<f64>) -> Option<Point<f64>> {
    match geometry {
        Geometry::Point(point) => Some(*point),
        Geometry::MultiPoint(points) => points.0.first().copied(),
        other => other.centroid(),
    }
}
