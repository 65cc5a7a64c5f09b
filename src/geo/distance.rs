use geo::{Distance, Haversine, InterpolatableLine, Line, LineLocatePoint};
use itertools::Itertools;

use crate::geo::{Coordinate, METERS_PER_KM};

/// Great-circle distance between two coordinates, in kilometres.
#[inline]
pub fn distance_km(lhs: &Coordinate, rhs: &Coordinate) -> f64 {
    Haversine.distance(lhs.point(), rhs.point()) / METERS_PER_KM
}

/// Sum of the great-circle lengths of each consecutive segment.
///
/// Empty and single-point paths have zero length.
///
/// ```rust
/// use tollway::geo::{path_length_km, distance_km, Coordinate};
///
/// let a = Coordinate::from_degree(0.0, 0.0).unwrap();
/// let b = Coordinate::from_degree(0.0, 1.0).unwrap();
/// let c = Coordinate::from_degree(1.0, 1.0).unwrap();
///
/// let total = path_length_km(&[a, b, c]);
/// assert!((total - (distance_km(&a, &b) + distance_km(&b, &c))).abs() < 1e-9);
/// ```
pub fn path_length_km(path: &[Coordinate]) -> f64 {
    path.iter()
        .tuple_windows()
        .map(|(a, b)| distance_km(a, b))
        .sum()
}

/// Where a point falls relative to a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathProjection {
    /// Distance from the point to its closest position on the path.
    pub lateral_km: f64,
    /// Distance travelled along the path to reach that closest position.
    pub along_km: f64,
}

/// Projects `target` onto every segment of `path`, returning the
/// projection with the smallest lateral distance. On ties the earliest
/// segment wins, so the result is stable for a given path.
///
/// Returns `None` for paths with fewer than two points.
pub fn project_onto_path(path: &[Coordinate], target: &Coordinate) -> Option<PathProjection> {
    let point = target.point();
    let mut travelled = 0.0;
    let mut best: Option<PathProjection> = None;

    for (source, destination) in path.iter().tuple_windows() {
        let line = Line::new(source.point(), destination.point());

        // We locate the point upon the segment, and then project that
        // fractional (%) upon the segment to obtain the closest point
        let projected = line
            .line_locate_point(&point)
            .map(|frac| line.point_at_ratio_from_start(&Haversine, frac));

        if let Some(projected) = projected {
            let candidate = PathProjection {
                lateral_km: Haversine.distance(projected, point) / METERS_PER_KM,
                along_km: travelled + Haversine.distance(source.point(), projected) / METERS_PER_KM,
            };

            best = match best {
                Some(current) if current.lateral_km <= candidate.lateral_km => Some(current),
                _ => Some(candidate),
            };
        }

        travelled += distance_km(source, destination);
    }

    best
}
