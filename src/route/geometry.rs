//! Route geometry.
//!
//! Real road geometry belongs to a directions service outside this crate.
//! [`SyntheticGeometry`] stands in for one, producing plausible polylines
//! that are reproducible for a given request.

use std::f64::consts::PI;

use geo::{Bearing, Destination, Haversine, InterpolatableLine, Line, Point};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::geo::{distance_km, Coordinate, METERS_PER_KM};
use crate::route::{RouteError, RouteType};
use crate::util::seed::{seed_for, seeded_rng};

/// Supplies the polyline a route follows between two positions.
pub trait GeometryProvider: Send + Sync {
    /// A path starting at `start` and finishing at `end`.
    fn geometry(
        &self,
        start: &Coordinate,
        end: &Coordinate,
        route_type: RouteType,
    ) -> Result<Vec<Coordinate>, RouteError>;

    /// Candidate paths for a profile, from which the planner picks one.
    /// Providers with a single answer per profile need not override this.
    fn alternatives(
        &self,
        start: &Coordinate,
        end: &Coordinate,
        route_type: RouteType,
    ) -> Result<Vec<Vec<Coordinate>>, RouteError> {
        Ok(vec![self.geometry(start, end, route_type)?])
    }
}

/// Bow amplitudes tried for economy routes, as fractions of the direct distance.
/// The smallest stays shorter than any fastest path; the wider ones can
/// clear toll plazas sitting on the direct line.
const ECONOMY_AMPLITUDES: [f64; 3] = [0.01, 0.06, 0.12];
const FASTEST_AMPLITUDE: f64 = 0.035;
const SCENIC_AMPLITUDE: f64 = 0.25;

/// Interpolates waypoints along the great-circle line between the
/// endpoints, pushing each one sideways by a seeded offset.
///
/// | Profile | Segments | Lateral offset |
/// |---------|----------|----------------|
/// | fastest | 5        | a jittered bow of 1.75% to 3.5%, on one side |
/// | economy | 7        | a 1%, 6% or 12% bow, on either side |
/// | scenic  | 10       | a ~25% bow on one side |
///
/// Offsets follow `sin(π·t)`, so they vanish at both endpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticGeometry;

impl SyntheticGeometry {
    pub fn segments(route_type: RouteType) -> usize {
        match route_type {
            RouteType::Fastest => 5,
            RouteType::Economy => 7,
            RouteType::Scenic => 10,
        }
    }

    fn rng(start: &Coordinate, end: &Coordinate, route_type: RouteType) -> ChaCha8Rng {
        seeded_rng(seed_for(&[*start, *end], &route_type.to_string()))
    }

    /// Builds a path whose `i`th waypoint is displaced by `offset(t)`
    /// metres to the right of travel (negative is left).
    fn displaced(
        start: &Coordinate,
        end: &Coordinate,
        segments: usize,
        mut offset: impl FnMut(f64) -> f64,
    ) -> Vec<Coordinate> {
        let line = Line::new(start.point(), end.point());

        let waypoints = (1..segments).map(|i| {
            let ratio = i as f64 / segments as f64;
            let base = line.point_at_ratio_from_start(&Haversine, ratio);
            let heading = Haversine.bearing(base, end.point());

            let displacement = offset(ratio);
            let side = if displacement >= 0.0 { 90.0 } else { -90.0 };
            let moved: Point = Haversine.destination(base, heading + side, displacement.abs());

            Coordinate::from_point_clamped(moved)
        });

        std::iter::once(*start)
            .chain(waypoints)
            .chain(std::iter::once(*end))
            .collect()
    }

    fn bow(ratio: f64) -> f64 {
        (PI * ratio).sin()
    }

    fn fastest(start: &Coordinate, end: &Coordinate, direct_m: f64) -> Vec<Coordinate> {
        let mut rng = Self::rng(start, end, RouteType::Fastest);
        let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };

        Self::displaced(start, end, Self::segments(RouteType::Fastest), |ratio| {
            let magnitude = rng.gen_range(0.5..=1.0) * FASTEST_AMPLITUDE;
            sign * magnitude * direct_m * Self::bow(ratio)
        })
    }

    fn economy(start: &Coordinate, end: &Coordinate, direct_m: f64) -> Vec<Vec<Coordinate>> {
        let mut rng = Self::rng(start, end, RouteType::Economy);

        ECONOMY_AMPLITUDES
            .iter()
            .flat_map(|amplitude| [(1.0, *amplitude), (-1.0, *amplitude)])
            .map(|(sign, amplitude)| {
                let scale = rng.gen_range(0.9..=1.1);
                Self::displaced(start, end, Self::segments(RouteType::Economy), |ratio| {
                    sign * amplitude * scale * direct_m * Self::bow(ratio)
                })
            })
            .collect()
    }

    fn scenic(start: &Coordinate, end: &Coordinate, direct_m: f64) -> Vec<Coordinate> {
        let mut rng = Self::rng(start, end, RouteType::Scenic);
        let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let scale = rng.gen_range(0.9..=1.1);

        Self::displaced(start, end, Self::segments(RouteType::Scenic), |ratio| {
            sign * SCENIC_AMPLITUDE * scale * direct_m * Self::bow(ratio)
        })
    }
}

impl GeometryProvider for SyntheticGeometry {
    fn geometry(
        &self,
        start: &Coordinate,
        end: &Coordinate,
        route_type: RouteType,
    ) -> Result<Vec<Coordinate>, RouteError> {
        self.alternatives(start, end, route_type)?
            .into_iter()
            .next()
            .ok_or_else(|| RouteError::GeometryUnavailable(format!("no {route_type} path")))
    }

    fn alternatives(
        &self,
        start: &Coordinate,
        end: &Coordinate,
        route_type: RouteType,
    ) -> Result<Vec<Vec<Coordinate>>, RouteError> {
        let direct_m = distance_km(start, end) * METERS_PER_KM;
        if !direct_m.is_finite() {
            return Err(RouteError::GeometryUnavailable(format!(
                "cannot measure {start} to {end}"
            )));
        }

        Ok(match route_type {
            RouteType::Fastest => vec![Self::fastest(start, end, direct_m)],
            RouteType::Economy => Self::economy(start, end, direct_m),
            RouteType::Scenic => vec![Self::scenic(start, end, direct_m)],
        })
    }
}
