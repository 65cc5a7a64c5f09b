use geo::{Destination, Geodesic, InterpolatableLine, Haversine, Line, Point};
use itertools::Itertools;
use rand::Rng;
use rstar::{RTree, AABB};

use crate::geo::{Coordinate, METERS_PER_KM};
use crate::toll::{TollCharge, TollError, TollLookup};
use crate::util::seed::seeded_rng;

const MIN_PLAZA_AMOUNT: u32 = 30;
const MAX_PLAZA_AMOUNT: u32 = 150;

/// An in-memory snapshot of toll plazas, spatially indexed.
///
/// ```rust
/// use tollway::geo::Coordinate;
/// use tollway::toll::{TollCharge, TollDataset, TollLookup};
///
/// let plaza = Coordinate::from_degree(0.001, 0.5).unwrap();
/// let dataset = TollDataset::new([TollCharge::new("Midpoint", plaza, 60.0)]);
///
/// let path = [
///     Coordinate::from_degree(0.0, 0.0).unwrap(),
///     Coordinate::from_degree(0.0, 1.0).unwrap(),
/// ];
///
/// assert_eq!(dataset.lookup(&path, 2.0).unwrap().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct TollDataset {
    index: RTree<TollCharge>,
}

impl Default for TollDataset {
    fn default() -> Self {
        Self {
            index: RTree::new(),
        }
    }
}

impl TollDataset {
    pub fn new(charges: impl IntoIterator<Item = TollCharge>) -> Self {
        Self {
            index: RTree::bulk_load(charges.into_iter().collect()),
        }
    }

    /// Places `count` plazas evenly along the great-circle line between
    /// `start` and `end`, each charging a whole amount in `[30, 150]`.
    ///
    /// Deterministic for a given seed.
    pub fn seeded_plazas(start: &Coordinate, end: &Coordinate, count: usize, seed: u64) -> Self {
        let mut rng = seeded_rng(seed);
        let line = Line::new(start.point(), end.point());

        let charges = (0..count).map(|i| {
            let ratio = (i + 1) as f64 / (count + 1) as f64;
            let location = line.point_at_ratio_from_start(&Haversine, ratio);
            let amount = rng.gen_range(MIN_PLAZA_AMOUNT..=MAX_PLAZA_AMOUNT);

            TollCharge::new(
                format!("Toll Plaza {}", i + 1),
                Coordinate::from_point_clamped(location),
                amount as f64,
            )
        });

        Self::new(charges)
    }

    pub fn insert(&mut self, charge: TollCharge) {
        self.index.insert(charge);
    }

    pub fn len(&self) -> usize {
        self.index.size()
    }

    pub fn is_empty(&self) -> bool {
        self.index.size() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &TollCharge> {
        self.index.iter()
    }

    /// The bounding box of a segment, grown by `distance` metres on every side.
    fn segment_envelope(source: &Coordinate, target: &Coordinate, distance: f64) -> AABB<Point> {
        let bounds = AABB::from_corners(source.point(), target.point());
        let diagonal = distance * std::f64::consts::SQRT_2;

        let bottom_left = Geodesic.destination(bounds.lower(), 225.0, diagonal);
        let top_right = Geodesic.destination(bounds.upper(), 45.0, diagonal);
        AABB::from_corners(bottom_left, top_right)
    }
}

impl TollLookup for TollDataset {
    fn lookup(&self, path: &[Coordinate], corridor_km: f64) -> Result<Vec<TollCharge>, TollError> {
        if !corridor_km.is_finite() || corridor_km < 0.0 {
            return Err(TollError::InvalidCorridor(corridor_km));
        }

        let distance = corridor_km * METERS_PER_KM;

        // Segments share endpoints, so a plaza may fall within several
        // envelopes. Duplicates are collapsed by the locator.
        Ok(path
            .iter()
            .tuple_windows()
            .flat_map(|(source, target)| {
                let envelope = Self::segment_envelope(source, target, distance);
                self.index.locate_in_envelope(&envelope)
            })
            .cloned()
            .collect())
    }
}
