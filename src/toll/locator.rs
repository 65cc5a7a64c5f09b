use itertools::Itertools;
use log::{debug, warn};

use crate::geo::{project_onto_path, Coordinate};
use crate::toll::{TollCharge, TollError, DEFAULT_CORRIDOR_KM};

/// A source of toll plazas near a path.
///
/// Implementations may over-approximate: every returned charge is
/// re-measured against the path by the [`TollLocator`].
pub trait TollLookup: Send + Sync {
    fn lookup(&self, path: &[Coordinate], corridor_km: f64) -> Result<Vec<TollCharge>, TollError>;
}

#[derive(Debug, Clone)]
pub struct TollLocator<T>
where
    T: TollLookup,
{
    source: T,
    corridor_km: f64,
}

impl<T> TollLocator<T>
where
    T: TollLookup,
{
    pub fn new(source: T) -> Self {
        Self {
            source,
            corridor_km: DEFAULT_CORRIDOR_KM,
        }
    }

    pub fn with_corridor(mut self, corridor_km: f64) -> Result<Self, TollError> {
        if !corridor_km.is_finite() || corridor_km < 0.0 {
            return Err(TollError::InvalidCorridor(corridor_km));
        }

        self.corridor_km = corridor_km;
        Ok(self)
    }

    pub fn corridor_km(&self) -> f64 {
        self.corridor_km
    }

    pub fn source(&self) -> &T {
        &self.source
    }

    /// The toll plazas within the corridor of `path`, in the order they
    /// are passed. Plazas at the same distance along are ordered by name.
    ///
    /// A failing source is logged and costed as toll-free.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all))]
    pub fn locate_tolls(&self, path: &[Coordinate]) -> Vec<TollCharge> {
        if path.len() < 2 {
            return vec![];
        }

        let candidates = match self.source.lookup(path, self.corridor_km) {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!("Toll lookup failed, costing route without tolls: {err}");
                return vec![];
            }
        };

        let tolls = candidates
            .into_iter()
            .filter_map(|toll| {
                let projection = project_onto_path(path, &toll.location)?;
                (projection.lateral_km <= self.corridor_km).then_some((projection.along_km, toll))
            })
            .sorted_by(|(a_along, a), (b_along, b)| {
                a_along
                    .total_cmp(b_along)
                    .then_with(|| a.name.cmp(&b.name))
            })
            .dedup_by(|(_, a), (_, b)| a.name == b.name && a.location == b.location)
            .map(|(_, toll)| toll)
            .collect::<Vec<_>>();

        debug!("Located {} tolls along {} points", tolls.len(), path.len());
        tolls
    }
}
