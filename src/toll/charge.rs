use geo::Point;
use rstar::AABB;
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// A single toll plaza and the amount charged for passing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TollCharge {
    pub name: String,
    pub location: Coordinate,
    pub amount: f64,
}

impl TollCharge {
    pub fn new(name: impl Into<String>, location: Coordinate, amount: f64) -> Self {
        Self {
            name: name.into(),
            location,
            amount,
        }
    }
}

impl rstar::RTreeObject for TollCharge {
    type Envelope = AABB<Point>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.location.point())
    }
}
