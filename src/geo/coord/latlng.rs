use std::fmt::{Debug, Display, Formatter};

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::geo::error::GeoError;
use crate::geo::COORDINATE_EPSILON;

pub type Degree = f64;

/// `Coordinate`
/// The latitude, longitude pair structure, geotags an item with a location.
///
/// Always constructed through [`Coordinate::from_degree`], which validates
/// the range of both axes, so any held `Coordinate` is a valid position.
///
/// ```rust
/// use tollway::geo::Coordinate;
///
/// let delhi = Coordinate::from_degree(28.6139, 77.2090).unwrap();
/// assert_eq!(delhi.slice(), [77.2090, 28.6139]);
///
/// assert!(Coordinate::from_degree(91.0, 0.0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    lat: Degree,
    lng: Degree,
}

/// Unvalidated wire form, only used to route deserialization
/// through [`Coordinate::from_degree`].
#[derive(Deserialize)]
struct RawCoordinate {
    lat: Degree,
    lng: Degree,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = GeoError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::from_degree(raw.lat, raw.lng)
    }
}

impl TryFrom<Point> for Coordinate {
    type Error = GeoError;

    /// Format is: (x = Lng, y = Lat)
    fn try_from(point: Point) -> Result<Self, Self::Error> {
        Coordinate::from_degree(point.y(), point.x())
    }
}

impl From<Coordinate> for Point {
    fn from(value: Coordinate) -> Self {
        value.point()
    }
}

impl Coordinate {
    pub fn from_degree(lat: Degree, lng: Degree) -> Result<Self, GeoError> {
        if !lat.is_finite() || !(-90f64..=90f64).contains(&lat) {
            return Err(GeoError::InvalidCoordinate(format!(
                "Latitude must be within [-90, 90]. Given: {}",
                lat
            )));
        }

        if !lng.is_finite() || !(-180f64..=180f64).contains(&lng) {
            return Err(GeoError::InvalidCoordinate(format!(
                "Longitude must be within [-180, 180]. Given: {}",
                lng
            )));
        }

        Ok(Self::from_degree_unchecked(lat, lng))
    }

    /// Skips range validation. Only for values derived from
    /// already-valid coordinates (interpolation, projection).
    pub(crate) fn from_degree_unchecked(lat: Degree, lng: Degree) -> Self {
        Coordinate { lat, lng }
    }

    /// Clamps a derived point back into the valid range. Synthesized
    /// geometry near the poles or antimeridian may overshoot slightly.
    pub(crate) fn from_point_clamped(point: Point) -> Self {
        let lng = if point.x() > 180.0 {
            point.x() - 360.0
        } else if point.x() < -180.0 {
            point.x() + 360.0
        } else {
            point.x()
        };

        Coordinate {
            lat: point.y().clamp(-90.0, 90.0),
            lng: lng.clamp(-180.0, 180.0),
        }
    }

    pub fn lat(&self) -> Degree {
        self.lat
    }

    pub fn lng(&self) -> Degree {
        self.lng
    }

    /// The `geo` point, `x` is longitude and `y` is latitude.
    pub fn point(&self) -> Point {
        Point::new(self.lng, self.lat)
    }

    // Returns a [`lng`, `lat`] pair
    pub fn slice(&self) -> [Degree; 2] {
        [self.lng, self.lat]
    }

    /// Whether both axes lie within [`COORDINATE_EPSILON`] of `other`.
    pub fn approx_eq(&self, other: &Coordinate) -> bool {
        (self.lat - other.lat).abs() <= COORDINATE_EPSILON
            && (self.lng - other.lng).abs() <= COORDINATE_EPSILON
    }
}

impl Debug for Coordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "POINT({} {})", self.lng, self.lat)
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}
