use std::collections::HashMap;

use crate::geo::{Coordinate, GeocodeError};

/// Resolves a free-form address into a position.
///
/// Address resolution lives outside this crate, implementors adapt
/// whichever geocoding service the calling layer uses.
pub trait Geocoder: Send + Sync {
    fn geocode(&self, address: &str) -> Result<Coordinate, GeocodeError>;
}

/// A fixed address book, matched case-insensitively on trimmed input.
///
/// ```rust
/// use tollway::geo::{Coordinate, Geocoder, StaticGeocoder};
///
/// let geocoder = StaticGeocoder::default()
///     .with("Connaught Place", Coordinate::from_degree(28.6315, 77.2167).unwrap());
///
/// assert!(geocoder.geocode("  connaught place ").is_ok());
/// assert!(geocoder.geocode("Atlantis").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    entries: HashMap<String, Coordinate>,
}

impl StaticGeocoder {
    fn normalise(address: &str) -> String {
        address.trim().to_lowercase()
    }

    pub fn with(mut self, address: &str, position: Coordinate) -> Self {
        self.insert(address, position);
        self
    }

    pub fn insert(&mut self, address: &str, position: Coordinate) {
        self.entries.insert(Self::normalise(address), position);
    }
}

impl Geocoder for StaticGeocoder {
    fn geocode(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        self.entries
            .get(&Self::normalise(address))
            .copied()
            .ok_or_else(|| GeocodeError::NotFound(address.to_string()))
    }
}
