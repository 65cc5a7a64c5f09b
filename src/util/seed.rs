//! Deterministic randomness.
//!
//! Everything the crate synthesizes (geometry, plazas, stations) is drawn
//! from a `ChaCha8Rng` whose seed is a hash of the request, so identical
//! requests produce identical output on every platform.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use xxhash_rust::xxh3::xxh3_64;

use crate::geo::Coordinate;

pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Hashes a sequence of coordinates and a discriminating tag into a seed.
///
/// ```rust
/// use tollway::geo::Coordinate;
/// use tollway::util::seed::seed_for;
///
/// let a = Coordinate::from_degree(28.6139, 77.2090).unwrap();
/// let b = Coordinate::from_degree(28.7041, 77.1025).unwrap();
///
/// assert_eq!(seed_for(&[a, b], "scenic"), seed_for(&[a, b], "scenic"));
/// assert_ne!(seed_for(&[a, b], "scenic"), seed_for(&[b, a], "scenic"));
/// ```
pub fn seed_for(coordinates: &[Coordinate], tag: &str) -> u64 {
    let mut bytes = Vec::with_capacity(coordinates.len() * 16 + tag.len());
    for coordinate in coordinates {
        bytes.extend_from_slice(&coordinate.lat().to_bits().to_le_bytes());
        bytes.extend_from_slice(&coordinate.lng().to_bits().to_le_bytes());
    }
    bytes.extend_from_slice(tag.as_bytes());

    xxh3_64(&bytes)
}
