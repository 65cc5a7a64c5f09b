use approx::assert_relative_eq;

use crate::geo::{distance_km, Coordinate};
use crate::toll::*;

fn coord(lat: f64, lng: f64) -> Coordinate {
    Coordinate::from_degree(lat, lng).expect("valid coordinate")
}

fn equator() -> Vec<Coordinate> {
    vec![coord(0.0, 0.0), coord(0.0, 0.5), coord(0.0, 1.0)]
}

/// Returns a fixed list regardless of the path.
struct FixedLookup(Vec<TollCharge>);

impl TollLookup for FixedLookup {
    fn lookup(&self, _: &[Coordinate], _: f64) -> Result<Vec<TollCharge>, TollError> {
        Ok(self.0.clone())
    }
}

struct BrokenLookup;

impl TollLookup for BrokenLookup {
    fn lookup(&self, _: &[Coordinate], _: f64) -> Result<Vec<TollCharge>, TollError> {
        Err(TollError::ReadFailure("dataset offline".to_string()))
    }
}

#[test]
fn keeps_only_plazas_within_corridor() {
    let dataset = TollDataset::new([
        // ~0.55km north of the path
        TollCharge::new("Near", coord(0.005, 0.3), 40.0),
        // ~5.5km north of the path
        TollCharge::new("Far", coord(0.05, 0.6), 80.0),
    ]);

    let tolls = TollLocator::new(dataset).locate_tolls(&equator());

    assert_eq!(tolls.len(), 1);
    assert_eq!(tolls[0].name, "Near");
}

#[test]
fn ordered_by_distance_along_then_name() {
    let dataset = TollDataset::new([
        TollCharge::new("Late", coord(0.001, 0.9), 50.0),
        TollCharge::new("Beta", coord(0.0, 0.2), 30.0),
        TollCharge::new("Alpha", coord(0.0, 0.2), 35.0),
        TollCharge::new("Early", coord(-0.001, 0.1), 45.0),
    ]);

    let names = TollLocator::new(dataset)
        .locate_tolls(&equator())
        .into_iter()
        .map(|toll| toll.name)
        .collect::<Vec<_>>();

    assert_eq!(names, ["Early", "Alpha", "Beta", "Late"]);
}

#[test]
fn shared_vertices_do_not_duplicate_plazas() {
    // Sits on the vertex shared by both segments, so both envelopes see it.
    let dataset = TollDataset::new([TollCharge::new("Vertex", coord(0.0, 0.5), 60.0)]);

    let tolls = TollLocator::new(dataset).locate_tolls(&equator());
    assert_eq!(tolls.len(), 1);
}

#[test]
fn duplicate_source_entries_are_removed() {
    let plaza = TollCharge::new("Twice", coord(0.0, 0.4), 55.0);
    let lookup = FixedLookup(vec![plaza.clone(), plaza.clone(), plaza]);

    let tolls = TollLocator::new(lookup).locate_tolls(&equator());
    assert_eq!(tolls.len(), 1);
}

#[test]
fn locating_is_deterministic() {
    let dataset = TollDataset::seeded_plazas(&coord(0.0, 0.0), &coord(0.0, 1.0), 4, 7);
    let locator = TollLocator::new(dataset);

    let first = locator.locate_tolls(&equator());
    let second = locator.locate_tolls(&equator());

    assert_eq!(first.len(), 4);
    assert_eq!(first, second);
}

#[test]
fn no_plazas_near_path_is_empty() {
    let dataset = TollDataset::new([TollCharge::new("Elsewhere", coord(45.0, 45.0), 90.0)]);
    assert!(TollLocator::new(dataset).locate_tolls(&equator()).is_empty());
}

#[test]
fn degenerate_paths_have_no_tolls() {
    let dataset = TollDataset::new([TollCharge::new("Origin", coord(0.0, 0.0), 90.0)]);
    let locator = TollLocator::new(dataset);

    assert!(locator.locate_tolls(&[]).is_empty());
    assert!(locator.locate_tolls(&[coord(0.0, 0.0)]).is_empty());
}

#[test_log::test]
fn failing_lookup_costs_as_toll_free() {
    let tolls = TollLocator::new(BrokenLookup).locate_tolls(&equator());
    assert!(tolls.is_empty());
}

#[test]
fn corridor_width_is_validated() {
    assert!(TollLocator::new(TollDataset::default())
        .with_corridor(-1.0)
        .is_err());
    assert!(TollLocator::new(TollDataset::default())
        .with_corridor(f64::NAN)
        .is_err());

    let locator = TollLocator::new(TollDataset::default())
        .with_corridor(0.5)
        .expect("valid corridor");
    assert_eq!(locator.corridor_km(), 0.5);
}

#[test]
fn narrower_corridor_excludes_offset_plazas() {
    let near = TollCharge::new("Near", coord(0.005, 0.3), 40.0);
    let locator = TollLocator::new(TollDataset::new([near]))
        .with_corridor(0.25)
        .expect("valid corridor");

    assert!(locator.locate_tolls(&equator()).is_empty());
}

#[test]
fn seeded_plazas_are_reproducible() {
    let start = coord(28.6139, 77.2090);
    let end = coord(28.7041, 77.1025);

    let first = TollDataset::seeded_plazas(&start, &end, 3, 11);
    let second = TollDataset::seeded_plazas(&start, &end, 3, 11);

    let mut first = first.iter().cloned().collect::<Vec<_>>();
    let mut second = second.iter().cloned().collect::<Vec<_>>();
    first.sort_by(|a, b| a.name.cmp(&b.name));
    second.sort_by(|a, b| a.name.cmp(&b.name));

    assert_eq!(first, second);
    assert_eq!(first.len(), 3);

    for plaza in &first {
        assert!((30.0..=150.0).contains(&plaza.amount), "{} out of range", plaza.amount);
        assert_eq!(plaza.amount.fract(), 0.0);
    }
}

#[test]
fn seeded_plazas_lie_between_endpoints() {
    let start = coord(0.0, 0.0);
    let end = coord(0.0, 1.0);
    let direct = distance_km(&start, &end);

    let dataset = TollDataset::seeded_plazas(&start, &end, 1, 3);
    let plaza = dataset.iter().next().expect("one plaza");

    assert_relative_eq!(distance_km(&start, &plaza.location), direct / 2.0, epsilon = 1e-6);
}

#[test]
fn dataset_rejects_negative_corridor() {
    assert_eq!(
        TollDataset::default().lookup(&equator(), -2.0),
        Err(TollError::InvalidCorridor(-2.0))
    );
}
