use approx::assert_relative_eq;

use crate::geo::*;

fn coord(lat: f64, lng: f64) -> Coordinate {
    Coordinate::from_degree(lat, lng).expect("test coordinate must be valid")
}

#[test]
fn accepts_range_boundaries() {
    assert!(Coordinate::from_degree(90.0, 180.0).is_ok());
    assert!(Coordinate::from_degree(-90.0, -180.0).is_ok());
    assert!(Coordinate::from_degree(0.0, 0.0).is_ok());
}

#[test]
fn rejects_out_of_range() {
    for (lat, lng) in [
        (90.0001, 0.0),
        (-90.5, 0.0),
        (0.0, 180.01),
        (0.0, -181.0),
        (f64::NAN, 0.0),
        (0.0, f64::INFINITY),
    ] {
        assert!(
            matches!(
                Coordinate::from_degree(lat, lng),
                Err(GeoError::InvalidCoordinate(_))
            ),
            "({lat}, {lng}) should be rejected"
        );
    }
}

#[test]
fn serializes_as_lat_lng_object() {
    let position = coord(28.6139, 77.209);
    let json = serde_json::to_value(position).expect("serializes");

    assert_eq!(json, serde_json::json!({ "lat": 28.6139, "lng": 77.209 }));
}

#[test]
fn deserialization_validates_range() {
    let valid: Result<Coordinate, _> = serde_json::from_str(r#"{"lat": 10.0, "lng": 20.0}"#);
    assert_eq!(valid.expect("valid coordinate"), coord(10.0, 20.0));

    let invalid: Result<Coordinate, _> = serde_json::from_str(r#"{"lat": 100.0, "lng": 20.0}"#);
    assert!(invalid.is_err());
}

#[test]
fn slice_is_longitude_first() {
    let position = coord(-33.883572, 151.180025);
    assert_eq!(position.slice(), [151.180025, -33.883572]);
    assert_eq!(position.point().x(), 151.180025);
    assert_eq!(position.point().y(), -33.883572);
}

#[test]
fn approx_eq_uses_epsilon() {
    let a = coord(10.0, 10.0);
    assert!(a.approx_eq(&coord(10.0 + COORDINATE_EPSILON / 2.0, 10.0)));
    assert!(!a.approx_eq(&coord(10.0 + COORDINATE_EPSILON * 10.0, 10.0)));
}

#[test]
fn delhi_distance() {
    let connaught = coord(28.6139, 77.2090);
    let pitampura = coord(28.7041, 77.1025);

    let distance = distance_km(&connaught, &pitampura);
    assert!(distance > 14.0 && distance < 15.0, "got {distance}");
    assert_relative_eq!(distance, distance_km(&pitampura, &connaught), epsilon = 1e-9);
}

#[test]
fn path_length_of_degenerate_paths() {
    assert_eq!(path_length_km(&[]), 0.0);
    assert_eq!(path_length_km(&[coord(1.0, 1.0)]), 0.0);
}

#[test]
fn projection_onto_equator_segment() {
    let path = [coord(0.0, 0.0), coord(0.0, 1.0)];
    let projection = project_onto_path(&path, &coord(0.01, 0.5)).expect("projects");

    // 0.01 degrees of latitude is ~1.11km, half a degree of longitude ~55.6km
    assert_relative_eq!(projection.lateral_km, 1.112, max_relative = 0.01);
    assert_relative_eq!(projection.along_km, 55.6, max_relative = 0.01);
}

#[test]
fn projection_picks_closest_segment() {
    let path = [coord(0.0, 0.0), coord(0.0, 1.0), coord(1.0, 1.0)];
    let projection = project_onto_path(&path, &coord(0.5, 1.001)).expect("projects");

    // Closest to the second (northbound) segment
    assert!(projection.lateral_km < 0.2);
    assert!(projection.along_km > 111.0);
}

#[test]
fn projection_requires_a_segment() {
    assert!(project_onto_path(&[coord(0.0, 0.0)], &coord(1.0, 1.0)).is_none());
}

#[test]
fn static_geocoder_resolves_known_addresses() {
    let geocoder = StaticGeocoder::default().with("India Gate", coord(28.6129, 77.2295));

    assert_eq!(geocoder.geocode("INDIA GATE"), Ok(coord(28.6129, 77.2295)));
    assert_eq!(
        geocoder.geocode("Red Fort"),
        Err(GeocodeError::NotFound("Red Fort".to_string()))
    );
}
