//! Safety alerts around a position.
//!
//! Alerts are placeholders for a live feed: the same three advisories,
//! placed at fixed bearings and distances from the queried position.

use geo::{Destination, Haversine};
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumString};

use crate::geo::{Coordinate, METERS_PER_KM};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Weather,
    Traffic,
    Roadwork,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, StrumDisplay, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyAlert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub severity: Severity,
    pub message: String,
    pub location: Coordinate,
}

/// `(kind, severity, message, bearing in degrees, distance in km)`
const ADVISORIES: [(AlertKind, Severity, &str, f64, f64); 3] = [
    (AlertKind::Weather, Severity::Moderate, "Heavy rain expected in 2 hours", 0.0, 0.0),
    (AlertKind::Traffic, Severity::Low, "Light traffic on route", 45.0, 1.5),
    (
        AlertKind::Roadwork,
        Severity::High,
        "Road construction ahead - expect delays",
        333.0,
        2.5,
    ),
];

/// Alerts in effect around `center`, most severe first.
pub fn safety_alerts(center: &Coordinate) -> Vec<SafetyAlert> {
    let mut alerts = ADVISORIES
        .iter()
        .map(|(kind, severity, message, bearing, km)| {
            let location = if *km > 0.0 {
                Coordinate::from_point_clamped(Haversine.destination(center.point(), *bearing, km * METERS_PER_KM))
            } else {
                *center
            };

            SafetyAlert {
                kind: *kind,
                severity: *severity,
                message: message.to_string(),
                location,
            }
        })
        .collect::<Vec<_>>();

    alerts.sort_by(|a, b| b.severity.cmp(&a.severity));
    alerts
}
