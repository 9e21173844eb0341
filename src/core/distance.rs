use serde::{Deserialize, Serialize};

use crate::models::Coordinate;

/// Earth's mean radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers in one statute mile
pub const KM_PER_MILE: f64 = 1.609344;

/// Unit a distance is reported in
///
/// Parsed leniently: `"MI"` or `"M"` (any case) selects miles, every other
/// value falls back to kilometers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DistanceUnit {
    #[default]
    Kilometers,
    Miles,
}

impl From<String> for DistanceUnit {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<&str> for DistanceUnit {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "MI" | "M" => Self::Miles,
            _ => Self::Kilometers,
        }
    }
}

impl From<DistanceUnit> for String {
    fn from(unit: DistanceUnit) -> Self {
        match unit {
            DistanceUnit::Kilometers => "KM".to_string(),
            DistanceUnit::Miles => "MI".to_string(),
        }
    }
}

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in kilometers
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Great-circle distance between two coordinates in the requested unit
///
/// Identical coordinates short-circuit to exactly `0.0`. NaN inputs are
/// not rejected and come back out as NaN.
pub fn distance(source: Coordinate, destination: Coordinate, unit: DistanceUnit) -> f64 {
    if source.latitude == destination.latitude && source.longitude == destination.longitude {
        return 0.0;
    }

    let km = haversine_distance(
        source.latitude,
        source.longitude,
        destination.latitude,
        destination.longitude,
    );

    match unit {
        DistanceUnit::Kilometers => km,
        DistanceUnit::Miles => km / KM_PER_MILE,
    }
}
