//! Domain models for the fleet loader.
//!
//! - [`Car`] - Road vehicle with mileage and manufacturer
//! - [`Drone`] - Aerial vehicle with airtime hours and home base
//! - [`LatLong`] - Geographic position shared by both
//! - [`VehicleKind`] - The `type` discriminant of a raw record
//!
//! Entities are built in two steps: a fallible constructor that takes the
//! identifier, model and position, then setters for the type-specific fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{EntityError, EntityResult};

// =============================================================================
// Vehicle Kind
// =============================================================================

/// Kind of vehicle selected by a record's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleKind {
    Car,
    Drone,
}

impl VehicleKind {
    /// Match a discriminant exactly (`"car"` or `"drone"`).
    pub fn from_discriminant(value: &str) -> Option<Self> {
        match value {
            "car" => Some(Self::Car),
            "drone" => Some(Self::Drone),
            _ => None,
        }
    }

    /// Read the discriminant from a raw record, if it has a known one.
    pub fn of_record(record: &Value) -> Option<Self> {
        record
            .get("type")
            .and_then(Value::as_str)
            .and_then(Self::from_discriminant)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Drone => "drone",
        }
    }
}

impl fmt::Display for VehicleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Position
// =============================================================================

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLong {
    pub lat: f64,
    pub long: f64,
}

impl LatLong {
    /// Build a position, rejecting out-of-range or non-finite coordinates.
    pub fn new(lat: f64, long: f64) -> EntityResult<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(EntityError::InvalidPosition(format!(
                "latitude {} out of range",
                lat
            )));
        }
        if !long.is_finite() || !(-180.0..=180.0).contains(&long) {
            return Err(EntityError::InvalidPosition(format!(
                "longitude {} out of range",
                long
            )));
        }
        Ok(Self { lat, long })
    }

    /// Read a position from a raw value.
    ///
    /// Accepts a two-element array (`[lat, long]`, numbers or numeric
    /// strings) or a `"lat,long"` string as found in CSV exports.
    pub fn from_value(value: &Value) -> EntityResult<Self> {
        match value {
            Value::Array(items) => {
                let [lat, long] = items.as_slice() else {
                    return Err(EntityError::InvalidPosition(format!(
                        "expected 2 coordinates, found {}",
                        items.len()
                    )));
                };
                Self::new(coordinate(lat)?, coordinate(long)?)
            }
            Value::String(s) => {
                let (lat, long) = s.split_once(',').ok_or_else(|| {
                    EntityError::InvalidPosition(format!("expected 'lat,long', found '{}'", s))
                })?;
                Self::new(parse_coordinate(lat)?, parse_coordinate(long)?)
            }
            other => Err(EntityError::InvalidPosition(format!(
                "unsupported value {}",
                other
            ))),
        }
    }
}

fn coordinate(value: &Value) -> EntityResult<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| EntityError::InvalidPosition(format!("bad coordinate {}", n))),
        Value::String(s) => parse_coordinate(s),
        other => Err(EntityError::InvalidPosition(format!(
            "bad coordinate {}",
            other
        ))),
    }
}

fn parse_coordinate(s: &str) -> EntityResult<f64> {
    s.trim()
        .parse::<f64>()
        .map_err(|_| EntityError::InvalidPosition(format!("bad coordinate '{}'", s.trim())))
}

fn non_empty(value: String, err: EntityError) -> EntityResult<String> {
    if value.trim().is_empty() {
        Err(err)
    } else {
        Ok(value)
    }
}

fn non_negative(field: &str, value: f64) -> EntityResult<f64> {
    if !value.is_finite() {
        return Err(EntityError::InvalidField {
            field: field.to_string(),
            message: "must be finite".to_string(),
        });
    }
    if value < 0.0 {
        return Err(EntityError::InvalidField {
            field: field.to_string(),
            message: "must not be negative".to_string(),
        });
    }
    Ok(value)
}

// =============================================================================
// Car
// =============================================================================

/// A road vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    identifier: String,
    model: String,
    position: LatLong,
    mileage: f64,
    manufacturer: String,
}

impl Car {
    /// Create a car with zero mileage and no manufacturer.
    pub fn new(
        identifier: impl Into<String>,
        model: impl Into<String>,
        position: LatLong,
    ) -> EntityResult<Self> {
        Ok(Self {
            identifier: non_empty(identifier.into(), EntityError::InvalidIdentifier)?,
            model: non_empty(model.into(), EntityError::InvalidModel)?,
            position,
            mileage: 0.0,
            manufacturer: String::new(),
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn position(&self) -> LatLong {
        self.position
    }

    pub fn mileage(&self) -> f64 {
        self.mileage
    }

    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    /// Set the odometer reading. Must be finite and non-negative.
    pub fn set_mileage(&mut self, mileage: f64) -> EntityResult<()> {
        self.mileage = non_negative("mileage", mileage)?;
        Ok(())
    }

    pub fn set_manufacturer(&mut self, manufacturer: impl Into<String>) {
        self.manufacturer = manufacturer.into();
    }
}

// =============================================================================
// Drone
// =============================================================================

/// An aerial vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drone {
    identifier: String,
    model: String,
    position: LatLong,
    airtime_hours: f64,
    base: String,
}

impl Drone {
    /// Create a drone with no airtime and no home base.
    pub fn new(
        identifier: impl Into<String>,
        model: impl Into<String>,
        position: LatLong,
    ) -> EntityResult<Self> {
        Ok(Self {
            identifier: non_empty(identifier.into(), EntityError::InvalidIdentifier)?,
            model: non_empty(model.into(), EntityError::InvalidModel)?,
            position,
            airtime_hours: 0.0,
            base: String::new(),
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn position(&self) -> LatLong {
        self.position
    }

    pub fn airtime_hours(&self) -> f64 {
        self.airtime_hours
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Set cumulative airtime. Must be finite and non-negative.
    pub fn set_airtime_hours(&mut self, hours: f64) -> EntityResult<()> {
        self.airtime_hours = non_negative("airtimeHours", hours)?;
        Ok(())
    }

    pub fn set_base(&mut self, base: impl Into<String>) {
        self.base = base.into();
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vehicle_kind_discriminant() {
        assert_eq!(VehicleKind::from_discriminant("car"), Some(VehicleKind::Car));
        assert_eq!(VehicleKind::from_discriminant("drone"), Some(VehicleKind::Drone));
        assert_eq!(VehicleKind::from_discriminant("Car"), None);
        assert_eq!(VehicleKind::of_record(&json!({ "type": "boat" })), None);
        assert_eq!(VehicleKind::of_record(&json!({ "type": 1 })), None);
        assert_eq!(VehicleKind::of_record(&json!("car")), None);
    }

    #[test]
    fn test_lat_long_from_array() {
        let pos = LatLong::from_value(&json!([1, 2])).unwrap();
        assert_eq!(pos, LatLong { lat: 1.0, long: 2.0 });

        let pos = LatLong::from_value(&json!(["45.5", "-73.6"])).unwrap();
        assert_eq!(pos.lat, 45.5);
        assert_eq!(pos.long, -73.6);
    }

    #[test]
    fn test_lat_long_from_string() {
        let pos = LatLong::from_value(&json!("48.85, 2.35")).unwrap();
        assert_eq!(pos, LatLong { lat: 48.85, long: 2.35 });
    }

    #[test]
    fn test_lat_long_rejects_malformed() {
        assert!(LatLong::from_value(&json!([1])).is_err());
        assert!(LatLong::from_value(&json!([1, 2, 3])).is_err());
        assert!(LatLong::from_value(&json!([91, 0])).is_err());
        assert!(LatLong::from_value(&json!([0, 181])).is_err());
        assert!(LatLong::from_value(&json!(["north", "east"])).is_err());
        assert!(LatLong::from_value(&json!("somewhere")).is_err());
        assert!(LatLong::from_value(&json!({ "lat": 1, "long": 2 })).is_err());
        assert!(LatLong::from_value(&json!(true)).is_err());
    }

    #[test]
    fn test_car_construction() {
        let mut car = Car::new("ABC1", "Civic", LatLong::new(1.0, 2.0).unwrap()).unwrap();
        car.set_mileage(1200.0).unwrap();
        car.set_manufacturer("Honda");
        assert_eq!(car.identifier(), "ABC1");
        assert_eq!(car.model(), "Civic");
        assert_eq!(car.mileage(), 1200.0);
        assert_eq!(car.manufacturer(), "Honda");
    }

    #[test]
    fn test_car_rejects_blank_identifier_and_model() {
        let pos = LatLong::new(0.0, 0.0).unwrap();
        assert_eq!(Car::new("", "Civic", pos), Err(EntityError::InvalidIdentifier));
        assert_eq!(Car::new("ABC1", "  ", pos), Err(EntityError::InvalidModel));
    }

    #[test]
    fn test_negative_metrics_rejected() {
        let pos = LatLong::new(0.0, 0.0).unwrap();
        let mut car = Car::new("ABC1", "Civic", pos).unwrap();
        assert!(car.set_mileage(-1.0).is_err());
        assert!(car.set_mileage(f64::INFINITY).is_err());
        assert_eq!(car.mileage(), 0.0);

        let mut drone = Drone::new("D1", "X", pos).unwrap();
        assert!(drone.set_airtime_hours(-0.5).is_err());
        drone.set_airtime_hours(12.5).unwrap();
        assert_eq!(drone.airtime_hours(), 12.5);
    }

    #[test]
    fn test_drone_serialization() {
        let mut drone = Drone::new("D1", "X", LatLong::new(0.0, 0.0).unwrap()).unwrap();
        drone.set_base("Hangar 7");
        let json = serde_json::to_value(&drone).unwrap();
        assert_eq!(json["identifier"], "D1");
        assert_eq!(json["airtimeHours"], 0.0);
        assert_eq!(json["base"], "Hangar 7");
        assert_eq!(json["position"]["lat"], 0.0);
    }
}
