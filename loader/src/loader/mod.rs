//! The fleet loader: dispatch, validate, construct, collect.
//!
//! [`FleetLoader`] owns three append-only collections (cars, drones, data
//! errors) for its whole lifetime. Each call to [`FleetLoader::ingest`] adds
//! to them; nothing is ever cleared implicitly, so ingesting batch A then
//! batch B leaves the same state as ingesting A and B concatenated.
//!
//! ```text
//!   raw record ──▶ type? ──car──▶ validate_car ──ok──▶ construct_car ──ok──▶ cars
//!                    │                 │ fail               │ fail
//!                    │ drone (same)    ▼                    ▼
//!                    └─other──────▶ errors ◀────────────────┘
//! ```
//!
//! Malformed input never panics and never surfaces as an `Err`: every
//! failure becomes one or more [`DataError`]s carrying the offending record.

mod report;

pub use report::{FleetSnapshot, IngestReport, LoadSummary};

use chrono::Utc;
use serde_json::Value;

use crate::config::LoaderConfig;
use crate::error::{EntityError, EntityResult};
use crate::logs::LogEntry;
use crate::models::{Car, Drone, LatLong, VehicleKind};
use crate::validation::{check_record, parse_float, DataError, FieldRules, CAR_RULES, DRONE_RULES};

/// Validates raw fleet records and accumulates typed vehicles and errors.
#[derive(Debug, Default)]
pub struct FleetLoader {
    cars: Vec<Car>,
    drones: Vec<Drone>,
    errors: Vec<DataError>,
    config: LoaderConfig,
}

impl FleetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LoaderConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Ingest
    // -------------------------------------------------------------------------

    /// Process a batch of raw records in order.
    ///
    /// Records are independent: a bad record contributes errors and no
    /// entity, and processing continues with the next one.
    pub fn ingest(&mut self, records: &[Value]) -> IngestReport {
        let mut report = IngestReport::start(records.len());
        let (cars_before, drones_before, errors_before) =
            (self.cars.len(), self.drones.len(), self.errors.len());

        report.push_log(LogEntry::info(format!("Ingesting {} records", records.len())));

        for (index, record) in records.iter().enumerate() {
            let loaded = self.ingest_one(record);
            if !loaded {
                report.rejected += 1;
            }
            if self.config.log_records {
                tracing::debug!(
                    batch = %report.batch_id,
                    index,
                    kind = ?VehicleKind::of_record(record),
                    loaded,
                    "record processed"
                );
            }
        }

        report.cars_added = self.cars.len() - cars_before;
        report.drones_added = self.drones.len() - drones_before;
        report.errors_added = self.errors.len() - errors_before;

        self.log_batch(&mut report, errors_before);
        report
    }

    /// Process one raw record. Returns `true` when it became an entity.
    pub fn ingest_one(&mut self, record: &Value) -> bool {
        match VehicleKind::of_record(record) {
            Some(VehicleKind::Car) => {
                if !self.validate_car(record) {
                    return false;
                }
                match Self::construct_car(record) {
                    Ok(car) => {
                        self.cars.push(car);
                        true
                    }
                    Err(e) => {
                        self.errors.push(DataError::construction(VehicleKind::Car, e, record));
                        false
                    }
                }
            }
            Some(VehicleKind::Drone) => {
                if !self.validate_drone(record) {
                    return false;
                }
                match Self::construct_drone(record) {
                    Ok(drone) => {
                        self.drones.push(drone);
                        true
                    }
                    Err(e) => {
                        self.errors.push(DataError::construction(VehicleKind::Drone, e, record));
                        false
                    }
                }
            }
            None => {
                self.errors.push(DataError::unknown_type(record));
                false
            }
        }
    }

    fn log_batch(&self, report: &mut IngestReport, errors_before: usize) {
        let summary = report.summary();
        if report.is_clean() {
            report.push_log(LogEntry::success(summary));
            return;
        }

        report.push_log(LogEntry::warning(summary));
        let max = self.config.max_logged_errors;
        let new_errors = &self.errors[errors_before..];
        for err in new_errors.iter().take(max) {
            let license = err
                .record()
                .get("license")
                .and_then(Value::as_str)
                .unwrap_or("?");
            report.push_log(
                LogEntry::warning(format!("{} (license: {})", err, license)).with_indent(1),
            );
        }
        if new_errors.len() > max {
            report.push_log(
                LogEntry::warning(format!("... +{} more", new_errors.len() - max)).with_indent(1),
            );
        }
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    /// Check a car record, appending every problem found to the errors.
    pub fn validate_car(&mut self, record: &Value) -> bool {
        self.validate(record, &CAR_RULES)
    }

    /// Check a drone record, appending every problem found to the errors.
    pub fn validate_drone(&mut self, record: &Value) -> bool {
        self.validate(record, &DRONE_RULES)
    }

    fn validate(&mut self, record: &Value, rules: &FieldRules) -> bool {
        let errors = check_record(record, rules);
        let valid = errors.is_empty();
        self.errors.extend(errors);
        valid
    }

    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Build a car from a record. Does not touch loader state.
    pub fn construct_car(record: &Value) -> EntityResult<Car> {
        let (identifier, model, position) = base_fields(record)?;
        let mut car = Car::new(identifier, model, position)?;
        car.set_mileage(numeric_field(record, &CAR_RULES)?)?;
        car.set_manufacturer(text_field(record, "make")?);
        Ok(car)
    }

    /// Build a drone from a record. Does not touch loader state.
    pub fn construct_drone(record: &Value) -> EntityResult<Drone> {
        let (identifier, model, position) = base_fields(record)?;
        let mut drone = Drone::new(identifier, model, position)?;
        drone.set_airtime_hours(numeric_field(record, &DRONE_RULES)?)?;
        drone.set_base(text_field(record, "base")?);
        Ok(drone)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// First loaded car with exactly this identifier.
    pub fn find_car_by_identifier(&self, identifier: &str) -> Option<&Car> {
        self.cars.iter().find(|car| car.identifier() == identifier)
    }

    /// First loaded drone with exactly this identifier.
    pub fn find_drone_by_identifier(&self, identifier: &str) -> Option<&Drone> {
        self.drones.iter().find(|drone| drone.identifier() == identifier)
    }

    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    pub fn drones(&self) -> &[Drone] {
        &self.drones
    }

    pub fn errors(&self) -> &[DataError] {
        &self.errors
    }

    pub fn summary(&self) -> LoadSummary {
        LoadSummary {
            cars: self.cars.len(),
            drones: self.drones.len(),
            errors: self.errors.len(),
        }
    }

    pub fn snapshot(&self) -> FleetSnapshot<'_> {
        FleetSnapshot {
            generated_at: Utc::now(),
            summary: self.summary(),
            cars: &self.cars,
            drones: &self.drones,
            errors: &self.errors,
        }
    }
}

fn base_fields(record: &Value) -> EntityResult<(&str, &str, LatLong)> {
    let identifier = record
        .get("license")
        .and_then(Value::as_str)
        .ok_or(EntityError::InvalidIdentifier)?;
    let model = record
        .get("model")
        .and_then(Value::as_str)
        .ok_or(EntityError::InvalidModel)?;
    let position = record
        .get("latLong")
        .ok_or_else(|| EntityError::InvalidPosition("missing".to_string()))
        .and_then(LatLong::from_value)?;
    Ok((identifier, model, position))
}

fn numeric_field(record: &Value, rules: &FieldRules) -> EntityResult<f64> {
    parse_float(record.get(rules.numeric_field)).ok_or_else(|| EntityError::InvalidField {
        field: rules.numeric_field.to_string(),
        message: "not a number".to_string(),
    })
}

fn text_field<'a>(record: &'a Value, field: &str) -> EntityResult<&'a str> {
    record
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| EntityError::InvalidField {
            field: field.to_string(),
            message: "expected a string".to_string(),
        })
}

// =============================================================================
// Tests
// =============================================================================
