use serde::{de, Deserialize, Deserializer};
use sqlx::FromRow;

// ============ Fleet Models ============

/// A transported client (fleet deployment).
#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct Client {
    pub client_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub ssn: Option<String>,
    pub address_line1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub insurance_carrier: Option<String>,
    pub policy_number: Option<String>,
    pub group_number: Option<String>,
    /// Free-text signature captured on the intake form.
    pub signature: Option<String>,
}

/// A driver, with certification expirations and an optional assigned vehicle.
#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct Driver {
    pub driver_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub license_number: Option<String>,
    pub license_expiration: Option<String>,
    pub employee_number: Option<String>,
    pub phone: Option<String>,
    /// Not checked against `vehicles`.
    pub assigned_vehicle_id: Option<i64>,
    pub cpr_cert_expiration: Option<String>,
    pub first_aid_cert_expiration: Option<String>,
    pub defensive_cert_expiration: Option<String>,
}

#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct Vehicle {
    pub vehicle_id: i64,
    pub make: Option<String>,
    pub model: Option<String>,
    pub license_plate: Option<String>,
    pub year: Option<String>,
    pub vin_number: Option<String>,
    pub insurance_expiration: Option<String>,
    pub registration_expiration: Option<String>,
}

/// A single trip linking a client, a driver and a vehicle, with billing codes.
#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct Trip {
    pub trip_id: i64,
    pub client_id: Option<i64>,
    pub driver_id: Option<i64>,
    pub vehicle_id: Option<i64>,
    pub trip_date: Option<String>,
    pub pickup_time: Option<String>,
    pub dropoff_time: Option<String>,
    pub pickup_address: Option<String>,
    pub pickup_zip: Option<String>,
    pub destination_address: Option<String>,
    pub destination_zip: Option<String>,
    pub trip_reason: Option<String>,
    pub pickup_type: Option<String>,
    pub dropoff_type: Option<String>,
    /// Stored as 0/1.
    pub round_trip: Option<i64>,
    pub mileage: Option<f64>,
    pub hcpcs_code: Option<String>,
    pub modifier: Option<String>,
    pub icd10_code: Option<String>,
    pub prior_auth: Option<String>,
}

/// A trip joined with the display names of what it references.
///
/// The names are read at listing time, so they follow later edits to the
/// referenced rows. They are `None` when the reference dangles.
#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct TripListing {
    #[sqlx(flatten)]
    pub trip: Trip,
    pub client_name: Option<String>,
    pub driver_name: Option<String>,
    pub vehicle_plate: Option<String>,
}

/// One line of the client trip log: a trip with its client's details and the
/// current name of its driver and plate of its vehicle.
#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct TripLogRow {
    pub first_name: String,
    pub last_name: String,
    pub dob: Option<String>,
    pub ssn: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address_line1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub insurance_carrier: Option<String>,
    pub signature: Option<String>,
    pub trip_date: Option<String>,
    pub pickup_time: Option<String>,
    pub dropoff_time: Option<String>,
    pub pickup_address: Option<String>,
    pub destination_address: Option<String>,
    pub trip_reason: Option<String>,
    pub pickup_type: Option<String>,
    pub round_trip: Option<i64>,
    pub mileage: Option<f64>,
    pub prior_auth: Option<String>,
    pub driver_name: Option<String>,
    pub vehicle_plate: Option<String>,
}

/// An entry of a `<select>` on the trip form.
#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct SelectOption {
    pub id: i64,
    pub name: Option<String>,
}

// ============ Fleet Form Payloads ============

#[derive(Debug, Clone, Deserialize)]
pub struct NewClient {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub ssn: String,
    #[serde(default)]
    pub address_line1: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub insurance_carrier: String,
    #[serde(default)]
    pub policy_number: String,
    #[serde(default)]
    pub group_number: String,
    #[serde(default)]
    pub signature: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDriver {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub license_number: String,
    #[serde(default)]
    pub license_expiration: String,
    #[serde(default)]
    pub employee_number: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub assigned_vehicle_id: Option<i64>,
    #[serde(default)]
    pub cpr_cert_expiration: String,
    #[serde(default)]
    pub first_aid_cert_expiration: String,
    #[serde(default)]
    pub defensive_cert_expiration: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewVehicle {
    pub make: String,
    pub model: String,
    pub license_plate: String,
    pub year: String,
    pub vin_number: String,
    pub insurance_expiration: String,
    pub registration_expiration: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTrip {
    pub client_id: i64,
    pub driver_id: i64,
    pub vehicle_id: i64,
    #[serde(default)]
    pub trip_date: String,
    #[serde(default)]
    pub pickup_time: String,
    #[serde(default)]
    pub dropoff_time: String,
    #[serde(default)]
    pub pickup_address: String,
    #[serde(default)]
    pub pickup_zip: String,
    #[serde(default)]
    pub destination_address: String,
    #[serde(default)]
    pub destination_zip: String,
    #[serde(default)]
    pub trip_reason: String,
    #[serde(default)]
    pub pickup_type: String,
    #[serde(default)]
    pub dropoff_type: String,
    #[serde(default, deserialize_with = "deserialize_round_trip")]
    pub round_trip: i64,
    #[serde(default, deserialize_with = "deserialize_mileage")]
    pub mileage: f64,
    #[serde(default)]
    pub hcpcs_code: String,
    #[serde(default)]
    pub modifier: String,
    #[serde(default)]
    pub icd10_code: String,
    #[serde(default)]
    pub prior_auth: String,
}

// ============ Intake Models ============

/// A client of the intake deployment, with paths to uploaded documents.
///
/// Document paths are empty strings when nothing was uploaded.
#[derive(Debug, Clone, Default, FromRow, PartialEq)]
pub struct IntakeClient {
    pub client_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address_line1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub insurance_carrier: Option<String>,
    pub policy_number: Option<String>,
    pub group_number: Option<String>,
    pub photo_id_path: Option<String>,
    pub insurance_front_path: Option<String>,
    pub insurance_back_path: Option<String>,
}

#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct DropOff {
    pub dropoff_id: i64,
    pub client_id: Option<i64>,
    pub address: String,
}

/// Values inserted for a new intake client. Missing text fields stay `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewIntakeClient {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address_line1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub insurance_carrier: Option<String>,
    pub policy_number: Option<String>,
    pub group_number: Option<String>,
    pub photo_id_path: String,
    pub insurance_front_path: String,
    pub insurance_back_path: String,
}

// ============ Form Coercions ============

/// Checkbox convention: only the literal `"1"` means a round trip.
pub fn round_trip_flag(raw: &str) -> i64 {
    if raw == "1" {
        1
    } else {
        0
    }
}

/// Blank mileage is zero; anything else must be a finite number.
pub fn parse_mileage(raw: &str) -> Result<f64, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(format!("mileage must be a number, got '{}'", raw)),
    }
}

/// Blank means no reference; anything else must be an integer id.
pub fn parse_optional_id(raw: &str) -> Result<Option<i64>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i64>()
        .map(Some)
        .map_err(|_| format!("expected an integer id, got '{}'", raw))
}

fn deserialize_round_trip<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    let raw = String::deserialize(d)?;
    Ok(round_trip_flag(&raw))
}

fn deserialize_mileage<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let raw = String::deserialize(d)?;
    parse_mileage(&raw).map_err(de::Error::custom)
}

fn deserialize_optional_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    let raw = String::deserialize(d)?;
    parse_optional_id(&raw).map_err(de::Error::custom)
}
