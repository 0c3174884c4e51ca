//! Table definitions for both deployment variants.
//!
//! Every statement is `CREATE TABLE IF NOT EXISTS`, so running them against an
//! existing store leaves its data untouched.

use crate::config::Variant;

pub const FLEET_CLIENTS: &str = r#"
CREATE TABLE IF NOT EXISTS clients (
    client_id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    dob TEXT,
    gender TEXT,
    ssn TEXT,
    address_line1 TEXT,
    city TEXT,
    state TEXT,
    zip TEXT,
    phone TEXT,
    email TEXT,
    insurance_carrier TEXT,
    policy_number TEXT,
    group_number TEXT,
    signature TEXT
)
"#;

pub const FLEET_DRIVERS: &str = r#"
CREATE TABLE IF NOT EXISTS drivers (
    driver_id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    license_number TEXT,
    license_expiration TEXT,
    employee_number TEXT,
    phone TEXT,
    assigned_vehicle_id INTEGER,
    cpr_cert_expiration TEXT,
    first_aid_cert_expiration TEXT,
    defensive_cert_expiration TEXT
)
"#;

pub const FLEET_VEHICLES: &str = r#"
CREATE TABLE IF NOT EXISTS vehicles (
    vehicle_id INTEGER PRIMARY KEY AUTOINCREMENT,
    make TEXT,
    model TEXT,
    license_plate TEXT,
    year TEXT,
    vin_number TEXT,
    insurance_expiration TEXT,
    registration_expiration TEXT
)
"#;

pub const FLEET_TRIPS: &str = r#"
CREATE TABLE IF NOT EXISTS trips (
    trip_id INTEGER PRIMARY KEY AUTOINCREMENT,
    client_id INTEGER,
    driver_id INTEGER,
    vehicle_id INTEGER,
    trip_date TEXT,
    pickup_time TEXT,
    dropoff_time TEXT,
    pickup_address TEXT,
    pickup_zip TEXT,
    destination_address TEXT,
    destination_zip TEXT,
    trip_reason TEXT,
    pickup_type TEXT,
    dropoff_type TEXT,
    round_trip INTEGER DEFAULT 0,
    mileage REAL,
    hcpcs_code TEXT,
    modifier TEXT,
    icd10_code TEXT,
    prior_auth TEXT,
    FOREIGN KEY(client_id) REFERENCES clients(client_id),
    FOREIGN KEY(driver_id) REFERENCES drivers(driver_id),
    FOREIGN KEY(vehicle_id) REFERENCES vehicles(vehicle_id)
)
"#;

pub const INTAKE_CLIENTS: &str = r#"
CREATE TABLE IF NOT EXISTS clients (
    client_id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT,
    last_name TEXT,
    dob TEXT,
    gender TEXT,
    phone TEXT,
    email TEXT,
    address_line1 TEXT,
    city TEXT,
    state TEXT,
    zip TEXT,
    insurance_carrier TEXT,
    policy_number TEXT,
    group_number TEXT,
    photo_id_path TEXT,
    insurance_front_path TEXT,
    insurance_back_path TEXT
)
"#;

pub const INTAKE_DROPOFFS: &str = r#"
CREATE TABLE IF NOT EXISTS dropoffs (
    dropoff_id INTEGER PRIMARY KEY AUTOINCREMENT,
    client_id INTEGER REFERENCES clients(client_id),
    address TEXT NOT NULL
)
"#;

/// Statements creating every table of `variant`, parents before children.
pub fn statements(variant: Variant) -> &'static [&'static str] {
    match variant {
        Variant::Fleet => &[FLEET_CLIENTS, FLEET_DRIVERS, FLEET_VEHICLES, FLEET_TRIPS],
        Variant::Intake => &[INTAKE_CLIENTS, INTAKE_DROPOFFS],
    }
}

/// Columns of the `clients` table each variant reads and writes.
///
/// Both variants name their client table `clients`, so these columns are what
/// tells a store created by one variant apart from the other.
pub fn client_columns(variant: Variant) -> &'static [&'static str] {
    match variant {
        Variant::Fleet => &[
            "client_id",
            "first_name",
            "last_name",
            "dob",
            "gender",
            "ssn",
            "address_line1",
            "city",
            "state",
            "zip",
            "phone",
            "email",
            "insurance_carrier",
            "policy_number",
            "group_number",
            "signature",
        ],
        Variant::Intake => &[
            "client_id",
            "first_name",
            "last_name",
            "dob",
            "gender",
            "phone",
            "email",
            "address_line1",
            "city",
            "state",
            "zip",
            "insurance_carrier",
            "policy_number",
            "group_number",
            "photo_id_path",
            "insurance_front_path",
            "insurance_back_path",
        ],
    }
}
