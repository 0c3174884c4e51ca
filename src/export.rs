//! Client trip log export as CSV.

use chrono::NaiveDate;

use crate::errors::AppError;
use crate::models::TripLogRow;

/// Column titles of the trip log, in file order.
pub const TRIP_LOG_HEADER: [&str; 20] = [
    "Full Name",
    "Date of Birth",
    "Medi-Cal ID",
    "Phone Number",
    "Email",
    "Residential Address",
    "Mobility Type",
    "Insurance Type",
    "Authorization Number",
    "Trip Date",
    "Pick-up Time",
    "Drop-off Time",
    "Pick-up Address",
    "Drop-off Address",
    "Purpose of Visit",
    "Round Trip?",
    "Driver Name",
    "Vehicle Used",
    "Mileage",
    "Signature on File",
];

/// Download name for a log produced on `date`.
pub fn trip_log_filename(date: NaiveDate) -> String {
    format!("Client_Trip_Log_{}.csv", date.format("%Y-%m-%d"))
}

/// Writes the header and one record per row.
pub fn trip_log_csv(rows: &[TripLogRow]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(TRIP_LOG_HEADER)?;
    for row in rows {
        writer.write_record(record(row))?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::ExportError(e.into_error().into()))
}

fn record(row: &TripLogRow) -> [String; 20] {
    let address = [&row.address_line1, &row.city, &row.state, &row.zip]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    let signed = row
        .signature
        .as_deref()
        .is_some_and(|s| !s.trim().is_empty());

    [
        format!("{} {}", row.first_name, row.last_name).trim().to_string(),
        text(&row.dob),
        text(&row.ssn),
        text(&row.phone),
        text(&row.email),
        address,
        text(&row.pickup_type),
        text(&row.insurance_carrier),
        text(&row.prior_auth),
        text(&row.trip_date),
        text(&row.pickup_time),
        text(&row.dropoff_time),
        text(&row.pickup_address),
        text(&row.destination_address),
        text(&row.trip_reason),
        yes_no(row.round_trip == Some(1)),
        text(&row.driver_name),
        text(&row.vehicle_plate),
        row.mileage.map(|m| m.to_string()).unwrap_or_default(),
        yes_no(signed),
    ]
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn yes_no(flag: bool) -> String {
    if flag { "Yes" } else { "No" }.to_string()
}
