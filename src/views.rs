//! Server-rendered HTML pages.
//!
//! Every interpolated value goes through [`escape`].

use std::fmt::Write;

use crate::config::Variant;
use crate::models::*;

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn opt(value: &Option<String>) -> String {
    escape(value.as_deref().unwrap_or(""))
}

fn raw(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn layout(variant: Variant, title: &str, body: &str) -> String {
    let nav = match variant {
        Variant::Fleet => {
            r#"<a href="/">Home</a> | <a href="/clients">Clients</a> | <a href="/drivers">Drivers</a> | <a href="/vehicles">Vehicles</a> | <a href="/trips">Trips</a>"#
        }
        Variant::Intake => r#"<a href="/">Home</a> | <a href="/clients">Clients</a>"#,
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - NEMT Records</title>
    <style>
        body {{ font-family: sans-serif; margin: 2rem; }}
        table {{ border-collapse: collapse; }}
        th, td {{ border: 1px solid #ccc; padding: 0.3rem 0.6rem; text-align: left; }}
        label {{ display: block; margin-top: 0.5rem; }}
    </style>
</head>
<body>
    <nav>{nav}</nav>
    <h1>{title}</h1>
{body}
</body>
</html>
"#,
        title = escape(title),
        nav = nav,
        body = body,
    )
}

fn table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut html = String::from("<table>\n<thead><tr>");
    for header in headers {
        let _ = write!(html, "<th>{}</th>", escape(header));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            let _ = write!(html, "<td>{}</td>", cell);
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

fn input(name: &str, label: &str, value: &str, required: bool) -> String {
    format!(
        r#"<label>{label}{star} <input type="text" name="{name}" value="{value}"{req}></label>"#,
        label = escape(label),
        star = if required { " *" } else { "" },
        name = name,
        value = escape(value),
        req = if required { " required" } else { "" },
    )
}

fn select(name: &str, label: &str, options: &[SelectOption]) -> String {
    let mut html = format!(
        r#"<label>{} <select name="{}" required>"#,
        escape(label),
        name
    );
    for option in options {
        let _ = write!(
            html,
            r#"<option value="{}">{}</option>"#,
            option.id,
            opt(&option.name)
        );
    }
    html.push_str("</select></label>");
    html
}

fn form(action: &str, multipart: bool, fields: &[String]) -> String {
    let enctype = if multipart {
        r#" enctype="multipart/form-data""#
    } else {
        ""
    };
    format!(
        "<form method=\"post\" action=\"{}\"{}>\n{}\n<p><button type=\"submit\">Save</button></p>\n</form>\n",
        action,
        enctype,
        fields.join("\n")
    )
}

fn new_link(href: &str, label: &str) -> String {
    format!(r#"<p><a href="{}">{}</a></p>"#, href, escape(label))
}

// ============ Shared ============

pub fn index(variant: Variant) -> String {
    let body = match variant {
        Variant::Fleet => {
            "<ul>\n<li><a href=\"/clients\">Clients</a></li>\n<li><a href=\"/drivers\">Drivers</a></li>\n<li><a href=\"/vehicles\">Vehicles</a></li>\n<li><a href=\"/trips\">Trips</a></li>\n</ul>"
        }
        Variant::Intake => {
            "<ul>\n<li><a href=\"/clients\">Clients</a></li>\n<li><a href=\"/clients/new\">New client</a></li>\n</ul>"
        }
    };
    layout(variant, "NEMT Management", body)
}

// ============ Fleet ============

pub fn clients_page(clients: &[Client]) -> String {
    let rows = clients
        .iter()
        .map(|c| {
            vec![
                c.client_id.to_string(),
                format!("{} {}", escape(&c.first_name), escape(&c.last_name)),
                opt(&c.dob),
                opt(&c.phone),
                opt(&c.insurance_carrier),
                opt(&c.policy_number),
            ]
        })
        .collect();
    let body = format!(
        "{}{}",
        new_link("/clients/new", "New client"),
        table(
            &["ID", "Name", "DOB", "Phone", "Insurance", "Policy #"],
            rows
        )
    );
    layout(Variant::Fleet, "Clients", &body)
}

pub fn client_form() -> String {
    let fields = vec![
        input("first_name", "First name", "", true),
        input("last_name", "Last name", "", true),
        input("dob", "Date of birth", "", false),
        input("gender", "Gender", "", false),
        input("ssn", "SSN", "", false),
        input("address_line1", "Address", "", false),
        input("city", "City", "", false),
        input("state", "State", "", false),
        input("zip", "ZIP", "", false),
        input("phone", "Phone", "", false),
        input("email", "Email", "", false),
        input("insurance_carrier", "Insurance carrier", "", false),
        input("policy_number", "Policy number", "", false),
        input("group_number", "Group number", "", false),
        input("signature", "Signature", "", false),
    ];
    layout(Variant::Fleet, "New client", &form("/clients", false, &fields))
}

pub fn drivers_page(drivers: &[Driver]) -> String {
    let rows = drivers
        .iter()
        .map(|d| {
            vec![
                d.driver_id.to_string(),
                format!("{} {}", escape(&d.first_name), escape(&d.last_name)),
                opt(&d.license_number),
                opt(&d.license_expiration),
                opt(&d.phone),
                d.assigned_vehicle_id
                    .map(|id| id.to_string())
                    .unwrap_or_default(),
                opt(&d.cpr_cert_expiration),
            ]
        })
        .collect();
    let body = format!(
        "{}{}",
        new_link("/drivers/new", "New driver"),
        table(
            &[
                "ID",
                "Name",
                "License #",
                "License exp.",
                "Phone",
                "Vehicle",
                "CPR exp."
            ],
            rows
        )
    );
    layout(Variant::Fleet, "Drivers", &body)
}

pub fn driver_form() -> String {
    let fields = vec![
        input("first_name", "First name", "", true),
        input("last_name", "Last name", "", true),
        input("license_number", "License number", "", false),
        input("license_expiration", "License expiration", "", false),
        input("employee_number", "Employee number", "", false),
        input("phone", "Phone", "", false),
        input("assigned_vehicle_id", "Assigned vehicle ID", "", false),
        input("cpr_cert_expiration", "CPR cert expiration", "", false),
        input("first_aid_cert_expiration", "First aid cert expiration", "", false),
        input("defensive_cert_expiration", "Defensive driving cert expiration", "", false),
    ];
    layout(Variant::Fleet, "New driver", &form("/drivers", false, &fields))
}

pub fn vehicles_page(vehicles: &[Vehicle]) -> String {
    let rows = vehicles
        .iter()
        .map(|v| {
            vec![
                v.vehicle_id.to_string(),
                opt(&v.make),
                opt(&v.model),
                opt(&v.year),
                opt(&v.license_plate),
                opt(&v.vin_number),
                opt(&v.registration_expiration),
            ]
        })
        .collect();
    let body = format!(
        "{}{}",
        new_link("/vehicles/new", "New vehicle"),
        table(
            &["ID", "Make", "Model", "Year", "Plate", "VIN", "Registration exp."],
            rows
        )
    );
    layout(Variant::Fleet, "Vehicles", &body)
}

pub fn vehicle_form() -> String {
    let fields = vec![
        input("make", "Make", "", false),
        input("model", "Model", "", false),
        input("license_plate", "License plate", "", false),
        input("year", "Year", "", false),
        input("vin_number", "VIN", "", false),
        input("insurance_expiration", "Insurance expiration", "", false),
        input("registration_expiration", "Registration expiration", "", false),
    ];
    layout(Variant::Fleet, "New vehicle", &form("/vehicles", false, &fields))
}

pub fn trips_page(trips: &[TripListing]) -> String {
    let rows = trips
        .iter()
        .map(|t| {
            vec![
                t.trip.trip_id.to_string(),
                opt(&t.trip.trip_date),
                opt(&t.client_name),
                opt(&t.driver_name),
                opt(&t.vehicle_plate),
                opt(&t.trip.pickup_address),
                opt(&t.trip.destination_address),
                if t.trip.round_trip == Some(1) { "Yes" } else { "No" }.to_string(),
                t.trip.mileage.map(|m| m.to_string()).unwrap_or_default(),
                opt(&t.trip.hcpcs_code),
            ]
        })
        .collect();
    let body = format!(
        "{}{}{}",
        new_link("/trips/new", "New trip"),
        new_link("/trips/export", "Export trip log"),
        table(
            &[
                "ID",
                "Date",
                "Client",
                "Driver",
                "Vehicle",
                "Pickup",
                "Destination",
                "Round trip",
                "Mileage",
                "HCPCS"
            ],
            rows
        )
    );
    layout(Variant::Fleet, "Trips", &body)
}

pub fn trip_form(
    clients: &[SelectOption],
    drivers: &[SelectOption],
    vehicles: &[SelectOption],
) -> String {
    let fields = vec![
        select("client_id", "Client", clients),
        select("driver_id", "Driver", drivers),
        select("vehicle_id", "Vehicle", vehicles),
        input("trip_date", "Trip date", "", false),
        input("pickup_time", "Pickup time", "", false),
        input("dropoff_time", "Drop-off time", "", false),
        input("pickup_address", "Pickup address", "", false),
        input("pickup_zip", "Pickup ZIP", "", false),
        input("destination_address", "Destination address", "", false),
        input("destination_zip", "Destination ZIP", "", false),
        input("trip_reason", "Trip reason", "", false),
        input("pickup_type", "Pickup type", "", false),
        input("dropoff_type", "Drop-off type", "", false),
        r#"<label>Round trip <input type="checkbox" name="round_trip" value="1"></label>"#
            .to_string(),
        input("mileage", "Mileage", "", false),
        input("hcpcs_code", "HCPCS code", "", false),
        input("modifier", "Modifier", "", false),
        input("icd10_code", "ICD-10 code", "", false),
        input("prior_auth", "Prior authorization", "", false),
    ];
    layout(Variant::Fleet, "New trip", &form("/trips", false, &fields))
}

// ============ Intake ============

fn document_link(path: &Option<String>, label: &str) -> String {
    match path.as_deref() {
        Some(p) if !p.is_empty() => {
            format!(r#"<a href="{}">{}</a>"#, escape(p), escape(label))
        }
        _ => String::new(),
    }
}

pub fn intake_clients_page(clients: &[IntakeClient]) -> String {
    let rows = clients
        .iter()
        .map(|c| {
            vec![
                format!(r#"<a href="/clients/{0}">{0}</a>"#, c.client_id),
                format!("{} {}", opt(&c.first_name), opt(&c.last_name)),
                opt(&c.phone),
                opt(&c.insurance_carrier),
                [
                    document_link(&c.photo_id_path, "Photo ID"),
                    document_link(&c.insurance_front_path, "Card front"),
                    document_link(&c.insurance_back_path, "Card back"),
                ]
                .iter()
                .filter(|l| !l.is_empty())
                .cloned()
                .collect::<Vec<_>>()
                .join(" "),
            ]
        })
        .collect();
    let body = format!(
        "{}{}",
        new_link("/clients/new", "New client"),
        table(&["ID", "Name", "Phone", "Insurance", "Documents"], rows)
    );
    layout(Variant::Intake, "Clients", &body)
}

/// Client form, pre-filled when `client` is present. An absent client and no
/// drop-offs render the blank "new client" form.
pub fn intake_client_form(client: Option<&IntakeClient>, dropoffs: &[DropOff]) -> String {
    let empty = IntakeClient::default();
    let c = client.unwrap_or(&empty);
    let title = match client {
        Some(c) => format!("Client {}", c.client_id),
        None => "New client".to_string(),
    };

    let mut fields = vec![
        input("first_name", "First name", raw(&c.first_name), true),
        input("last_name", "Last name", raw(&c.last_name), true),
        input("dob", "Date of birth", raw(&c.dob), false),
        input("gender", "Gender", raw(&c.gender), false),
        input("phone", "Phone", raw(&c.phone), false),
        input("email", "Email", raw(&c.email), false),
        input("address_line1", "Address", raw(&c.address_line1), false),
        input("city", "City", raw(&c.city), false),
        input("state", "State", raw(&c.state), false),
        input("zip", "ZIP", raw(&c.zip), false),
        input("insurance_carrier", "Insurance carrier", raw(&c.insurance_carrier), false),
        input("policy_number", "Policy number", raw(&c.policy_number), false),
        input("group_number", "Group number", raw(&c.group_number), false),
    ];
    for (name, label, path) in [
        ("photo_id", "Photo ID", &c.photo_id_path),
        ("insurance_front", "Insurance card (front)", &c.insurance_front_path),
        ("insurance_back", "Insurance card (back)", &c.insurance_back_path),
    ] {
        fields.push(format!(
            r#"<label>{} <input type="file" name="{}"> {}</label>"#,
            escape(label),
            name,
            document_link(path, "current")
        ));
    }

    let mut dropoff_html = String::from("<fieldset id=\"dropoffs\"><legend>Drop-off addresses</legend>\n");
    let slots = dropoffs.len().max(1);
    for i in 0..slots {
        let value = dropoffs.get(i).map(|d| d.address.as_str()).unwrap_or("");
        let _ = writeln!(
            dropoff_html,
            r#"<input type="text" name="{}{}" value="{}">"#,
            crate::intake_handler::DROPOFF_FIELD_PREFIX,
            i,
            escape(value)
        );
    }
    dropoff_html.push_str("</fieldset>\n");
    let _ = write!(
        dropoff_html,
        r#"<button type="button" onclick="var f=document.getElementById('dropoffs');var i=document.createElement('input');i.type='text';i.name='{}'+f.querySelectorAll('input').length;f.appendChild(i);">Add drop-off</button>"#,
        crate::intake_handler::DROPOFF_FIELD_PREFIX
    );
    fields.push(dropoff_html);

    layout(Variant::Intake, &title, &form("/clients", true, &fields))
}
