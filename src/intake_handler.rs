use crate::db_storage::IntakeStore;
use crate::errors::AppError;
use crate::handlers::AppState;
use crate::models::NewIntakeClient;
use crate::uploads::{save_upload, UploadedFile, PUBLIC_PREFIX};
use crate::views;
use axum::{
    extract::{
        multipart::MultipartRejection, rejection::PathRejection, Multipart, Path, State,
    },
    response::{Html, Redirect},
};
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Drop-off addresses arrive as `dropoff_0`, `dropoff_1`, ...
pub const DROPOFF_FIELD_PREFIX: &str = "dropoff_";

/// Multipart file fields and the label their stored names are prefixed with.
pub const DOCUMENT_FIELDS: [(&str, &str); 3] = [
    ("photo_id", "photo"),
    ("insurance_front", "ins_front"),
    ("insurance_back", "ins_back"),
];

fn dropoff_index(field_name: &str) -> Option<u64> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN.get_or_init(|| {
        Regex::new(&format!(r"^{}(\d+)$", DROPOFF_FIELD_PREFIX)).expect("valid drop-off pattern")
    });
    re.captures(field_name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn is_document_field(field_name: &str) -> bool {
    DOCUMENT_FIELDS.iter().any(|(name, _)| *name == field_name)
}

/// A decoded intake form: text fields, document files and drop-off values.
#[derive(Debug, Default)]
pub struct IntakeSubmission {
    pub fields: HashMap<String, String>,
    pub files: HashMap<String, UploadedFile>,
    /// `(index, value)` in arrival order.
    pub dropoffs: Vec<(u64, String)>,
}

impl IntakeSubmission {
    /// Reads every part of the request body.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut submission = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if is_document_field(&name) {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                submission.files.insert(
                    name,
                    UploadedFile {
                        filename,
                        bytes: bytes.to_vec(),
                    },
                );
                continue;
            }

            let value = field.text().await?;
            match dropoff_index(&name) {
                Some(index) => submission.dropoffs.push((index, value)),
                None => {
                    submission.fields.insert(name, value);
                }
            }
        }

        Ok(submission)
    }

    /// Non-blank drop-off addresses, trimmed, ordered by field index.
    pub fn dropoff_addresses(&self) -> Vec<String> {
        let mut indexed: Vec<&(u64, String)> = self.dropoffs.iter().collect();
        indexed.sort_by_key(|(index, _)| *index);
        indexed
            .into_iter()
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn text(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    /// Row values for the client; document paths come from the upload step.
    pub fn new_client(&self, document_paths: [String; 3]) -> NewIntakeClient {
        let [photo_id_path, insurance_front_path, insurance_back_path] = document_paths;
        NewIntakeClient {
            first_name: self.text("first_name"),
            last_name: self.text("last_name"),
            dob: self.text("dob"),
            gender: self.text("gender"),
            phone: self.text("phone"),
            email: self.text("email"),
            address_line1: self.text("address_line1"),
            city: self.text("city"),
            state: self.text("state"),
            zip: self.text("zip"),
            insurance_carrier: self.text("insurance_carrier"),
            policy_number: self.text("policy_number"),
            group_number: self.text("group_number"),
            photo_id_path,
            insurance_front_path,
            insurance_back_path,
        }
    }
}

/// GET /clients
pub async fn list_clients(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let mut store = IntakeStore::open(&state.db).await?;
    let clients = store.list_clients().await?;
    store.close().await?;

    tracing::debug!("Listing {} intake clients", clients.len());
    Ok(Html(views::intake_clients_page(&clients)))
}

/// GET /clients/new
pub async fn new_client() -> Html<String> {
    Html(views::intake_client_form(None, &[]))
}

/// GET /clients/:client_id
///
/// An unknown id renders the blank client form.
pub async fn client_detail(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Html<String>, AppError> {
    let Path(client_id) = path?;

    let mut store = IntakeStore::open(&state.db).await?;
    let client = store.get_client(client_id).await?;
    let dropoffs = store.list_dropoffs(client_id).await?;
    store.close().await?;

    if client.is_none() {
        tracing::debug!("Client {} not found, rendering empty form", client_id);
    }
    Ok(Html(views::intake_client_form(client.as_ref(), &dropoffs)))
}

/// POST /clients
///
/// Documents are written to the uploads directory before the client row and
/// its drop-offs are inserted together.
pub async fn create_client(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Redirect, AppError> {
    let submission = IntakeSubmission::from_multipart(multipart?).await?;

    let uploads_dir = state.config.uploads_dir();
    let mut document_paths: [String; 3] = Default::default();
    for (slot, (field, label)) in document_paths.iter_mut().zip(DOCUMENT_FIELDS) {
        *slot = save_upload(&uploads_dir, PUBLIC_PREFIX, label, submission.files.get(field)).await?;
    }

    let client = submission.new_client(document_paths);
    let dropoffs = submission.dropoff_addresses();

    let mut store = IntakeStore::open(&state.db).await?;
    let client_id = store.create_client(&client, &dropoffs).await?;
    store.close().await?;

    tracing::info!(
        "Created intake client {} with {} drop-off(s)",
        client_id,
        dropoffs.len()
    );
    Ok(Redirect::to("/clients"))
}
