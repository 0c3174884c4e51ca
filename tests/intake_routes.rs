/// HTTP tests for the intake deployment: multipart client creation with
/// document uploads and drop-off addresses.
mod common;

use axum::http::StatusCode;
use common::*;
use nemt_records::config::Variant;
use nemt_records::db_storage::IntakeStore;
use nemt_records::models::IntakeClient;

async fn intake_store(app: &TestApp) -> IntakeStore {
    IntakeStore::open(&app.state.db).await.unwrap()
}

async fn only_client(app: &TestApp) -> IntakeClient {
    let mut store = intake_store(app).await;
    let mut clients = store.list_clients().await.unwrap();
    store.close().await.unwrap();
    assert_eq!(clients.len(), 1);
    clients.remove(0)
}

#[tokio::test]
async fn intake_pages_render_when_empty() {
    let app = spawn_app(Variant::Intake).await;

    for uri in ["/", "/clients", "/clients/new"] {
        let response = app.get(uri).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {}", uri);
    }

    let response = app.get("/trips").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn client_without_files_or_dropoffs() {
    let app = spawn_app(Variant::Intake).await;

    let body = multipart_body(&[("first_name", "Jane"), ("last_name", "Doe")], &[]);
    let response = app.post_multipart("/clients", body).await;
    assert_redirect(&response, "/clients");

    let client = only_client(&app).await;
    assert_eq!(client.first_name.as_deref(), Some("Jane"));
    assert_eq!(client.last_name.as_deref(), Some("Doe"));
    assert_eq!(client.phone, None);
    assert_eq!(client.photo_id_path.as_deref(), Some(""));
    assert_eq!(client.insurance_front_path.as_deref(), Some(""));
    assert_eq!(client.insurance_back_path.as_deref(), Some(""));

    let mut store = intake_store(&app).await;
    assert!(store.list_dropoffs(client.client_id).await.unwrap().is_empty());
    store.close().await.unwrap();
}

#[tokio::test]
async fn names_are_not_required_by_the_store() {
    let app = spawn_app(Variant::Intake).await;

    let body = multipart_body(&[("phone", "555-0100")], &[]);
    let response = app.post_multipart("/clients", body).await;
    assert_redirect(&response, "/clients");

    let client = only_client(&app).await;
    assert_eq!(client.first_name, None);
    assert_eq!(client.last_name, None);
    assert_eq!(client.phone.as_deref(), Some("555-0100"));
}

#[tokio::test]
async fn empty_file_field_yields_empty_reference() {
    let app = spawn_app(Variant::Intake).await;

    let body = multipart_body(
        &[("first_name", "Jane"), ("last_name", "Doe")],
        &[("photo_id", "", &b""[..])],
    );
    let response = app.post_multipart("/clients", body).await;
    assert_redirect(&response, "/clients");

    let client = only_client(&app).await;
    assert_eq!(client.photo_id_path.as_deref(), Some(""));
}

#[tokio::test]
async fn uploaded_documents_are_served_back_unchanged() {
    let app = spawn_app(Variant::Intake).await;

    let photo: Vec<u8> = (0u8..=255).cycle().take(4096).collect();
    let front = b"%PDF-1.4 front of card".to_vec();
    let back = vec![0u8, 13, 10, 45, 45, 255];

    let body = multipart_body(
        &[("first_name", "Jane"), ("last_name", "Doe")],
        &[
            ("photo_id", "license.png", photo.as_slice()),
            ("insurance_front", "card.pdf", front.as_slice()),
            ("insurance_back", "back.bin", back.as_slice()),
        ],
    );
    let response = app.post_multipart("/clients", body).await;
    assert_redirect(&response, "/clients");

    let client = only_client(&app).await;
    assert_eq!(
        client.photo_id_path.as_deref(),
        Some("/static/uploads/photo_license.png")
    );
    assert_eq!(
        client.insurance_front_path.as_deref(),
        Some("/static/uploads/ins_front_card.pdf")
    );
    assert_eq!(
        client.insurance_back_path.as_deref(),
        Some("/static/uploads/ins_back_back.bin")
    );

    for (path, expected) in [
        (client.photo_id_path.unwrap(), photo),
        (client.insurance_front_path.unwrap(), front),
        (client.insurance_back_path.unwrap(), back),
    ] {
        let response = app.get(&path).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {}", path);
        assert_eq!(body_bytes(response).await, expected);
    }

    assert!(app
        .dir
        .path()
        .join("static/uploads/photo_license.png")
        .exists());
}

#[tokio::test]
async fn non_blank_dropoffs_become_child_rows() {
    let app = spawn_app(Variant::Intake).await;

    let body = multipart_body(
        &[
            ("first_name", "Jane"),
            ("last_name", "Doe"),
            ("dropoff_2", "300 Dialysis Way"),
            ("dropoff_0", "100 Clinic Rd"),
            ("dropoff_1", "   "),
            ("dropoff_3", "400 Pharmacy Ln"),
        ],
        &[],
    );
    let response = app.post_multipart("/clients", body).await;
    assert_redirect(&response, "/clients");

    let client = only_client(&app).await;
    let mut store = intake_store(&app).await;
    let dropoffs = store.list_dropoffs(client.client_id).await.unwrap();
    store.close().await.unwrap();

    let addresses: Vec<_> = dropoffs.iter().map(|d| d.address.as_str()).collect();
    assert_eq!(
        addresses,
        vec!["100 Clinic Rd", "300 Dialysis Way", "400 Pharmacy Ln"]
    );
    assert!(dropoffs
        .iter()
        .all(|d| d.client_id == Some(client.client_id)));
}

#[tokio::test]
async fn dropoffs_belong_to_their_own_client() {
    let app = spawn_app(Variant::Intake).await;

    let first = multipart_body(&[("first_name", "A"), ("dropoff_0", "Alpha St")], &[]);
    assert_redirect(&app.post_multipart("/clients", first).await, "/clients");
    let second = multipart_body(
        &[("first_name", "B"), ("dropoff_0", "Beta St"), ("dropoff_1", "Gamma St")],
        &[],
    );
    assert_redirect(&app.post_multipart("/clients", second).await, "/clients");

    let mut store = intake_store(&app).await;
    assert_eq!(store.list_dropoffs(1).await.unwrap().len(), 1);
    assert_eq!(store.list_dropoffs(2).await.unwrap().len(), 2);
    store.close().await.unwrap();
}

#[tokio::test]
async fn detail_view_combines_client_and_dropoffs() {
    let app = spawn_app(Variant::Intake).await;

    let body = multipart_body(
        &[
            ("first_name", "Rosa"),
            ("last_name", "Diaz"),
            ("insurance_carrier", "Medicaid"),
            ("dropoff_0", "12 Oak St"),
        ],
        &[],
    );
    assert_redirect(&app.post_multipart("/clients", body).await, "/clients");

    let response = app.get("/clients/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Client 1"));
    assert!(html.contains(r#"value="Rosa""#));
    assert!(html.contains(r#"value="Medicaid""#));
    assert!(html.contains(r#"value="12 Oak St""#));
}

#[tokio::test]
async fn unknown_client_renders_empty_form() {
    let app = spawn_app(Variant::Intake).await;

    let response = app.get("/clients/999").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("New client"));

    let response = app.get("/clients/not-a-number").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_multipart_submission_is_rejected() {
    let app = spawn_app(Variant::Intake).await;

    let response = app
        .post_form("/clients", "first_name=Jane&last_name=Doe")
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut store = intake_store(&app).await;
    assert!(store.list_clients().await.unwrap().is_empty());
    store.close().await.unwrap();
}

#[tokio::test]
async fn list_page_links_documents() {
    let app = spawn_app(Variant::Intake).await;

    let body = multipart_body(
        &[("first_name", "Jane"), ("last_name", "Doe")],
        &[("photo_id", "id.jpg", &b"jpeg"[..])],
    );
    assert_redirect(&app.post_multipart("/clients", body).await, "/clients");

    let html = body_text(app.get("/clients").await).await;
    assert!(html.contains(r#"href="/clients/1""#));
    assert!(html.contains(r#"href="/static/uploads/photo_id.jpg""#));
}
