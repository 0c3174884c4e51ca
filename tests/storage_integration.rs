use nemt_records::config::Variant;
use nemt_records::db::Database;
use nemt_records::db_storage::{FleetStore, IntakeStore};
use nemt_records::models::{NewIntakeClient, NewTrip, NewVehicle};

async fn fresh_db(dir: &tempfile::TempDir, variant: Variant) -> anyhow::Result<Database> {
    let db = Database::from_path(dir.path().join("nemt.db"), false);
    db.init_schema(variant).await?;
    Ok(db)
}

fn trip(client_id: i64, driver_id: i64, vehicle_id: i64) -> NewTrip {
    NewTrip {
        client_id,
        driver_id,
        vehicle_id,
        trip_date: "2026-10-19".to_string(),
        pickup_time: "08:00".to_string(),
        dropoff_time: String::new(),
        pickup_address: "1 Home St".to_string(),
        pickup_zip: String::new(),
        destination_address: "2 Clinic Ave".to_string(),
        destination_zip: String::new(),
        trip_reason: "Dialysis".to_string(),
        pickup_type: "Ambulatory".to_string(),
        dropoff_type: String::new(),
        round_trip: 1,
        mileage: 8.75,
        hcpcs_code: "A0100".to_string(),
        modifier: String::new(),
        icd10_code: String::new(),
        prior_auth: String::new(),
    }
}

/// Ids are handed out sequentially by the store.
#[tokio::test]
async fn ids_are_sequential() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let db = fresh_db(&dir, Variant::Fleet).await?;

    let mut store = FleetStore::open(&db).await?;
    let first = store.create_vehicle(&NewVehicle::default()).await?;
    let second = store.create_vehicle(&NewVehicle::default()).await?;
    let trip_id = store.create_trip(&trip(first, 1, second)).await?;
    store.close().await?;

    assert_eq!((first, second), (1, 2));
    assert_eq!(trip_id, 1);
    Ok(())
}

/// Every create is visible to the next connection.
#[tokio::test]
async fn writes_survive_connection_close() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let db = fresh_db(&dir, Variant::Fleet).await?;

    for _ in 0..3 {
        let mut store = FleetStore::open(&db).await?;
        store.create_trip(&trip(1, 1, 1)).await?;
        store.close().await?;
    }

    let mut store = FleetStore::open(&db).await?;
    let trips = store.list_trips().await?;
    store.close().await?;

    assert_eq!(trips.len(), 3);
    assert_eq!(trips[2].trip.trip_id, 3);
    assert_eq!(trips[0].trip.mileage, Some(8.75));
    assert_eq!(trips[0].trip.trip_reason.as_deref(), Some("Dialysis"));
    Ok(())
}

#[tokio::test]
async fn intake_client_and_dropoffs_commit_together() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let db = fresh_db(&dir, Variant::Intake).await?;

    let client = NewIntakeClient {
        first_name: Some("Jane".to_string()),
        photo_id_path: "/static/uploads/photo_id.png".to_string(),
        ..Default::default()
    };
    let addresses = vec!["A St".to_string(), "B St".to_string()];

    let mut store = IntakeStore::open(&db).await?;
    let client_id = store.create_client(&client, &addresses).await?;
    let stored = store.get_client(client_id).await?.expect("client row");
    let dropoffs = store.list_dropoffs(client_id).await?;
    let missing = store.get_client(client_id + 1).await?;
    store.close().await?;

    assert_eq!(stored.first_name.as_deref(), Some("Jane"));
    assert_eq!(stored.last_name, None);
    assert_eq!(
        stored.photo_id_path.as_deref(),
        Some("/static/uploads/photo_id.png")
    );
    assert_eq!(stored.insurance_back_path.as_deref(), Some(""));
    assert_eq!(dropoffs.len(), 2);
    assert_eq!(dropoffs[1].address, "B St");
    assert!(missing.is_none());
    Ok(())
}

/// Reopening the store and rerunning schema setup keeps intake rows.
#[tokio::test]
async fn schema_init_on_restart_keeps_rows() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let db = fresh_db(&dir, Variant::Intake).await?;

    let mut store = IntakeStore::open(&db).await?;
    store
        .create_client(&NewIntakeClient::default(), &["C St".to_string()])
        .await?;
    store.close().await?;

    let db = fresh_db(&dir, Variant::Intake).await?;
    let mut store = IntakeStore::open(&db).await?;
    assert_eq!(store.list_clients().await?.len(), 1);
    assert_eq!(store.list_dropoffs(1).await?.len(), 1);
    store.close().await?;
    Ok(())
}

/// A fleet store cannot be reopened as an intake store, and it stays usable
/// for the fleet variant afterwards.
#[tokio::test]
async fn switching_variant_on_existing_store_fails_at_startup() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let db = fresh_db(&dir, Variant::Fleet).await?;

    let err = db
        .init_schema(Variant::Intake)
        .await
        .expect_err("intake init on a fleet store");
    let message = err.to_string();
    assert!(message.contains("intake variant"), "{}", message);
    assert!(message.contains("photo_id_path"), "{}", message);

    let db = fresh_db(&dir, Variant::Fleet).await?;
    let mut store = FleetStore::open(&db).await?;
    store.create_vehicle(&NewVehicle::default()).await?;
    assert_eq!(store.list_vehicles().await?.len(), 1);
    store.close().await?;
    Ok(())
}
