use crate::db::Database;
use crate::errors::{AppError, ResultExt};
use crate::models::*;
use sqlx::sqlite::SqliteConnection;
use sqlx::Connection;

/// Per-request handle on the fleet tables.
///
/// Owns one connection for the lifetime of a request. Call [`FleetStore::close`]
/// when done; dropping the store on an error path closes the connection too.
pub struct FleetStore {
    conn: SqliteConnection,
}

impl FleetStore {
    pub async fn open(db: &Database) -> Result<Self, AppError> {
        let conn = db.connect().await.context("opening store connection")?;
        Ok(Self { conn })
    }

    pub async fn close(self) -> Result<(), AppError> {
        self.conn.close().await.context("closing store connection")
    }

    // ---- Clients ----

    pub async fn list_clients(&mut self) -> Result<Vec<Client>, AppError> {
        sqlx::query_as::<_, Client>("SELECT * FROM clients")
            .fetch_all(&mut self.conn)
            .await
            .context("listing clients")
    }

    pub async fn create_client(&mut self, client: &NewClient) -> Result<i64, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO clients
            (first_name, last_name, dob, gender, ssn, address_line1, city, state, zip,
             phone, email, insurance_carrier, policy_number, group_number, signature)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&client.first_name)
        .bind(&client.last_name)
        .bind(&client.dob)
        .bind(&client.gender)
        .bind(&client.ssn)
        .bind(&client.address_line1)
        .bind(&client.city)
        .bind(&client.state)
        .bind(&client.zip)
        .bind(&client.phone)
        .bind(&client.email)
        .bind(&client.insurance_carrier)
        .bind(&client.policy_number)
        .bind(&client.group_number)
        .bind(&client.signature)
        .execute(&mut self.conn)
        .await
        .context("inserting client")?;

        Ok(result.last_insert_rowid())
    }

    // ---- Drivers ----

    pub async fn list_drivers(&mut self) -> Result<Vec<Driver>, AppError> {
        sqlx::query_as::<_, Driver>("SELECT * FROM drivers")
            .fetch_all(&mut self.conn)
            .await
            .context("listing drivers")
    }

    pub async fn create_driver(&mut self, driver: &NewDriver) -> Result<i64, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO drivers
            (first_name, last_name, license_number, license_expiration, employee_number, phone,
             assigned_vehicle_id, cpr_cert_expiration, first_aid_cert_expiration,
             defensive_cert_expiration)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&driver.first_name)
        .bind(&driver.last_name)
        .bind(&driver.license_number)
        .bind(&driver.license_expiration)
        .bind(&driver.employee_number)
        .bind(&driver.phone)
        .bind(driver.assigned_vehicle_id)
        .bind(&driver.cpr_cert_expiration)
        .bind(&driver.first_aid_cert_expiration)
        .bind(&driver.defensive_cert_expiration)
        .execute(&mut self.conn)
        .await
        .context("inserting driver")?;

        Ok(result.last_insert_rowid())
    }

    // ---- Vehicles ----

    pub async fn list_vehicles(&mut self) -> Result<Vec<Vehicle>, AppError> {
        sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles")
            .fetch_all(&mut self.conn)
            .await
            .context("listing vehicles")
    }

    pub async fn create_vehicle(&mut self, vehicle: &NewVehicle) -> Result<i64, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO vehicles
            (make, model, license_plate, year, vin_number, insurance_expiration,
             registration_expiration)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&vehicle.make)
        .bind(&vehicle.model)
        .bind(&vehicle.license_plate)
        .bind(&vehicle.year)
        .bind(&vehicle.vin_number)
        .bind(&vehicle.insurance_expiration)
        .bind(&vehicle.registration_expiration)
        .execute(&mut self.conn)
        .await
        .context("inserting vehicle")?;

        Ok(result.last_insert_rowid())
    }

    // ---- Trips ----

    /// Every trip with the current names of its client and driver and the
    /// plate of its vehicle.
    pub async fn list_trips(&mut self) -> Result<Vec<TripListing>, AppError> {
        sqlx::query_as::<_, TripListing>(
            r#"
            SELECT t.*,
                   c.first_name || ' ' || c.last_name AS client_name,
                   d.first_name || ' ' || d.last_name AS driver_name,
                   v.license_plate AS vehicle_plate
            FROM trips t
            LEFT JOIN clients c ON t.client_id = c.client_id
            LEFT JOIN drivers d ON t.driver_id = d.driver_id
            LEFT JOIN vehicles v ON t.vehicle_id = v.vehicle_id
            "#,
        )
        .fetch_all(&mut self.conn)
        .await
        .context("listing trips")
    }

    /// Trips joined with their client for the trip log, oldest first.
    ///
    /// Trips whose client no longer exists are left out.
    pub async fn trip_log(&mut self) -> Result<Vec<TripLogRow>, AppError> {
        sqlx::query_as::<_, TripLogRow>(
            r#"
            SELECT c.first_name, c.last_name, c.dob, c.ssn, c.phone, c.email,
                   c.address_line1, c.city, c.state, c.zip, c.insurance_carrier, c.signature,
                   t.trip_date, t.pickup_time, t.dropoff_time, t.pickup_address,
                   t.destination_address, t.trip_reason, t.pickup_type, t.round_trip,
                   t.mileage, t.prior_auth,
                   d.first_name || ' ' || d.last_name AS driver_name,
                   v.license_plate AS vehicle_plate
            FROM trips t
            JOIN clients c ON t.client_id = c.client_id
            LEFT JOIN drivers d ON t.driver_id = d.driver_id
            LEFT JOIN vehicles v ON t.vehicle_id = v.vehicle_id
            ORDER BY t.trip_id
            "#,
        )
        .fetch_all(&mut self.conn)
        .await
        .context("reading trip log")
    }

    /// Inserts a trip as submitted. Referenced ids are not looked up first.
    pub async fn create_trip(&mut self, trip: &NewTrip) -> Result<i64, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO trips
            (client_id, driver_id, vehicle_id, trip_date, pickup_time, dropoff_time,
             pickup_address, pickup_zip, destination_address, destination_zip, trip_reason,
             pickup_type, dropoff_type, round_trip, mileage, hcpcs_code, modifier, icd10_code,
             prior_auth)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(trip.client_id)
        .bind(trip.driver_id)
        .bind(trip.vehicle_id)
        .bind(&trip.trip_date)
        .bind(&trip.pickup_time)
        .bind(&trip.dropoff_time)
        .bind(&trip.pickup_address)
        .bind(&trip.pickup_zip)
        .bind(&trip.destination_address)
        .bind(&trip.destination_zip)
        .bind(&trip.trip_reason)
        .bind(&trip.pickup_type)
        .bind(&trip.dropoff_type)
        .bind(trip.round_trip)
        .bind(trip.mileage)
        .bind(&trip.hcpcs_code)
        .bind(&trip.modifier)
        .bind(&trip.icd10_code)
        .bind(&trip.prior_auth)
        .execute(&mut self.conn)
        .await
        .context("inserting trip")?;

        Ok(result.last_insert_rowid())
    }

    // ---- Trip form options ----

    pub async fn client_options(&mut self) -> Result<Vec<SelectOption>, AppError> {
        sqlx::query_as::<_, SelectOption>(
            "SELECT client_id AS id, first_name || ' ' || last_name AS name FROM clients",
        )
        .fetch_all(&mut self.conn)
        .await
        .context("listing client options")
    }

    pub async fn driver_options(&mut self) -> Result<Vec<SelectOption>, AppError> {
        sqlx::query_as::<_, SelectOption>(
            "SELECT driver_id AS id, first_name || ' ' || last_name AS name FROM drivers",
        )
        .fetch_all(&mut self.conn)
        .await
        .context("listing driver options")
    }

    pub async fn vehicle_options(&mut self) -> Result<Vec<SelectOption>, AppError> {
        sqlx::query_as::<_, SelectOption>(
            "SELECT vehicle_id AS id, license_plate AS name FROM vehicles",
        )
        .fetch_all(&mut self.conn)
        .await
        .context("listing vehicle options")
    }
}

/// Per-request handle on the intake tables.
pub struct IntakeStore {
    conn: SqliteConnection,
}

impl IntakeStore {
    pub async fn open(db: &Database) -> Result<Self, AppError> {
        let conn = db.connect().await.context("opening store connection")?;
        Ok(Self { conn })
    }

    pub async fn close(self) -> Result<(), AppError> {
        self.conn.close().await.context("closing store connection")
    }

    pub async fn list_clients(&mut self) -> Result<Vec<IntakeClient>, AppError> {
        sqlx::query_as::<_, IntakeClient>("SELECT * FROM clients")
            .fetch_all(&mut self.conn)
            .await
            .context("listing clients")
    }

    pub async fn get_client(&mut self, client_id: i64) -> Result<Option<IntakeClient>, AppError> {
        sqlx::query_as::<_, IntakeClient>("SELECT * FROM clients WHERE client_id = ?")
            .bind(client_id)
            .fetch_optional(&mut self.conn)
            .await
            .with_context(|| format!("loading client {}", client_id))
    }

    pub async fn list_dropoffs(&mut self, client_id: i64) -> Result<Vec<DropOff>, AppError> {
        sqlx::query_as::<_, DropOff>(
            "SELECT * FROM dropoffs WHERE client_id = ? ORDER BY dropoff_id",
        )
        .bind(client_id)
        .fetch_all(&mut self.conn)
        .await
        .with_context(|| format!("listing drop-offs of client {}", client_id))
    }

    /// Inserts the client and one drop-off row per address in a single
    /// transaction, returning the new client id.
    pub async fn create_client(
        &mut self,
        client: &NewIntakeClient,
        dropoffs: &[String],
    ) -> Result<i64, AppError> {
        let mut tx = self.conn.begin().await.context("starting transaction")?;

        let result = sqlx::query(
            r#"
            INSERT INTO clients
            (first_name, last_name, dob, gender, phone, email, address_line1, city, state, zip,
             insurance_carrier, policy_number, group_number, photo_id_path,
             insurance_front_path, insurance_back_path)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&client.first_name)
        .bind(&client.last_name)
        .bind(&client.dob)
        .bind(&client.gender)
        .bind(&client.phone)
        .bind(&client.email)
        .bind(&client.address_line1)
        .bind(&client.city)
        .bind(&client.state)
        .bind(&client.zip)
        .bind(&client.insurance_carrier)
        .bind(&client.policy_number)
        .bind(&client.group_number)
        .bind(&client.photo_id_path)
        .bind(&client.insurance_front_path)
        .bind(&client.insurance_back_path)
        .execute(&mut *tx)
        .await
        .context("inserting client")?;

        let client_id = result.last_insert_rowid();

        for address in dropoffs {
            sqlx::query("INSERT INTO dropoffs (client_id, address) VALUES (?, ?)")
                .bind(client_id)
                .bind(address)
                .execute(&mut *tx)
                .await
                .context("inserting drop-off")?;
        }

        tx.commit().await.context("committing client")?;

        Ok(client_id)
    }
}
