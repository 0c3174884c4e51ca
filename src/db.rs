use std::path::Path;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};

use crate::config::Variant;
use crate::schema;

/// Handle to the SQLite store file.
///
/// Holds connection options only; every request opens its own connection with
/// [`Database::connect`] and closes it when done.
#[derive(Debug, Clone)]
pub struct Database {
    options: SqliteConnectOptions,
}

impl Database {
    pub fn new(database_url: &str, enforce_foreign_keys: bool) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(enforce_foreign_keys);

        Ok(Self { options })
    }

    pub fn from_path(path: impl AsRef<Path>, enforce_foreign_keys: bool) -> Self {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true)
            .foreign_keys(enforce_foreign_keys);

        Self { options }
    }

    pub fn path(&self) -> &Path {
        self.options.get_filename()
    }

    pub async fn connect(&self) -> Result<SqliteConnection, sqlx::Error> {
        self.options.connect().await
    }

    /// Creates the tables of `variant` if they are absent.
    ///
    /// Fails when the store already holds the `clients` table of the other
    /// variant.
    pub async fn init_schema(&self, variant: Variant) -> anyhow::Result<()> {
        if let Some(parent) = self.path().parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut conn = self.connect().await?;
        for statement in schema::statements(variant) {
            sqlx::query(statement).execute(&mut conn).await?;
        }

        let existing: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM pragma_table_info('clients')")
                .fetch_all(&mut conn)
                .await?;
        conn.close().await?;

        let missing: Vec<&str> = schema::client_columns(variant)
            .iter()
            .copied()
            .filter(|column| !existing.iter().any(|(name,)| name == column))
            .collect();
        if !missing.is_empty() {
            anyhow::bail!(
                "store {} was not created for the {} variant: clients table lacks columns {}",
                self.path().display(),
                variant.as_str(),
                missing.join(", ")
            );
        }

        tracing::info!(
            "Schema ready for {} variant at {}",
            variant.as_str(),
            self.path().display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn table_names(db: &Database) -> Vec<String> {
        let mut conn = db.connect().await.unwrap();
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&mut conn)
        .await
        .unwrap();
        rows.into_iter().map(|(name,)| name).collect()
    }

    #[tokio::test]
    async fn init_creates_fleet_tables_and_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::from_path(dir.path().join("nested/nemt.db"), false);

        db.init_schema(Variant::Fleet).await.unwrap();

        assert_eq!(
            table_names(&db).await,
            vec!["clients", "drivers", "trips", "vehicles"]
        );
    }

    #[tokio::test]
    async fn init_is_idempotent_and_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::from_path(dir.path().join("nemt.db"), false);
        db.init_schema(Variant::Intake).await.unwrap();

        let mut conn = db.connect().await.unwrap();
        sqlx::query("INSERT INTO dropoffs (client_id, address) VALUES (1, '12 Elm St')")
            .execute(&mut conn)
            .await
            .unwrap();
        conn.close().await.unwrap();

        db.init_schema(Variant::Intake).await.unwrap();

        let mut conn = db.connect().await.unwrap();
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM dropoffs")
            .fetch_one(&mut conn)
            .await
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(table_names(&db).await, vec!["clients", "dropoffs"]);
    }

    #[tokio::test]
    async fn init_rejects_store_of_other_variant() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::from_path(dir.path().join("nemt.db"), false);
        db.init_schema(Variant::Intake).await.unwrap();

        let err = db.init_schema(Variant::Fleet).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("fleet variant"), "{}", message);
        assert!(message.contains("ssn"), "{}", message);
    }

    #[test]
    fn url_parsing_keeps_filename() {
        let db = Database::new("sqlite://data/nemt.db", false).unwrap();
        assert!(db.path().ends_with("nemt.db"));
    }
}
