//! Utility to inspect the store schema and print table structures.

use dotenvy::dotenv;
use nemt_records::db::Database;
use sqlx::Connection;
use std::env;

/// Main entry point for the schema inspection utility.
///
/// Opens the store named by `DATABASE_URL` and lists every table with its
/// columns and declared types.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://nemt.db".to_string());
    let db = Database::new(&database_url, false)?;
    let mut conn = db.connect().await?;

    let tables: Vec<(String,)> = sqlx::query_as(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(&mut conn)
    .await?;

    println!("Tables in {}:", db.path().display());
    for (table,) in &tables {
        println!("- {}", table);

        let columns: Vec<(String, String)> =
            sqlx::query_as("SELECT name, type FROM pragma_table_info(?) ORDER BY cid")
                .bind(table)
                .fetch_all(&mut conn)
                .await?;

        for (col, type_) in columns {
            println!("  - {}: {}", col, type_);
        }
        println!();
    }

    conn.close().await?;
    Ok(())
}
