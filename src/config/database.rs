//! Database configuration module for BoxPrint.
//!
//! This module handles the database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs without hand-written SQL.

use crate::entities::{AdminRole, PrintOrder, StatusHistory};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Database used when `DATABASE_URL` is not set
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/boxprint.sqlite?mode=rwc";

/// Gets the database URL from the environment or returns the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Creates the parent directory of a file-backed `SQLite` database first.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();

    let sqlite_dir = database_url
        .strip_prefix("sqlite://")
        .map(|rest| rest.split('?').next().unwrap_or(rest))
        .and_then(|path| std::path::Path::new(path).parent())
        .filter(|parent| !parent.as_os_str().is_empty());
    if let Some(parent) = sqlite_dir {
        std::fs::create_dir_all(parent)?;
    }

    tracing::debug!("Connecting to database at {database_url}");
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates every table that does not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut print_order_table = schema.create_table_from_entity(PrintOrder);
    let mut history_table = schema.create_table_from_entity(StatusHistory);
    let mut admin_role_table = schema.create_table_from_entity(AdminRole);

    print_order_table.if_not_exists();
    history_table.if_not_exists();
    admin_role_table.if_not_exists();

    db.execute(builder.build(&print_order_table)).await?;
    db.execute(builder.build(&history_table)).await?;
    db.execute(builder.build(&admin_role_table)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{AdminRoleModel, PrintOrderModel, StatusHistoryModel};
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<PrintOrderModel> = PrintOrder::find().limit(1).all(&db).await?;
        let _: Vec<StatusHistoryModel> = StatusHistory::find().limit(1).all(&db).await?;
        let _: Vec<AdminRoleModel> = AdminRole::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
