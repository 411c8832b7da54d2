//! Shared test utilities for boxprint.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test orders with sensible defaults.

use crate::{
    core::order::{self, NewOrder},
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A valid checkout payload.
///
/// # Defaults
/// * `customer_email`: `"buyer@example.com"`
/// * `file_name`: `"bracket.stl"`
/// * `material`: `"pla"`, `quality`: `"standard"`
/// * `total_price`: 199.0
#[must_use]
pub fn test_new_order() -> NewOrder {
    NewOrder {
        customer_name: Some("Test Buyer".to_string()),
        customer_email: Some("buyer@example.com".to_string()),
        file_name: Some("bracket.stl".to_string()),
        file_type: Some("stl".to_string()),
        material: Some("pla".to_string()),
        color: Some("black".to_string()),
        quality: Some("standard".to_string()),
        infill: Some(20.0),
        scale: Some(1.0),
        quantity: Some(1),
        total_price: Some(199.0),
        ..Default::default()
    }
}

/// Creates a pending test order from [`test_new_order`].
pub async fn create_test_order(db: &DatabaseConnection) -> Result<entities::print_order::Model> {
    order::create_order(db, test_new_order()).await
}

/// Sets up a complete test environment with one order.
/// Returns (db, order) for common test scenarios.
pub async fn setup_with_order() -> Result<(DatabaseConnection, entities::print_order::Model)> {
    let db = setup_test_db().await?;
    let order = create_test_order(&db).await?;
    Ok((db, order))
}

/// Sets up a test environment with an admin and one order.
/// Returns (db, order) where `admin_id` already holds the `admin` role.
pub async fn setup_with_admin(
    admin_id: &str,
) -> Result<(DatabaseConnection, entities::print_order::Model)> {
    let (db, order) = setup_with_order().await?;
    crate::core::auth::grant_admin(&db, admin_id, crate::core::auth::ROLE_ADMIN).await?;
    Ok((db, order))
}
