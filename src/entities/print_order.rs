//! Print order entity - One customer purchase of a custom 3D print.
//!
//! Rows are created at checkout with `pending` status and payment status, then
//! mutated by admin actions. Orders are never deleted; cancellation is a status.
//! `status` and `payment_status` hold the snake_case names from `core::status`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Print order database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "print_orders")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable order number (e.g., `BP-20260314-4F9A2C`)
    #[sea_orm(unique)]
    pub order_number: String,
    /// Customer's name
    pub customer_name: Option<String>,
    /// Customer's email, required for every order
    pub customer_email: String,
    /// Customer's phone number
    pub customer_phone: Option<String>,
    /// Original name of the uploaded model
    pub file_name: String,
    /// MIME type or extension of the upload
    pub file_type: Option<String>,
    /// Upload size in bytes
    pub file_size: Option<i64>,
    /// Storage key of the uploaded model
    pub file_path: Option<String>,
    /// blake3 digest of the upload
    pub file_checksum: Option<String>,
    /// Material id from the catalog
    pub material: String,
    /// Filament color name
    pub color: Option<String>,
    /// Quality tier id from the catalog
    pub quality: String,
    /// Infill percentage
    pub infill: f64,
    /// Uniform scale multiplier
    pub scale: f64,
    /// Number of copies
    pub quantity: i32,
    /// Bounding box extent along X in millimetres
    pub dimension_x: Option<f64>,
    /// Bounding box extent along Y in millimetres
    pub dimension_y: Option<f64>,
    /// Bounding box extent along Z in millimetres
    pub dimension_z: Option<f64>,
    /// Estimated volume in cm³
    pub volume: Option<f64>,
    pub material_cost: Option<f64>,
    pub labor_cost: Option<f64>,
    pub setup_fee: Option<f64>,
    pub unit_price: Option<f64>,
    /// Amount charged for the whole order
    pub total_price: f64,
    /// Fulfillment status
    pub status: String,
    /// Payment status
    pub payment_status: String,
    /// Structured shipping address, stored as JSON
    pub shipping_address: Option<Json>,
    /// Courier tracking number
    pub tracking_number: Option<String>,
    /// Notes from the customer
    pub notes: Option<String>,
    /// Internal notes from admins
    pub admin_notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub shipped_at: Option<DateTimeUtc>,
    pub delivered_at: Option<DateTimeUtc>,
    pub completed_at: Option<DateTimeUtc>,
}

/// Defines relationships between `PrintOrder` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One order has many status history rows
    #[sea_orm(has_many = "super::status_history::Entity")]
    StatusHistory,
}

impl Related<super::status_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StatusHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
