//! Status history entity - Append-only audit log of order status changes.
//!
//! A row is written in the same database transaction as every status change,
//! plus one when the order is created. Rows are never updated or deleted.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Status history database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_status_history")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Order this entry belongs to
    pub order_id: i64,
    /// Status before the change, `None` for the creation entry
    pub previous_status: Option<String>,
    /// Status after the change
    pub new_status: String,
    /// Who made the change (admin user id, Discord id or `"customer"`)
    pub changed_by: String,
    /// Free-text note
    pub note: Option<String>,
    /// When the change happened
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `StatusHistory` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry belongs to one order
    #[sea_orm(
        belongs_to = "super::print_order::Entity",
        from = "Column::OrderId",
        to = "super::print_order::Column::Id"
    )]
    PrintOrder,
}

impl Related<super::print_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PrintOrder.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
