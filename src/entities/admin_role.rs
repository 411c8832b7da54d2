//! Admin role entity - Users allowed into the back office.
//!
//! Identities come from the upstream auth gateway (HTTP) or Discord (bot);
//! both are stored as plain strings in `user_id`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Admin role database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "admin_roles")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// External user id
    #[sea_orm(unique)]
    pub user_id: String,
    /// `"admin"` or `"super_admin"`
    pub role: String,
    /// When the role was granted
    pub created_at: DateTimeUtc,
}

/// `AdminRole` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
