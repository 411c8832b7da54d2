//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod admin_role;
pub mod print_order;
pub mod status_history;

// Re-export specific types to avoid conflicts
pub use admin_role::{Column as AdminRoleColumn, Entity as AdminRole, Model as AdminRoleModel};
pub use print_order::{Column as PrintOrderColumn, Entity as PrintOrder, Model as PrintOrderModel};
pub use status_history::{
    Column as StatusHistoryColumn, Entity as StatusHistory, Model as StatusHistoryModel,
};
