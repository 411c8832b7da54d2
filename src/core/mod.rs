/// Admin role checks
pub mod auth;
/// Shopping cart state and persistence
pub mod cart;
/// Materials, print qualities and pricing constants
pub mod catalog;
/// Model file parsing and volume estimation
pub mod mesh;
/// Order creation, lookup and status transitions
pub mod order;
/// Print price calculation
pub mod pricing;
/// Dashboard aggregates
pub mod report;
/// Order and payment status registry
pub mod status;
/// Uploaded file storage
pub mod storage;
