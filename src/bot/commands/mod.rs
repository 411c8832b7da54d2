//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Dashboard summary command
pub mod dashboard;

/// General utility commands
pub mod general;

/// Order management commands
pub mod orders;

// Export commands
pub use dashboard::*;
pub use general::*;
pub use orders::*;
