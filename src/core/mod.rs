/*!
 * Core Module
 * Fundamental simulator types and error handling
 */

pub mod errors;
pub mod limits;
pub mod name;
pub mod serde;
pub mod types;

// Re-export for convenience
pub use errors::*;
pub use name::Name;
pub use types::*;
