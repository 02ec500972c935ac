//! High-level facade for Audit-Logged Configuration (ALC).
//!
//! Provides a unified API over the ALC crates plus the JSON boundary for
//! construction and flattening. This is the main entry point for
//! applications embedding ALC.

pub mod error;
pub mod json;

pub use error::{SdkError, SdkResult};
pub use json::{from_json, to_json};

// Re-export key types
pub use alc_tree::{LoggedList, LoggedMap, LoggedSet, Node, TreeError};
pub use alc_types::{Channel, Scalar, Value, ValueKind};
