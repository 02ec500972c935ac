//! Foundation types for Audit-Logged Configuration (ALC).
//!
//! This crate provides the plain (unlogged) data model shared by the rest of
//! the workspace. Every other ALC crate depends on `alc-types`.
//!
//! # Key Types
//!
//! - [`Scalar`] — Non-container primitive: null, bool, integer, float, string
//! - [`Value`] — Tagged variant over the four value kinds: mapping, sequence,
//!   set, scalar
//! - [`ValueKind`] — The kind tag, used in error messages and dispatch
//! - [`Channel`] — Dotted-path name identifying a container node, used as the
//!   audit log channel

pub mod channel;
pub mod scalar;
pub mod value;

pub use channel::Channel;
pub use scalar::Scalar;
pub use value::{Value, ValueKind};
