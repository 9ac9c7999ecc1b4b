//! Shared ambient stack for the Inkwell backend: error envelope, tracing
//! setup, health handlers, gateway identity extraction, and small axum /
//! sea-orm extensions.

pub mod error;
pub mod health;
pub mod identity;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
