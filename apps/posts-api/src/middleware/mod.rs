//! Middleware modules.

pub mod error;
pub mod negotiation;

pub use negotiation::{APPLICATION_JSON, MediaTypeGate};
