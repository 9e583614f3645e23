//! Standardized API response bodies.

use serde::{Deserialize, Serialize};

/// `{"message": ...}` body used for every error and for delete confirmations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn not_acceptable(mediatype: &str) -> Self {
        Self::new(format!("Request must accept {} data", mediatype))
    }

    pub fn unsupported_media_type(mediatype: &str) -> Self {
        Self::new(format!("Request must contain {} data", mediatype))
    }

    pub fn post_deleted(id: i32) -> Self {
        Self::new(format!("{} has been deleted successfully", id))
    }
}
