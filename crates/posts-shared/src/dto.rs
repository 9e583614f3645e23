//! Data Transfer Objects - request types for the API.

use serde::{Deserialize, Serialize};

/// Query string of `GET /posts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostListQuery {
    pub title_like: Option<String>,
    pub body_like: Option<String>,
}
