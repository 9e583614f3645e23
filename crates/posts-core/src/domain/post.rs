use serde::{Deserialize, Serialize};

/// Post entity - a persisted row of the `posts` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub body: String,
}

impl Post {
    /// Materialize a draft under the given id.
    pub fn from_draft(id: i32, draft: PostDraft) -> Self {
        Self {
            id,
            title: draft.title,
            body: draft.body,
        }
    }
}

/// A validated write payload - everything a post needs except its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub body: String,
}

impl PostDraft {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Substring filters for listing posts. Both filters must match when present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub title_like: Option<String>,
    pub body_like: Option<String>,
}

impl PostFilter {
    /// Build a filter, treating empty strings as "no filter".
    pub fn new(title_like: Option<String>, body_like: Option<String>) -> Self {
        Self {
            title_like: title_like.filter(|s| !s.is_empty()),
            body_like: body_like.filter(|s| !s.is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title_like.is_none() && self.body_like.is_none()
    }

    /// Case-sensitive containment check, mirroring SQL `LIKE '%needle%'`.
    pub fn matches(&self, post: &Post) -> bool {
        let title_ok = self
            .title_like
            .as_deref()
            .is_none_or(|needle| post.title.contains(needle));
        let body_ok = self
            .body_like
            .as_deref()
            .is_none_or(|needle| post.body.contains(needle));
        title_ok && body_ok
    }
}
