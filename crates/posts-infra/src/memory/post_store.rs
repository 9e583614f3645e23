//! In-memory post store - the fallback when PostgreSQL is unavailable.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use posts_core::domain::{Post, PostDraft, PostFilter};
use posts_core::error::RepoError;
use posts_core::ports::{PostStore, PostUnitOfWork};

#[derive(Debug, Clone)]
struct PostTable {
    rows: BTreeMap<i32, Post>,
    /// Only ever increases, and explicit-id inserts never touch it.
    next_id: i64,
}

impl PostTable {
    fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

/// Post store backed by an ordered map behind an async mutex.
///
/// A unit of work holds the mutex until it is committed or dropped, so units
/// of work are fully serialized. Data is lost on process restart.
#[derive(Clone)]
pub struct InMemoryPostStore {
    table: Arc<Mutex<PostTable>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self {
            table: Arc::new(Mutex::new(PostTable::new())),
        }
    }
}

impl Default for InMemoryPostStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn begin(&self) -> Result<Box<dyn PostUnitOfWork>, RepoError> {
        let guard = self.table.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(InMemoryUnitOfWork { guard, staged }))
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Unit of work staging changes on a private copy of the table.
pub struct InMemoryUnitOfWork {
    guard: OwnedMutexGuard<PostTable>,
    staged: PostTable,
}

impl InMemoryUnitOfWork {
    fn stage_insert(&mut self, id: i32, draft: PostDraft) -> Post {
        let post = Post::from_draft(id, draft);
        self.staged.rows.insert(id, post.clone());

        tracing::debug!(post_id = id, "Staged post insert");
        post
    }
}

#[async_trait]
impl PostUnitOfWork for InMemoryUnitOfWork {
    async fn list(&mut self, filter: &PostFilter) -> Result<Vec<Post>, RepoError> {
        Ok(self
            .staged
            .rows
            .values()
            .filter(|post| filter.matches(post))
            .cloned()
            .collect())
    }

    async fn find_by_id(&mut self, id: i32) -> Result<Option<Post>, RepoError> {
        Ok(self.staged.rows.get(&id).cloned())
    }

    async fn insert(&mut self, draft: PostDraft) -> Result<Post, RepoError> {
        // Skip ids already claimed through `insert_with_id`.
        let id = loop {
            let candidate = i32::try_from(self.staged.next_id)
                .map_err(|_| RepoError::Constraint("post id space exhausted".to_string()))?;
            self.staged.next_id += 1;
            if !self.staged.rows.contains_key(&candidate) {
                break candidate;
            }
        };

        Ok(self.stage_insert(id, draft))
    }

    async fn insert_with_id(&mut self, id: i32, draft: PostDraft) -> Result<Post, RepoError> {
        if self.staged.rows.contains_key(&id) {
            return Err(RepoError::Constraint(format!(
                "post with id {} already exists",
                id
            )));
        }

        Ok(self.stage_insert(id, draft))
    }

    async fn update(&mut self, id: i32, draft: PostDraft) -> Result<Post, RepoError> {
        let post = self.staged.rows.get_mut(&id).ok_or(RepoError::NotFound)?;
        post.title = draft.title;
        post.body = draft.body;
        Ok(post.clone())
    }

    async fn delete(&mut self, id: i32) -> Result<bool, RepoError> {
        Ok(self.staged.rows.remove(&id).is_some())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepoError> {
        let InMemoryUnitOfWork { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepoError> {
        Ok(())
    }
}
