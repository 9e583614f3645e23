//! PostgreSQL post store.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseTransaction, DbConn, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};

use posts_core::domain::{Post, PostDraft, PostFilter};
use posts_core::error::RepoError;
use posts_core::ports::{PostStore, PostUnitOfWork};

use super::entity::post::{self, Entity as PostEntity};

/// Sequence values drawn per server-assigned insert before giving up.
///
/// Explicit-id inserts never touch the `posts.id` sequence, so a drawn value
/// can already be taken. Each retry draws the next one.
const MAX_ID_ATTEMPTS: usize = 16;

/// Post store over a SeaORM connection pool. One transaction per unit of work.
pub struct PostgresPostStore {
    db: DbConn,
}

impl PostgresPostStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostStore for PostgresPostStore {
    async fn begin(&self) -> Result<Box<dyn PostUnitOfWork>, RepoError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        Ok(Box::new(PostgresUnitOfWork { txn }))
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

/// A database transaction. Dropping it without commit rolls back.
pub struct PostgresUnitOfWork {
    txn: DatabaseTransaction,
}

fn query_err(e: DbErr) -> RepoError {
    RepoError::Query(e.to_string())
}

fn is_unique_violation(e: &DbErr) -> bool {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = e.sql_err() {
        return true;
    }
    let err_str = e.to_string().to_lowercase();
    err_str.contains("duplicate") || err_str.contains("unique")
}

fn write_err(e: DbErr) -> RepoError {
    if is_unique_violation(&e) {
        RepoError::Constraint(e.to_string())
    } else {
        RepoError::Query(e.to_string())
    }
}

#[async_trait]
impl PostUnitOfWork for PostgresUnitOfWork {
    async fn list(&mut self, filter: &PostFilter) -> Result<Vec<Post>, RepoError> {
        let mut query = PostEntity::find();
        if let Some(title) = &filter.title_like {
            query = query.filter(post::Column::Title.contains(title.as_str()));
        }
        if let Some(body) = &filter.body_like {
            query = query.filter(post::Column::Body.contains(body.as_str()));
        }

        let rows = query
            .order_by_asc(post::Column::Id)
            .all(&self.txn)
            .await
            .map_err(query_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&mut self, id: i32) -> Result<Option<Post>, RepoError> {
        let row = PostEntity::find_by_id(id)
            .one(&self.txn)
            .await
            .map_err(query_err)?;

        Ok(row.map(Into::into))
    }

    async fn insert(&mut self, draft: PostDraft) -> Result<Post, RepoError> {
        for attempt in 1..=MAX_ID_ATTEMPTS {
            // Savepoint, so a collision leaves the outer transaction usable
            let savepoint = self.txn.begin().await.map_err(query_err)?;
            match post::ActiveModel::from(draft.clone()).insert(&savepoint).await {
                Ok(model) => {
                    savepoint.commit().await.map_err(query_err)?;
                    return Ok(model.into());
                }
                Err(e) if is_unique_violation(&e) => {
                    savepoint.rollback().await.map_err(query_err)?;
                    tracing::debug!(attempt, "Drawn post id already taken, retrying");
                }
                Err(e) => return Err(write_err(e)),
            }
        }

        Err(RepoError::Constraint(format!(
            "no free post id after {} attempts",
            MAX_ID_ATTEMPTS
        )))
    }

    async fn insert_with_id(&mut self, id: i32, draft: PostDraft) -> Result<Post, RepoError> {
        let mut active = post::ActiveModel::from(draft);
        active.id = Set(id);
        let model = active.insert(&self.txn).await.map_err(write_err)?;

        tracing::debug!(post_id = id, "Inserted post with explicit id");
        Ok(model.into())
    }

    async fn update(&mut self, id: i32, draft: PostDraft) -> Result<Post, RepoError> {
        let active = post::ActiveModel {
            id: ActiveValue::Unchanged(id),
            title: Set(draft.title),
            body: Set(draft.body),
        };

        let model = active.update(&self.txn).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => RepoError::NotFound,
            other => write_err(other),
        })?;

        Ok(model.into())
    }

    async fn delete(&mut self, id: i32) -> Result<bool, RepoError> {
        let result = PostEntity::delete_by_id(id)
            .exec(&self.txn)
            .await
            .map_err(query_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn commit(self: Box<Self>) -> Result<(), RepoError> {
        let this = *self;
        this.txn.commit().await.map_err(query_err)
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepoError> {
        let this = *self;
        this.txn.rollback().await.map_err(query_err)
    }
}
