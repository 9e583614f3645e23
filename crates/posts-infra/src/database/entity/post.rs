//! Post entity for SeaORM.

use sea_orm::{ActiveValue, Set};
use sea_orm::entity::prelude::*;

use posts_core::domain::PostDraft;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for posts_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            body: model.body,
        }
    }
}

/// A draft becomes an ActiveModel with the id left to the database.
impl From<PostDraft> for ActiveModel {
    fn from(draft: PostDraft) -> Self {
        Self {
            id: ActiveValue::NotSet,
            title: Set(draft.title),
            body: Set(draft.body),
        }
    }
}
