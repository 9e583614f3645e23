//! Post resource handlers.
//!
//! Every handler opens one unit of work, commits it on success and lets it
//! roll back on drop when an error short-circuits via `?`.

use actix_web::{HttpRequest, HttpResponse, http::header, web};
use serde_json::Value;

use posts_core::DomainError;
use posts_core::domain::{Post, PostFilter};
use posts_core::validation::validate_post_payload;
use posts_shared::MessageResponse;
use posts_shared::dto::PostListQuery;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Route name of `GET /posts/{id}`, used to build `Location` headers.
pub const POST_ROUTE: &str = "post";

/// GET /posts
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<PostListQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let filter = PostFilter::new(query.title_like, query.body_like);

    let mut uow = state.posts.begin().await?;
    let posts = uow.list(&filter).await?;
    uow.commit().await?;

    tracing::debug!(count = posts.len(), filtered = !filter.is_empty(), "Listed posts");
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = post_id(path)?;

    let mut uow = state.posts.begin().await?;
    let post = uow
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::post_not_found(id))?;
    uow.commit().await?;

    Ok(HttpResponse::Ok().json(post))
}

/// POST /posts
pub async fn create_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let draft = validate_post_payload(&parse_json(&body)?)?;

    let mut uow = state.posts.begin().await?;
    let post = uow.insert(draft).await?;
    uow.commit().await?;

    tracing::info!(post_id = post.id, "Created post");
    created(&req, post)
}

/// PUT /posts/{id} - replaces an existing post or creates one under `id`.
pub async fn upsert_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let id = post_id(path)?;
    let draft = validate_post_payload(&parse_json(&body)?)?;

    let mut uow = state.posts.begin().await?;
    if uow.find_by_id(id).await?.is_some() {
        let post = uow.update(id, draft).await?;
        uow.commit().await?;

        tracing::info!(post_id = id, "Updated post");
        Ok(HttpResponse::Ok().json(post))
    } else {
        let post = uow.insert_with_id(id, draft).await?;
        uow.commit().await?;

        tracing::info!(post_id = id, "Created post with explicit id");
        created(&req, post)
    }
}

/// DELETE /posts/{id}
///
/// Deleting an id that does not exist still reports success.
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = post_id(path)?;

    let mut uow = state.posts.begin().await?;
    let deleted = uow.delete(id).await?;
    uow.commit().await?;

    if deleted {
        tracing::info!(post_id = id, "Deleted post");
    } else {
        tracing::debug!(post_id = id, "Delete of missing post");
    }

    Ok(HttpResponse::Ok().json(MessageResponse::post_deleted(id)))
}

/// Fallback for unsupported methods on post routes.
pub async fn method_not_allowed() -> AppResult<HttpResponse> {
    Err(AppError::MethodNotAllowed)
}

/// Fallback for paths under the posts scope that name no route.
pub async fn route_not_found() -> AppResult<HttpResponse> {
    Err(AppError::NotFound("Resource not found".to_string()))
}

/// Post ids start at 1; zero and negative ids name no post.
fn post_id(path: web::Path<i32>) -> Result<i32, DomainError> {
    match path.into_inner() {
        id if id > 0 => Ok(id),
        id => Err(DomainError::post_not_found(id)),
    }
}

fn parse_json(body: &[u8]) -> AppResult<Value> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Request body is not valid JSON: {}", e)))
}

/// 201 with a `Location` header pointing at the post.
fn created(req: &HttpRequest, post: Post) -> AppResult<HttpResponse> {
    let location = req
        .url_for(POST_ROUTE, [post.id.to_string()])
        .map_err(|e| AppError::Internal(format!("Failed to build post URL: {}", e)))?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, location.as_str()))
        .json(post))
}
