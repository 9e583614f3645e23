//! Error handling - every failure becomes a `{"message": ...}` JSON body.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use posts_shared::MessageResponse;
use std::fmt;

/// Application-level error type that converts to JSON message responses.
#[derive(Debug)]
pub enum AppError {
    /// The client does not accept the given mediatype.
    NotAcceptable(&'static str),
    /// The request body is not of the given mediatype.
    UnsupportedMediaType(&'static str),
    NotFound(String),
    BadRequest(String),
    MethodNotAllowed,
    Conflict(String),
    /// Schema violation on a write payload.
    Unprocessable(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotAcceptable(mediatype) => write!(f, "Not acceptable: {}", mediatype),
            AppError::UnsupportedMediaType(mediatype) => {
                write!(f, "Unsupported media type: {}", mediatype)
            }
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::MethodNotAllowed => write!(f, "Method not allowed"),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Unprocessable(msg) => write!(f, "Unprocessable: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotAcceptable(_) => StatusCode::NOT_ACCEPTABLE,
            AppError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::NotAcceptable(mediatype) => MessageResponse::not_acceptable(mediatype),
            AppError::UnsupportedMediaType(mediatype) => {
                MessageResponse::unsupported_media_type(mediatype)
            }
            AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Conflict(msg)
            | AppError::Unprocessable(msg) => MessageResponse::new(msg.as_str()),
            AppError::MethodNotAllowed => MessageResponse::new("Method not allowed"),
            AppError::Internal(detail) => {
                // Log internal errors, never leak them
                tracing::error!("Internal error: {}", detail);
                MessageResponse::new("Internal server error")
            }
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

// Conversion from domain errors
impl From<posts_core::error::DomainError> for AppError {
    fn from(err: posts_core::error::DomainError) -> Self {
        match err {
            posts_core::error::DomainError::NotFound { .. } => AppError::NotFound(err.to_string()),
            posts_core::error::DomainError::Validation(msg) => AppError::Unprocessable(msg),
        }
    }
}

impl From<posts_core::error::RepoError> for AppError {
    fn from(err: posts_core::error::RepoError) -> Self {
        match err {
            posts_core::error::RepoError::NotFound => {
                AppError::NotFound("Resource not found".to_string())
            }
            posts_core::error::RepoError::Constraint(msg) => AppError::Conflict(msg),
            posts_core::error::RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            posts_core::error::RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use posts_core::error::{DomainError, RepoError};

    async fn message_of(err: AppError) -> (StatusCode, String) {
        let response = err.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        let body: MessageResponse = serde_json::from_slice(&bytes).unwrap();
        (status, body.message)
    }

    #[actix_web::test]
    async fn test_validation_error_is_unprocessable() {
        let err: AppError = DomainError::Validation("'body' is a required property".into()).into();
        assert_eq!(
            message_of(err).await,
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                "'body' is a required property".to_string()
            )
        );
    }

    #[actix_web::test]
    async fn test_not_found_message() {
        let err: AppError = DomainError::post_not_found(3).into();
        assert_eq!(
            message_of(err).await,
            (StatusCode::NOT_FOUND, "Could not find post with id 3".to_string())
        );
    }

    #[actix_web::test]
    async fn test_internal_errors_are_masked() {
        let err: AppError = RepoError::Query("relation \"posts\" does not exist".into()).into();
        assert_eq!(
            message_of(err).await,
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string()
            )
        );
    }
}
