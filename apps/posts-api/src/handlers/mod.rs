//! HTTP handlers and route configuration.

mod health;
mod posts;


use actix_web::{HttpRequest, error::PathError, guard, web};
use posts_core::DomainError;

use crate::middleware::error::AppError;
use crate::middleware::{APPLICATION_JSON, MediaTypeGate};

/// Configure all application routes, relative to the API base path.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/posts")
                .app_data(web::PathConfig::default().error_handler(invalid_post_id))
                .service(
                    web::resource("")
                        .guard(guard::Get())
                        .to(posts::list_posts)
                        .wrap(MediaTypeGate::accept(APPLICATION_JSON)),
                )
                .service(
                    web::resource("")
                        .guard(guard::Post())
                        .to(posts::create_post)
                        .wrap(MediaTypeGate::require(APPLICATION_JSON))
                        .wrap(MediaTypeGate::accept(APPLICATION_JSON)),
                )
                .service(
                    web::resource("/{id}")
                        .name(posts::POST_ROUTE)
                        .guard(guard::Get())
                        .to(posts::get_post)
                        .wrap(MediaTypeGate::accept(APPLICATION_JSON)),
                )
                .service(
                    web::resource("/{id}")
                        .guard(guard::Put())
                        .to(posts::upsert_post)
                        .wrap(MediaTypeGate::require(APPLICATION_JSON)),
                )
                .service(
                    web::resource("/{id}")
                        .guard(guard::Delete())
                        .to(posts::delete_post),
                )
                // Known paths, unguarded methods
                .service(web::resource("").to(posts::method_not_allowed))
                .service(web::resource("/{id}").to(posts::method_not_allowed))
                .default_service(web::to(posts::route_not_found)),
        );
}

/// `/posts/{id}` with a non-integer id is a missing post.
fn invalid_post_id(_err: PathError, req: &HttpRequest) -> actix_web::Error {
    let segment = req.match_info().get("id").unwrap_or_default();
    AppError::from(DomainError::post_not_found(segment)).into()
}
