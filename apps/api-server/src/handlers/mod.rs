//! HTTP handlers and route configuration.

mod health;
mod posts;

#[cfg(test)]
mod tests;

use actix_web::web;

use crate::middleware::auth::RequireAuth;
use crate::middleware::error::AppError;

/// Upper bound on JSON request bodies.
const JSON_LIMIT: usize = 64 * 1024;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_LIMIT)
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    // A non-integer id can never name a post.
    .app_data(
        web::PathConfig::default()
            .error_handler(|_err, _req| AppError::NotFound("Post not found".to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Post resource, authenticated before anything else runs
            .service(
                web::scope("/posts")
                    .wrap(RequireAuth)
                    .route("", web::get().to(posts::index))
                    .route("", web::post().to(posts::store))
                    .route("/{id}", web::get().to(posts::show))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::delete().to(posts::destroy)),
            ),
    );
}
