//! HTTP surface
//!
//! Routes live under `/api`; `/health` and `/ready` sit at the root.

pub mod catalog;
pub mod comments;
pub mod follows;
pub mod likes;
pub mod polls;
pub mod premium;
pub mod profile;

use actix_web::{web, HttpResponse};

use crate::error::ServiceError;

/// Register every route plus the extractor error handlers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .route("/health", web::get().to(health))
        .route("/ready", web::get().to(ready))
        .service(
            web::scope("/api")
                .service(
                    web::resource("/polls")
                        .route(web::post().to(polls::create_poll))
                        .route(web::get().to(polls::list_polls))
                        .route(web::put().to(polls::cast_vote)),
                )
                .service(
                    web::resource("/likes")
                        .route(web::post().to(likes::toggle_like))
                        .route(web::get().to(likes::like_status)),
                )
                .service(
                    web::resource("/follow")
                        .route(web::post().to(follows::toggle_follow))
                        .route(web::get().to(follows::follow_status))
                        .route(web::put().to(follows::list_follows)),
                )
                .service(
                    web::resource("/comments")
                        .route(web::post().to(comments::create_comment))
                        .route(web::get().to(comments::list_comments)),
                )
                .service(
                    web::resource("/premium")
                        .route(web::post().to(premium::subscribe))
                        .route(web::get().to(premium::status)),
                )
                .service(
                    web::resource("/profile")
                        .route(web::put().to(profile::upsert_profile))
                        .route(web::get().to(profile::get_profile)),
                )
                .service(web::scope("/catalog").configure(catalog::configure)),
        );
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        ServiceError::InvalidInput(format!("Invalid request body: {}", err)).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        ServiceError::InvalidInput(format!("Invalid query string: {}", err)).into()
    })
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        ServiceError::InvalidInput(format!("Invalid path: {}", err)).into()
    })
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}

async fn ready() -> HttpResponse {
    HttpResponse::Ok().body("READY")
}
