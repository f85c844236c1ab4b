//! Movie catalog proxy endpoints
//!
//! GET /api/catalog/trending/movies
//! GET /api/catalog/trending/shows
//! GET /api/catalog/search?query=
//! GET /api/catalog/movies/{id}[/credits|/recommendations]
//! GET /api/catalog/genres/{genreId}/movies
//! GET /api/catalog/shows/{id}[/credits|/recommendations]
//! GET /api/catalog/moods/{mood}

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::{ServiceError, ServiceResult};
use crate::services::{CatalogClient, Mood};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/trending/movies", web::get().to(trending_movies))
        .route("/trending/shows", web::get().to(trending_shows))
        .route("/search", web::get().to(search_movies))
        .route("/movies/{id}", web::get().to(movie_details))
        .route("/movies/{id}/credits", web::get().to(movie_credits))
        .route("/movies/{id}/recommendations", web::get().to(movie_recommendations))
        .route("/genres/{genre_id}/movies", web::get().to(movies_by_genre))
        .route("/shows/{id}", web::get().to(show_details))
        .route("/shows/{id}/credits", web::get().to(show_credits))
        .route("/shows/{id}/recommendations", web::get().to(show_recommendations))
        .route("/moods/{mood}", web::get().to(mood_recommendations));
}

fn client(state: &AppState) -> ServiceResult<Arc<CatalogClient>> {
    state
        .catalog
        .clone()
        .ok_or_else(|| ServiceError::Unavailable("Movie catalog is not configured".to_string()))
}

async fn trending_movies(state: web::Data<AppState>) -> ServiceResult<HttpResponse> {
    let movies = client(&state)?.trending_movies().await;
    Ok(HttpResponse::Ok().json(movies))
}

async fn trending_shows(state: web::Data<AppState>) -> ServiceResult<HttpResponse> {
    let shows = client(&state)?.trending_shows().await;
    Ok(HttpResponse::Ok().json(shows))
}

async fn search_movies(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> ServiceResult<HttpResponse> {
    let catalog = client(&state)?;
    let query = query
        .into_inner()
        .query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ServiceError::InvalidInput("Search query is required".to_string()))?;

    Ok(HttpResponse::Ok().json(catalog.search_movies(query.trim()).await))
}

async fn movie_details(
    state: web::Data<AppState>,
    id: web::Path<u64>,
) -> ServiceResult<HttpResponse> {
    let movie = client(&state)?.movie_details(*id).await?;
    Ok(HttpResponse::Ok().json(movie))
}

async fn movie_credits(
    state: web::Data<AppState>,
    id: web::Path<u64>,
) -> ServiceResult<HttpResponse> {
    let credits = client(&state)?.movie_credits(*id).await?;
    Ok(HttpResponse::Ok().json(credits))
}

async fn movie_recommendations(
    state: web::Data<AppState>,
    id: web::Path<u64>,
) -> ServiceResult<HttpResponse> {
    let movies = client(&state)?.movie_recommendations(*id).await;
    Ok(HttpResponse::Ok().json(movies))
}

async fn movies_by_genre(
    state: web::Data<AppState>,
    genre_id: web::Path<u64>,
) -> ServiceResult<HttpResponse> {
    let movies = client(&state)?.movies_by_genre(*genre_id).await;
    Ok(HttpResponse::Ok().json(movies))
}

async fn show_details(
    state: web::Data<AppState>,
    id: web::Path<u64>,
) -> ServiceResult<HttpResponse> {
    let show = client(&state)?.show_details(*id).await?;
    Ok(HttpResponse::Ok().json(show))
}

async fn show_credits(
    state: web::Data<AppState>,
    id: web::Path<u64>,
) -> ServiceResult<HttpResponse> {
    let credits = client(&state)?.show_credits(*id).await?;
    Ok(HttpResponse::Ok().json(credits))
}

async fn show_recommendations(
    state: web::Data<AppState>,
    id: web::Path<u64>,
) -> ServiceResult<HttpResponse> {
    let shows = client(&state)?.show_recommendations(*id).await;
    Ok(HttpResponse::Ok().json(shows))
}

async fn mood_recommendations(
    state: web::Data<AppState>,
    mood: web::Path<String>,
) -> ServiceResult<HttpResponse> {
    let catalog = client(&state)?;
    let mood: Mood = mood.parse()?;
    Ok(HttpResponse::Ok().json(catalog.mood_recommendations(mood).await))
}
