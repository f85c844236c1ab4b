//! Comment endpoints
//!
//! POST /api/comments - comment on a movie (session required)
//! GET  /api/comments?movieId= - comments on a movie, newest first

use actix_middleware::UserId;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;

use crate::error::{ServiceError, ServiceResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub movie_id: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCommentsQuery {
    pub movie_id: Option<String>,
}

pub async fn create_comment(
    state: web::Data<AppState>,
    user: UserId,
    req: web::Json<CreateCommentRequest>,
) -> ServiceResult<HttpResponse> {
    let req = req.into_inner();
    let (movie_id, content) = match (req.movie_id, req.content) {
        (Some(movie_id), Some(content)) => (movie_id, content),
        _ => {
            return Err(ServiceError::InvalidInput(
                "Movie ID and content are required".to_string(),
            ))
        }
    };

    let author = state.account_service().require_user(user.0).await?;
    let comment = state
        .comment_service()
        .create_comment(&author, &movie_id, &content, Utc::now())
        .await?;

    Ok(HttpResponse::Ok().json(comment))
}

pub async fn list_comments(
    state: web::Data<AppState>,
    query: web::Query<ListCommentsQuery>,
) -> ServiceResult<HttpResponse> {
    let movie_id = query.into_inner().movie_id.unwrap_or_default();
    let comments = state.comment_service().list_comments(&movie_id).await?;

    Ok(HttpResponse::Ok().json(comments))
}
