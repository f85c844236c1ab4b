//! Like endpoints
//!
//! POST /api/likes - toggle a like on a movie, comment or review
//! GET  /api/likes?movieId=|commentId=|reviewId= - whether the caller likes it

use actix_middleware::UserId;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::LikeTarget;
use crate::error::ServiceResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    pub movie_id: Option<String>,
    pub comment_id: Option<String>,
    pub review_id: Option<String>,
}

impl LikeRequest {
    fn target(self) -> ServiceResult<LikeTarget> {
        LikeTarget::from_ids(self.movie_id, self.comment_id, self.review_id)
    }
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub liked: bool,
}

pub async fn toggle_like(
    state: web::Data<AppState>,
    user: UserId,
    req: web::Json<LikeRequest>,
) -> ServiceResult<HttpResponse> {
    let target = req.into_inner().target()?;
    let liked = state.like_service().toggle_like(user.0, &target).await?;

    Ok(HttpResponse::Ok().json(LikeResponse { liked }))
}

pub async fn like_status(
    state: web::Data<AppState>,
    user: Option<UserId>,
    query: web::Query<LikeRequest>,
) -> ServiceResult<HttpResponse> {
    let target = query.into_inner().target()?;
    let liked = state
        .like_service()
        .is_liked(user.map(|UserId(id)| id), &target)
        .await?;

    Ok(HttpResponse::Ok().json(LikeResponse { liked }))
}
