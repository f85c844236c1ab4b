//! Poll endpoints
//!
//! POST /api/polls - create a poll (session required)
//! GET  /api/polls?movieId= - active polls for a movie with tallies
//! PUT  /api/polls - cast or change a vote (session required)

use actix_middleware::UserId;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollRequest {
    pub movie_id: Option<String>,
    pub question: Option<String>,
    pub options: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPollsQuery {
    pub movie_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub poll_id: Option<String>,
    pub option_index: Option<i64>,
}

pub async fn create_poll(
    state: web::Data<AppState>,
    _user: UserId,
    req: web::Json<CreatePollRequest>,
) -> ServiceResult<HttpResponse> {
    let req = req.into_inner();
    let view = state
        .poll_service()
        .create_poll(
            req.movie_id.as_deref().unwrap_or_default(),
            req.question.as_deref().unwrap_or_default(),
            req.options.unwrap_or_default(),
            Utc::now(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(view))
}

pub async fn list_polls(
    state: web::Data<AppState>,
    query: web::Query<ListPollsQuery>,
) -> ServiceResult<HttpResponse> {
    let movie_id = query
        .movie_id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ServiceError::InvalidInput("Movie ID is required".to_string()))?;

    let polls = state
        .poll_service()
        .list_active_polls(movie_id, Utc::now())
        .await?;

    Ok(HttpResponse::Ok().json(polls))
}

pub async fn cast_vote(
    state: web::Data<AppState>,
    user: UserId,
    req: web::Json<VoteRequest>,
) -> ServiceResult<HttpResponse> {
    let (poll_id, option_index) = match (req.poll_id.as_deref(), req.option_index) {
        (Some(poll_id), Some(option_index)) => (poll_id, option_index),
        _ => {
            return Err(ServiceError::InvalidInput(
                "Poll ID and option index are required".to_string(),
            ))
        }
    };

    let voter = state.account_service().require_user(user.0).await?;

    // ids that can't exist are reported like any other missing poll
    let poll_id = Uuid::parse_str(poll_id)
        .map_err(|_| ServiceError::NotFound("Poll not found".to_string()))?;

    let view = state
        .poll_service()
        .cast_vote(poll_id, voter.id, option_index, Utc::now())
        .await?;

    Ok(HttpResponse::Ok().json(view))
}
