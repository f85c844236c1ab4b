//! Follow endpoints
//!
//! POST /api/follow - toggle following `targetUserId`
//! GET  /api/follow?targetUserId= - whether the caller follows the target
//! PUT  /api/follow - list followers or followees of `userId`

use actix_middleware::UserId;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::FollowListKind;
use crate::error::{ServiceError, ServiceResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequest {
    pub target_user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowListRequest {
    pub user_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FollowResponse {
    pub following: bool,
}

fn required_target(target: Option<String>) -> ServiceResult<String> {
    target
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ServiceError::InvalidInput("Target user ID is required".to_string()))
}

pub async fn toggle_follow(
    state: web::Data<AppState>,
    user: UserId,
    req: web::Json<FollowRequest>,
) -> ServiceResult<HttpResponse> {
    let target = required_target(req.into_inner().target_user_id)?;
    let follower = state.account_service().require_user(user.0).await?;

    let target_id = Uuid::parse_str(target.trim())
        .map_err(|_| ServiceError::NotFound("Target user not found".to_string()))?;

    let following = state
        .follow_service()
        .toggle_follow(follower.id, target_id)
        .await?;

    Ok(HttpResponse::Ok().json(FollowResponse { following }))
}

pub async fn follow_status(
    state: web::Data<AppState>,
    user: Option<UserId>,
    query: web::Query<FollowRequest>,
) -> ServiceResult<HttpResponse> {
    let target = required_target(query.into_inner().target_user_id)?;

    let following = match (user, Uuid::parse_str(target.trim())) {
        (Some(UserId(user_id)), Ok(target_id)) => {
            state
                .follow_service()
                .is_following(user_id, target_id)
                .await?
        }
        _ => false,
    };

    Ok(HttpResponse::Ok().json(FollowResponse { following }))
}

pub async fn list_follows(
    state: web::Data<AppState>,
    req: web::Json<FollowListRequest>,
) -> ServiceResult<HttpResponse> {
    let req = req.into_inner();
    let (user_id, kind) = match (req.user_id, req.kind) {
        (Some(user_id), Some(kind)) if !user_id.trim().is_empty() => (user_id, kind),
        _ => {
            return Err(ServiceError::InvalidInput(
                "User ID and type are required".to_string(),
            ))
        }
    };

    let kind: FollowListKind = kind.parse().map_err(|_| {
        ServiceError::InvalidInput("Invalid type. Must be 'followers' or 'following'".to_string())
    })?;

    let users = match Uuid::parse_str(user_id.trim()) {
        Ok(user_id) => state.follow_service().list(user_id, kind).await?,
        Err(_) => Vec::new(),
    };

    Ok(HttpResponse::Ok().json(users))
}
