//! Profile endpoints
//!
//! PUT /api/profile - create or refresh the caller's account from their token
//! GET /api/profile - the caller's profile with follow counts

use actix_middleware::{Claims, UserId};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;

use crate::error::ServiceResult;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ProfileRequest {
    pub name: Option<String>,
    pub image: Option<String>,
}

pub async fn upsert_profile(
    state: web::Data<AppState>,
    user: UserId,
    claims: Claims,
    req: web::Json<ProfileRequest>,
) -> ServiceResult<HttpResponse> {
    let req = req.into_inner();
    // an explicit name wins over the one carried in the token
    let name = req.name.or(claims.name);

    let profile = state
        .account_service()
        .upsert_profile(
            user.0,
            &claims.email,
            name.as_deref(),
            req.image.as_deref(),
            Utc::now(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(profile))
}

pub async fn get_profile(state: web::Data<AppState>, user: UserId) -> ServiceResult<HttpResponse> {
    let profile = state.account_service().profile(user.0, Utc::now()).await?;

    Ok(HttpResponse::Ok().json(profile))
}
