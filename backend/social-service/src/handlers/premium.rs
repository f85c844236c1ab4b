//! Premium membership
//!
//! POST /api/premium - start a one-month membership
//! GET  /api/premium - current membership status

use actix_middleware::UserId;
use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::error::ServiceResult;
use crate::state::AppState;

pub async fn subscribe(state: web::Data<AppState>, user: UserId) -> ServiceResult<HttpResponse> {
    let subscription = state
        .account_service()
        .subscribe_premium(user.0, Utc::now())
        .await?;

    Ok(HttpResponse::Ok().json(subscription))
}

pub async fn status(state: web::Data<AppState>, user: UserId) -> ServiceResult<HttpResponse> {
    let status = state
        .account_service()
        .premium_status(user.0, Utc::now())
        .await?;

    Ok(HttpResponse::Ok().json(status))
}
