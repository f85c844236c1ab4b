//! Movie social service
//!
//! Polls with live vote tallies, likes, follows, comments, premium
//! membership and a TMDB catalog proxy, served over actix-web.

pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod repository;
pub mod services;
pub mod state;

pub use error::{ServiceError, ServiceResult};
pub use state::AppState;
