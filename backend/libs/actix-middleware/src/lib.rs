//! # Actix Middleware Library
//!
//! Session handling shared by the Reelhouse actix services.
//!
//! ## Modules
//! - `jwt_auth`: bearer-token validation and the `UserId` extractor

pub mod jwt_auth;

pub use jwt_auth::{decode_claims, Claims, JwtAuthMiddleware, UserId};
