#![allow(dead_code)]

use actix_middleware::Claims;
use jsonwebtoken::{encode, EncodingKey, Header};
use movie_social_service::AppState;
use uuid::Uuid;

pub const SECRET: &str = "integration-test-secret";

/// Build the service exactly as `main` wires it, minus request logging.
#[macro_export]
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state))
                .wrap(actix_middleware::JwtAuthMiddleware::new($crate::common::SECRET))
                .configure(movie_social_service::handlers::configure),
        )
        .await
    };
}

pub fn token_for(user_id: Uuid, email: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        name: None,
        iat: now,
        exp: now + 3600,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// A user already known to the store, plus a token for them.
pub struct TestUser {
    pub id: Uuid,
    pub token: String,
}

pub async fn seed_user(state: &AppState, name: &str) -> TestUser {
    let id = Uuid::new_v4();
    let email = format!("{}@reelhouse.test", name.to_lowercase());
    state
        .users
        .upsert_user(id, &email, Some(name), None)
        .await
        .unwrap();
    TestUser {
        id,
        token: token_for(id, &email),
    }
}
