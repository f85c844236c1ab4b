mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use movie_social_service::config::CatalogConfig;
use movie_social_service::services::CatalogClient;
use movie_social_service::AppState;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{bearer, seed_user, token_for};

#[actix_web::test]
async fn test_health_and_ready() {
    let app = test_app!(AppState::in_memory(None));

    for uri in ["/health", "/ready"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}

#[actix_web::test]
async fn test_profile_provisions_user_from_token() {
    let app = test_app!(AppState::in_memory(None));
    let user_id = Uuid::new_v4();
    let token = token_for(user_id, "durden@reelhouse.test");

    // not provisioned yet
    let req = test::TestRequest::get()
        .uri("/api/profile")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::put()
        .uri("/api/profile")
        .insert_header(bearer(&token))
        .set_json(json!({"name": "Tyler Durden", "image": "/soap.png"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["id"], user_id.to_string());
    assert_eq!(body["email"], "durden@reelhouse.test");
    assert_eq!(body["name"], "Tyler Durden");
    assert_eq!(body["role"], "USER");
    assert_eq!(body["isPremium"], false);

    let req = test::TestRequest::get()
        .uri("/api/profile")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["image"], "/soap.png");
    assert_eq!(body["followerCount"], 0);
    assert_eq!(body["followingCount"], 0);
}

#[actix_web::test]
async fn test_like_toggle_and_status() {
    let state = AppState::in_memory(None);
    let user = seed_user(&state, "Fan").await;
    let app = test_app!(state);

    let toggle = || {
        test::TestRequest::post()
            .uri("/api/likes")
            .insert_header(bearer(&user.token))
            .set_json(json!({"movieId": "550"}))
            .to_request()
    };
    let status = |token: Option<&str>| {
        let req = test::TestRequest::get().uri("/api/likes?movieId=550");
        match token {
            Some(token) => req.insert_header(bearer(token)).to_request(),
            None => req.to_request(),
        }
    };

    let body: Value = test::call_and_read_body_json(&app, toggle()).await;
    assert_eq!(body, json!({"liked": true}));
    let body: Value = test::call_and_read_body_json(&app, status(Some(&user.token))).await;
    assert_eq!(body, json!({"liked": true}));
    let body: Value = test::call_and_read_body_json(&app, status(None)).await;
    assert_eq!(body, json!({"liked": false}));

    let body: Value = test::call_and_read_body_json(&app, toggle()).await;
    assert_eq!(body, json!({"liked": false}));
    let body: Value = test::call_and_read_body_json(&app, status(Some(&user.token))).await;
    assert_eq!(body, json!({"liked": false}));
}

#[actix_web::test]
async fn test_like_requires_target() {
    let state = AppState::in_memory(None);
    let user = seed_user(&state, "Picky").await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/likes")
        .insert_header(bearer(&user.token))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        "Either movieId, commentId, or reviewId is required"
    );

    let req = test::TestRequest::post()
        .uri("/api/likes")
        .set_json(json!({"movieId": "550"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_follow_flow() {
    let state = AppState::in_memory(None);
    let alice = seed_user(&state, "Alice").await;
    let bob = seed_user(&state, "Bob").await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/follow")
        .insert_header(bearer(&alice.token))
        .set_json(json!({"targetUserId": bob.id}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"following": true}));

    let req = test::TestRequest::get()
        .uri(&format!("/api/follow?targetUserId={}", bob.id))
        .insert_header(bearer(&alice.token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"following": true}));

    let req = test::TestRequest::get()
        .uri(&format!("/api/follow?targetUserId={}", bob.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"following": false}));

    let req = test::TestRequest::put()
        .uri("/api/follow")
        .set_json(json!({"userId": bob.id, "type": "followers"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], alice.id.to_string());
    assert_eq!(body[0]["name"], "Alice");

    let req = test::TestRequest::get()
        .uri("/api/profile")
        .insert_header(bearer(&bob.token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["followerCount"], 1);

    // second toggle unfollows
    let req = test::TestRequest::post()
        .uri("/api/follow")
        .insert_header(bearer(&alice.token))
        .set_json(json!({"targetUserId": bob.id}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"following": false}));
}

#[actix_web::test]
async fn test_follow_errors() {
    let state = AppState::in_memory(None);
    let alice = seed_user(&state, "Alice").await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/follow")
        .insert_header(bearer(&alice.token))
        .set_json(json!({"targetUserId": alice.id}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/follow")
        .insert_header(bearer(&alice.token))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/follow")
        .insert_header(bearer(&alice.token))
        .set_json(json!({"targetUserId": Uuid::new_v4()}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::put()
        .uri("/api/follow")
        .set_json(json!({"userId": alice.id, "type": "friends"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        "Invalid type. Must be 'followers' or 'following'"
    );

    let req = test::TestRequest::put()
        .uri("/api/follow")
        .set_json(json!({"userId": Uuid::new_v4(), "type": "following"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn test_comments_with_likes() {
    let state = AppState::in_memory(None);
    let critic = seed_user(&state, "Critic").await;
    let fan = seed_user(&state, "Fan").await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/comments")
        .insert_header(bearer(&critic.token))
        .set_json(json!({"movieId": "550", "content": "His name was Robert Paulson."}))
        .to_request();
    let comment: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(comment["user"]["name"], "Critic");
    assert_eq!(comment["likes"], json!([]));

    let req = test::TestRequest::post()
        .uri("/api/likes")
        .insert_header(bearer(&fan.token))
        .set_json(json!({"commentId": comment["id"]}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["liked"], true);

    let req = test::TestRequest::get()
        .uri("/api/comments?movieId=550")
        .to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["content"], "His name was Robert Paulson.");
    assert_eq!(listed[0]["likes"], json!([{"userId": fan.id}]));

    let req = test::TestRequest::post()
        .uri("/api/comments")
        .insert_header(bearer(&critic.token))
        .set_json(json!({"movieId": "550"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_premium_flow() {
    let state = AppState::in_memory(None);
    let user = seed_user(&state, "Member").await;
    let app = test_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/premium")
        .insert_header(bearer(&user.token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["isPremium"], false);
    assert_eq!(body["premiumUntil"], Value::Null);

    let req = test::TestRequest::post()
        .uri("/api/premium")
        .insert_header(bearer(&user.token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["role"], "PREMIUM");
    assert!(body["premiumUntil"].is_string());

    let req = test::TestRequest::get()
        .uri("/api/premium")
        .insert_header(bearer(&user.token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["isPremium"], true);

    let req = test::TestRequest::post().uri("/api/premium").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_catalog_without_api_key() {
    let app = test_app!(AppState::in_memory(None));

    for uri in [
        "/api/catalog/trending/movies",
        "/api/catalog/movies/550",
        "/api/catalog/moods/happy",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], 503);
    }
}

#[actix_web::test]
async fn test_comment_like_ignores_id_casing() {
    let state = AppState::in_memory(None);
    let critic = seed_user(&state, "Critic").await;
    let fan = seed_user(&state, "Fan").await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/comments")
        .insert_header(bearer(&critic.token))
        .set_json(json!({"movieId": "550", "content": "You met me at a very strange time."}))
        .to_request();
    let comment: Value = test::call_and_read_body_json(&app, req).await;
    let comment_id = comment["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/likes")
        .insert_header(bearer(&fan.token))
        .set_json(json!({"commentId": format!(" {} ", comment_id.to_uppercase())}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"liked": true}));

    let req = test::TestRequest::get()
        .uri(&format!("/api/likes?commentId={}", comment_id))
        .insert_header(bearer(&fan.token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"liked": true}));

    let req = test::TestRequest::get()
        .uri("/api/comments?movieId=550")
        .to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed[0]["likes"], json!([{"userId": fan.id}]));

    let req = test::TestRequest::post()
        .uri("/api/likes")
        .insert_header(bearer(&fan.token))
        .set_json(json!({"commentId": "not-a-comment"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_catalog_degrades_when_upstream_is_down() {
    let catalog = CatalogClient::from_config(&CatalogConfig {
        api_key: Some("test-key".to_string()),
        base_url: "http://127.0.0.1:9".to_string(),
        language: "tr-TR".to_string(),
    });
    assert!(catalog.is_some());
    let app = test_app!(AppState::in_memory(catalog));

    let req = test::TestRequest::get()
        .uri("/api/catalog/trending/movies")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!([]));

    let req = test::TestRequest::get().uri("/api/catalog/movies/550").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri("/api/catalog/moods/happy").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["mood"], "happy");
    assert!(body["title"].is_string());
    assert_eq!(body["movies"], json!([]));

    let req = test::TestRequest::get().uri("/api/catalog/moods/grumpy").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/catalog/search?query=")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
