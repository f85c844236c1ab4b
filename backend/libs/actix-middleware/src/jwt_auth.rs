use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::InternalError,
    http::header::AUTHORIZATION,
    Error, HttpMessage, HttpResponse,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims issued by the identity provider
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// User ID resolved from a valid bearer token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub Uuid);

/// Decode and validate an HS256 token.
pub fn decode_claims(
    token: &str,
    key: &DecodingKey,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(token, key, &validation).map(|data| data.claims)
}

/// Session middleware.
///
/// Requests carrying a valid `Authorization: Bearer` token get `UserId` and
/// `Claims` in their extensions. Anything else passes through anonymous; the
/// `UserId` extractor is what turns a missing identity into a 401.
#[derive(Clone)]
pub struct JwtAuthMiddleware {
    decoding_key: DecodingKey,
}

impl JwtAuthMiddleware {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService {
            service,
            decoding_key: self.decoding_key.clone(),
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: S,
    decoding_key: DecodingKey,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::to_owned);

        if let Some(token) = token {
            match decode_claims(&token, &self.decoding_key) {
                Ok(claims) => match Uuid::parse_str(&claims.sub) {
                    Ok(user_id) => {
                        req.extensions_mut().insert(UserId(user_id));
                        req.extensions_mut().insert(claims);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Token subject is not a valid user id");
                    }
                },
                Err(e) => {
                    tracing::warn!(error = %e, path = %req.path(), "Bearer token rejected");
                }
            }
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await })
    }
}

fn unauthorized() -> Error {
    InternalError::from_response(
        "Unauthorized",
        HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "Unauthorized",
            "status": 401,
        })),
    )
    .into()
}

impl actix_web::FromRequest for UserId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        match req.extensions().get::<UserId>() {
            Some(user_id) => ready(Ok(*user_id)),
            None => ready(Err(unauthorized())),
        }
    }
}

impl actix_web::FromRequest for Claims {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) => ready(Ok(claims.clone())),
            None => ready(Err(unauthorized())),
        }
    }
}
