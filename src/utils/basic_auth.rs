// src/utils/basic_auth.rs

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{HeaderValue, Request, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};

use crate::{config::Config, error::AppError};

/// Credentials carried by an `Authorization: Basic` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub user_name: String,
    pub password: String,
}

/// Decodes a raw `Authorization` header value.
/// Returns `None` for any other scheme or malformed payload.
pub fn parse_basic(header: &str) -> Option<BasicCredentials> {
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user_name, password) = decoded.split_once(':')?;

    Some(BasicCredentials {
        user_name: user_name.to_string(),
        password: password.to_string(),
    })
}

/// Axum extractor: rejects the request with 401 when the header is absent
/// or not a well-formed Basic credential.
impl<S> FromRequestParts<S> for BasicCredentials
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_basic)
            .ok_or_else(|| AppError::AuthError("Invalid authentication scheme!".to_string()))
    }
}

/// Axum Middleware: Admin Authorization.
///
/// Compares Basic credentials against the static admin pair from the config.
/// Mismatch answers 401 with a `WWW-Authenticate` challenge.
pub async fn admin_middleware(
    State(config): State<Config>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let credentials = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_basic);

    let authorized = credentials.is_some_and(|c| {
        c.user_name == config.admin.user_name && c.password == config.admin.password
    });

    if !authorized {
        tracing::warn!("rejected admin request");
        let mut response =
            AppError::AuthError("Invalid authentication scheme!".to_string()).into_response();
        response.headers_mut().insert(
            header::WWW_AUTHENTICATE,
            HeaderValue::from_static(r#"Basic realm="admin""#),
        );
        return response;
    }

    next.run(req).await
}
