//! HTTP transport adapter for the session manager
//!
//! A thin warp layer: parses request bodies and the refresh cookie, invokes
//! the session manager, and maps its result to a status code, a JSON body and
//! a Set-Cookie header. All session semantics live in `auth::session`.

use std::convert::Infallible;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::auth::session::{AuthOutcome, CookieDirective, SessionManager};
use crate::auth::user::{SignInRequest, SignUpRequest};
use crate::constants::{AUTH_PATH, MAX_BODY_BYTES, REFRESH_COOKIE_NAME};
use crate::error::RustyGateError;

/// Builds the `/auth/*` route tree
pub fn auth_routes(
    sessions: Arc<SessionManager>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let signup = warp::path(AUTH_PATH)
        .and(warp::path("signup"))
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body::<SignUpRequest>())
        .and(with_sessions(sessions.clone()))
        .and_then(handle_signup);

    let signin = warp::path(AUTH_PATH)
        .and(warp::path("signin"))
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body::<SignInRequest>())
        .and(with_sessions(sessions.clone()))
        .and_then(handle_signin);

    let refresh = warp::path(AUTH_PATH)
        .and(warp::path("refresh-tokens"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::cookie::optional::<String>(REFRESH_COOKIE_NAME))
        .and(with_sessions(sessions.clone()))
        .and_then(handle_refresh);

    let signout = warp::path(AUTH_PATH)
        .and(warp::path("signout"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::cookie::optional::<String>(REFRESH_COOKIE_NAME))
        .and(with_sessions(sessions))
        .and_then(handle_signout);

    signup.or(signin).or(refresh).or(signout)
}

async fn handle_signup(
    request: SignUpRequest,
    sessions: Arc<SessionManager>,
) -> Result<warp::reply::Response, Infallible> {
    Ok(respond(sessions.sign_up(request).await))
}

async fn handle_signin(
    request: SignInRequest,
    sessions: Arc<SessionManager>,
) -> Result<warp::reply::Response, Infallible> {
    Ok(respond(sessions.sign_in(request).await))
}

async fn handle_refresh(
    refresh_token: Option<String>,
    sessions: Arc<SessionManager>,
) -> Result<warp::reply::Response, Infallible> {
    Ok(respond(sessions.refresh_tokens(refresh_token.as_deref()).await))
}

async fn handle_signout(
    refresh_token: Option<String>,
    sessions: Arc<SessionManager>,
) -> Result<warp::reply::Response, Infallible> {
    Ok(respond(sessions.sign_out(refresh_token.as_deref()).await))
}

/// Maps a session result to an HTTP response, applying the cookie directive
fn respond(result: crate::error::Result<AuthOutcome>) -> warp::reply::Response {
    match result {
        Ok(outcome) => {
            let cookie = cookie_header(&outcome.cookie);
            let body = warp::reply::json(&outcome);
            warp::reply::with_status(
                warp::reply::with_header(body, "set-cookie", cookie),
                StatusCode::OK,
            )
            .into_response()
        }
        Err(err) => {
            log::debug!("Auth request failed: {}", err);
            let body = warp::reply::json(&serde_json::json!({ "error": err.to_string() }));
            warp::reply::with_status(body, status_for(&err)).into_response()
        }
    }
}

fn cookie_header(directive: &CookieDirective) -> String {
    match directive {
        CookieDirective::Set { value, max_age_secs } => format!(
            "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
            REFRESH_COOKIE_NAME, value, max_age_secs
        ),
        CookieDirective::Clear => format!(
            "{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0",
            REFRESH_COOKIE_NAME
        ),
    }
}

fn status_for(err: &RustyGateError) -> StatusCode {
    match err {
        RustyGateError::Conflict(_) => StatusCode::CONFLICT,
        RustyGateError::NotFound(_) => StatusCode::NOT_FOUND,
        RustyGateError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
        RustyGateError::InvalidInput(_)
        | RustyGateError::InvalidCredentials
        | RustyGateError::TokenMismatch => StatusCode::BAD_REQUEST,
        RustyGateError::StorageError(_)
        | RustyGateError::ConfigError(_)
        | RustyGateError::SystemError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn json_body<T: serde::de::DeserializeOwned + Send>(
) -> impl Filter<Extract = (T,), Error = Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

fn with_sessions(
    sessions: Arc<SessionManager>,
) -> impl Filter<Extract = (Arc<SessionManager>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&sessions))
}

/// Maps warp rejections (malformed bodies, unknown routes) to JSON errors
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, e.to_string())
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed".to_string(),
        )
    } else {
        log::error!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({ "error": message })),
        status,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&RustyGateError::Conflict("dup".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&RustyGateError::NotFound("missing".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&RustyGateError::InvalidToken("bad".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(&RustyGateError::InvalidCredentials),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&RustyGateError::TokenMismatch),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&RustyGateError::StorageError("io".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_cookie_headers() {
        let set = cookie_header(&CookieDirective::Set {
            value: "tok".to_string(),
            max_age_secs: 3600,
        });
        assert_eq!(
            set,
            "refreshToken=tok; HttpOnly; SameSite=Strict; Path=/; Max-Age=3600"
        );

        let clear = cookie_header(&CookieDirective::Clear);
        assert!(clear.starts_with("refreshToken=;"));
        assert!(clear.ends_with("Max-Age=0"));
    }
}
