//! Cookie-backed booking sessions.
//!
//! [`session_middleware`] makes sure every request carries a [`SessionId`]:
//! the value of the `booking_session` cookie when it holds a valid UUID,
//! otherwise a freshly issued one that is returned to the client with
//! `Set-Cookie`. Handlers read it back with the [`Session`] extractor.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use bookings_core::draft::SessionId;
use bookings_core::error::CoreError;
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::error::AppError;
use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "booking_session";

/// Attach a session id to the request, issuing a cookie on first contact.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let existing = session_from_headers(request.headers());
    let issued = existing.is_none();
    let session = existing.unwrap_or_else(|| SessionId::new(Uuid::new_v4().to_string()));

    if issued {
        tracing::debug!(%session, "Issuing new booking session");
    }
    request.extensions_mut().insert(session.clone());

    let mut response = next.run(request).await;

    if issued {
        match HeaderValue::from_str(&session_cookie(&session, &state.config)) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to build session cookie header");
            }
        }
    }

    response
}

/// Extract the session id from the `Cookie` header(s).
///
/// Values that are not UUIDs are ignored, so a tampered cookie simply
/// starts a new session.
pub fn session_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
        .map(|id| SessionId::new(id.to_string()))
}

/// Render the `Set-Cookie` value for a session.
pub fn session_cookie(session: &SessionId, config: &ServerConfig) -> String {
    let max_age = config.session_ttl_hours.max(0) * 3600;
    let mut cookie =
        format!("{SESSION_COOKIE}={session}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age}");
    if config.in_production {
        cookie.push_str("; Secure");
    }
    cookie
}

/// The current request's session, as attached by [`session_middleware`].
#[derive(Debug, Clone)]
pub struct Session(pub SessionId);

impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionId>()
            .cloned()
            .map(Session)
            .ok_or_else(|| {
                AppError::Core(CoreError::Internal(
                    "Session middleware is not installed".into(),
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(in_production: bool) -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            cors_origins: vec![],
            request_timeout_secs: 30,
            shutdown_timeout_secs: 30,
            in_production,
            session_ttl_hours: 2,
        }
    }

    #[test]
    fn reads_session_among_other_cookies() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {SESSION_COOKIE}={id}; lang=en")).unwrap(),
        );

        let session = session_from_headers(&headers).unwrap();
        assert_eq!(session.as_str(), id.to_string());
    }

    #[test]
    fn ignores_non_uuid_session_values() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("booking_session=../../etc/passwd"),
        );
        assert!(session_from_headers(&headers).is_none());
        assert!(session_from_headers(&HeaderMap::new()).is_none());
    }

    #[test]
    fn cookie_attributes_follow_environment() {
        let session = SessionId::new("abc");

        let dev = session_cookie(&session, &config(false));
        assert_eq!(
            dev,
            "booking_session=abc; HttpOnly; SameSite=Lax; Path=/; Max-Age=7200"
        );

        let prod = session_cookie(&session, &config(true));
        assert!(prod.ends_with("; Secure"));
    }
}
