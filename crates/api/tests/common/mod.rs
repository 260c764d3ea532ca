#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Request, Response};
use axum::Router;
use bookings_api::config::ServerConfig;
use bookings_api::router::build_app_router;
use bookings_api::state::AppState;
use bookings_core::booking::NewReservation;
use bookings_core::memory::{InMemoryBookingStore, InMemoryDraftStore};
use bookings_core::ports::BookingStore;
use bookings_core::stay::StayRange;
use bookings_core::types::DbId;
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:8080".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        in_production: false,
        session_ttl_hours: 24,
    }
}

/// The production router over in-memory adapters, with handles to inspect
/// what the requests persisted.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryBookingStore>,
    pub drafts: Arc<InMemoryDraftStore>,
}

impl TestApp {
    /// A client with an empty cookie jar.
    pub fn client(&self) -> TestClient {
        TestClient {
            router: self.router.clone(),
            cookie: None,
        }
    }

    /// Commit a reservation directly through the store, bypassing HTTP.
    pub async fn book(&self, room_id: DbId, start: &str, end: &str) {
        self.store
            .commit_reservation(&NewReservation {
                first_name: "Existing".into(),
                last_name: "Guest".into(),
                email: "existing@example.com".into(),
                phone: "555-0100".into(),
                room_id,
                stay: StayRange::parse(start, end).unwrap(),
            })
            .await
            .unwrap();
    }
}

/// Build the full application router (same middleware stack as `main.rs`)
/// over the two seeded rooms.
pub fn build_test_app() -> TestApp {
    let store = Arc::new(InMemoryBookingStore::with_default_rooms());
    let drafts = Arc::new(InMemoryDraftStore::new());
    let config = test_config();

    let state = AppState::new(store.clone(), drafts.clone(), config.clone());
    let router = build_app_router(state, &config);

    TestApp {
        router,
        store,
        drafts,
    }
}

/// Issues requests against the router and keeps the session cookie it is
/// handed, like a browser would.
pub struct TestClient {
    router: Router,
    pub cookie: Option<String>,
}

impl TestClient {
    pub async fn get(&mut self, uri: &str) -> Response<Body> {
        let request = self
            .request("GET", uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post_form(&mut self, uri: &str, form: &str) -> Response<Body> {
        let request = self
            .request("POST", uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        self.send(request).await
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(COOKIE, cookie.as_str());
        }
        builder
    }

    async fn send(&mut self, request: Request<Body>) -> Response<Body> {
        let response = self.router.clone().oneshot(request).await.unwrap();
        if let Some(cookie) = set_cookie(&response) {
            self.cookie = Some(cookie);
        }
        response
    }
}

/// The `name=value` pair of the response's `Set-Cookie` header, if any.
pub fn set_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|pair| pair.trim().to_string())
}

/// The `Location` header of a redirect.
pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(LOCATION)
        .expect("response has no Location header")
        .to_str()
        .unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
