//! Integration tests for the booking journey over HTTP.
//!
//! Every test drives the production router (same middleware stack as
//! `main.rs`) backed by the in-memory adapters.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, location, set_cookie};

const VALID_GUEST: &str = "first_name=John&last_name=Smith&email=john%40example.com&phone=555-1234";

// ---------------------------------------------------------------------------
// Test: search -> choose -> reserve -> summary, end to end
// ---------------------------------------------------------------------------

#[tokio::test]
async fn full_booking_flow_commits_and_summarizes_once() {
    let app = build_test_app();
    let mut client = app.client();

    let response = client
        .post_form("/search-availability", "start=2030-01-10&end=2030-01-12")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(client.cookie.is_some(), "first contact must issue a session cookie");
    let json = body_json(response).await;
    assert_eq!(json["data"]["rooms"].as_array().unwrap().len(), 2);
    assert_eq!(json["data"]["start_date"], "2030-01-10");
    assert_eq!(json["data"]["end_date"], "2030-01-12");

    let response = client.get("/choose-room/1").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/make-reservation");

    let response = client.get("/make-reservation").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["reservation"]["room_id"], 1);
    assert_eq!(json["data"]["reservation"]["room_name"], "General's Quarters");
    assert_eq!(json["data"]["start_date"], "2030-01-10");

    let response = client.post_form("/make-reservation", VALID_GUEST).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/reservation-summary");

    let reservations = app.store.reservations().unwrap();
    assert_eq!(reservations.len(), 1);
    assert_eq!(reservations[0].first_name, "John");
    assert_eq!(reservations[0].email, "john@example.com");
    let restrictions = app.store.restrictions().unwrap();
    assert_eq!(restrictions.len(), 1);
    assert_eq!(restrictions[0].reservation_id, Some(reservations[0].id));

    let response = client.get("/reservation-summary").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["reservation"]["guest"]["first_name"], "John");
    assert_eq!(json["data"]["reservation"]["reservation_id"], reservations[0].id);
    assert_eq!(json["data"]["end_date"], "2030-01-12");

    // Read-once: a refresh bounces home with a flash message.
    let response = client.get("/reservation-summary").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let json = body_json(client.get("/").await).await;
    assert_eq!(json["data"]["flash"]["kind"], "error");
    assert_eq!(
        json["data"]["flash"]["message"],
        "Cannot get reservation from session"
    );
}

// ---------------------------------------------------------------------------
// Test: invalid guest details are echoed back with per-field errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_details_return_422_and_persist_nothing() {
    let app = build_test_app();
    let mut client = app.client();

    client
        .post_form("/search-availability", "start=2030-02-01&end=2030-02-03")
        .await;
    client.get("/choose-room/2").await;

    let response = client
        .post_form(
            "/make-reservation",
            "first_name=Jo&last_name=&email=not-an-email&phone=555",
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    let errors = &json["data"]["errors"];
    assert_eq!(
        errors["first_name"][0],
        "This field must be at least 4 characters long"
    );
    assert_eq!(errors["last_name"][0], "This field cannot be blank");
    assert_eq!(errors["email"][0], "Invalid email address");
    assert!(errors.get("phone").is_none());
    assert_eq!(json["data"]["reservation"]["guest"]["first_name"], "Jo");

    assert!(app.store.reservations().unwrap().is_empty());
    assert!(app.store.restrictions().unwrap().is_empty());

    // The draft is still usable for a corrected submission.
    let response = client.post_form("/make-reservation", VALID_GUEST).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(app.store.reservations().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Test: a fully booked range flashes "No availability"
// ---------------------------------------------------------------------------

#[tokio::test]
async fn no_availability_flashes_and_redirects_to_search() {
    let app = build_test_app();
    app.book(1, "2030-03-01", "2030-03-10").await;
    app.book(2, "2030-03-05", "2030-03-08").await;
    let mut client = app.client();

    let response = client
        .post_form("/search-availability", "start=2030-03-06&end=2030-03-07")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/search-availability");

    let json = body_json(client.get("/search-availability").await).await;
    assert_eq!(json["data"]["flash"]["message"], "No availability");

    // Flash messages are shown once.
    let json = body_json(client.get("/search-availability").await).await;
    assert!(json["data"]["flash"].is_null());
}

// ---------------------------------------------------------------------------
// Test: adjacent stays do not block a room
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_treats_checkout_day_as_free() {
    let app = build_test_app();
    app.book(1, "2030-04-01", "2030-04-05").await;
    let mut client = app.client();

    let json = body_json(
        client
            .post_form("/search-availability", "start=2030-04-05&end=2030-04-07")
            .await,
    )
    .await;
    let ids: Vec<i64> = json["data"]["rooms"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2]);
}

// ---------------------------------------------------------------------------
// Test: malformed or inverted dates are input errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_search_dates_return_400() {
    let app = build_test_app();
    let mut client = app.client();

    let response = client
        .post_form("/search-availability", "start=2030-05-10&end=2030-05-01")
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = client
        .post_form("/search-availability", "start=tomorrow&end=2030-05-01")
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: single-room JSON availability endpoint
// ---------------------------------------------------------------------------

#[tokio::test]
async fn availability_json_reports_room_state() {
    let app = build_test_app();
    app.book(2, "2030-06-10", "2030-06-15").await;
    let mut client = app.client();

    let response = client
        .post_form(
            "/search-availability-json",
            "start=2030-06-12&end=2030-06-14&room_id=2",
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["ok"], false);
    assert_eq!(json["message"], "");
    assert_eq!(json["room_id"], "2");
    assert_eq!(json["start_date"], "2030-06-12");
    assert_eq!(json["end_date"], "2030-06-14");

    let json = body_json(
        client
            .post_form(
                "/search-availability-json",
                "start=2030-06-15&end=2030-06-20&room_id=2",
            )
            .await,
    )
    .await;
    assert_eq!(json["ok"], true);
}

#[tokio::test]
async fn availability_json_rejects_bad_input() {
    let app = build_test_app();
    let mut client = app.client();

    let response = client
        .post_form(
            "/search-availability-json",
            "start=2030-06-12&end=2030-06-14&room_id=abc",
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

    let response = client
        .post_form(
            "/search-availability-json",
            "start=2030-06-12&end=not-a-date&room_id=1",
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: steps that need a draft redirect home without one
// ---------------------------------------------------------------------------

#[tokio::test]
async fn steps_without_draft_redirect_home_with_flash() {
    let app = build_test_app();
    let mut client = app.client();

    for uri in ["/choose-room/1", "/make-reservation", "/reservation-summary"] {
        let response = client.get(uri).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), "/", "{uri}");
    }

    let response = client.post_form("/make-reservation", VALID_GUEST).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(app.store.reservations().unwrap().is_empty());

    let json = body_json(client.get("/").await).await;
    assert_eq!(json["data"]["flash"]["kind"], "error");
}

#[tokio::test]
async fn choosing_unknown_room_returns_404() {
    let app = build_test_app();
    let mut client = app.client();

    client
        .post_form("/search-availability", "start=2030-07-01&end=2030-07-02")
        .await;
    let response = client.get("/choose-room/99").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_room_id_returns_json_400() {
    let app = build_test_app();
    let mut client = app.client();

    client
        .post_form("/search-availability", "start=2030-07-01&end=2030-07-02")
        .await;
    let response = client.get("/choose-room/abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "Invalid room id 'abc'");
}

#[tokio::test]
async fn committed_booking_cannot_change_room() {
    let app = build_test_app();
    let mut client = app.client();

    client
        .post_form("/search-availability", "start=2030-07-01&end=2030-07-03")
        .await;
    client.get("/choose-room/1").await;
    let response = client.post_form("/make-reservation", VALID_GUEST).await;
    assert_eq!(location(&response), "/reservation-summary");

    let response = client.get("/choose-room/2").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    // Resubmitting the form must not book a second time.
    let response = client.post_form("/make-reservation", VALID_GUEST).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let reservations = app.store.reservations().unwrap();
    assert_eq!(reservations.len(), 1);
    assert_eq!(reservations[0].room_id, 1);

    let response = client.get("/reservation-summary").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["reservation"]["room_id"], 1);
    assert_eq!(json["data"]["reservation"]["room_name"], "General's Quarters");
    assert_eq!(json["data"]["reservation"]["reservation_id"], reservations[0].id);
}

// ---------------------------------------------------------------------------
// Test: direct booking links
// ---------------------------------------------------------------------------

#[tokio::test]
async fn book_room_link_starts_draft_with_room() {
    let app = build_test_app();
    let mut client = app.client();

    let response = client
        .get("/book-room?id=2&start=2030-08-01&end=2030-08-04")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/make-reservation");

    let json = body_json(client.get("/make-reservation").await).await;
    assert_eq!(json["data"]["reservation"]["room_name"], "Major's Suite");
    assert_eq!(json["data"]["end_date"], "2030-08-04");
}

#[tokio::test]
async fn book_room_accepts_short_query_names() {
    let app = build_test_app();
    let mut client = app.client();

    let response = client.get("/book-room?id=1&s=2030-08-01&e=2030-08-02").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/make-reservation");
}

#[tokio::test]
async fn book_room_on_taken_room_flashes_and_writes_no_draft() {
    let app = build_test_app();
    app.book(1, "2030-09-01", "2030-09-05").await;
    let mut client = app.client();

    let response = client
        .get("/book-room?id=1&start=2030-09-03&end=2030-09-06")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/search-availability");
    assert_eq!(app.drafts.draft_count().unwrap(), 0);

    let json = body_json(client.get("/search-availability").await).await;
    assert_eq!(json["data"]["flash"]["kind"], "error");
}

// ---------------------------------------------------------------------------
// Test: losing the race for a room surfaces as 409
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_after_room_was_taken_returns_409() {
    let app = build_test_app();
    let mut client = app.client();

    client
        .post_form("/search-availability", "start=2030-10-01&end=2030-10-03")
        .await;
    client.get("/choose-room/1").await;

    // Someone else books the same room in the meantime.
    app.book(1, "2030-10-02", "2030-10-04").await;

    let response = client.post_form("/make-reservation", VALID_GUEST).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
    assert_eq!(app.store.reservations().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Test: sessions are isolated from each other
// ---------------------------------------------------------------------------

#[tokio::test]
async fn drafts_do_not_leak_between_sessions() {
    let app = build_test_app();
    let mut alice = app.client();
    let mut bob = app.client();

    alice
        .post_form("/search-availability", "start=2030-11-01&end=2030-11-03")
        .await;
    alice.get("/choose-room/1").await;

    let response = bob.get("/make-reservation").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_ne!(alice.cookie, bob.cookie);

    let response = alice.get("/make-reservation").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn tampered_session_cookie_is_replaced() {
    let app = build_test_app();
    let mut client = app.client();
    client.cookie = Some("booking_session=not-a-uuid".into());

    let response = client.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let issued = set_cookie(&response).expect("a fresh session cookie");
    assert!(issued.starts_with("booking_session="));
    assert_ne!(issued, "booking_session=not-a-uuid");
}

#[tokio::test]
async fn known_session_is_not_reissued() {
    let app = build_test_app();
    let mut client = app.client();

    let first = client.get("/").await;
    assert!(set_cookie(&first).is_some());

    let second = client.get("/").await;
    assert!(set_cookie(&second).is_none());
}

// ---------------------------------------------------------------------------
// Test: room listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rooms_are_listed_in_id_order() {
    let app = build_test_app();
    let mut client = app.client();

    let json = body_json(client.get("/rooms").await).await;
    assert_eq!(json["data"][0]["room_name"], "General's Quarters");
    assert_eq!(json["data"][1]["room_name"], "Major's Suite");

    let json = body_json(client.get("/rooms/2").await).await;
    assert_eq!(json["data"]["id"], 2);

    let response = client.get("/rooms/42").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}
