use reqwest::StatusCode;
use uuid::Uuid;
use wiremock::{matchers::any, Mock, ResponseTemplate};

use crate::helpers::App;

#[tokio::test]
async fn new_session_loads_readings_once_and_starts_idle() {
    let app = App::new().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{}])))
        .expect(1)
        .mount(&app.reading_server)
        .await;

    let response = app.post_sessions().await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["state"], "idle");
    assert_eq!(body["can_check"], false);
    assert!(body["zodiac_sign"].is_null());
}

#[tokio::test]
async fn check_becomes_available_once_a_date_is_entered() {
    let app = App::new().await;
    app.mount_readings(serde_json::json!([{ "Leo": "text" }])).await;
    let session_id = app.new_session_id().await;

    let response = app
        .put_form(&session_id, "birth_date", &[("birth_date", "1990-08-01")])
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["can_check"], true);
}

#[tokio::test]
async fn check_is_unavailable_when_the_initial_load_failed() {
    let app = App::new().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.reading_server)
        .await;
    let session_id = app.new_session_id().await;

    let response = app
        .put_form(&session_id, "birth_date", &[("birth_date", "1990-08-01")])
        .await;

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["can_check"], false);
}

#[tokio::test]
async fn check_returns_409_when_the_initial_load_failed() {
    let app = App::new().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.reading_server)
        .await;
    let session_id = app.new_session_id().await;
    app.put_form(&session_id, "birth_date", &[("birth_date", "1990-08-01")])
        .await;

    let response = app.post_check(&session_id).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = app.get_session(&session_id).await.json().await.unwrap();
    assert_eq!(body["state"], "idle");
    assert!(body["zodiac_sign"].is_null());
}

#[tokio::test]
async fn reloading_the_readings_makes_check_available_again() {
    let app = App::new().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&app.reading_server)
        .await;
    app.mount_readings(serde_json::json!([{ "Leo": "text" }])).await;
    let session_id = app.new_session_id().await;
    app.put_form(&session_id, "birth_date", &[("birth_date", "1990-08-01")])
        .await;

    let response = app.post_readings(&session_id).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["can_check"], true);
    assert_eq!(app.post_check(&session_id).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn reloading_an_unknown_session_returns_404() {
    let app = App::new().await;

    let response = app.post_readings(&Uuid::new_v4().to_string()).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn check_shows_the_reading_for_the_computed_sign() {
    let app = App::new().await;
    app.mount_readings(serde_json::json!([{ "Leo": "text" }])).await;

    let session_id = app.open_form("1990-08-01").await;

    let body: serde_json::Value = app.get_session(&session_id).await.json().await.unwrap();
    assert_eq!(body["state"], "form_open");
    assert_eq!(body["zodiac_sign"], "Leo");
    assert_eq!(body["reading"], "text");
}

#[tokio::test]
async fn check_shows_nothing_when_the_sign_has_no_reading() {
    let app = App::new().await;
    app.mount_readings(serde_json::json!([{ "Leo": "text" }])).await;

    let session_id = app.open_form("1990-09-01").await;

    let body: serde_json::Value = app.get_session(&session_id).await.json().await.unwrap();
    assert_eq!(body["zodiac_sign"], "Virgo");
    assert!(body["reading"].is_null());
}

#[tokio::test]
async fn check_refreshes_the_readings() {
    let app = App::new().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{}])))
        .expect(2)
        .mount(&app.reading_server)
        .await;

    app.open_form("1990-08-01").await;
}

#[tokio::test]
async fn check_returns_400_for_an_empty_date() {
    let app = App::new().await;
    app.mount_readings(serde_json::json!([{}])).await;
    let session_id = app.new_session_id().await;

    let response = app.post_check(&session_id).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let message: String = response.json().await.unwrap();
    assert_eq!(message, "Please enter a valid date of birth.");

    let body: serde_json::Value = app.get_session(&session_id).await.json().await.unwrap();
    assert_eq!(body["state"], "idle");
}

#[tokio::test]
async fn check_returns_409_once_the_sign_is_computed() {
    let app = App::new().await;
    app.mount_readings(serde_json::json!([{}])).await;
    let session_id = app.open_form("1990-08-01").await;

    let response = app.post_check(&session_id).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_session_returns_404() {
    let app = App::new().await;

    let response = app.get_session(&Uuid::new_v4().to_string()).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
