use reqwest::StatusCode;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::App;

async fn fill_in(app: &App, session_id: &str, name: &str, email: &str) {
    app.put_form(session_id, "name", &[("name", name)]).await;
    app.put_form(session_id, "email", &[("email", email)]).await;
}

#[tokio::test]
async fn subscribe_registers_a_new_subscriber_with_a_title_cased_name() {
    let app = App::new().await;
    app.mount_readings(serde_json::json!([{ "Leo": "text" }])).await;
    app.mount_check_user(false).await;
    Mock::given(method("POST"))
        .and(path("/subscribeNewsletter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&app.reading_server)
        .await;

    let session_id = app.open_form("1990-08-01").await;
    fill_in(&app, &session_id, "jane doe", "jane@stars.com").await;

    let response = app.post_subscription(&session_id).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["state"], "subscribed");
    assert_eq!(
        body["message"],
        "Subscription successful! Check your email for more info."
    );

    let requests = app.reading_server.received_requests().await.unwrap();
    let registration = requests
        .iter()
        .find(|r| r.url.path() == "/subscribeNewsletter")
        .unwrap();
    let payload: serde_json::Value = serde_json::from_slice(&registration.body).unwrap();
    assert_eq!(
        payload,
        serde_json::json!({
            "name": "Jane Doe",
            "email": "jane@stars.com",
            "zodiacSign": "Leo",
        })
    );
}

#[tokio::test]
async fn subscribe_returns_400_and_calls_nothing_for_invalid_fields() {
    let app = App::new().await;
    app.mount_readings(serde_json::json!([{}])).await;
    Mock::given(path("/checkUser"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.reading_server)
        .await;

    let test_cases = [
        ("", "jane@stars.com", "Please enter your name."),
        ("   ", "not-an-email", "Please enter your name."),
        ("jane", "not-an-email", "Please enter a valid email address."),
        ("jane", "", "Please enter a valid email address."),
    ];

    for (name, email, expected_message) in test_cases {
        let session_id = app.open_form("1990-08-01").await;
        fill_in(&app, &session_id, name, email).await;

        let response = app.post_subscription(&session_id).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let message: String = response.json().await.unwrap();
        assert_eq!(message, expected_message);

        let body: serde_json::Value = app.get_session(&session_id).await.json().await.unwrap();
        assert_eq!(body["state"], "form_open");
    }
}

#[tokio::test]
async fn subscribe_stops_at_duplicate_found_for_an_existing_email() {
    let app = App::new().await;
    app.mount_readings(serde_json::json!([{}])).await;
    app.mount_check_user(true).await;
    Mock::given(path("/subscribeNewsletter"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.reading_server)
        .await;

    let session_id = app.open_form("1990-08-01").await;
    fill_in(&app, &session_id, "jane doe", "jane@stars.com").await;

    let body: serde_json::Value = app.post_subscription(&session_id).await.json().await.unwrap();
    assert_eq!(body["state"], "duplicate_found");
    assert_eq!(body["message"], "User with this email already exists.");

    let body: serde_json::Value = app
        .put_form(&session_id, "email", &[("email", "john@stars.com")])
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["state"], "form_open");
    assert!(body["message"].is_null());
    assert_eq!(body["name"], "jane doe");
    assert_eq!(body["zodiac_sign"], "Leo");
}

#[tokio::test]
async fn subscribe_reaches_failed_when_registration_returns_500() {
    let app = App::new().await;
    app.mount_readings(serde_json::json!([{}])).await;
    app.mount_check_user(false).await;
    Mock::given(path("/subscribeNewsletter"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.reading_server)
        .await;

    let session_id = app.open_form("1990-08-01").await;
    fill_in(&app, &session_id, "jane doe", "jane@stars.com").await;

    let response = app.post_subscription(&session_id).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["state"], "failed");
    assert_ne!(
        body["message"],
        "Subscription successful! Check your email for more info."
    );
}

#[tokio::test]
async fn subscribe_reaches_failed_when_the_duplicate_check_is_unreachable() {
    let app = App::new().await;
    app.mount_readings(serde_json::json!([{}])).await;
    Mock::given(path("/checkUser"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&app.reading_server)
        .await;
    Mock::given(path("/subscribeNewsletter"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.reading_server)
        .await;

    let session_id = app.open_form("1990-08-01").await;
    fill_in(&app, &session_id, "jane doe", "jane@stars.com").await;

    let body: serde_json::Value = app.post_subscription(&session_id).await.json().await.unwrap();

    assert_eq!(body["state"], "failed");
}

#[tokio::test]
async fn form_fields_cannot_be_edited_before_the_sign_is_checked() {
    let app = App::new().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{}])))
        .mount(&app.reading_server)
        .await;
    let session_id = app.new_session_id().await;

    let response = app.put_form(&session_id, "name", &[("name", "jane")]).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app.post_subscription(&session_id).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
