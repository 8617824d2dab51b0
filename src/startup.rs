use axum::{
    extract::{FromRef, MatchedPath},
    http::Request,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::configuration::Settings;
use crate::reading_client::ReadingServiceClient;
use crate::routes::{
    check_health, check_sign, create_session, get_session, reload_readings, subscribe,
    update_birth_date, update_email, update_name,
};
use crate::session_store::SessionStore;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub sessions: SessionStore,
    pub reading_client: ReadingServiceClient,
}

pub fn get_app_state(configuration: &Settings) -> Result<AppState, reqwest::Error> {
    Ok(AppState {
        sessions: SessionStore::new(configuration.application.session_idle_timeout()),
        reading_client: configuration.reading_service.client()?,
    })
}

pub async fn run(listener: TcpListener, app_state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, router(app_state)).await
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/:session_id", get(get_session))
        .route("/sessions/:session_id/birth_date", put(update_birth_date))
        .route("/sessions/:session_id/readings", post(reload_readings))
        .route("/sessions/:session_id/check", post(check_sign))
        .route("/sessions/:session_id/name", put(update_name))
        .route("/sessions/:session_id/email", put(update_email))
        .route("/sessions/:session_id/subscription", post(subscribe))
        .with_state(app_state)
        .route("/health_check", get(check_health))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let path = request
                    .extensions()
                    .get::<MatchedPath>()
                    .map(MatchedPath::as_str);
                tracing::info_span!(
                    "Starting HTTP request",
                    method = ?request.method(),
                    path,
                    request_id = %Uuid::new_v4(),
                )
            }),
        )
}
