use axum::extract::{Path, State};
use axum::{Form, Json};
use serde::Deserialize;
use uuid::Uuid;

use super::sessions::{session_view, SessionView};
use crate::reading_client::ReadingServiceClient;
use crate::session_store::{SessionError, SessionStore};

#[derive(Debug, Deserialize)]
pub struct BirthDateForm {
    birth_date: String,
}

pub async fn update_birth_date(
    State(sessions): State<SessionStore>,
    Path(session_id): Path<Uuid>,
    Form(form): Form<BirthDateForm>,
) -> Result<Json<SessionView>, SessionError> {
    sessions.with_session(session_id, |workflow| {
        workflow.set_birth_date(form.birth_date)
    })?;

    session_view(&sessions, session_id)
}

#[tracing::instrument(name = "Checking the zodiac sign", skip(sessions, reading_client))]
pub async fn check_sign(
    State(sessions): State<SessionStore>,
    State(reading_client): State<ReadingServiceClient>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, SessionError> {
    let fetch = sessions.with_session(session_id, |workflow| workflow.begin_check())?;
    let result = reading_client.fetch_readings().await;
    sessions.with_session(session_id, |workflow| workflow.complete_check(fetch, result))?;

    session_view(&sessions, session_id)
}

/// Retries the initial readings load, e.g. after the service was unreachable
/// when the session was opened.
#[tracing::instrument(name = "Reloading the readings", skip(sessions, reading_client))]
pub async fn reload_readings(
    State(sessions): State<SessionStore>,
    State(reading_client): State<ReadingServiceClient>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, SessionError> {
    sessions.with_session(session_id, |_| Ok(()))?;
    let result = reading_client.fetch_readings().await;
    sessions.with_session(session_id, |workflow| {
        workflow.complete_initial_load(result);
        Ok(())
    })?;

    session_view(&sessions, session_id)
}
