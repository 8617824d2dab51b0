use axum::extract::{Path, State};
use axum::{Form, Json};
use serde::Deserialize;
use uuid::Uuid;

use super::sessions::{session_view, SessionView};
use crate::reading_client::ReadingServiceClient;
use crate::session_store::{SessionError, SessionStore};
use crate::workflow::DuplicateCheckVerdict;

#[derive(Debug, Deserialize)]
pub struct NameForm {
    name: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailForm {
    email: String,
}

pub async fn update_name(
    State(sessions): State<SessionStore>,
    Path(session_id): Path<Uuid>,
    Form(form): Form<NameForm>,
) -> Result<Json<SessionView>, SessionError> {
    sessions.with_session(session_id, |workflow| workflow.set_name(form.name))?;

    session_view(&sessions, session_id)
}

pub async fn update_email(
    State(sessions): State<SessionStore>,
    Path(session_id): Path<Uuid>,
    Form(form): Form<EmailForm>,
) -> Result<Json<SessionView>, SessionError> {
    sessions.with_session(session_id, |workflow| workflow.set_email(form.email))?;

    session_view(&sessions, session_id)
}

/// Registration is only issued once the duplicate check for the submitted
/// email has come back clear for this very attempt.
#[tracing::instrument(name = "Subscribing to the newsletter", skip(sessions, reading_client))]
pub async fn subscribe(
    State(sessions): State<SessionStore>,
    State(reading_client): State<ReadingServiceClient>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, SessionError> {
    let check = sessions.with_session(session_id, |workflow| workflow.begin_submission())?;
    let result = reading_client.check_user(check.email()).await;
    let verdict = sessions.with_session(session_id, |workflow| {
        workflow.record_duplicate_check(check, result)
    })?;

    if let DuplicateCheckVerdict::Clear(registration) = verdict {
        let result = reading_client
            .subscribe_newsletter(registration.subscriber())
            .await;
        sessions.with_session(session_id, |workflow| {
            workflow.record_registration(registration, result)
        })?;
    }

    session_view(&sessions, session_id)
}
