use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::ZodiacSign;
use crate::reading_client::ReadingServiceClient;
use crate::session_store::{SessionError, SessionStore};
use crate::workflow::{SubscriptionWorkflow, WorkflowError};

/// What the form needs to render one session.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub state: &'static str,
    pub zodiac_sign: Option<ZodiacSign>,
    pub reading: Option<String>,
    pub can_check: bool,
    pub name: String,
    pub email: String,
    pub message: Option<&'static str>,
}

impl SessionView {
    pub fn new(session_id: Uuid, workflow: &SubscriptionWorkflow) -> Self {
        let state = workflow.state();
        Self {
            session_id,
            state: state.as_str(),
            zodiac_sign: state.zodiac_sign(),
            reading: workflow.reading().map(str::to_string),
            can_check: workflow.can_check(),
            name: workflow.name().to_string(),
            email: workflow.email().to_string(),
            message: state.message(),
        }
    }
}

pub(crate) fn session_view(
    sessions: &SessionStore,
    session_id: Uuid,
) -> Result<Json<SessionView>, SessionError> {
    sessions
        .with_session(session_id, |workflow| {
            Ok(SessionView::new(session_id, workflow))
        })
        .map(Json)
}

#[tracing::instrument(
    name = "Opening a new session",
    skip(sessions, reading_client),
    fields(session_id = tracing::field::Empty)
)]
pub async fn create_session(
    State(sessions): State<SessionStore>,
    State(reading_client): State<ReadingServiceClient>,
) -> Result<(StatusCode, Json<SessionView>), SessionError> {
    let mut workflow = SubscriptionWorkflow::new();
    workflow.load_readings(&reading_client).await;

    let session_id = sessions.insert(workflow);
    tracing::Span::current().record("session_id", &tracing::field::display(&session_id));

    Ok((StatusCode::CREATED, session_view(&sessions, session_id)?))
}

pub async fn get_session(
    State(sessions): State<SessionStore>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, SessionError> {
    session_view(&sessions, session_id)
}

impl IntoResponse for SessionError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            SessionError::NotFound(_) => StatusCode::NOT_FOUND,
            SessionError::Workflow(WorkflowError::Validation(_)) => StatusCode::BAD_REQUEST,
            SessionError::Workflow(
                WorkflowError::InvalidTransition { .. }
                | WorkflowError::ReadingsNotLoaded
                | WorkflowError::SubmissionInProgress
                | WorkflowError::StaleResponse,
            ) => {
                tracing::warn!("{:?}", self);
                StatusCode::CONFLICT
            }
        };

        (status, Json(self.to_string())).into_response()
    }
}
