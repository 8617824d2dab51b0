use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::errors::error_chain_fmt;
use crate::workflow::{SubscriptionWorkflow, WorkflowError};

struct Session {
    workflow: SubscriptionWorkflow,
    last_used: Instant,
}

/// In-memory sessions, one workflow each. The lock is only held while a
/// workflow is being read or updated, never across a network call.
/// Sessions untouched for longer than the idle timeout are dropped whenever
/// a new one is opened.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, Session>>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            idle_timeout,
        }
    }

    pub fn insert(&self, workflow: SubscriptionWorkflow) -> Uuid {
        let session_id = Uuid::new_v4();
        let now = Instant::now();
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);

        let before = sessions.len();
        sessions.retain(|_, session| now.duration_since(session.last_used) < self.idle_timeout);
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, "Dropped idle sessions");
        }

        sessions.insert(
            session_id,
            Session {
                workflow,
                last_used: now,
            },
        );
        session_id
    }

    pub fn with_session<R>(
        &self,
        session_id: Uuid,
        f: impl FnOnce(&mut SubscriptionWorkflow) -> Result<R, WorkflowError>,
    ) -> Result<R, SessionError> {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let session = sessions
            .get_mut(&session_id)
            .ok_or(SessionError::NotFound(session_id))?;
        session.last_used = Instant::now();

        Ok(f(&mut session.workflow)?)
    }

    pub fn len(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(thiserror::Error)]
pub enum SessionError {
    #[error("Session {0} does not exist")]
    NotFound(Uuid),
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

impl Debug for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
