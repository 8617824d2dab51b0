//! Session state machine behind the sign check and newsletter sign-up form.
//!
//! Every transition that needs the reading service hands out a ticket. The
//! caller performs the request with the ticket's data and feeds the result
//! back; results for tickets the session has moved past are rejected with
//! [`WorkflowError::StaleResponse`].

use std::fmt::Debug;

use crate::domain::{
    BirthDate, InvalidInputError, NewSubscriber, ReadingSet, SubscriberEmail, SubscriberName,
    ZodiacSign,
};
use crate::errors::error_chain_fmt;
use crate::reading_client::{ReadingServiceClient, TransportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    SignComputed(ZodiacSign),
    FormOpen(ZodiacSign),
    Submitting(ZodiacSign),
    DuplicateFound(ZodiacSign),
    Subscribed(ZodiacSign),
    Failed(ZodiacSign),
}

impl WorkflowState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "idle",
            WorkflowState::SignComputed(_) => "sign_computed",
            WorkflowState::FormOpen(_) => "form_open",
            WorkflowState::Submitting(_) => "submitting",
            WorkflowState::DuplicateFound(_) => "duplicate_found",
            WorkflowState::Subscribed(_) => "subscribed",
            WorkflowState::Failed(_) => "failed",
        }
    }

    pub fn zodiac_sign(&self) -> Option<ZodiacSign> {
        match self {
            WorkflowState::Idle => None,
            WorkflowState::SignComputed(sign)
            | WorkflowState::FormOpen(sign)
            | WorkflowState::Submitting(sign)
            | WorkflowState::DuplicateFound(sign)
            | WorkflowState::Subscribed(sign)
            | WorkflowState::Failed(sign) => Some(*sign),
        }
    }

    /// Outcome message shown above the subscription form.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            WorkflowState::DuplicateFound(_) => Some("User with this email already exists."),
            WorkflowState::Subscribed(_) => {
                Some("Subscription successful! Check your email for more info.")
            }
            WorkflowState::Failed(_) => Some("Subscription failed. Please try again."),
            _ => None,
        }
    }

    fn accepts_input(&self) -> bool {
        matches!(
            self,
            WorkflowState::FormOpen(_)
                | WorkflowState::Submitting(_)
                | WorkflowState::DuplicateFound(_)
                | WorkflowState::Failed(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingsStatus {
    Loading,
    Loaded,
    Unavailable,
}

#[derive(Debug)]
pub struct ReadingsFetch {
    generation: u64,
}

#[derive(Debug)]
pub struct DuplicateCheck {
    generation: u64,
    subscriber: NewSubscriber,
}

impl DuplicateCheck {
    pub fn email(&self) -> &SubscriberEmail {
        &self.subscriber.email
    }
}

/// Only obtainable from a duplicate check that came back clear.
#[derive(Debug)]
pub struct Registration {
    generation: u64,
    subscriber: NewSubscriber,
}

impl Registration {
    pub fn subscriber(&self) -> &NewSubscriber {
        &self.subscriber
    }
}

#[derive(Debug)]
pub enum DuplicateCheckVerdict {
    Duplicate,
    Clear(Registration),
    Failed,
}

#[derive(Debug)]
pub struct SubscriptionWorkflow {
    state: WorkflowState,
    readings: ReadingSet,
    readings_status: ReadingsStatus,
    birth_date: String,
    name: String,
    email: String,
    generation: u64,
}

impl Default for SubscriptionWorkflow {
    fn default() -> Self {
        Self {
            state: WorkflowState::Idle,
            readings: ReadingSet::default(),
            readings_status: ReadingsStatus::Loading,
            birth_date: String::new(),
            name: String::new(),
            email: String::new(),
            generation: 0,
        }
    }
}

impl SubscriptionWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn readings(&self) -> &ReadingSet {
        &self.readings
    }

    pub fn readings_status(&self) -> ReadingsStatus {
        self.readings_status
    }

    pub fn birth_date(&self) -> &str {
        &self.birth_date
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// The reading for the computed sign, if the current snapshot has one.
    pub fn reading(&self) -> Option<&str> {
        self.state
            .zodiac_sign()
            .and_then(|sign| self.readings.reading_for(sign))
    }

    /// Whether the "Check" action is available.
    pub fn can_check(&self) -> bool {
        matches!(
            self.state,
            WorkflowState::Idle | WorkflowState::SignComputed(_)
        ) && self.readings_status == ReadingsStatus::Loaded
            && BirthDate::parse(&self.birth_date).is_ok()
    }

    /// Applies the result of the fetch issued when the session was opened.
    /// A failed load may be retried until a snapshot has been loaded.
    pub fn complete_initial_load(&mut self, result: Result<ReadingSet, TransportError>) {
        if self.readings_status == ReadingsStatus::Loaded {
            tracing::debug!("Discarding initial readings, the session already has a snapshot");
            return;
        }

        match result {
            Ok(readings) => {
                self.readings = readings;
                self.readings_status = ReadingsStatus::Loaded;
            }
            Err(error) => {
                tracing::error!(error.cause_chain = ?error, "Failed to load the initial readings");
                self.readings_status = ReadingsStatus::Unavailable;
            }
        }
    }

    pub fn set_birth_date(&mut self, birth_date: String) -> Result<(), WorkflowError> {
        if self.state != WorkflowState::Idle {
            return Err(self.invalid_transition("set_birth_date"));
        }
        self.birth_date = birth_date;
        Ok(())
    }

    /// Computes the sign and asks for a fresh readings snapshot. Repeating
    /// the check while the previous fetch is outstanding abandons that fetch
    /// and keeps the computed sign.
    #[tracing::instrument(name = "Computing the zodiac sign", skip(self))]
    pub fn begin_check(&mut self) -> Result<ReadingsFetch, WorkflowError> {
        let sign = match self.state {
            WorkflowState::Idle => {
                if self.readings_status != ReadingsStatus::Loaded {
                    return Err(WorkflowError::ReadingsNotLoaded);
                }

                let birth_date =
                    BirthDate::parse(&self.birth_date).map_err(ValidationError::BirthDate)?;
                let sign = ZodiacSign::from(&birth_date);
                tracing::info!(zodiac_sign = %sign, "Zodiac sign computed");
                sign
            }
            WorkflowState::SignComputed(sign) => sign,
            _ => return Err(self.invalid_transition("check")),
        };

        self.state = WorkflowState::SignComputed(sign);
        Ok(ReadingsFetch {
            generation: self.next_generation(),
        })
    }

    /// Opens the subscription form whatever the fetch outcome. A failed
    /// refresh keeps the previous snapshot.
    pub fn complete_check(
        &mut self,
        fetch: ReadingsFetch,
        result: Result<ReadingSet, TransportError>,
    ) -> Result<(), WorkflowError> {
        let WorkflowState::SignComputed(sign) = self.state else {
            return Err(WorkflowError::StaleResponse);
        };
        self.ensure_current(fetch.generation)?;

        match result {
            Ok(readings) => {
                self.readings = readings;
                self.readings_status = ReadingsStatus::Loaded;
            }
            Err(error) => {
                tracing::error!(error.cause_chain = ?error, "Failed to refresh the readings");
            }
        }

        self.state = WorkflowState::FormOpen(sign);
        Ok(())
    }

    pub fn set_name(&mut self, name: String) -> Result<(), WorkflowError> {
        if !self.state.accepts_input() {
            return Err(self.invalid_transition("set_name"));
        }
        self.name = name;
        Ok(())
    }

    /// Editing the email clears a duplicate or failed outcome and abandons
    /// any submission still in flight.
    pub fn set_email(&mut self, email: String) -> Result<(), WorkflowError> {
        if !self.state.accepts_input() {
            return Err(self.invalid_transition("set_email"));
        }
        self.email = email;

        if let WorkflowState::Submitting(sign)
        | WorkflowState::DuplicateFound(sign)
        | WorkflowState::Failed(sign) = self.state
        {
            self.state = WorkflowState::FormOpen(sign);
            self.next_generation();
        }
        Ok(())
    }

    /// Validates the form and starts the duplicate-account check. Name is
    /// checked before email; neither failure changes the state.
    #[tracing::instrument(name = "Submitting the subscription form", skip(self))]
    pub fn begin_submission(&mut self) -> Result<DuplicateCheck, WorkflowError> {
        let sign = match self.state {
            WorkflowState::FormOpen(sign)
            | WorkflowState::DuplicateFound(sign)
            | WorkflowState::Failed(sign) => sign,
            WorkflowState::Submitting(_) => return Err(WorkflowError::SubmissionInProgress),
            _ => return Err(self.invalid_transition("submit")),
        };

        let name = SubscriberName::parse(self.name.clone()).map_err(ValidationError::Name)?;
        let email = SubscriberEmail::parse(self.email.clone()).map_err(ValidationError::Email)?;

        self.state = WorkflowState::Submitting(sign);
        Ok(DuplicateCheck {
            generation: self.next_generation(),
            subscriber: NewSubscriber {
                name,
                email,
                zodiac_sign: sign,
            },
        })
    }

    pub fn record_duplicate_check(
        &mut self,
        check: DuplicateCheck,
        result: Result<bool, TransportError>,
    ) -> Result<DuplicateCheckVerdict, WorkflowError> {
        let sign = self.ensure_submitting(check.generation)?;

        match result {
            Ok(true) => {
                tracing::info!("A subscriber with this email already exists");
                self.state = WorkflowState::DuplicateFound(sign);
                Ok(DuplicateCheckVerdict::Duplicate)
            }
            Ok(false) => Ok(DuplicateCheckVerdict::Clear(Registration {
                generation: check.generation,
                subscriber: check.subscriber,
            })),
            Err(error) => {
                tracing::error!(error.cause_chain = ?error, "Duplicate check failed");
                self.state = WorkflowState::Failed(sign);
                Ok(DuplicateCheckVerdict::Failed)
            }
        }
    }

    pub fn record_registration(
        &mut self,
        registration: Registration,
        result: Result<(), TransportError>,
    ) -> Result<WorkflowState, WorkflowError> {
        let sign = self.ensure_submitting(registration.generation)?;

        match result {
            Ok(()) => {
                tracing::info!("New subscriber registered");
                self.state = WorkflowState::Subscribed(sign);
                self.name.clear();
                self.email.clear();
            }
            Err(error) => {
                tracing::error!(error.cause_chain = ?error, "Registration failed");
                self.state = WorkflowState::Failed(sign);
            }
        }
        Ok(self.state)
    }

    pub async fn load_readings(&mut self, client: &ReadingServiceClient) {
        let result = client.fetch_readings().await;
        self.complete_initial_load(result);
    }

    /// Runs the "Check" action to completion.
    pub async fn check(
        &mut self,
        client: &ReadingServiceClient,
    ) -> Result<ZodiacSign, WorkflowError> {
        let fetch = self.begin_check()?;
        let result = client.fetch_readings().await;
        self.complete_check(fetch, result)?;

        self.state
            .zodiac_sign()
            .ok_or(WorkflowError::StaleResponse)
    }

    /// Runs a form submission to completion: validation, duplicate check,
    /// then registration when the check came back clear.
    pub async fn submit(
        &mut self,
        client: &ReadingServiceClient,
    ) -> Result<WorkflowState, WorkflowError> {
        let check = self.begin_submission()?;
        let result = client.check_user(check.email()).await;

        match self.record_duplicate_check(check, result)? {
            DuplicateCheckVerdict::Clear(registration) => {
                let result = client.subscribe_newsletter(registration.subscriber()).await;
                self.record_registration(registration, result)
            }
            DuplicateCheckVerdict::Duplicate | DuplicateCheckVerdict::Failed => Ok(self.state),
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn ensure_current(&self, generation: u64) -> Result<(), WorkflowError> {
        if generation != self.generation {
            tracing::warn!(
                generation,
                current_generation = self.generation,
                "Discarding a response for an abandoned request"
            );
            return Err(WorkflowError::StaleResponse);
        }
        Ok(())
    }

    fn ensure_submitting(&self, generation: u64) -> Result<ZodiacSign, WorkflowError> {
        self.ensure_current(generation)?;
        match self.state {
            WorkflowState::Submitting(sign) => Ok(sign),
            _ => Err(WorkflowError::StaleResponse),
        }
    }

    fn invalid_transition(&self, action: &'static str) -> WorkflowError {
        WorkflowError::InvalidTransition {
            action,
            state: self.state.as_str(),
        }
    }
}

#[derive(thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a valid date of birth.")]
    BirthDate(#[source] InvalidInputError),
    #[error("Please enter your name.")]
    Name(String),
    #[error("Please enter a valid email address.")]
    Email(String),
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::BirthDate(_) => "birth_date",
            ValidationError::Name(_) => "name",
            ValidationError::Email(_) => "email",
        }
    }
}

impl Debug for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Cannot {action} while the session is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
    #[error("Readings are not loaded yet")]
    ReadingsNotLoaded,
    #[error("A subscription attempt is already in progress")]
    SubmissionInProgress,
    #[error("The session moved on before the response arrived")]
    StaleResponse,
}

impl Debug for WorkflowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
