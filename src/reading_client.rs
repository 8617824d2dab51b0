use std::fmt::Debug;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::{NewSubscriber, ReadingSet, SubscriberEmail, ZodiacSign};
use crate::errors::error_chain_fmt;

/// HTTP client for the remote service that owns readings and subscribers.
#[derive(Debug, Clone)]
pub struct ReadingServiceClient {
    http_client: Client,
    base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubscribeNewsletterRequest<'a> {
    name: String,
    email: &'a str,
    zodiac_sign: ZodiacSign,
}

#[derive(Deserialize)]
struct CheckUserResponse {
    exists: bool,
}

impl ReadingServiceClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The service answers with a list of records; only the first one is
    /// used and an empty list means no readings at all.
    #[tracing::instrument(name = "Fetching readings", skip(self))]
    pub async fn fetch_readings(&self) -> Result<ReadingSet, TransportError> {
        let records = self
            .get_readings()
            .await
            .map_err(TransportError::FetchReadings)?;

        Ok(records.into_iter().next().unwrap_or_default())
    }

    #[tracing::instrument(name = "Checking for an existing subscriber", skip(self))]
    pub async fn check_user(&self, email: &SubscriberEmail) -> Result<bool, TransportError> {
        let response = self
            .get_check_user(email)
            .await
            .map_err(TransportError::CheckUser)?;

        Ok(response.exists)
    }

    #[tracing::instrument(
        name = "Registering a newsletter subscriber",
        skip(self, new_subscriber),
        fields(
            subscriber_email = %new_subscriber.email,
            zodiac_sign = %new_subscriber.zodiac_sign,
        )
    )]
    pub async fn subscribe_newsletter(
        &self,
        new_subscriber: &NewSubscriber,
    ) -> Result<(), TransportError> {
        let request_body = SubscribeNewsletterRequest {
            name: new_subscriber.name.title_cased(),
            email: new_subscriber.email.as_ref(),
            zodiac_sign: new_subscriber.zodiac_sign,
        };

        self.http_client
            .post(format!("{}/subscribeNewsletter", self.base_url))
            .json(&request_body)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(TransportError::Subscribe)?;

        Ok(())
    }

    async fn get_readings(&self) -> Result<Vec<ReadingSet>, reqwest::Error> {
        self.http_client
            .get(format!("{}/readings", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    async fn get_check_user(
        &self,
        email: &SubscriberEmail,
    ) -> Result<CheckUserResponse, reqwest::Error> {
        self.http_client
            .get(format!("{}/checkUser", self.base_url))
            .query(&[("email", email.as_ref())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

#[derive(thiserror::Error)]
pub enum TransportError {
    #[error("Failed to fetch readings from the reading service")]
    FetchReadings(#[source] reqwest::Error),
    #[error("Failed to check whether the subscriber already exists")]
    CheckUser(#[source] reqwest::Error),
    #[error("Failed to register the newsletter subscriber")]
    Subscribe(#[source] reqwest::Error),
}

impl Debug for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
