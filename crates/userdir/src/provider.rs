//! Name-based inference provider.
//!
//! [`InferenceProvider`] is what the orchestrator consumes; the HTTP
//! implementation speaks the nationalize.io / agify.io / genderize.io JSON
//! shapes, each endpoint taking the person's name as `?name=`.

use crate::config::InferenceConfig;
use crate::error::{DirectoryError, DirectoryResult};
use crate::model::Gender;
use crate::reducer::CandidateGuess;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::future::Future;
use tracing::{debug, instrument};

const COUNTRY: &str = "nationalize";
const AGE: &str = "agify";
const GENDER: &str = "genderize";

/// Inference of personal attributes from a first name.
pub trait InferenceProvider: Send + Sync {
    /// Scored country guesses, in the order the provider returned them.
    fn countries(
        &self,
        name: &str,
    ) -> impl Future<Output = DirectoryResult<Vec<CandidateGuess>>> + Send;

    /// Estimated age, `None` if the provider has no estimate.
    fn age(&self, name: &str) -> impl Future<Output = DirectoryResult<Option<i32>>> + Send;

    /// Estimated gender, `None` if the provider has no estimate.
    fn gender(&self, name: &str) -> impl Future<Output = DirectoryResult<Option<Gender>>> + Send;
}

#[derive(Debug, Deserialize)]
struct CountryResponse {
    #[serde(default)]
    country: Vec<CountryProbability>,
}

#[derive(Debug, Deserialize)]
struct CountryProbability {
    country_id: String,
    probability: f64,
}

#[derive(Debug, Deserialize)]
struct AgeResponse {
    age: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct GenderResponse {
    gender: Option<String>,
}

impl From<CountryResponse> for Vec<CandidateGuess> {
    fn from(resp: CountryResponse) -> Self {
        resp.country
            .into_iter()
            .map(|c| CandidateGuess::new(c.country_id, c.probability))
            .collect()
    }
}

fn parse_gender(resp: GenderResponse) -> DirectoryResult<Option<Gender>> {
    resp.gender
        .map(|label| {
            label
                .parse::<Gender>()
                .map_err(|e| DirectoryError::provider(GENDER, e.to_string()))
        })
        .transpose()
}

fn parse_age(resp: AgeResponse) -> DirectoryResult<Option<i32>> {
    match resp.age {
        Some(age) if age < 0 => Err(DirectoryError::provider(
            AGE,
            format!("negative age estimate {age}"),
        )),
        other => Ok(other),
    }
}

fn status_message(status: StatusCode, body: Result<String, impl fmt::Display>) -> String {
    match body {
        Ok(text) => format!("status {status}: {text}"),
        Err(e) => format!("status {status}: <unreadable body: {e}>"),
    }
}

/// [`InferenceProvider`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpInferenceProvider {
    client: Client,
    country_url: String,
    age_url: String,
    gender_url: String,
}

impl HttpInferenceProvider {
    pub fn new(config: &InferenceConfig) -> DirectoryResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| DirectoryError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            country_url: config.country_url.clone(),
            age_url: config.age_url.clone(),
            gender_url: config.gender_url.clone(),
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        provider: &'static str,
        url: &str,
        name: &str,
    ) -> DirectoryResult<T> {
        debug!(provider, url, "requesting inference");

        let response = self
            .client
            .get(url)
            .query(&[("name", name)])
            .send()
            .await
            .map_err(|e| {
                DirectoryError::provider(provider, format!("failed to send request: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await;
            return Err(DirectoryError::provider(provider, status_message(status, body)));
        }

        response.json().await.map_err(|e| {
            DirectoryError::provider(provider, format!("failed to parse response: {e}"))
        })
    }
}

impl InferenceProvider for HttpInferenceProvider {
    #[instrument(skip(self))]
    async fn countries(&self, name: &str) -> DirectoryResult<Vec<CandidateGuess>> {
        let resp: CountryResponse = self.fetch(COUNTRY, &self.country_url, name).await?;
        Ok(resp.into())
    }

    #[instrument(skip(self))]
    async fn age(&self, name: &str) -> DirectoryResult<Option<i32>> {
        let resp: AgeResponse = self.fetch(AGE, &self.age_url, name).await?;
        parse_age(resp)
    }

    #[instrument(skip(self))]
    async fn gender(&self, name: &str) -> DirectoryResult<Option<Gender>> {
        let resp: GenderResponse = self.fetch(GENDER, &self.gender_url, name).await?;
        parse_gender(resp)
    }
}
