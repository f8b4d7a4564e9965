//! HTTP API client for the blackjack server.

use anyhow::{Context, Result};
use async_trait::async_trait;
use private_blackjack::{
    Chips, RemoteError, SessionId, SessionSnapshot, SessionStore, SessionSummary,
    session::Operation,
};
use reqwest::{RequestBuilder, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use std::time::{Duration, Instant};

use crate::{
    config::{ClientConfig, Credentials},
    logging,
};

/// Path under the server origin where the game API lives
pub const API_PREFIX: &str = "/api/blackjack";

#[derive(Debug, Serialize)]
struct BetRequest {
    amount: Chips,
}

/// API client for communicating with the blackjack server
///
/// Every request carries the shared Basic credentials.
#[derive(Debug)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    credentials: Credentials,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// A trailing slash on `server_url` is ignored.
    ///
    /// # Errors
    ///
    /// Fails if the underlying HTTP client can't be built.
    pub fn new(server_url: &str, credentials: Credentials, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: format!("{}{API_PREFIX}", server_url.trim_end_matches('/')),
            client,
            credentials,
        })
    }

    /// Create a client from loaded configuration
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::new`].
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(
            &config.server_url,
            config.credentials.clone(),
            config.request_timeout,
        )
    }

    /// Base URL of the game API, prefix included
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(format!("{}{path}", self.base_url))
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{path}", self.base_url))
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
    }

    /// Send `request` and return the body of a successful response.
    ///
    /// A 404 on a call scoped to `session` becomes [`RemoteError::NotFound`].
    async fn send(
        &self,
        request: RequestBuilder,
        session: Option<SessionId>,
    ) -> Result<String, RemoteError> {
        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::Transport(format!("Failed to read response: {e}")))?;

        if status.is_success() {
            return Ok(body);
        }
        match session {
            Some(session) if status == StatusCode::NOT_FOUND => Err(RemoteError::NotFound(session)),
            _ => Err(RemoteError::Rejected {
                status: status.as_u16(),
                message: body,
            }),
        }
    }

    /// Send `request` and decode its JSON body. An empty body reads as `null`.
    async fn call<T: DeserializeOwned>(
        &self,
        operation: Operation,
        request: RequestBuilder,
        session: Option<SessionId>,
    ) -> Result<T, RemoteError> {
        let started = Instant::now();
        let result = self.send(request, session).await.and_then(|body| {
            let body = if body.trim().is_empty() { "null" } else { body.as_str() };
            serde_json::from_str(body).map_err(|e| RemoteError::Decode(e.to_string()))
        });
        log_call(operation, started, &result);
        result
    }
}

fn log_call<T>(operation: Operation, started: Instant, result: &Result<T, RemoteError>) {
    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let operation = operation.to_string();
    match result {
        Ok(_) => logging::log_remote_call(&operation, duration_ms, Ok(())),
        Err(err) => logging::log_remote_call(&operation, duration_ms, Err(&err.to_string())),
    }
}

#[async_trait]
impl SessionStore for ApiClient {
    async fn start_session(&self) -> Result<Option<SessionSnapshot>, RemoteError> {
        self.call(Operation::StartSession, self.post("/start"), None)
            .await
    }

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, RemoteError> {
        let sessions: Option<Vec<SessionSummary>> = self
            .call(Operation::ListSessions, self.get("/sessions"), None)
            .await?;
        Ok(sessions.unwrap_or_default())
    }

    async fn resume_session(
        &self,
        session: SessionId,
    ) -> Result<Option<SessionSnapshot>, RemoteError> {
        let request = self.post(&format!("/{session}/resume"));
        self.call(Operation::ResumeSession, request, Some(session))
            .await
    }

    async fn place_bet(
        &self,
        session: SessionId,
        amount: Chips,
    ) -> Result<Option<SessionSnapshot>, RemoteError> {
        let request = self
            .post(&format!("/{session}/bet"))
            .json(&BetRequest { amount });
        self.call(Operation::PlaceBet, request, Some(session)).await
    }

    async fn hit(&self, session: SessionId) -> Result<Option<SessionSnapshot>, RemoteError> {
        let request = self.post(&format!("/{session}/hit"));
        self.call(Operation::Hit, request, Some(session)).await
    }

    async fn stand(&self, session: SessionId) -> Result<Option<SessionSnapshot>, RemoteError> {
        let request = self.post(&format!("/{session}/stand"));
        self.call(Operation::Stand, request, Some(session)).await
    }

    async fn finish_game(&self, session: SessionId) -> Result<(), RemoteError> {
        let started = Instant::now();
        let request = self.post(&format!("/{session}/finish"));
        let result = self.send(request, Some(session)).await.map(|_| ());
        log_call(Operation::FinishGame, started, &result);
        result
    }
}
