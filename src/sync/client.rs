//! Typed HTTP client for the persistence API.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;

use crate::errors::{AppError, ErrorResponse};
use crate::models::{CredentialsRequest, SeedRecord, SheetDocument, TokenResponse};

#[derive(Debug, Clone)]
pub struct SheetClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl SheetClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:4000`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(20))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => builder,
        }
    }

    /// Register and keep the returned token for later calls.
    pub async fn register(&mut self, email: &str, password: &str) -> Result<TokenResponse, AppError> {
        let res = self
            .client
            .post(self.url("/auth/register"))
            .json(&CredentialsRequest::new(email, password))
            .send()
            .await?;
        let token: TokenResponse = decode(res).await?;
        self.token = Some(token.token.clone());
        Ok(token)
    }

    /// Log in and keep the returned token for later calls.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<TokenResponse, AppError> {
        let res = self
            .client
            .post(self.url("/auth/login"))
            .json(&CredentialsRequest::new(email, password))
            .send()
            .await?;
        let token: TokenResponse = decode(res).await?;
        self.token = Some(token.token.clone());
        Ok(token)
    }

    pub async fn fetch_sheet(&self) -> Result<SheetDocument, AppError> {
        let res = self
            .authorized(self.client.get(self.url("/sheet")))
            .send()
            .await?;
        decode(res).await
    }

    pub async fn put_sheet(&self, document: &SheetDocument) -> Result<SheetDocument, AppError> {
        let res = self
            .authorized(self.client.put(self.url("/sheet")))
            .json(document)
            .send()
            .await?;
        decode(res).await
    }

    pub async fn import_seed(&self, records: &[SeedRecord]) -> Result<SheetDocument, AppError> {
        let res = self
            .authorized(self.client.post(self.url("/sheet/import")))
            .json(records)
            .send()
            .await?;
        decode(res).await
    }
}

/// Decode a success body, or turn an error envelope back into an [`AppError`].
async fn decode<T: DeserializeOwned>(res: reqwest::Response) -> Result<T, AppError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res.json().await?);
    }

    let body = res.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(envelope) => Err(AppError::from_envelope(status, envelope)),
        Err(_) => Err(AppError::Remote(format!("HTTP {}: {}", status, body))),
    }
}
