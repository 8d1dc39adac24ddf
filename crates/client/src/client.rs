//! Shared HTTP plumbing for every endpoint wrapper.
//!
//! All service modules (`runs`, `wizards`, `auth`, ...) add `impl ApiClient`
//! blocks on top of the request helpers defined here.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use wizplat_core::models::user::TokenPair;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::AuthSession;

/// HTTP client for the wizard platform backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    api_url: String,
    session: AuthSession,
}

impl ApiClient {
    /// Create a client from configuration and an auth session handle.
    pub fn new(config: &ClientConfig, session: AuthSession) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("wizplat/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(http, config.api_url.clone(), session))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(http: reqwest::Client, api_url: String, session: AuthSession) -> Self {
        Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    // ---- request helpers ----

    /// `GET path` and decode the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(Method::GET, path, |req| req).await?;
        Self::parse_response(response).await
    }

    /// `GET path?query` and decode the JSON body.
    pub(crate) async fn get_json_query<Q, T>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::GET, path, |req| req.query(query)).await?;
        Self::parse_response(response).await
    }

    /// Send `body` as JSON with `method` and decode the JSON reply.
    pub(crate) async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(method, path, |req| req.json(body)).await?;
        Self::parse_response(response).await
    }

    /// Body-less request with `method`, decoding the JSON reply.
    pub(crate) async fn call_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
    ) -> Result<T, ApiError> {
        let response = self.send(method, path, |req| req).await?;
        Self::parse_response(response).await
    }

    /// Body-less request with `method`, discarding the reply body.
    pub(crate) async fn call(&self, method: Method, path: &str) -> Result<(), ApiError> {
        let response = self.send(method, path, |req| req).await?;
        Self::check_status(response).await
    }

    /// Send a request with the session's bearer token.
    ///
    /// On `401` the refresh token (if any) is exchanged once and the request
    /// is replayed with the new access token. `build` is called again for the
    /// replay, so it must be side-effect free.
    pub(crate) async fn send<F>(
        &self,
        method: Method,
        path: &str,
        build: F,
    ) -> Result<Response, ApiError>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let response = self.dispatch(method.clone(), path, &build).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        if !self.refresh_session().await {
            return Ok(response);
        }

        tracing::debug!(%method, path, "Replaying request after token refresh");
        self.dispatch(method, path, &build).await
    }

    async fn dispatch<F>(&self, method: Method, path: &str, build: &F) -> Result<Response, ApiError>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let mut request = build(self.http.request(method, self.url(path)));
        if let Some(token) = self.session.access_token() {
            request = request.bearer_auth(token);
        }
        Ok(request.send().await?)
    }

    /// Exchange the refresh token for a new pair.
    ///
    /// Returns `true` when the session now holds fresh tokens. A failed
    /// refresh clears the session so the caller is treated as logged out.
    async fn refresh_session(&self) -> bool {
        let Some(refresh_token) = self.session.refresh_token() else {
            return false;
        };

        let result = self
            .http
            .post(self.url("/auth/refresh"))
            .query(&[("refresh_token", refresh_token.as_str())])
            .send()
            .await;

        let tokens = match result {
            Ok(response) => Self::parse_response::<TokenPair>(response).await,
            Err(e) => Err(ApiError::from(e)),
        };

        match tokens {
            Ok(tokens) => {
                self.session.set_tokens(tokens);
                tracing::info!("Access token refreshed");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed, clearing session");
                self.session.clear();
                false
            }
        }
    }

    // ---- response helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`ApiError::Status`]
    /// containing the status and body text on failure.
    pub(crate) async fn ensure_success(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    pub(crate) async fn parse_response<T: DeserializeOwned>(
        response: Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Assert the response has a success status code, discarding the body.
    pub(crate) async fn check_status(response: Response) -> Result<(), ApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}
