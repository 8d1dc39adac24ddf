//! Authentication endpoints.

use reqwest::Method;
use validator::Validate;
use wizplat_core::models::user::{ChangePassword, RegisterUser, TokenPair, User};

use crate::client::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// Log in with username and password and store the tokens in the session.
    ///
    /// The backend expects an OAuth2 password form, not JSON.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, ApiError> {
        let response = self
            .send(Method::POST, "/auth/login", |req| {
                req.form(&[("username", username), ("password", password)])
            })
            .await?;
        let tokens: TokenPair = Self::parse_response(response).await?;
        self.session().set_tokens(tokens);

        let user = self.current_user().await?;
        tracing::info!(user_id = %user.id, username = %user.username, "Logged in");
        Ok(user)
    }

    /// Forget the session's tokens. The backend keeps no logout state.
    pub fn logout(&self) {
        self.session().clear();
        tracing::info!("Logged out");
    }

    /// `GET /auth/me`.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        if !self.session().is_authenticated() {
            return Err(ApiError::NotAuthenticated);
        }
        self.get_json("/auth/me").await
    }

    pub async fn register(&self, input: &RegisterUser) -> Result<User, ApiError> {
        input.validate()?;
        self.send_json(Method::POST, "/auth/register", input).await
    }

    pub async fn change_password(&self, input: &ChangePassword) -> Result<(), ApiError> {
        input.validate()?;
        let response = self
            .send(Method::PUT, "/auth/change-password", |req| req.json(input))
            .await?;
        Self::check_status(response).await
    }
}
