//! User administration endpoints. The backend only serves these to super
//! admins.

use reqwest::Method;
use wizplat_core::models::user::{User, UserFilters};
use wizplat_core::navigation::Role;
use wizplat_core::types::EntityId;

use crate::client::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    pub async fn list_users(&self, filters: &UserFilters) -> Result<Vec<User>, ApiError> {
        self.get_json_query("/users", filters).await
    }

    pub async fn get_user(&self, user_id: EntityId) -> Result<User, ApiError> {
        self.get_json(&format!("/users/{user_id}")).await
    }

    pub async fn change_user_role(&self, user_id: EntityId, role: Role) -> Result<(), ApiError> {
        let response = self
            .send(Method::PUT, &format!("/users/{user_id}/role"), |req| {
                req.query(&[("role_name", role.as_str())])
            })
            .await?;
        Self::check_status(response).await?;
        tracing::info!(user_id = %user_id, role = role.as_str(), "User role changed");
        Ok(())
    }

    /// Deactivate a user. The account is kept for audit purposes.
    pub async fn deactivate_user(&self, user_id: EntityId) -> Result<(), ApiError> {
        self.call(Method::DELETE, &format!("/users/{user_id}")).await
    }
}
