//! Wizard definition endpoints (`/wizards`).

use reqwest::Method;
use validator::Validate;
use wizplat_core::models::wizard::{
    CreateOptionDependency, CreateWizard, OptionDependency, UpdateWizard, Wizard,
    WizardCategory, WizardFilters, WizardListItem,
};
use wizplat_core::protection::ProtectionStatus;
use wizplat_core::types::EntityId;

use crate::client::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    pub async fn list_wizards(&self, filters: &WizardFilters) -> Result<Vec<WizardListItem>, ApiError> {
        self.get_json_query("/wizards", filters).await
    }

    /// Full wizard definition with nested steps, option sets, options, and
    /// dependency edges.
    pub async fn get_wizard(&self, wizard_id: EntityId) -> Result<Wizard, ApiError> {
        self.get_json(&format!("/wizards/{wizard_id}")).await
    }

    pub async fn list_categories(&self) -> Result<Vec<WizardCategory>, ApiError> {
        self.get_json("/wizards/categories/").await
    }

    pub async fn create_wizard(&self, input: &CreateWizard) -> Result<Wizard, ApiError> {
        input.validate()?;
        self.send_json(Method::POST, "/wizards/", input).await
    }

    pub async fn update_wizard(
        &self,
        wizard_id: EntityId,
        input: &UpdateWizard,
    ) -> Result<Wizard, ApiError> {
        self.send_json(Method::PUT, &format!("/wizards/{wizard_id}"), input)
            .await
    }

    /// Publish or unpublish a wizard.
    pub async fn set_published(&self, wizard_id: EntityId, publish: bool) -> Result<(), ApiError> {
        let response = self
            .send(Method::PUT, &format!("/wizards/{wizard_id}/publish"), |req| {
                req.query(&[("publish", publish)])
            })
            .await?;
        Self::check_status(response).await
    }

    pub async fn delete_wizard(&self, wizard_id: EntityId) -> Result<(), ApiError> {
        self.call(Method::DELETE, &format!("/wizards/{wizard_id}"))
            .await
    }

    // ---- option dependencies ----

    pub async fn option_dependencies(
        &self,
        option_id: EntityId,
    ) -> Result<Vec<OptionDependency>, ApiError> {
        self.get_json(&format!("/wizards/options/{option_id}/dependencies"))
            .await
    }

    pub async fn create_option_dependency(
        &self,
        option_id: EntityId,
        input: &CreateOptionDependency,
    ) -> Result<OptionDependency, ApiError> {
        self.send_json(
            Method::POST,
            &format!("/wizards/options/{option_id}/dependencies"),
            input,
        )
        .await
    }

    pub async fn delete_option_dependency(&self, dependency_id: EntityId) -> Result<(), ApiError> {
        self.call(Method::DELETE, &format!("/wizards/dependencies/{dependency_id}"))
            .await
    }

    // ---- lifecycle ----

    pub async fn protection_status(&self, wizard_id: EntityId) -> Result<ProtectionStatus, ApiError> {
        self.get_json(&format!("/wizards/{wizard_id}/protection-status"))
            .await
    }

    /// Copy a wizard, typically because its stored runs make it read-only.
    pub async fn clone_wizard(
        &self,
        wizard_id: EntityId,
        new_name: &str,
        new_description: Option<&str>,
    ) -> Result<Wizard, ApiError> {
        let response = self
            .send(Method::POST, &format!("/wizards/{wizard_id}/clone"), |req| {
                let req = req.query(&[("new_name", new_name)]);
                match new_description {
                    Some(description) => req.query(&[("new_description", description)]),
                    None => req,
                }
            })
            .await?;
        Self::parse_response(response).await
    }

    pub async fn archive_wizard(&self, wizard_id: EntityId) -> Result<(), ApiError> {
        self.call(Method::POST, &format!("/wizards/{wizard_id}/archive"))
            .await
    }

    pub async fn unarchive_wizard(&self, wizard_id: EntityId) -> Result<(), ApiError> {
        self.call(Method::POST, &format!("/wizards/{wizard_id}/unarchive"))
            .await
    }
}
