//! Wizard template gallery endpoints (`/wizard-templates`).

use reqwest::Method;
use serde::Serialize;
use validator::Validate;
use wizplat_core::models::template::{
    CloneTemplateRequest, CloneTemplateResponse, CreateWizardTemplate, RateTemplate,
    TemplateFilters, TemplateListPage, TemplateRating, TemplateStats, WizardTemplate,
};
use wizplat_core::types::EntityId;

use crate::client::ApiClient;
use crate::error::ApiError;

const BASE: &str = "/wizard-templates";

#[derive(Serialize)]
struct Limit {
    limit: u32,
}

#[derive(Serialize)]
struct Paging {
    skip: u32,
    limit: u32,
}

impl ApiClient {
    pub async fn list_templates(&self, filters: &TemplateFilters) -> Result<TemplateListPage, ApiError> {
        self.get_json_query(BASE, filters).await
    }

    /// Most used templates first.
    pub async fn popular_templates(&self, limit: u32) -> Result<Vec<WizardTemplate>, ApiError> {
        self.get_json_query(&format!("{BASE}/popular"), &Limit { limit })
            .await
    }

    pub async fn get_template(&self, template_id: EntityId) -> Result<WizardTemplate, ApiError> {
        self.get_json(&format!("{BASE}/{template_id}")).await
    }

    pub async fn create_template(
        &self,
        input: &CreateWizardTemplate,
    ) -> Result<WizardTemplate, ApiError> {
        input.validate()?;
        self.send_json(Method::POST, BASE, input).await
    }

    /// Instantiate a template as a new wizard in the builder.
    pub async fn clone_template(
        &self,
        input: &CloneTemplateRequest,
    ) -> Result<CloneTemplateResponse, ApiError> {
        input.validate()?;
        self.send_json(Method::POST, &format!("{BASE}/clone"), input)
            .await
    }

    pub async fn template_ratings(
        &self,
        template_id: EntityId,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<TemplateRating>, ApiError> {
        self.get_json_query(&format!("{BASE}/{template_id}/ratings"), &Paging { skip, limit })
            .await
    }

    /// Create or replace the caller's rating. Ratings outside 1..=5 are
    /// rejected before anything is sent.
    pub async fn rate_template(&self, input: &RateTemplate) -> Result<TemplateRating, ApiError> {
        input.validate()?;
        let path = format!("{BASE}/{}/ratings", input.template_id);
        self.send_json(Method::POST, &path, input).await
    }

    pub async fn template_stats(&self, template_id: EntityId) -> Result<TemplateStats, ApiError> {
        self.get_json(&format!("{BASE}/{template_id}/stats")).await
    }
}
