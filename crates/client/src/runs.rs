//! Wizard run endpoints (`/wizard-runs`).
//!
//! Runs, their step and option-set responses, share links, and comparisons.

use reqwest::Method;
use serde::Serialize;
use validator::Validate;
use wizplat_core::models::run::{
    CompleteRunRequest, CreateOptionSetResponse, CreateRunComparison, CreateRunShare,
    CreateStepResponse, CreateWizardRun, OptionSetResponse, RunComparison, RunFilters,
    RunListPage, RunProgressUpdate, RunShare, RunStats, StepResponse, UpdateWizardRun,
    WizardRun, WizardRunDetail,
};
use wizplat_core::types::EntityId;

use crate::client::ApiClient;
use crate::error::ApiError;

const BASE: &str = "/wizard-runs";

/// Page size used when walking every page of the run listing.
const LIST_ALL_PAGE_SIZE: u32 = 100;

#[derive(Serialize)]
struct Paging {
    skip: u32,
    limit: u32,
}

impl ApiClient {
    // ---- listing ----

    pub async fn list_runs(&self, filters: &RunFilters) -> Result<RunListPage, ApiError> {
        self.get_json_query(BASE, filters).await
    }

    /// Every run of the current user, walking all pages of the listing.
    pub async fn list_all_runs(&self) -> Result<Vec<WizardRun>, ApiError> {
        let mut runs = Vec::new();
        let mut skip = 0;
        loop {
            let filters = RunFilters {
                skip: Some(skip),
                limit: Some(LIST_ALL_PAGE_SIZE),
                ..RunFilters::default()
            };
            let page = self.list_runs(&filters).await?;
            let fetched = page.runs.len() as u32;
            runs.extend(page.runs);

            if fetched < LIST_ALL_PAGE_SIZE || runs.len() as u64 >= page.total {
                break;
            }
            skip += fetched;
        }
        Ok(runs)
    }

    pub async fn in_progress_runs(&self) -> Result<Vec<WizardRun>, ApiError> {
        self.get_json(&format!("{BASE}/in-progress")).await
    }

    pub async fn completed_runs(&self, skip: u32, limit: u32) -> Result<Vec<WizardRun>, ApiError> {
        self.get_json_query(&format!("{BASE}/completed"), &Paging { skip, limit })
            .await
    }

    /// Runs saved to the store.
    pub async fn stored_runs(&self, skip: u32, limit: u32) -> Result<Vec<WizardRun>, ApiError> {
        self.get_json_query(&format!("{BASE}/stored"), &Paging { skip, limit })
            .await
    }

    pub async fn favorite_runs(&self) -> Result<Vec<WizardRun>, ApiError> {
        self.get_json(&format!("{BASE}/favorites")).await
    }

    pub async fn run_stats(&self) -> Result<RunStats, ApiError> {
        self.get_json(&format!("{BASE}/stats")).await
    }

    // ---- run lifecycle ----

    /// The run with all of its stored responses.
    pub async fn get_run(&self, run_id: EntityId) -> Result<WizardRunDetail, ApiError> {
        self.get_json(&format!("{BASE}/{run_id}")).await
    }

    pub async fn create_run(&self, input: &CreateWizardRun) -> Result<WizardRun, ApiError> {
        input.validate()?;
        let run: WizardRun = self.send_json(Method::POST, BASE, input).await?;
        tracing::info!(run_id = %run.id, wizard_id = %run.wizard_id, "Run created");
        Ok(run)
    }

    pub async fn update_run(
        &self,
        run_id: EntityId,
        input: &UpdateWizardRun,
    ) -> Result<WizardRun, ApiError> {
        input.validate()?;
        self.send_json(Method::PUT, &format!("{BASE}/{run_id}"), input)
            .await
    }

    /// Record the step the user is on. The backend derives the percentage.
    pub async fn update_progress(
        &self,
        run_id: EntityId,
        input: &RunProgressUpdate,
    ) -> Result<WizardRun, ApiError> {
        self.send_json(Method::POST, &format!("{BASE}/{run_id}/progress"), input)
            .await
    }

    pub async fn complete_run(
        &self,
        run_id: EntityId,
        input: &CompleteRunRequest,
    ) -> Result<WizardRun, ApiError> {
        let run: WizardRun = self
            .send_json(Method::POST, &format!("{BASE}/{run_id}/complete"), input)
            .await?;
        tracing::info!(
            run_id = %run.id,
            stored = run.is_stored,
            "Run completed",
        );
        Ok(run)
    }

    pub async fn abandon_run(&self, run_id: EntityId) -> Result<WizardRun, ApiError> {
        self.call_json(Method::POST, &format!("{BASE}/{run_id}/abandon"))
            .await
    }

    pub async fn delete_run(&self, run_id: EntityId) -> Result<(), ApiError> {
        self.call(Method::DELETE, &format!("{BASE}/{run_id}")).await?;
        tracing::info!(run_id = %run_id, "Run deleted");
        Ok(())
    }

    // ---- responses ----

    pub async fn create_step_response(
        &self,
        input: &CreateStepResponse,
    ) -> Result<StepResponse, ApiError> {
        let path = format!("{BASE}/{}/steps", input.run_id);
        self.send_json(Method::POST, &path, input).await
    }

    pub async fn create_option_set_response(
        &self,
        input: &CreateOptionSetResponse,
    ) -> Result<OptionSetResponse, ApiError> {
        let path = format!("{BASE}/{}/option-sets", input.run_id);
        self.send_json(Method::POST, &path, input).await
    }

    /// Delete every step and option-set response of a run.
    pub async fn clear_responses(&self, run_id: EntityId) -> Result<(), ApiError> {
        self.call(Method::DELETE, &format!("{BASE}/{run_id}/responses"))
            .await
    }

    // ---- sharing ----

    pub async fn create_share(&self, input: &CreateRunShare) -> Result<RunShare, ApiError> {
        let path = format!("{BASE}/{}/share", input.run_id);
        self.send_json(Method::POST, &path, input).await
    }

    /// Public read of a shared run. Works without a session.
    pub async fn run_by_share_token(&self, token: &str) -> Result<WizardRunDetail, ApiError> {
        self.get_json(&format!("{BASE}/share/{token}")).await
    }

    // ---- comparisons ----

    pub async fn create_comparison(
        &self,
        input: &CreateRunComparison,
    ) -> Result<RunComparison, ApiError> {
        input.validate()?;
        self.send_json(Method::POST, &format!("{BASE}/comparisons"), input)
            .await
    }

    pub async fn list_comparisons(&self) -> Result<Vec<RunComparison>, ApiError> {
        self.get_json(&format!("{BASE}/comparisons")).await
    }

    pub async fn get_comparison(&self, comparison_id: EntityId) -> Result<RunComparison, ApiError> {
        self.get_json(&format!("{BASE}/comparisons/{comparison_id}"))
            .await
    }

    pub async fn delete_comparison(&self, comparison_id: EntityId) -> Result<(), ApiError> {
        self.call(Method::DELETE, &format!("{BASE}/comparisons/{comparison_id}"))
            .await
    }
}
