//! Persistence seam of the player.

use async_trait::async_trait;
use wizplat_client::{ApiClient, ApiError};
use wizplat_core::models::run::{
    CompleteRunRequest, CreateOptionSetResponse, CreateStepResponse, CreateWizardRun,
    OptionSetResponse, RunProgressUpdate, StepResponse, UpdateWizardRun, WizardRun,
    WizardRunDetail,
};
use wizplat_core::models::wizard::Wizard;
use wizplat_core::types::EntityId;

/// Backend operations the run controller and the save flow depend on.
#[async_trait]
pub trait RunStore: Send + Sync {
    async fn get_wizard(&self, wizard_id: EntityId) -> Result<Wizard, ApiError>;

    async fn get_run(&self, run_id: EntityId) -> Result<WizardRunDetail, ApiError>;

    async fn create_run(&self, input: &CreateWizardRun) -> Result<WizardRun, ApiError>;

    async fn update_run(
        &self,
        run_id: EntityId,
        input: &UpdateWizardRun,
    ) -> Result<WizardRun, ApiError>;

    /// Progress checkpoint.
    async fn update_progress(&self, run_id: EntityId, step_index: u32) -> Result<(), ApiError>;

    async fn complete_run(
        &self,
        run_id: EntityId,
        input: &CompleteRunRequest,
    ) -> Result<WizardRun, ApiError>;

    async fn abandon_run(&self, run_id: EntityId) -> Result<WizardRun, ApiError>;

    /// Every run owned by the current user, used for name checks.
    async fn list_runs(&self) -> Result<Vec<WizardRun>, ApiError>;

    async fn clear_responses(&self, run_id: EntityId) -> Result<(), ApiError>;

    async fn create_step_response(
        &self,
        input: &CreateStepResponse,
    ) -> Result<StepResponse, ApiError>;

    async fn create_option_set_response(
        &self,
        input: &CreateOptionSetResponse,
    ) -> Result<OptionSetResponse, ApiError>;
}

#[async_trait]
impl RunStore for ApiClient {
    async fn get_wizard(&self, wizard_id: EntityId) -> Result<Wizard, ApiError> {
        ApiClient::get_wizard(self, wizard_id).await
    }

    async fn get_run(&self, run_id: EntityId) -> Result<WizardRunDetail, ApiError> {
        ApiClient::get_run(self, run_id).await
    }

    async fn create_run(&self, input: &CreateWizardRun) -> Result<WizardRun, ApiError> {
        ApiClient::create_run(self, input).await
    }

    async fn update_run(
        &self,
        run_id: EntityId,
        input: &UpdateWizardRun,
    ) -> Result<WizardRun, ApiError> {
        ApiClient::update_run(self, run_id, input).await
    }

    async fn update_progress(&self, run_id: EntityId, step_index: u32) -> Result<(), ApiError> {
        let update = RunProgressUpdate {
            current_step_index: step_index,
        };
        ApiClient::update_progress(self, run_id, &update).await?;
        Ok(())
    }

    async fn complete_run(
        &self,
        run_id: EntityId,
        input: &CompleteRunRequest,
    ) -> Result<WizardRun, ApiError> {
        ApiClient::complete_run(self, run_id, input).await
    }

    async fn abandon_run(&self, run_id: EntityId) -> Result<WizardRun, ApiError> {
        ApiClient::abandon_run(self, run_id).await
    }

    async fn list_runs(&self) -> Result<Vec<WizardRun>, ApiError> {
        self.list_all_runs().await
    }

    async fn clear_responses(&self, run_id: EntityId) -> Result<(), ApiError> {
        ApiClient::clear_responses(self, run_id).await
    }

    async fn create_step_response(
        &self,
        input: &CreateStepResponse,
    ) -> Result<StepResponse, ApiError> {
        ApiClient::create_step_response(self, input).await
    }

    async fn create_option_set_response(
        &self,
        input: &CreateOptionSetResponse,
    ) -> Result<OptionSetResponse, ApiError> {
        ApiClient::create_option_set_response(self, input).await
    }
}
