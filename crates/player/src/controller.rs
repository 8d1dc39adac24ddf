//! Run lifecycle controller.
//!
//! Phases of a run as seen by the player:
//!
//! ```text
//! Draft --create--> InProgress --complete--> CompletedNew --save--> CompletedStored
//!                        |                                               |
//!                        +------------------abandon---------------------+--> Abandoned
//! ```
//!
//! `Draft` exists only until the eager create on open succeeds. A run opened
//! from the store enters directly in whatever phase its status implies.

use serde::Serialize;
use wizplat_core::dependency::{evaluate_step, StepView};
use wizplat_core::models::run::{
    progress_percentage, CompleteRunRequest, CreateWizardRun, RunStatus, WizardRunDetail,
};
use wizplat_core::models::wizard::{Step, Wizard};
use wizplat_core::responses::{FieldErrors, ResponseStore, ResponseValue};
use wizplat_core::step_validation::validate_step;
use wizplat_core::types::EntityId;

use crate::error::PlayerError;
use crate::store::RunStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Draft,
    InProgress,
    CompletedNew,
    CompletedStored,
    Abandoned,
}

impl RunPhase {
    fn from_run(status: RunStatus, is_stored: bool) -> Self {
        match (status, is_stored) {
            (RunStatus::InProgress, _) => Self::InProgress,
            (RunStatus::Completed, true) => Self::CompletedStored,
            (RunStatus::Completed, false) => Self::CompletedNew,
            (RunStatus::Abandoned, _) => Self::Abandoned,
        }
    }
}

/// How the player was reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationContext {
    /// Existing run to resume, edit, or view.
    pub run_id: Option<EntityId>,
    /// Page through answers without any mutation.
    pub view_only: bool,
}

impl NavigationContext {
    pub fn new_run() -> Self {
        Self::default()
    }

    pub fn resume(run_id: EntityId) -> Self {
        Self {
            run_id: Some(run_id),
            view_only: false,
        }
    }

    pub fn view(run_id: EntityId) -> Self {
        Self {
            run_id: Some(run_id),
            view_only: true,
        }
    }
}

/// Decision the user must make after the last step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SavePrompt {
    /// First completion: name and store the run, or leave it unsaved.
    NameNewRun,
    /// Reopened stored run: discard, update in place, or save as new.
    EditChoice,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    Moved { step_index: usize },
    /// Validation failed; the step index is unchanged.
    Invalid(FieldErrors),
    AwaitingDecision(SavePrompt),
    /// View-only paging hit the last step.
    EndOfWizard,
}

pub struct RunController<S> {
    pub(crate) store: S,
    pub(crate) wizard: Wizard,
    pub(crate) context: NavigationContext,
    pub(crate) run_id: Option<EntityId>,
    pub(crate) phase: RunPhase,
    pub(crate) step_index: usize,
    pub(crate) responses: ResponseStore,
    /// Answers as last persisted, restored on discard.
    pub(crate) saved_responses: ResponseStore,
    pub(crate) prompt: Option<SavePrompt>,
    /// Unnamed run created by a save-as-new attempt that has not completed.
    pub(crate) pending_copy: Option<EntityId>,
}

impl<S: RunStore> RunController<S> {
    /// Load the wizard and either attach to an existing run or start a new
    /// one.
    pub async fn open(
        store: S,
        wizard_id: EntityId,
        context: NavigationContext,
    ) -> Result<Self, PlayerError> {
        let wizard = store.get_wizard(wizard_id).await?;
        if wizard.steps.is_empty() {
            return Err(PlayerError::EmptyWizard(wizard_id));
        }

        let mut controller = Self {
            store,
            wizard,
            context,
            run_id: None,
            phase: RunPhase::Draft,
            step_index: 0,
            responses: ResponseStore::new(),
            saved_responses: ResponseStore::new(),
            prompt: None,
            pending_copy: None,
        };

        match context.run_id {
            Some(run_id) => {
                let detail = controller.store.get_run(run_id).await?;
                controller.attach(detail)?;
            }
            None => {
                controller.ensure_started().await?;
            }
        }

        Ok(controller)
    }

    fn attach(&mut self, detail: WizardRunDetail) -> Result<(), PlayerError> {
        let run = &detail.run;
        if run.wizard_id != self.wizard.id {
            return Err(PlayerError::WizardMismatch {
                run_id: run.id,
                expected: self.wizard.id,
                actual: run.wizard_id,
            });
        }

        self.run_id = Some(run.id);
        self.phase = RunPhase::from_run(run.status, run.is_stored);
        self.responses = ResponseStore::from_envelopes(&detail.option_set_responses);
        self.saved_responses = self.responses.clone();
        self.step_index = match self.phase {
            RunPhase::InProgress if !self.context.view_only => {
                (run.current_step_index as usize).min(self.last_step_index())
            }
            _ => 0,
        };

        tracing::info!(
            run_id = %run.id,
            phase = ?self.phase,
            step_index = self.step_index,
            answers = self.responses.answered_count(),
            view_only = self.context.view_only,
            "Run opened",
        );
        Ok(())
    }

    /// Entry action: create the backing run once.
    ///
    /// Only `Draft` creates; every other phase returns the current run id
    /// without a network call. View-only contexts never create.
    pub async fn ensure_started(&mut self) -> Result<Option<EntityId>, PlayerError> {
        if self.phase != RunPhase::Draft || self.context.view_only {
            return Ok(self.run_id);
        }

        let run = self
            .store
            .create_run(&CreateWizardRun::for_wizard(self.wizard.id))
            .await?;
        self.run_id = Some(run.id);
        self.phase = RunPhase::InProgress;
        tracing::info!(run_id = %run.id, wizard_id = %self.wizard.id, "Run started");
        Ok(self.run_id)
    }

    // ---- accessors ----

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn run_id(&self) -> Option<EntityId> {
        self.run_id
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn current_step(&self) -> &Step {
        &self.wizard.steps[self.step_index]
    }

    pub fn is_last_step(&self) -> bool {
        self.step_index >= self.last_step_index()
    }

    pub fn progress_percentage(&self) -> f64 {
        progress_percentage(self.step_index, self.wizard.total_steps())
    }

    pub fn responses(&self) -> &ResponseStore {
        &self.responses
    }

    pub fn prompt(&self) -> Option<SavePrompt> {
        self.prompt
    }

    pub fn is_view_only(&self) -> bool {
        self.context.view_only
    }

    /// View-only or abandoned.
    pub fn is_read_only(&self) -> bool {
        self.context.view_only || self.phase == RunPhase::Abandoned
    }

    /// Rendering state of the current step under the current answers.
    pub fn step_view(&self) -> Option<StepView> {
        evaluate_step(&self.wizard, self.step_index, &self.responses)
    }

    fn last_step_index(&self) -> usize {
        self.wizard.steps.len().saturating_sub(1)
    }

    // ---- mutation ----

    pub fn set_response(
        &mut self,
        option_set_id: EntityId,
        value: impl Into<ResponseValue>,
    ) -> Result<(), PlayerError> {
        if self.is_read_only() {
            return Err(PlayerError::ReadOnly);
        }
        self.responses.set_response(option_set_id, value);
        Ok(())
    }

    /// Validate the current step and move forward, or reach the save
    /// decision on the last step.
    pub async fn advance(&mut self) -> Result<AdvanceOutcome, PlayerError> {
        if self.context.view_only {
            return Ok(self.page_forward());
        }
        if self.phase == RunPhase::Abandoned {
            return Err(PlayerError::ReadOnly);
        }

        if let Err(errors) = validate_step(&self.wizard, self.step_index, &self.responses) {
            tracing::debug!(
                step_index = self.step_index,
                invalid_fields = errors.len(),
                "Step validation failed",
            );
            self.responses.set_errors(errors.clone());
            return Ok(AdvanceOutcome::Invalid(errors));
        }

        self.move_forward().await
    }

    /// Like [`advance`](Self::advance) without validation. Only allowed on
    /// skippable steps.
    pub async fn skip(&mut self) -> Result<AdvanceOutcome, PlayerError> {
        if self.context.view_only {
            return Ok(self.page_forward());
        }
        if self.phase == RunPhase::Abandoned {
            return Err(PlayerError::ReadOnly);
        }
        if !self.current_step().is_skippable {
            return Err(PlayerError::NotSkippable(self.step_index));
        }

        self.move_forward().await
    }

    /// Step back one page. Returns `false` on the first step.
    pub fn retreat(&mut self) -> bool {
        if self.step_index == 0 {
            return false;
        }
        self.step_index -= 1;
        self.responses.clear_errors();
        self.prompt = None;
        true
    }

    /// Mark the run abandoned. No further changes are accepted.
    pub async fn abandon(&mut self) -> Result<(), PlayerError> {
        if self.is_read_only() {
            return Err(PlayerError::ReadOnly);
        }
        let run_id = self.require_run()?;
        self.store.abandon_run(run_id).await?;
        self.phase = RunPhase::Abandoned;
        self.prompt = None;
        tracing::info!(run_id = %run_id, "Run abandoned");
        Ok(())
    }

    fn page_forward(&mut self) -> AdvanceOutcome {
        if self.is_last_step() {
            return AdvanceOutcome::EndOfWizard;
        }
        self.step_index += 1;
        AdvanceOutcome::Moved {
            step_index: self.step_index,
        }
    }

    async fn move_forward(&mut self) -> Result<AdvanceOutcome, PlayerError> {
        self.responses.clear_errors();

        if !self.is_last_step() {
            self.step_index += 1;
            self.checkpoint().await;
            return Ok(AdvanceOutcome::Moved {
                step_index: self.step_index,
            });
        }

        let prompt = self.finish().await?;
        Ok(AdvanceOutcome::AwaitingDecision(prompt))
    }

    /// Persist the step index. Failures are logged and otherwise ignored.
    async fn checkpoint(&self) {
        let Some(run_id) = self.run_id else {
            return;
        };
        if self.phase != RunPhase::InProgress {
            return;
        }
        if let Err(e) = self
            .store
            .update_progress(run_id, self.step_index as u32)
            .await
        {
            tracing::warn!(
                run_id = %run_id,
                step_index = self.step_index,
                error = %e,
                "Progress checkpoint failed",
            );
        }
    }

    async fn finish(&mut self) -> Result<SavePrompt, PlayerError> {
        if self.phase == RunPhase::Draft {
            self.ensure_started().await?;
        }

        let prompt = match self.phase {
            RunPhase::Draft => return Err(PlayerError::NotStarted),
            RunPhase::InProgress => {
                let run_id = self.require_run()?;
                self.store
                    .complete_run(run_id, &CompleteRunRequest::default())
                    .await?;
                self.phase = RunPhase::CompletedNew;
                tracing::info!(run_id = %run_id, "Run completed");
                SavePrompt::NameNewRun
            }
            RunPhase::CompletedNew => SavePrompt::NameNewRun,
            RunPhase::CompletedStored => SavePrompt::EditChoice,
            RunPhase::Abandoned => return Err(PlayerError::ReadOnly),
        };

        self.prompt = Some(prompt);
        Ok(prompt)
    }

    pub(crate) fn require_run(&self) -> Result<EntityId, PlayerError> {
        self.run_id.ok_or(PlayerError::NotStarted)
    }
}
