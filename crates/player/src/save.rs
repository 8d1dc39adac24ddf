//! Save reconciliation at the end of a run.
//!
//! Answers are written with replace-all semantics: every stored response row
//! of the run is deleted, then one step row per answered step and one
//! option-set row per non-empty answer are created in wizard order. The
//! writes are sequential and not transactional; a failure part-way leaves the
//! rows already written in place and reports them.

use serde::Serialize;
use wizplat_core::dependency::options_selected_by;
use wizplat_core::models::run::{
    CompleteRunRequest, CreateOptionSetResponse, CreateStepResponse, CreateWizardRun,
    UpdateWizardRun,
};
use wizplat_core::models::wizard::Wizard;
use wizplat_core::responses::ResponseStore;
use wizplat_core::run_names::{check_run_name, validate_run_name};
use wizplat_core::types::EntityId;
use wizplat_client::ApiError;

use crate::controller::{RunController, RunPhase, SavePrompt};
use crate::error::{PlayerError, SaveError};
use crate::store::RunStore;

/// Result of a completed save decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SaveOutcome {
    /// A first-time completion was named and stored.
    Saved { run_id: EntityId },
    /// The user declined to store; the completed run is kept as is.
    LeftUnsaved,
    /// Edits to a stored run were thrown away.
    Discarded,
    Updated { run_id: EntityId },
    /// A new stored run was created; the original is untouched.
    SavedAsNew { run_id: EntityId },
}

/// Rows created by a successful flush.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub step_responses: Vec<EntityId>,
    pub option_set_responses: Vec<EntityId>,
    /// Steps with no answered option set; no row is written for them.
    pub skipped_steps: usize,
}

impl FlushReport {
    /// Every created row id, in creation order per kind.
    pub fn written(&self) -> Vec<EntityId> {
        self.step_responses
            .iter()
            .chain(&self.option_set_responses)
            .copied()
            .collect()
    }
}

/// Replace all stored answers of `run_id` with `responses`.
pub async fn flush_responses<S: RunStore + ?Sized>(
    store: &S,
    run_id: EntityId,
    wizard: &Wizard,
    responses: &ResponseStore,
) -> Result<FlushReport, SaveError> {
    store.clear_responses(run_id).await?;

    let mut report = FlushReport::default();
    let mut written = Vec::new();

    for (index, step) in wizard.steps.iter().enumerate() {
        let answered: Vec<_> = step
            .option_sets
            .iter()
            .filter_map(|os| {
                responses
                    .get(os.id)
                    .filter(|value| !value.is_empty())
                    .map(|value| (os, value))
            })
            .collect();

        if answered.is_empty() {
            report.skipped_steps += 1;
            continue;
        }

        let step_row = CreateStepResponse {
            run_id,
            step_id: step.id,
            step_index: index as u32,
            step_name: Some(step.name.clone()),
            completed: true,
        };
        let step_response = store
            .create_step_response(&step_row)
            .await
            .map_err(|e| partial_flush(run_id, &written, e))?;
        written.push(step_response.id);
        report.step_responses.push(step_response.id);

        for (option_set, value) in answered {
            let selected_options = if option_set.selection_type.is_option_based() {
                options_selected_by(option_set, value)
            } else {
                Vec::new()
            };
            let row = CreateOptionSetResponse {
                run_id,
                step_response_id: step_response.id,
                option_set_id: option_set.id,
                option_set_name: Some(option_set.name.clone()),
                selection_type: Some(option_set.selection_type.as_str().to_string()),
                response_value: value.to_envelope(),
                selected_options,
            };
            let saved = store
                .create_option_set_response(&row)
                .await
                .map_err(|e| partial_flush(run_id, &written, e))?;
            written.push(saved.id);
            report.option_set_responses.push(saved.id);
        }
    }

    tracing::info!(
        run_id = %run_id,
        steps = report.step_responses.len(),
        answers = report.option_set_responses.len(),
        skipped_steps = report.skipped_steps,
        "Responses flushed",
    );
    Ok(report)
}

fn partial_flush(run_id: EntityId, written: &[EntityId], source: ApiError) -> SaveError {
    tracing::error!(
        run_id = %run_id,
        written = ?written,
        error = %source,
        "Response flush failed part-way, written rows are kept",
    );
    SaveError::PartialFlush {
        run_id,
        written: written.to_vec(),
        source,
    }
}

impl<S: RunStore> RunController<S> {
    /// Name and store a run completed for the first time.
    pub async fn save_new(
        &mut self,
        name: &str,
        description: Option<&str>,
    ) -> Result<SaveOutcome, SaveError> {
        self.expect_prompt(SavePrompt::NameNewRun)?;
        let run_id = self.require_run()?;
        let name = self.checked_name(name, Some(run_id)).await?;

        flush_responses(&self.store, run_id, &self.wizard, &self.responses).await?;
        let update = UpdateWizardRun {
            run_name: Some(name.clone()),
            run_description: description.map(str::to_string),
            is_stored: Some(true),
            ..UpdateWizardRun::default()
        };
        self.store.update_run(run_id, &update).await?;

        self.mark_stored(run_id);
        tracing::info!(run_id = %run_id, name = %name, "Run saved");
        Ok(SaveOutcome::Saved { run_id })
    }

    /// Keep the completed run without storing it.
    pub fn decline_save(&mut self) -> Result<SaveOutcome, SaveError> {
        self.expect_prompt(SavePrompt::NameNewRun)?;
        self.prompt = None;
        tracing::info!(run_id = ?self.run_id, "Run left unsaved");
        Ok(SaveOutcome::LeftUnsaved)
    }

    /// Drop the edits and restore the stored answers locally.
    pub fn discard_changes(&mut self) -> Result<SaveOutcome, SaveError> {
        self.expect_prompt(SavePrompt::EditChoice)?;
        self.responses = self.saved_responses.clone();
        self.step_index = 0;
        self.prompt = None;
        tracing::info!(run_id = ?self.run_id, "Edits discarded");
        Ok(SaveOutcome::Discarded)
    }

    /// Overwrite the stored run's answers with the edited ones.
    pub async fn update_in_place(&mut self) -> Result<SaveOutcome, SaveError> {
        self.expect_prompt(SavePrompt::EditChoice)?;
        let run_id = self.require_run()?;

        flush_responses(&self.store, run_id, &self.wizard, &self.responses).await?;

        self.mark_stored(run_id);
        tracing::info!(run_id = %run_id, "Stored run updated");
        Ok(SaveOutcome::Updated { run_id })
    }

    /// Store the edited answers as a brand-new run of the same wizard.
    ///
    /// The original run is never written to. The copy is created unnamed and
    /// only receives its name when it is completed, so a failed attempt
    /// leaves no run holding the name. A retry reuses the copy created by the
    /// failed attempt. On success the controller continues with the new run.
    pub async fn save_as_new(
        &mut self,
        name: &str,
        description: Option<&str>,
    ) -> Result<SaveOutcome, SaveError> {
        self.expect_prompt(SavePrompt::EditChoice)?;
        let name = self.checked_name(name, None).await?;

        let copy_id = match self.pending_copy {
            Some(copy_id) => copy_id,
            None => {
                let copy = self
                    .store
                    .create_run(&CreateWizardRun::for_wizard(self.wizard.id))
                    .await?;
                tracing::debug!(run_id = %copy.id, "Created run for save as new");
                self.pending_copy = Some(copy.id);
                copy.id
            }
        };

        flush_responses(&self.store, copy_id, &self.wizard, &self.responses).await?;
        let complete = CompleteRunRequest {
            run_name: Some(name.clone()),
            run_description: description.map(str::to_string),
            save_to_store: true,
            tags: None,
        };
        if let Err(e) = self.store.complete_run(copy_id, &complete).await {
            tracing::error!(
                run_id = %copy_id,
                error = %e,
                "Completing the saved copy failed, it stays unnamed until retried",
            );
            return Err(e.into());
        }

        let original = self.run_id;
        self.mark_stored(copy_id);
        tracing::info!(
            run_id = %copy_id,
            original_run_id = ?original,
            name = %name,
            "Run saved as new",
        );
        Ok(SaveOutcome::SavedAsNew { run_id: copy_id })
    }

    // ---- private helpers ----

    fn expect_prompt(&self, expected: SavePrompt) -> Result<(), PlayerError> {
        if self.context.view_only {
            return Err(PlayerError::ReadOnly);
        }
        if self.prompt != Some(expected) {
            return Err(PlayerError::NoPendingDecision);
        }
        Ok(())
    }

    /// Validate `name` and check it against the user's other runs.
    async fn checked_name(
        &self,
        name: &str,
        exclude: Option<EntityId>,
    ) -> Result<String, SaveError> {
        let name = validate_run_name(name)?;
        let existing = self.store.list_runs().await.map_err(|e| {
            tracing::warn!(error = %e, "Could not fetch runs for the name check");
            SaveError::LookupFailed {
                kind: e.kind(),
                message: e.user_message(),
            }
        })?;
        Ok(check_run_name(&name, &existing, exclude)?)
    }

    fn mark_stored(&mut self, run_id: EntityId) {
        self.run_id = Some(run_id);
        self.phase = RunPhase::CompletedStored;
        self.saved_responses = self.responses.clone();
        self.prompt = None;
        self.pending_copy = None;
    }
}
