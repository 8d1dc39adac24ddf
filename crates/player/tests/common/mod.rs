//! In-memory [`RunStore`] and wizard fixtures for player tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use wizplat_client::ApiError;
use wizplat_core::models::run::{
    CompleteRunRequest, CreateOptionSetResponse, CreateStepResponse, CreateWizardRun,
    OptionSetResponse, RunStatus, StepResponse, UpdateWizardRun, WizardRun, WizardRunDetail,
};
use wizplat_core::models::wizard::{
    DependencyType, OptionDependency, OptionSet, SelectionType, Step, Wizard, WizardOption,
};
use wizplat_core::types::EntityId;
use wizplat_player::RunStore;

// ---------------------------------------------------------------------------
// Fixture ids
// ---------------------------------------------------------------------------

pub const WIZARD: EntityId = Uuid::from_u128(0x100);
pub const STEP_LOOK: EntityId = Uuid::from_u128(0x201);
pub const STEP_PATTERN: EntityId = Uuid::from_u128(0x202);
pub const STEP_NOTES: EntityId = Uuid::from_u128(0x203);
pub const COLOR: EntityId = Uuid::from_u128(0x301);
pub const PATTERN: EntityId = Uuid::from_u128(0x302);
pub const NOTES: EntityId = Uuid::from_u128(0x303);
pub const RED: EntityId = Uuid::from_u128(0x401);
pub const BLUE: EntityId = Uuid::from_u128(0x402);
pub const STRIPES: EntityId = Uuid::from_u128(0x403);

fn option(id: EntityId, set: EntityId, value: &str, deps: Vec<OptionDependency>) -> WizardOption {
    WizardOption {
        id,
        option_set_id: set,
        label: value.to_uppercase(),
        value: value.to_string(),
        description: None,
        display_order: 0,
        is_default: false,
        is_recommended: false,
        is_active: true,
        dependencies: deps,
    }
}

fn option_set(
    id: EntityId,
    step: EntityId,
    name: &str,
    kind: SelectionType,
    required: bool,
    options: Vec<WizardOption>,
) -> OptionSet {
    OptionSet {
        id,
        step_id: step,
        name: name.to_string(),
        description: None,
        selection_type: kind,
        is_required: required,
        min_selections: 0,
        max_selections: None,
        min_value: None,
        max_value: None,
        step_increment: None,
        placeholder: None,
        help_text: None,
        display_order: 0,
        options,
    }
}

fn step(id: EntityId, order: i32, name: &str, skippable: bool, sets: Vec<OptionSet>) -> Step {
    Step {
        id,
        wizard_id: WIZARD,
        name: name.to_string(),
        description: None,
        help_text: None,
        step_order: order,
        is_required: !skippable,
        is_skippable: skippable,
        allow_back_navigation: true,
        option_sets: sets,
    }
}

/// Three steps:
///
/// 1. "Look": required single select Color (red, blue).
/// 2. "Pattern": required single select whose only option, stripes, is
///    shown only when red is selected.
/// 3. "Notes": skippable, optional free text.
pub fn color_wizard() -> Wizard {
    let stripes_dep = OptionDependency {
        id: Uuid::from_u128(0x501),
        option_id: STRIPES,
        depends_on_option_id: RED,
        dependency_type: DependencyType::ShowIf,
        created_at: None,
    };

    Wizard {
        id: WIZARD,
        name: "Shirt designer".into(),
        description: None,
        category_id: None,
        created_by: None,
        is_published: true,
        is_active: true,
        require_login: true,
        estimated_time: None,
        difficulty_level: None,
        tags: vec![],
        steps: vec![
            step(
                STEP_LOOK,
                1,
                "Look",
                false,
                vec![option_set(
                    COLOR,
                    STEP_LOOK,
                    "Color",
                    SelectionType::SingleSelect,
                    true,
                    vec![
                        option(RED, COLOR, "red", vec![]),
                        option(BLUE, COLOR, "blue", vec![]),
                    ],
                )],
            ),
            step(
                STEP_PATTERN,
                2,
                "Pattern",
                false,
                vec![option_set(
                    PATTERN,
                    STEP_PATTERN,
                    "Pattern",
                    SelectionType::SingleSelect,
                    true,
                    vec![option(STRIPES, PATTERN, "stripes", vec![stripes_dep])],
                )],
            ),
            step(
                STEP_NOTES,
                3,
                "Notes",
                true,
                vec![option_set(
                    NOTES,
                    STEP_NOTES,
                    "Notes",
                    SelectionType::TextInput,
                    false,
                    vec![],
                )],
            ),
        ],
        created_at: None,
        updated_at: None,
    }
}

pub fn run(id: EntityId, name: Option<&str>, status: RunStatus, stored: bool) -> WizardRun {
    let now = Utc::now();
    WizardRun {
        id,
        wizard_id: WIZARD,
        user_id: None,
        run_name: name.map(str::to_string),
        run_description: None,
        status,
        current_step_index: 0,
        total_steps: Some(3),
        progress_percentage: 0.0,
        started_at: now,
        completed_at: None,
        last_accessed_at: now,
        is_stored: stored,
        is_favorite: false,
        tags: vec![],
    }
}

/// Stored answer row in the backend's envelope shape.
pub fn answer_row(run_id: EntityId, option_set_id: EntityId, value: Value) -> OptionSetResponse {
    OptionSetResponse {
        id: Uuid::new_v4(),
        run_id,
        step_response_id: Uuid::new_v4(),
        option_set_id,
        option_set_name: None,
        selection_type: None,
        response_value: serde_json::json!({ "value": value }),
        selected_options: vec![],
    }
}

// ---------------------------------------------------------------------------
// Fake store
// ---------------------------------------------------------------------------

/// A store call, recorded in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetWizard(EntityId),
    GetRun(EntityId),
    CreateRun {
        wizard_id: EntityId,
        run_name: Option<String>,
    },
    UpdateRun {
        run_id: EntityId,
        run_name: Option<String>,
        is_stored: Option<bool>,
    },
    Progress {
        run_id: EntityId,
        step_index: u32,
    },
    Complete {
        run_id: EntityId,
        save_to_store: bool,
    },
    Abandon(EntityId),
    ListRuns,
    ClearResponses(EntityId),
    CreateStep {
        run_id: EntityId,
        step_index: u32,
    },
    CreateOptionSet {
        run_id: EntityId,
        option_set_id: EntityId,
        response_value: Value,
        selected_options: Vec<EntityId>,
    },
}

impl Call {
    /// Whether the call changes backend state.
    pub fn is_write(&self) -> bool {
        !matches!(self, Call::GetWizard(_) | Call::GetRun(_) | Call::ListRuns)
    }
}

#[derive(Default)]
pub struct FakeState {
    pub wizards: HashMap<EntityId, Wizard>,
    pub runs: HashMap<EntityId, WizardRunDetail>,
    pub calls: Vec<Call>,
    /// Reject progress checkpoints with a 500.
    pub fail_progress: bool,
    /// Reject the run listing with this status.
    pub fail_list: Option<u16>,
    /// Reject run completion with a 500.
    pub fail_complete: bool,
    /// Reject option-set creates once this many have succeeded.
    pub fail_option_set_after: Option<usize>,
    pub option_sets_created: usize,
}

#[derive(Clone, Default)]
pub struct FakeStore {
    state: Arc<Mutex<FakeState>>,
}

impl FakeStore {
    pub fn new() -> Self {
        let store = Self::default();
        let wizard = color_wizard();
        store.state().wizards.insert(wizard.id, wizard);
        store
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn insert_run(&self, run: WizardRun, answers: Vec<OptionSetResponse>) {
        self.state().runs.insert(
            run.id,
            WizardRunDetail {
                run,
                step_responses: vec![],
                option_set_responses: answers,
            },
        );
    }

    pub fn run(&self, run_id: EntityId) -> WizardRunDetail {
        self.state().runs[&run_id].clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.state().calls.iter().filter(|c| pred(c)).count()
    }

    /// Stored answer of `option_set_id` in `run_id`, unwrapped from its
    /// envelope.
    pub fn stored_answer(&self, run_id: EntityId, option_set_id: EntityId) -> Option<Value> {
        self.run(run_id)
            .option_set_responses
            .iter()
            .find(|r| r.option_set_id == option_set_id)
            .map(|r| r.response_value["value"].clone())
    }

    fn record(&self, call: Call) {
        self.state().calls.push(call);
    }
}

fn not_found() -> ApiError {
    ApiError::Status {
        status: 404,
        body: r#"{"detail":"Not found"}"#.into(),
    }
}

fn server_error() -> ApiError {
    ApiError::Status {
        status: 500,
        body: r#"{"detail":"Internal server error"}"#.into(),
    }
}

#[async_trait]
impl RunStore for FakeStore {
    async fn get_wizard(&self, wizard_id: EntityId) -> Result<Wizard, ApiError> {
        self.record(Call::GetWizard(wizard_id));
        self.state().wizards.get(&wizard_id).cloned().ok_or_else(not_found)
    }

    async fn get_run(&self, run_id: EntityId) -> Result<WizardRunDetail, ApiError> {
        self.record(Call::GetRun(run_id));
        self.state().runs.get(&run_id).cloned().ok_or_else(not_found)
    }

    async fn create_run(&self, input: &CreateWizardRun) -> Result<WizardRun, ApiError> {
        self.record(Call::CreateRun {
            wizard_id: input.wizard_id,
            run_name: input.run_name.clone(),
        });
        let mut created = run(
            Uuid::new_v4(),
            input.run_name.as_deref(),
            RunStatus::InProgress,
            false,
        );
        created.wizard_id = input.wizard_id;
        created.run_description = input.run_description.clone();
        self.insert_run(created.clone(), vec![]);
        Ok(created)
    }

    async fn update_run(
        &self,
        run_id: EntityId,
        input: &UpdateWizardRun,
    ) -> Result<WizardRun, ApiError> {
        self.record(Call::UpdateRun {
            run_id,
            run_name: input.run_name.clone(),
            is_stored: input.is_stored,
        });
        let mut state = self.state();
        let detail = state.runs.get_mut(&run_id).ok_or_else(not_found)?;
        if let Some(name) = &input.run_name {
            detail.run.run_name = Some(name.clone());
        }
        if let Some(description) = &input.run_description {
            detail.run.run_description = Some(description.clone());
        }
        if let Some(stored) = input.is_stored {
            detail.run.is_stored = stored;
        }
        Ok(detail.run.clone())
    }

    async fn update_progress(&self, run_id: EntityId, step_index: u32) -> Result<(), ApiError> {
        self.record(Call::Progress { run_id, step_index });
        let mut state = self.state();
        if state.fail_progress {
            return Err(server_error());
        }
        if let Some(detail) = state.runs.get_mut(&run_id) {
            detail.run.current_step_index = step_index;
        }
        Ok(())
    }

    async fn complete_run(
        &self,
        run_id: EntityId,
        input: &CompleteRunRequest,
    ) -> Result<WizardRun, ApiError> {
        self.record(Call::Complete {
            run_id,
            save_to_store: input.save_to_store,
        });
        let mut state = self.state();
        if state.fail_complete {
            return Err(server_error());
        }
        let detail = state.runs.get_mut(&run_id).ok_or_else(not_found)?;
        detail.run.status = RunStatus::Completed;
        detail.run.is_stored = input.save_to_store;
        detail.run.progress_percentage = 100.0;
        if input.run_name.is_some() {
            detail.run.run_name = input.run_name.clone();
        }
        Ok(detail.run.clone())
    }

    async fn abandon_run(&self, run_id: EntityId) -> Result<WizardRun, ApiError> {
        self.record(Call::Abandon(run_id));
        let mut state = self.state();
        let detail = state.runs.get_mut(&run_id).ok_or_else(not_found)?;
        detail.run.status = RunStatus::Abandoned;
        Ok(detail.run.clone())
    }

    async fn list_runs(&self) -> Result<Vec<WizardRun>, ApiError> {
        self.record(Call::ListRuns);
        let state = self.state();
        if let Some(status) = state.fail_list {
            return Err(ApiError::Status {
                status,
                body: String::new(),
            });
        }
        Ok(state.runs.values().map(|d| d.run.clone()).collect())
    }

    async fn clear_responses(&self, run_id: EntityId) -> Result<(), ApiError> {
        self.record(Call::ClearResponses(run_id));
        let mut state = self.state();
        let detail = state.runs.get_mut(&run_id).ok_or_else(not_found)?;
        detail.step_responses.clear();
        detail.option_set_responses.clear();
        Ok(())
    }

    async fn create_step_response(
        &self,
        input: &CreateStepResponse,
    ) -> Result<StepResponse, ApiError> {
        self.record(Call::CreateStep {
            run_id: input.run_id,
            step_index: input.step_index,
        });
        let row = StepResponse {
            id: Uuid::new_v4(),
            run_id: input.run_id,
            step_id: input.step_id,
            step_index: input.step_index,
            step_name: input.step_name.clone(),
            completed: input.completed,
            time_spent_seconds: 0,
        };
        let mut state = self.state();
        let detail = state.runs.get_mut(&input.run_id).ok_or_else(not_found)?;
        detail.step_responses.push(row.clone());
        Ok(row)
    }

    async fn create_option_set_response(
        &self,
        input: &CreateOptionSetResponse,
    ) -> Result<OptionSetResponse, ApiError> {
        self.record(Call::CreateOptionSet {
            run_id: input.run_id,
            option_set_id: input.option_set_id,
            response_value: input.response_value.clone(),
            selected_options: input.selected_options.clone(),
        });
        let mut state = self.state();
        if state
            .fail_option_set_after
            .is_some_and(|limit| state.option_sets_created >= limit)
        {
            return Err(server_error());
        }
        state.option_sets_created += 1;

        let row = OptionSetResponse {
            id: Uuid::new_v4(),
            run_id: input.run_id,
            step_response_id: input.step_response_id,
            option_set_id: input.option_set_id,
            option_set_name: input.option_set_name.clone(),
            selection_type: input.selection_type.clone(),
            response_value: input.response_value.clone(),
            selected_options: input.selected_options.clone(),
        };
        let detail = state.runs.get_mut(&input.run_id).ok_or_else(not_found)?;
        detail.option_set_responses.push(row.clone());
        Ok(row)
    }
}
