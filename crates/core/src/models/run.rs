//! Wizard run entity models and DTOs.
//!
//! A run is one user's execution of a wizard. It is created eagerly when the
//! player opens, checkpointed by step index while the user pages through, and
//! its answers are only written when the user stores it.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{EntityId, Timestamp};

// ---------------------------------------------------------------------------
// Run status
// ---------------------------------------------------------------------------

/// Status values for a wizard run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    InProgress,
    Completed,
    Abandoned,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
        }
    }
}

/// Progress of a run sitting on `current_step_index` (0-based).
///
/// `(index + 1) / total * 100`, clamped to 100. A wizard without steps
/// reports 0.
pub fn progress_percentage(current_step_index: usize, total_steps: usize) -> f64 {
    if total_steps == 0 {
        return 0.0;
    }
    let pct = (current_step_index as f64 + 1.0) / total_steps as f64 * 100.0;
    pct.min(100.0)
}

// ---------------------------------------------------------------------------
// Run entity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardRun {
    pub id: EntityId,
    pub wizard_id: EntityId,
    #[serde(default)]
    pub user_id: Option<EntityId>,
    #[serde(default)]
    pub run_name: Option<String>,
    #[serde(default)]
    pub run_description: Option<String>,
    pub status: RunStatus,
    #[serde(default)]
    pub current_step_index: u32,
    #[serde(default)]
    pub total_steps: Option<u32>,
    #[serde(default)]
    pub progress_percentage: f64,
    pub started_at: Timestamp,
    #[serde(default)]
    pub completed_at: Option<Timestamp>,
    pub last_accessed_at: Timestamp,
    #[serde(default)]
    pub is_stored: bool,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A stored step row of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResponse {
    pub id: EntityId,
    pub run_id: EntityId,
    pub step_id: EntityId,
    pub step_index: u32,
    #[serde(default)]
    pub step_name: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub time_spent_seconds: i64,
}

/// A stored option-set answer of a run.
///
/// `response_value` is the `{ "value": ... }` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSetResponse {
    pub id: EntityId,
    pub run_id: EntityId,
    pub step_response_id: EntityId,
    pub option_set_id: EntityId,
    #[serde(default)]
    pub option_set_name: Option<String>,
    #[serde(default)]
    pub selection_type: Option<String>,
    #[serde(default)]
    pub response_value: serde_json::Value,
    #[serde(default)]
    pub selected_options: Vec<EntityId>,
}

/// A run with every stored answer row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardRunDetail {
    #[serde(flatten)]
    pub run: WizardRun,
    #[serde(default)]
    pub step_responses: Vec<StepResponse>,
    #[serde(default)]
    pub option_set_responses: Vec<OptionSetResponse>,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// DTO for creating a run. The eager create on open sends only `wizard_id`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateWizardRun {
    pub wizard_id: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255))]
    pub run_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl CreateWizardRun {
    /// Anonymous run carrying only the wizard reference.
    pub fn for_wizard(wizard_id: EntityId) -> Self {
        Self {
            wizard_id,
            run_name: None,
            run_description: None,
            tags: None,
        }
    }
}

/// DTO for a partial run update. Unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct UpdateWizardRun {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255))]
    pub run_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_stored: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RunProgressUpdate {
    pub current_step_index: u32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CompleteRunRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_description: Option<String>,
    pub save_to_store: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateStepResponse {
    pub run_id: EntityId,
    pub step_id: EntityId,
    pub step_index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_name: Option<String>,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateOptionSetResponse {
    pub run_id: EntityId,
    pub step_response_id: EntityId,
    pub option_set_id: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_set_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection_type: Option<String>,
    pub response_value: serde_json::Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub selected_options: Vec<EntityId>,
}

// ---------------------------------------------------------------------------
// Listing and statistics
// ---------------------------------------------------------------------------

/// Query filters for the run listing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wizard_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RunStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_stored: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunListPage {
    pub runs: Vec<WizardRun>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub total_runs: u64,
    pub in_progress: u64,
    pub completed: u64,
    pub abandoned: u64,
    pub stored: u64,
    pub favorites: u64,
    #[serde(default)]
    pub total_time_spent: f64,
    #[serde(default)]
    pub average_completion_time: Option<f64>,
}

// ---------------------------------------------------------------------------
// Sharing and comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareType {
    View,
    Edit,
    Clone,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateRunShare {
    pub run_id: EntityId,
    pub share_type: ShareType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunShare {
    pub id: EntityId,
    pub run_id: EntityId,
    pub share_token: String,
    pub shared_by: EntityId,
    pub share_type: ShareType,
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
    #[serde(default)]
    pub access_count: u64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateRunComparison {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison_name: Option<String>,
    #[validate(length(min = 2, message = "A comparison needs at least two runs"))]
    pub run_ids: Vec<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunComparison {
    pub id: EntityId,
    #[serde(default)]
    pub comparison_name: Option<String>,
    pub run_ids: Vec<EntityId>,
    pub created_by: EntityId,
    pub created_at: Timestamp,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_names_match_wire_format() {
        for status in [RunStatus::InProgress, RunStatus::Completed, RunStatus::Abandoned] {
            assert_eq!(serde_json::to_value(status).unwrap(), json!(status.as_str()));
        }
        assert!(serde_json::from_value::<RunStatus>(json!("stored")).is_err());
    }

    #[test]
    fn progress_counts_current_step_as_done() {
        assert_eq!(progress_percentage(0, 4), 25.0);
        assert_eq!(progress_percentage(3, 4), 100.0);
    }

    #[test]
    fn progress_without_steps_is_zero() {
        assert_eq!(progress_percentage(0, 0), 0.0);
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(progress_percentage(9, 4), 100.0);
    }

    #[test]
    fn eager_create_sends_only_wizard_id() {
        let id = EntityId::from_u128(7);
        let body = serde_json::to_value(CreateWizardRun::for_wizard(id)).unwrap();
        assert_eq!(body, json!({ "wizard_id": id.to_string() }));
    }

    #[test]
    fn update_skips_unset_fields() {
        let update = UpdateWizardRun {
            is_stored: Some(true),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(update).unwrap(),
            json!({ "is_stored": true })
        );
    }

    #[test]
    fn comparison_requires_two_runs() {
        let one = CreateRunComparison {
            comparison_name: None,
            run_ids: vec![EntityId::from_u128(1)],
        };
        assert!(one.validate().is_err());

        let two = CreateRunComparison {
            comparison_name: Some("a vs b".into()),
            run_ids: vec![EntityId::from_u128(1), EntityId::from_u128(2)],
        };
        assert!(two.validate().is_ok());
    }

    #[test]
    fn run_detail_flattens_run_fields() {
        let detail: WizardRunDetail = serde_json::from_value(json!({
            "id": "00000000-0000-0000-0000-000000000001",
            "wizard_id": "00000000-0000-0000-0000-000000000002",
            "status": "completed",
            "current_step_index": 2,
            "started_at": "2026-01-01T00:00:00Z",
            "last_accessed_at": "2026-01-01T00:05:00Z",
            "is_stored": true,
            "option_set_responses": [{
                "id": "00000000-0000-0000-0000-000000000010",
                "run_id": "00000000-0000-0000-0000-000000000001",
                "step_response_id": "00000000-0000-0000-0000-000000000011",
                "option_set_id": "00000000-0000-0000-0000-000000000012",
                "response_value": { "value": "red" }
            }]
        }))
        .unwrap();

        assert_eq!(detail.run.status, RunStatus::Completed);
        assert!(detail.run.is_stored);
        assert!(detail.step_responses.is_empty());
        assert_eq!(detail.option_set_responses.len(), 1);
    }
}
