//! Wizard definition entity models and DTOs.
//!
//! A [`Wizard`] is a read-only template during a run: an ordered list of
//! [`Step`]s, each holding [`OptionSet`]s, each holding [`WizardOption`]s with
//! their [`OptionDependency`] edges.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{EntityId, Timestamp};

// ---------------------------------------------------------------------------
// Selection type
// ---------------------------------------------------------------------------

/// The input kind of an option set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionType {
    SingleSelect,
    MultipleSelect,
    TextInput,
    NumberInput,
    DateInput,
    TimeInput,
    DatetimeInput,
    FileUpload,
    Rating,
    Slider,
    ColorPicker,
    RichText,
}

impl SelectionType {
    /// Convert to the backend string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleSelect => "single_select",
            Self::MultipleSelect => "multiple_select",
            Self::TextInput => "text_input",
            Self::NumberInput => "number_input",
            Self::DateInput => "date_input",
            Self::TimeInput => "time_input",
            Self::DatetimeInput => "datetime_input",
            Self::FileUpload => "file_upload",
            Self::Rating => "rating",
            Self::Slider => "slider",
            Self::ColorPicker => "color_picker",
            Self::RichText => "rich_text",
        }
    }

    /// Whether answers are picked from the option list.
    ///
    /// Only these types can be hidden for having zero visible options.
    pub fn is_option_based(&self) -> bool {
        matches!(self, Self::SingleSelect | Self::MultipleSelect)
    }
}

// ---------------------------------------------------------------------------
// Dependencies
// ---------------------------------------------------------------------------

/// How an option reacts to the selection of the option it depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyType {
    ShowIf,
    HideIf,
    RequireIf,
    DisableIf,
}

impl DependencyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShowIf => "show_if",
            Self::HideIf => "hide_if",
            Self::RequireIf => "require_if",
            Self::DisableIf => "disable_if",
        }
    }
}

/// Directed edge `option_id -> depends_on_option_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDependency {
    pub id: EntityId,
    pub option_id: EntityId,
    pub depends_on_option_id: EntityId,
    pub dependency_type: DependencyType,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

/// DTO for creating a dependency from the wizard builder.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOptionDependency {
    pub depends_on_option_id: EntityId,
    pub dependency_type: DependencyType,
}

// ---------------------------------------------------------------------------
// Options, option sets, steps
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardOption {
    pub id: EntityId,
    pub option_set_id: EntityId,
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_recommended: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub dependencies: Vec<OptionDependency>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSet {
    pub id: EntityId,
    pub step_id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub selection_type: SelectionType,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub min_selections: u32,
    #[serde(default)]
    pub max_selections: Option<u32>,
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub max_value: Option<f64>,
    #[serde(default)]
    pub step_increment: Option<f64>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub help_text: Option<String>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub options: Vec<WizardOption>,
}

impl OptionSet {
    /// Find the option whose `value` equals `value`.
    pub fn option_by_value(&self, value: &str) -> Option<&WizardOption> {
        self.options.iter().find(|o| o.value == value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: EntityId,
    pub wizard_id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub help_text: Option<String>,
    #[serde(default)]
    pub step_order: i32,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_skippable: bool,
    #[serde(default = "default_true")]
    pub allow_back_navigation: bool,
    #[serde(default)]
    pub option_sets: Vec<OptionSet>,
}

// ---------------------------------------------------------------------------
// Wizard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardCategory {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// A full wizard definition with its nested steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wizard {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<EntityId>,
    #[serde(default)]
    pub created_by: Option<EntityId>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub require_login: bool,
    #[serde(default)]
    pub estimated_time: Option<i32>,
    #[serde(default)]
    pub difficulty_level: Option<DifficultyLevel>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

impl Wizard {
    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    /// Look up an option set anywhere in the wizard.
    pub fn option_set(&self, option_set_id: EntityId) -> Option<&OptionSet> {
        self.steps
            .iter()
            .flat_map(|s| s.option_sets.iter())
            .find(|os| os.id == option_set_id)
    }
}

/// Summary row returned by the wizard browser listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardListItem {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub require_login: bool,
    #[serde(default)]
    pub estimated_time: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub total_sessions: i64,
    #[serde(default)]
    pub completed_sessions: i64,
    #[serde(default)]
    pub category: Option<WizardCategory>,
}

/// Query parameters for the wizard listing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WizardFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// DTO for creating an empty wizard shell; steps are added in the builder.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateWizard {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<EntityId>,
    pub require_login: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty_level: Option<DifficultyLevel>,
    pub tags: Vec<String>,
}

/// DTO for updating wizard metadata from the builder.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateWizard {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

fn default_true() -> bool {
    true
}
