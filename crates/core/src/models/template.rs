//! Wizard template models: reusable wizard structures, their ratings, and
//! the clone request that turns one into a new wizard.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::wizard::DifficultyLevel;
use crate::types::{EntityId, Timestamp};

/// Lowest accepted star rating.
pub const MIN_RATING: u8 = 1;

/// Highest accepted star rating.
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardTemplate {
    pub id: EntityId,
    pub template_name: String,
    #[serde(default)]
    pub template_description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty_level: Option<DifficultyLevel>,
    #[serde(default)]
    pub estimated_time: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub step_count: Option<u32>,
    #[serde(default)]
    pub option_set_count: Option<u32>,
    #[serde(default)]
    pub is_system_template: bool,
    pub created_by: EntityId,
    pub created_at: Timestamp,
    #[serde(default)]
    pub usage_count: u64,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub wizard_structure: serde_json::Value,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateWizardTemplate {
    #[validate(length(min = 1, max = 255))]
    pub template_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty_level: Option<DifficultyLevel>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub wizard_structure: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateListPage {
    pub templates: Vec<WizardTemplate>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty_level: Option<DifficultyLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_system_template: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct CloneTemplateRequest {
    pub template_id: EntityId,
    #[validate(length(min = 1, max = 255))]
    pub wizard_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wizard_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloneTemplateResponse {
    pub wizard_id: EntityId,
    pub message: String,
}

/// Rating submission. Creates or replaces the caller's rating.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RateTemplate {
    pub template_id: EntityId,
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRating {
    pub id: EntityId,
    pub template_id: EntityId,
    pub user_id: EntityId,
    pub rating: u8,
    #[serde(default)]
    pub review_text: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateStats {
    pub template_id: EntityId,
    pub usage_count: u64,
    pub average_rating: f64,
    pub total_ratings: u64,
    /// Star value (as a string key, "1".."5") to count.
    #[serde(default)]
    pub rating_distribution: BTreeMap<String, u64>,
}
