//! Option dependency evaluator -- pure logic, no network access.
//!
//! Given the options selected so far, decides for every option whether it is
//! visible or disabled, and for every option set whether it is required,
//! disabled, or hidden altogether.
//!
//! Rules are combined per type with logical OR:
//!
//! | Type         | Met when the referenced option is selected, and then... |
//! |--------------|----------------------------------------------------------|
//! | `show_if`    | nothing; an unmet `show_if` hides the option             |
//! | `hide_if`    | the option is hidden                                     |
//! | `require_if` | the owning option set becomes required                   |
//! | `disable_if` | the option (and, for scalar inputs, its set) is disabled |
//!
//! A dependency on an option id that does not exist is never met.

use std::collections::HashSet;

use serde::Serialize;

use crate::models::wizard::{DependencyType, OptionDependency, OptionSet, Wizard, WizardOption};
use crate::responses::{ResponseStore, ResponseValue};
use crate::types::EntityId;

/// Ids of the options currently selected.
pub type SelectedOptions = HashSet<EntityId>;

/// Evaluated state of a single option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptionState {
    pub visible: bool,
    pub disabled: bool,
}

/// Evaluated state of an option set and its options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionSetView {
    pub option_set_id: EntityId,
    /// Skipped entirely when rendering and validating.
    pub hidden: bool,
    pub required: bool,
    pub disabled: bool,
    pub options: Vec<(EntityId, OptionState)>,
}

/// Evaluated state of every option set in one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepView {
    pub step_id: EntityId,
    pub step_index: usize,
    pub option_sets: Vec<OptionSetView>,
}

// ---------------------------------------------------------------------------
// Selection collection
// ---------------------------------------------------------------------------

/// Collect the option ids selected in steps `0..=through_step`.
///
/// Text answers select the option with an equal `value`; list answers select
/// every option whose `value` is listed. Numeric answers select nothing.
pub fn selected_option_ids(
    wizard: &Wizard,
    responses: &ResponseStore,
    through_step: usize,
) -> SelectedOptions {
    let mut selected = SelectedOptions::new();

    for step in wizard.steps.iter().take(through_step.saturating_add(1)) {
        for option_set in &step.option_sets {
            if let Some(value) = responses.get(option_set.id) {
                selected.extend(options_selected_by(option_set, value));
            }
        }
    }

    selected
}

/// Ids of the options of `option_set` that `value` selects, in option order.
pub fn options_selected_by(option_set: &OptionSet, value: &ResponseValue) -> Vec<EntityId> {
    match value {
        ResponseValue::Text(text) if !text.is_empty() => option_set
            .option_by_value(text)
            .map(|o| vec![o.id])
            .unwrap_or_default(),
        ResponseValue::Multi(values) => option_set
            .options
            .iter()
            .filter(|o| values.contains(&o.value))
            .map(|o| o.id)
            .collect(),
        _ => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Option-level rules
// ---------------------------------------------------------------------------

fn is_met(dep: &OptionDependency, selected: &SelectedOptions) -> bool {
    selected.contains(&dep.depends_on_option_id)
}

fn any_met(deps: &[OptionDependency], kind: DependencyType, selected: &SelectedOptions) -> bool {
    deps.iter()
        .any(|d| d.dependency_type == kind && is_met(d, selected))
}

/// Whether an option is shown under the current selections.
///
/// Any unmet `show_if` or any met `hide_if` hides it, so a met `hide_if`
/// wins over a satisfied `show_if`.
pub fn is_option_visible(option: &WizardOption, selected: &SelectedOptions) -> bool {
    option.dependencies.iter().all(|dep| match dep.dependency_type {
        DependencyType::ShowIf => is_met(dep, selected),
        DependencyType::HideIf => !is_met(dep, selected),
        DependencyType::RequireIf | DependencyType::DisableIf => true,
    })
}

pub fn is_option_disabled(option: &WizardOption, selected: &SelectedOptions) -> bool {
    any_met(&option.dependencies, DependencyType::DisableIf, selected)
}

pub fn evaluate_option(option: &WizardOption, selected: &SelectedOptions) -> OptionState {
    OptionState {
        visible: is_option_visible(option, selected),
        disabled: is_option_disabled(option, selected),
    }
}

// ---------------------------------------------------------------------------
// Option-set-level rules
// ---------------------------------------------------------------------------

/// Static `is_required`, or any option carries a met `require_if`.
pub fn is_option_set_required(option_set: &OptionSet, selected: &SelectedOptions) -> bool {
    option_set.is_required
        || option_set
            .options
            .iter()
            .any(|o| any_met(&o.dependencies, DependencyType::RequireIf, selected))
}

/// Any option carries a met `disable_if`. Used for scalar inputs, which
/// have no per-option controls to disable.
pub fn is_option_set_disabled(option_set: &OptionSet, selected: &SelectedOptions) -> bool {
    option_set
        .options
        .iter()
        .any(|o| any_met(&o.dependencies, DependencyType::DisableIf, selected))
}

pub fn visible_options<'a>(
    option_set: &'a OptionSet,
    selected: &SelectedOptions,
) -> Vec<&'a WizardOption> {
    option_set
        .options
        .iter()
        .filter(|o| is_option_visible(o, selected))
        .collect()
}

/// An option-based set with no visible option left is skipped. Scalar
/// inputs are never hidden this way.
pub fn is_option_set_hidden(option_set: &OptionSet, selected: &SelectedOptions) -> bool {
    option_set.selection_type.is_option_based()
        && !option_set
            .options
            .iter()
            .any(|o| is_option_visible(o, selected))
}

pub fn evaluate_option_set(option_set: &OptionSet, selected: &SelectedOptions) -> OptionSetView {
    OptionSetView {
        option_set_id: option_set.id,
        hidden: is_option_set_hidden(option_set, selected),
        required: is_option_set_required(option_set, selected),
        disabled: is_option_set_disabled(option_set, selected),
        options: option_set
            .options
            .iter()
            .map(|o| (o.id, evaluate_option(o, selected)))
            .collect(),
    }
}

/// Evaluate every option set of `step_index` against the selections made in
/// steps up to and including it. `None` when the index is out of range.
pub fn evaluate_step(
    wizard: &Wizard,
    step_index: usize,
    responses: &ResponseStore,
) -> Option<StepView> {
    let step = wizard.steps.get(step_index)?;
    let selected = selected_option_ids(wizard, responses, step_index);
    Some(StepView {
        step_id: step.id,
        step_index,
        option_sets: step
            .option_sets
            .iter()
            .map(|os| evaluate_option_set(os, &selected))
            .collect(),
    })
}
