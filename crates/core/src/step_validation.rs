//! Validation that gates advancing past a step.

use crate::dependency::{is_option_set_hidden, is_option_set_required, selected_option_ids};
use crate::models::wizard::{SelectionType, Wizard};
use crate::responses::{FieldErrors, ResponseStore, ResponseValue};

pub const MSG_REQUIRED: &str = "This field is required";

/// Validate the answers of `step_index`.
///
/// Every visible option set that is required (statically or through a met
/// `require_if`) must have a non-empty answer. A required `multiple_select`
/// answer must also respect `min_selections` / `max_selections`. Hidden
/// option sets are skipped. Returns the per-field messages on failure.
pub fn validate_step(
    wizard: &Wizard,
    step_index: usize,
    responses: &ResponseStore,
) -> Result<(), FieldErrors> {
    let Some(step) = wizard.steps.get(step_index) else {
        return Ok(());
    };
    let selected = selected_option_ids(wizard, responses, step_index);
    let mut errors = FieldErrors::new();

    for option_set in &step.option_sets {
        if is_option_set_hidden(option_set, &selected)
            || !is_option_set_required(option_set, &selected)
        {
            continue;
        }

        let answer = responses.get(option_set.id).filter(|v| !v.is_empty());
        let Some(answer) = answer else {
            errors.insert(option_set.id, MSG_REQUIRED.to_string());
            continue;
        };

        if option_set.selection_type != SelectionType::MultipleSelect {
            continue;
        }
        if let ResponseValue::Multi(values) = answer {
            let count = values.len();
            let min = option_set.min_selections as usize;
            if min > 0 && count < min {
                errors.insert(
                    option_set.id,
                    format!("Please select at least {min} options"),
                );
            }
            if let Some(max) = option_set.max_selections.filter(|m| *m > 0) {
                if count > max as usize {
                    errors.insert(
                        option_set.id,
                        format!("Please select at most {max} options"),
                    );
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
