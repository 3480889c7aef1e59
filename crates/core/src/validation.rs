//! Field validation.
//!
//! Validators are pure functions of the field, the whole form state, and the date used as
//! "today". Only fields in the active set are validated; see [`crate::sections`].

use crate::fields::FieldKey;
use crate::form::FormState;
use chrono::NaiveDate;
use registration_types::{Gender, NonEmptyText};
use std::collections::BTreeMap;

/// Date format accepted for `birthdate` and `deathDate`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Outcome of validating one field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldValidation {
    pub valid: bool,
    pub message: Option<String>,
}

impl FieldValidation {
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }
}

/// Per-field outcomes for every active field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationResult(BTreeMap<FieldKey, FieldValidation>);

impl ValidationResult {
    /// True iff every active field is valid.
    pub fn is_valid(&self) -> bool {
        self.0.values().all(|v| v.valid)
    }

    pub fn get(&self, field: FieldKey) -> Option<&FieldValidation> {
        self.0.get(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &FieldValidation)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    /// Messages of the invalid fields only.
    pub fn errors(&self) -> BTreeMap<FieldKey, String> {
        self.0
            .iter()
            .filter(|(_, v)| !v.valid)
            .map(|(k, v)| (*k, v.message.clone().unwrap_or_default()))
            .collect()
    }

    /// Convert into a failure if any field is invalid.
    pub fn into_failure(self) -> Option<ValidationFailure> {
        if self.is_valid() {
            None
        } else {
            Some(ValidationFailure {
                errors: self.errors(),
            })
        }
    }
}

/// One or more active fields are invalid. Submission is blocked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationFailure {
    pub errors: BTreeMap<FieldKey, String>,
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(k, m)| format!("{k}: {m}"))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Validates a single field against the current form state.
///
/// Fields outside the active set are reported valid; callers that need the active-set
/// filtering should use [`validate_form`].
///
/// # Arguments
///
/// * `field` - The field to check.
/// * `state` - The whole form; toggles decide whether name and death rules apply.
/// * `today` - Upper bound for `birthdate` and `deathDate`.
///
/// # Returns
///
/// A [`FieldValidation`] that is valid, or invalid with a message suitable for display next
/// to the field. Dates are trimmed before parsing and must be `YYYY-MM-DD`, no later than
/// `today`.
pub fn validate(field: FieldKey, state: &FormState, today: NaiveDate) -> FieldValidation {
    let value = state.text(field);
    let toggles = state.toggles();

    match field {
        FieldKey::GivenName | FieldKey::FamilyName => {
            if toggles.unidentified_patient {
                FieldValidation::ok()
            } else {
                required(value)
            }
        }
        FieldKey::Birthdate => past_or_present_date(value, today),
        FieldKey::Gender => match Gender::from_label(value) {
            Ok(_) => FieldValidation::ok(),
            Err(registration_types::TextError::Empty) => FieldValidation::invalid("Required"),
            Err(_) => FieldValidation::invalid(format!(
                "Must be one of: {}",
                Gender::ALL
                    .iter()
                    .map(|g| g.label())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        },
        FieldKey::DeathDate if toggles.is_dead => past_or_present_date(value, today),
        FieldKey::DeathCause if toggles.is_dead => required(value),
        FieldKey::AdditionalGivenName
        | FieldKey::AdditionalMiddleName
        | FieldKey::AdditionalFamilyName
            if toggles.add_name_in_local_language =>
        {
            required(value)
        }
        _ => FieldValidation::ok(),
    }
}

/// Validates every active field.
pub fn validate_form(state: &FormState, today: NaiveDate) -> ValidationResult {
    ValidationResult(
        state
            .active_fields()
            .iter()
            .map(|field| (field, validate(field, state, today)))
            .collect(),
    )
}

fn required(value: &str) -> FieldValidation {
    match NonEmptyText::new(value) {
        Ok(_) => FieldValidation::ok(),
        Err(_) => FieldValidation::invalid("Required"),
    }
}

fn past_or_present_date(value: &str, today: NaiveDate) -> FieldValidation {
    let value = value.trim();
    if value.is_empty() {
        return FieldValidation::invalid("Required");
    }
    match NaiveDate::parse_from_str(value, DATE_FORMAT) {
        Ok(date) if date > today => FieldValidation::invalid("Date cannot be in the future"),
        Ok(_) => FieldValidation::ok(),
        Err(_) => FieldValidation::invalid("Must be a date in YYYY-MM-DD format"),
    }
}
