//! Form state and its reducer.
//!
//! A [`FormState`] is an owned value. It only changes through [`FormState::reduce`], which is
//! total: every action yields a state, and actions that do not apply leave it unchanged.

use crate::fields::{FieldKey, FieldValue};
use crate::sections::{ActiveFieldSet, Section, Toggles};
use std::collections::BTreeMap;

/// A single edit to the form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormAction {
    /// Replace the value of a text field.
    SetText { field: FieldKey, value: String },
    /// Set a flag field. Section toggles run their transition side effects.
    SetFlag { field: FieldKey, value: bool },
    /// Return to the freshly mounted state.
    Reset,
}

impl FormAction {
    pub fn set_text(field: FieldKey, value: impl Into<String>) -> Self {
        FormAction::SetText {
            field,
            value: value.into(),
        }
    }

    pub fn set_flag(field: FieldKey, value: bool) -> Self {
        FormAction::SetFlag { field, value }
    }

    pub fn toggle(section: Section, on: bool) -> Self {
        FormAction::SetFlag {
            field: section.toggle_field(),
            value: on,
        }
    }
}

/// Current value of every declared field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormState {
    values: BTreeMap<FieldKey, FieldValue>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            values: FieldKey::ALL
                .into_iter()
                .map(|k| (k, k.default_value()))
                .collect(),
        }
    }
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text value of `field`, or `""` for flag fields.
    pub fn text(&self, field: FieldKey) -> &str {
        self.values
            .get(&field)
            .and_then(FieldValue::as_text)
            .unwrap_or("")
    }

    /// Flag value of `field`, or `false` for text fields.
    pub fn flag(&self, field: FieldKey) -> bool {
        self.values
            .get(&field)
            .and_then(FieldValue::as_flag)
            .unwrap_or(false)
    }

    pub fn value(&self, field: FieldKey) -> FieldValue {
        self.values
            .get(&field)
            .cloned()
            .unwrap_or_else(|| field.default_value())
    }

    pub fn toggles(&self) -> Toggles {
        Toggles {
            unidentified_patient: self.flag(FieldKey::UnidentifiedPatient),
            add_name_in_local_language: self.flag(FieldKey::AddNameInLocalLanguage),
            is_dead: self.flag(FieldKey::IsDead),
        }
    }

    pub fn active_fields(&self) -> ActiveFieldSet {
        ActiveFieldSet::from_toggles(self.toggles())
    }

    /// Apply one action and return the resulting state.
    ///
    /// Every action is accepted; actions that cannot apply leave the state unchanged.
    ///
    /// # Arguments
    ///
    /// * `action` - The edit to apply.
    ///
    /// # Returns
    ///
    /// The next state. In particular:
    /// - a value of the wrong kind for its field is ignored with a warning;
    /// - edits to the primary name fields are ignored while the patient is unidentified;
    /// - setting a toggle to its current value changes nothing;
    /// - turning the unidentified toggle on clears the primary name fields;
    /// - [`FormAction::Reset`] restores every field to its default.
    pub fn reduce(mut self, action: FormAction) -> Self {
        match action {
            FormAction::Reset => Self::default(),
            FormAction::SetText { field, value } => {
                if field.is_flag() {
                    tracing::warn!("ignoring text value for flag field {field}");
                    return self;
                }
                if self.flag(FieldKey::UnidentifiedPatient)
                    && Section::UnidentifiedPatient
                        .cleared_on_enable()
                        .contains(&field)
                {
                    tracing::debug!("{field} is held empty while the patient is unidentified");
                    return self;
                }
                self.values.insert(field, FieldValue::Text(value));
                self
            }
            FormAction::SetFlag { field, value } => {
                if !field.is_flag() {
                    tracing::warn!("ignoring flag value for text field {field}");
                    return self;
                }
                if self.flag(field) == value {
                    return self;
                }
                self.values.insert(field, FieldValue::Flag(value));
                if let (Some(section), true) = (Section::for_toggle(field), value) {
                    for cleared in section.cleared_on_enable() {
                        self.values
                            .insert(*cleared, FieldValue::Text(String::new()));
                    }
                }
                tracing::debug!("{field} set to {value}");
                self
            }
        }
    }

    /// Apply a sequence of actions in order.
    pub fn reduce_all(self, actions: impl IntoIterator<Item = FormAction>) -> Self {
        actions.into_iter().fold(self, Self::reduce)
    }
}
