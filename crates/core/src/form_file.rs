//! Saved form files.
//!
//! A form file is a YAML (or JSON) mapping of camelCase field keys to string or boolean
//! values. Loading replays the values through the reducer: text fields first, flags second,
//! so toggle side effects apply to the loaded text exactly as they would during editing.
//!
//! Values that YAML reads as numbers (for example an unquoted postal code) must be quoted.

use crate::error::{RegistrationError, RegistrationResult};
use crate::fields::{FieldKey, FieldValue};
use crate::form::{FormAction, FormState};
use std::collections::BTreeMap;
use std::path::Path;

/// Form file operations.
pub struct FormFile;

impl FormFile {
    /// Parse form file text into a form state.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::FormFile`] naming the offending key when the text is not
    /// a mapping of known keys, or when a value has the wrong kind for its key.
    pub fn parse(text: &str) -> RegistrationResult<FormState> {
        let deserializer = serde_yaml::Deserializer::from_str(text);
        let values: BTreeMap<FieldKey, FieldValue> =
            match serde_path_to_error::deserialize(deserializer) {
                Ok(parsed) => parsed,
                Err(err) => {
                    let path = err.path().to_string();
                    let source = err.into_inner();
                    let path = if path.is_empty() || path == "." {
                        "<root>".to_string()
                    } else {
                        path
                    };
                    return Err(RegistrationError::FormFile {
                        path,
                        message: source.to_string(),
                    });
                }
            };

        if let Some((key, _)) = values.iter().find(|(k, v)| !v.fits(**k)) {
            let expected = if key.is_flag() { "a boolean" } else { "a string" };
            return Err(RegistrationError::FormFile {
                path: key.to_string(),
                message: format!("expected {expected}"),
            });
        }

        let (flags, texts): (Vec<_>, Vec<_>) = values.into_iter().partition(|(k, _)| k.is_flag());
        let actions = texts
            .into_iter()
            .chain(flags)
            .map(|(field, value)| match value {
                FieldValue::Text(value) => FormAction::SetText { field, value },
                FieldValue::Flag(value) => FormAction::SetFlag { field, value },
            });

        Ok(FormState::new().reduce_all(actions))
    }

    /// Read and parse a form file from disk.
    pub fn load(path: &Path) -> RegistrationResult<FormState> {
        let text = std::fs::read_to_string(path).map_err(RegistrationError::FileRead)?;
        Self::parse(&text)
    }

    /// Render every field of `state` as YAML.
    pub fn render(state: &FormState) -> RegistrationResult<String> {
        let values: BTreeMap<FieldKey, FieldValue> = FieldKey::ALL
            .into_iter()
            .map(|k| (k, state.value(k)))
            .collect();
        serde_yaml::to_string(&values)
            .map_err(|e| RegistrationError::InvalidInput(format!("failed to render form: {e}")))
    }
}
