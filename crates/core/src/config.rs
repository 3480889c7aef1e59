//! Registration runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into services, so that
//! nothing reads process-wide environment variables while a form is being submitted.

use crate::constants::{DEFAULT_INBOX_DIR, DEFAULT_OUTBOX_DIR, DEFAULT_PERSON_ATTRIBUTE_TYPE};
use crate::error::RegistrationResult;
use crate::payload::AssemblyOptions;
use registration_types::NonEmptyText;
use std::path::{Path, PathBuf};

/// Configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct RegistrationConfig {
    inbox_dir: PathBuf,
    outbox_dir: PathBuf,
    person_attribute_type: NonEmptyText,
}

impl RegistrationConfig {
    pub fn new(
        inbox_dir: PathBuf,
        outbox_dir: PathBuf,
        person_attribute_type: NonEmptyText,
    ) -> Self {
        Self {
            inbox_dir,
            outbox_dir,
            person_attribute_type,
        }
    }

    /// Build a configuration from raw (typically environment) values.
    ///
    /// Missing or blank values fall back to the defaults in [`crate::constants`].
    pub fn from_values(
        inbox_dir: Option<String>,
        outbox_dir: Option<String>,
        person_attribute_type: Option<String>,
    ) -> RegistrationResult<Self> {
        let inbox_dir = non_blank(inbox_dir).unwrap_or_else(|| DEFAULT_INBOX_DIR.into());
        let outbox_dir = non_blank(outbox_dir).unwrap_or_else(|| DEFAULT_OUTBOX_DIR.into());
        let person_attribute_type = NonEmptyText::new(
            non_blank(person_attribute_type)
                .unwrap_or_else(|| DEFAULT_PERSON_ATTRIBUTE_TYPE.into()),
        )?;

        Ok(Self::new(
            PathBuf::from(inbox_dir),
            PathBuf::from(outbox_dir),
            person_attribute_type,
        ))
    }

    pub fn inbox_dir(&self) -> &Path {
        &self.inbox_dir
    }

    pub fn outbox_dir(&self) -> &Path {
        &self.outbox_dir
    }

    pub fn person_attribute_type(&self) -> &NonEmptyText {
        &self.person_attribute_type
    }

    pub fn assembly_options(&self) -> AssemblyOptions {
        AssemblyOptions {
            person_attribute_type: self.person_attribute_type.clone(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_use_defaults() {
        let cfg = RegistrationConfig::from_values(None, Some("  ".into()), Some(String::new()))
            .expect("defaults are valid");
        assert_eq!(cfg.inbox_dir(), Path::new(DEFAULT_INBOX_DIR));
        assert_eq!(cfg.outbox_dir(), Path::new(DEFAULT_OUTBOX_DIR));
        assert_eq!(
            cfg.person_attribute_type().as_str(),
            DEFAULT_PERSON_ATTRIBUTE_TYPE
        );
    }

    #[test]
    fn explicit_values_are_trimmed() {
        let cfg = RegistrationConfig::from_values(
            Some("/tmp/in ".into()),
            Some(" /tmp/out".into()),
            Some(" phone ".into()),
        )
        .expect("valid config");
        assert_eq!(cfg.inbox_dir(), Path::new("/tmp/in"));
        assert_eq!(cfg.outbox_dir(), Path::new("/tmp/out"));
        assert_eq!(cfg.assembly_options().person_attribute_type.as_str(), "phone");
    }
}
