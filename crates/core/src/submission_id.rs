//! Identifiers for payloads accepted into the outbox.
//!
//! Ids use the canonical form **32 lowercase hexadecimal characters** (no hyphens), which is
//! what `Uuid::new_v4().simple()` produces. Accepted payloads are stored under
//! `outbox/<id[0..2]>/<id[2..4]>/<id>/` so that no single directory grows without bound.

use crate::error::{RegistrationError, RegistrationResult};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Canonical identifier of one outbox entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubmissionId(Uuid);

impl Default for SubmissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an id that must already be canonical.
    ///
    /// Hyphenated or uppercase forms are rejected rather than normalised.
    pub fn parse(input: &str) -> RegistrationResult<Self> {
        if !Self::is_canonical(input) {
            return Err(RegistrationError::InvalidInput(format!(
                "submission id must be 32 lowercase hex characters without hyphens, got: '{input}'"
            )));
        }
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| RegistrationError::InvalidInput(format!("invalid submission id: {e}")))
    }

    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32 && input.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    /// Directory for this id beneath `parent_dir`.
    pub fn sharded_dir(&self, parent_dir: &Path) -> PathBuf {
        let canonical = self.0.simple().to_string();
        let s1 = &canonical[0..2];
        let s2 = &canonical[2..4];
        parent_dir.join(s1).join(s2).join(&canonical)
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for SubmissionId {
    type Err = RegistrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for SubmissionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_canonical() {
        let id = SubmissionId::new();
        assert!(SubmissionId::is_canonical(&id.to_string()));
    }

    #[test]
    fn parse_rejects_non_canonical_forms() {
        assert!(SubmissionId::parse("550e8400-e29b-41d4-a716-446655440000").is_err());
        assert!(SubmissionId::parse("550E8400E29B41D4A716446655440000").is_err());
        assert!(SubmissionId::parse("550e8400").is_err());
        assert!(SubmissionId::parse("550e8400e29b41d4a716446655440000").is_ok());
    }

    #[test]
    fn sharded_dir_uses_first_four_characters() {
        let id: SubmissionId = "550e8400e29b41d4a716446655440000".parse().unwrap();
        assert_eq!(
            id.sharded_dir(Path::new("outbox")),
            PathBuf::from("outbox/55/0e/550e8400e29b41d4a716446655440000")
        );
    }
}
