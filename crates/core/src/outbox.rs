//! File-backed submission collaborator.
//!
//! Each accepted payload is written as pretty JSON to
//! `<outbox>/<s1>/<s2>/<id>/patient.json`. A downstream process forwards outbox entries to
//! the registry; this crate only produces them.

use crate::constants::PAYLOAD_FILENAME;
use crate::error::SubmitError;
use crate::payload::SubmissionPayload;
use crate::submission::PatientSubmitter;
use crate::submission_id::SubmissionId;
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

/// Acknowledgement for a payload written to the outbox.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OutboxAck {
    pub id: SubmissionId,
    pub path: PathBuf,
}

#[derive(Clone, Debug)]
pub struct OutboxSubmitter {
    dir: PathBuf,
}

impl OutboxSubmitter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl PatientSubmitter for OutboxSubmitter {
    type Ack = OutboxAck;

    async fn submit_patient(
        &self,
        abort: CancellationToken,
        payload: &SubmissionPayload,
    ) -> Result<OutboxAck, SubmitError> {
        if abort.is_cancelled() {
            return Err(SubmitError::Aborted);
        }
        let json = serde_json::to_string_pretty(payload)?;

        let id = SubmissionId::new();
        let entry_dir = id.sharded_dir(&self.dir);
        tokio::fs::create_dir_all(&entry_dir).await?;

        let path = entry_dir.join(PAYLOAD_FILENAME);
        tokio::fs::write(&path, json).await?;
        tracing::info!("wrote outbox entry {id}");

        Ok(OutboxAck { id, path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldKey;
    use crate::form::{FormAction, FormState};
    use crate::payload::assemble;

    fn payload() -> SubmissionPayload {
        assemble(&FormState::new().reduce_all([
            FormAction::set_text(FieldKey::GivenName, "Paul"),
            FormAction::set_text(FieldKey::FamilyName, "Gaihre"),
            FormAction::set_text(FieldKey::Birthdate, "1993-08-02"),
            FormAction::set_text(FieldKey::Gender, "Male"),
        ]))
    }

    #[tokio::test]
    async fn writes_payload_to_sharded_entry() {
        let dir = tempfile::tempdir().expect("tempdir");
        let submitter = OutboxSubmitter::new(dir.path());

        let ack = submitter
            .submit_patient(CancellationToken::new(), &payload())
            .await
            .expect("write succeeds");

        assert_eq!(ack.path, ack.id.sharded_dir(dir.path()).join("patient.json"));
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&ack.path).unwrap()).unwrap();
        assert_eq!(written, serde_json::to_value(payload()).unwrap());
    }

    #[tokio::test]
    async fn cancelled_write_leaves_no_entry() {
        let dir = tempfile::tempdir().expect("tempdir");
        let submitter = OutboxSubmitter::new(dir.path());
        let abort = CancellationToken::new();
        abort.cancel();

        let err = submitter
            .submit_patient(abort, &payload())
            .await
            .expect_err("aborted");
        assert!(matches!(err, SubmitError::Aborted));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
