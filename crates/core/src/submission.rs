//! Submission: validate, assemble, and hand the payload to the registry collaborator.
//!
//! The controller makes exactly one collaborator call per accepted attempt and never retries.
//! It holds no per-form state, so any number of forms may submit through one controller at
//! once. Each [`RegistrationForm`] allows one pending attempt at a time; a second attempt on
//! the same form is rejected with [`SubmissionError::InFlight`].
//!
//! Cancellation is checked before the collaborator is called. Once the call has started the
//! abort token is handed to the collaborator, which either stops without persisting anything
//! and reports [`SubmitError::Aborted`], or finishes and reports its acknowledgement. An
//! `Aborted` result therefore always means the patient was not stored.

use crate::error::{SubmissionError, SubmitError};
use crate::form::{FormAction, FormState};
use crate::payload::{assemble_with, AssemblyOptions, SubmissionPayload};
use crate::sections::ActiveFieldSet;
use crate::validation::{validate_form, ValidationResult};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;

/// The external registry that persists a patient.
///
/// The acknowledgement is opaque to the core and handed back to the caller unchanged.
/// Implementations that observe `abort` must return [`SubmitError::Aborted`] only when
/// nothing was persisted.
#[async_trait]
pub trait PatientSubmitter: Send + Sync {
    type Ack: Send;

    async fn submit_patient(
        &self,
        abort: CancellationToken,
        payload: &SubmissionPayload,
    ) -> Result<Self::Ack, SubmitError>;
}

/// Orchestrates submission attempts against one collaborator.
pub struct SubmissionController<S> {
    submitter: S,
    options: AssemblyOptions,
}

impl<S: PatientSubmitter> SubmissionController<S> {
    pub fn new(submitter: S) -> Self {
        Self::with_options(submitter, AssemblyOptions::default())
    }

    pub fn with_options(submitter: S, options: AssemblyOptions) -> Self {
        Self { submitter, options }
    }

    pub fn submitter(&self) -> &S {
        &self.submitter
    }

    /// Submit using the local calendar date for date validation.
    pub async fn submit(
        &self,
        state: &FormState,
        abort: CancellationToken,
    ) -> Result<S::Ack, SubmissionError> {
        self.submit_on(state, Local::now().date_naive(), abort).await
    }

    /// Submit, validating dates against `today`.
    ///
    /// # Errors
    ///
    /// - [`SubmissionError::Validation`] if any active field is invalid. The collaborator is
    ///   not called.
    /// - [`SubmissionError::Submit`] with [`SubmitError::Aborted`] if `abort` was cancelled
    ///   before the collaborator was called, or the collaborator stopped on it.
    /// - [`SubmissionError::Submit`] with any other [`SubmitError`] the collaborator reports.
    pub async fn submit_on(
        &self,
        state: &FormState,
        today: NaiveDate,
        abort: CancellationToken,
    ) -> Result<S::Ack, SubmissionError> {
        let (active, validation) = Self::check(state, today);
        if let Some(failure) = validation.into_failure() {
            tracing::info!(
                "submission blocked by {} invalid field(s)",
                failure.errors.len()
            );
            return Err(SubmissionError::Validation(failure));
        }
        tracing::debug!("{} active fields valid", active.len());

        let payload = assemble_with(state, &self.options);

        if abort.is_cancelled() {
            tracing::info!("submission aborted before the registry was called");
            return Err(SubmitError::Aborted.into());
        }

        match self.submitter.submit_patient(abort, &payload).await {
            Ok(ack) => {
                tracing::info!("patient submitted");
                Ok(ack)
            }
            Err(e) => {
                tracing::error!("patient submission failed: {e}");
                Err(e.into())
            }
        }
    }

    fn check(state: &FormState, today: NaiveDate) -> (ActiveFieldSet, ValidationResult) {
        (state.active_fields(), validate_form(state, today))
    }
}

/// Clears a form's in-flight flag when the attempt finishes or its future is dropped.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One mounted registration form: owns its state exclusively.
#[derive(Debug, Default)]
pub struct RegistrationForm {
    state: Mutex<FormState>,
    in_flight: AtomicBool,
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: FormState) -> Self {
        Self {
            state: Mutex::new(state),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Snapshot of the current values.
    pub fn state(&self) -> FormState {
        self.lock().clone()
    }

    pub fn dispatch(&self, action: FormAction) {
        let mut state = self.lock();
        let current = std::mem::take(&mut *state);
        *state = current.reduce(action);
    }

    pub fn active_fields(&self) -> ActiveFieldSet {
        self.lock().active_fields()
    }

    pub fn validate(&self, today: NaiveDate) -> ValidationResult {
        validate_form(&self.lock(), today)
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Submit the form through `controller`.
    ///
    /// The values are snapshotted when the attempt starts. On success the form is reset to
    /// its defaults; on any failure the entered values are kept so the user can correct them
    /// or retry.
    ///
    /// # Errors
    ///
    /// - [`SubmissionError::InFlight`] if an attempt on this form is still pending. The
    ///   collaborator is not called.
    /// - Any error from [`SubmissionController::submit`].
    pub async fn submit<S: PatientSubmitter>(
        &self,
        controller: &SubmissionController<S>,
        abort: CancellationToken,
    ) -> Result<S::Ack, SubmissionError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("rejecting submission: this form already has one pending");
            return Err(SubmissionError::InFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let snapshot = self.state();
        let ack = controller.submit(&snapshot, abort).await?;
        self.dispatch(FormAction::Reset);
        Ok(ack)
    }

    fn lock(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
