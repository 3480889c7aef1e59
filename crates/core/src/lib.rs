//! # Registration Core
//!
//! Form state, validation, and payload assembly for registering a new patient.
//!
//! Data flows one way:
//!
//! ```text
//! edits ──► FormState::reduce ──► ActiveFieldSet ──► validate_form
//!                                        │
//!                                        ▼
//!                                 assemble_with ──► SubmissionController ──► PatientSubmitter
//! ```
//!
//! - [`form`] owns the reducer; toggle side effects (clearing names for an unidentified
//!   patient) are reducer transitions.
//! - [`sections`] derives which fields are active from the three toggles.
//! - [`validation`], [`names`], [`death`] and [`payload`] are pure functions of the state.
//! - [`submission`] runs one attempt against an external [`PatientSubmitter`].
//!
//! **No transport concerns**: the registry call is a trait; [`outbox`] provides a
//! file-backed implementation.

pub mod address_template;
pub mod config;
pub mod constants;
pub mod death;
pub mod error;
pub mod fields;
pub mod form;
pub mod form_file;
pub mod names;
pub mod outbox;
pub mod payload;
pub mod sections;
pub mod submission;
pub mod submission_id;
pub mod validation;

pub use address_template::{AddressFieldTemplate, AddressTemplate};
pub use config::RegistrationConfig;
pub use constants::{DEFAULT_INBOX_DIR, DEFAULT_OUTBOX_DIR, DEFAULT_PERSON_ATTRIBUTE_TYPE};
pub use death::{compose_death_info, DeathInfo};
pub use error::{RegistrationError, RegistrationResult, SubmissionError, SubmitError};
pub use fields::{FieldKey, FieldValue, FormSection};
pub use form::{FormAction, FormState};
pub use form_file::FormFile;
pub use names::{compose_names, PersonName};
pub use outbox::{OutboxAck, OutboxSubmitter};
pub use payload::{assemble, assemble_with, AssemblyOptions, SubmissionPayload};
pub use sections::{ActiveFieldSet, Section, Toggles};
pub use submission::{PatientSubmitter, RegistrationForm, SubmissionController};
pub use submission_id::SubmissionId;
pub use validation::{validate, validate_form, FieldValidation, ValidationFailure, ValidationResult};

// Re-export shared primitives so callers need only this crate.
pub use registration_types::{Gender, NonEmptyText, TextError};
pub use tokio_util::sync::CancellationToken;
