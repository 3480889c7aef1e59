//! Constants used throughout the registration core crate.

/// Person-attribute type that carries the patient's telephone number.
pub const DEFAULT_PERSON_ATTRIBUTE_TYPE: &str = "14d4f066-15f5-102d-96e4-000c29c2a5d7";

/// Default directory the outbox submitter writes accepted payloads into.
pub const DEFAULT_OUTBOX_DIR: &str = "registration_outbox";

/// Default directory the batch runner reads form files from.
pub const DEFAULT_INBOX_DIR: &str = "registration_inbox";

/// Filename of a payload written by the outbox submitter.
pub const PAYLOAD_FILENAME: &str = "patient.json";

/// Environment variable overriding the outbox directory.
pub const OUTBOX_DIR_ENV: &str = "REGISTRATION_OUTBOX_DIR";

/// Environment variable overriding the inbox directory.
pub const INBOX_DIR_ENV: &str = "REGISTRATION_INBOX_DIR";

/// Environment variable overriding the telephone person-attribute type.
pub const PERSON_ATTRIBUTE_TYPE_ENV: &str = "REGISTRATION_PERSON_ATTRIBUTE_TYPE";
