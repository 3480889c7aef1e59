//! Death information composition.
//!
//! [`DeathInfo`] is an enum so that a date or cause can never accompany `dead: false`.
//! It serialises flat, to be merged into the person object of the payload.

use crate::fields::FieldKey;
use crate::form::FormState;
use serde::ser::{Serialize, SerializeMap, Serializer};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeathInfo {
    Alive,
    Dead {
        death_date: String,
        cause_of_death: String,
    },
}

impl DeathInfo {
    pub fn is_dead(&self) -> bool {
        matches!(self, DeathInfo::Dead { .. })
    }
}

impl Serialize for DeathInfo {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DeathInfo::Alive => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("dead", &false)?;
                map.end()
            }
            DeathInfo::Dead {
                death_date,
                cause_of_death,
            } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("dead", &true)?;
                map.serialize_entry("deathDate", death_date)?;
                map.serialize_entry("causeOfDeath", cause_of_death)?;
                map.end()
            }
        }
    }
}

/// Derives death information from the form.
///
/// Stale date and cause values are dropped when the patient is not marked dead. The date is
/// trimmed, matching how it is validated.
pub fn compose_death_info(state: &FormState) -> DeathInfo {
    if !state.toggles().is_dead {
        return DeathInfo::Alive;
    }
    DeathInfo::Dead {
        death_date: state.text(FieldKey::DeathDate).trim().to_owned(),
        cause_of_death: state.text(FieldKey::DeathCause).to_owned(),
    }
}
