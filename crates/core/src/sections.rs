//! Conditional sections and the active field set.
//!
//! Three toggles switch optional parts of the form on and off. Whether a field is currently
//! relevant is decided in exactly one place, [`ActiveFieldSet::from_toggles`], and both
//! validation and payload assembly read that set.

use crate::fields::FieldKey;
use std::collections::BTreeSet;

/// A toggle-controlled section of the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    /// Patient identity unknown; primary name fields are forced empty.
    UnidentifiedPatient,
    /// Extra name in a local language.
    AdditionalName,
    /// Death date and cause.
    DeathInfo,
}

impl Section {
    pub const ALL: [Section; 3] = [
        Section::UnidentifiedPatient,
        Section::AdditionalName,
        Section::DeathInfo,
    ];

    /// The flag field that switches this section.
    pub fn toggle_field(self) -> FieldKey {
        match self {
            Section::UnidentifiedPatient => FieldKey::UnidentifiedPatient,
            Section::AdditionalName => FieldKey::AddNameInLocalLanguage,
            Section::DeathInfo => FieldKey::IsDead,
        }
    }

    /// Section owning the given toggle field, if it is one.
    pub fn for_toggle(field: FieldKey) -> Option<Self> {
        Section::ALL.into_iter().find(|s| s.toggle_field() == field)
    }

    /// Fields that only take part in validation and assembly while the section is on.
    ///
    /// The unidentified-patient section owns none: it changes how the name fields validate,
    /// not whether they are present.
    pub fn owned_fields(self) -> &'static [FieldKey] {
        match self {
            Section::UnidentifiedPatient => &[],
            Section::AdditionalName => &[
                FieldKey::AdditionalGivenName,
                FieldKey::AdditionalMiddleName,
                FieldKey::AdditionalFamilyName,
            ],
            Section::DeathInfo => &[FieldKey::DeathDate, FieldKey::DeathCause],
        }
    }

    /// Fields the off→on transition clears.
    pub fn cleared_on_enable(self) -> &'static [FieldKey] {
        match self {
            Section::UnidentifiedPatient => &[
                FieldKey::GivenName,
                FieldKey::MiddleName,
                FieldKey::FamilyName,
            ],
            Section::AdditionalName | Section::DeathInfo => &[],
        }
    }
}

/// Current state of the three section toggles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Toggles {
    pub unidentified_patient: bool,
    pub add_name_in_local_language: bool,
    pub is_dead: bool,
}

impl Toggles {
    pub fn is_on(&self, section: Section) -> bool {
        match section {
            Section::UnidentifiedPatient => self.unidentified_patient,
            Section::AdditionalName => self.add_name_in_local_language,
            Section::DeathInfo => self.is_dead,
        }
    }
}

/// Fields currently subject to validation and included in the payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveFieldSet(BTreeSet<FieldKey>);

impl ActiveFieldSet {
    /// Derive the active set from the toggles.
    pub fn from_toggles(toggles: Toggles) -> Self {
        let inactive: Vec<FieldKey> = Section::ALL
            .into_iter()
            .filter(|s| !toggles.is_on(*s))
            .flat_map(|s| s.owned_fields().iter().copied())
            .collect();

        Self(
            FieldKey::ALL
                .into_iter()
                .filter(|k| !inactive.contains(k))
                .collect(),
        )
    }

    pub fn contains(&self, field: FieldKey) -> bool {
        self.0.contains(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_toggle_states() -> Vec<Toggles> {
        let mut out = Vec::new();
        for bits in 0u8..8 {
            out.push(Toggles {
                unidentified_patient: bits & 1 != 0,
                add_name_in_local_language: bits & 2 != 0,
                is_dead: bits & 4 != 0,
            });
        }
        out
    }

    #[test]
    fn owned_fields_follow_their_toggle() {
        for toggles in all_toggle_states() {
            let active = ActiveFieldSet::from_toggles(toggles);
            for section in Section::ALL {
                for field in section.owned_fields() {
                    assert_eq!(
                        active.contains(*field),
                        toggles.is_on(section),
                        "{field} with {toggles:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn unowned_fields_are_always_active() {
        let active = ActiveFieldSet::from_toggles(Toggles::default());
        assert_eq!(active.len(), FieldKey::ALL.len() - 5);
        assert!(active.contains(FieldKey::GivenName));
        assert!(active.contains(FieldKey::IsDead));
        assert!(active.contains(FieldKey::PostalCode));
    }

    #[test]
    fn unidentified_toggle_does_not_change_the_active_set() {
        let off = ActiveFieldSet::from_toggles(Toggles::default());
        let on = ActiveFieldSet::from_toggles(Toggles {
            unidentified_patient: true,
            ..Toggles::default()
        });
        assert_eq!(off, on);
    }

    #[test]
    fn toggle_lookup_by_field() {
        assert_eq!(
            Section::for_toggle(FieldKey::IsDead),
            Some(Section::DeathInfo)
        );
        assert_eq!(Section::for_toggle(FieldKey::BirthdateEstimated), None);
    }
}
