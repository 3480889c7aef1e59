//! Person name composition.

use crate::fields::FieldKey;
use crate::form::FormState;
use serde::Serialize;

/// A name record as the registry receives it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonName {
    pub given_name: String,
    pub middle_name: String,
    pub family_name: String,
    pub preferred: bool,
}

/// Builds the ordered name list.
///
/// The primary name is always at index 0 and is the only preferred one. The local-language
/// name follows it when the additional-name section is on.
pub fn compose_names(state: &FormState) -> Vec<PersonName> {
    let mut names = vec![PersonName {
        given_name: state.text(FieldKey::GivenName).to_owned(),
        middle_name: state.text(FieldKey::MiddleName).to_owned(),
        family_name: state.text(FieldKey::FamilyName).to_owned(),
        preferred: true,
    }];

    if state.toggles().add_name_in_local_language {
        names.push(PersonName {
            given_name: state.text(FieldKey::AdditionalGivenName).to_owned(),
            middle_name: state.text(FieldKey::AdditionalMiddleName).to_owned(),
            family_name: state.text(FieldKey::AdditionalFamilyName).to_owned(),
            preferred: false,
        });
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormAction;
    use crate::sections::Section;

    fn with_local_name() -> FormState {
        FormState::new().reduce_all([
            FormAction::set_text(FieldKey::GivenName, "Paul"),
            FormAction::set_text(FieldKey::FamilyName, "Gaihre"),
            FormAction::set_text(FieldKey::AdditionalGivenName, "Local Given Name"),
            FormAction::set_text(FieldKey::AdditionalMiddleName, "Local Middle Name"),
            FormAction::set_text(FieldKey::AdditionalFamilyName, "Local Family Name"),
        ])
    }

    #[test]
    fn primary_name_only_when_section_off() {
        let names = compose_names(&with_local_name());
        assert_eq!(names.len(), 1);
        assert_eq!(
            names[0],
            PersonName {
                given_name: "Paul".into(),
                middle_name: String::new(),
                family_name: "Gaihre".into(),
                preferred: true,
            }
        );
    }

    #[test]
    fn local_name_is_appended_unpreferred() {
        let off = compose_names(&with_local_name());
        let on = compose_names(
            &with_local_name().reduce(FormAction::toggle(Section::AdditionalName, true)),
        );

        assert_eq!(on.len(), 2);
        assert_eq!(on[0], off[0]);
        assert_eq!(on[1].given_name, "Local Given Name");
        assert_eq!(on[1].middle_name, "Local Middle Name");
        assert_eq!(on[1].family_name, "Local Family Name");
        assert!(!on[1].preferred);
        assert_eq!(on.iter().filter(|n| n.preferred).count(), 1);
    }

    #[test]
    fn unidentified_patient_has_an_empty_preferred_name() {
        let names = compose_names(
            &with_local_name().reduce(FormAction::toggle(Section::UnidentifiedPatient, true)),
        );
        assert!(names[0].preferred);
        assert_eq!(names[0].given_name, "");
        assert_eq!(names[0].family_name, "");
    }
}
