//! Submission payload and its assembly from form state.
//!
//! Assembly is a pure function of the form state and the active field set. It never fails:
//! any missing or unrecognised value degrades to an empty string.

use crate::constants::DEFAULT_PERSON_ATTRIBUTE_TYPE;
use crate::death::{compose_death_info, DeathInfo};
use crate::fields::FieldKey;
use crate::form::FormState;
use crate::names::{compose_names, PersonName};
use registration_types::{Gender, NonEmptyText};
use serde::Serialize;

/// The record handed to the submission collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubmissionPayload {
    /// Always empty until identifier generation exists.
    pub identifiers: Vec<PatientIdentifier>,
    pub person: Person,
}

/// Placeholder for patient identifiers; assembly currently emits none.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientIdentifier {
    pub identifier: String,
    pub identifier_type: String,
    pub location: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub names: Vec<PersonName>,
    pub addresses: Vec<PersonAddress>,
    pub attributes: Vec<PersonAttribute>,
    pub birthdate: String,
    pub birthdate_estimated: bool,
    pub gender: String,
    #[serde(flatten)]
    pub death: DeathInfo,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonAddress {
    pub address1: String,
    pub address2: String,
    pub city_village: String,
    pub country: String,
    pub postal_code: String,
    pub state_province: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonAttribute {
    pub attribute_type: String,
    pub value: String,
}

/// Settings that vary by deployment rather than by form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssemblyOptions {
    /// Person-attribute type that carries the telephone number.
    pub person_attribute_type: NonEmptyText,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            // invariant: DEFAULT_PERSON_ATTRIBUTE_TYPE is a non-blank literal
            person_attribute_type: NonEmptyText::new(DEFAULT_PERSON_ATTRIBUTE_TYPE)
                .expect("default attribute type is non-empty"),
        }
    }
}

/// Assemble a payload with default options.
pub fn assemble(state: &FormState) -> SubmissionPayload {
    assemble_with(state, &AssemblyOptions::default())
}

/// Assemble a payload from the current form state.
///
/// # Arguments
///
/// * `state` - The form to read. Only fields in its active set contribute text.
/// * `options` - Deployment settings, currently the telephone attribute type.
///
/// # Returns
///
/// A [`SubmissionPayload`] with one preferred primary name (plus the local-language name when
/// enabled), one address, one telephone attribute and flattened death information. Address,
/// telephone and date values are trimmed; names are passed through as entered. An
/// unrecognised gender label becomes an empty code.
///
/// Assembly does not validate. Callers submit only forms that passed
/// [`crate::validation::validate_form`].
pub fn assemble_with(state: &FormState, options: &AssemblyOptions) -> SubmissionPayload {
    let active = state.active_fields();
    let text = |field: FieldKey| -> String {
        if active.contains(field) {
            state.text(field).trim().to_owned()
        } else {
            String::new()
        }
    };

    let address = PersonAddress {
        address1: text(FieldKey::Address1),
        address2: text(FieldKey::Address2),
        city_village: text(FieldKey::CityVillage),
        country: text(FieldKey::Country),
        postal_code: text(FieldKey::PostalCode),
        state_province: text(FieldKey::StateProvince),
    };

    let attribute = PersonAttribute {
        attribute_type: options.person_attribute_type.as_str().to_owned(),
        value: text(FieldKey::TelephoneNumber),
    };

    let gender = Gender::from_label(state.text(FieldKey::Gender))
        .map(|g| g.code().to_owned())
        .unwrap_or_default();

    SubmissionPayload {
        identifiers: Vec::new(),
        person: Person {
            names: compose_names(state),
            addresses: vec![address],
            attributes: vec![attribute],
            birthdate: text(FieldKey::Birthdate),
            birthdate_estimated: state.flag(FieldKey::BirthdateEstimated),
            gender,
            death: compose_death_info(state),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormAction;
    use crate::sections::Section;
    use serde_json::json;

    fn paul() -> FormState {
        FormState::new().reduce_all([
            FormAction::set_text(FieldKey::GivenName, "Paul"),
            FormAction::set_text(FieldKey::FamilyName, "Gaihre"),
            FormAction::set_text(FieldKey::Birthdate, "1993-08-02"),
            FormAction::set_text(FieldKey::Gender, "Male"),
        ])
    }

    fn empty_contact() -> serde_json::Value {
        json!({
            "addresses": [{
                "address1": "", "address2": "", "cityVillage": "",
                "country": "", "postalCode": "", "stateProvince": ""
            }],
            "attributes": [{
                "attributeType": "14d4f066-15f5-102d-96e4-000c29c2a5d7",
                "value": ""
            }]
        })
    }

    fn expected_person(names: serde_json::Value, death: serde_json::Value) -> serde_json::Value {
        let mut person = json!({
            "birthdate": "1993-08-02",
            "birthdateEstimated": false,
            "gender": "M",
            "names": names,
        });
        let map = person.as_object_mut().unwrap();
        for (k, v) in empty_contact().as_object().unwrap() {
            map.insert(k.clone(), v.clone());
        }
        for (k, v) in death.as_object().unwrap() {
            map.insert(k.clone(), v.clone());
        }
        json!({ "identifiers": [], "person": person })
    }

    #[test]
    fn assembles_the_minimal_patient() {
        let payload = serde_json::to_value(assemble(&paul())).unwrap();
        assert_eq!(
            payload,
            expected_person(
                json!([{ "givenName": "Paul", "middleName": "", "familyName": "Gaihre", "preferred": true }]),
                json!({ "dead": false }),
            )
        );
    }

    #[test]
    fn assembles_the_additional_name() {
        let state = paul().reduce_all([
            FormAction::toggle(Section::AdditionalName, true),
            FormAction::set_text(FieldKey::AdditionalGivenName, "Local Given Name"),
            FormAction::set_text(FieldKey::AdditionalMiddleName, "Local Middle Name"),
            FormAction::set_text(FieldKey::AdditionalFamilyName, "Local Family Name"),
        ]);

        let payload = serde_json::to_value(assemble(&state)).unwrap();
        assert_eq!(
            payload,
            expected_person(
                json!([
                    { "givenName": "Paul", "middleName": "", "familyName": "Gaihre", "preferred": true },
                    {
                        "givenName": "Local Given Name",
                        "middleName": "Local Middle Name",
                        "familyName": "Local Family Name",
                        "preferred": false
                    }
                ]),
                json!({ "dead": false }),
            )
        );
    }

    #[test]
    fn assembles_death_info() {
        let state = paul().reduce_all([
            FormAction::toggle(Section::DeathInfo, true),
            FormAction::set_text(FieldKey::DeathDate, "2020-01-01"),
            FormAction::set_text(FieldKey::DeathCause, "Stroke"),
        ]);

        let payload = serde_json::to_value(assemble(&state)).unwrap();
        assert_eq!(
            payload,
            expected_person(
                json!([{ "givenName": "Paul", "middleName": "", "familyName": "Gaihre", "preferred": true }]),
                json!({ "dead": true, "deathDate": "2020-01-01", "causeOfDeath": "Stroke" }),
            )
        );
    }

    #[test]
    fn contact_fields_flow_into_address_and_attribute() {
        let state = paul().reduce_all([
            FormAction::set_text(FieldKey::Address1, " 12 Main St "),
            FormAction::set_text(FieldKey::CityVillage, "Kathmandu"),
            FormAction::set_text(FieldKey::Country, "Nepal"),
            FormAction::set_text(FieldKey::TelephoneNumber, "0123456789"),
            FormAction::set_flag(FieldKey::BirthdateEstimated, true),
        ]);
        let options = AssemblyOptions {
            person_attribute_type: NonEmptyText::new("phone-attr").unwrap(),
        };

        let person = assemble_with(&state, &options).person;
        assert_eq!(person.addresses[0].address1, "12 Main St");
        assert_eq!(person.addresses[0].city_village, "Kathmandu");
        assert_eq!(person.addresses[0].country, "Nepal");
        assert_eq!(person.addresses[0].postal_code, "");
        assert_eq!(person.attributes[0].attribute_type, "phone-attr");
        assert_eq!(person.attributes[0].value, "0123456789");
        assert!(person.birthdate_estimated);
    }

    #[test]
    fn dates_are_trimmed_in_the_payload() {
        let state = paul().reduce_all([
            FormAction::set_text(FieldKey::Birthdate, " 1993-08-02 "),
            FormAction::toggle(Section::DeathInfo, true),
            FormAction::set_text(FieldKey::DeathDate, " 2020-01-01 "),
            FormAction::set_text(FieldKey::DeathCause, "Stroke"),
        ]);

        let person = serde_json::to_value(assemble(&state).person).unwrap();
        assert_eq!(person["birthdate"], json!("1993-08-02"));
        assert_eq!(person["deathDate"], json!("2020-01-01"));
    }

    #[test]
    fn default_options_use_the_standard_attribute_type() {
        assert_eq!(
            AssemblyOptions::default().person_attribute_type.as_str(),
            DEFAULT_PERSON_ATTRIBUTE_TYPE
        );
    }

    #[test]
    fn unrecognised_gender_degrades_to_empty_code() {
        let state = paul().reduce(FormAction::set_text(FieldKey::Gender, "Robot"));
        assert_eq!(assemble(&state).person.gender, "");
    }

    #[test]
    fn assembly_is_deterministic() {
        let state = paul().reduce(FormAction::toggle(Section::DeathInfo, true));
        assert_eq!(assemble(&state), assemble(&state));
    }
}
