//! Address template input.
//!
//! The template tells the form which address sub-fields to show and in which order. It is
//! read-only input. Required-ness is never taken from it: every address sub-field stays
//! optional in validation and assembly.

use crate::error::{RegistrationError, RegistrationResult};
use crate::fields::FieldKey;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Display metadata for one address sub-field.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddressFieldTemplate {
    pub label_key: String,
    pub display_order: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AddressTemplate {
    fields: BTreeMap<String, AddressFieldTemplate>,
}

impl AddressTemplate {
    /// Parse a template from JSON of the form
    /// `{ "<addressField>": { "labelKey": "...", "displayOrder": 1 }, ... }`.
    pub fn parse_json(text: &str) -> RegistrationResult<Self> {
        let fields = serde_json::from_str(text).map_err(RegistrationError::AddressTemplate)?;
        Ok(Self { fields })
    }

    /// Known address fields sorted by display order, ties broken by field order.
    ///
    /// Names the form does not know are skipped.
    pub fn ordered_fields(&self) -> Vec<(FieldKey, &AddressFieldTemplate)> {
        let mut known: Vec<(FieldKey, &AddressFieldTemplate)> = self
            .fields
            .iter()
            .filter_map(|(name, template)| match FieldKey::from_address_name(name) {
                Some(key) => Some((key, template)),
                None => {
                    tracing::warn!("address template names unknown field '{name}'");
                    None
                }
            })
            .collect();
        known.sort_by_key(|(key, template)| (template.display_order, *key));
        known
    }

    /// Always false: the template's required-ness is not enforced.
    pub fn is_required(&self, _field: FieldKey) -> bool {
        false
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = r#"{
        "postalCode": { "labelKey": "Location.postalCode", "displayOrder": 5 },
        "address1": { "labelKey": "Location.address1", "displayOrder": 1 },
        "cityVillage": { "labelKey": "Location.cityVillage", "displayOrder": 3 },
        "address2": { "labelKey": "Location.address2", "displayOrder": 2 },
        "countyDistrict": { "labelKey": "Location.countyDistrict", "displayOrder": 4 }
    }"#;

    #[test]
    fn orders_known_fields_by_display_order() {
        let template = AddressTemplate::parse_json(TEMPLATE).expect("valid template");
        let order: Vec<FieldKey> = template
            .ordered_fields()
            .into_iter()
            .map(|(k, _)| k)
            .collect();

        assert_eq!(
            order,
            vec![
                FieldKey::Address1,
                FieldKey::Address2,
                FieldKey::CityVillage,
                FieldKey::PostalCode
            ]
        );
        assert_eq!(template.len(), 5);
    }

    #[test]
    fn never_marks_fields_required() {
        let template = AddressTemplate::parse_json(TEMPLATE).expect("valid template");
        for (key, _) in template.ordered_fields() {
            assert!(!template.is_required(key));
        }
    }

    #[test]
    fn rejects_malformed_entries() {
        let err = AddressTemplate::parse_json(r#"{ "address1": { "labelKey": 3 } }"#)
            .expect_err("labelKey must be a string");
        assert!(matches!(err, RegistrationError::AddressTemplate(_)));
    }
}
