//! Field keys and values of the registration form.
//!
//! The set of keys is fixed. Each key is either a text field or a flag (checkbox); dates are
//! carried as text in `YYYY-MM-DD` form and parsed only during validation.

use serde::{Deserialize, Serialize};

/// Every field the registration form declares.
///
/// Serialises as the camelCase key used in form files and error reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    GivenName,
    MiddleName,
    FamilyName,
    UnidentifiedPatient,
    AddNameInLocalLanguage,
    AdditionalGivenName,
    AdditionalMiddleName,
    AdditionalFamilyName,
    Gender,
    Birthdate,
    BirthdateEstimated,
    TelephoneNumber,
    Address1,
    Address2,
    CityVillage,
    StateProvince,
    Country,
    PostalCode,
    IsDead,
    DeathDate,
    DeathCause,
}

impl FieldKey {
    /// All declared fields, in form order.
    pub const ALL: [FieldKey; 21] = [
        FieldKey::GivenName,
        FieldKey::MiddleName,
        FieldKey::FamilyName,
        FieldKey::UnidentifiedPatient,
        FieldKey::AddNameInLocalLanguage,
        FieldKey::AdditionalGivenName,
        FieldKey::AdditionalMiddleName,
        FieldKey::AdditionalFamilyName,
        FieldKey::Gender,
        FieldKey::Birthdate,
        FieldKey::BirthdateEstimated,
        FieldKey::TelephoneNumber,
        FieldKey::Address1,
        FieldKey::Address2,
        FieldKey::CityVillage,
        FieldKey::StateProvince,
        FieldKey::Country,
        FieldKey::PostalCode,
        FieldKey::IsDead,
        FieldKey::DeathDate,
        FieldKey::DeathCause,
    ];

    /// Address sub-fields, in the order they appear in the assembled address.
    pub const ADDRESS: [FieldKey; 6] = [
        FieldKey::Address1,
        FieldKey::Address2,
        FieldKey::CityVillage,
        FieldKey::Country,
        FieldKey::PostalCode,
        FieldKey::StateProvince,
    ];

    /// The camelCase key name.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKey::GivenName => "givenName",
            FieldKey::MiddleName => "middleName",
            FieldKey::FamilyName => "familyName",
            FieldKey::UnidentifiedPatient => "unidentifiedPatient",
            FieldKey::AddNameInLocalLanguage => "addNameInLocalLanguage",
            FieldKey::AdditionalGivenName => "additionalGivenName",
            FieldKey::AdditionalMiddleName => "additionalMiddleName",
            FieldKey::AdditionalFamilyName => "additionalFamilyName",
            FieldKey::Gender => "gender",
            FieldKey::Birthdate => "birthdate",
            FieldKey::BirthdateEstimated => "birthdateEstimated",
            FieldKey::TelephoneNumber => "telephoneNumber",
            FieldKey::Address1 => "address1",
            FieldKey::Address2 => "address2",
            FieldKey::CityVillage => "cityVillage",
            FieldKey::StateProvince => "stateProvince",
            FieldKey::Country => "country",
            FieldKey::PostalCode => "postalCode",
            FieldKey::IsDead => "isDead",
            FieldKey::DeathDate => "deathDate",
            FieldKey::DeathCause => "deathCause",
        }
    }

    /// Look up a key by its camelCase name.
    pub fn from_name(name: &str) -> Option<Self> {
        FieldKey::ALL.into_iter().find(|k| k.as_str() == name)
    }

    /// Look up an address sub-field by the name an address template uses for it.
    pub fn from_address_name(name: &str) -> Option<Self> {
        FieldKey::ADDRESS.into_iter().find(|k| k.as_str() == name)
    }

    /// Whether the field holds a boolean rather than text.
    pub fn is_flag(self) -> bool {
        matches!(
            self,
            FieldKey::UnidentifiedPatient
                | FieldKey::AddNameInLocalLanguage
                | FieldKey::BirthdateEstimated
                | FieldKey::IsDead
        )
    }

    /// The visible section this field is rendered in.
    pub fn section(self) -> FormSection {
        match self {
            FieldKey::TelephoneNumber
            | FieldKey::Address1
            | FieldKey::Address2
            | FieldKey::CityVillage
            | FieldKey::StateProvince
            | FieldKey::Country
            | FieldKey::PostalCode => FormSection::ContactInfo,
            FieldKey::IsDead | FieldKey::DeathDate | FieldKey::DeathCause => {
                FormSection::DeathInfo
            }
            _ => FormSection::Demographics,
        }
    }

    /// The value a freshly mounted form holds for this field.
    pub fn default_value(self) -> FieldValue {
        if self.is_flag() {
            FieldValue::Flag(false)
        } else {
            FieldValue::Text(String::new())
        }
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored field value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(b) => Some(*b),
            FieldValue::Text(_) => None,
        }
    }

    /// Whether this value has the right kind for `key`.
    pub fn fits(&self, key: FieldKey) -> bool {
        matches!(self, FieldValue::Flag(_)) == key.is_flag()
    }
}

/// The visible groupings of the registration form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormSection {
    Demographics,
    ContactInfo,
    DeathInfo,
}

impl FormSection {
    pub const ALL: [FormSection; 3] = [
        FormSection::Demographics,
        FormSection::ContactInfo,
        FormSection::DeathInfo,
    ];

    pub fn title(self) -> &'static str {
        match self {
            FormSection::Demographics => "Demographics",
            FormSection::ContactInfo => "Contact Info",
            FormSection::DeathInfo => "Death Info",
        }
    }

    /// Fields rendered in this section, in form order.
    pub fn fields(self) -> impl Iterator<Item = FieldKey> {
        FieldKey::ALL
            .into_iter()
            .filter(move |k| k.section() == self)
    }
}
