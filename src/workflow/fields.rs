//! Field Store
//!
//! The accumulated answers of a check-in. Every field is addressed by a
//! typed [`Field`] key instead of a free-form name, and every field has a
//! default so the store is complete before anything is loaded.

use log::debug;

use crate::error::{CheckInError, Result};

use super::hydrate::HydratePatch;
use super::model::{
    Consent, Demographic, EmergencyContact, Ethnicity, Holds, PersonalPhone, PrivacyAgreements,
    Race, CONTACT_SLOTS,
};

/// Editable attribute of an emergency contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    FirstName,
    LastName,
    Relationship,
    HomePhone,
    HomePhoneIntl,
    MobilePhone,
    MobilePhoneIntl,
}

/// Key of a user-editable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Attribute of the contact in slot `index` (0-based)
    Contact { index: usize, field: ContactField },
    PersonalPhone,
    MakePhonePublic,
    NoPhone,
    Consent(Consent),
    Ethnicity,
    Race(Race),
}

impl Field {
    /// Shorthand for a contact field.
    pub fn contact(index: usize, field: ContactField) -> Self {
        Self::Contact { index, field }
    }
}

/// Value held by a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Ethnicity(Option<Ethnicity>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    fn into_text(self, field: Field) -> Result<String> {
        match self {
            Self::Text(s) => Ok(s),
            _ => Err(CheckInError::FieldTypeMismatch {
                field,
                expected: "text",
            }),
        }
    }

    fn into_flag(self, field: Field) -> Result<bool> {
        match self {
            Self::Flag(b) => Ok(b),
            _ => Err(CheckInError::FieldTypeMismatch {
                field,
                expected: "flag",
            }),
        }
    }

    fn into_ethnicity(self, field: Field) -> Result<Option<Ethnicity>> {
        match self {
            Self::Ethnicity(e) => Ok(e),
            _ => Err(CheckInError::FieldTypeMismatch {
                field,
                expected: "ethnicity",
            }),
        }
    }
}

/// Owned copy of every answer at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSnapshot {
    pub contacts: [EmergencyContact; CONTACT_SLOTS],
    pub phone: PersonalPhone,
    pub privacy: PrivacyAgreements,
    pub demographic: Demographic,
    pub holds: Holds,
}

impl Default for FieldSnapshot {
    fn default() -> Self {
        Self {
            contacts: std::array::from_fn(EmergencyContact::empty),
            phone: PersonalPhone::default(),
            privacy: PrivacyAgreements::default(),
            demographic: Demographic::default(),
            holds: Holds::default(),
        }
    }
}

impl FieldSnapshot {
    /// Number of contacts with a first name.
    pub fn named_contacts(&self) -> usize {
        self.contacts.iter().filter(|c| c.is_named()).count()
    }
}

/// Mutable store of check-in answers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldStore {
    fields: FieldSnapshot,
}

impl FieldStore {
    /// Creates a store holding defaults for every field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a single field.
    pub fn get(&self, field: Field) -> Result<FieldValue> {
        let value = match field {
            Field::Contact { index, field } => {
                let contact = self.contact(index)?;
                match field {
                    ContactField::FirstName => FieldValue::Text(contact.first_name.clone()),
                    ContactField::LastName => FieldValue::Text(contact.last_name.clone()),
                    ContactField::Relationship => FieldValue::Text(contact.relationship.clone()),
                    ContactField::HomePhone => FieldValue::Text(contact.home_phone.clone()),
                    ContactField::HomePhoneIntl => FieldValue::Flag(contact.home_phone_intl),
                    ContactField::MobilePhone => FieldValue::Text(contact.mobile_phone.clone()),
                    ContactField::MobilePhoneIntl => FieldValue::Flag(contact.mobile_phone_intl),
                }
            }
            Field::PersonalPhone => FieldValue::Text(self.fields.phone.number.clone()),
            Field::MakePhonePublic => FieldValue::Flag(self.fields.phone.make_public),
            Field::NoPhone => FieldValue::Flag(self.fields.phone.no_phone),
            Field::Consent(consent) => FieldValue::Flag(self.fields.privacy.get(consent)),
            Field::Ethnicity => FieldValue::Ethnicity(self.fields.demographic.ethnicity),
            Field::Race(race) => FieldValue::Flag(self.fields.demographic.race(race)),
        };
        Ok(value)
    }

    /// Replaces a single field. No content validation is performed.
    pub fn set(&mut self, field: Field, value: FieldValue) -> Result<()> {
        match field {
            Field::Contact { index, field: attr } => {
                let contact = self.contact_mut(index)?;
                match attr {
                    ContactField::FirstName => contact.first_name = value.into_text(field)?,
                    ContactField::LastName => contact.last_name = value.into_text(field)?,
                    ContactField::Relationship => contact.relationship = value.into_text(field)?,
                    ContactField::HomePhone => contact.home_phone = value.into_text(field)?,
                    ContactField::HomePhoneIntl => {
                        contact.home_phone_intl = value.into_flag(field)?
                    }
                    ContactField::MobilePhone => contact.mobile_phone = value.into_text(field)?,
                    ContactField::MobilePhoneIntl => {
                        contact.mobile_phone_intl = value.into_flag(field)?
                    }
                }
            }
            Field::PersonalPhone => self.fields.phone.number = value.into_text(field)?,
            Field::MakePhonePublic => self.fields.phone.make_public = value.into_flag(field)?,
            Field::NoPhone => self.fields.phone.no_phone = value.into_flag(field)?,
            Field::Consent(consent) => {
                let accepted = value.into_flag(field)?;
                self.fields.privacy.set(consent, accepted);
            }
            Field::Ethnicity => self.fields.demographic.ethnicity = value.into_ethnicity(field)?,
            Field::Race(race) => {
                let selected = value.into_flag(field)?;
                self.fields.demographic.set_race(race, selected);
            }
        }

        debug!("Field {:?} updated", field);
        Ok(())
    }

    /// Writes a text field.
    pub fn set_text(&mut self, field: Field, value: impl Into<String>) -> Result<()> {
        self.set(field, FieldValue::Text(value.into()))
    }

    /// Writes a checkbox field.
    pub fn set_flag(&mut self, field: Field, value: bool) -> Result<()> {
        self.set(field, FieldValue::Flag(value))
    }

    /// Returns a full copy of the current answers.
    pub fn snapshot(&self) -> FieldSnapshot {
        self.fields.clone()
    }

    /// Borrows the current answers without copying.
    pub fn view(&self) -> &FieldSnapshot {
        &self.fields
    }

    /// Seeds the store with previously saved contacts.
    ///
    /// Contacts are placed by position; slots past the patch keep their
    /// current values. Slot numbers are normalized to the slot position.
    pub fn apply_patch(&mut self, patch: HydratePatch) {
        for (slot, mut contact) in patch.contacts.into_iter().take(CONTACT_SLOTS).enumerate() {
            contact.seq_num = (slot + 1) as u8;
            self.fields.contacts[slot] = contact;
        }
    }

    /// Records the registrar holds reported for the student.
    pub fn set_holds(&mut self, holds: Holds) {
        if holds.blocks_check_in() {
            debug!("Holds set: {}", holds.active().join(", "));
        }
        self.fields.holds = holds;
    }

    pub fn contacts(&self) -> &[EmergencyContact; CONTACT_SLOTS] {
        &self.fields.contacts
    }

    pub fn contact(&self, index: usize) -> Result<&EmergencyContact> {
        self.fields
            .contacts
            .get(index)
            .ok_or(CheckInError::ContactIndexOutOfRange(index))
    }

    fn contact_mut(&mut self, index: usize) -> Result<&mut EmergencyContact> {
        self.fields
            .contacts
            .get_mut(index)
            .ok_or(CheckInError::ContactIndexOutOfRange(index))
    }

    pub fn phone(&self) -> &PersonalPhone {
        &self.fields.phone
    }

    pub fn privacy(&self) -> &PrivacyAgreements {
        &self.fields.privacy
    }

    pub fn demographic(&self) -> &Demographic {
        &self.fields.demographic
    }

    pub fn holds(&self) -> &Holds {
        &self.fields.holds
    }
}
