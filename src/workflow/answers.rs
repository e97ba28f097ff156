//! Answers Files
//!
//! Loads a YAML document of pre-filled check-in answers and applies it to
//! the field store one step at a time, the way a student would fill in
//! each page. Used by the command-line front end.
//!
//! # Example
//!
//! ```yaml
//! contacts:
//!   - first_name: John
//!     last_name: Doe
//!     relationship: Father
//!     mobile_phone: "9785550100"
//!   - first_name: Jane
//!     last_name: Doe
//!     relationship: Mother
//!     home_phone: "+44 20 7946 0000"
//!     home_phone_intl: true
//! phone:
//!   number: "9785550199"
//!   make_public: false
//! privacy:
//!   ferpa: true
//!   data_usage: true
//!   photo_consent: true
//! demographic:
//!   ethnicity: not_hispanic
//!   races: [white]
//! ```

use std::error::Error;
use std::fs;

use log::{debug, info};
use serde::Deserialize;

use crate::error::Result;

use super::fields::{ContactField, Field, FieldStore, FieldValue};
use super::model::{CheckInStep, Consent, Ethnicity, Race, CONTACT_SLOTS};

/// One contact's answers. Absent fields are left untouched.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct ContactAnswers {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub relationship: Option<String>,
    pub home_phone: Option<String>,
    pub home_phone_intl: Option<bool>,
    pub mobile_phone: Option<String>,
    pub mobile_phone_intl: Option<bool>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct PhoneAnswers {
    pub number: Option<String>,
    pub make_public: Option<bool>,
    pub no_phone: Option<bool>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct PrivacyAnswers {
    #[serde(default)]
    pub ferpa: bool,
    #[serde(default)]
    pub data_usage: bool,
    #[serde(default)]
    pub photo_consent: bool,
}

/// Ethnicity as written in answers files.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EthnicityAnswer {
    Hispanic,
    NotHispanic,
    PreferNotToSay,
}

impl From<EthnicityAnswer> for Ethnicity {
    fn from(value: EthnicityAnswer) -> Self {
        match value {
            EthnicityAnswer::Hispanic => Ethnicity::Hispanic,
            EthnicityAnswer::NotHispanic => Ethnicity::NotHispanic,
            EthnicityAnswer::PreferNotToSay => Ethnicity::PreferNotToSay,
        }
    }
}

/// Race as written in answers files.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RaceAnswer {
    NativeAmerican,
    Asian,
    Black,
    Hawaiian,
    White,
    PreferNotToSay,
}

impl From<RaceAnswer> for Race {
    fn from(value: RaceAnswer) -> Self {
        match value {
            RaceAnswer::NativeAmerican => Race::NativeAmerican,
            RaceAnswer::Asian => Race::Asian,
            RaceAnswer::Black => Race::Black,
            RaceAnswer::Hawaiian => Race::Hawaiian,
            RaceAnswer::White => Race::White,
            RaceAnswer::PreferNotToSay => Race::None,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct DemographicAnswers {
    pub ethnicity: Option<EthnicityAnswer>,
    #[serde(default)]
    pub races: Vec<RaceAnswer>,
}

/// Pre-filled answers, grouped by step. Every section is optional.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Answers {
    #[serde(default)]
    pub contacts: Vec<ContactAnswers>,
    pub phone: Option<PhoneAnswers>,
    pub privacy: Option<PrivacyAnswers>,
    pub demographic: Option<DemographicAnswers>,
}

impl Answers {
    /// Parses answers from YAML text.
    pub fn from_yaml(content: &str) -> std::result::Result<Self, Box<dyn Error>> {
        let answers: Answers = serde_yaml::from_str(content)
            .map_err(|e| format!("Failed to parse answers YAML: {}. Check the file format.", e))?;

        if answers.contacts.len() > CONTACT_SLOTS {
            return Err(format!(
                "Answers list {} contacts; at most {} are allowed",
                answers.contacts.len(),
                CONTACT_SLOTS
            )
            .into());
        }
        Ok(answers)
    }

    /// Applies the answers belonging to `step`.
    ///
    /// Contact answers fill slots by position. Steps without answers are
    /// left as they are.
    pub fn apply_step(&self, step: CheckInStep, store: &mut FieldStore) -> Result<()> {
        match step {
            CheckInStep::EmergencyContacts => {
                for (index, contact) in self.contacts.iter().enumerate() {
                    apply_contact(index, contact, store)?;
                }
            }
            CheckInStep::Phone => {
                if let Some(phone) = &self.phone {
                    if let Some(number) = &phone.number {
                        store.set_text(Field::PersonalPhone, number.clone())?;
                    }
                    if let Some(public) = phone.make_public {
                        store.set_flag(Field::MakePhonePublic, public)?;
                    }
                    if let Some(none) = phone.no_phone {
                        store.set_flag(Field::NoPhone, none)?;
                    }
                }
            }
            CheckInStep::Privacy => {
                if let Some(privacy) = &self.privacy {
                    store.set_flag(Field::Consent(Consent::Ferpa), privacy.ferpa)?;
                    store.set_flag(Field::Consent(Consent::DataUsage), privacy.data_usage)?;
                    store.set_flag(Field::Consent(Consent::PhotoConsent), privacy.photo_consent)?;
                }
            }
            CheckInStep::Demographics => {
                if let Some(demographic) = &self.demographic {
                    if let Some(ethnicity) = demographic.ethnicity {
                        store.set(
                            Field::Ethnicity,
                            FieldValue::Ethnicity(Some(ethnicity.into())),
                        )?;
                    }
                    for race in &demographic.races {
                        store.set_flag(Field::Race((*race).into()), true)?;
                    }
                }
            }
            CheckInStep::Welcome | CheckInStep::Confirm => {}
        }

        debug!("Applied answers for {}", step);
        Ok(())
    }
}

fn apply_contact(index: usize, answers: &ContactAnswers, store: &mut FieldStore) -> Result<()> {
    let text_fields = [
        (ContactField::FirstName, &answers.first_name),
        (ContactField::LastName, &answers.last_name),
        (ContactField::Relationship, &answers.relationship),
        (ContactField::HomePhone, &answers.home_phone),
        (ContactField::MobilePhone, &answers.mobile_phone),
    ];
    for (field, value) in text_fields {
        if let Some(value) = value {
            store.set_text(Field::contact(index, field), value.clone())?;
        }
    }

    let flag_fields = [
        (ContactField::HomePhoneIntl, answers.home_phone_intl),
        (ContactField::MobilePhoneIntl, answers.mobile_phone_intl),
    ];
    for (field, value) in flag_fields {
        if let Some(value) = value {
            store.set_flag(Field::contact(index, field), value)?;
        }
    }
    Ok(())
}

/// Loads an answers file.
///
/// # Example
///
/// ```rust,no_run
/// use checkin::workflow::answers::load_answers;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let answers = load_answers("answers.yaml")?;
///     println!("{} contacts provided", answers.contacts.len());
///     Ok(())
/// }
/// ```
pub fn load_answers(path: &str) -> std::result::Result<Answers, Box<dyn Error>> {
    info!("Loading answers from: {}", path);

    let content = fs::read_to_string(path).map_err(|e| {
        format!(
            "Failed to read answers file '{}': {}. Check that the file exists and is readable.",
            path, e
        )
    })?;

    Answers::from_yaml(&content)
}
