//! Submission Assembler
//!
//! Projects the collected answers into the request body expected by the
//! registrar's check-in endpoint. Assembly is pure; sending the payload
//! is the submission service's job.
//!
//! # Example payload
//!
//! ```json
//! {
//!   "Username": "jane.doe",
//!   "EmergencyContacts": [{ "SEQ_NUM": 1, "firstname": "John", ... }],
//!   "PersonalPhone": { "PersonalPhone": null, "MakePrivate": true, "NoPhone": true },
//!   "Privacy": { "FERPA": true, "DataUsage": true, "PhotoConsent": true },
//!   "Demographic": { "Ethnicity": -2, "NativeAmerican": false, ..., "None": true }
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::fields::FieldSnapshot;
use super::model::{EmergencyContact, Ethnicity};

/// Phone section of the payload.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PhonePayload {
    /// `None` when the student has no phone or left it blank
    #[serde(rename = "PersonalPhone")]
    pub number: Option<String>,

    #[serde(rename = "MakePrivate")]
    pub make_private: bool,

    #[serde(rename = "NoPhone")]
    pub no_phone: bool,
}

/// Consent section of the payload.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrivacyPayload {
    #[serde(rename = "FERPA")]
    pub ferpa: bool,

    #[serde(rename = "DataUsage")]
    pub data_usage: bool,

    #[serde(rename = "PhotoConsent")]
    pub photo_consent: bool,
}

/// Race/ethnicity section of the payload.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct DemographicPayload {
    pub ethnicity: Option<Ethnicity>,
    pub native_american: bool,
    pub asian: bool,
    pub black: bool,
    pub hawaiian: bool,
    pub white: bool,
    pub none: bool,
}

/// Complete check-in submission.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct SubmissionPayload {
    pub username: String,

    /// Only contacts that were given a first name
    pub emergency_contacts: Vec<EmergencyContact>,

    pub personal_phone: PhonePayload,
    pub privacy: PrivacyPayload,
    pub demographic: DemographicPayload,
}

/// Builds the submission for `username` from a snapshot of answers.
pub fn assemble(username: &str, fields: &FieldSnapshot) -> SubmissionPayload {
    let emergency_contacts = fields
        .contacts
        .iter()
        .filter(|c| c.is_named())
        .map(EmergencyContact::trimmed)
        .collect();

    let number = fields.phone.number.trim();
    let personal_phone = PhonePayload {
        number: (!fields.phone.no_phone && !number.is_empty()).then(|| number.to_string()),
        make_private: !fields.phone.make_public,
        no_phone: fields.phone.no_phone,
    };

    let demographic = &fields.demographic;

    SubmissionPayload {
        username: username.trim().to_string(),
        emergency_contacts,
        personal_phone,
        privacy: PrivacyPayload {
            ferpa: fields.privacy.ferpa,
            data_usage: fields.privacy.data_usage,
            photo_consent: fields.privacy.photo_consent,
        },
        demographic: DemographicPayload {
            ethnicity: demographic.ethnicity,
            native_american: demographic.native_american,
            asian: demographic.asian,
            black: demographic.black,
            hawaiian: demographic.hawaiian,
            white: demographic.white,
            none: demographic.none,
        },
    }
}
