//! Check-In Data Model
//!
//! Records collected by the academic check-in and the fixed list of steps
//! that collect them.
//!
//! Field names on the serialized forms follow the registrar backend, so
//! the same types are decoded from hydration responses and encoded into
//! the submission payload.
//!
//! # Example backend contact record
//!
//! ```json
//! {
//!   "SEQ_NUM": 1,
//!   "firstname": "Jane",
//!   "lastname": "Doe",
//!   "relationship": "Mother",
//!   "HomePhone": "9785550100",
//!   "HomePhoneIN": false,
//!   "MobilePhone": "",
//!   "MobilePhoneIN": false
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of emergency contact records a student may provide.
pub const CONTACT_SLOTS: usize = 3;

/// Minimum number of named emergency contacts required to continue.
pub const REQUIRED_CONTACTS: usize = 2;

/// The pages of the check-in, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckInStep {
    Welcome,
    EmergencyContacts,
    Phone,
    Privacy,
    Demographics,
    Confirm,
}

impl CheckInStep {
    /// All steps in order. The last one is terminal.
    pub const ALL: [CheckInStep; 6] = [
        CheckInStep::Welcome,
        CheckInStep::EmergencyContacts,
        CheckInStep::Phone,
        CheckInStep::Privacy,
        CheckInStep::Demographics,
        CheckInStep::Confirm,
    ];

    /// Number of steps in the workflow.
    pub const COUNT: usize = Self::ALL.len();

    /// Returns the step at `index`, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Position of this step in the workflow.
    pub fn index(self) -> usize {
        match self {
            Self::Welcome => 0,
            Self::EmergencyContacts => 1,
            Self::Phone => 2,
            Self::Privacy => 3,
            Self::Demographics => 4,
            Self::Confirm => 5,
        }
    }

    /// Title shown in the step indicator.
    pub fn title(self) -> &'static str {
        match self {
            Self::Welcome => "Main Form",
            Self::EmergencyContacts => "Emergency Contact",
            Self::Phone => "Update Phone",
            Self::Privacy => "Privacy Terms",
            Self::Demographics => "Race Question",
            Self::Confirm => "Confirm",
        }
    }

    /// True for the confirmation step, where submission replaces `next`.
    pub fn is_terminal(self) -> bool {
        self == Self::Confirm
    }
}

impl fmt::Display for CheckInStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step {}: {}", self.index(), self.title())
    }
}

/// A single emergency contact record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EmergencyContact {
    /// 1-based slot number expected by the backend
    #[serde(rename = "SEQ_NUM")]
    pub seq_num: u8,

    #[serde(rename = "firstname", default)]
    pub first_name: String,

    #[serde(rename = "lastname", default)]
    pub last_name: String,

    #[serde(default)]
    pub relationship: String,

    #[serde(rename = "HomePhone", default)]
    pub home_phone: String,

    /// Home phone is an international number
    #[serde(rename = "HomePhoneIN", default)]
    pub home_phone_intl: bool,

    #[serde(rename = "MobilePhone", default)]
    pub mobile_phone: String,

    /// Mobile phone is an international number
    #[serde(rename = "MobilePhoneIN", default)]
    pub mobile_phone_intl: bool,
}

impl EmergencyContact {
    /// Creates an empty record for the given 0-based slot.
    pub fn empty(slot: usize) -> Self {
        Self {
            seq_num: (slot + 1) as u8,
            first_name: String::new(),
            last_name: String::new(),
            relationship: String::new(),
            home_phone: String::new(),
            home_phone_intl: false,
            mobile_phone: String::new(),
            mobile_phone_intl: false,
        }
    }

    /// True once a first name has been entered.
    pub fn is_named(&self) -> bool {
        !self.first_name.trim().is_empty()
    }

    /// Returns a copy with surrounding whitespace removed from text fields.
    pub fn trimmed(&self) -> Self {
        Self {
            seq_num: self.seq_num,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            relationship: self.relationship.trim().to_string(),
            home_phone: self.home_phone.trim().to_string(),
            home_phone_intl: self.home_phone_intl,
            mobile_phone: self.mobile_phone.trim().to_string(),
            mobile_phone_intl: self.mobile_phone_intl,
        }
    }
}

/// The student's own phone number and its visibility.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonalPhone {
    pub number: String,
    pub make_public: bool,
    /// Student states they have no personal phone
    pub no_phone: bool,
}

/// The consent flags that must all be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Consent {
    Ferpa,
    DataUsage,
    PhotoConsent,
}

impl Consent {
    pub const ALL: [Consent; 3] = [Consent::Ferpa, Consent::DataUsage, Consent::PhotoConsent];

    pub fn label(self) -> &'static str {
        match self {
            Self::Ferpa => "FERPA",
            Self::DataUsage => "data usage",
            Self::PhotoConsent => "photo consent",
        }
    }
}

/// Privacy agreements accepted by the student.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrivacyAgreements {
    pub ferpa: bool,
    pub data_usage: bool,
    pub photo_consent: bool,
}

impl PrivacyAgreements {
    pub fn get(&self, consent: Consent) -> bool {
        match consent {
            Consent::Ferpa => self.ferpa,
            Consent::DataUsage => self.data_usage,
            Consent::PhotoConsent => self.photo_consent,
        }
    }

    pub fn set(&mut self, consent: Consent, accepted: bool) {
        match consent {
            Consent::Ferpa => self.ferpa = accepted,
            Consent::DataUsage => self.data_usage = accepted,
            Consent::PhotoConsent => self.photo_consent = accepted,
        }
    }

    /// True when every required consent is accepted.
    pub fn all_accepted(&self) -> bool {
        Consent::ALL.iter().all(|c| self.get(*c))
    }
}

/// Ethnicity answer. Encoded as the registrar's negative integer codes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(try_from = "i32", into = "i32")]
pub enum Ethnicity {
    Hispanic,
    NotHispanic,
    PreferNotToSay,
}

impl Ethnicity {
    pub fn code(self) -> i32 {
        match self {
            Self::Hispanic => -1,
            Self::NotHispanic => -2,
            Self::PreferNotToSay => -3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Hispanic => "Hispanic/Latino",
            Self::NotHispanic => "Not Hispanic/Latino",
            Self::PreferNotToSay => "Prefer not to say",
        }
    }
}

impl TryFrom<i32> for Ethnicity {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            -1 => Ok(Self::Hispanic),
            -2 => Ok(Self::NotHispanic),
            -3 => Ok(Self::PreferNotToSay),
            other => Err(format!("Unknown ethnicity code: {}", other)),
        }
    }
}

impl From<Ethnicity> for i32 {
    fn from(value: Ethnicity) -> Self {
        value.code()
    }
}

/// Race checkboxes, including "prefer not to say".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Race {
    NativeAmerican,
    Asian,
    Black,
    Hawaiian,
    White,
    /// Prefer not to say
    None,
}

impl Race {
    pub const ALL: [Race; 6] = [
        Race::NativeAmerican,
        Race::Asian,
        Race::Black,
        Race::Hawaiian,
        Race::White,
        Race::None,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::NativeAmerican => "American Indian or Alaska Native",
            Self::Asian => "Asian",
            Self::Black => "Black or African American",
            Self::Hawaiian => "Native Hawaiian or Other Pacific Islander",
            Self::White => "White",
            Self::None => "Prefer not to say",
        }
    }
}

/// Race and ethnicity answers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Demographic {
    pub ethnicity: Option<Ethnicity>,
    pub native_american: bool,
    pub asian: bool,
    pub black: bool,
    pub hawaiian: bool,
    pub white: bool,
    pub none: bool,
}

impl Demographic {
    pub fn race(&self, race: Race) -> bool {
        match race {
            Race::NativeAmerican => self.native_american,
            Race::Asian => self.asian,
            Race::Black => self.black,
            Race::Hawaiian => self.hawaiian,
            Race::White => self.white,
            Race::None => self.none,
        }
    }

    pub fn set_race(&mut self, race: Race, selected: bool) {
        match race {
            Race::NativeAmerican => self.native_american = selected,
            Race::Asian => self.asian = selected,
            Race::Black => self.black = selected,
            Race::Hawaiian => self.hawaiian = selected,
            Race::White => self.white = selected,
            Race::None => self.none = selected,
        }
    }

    /// True if any race box is checked, "prefer not to say" included.
    pub fn has_race_selection(&self) -> bool {
        Race::ALL.iter().any(|r| self.race(*r))
    }
}

/// Registrar holds and enrollment status shown on the welcome page.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Holds {
    pub registration_hold: bool,
    pub high_school_transcript_hold: bool,
    pub financial_hold: bool,
    pub medical_hold: bool,
    pub la_vida_hold: bool,
    pub declaration_of_major_hold: bool,
    pub is_registered: bool,
    pub is_incoming: bool,
}

impl Default for Holds {
    fn default() -> Self {
        Self {
            registration_hold: false,
            high_school_transcript_hold: false,
            financial_hold: false,
            medical_hold: false,
            la_vida_hold: false,
            declaration_of_major_hold: false,
            is_registered: true,
            is_incoming: false,
        }
    }
}

impl Holds {
    /// Names of the holds currently set.
    pub fn active(&self) -> Vec<&'static str> {
        [
            (self.registration_hold, "registration"),
            (self.high_school_transcript_hold, "high school transcript"),
            (self.financial_hold, "financial"),
            (self.medical_hold, "medical"),
            (self.la_vida_hold, "La Vida"),
            (self.declaration_of_major_hold, "declaration of major"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
        .collect()
    }

    /// True if any hold prevents the student from checking in.
    pub fn blocks_check_in(&self) -> bool {
        !self.active().is_empty()
    }
}
