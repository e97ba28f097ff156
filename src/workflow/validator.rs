//! Step Validation
//!
//! Pure predicates deciding whether the student may leave a step.
//! A failed check is not an error; it only keeps the `Next` action
//! disabled. The issue list exists so a front end can explain why.

use log::debug;

use super::fields::FieldSnapshot;
use super::model::{CheckInStep, Consent, REQUIRED_CONTACTS};

/// Unmet requirement of a step, with a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Registrar holds must be cleared first
    HoldsPresent(Vec<&'static str>),
    NotEnoughContacts { named: usize, required: usize },
    MissingPhone,
    ConsentMissing(Consent),
    EthnicityNotSelected,
    RaceNotSelected,
    /// The confirm step is left through submission, not `next`
    TerminalStep,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HoldsPresent(holds) => {
                write!(f, "Resolve the following holds first: {}", holds.join(", "))
            }
            Self::NotEnoughContacts { named, required } => write!(
                f,
                "At least {} emergency contacts need a first name ({} provided)",
                required, named
            ),
            Self::MissingPhone => {
                write!(f, "Enter a personal phone number or indicate you have none")
            }
            Self::ConsentMissing(consent) => {
                write!(f, "The {} agreement must be accepted", consent.label())
            }
            Self::EthnicityNotSelected => write!(f, "Select an ethnicity option"),
            Self::RaceNotSelected => {
                write!(f, "Select at least one race, or \"Prefer not to say\"")
            }
            Self::TerminalStep => write!(f, "This is the final step; submit to finish"),
        }
    }
}

/// Lists every unmet requirement of `step`.
pub fn step_issues(step: CheckInStep, fields: &FieldSnapshot) -> Vec<ValidationError> {
    let mut issues = Vec::new();

    match step {
        CheckInStep::Welcome => {
            let holds = fields.holds.active();
            if !holds.is_empty() {
                issues.push(ValidationError::HoldsPresent(holds));
            }
        }
        CheckInStep::EmergencyContacts => {
            let named = fields.named_contacts();
            if named < REQUIRED_CONTACTS {
                issues.push(ValidationError::NotEnoughContacts {
                    named,
                    required: REQUIRED_CONTACTS,
                });
            }
        }
        CheckInStep::Phone => {
            if fields.phone.number.trim().is_empty() && !fields.phone.no_phone {
                issues.push(ValidationError::MissingPhone);
            }
        }
        CheckInStep::Privacy => {
            for consent in Consent::ALL {
                if !fields.privacy.get(consent) {
                    issues.push(ValidationError::ConsentMissing(consent));
                }
            }
        }
        CheckInStep::Demographics => {
            if fields.demographic.ethnicity.is_none() {
                issues.push(ValidationError::EthnicityNotSelected);
            }
            if !fields.demographic.has_race_selection() {
                issues.push(ValidationError::RaceNotSelected);
            }
        }
        CheckInStep::Confirm => issues.push(ValidationError::TerminalStep),
    }

    if !issues.is_empty() {
        debug!("{} blocked by {} issue(s)", step, issues.len());
    }

    issues
}

/// Returns whether forward navigation from `step_index` is allowed.
///
/// Indices outside the workflow and the terminal step are never valid.
pub fn is_step_valid(step_index: usize, fields: &FieldSnapshot) -> bool {
    match CheckInStep::from_index(step_index) {
        Some(step) => step_issues(step, fields).is_empty(),
        None => false,
    }
}
