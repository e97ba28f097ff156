//! Load/Hydrate
//!
//! One-time pre-population of the field store from data the student
//! saved in an earlier check-in, plus the registrar holds that gate the
//! welcome step.
//!
//! The contact outcome keeps "nothing saved" apart from "lookup failed" so
//! the caller can tell them apart; neither is raised as an error. Holds are
//! looked up independently and reported whatever the contact outcome.

use log::{debug, info, warn};

use crate::services::{ContactService, HoldService, ServiceError};

use super::model::{EmergencyContact, Holds, CONTACT_SLOTS};

/// Saved contacts used to seed the field store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HydratePatch {
    /// Saved contacts in slot order (at most three are used)
    pub contacts: Vec<EmergencyContact>,
}

/// Result of the saved-contact lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HydrateOutcome {
    /// Saved data exists and should be applied
    Found(HydratePatch),
    /// The student has no saved contacts
    NotFound,
    /// The lookup failed; defaults stay in place
    TransientError(String),
}

impl HydrateOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Everything learned while hydrating a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hydration {
    pub outcome: HydrateOutcome,

    /// Current registrar holds, `None` if the lookup failed
    pub holds: Option<Holds>,
}

/// Fetches the student's saved contacts and current holds.
///
/// Both lookups always run. A hold lookup failure is logged and does not
/// affect the contact outcome.
pub async fn hydrate(
    username: &str,
    contacts: &dyn ContactService,
    holds: &dyn HoldService,
) -> Hydration {
    debug!("Hydrating check-in for {}", username);

    let (saved, current_holds) = tokio::join!(
        contacts.get_emergency_contacts(username),
        holds.get_holds(username)
    );

    let holds = match current_holds {
        Ok(holds) => {
            if holds.blocks_check_in() {
                info!("{} has holds: {}", username, holds.active().join(", "));
            }
            Some(holds)
        }
        Err(e) => {
            warn!("Could not load holds for {}: {}", username, e);
            None
        }
    };

    Hydration {
        outcome: contact_outcome(username, saved),
        holds,
    }
}

fn contact_outcome(
    username: &str,
    saved: Result<Vec<EmergencyContact>, ServiceError>,
) -> HydrateOutcome {
    let saved = match saved {
        Ok(saved) if saved.is_empty() => {
            info!("No saved emergency contacts for {}", username);
            return HydrateOutcome::NotFound;
        }
        Ok(saved) => saved,
        Err(ServiceError::NotFound) => {
            info!("No saved emergency contacts for {}", username);
            return HydrateOutcome::NotFound;
        }
        Err(e) => {
            warn!("Could not load emergency contacts for {}: {}", username, e);
            return HydrateOutcome::TransientError(e.to_string());
        }
    };

    if saved.len() > CONTACT_SLOTS {
        warn!(
            "Backend returned {} contacts; only the first {} are used",
            saved.len(),
            CONTACT_SLOTS
        );
    }
    info!("Loaded {} saved emergency contact(s)", saved.len().min(CONTACT_SLOTS));

    HydrateOutcome::Found(HydratePatch {
        contacts: saved.into_iter().take(CONTACT_SLOTS).collect(),
    })
}
