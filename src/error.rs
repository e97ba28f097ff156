//! Error Types
//!
//! Failures surfaced by the check-in controller and its collaborators.
//! Step validation is deliberately absent here: an unmet requirement only
//! disables forward navigation and is reported through
//! [`crate::workflow::validator::ValidationError`].

use thiserror::Error;

use crate::services::ServiceError;
use crate::workflow::fields::Field;

/// Errors returned by the check-in controller.
#[derive(Debug, Error)]
pub enum CheckInError {
    /// Contact slot outside the three available records.
    #[error("contact index {0} is out of range (expected 0..3)")]
    ContactIndexOutOfRange(usize),

    /// A value of the wrong kind was written to a field.
    #[error("field {field:?} expects a {expected} value")]
    FieldTypeMismatch { field: Field, expected: &'static str },

    /// The authentication provider reports no signed-in user.
    #[error("academic check-in requires an authenticated user")]
    Unauthenticated,

    /// Submission was attempted before reaching the confirmation step.
    #[error("cannot submit from step {current}; submission is only available on the confirm step")]
    NotAtConfirmStep { current: usize },

    /// Saved data was already loaded, or loading was skipped.
    #[error("check-in data has already been loaded for this session")]
    AlreadyLoaded,

    /// The check-in was already submitted in this session.
    #[error("check-in has already been submitted")]
    AlreadySubmitted,

    /// A backend call failed.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, CheckInError>;
