//! Check-In Workflow Module
//!
//! Data structures and rules for the academic check-in: what is collected,
//! when a student may move on, and what is finally sent.
//!
//! # Structure
//!
//! - [`model`]: Records collected by each step
//! - [`fields`]: Typed field store holding the answers
//! - [`validator`]: Per-step gating rules
//! - [`state`]: Step sequencing
//! - [`payload`]: Submission assembly
//! - [`hydrate`]: Loading previously saved data
//! - [`answers`]: YAML answers files

pub mod answers;
pub mod fields;
pub mod hydrate;
pub mod model;
pub mod payload;
pub mod state;
pub mod validator;

pub use answers::{load_answers, Answers};
pub use fields::{ContactField, Field, FieldSnapshot, FieldStore, FieldValue};
pub use hydrate::{hydrate, HydrateOutcome, HydratePatch, Hydration};
pub use model::CheckInStep;
pub use payload::{assemble, SubmissionPayload};
pub use state::{StepSequencer, WorkflowState};
pub use validator::{is_step_valid, step_issues, ValidationError};
