//! Check-In Session Module
//!
//! The controller a front end drives: it owns the answers and the current
//! step, and calls the backend for loading and submission.
//!
//! - [`controller`]: [`CheckInSession`] and its lifecycle

pub mod controller;

pub use controller::{CheckInSession, SessionStatus, SubmitReceipt};
