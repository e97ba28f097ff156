//! Checkin - Academic Check-In Workflow
//!
//! The controller behind the student portal's academic check-in: a fixed
//! sequence of form steps that collects emergency contacts, a personal
//! phone number, privacy agreements and race/ethnicity answers, gates each
//! step on its own requirements, and submits the result to the registrar.
//!
//! # Architecture
//!
//! The library is organized into four main modules:
//!
//! - [`workflow`]: Field store, step rules, sequencing and payload assembly
//! - [`session`]: The controller a front end drives
//! - [`services`]: Backend contracts and the portal REST client
//! - [`config`]: Settings from file and environment
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use checkin::config::Settings;
//! use checkin::services::{PortalClient, StaticAuth};
//! use checkin::CheckInSession;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::load(None)?;
//!     let client = Arc::new(PortalClient::new(&settings)?);
//!     let auth = Arc::new(StaticAuth::new(settings.username.clone()));
//!
//!     let mut session = CheckInSession::with_portal(auth, client);
//!     session.load().await?;
//!     println!("Showing {}", session.current_step());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod services;
pub mod session;
pub mod workflow;

// Re-export commonly used types
pub use error::{CheckInError, Result};
pub use session::{CheckInSession, SessionStatus};
pub use workflow::model::CheckInStep;
pub use workflow::{Field, FieldStore, FieldValue};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "Academic Check-In";
