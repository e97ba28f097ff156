//! Backend Collaborators
//!
//! Contracts for the portal services the check-in talks to, plus a REST
//! implementation of them.
//!
//! - [`AuthProvider`]: who is signed in
//! - [`ContactService`]: previously saved emergency contacts
//! - [`HoldService`]: registrar holds shown on the welcome step
//! - [`SubmissionService`]: accepts the finished check-in
//! - [`http`]: `reqwest` client for the portal API

pub mod http;

use async_trait::async_trait;
use thiserror::Error;

use crate::workflow::model::{EmergencyContact, Holds};
use crate::workflow::payload::SubmissionPayload;

pub use http::PortalClient;

/// Failures reported by backend collaborators.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The requested record does not exist
    #[error("record not found")]
    NotFound,

    /// The server answered with a non-success status
    #[error("server responded with status {0}")]
    Status(u16),

    /// The server refused the submitted data
    #[error("submission rejected: {0}")]
    Rejected(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid service configuration: {0}")]
    Config(String),
}

/// Source of the signed-in identity.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn is_authenticated(&self) -> bool;

    /// Portal username of the signed-in student.
    async fn username(&self) -> Option<String>;
}

#[async_trait]
pub trait ContactService: Send + Sync {
    /// Returns up to three saved contacts in slot order.
    async fn get_emergency_contacts(
        &self,
        username: &str,
    ) -> Result<Vec<EmergencyContact>, ServiceError>;
}

#[async_trait]
pub trait HoldService: Send + Sync {
    async fn get_holds(&self, username: &str) -> Result<Holds, ServiceError>;
}

#[async_trait]
pub trait SubmissionService: Send + Sync {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<(), ServiceError>;
}

/// Identity fixed at startup, e.g. from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    username: Option<String>,
}

impl StaticAuth {
    pub fn new(username: Option<String>) -> Self {
        let username = username
            .map(|u| u.trim().to_lowercase())
            .filter(|u| !u.is_empty());
        Self { username }
    }
}

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn is_authenticated(&self) -> bool {
        self.username.is_some()
    }

    async fn username(&self) -> Option<String> {
        self.username.clone()
    }
}
