//! Check-In Session
//!
//! Ties the field store, step sequencer and backend collaborators
//! together for one student's check-in. A front end owns one session,
//! forwards user edits and navigation to it, and renders whatever step
//! it reports.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{error, info, warn};

use crate::error::{CheckInError, Result};
use crate::services::{AuthProvider, ContactService, HoldService, PortalClient, SubmissionService};
use crate::workflow::answers::Answers;
use crate::workflow::fields::{Field, FieldSnapshot, FieldStore, FieldValue};
use crate::workflow::hydrate::{hydrate, HydrateOutcome, Hydration};
use crate::workflow::model::CheckInStep;
use crate::workflow::payload::{assemble, SubmissionPayload};
use crate::workflow::state::StepSequencer;
use crate::workflow::validator::{step_issues, ValidationError};

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Saved data has not been loaded yet
    Loading,
    /// Accepting edits and navigation
    Ready,
    /// The check-in was accepted by the backend
    Submitted,
}

/// Confirmation of an accepted check-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub username: String,
    pub submitted_at: DateTime<Utc>,
    pub payload: SubmissionPayload,
}

/// One student's academic check-in.
pub struct CheckInSession {
    auth: Arc<dyn AuthProvider>,
    contacts: Arc<dyn ContactService>,
    holds: Arc<dyn HoldService>,
    submitter: Arc<dyn SubmissionService>,
    fields: FieldStore,
    sequencer: StepSequencer,
    status: SessionStatus,
    failure_notice: Option<String>,
    submitted_at: Option<DateTime<Utc>>,
}

impl CheckInSession {
    /// Creates a session positioned on the welcome step.
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        contacts: Arc<dyn ContactService>,
        holds: Arc<dyn HoldService>,
        submitter: Arc<dyn SubmissionService>,
    ) -> Self {
        Self {
            auth,
            contacts,
            holds,
            submitter,
            fields: FieldStore::new(),
            sequencer: StepSequencer::new(),
            status: SessionStatus::Loading,
            failure_notice: None,
            submitted_at: None,
        }
    }

    /// Creates a session backed entirely by the portal API.
    pub fn with_portal(auth: Arc<dyn AuthProvider>, client: Arc<PortalClient>) -> Self {
        Self::new(auth, client.clone(), client.clone(), client)
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == SessionStatus::Loading
    }

    /// Loads previously saved data for the signed-in student.
    ///
    /// Holds are recorded whenever they could be read. Only a
    /// [`HydrateOutcome::Found`] outcome changes the contacts. The session
    /// becomes ready whatever the outcome, as long as someone is signed in.
    /// Loading happens once; later calls leave the answers untouched.
    pub async fn load(&mut self) -> Result<HydrateOutcome> {
        match self.status {
            SessionStatus::Loading => {}
            SessionStatus::Ready => return Err(CheckInError::AlreadyLoaded),
            SessionStatus::Submitted => return Err(CheckInError::AlreadySubmitted),
        }

        let username = self.signed_in_user().await?;

        let Hydration { outcome, holds } =
            hydrate(&username, &*self.contacts, &*self.holds).await;
        if let Some(holds) = holds {
            self.fields.set_holds(holds);
        }
        if let HydrateOutcome::Found(patch) = &outcome {
            self.fields.apply_patch(patch.clone());
        }

        self.status = SessionStatus::Ready;
        Ok(outcome)
    }

    /// Marks the session ready without loading saved data.
    pub fn skip_load(&mut self) {
        if self.status == SessionStatus::Loading {
            info!("Skipping saved data; starting from defaults");
            self.status = SessionStatus::Ready;
        }
    }

    pub fn fields(&self) -> &FieldStore {
        &self.fields
    }

    pub fn snapshot(&self) -> FieldSnapshot {
        self.fields.snapshot()
    }

    pub fn get(&self, field: Field) -> Result<FieldValue> {
        self.fields.get(field)
    }

    /// Records a user edit.
    pub fn set(&mut self, field: Field, value: FieldValue) -> Result<()> {
        if self.status == SessionStatus::Submitted {
            return Err(CheckInError::AlreadySubmitted);
        }
        self.fields.set(field, value)
    }

    /// Fills the current step from a pre-filled answers document.
    pub fn apply_answers(&mut self, answers: &Answers) -> Result<()> {
        if self.status == SessionStatus::Submitted {
            return Err(CheckInError::AlreadySubmitted);
        }
        answers.apply_step(self.current_step(), &mut self.fields)
    }

    pub fn current_step(&self) -> CheckInStep {
        self.sequencer.current_step()
    }

    pub fn current_index(&self) -> usize {
        self.sequencer.current()
    }

    pub fn is_terminal(&self) -> bool {
        self.sequencer.is_terminal()
    }

    /// Whether `Next` should be enabled.
    pub fn can_advance(&self) -> bool {
        self.sequencer.can_advance(&self.fields)
    }

    /// Unmet requirements of the current step.
    pub fn issues(&self) -> Vec<ValidationError> {
        step_issues(self.current_step(), self.fields.view())
    }

    pub fn next(&mut self) -> bool {
        self.sequencer.next(&self.fields)
    }

    pub fn prev(&mut self) -> bool {
        self.sequencer.prev()
    }

    pub fn goto(&mut self, target: usize) -> bool {
        self.sequencer.goto(target, &self.fields)
    }

    /// Message to show after a failed submission, cleared on success.
    pub fn failure_notice(&self) -> Option<&str> {
        self.failure_notice.as_deref()
    }

    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    /// Builds the payload that `submit` would send.
    pub async fn preview(&self) -> Result<SubmissionPayload> {
        let username = self.signed_in_user().await?;
        Ok(assemble(&username, self.fields.view()))
    }

    /// Sends the check-in.
    ///
    /// Only allowed on the confirm step. On failure the session stays on
    /// the confirm step with a failure notice so the student can retry.
    pub async fn submit(&mut self) -> Result<SubmitReceipt> {
        if self.status == SessionStatus::Submitted {
            return Err(CheckInError::AlreadySubmitted);
        }
        if !self.sequencer.is_terminal() {
            return Err(CheckInError::NotAtConfirmStep {
                current: self.sequencer.current(),
            });
        }

        let username = self.signed_in_user().await?;
        let payload = assemble(&username, self.fields.view());

        if let Err(e) = self.submitter.submit(&payload).await {
            error!("Check-in submission for {} failed: {}", username, e);
            self.failure_notice = Some(format!(
                "Your check-in could not be submitted ({}). Please try again.",
                e
            ));
            return Err(e.into());
        }

        let submitted_at = Utc::now();
        self.failure_notice = None;
        self.submitted_at = Some(submitted_at);
        self.status = SessionStatus::Submitted;
        info!("Check-in submitted for {} at {}", username, submitted_at.to_rfc3339());

        Ok(SubmitReceipt {
            username,
            submitted_at,
            payload,
        })
    }

    async fn signed_in_user(&self) -> Result<String> {
        if !self.auth.is_authenticated().await {
            warn!("Academic check-in requested without an authenticated user");
            return Err(CheckInError::Unauthenticated);
        }
        self.auth
            .username()
            .await
            .ok_or(CheckInError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::services::{ServiceError, StaticAuth};
    use crate::workflow::fields::ContactField;
    use crate::workflow::model::{Consent, EmergencyContact, Ethnicity, Holds, Race};

    #[derive(Default)]
    struct FakePortal {
        saved: Vec<EmergencyContact>,
        holds: Holds,
        contacts_down: bool,
        contacts_missing: bool,
        reject: AtomicBool,
        submitted: Mutex<Vec<SubmissionPayload>>,
    }

    #[async_trait]
    impl ContactService for FakePortal {
        async fn get_emergency_contacts(
            &self,
            _username: &str,
        ) -> std::result::Result<Vec<EmergencyContact>, ServiceError> {
            if self.contacts_down {
                return Err(ServiceError::Status(502));
            }
            if self.contacts_missing {
                return Err(ServiceError::NotFound);
            }
            Ok(self.saved.clone())
        }
    }

    #[async_trait]
    impl HoldService for FakePortal {
        async fn get_holds(&self, _username: &str) -> std::result::Result<Holds, ServiceError> {
            Ok(self.holds)
        }
    }

    #[async_trait]
    impl SubmissionService for FakePortal {
        async fn submit(
            &self,
            payload: &SubmissionPayload,
        ) -> std::result::Result<(), ServiceError> {
            if self.reject.load(Ordering::SeqCst) {
                return Err(ServiceError::Rejected("phone number invalid".to_string()));
            }
            self.submitted.lock().unwrap().push(payload.clone());
            Ok(())
        }
    }

    fn session(portal: Arc<FakePortal>, user: Option<&str>) -> CheckInSession {
        let auth = Arc::new(StaticAuth::new(user.map(str::to_string)));
        CheckInSession::new(auth, portal.clone(), portal.clone(), portal)
    }

    fn named(slot: usize, name: &str) -> EmergencyContact {
        let mut contact = EmergencyContact::empty(slot);
        contact.first_name = name.to_string();
        contact
    }

    fn fill_remaining_steps(session: &mut CheckInSession) {
        session.set(Field::NoPhone, FieldValue::Flag(true)).unwrap();
        for consent in Consent::ALL {
            session
                .set(Field::Consent(consent), FieldValue::Flag(true))
                .unwrap();
        }
        session
            .set(Field::Ethnicity, FieldValue::Ethnicity(Some(Ethnicity::PreferNotToSay)))
            .unwrap();
        session
            .set(Field::Race(Race::None), FieldValue::Flag(true))
            .unwrap();
    }

    async fn walk_to_confirm(session: &mut CheckInSession) {
        session.load().await.unwrap();
        fill_remaining_steps(session);
        while session.next() {}
        assert!(session.is_terminal());
    }

    fn portal_with_saved_contacts() -> Arc<FakePortal> {
        Arc::new(FakePortal {
            saved: vec![named(0, "John"), named(1, "Jane")],
            ..FakePortal::default()
        })
    }

    #[tokio::test]
    async fn test_load_requires_authentication() {
        let mut session = session(Arc::new(FakePortal::default()), None);
        assert!(matches!(
            session.load().await,
            Err(CheckInError::Unauthenticated)
        ));
        assert!(session.is_loading());
    }

    #[tokio::test]
    async fn test_load_hydrates_contacts() {
        let mut session = session(portal_with_saved_contacts(), Some("jane.doe"));
        let outcome = session.load().await.unwrap();

        assert!(outcome.is_found());
        assert_eq!(session.status(), SessionStatus::Ready);
        assert_eq!(
            session
                .get(Field::contact(1, ContactField::FirstName))
                .unwrap(),
            FieldValue::text("Jane")
        );
    }

    #[tokio::test]
    async fn test_load_failure_keeps_defaults() {
        let portal = Arc::new(FakePortal {
            contacts_down: true,
            ..FakePortal::default()
        });
        let mut session = session(portal, Some("jane.doe"));
        let before = session.snapshot();

        let outcome = session.load().await.unwrap();
        assert!(matches!(outcome, HydrateOutcome::TransientError(_)));
        assert_eq!(session.snapshot(), before);
        assert_eq!(session.status(), SessionStatus::Ready);
    }

    #[tokio::test]
    async fn test_holds_block_welcome() {
        let portal = Arc::new(FakePortal {
            saved: vec![named(0, "John")],
            holds: Holds {
                financial_hold: true,
                ..Holds::default()
            },
            ..FakePortal::default()
        });
        let mut session = session(portal, Some("jane.doe"));
        session.load().await.unwrap();

        assert!(!session.can_advance());
        assert!(!session.next());
        assert_eq!(session.current_step(), CheckInStep::Welcome);
        assert_eq!(session.issues().len(), 1);
    }

    #[tokio::test]
    async fn test_holds_block_welcome_without_saved_contacts() {
        let portal = Arc::new(FakePortal {
            contacts_missing: true,
            holds: Holds {
                financial_hold: true,
                ..Holds::default()
            },
            ..FakePortal::default()
        });
        let mut session = session(portal, Some("new.student"));

        let outcome = session.load().await.unwrap();
        assert_eq!(outcome, HydrateOutcome::NotFound);
        assert!(session.fields().holds().financial_hold);
        assert!(!session.can_advance());
        assert!(!session.next());
        assert_eq!(session.current_step(), CheckInStep::Welcome);
    }

    #[tokio::test]
    async fn test_holds_block_welcome_when_contacts_unavailable() {
        let portal = Arc::new(FakePortal {
            contacts_down: true,
            holds: Holds {
                medical_hold: true,
                ..Holds::default()
            },
            ..FakePortal::default()
        });
        let mut session = session(portal, Some("new.student"));

        let outcome = session.load().await.unwrap();
        assert!(matches!(outcome, HydrateOutcome::TransientError(_)));
        assert!(!session.can_advance());
    }

    #[tokio::test]
    async fn test_second_load_keeps_edits() {
        let mut session = session(portal_with_saved_contacts(), Some("jane.doe"));
        session.load().await.unwrap();
        session
            .set(Field::contact(0, ContactField::FirstName), FieldValue::text("Johnny"))
            .unwrap();

        assert!(matches!(
            session.load().await,
            Err(CheckInError::AlreadyLoaded)
        ));
        assert_eq!(
            session
                .get(Field::contact(0, ContactField::FirstName))
                .unwrap(),
            FieldValue::text("Johnny")
        );
    }

    #[tokio::test]
    async fn test_load_after_skip_is_refused() {
        let mut session = session(portal_with_saved_contacts(), Some("jane.doe"));
        session.skip_load();

        assert!(matches!(
            session.load().await,
            Err(CheckInError::AlreadyLoaded)
        ));
        assert_eq!(session.snapshot(), FieldSnapshot::default());
    }

    #[tokio::test]
    async fn test_submit_only_from_confirm() {
        let mut session = session(portal_with_saved_contacts(), Some("jane.doe"));
        session.load().await.unwrap();

        assert!(matches!(
            session.submit().await,
            Err(CheckInError::NotAtConfirmStep { current: 0 })
        ));
    }

    #[tokio::test]
    async fn test_successful_submit() {
        let portal = portal_with_saved_contacts();
        let mut session = session(portal.clone(), Some("jane.doe"));
        walk_to_confirm(&mut session).await;

        let receipt = session.submit().await.unwrap();
        assert_eq!(receipt.username, "jane.doe");
        assert_eq!(receipt.payload.emergency_contacts.len(), 2);
        assert_eq!(session.status(), SessionStatus::Submitted);
        assert_eq!(session.submitted_at(), Some(receipt.submitted_at));

        let sent = portal.submitted.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], receipt.payload);
    }

    #[tokio::test]
    async fn test_failed_submit_stays_on_confirm_and_can_retry() {
        let portal = portal_with_saved_contacts();
        portal.reject.store(true, Ordering::SeqCst);
        let mut session = session(portal.clone(), Some("jane.doe"));
        walk_to_confirm(&mut session).await;

        assert!(matches!(
            session.submit().await,
            Err(CheckInError::Service(ServiceError::Rejected(_)))
        ));
        assert!(session.is_terminal());
        assert_eq!(session.status(), SessionStatus::Ready);
        assert!(session.failure_notice().unwrap().contains("try again"));
        assert!(portal.submitted.lock().unwrap().is_empty());

        portal.reject.store(false, Ordering::SeqCst);
        session.submit().await.unwrap();
        assert!(session.failure_notice().is_none());
        assert_eq!(portal.submitted.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_no_edits_or_resubmit_after_submission() {
        let mut session = session(portal_with_saved_contacts(), Some("jane.doe"));
        walk_to_confirm(&mut session).await;
        session.submit().await.unwrap();

        assert!(matches!(
            session.set(Field::NoPhone, FieldValue::Flag(false)),
            Err(CheckInError::AlreadySubmitted)
        ));
        assert!(matches!(
            session.submit().await,
            Err(CheckInError::AlreadySubmitted)
        ));
        assert!(matches!(
            session.load().await,
            Err(CheckInError::AlreadySubmitted)
        ));
    }

    #[tokio::test]
    async fn test_skip_load_starts_from_defaults() {
        let mut session = session(portal_with_saved_contacts(), Some("jane.doe"));
        session.skip_load();

        assert_eq!(session.status(), SessionStatus::Ready);
        assert_eq!(session.snapshot(), FieldSnapshot::default());
    }

    #[tokio::test]
    async fn test_preview_matches_assembled_payload() {
        let mut session = session(portal_with_saved_contacts(), Some("jane.doe"));
        session.load().await.unwrap();

        let preview = session.preview().await.unwrap();
        assert_eq!(preview, assemble("jane.doe", session.fields().view()));
    }

    #[tokio::test]
    async fn test_apply_answers_fills_current_step_only() {
        let answers = Answers::from_yaml(
            "contacts: [{first_name: John}, {first_name: Jane}]\nphone: {no_phone: true}\n",
        )
        .unwrap();
        let mut session = session(Arc::new(FakePortal::default()), Some("jane.doe"));
        session.load().await.unwrap();

        session.apply_answers(&answers).unwrap();
        assert_eq!(session.snapshot().named_contacts(), 0);

        assert!(session.next());
        session.apply_answers(&answers).unwrap();
        assert_eq!(session.snapshot().named_contacts(), 2);
        assert!(!session.fields().phone().no_phone);
        assert!(session.next());
    }
}
