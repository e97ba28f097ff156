//! Step Sequencing
//!
//! Tracks which step of the check-in is shown and moves between steps.
//!
//! Forward moves are gated by the step validator; backward moves are
//! always allowed. A refused move is a silent no-op, matching a
//! disabled button in the front end.

use log::{debug, info};

use super::fields::FieldStore;
use super::model::CheckInStep;
use super::validator::is_step_valid;

/// Position within the check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowState {
    /// Index of the step being shown, always within `0..step_count`
    pub current: usize,

    /// Fixed number of steps
    pub step_count: usize,
}

impl WorkflowState {
    /// Creates a state positioned on the first step.
    pub fn new() -> Self {
        Self {
            current: 0,
            step_count: CheckInStep::COUNT,
        }
    }

    /// Returns the step being shown.
    pub fn current_step(&self) -> CheckInStep {
        CheckInStep::from_index(self.current).unwrap_or(CheckInStep::Confirm)
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    /// True on the confirmation step.
    pub fn is_terminal(&self) -> bool {
        self.current + 1 == self.step_count
    }
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::new()
    }
}

/// Moves a [`WorkflowState`] according to the gating rules.
#[derive(Debug, Clone, Default)]
pub struct StepSequencer {
    state: WorkflowState,
}

impl StepSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn current(&self) -> usize {
        self.state.current
    }

    pub fn current_step(&self) -> CheckInStep {
        self.state.current_step()
    }

    pub fn is_first(&self) -> bool {
        self.state.is_first()
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// True if `next` would move forward right now.
    pub fn can_advance(&self, fields: &FieldStore) -> bool {
        !self.state.is_terminal() && is_step_valid(self.state.current, fields.view())
    }

    /// Advances one step if the current step is valid.
    ///
    /// Returns whether the position changed.
    pub fn next(&mut self, fields: &FieldStore) -> bool {
        if !self.can_advance(fields) {
            debug!("Next refused at {}", self.state.current_step());
            return false;
        }

        self.state.current += 1;
        info!("Advanced to {}", self.state.current_step());
        true
    }

    /// Goes back one step. Returns whether the position changed.
    pub fn prev(&mut self) -> bool {
        if self.state.is_first() {
            return false;
        }

        self.state.current -= 1;
        info!("Returned to {}", self.state.current_step());
        true
    }

    /// Jumps to `target`.
    ///
    /// Backward jumps always succeed. Forward jumps require every step from
    /// the current one up to (not including) `target` to be valid.
    pub fn goto(&mut self, target: usize, fields: &FieldStore) -> bool {
        if target >= self.state.step_count {
            debug!("Jump to step {} refused: out of range", target);
            return false;
        }

        if target > self.state.current {
            if let Some(blocked) =
                (self.state.current..target).find(|i| !is_step_valid(*i, fields.view()))
            {
                debug!("Jump to step {} refused: step {} is incomplete", target, blocked);
                return false;
            }
        }

        if target != self.state.current {
            self.state.current = target;
            info!("Jumped to {}", self.state.current_step());
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::fields::{ContactField, Field, FieldValue};
    use crate::workflow::model::{Consent, Ethnicity, Race};

    /// Fills in every step so the whole check-in can be walked.
    fn complete_store() -> FieldStore {
        let mut store = FieldStore::new();
        store
            .set_text(Field::contact(0, ContactField::FirstName), "John")
            .unwrap();
        store
            .set_text(Field::contact(1, ContactField::FirstName), "Jane")
            .unwrap();
        store.set_flag(Field::NoPhone, true).unwrap();
        for consent in Consent::ALL {
            store.set_flag(Field::Consent(consent), true).unwrap();
        }
        store
            .set(Field::Ethnicity, FieldValue::Ethnicity(Some(Ethnicity::NotHispanic)))
            .unwrap();
        store.set_flag(Field::Race(Race::White), true).unwrap();
        store
    }

    fn sequencer_at(index: usize) -> StepSequencer {
        StepSequencer {
            state: WorkflowState {
                current: index,
                step_count: CheckInStep::COUNT,
            },
        }
    }

    #[test]
    fn test_state_creation() {
        let state = WorkflowState::new();
        assert_eq!(state.current, 0);
        assert_eq!(state.step_count, 6);
        assert!(state.is_first());
        assert!(!state.is_terminal());
        assert_eq!(state.current_step(), CheckInStep::Welcome);
    }

    #[test]
    fn test_next_moves_iff_valid() {
        let empty = FieldStore::new();
        let complete = complete_store();

        for index in 0..CheckInStep::COUNT - 1 {
            let mut seq = sequencer_at(index);
            let valid = is_step_valid(index, empty.view());
            assert_eq!(seq.next(&empty), valid);
            assert_eq!(seq.current(), if valid { index + 1 } else { index });

            let mut seq = sequencer_at(index);
            assert!(seq.next(&complete));
            assert_eq!(seq.current(), index + 1);
        }
    }

    #[test]
    fn test_next_blocked_with_one_contact() {
        let mut store = FieldStore::new();
        store
            .set_text(Field::contact(1, ContactField::FirstName), "Jane")
            .unwrap();

        let mut seq = sequencer_at(1);
        assert!(!seq.next(&store));
        assert_eq!(seq.current(), 1);

        store
            .set_text(Field::contact(0, ContactField::FirstName), "John")
            .unwrap();
        assert!(seq.next(&store));
        assert_eq!(seq.current(), 2);
    }

    #[test]
    fn test_privacy_unlocks_after_photo_consent() {
        let mut store = FieldStore::new();
        store.set_flag(Field::Consent(Consent::Ferpa), true).unwrap();
        store.set_flag(Field::Consent(Consent::DataUsage), true).unwrap();

        let mut seq = sequencer_at(3);
        assert!(!seq.next(&store));

        store
            .set_flag(Field::Consent(Consent::PhotoConsent), true)
            .unwrap();
        assert!(seq.next(&store));
        assert_eq!(seq.current_step(), CheckInStep::Demographics);
    }

    #[test]
    fn test_next_on_terminal_is_noop() {
        let store = complete_store();
        let mut seq = sequencer_at(5);
        assert!(!seq.next(&store));
        assert_eq!(seq.current(), 5);
        assert!(seq.is_terminal());
    }

    #[test]
    fn test_prev_at_first_is_noop() {
        let mut seq = StepSequencer::new();
        assert!(!seq.prev());
        assert_eq!(seq.current(), 0);
    }

    #[test]
    fn test_prev_always_allowed() {
        let store = FieldStore::new();
        let mut seq = sequencer_at(4);
        assert!(!seq.can_advance(&store));
        assert!(seq.prev());
        assert_eq!(seq.current(), 3);
    }

    #[test]
    fn test_walk_to_confirm() {
        let store = complete_store();
        let mut seq = StepSequencer::new();
        while seq.next(&store) {}
        assert!(seq.is_terminal());
        assert_eq!(seq.current_step(), CheckInStep::Confirm);
    }

    #[test]
    fn test_goto_revalidates_skipped_steps() {
        let mut store = FieldStore::new();
        let mut seq = StepSequencer::new();

        // Phone is incomplete, so Privacy is out of reach.
        store
            .set_text(Field::contact(0, ContactField::FirstName), "John")
            .unwrap();
        store
            .set_text(Field::contact(2, ContactField::FirstName), "Joan")
            .unwrap();
        assert!(!seq.goto(3, &store));
        assert_eq!(seq.current(), 0);

        assert!(seq.goto(2, &store));
        assert_eq!(seq.current(), 2);

        store.set_text(Field::PersonalPhone, "9785550100").unwrap();
        assert!(seq.goto(3, &store));
    }

    #[test]
    fn test_goto_backward_and_bounds() {
        let store = FieldStore::new();
        let mut seq = sequencer_at(4);

        assert!(!seq.goto(6, &store));
        assert_eq!(seq.current(), 4);

        assert!(seq.goto(1, &store));
        assert_eq!(seq.current(), 1);

        assert!(seq.goto(1, &store));
        assert_eq!(seq.current(), 1);
    }
}
