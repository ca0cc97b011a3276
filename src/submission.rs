//! Validating, encoding and sending round results, at most once per round

use crate::error::TrackerError;
use crate::model::{Round, Selection, UserId};
use crate::transport::ResultTransport;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("A winner must be selected for each match")]
    IncompleteSelection,

    #[error("No round has been assigned yet")]
    NoRoundsYet,

    #[error("Results for round {round} were already submitted")]
    AlreadySubmitted { round: u32 },

    #[error("Failed to send results: {0}")]
    Transport(#[source] TrackerError),
}

/// The flat record posted to the results form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionRecord {
    pub round: u32,
    pub net: u32,
    pub id1: u32,
    pub id2: u32,
    pub id3: u32,
    pub id4: u32,
    pub match1: u8,
    pub match2: u8,
    pub match3: u8,
    pub submitted_by: u32,
}

impl SubmissionRecord {
    pub fn new(round: &Round, outcomes: [u8; 3], submitter: UserId) -> Self {
        let [p1, p2, p3, p4] = round.players;
        Self {
            round: round.number,
            net: round.net,
            id1: p1.0,
            id2: p2.0,
            id3: p3.0,
            id4: p4.0,
            match1: outcomes[0],
            match2: outcomes[1],
            match3: outcomes[2],
            submitted_by: submitter.0,
        }
    }

    pub fn outcomes(&self) -> [u8; 3] {
        [self.match1, self.match2, self.match3]
    }
}

/// Where a single round stands for this session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Unanswered,
    ReadyToSubmit,
    Submitted,
}

/// Which round, if any, this session has already reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubmissionState {
    pub submitted_round: Option<u32>,
}

impl SubmissionState {
    pub fn is_submitted(&self, round: u32) -> bool {
        self.submitted_round == Some(round)
    }

    pub fn phase(&self, round: &Round, selection: &Selection) -> RoundPhase {
        if self.is_submitted(round.number) {
            RoundPhase::Submitted
        } else if selection.is_complete() {
            RoundPhase::ReadyToSubmit
        } else {
            RoundPhase::Unanswered
        }
    }
}

/// Sends results through a transport and guards against duplicate submits
pub struct SubmissionTracker<T> {
    transport: T,
}

impl<T: ResultTransport> SubmissionTracker<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Try to submit `selection` for `round`.
    ///
    /// Returns the state to carry forward alongside the outcome. The state only
    /// changes when the transport accepted the record.
    pub fn record_attempt(
        &mut self,
        submitter: UserId,
        round: &Round,
        selection: &Selection,
        state: SubmissionState,
    ) -> (SubmissionState, Result<(), SubmitError>) {
        let outcomes = match selection.encode() {
            Some(outcomes) => outcomes,
            None => return (state, Err(SubmitError::IncompleteSelection)),
        };

        if state.is_submitted(round.number) {
            log::debug!("Round {} already submitted, not resending", round.number);
            return (
                state,
                Err(SubmitError::AlreadySubmitted {
                    round: round.number,
                }),
            );
        }

        let record = SubmissionRecord::new(round, outcomes, submitter);
        match self.transport.send(&record) {
            Ok(()) => {
                log::info!(
                    "Submitted round {} net {}: {:?}",
                    round.number,
                    round.net,
                    outcomes
                );
                (
                    SubmissionState {
                        submitted_round: Some(round.number),
                    },
                    Ok(()),
                )
            }
            Err(e) => {
                log::warn!("Submitting round {} failed: {}", round.number, e);
                (state, Err(SubmitError::Transport(e)))
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::Result;

    /// Records what it was asked to send; optionally refuses everything
    #[derive(Default)]
    pub struct FakeTransport {
        pub sent: Vec<SubmissionRecord>,
        pub fail: bool,
    }

    impl ResultTransport for FakeTransport {
        fn send(&mut self, record: &SubmissionRecord) -> Result<()> {
            if self.fail {
                return Err(TrackerError::Transport("HTTP error: 500".to_string()));
            }
            self.sent.push(record.clone());
            Ok(())
        }
    }

    fn round(number: u32) -> Round {
        Round::new(number, 2, [UserId(1), UserId(2), UserId(3), UserId(4)])
    }

    #[test]
    fn test_successful_submission() {
        let mut tracker = SubmissionTracker::new(FakeTransport::default());
        let selection = Selection::from_outcomes([true, false, true]);

        let (state, result) =
            tracker.record_attempt(UserId(3), &round(1), &selection, SubmissionState::default());

        assert!(result.is_ok());
        assert_eq!(state.submitted_round, Some(1));
        let sent = &tracker.transport().sent;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].outcomes(), [1, 0, 1]);
        assert_eq!(sent[0].submitted_by, 3);
        assert_eq!((sent[0].round, sent[0].net), (1, 2));
        assert_eq!([sent[0].id1, sent[0].id2, sent[0].id3, sent[0].id4], [1, 2, 3, 4]);
    }

    #[test]
    fn test_incomplete_selection_never_sends() {
        let mut tracker = SubmissionTracker::new(FakeTransport::default());
        for outcomes in [&[][..], &[true][..], &[false, true][..]] {
            let selection = Selection::from_partial(outcomes);
            let (state, result) = tracker.record_attempt(
                UserId(1),
                &round(1),
                &selection,
                SubmissionState::default(),
            );
            assert!(matches!(result, Err(SubmitError::IncompleteSelection)));
            assert_eq!(state, SubmissionState::default());
        }
        assert!(tracker.transport().sent.is_empty());
    }

    #[test]
    fn test_duplicate_submission_rejected() {
        let mut tracker = SubmissionTracker::new(FakeTransport::default());
        let selection = Selection::from_outcomes([true, true, false]);

        let (state, first) =
            tracker.record_attempt(UserId(1), &round(3), &selection, SubmissionState::default());
        assert!(first.is_ok());

        let (after, second) = tracker.record_attempt(UserId(1), &round(3), &selection, state);
        assert!(matches!(second, Err(SubmitError::AlreadySubmitted { round: 3 })));
        assert_eq!(after, state);
        assert_eq!(tracker.transport().sent.len(), 1);
    }

    #[test]
    fn test_transport_failure_keeps_state() {
        let mut tracker = SubmissionTracker::new(FakeTransport {
            fail: true,
            ..Default::default()
        });
        let selection = Selection::from_outcomes([false, false, false]);
        let before = SubmissionState {
            submitted_round: Some(1),
        };

        let (state, result) = tracker.record_attempt(UserId(1), &round(2), &selection, before);
        assert!(matches!(result, Err(SubmitError::Transport(_))));
        assert_eq!(state, before);

        // Retrying once the endpoint recovers goes through
        tracker.transport.fail = false;
        let (state, result) = tracker.record_attempt(UserId(1), &round(2), &selection, state);
        assert!(result.is_ok());
        assert_eq!(state.submitted_round, Some(2));
    }

    #[test]
    fn test_round_phases() {
        let state = SubmissionState {
            submitted_round: Some(4),
        };
        let complete = Selection::from_outcomes([true, true, true]);

        assert_eq!(state.phase(&round(4), &complete), RoundPhase::Submitted);
        assert_eq!(state.phase(&round(5), &Selection::new()), RoundPhase::Unanswered);
        assert_eq!(state.phase(&round(5), &complete), RoundPhase::ReadyToSubmit);
    }
}
