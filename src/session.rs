//! A logged-in player's session: who they are, their current round, and what they've submitted

use crate::error::Result;
use crate::model::{Round, Selection, User};
use crate::resolver;
use crate::sheet::{self, RoundTable, TableSource};
use crate::submission::{RoundPhase, SubmissionState, SubmissionTracker, SubmitError};
use crate::transport::ResultTransport;

/// Everything the session knows, replaced as a whole on every poll or submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub user: User,
    pub current: Option<Round>,
    pub submission: SubmissionState,
}

impl Snapshot {
    pub fn new(user: User) -> Self {
        Self {
            user,
            current: None,
            submission: SubmissionState::default(),
        }
    }

    pub fn round_number(&self) -> Option<u32> {
        self.current.as_ref().map(|r| r.number)
    }

    /// Phase of the current round given the picks made so far
    pub fn phase(&self, selection: &Selection) -> Option<RoundPhase> {
        self.current
            .as_ref()
            .map(|round| self.submission.phase(round, selection))
    }
}

/// Fold a freshly fetched round table into a snapshot.
///
/// The current round only moves forward: a fetch that resolves to an older or
/// equal round number, or to nothing, keeps the last known round.
pub fn reconcile(snapshot: &Snapshot, fresh: &RoundTable) -> Snapshot {
    let latest = resolver::resolve(snapshot.user.id, &fresh.rounds);
    match (latest, snapshot.round_number()) {
        (Some(latest), Some(current)) if latest.number <= current => snapshot.clone(),
        (Some(latest), _) => Snapshot {
            current: Some(latest.clone()),
            ..snapshot.clone()
        },
        (None, _) => snapshot.clone(),
    }
}

pub struct Session<S, T> {
    rounds: S,
    tracker: SubmissionTracker<T>,
    snapshot: Snapshot,
}

impl<S: TableSource, T: ResultTransport> Session<S, T> {
    /// Look the player up in the roster and load their current round.
    ///
    /// Fails only when the roster can't be read or the email isn't in it; an
    /// unreachable round table just leaves the session without a round until
    /// the next poll.
    pub fn login(email: &str, roster: &dyn TableSource, rounds: S, transport: T) -> Result<Self> {
        let content = roster.fetch()?;
        let user = sheet::find_user(&content, email)?;
        log::info!("{} logged in as player {}", user.name, user.id);

        let mut session = Self {
            rounds,
            tracker: SubmissionTracker::new(transport),
            snapshot: Snapshot::new(user),
        };
        if let Err(e) = session.poll() {
            log::warn!("Could not load rounds at login: {}", e);
        }
        Ok(session)
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn user(&self) -> &User {
        &self.snapshot.user
    }

    /// Re-fetch the round table. Returns whether the current round advanced.
    ///
    /// On failure the snapshot is left untouched.
    pub fn poll(&mut self) -> Result<bool> {
        let content = self.rounds.fetch()?;
        let table = sheet::read_rounds(&content)?;

        let previous = self.snapshot.round_number();
        self.snapshot = reconcile(&self.snapshot, &table);
        let advanced = self.snapshot.round_number() != previous;
        if advanced {
            log::info!(
                "Player {} moved to round {:?}",
                self.snapshot.user.id,
                self.snapshot.round_number()
            );
        }
        Ok(advanced)
    }

    /// Submit the picks for the current round
    pub fn submit(&mut self, selection: &Selection) -> std::result::Result<(), SubmitError> {
        let round = match &self.snapshot.current {
            Some(round) => round.clone(),
            None => return Err(SubmitError::NoRoundsYet),
        };

        let (submission, result) = self.tracker.record_attempt(
            self.snapshot.user.id,
            &round,
            selection,
            self.snapshot.submission,
        );
        self.snapshot = Snapshot {
            submission,
            ..self.snapshot.clone()
        };
        result
    }

    /// End the session, handing back the player it belonged to
    pub fn logout(self) -> User {
        log::info!("{} logged out", self.snapshot.user.name);
        self.snapshot.user
    }
}
