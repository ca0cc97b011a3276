//! Terminal rendering of the two screens and of user-facing messages

use crate::error::TrackerError;
use crate::model::{Pairing, Selection, Winner};
use crate::session::Snapshot;
use crate::submission::{RoundPhase, SubmitError};
use std::fmt::Write;

pub const NOT_REGISTERED: &str =
    "User doesn't exist. Please check your email or fill out the interest form.";
pub const NO_ROUNDS: &str = "No rounds available yet. Please wait for the tournament to begin.";
pub const THANKS: &str = "Thank you for submitting! Please wait for the next round.";
pub const ALREADY_SUBMITTED: &str =
    "Results for this round are already in. Please wait for the next round.";
pub const INCOMPLETE: &str = "Please select a winner for each match.";
pub const SUBMIT_FAILED: &str = "Error submitting results. Please try again.";
pub const UNAVAILABLE: &str = "Could not reach the tournament sheet. Please try again.";

/// Identity entry screen
pub fn render_login(interest_form: Option<&str>, error: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Welcome to Spikeball!");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "If you have already filled out our interest form, enter the email you used:"
    );
    if let Some(error) = error {
        let _ = writeln!(out, "  ! {}", error);
    }
    if let Some(link) = interest_form {
        let _ = writeln!(out);
        let _ = writeln!(out, "If you haven't filled out the form yet: {}", link);
    }
    out
}

fn marker(selection: &Selection, pairing: Pairing, side: Winner) -> &'static str {
    if selection.winner(pairing) == Some(side) {
        "(x)"
    } else {
        "( )"
    }
}

/// Round display screen: the grouping, its three matches, and where the round stands
pub fn render_round(snapshot: &Snapshot, selection: &Selection) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Assigned Groupings for {}", snapshot.user.name);
    let _ = writeln!(out);

    let round = match &snapshot.current {
        Some(round) => round,
        None => {
            let _ = writeln!(out, "{}", NO_ROUNDS);
            return out;
        }
    };

    let _ = writeln!(out, "Round Number: {}", round.number);
    let _ = writeln!(out, "Net Number: {}", round.net);
    let _ = writeln!(out);

    for pairing in Pairing::ALL {
        let (left, right) = round.teams(pairing);
        let _ = writeln!(
            out,
            "{}:  {} [1] {}    vs    {} [2] {}",
            pairing,
            marker(selection, pairing, Winner::FirstTeam),
            left,
            marker(selection, pairing, Winner::SecondTeam),
            right
        );
    }
    let _ = writeln!(out);

    match snapshot.submission.phase(round, selection) {
        RoundPhase::Submitted => {
            let _ = writeln!(out, "{}", THANKS);
        }
        RoundPhase::ReadyToSubmit | RoundPhase::Unanswered => {
            let _ = writeln!(
                out,
                "Enter the winning side of each match (e.g. `1 2 1`) to submit, `logout`, or `q`."
            );
        }
    }
    out
}

pub fn submit_message(result: &Result<(), SubmitError>) -> &'static str {
    match result {
        Ok(()) => THANKS,
        Err(SubmitError::IncompleteSelection) => INCOMPLETE,
        Err(SubmitError::AlreadySubmitted { .. }) => ALREADY_SUBMITTED,
        Err(SubmitError::NoRoundsYet) => NO_ROUNDS,
        Err(SubmitError::Transport(_)) => SUBMIT_FAILED,
    }
}

pub fn login_message(error: &TrackerError) -> &'static str {
    match error {
        TrackerError::LookupFailure(_) => NOT_REGISTERED,
        _ => UNAVAILABLE,
    }
}
