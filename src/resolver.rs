//! Finding a player's current grouping in the round table

use crate::model::{Round, UserId};

/// All rounds that seat the given player, in table order
pub fn rounds_for(user: UserId, rounds: &[Round]) -> Vec<&Round> {
    rounds.iter().filter(|r| r.includes(user)).collect()
}

/// The player's current round: the highest-numbered round that seats them.
///
/// When two rows share that number the first one in the table wins.
pub fn resolve(user: UserId, rounds: &[Round]) -> Option<&Round> {
    rounds
        .iter()
        .filter(|r| r.includes(user))
        .fold(None, |best: Option<&Round>, r| match best {
            Some(b) if b.number >= r.number => Some(b),
            _ => Some(r),
        })
}
