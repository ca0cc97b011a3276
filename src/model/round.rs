use super::user::UserId;
use std::fmt;

/// One of the three ways to split the four players of a round into two teams
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairing {
    /// p1,p2 vs p3,p4
    First,
    /// p1,p3 vs p2,p4
    Second,
    /// p1,p4 vs p2,p3
    Third,
}

impl Pairing {
    pub const ALL: [Pairing; 3] = [Pairing::First, Pairing::Second, Pairing::Third];

    /// Slot indices of the two teams
    fn slots(&self) -> ([usize; 2], [usize; 2]) {
        match self {
            Pairing::First => ([0, 1], [2, 3]),
            Pairing::Second => ([0, 2], [1, 3]),
            Pairing::Third => ([0, 3], [1, 2]),
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Pairing::First => 0,
            Pairing::Second => 1,
            Pairing::Third => 2,
        }
    }
}

impl fmt::Display for Pairing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Match {}", self.index() + 1)
    }
}

/// Two players on the same side of a pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Team(pub UserId, pub UserId);

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.0, self.1)
    }
}

/// A scheduled grouping of four players on one net
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub number: u32,
    pub net: u32,
    pub players: [UserId; 4],
}

impl Round {
    pub fn new(number: u32, net: u32, players: [UserId; 4]) -> Self {
        Self {
            number,
            net,
            players,
        }
    }

    pub fn includes(&self, user: UserId) -> bool {
        self.players.contains(&user)
    }

    /// The two teams playing in the given pairing
    pub fn teams(&self, pairing: Pairing) -> (Team, Team) {
        let ([a, b], [c, d]) = pairing.slots();
        (
            Team(self.players[a], self.players[b]),
            Team(self.players[c], self.players[d]),
        )
    }

    pub fn title(&self) -> String {
        format!("Round {} • Net {}", self.number, self.net)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round() -> Round {
        Round::new(1, 4, [UserId(1), UserId(2), UserId(3), UserId(4)])
    }

    #[test]
    fn test_pairing_teams() {
        let r = round();
        assert_eq!(
            r.teams(Pairing::First),
            (Team(UserId(1), UserId(2)), Team(UserId(3), UserId(4)))
        );
        assert_eq!(
            r.teams(Pairing::Second),
            (Team(UserId(1), UserId(3)), Team(UserId(2), UserId(4)))
        );
        assert_eq!(
            r.teams(Pairing::Third),
            (Team(UserId(1), UserId(4)), Team(UserId(2), UserId(3)))
        );
    }

    #[test]
    fn test_pairings_cover_every_split() {
        // Each player partners each other player exactly once
        let r = round();
        let mut partners = Vec::new();
        for pairing in Pairing::ALL {
            let (left, right) = r.teams(pairing);
            partners.push((left.0, left.1));
            partners.push((right.0, right.1));
        }
        partners.sort();
        partners.dedup();
        assert_eq!(partners.len(), 6);
    }

    #[test]
    fn test_includes() {
        let r = round();
        assert!(r.includes(UserId(3)));
        assert!(!r.includes(UserId(5)));
    }

    #[test]
    fn test_display() {
        let r = round();
        assert_eq!(r.title(), "Round 1 • Net 4");
        assert_eq!(Pairing::Third.to_string(), "Match 3");
        assert_eq!(r.teams(Pairing::Second).1.to_string(), "2 / 4");
    }
}
