use super::round::Pairing;

/// Which side of a pairing won
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    FirstTeam,
    SecondTeam,
}

impl Winner {
    /// Parse a pick typed at the prompt: `1`/`l`/`left` or `2`/`r`/`right`
    pub fn from_input(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "1" | "l" | "left" => Some(Winner::FirstTeam),
            "2" | "r" | "right" => Some(Winner::SecondTeam),
            _ => None,
        }
    }

    pub fn from_first_team_won(won: bool) -> Self {
        if won {
            Winner::FirstTeam
        } else {
            Winner::SecondTeam
        }
    }

    /// Encoded outcome: 1 when the first team of the pairing won, 0 otherwise
    pub fn bit(&self) -> u8 {
        match self {
            Winner::FirstTeam => 1,
            Winner::SecondTeam => 0,
        }
    }
}

/// The winners picked so far for the three pairings of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection([Option<Winner>; 3]);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_outcomes(outcomes: [bool; 3]) -> Self {
        Selection(outcomes.map(|won| Some(Winner::from_first_team_won(won))))
    }

    /// Build a selection from however many outcomes were provided; missing ones stay unset
    pub fn from_partial(outcomes: &[bool]) -> Self {
        let mut selection = Self::new();
        for (pairing, won) in Pairing::ALL.iter().zip(outcomes) {
            selection.pick(*pairing, Winner::from_first_team_won(*won));
        }
        selection
    }

    /// Parse a line of picks such as `1 2 1` or `l,r,l`
    pub fn from_input(line: &str) -> Self {
        let mut selection = Self::new();
        let picks = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty());
        for (pairing, pick) in Pairing::ALL.iter().zip(picks) {
            if let Some(winner) = Winner::from_input(pick) {
                selection.pick(*pairing, winner);
            }
        }
        selection
    }

    pub fn pick(&mut self, pairing: Pairing, winner: Winner) {
        self.0[pairing.index()] = Some(winner);
    }

    pub fn winner(&self, pairing: Pairing) -> Option<Winner> {
        self.0[pairing.index()]
    }

    pub fn is_complete(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }

    /// Outcome bits in pairing order, or `None` while any pairing is unpicked
    pub fn encode(&self) -> Option<[u8; 3]> {
        match self.0 {
            [Some(a), Some(b), Some(c)] => Some([a.bit(), b.bit(), c.bit()]),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_outcomes() {
        let selection = Selection::from_outcomes([true, false, true]);
        assert_eq!(selection.encode(), Some([1, 0, 1]));
    }

    #[test]
    fn test_partial_selection() {
        let selection = Selection::from_partial(&[true, true]);
        assert!(!selection.is_complete());
        assert_eq!(selection.encode(), None);
        assert_eq!(selection.winner(Pairing::Second), Some(Winner::FirstTeam));
        assert_eq!(selection.winner(Pairing::Third), None);
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(Selection::from_input("1 2 1").encode(), Some([1, 0, 1]));
        assert_eq!(Selection::from_input("l,r,r").encode(), Some([1, 0, 0]));
        assert_eq!(Selection::from_input("Right left LEFT").encode(), Some([0, 1, 1]));

        let partial = Selection::from_input("1 x 2");
        assert_eq!(partial.winner(Pairing::Second), None);
        assert!(!partial.is_complete());

        assert!(!Selection::from_input("").is_complete());
    }
}
