use std::fmt;
use std::str::FromStr;

/// Numeric participant identifier shared by the roster and the round table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub u32);

impl UserId {
    /// Identifier for a roster entry without an explicit id: its 1-based
    /// spreadsheet row, counting the header as row 1
    pub fn from_row(row: usize) -> Self {
        UserId(row as u32)
    }
}

impl FromStr for UserId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.parse::<u32>() {
            Ok(0) => Err("participant id must be positive".to_string()),
            Ok(n) => Ok(UserId(n)),
            Err(_) => Err(format!("participant id '{}' is not a number", s)),
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A player resolved from the roster at login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// 1-based spreadsheet row the player was read from
    pub row: usize,
}

impl User {
    pub fn matches_email(&self, email: &str) -> bool {
        self.email.trim().eq_ignore_ascii_case(email.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_parsing() {
        assert_eq!("7".parse::<UserId>(), Ok(UserId(7)));
        assert_eq!(" 12 ".parse::<UserId>(), Ok(UserId(12)));
        assert!("player1".parse::<UserId>().is_err());
        assert!("0".parse::<UserId>().is_err());
        assert!("".parse::<UserId>().is_err());
    }

    #[test]
    fn test_positional_id() {
        // First data row sits under the header, on spreadsheet row 2
        assert_eq!(UserId::from_row(2), UserId(2));
        assert_eq!(UserId::from_row(5).to_string(), "5");
    }

    #[test]
    fn test_email_match_ignores_case() {
        let user = User {
            id: UserId(2),
            name: "John Doe".to_string(),
            email: "John@Example.com".to_string(),
            row: 2,
        };
        assert!(user.matches_email("john@example.com"));
        assert!(user.matches_email("  JOHN@EXAMPLE.COM "));
        assert!(!user.matches_email("jane@example.com"));
    }
}
