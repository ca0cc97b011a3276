use serde::Deserialize;

/// A registration from the roster sheet (the interest form responses)
#[derive(Debug, Clone, Deserialize)]
pub struct RosterRow {
    #[serde(rename = "Email", alias = "Email Address", alias = "email", default)]
    pub email: Option<String>,
    #[serde(rename = "Name", alias = "name", default)]
    pub name: Option<String>,
    #[serde(rename = "ID", alias = "Id", alias = "id", default)]
    pub id: Option<String>,
}

/// A grouping from the round table. Fields stay textual so one bad cell
/// only rejects its own row.
#[derive(Debug, Clone, Deserialize)]
pub struct RoundRow {
    #[serde(rename = "Round", default)]
    pub round: Option<String>,
    #[serde(rename = "Net Number", alias = "Net", default)]
    pub net: Option<String>,
    #[serde(default)]
    pub id1: Option<String>,
    #[serde(default)]
    pub id2: Option<String>,
    #[serde(default)]
    pub id3: Option<String>,
    #[serde(default)]
    pub id4: Option<String>,
}

impl RoundRow {
    pub fn player_cells(&self) -> [Option<&str>; 4] {
        [
            self.id1.as_deref(),
            self.id2.as_deref(),
            self.id3.as_deref(),
            self.id4.as_deref(),
        ]
    }

    /// Spreadsheet exports pad the table with rows of empty cells
    pub fn is_blank(&self) -> bool {
        let empty = |cell: Option<&str>| cell.map_or(true, |s| s.trim().is_empty());
        empty(self.round.as_deref())
            && empty(self.net.as_deref())
            && self.player_cells().into_iter().all(empty)
    }
}
