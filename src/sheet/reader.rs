use super::tables::{RosterRow, RoundRow};
use crate::error::{Result, TrackerError};
use crate::model::{Round, User, UserId};
use std::fmt;

/// A round-table row that could not be turned into a [`Round`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// 1-based spreadsheet row
    pub row: usize,
    pub reason: String,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}", self.row, self.reason)
    }
}

impl From<RowError> for TrackerError {
    fn from(e: RowError) -> Self {
        TrackerError::MalformedRow {
            row: e.row,
            reason: e.reason,
        }
    }
}

/// Parsed round table: the valid rounds and the rows that were skipped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundTable {
    pub rounds: Vec<Round>,
    pub rejected: Vec<RowError>,
}

impl RoundTable {
    pub fn from_rounds(rounds: Vec<Round>) -> Self {
        Self {
            rounds,
            rejected: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }
}

/// Maps reader positions to 1-based spreadsheet rows.
///
/// The reader skips empty lines without yielding anything and stamps a record
/// with the offset where it started looking, before those lines. Rows are
/// counted from the byte offset of the first non-terminator byte instead.
struct RowCounter<'a> {
    bytes: &'a [u8],
    offset: usize,
    row: usize,
}

impl<'a> RowCounter<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            bytes: content.as_bytes(),
            offset: 0,
            row: 1,
        }
    }

    fn row_at(&mut self, position: Option<&csv::Position>) -> usize {
        let mut start = position
            .map_or(self.offset, |p| p.byte() as usize)
            .min(self.bytes.len());
        while start < self.bytes.len() && matches!(self.bytes[start], b'\r' | b'\n') {
            start += 1;
        }

        if start > self.offset {
            self.row += self.bytes[self.offset..start]
                .iter()
                .filter(|&&b| b == b'\n')
                .count();
            self.offset = start;
        }
        self.row
    }
}

fn csv_reader(content: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes())
}

fn non_empty(cell: Option<&str>) -> Option<&str> {
    cell.map(str::trim).filter(|s| !s.is_empty())
}

/// Read every usable roster entry
pub fn read_roster(content: &str) -> Result<Vec<User>> {
    let mut reader = csv_reader(content);
    let headers = reader.headers()?.clone();
    let mut rows = RowCounter::new(content);
    let mut users = Vec::new();

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Roster row {}: {}", rows.row_at(e.position()), e);
                continue;
            }
        };
        let row = rows.row_at(record.position());

        let parsed = match record.deserialize::<RosterRow>(Some(&headers)) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::warn!("Roster row {}: {}", row, e);
                continue;
            }
        };

        match roster_row_to_user(row, parsed) {
            Ok(Some(user)) => users.push(user),
            Ok(None) => {}
            Err(e) => log::warn!("Roster {}", e),
        }
    }

    Ok(users)
}

fn roster_row_to_user(
    row: usize,
    record: RosterRow,
) -> std::result::Result<Option<User>, RowError> {
    let email = match non_empty(record.email.as_deref()) {
        Some(email) => email.to_string(),
        None => return Ok(None),
    };

    let id = match non_empty(record.id.as_deref()) {
        Some(id) => id.parse::<UserId>().map_err(|reason| RowError { row, reason })?,
        None => UserId::from_row(row),
    };

    let name = non_empty(record.name.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| email.clone());

    Ok(Some(User {
        id,
        name,
        email,
        row,
    }))
}

/// Look up a player by email with a linear scan of the roster
pub fn find_user(content: &str, email: &str) -> Result<User> {
    read_roster(content)?
        .into_iter()
        .find(|user| user.matches_email(email))
        .ok_or_else(|| TrackerError::LookupFailure(email.trim().to_string()))
}

/// Read the round table, rejecting malformed rows individually
pub fn read_rounds(content: &str) -> Result<RoundTable> {
    let mut reader = csv_reader(content);
    // A missing or unreadable header is a problem with the whole sheet
    let headers = reader.headers()?.clone();
    let mut rows = RowCounter::new(content);
    let mut table = RoundTable::default();

    for result in reader.records() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                table.rejected.push(RowError {
                    row: rows.row_at(e.position()),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        let row = rows.row_at(raw.position());

        let record = match raw.deserialize::<RoundRow>(Some(&headers)) {
            Ok(record) => record,
            Err(e) => {
                table.rejected.push(RowError {
                    row,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if record.is_blank() {
            continue;
        }

        match round_row_to_round(row, &record) {
            Ok(round) => table.rounds.push(round),
            Err(e) => table.rejected.push(e),
        }
    }

    for e in &table.rejected {
        log::warn!("Skipping round table {}", e);
    }
    log::debug!(
        "Read {} rounds ({} rows skipped)",
        table.rounds.len(),
        table.rejected.len()
    );

    Ok(table)
}

fn parse_positive(
    row: usize,
    column: &str,
    cell: Option<&str>,
) -> std::result::Result<u32, RowError> {
    let value = non_empty(cell).ok_or_else(|| RowError {
        row,
        reason: format!("missing {}", column),
    })?;
    match value.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(RowError {
            row,
            reason: format!("{} '{}' is not a positive integer", column, value),
        }),
    }
}

fn round_row_to_round(row: usize, record: &RoundRow) -> std::result::Result<Round, RowError> {
    let number = parse_positive(row, "Round", record.round.as_deref())?;
    let net = parse_positive(row, "Net Number", record.net.as_deref())?;

    let mut players = [UserId(0); 4];
    for (slot, cell) in record.player_cells().iter().enumerate() {
        let value = non_empty(*cell).ok_or_else(|| RowError {
            row,
            reason: format!("missing id{}", slot + 1),
        })?;
        players[slot] = value.parse().map_err(|reason| RowError { row, reason })?;
    }

    Ok(Round::new(number, net, players))
}
