pub mod reader;
pub mod source;
pub mod tables;

pub use reader::{find_user, read_roster, read_rounds, RoundTable, RowError};
pub use source::{SheetLocation, SheetSource, TableSource};
