pub mod outcome;
pub mod round;
pub mod user;

pub use outcome::{Selection, Winner};
pub use round::{Pairing, Round, Team};
pub use user::{User, UserId};
