pub mod config;
pub mod error;
pub mod model;
pub mod resolver;
pub mod session;
pub mod sheet;
pub mod submission;
pub mod transport;
pub mod view;

pub use error::{Result, TrackerError};
pub use model::*;
pub use session::{reconcile, Session, Snapshot};
pub use submission::{RoundPhase, SubmissionRecord, SubmissionState, SubmissionTracker, SubmitError};
