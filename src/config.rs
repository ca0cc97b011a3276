use crate::error::Result;
use crate::sheet::{SheetLocation, SheetSource};
use crate::transport::{DryRunTransport, FormTransport, ResultTransport};
use clap::Args;
use std::time::Duration;
use url::Url;

/// Where the tournament data lives and how often to look at it
#[derive(Args, Debug, Clone)]
pub struct Config {
    /// Roster sheet: CSV URL, Google Sheets link, or local CSV file
    #[arg(long, env = "SPIKEBALL_ROSTER")]
    pub roster: SheetLocation,

    /// Round table sheet: CSV URL, Google Sheets link, or local CSV file
    #[arg(long, env = "SPIKEBALL_ROUNDS")]
    pub rounds: SheetLocation,

    /// Form endpoint that receives submitted results
    #[arg(long, env = "SPIKEBALL_FORM_URL")]
    pub form_url: Option<Url>,

    /// Link shown to players who are not on the roster yet
    #[arg(long, env = "SPIKEBALL_INTEREST_FORM")]
    pub interest_form: Option<String>,

    /// Seconds between round table polls
    #[arg(long, default_value = "10")]
    pub poll_secs: u64,

    /// Seconds before a fetch or submit is abandoned
    #[arg(long, default_value = "5")]
    pub timeout_secs: u64,

    /// Log results instead of posting them
    #[arg(long)]
    pub dry_run: bool,
}

impl Config {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_secs.max(1))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn roster_source(&self) -> Result<SheetSource> {
        SheetSource::with_timeout(self.roster.clone(), self.timeout())
    }

    pub fn rounds_source(&self) -> Result<SheetSource> {
        SheetSource::with_timeout(self.rounds.clone(), self.timeout())
    }

    /// The form transport, or a dry run when asked for or when no form is configured
    pub fn transport(&self) -> Result<Box<dyn ResultTransport>> {
        match (&self.form_url, self.dry_run) {
            (Some(url), false) => Ok(Box::new(FormTransport::new(url.clone(), self.timeout())?)),
            (None, false) => {
                log::warn!("No form URL configured, results will only be logged");
                Ok(Box::new(DryRunTransport::new()))
            }
            (_, true) => Ok(Box::new(DryRunTransport::new())),
        }
    }
}
