//! Where roster and round tables come from: a published spreadsheet or a local CSV file

use crate::error::{Result, TrackerError};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Default bound on a single fetch; a slow sheet abandons the poll cycle
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

lazy_static! {
    static ref SHEETS_KEY: Regex =
        Regex::new(r"^https://docs\.google\.com/spreadsheets/d/([A-Za-z0-9_-]+)").unwrap();
    static ref SHEETS_GID: Regex = Regex::new(r"[#&?]gid=(\d+)").unwrap();
}

/// Location of a CSV table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetLocation {
    Remote(Url),
    File(PathBuf),
}

impl FromStr for SheetLocation {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TrackerError::InvalidLocation("empty location".to_string()));
        }

        if s.starts_with("http://") || s.starts_with("https://") {
            let url = Url::parse(&csv_export_url(s))
                .map_err(|e| TrackerError::InvalidLocation(format!("{}: {}", s, e)))?;
            Ok(SheetLocation::Remote(url))
        } else {
            Ok(SheetLocation::File(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for SheetLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetLocation::Remote(url) => write!(f, "{}", url),
            SheetLocation::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Rewrite a Google Sheets editor/share link into its CSV export link.
///
/// Links that already point at an export or published CSV, and links to
/// anything other than Google Sheets, are returned unchanged.
pub fn csv_export_url(link: &str) -> String {
    if link.contains("/export") || link.contains("/pub") {
        return link.to_string();
    }

    match SHEETS_KEY.captures(link) {
        Some(caps) => {
            let gid = SHEETS_GID
                .captures(link)
                .map(|c| c[1].to_string())
                .unwrap_or_else(|| "0".to_string());
            format!(
                "https://docs.google.com/spreadsheets/d/{}/export?format=csv&gid={}",
                &caps[1], gid
            )
        }
        None => link.to_string(),
    }
}

/// Anything that can hand back the current contents of a CSV table
pub trait TableSource {
    fn fetch(&self) -> Result<String>;
}

impl<T: TableSource + ?Sized> TableSource for &T {
    fn fetch(&self) -> Result<String> {
        (**self).fetch()
    }
}

/// Fetches a table from a [`SheetLocation`]
pub struct SheetSource {
    location: SheetLocation,
    client: reqwest::blocking::Client,
}

impl SheetSource {
    pub fn new(location: SheetLocation) -> Result<Self> {
        Self::with_timeout(location, DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_timeout(location: SheetLocation, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("spikeball-rounds/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                TrackerError::SourceUnavailable(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { location, client })
    }

    pub fn location(&self) -> &SheetLocation {
        &self.location
    }

    fn fetch_remote(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.as_str())
            .header("Accept", "text/csv,text/plain;q=0.9,*/*;q=0.8")
            .send()
            .map_err(|e| TrackerError::SourceUnavailable(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::SourceUnavailable(format!(
                "HTTP error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .text()
            .map_err(|e| TrackerError::SourceUnavailable(format!("Failed to read response: {}", e)))
    }
}

impl TableSource for SheetSource {
    fn fetch(&self) -> Result<String> {
        log::debug!("Fetching table from {}", self.location);
        match &self.location {
            SheetLocation::Remote(url) => self.fetch_remote(url),
            SheetLocation::File(path) => std::fs::read_to_string(path).map_err(|e| {
                TrackerError::SourceUnavailable(format!("{}: {}", path.display(), e))
            }),
        }
    }
}
