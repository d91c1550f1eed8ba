//! Error types for bdaycal.

use reqwest::StatusCode;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur in bdaycal operations.
///
/// The listing, download and transport variants abort a run. The others are
/// raised for a single contact or event and turned into reports by the
/// sync pipeline.
#[derive(Error, Debug)]
pub enum BdayError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Failed to list files at {url}: {status}")]
    ListStatus { url: String, status: StatusCode },

    #[error("Failed to download {url}: {status}")]
    Download { url: String, status: StatusCode },

    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid multistatus response from {url}: {reason}")]
    Multistatus { url: String, reason: String },

    #[error("Request to {url} was rejected: {status}\n{body}")]
    Rejected {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("Could not parse date {0}")]
    InvalidBirthday(String),

    #[error("Contact has no UID")]
    MissingUid,

    #[error("Invalid contact UID '{0}'")]
    InvalidUid(String),

    #[error("UID {uid} cannot be offset by year {year}")]
    UidOverflow { uid: String, year: i32 },

    #[error("Malformed vCard: {0}")]
    MalformedCard(String),
}

/// Result type alias for bdaycal operations.
pub type BdayResult<T> = Result<T, BdayError>;
