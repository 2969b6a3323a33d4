//! Client for the TouchPad Live results site, used to list the meets a team
//! swam in. Shares nothing with the SDIF converter.

pub mod client;
pub mod finder;
pub mod model;

pub use client::{MeetQuery, TouchPadClient};
pub use finder::{infer_team_id, meets_file_name, MeetFinder};
pub use model::{Meet, MeetTeam};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("Unexpected JSON from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Gave up on {url} after {attempts} attempt(s): {last_error}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last_error: String,
    },

    #[error("No team id found for '{pattern}'; pass the id with --team-ids")]
    NoTeamId { pattern: String },
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;
