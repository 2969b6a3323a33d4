use crate::config::toml_config::TouchpadSection;
use crate::touchpad::model::{Meet, MeetTeam};
use crate::touchpad::{FetchError, FetchResult};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Search filters for `/meets`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetQuery {
    /// Team name fragment; empty matches every meet.
    pub pattern: String,
    pub state: String,
    pub year: i32,
}

pub struct TouchPadClient {
    http: Client,
    base_url: String,
    tries: u32,
    backoff: Duration,
}

impl TouchPadClient {
    /// `tries` counts the first attempt; the wait doubles after each
    /// failure, starting at `backoff`.
    pub fn new(base_url: impl Into<String>, tries: u32, backoff: Duration) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tries: tries.max(1),
            backoff,
        }
    }

    pub fn from_config(section: &TouchpadSection) -> Self {
        Self::new(
            section.base_url.clone(),
            section.retries,
            Duration::from_millis(section.backoff_ms),
        )
    }

    fn url(&self, path: &str) -> FetchResult<Url> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw).map_err(|source| FetchError::InvalidUrl { url: raw, source })
    }

    /// One page of search results. Pages are numbered from 0.
    pub async fn search_meets(&self, query: &MeetQuery, offset: u32) -> FetchResult<Vec<Meet>> {
        let mut url = self.url("/meets")?;
        url.query_pairs_mut()
            .append_pair("offset", &offset.to_string())
            .append_pair("pattern", &query.pattern)
            .append_pair("state", &query.state)
            .append_pair("year", &query.year.to_string());
        let page: Option<Vec<Meet>> = self.get_json(url).await?;
        Ok(page.unwrap_or_default())
    }

    /// Every page for `query`, requesting the next offset until a page comes
    /// back empty.
    pub async fn all_meets(&self, query: &MeetQuery) -> FetchResult<Vec<Meet>> {
        let mut meets = Vec::new();
        let mut offset = 0;
        loop {
            let page = self.search_meets(query, offset).await?;
            if page.is_empty() {
                break;
            }
            meets.extend(page);
            offset += 1;
        }
        tracing::info!("{} meet(s) in {} for {}", meets.len(), query.state, query.year);
        Ok(meets)
    }

    /// Teams entered in a meet; a `null` answer is an empty meet.
    pub async fn meet_teams(&self, meet_id: u64) -> FetchResult<Vec<MeetTeam>> {
        let url = self.url(&format!("/meets/{}/teams", meet_id))?;
        let teams: Option<Vec<MeetTeam>> = self.get_json(url).await?;
        Ok(teams.unwrap_or_default())
    }

    /// GET with retry. Transport errors, 429 and 5xx answers are retried;
    /// other failures are returned at once.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> FetchResult<T> {
        let mut wait = self.backoff;
        let mut last_error = String::new();

        for attempt in 1..=self.tries {
            match self.http.get(url.clone()).send().await {
                Ok(response) if response.status().is_success() => {
                    let body = response.bytes().await?;
                    return serde_json::from_slice(&body).map_err(|source| FetchError::Json {
                        url: url.to_string(),
                        source,
                    });
                }
                Ok(response) if is_retryable(response.status()) => {
                    last_error = format!("status {}", response.status());
                }
                Ok(response) => {
                    return Err(FetchError::Status {
                        url: url.to_string(),
                        status: response.status().as_u16(),
                    });
                }
                Err(e) => last_error = e.to_string(),
            }

            if attempt < self.tries {
                tracing::warn!(
                    "attempt {}/{} for {} failed ({}); retrying in {:?}",
                    attempt,
                    self.tries,
                    url,
                    last_error,
                    wait
                );
                tokio::time::sleep(wait).await;
                wait *= 2;
            }
        }

        Err(FetchError::RetriesExhausted {
            url: url.to_string(),
            attempts: self.tries,
            last_error,
        })
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}
