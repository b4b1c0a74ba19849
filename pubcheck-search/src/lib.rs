//! Repository search client.
//!
//! One blocking request per `(term, repository)` pair against
//! `GET {url}/api/search`. Lookup failures are contained here: an HTTP error
//! status or a transport failure is logged with the repository's name and
//! yields no candidate, so a dead mirror degrades a run instead of aborting
//! it. 404 and an empty result set both mean "no candidate".

use reqwest::StatusCode;
use reqwest::blocking::Client;
use thiserror::Error;
use tracing::{debug, warn};

use pubcheck_types::{Candidate, Repository};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("building http client: {0}")]
    Client(reqwest::Error),

    #[error("repository '{repository}' returned an unexpected status: {status}")]
    Status {
        repository: String,
        status: StatusCode,
    },

    #[error("request to repository '{repository}' failed: {source}")]
    Transport {
        repository: String,
        source: reqwest::Error,
    },

    #[error("repository '{repository}' returned a malformed response: {source}")]
    Decode {
        repository: String,
        source: reqwest::Error,
    },
}

/// Search client backed by a blocking HTTP client with the transport's
/// default timeout. No retry policy: a failed request is final for that
/// lookup within that run.
#[derive(Debug, Clone)]
pub struct HttpSearchClient {
    client: Client,
}

impl HttpSearchClient {
    pub fn new() -> Result<Self, SearchError> {
        let client = Client::builder()
            .user_agent(concat!("pubcheck/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SearchError::Client)?;
        Ok(Self { client })
    }

    /// Search one repository for `term`, returning every candidate it
    /// reports. Failures are logged and collapse to an empty candidate
    /// list; they never propagate.
    pub fn search(&self, term: &str, repository: &Repository) -> Vec<Candidate> {
        match self.lookup(term, repository) {
            Ok(candidates) => {
                debug!(
                    repository = %repository.name,
                    "search for '{}' found {} candidate(s)",
                    term,
                    candidates.len()
                );
                candidates
            }
            Err(err) => {
                warn!(
                    repository = %repository.name,
                    "search for '{}' failed, skipping this repository: {}",
                    term,
                    err
                );
                Vec::new()
            }
        }
    }

    fn lookup(&self, term: &str, repository: &Repository) -> Result<Vec<Candidate>, SearchError> {
        let url = format!("{}/api/search", repository.url.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", term),
                ("search_by", "content"),
                ("exact_match", "true"),
            ])
            .send()
            .map_err(|source| SearchError::Transport {
                repository: repository.name.clone(),
                source,
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(Vec::new()),
            status if status.is_success() => {
                response
                    .json::<Vec<Candidate>>()
                    .map_err(|source| SearchError::Decode {
                        repository: repository.name.clone(),
                        source,
                    })
            }
            status => Err(SearchError::Status {
                repository: repository.name.clone(),
                status,
            }),
        }
    }
}
