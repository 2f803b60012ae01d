//! Blocking HTTP client for the register listing.
//!
//! One GET, one page, no retry. Status handling lives here; callers only see
//! [`RegisterOutcome`] or [`RegisterError`].

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use tracing::{debug, warn};

use super::types::{RegisterConfig, RegisterIssue, RegisterOutcome, UnavailableReason, PER_PAGE};
use super::{find_first_match, RegisterLookup};
use crate::error::{RegisterError, RegisterResult};

pub const REGISTER_USER_AGENT: &str = concat!("codecheck-core/", env!("CARGO_PKG_VERSION"));

/// Register client. Construct, use and drop it outside of an async runtime.
#[derive(Debug, Clone)]
pub struct RegisterClient {
    client: Client,
    config: RegisterConfig,
}

impl RegisterClient {
    pub fn new(config: RegisterConfig) -> RegisterResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(REGISTER_USER_AGENT));
        default_headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|e| RegisterError::Config {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> RegisterResult<Self> {
        Self::new(RegisterConfig::from_env())
    }

    pub fn config(&self) -> &RegisterConfig {
        &self.config
    }

    /// Fetch the first page of issues, open and closed, in API order.
    pub fn list_issues(&self) -> RegisterResult<Vec<RegisterIssue>> {
        debug!(url = %self.config.url, per_page = PER_PAGE, "listing register issues");

        let per_page = PER_PAGE.to_string();
        let mut request = self
            .client
            .get(&self.config.url)
            .query(&[("state", "all"), ("per_page", per_page.as_str())]);
        if let Some(token) = &self.config.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request.send().map_err(|e| self.map_transport(e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(RegisterError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(|e| self.map_transport(e))?;
        serde_json::from_str(&body).map_err(|e| RegisterError::InvalidResponse {
            message: format!("failed to parse issue listing: {}", e),
        })
    }

    fn map_transport(&self, err: reqwest::Error) -> RegisterError {
        if err.is_timeout() {
            RegisterError::Timeout {
                timeout_secs: self.config.timeout_secs,
            }
        } else {
            RegisterError::Network {
                message: err.to_string(),
            }
        }
    }
}

impl RegisterLookup for RegisterClient {
    fn search(&self, certificate: &str) -> RegisterOutcome {
        match self.list_issues() {
            Ok(issues) => match find_first_match(&issues, certificate) {
                Some(issue) => RegisterOutcome::Matched(issue.clone()),
                None => RegisterOutcome::NotFound,
            },
            Err(err) => {
                warn!(certificate, error = %err, "register check unavailable");
                let reason = if err.is_timeout() {
                    UnavailableReason::Timeout
                } else if err.is_transport() {
                    UnavailableReason::Transport(err.to_string())
                } else {
                    UnavailableReason::Unexpected(err.to_string())
                };
                RegisterOutcome::CheckUnavailable { reason }
            }
        }
    }
}
