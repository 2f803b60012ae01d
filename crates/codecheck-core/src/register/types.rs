//! Register API types and client configuration.

use serde::{Deserialize, Serialize};

/// An issue in the register listing. Only the fields the checks read are modelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterIssue {
    /// Issue number.
    #[serde(default)]
    pub number: u64,

    /// Issue title; a certificate's record carries its id in here.
    #[serde(default)]
    pub title: String,

    /// `open` or `closed`.
    #[serde(default)]
    pub state: String,

    #[serde(default)]
    pub assignees: Vec<Assignee>,

    #[serde(default)]
    pub html_url: Option<String>,
}

impl RegisterIssue {
    pub fn is_closed(&self) -> bool {
        self.state.eq_ignore_ascii_case("closed")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub login: String,
}

/// Why a register lookup could not be completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    Timeout,
    /// Connection failures and non-success statuses.
    Transport(String),
    /// Anything else, e.g. a body that is not an issue list.
    Unexpected(String),
}

/// Result of looking a certificate up in the register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// First issue (in listing order) whose title contains the certificate id.
    Matched(RegisterIssue),
    NotFound,
    CheckUnavailable { reason: UnavailableReason },
}

/// Register client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterConfig {
    /// Issue listing endpoint.
    #[serde(default = "default_register_url")]
    pub url: String,

    /// Optional bearer token (raises the API rate limit).
    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Page size of the single listing request. Issues beyond the first page are not seen.
pub const PER_PAGE: u32 = 100;

fn default_register_url() -> String {
    "https://api.github.com/repos/codecheckers/register/issues".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for RegisterConfig {
    fn default() -> Self {
        Self {
            url: default_register_url(),
            token: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl RegisterConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `CODECHECK_REGISTER_URL` | Issue listing endpoint |
    /// | `CODECHECK_REGISTER_TOKEN` | Bearer token |
    /// | `CODECHECK_REGISTER_TIMEOUT` | Timeout in seconds (default: 10) |
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("CODECHECK_REGISTER_URL")
                .unwrap_or_else(|_| default_register_url()),
            token: std::env::var("CODECHECK_REGISTER_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
            timeout_secs: std::env::var("CODECHECK_REGISTER_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_timeout),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}
