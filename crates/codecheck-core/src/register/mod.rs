//! Cross-checking a certificate against the CODECHECK register.
//!
//! The register is an issue tracker; a certificate is expected to have an issue whose
//! title contains its id. The lookup is best effort: failures surface as
//! [`RegisterOutcome::CheckUnavailable`] and the validator decides what that means.

use tracing::warn;

use crate::error::RegisterError;

mod client;
mod types;

pub use client::{RegisterClient, REGISTER_USER_AGENT};
pub use types::{
    Assignee, RegisterConfig, RegisterIssue, RegisterOutcome, UnavailableReason, PER_PAGE,
};

/// Where register issues are opened by hand.
pub const REGISTER_ISSUES_URL: &str = "https://github.com/codecheckers/register/issues";

/// Seam between the validator and the network.
pub trait RegisterLookup {
    fn search(&self, certificate: &str) -> RegisterOutcome;
}

/// A client that could not be built still answers, with the failure as an unexpected outcome.
impl<L: RegisterLookup> RegisterLookup for Result<L, RegisterError> {
    fn search(&self, certificate: &str) -> RegisterOutcome {
        match self {
            Ok(lookup) => lookup.search(certificate),
            Err(err) => {
                warn!(certificate, error = %err, "register client unavailable");
                RegisterOutcome::CheckUnavailable {
                    reason: UnavailableReason::Unexpected(err.to_string()),
                }
            }
        }
    }
}

/// First issue, in listing order, whose title contains `certificate` as a plain substring.
///
/// Not anchored: `2023-001` also matches a title containing `2023-0010`.
pub fn find_first_match<'a>(
    issues: &'a [RegisterIssue],
    certificate: &str,
) -> Option<&'a RegisterIssue> {
    issues.iter().find(|issue| issue.title.contains(certificate))
}
