//! Vote identifiers: the voter token and the candidate id.
//!
//! Both are opaque strings to the ledger. Their legitimacy (was this token
//! ever issued, is this candidate on the ballot) is decided elsewhere.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::BallotError;

/// An opaque credential granting the right to cast exactly one vote.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VoterToken(String);

impl VoterToken {
    pub fn new(raw: impl Into<String>) -> Result<Self, BallotError> {
        let s = raw.into();
        if s.is_empty() {
            return Err(BallotError::EmptyToken);
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// ASCII-lowercased copy, for case-insensitive deployments.
    pub fn to_ascii_lowercase(&self) -> Self {
        Self(self.0.to_ascii_lowercase())
    }

    /// A prefix safe to put in logs.
    pub fn redacted(&self) -> String {
        let prefix: String = self.0.chars().take(4).collect();
        if prefix.len() == self.0.len() {
            return "****".to_string();
        }
        format!("{prefix}...")
    }
}

// Tokens are credentials; never print them whole by accident.
impl fmt::Debug for VoterToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VoterToken({})", self.redacted())
    }
}

impl fmt::Display for VoterToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

/// Identifier of the candidate a vote is cast for.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandidateId(String);

impl CandidateId {
    pub fn new(raw: impl Into<String>) -> Result<Self, BallotError> {
        let s = raw.into();
        if s.is_empty() {
            return Err(BallotError::EmptyCandidate);
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_rejected() {
        assert_eq!(VoterToken::new(""), Err(BallotError::EmptyToken));
    }

    #[test]
    fn empty_candidate_rejected() {
        assert_eq!(CandidateId::new(""), Err(BallotError::EmptyCandidate));
    }

    #[test]
    fn token_display_is_redacted() {
        let token = VoterToken::new("a1b2c3d4e5f6").unwrap();
        assert_eq!(token.to_string(), "a1b2...");
        assert_eq!(format!("{token:?}"), "VoterToken(a1b2...)");
    }

    #[test]
    fn short_token_fully_masked() {
        let token = VoterToken::new("abc").unwrap();
        assert_eq!(token.to_string(), "****");
    }

    #[test]
    fn lowercase_normalizes_ascii_only() {
        let token = VoterToken::new("AbC-Ü").unwrap();
        assert_eq!(token.to_ascii_lowercase().as_str(), "abc-Ü");
    }
}
