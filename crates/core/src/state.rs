//! Entity state enumeration shared by every pipeline artifact type.
//!
//! Each entity type only uses a subset of these states; the legal subset and
//! the transitions between them are defined per lifecycle in
//! [`crate::lifecycle`].

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Artifact exists but has not been reviewed.
pub const STATE_DRAFT: &str = "draft";
/// Artifact was edited (or un-approved) after its draft was produced.
pub const STATE_MODIFIED: &str = "modified";
/// Artifact passed review.
pub const STATE_APPROVED: &str = "approved";
/// Artifact failed review.
pub const STATE_REJECTED: &str = "rejected";
/// Generation has been requested but has not started.
pub const STATE_PENDING: &str = "pending";
/// A generation job is in flight.
pub const STATE_GENERATING: &str = "generating";
/// Generation finished; for media types this means "awaiting review",
/// not "finished".
pub const STATE_GENERATED: &str = "generated";

/// All valid state strings, in lifecycle order.
pub const VALID_STATES: &[&str] = &[
    STATE_DRAFT,
    STATE_MODIFIED,
    STATE_APPROVED,
    STATE_REJECTED,
    STATE_PENDING,
    STATE_GENERATING,
    STATE_GENERATED,
];

/// The state of a single pipeline entity. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityState {
    Draft,
    Modified,
    Approved,
    Rejected,
    Pending,
    Generating,
    Generated,
}

impl EntityState {
    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => STATE_DRAFT,
            Self::Modified => STATE_MODIFIED,
            Self::Approved => STATE_APPROVED,
            Self::Rejected => STATE_REJECTED,
            Self::Pending => STATE_PENDING,
            Self::Generating => STATE_GENERATING,
            Self::Generated => STATE_GENERATED,
        }
    }

    /// Parse a database string value.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            STATE_DRAFT => Ok(Self::Draft),
            STATE_MODIFIED => Ok(Self::Modified),
            STATE_APPROVED => Ok(Self::Approved),
            STATE_REJECTED => Ok(Self::Rejected),
            STATE_PENDING => Ok(Self::Pending),
            STATE_GENERATING => Ok(Self::Generating),
            STATE_GENERATED => Ok(Self::Generated),
            _ => Err(CoreError::Validation(format!(
                "Invalid state '{s}'. Must be one of: {}",
                VALID_STATES.join(", ")
            ))),
        }
    }
}

impl std::fmt::Display for EntityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_valid_state() {
        for s in VALID_STATES {
            let parsed = EntityState::parse(s).unwrap();
            assert_eq!(parsed.as_str(), *s);
        }
    }

    #[test]
    fn unknown_state_rejected() {
        let result = EntityState::parse("finished");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid state"));
    }

    #[test]
    fn serde_uses_snake_case_strings() {
        let json = serde_json::to_string(&EntityState::Generating).unwrap();
        assert_eq!(json, "\"generating\"");
        let back: EntityState = serde_json::from_str("\"draft\"").unwrap();
        assert_eq!(back, EntityState::Draft);
    }
}
