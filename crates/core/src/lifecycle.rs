//! Per-lifecycle state machines and review-action resolution.
//!
//! Every entity type follows one of five lifecycle shapes. The transition
//! tables here are the single source of truth for which state changes the
//! API may request; the server enforces them before touching the database.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::state::EntityState;

use EntityState::{Approved, Draft, Generated, Generating, Modified, Pending, Rejected};

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// The state-machine shape an entity type follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// draft -> approved | rejected, both terminal.
    Idea,
    /// draft -> modified -> approved, with approved -> modified (unapprove).
    Structure,
    /// pending -> generating -> generated -> approved, with unapprove and
    /// a generating -> pending reset.
    Generation,
    /// pending -> generated -> approved, with approved -> generated.
    Prompt,
    /// pending -> generating -> generated -> approved | rejected, with
    /// regenerate back to pending and a generating -> pending reset.
    Media,
}

impl Lifecycle {
    /// The state a freshly created entity starts in.
    pub fn initial_state(&self) -> EntityState {
        match self {
            Self::Idea | Self::Structure => Draft,
            Self::Generation | Self::Prompt | Self::Media => Pending,
        }
    }

    /// All states an entity of this lifecycle may legally hold.
    pub fn legal_states(&self) -> &'static [EntityState] {
        match self {
            Self::Idea => &[Draft, Approved, Rejected],
            Self::Structure => &[Draft, Modified, Approved],
            Self::Generation => &[Pending, Generating, Generated, Approved],
            Self::Prompt => &[Pending, Generated, Approved],
            Self::Media => &[Pending, Generating, Generated, Approved, Rejected],
        }
    }

    /// The states reachable in one transition from `from`.
    ///
    /// States absent from the lifecycle (and terminal states) map to the
    /// empty slice.
    pub fn transitions(&self, from: EntityState) -> &'static [EntityState] {
        match self {
            Self::Idea => match from {
                Draft => &[Approved, Rejected],
                _ => &[],
            },
            Self::Structure => match from {
                Draft => &[Modified, Approved],
                Modified => &[Approved],
                Approved => &[Modified],
                _ => &[],
            },
            Self::Generation => match from {
                Pending => &[Generating],
                Generating => &[Generated, Pending],
                Generated => &[Approved],
                Approved => &[Generated],
                _ => &[],
            },
            Self::Prompt => match from {
                Pending => &[Generated],
                Generated => &[Approved],
                Approved => &[Generated],
                _ => &[],
            },
            Self::Media => match from {
                Pending => &[Generating],
                Generating => &[Generated, Pending],
                Generated => &[Approved, Rejected],
                // Regenerate is allowed straight from approved, without an
                // intermediate reject.
                Approved => &[Rejected, Pending],
                Rejected => &[Pending],
                _ => &[],
            },
        }
    }

    /// Whether `from -> to` is a legal transition.
    pub fn can_transition(&self, from: EntityState, to: EntityState) -> bool {
        self.transitions(from).contains(&to)
    }

    /// The state a review action moves an entity into, if this lifecycle
    /// supports the action at all.
    ///
    /// Whether the move is legal *from the current state* is a separate
    /// check ([`Lifecycle::can_transition`]); this only resolves the target.
    pub fn action_target(&self, action: EntityAction) -> Option<EntityState> {
        match action {
            EntityAction::Approve => Some(Approved),
            EntityAction::Reject => match self {
                Self::Idea | Self::Media => Some(Rejected),
                _ => None,
            },
            EntityAction::Unapprove => match self {
                Self::Structure => Some(Modified),
                Self::Generation | Self::Prompt => Some(Generated),
                _ => None,
            },
            EntityAction::Regenerate => match self {
                Self::Media => Some(Pending),
                _ => None,
            },
            EntityAction::Reset => match self {
                Self::Generation | Self::Media => Some(Pending),
                _ => None,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Action name constants as they appear in API paths.
pub const ACTION_APPROVE: &str = "approve";
pub const ACTION_REJECT: &str = "reject";
pub const ACTION_UNAPPROVE: &str = "unapprove";
pub const ACTION_REGENERATE: &str = "regenerate";
pub const ACTION_RESET: &str = "reset";

/// All valid action names.
pub const VALID_ACTIONS: &[&str] = &[
    ACTION_APPROVE,
    ACTION_REJECT,
    ACTION_UNAPPROVE,
    ACTION_REGENERATE,
    ACTION_RESET,
];

/// A review/recovery operation requested against a single entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityAction {
    Approve,
    Reject,
    Unapprove,
    Regenerate,
    Reset,
}

impl EntityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => ACTION_APPROVE,
            Self::Reject => ACTION_REJECT,
            Self::Unapprove => ACTION_UNAPPROVE,
            Self::Regenerate => ACTION_REGENERATE,
            Self::Reset => ACTION_RESET,
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            ACTION_APPROVE => Ok(Self::Approve),
            ACTION_REJECT => Ok(Self::Reject),
            ACTION_UNAPPROVE => Ok(Self::Unapprove),
            ACTION_REGENERATE => Ok(Self::Regenerate),
            ACTION_RESET => Ok(Self::Reset),
            _ => Err(CoreError::Validation(format!(
                "Invalid action '{s}'. Must be one of: {}",
                VALID_ACTIONS.join(", ")
            ))),
        }
    }
}
