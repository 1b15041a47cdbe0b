//! Error taxonomy for social graph operations.
//!
//! Follow/like style no-ops are not errors: they are reported through the
//! boolean or outcome-enum return values of the action ledger.

use uuid::Uuid;

/// Errors surfaced by the social graph engine
#[derive(Debug, thiserror::Error)]
pub enum SocialError {
    /// A referenced node id does not resolve
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: Uuid },

    /// Rejected before any query is issued
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The acting user does not own the entity
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Uniqueness violation (e.g. email already registered)
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// The graph store failed; never retried here
    #[error("graph store unavailable: {0:#}")]
    StoreUnavailable(#[from] anyhow::Error),
}

impl SocialError {
    pub fn user_not_found(id: Uuid) -> Self {
        Self::NotFound { kind: "User", id }
    }

    pub fn post_not_found(id: Uuid) -> Self {
        Self::NotFound { kind: "Post", id }
    }

    pub fn comment_not_found(id: Uuid) -> Self {
        Self::NotFound { kind: "Comment", id }
    }
}

pub type Result<T, E = SocialError> = std::result::Result<T, E>;
