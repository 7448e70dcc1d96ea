//! Anomalies absorbed by the dispatch core.
//!
//! Handlers report what went wrong through [`SyncError`], but the server is
//! authoritative: the dispatch entry point logs every error and leaves the
//! state in its normalized form instead of propagating it.

use world_core::{CollectionError, ObjectId};

/// Classification of an absorbed anomaly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnomalyKind {
    /// An update or removal targeted an identity that is no longer present.
    StaleReference,

    /// A new entity named related entities that could not be resolved, so it
    /// was dropped.
    UnresolvedReference,

    /// An add collided with an existing entity under a different secondary key.
    InconsistentDuplicate,

    /// The payload contradicts itself (e.g. a list stat in a numeric group).
    Malformed,
}

impl AnomalyKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StaleReference => "stale_reference",
            Self::UnresolvedReference => "unresolved_reference",
            Self::InconsistentDuplicate => "inconsistent_duplicate",
            Self::Malformed => "malformed",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("{list} has no entry {id}")]
    StaleReference { list: &'static str, id: String },

    #[error("{what} references unknown object {id}")]
    UnresolvedReference { what: &'static str, id: ObjectId },

    #[error("overlay {id} arrived at hotspot {incoming} but is shown at hotspot {existing}")]
    InconsistentDuplicate {
        id: ObjectId,
        existing: u8,
        incoming: u8,
    },

    #[error("malformed {message} payload: {reason}")]
    Malformed {
        message: &'static str,
        reason: &'static str,
    },

    #[error(transparent)]
    Collection(#[from] CollectionError),
}

impl SyncError {
    pub fn stale(list: &'static str, id: impl ToString) -> Self {
        Self::StaleReference {
            list,
            id: id.to_string(),
        }
    }

    pub fn kind(&self) -> AnomalyKind {
        match self {
            Self::StaleReference { .. } => AnomalyKind::StaleReference,
            Self::UnresolvedReference { .. } => AnomalyKind::UnresolvedReference,
            Self::InconsistentDuplicate { .. } | Self::Collection(_) => {
                AnomalyKind::InconsistentDuplicate
            }
            Self::Malformed { .. } => AnomalyKind::Malformed,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::StaleReference { .. } => "SYNC_STALE_REFERENCE",
            Self::UnresolvedReference { .. } => "SYNC_UNRESOLVED_REFERENCE",
            Self::InconsistentDuplicate { .. } => "SYNC_INCONSISTENT_DUPLICATE",
            Self::Malformed { .. } => "SYNC_MALFORMED",
            Self::Collection(err) => err.error_code(),
        }
    }
}
