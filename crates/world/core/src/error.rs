//! Collection errors.
//!
//! Collections only fail on identity conflicts; every other mutation is total.

/// Errors raised by identity-indexed collections.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CollectionError {
    /// An add targeted an identity that is already present and the collection
    /// rejects duplicates.
    #[error("{list} already contains identity {id}")]
    DuplicateId {
        /// Name of the collection that rejected the entity.
        list: &'static str,
        /// Conflicting identity, rendered for diagnostics.
        id: String,
    },
}

impl CollectionError {
    pub fn error_code(&self) -> &'static str {
        match self {
            CollectionError::DuplicateId { .. } => "COLLECTION_DUPLICATE_ID",
        }
    }
}
