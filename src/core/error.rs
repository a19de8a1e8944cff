//! Error type for storage operations.
//!
//! Every variant is a precondition violation: the caller asked for something
//! the tree's current state does not allow. Running out of capacity is not
//! an error (flush simply leaves cards in the list), and mismatched memory
//! flips repair themselves.

use thiserror::Error;

use super::entity::{CardId, StorableId};

/// A storage operation was invoked without its precondition holding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// No storable in the tree holds this card.
    #[error("{0} is not stored in this tree")]
    CardNotFound(CardId),

    /// The governing ruleset refuses to release this card right now.
    #[error("{0} cannot be fetched")]
    CannotFetch(CardId),

    /// A slot was asked to store an item but has no card to put it in.
    #[error("{0} has no card to store into")]
    NoCardInSlot(StorableId),

    /// A card entered its layout-area state without a destination provider.
    #[error("{0} reached the layout area without a layout adder")]
    MissingLayoutAdder(CardId),

    /// A definition failed validation.
    #[error("invalid definition: {0}")]
    InvalidDefinition(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            StorageError::CannotFetch(CardId(4)).to_string(),
            "Card(4) cannot be fetched"
        );
        assert_eq!(
            StorageError::InvalidDefinition("empty".into()).to_string(),
            "invalid definition: empty"
        );
    }
}
