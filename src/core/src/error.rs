//! Error types for cluster metadata handling.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while building or validating a metadata snapshot.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An index or alias name violates the cluster naming rules
    #[error("invalid name [{name}]: {reason}")]
    InvalidName { name: String, reason: String },

    /// An alias points at an index that is not part of the snapshot
    #[error("alias [{alias}] references unknown index [{index}]")]
    UnknownAliasTarget { alias: String, index: String },

    /// The same name is declared as both an index and an alias
    #[error("name [{0}] is used by both an index and an alias")]
    NameCollision(String),
}

impl CoreError {
    /// Create an invalid-name error
    pub fn invalid_name<N: Into<String>, R: Into<String>>(name: N, reason: R) -> Self {
        CoreError::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown-alias-target error
    pub fn unknown_alias_target<A: Into<String>, I: Into<String>>(alias: A, index: I) -> Self {
        CoreError::UnknownAliasTarget {
            alias: alias.into(),
            index: index.into(),
        }
    }
}
