//! Error types for the authorization-scoped resolver.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuthzError>;

/// Errors raised during index and alias resolution.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// Resolution produced no permitted target while the options forbid an
    /// empty result, or the caller referenced a name it cannot see. The
    /// message carries no detail on purpose: callers must not be able to
    /// tell "does not exist" apart from "not authorized".
    #[error("no such index")]
    NoSuchIndex,

    /// A date-math template could not be parsed
    #[error("malformed index expression: {0}")]
    MalformedExpression(String),

    /// A resolution was applied to a request other than the one it was
    /// computed for
    #[error("resolution does not match the shape of the request")]
    ShapeMismatch,

    /// Metadata snapshot errors
    #[error(transparent)]
    Metadata(#[from] strata_core::CoreError),
}
