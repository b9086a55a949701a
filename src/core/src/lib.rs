//! # Strata Core
//!
//! Shared cluster types for the Strata platform: the immutable cluster
//! metadata snapshot, index name validation, and the clock abstraction the
//! security layer uses when resolving date-math index names.

pub mod clock;
pub mod error;
pub mod metadata;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, Result};
pub use metadata::{ClusterMetadata, IndexState, MetadataBuilder};
