//! # Strata Authorization
//!
//! Authorization-scoped index and alias resolution for Strata clusters.
//!
//! ## Features
//!
//! - **Grant-bounded expansion**: `*`, `_all` and exclusions only ever expand
//!   to names the principal holds
//! - **Uniform failures**: missing and forbidden names are indistinguishable,
//!   both fail with "no such index"
//! - **Date-math names** like `<logs-{now/d}>`, evaluated against a pluggable
//!   clock
//! - **Two-phase resolution**: pure computation first, explicit in-place
//!   rewrite second
//! - **Closed request model** covering searches, alias reads, alias
//!   maintenance and composite batches
//!
//! ## Example
//!
//! ```rust
//! use strata_authz::{IndicesResolver, Principal, ResolvableRequest, RoleGrants};
//! use strata_core::{IndexState, MetadataBuilder};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let metadata = MetadataBuilder::default()
//!         .index("logs-2024", IndexState::Open)
//!         .index("logs-2025", IndexState::Open)
//!         .index("billing", IndexState::Open)
//!         .build()?;
//!
//!     let resolver = IndicesResolver::new();
//!     let mut request = ResolvableRequest::search(["logs-*"]);
//!     let audit = resolver.resolve(
//!         &Principal::new("alice"),
//!         &RoleGrants::new(["logs-*"]),
//!         &mut request,
//!         &metadata,
//!     )?;
//!
//!     assert_eq!(request.indices(), ["logs-2024", "logs-2025"]);
//!     assert_eq!(audit.len(), 2);
//!     Ok(())
//! }
//! ```

pub mod authorized;
pub mod datemath;
pub mod error;
pub mod options;
pub mod pattern;
pub mod request;
pub mod resolver;
pub mod types;

// Re-export commonly used types
pub use authorized::{AuthorizedNames, SECURITY_INDEX};
pub use error::{AuthzError, Result};
pub use options::ResolveOptions;
pub use request::{AliasAction, AliasActionKind, ResolvableRequest};
pub use resolver::{IndicesResolver, Resolution, NO_INDEX_PLACEHOLDER};
pub use types::{Principal, RoleGrants};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
