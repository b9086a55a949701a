//! Authorization-scoped resolution of index and alias expressions.
//!
//! The resolver rewrites the index and alias expressions of an incoming
//! request against the set of names its principal is authorized for, never
//! against raw cluster metadata. Wildcards can therefore only expand to
//! granted names, and a request for something that exists but was not
//! granted fails exactly like a request for something that does not exist,
//! so a caller cannot probe for the presence of foreign indices.

mod plan;

pub use plan::Resolution;

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, trace, warn};

use strata_core::{Clock, ClusterMetadata, SystemClock};

use self::plan::{ActionRewrite, RewritePlan};
use crate::authorized::AuthorizedNames;
use crate::datemath;
use crate::error::{AuthzError, Result};
use crate::options::ResolveOptions;
use crate::pattern::{self, Sign};
use crate::request::{AliasAction, ResolvableRequest};
use crate::types::{Principal, RoleGrants};

/// Replacement expression used when a request legitimately targets nothing.
///
/// `*` may never appear in a real index name, so "everything minus every
/// name" is an expression no index can match. Rewriting to this instead of
/// an empty list matters: an empty expression list means "all indices",
/// which is the opposite of what was resolved.
pub const NO_INDEX_PLACEHOLDER: &str = "-*";

/// Stateless resolver turning request expressions into authorized concrete
/// names.
///
/// The only state is a [`Clock`] for date-math evaluation; metadata, grants
/// and the request all arrive per call, so a single instance serves any
/// number of concurrent callers.
#[derive(Clone)]
pub struct IndicesResolver {
    clock: Arc<dyn Clock>,
}

impl IndicesResolver {
    /// A resolver evaluating date math against the system clock.
    pub fn new() -> Self {
        Self {
            clock: Arc::new(SystemClock),
        }
    }

    /// A resolver with an explicit clock, for deterministic date math.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Resolve a request's expressions and rewrite them in place.
    ///
    /// Returns the audit set: every concrete name the request was resolved
    /// against, across all sub-requests and alias actions.
    ///
    /// # Errors
    ///
    /// [`AuthzError::NoSuchIndex`] when an expression names something
    /// unavailable and the request's options forbid dropping it, and
    /// [`AuthzError::MalformedExpression`] for unparseable date math. Either
    /// failure leaves the request untouched.
    pub fn resolve(
        &self,
        principal: &Principal,
        grants: &RoleGrants,
        request: &mut ResolvableRequest,
        metadata: &ClusterMetadata,
    ) -> Result<BTreeSet<String>> {
        let resolution = self.compute(principal, grants, request, metadata)?;
        resolution.apply_to(request)?;
        Ok(resolution.into_audit_set())
    }

    /// Resolve without mutating the request.
    ///
    /// The returned [`Resolution`] carries the audit set and the planned
    /// rewrite; callers decide if and when to apply it.
    pub fn compute(
        &self,
        principal: &Principal,
        grants: &RoleGrants,
        request: &ResolvableRequest,
        metadata: &ClusterMetadata,
    ) -> Result<Resolution> {
        debug!("Resolving request targets for principal={}", principal.name());
        let authorized = AuthorizedNames::compute(principal, grants, metadata);
        compute_plan(request, &authorized, metadata, self.clock.now())
    }
}

impl Default for IndicesResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn compute_plan(
    request: &ResolvableRequest,
    authorized: &AuthorizedNames,
    metadata: &ClusterMetadata,
    now: DateTime<Utc>,
) -> Result<Resolution> {
    match request {
        ResolvableRequest::Indices { indices, options } => {
            let resolved = resolve_expressions(indices, *options, authorized, metadata, now)?;
            let audit = resolved.names.iter().cloned().collect();
            Ok(Resolution::new(audit, RewritePlan::Indices(resolved.names)))
        }
        ResolvableRequest::GetAliases {
            indices,
            aliases,
            options,
        } => {
            let resolved = resolve_expressions(indices, *options, authorized, metadata, now)?;
            if resolved.replaced_with_placeholder {
                // Nothing visible on the index side. The alias side stays
                // untouched and out of the audit set, so the request as a
                // whole remains unauthorizable. A verbatim "-*" kept as
                // literal text does not take this path.
                let audit = resolved.names.iter().cloned().collect();
                let plan = RewritePlan::GetAliases {
                    indices: resolved.names,
                    aliases: aliases.clone(),
                };
                return Ok(Resolution::new(audit, plan));
            }
            let resolved_aliases =
                resolve_alias_expressions(aliases, &authorized.aliases(metadata))?;
            let mut audit: BTreeSet<String> = resolved.names.iter().cloned().collect();
            audit.extend(resolved_aliases.iter().cloned());
            let plan = RewritePlan::GetAliases {
                indices: resolved.names,
                aliases: resolved_aliases,
            };
            Ok(Resolution::new(audit, plan))
        }
        ResolvableRequest::AliasActions { actions } => {
            let mut audit = BTreeSet::new();
            let mut rewrites = Vec::with_capacity(actions.len());
            for action in actions {
                let rewrite = resolve_alias_action(action, authorized, metadata, now)?;
                audit.extend(rewrite.indices.iter().cloned());
                audit.extend(rewrite.aliases.iter().cloned());
                rewrites.push(rewrite);
            }
            Ok(Resolution::new(audit, RewritePlan::AliasActions(rewrites)))
        }
        ResolvableRequest::Composite { requests } => {
            let mut audit = BTreeSet::new();
            let mut plans = Vec::with_capacity(requests.len());
            for sub_request in requests {
                let (sub_audit, sub_plan) =
                    compute_plan(sub_request, authorized, metadata, now)?.into_parts();
                audit.extend(sub_audit);
                plans.push(sub_plan);
            }
            Ok(Resolution::new(audit, RewritePlan::Composite(plans)))
        }
        ResolvableRequest::Fixed { indices } => {
            // Per-item shapes address names verbatim and are never
            // rewritten; date math is still evaluated so the audit set
            // holds the concrete names the decision covers.
            let mut audit = BTreeSet::new();
            for name in indices {
                if datemath::is_date_math(name) {
                    audit.insert(datemath::resolve(name, now)?);
                } else {
                    audit.insert(name.clone());
                }
            }
            Ok(Resolution::new(audit, RewritePlan::Untouched))
        }
    }
}

fn resolve_alias_action(
    action: &AliasAction,
    authorized: &AuthorizedNames,
    metadata: &ClusterMetadata,
    now: DateTime<Utc>,
) -> Result<ActionRewrite> {
    let indices = resolve_expressions(
        action.indices(),
        action.options(),
        authorized,
        metadata,
        now,
    )?
    .names;
    // An add names the alias it is about to create, so only removes expand
    // alias wildcards.
    let aliases = if action.expands_alias_wildcards() {
        resolve_alias_expressions(action.aliases(), &authorized.aliases(metadata))?
    } else {
        action.aliases().to_vec()
    };
    Ok(ActionRewrite { indices, aliases })
}

/// Outcome of resolving one replaceable expression list.
///
/// `replaced_with_placeholder` records that an allowed empty expansion was
/// substituted with [`NO_INDEX_PLACEHOLDER`]; a resolved list merely
/// containing the same text verbatim does not set it.
struct ResolvedExpressions {
    names: Vec<String>,
    replaced_with_placeholder: bool,
}

/// Replace an index expression list with concrete authorized names.
///
/// Expressions are walked left to right into an ordered accumulator:
/// wildcards and `_all` expand to authorized names passing the visibility
/// rules, `-` tokens subtract, plain names pass through verbatim. Expanded
/// names are deduplicated but the list is never sorted, so explicit
/// ordering survives.
fn resolve_expressions(
    expressions: &[String],
    options: ResolveOptions,
    authorized: &AuthorizedNames,
    metadata: &ClusterMetadata,
    now: DateTime<Utc>,
) -> Result<ResolvedExpressions> {
    let replace_wildcards = options.wildcard_expansion();
    let mut resolved: Vec<String> = Vec::new();

    if pattern::is_all(expressions) {
        if replace_wildcards {
            extend_with_visible(&mut resolved, authorized, options, metadata);
        }
        // Without expansion an all-request keeps targeting nothing concrete
        // and falls through to the empty-result policy below.
    } else {
        for (position, expression) in expressions.iter().enumerate() {
            let (sign, body) = pattern::split_sign(expression);
            if position == 0 && sign == Sign::Exclude {
                // A leading exclusion subtracts from everything visible.
                extend_with_visible(&mut resolved, authorized, options, metadata);
            }

            if datemath::is_date_math(body) {
                let concrete = datemath::resolve(body, now)?;
                if authorized.contains(&concrete) && metadata.contains(&concrete) {
                    apply_sign(&mut resolved, sign, &concrete);
                } else if options.ignore_unavailable {
                    trace!("Dropping unavailable date-math target {}", concrete);
                } else {
                    warn!("Date-math expression {} names an unavailable index", expression);
                    return Err(AuthzError::NoSuchIndex);
                }
                continue;
            }

            if replace_wildcards && pattern::is_wildcard(body) {
                for name in authorized.iter() {
                    if pattern::matches(body, name) && is_visible(name, options, metadata) {
                        apply_sign(&mut resolved, sign, name);
                    }
                }
                continue;
            }

            // Plain names, and wildcards left unexpanded, pass through as
            // given; their availability is judged below or downstream.
            apply_sign(&mut resolved, sign, body);
        }
    }

    if options.ignore_unavailable {
        resolved.retain(|name| authorized.contains(name) && metadata.contains(name));
    }

    if resolved.is_empty() {
        if options.allow_no_indices {
            trace!("Expressions {:?} resolved to no names", expressions);
            return Ok(ResolvedExpressions {
                names: vec![NO_INDEX_PLACEHOLDER.to_string()],
                replaced_with_placeholder: true,
            });
        }
        warn!("Expressions {:?} resolved to no authorized names", expressions);
        return Err(AuthzError::NoSuchIndex);
    }
    Ok(ResolvedExpressions {
        names: resolved,
        replaced_with_placeholder: false,
    })
}

/// Replace an alias expression list against the principal's authorized
/// aliases.
///
/// Alias expressions carry no sign tokens and ignore expansion options:
/// `_all` and wildcards expand wherever they appear in the list, literals
/// pass through verbatim, and expansions do not deduplicate. A list that
/// ends up empty is an error regardless of options, because an alias
/// request must name something to act on.
fn resolve_alias_expressions(
    expressions: &[String],
    authorized_aliases: &[&str],
) -> Result<Vec<String>> {
    let mut resolved: Vec<String> = Vec::new();
    if expressions.is_empty() {
        resolved.extend(authorized_aliases.iter().map(|alias| (*alias).to_string()));
    } else {
        for expression in expressions {
            if expression == pattern::ALL_PATTERN {
                resolved.extend(authorized_aliases.iter().map(|alias| (*alias).to_string()));
            } else if pattern::is_wildcard(expression) {
                for alias in authorized_aliases {
                    if pattern::matches(expression, alias) {
                        resolved.push((*alias).to_string());
                    }
                }
            } else {
                resolved.push(expression.clone());
            }
        }
    }

    if resolved.is_empty() {
        warn!("Alias expressions {:?} match no authorized alias", expressions);
        return Err(AuthzError::NoSuchIndex);
    }
    Ok(resolved)
}

/// Whether wildcard expansion may produce this name. Aliases are always
/// visible; indices follow the expand flags; names absent from metadata
/// never expand.
fn is_visible(name: &str, options: ResolveOptions, metadata: &ClusterMetadata) -> bool {
    if metadata.is_alias(name) {
        return true;
    }
    match metadata.index_state(name) {
        Some(state) => options.expands_state(state),
        None => false,
    }
}

fn extend_with_visible(
    resolved: &mut Vec<String>,
    authorized: &AuthorizedNames,
    options: ResolveOptions,
    metadata: &ClusterMetadata,
) {
    for name in authorized.iter() {
        if is_visible(name, options, metadata) {
            apply_sign(resolved, Sign::Include, name);
        }
    }
}

fn apply_sign(resolved: &mut Vec<String>, sign: Sign, name: &str) {
    match sign {
        Sign::Include => {
            if !resolved.iter().any(|existing| existing == name) {
                resolved.push(name.to_string());
            }
        }
        Sign::Exclude => resolved.retain(|existing| existing != name),
    }
}
