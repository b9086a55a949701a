//! Resolution outcomes and their application to requests.

use std::collections::BTreeSet;

use crate::error::{AuthzError, Result};
use crate::request::ResolvableRequest;

/// Replacement expressions for one request shape.
///
/// A plan mirrors the shape it was computed from; applying it to a request
/// of any other shape is a [`AuthzError::ShapeMismatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RewritePlan {
    Indices(Vec<String>),
    GetAliases {
        indices: Vec<String>,
        aliases: Vec<String>,
    },
    AliasActions(Vec<ActionRewrite>),
    Composite(Vec<RewritePlan>),
    /// The request addresses names verbatim and keeps them.
    Untouched,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ActionRewrite {
    pub(crate) indices: Vec<String>,
    pub(crate) aliases: Vec<String>,
}

/// The outcome of resolving a request: the concrete names the authorization
/// decision covers, plus the rewrite to put the request in terms the rest of
/// the pipeline can trust.
///
/// Computing a resolution never touches the request; [`Resolution::apply_to`]
/// performs the rewrite as a separate, explicit step, so callers can audit or
/// reject before anything is mutated.
#[derive(Debug, Clone)]
pub struct Resolution {
    audit: BTreeSet<String>,
    plan: RewritePlan,
}

impl Resolution {
    pub(crate) fn new(audit: BTreeSet<String>, plan: RewritePlan) -> Self {
        Self { audit, plan }
    }

    /// Every concrete name the request was resolved against.
    pub fn audit_set(&self) -> &BTreeSet<String> {
        &self.audit
    }

    pub fn into_audit_set(self) -> BTreeSet<String> {
        self.audit
    }

    pub(crate) fn into_parts(self) -> (BTreeSet<String>, RewritePlan) {
        (self.audit, self.plan)
    }

    /// Rewrite the request's expressions to the resolved names.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::ShapeMismatch`] when the request is not the
    /// shape this resolution was computed from.
    pub fn apply_to(&self, request: &mut ResolvableRequest) -> Result<()> {
        apply_plan(&self.plan, request)
    }
}

fn apply_plan(plan: &RewritePlan, request: &mut ResolvableRequest) -> Result<()> {
    match (plan, request) {
        (RewritePlan::Indices(names), ResolvableRequest::Indices { indices, .. }) => {
            indices.clone_from(names);
            Ok(())
        }
        (
            RewritePlan::GetAliases { indices, aliases },
            ResolvableRequest::GetAliases {
                indices: request_indices,
                aliases: request_aliases,
                ..
            },
        ) => {
            request_indices.clone_from(indices);
            request_aliases.clone_from(aliases);
            Ok(())
        }
        (RewritePlan::AliasActions(rewrites), ResolvableRequest::AliasActions { actions })
            if rewrites.len() == actions.len() =>
        {
            for (rewrite, action) in rewrites.iter().zip(actions.iter_mut()) {
                action.replace(rewrite.indices.clone(), rewrite.aliases.clone());
            }
            Ok(())
        }
        (RewritePlan::Composite(plans), ResolvableRequest::Composite { requests })
            if plans.len() == requests.len() =>
        {
            for (plan, request) in plans.iter().zip(requests.iter_mut()) {
                apply_plan(plan, request)?;
            }
            Ok(())
        }
        (RewritePlan::Untouched, ResolvableRequest::Fixed { .. }) => Ok(()),
        _ => Err(AuthzError::ShapeMismatch),
    }
}
