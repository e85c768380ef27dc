//! Filters whole Kubernetes object definitions by their metadata labels
//!
//! [`LabelFilter`] wraps a [`Selector`] so that callers holding parsed
//! object documents do not have to extract label maps themselves: the
//! filter reads `metadata.labels` out of each definition and evaluates the
//! selector against it.

use crate::selector::{ParseError, Selector};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::trace;

/// Evaluates a label selector against Kubernetes object definitions
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelFilter {
    selector: Selector,
}

/// Indicates that a definition's `metadata.labels` field is not a map of
/// string values
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
#[error("metadata.labels must be a map of string values")]
pub struct InvalidLabels;

// === impl LabelFilter ===

impl LabelFilter {
    /// Builds a filter from raw selector expression strings
    pub fn new<I>(expressions: I) -> Result<Self, ParseError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Selector::new(expressions).map(Self::from)
    }

    /// The underlying selector
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Evaluates the selector against a definition's `metadata.labels`
    ///
    /// A definition without a `metadata.labels` field never matches. A
    /// `metadata.labels` field that is not a map of string values is an
    /// error, distinct from a non-match, so that callers can surface the
    /// malformed document instead of silently dropping it.
    pub fn matches(&self, definition: &Value) -> Result<bool, InvalidLabels> {
        let Some(labels) = definition.pointer("/metadata/labels") else {
            trace!(selector = %self.selector, "definition has no labels");
            return Ok(false);
        };
        let labels = label_map(labels).ok_or(InvalidLabels)?;

        let matched = self.selector.matches(&labels);
        trace!(selector = %self.selector, matched, "evaluated label selector");
        Ok(matched)
    }
}

impl From<Selector> for LabelFilter {
    fn from(selector: Selector) -> Self {
        Self { selector }
    }
}

fn label_map(labels: &Value) -> Option<BTreeMap<String, String>> {
    labels
        .as_object()?
        .iter()
        .map(|(k, v)| Some((k.clone(), v.as_str()?.to_string())))
        .collect()
}
