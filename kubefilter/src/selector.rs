//! Kubernetes label-selector parsing and matching
//!
//! A [`Selector`] is built once from a list of raw expression strings and
//! then evaluated against the label maps of candidate resources. All
//! validation happens at construction, so a selector that is reused to
//! filter a long list of resources cannot fail mid-iteration.
//!
//! The expression grammar mirrors `kubectl`'s `-l` flag: `key`, `!key`,
//! `key=value`, `key==value`, `key!=value`, `key in (a, b)`, and
//! `key notin (a, b)`. Requirements combine with implicit AND; there is no
//! OR and no grouping.

use std::{collections::BTreeMap, fmt, str::FromStr};

/// An ordered list of [`Requirement`]s, all of which must hold for a
/// resource to match
///
/// A selector with no requirements matches every resource.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selector {
    requirements: Vec<Requirement>,
}

/// A single selector clause: a label key and the operator applied to it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Requirement {
    key: String,
    operator: Operator,
}

/// The operator of a [`Requirement`], carrying its comparison values
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operator {
    /// `key`: the label is present, with any value.
    Exists,

    /// `!key`: the label is absent.
    NotExists,

    /// `key=value` or `key==value`: the label is present with exactly this
    /// value.
    Equal(String),

    /// `key!=value`: the label is absent, or present with a different
    /// value.
    NotEqual(String),

    /// `key in (a, b)`: the label is present and its value is in the set.
    In(Vec<String>),

    /// `key notin (a, b)`: the label is absent, or its value is outside
    /// the set.
    NotIn(Vec<String>),
}

/// Indicates that a selector expression could not be parsed
///
/// Each variant carries the offending expression as it was given.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    /// The expression has no label key.
    #[error("missing label key in {0:?}")]
    EmptyKey(String),

    /// A set expression is missing its `in`/`notin` keyword or its closing
    /// parenthesis.
    #[error("malformed value set in {0:?}")]
    InvalidSet(String),

    /// A set expression lists no values.
    #[error("empty value set in {0:?}")]
    EmptyValues(String),

    /// More than one operator appears in a single expression.
    #[error("conflicting operators in {0:?}")]
    ConflictingOperators(String),
}

// === impl Selector ===

impl Selector {
    /// Parses a selector from raw expression strings
    ///
    /// Fails on the first expression that does not parse; no selector is
    /// produced in that case.
    pub fn new<I>(expressions: I) -> Result<Self, ParseError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let requirements = expressions
            .into_iter()
            .map(|expr| expr.as_ref().parse())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { requirements })
    }

    /// The parsed requirements, in the order their expressions were given
    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Returns true iff every requirement is satisfied by `labels`
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.requirements.iter().all(|r| r.matches(labels))
    }
}

impl FromIterator<Requirement> for Selector {
    fn from_iter<I: IntoIterator<Item = Requirement>>(iter: I) -> Self {
        Self {
            requirements: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut requirements = self.requirements.iter();
        if let Some(r) = requirements.next() {
            write!(f, "{}", r)?;
            for r in requirements {
                write!(f, ",{}", r)?;
            }
        }
        Ok(())
    }
}

// === impl Requirement ===

impl Requirement {
    /// Builds a requirement from its parts
    ///
    /// This is the structured alternative to parsing an expression string,
    /// e.g. when converting from a declarative selector representation. An
    /// [`Operator::In`] with an empty value set matches nothing.
    pub fn new(key: impl Into<String>, operator: Operator) -> Self {
        Self {
            key: key.into(),
            operator,
        }
    }

    /// The label key this requirement applies to
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The operator, with any comparison values
    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    /// Evaluates this requirement against a label map
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        let value = labels.get(&self.key);
        match &self.operator {
            Operator::Exists => value.is_some(),
            Operator::NotExists => value.is_none(),
            Operator::Equal(expected) => value == Some(expected),
            Operator::NotEqual(expected) => value != Some(expected),
            Operator::In(set) => value.is_some_and(|v| set.contains(v)),
            Operator::NotIn(set) => !value.is_some_and(|v| set.contains(v)),
        }
    }
}

impl FromStr for Requirement {
    type Err = ParseError;

    fn from_str(expression: &str) -> Result<Self, ParseError> {
        let expr = expression.trim();

        // Set-based syntax is checked before the equality operators so that
        // the parenthesized value list is never mistaken for a value.
        if let Some(open) = expr.find('(') {
            return parse_set(expression, expr, open);
        }
        if expr.contains(')') {
            return Err(ParseError::InvalidSet(expression.to_string()));
        }

        if let Some((key, value)) = expr.split_once("==") {
            return parse_equality(expression, key, value, true);
        }
        if let Some((key, value)) = expr.split_once("!=") {
            return parse_equality(expression, key, value, false);
        }
        if let Some((key, value)) = expr.split_once('=') {
            return parse_equality(expression, key, value, true);
        }

        if let Some(key) = expr.strip_prefix('!') {
            let key = parse_key(expression, key.trim_start())?;
            return Ok(Self {
                key,
                operator: Operator::NotExists,
            });
        }

        let key = parse_key(expression, expr)?;
        Ok(Self {
            key,
            operator: Operator::Exists,
        })
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.operator {
            Operator::Exists => write!(f, "{}", self.key),
            Operator::NotExists => write!(f, "!{}", self.key),
            Operator::Equal(v) => write!(f, "{}={}", self.key, v),
            Operator::NotEqual(v) => write!(f, "{}!={}", self.key, v),
            Operator::In(set) => write!(f, "{} in ({})", self.key, set.join(",")),
            Operator::NotIn(set) => write!(f, "{} notin ({})", self.key, set.join(",")),
        }
    }
}

// === impl Operator ===

impl Operator {
    /// The comparison values carried by this operator
    ///
    /// Empty for the existence forms, a single value for (in)equality, and
    /// the value set for the set-membership forms.
    pub fn values(&self) -> &[String] {
        match self {
            Self::Exists | Self::NotExists => &[],
            Self::Equal(v) | Self::NotEqual(v) => std::slice::from_ref(v),
            Self::In(set) | Self::NotIn(set) => set,
        }
    }
}

// === parsing ===

fn parse_set(expression: &str, expr: &str, open: usize) -> Result<Requirement, ParseError> {
    let Some(values) = expr[open + 1..].strip_suffix(')') else {
        return Err(ParseError::InvalidSet(expression.to_string()));
    };

    let (key, negated) = match expr[..open]
        .trim_end()
        .rsplit_once(|c: char| c.is_whitespace())
    {
        Some((key, "in")) => (key, false),
        Some((key, "notin")) => (key, true),
        _ => return Err(ParseError::InvalidSet(expression.to_string())),
    };
    let key = parse_key(expression, key.trim())?;

    // Values form an ordered set: order of first occurrence, no duplicates.
    let mut set = Vec::new();
    for value in values.split(',') {
        let value = value.trim();
        if value.is_empty() {
            return Err(ParseError::EmptyValues(expression.to_string()));
        }
        if !set.iter().any(|v| v == value) {
            set.push(value.to_string());
        }
    }

    let operator = if negated {
        Operator::NotIn(set)
    } else {
        Operator::In(set)
    };
    Ok(Requirement::new(key, operator))
}

fn parse_equality(
    expression: &str,
    key: &str,
    value: &str,
    equal: bool,
) -> Result<Requirement, ParseError> {
    let key = parse_key(expression, key.trim())?;
    let value = value.trim();
    if value.contains(['=', '!']) {
        return Err(ParseError::ConflictingOperators(expression.to_string()));
    }

    let operator = if equal {
        Operator::Equal(value.to_string())
    } else {
        Operator::NotEqual(value.to_string())
    };
    Ok(Requirement::new(key, operator))
}

fn parse_key(expression: &str, key: &str) -> Result<String, ParseError> {
    if key.is_empty() {
        return Err(ParseError::EmptyKey(expression.to_string()));
    }
    if key.contains(['=', '!']) {
        return Err(ParseError::ConflictingOperators(expression.to_string()));
    }
    Ok(key.to_string())
}
