//! Validation engine.
//!
//! Rules are evaluated in declaration order and never short-circuit: every failing
//! rule contributes its [`ErrorCode`] to the resulting [`ErrorSet`]. An empty value
//! is only ever the concern of [`Rule::Required`]; length and pattern rules skip it.
//!
//! The email cross-check is a pure function over two [`FieldSnapshot`]s instead of a
//! closure that captures sibling fields.

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::errors::Result;
use crate::field::Field;

/// Symbolic identifier for a single rule failure.
///
/// The string form (`required`, `minlength`, ...) is the key used by message tables
/// and by the JSON reports.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ErrorCode {
    Required,
    MinLength,
    MaxLength,
    Pattern,
    Unmatch,
}

/// Ordered set of error codes. Iteration order is insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorSet(Vec<ErrorCode>);

impl ErrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a code; returns false if it was already present.
    pub fn insert(&mut self, code: ErrorCode) -> bool {
        if self.0.contains(&code) {
            return false;
        }
        self.0.push(code);
        true
    }

    pub fn contains(&self, code: ErrorCode) -> bool {
        self.0.contains(&code)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = ErrorCode> + '_ {
        self.0.iter().copied()
    }

    /// Merge another set into this one, keeping first-seen order.
    pub fn extend(&mut self, other: &ErrorSet) {
        for code in other.iter() {
            self.insert(code);
        }
    }
}

impl FromIterator<ErrorCode> for ErrorSet {
    fn from_iter<I: IntoIterator<Item = ErrorCode>>(iter: I) -> Self {
        let mut set = ErrorSet::new();
        for code in iter {
            set.insert(code);
        }
        set
    }
}

impl<'a> IntoIterator for &'a ErrorSet {
    type Item = ErrorCode;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, ErrorCode>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

/// A compiled pattern that has to match the whole value.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile `source`, anchored at both ends.
    pub fn new(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let regex = Regex::new(&format!("^(?:{source})$"))?;
        Ok(Self { source, regex })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

/// A single validation check attached to a field.
#[derive(Debug, Clone)]
pub enum Rule {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Pattern(Pattern),
}

impl Rule {
    pub fn pattern(source: impl Into<String>) -> Result<Self> {
        Ok(Rule::Pattern(Pattern::new(source)?))
    }

    /// The code this rule reports when it fails.
    pub fn code(&self) -> ErrorCode {
        match self {
            Rule::Required => ErrorCode::Required,
            Rule::MinLength(_) => ErrorCode::MinLength,
            Rule::MaxLength(_) => ErrorCode::MaxLength,
            Rule::Pattern(_) => ErrorCode::Pattern,
        }
    }

    /// Evaluate the rule against `value`.
    pub fn check(&self, value: &str) -> Option<ErrorCode> {
        let failed = match self {
            Rule::Required => value.trim().is_empty(),
            // Empty values belong to `Required` alone.
            _ if value.is_empty() => false,
            Rule::MinLength(n) => value.chars().count() < *n,
            Rule::MaxLength(n) => value.chars().count() > *n,
            Rule::Pattern(p) => !p.is_match(value),
        };
        failed.then(|| self.code())
    }
}

/// Run every rule of `field` against its current value.
pub fn validate(field: &Field) -> ErrorSet {
    validate_value(field.value(), field.rules())
}

/// Run `rules` against a bare value.
pub fn validate_value(value: &str, rules: &[Rule]) -> ErrorSet {
    let mut errors = ErrorSet::new();
    for rule in rules {
        if let Some(code) = rule.check(value) {
            tracing::trace!(%code, "rule failed");
            errors.insert(code);
        }
    }
    errors
}

/// The bits of a field a cross-field rule is allowed to look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSnapshot<'a> {
    pub value: &'a str,
    pub pristine: bool,
}

impl<'a> FieldSnapshot<'a> {
    pub fn new(value: &'a str, pristine: bool) -> Self {
        Self { value, pristine }
    }
}

/// Email / confirm-email cross-check.
///
/// Passes while either side is still pristine, or when both values are equal.
pub fn email_match(email: FieldSnapshot<'_>, confirm: FieldSnapshot<'_>) -> Option<ErrorCode> {
    if email.pristine || confirm.pristine || email.value == confirm.value {
        None
    } else {
        Some(ErrorCode::Unmatch)
    }
}
