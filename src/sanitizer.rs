//! The boundary: JSON text in, normalized tree or [`Failure`] out.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::descriptor::Schema;
use crate::issue::{Failure, Issue};
use crate::normalize::{self, ContractViolation};
use crate::validate::{self, ElementPaths};
use crate::value::{self, ParseError, Value};

// ————————————————————————————————————————————————————————————————————————————
// OPTIONS
// ————————————————————————————————————————————————————————————————————————————

/// What a pass with warnings but no errors amounts to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningPolicy {
    /// Any issue at all rejects the document.
    #[default]
    Reject,
    /// Warnings ride along with the normalized tree.
    Report,
}

pub const DEFAULT_MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Options {
    pub warnings: WarningPolicy,
    pub element_paths: ElementPaths,
    /// Container nesting allowed in a document before it is refused outright.
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            warnings: WarningPolicy::default(),
            element_paths: ElementPaths::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// RESULTS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq)]
pub struct Sanitized {
    value: Value,
    warnings: Vec<Issue>,
}

impl Sanitized {
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Always empty under [`WarningPolicy::Reject`].
    pub fn warnings(&self) -> &[Issue] {
        &self.warnings
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

#[derive(Debug, Error)]
pub enum SanitizeError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("document nests {depth} levels deep, the limit is {limit}")]
    TooDeep { depth: usize, limit: usize },
    #[error("{0}")]
    Rejected(#[from] Failure),
    #[error("internal error: {0}")]
    Contract(#[from] ContractViolation),
}

impl SanitizeError {
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            SanitizeError::Rejected(failure) => Some(failure),
            _ => None,
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// ENTRY POINTS
// ————————————————————————————————————————————————————————————————————————————

/// [`Sanitizer::sanitize`] with default options.
pub fn sanitize(document: &str, schema: &Schema) -> Result<Sanitized, SanitizeError> {
    Sanitizer::default().sanitize(document, schema)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sanitizer {
    options: Options,
}

impl Sanitizer {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn sanitize(&self, document: &str, schema: &Schema) -> Result<Sanitized, SanitizeError> {
        let value = value::decode(document)?;
        self.sanitize_value(&value, schema)
    }

    /// Same as [`Sanitizer::sanitize`] for an already decoded tree.
    pub fn sanitize_value(&self, value: &Value, schema: &Schema) -> Result<Sanitized, SanitizeError> {
        let depth = value.depth();
        if depth > self.options.max_depth {
            tracing::debug!(depth, limit = self.options.max_depth, "document refused, too deep");
            return Err(SanitizeError::TooDeep { depth, limit: self.options.max_depth });
        }

        let issues = validate::validate_with(value, schema, self.options.element_paths);
        let (errors, warnings) = issues.iter().partition::<Vec<&Issue>, _>(|i| i.is_error());
        tracing::debug!(warnings = warnings.len(), errors = errors.len(), "validation pass finished");

        if !errors.is_empty() {
            return Err(Failure::from_issues(issues).into());
        }
        let normalized = normalize::normalize_document(value, schema)?;
        if !warnings.is_empty() && self.options.warnings == WarningPolicy::Reject {
            return Err(Failure::from_issues(issues).into());
        }
        Ok(Sanitized { value: normalized, warnings: issues })
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
