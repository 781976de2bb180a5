//! Diagnostics: one [`Issue`] per problem, and the [`Failure`] that carries
//! every issue of a rejected pass.
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use thiserror::Error;

use crate::pretty;
use crate::value::Value;

// ————————————————————————————————————————————————————————————————————————————
// PATHS
// ————————————————————————————————————————————————————————————————————————————

/// Joins path segments. Segments are not escaped, so a field named `a:b`
/// renders the same as field `b` nested in `a`.
pub const PATH_SEPARATOR: &str = ":";

/// Location of a field, root first. Renders as `v:a:b`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// "at the root" / "for field `a:b`"
    fn location(&self) -> String {
        if self.is_root() {
            "at the root".to_string()
        } else {
            format!("for field `{self}`")
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(PATH_SEPARATOR))
    }
}

// ————————————————————————————————————————————————————————————————————————————
// ISSUES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueCode {
    FieldCountMismatch,
    FieldTypeNotSet,
    UnknownScalarType,
    MalformedNestedType,
    MalformedMapType,
    MalformedArrayType,
    FieldValueMismatch,
    ArrayElementMismatch,
}

impl IssueCode {
    pub fn severity(self) -> Severity {
        match self {
            IssueCode::FieldCountMismatch => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    severity: Severity,
    code: IssueCode,
    message: String,
}

const SCALAR_HINT: &str = "Use one of INT, FLOAT, STRING, PHONE";
const NESTED_HINT: &str = "Nested fields may use [MAP,[...]] or [ARRAY,INT] in place of a scalar type";

impl Issue {
    fn new(code: IssueCode, message: String) -> Self {
        Self { severity: code.severity(), code, message }
    }

    pub fn count_mismatch(fields: usize, declared: usize, path: &FieldPath) -> Self {
        Self::new(
            IssueCode::FieldCountMismatch,
            format!(
                "Number of JSON fields ({fields}) does not match the number of declared field types ({declared}) {}",
                path.location(),
            ),
        )
    }

    pub fn field_type_not_set(path: &FieldPath) -> Self {
        Self::new(IssueCode::FieldTypeNotSet, format!("Type of field `{path}` is not declared!"))
    }

    pub fn unknown_scalar_type(path: &FieldPath, raw: &Json) -> Self {
        Self::new(
            IssueCode::UnknownScalarType,
            format!(
                "Field `{path}` is declared with unknown scalar type {}. {SCALAR_HINT}",
                pretty::render(raw),
            ),
        )
    }

    pub fn malformed_nested_type(path: &FieldPath, raw: &Json) -> Self {
        Self::new(
            IssueCode::MalformedNestedType,
            format!(
                "Field `{path}` is declared with unknown composite type {}. There are 2 composite types: MAP, ARRAY. \
                 Examples: [MAP,[\"first\"=>INT,\"second\"=>FLOAT]], [ARRAY,INT]. {NESTED_HINT}",
                pretty::render(raw),
            ),
        )
    }

    pub fn malformed_map_type(path: &FieldPath, raw: &Json) -> Self {
        Self::new(
            IssueCode::MalformedMapType,
            format!(
                "MAP type of field `{path}` has a malformed description {}! \
                 Example: [MAP,[\"first\"=>INT,\"second\"=>FLOAT]]. {NESTED_HINT}",
                pretty::render(raw),
            ),
        )
    }

    pub fn malformed_array_type(path: &FieldPath, raw: &Json) -> Self {
        Self::new(
            IssueCode::MalformedArrayType,
            format!(
                "ARRAY type of field `{path}` has a malformed description {}! Example: [ARRAY,INT]. {NESTED_HINT}",
                pretty::render(raw),
            ),
        )
    }

    pub fn field_value_mismatch(value: &Value, path: &FieldPath, expected: &str) -> Self {
        let at = if path.is_root() { "the root".to_string() } else { format!("field `{path}`") };
        Self::new(
            IssueCode::FieldValueMismatch,
            format!("Value {value} of {at} cannot be converted to type {expected}!"),
        )
    }

    pub fn array_element_mismatch(element: &Value, path: &FieldPath, expected: &str) -> Self {
        Self::new(
            IssueCode::ArrayElementMismatch,
            format!("Value {element} of array `{path}` cannot be converted to type {expected}!"),
        )
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> IssueCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// FAILURE
// ————————————————————————————————————————————————————————————————————————————

/// Every issue of one rejected pass, warnings and errors kept apart, each in
/// traversal order.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct Failure {
    warnings: Vec<Issue>,
    errors: Vec<Issue>,
    message: String,
}

impl Failure {
    pub fn from_issues(issues: impl IntoIterator<Item = Issue>) -> Self {
        let (errors, warnings): (Vec<Issue>, Vec<Issue>) = issues.into_iter().partition(Issue::is_error);
        let message = combined_message(&warnings, &errors);
        Self { warnings, errors, message }
    }

    pub fn warning(&self, index: usize) -> Option<&Issue> {
        self.warnings.get(index)
    }

    pub fn error(&self, index: usize) -> Option<&Issue> {
        self.errors.get(index)
    }

    pub fn warnings(&self) -> &[Issue] {
        &self.warnings
    }

    pub fn errors(&self) -> &[Issue] {
        &self.errors
    }

    /// Warnings first, then errors.
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.warnings.iter().chain(&self.errors)
    }

    pub fn issue(&self, index: usize) -> Option<&Issue> {
        self.issues().nth(index)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn combined_message(warnings: &[Issue], errors: &[Issue]) -> String {
    let mut out = String::new();
    for (title, block) in [("Warnings:", warnings), ("Errors:", errors)] {
        if block.is_empty() {
            continue;
        }
        out.push_str(title);
        out.push('\n');
        for issue in block {
            out.push_str(issue.message());
            out.push('\n');
        }
    }
    out
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
