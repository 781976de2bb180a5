//! Validation pass: walks the document and the schema together and records
//! every problem as an [`Issue`]. Never stops at the first one.
use serde::{Deserialize, Serialize};

use crate::coerce;
use crate::descriptor::{Descriptor, Malformed, MalformedKind, Schema};
use crate::issue::{FieldPath, Issue};
use crate::value::Value;

/// How issues for array elements are located.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementPaths {
    /// Every element reports the array's own path (`tags`).
    #[default]
    Shared,
    /// Elements get their index appended (`tags:0`, `tags:1`).
    Indexed,
}

pub fn validate(value: &Value, schema: &Schema) -> Vec<Issue> {
    validate_with(value, schema, ElementPaths::default())
}

pub fn validate_with(value: &Value, schema: &Schema, element_paths: ElementPaths) -> Vec<Issue> {
    let mut pass = Pass { element_paths, issues: Vec::new() };
    let root = FieldPath::root();
    if value.is_container() {
        pass.check_mapping(&root, value, schema);
    } else {
        pass.record(Issue::field_value_mismatch(value, &root, "MAP"));
    }
    pass.issues
}

struct Pass {
    element_paths: ElementPaths,
    issues: Vec<Issue>,
}

impl Pass {
    fn record(&mut self, issue: Issue) {
        tracing::trace!(code = ?issue.code(), "{}", issue.message());
        self.issues.push(issue);
    }

    /// One mapping level: count check, then every field in document order.
    fn check_mapping(&mut self, path: &FieldPath, value: &Value, schema: &Schema) {
        let entries = value.entries();
        if entries.len() != schema.len() {
            self.record(Issue::count_mismatch(entries.len(), schema.len(), path));
        }
        for (name, field) in entries {
            let field_path = path.child(name.as_ref());
            match schema.get(&name) {
                Some(descriptor) => self.check_field(&field_path, field, descriptor),
                None => self.record(Issue::field_type_not_set(&field_path)),
            }
        }
    }

    fn check_field(&mut self, path: &FieldPath, value: &Value, descriptor: &Descriptor) {
        match descriptor {
            Descriptor::Scalar(tag) => {
                if !coerce::accepts(*tag, value) {
                    self.record(Issue::field_value_mismatch(value, path, tag.name()));
                }
            }
            Descriptor::Map(schema) => {
                if value.is_mapping() {
                    self.check_mapping(path, value, schema);
                } else {
                    self.record(Issue::field_value_mismatch(value, path, "MAP"));
                }
            }
            Descriptor::Array(element) => {
                if value.is_sequence() {
                    for (index, item) in value.elements().into_iter().enumerate() {
                        self.check_element(path, index, item, element);
                    }
                } else {
                    self.record(Issue::field_value_mismatch(value, path, "ARRAY"));
                }
            }
            Descriptor::Malformed(malformed) => self.record(malformed_issue(path, malformed)),
        }
    }

    /// Scalar elements get their own issue code; composite elements are
    /// checked like a field sitting at the array's path.
    fn check_element(&mut self, path: &FieldPath, index: usize, item: &Value, descriptor: &Descriptor) {
        let item_path = match self.element_paths {
            ElementPaths::Shared => path.clone(),
            ElementPaths::Indexed => path.child(index.to_string()),
        };
        match descriptor {
            Descriptor::Scalar(tag) => {
                if !coerce::accepts(*tag, item) {
                    self.record(Issue::array_element_mismatch(item, &item_path, tag.name()));
                }
            }
            _ => self.check_field(&item_path, item, descriptor),
        }
    }
}

fn malformed_issue(path: &FieldPath, malformed: &Malformed) -> Issue {
    match malformed.kind {
        MalformedKind::UnknownScalar => Issue::unknown_scalar_type(path, &malformed.raw),
        MalformedKind::Map => Issue::malformed_map_type(path, &malformed.raw),
        MalformedKind::Array => Issue::malformed_array_type(path, &malformed.raw),
        MalformedKind::Nested => Issue::malformed_nested_type(path, &malformed.raw),
    }
}


// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
