//! Normalization: rebuilds a validated document in canonical typed form.
//!
//! Only sound after a pass with zero errors. If called on a pair that does
//! not validate, it stops with a [`ContractViolation`] at the first mismatch
//! instead of guessing.
use indexmap::IndexMap;
use thiserror::Error;

use crate::coerce;
use crate::descriptor::{Descriptor, Schema};
use crate::issue::FieldPath;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("normalization reached `{path}` with a value that did not validate ({reason})")]
pub struct ContractViolation {
    pub path: String,
    pub reason: &'static str,
}

/// Root entry point: the document's fields against the schema. A root array
/// is walked by index and comes back as an array.
pub fn normalize_document(value: &Value, schema: &Schema) -> Result<Value, ContractViolation> {
    let fields = normalize_mapping(&FieldPath::root(), value, schema)?;
    Ok(match value {
        Value::Sequence(items) if !items.is_empty() => Value::Sequence(fields.into_values().collect()),
        _ => Value::Mapping(fields),
    })
}

/// One value against one descriptor.
pub fn normalize(value: &Value, descriptor: &Descriptor) -> Result<Value, ContractViolation> {
    normalize_at(&FieldPath::root(), value, descriptor)
}

fn normalize_at(path: &FieldPath, value: &Value, descriptor: &Descriptor) -> Result<Value, ContractViolation> {
    match descriptor {
        Descriptor::Scalar(tag) => {
            coerce::coerce(*tag, value).ok_or_else(|| violation(path, "scalar does not coerce"))
        }
        Descriptor::Map(schema) => {
            if !value.is_mapping() {
                return Err(violation(path, "expected a mapping"));
            }
            normalize_mapping(path, value, schema).map(Value::Mapping)
        }
        Descriptor::Array(element) => {
            if !value.is_sequence() {
                return Err(violation(path, "expected a sequence"));
            }
            value
                .elements()
                .into_iter()
                .map(|item| normalize_at(path, item, element))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Sequence)
        }
        Descriptor::Malformed(_) => Err(violation(path, "malformed descriptor")),
    }
}

fn normalize_mapping(
    path: &FieldPath,
    value: &Value,
    schema: &Schema,
) -> Result<IndexMap<String, Value>, ContractViolation> {
    if !value.is_container() {
        return Err(violation(path, "expected a mapping"));
    }
    let mut out = IndexMap::new();
    for (name, field) in value.entries() {
        let field_path = path.child(name.as_ref());
        let descriptor = schema
            .get(&name)
            .ok_or_else(|| violation(&field_path, "field is not declared"))?;
        out.insert(name.into_owned(), normalize_at(&field_path, field, descriptor)?);
    }
    Ok(out)
}

fn violation(path: &FieldPath, reason: &'static str) -> ContractViolation {
    ContractViolation { path: path.to_string(), reason }
}
