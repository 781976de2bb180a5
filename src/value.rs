//! Decoded document tree.
//!
//! `serde_json` does the text decoding (with `preserve_order`, so object keys
//! keep document order); the result is lifted into [`Value`], which separates
//! integers from floats and answers the sequence-vs-mapping question
//! structurally instead of by container kind.
use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use thiserror::Error;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Out of grammar: decodes, but no descriptor accepts it.
    Null,
    /// Out of grammar, same as `Null`.
    Bool(bool),
    Integer(i64),
    /// Integers above `i64::MAX`, kept exact.
    UInteger(u64),
    Float(OrderedFloat<f64>),
    String(String),
    Sequence(Vec<Value>),
    Mapping(IndexMap<String, Value>),
}

/// Raised when the document text is not JSON at all.
#[derive(Debug, Error)]
#[error("malformed JSON document: {0}")]
pub struct ParseError(#[from] serde_json::Error);

// ————————————————————————————————————————————————————————————————————————————
// DECODE
// ————————————————————————————————————————————————————————————————————————————

pub fn decode(text: &str) -> Result<Value, ParseError> {
    let json = serde_json::from_str::<serde_json::Value>(text)?;
    Ok(Value::from(json))
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Value::Integer(i),
                (None, Some(u)) => Value::UInteger(u),
                (None, None) => Value::Float(OrderedFloat(n.as_f64().unwrap_or(f64::NAN))),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(xs) => {
                Value::Sequence(xs.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Mapping(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// SHAPE
// ————————————————————————————————————————————————————————————————————————————

impl Value {
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Sequence(_) | Value::Mapping(_))
    }

    /// Empty containers are both sequence- and mapping-shaped; the declared
    /// descriptor decides which one they become.
    ///
    /// A mapping whose keys are exactly `"0".."n-1"`, in order, is a sequence.
    pub fn is_sequence(&self) -> bool {
        match self {
            Value::Sequence(_) => true,
            Value::Mapping(map) => keys_are_indices(map),
            _ => false,
        }
    }

    pub fn is_mapping(&self) -> bool {
        match self {
            Value::Sequence(xs) => xs.is_empty(),
            Value::Mapping(map) => map.is_empty() || !keys_are_indices(map),
            _ => false,
        }
    }

    /// Named entries of a container, in order. Sequences are keyed by index.
    pub fn entries(&self) -> Vec<(Cow<'_, str>, &Value)> {
        match self {
            Value::Sequence(xs) => xs
                .iter()
                .enumerate()
                .map(|(i, x)| (Cow::Owned(i.to_string()), x))
                .collect(),
            Value::Mapping(map) => map
                .iter()
                .map(|(k, v)| (Cow::Borrowed(k.as_str()), v))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Elements of a container, in order, ignoring keys.
    pub fn elements(&self) -> Vec<&Value> {
        match self {
            Value::Sequence(xs) => xs.iter().collect(),
            Value::Mapping(map) => map.values().collect(),
            _ => Vec::new(),
        }
    }

    /// Container nesting depth; scalars are depth 0. Iterative, so it is safe
    /// to run on any decoded document.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(&Value, usize)> = vec![(self, 0)];
        while let Some((v, d)) = stack.pop() {
            if !v.is_container() {
                deepest = deepest.max(d);
                continue;
            }
            deepest = deepest.max(d + 1);
            for child in v.elements() {
                stack.push((child, d + 1));
            }
        }
        deepest
    }

    /// Back to `serde_json`, e.g. for comparisons against fixtures.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Integer(i) => serde_json::Value::from(*i),
            Value::UInteger(u) => serde_json::Value::from(*u),
            Value::Float(f) => serde_json::Number::from_f64(f.0)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Sequence(xs) => serde_json::Value::Array(xs.iter().map(Value::to_json).collect()),
            Value::Mapping(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

fn keys_are_indices(map: &IndexMap<String, Value>) -> bool {
    map.keys().enumerate().all(|(i, k)| *k == i.to_string())
}

// ————————————————————————————————————————————————————————————————————————————
// OUTPUT
// ————————————————————————————————————————————————————————————————————————————

/// Canonical JSON text, as embedded in issue messages.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::UInteger(u) => serializer.serialize_u64(*u),
            Value::Float(f) => serializer.serialize_f64(f.0),
            Value::String(s) => serializer.serialize_str(s),
            Value::Sequence(xs) => {
                let mut seq = serializer.serialize_seq(Some(xs.len()))?;
                for x in xs {
                    seq.serialize_element(x)?;
                }
                seq.end()
            }
            Value::Mapping(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integers_and_floats_stay_apart() {
        let v = Value::from(json!({"i": 10, "f": 10.0, "e": 1.0e1}));
        let Value::Mapping(map) = v else { panic!("expected mapping") };
        assert_eq!(map["i"], Value::Integer(10));
        assert_eq!(map["f"], Value::Float(OrderedFloat(10.0)));
        assert_eq!(map["e"], Value::Float(OrderedFloat(10.0)));
    }

    #[test]
    fn integers_beyond_i64_stay_exact() {
        let v = decode(r#"{"big": 18446744073709551615, "edge": 9223372036854775807}"#).unwrap();
        let Value::Mapping(map) = &v else { panic!("expected mapping") };
        assert_eq!(map["big"], Value::UInteger(u64::MAX));
        assert_eq!(map["edge"], Value::Integer(i64::MAX));
        assert_eq!(v.to_string(), r#"{"big":18446744073709551615,"edge":9223372036854775807}"#);
    }

    #[test]
    fn decode_keeps_document_key_order() {
        let v = decode(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let keys: Vec<_> = v.entries().into_iter().map(|(k, _)| k.into_owned()).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn decode_rejects_malformed_text() {
        assert!(decode("{\"a\": ").is_err());
        assert!(decode("not json").is_err());
    }

    #[test]
    fn empty_containers_are_ambiguous() {
        for v in [Value::from(json!([])), Value::from(json!({}))] {
            assert!(v.is_sequence());
            assert!(v.is_mapping());
        }
    }

    #[test]
    fn index_keyed_object_is_a_sequence() {
        let v = Value::from(json!({"0": "a", "1": "b"}));
        assert!(v.is_sequence());
        assert!(!v.is_mapping());

        let out_of_order = Value::from(json!({"1": "a", "0": "b"}));
        assert!(!out_of_order.is_sequence());
        assert!(out_of_order.is_mapping());

        let v = Value::from(json!({"a": 1, "0": 4}));
        assert!(v.is_mapping());
        assert!(!v.is_sequence());
    }

    #[test]
    fn non_empty_array_is_never_a_mapping() {
        let v = Value::from(json!([1]));
        assert!(v.is_sequence());
        assert!(!v.is_mapping());
        assert!(!Value::Integer(1).is_sequence());
        assert!(!Value::String("x".into()).is_mapping());
    }

    #[test]
    fn sequence_entries_are_keyed_by_index() {
        let v = Value::from(json!(["a", "b"]));
        let entries = v.entries();
        assert_eq!(entries[1].0, "1");
        assert_eq!(entries[1].1, &Value::String("b".into()));
    }

    #[test]
    fn depth_counts_container_levels() {
        assert_eq!(Value::Integer(1).depth(), 0);
        assert_eq!(Value::from(json!({})).depth(), 1);
        assert_eq!(Value::from(json!({"a": [1, {"b": [[]]}]})).depth(), 5);
    }

    #[test]
    fn display_is_canonical_json() {
        assert_eq!(Value::from(json!({"c": 1})).to_string(), r#"{"c":1}"#);
        assert_eq!(Value::String("str".into()).to_string(), r#""str""#);
        assert_eq!(Value::Float(OrderedFloat(-1.2)).to_string(), "-1.2");
    }

    #[test]
    fn serializes_back_to_the_same_json() {
        let src = json!({"b": [1, 2.5, "x"], "a": {"k": null, "t": true}});
        let v = Value::from(src.clone());
        assert_eq!(serde_json::to_value(&v).unwrap(), src);
        assert_eq!(v.to_json(), src);
    }
}
