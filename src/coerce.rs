//! Scalar coercion rules.
//!
//! Validation and normalization both go through [`coerce`], so a value is
//! accepted under a tag exactly when it can be normalized under it.
pub mod num;
pub mod phone;

use ordered_float::OrderedFloat;

use crate::descriptor::ScalarTag;
use crate::value::Value;

/// Canonical form of `value` under `tag`, or `None` if it does not convert.
pub fn coerce(tag: ScalarTag, value: &Value) -> Option<Value> {
    match tag {
        ScalarTag::Int => num::to_int(value)
            .map(Value::Integer)
            .or_else(|| num::to_uint(value).map(Value::UInteger)),
        ScalarTag::Float => num::to_float(value).map(|f| Value::Float(OrderedFloat(f))),
        ScalarTag::String => to_text(value).map(Value::String),
        ScalarTag::Phone => phone::to_phone(value).map(Value::String),
    }
}

pub fn accepts(tag: ScalarTag, value: &Value) -> bool {
    coerce(tag, value).is_some()
}

/// Text of a scalar leaf. Integral floats drop the fraction (`10.0` → `"10"`).
fn to_text(value: &Value) -> Option<String> {
    match value {
        Value::Integer(i) => Some(i.to_string()),
        Value::UInteger(u) => Some(u.to_string()),
        Value::Float(f) => Some(f.0.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}
