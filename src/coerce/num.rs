use once_cell::sync::Lazy;
use regex::Regex;

use crate::value::Value;

/// Decimal numeric strings: sign, digits, optional fraction and exponent.
/// No whitespace, no `inf`/`NaN`, no hex.
static NUMERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$").unwrap()
});

// 2^63; `i64::MAX as f64` rounds up to this
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

pub fn is_numeric_str(s: &str) -> bool {
    NUMERIC.is_match(s)
}

/// INT: accepted when the value survives the round trip through an integer.
pub fn to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(i) => Some(*i),
        Value::Float(f) => integral(f.0),
        Value::String(s) if is_numeric_str(s) => match s.parse::<i64>() {
            Ok(i) => Some(i),
            Err(_) => s.parse::<f64>().ok().and_then(integral),
        },
        _ => None,
    }
}

/// INT above `i64::MAX`: exact unsigned integers and their decimal strings.
pub fn to_uint(value: &Value) -> Option<u64> {
    match value {
        Value::UInteger(u) => Some(*u),
        Value::String(s) => s.parse::<u64>().ok(),
        _ => None,
    }
}

/// FLOAT: native floats, widened integers, finite numeric strings.
pub fn to_float(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(i) => Some(*i as f64),
        Value::UInteger(u) => Some(*u as f64),
        Value::Float(f) if f.0.is_finite() => Some(f.0),
        Value::String(s) if is_numeric_str(s) => s.parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn integral(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f >= -I64_BOUND && f < I64_BOUND).then(|| f as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordered_float::OrderedFloat;

    #[test]
    fn numeric_grammar() {
        for ok in ["0", "-1", "+2", "1.", ".5", "1.5e1", "10e-1", "1E+3"] {
            assert!(is_numeric_str(ok), "{ok}");
        }
        for bad in ["", ".", "e1", "1e", " 1", "1 ", "0x10", "inf", "NaN", "1.0$", "1,5"] {
            assert!(!is_numeric_str(bad), "{bad}");
        }
    }

    #[test]
    fn large_integers_keep_precision() {
        let s = Value::String("9007199254740993".into());
        assert_eq!(to_int(&s), Some(9_007_199_254_740_993));
    }

    #[test]
    fn unsigned_fallback_is_exact() {
        assert_eq!(to_uint(&Value::UInteger(u64::MAX)), Some(u64::MAX));
        assert_eq!(to_uint(&Value::String("9223372036854775808".into())), Some(9_223_372_036_854_775_808));
        assert_eq!(to_uint(&Value::String("1.5".into())), None);
        assert_eq!(to_uint(&Value::Float(OrderedFloat(1e19))), None);
    }

    #[test]
    fn out_of_range_floats_are_not_ints() {
        assert_eq!(to_int(&Value::Float(OrderedFloat(1e19))), None);
        assert_eq!(to_int(&Value::String("1e30".into())), None);
        assert_eq!(to_int(&Value::Float(OrderedFloat(-9.223372036854775808e18))), Some(i64::MIN));
    }
}
