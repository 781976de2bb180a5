use once_cell::sync::Lazy;
use regex::Regex;

use crate::value::Value;

/// Russian-style numbers: `+7 (950) 288-56-23`, `8 950 288 56 23`,
/// `89502885623`. Eleven digits, leading 7 or 8, optional `+`.
static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[78][ -]?(?:\([0-9]{3}\)|[0-9]{3})[ -]?[0-9]{3}[ -]?[0-9]{2}[ -]?[0-9]{2}$").unwrap()
});

const FIRST_DIGIT: char = '7';

pub fn is_phone(s: &str) -> bool {
    PHONE.is_match(s)
}

/// Canonical 11-digit form starting with 7. Integers are read as their
/// decimal text.
pub fn to_phone(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Integer(i) => i.to_string(),
        _ => return None,
    };
    if !is_phone(&text) {
        return None;
    }
    let digits = text.chars().filter(char::is_ascii_digit).skip(1);
    Some(std::iter::once(FIRST_DIGIT).chain(digits).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouped_and_flat_forms_canonicalize() {
        let inputs = [
            Value::String("8 (950) 288-56-23".into()),
            Value::String("+7 950 288 56 23".into()),
            Value::String("+7 (950) 288-56-23".into()),
            Value::String("+7(950)2885623".into()),
            Value::Integer(89502885623),
            Value::Integer(79502885623),
        ];
        for input in inputs {
            assert_eq!(to_phone(&input).as_deref(), Some("79502885623"), "{input}");
        }
    }

    #[test]
    fn rejects_wrong_shapes() {
        for bad in ["9502885623", "99502885623", "8950288562", "895028856234", "8 (950 288-56-23", "phone", ""] {
            assert!(!is_phone(bad), "{bad}");
        }
        assert_eq!(to_phone(&Value::Float(ordered_float::OrderedFloat(8.0))), None);
    }
}
