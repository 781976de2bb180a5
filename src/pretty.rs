//! Human-readable rendering of raw descriptor fragments.
//!
//! `[101, {"a": 0}]` renders as `[ARRAY,["a"=>INT]]`: objects get brackets
//! and `=>`, and every integer that is a known tag becomes its name, at any
//! depth. Only used for messages.
use serde_json::Value as Json;

use crate::descriptor::tag_name;

pub fn render(raw: &Json) -> String {
    let mut out = String::new();
    write_fragment(&mut out, raw);
    out
}

fn write_fragment(out: &mut String, raw: &Json) {
    match raw {
        Json::Array(xs) => {
            out.push('[');
            for (i, x) in xs.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_fragment(out, x);
            }
            out.push(']');
        }
        Json::Object(map) => {
            out.push('[');
            for (i, (k, v)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                // quoted exactly like a JSON string
                out.push_str(&Json::String(k.clone()).to_string());
                out.push_str("=>");
                write_fragment(out, v);
            }
            out.push(']');
        }
        Json::Number(n) => match n.as_i64().and_then(tag_name) {
            Some(name) => out.push_str(name),
            None => out.push_str(&n.to_string()),
        },
        leaf => out.push_str(&leaf.to_string()),
    }
}
