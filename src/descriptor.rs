//! Schema grammar: scalar tags, MAP/ARRAY composites, and malformed
//! fragments kept verbatim for error messages.
//!
//! Raw descriptors use numeric tags (see [`TYPE_TAGS`]):
//!
//! ```text
//! 0                       INT
//! [100, {"a": 0}]         MAP of { a: INT }
//! [101, [100, {...}]]     ARRAY of MAP
//! ```
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value as Json;

// ————————————————————————————————————————————————————————————————————————————
// TAGS
// ————————————————————————————————————————————————————————————————————————————

pub const INT: i64 = 0;
pub const FLOAT: i64 = 1;
pub const STRING: i64 = 2;
pub const PHONE: i64 = 3;
pub const MAP: i64 = 100;
pub const ARRAY: i64 = 101;

/// Every known tag and its symbolic name.
pub static TYPE_TAGS: [(i64, &str); 6] = [
    (INT, "INT"),
    (FLOAT, "FLOAT"),
    (STRING, "STRING"),
    (PHONE, "PHONE"),
    (MAP, "MAP"),
    (ARRAY, "ARRAY"),
];

pub fn tag_name(tag: i64) -> Option<&'static str> {
    TYPE_TAGS.iter().find(|(t, _)| *t == tag).map(|(_, name)| *name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarTag {
    Int,
    Float,
    String,
    Phone,
}

impl ScalarTag {
    pub const ALL: [ScalarTag; 4] = [ScalarTag::Int, ScalarTag::Float, ScalarTag::String, ScalarTag::Phone];

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            INT => Some(ScalarTag::Int),
            FLOAT => Some(ScalarTag::Float),
            STRING => Some(ScalarTag::String),
            PHONE => Some(ScalarTag::Phone),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            ScalarTag::Int => INT,
            ScalarTag::Float => FLOAT,
            ScalarTag::String => STRING,
            ScalarTag::Phone => PHONE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ScalarTag::Int => "INT",
            ScalarTag::Float => "FLOAT",
            ScalarTag::String => "STRING",
            ScalarTag::Phone => "PHONE",
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// DESCRIPTORS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Json")]
pub enum Descriptor {
    Scalar(ScalarTag),
    Map(Schema),
    Array(Box<Descriptor>),
    Malformed(Malformed),
}

/// Which shape a broken descriptor was aiming for, as far as can be told.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedKind {
    /// Not an array and not one of the scalar tags.
    UnknownScalar,
    /// `[MAP, <not a mapping>]`
    Map,
    /// `[ARRAY, <not a valid descriptor>]`
    Array,
    /// An array that is neither MAP nor ARRAY shaped.
    Nested,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Malformed {
    pub kind: MalformedKind,
    pub raw: Json,
}

/// Field name → descriptor, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: IndexMap<String, Descriptor>,
}

impl Descriptor {
    pub const INT: Descriptor = Descriptor::Scalar(ScalarTag::Int);
    pub const FLOAT: Descriptor = Descriptor::Scalar(ScalarTag::Float);
    pub const STRING: Descriptor = Descriptor::Scalar(ScalarTag::String);
    pub const PHONE: Descriptor = Descriptor::Scalar(ScalarTag::Phone);

    pub fn map<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Descriptor)>,
        K: Into<String>,
    {
        Descriptor::Map(fields.into_iter().collect())
    }

    pub fn array(element: Descriptor) -> Self {
        Descriptor::Array(Box::new(element))
    }

    pub fn is_well_formed(&self) -> bool {
        !matches!(self, Descriptor::Malformed(_))
    }

    /// Classify a raw fragment. Never fails: broken input becomes
    /// [`Descriptor::Malformed`] and is reported when traversal reaches it.
    pub fn classify(raw: &Json) -> Self {
        let Json::Array(parts) = raw else {
            return match raw.as_i64().and_then(ScalarTag::from_code) {
                Some(tag) => Descriptor::Scalar(tag),
                None => malformed(MalformedKind::UnknownScalar, raw),
            };
        };
        match parts.as_slice() {
            [kind, payload] if kind.as_i64() == Some(MAP) => match payload {
                Json::Object(fields) => Descriptor::Map(
                    fields
                        .iter()
                        .map(|(name, d)| (name.clone(), Descriptor::classify(d)))
                        .collect(),
                ),
                Json::Array(xs) if xs.is_empty() => Descriptor::Map(Schema::default()),
                _ => malformed(MalformedKind::Map, raw),
            },
            [kind, payload] if kind.as_i64() == Some(ARRAY) => match Descriptor::classify(payload) {
                Descriptor::Malformed(_) => malformed(MalformedKind::Array, raw),
                element => Descriptor::array(element),
            },
            _ => malformed(MalformedKind::Nested, raw),
        }
    }

    /// Raw form, the inverse of [`Descriptor::classify`].
    pub fn to_json(&self) -> Json {
        match self {
            Descriptor::Scalar(tag) => Json::from(tag.code()),
            Descriptor::Map(schema) => Json::Array(vec![Json::from(MAP), schema.to_json()]),
            Descriptor::Array(element) => Json::Array(vec![Json::from(ARRAY), element.to_json()]),
            Descriptor::Malformed(m) => m.raw.clone(),
        }
    }
}

fn malformed(kind: MalformedKind, raw: &Json) -> Descriptor {
    Descriptor::Malformed(Malformed { kind, raw: raw.clone() })
}

impl From<Json> for Descriptor {
    fn from(raw: Json) -> Self {
        Descriptor::classify(&raw)
    }
}

impl From<ScalarTag> for Descriptor {
    fn from(tag: ScalarTag) -> Self {
        Descriptor::Scalar(tag)
    }
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, keeps declaration order.
    pub fn field(mut self, name: impl Into<String>, descriptor: impl Into<Descriptor>) -> Self {
        self.fields.insert(name.into(), descriptor.into());
        self
    }

    /// Raw schema root: a JSON object of field descriptors.
    pub fn from_json(raw: Json) -> Result<Self, serde_json::Error> {
        serde_json::from_value(raw)
    }

    pub fn get(&self, name: &str) -> Option<&Descriptor> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Descriptor)> {
        self.fields.iter().map(|(k, d)| (k.as_str(), d))
    }

    pub fn to_json(&self) -> Json {
        Json::Object(self.fields.iter().map(|(k, d)| (k.clone(), d.to_json())).collect())
    }
}

impl<K: Into<String>> FromIterator<(K, Descriptor)> for Schema {
    fn from_iter<I: IntoIterator<Item = (K, Descriptor)>>(iter: I) -> Self {
        Self { fields: iter.into_iter().map(|(k, d)| (k.into(), d)).collect() }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn kind_of(raw: Json) -> Option<MalformedKind> {
        match Descriptor::classify(&raw) {
            Descriptor::Malformed(m) => Some(m.kind),
            _ => None,
        }
    }

    #[test]
    fn scalar_tags_classify() {
        assert_eq!(Descriptor::classify(&json!(0)), Descriptor::INT);
        assert_eq!(Descriptor::classify(&json!(3)), Descriptor::PHONE);
        for tag in ScalarTag::ALL {
            assert_eq!(ScalarTag::from_code(tag.code()), Some(tag));
            assert_eq!(tag_name(tag.code()), Some(tag.name()));
        }
    }

    #[test]
    fn unknown_scalars_are_kept_raw() {
        assert_eq!(kind_of(json!(55)), Some(MalformedKind::UnknownScalar));
        assert_eq!(kind_of(json!("int")), Some(MalformedKind::UnknownScalar));
        assert_eq!(kind_of(json!({"name": "x"})), Some(MalformedKind::UnknownScalar));
        assert_eq!(kind_of(json!(1.0)), Some(MalformedKind::UnknownScalar));
        assert_eq!(kind_of(json!(null)), Some(MalformedKind::UnknownScalar));
    }

    #[test]
    fn map_descriptor_requires_mapping_payload() {
        let d = Descriptor::classify(&json!([MAP, {"a": INT, "b": [ARRAY, FLOAT]}]));
        let expected = Descriptor::map([("a", Descriptor::INT), ("b", Descriptor::array(Descriptor::FLOAT))]);
        assert_eq!(d, expected);

        assert_eq!(Descriptor::classify(&json!([MAP, []])), Descriptor::Map(Schema::new()));
        assert_eq!(kind_of(json!([MAP, [FLOAT, 1, 2.4, "sdasd"]])), Some(MalformedKind::Map));
        assert_eq!(kind_of(json!([MAP, INT])), Some(MalformedKind::Map));
    }

    #[test]
    fn map_payload_fields_are_classified_lazily() {
        // a broken field inside a MAP does not break the MAP itself
        let d = Descriptor::classify(&json!([MAP, {"v": 55}]));
        let Descriptor::Map(schema) = d else { panic!("expected MAP") };
        assert!(!schema.get("v").unwrap().is_well_formed());
    }

    #[test]
    fn array_descriptor_requires_valid_element() {
        assert_eq!(Descriptor::classify(&json!([ARRAY, INT])), Descriptor::array(Descriptor::INT));
        assert_eq!(
            Descriptor::classify(&json!([ARRAY, [ARRAY, STRING]])),
            Descriptor::array(Descriptor::array(Descriptor::STRING)),
        );
        assert_eq!(kind_of(json!([ARRAY, "int"])), Some(MalformedKind::Array));
        assert_eq!(kind_of(json!([ARRAY, 77])), Some(MalformedKind::Array));
        assert_eq!(kind_of(json!([ARRAY, [ARRAY, "int"]])), Some(MalformedKind::Array));
        assert_eq!(kind_of(json!([ARRAY, []])), Some(MalformedKind::Array));
    }

    #[test]
    fn other_arrays_are_malformed_nested() {
        assert_eq!(kind_of(json!(["array", []])), Some(MalformedKind::Nested));
        assert_eq!(kind_of(json!([70, INT])), Some(MalformedKind::Nested));
        assert_eq!(kind_of(json!([INT, {"a": STRING}])), Some(MalformedKind::Nested));
        assert_eq!(kind_of(json!([MAP, {}, 1])), Some(MalformedKind::Nested));
        assert_eq!(kind_of(json!([])), Some(MalformedKind::Nested));
    }

    #[test]
    fn schema_deserializes_in_declaration_order() {
        let schema: Schema = serde_json::from_str(r#"{"z": 0, "a": [101, 2], "m": "int"}"#).unwrap();
        let names: Vec<_> = schema.iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["z", "a", "m"]);
        assert_eq!(schema.get("a"), Some(&Descriptor::array(Descriptor::STRING)));
        assert!(!schema.get("m").unwrap().is_well_formed());
    }

    #[test]
    fn raw_form_round_trips() {
        let raw = json!({"id": 0, "m": [100, {"a": [101, 3]}], "bad": [101, "x"]});
        let schema = Schema::from_json(raw.clone()).unwrap();
        assert_eq!(schema.to_json(), raw);
    }

    #[test]
    fn builder_matches_raw_schema() {
        let built = Schema::new()
            .field("id", ScalarTag::Int)
            .field("tags", Descriptor::array(Descriptor::STRING));
        let raw = Schema::from_json(json!({"id": INT, "tags": [ARRAY, STRING]})).unwrap();
        assert_eq!(built, raw);
    }
}
