use serde::de::DeserializeOwned;
use thiserror::Error;

/// A decoding failure together with the JSON path it happened at.
#[derive(Debug, Error)]
#[error("at JSON path {path} → {source}")]
pub struct PathDecodeError {
    pub path: String,
    #[source]
    pub source: serde_json::Error,
}

impl From<serde_path_to_error::Error<serde_json::Error>> for PathDecodeError {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let path = err.path().to_string();
        Self { path, source: err.into_inner() }
    }
}

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, PathDecodeError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    Ok(serde_path_to_error::deserialize::<_, T>(de)?)
}

pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, PathDecodeError> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    Ok(serde_path_to_error::deserialize::<_, T>(de)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Descriptor, Schema};
    use crate::sanitizer::Options;

    #[test]
    fn schema_files_decode() {
        let schema: Schema = from_str_with_path(r#"{"id": 0, "tags": [101, 2]}"#).unwrap();
        assert_eq!(schema.get("id"), Some(&Descriptor::INT));
        assert_eq!(schema.get("tags"), Some(&Descriptor::array(Descriptor::STRING)));
    }

    #[test]
    fn errors_carry_the_path() {
        let err = from_slice_with_path::<Options>(br#"{"max-depth": "deep"}"#).unwrap_err();
        assert_eq!(err.path, "max-depth");
        assert!(err.to_string().starts_with("at JSON path max-depth"));
    }
}
