//! Schema-driven JSON sanitizer.
//!
//! A document is checked against a [`Schema`] of type descriptors. Every
//! problem is collected as an [`Issue`]; if any of them is an error the whole
//! document is rejected with one [`Failure`]. Otherwise the document comes
//! back coerced into canonical typed form.
//!
//! ```
//! use json_sanitizer::{sanitize, Schema, Descriptor};
//!
//! let schema = Schema::new()
//!     .field("id", Descriptor::INT)
//!     .field("phone", Descriptor::PHONE);
//! let out = sanitize(r#"{"id": "42", "phone": "8 (950) 288-56-23"}"#, &schema).unwrap();
//! assert_eq!(out.value().to_string(), r#"{"id":42,"phone":"79502885623"}"#);
//! ```
pub mod coerce;
pub mod config;
pub mod descriptor;
pub mod issue;
pub mod normalize;
pub mod path_de;
pub mod pretty;
pub mod sanitizer;
pub mod validate;
pub mod value;

pub use config::{ConfigError, ConfigFile};
pub use descriptor::{Descriptor, Schema, ScalarTag};
pub use issue::{Failure, FieldPath, Issue, IssueCode, Severity};
pub use normalize::ContractViolation;
pub use sanitizer::{Options, SanitizeError, Sanitized, Sanitizer, WarningPolicy, sanitize};
pub use validate::ElementPaths;
pub use value::{ParseError, Value};
