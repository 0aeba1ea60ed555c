//! Typed model of OpenAPI 3.0 and Swagger 2.0 documents.
//!
//! Documents are read from JSON or YAML into [`Document`], which keeps every
//! `x-` extension so writing it back out loses nothing. Structural rules that
//! the types cannot express are checked by [`validator::DocumentValidator`].
//!
//! ```rust
//! use oasdoc::Document;
//!
//! let doc: Document = r#"
//! openapi: 3.0.0
//! info: {title: Pets, version: '1.0'}
//! paths:
//!   /pets:
//!     get:
//!       operationId: listPets
//!       responses:
//!         '200': {description: ok}
//! x-custom: 1
//! "#
//! .parse()
//! .unwrap();
//!
//! assert_eq!(doc.operation_ids(), vec!["listPets"]);
//! assert!(doc.validate().is_valid());
//! assert_eq!(doc.to_value().unwrap()["x-custom"], 1);
//! ```

pub mod cache;
pub mod document;
pub mod error;
pub mod openapi_common;
pub mod openapi_v30x;
pub mod swagger_v20;
pub mod traverser;
pub mod types;
pub mod validator;

pub use document::Document;
pub use error::{DocumentError, ShapeError};
pub use openapi_common::{Extensible, Reference, ReferenceOr};
pub use types::version::SpecVersion;

const OPENAPI_FIELD: &'static str = "openapi";
const SWAGGER_FIELD: &'static str = "swagger";
const PATHS_FIELD: &'static str = "paths";
const PARAMETERS_FIELD: &'static str = "parameters";
const REF_FIELD: &'static str = "$ref";
const PATH_SEPARATOR: &'static str = "/";
const TILDE: &'static str = "~";
const ENCODED_SLASH: &'static str = "~1";
const ENCODED_TILDE: &'static str = "~0";
const EXTENSION_PREFIX: &'static str = "x-";
const DEFAULT_RESPONSE: &'static str = "default";
const PATH_LOCATION: &'static str = "path";
const BODY_LOCATION: &'static str = "body";
