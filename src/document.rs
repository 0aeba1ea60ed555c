use crate::error::DocumentError;
use crate::openapi_common::Info;
use crate::openapi_v30x::OpenApi;
use crate::swagger_v20::Swagger;
use crate::types::version::SpecVersion;
use crate::validator::{ConformanceReport, DocumentValidator};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;
use std::str::FromStr;

/// A parsed API description in either supported format.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Document {
    Swagger(Box<Swagger>),
    OpenApi(Box<OpenApi>),
}

impl Document {
    /// Reads a JSON tree, picking the shape by the root's version field.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let version = SpecVersion::detect(&value)?;
        log::debug!("Reading {} document", version);
        match version {
            SpecVersion::Swagger2 => serde_json::from_value(value)
                .map(|swagger| Document::Swagger(Box::new(swagger)))
                .map_err(DocumentError::from_json),
            SpecVersion::OpenApi3 => serde_json::from_value(value)
                .map(|openapi| Document::OpenApi(Box::new(openapi)))
                .map_err(DocumentError::from_json),
        }
    }

    pub fn from_json_str(input: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(input).map_err(DocumentError::from_json)?;
        Self::from_value(value)
    }

    pub fn from_yaml_str(input: &str) -> Result<Self, DocumentError> {
        let value: Value =
            serde_yaml::from_str(input).map_err(|e| DocumentError::malformed(e.to_string()))?;
        Self::from_value(value)
    }

    /// Reads a file, choosing the format from its extension.
    pub fn from_file<P>(file_path: P) -> Result<Self, DocumentError>
    where
        P: AsRef<Path>,
    {
        let path = file_path.as_ref();
        let content = std::fs::read_to_string(path)?;
        log::debug!("Loaded {} bytes from {}", content.len(), path.display());
        match path.extension().and_then(|extension| extension.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => content.parse(),
        }
    }

    pub fn version(&self) -> SpecVersion {
        match self {
            Document::Swagger(_) => SpecVersion::Swagger2,
            Document::OpenApi(_) => SpecVersion::OpenApi3,
        }
    }

    /// The version string exactly as written in the document.
    pub fn version_string(&self) -> &str {
        match self {
            Document::Swagger(swagger) => &swagger.swagger,
            Document::OpenApi(openapi) => &openapi.openapi,
        }
    }

    pub fn info(&self) -> &Info {
        match self {
            Document::Swagger(swagger) => &swagger.info,
            Document::OpenApi(openapi) => &openapi.info,
        }
    }

    pub fn as_openapi(&self) -> Option<&OpenApi> {
        match self {
            Document::OpenApi(openapi) => Some(openapi),
            Document::Swagger(_) => None,
        }
    }

    pub fn as_swagger(&self) -> Option<&Swagger> {
        match self {
            Document::Swagger(swagger) => Some(swagger),
            Document::OpenApi(_) => None,
        }
    }

    /// Path templates declared under `paths`.
    pub fn path_templates(&self) -> Vec<&str> {
        match self {
            Document::Swagger(swagger) => swagger.paths.keys().map(String::as_str).collect(),
            Document::OpenApi(openapi) => openapi.paths.keys().map(String::as_str).collect(),
        }
    }

    /// Every declared operation id, in path and method order.
    pub fn operation_ids(&self) -> Vec<&str> {
        match self {
            Document::Swagger(swagger) => swagger
                .operations()
                .into_iter()
                .filter_map(|entry| entry.operation_id())
                .collect(),
            Document::OpenApi(openapi) => openapi
                .operations()
                .into_iter()
                .filter_map(|entry| entry.operation_id())
                .collect(),
        }
    }

    pub fn to_value(&self) -> Result<Value, DocumentError> {
        serde_json::to_value(self).map_err(DocumentError::from_json)
    }

    /// Pretty printed JSON.
    pub fn to_json_string(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self).map_err(DocumentError::from_json)
    }

    pub fn to_yaml_string(&self) -> Result<String, DocumentError> {
        serde_yaml::to_string(self).map_err(|e| DocumentError::shape_mismatch(e.to_string()))
    }

    /// Runs the default conformance checks.
    pub fn validate(&self) -> ConformanceReport {
        DocumentValidator::default().validate(self)
    }
}

/// Reads either format. Text opening with `{` is treated as JSON.
impl FromStr for Document {
    type Err = DocumentError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.trim_start().starts_with('{') {
            Self::from_json_str(input)
        } else {
            Self::from_yaml_str(input)
        }
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Document::from_value(value).map_err(D::Error::custom)
    }
}

impl From<OpenApi> for Document {
    fn from(openapi: OpenApi) -> Self {
        Document::OpenApi(Box::new(openapi))
    }
}

impl From<Swagger> for Document {
    fn from(swagger: Swagger) -> Self {
        Document::Swagger(Box::new(swagger))
    }
}

#[cfg(test)]
mod test {
    use crate::document::Document;
    use crate::error::DocumentError;
    use crate::openapi_common::Extensible;
    use crate::types::version::{SpecVersion, VersionError};
    use http::Method;
    use serde_json::json;
    use std::io::Write;

    const PETSTORE_YAML: &str = r#"
openapi: 3.0.1
info:
  title: Petstore
  version: 1.0.0
  x-audience: public
paths:
  /pets:
    get:
      operationId: listPets
      parameters:
        - name: limit
          in: query
          schema:
            type: integer
            maximum: 100
      responses:
        200:
          description: A list of pets
          content:
            application/json:
              schema:
                type: array
                items:
                  $ref: '#/components/schemas/Pet'
components:
  schemas:
    Pet:
      type: object
      required: [id]
      properties:
        id:
          type: integer
          format: int64
"#;

    #[test]
    fn test_minimal_openapi_document() {
        let doc = Document::from_json_str(
            r#"{"openapi": "3.0.0", "info": {"title": "t", "version": "1.0"},
                "paths": {"/x": {"get": {"operationId": "getX",
                "responses": {"200": {"description": "ok"}}}}}}"#,
        )
        .unwrap();
        assert_eq!(doc.version(), SpecVersion::OpenApi3);
        let openapi = doc.as_openapi().unwrap();
        assert_eq!(
            openapi.paths.get("/x").unwrap().get.as_ref().unwrap().operation_id,
            "getX"
        );
        assert!(doc.validate().is_valid());
    }

    #[test]
    fn test_yaml_document() {
        let doc = PETSTORE_YAML.parse::<Document>().unwrap();
        assert_eq!(doc.version_string(), "3.0.1");
        assert_eq!(doc.info().title, "Petstore");
        assert_eq!(doc.info().extension("x-audience"), Some(&json!("public")));
        let openapi = doc.as_openapi().unwrap();
        let list = openapi.operation("/pets", &Method::GET).unwrap();
        assert!(list.responses.status(200).is_some());
        assert_eq!(doc.operation_ids(), vec!["listPets"]);
        assert_eq!(doc.path_templates(), vec!["/pets"]);
    }

    #[test]
    fn test_extension_round_trip() {
        let raw = json!({
            "swagger": "2.0",
            "info": {"title": "t", "version": "1"},
            "paths": {},
            "x-custom": 1
        });
        let doc = Document::from_value(raw.clone()).unwrap();
        assert_eq!(doc.version(), SpecVersion::Swagger2);
        assert_eq!(doc.to_value().unwrap(), raw);
    }

    #[test]
    fn test_explicit_null_round_trip() {
        let raw = json!({
            "openapi": "3.0.0",
            "info": {"title": "t", "version": "1"},
            "paths": {
                "/pets": {
                    "get": {
                        "operationId": "listPets",
                        "parameters": [
                            {"name": "tag", "in": "query", "schema": {"type": "string"}, "example": null}
                        ],
                        "responses": {"200": {"description": "ok"}}
                    }
                }
            },
            "components": {
                "schemas": {
                    "Nickname": {"type": "string", "nullable": true, "default": null, "example": null}
                }
            }
        });
        let doc = Document::from_value(raw.clone()).unwrap();
        assert_eq!(doc.to_value().unwrap(), raw);

        let raw = json!({
            "swagger": "2.0",
            "info": {"title": "t", "version": "1"},
            "paths": {},
            "definitions": {"Nickname": {"type": "string", "default": null, "example": null}}
        });
        let doc = Document::from_value(raw.clone()).unwrap();
        assert_eq!(doc.to_value().unwrap(), raw);
    }

    #[test]
    fn test_yaml_and_json_output_agree() {
        let doc = PETSTORE_YAML.parse::<Document>().unwrap();
        let from_json = Document::from_json_str(&doc.to_json_string().unwrap()).unwrap();
        let from_yaml = Document::from_yaml_str(&doc.to_yaml_string().unwrap()).unwrap();
        assert_eq!(from_json, doc);
        assert_eq!(from_yaml, doc);
    }

    #[test]
    fn test_error_taxonomy() {
        assert!(matches!(
            Document::from_json_str("{\"openapi\": \"3.0.0\""),
            Err(DocumentError::Malformed(_))
        ));
        assert!(matches!(
            Document::from_yaml_str("openapi: [3.0.0"),
            Err(DocumentError::Malformed(_))
        ));
        assert!(matches!(
            Document::from_value(json!({"openapi": "3.0.0", "paths": {}})),
            Err(DocumentError::ShapeMismatch(_))
        ));
        assert!(matches!(
            Document::from_value(json!({"info": {"title": "t", "version": "1"}})),
            Err(DocumentError::Version(VersionError::Missing))
        ));
    }

    #[test]
    fn test_reference_with_siblings_is_a_shape_mismatch() {
        let result = Document::from_value(json!({
            "swagger": "2.0",
            "info": {"title": "t", "version": "1"},
            "paths": {},
            "definitions": {
                "Pet": {"$ref": "#/definitions/Animal", "description": "sibling"}
            }
        }));
        match result {
            Err(DocumentError::ShapeMismatch(message)) => {
                assert!(message.contains("sibling keys"), "{}", message)
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_serde_deserialize_detects_version() {
        let doc: Document = serde_json::from_value(json!({
            "swagger": "2.0",
            "info": {"title": "t", "version": "1"},
            "paths": {}
        }))
        .unwrap();
        assert!(doc.as_swagger().is_some());
        assert!(doc.as_openapi().is_none());
    }

    #[test]
    fn test_from_file_by_extension() {
        let mut yaml = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        yaml.write_all(PETSTORE_YAML.as_bytes()).unwrap();
        let doc = Document::from_file(yaml.path()).unwrap();
        assert_eq!(doc.info().title, "Petstore");

        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        json.write_all(doc.to_json_string().unwrap().as_bytes()).unwrap();
        assert_eq!(Document::from_file(json.path()).unwrap(), doc);

        assert!(matches!(
            Document::from_file("/definitely/not/here.yaml"),
            Err(DocumentError::Io(_))
        ));
    }
}
