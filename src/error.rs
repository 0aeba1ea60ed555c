use crate::types::version::VersionError;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// The part of a document a conformance issue was raised against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    Version,
    Paths(OperationSection),
    Components(ComponentSection),
    Security,
    References,
    Extensions,
}

impl Display for Section {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Section::Version => write!(f, "version"),
            Section::Paths(operation) => write!(f, "paths --> {}", operation),
            Section::Components(component) => write!(f, "components --> {}", component),
            Section::Security => write!(f, "security"),
            Section::References => write!(f, "references"),
            Section::Extensions => write!(f, "extensions"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentSection {
    Schemas,
    Parameters,
    Responses,
    SecuritySchemes,
    Links,
}

impl Display for ComponentSection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentSection::Schemas => write!(f, "schemas"),
            ComponentSection::Parameters => write!(f, "parameters"),
            ComponentSection::Responses => write!(f, "responses"),
            ComponentSection::SecuritySchemes => write!(f, "security schemes"),
            ComponentSection::Links => write!(f, "links"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationSection {
    Template,
    Parameters,
    RequestBody,
    Responses,
    OperationId,
    Other,
}

impl Display for OperationSection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationSection::Template => write!(f, "template"),
            OperationSection::Parameters => write!(f, "parameters"),
            OperationSection::RequestBody => write!(f, "request body"),
            OperationSection::Responses => write!(f, "responses"),
            OperationSection::OperationId => write!(f, "operation id"),
            OperationSection::Other => write!(f, "other"),
        }
    }
}

/// Failure to turn input text or a JSON tree into a [`crate::document::Document`].
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The input is not syntactically valid JSON or YAML.
    #[error("malformed document: {0}")]
    Malformed(String),

    /// The input parsed, but a node does not fit the shape it must have.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// The document root does not declare a usable version.
    #[error(transparent)]
    Version(#[from] VersionError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DocumentError {
    #[inline]
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    #[inline]
    pub(crate) fn shape_mismatch(message: impl Into<String>) -> Self {
        Self::ShapeMismatch(message.into())
    }

    /// Sorts a `serde_json` failure into the syntax or shape bucket.
    pub(crate) fn from_json(error: serde_json::Error) -> Self {
        match error.classify() {
            serde_json::error::Category::Data => Self::shape_mismatch(error.to_string()),
            serde_json::error::Category::Syntax
            | serde_json::error::Category::Eof
            | serde_json::error::Category::Io => Self::malformed(error.to_string()),
        }
    }
}

/// Structural rules a node breaks while being read into a typed shape.
///
/// These surface through serde as `DocumentError::ShapeMismatch`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("body parameter `{name}` must not carry `{field}`")]
    BodyParameterField { name: String, field: &'static str },

    #[error("body parameter `{0}` is missing `schema`")]
    BodyParameterMissingSchema(String),

    #[error("parameter `{0}` is missing `type`")]
    MissingParameterType(String),

    #[error("parameter `{0}` carries `schema` but is not in the body")]
    UnexpectedSchema(String),

    #[error("path parameter `{0}` must declare `required: true`")]
    PathParameterNotRequired(String),

    #[error("example carries both `value` and `externalValue`")]
    ExampleValueConflict,

    #[error("reference object `{reference}` must not carry sibling keys: {siblings}")]
    ReferenceSiblings { reference: String, siblings: String },
}

impl ShapeError {
    #[inline]
    pub(crate) fn body_parameter_field(name: impl Into<String>, field: &'static str) -> Self {
        Self::BodyParameterField {
            name: name.into(),
            field,
        }
    }

    #[inline]
    pub(crate) fn reference_siblings<'a>(
        reference: impl Into<String>,
        siblings: impl IntoIterator<Item = &'a String>,
    ) -> Self {
        Self::ReferenceSiblings {
            reference: reference.into(),
            siblings: siblings
                .into_iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::error::{DocumentError, OperationSection, Section, ShapeError};

    #[test]
    fn test_json_syntax_errors_are_malformed() {
        let err = serde_json::from_str::<serde_json::Value>("{\"openapi\": ").unwrap_err();
        assert!(matches!(
            DocumentError::from_json(err),
            DocumentError::Malformed(_)
        ));
    }

    #[test]
    fn test_json_data_errors_are_shape_mismatches() {
        let err = serde_json::from_str::<u64>("\"text\"").unwrap_err();
        assert!(matches!(
            DocumentError::from_json(err),
            DocumentError::ShapeMismatch(_)
        ));
    }

    #[test]
    fn test_section_display() {
        let section = Section::Paths(OperationSection::Parameters);
        assert_eq!(section.to_string(), "paths --> parameters");
    }

    #[test]
    fn test_reference_siblings_message() {
        let siblings = vec!["description".to_string(), "x-note".to_string()];
        let err = ShapeError::reference_siblings("#/definitions/Pet", &siblings);
        assert_eq!(
            err.to_string(),
            "reference object `#/definitions/Pet` must not carry sibling keys: description, x-note"
        );
    }
}
