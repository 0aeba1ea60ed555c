use crate::{OPENAPI_FIELD, SWAGGER_FIELD};
use regex::Regex;
use serde_json::Value;
use std::fmt::{Display, Formatter};
use std::sync::OnceLock;
use thiserror::Error;

static OPENAPI_3_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

fn openapi_3_pattern() -> Option<&'static Regex> {
    OPENAPI_3_PATTERN
        .get_or_init(|| Regex::new(r"^3\.\d+\.\d+$").ok())
        .as_ref()
}

/// True when `version` has the `3.<minor>.<patch>` form.
pub fn is_openapi_3_version(version: &str) -> bool {
    openapi_3_pattern().is_some_and(|pattern| pattern.is_match(version))
}

pub fn is_swagger_2_version(version: &str) -> bool {
    version == "2.0"
}

/// Which of the two document shapes a root value has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecVersion {
    Swagger2,
    OpenApi3,
}

impl SpecVersion {
    /// Picks the shape from the root's version field.
    ///
    /// Detection only looks at which field is present; whether its content
    /// follows the version pattern is left to the conformance checks.
    pub fn detect(document: &Value) -> Result<Self, VersionError> {
        let root = document.as_object().ok_or(VersionError::NotAnObject)?;
        let swagger = root.get(SWAGGER_FIELD);
        let openapi = root.get(OPENAPI_FIELD);
        match (swagger, openapi) {
            (Some(_), Some(_)) => Err(VersionError::Ambiguous),
            (None, None) => Err(VersionError::Missing),
            (Some(version), None) => {
                let version = Self::require_str(SWAGGER_FIELD, version)?;
                if !is_swagger_2_version(version) {
                    log::warn!("Reading swagger {} document with the 2.0 model", version);
                }
                Ok(SpecVersion::Swagger2)
            }
            (None, Some(version)) => {
                let version = Self::require_str(OPENAPI_FIELD, version)?;
                if !version.starts_with("3.") {
                    return Err(VersionError::unsupported_version(version));
                }
                if !version.starts_with("3.0.") {
                    log::warn!("Reading openapi {} document with the 3.0 model", version);
                }
                Ok(SpecVersion::OpenApi3)
            }
        }
    }

    /// Name of the root field that carries the version.
    pub fn field(&self) -> &'static str {
        match self {
            SpecVersion::Swagger2 => SWAGGER_FIELD,
            SpecVersion::OpenApi3 => OPENAPI_FIELD,
        }
    }

    fn require_str<'a>(field: &'static str, value: &'a Value) -> Result<&'a str, VersionError> {
        value.as_str().ok_or(VersionError::NotAString(field))
    }
}

impl Display for SpecVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SpecVersion::Swagger2 => write!(f, "Swagger 2.0"),
            SpecVersion::OpenApi3 => write!(f, "OpenAPI 3.0"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("document root must be an object")]
    NotAnObject,

    #[error("document declares neither `swagger` nor `openapi`")]
    Missing,

    #[error("document declares both `swagger` and `openapi`")]
    Ambiguous,

    #[error("`{0}` must be a string")]
    NotAString(&'static str),

    #[error("Unsupported version: {0}")]
    UnsupportedVersion(String),
}

impl VersionError {
    pub(crate) fn unsupported_version<T>(version: &T) -> Self
    where
        T: ToString + ?Sized,
    {
        VersionError::UnsupportedVersion(version.to_string())
    }
}

#[cfg(test)]
mod test {
    use crate::types::version::{
        SpecVersion, VersionError, is_openapi_3_version, is_swagger_2_version,
    };
    use serde_json::json;

    #[test]
    fn test_detect_by_field() {
        assert_eq!(
            SpecVersion::detect(&json!({"swagger": "2.0"})).unwrap(),
            SpecVersion::Swagger2
        );
        assert_eq!(
            SpecVersion::detect(&json!({"openapi": "3.0.3"})).unwrap(),
            SpecVersion::OpenApi3
        );
    }

    #[test]
    fn test_detect_newer_minor_is_lenient() {
        assert_eq!(
            SpecVersion::detect(&json!({"openapi": "3.1.0"})).unwrap(),
            SpecVersion::OpenApi3
        );
    }

    #[test]
    fn test_detect_errors() {
        assert_eq!(
            SpecVersion::detect(&json!({"swagger": "2.0", "openapi": "3.0.0"})),
            Err(VersionError::Ambiguous)
        );
        assert_eq!(
            SpecVersion::detect(&json!({"info": {}})),
            Err(VersionError::Missing)
        );
        assert_eq!(
            SpecVersion::detect(&json!({"openapi": 3})),
            Err(VersionError::NotAString("openapi"))
        );
        assert_eq!(
            SpecVersion::detect(&json!({"openapi": "2.0"})),
            Err(VersionError::UnsupportedVersion("2.0".to_string()))
        );
        assert_eq!(
            SpecVersion::detect(&json!([])),
            Err(VersionError::NotAnObject)
        );
    }

    #[test]
    fn test_openapi_version_pattern() {
        assert!(is_openapi_3_version("3.0.0"));
        assert!(is_openapi_3_version("3.0.12"));
        assert!(!is_openapi_3_version("3.0"));
        assert!(!is_openapi_3_version("3.0.0-rc1"));
        assert!(!is_openapi_3_version("v3.0.0"));
        assert!(!is_openapi_3_version("2.0"));
    }

    #[test]
    fn test_swagger_version() {
        assert!(is_swagger_2_version("2.0"));
        assert!(!is_swagger_2_version("2.0.0"));
    }
}
