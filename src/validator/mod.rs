mod builder;
mod content;
mod extensions;
mod paths;
mod references;
mod security;

pub use builder::DocumentValidatorBuilder;

use crate::document::Document;
use crate::error::{ComponentSection, OperationSection, Section};
use crate::types::json_path::JsonPath;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// A single conformance check run against a parsed document.
///
/// Rules only read the document and push whatever they find into the report,
/// so one failing check never hides another.
pub trait Rule: Send + Sync {
    fn name(&self) -> &'static str;

    fn check(&self, document: &Document, report: &mut ConformanceReport);
}

/// Runs a fixed set of [`Rule`]s over a document.
///
/// ```rust
/// use oasdoc::document::Document;
/// use oasdoc::validator::DocumentValidator;
///
/// let doc: Document = r#"{
///     "openapi": "3.0.3",
///     "info": {"title": "t", "version": "1"},
///     "paths": {"x": {}}
/// }"#
/// .parse()
/// .unwrap();
///
/// let report = DocumentValidator::default().validate(&doc);
/// assert!(!report.is_valid());
/// assert_eq!(report.issues()[0].path.to_string(), "#/paths/x");
/// ```
pub struct DocumentValidator {
    rules: Vec<Box<dyn Rule>>,
}

impl DocumentValidator {
    pub fn builder() -> DocumentValidatorBuilder {
        DocumentValidatorBuilder::new()
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn validate(&self, document: &Document) -> ConformanceReport {
        let mut report = ConformanceReport::default();
        for rule in &self.rules {
            let before = report.issues.len();
            rule.check(document, &mut report);
            log::debug!(
                "Rule '{}' raised {} issue(s)",
                rule.name(),
                report.issues.len() - before
            );
        }
        report
    }
}

impl Default for DocumentValidator {
    /// Version, paths, operation id, security and content rules.
    fn default() -> Self {
        DocumentValidatorBuilder::new().build()
    }
}

/// Everything the validator found wrong. Empty means the document conforms.
#[derive(Debug, Clone, Default, PartialEq, Error)]
#[error("document has {count} conformance issue(s)", count = .issues.len())]
pub struct ConformanceReport {
    issues: Vec<ConformanceIssue>,
}

impl ConformanceReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[ConformanceIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues raised in the given section.
    pub fn in_section<'a>(
        &'a self,
        section: &'a Section,
    ) -> impl Iterator<Item = &'a ConformanceIssue> + 'a {
        self.issues
            .iter()
            .filter(move |issue| &issue.section() == section)
    }

    /// The first issue found at `path`, if any.
    pub fn issue_at(&self, path: &JsonPath) -> Option<&ConformanceIssue> {
        self.issues.iter().find(|issue| &issue.path == path)
    }

    /// `Ok` when nothing was found, the report itself otherwise.
    pub fn into_result(self) -> Result<(), ConformanceReport> {
        if self.is_valid() { Ok(()) } else { Err(self) }
    }

    pub fn push(&mut self, path: JsonPath, kind: IssueKind) {
        log::debug!("{}: {}", path, kind);
        self.issues.push(ConformanceIssue { path, kind });
    }
}

impl IntoIterator for ConformanceReport {
    type Item = ConformanceIssue;
    type IntoIter = std::vec::IntoIter<ConformanceIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConformanceIssue {
    /// Where in the document the issue sits.
    pub path: JsonPath,
    pub kind: IssueKind,
}

impl ConformanceIssue {
    pub fn section(&self) -> Section {
        self.kind.section()
    }
}

impl Display for ConformanceIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]: {}", self.path, self.section(), self.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IssueKind {
    #[error("version `{found}` does not match {expected}")]
    InvalidVersion { found: String, expected: &'static str },

    #[error("path `{0}` does not start with `/`")]
    PathMissingLeadingSlash(String),

    #[error("parameter `{0}` is declared more than once")]
    DuplicateParameter(String),

    #[error("path parameter `{0}` is not required")]
    PathParameterNotRequired(String),

    #[error("template variable `{0}` has no path parameter")]
    UndeclaredTemplateParameter(String),

    #[error("path parameter `{0}` does not appear in the template")]
    UnusedPathParameter(String),

    #[error("operation id `{id}` is already used at {first}")]
    DuplicateOperationId { id: String, first: JsonPath },

    #[error("security scheme `{0}` is not declared")]
    UnknownSecurityScheme(String),

    #[error("scope `{scope}` is not declared by `{scheme}`")]
    UndeclaredScope { scheme: String, scope: String },

    #[error("security scheme `{0}` does not take scopes")]
    UnexpectedScopes(String),

    #[error("`{flow}` flow is missing `{field}`")]
    MissingFlowUrl { flow: String, field: &'static str },

    #[error("parameter carries both `schema` and `content`")]
    SchemaAndContent,

    #[error("parameter carries neither `schema` nor `content`")]
    MissingSchemaOrContent,

    #[error("parameter `content` must hold exactly one media type, found {0}")]
    ContentEntryCount(usize),

    #[error("both `example` and `examples` are present")]
    ExampleAndExamples,

    #[error("link carries both `operationRef` and `operationId`")]
    OperationRefAndId,

    #[error("operation declares no responses")]
    EmptyResponses,

    #[error("reference `{0}` does not resolve")]
    UnresolvedReference(String),

    #[error("reference `{0}` is part of a cycle")]
    CyclicReference(String),

    #[error("references could not be checked: {0}")]
    ReferencesNotChecked(String),

    #[error("key `{0}` is not a known field and lacks the `x-` prefix")]
    ForeignExtensionKey(String),
}

impl IssueKind {
    pub fn section(&self) -> Section {
        match self {
            IssueKind::InvalidVersion { .. } => Section::Version,
            IssueKind::PathMissingLeadingSlash(_)
            | IssueKind::UndeclaredTemplateParameter(_)
            | IssueKind::UnusedPathParameter(_) => Section::Paths(OperationSection::Template),
            IssueKind::DuplicateParameter(_)
            | IssueKind::PathParameterNotRequired(_)
            | IssueKind::SchemaAndContent
            | IssueKind::MissingSchemaOrContent
            | IssueKind::ContentEntryCount(_) => Section::Paths(OperationSection::Parameters),
            IssueKind::DuplicateOperationId { .. } => {
                Section::Paths(OperationSection::OperationId)
            }
            IssueKind::EmptyResponses => Section::Paths(OperationSection::Responses),
            IssueKind::ExampleAndExamples => Section::Paths(OperationSection::Other),
            IssueKind::UnknownSecurityScheme(_)
            | IssueKind::UndeclaredScope { .. }
            | IssueKind::UnexpectedScopes(_) => Section::Security,
            IssueKind::MissingFlowUrl { .. } => {
                Section::Components(ComponentSection::SecuritySchemes)
            }
            IssueKind::OperationRefAndId => Section::Components(ComponentSection::Links),
            IssueKind::UnresolvedReference(_)
            | IssueKind::CyclicReference(_)
            | IssueKind::ReferencesNotChecked(_) => Section::References,
            IssueKind::ForeignExtensionKey(_) => Section::Extensions,
        }
    }
}

#[cfg(test)]
mod test {
    use crate::document::Document;
    use crate::error::{OperationSection, Section};
    use crate::types::json_path::JsonPath;
    use crate::validator::{DocumentValidator, IssueKind};
    use serde_json::json;

    fn minimal(path: &str) -> Document {
        Document::from_value(json!({
            "openapi": "3.0.0",
            "info": {"title": "t", "version": "1.0"},
            "paths": {path: {"get": {"operationId": "getX",
                "responses": {"200": {"description": "ok"}}}}}
        }))
        .unwrap()
    }

    #[test]
    fn test_default_rules() {
        let validator = DocumentValidator::default();
        assert_eq!(
            validator.rule_names(),
            vec!["version", "paths", "operation-ids", "security", "content"]
        );
    }

    #[test]
    fn test_minimal_document_passes() {
        let report = DocumentValidator::default().validate(&minimal("/x"));
        assert!(report.is_valid(), "{:?}", report);
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_missing_leading_slash_is_flagged() {
        let report = DocumentValidator::default().validate(&minimal("x"));
        assert_eq!(report.len(), 1);
        let issue = &report.issues()[0];
        assert_eq!(issue.kind, IssueKind::PathMissingLeadingSlash("x".into()));
        assert_eq!(issue.path, JsonPath::from_segments(["paths", "x"]));
        assert_eq!(issue.section(), Section::Paths(OperationSection::Template));
        assert_eq!(
            issue.to_string(),
            "#/paths/x [paths --> template]: path `x` does not start with `/`"
        );
        assert_eq!(
            report.in_section(&Section::Paths(OperationSection::Template)).count(),
            1
        );
        assert!(report.issue_at(&JsonPath::from_segments(["paths", "x"])).is_some());

        let err = report.into_result().unwrap_err();
        assert_eq!(err.to_string(), "document has 1 conformance issue(s)");
    }
}
