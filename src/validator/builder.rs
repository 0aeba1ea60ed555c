use crate::validator::content::ContentRule;
use crate::validator::extensions::StrictExtensionsRule;
use crate::validator::paths::{OperationIdRule, PathsRule, VersionRule};
use crate::validator::references::ReferenceRule;
use crate::validator::security::SecurityRule;
use crate::validator::{DocumentValidator, Rule};

/// Chooses which checks a [`DocumentValidator`] runs.
///
/// The version, paths, operation id, security and content rules are always
/// on. Reference resolution and strict extension keys are opt-in.
pub struct DocumentValidatorBuilder {
    check_references: bool,
    strict_extensions: bool,
    extra_rules: Vec<Box<dyn Rule>>,
}

impl DocumentValidatorBuilder {
    pub fn new() -> Self {
        Self {
            check_references: false,
            strict_extensions: false,
            extra_rules: Vec::new(),
        }
    }

    /// Report local `$ref`s that point nowhere or loop.
    pub fn check_references(mut self, enabled: bool) -> Self {
        self.check_references = enabled;
        self
    }

    /// Report unknown keys that lack the `x-` prefix.
    pub fn strict_extensions(mut self, enabled: bool) -> Self {
        self.strict_extensions = enabled;
        self
    }

    /// Runs a caller supplied rule after the built-in ones.
    pub fn rule(mut self, rule: impl Rule + 'static) -> Self {
        self.extra_rules.push(Box::new(rule));
        self
    }

    pub fn build(self) -> DocumentValidator {
        let mut rules: Vec<Box<dyn Rule>> = vec![
            Box::new(VersionRule),
            Box::new(PathsRule),
            Box::new(OperationIdRule),
            Box::new(SecurityRule),
            Box::new(ContentRule),
        ];
        if self.check_references {
            rules.push(Box::new(ReferenceRule));
        }
        if self.strict_extensions {
            rules.push(Box::new(StrictExtensionsRule));
        }
        rules.extend(self.extra_rules);
        DocumentValidator { rules }
    }
}

impl Default for DocumentValidatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use crate::document::Document;
    use crate::types::json_path::JsonPath;
    use crate::validator::{ConformanceReport, DocumentValidator, IssueKind, Rule};

    struct RequireTitle;

    impl Rule for RequireTitle {
        fn name(&self) -> &'static str {
            "require-title"
        }

        fn check(&self, document: &Document, report: &mut ConformanceReport) {
            if document.info().title.is_empty() {
                report.push(
                    JsonPath::from_segments(["info", "title"]),
                    IssueKind::ForeignExtensionKey("title".into()),
                );
            }
        }
    }

    #[test]
    fn test_opt_in_rules() {
        let validator = DocumentValidator::builder()
            .check_references(true)
            .strict_extensions(true)
            .rule(RequireTitle)
            .build();
        assert_eq!(
            validator.rule_names(),
            vec![
                "version",
                "paths",
                "operation-ids",
                "security",
                "content",
                "references",
                "strict-extensions",
                "require-title"
            ]
        );
    }

    #[test]
    fn test_disabled_rules_stay_off() {
        let validator = DocumentValidator::builder()
            .check_references(true)
            .check_references(false)
            .build();
        assert!(!validator.rule_names().contains(&"references"));
        assert!(!validator.rule_names().contains(&"strict-extensions"));
    }
}
