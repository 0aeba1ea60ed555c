use crate::document::Document;
use crate::openapi_common::{ExtensibleMap, ReferenceOr};
use crate::traverser::{merge_parameters, operations, template_variables};
use crate::types::json_path::JsonPath;
use crate::types::version::{is_openapi_3_version, is_swagger_2_version};
use crate::types::{OperationView, ParameterView, PathItemView};
use crate::validator::{ConformanceReport, IssueKind, Rule};
use crate::{OPENAPI_FIELD, PARAMETERS_FIELD, PATH_SEPARATOR, PATHS_FIELD, SWAGGER_FIELD};
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap, HashSet};

const OPERATION_ID_FIELD: &str = "operationId";

/// The declared version must be one this model describes exactly.
pub(crate) struct VersionRule;

impl Rule for VersionRule {
    fn name(&self) -> &'static str {
        "version"
    }

    fn check(&self, document: &Document, report: &mut ConformanceReport) {
        let (field, conforms, expected) = match document {
            Document::OpenApi(openapi) => (
                OPENAPI_FIELD,
                is_openapi_3_version(&openapi.openapi),
                "3.<minor>.<patch>",
            ),
            Document::Swagger(swagger) => {
                (SWAGGER_FIELD, is_swagger_2_version(&swagger.swagger), "2.0")
            }
        };
        if !conforms {
            report.push(
                JsonPath::from_segments([field]),
                IssueKind::InvalidVersion {
                    found: document.version_string().to_string(),
                    expected,
                },
            );
        }
    }
}

/// Path keys, path parameters and their templates.
pub(crate) struct PathsRule;

impl Rule for PathsRule {
    fn name(&self) -> &'static str {
        "paths"
    }

    fn check(&self, document: &Document, report: &mut ConformanceReport) {
        match document {
            Document::OpenApi(openapi) => check_paths(&openapi.paths, report),
            Document::Swagger(swagger) => check_paths(&swagger.paths, report),
        }
    }
}

fn check_paths<I>(paths: &ExtensibleMap<I>, report: &mut ConformanceReport)
where
    I: PathItemView,
{
    for (template, path_item) in paths.iter() {
        let item_path = JsonPath::from_segments([PATHS_FIELD, template.as_str()]);
        if !template.starts_with(PATH_SEPARATOR) {
            report.push(
                item_path.clone(),
                IssueKind::PathMissingLeadingSlash(template.clone()),
            );
        }
        check_parameter_list(
            path_item.parameters(),
            &item_path.join(PARAMETERS_FIELD),
            report,
        );

        for (method, operation) in path_item.operations() {
            let operation_path = item_path.join(method.as_str().to_lowercase());
            check_parameter_list(
                operation.parameters(),
                &operation_path.join(PARAMETERS_FIELD),
                report,
            );
            let effective = merge_parameters(path_item.parameters(), operation.parameters());
            check_template(template, &effective, &operation_path, report);
        }
    }
}

/// No (`name`, `in`) pair twice, and every path parameter required.
fn check_parameter_list<P>(
    parameters: &[ReferenceOr<P>],
    path: &JsonPath,
    report: &mut ConformanceReport,
) where
    P: ParameterView,
{
    let mut seen = HashSet::new();
    for (index, parameter) in parameters.iter().enumerate() {
        let ReferenceOr::Item(parameter) = parameter else {
            continue;
        };
        let parameter_path = path.join(index.to_string());
        let key = parameter.key();
        if parameter.is_path() && !parameter.is_required() {
            report.push(
                parameter_path.clone(),
                IssueKind::PathParameterNotRequired(key.name.clone()),
            );
        }
        if !seen.insert(key.clone()) {
            report.push(parameter_path, IssueKind::DuplicateParameter(key.to_string()));
        }
    }
}

/// Template variables and effective path parameters must name each other.
/// Skipped when a reference hides a parameter's name.
fn check_template<P>(
    template: &str,
    effective: &[&ReferenceOr<P>],
    operation_path: &JsonPath,
    report: &mut ConformanceReport,
) where
    P: ParameterView,
{
    if effective.iter().any(|parameter| parameter.is_reference()) {
        log::debug!(
            "Skipping template check of {}, parameters hold references",
            operation_path
        );
        return;
    }
    let declared: BTreeSet<&str> = effective
        .iter()
        .filter_map(|parameter| parameter.as_item())
        .filter(|parameter| parameter.is_path())
        .map(|parameter| parameter.name())
        .collect();
    let variables: BTreeSet<&str> = template_variables(template).into_iter().collect();

    for variable in variables.difference(&declared) {
        report.push(
            operation_path.clone(),
            IssueKind::UndeclaredTemplateParameter(variable.to_string()),
        );
    }
    for name in declared.difference(&variables) {
        report.push(
            operation_path.join(PARAMETERS_FIELD),
            IssueKind::UnusedPathParameter(name.to_string()),
        );
    }
}

/// Operation ids must be unique across the whole document.
pub(crate) struct OperationIdRule;

impl Rule for OperationIdRule {
    fn name(&self) -> &'static str {
        "operation-ids"
    }

    fn check(&self, document: &Document, report: &mut ConformanceReport) {
        let located: Vec<(JsonPath, &str)> = match document {
            Document::OpenApi(openapi) => operations(&openapi.paths)
                .iter()
                .filter_map(|entry| Some((entry.pointer(), entry.operation_id()?)))
                .collect(),
            Document::Swagger(swagger) => operations(&swagger.paths)
                .iter()
                .filter_map(|entry| Some((entry.pointer(), entry.operation_id()?)))
                .collect(),
        };

        let mut first_seen: HashMap<&str, JsonPath> = HashMap::new();
        for (operation_path, id) in located {
            match first_seen.entry(id) {
                Entry::Occupied(first) => report.push(
                    operation_path.join(OPERATION_ID_FIELD),
                    IssueKind::DuplicateOperationId {
                        id: id.to_string(),
                        first: first.get().clone(),
                    },
                ),
                Entry::Vacant(vacant) => {
                    vacant.insert(operation_path.join(OPERATION_ID_FIELD));
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use crate::document::Document;
    use crate::types::json_path::JsonPath;
    use crate::validator::paths::{OperationIdRule, PathsRule, VersionRule};
    use crate::validator::{ConformanceReport, IssueKind, Rule};
    use serde_json::{Value, json};

    fn run(rule: &dyn Rule, value: Value) -> ConformanceReport {
        let document = Document::from_value(value).unwrap();
        let mut report = ConformanceReport::default();
        rule.check(&document, &mut report);
        report
    }

    fn openapi(paths: Value) -> Value {
        json!({
            "openapi": "3.0.2",
            "info": {"title": "t", "version": "1"},
            "paths": paths
        })
    }

    #[test]
    fn test_version_pattern() {
        let mut doc = openapi(json!({}));
        assert!(run(&VersionRule, doc.clone()).is_valid());

        doc["openapi"] = json!("3.0");
        let report = run(&VersionRule, doc);
        assert_eq!(report.issues()[0].path, JsonPath::from_segments(["openapi"]));
        assert!(matches!(
            &report.issues()[0].kind,
            IssueKind::InvalidVersion { found, .. } if found == "3.0"
        ));
    }

    #[test]
    fn test_swagger_version_must_be_exact() {
        let report = run(
            &VersionRule,
            json!({"swagger": "2.1", "info": {"title": "t", "version": "1"}, "paths": {}}),
        );
        assert_eq!(report.len(), 1);
        assert_eq!(report.issues()[0].path, JsonPath::from_segments(["swagger"]));
    }

    #[test]
    fn test_template_and_parameters_must_agree() {
        let report = run(
            &PathsRule,
            openapi(json!({
                "/pets/{petId}": {
                    "get": {
                        "operationId": "getPet",
                        "parameters": [
                            {"name": "ownerId", "in": "path", "required": true, "schema": {"type": "string"}}
                        ],
                        "responses": {"200": {"description": "ok"}}
                    }
                }
            })),
        );
        let kinds: Vec<&IssueKind> = report.issues().iter().map(|issue| &issue.kind).collect();
        assert_eq!(
            kinds,
            vec![
                &IssueKind::UndeclaredTemplateParameter("petId".into()),
                &IssueKind::UnusedPathParameter("ownerId".into())
            ]
        );
        assert_eq!(
            report.issues()[0].path,
            JsonPath::from_segments(["paths", "/pets/{petId}", "get"])
        );
    }

    #[test]
    fn test_path_level_parameters_count_for_the_template() {
        let report = run(
            &PathsRule,
            openapi(json!({
                "/pets/{petId}": {
                    "parameters": [
                        {"name": "petId", "in": "path", "required": true, "schema": {"type": "string"}}
                    ],
                    "get": {"operationId": "getPet", "responses": {"200": {"description": "ok"}}}
                }
            })),
        );
        assert!(report.is_valid(), "{:?}", report);
    }

    #[test]
    fn test_references_skip_template_check() {
        let report = run(
            &PathsRule,
            openapi(json!({
                "/pets/{petId}": {
                    "get": {
                        "operationId": "getPet",
                        "parameters": [{"$ref": "#/components/parameters/PetId"}],
                        "responses": {"200": {"description": "ok"}}
                    }
                }
            })),
        );
        assert!(report.is_valid(), "{:?}", report);
    }

    #[test]
    fn test_duplicate_and_optional_path_parameters() {
        let report = run(
            &PathsRule,
            openapi(json!({
                "/pets/{petId}": {
                    "parameters": [
                        {"name": "petId", "in": "path", "schema": {"type": "string"}},
                        {"name": "petId", "in": "path", "required": true, "schema": {"type": "string"}},
                        {"name": "petId", "in": "query", "schema": {"type": "string"}}
                    ]
                }
            })),
        );
        assert_eq!(report.len(), 2, "{:?}", report);
        assert_eq!(
            report.issues()[0].kind,
            IssueKind::PathParameterNotRequired("petId".into())
        );
        assert_eq!(
            report.issues()[1].kind,
            IssueKind::DuplicateParameter("petId (path)".into())
        );
        assert_eq!(
            report.issues()[1].path,
            JsonPath::from_segments(["paths", "/pets/{petId}", "parameters", "1"])
        );
    }

    #[test]
    fn test_duplicate_operation_ids() {
        let report = run(
            &OperationIdRule,
            json!({
                "swagger": "2.0",
                "info": {"title": "t", "version": "1"},
                "paths": {
                    "/a": {"get": {"operationId": "same", "responses": {}}},
                    "/b": {
                        "get": {"operationId": "same", "responses": {}},
                        "post": {"responses": {}}
                    }
                }
            }),
        );
        assert_eq!(report.len(), 1);
        let issue = &report.issues()[0];
        assert_eq!(
            issue.path,
            JsonPath::from_segments(["paths", "/b", "get", "operationId"])
        );
        assert_eq!(
            issue.kind,
            IssueKind::DuplicateOperationId {
                id: "same".into(),
                first: JsonPath::from_segments(["paths", "/a", "get", "operationId"]),
            }
        );
        assert_eq!(
            issue.to_string(),
            "#/paths/~1b/get/operationId [paths --> operation id]: \
             operation id `same` is already used at #/paths/~1a/get/operationId"
        );
    }
}
