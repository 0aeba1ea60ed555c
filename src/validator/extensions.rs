use crate::document::Document;
use crate::openapi_common::{Extensible, ExtensibleMap, ReferenceOr};
use crate::traverser::operations;
use crate::types::json_path::JsonPath;
use crate::types::{OperationView, PathItemView};
use crate::validator::{ConformanceReport, IssueKind, Rule};
use crate::{PARAMETERS_FIELD, PATHS_FIELD};
use std::collections::BTreeMap;

const INFO_FIELD: &str = "info";
const RESPONSES_FIELD: &str = "responses";

/// Unknown keys are kept as extensions when reading. This rule reports the
/// ones that lack the `x-` prefix, which usually means a misspelled field.
pub(crate) struct StrictExtensionsRule;

impl Rule for StrictExtensionsRule {
    fn name(&self) -> &'static str {
        "strict-extensions"
    }

    fn check(&self, document: &Document, report: &mut ConformanceReport) {
        check_keys(document.info(), &JsonPath::from_segments([INFO_FIELD]), report);
        match document {
            Document::OpenApi(openapi) => {
                check_keys(&**openapi, &JsonPath::new(), report);
                check_paths(&openapi.paths, report);
                for entry in operations(&openapi.paths) {
                    check_responses(
                        &entry.operation.responses,
                        &entry.pointer().join(RESPONSES_FIELD),
                        report,
                    );
                }
                if let Some(schemas) = openapi
                    .components
                    .as_ref()
                    .and_then(|components| components.schemas.as_ref())
                {
                    check_schemas(
                        schemas,
                        &JsonPath::from_segments(["components", "schemas"]),
                        report,
                    );
                }
            }
            Document::Swagger(swagger) => {
                check_keys(&**swagger, &JsonPath::new(), report);
                check_paths(&swagger.paths, report);
                for entry in operations(&swagger.paths) {
                    if let Some(responses) = &entry.operation.responses {
                        check_responses(
                            responses,
                            &entry.pointer().join(RESPONSES_FIELD),
                            report,
                        );
                    }
                }
                if let Some(definitions) = &swagger.definitions {
                    check_schemas(
                        definitions,
                        &JsonPath::from_segments(["definitions"]),
                        report,
                    );
                }
            }
        }
    }
}

fn check_keys<E>(object: &E, path: &JsonPath, report: &mut ConformanceReport)
where
    E: Extensible + ?Sized,
{
    for key in object.foreign_keys() {
        report.push(path.join(key), IssueKind::ForeignExtensionKey(key.to_string()));
    }
}

fn check_paths<I>(paths: &ExtensibleMap<I>, report: &mut ConformanceReport)
where
    I: PathItemView + Extensible,
    I::Operation: Extensible,
    <I::Operation as OperationView>::Parameter: Extensible,
{
    for (template, path_item) in paths.iter() {
        let item_path = JsonPath::from_segments([PATHS_FIELD, template.as_str()]);
        check_keys(path_item, &item_path, report);
        check_parameters(path_item.parameters(), &item_path.join(PARAMETERS_FIELD), report);
    }
    for entry in operations(paths) {
        let operation_path = entry.pointer();
        check_keys(entry.operation, &operation_path, report);
        check_parameters(
            entry.operation.parameters(),
            &operation_path.join(PARAMETERS_FIELD),
            report,
        );
    }
}

fn check_parameters<P>(
    parameters: &[ReferenceOr<P>],
    path: &JsonPath,
    report: &mut ConformanceReport,
) where
    P: Extensible,
{
    for (index, parameter) in parameters.iter().enumerate() {
        if let ReferenceOr::Item(parameter) = parameter {
            check_keys(parameter, &path.join(index.to_string()), report);
        }
    }
}

fn check_responses<R>(
    responses: &ExtensibleMap<ReferenceOr<R>>,
    path: &JsonPath,
    report: &mut ConformanceReport,
) where
    R: Extensible,
{
    for (status, response) in responses.iter() {
        if let ReferenceOr::Item(response) = response {
            check_keys(response, &path.join(status), report);
        }
    }
}

fn check_schemas<S>(
    schemas: &BTreeMap<String, ReferenceOr<S>>,
    path: &JsonPath,
    report: &mut ConformanceReport,
) where
    S: Extensible,
{
    for (name, schema) in schemas {
        if let ReferenceOr::Item(schema) = schema {
            check_keys(schema, &path.join(name), report);
        }
    }
}

#[cfg(test)]
mod test {
    use crate::document::Document;
    use crate::validator::extensions::StrictExtensionsRule;
    use crate::validator::{ConformanceReport, DocumentValidator, IssueKind, Rule};
    use serde_json::{Value, json};

    fn run(value: Value) -> ConformanceReport {
        let document = Document::from_value(value).unwrap();
        let mut report = ConformanceReport::default();
        StrictExtensionsRule.check(&document, &mut report);
        report
    }

    fn found(report: ConformanceReport) -> Vec<String> {
        report
            .into_iter()
            .map(|issue| {
                assert!(matches!(issue.kind, IssueKind::ForeignExtensionKey(_)));
                issue.path.to_string()
            })
            .collect()
    }

    #[test]
    fn test_openapi_foreign_keys() {
        let report = run(json!({
            "openapi": "3.0.0",
            "info": {"title": "t", "version": "1", "x-ok": true, "licence": "MIT"},
            "paths": {
                "/pets": {
                    "summary": "pets",
                    "sumary": "typo",
                    "get": {
                        "operationId": "listPets",
                        "operationID": "typo",
                        "parameters": [
                            {"name": "limit", "in": "query", "schema": {"type": "integer"}, "requred": true}
                        ],
                        "responses": {"200": {"description": "ok", "x-rate": 1, "contnet": {}}}
                    }
                }
            },
            "components": {"schemas": {"Pet": {"type": "object", "propertes": {}}}},
            "servers-list": []
        }));
        assert_eq!(
            found(report),
            vec![
                "#/info/licence",
                "#/servers-list",
                "#/paths/~1pets/sumary",
                "#/paths/~1pets/get/operationID",
                "#/paths/~1pets/get/parameters/0/requred",
                "#/paths/~1pets/get/responses/200/contnet",
                "#/components/schemas/Pet/propertes",
            ]
        );
    }

    #[test]
    fn test_swagger_foreign_keys() {
        let report = run(json!({
            "swagger": "2.0",
            "info": {"title": "t", "version": "1"},
            "paths": {
                "/pets": {
                    "parameters": [
                        {"name": "body", "in": "body", "schema": {"type": "object"}, "x-body": 1, "requried": true}
                    ]
                }
            },
            "definitions": {"Pet": {"type": "object", "x-kind": "pet"}},
            "basepath": "/v1"
        }));
        assert_eq!(
            found(report),
            vec!["#/basepath", "#/paths/~1pets/parameters/0/requried"]
        );
    }

    #[test]
    fn test_lenient_by_default() {
        let document = Document::from_value(json!({
            "swagger": "2.0",
            "info": {"title": "t", "version": "1"},
            "paths": {},
            "basepath": "/v1"
        }))
        .unwrap();
        assert!(DocumentValidator::default().validate(&document).is_valid());
        let strict = DocumentValidator::builder().strict_extensions(true).build();
        assert_eq!(strict.validate(&document).len(), 1);
    }
}
