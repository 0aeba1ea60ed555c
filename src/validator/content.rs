use crate::document::Document;
use crate::openapi_common::ReferenceOr;
use crate::openapi_v30x::{
    Callback, Components, Link, MediaType, Operation, Parameter, ParameterData, PathItem,
    Response,
};
use crate::types::PathItemView;
use crate::types::json_path::JsonPath;
use crate::validator::{ConformanceReport, IssueKind, Rule};
use crate::{PARAMETERS_FIELD, PATHS_FIELD};
use std::collections::BTreeMap;

const CONTENT_FIELD: &str = "content";
const HEADERS_FIELD: &str = "headers";
const LINKS_FIELD: &str = "links";
const RESPONSES_FIELD: &str = "responses";
const REQUEST_BODY_FIELD: &str = "requestBody";
const CALLBACKS_FIELD: &str = "callbacks";

/// Mutually exclusive fields of the 3.0 model. Swagger documents have none
/// of these fields, so the rule passes them untouched.
pub(crate) struct ContentRule;

impl Rule for ContentRule {
    fn name(&self) -> &'static str {
        "content"
    }

    fn check(&self, document: &Document, report: &mut ConformanceReport) {
        let Some(openapi) = document.as_openapi() else {
            return;
        };
        for (template, path_item) in openapi.paths.iter() {
            check_path_item(
                path_item,
                &JsonPath::from_segments([PATHS_FIELD, template.as_str()]),
                report,
            );
        }
        if let Some(components) = &openapi.components {
            check_components(components, report);
        }
    }
}

fn check_path_item(path_item: &PathItem, path: &JsonPath, report: &mut ConformanceReport) {
    if let Some(parameters) = &path_item.parameters {
        check_parameters(parameters, &path.join(PARAMETERS_FIELD), report);
    }
    for (method, operation) in path_item.operations() {
        check_operation(operation, &path.join(method.as_str().to_lowercase()), report);
    }
}

fn check_operation(operation: &Operation, path: &JsonPath, report: &mut ConformanceReport) {
    if let Some(parameters) = &operation.parameters {
        check_parameters(parameters, &path.join(PARAMETERS_FIELD), report);
    }
    if let Some(ReferenceOr::Item(body)) = &operation.request_body {
        check_content(
            &body.content,
            &path.join(REQUEST_BODY_FIELD).join(CONTENT_FIELD),
            report,
        );
    }

    let responses_path = path.join(RESPONSES_FIELD);
    if operation.responses.is_empty() {
        report.push(responses_path.clone(), IssueKind::EmptyResponses);
    }
    for (status, response) in operation.responses.iter() {
        if let ReferenceOr::Item(response) = response {
            check_response(response, &responses_path.join(status), report);
        }
    }

    if let Some(callbacks) = &operation.callbacks {
        for (name, callback) in callbacks {
            if let ReferenceOr::Item(callback) = callback {
                check_callback(callback, &path.join(CALLBACKS_FIELD).join(name), report);
            }
        }
    }
}

fn check_callback(callback: &Callback, path: &JsonPath, report: &mut ConformanceReport) {
    for (expression, path_item) in callback.iter() {
        check_path_item(path_item, &path.join(expression), report);
    }
}

fn check_parameters(
    parameters: &[ReferenceOr<Parameter>],
    path: &JsonPath,
    report: &mut ConformanceReport,
) {
    for (index, parameter) in parameters.iter().enumerate() {
        if let ReferenceOr::Item(parameter) = parameter {
            check_parameter_data(&parameter.data, &path.join(index.to_string()), report);
        }
    }
}

/// Shared by parameters and headers.
fn check_parameter_data(data: &ParameterData, path: &JsonPath, report: &mut ConformanceReport) {
    match (&data.schema, &data.content) {
        (Some(_), Some(_)) => report.push(path.clone(), IssueKind::SchemaAndContent),
        (None, None) => report.push(path.clone(), IssueKind::MissingSchemaOrContent),
        (None, Some(content)) if content.len() != 1 => report.push(
            path.join(CONTENT_FIELD),
            IssueKind::ContentEntryCount(content.len()),
        ),
        _ => {}
    }
    if data.example.is_some() && data.examples.is_some() {
        report.push(path.clone(), IssueKind::ExampleAndExamples);
    }
    if let Some(content) = &data.content {
        check_content(content, &path.join(CONTENT_FIELD), report);
    }
}

fn check_content(
    content: &BTreeMap<String, MediaType>,
    path: &JsonPath,
    report: &mut ConformanceReport,
) {
    for (media_range, media_type) in content {
        if media_type.example.is_some() && media_type.examples.is_some() {
            report.push(path.join(media_range), IssueKind::ExampleAndExamples);
        }
        if let Some(encodings) = &media_type.encoding {
            for (property, encoding) in encodings {
                if let Some(headers) = &encoding.headers {
                    check_headers(
                        headers,
                        &path
                            .join(media_range)
                            .join("encoding")
                            .join(property)
                            .join(HEADERS_FIELD),
                        report,
                    );
                }
            }
        }
    }
}

fn check_headers(
    headers: &BTreeMap<String, ReferenceOr<ParameterData>>,
    path: &JsonPath,
    report: &mut ConformanceReport,
) {
    for (name, header) in headers {
        if let ReferenceOr::Item(header) = header {
            check_parameter_data(header, &path.join(name), report);
        }
    }
}

fn check_response(response: &Response, path: &JsonPath, report: &mut ConformanceReport) {
    if let Some(headers) = &response.headers {
        check_headers(headers, &path.join(HEADERS_FIELD), report);
    }
    if let Some(content) = &response.content {
        check_content(content, &path.join(CONTENT_FIELD), report);
    }
    if let Some(links) = &response.links {
        for (name, link) in links {
            if let ReferenceOr::Item(link) = link {
                check_link(link, &path.join(LINKS_FIELD).join(name), report);
            }
        }
    }
}

fn check_link(link: &Link, path: &JsonPath, report: &mut ConformanceReport) {
    if link.operation_ref.is_some() && link.operation_id.is_some() {
        report.push(path.clone(), IssueKind::OperationRefAndId);
    }
}

fn check_components(components: &Components, report: &mut ConformanceReport) {
    let base = JsonPath::from_segments(["components"]);
    if let Some(parameters) = &components.parameters {
        for (name, parameter) in parameters {
            if let ReferenceOr::Item(parameter) = parameter {
                check_parameter_data(
                    &parameter.data,
                    &base.join(PARAMETERS_FIELD).join(name),
                    report,
                );
            }
        }
    }
    if let Some(headers) = &components.headers {
        check_headers(headers, &base.join(HEADERS_FIELD), report);
    }
    if let Some(bodies) = &components.request_bodies {
        for (name, body) in bodies {
            if let ReferenceOr::Item(body) = body {
                check_content(
                    &body.content,
                    &base.join("requestBodies").join(name).join(CONTENT_FIELD),
                    report,
                );
            }
        }
    }
    if let Some(responses) = &components.responses {
        for (name, response) in responses {
            if let ReferenceOr::Item(response) = response {
                check_response(response, &base.join(RESPONSES_FIELD).join(name), report);
            }
        }
    }
    if let Some(links) = &components.links {
        for (name, link) in links {
            if let ReferenceOr::Item(link) = link {
                check_link(link, &base.join(LINKS_FIELD).join(name), report);
            }
        }
    }
    if let Some(callbacks) = &components.callbacks {
        for (name, callback) in callbacks {
            if let ReferenceOr::Item(callback) = callback {
                check_callback(callback, &base.join(CALLBACKS_FIELD).join(name), report);
            }
        }
    }
}
