use crate::document::Document;
use crate::openapi_common::{ExtensibleMap, ReferenceOr, SecurityRequirement};
use crate::openapi_v30x::{self as v3, OpenApi};
use crate::swagger_v20::{self as v2, Swagger};
use crate::traverser::operations;
use crate::types::json_path::JsonPath;
use crate::types::{OperationView, PathItemView};
use crate::validator::{ConformanceReport, IssueKind, Rule};
use std::collections::{BTreeMap, BTreeSet};

const SECURITY_FIELD: &str = "security";
const COMPONENTS_FIELD: &str = "components";
const SECURITY_SCHEMES_FIELD: &str = "securitySchemes";
const SECURITY_DEFINITIONS_FIELD: &str = "securityDefinitions";
const FLOWS_FIELD: &str = "flows";
const AUTHORIZATION_URL_FIELD: &str = "authorizationUrl";
const TOKEN_URL_FIELD: &str = "tokenUrl";

/// Which scopes a requirement on a scheme may list.
enum ScopePolicy<'a> {
    Declared(BTreeSet<&'a str>),
    /// openIdConnect, or a scheme hidden behind a reference.
    Any,
    None,
}

/// Security requirements against the scheme registry, and flow URLs.
pub(crate) struct SecurityRule;

impl Rule for SecurityRule {
    fn name(&self) -> &'static str {
        "security"
    }

    fn check(&self, document: &Document, report: &mut ConformanceReport) {
        match document {
            Document::OpenApi(openapi) => {
                let registry = openapi_registry(openapi);
                check_requirements(&registry, &openapi.security, &openapi.paths, report);
                check_openapi_flows(openapi, report);
            }
            Document::Swagger(swagger) => {
                let registry = swagger_registry(swagger);
                check_requirements(&registry, &swagger.security, &swagger.paths, report);
                check_swagger_flows(swagger, report);
            }
        }
    }
}

fn openapi_registry(openapi: &OpenApi) -> BTreeMap<&str, ScopePolicy<'_>> {
    let Some(schemes) = openapi
        .components
        .as_ref()
        .and_then(|components| components.security_schemes.as_ref())
    else {
        return BTreeMap::new();
    };
    schemes
        .iter()
        .map(|(name, scheme)| {
            let policy = match scheme {
                ReferenceOr::Reference(_) => ScopePolicy::Any,
                ReferenceOr::Item(v3::SecurityScheme::OAuth2(oauth)) => ScopePolicy::Declared(
                    oauth
                        .flows
                        .iter()
                        .flat_map(|(_, flow)| flow.scopes.keys())
                        .map(String::as_str)
                        .collect(),
                ),
                ReferenceOr::Item(v3::SecurityScheme::OpenIdConnect(_)) => ScopePolicy::Any,
                ReferenceOr::Item(_) => ScopePolicy::None,
            };
            (name.as_str(), policy)
        })
        .collect()
}

fn swagger_registry(swagger: &Swagger) -> BTreeMap<&str, ScopePolicy<'_>> {
    let Some(schemes) = swagger.security_definitions.as_ref() else {
        return BTreeMap::new();
    };
    schemes
        .iter()
        .map(|(name, scheme)| {
            let policy = match scheme {
                v2::SecurityScheme::OAuth2(oauth) => {
                    ScopePolicy::Declared(oauth.scopes.keys().map(String::as_str).collect())
                }
                v2::SecurityScheme::Basic(_) | v2::SecurityScheme::ApiKey(_) => ScopePolicy::None,
            };
            (name.as_str(), policy)
        })
        .collect()
}

fn check_requirements<I>(
    registry: &BTreeMap<&str, ScopePolicy<'_>>,
    root_security: &Option<Vec<SecurityRequirement>>,
    paths: &ExtensibleMap<I>,
    report: &mut ConformanceReport,
) where
    I: PathItemView,
{
    if let Some(requirements) = root_security {
        check_requirement_list(
            registry,
            requirements,
            &JsonPath::from_segments([SECURITY_FIELD]),
            report,
        );
    }
    for entry in operations(paths) {
        if let Some(requirements) = entry.operation.security() {
            check_requirement_list(
                registry,
                requirements,
                &entry.pointer().join(SECURITY_FIELD),
                report,
            );
        }
    }
}

fn check_requirement_list(
    registry: &BTreeMap<&str, ScopePolicy<'_>>,
    requirements: &[SecurityRequirement],
    path: &JsonPath,
    report: &mut ConformanceReport,
) {
    for (index, requirement) in requirements.iter().enumerate() {
        for (scheme, scopes) in requirement {
            let scheme_path = path.join(index.to_string()).join(scheme);
            match registry.get(scheme.as_str()) {
                None => report.push(
                    scheme_path,
                    IssueKind::UnknownSecurityScheme(scheme.clone()),
                ),
                Some(ScopePolicy::Any) => {}
                Some(ScopePolicy::None) => {
                    if !scopes.is_empty() {
                        report.push(scheme_path, IssueKind::UnexpectedScopes(scheme.clone()));
                    }
                }
                Some(ScopePolicy::Declared(declared)) => {
                    for (scope_index, scope) in scopes.iter().enumerate() {
                        if !declared.contains(scope.as_str()) {
                            report.push(
                                scheme_path.join(scope_index.to_string()),
                                IssueKind::UndeclaredScope {
                                    scheme: scheme.clone(),
                                    scope: scope.clone(),
                                },
                            );
                        }
                    }
                }
            }
        }
    }
}

fn check_openapi_flows(openapi: &OpenApi, report: &mut ConformanceReport) {
    let Some(schemes) = openapi
        .components
        .as_ref()
        .and_then(|components| components.security_schemes.as_ref())
    else {
        return;
    };
    for (name, scheme) in schemes {
        let Some(v3::SecurityScheme::OAuth2(oauth)) = scheme.as_item() else {
            continue;
        };
        for (flow_name, flow) in oauth.flows.iter() {
            let flow_path = JsonPath::from_segments([
                COMPONENTS_FIELD,
                SECURITY_SCHEMES_FIELD,
                name.as_str(),
                FLOWS_FIELD,
                flow_name,
            ]);
            let (needs_authorization, needs_token) = match flow_name {
                "implicit" => (true, false),
                "authorizationCode" => (true, true),
                _ => (false, true),
            };
            check_flow_urls(
                flow_name,
                (needs_authorization, &flow.authorization_url),
                (needs_token, &flow.token_url),
                &flow_path,
                report,
            );
        }
    }
}

fn check_swagger_flows(swagger: &Swagger, report: &mut ConformanceReport) {
    let Some(schemes) = swagger.security_definitions.as_ref() else {
        return;
    };
    for (name, scheme) in schemes {
        let v2::SecurityScheme::OAuth2(oauth) = scheme else {
            continue;
        };
        let flow_name = match oauth.flow {
            v2::OAuth2Flow::Implicit => "implicit",
            v2::OAuth2Flow::Password => "password",
            v2::OAuth2Flow::Application => "application",
            v2::OAuth2Flow::AccessCode => "accessCode",
        };
        check_flow_urls(
            flow_name,
            (oauth.flow.needs_authorization_url(), &oauth.authorization_url),
            (oauth.flow.needs_token_url(), &oauth.token_url),
            &JsonPath::from_segments([SECURITY_DEFINITIONS_FIELD, name.as_str()]),
            report,
        );
    }
}

fn check_flow_urls(
    flow_name: &str,
    (needs_authorization, authorization_url): (bool, &Option<String>),
    (needs_token, token_url): (bool, &Option<String>),
    path: &JsonPath,
    report: &mut ConformanceReport,
) {
    let missing = [
        (needs_authorization && authorization_url.is_none(), AUTHORIZATION_URL_FIELD),
        (needs_token && token_url.is_none(), TOKEN_URL_FIELD),
    ];
    for (is_missing, field) in missing {
        if is_missing {
            report.push(
                path.clone(),
                IssueKind::MissingFlowUrl {
                    flow: flow_name.to_string(),
                    field,
                },
            );
        }
    }
}
