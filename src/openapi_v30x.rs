use crate::error::ShapeError;
use crate::openapi_common::{
    Extensible, ExtensibleMap, Extensions, ExternalDocumentation, Info, ReferenceOr,
    SecurityRequirement, Tag, Xml, impl_extensible,
};
use crate::traverser::{self, OperationEntry};
use crate::types::{OperationView, ParameterView, PathItemView};
use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// An OpenAPI 3.0.x document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApi {
    /// The semantic version of the format this document uses, e.g. `3.0.3`.
    pub openapi: String,

    /// Provides metadata about the API.
    pub info: Info,

    /// Connectivity information to target servers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servers: Option<Vec<Server>>,

    /// The available paths and operations for the API.
    pub paths: Paths,

    /// Reusable objects referenced from elsewhere in the document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,

    /// Security mechanisms applying to every operation unless overridden.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "externalDocs")]
    pub external_docs: Option<ExternalDocumentation>,

    /// Specification extensions.
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl OpenApi {
    /// Every operation in the document, path by path.
    pub fn operations(&self) -> Vec<OperationEntry<'_, PathItem>> {
        traverser::operations(&self.paths)
    }

    pub fn find_operation(&self, operation_id: &str) -> Option<OperationEntry<'_, PathItem>> {
        traverser::find_operation(&self.paths, operation_id)
    }

    /// The operation mounted at `template` for `method`, if any.
    pub fn operation(&self, template: &str, method: &Method) -> Option<&Operation> {
        self.paths.get(template)?.operation(method)
    }

    /// Names registered under `components.securitySchemes`.
    pub fn security_scheme_names(&self) -> Vec<&str> {
        self.components
            .as_ref()
            .and_then(|components| components.security_schemes.as_ref())
            .map(|schemes| schemes.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// A server hosting the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    /// URL of the target host, possibly holding `{variable}` placeholders.
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<BTreeMap<String, ServerVariable>>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

/// A substitution value for a server URL template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerVariable {
    #[serde(skip_serializing_if = "Option::is_none", rename = "enum")]
    pub enumeration: Option<Vec<ServerVariableValue>>,

    pub default: ServerVariableValue,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Server variables are meant to be strings, but booleans and numbers
/// show up in the wild and are kept as written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerVariableValue {
    String(String),
    Boolean(bool),
    Number(Number),
}

/// Holds reusable objects for different aspects of the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schemas: Option<BTreeMap<String, ReferenceOr<Schema>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses: Option<BTreeMap<String, ReferenceOr<Response>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<BTreeMap<String, ReferenceOr<Parameter>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<BTreeMap<String, ReferenceOr<Example>>>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "requestBodies")]
    pub request_bodies: Option<BTreeMap<String, ReferenceOr<RequestBody>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, ReferenceOr<Header>>>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "securitySchemes")]
    pub security_schemes: Option<BTreeMap<String, ReferenceOr<SecurityScheme>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<BTreeMap<String, ReferenceOr<Link>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub callbacks: Option<BTreeMap<String, ReferenceOr<Callback>>>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Relative paths to endpoints, keyed by path template.
pub type Paths = ExtensibleMap<PathItem>;

/// Operations available on a single path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    /// Allows an external definition of this path item.
    #[serde(skip_serializing_if = "Option::is_none", rename = "$ref")]
    pub reference: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Operation>,

    /// Alternative servers for every operation on this path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servers: Option<Vec<Server>>,

    /// Parameters shared by every operation on this path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<ReferenceOr<Parameter>>>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

impl PathItem {
    pub fn operation(&self, method: &Method) -> Option<&Operation> {
        match *method {
            Method::GET => self.get.as_ref(),
            Method::PUT => self.put.as_ref(),
            Method::POST => self.post.as_ref(),
            Method::DELETE => self.delete.as_ref(),
            Method::OPTIONS => self.options.as_ref(),
            Method::HEAD => self.head.as_ref(),
            Method::PATCH => self.patch.as_ref(),
            Method::TRACE => self.trace.as_ref(),
            _ => None,
        }
    }
}

impl PathItemView for PathItem {
    type Operation = Operation;

    fn operations(&self) -> Vec<(Method, &Operation)> {
        [
            (Method::GET, &self.get),
            (Method::PUT, &self.put),
            (Method::POST, &self.post),
            (Method::DELETE, &self.delete),
            (Method::OPTIONS, &self.options),
            (Method::HEAD, &self.head),
            (Method::PATCH, &self.patch),
            (Method::TRACE, &self.trace),
        ]
        .into_iter()
        .filter_map(|(method, operation)| operation.as_ref().map(|op| (method, op)))
        .collect()
    }

    fn parameters(&self) -> &[ReferenceOr<Parameter>] {
        self.parameters.as_deref().unwrap_or_default()
    }
}

/// A single API operation on a path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "externalDocs")]
    pub external_docs: Option<ExternalDocumentation>,

    /// Identifier of the operation, unique across the document.
    #[serde(rename = "operationId")]
    pub operation_id: String,

    /// Adds to, or overrides by name and location, the path level parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<ReferenceOr<Parameter>>>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "requestBody")]
    pub request_body: Option<ReferenceOr<RequestBody>>,

    /// Possible responses, keyed by status code or `default`.
    pub responses: Responses,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub callbacks: Option<BTreeMap<String, ReferenceOr<Callback>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    /// Overrides the document level security; an empty list removes it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub servers: Option<Vec<Server>>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

impl Operation {
    /// Parameters in effect once the path level ones are merged in.
    pub fn effective_parameters<'a>(
        &'a self,
        path_item: &'a PathItem,
    ) -> Vec<&'a ReferenceOr<Parameter>> {
        traverser::merge_parameters(
            PathItemView::parameters(path_item),
            OperationView::parameters(self),
        )
    }
}

impl OperationView for Operation {
    type Parameter = Parameter;

    fn operation_id(&self) -> Option<&str> {
        Some(&self.operation_id)
    }

    fn parameters(&self) -> &[ReferenceOr<Parameter>] {
        self.parameters.as_deref().unwrap_or_default()
    }

    fn security(&self) -> Option<&[SecurityRequirement]> {
        self.security.as_deref()
    }
}

/// Where a parameter is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Cookie,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Path => "path",
            ParameterLocation::Cookie => "cookie",
        }
    }
}

/// A single operation parameter, unique by `name` and `in`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(flatten)]
    pub data: ParameterData,
}

impl ParameterView for Parameter {
    fn name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> &'static str {
        self.location.as_str()
    }

    fn is_required(&self) -> bool {
        self.data.required.unwrap_or(false)
    }
}

/// Everything a parameter describes besides its name and location.
/// Header objects share this exact shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(
        skip_serializing_if = "Option::is_none",
        rename = "allowEmptyValue",
        alias = "allowEmptyValues"
    )]
    pub allow_empty_value: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ParameterStyle>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub explode: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "allowReserved")]
    pub allow_reserved: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<ReferenceOr<Schema>>,

    #[serde(
        default,
        deserialize_with = "crate::openapi_common::present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub example: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<BTreeMap<String, ReferenceOr<Example>>>,

    /// Alternative to `schema` for complex serializations; a single entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<BTreeMap<String, MediaType>>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

pub type Header = ParameterData;

/// How a parameter value is serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterStyle {
    Matrix,
    Label,
    Form,
    Simple,
    SpaceDelimited,
    PipeDelimited,
    DeepObject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Body shapes keyed by media type or media type range.
    pub content: BTreeMap<String, MediaType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<ReferenceOr<Schema>>,

    #[serde(
        default,
        deserialize_with = "crate::openapi_common::present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub example: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<BTreeMap<String, ReferenceOr<Example>>>,

    /// Per-property encoding, only for multipart and form bodies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<BTreeMap<String, Encoding>>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Encoding {
    #[serde(skip_serializing_if = "Option::is_none", rename = "contentType")]
    pub content_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, ReferenceOr<Header>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ParameterStyle>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub explode: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "allowReserved")]
    pub allow_reserved: Option<bool>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Responses keyed by status code, `NXX` range or `default`.
pub type Responses = ExtensibleMap<ReferenceOr<Response>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, ReferenceOr<Header>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<BTreeMap<String, MediaType>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<BTreeMap<String, ReferenceOr<Link>>>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Out-of-band requests keyed by runtime expression.
pub type Callback = ExtensibleMap<PathItem>;

/// An example value, either embedded or pointed to by URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawExample", into = "RawExample")]
pub struct Example {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub value: Option<ExampleValue>,
    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExampleValue {
    /// Written under `value`.
    Embedded(Value),
    /// A URL written under `externalValue`.
    External(String),
}

#[derive(Serialize, Deserialize)]
struct RawExample {
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "externalValue")]
    external_value: Option<String>,

    #[serde(flatten)]
    extensions: Extensions,
}

impl TryFrom<RawExample> for Example {
    type Error = ShapeError;

    fn try_from(raw: RawExample) -> Result<Self, Self::Error> {
        let value = match (raw.value, raw.external_value) {
            (Some(_), Some(_)) => return Err(ShapeError::ExampleValueConflict),
            (Some(value), None) => Some(ExampleValue::Embedded(value)),
            (None, Some(url)) => Some(ExampleValue::External(url)),
            (None, None) => None,
        };
        Ok(Example {
            summary: raw.summary,
            description: raw.description,
            value,
            extensions: raw.extensions,
        })
    }
}

impl From<Example> for RawExample {
    fn from(example: Example) -> Self {
        let (value, external_value) = match example.value {
            Some(ExampleValue::Embedded(value)) => (Some(value), None),
            Some(ExampleValue::External(url)) => (None, Some(url)),
            None => (None, None),
        };
        RawExample {
            summary: example.summary,
            description: example.description,
            value,
            external_value,
            extensions: example.extensions,
        }
    }
}

/// A design-time link from a response to another operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    #[serde(skip_serializing_if = "Option::is_none", rename = "operationRef")]
    pub operation_ref: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "operationId")]
    pub operation_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<BTreeMap<String, Value>>,

    #[serde(
        default,
        deserialize_with = "crate::openapi_common::present_value",
        skip_serializing_if = "Option::is_none",
        rename = "requestBody"
    )]
    pub request_body: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<Server>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

/// The JSON Schema subset the format understands, plus its own keywords.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(skip_serializing_if = "Option::is_none", rename = "type")]
    pub schema_type: Option<SchemaType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(
        default,
        deserialize_with = "crate::openapi_common::present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "multipleOf")]
    pub multiple_of: Option<Number>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "exclusiveMaximum")]
    pub exclusive_maximum: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "exclusiveMinimum")]
    pub exclusive_minimum: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "maxLength")]
    pub max_length: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "minLength")]
    pub min_length: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "maxItems")]
    pub max_items: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "minItems")]
    pub min_items: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "uniqueItems")]
    pub unique_items: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "maxProperties")]
    pub max_properties: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "minProperties")]
    pub min_properties: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "enum")]
    pub enumeration: Option<Vec<Value>>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "allOf")]
    pub all_of: Option<Vec<ReferenceOr<Schema>>>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "oneOf")]
    pub one_of: Option<Vec<ReferenceOr<Schema>>>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "anyOf")]
    pub any_of: Option<Vec<ReferenceOr<Schema>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<ReferenceOr<Schema>>>,

    /// Required when `type` is `array`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ReferenceOr<Schema>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, ReferenceOr<Schema>>>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "additionalProperties")]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "readOnly")]
    pub read_only: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "writeOnly")]
    pub write_only: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub xml: Option<Xml>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "externalDocs")]
    pub external_docs: Option<ExternalDocumentation>,

    #[serde(
        default,
        deserialize_with = "crate::openapi_common::present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub example: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

/// `additionalProperties` is either a switch or a schema for the extra values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Boolean(bool),
    Schema(Box<ReferenceOr<Schema>>),
}

/// Tells polymorphic payloads apart by the value of one property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discriminator {
    #[serde(rename = "propertyName")]
    pub property_name: String,

    /// Payload values mapped to schema names or references.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping: Option<BTreeMap<String, String>>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

/// A security scheme, keyed on its `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SecurityScheme {
    #[serde(rename = "apiKey")]
    ApiKey(ApiKeyScheme),
    #[serde(rename = "http")]
    Http(HttpScheme),
    #[serde(rename = "oauth2")]
    OAuth2(OAuth2Scheme),
    #[serde(rename = "openIdConnect")]
    OpenIdConnect(OpenIdConnectScheme),
}

impl SecurityScheme {
    pub fn description(&self) -> Option<&str> {
        match self {
            SecurityScheme::ApiKey(scheme) => scheme.description.as_deref(),
            SecurityScheme::Http(scheme) => scheme.description.as_deref(),
            SecurityScheme::OAuth2(scheme) => scheme.description.as_deref(),
            SecurityScheme::OpenIdConnect(scheme) => scheme.description.as_deref(),
        }
    }
}

impl Extensible for SecurityScheme {
    fn extensions(&self) -> &Extensions {
        match self {
            SecurityScheme::ApiKey(scheme) => &scheme.extensions,
            SecurityScheme::Http(scheme) => &scheme.extensions,
            SecurityScheme::OAuth2(scheme) => &scheme.extensions,
            SecurityScheme::OpenIdConnect(scheme) => &scheme.extensions,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    Query,
    Header,
    Cookie,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKeyScheme {
    /// Name of the header, query or cookie parameter.
    pub name: String,

    #[serde(rename = "in")]
    pub location: ApiKeyLocation,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpScheme {
    /// The HTTP authorization scheme, e.g. `basic` or `bearer`.
    pub scheme: String,

    #[serde(skip_serializing_if = "Option::is_none", rename = "bearerFormat")]
    pub bearer_format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuth2Scheme {
    pub flows: OAuthFlows,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenIdConnectScheme {
    #[serde(rename = "openIdConnectUrl")]
    pub open_id_connect_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OAuthFlows {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implicit: Option<OAuthFlow>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<OAuthFlow>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "clientCredentials")]
    pub client_credentials: Option<OAuthFlow>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "authorizationCode")]
    pub authorization_code: Option<OAuthFlow>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

impl OAuthFlows {
    /// Declared flows under their field names.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &OAuthFlow)> {
        [
            ("implicit", &self.implicit),
            ("password", &self.password),
            ("clientCredentials", &self.client_credentials),
            ("authorizationCode", &self.authorization_code),
        ]
        .into_iter()
        .filter_map(|(name, flow)| flow.as_ref().map(|flow| (name, flow)))
    }

    /// Whether any declared flow lists `scope`.
    pub fn declares_scope(&self, scope: &str) -> bool {
        self.iter().any(|(_, flow)| flow.scopes.contains_key(scope))
    }
}

/// Which URLs a flow needs depends on the field it is declared under.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OAuthFlow {
    #[serde(skip_serializing_if = "Option::is_none", rename = "authorizationUrl")]
    pub authorization_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "tokenUrl")]
    pub token_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "refreshUrl")]
    pub refresh_url: Option<String>,

    /// Scope names mapped to a short description.
    pub scopes: BTreeMap<String, String>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

impl_extensible!(
    OpenApi,
    Server,
    ServerVariable,
    Components,
    PathItem,
    Operation,
    ParameterData,
    RequestBody,
    MediaType,
    Encoding,
    Response,
    Example,
    Link,
    Schema,
    Discriminator,
    ApiKeyScheme,
    HttpScheme,
    OAuth2Scheme,
    OpenIdConnectScheme,
    OAuthFlows,
    OAuthFlow,
);

impl Extensible for Parameter {
    fn extensions(&self) -> &Extensions {
        &self.data.extensions
    }
}
