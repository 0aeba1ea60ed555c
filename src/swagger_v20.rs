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

/// A Swagger 2.0 document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swagger {
    /// Always `2.0`.
    pub swagger: String,

    pub info: Info,

    /// Host (name or ip, optionally with port) serving the API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Base path relative to the host, starting with `/`.
    #[serde(skip_serializing_if = "Option::is_none", rename = "basePath")]
    pub base_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schemes: Option<Vec<TransferProtocol>>,

    /// MIME types the API can consume.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumes: Option<Vec<String>>,

    /// MIME types the API can produce.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub produces: Option<Vec<String>>,

    pub paths: Paths,

    /// Data types produced and consumed by operations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definitions: Option<BTreeMap<String, ReferenceOr<Schema>>>,

    /// Parameters shared across operations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<BTreeMap<String, ReferenceOr<Parameter>>>,

    /// Responses shared across operations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses: Option<BTreeMap<String, ReferenceOr<Response>>>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "securityDefinitions")]
    pub security_definitions: Option<BTreeMap<String, SecurityScheme>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "externalDocs")]
    pub external_docs: Option<ExternalDocumentation>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

impl Swagger {
    pub fn operations(&self) -> Vec<OperationEntry<'_, PathItem>> {
        traverser::operations(&self.paths)
    }

    pub fn find_operation(&self, operation_id: &str) -> Option<OperationEntry<'_, PathItem>> {
        traverser::find_operation(&self.paths, operation_id)
    }

    pub fn operation(&self, template: &str, method: &Method) -> Option<&Operation> {
        self.paths.get(template)?.operation(method)
    }

    /// Names registered under `securityDefinitions`.
    pub fn security_scheme_names(&self) -> Vec<&str> {
        self.security_definitions
            .as_ref()
            .map(|schemes| schemes.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferProtocol {
    Http,
    Https,
    Ws,
    Wss,
}

pub type Paths = ExtensibleMap<PathItem>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(skip_serializing_if = "Option::is_none", rename = "$ref")]
    pub reference: Option<String>,

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
        ]
        .into_iter()
        .filter_map(|(method, operation)| operation.as_ref().map(|op| (method, op)))
        .collect()
    }

    fn parameters(&self) -> &[ReferenceOr<Parameter>] {
        self.parameters.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "externalDocs")]
    pub external_docs: Option<ExternalDocumentation>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "operationId")]
    pub operation_id: Option<String>,

    /// Overrides the document level `consumes`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumes: Option<Vec<String>>,

    /// Overrides the document level `produces`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub produces: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<ReferenceOr<Parameter>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses: Option<Responses>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schemes: Option<Vec<TransferProtocol>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

impl Operation {
    pub fn effective_parameters<'a>(
        &'a self,
        path_item: &'a PathItem,
    ) -> Vec<&'a ReferenceOr<Parameter>> {
        traverser::merge_parameters(
            PathItemView::parameters(path_item),
            OperationView::parameters(self),
        )
    }

    /// The body parameter among the effective ones, if inline.
    pub fn body_parameter<'a>(&'a self, path_item: &'a PathItem) -> Option<&'a BodyParameter> {
        self.effective_parameters(path_item)
            .into_iter()
            .filter_map(ReferenceOr::as_item)
            .find_map(|parameter| match parameter {
                Parameter::Body(body) => Some(body),
                Parameter::NonBody(_) => None,
            })
    }
}

impl OperationView for Operation {
    type Parameter = Parameter;

    fn operation_id(&self) -> Option<&str> {
        self.operation_id.as_deref()
    }

    fn parameters(&self) -> &[ReferenceOr<Parameter>] {
        self.parameters.as_deref().unwrap_or_default()
    }

    fn security(&self) -> Option<&[SecurityRequirement]> {
        self.security.as_deref()
    }
}

/// A parameter, keyed on `in`.
///
/// Body parameters describe their payload with a schema; every other
/// location describes a primitive (or array of primitives) with `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParameter", into = "RawParameter")]
pub enum Parameter {
    Body(BodyParameter),
    NonBody(NonBodyParameter),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodyParameter {
    pub name: String,
    pub description: Option<String>,
    pub required: Option<bool>,
    pub schema: ReferenceOr<Schema>,
    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NonBodyParameter {
    pub name: String,
    pub location: NonBodyLocation,
    pub description: Option<String>,
    /// Always `Some(true)` for path parameters.
    pub required: Option<bool>,
    pub parameter_type: ParameterType,
    pub format: Option<String>,
    pub allow_empty_value: Option<bool>,
    /// Element description when `parameter_type` is `array`.
    pub items: Option<Items>,
    pub collection_format: Option<CollectionFormat>,
    pub default: Option<Value>,
    pub constraints: Constraints,
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NonBodyLocation {
    Query,
    Header,
    Path,
    FormData,
}

impl NonBodyLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            NonBodyLocation::Query => "query",
            NonBodyLocation::Header => "header",
            NonBodyLocation::Path => "path",
            NonBodyLocation::FormData => "formData",
        }
    }
}

impl ParameterView for Parameter {
    fn name(&self) -> &str {
        match self {
            Parameter::Body(body) => &body.name,
            Parameter::NonBody(other) => &other.name,
        }
    }

    fn location(&self) -> &'static str {
        match self {
            Parameter::Body(_) => crate::BODY_LOCATION,
            Parameter::NonBody(other) => other.location.as_str(),
        }
    }

    fn is_required(&self) -> bool {
        let required = match self {
            Parameter::Body(body) => body.required,
            Parameter::NonBody(other) => other.required,
        };
        required.unwrap_or(false)
    }
}

impl Extensible for Parameter {
    fn extensions(&self) -> &Extensions {
        match self {
            Parameter::Body(body) => &body.extensions,
            Parameter::NonBody(other) => &other.extensions,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
enum RawLocation {
    Query,
    Header,
    Path,
    FormData,
    Body,
}

/// Wire form of a parameter before the `in` keyed rules are applied.
#[derive(Serialize, Deserialize)]
struct RawParameter {
    name: String,

    #[serde(rename = "in")]
    location: RawLocation,

    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    required: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    schema: Option<ReferenceOr<Schema>>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "type")]
    parameter_type: Option<ParameterType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "allowEmptyValue")]
    allow_empty_value: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<Items>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "collectionFormat")]
    collection_format: Option<CollectionFormat>,

    #[serde(
        default,
        deserialize_with = "crate::openapi_common::present_value",
        skip_serializing_if = "Option::is_none"
    )]
    default: Option<Value>,

    #[serde(flatten)]
    constraints: Constraints,

    #[serde(flatten)]
    extensions: Extensions,
}

impl RawParameter {
    /// First primitive-only field present, by its wire name.
    fn primitive_field(&self) -> Option<&'static str> {
        [
            ("type", self.parameter_type.is_some()),
            ("format", self.format.is_some()),
            ("allowEmptyValue", self.allow_empty_value.is_some()),
            ("items", self.items.is_some()),
            ("collectionFormat", self.collection_format.is_some()),
            ("default", self.default.is_some()),
        ]
        .into_iter()
        .find_map(|(field, present)| present.then_some(field))
        .or_else(|| self.constraints.first_present())
    }
}

impl TryFrom<RawParameter> for Parameter {
    type Error = ShapeError;

    fn try_from(raw: RawParameter) -> Result<Self, Self::Error> {
        let location = match raw.location {
            RawLocation::Body => {
                if let Some(field) = raw.primitive_field() {
                    return Err(ShapeError::body_parameter_field(raw.name, field));
                }
                let Some(schema) = raw.schema else {
                    return Err(ShapeError::BodyParameterMissingSchema(raw.name));
                };
                return Ok(Parameter::Body(BodyParameter {
                    name: raw.name,
                    description: raw.description,
                    required: raw.required,
                    schema,
                    extensions: raw.extensions,
                }));
            }
            RawLocation::Query => NonBodyLocation::Query,
            RawLocation::Header => NonBodyLocation::Header,
            RawLocation::Path => NonBodyLocation::Path,
            RawLocation::FormData => NonBodyLocation::FormData,
        };
        if raw.schema.is_some() {
            return Err(ShapeError::UnexpectedSchema(raw.name));
        }
        let Some(parameter_type) = raw.parameter_type else {
            return Err(ShapeError::MissingParameterType(raw.name));
        };
        if location == NonBodyLocation::Path && raw.required != Some(true) {
            return Err(ShapeError::PathParameterNotRequired(raw.name));
        }
        Ok(Parameter::NonBody(NonBodyParameter {
            name: raw.name,
            location,
            description: raw.description,
            required: raw.required,
            parameter_type,
            format: raw.format,
            allow_empty_value: raw.allow_empty_value,
            items: raw.items,
            collection_format: raw.collection_format,
            default: raw.default,
            constraints: raw.constraints,
            extensions: raw.extensions,
        }))
    }
}

impl From<Parameter> for RawParameter {
    fn from(parameter: Parameter) -> Self {
        match parameter {
            Parameter::Body(body) => RawParameter {
                name: body.name,
                location: RawLocation::Body,
                description: body.description,
                required: body.required,
                schema: Some(body.schema),
                parameter_type: None,
                format: None,
                allow_empty_value: None,
                items: None,
                collection_format: None,
                default: None,
                constraints: Constraints::default(),
                extensions: body.extensions,
            },
            Parameter::NonBody(other) => RawParameter {
                name: other.name,
                location: match other.location {
                    NonBodyLocation::Query => RawLocation::Query,
                    NonBodyLocation::Header => RawLocation::Header,
                    NonBodyLocation::Path => RawLocation::Path,
                    NonBodyLocation::FormData => RawLocation::FormData,
                },
                description: other.description,
                required: other.required,
                schema: None,
                parameter_type: Some(other.parameter_type),
                format: other.format,
                allow_empty_value: other.allow_empty_value,
                items: other.items,
                collection_format: other.collection_format,
                default: other.default,
                constraints: other.constraints,
                extensions: other.extensions,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemsType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
}

/// How array values are joined on the wire. `multi` is only meaningful for
/// query and formData parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionFormat {
    Csv,
    Ssv,
    Tsv,
    Pipes,
    Multi,
}

/// Validation keywords shared by non-body parameters, items and headers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
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

    #[serde(skip_serializing_if = "Option::is_none", rename = "enum")]
    pub enumeration: Option<Vec<Value>>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "multipleOf")]
    pub multiple_of: Option<Number>,
}

impl Constraints {
    pub fn is_empty(&self) -> bool {
        self.first_present().is_none()
    }

    fn first_present(&self) -> Option<&'static str> {
        [
            ("maximum", self.maximum.is_some()),
            ("exclusiveMaximum", self.exclusive_maximum.is_some()),
            ("minimum", self.minimum.is_some()),
            ("exclusiveMinimum", self.exclusive_minimum.is_some()),
            ("maxLength", self.max_length.is_some()),
            ("minLength", self.min_length.is_some()),
            ("pattern", self.pattern.is_some()),
            ("maxItems", self.max_items.is_some()),
            ("minItems", self.min_items.is_some()),
            ("uniqueItems", self.unique_items.is_some()),
            ("enum", self.enumeration.is_some()),
            ("multipleOf", self.multiple_of.is_some()),
        ]
        .into_iter()
        .find_map(|(field, present)| present.then_some(field))
    }
}

/// Element type of an array parameter or header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Items {
    #[serde(rename = "type")]
    pub items_type: ItemsType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Items>>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "collectionFormat")]
    pub collection_format: Option<CollectionFormat>,

    #[serde(
        default,
        deserialize_with = "crate::openapi_common::present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,

    #[serde(flatten)]
    pub constraints: Constraints,

    #[serde(flatten)]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "type")]
    pub header_type: HeaderType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "collectionFormat")]
    pub collection_format: Option<CollectionFormat>,

    #[serde(
        default,
        deserialize_with = "crate::openapi_common::present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,

    #[serde(flatten)]
    pub constraints: Constraints,

    #[serde(flatten)]
    pub extensions: Extensions,
}

pub type Responses = ExtensibleMap<ReferenceOr<Response>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<ReferenceOr<Schema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, Header>>,

    /// Example payloads keyed by MIME type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<BTreeMap<String, Value>>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

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

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ReferenceOr<Schema>>>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "allOf")]
    pub all_of: Option<Vec<ReferenceOr<Schema>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, ReferenceOr<Schema>>>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "additionalProperties")]
    pub additional_properties: Option<AdditionalProperties>,

    /// Name of the property that tells subtypes apart.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,

    #[serde(
        skip_serializing_if = "Option::is_none",
        rename = "readOnly",
        alias = "readonly"
    )]
    pub read_only: Option<bool>,

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
    File,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Boolean(bool),
    Schema(Box<ReferenceOr<Schema>>),
}

/// A security definition, keyed on its `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SecurityScheme {
    #[serde(rename = "basic")]
    Basic(BasicScheme),
    #[serde(rename = "apiKey")]
    ApiKey(ApiKeyScheme),
    #[serde(rename = "oauth2")]
    OAuth2(OAuth2Scheme),
}

impl SecurityScheme {
    pub fn description(&self) -> Option<&str> {
        match self {
            SecurityScheme::Basic(scheme) => scheme.description.as_deref(),
            SecurityScheme::ApiKey(scheme) => scheme.description.as_deref(),
            SecurityScheme::OAuth2(scheme) => scheme.description.as_deref(),
        }
    }
}

impl Extensible for SecurityScheme {
    fn extensions(&self) -> &Extensions {
        match self {
            SecurityScheme::Basic(scheme) => &scheme.extensions,
            SecurityScheme::ApiKey(scheme) => &scheme.extensions,
            SecurityScheme::OAuth2(scheme) => &scheme.extensions,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicScheme {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    Query,
    Header,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKeyScheme {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ApiKeyLocation,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OAuth2Flow {
    Implicit,
    Password,
    Application,
    AccessCode,
}

impl OAuth2Flow {
    pub fn needs_authorization_url(&self) -> bool {
        matches!(self, OAuth2Flow::Implicit | OAuth2Flow::AccessCode)
    }

    pub fn needs_token_url(&self) -> bool {
        matches!(
            self,
            OAuth2Flow::Password | OAuth2Flow::Application | OAuth2Flow::AccessCode
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuth2Scheme {
    pub flow: OAuth2Flow,

    #[serde(skip_serializing_if = "Option::is_none", rename = "authorizationUrl")]
    pub authorization_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "tokenUrl")]
    pub token_url: Option<String>,

    pub scopes: Scopes,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Scope names mapped to a short description.
pub type Scopes = ExtensibleMap<String>;

impl_extensible!(
    Swagger,
    PathItem,
    Operation,
    BodyParameter,
    NonBodyParameter,
    Items,
    Header,
    Response,
    Schema,
    BasicScheme,
    ApiKeyScheme,
    OAuth2Scheme,
);

#[cfg(test)]
mod test {
    use crate::openapi_common::{Extensible, ReferenceOr};
    use crate::swagger_v20::{
        AdditionalProperties, CollectionFormat, ItemsType, NonBodyLocation, OAuth2Flow, Parameter,
        ParameterType, SecurityScheme, Swagger,
    };
    use crate::types::ParameterView;
    use http::Method;
    use serde_json::json;

    fn petstore() -> serde_json::Value {
        json!({
            "swagger": "2.0",
            "info": {"title": "Petstore", "version": "1.0.0"},
            "host": "petstore.example.com",
            "basePath": "/v1",
            "schemes": ["https"],
            "paths": {
                "/pets/{petId}": {
                    "parameters": [
                        {"name": "petId", "in": "path", "required": true, "type": "integer", "format": "int64"}
                    ],
                    "get": {
                        "operationId": "getPet",
                        "produces": ["application/json"],
                        "responses": {
                            "200": {"description": "ok", "schema": {"$ref": "#/definitions/Pet"}},
                            "default": {"description": "error"}
                        }
                    },
                    "put": {
                        "parameters": [
                            {"name": "body", "in": "body", "required": true, "schema": {"$ref": "#/definitions/Pet"}},
                            {"name": "tags", "in": "query", "type": "array", "items": {"type": "string"}, "collectionFormat": "multi"}
                        ],
                        "responses": {"204": {"description": "updated"}}
                    }
                },
                "x-paths-note": "kept"
            },
            "definitions": {
                "Pet": {
                    "type": "object",
                    "required": ["id"],
                    "discriminator": "kind",
                    "properties": {
                        "id": {"type": "integer", "readOnly": true},
                        "kind": {"type": "string"}
                    },
                    "additionalProperties": false
                }
            },
            "securityDefinitions": {
                "basicAuth": {"type": "basic"},
                "oauth": {
                    "type": "oauth2",
                    "flow": "accessCode",
                    "authorizationUrl": "https://auth/authorize",
                    "tokenUrl": "https://auth/token",
                    "scopes": {"read:pets": "read", "x-scope-owner": "team"}
                }
            },
            "x-custom": 1
        })
    }

    #[test]
    fn test_petstore_round_trip() {
        let doc: Swagger = serde_json::from_value(petstore()).unwrap();
        assert_eq!(doc.base_path.as_deref(), Some("/v1"));
        assert_eq!(doc.extension("x-custom"), Some(&json!(1)));
        assert_eq!(doc.paths.extension("x-paths-note"), Some(&json!("kept")));
        assert_eq!(serde_json::to_value(&doc).unwrap(), petstore());
    }

    #[test]
    fn test_parameter_variants() {
        let doc: Swagger = serde_json::from_value(petstore()).unwrap();
        let item = doc.paths.get("/pets/{petId}").unwrap();
        let put = doc.operation("/pets/{petId}", &Method::PUT).unwrap();
        let effective = put.effective_parameters(item);
        assert_eq!(effective.len(), 3);

        let body = put.body_parameter(item).unwrap();
        assert_eq!(body.name, "body");
        assert!(body.schema.is_reference());

        let tags = effective
            .iter()
            .filter_map(|p| p.as_item())
            .find(|p| p.name() == "tags")
            .unwrap();
        match tags {
            Parameter::NonBody(tags) => {
                assert_eq!(tags.location, NonBodyLocation::Query);
                assert_eq!(tags.parameter_type, ParameterType::Array);
                assert_eq!(tags.items.as_ref().unwrap().items_type, ItemsType::String);
                assert_eq!(tags.collection_format, Some(CollectionFormat::Multi));
            }
            Parameter::Body(_) => panic!("tags is a query parameter"),
        }

        let pet_id = effective[0].as_item().unwrap();
        assert!(pet_id.is_path());
        assert!(pet_id.is_required());
    }

    #[test]
    fn test_body_parameter_rejects_primitive_fields() {
        for field in [
            json!({"type": "string"}),
            json!({"items": {"type": "string"}}),
            json!({"collectionFormat": "csv"}),
            json!({"maxLength": 3}),
        ] {
            let mut raw = json!({"name": "body", "in": "body", "schema": {"type": "object"}});
            for (key, value) in field.as_object().unwrap() {
                raw[key] = value.clone();
            }
            let err = serde_json::from_value::<Parameter>(raw).unwrap_err();
            assert!(err.to_string().contains("must not carry"), "{}", err);
        }
    }

    #[test]
    fn test_body_parameter_requires_schema() {
        let err = serde_json::from_value::<Parameter>(json!({"name": "body", "in": "body"}))
            .unwrap_err();
        assert!(err.to_string().contains("missing `schema`"), "{}", err);
    }

    #[test]
    fn test_non_body_parameter_requires_type() {
        let err = serde_json::from_value::<Parameter>(json!({"name": "q", "in": "query"}))
            .unwrap_err();
        assert!(err.to_string().contains("missing `type`"), "{}", err);

        let err = serde_json::from_value::<Parameter>(json!({
            "name": "q", "in": "formData", "type": "string", "schema": {"type": "string"}
        }))
        .unwrap_err();
        assert!(err.to_string().contains("not in the body"), "{}", err);
    }

    #[test]
    fn test_path_parameter_must_be_required() {
        let optional = serde_json::from_value::<Parameter>(json!({
            "name": "id", "in": "path", "type": "string"
        }));
        assert!(optional.is_err());
        let explicit_false = serde_json::from_value::<Parameter>(json!({
            "name": "id", "in": "path", "type": "string", "required": false
        }));
        assert!(explicit_false.is_err());
    }

    #[test]
    fn test_parameter_round_trip_keeps_extensions() {
        let raw = json!({
            "name": "limit",
            "in": "query",
            "type": "integer",
            "minimum": 1,
            "maximum": 100,
            "default": 20,
            "x-example": 5
        });
        let parameter: Parameter = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(parameter.extension("x-example"), Some(&json!(5)));
        match &parameter {
            Parameter::NonBody(limit) => assert!(!limit.constraints.is_empty()),
            Parameter::Body(_) => panic!("limit is a query parameter"),
        }
        assert_eq!(serde_json::to_value(&parameter).unwrap(), raw);
    }

    #[test]
    fn test_schema_quirks() {
        let doc: Swagger = serde_json::from_value(petstore()).unwrap();
        let definitions = doc.definitions.as_ref().unwrap();
        let pet = definitions["Pet"].as_item().unwrap();
        assert_eq!(pet.discriminator.as_deref(), Some("kind"));
        assert_eq!(
            pet.additional_properties,
            Some(AdditionalProperties::Boolean(false))
        );
        let id = pet.properties.as_ref().unwrap()["id"].as_item().unwrap();
        assert_eq!(id.read_only, Some(true));

        let legacy: crate::swagger_v20::Schema =
            serde_json::from_value(json!({"type": "string", "readonly": true})).unwrap();
        assert_eq!(legacy.read_only, Some(true));
        assert_eq!(
            serde_json::to_value(&legacy).unwrap(),
            json!({"type": "string", "readOnly": true})
        );
    }

    #[test]
    fn test_security_definitions() {
        let doc: Swagger = serde_json::from_value(petstore()).unwrap();
        assert_eq!(doc.security_scheme_names(), vec!["basicAuth", "oauth"]);
        let definitions = doc.security_definitions.as_ref().unwrap();
        assert!(matches!(definitions["basicAuth"], SecurityScheme::Basic(_)));
        match &definitions["oauth"] {
            SecurityScheme::OAuth2(oauth) => {
                assert_eq!(oauth.flow, OAuth2Flow::AccessCode);
                assert!(oauth.flow.needs_authorization_url());
                assert!(oauth.scopes.get("read:pets").is_some());
                assert_eq!(oauth.scopes.len(), 1);
                assert_eq!(oauth.scopes.extension("x-scope-owner"), Some(&json!("team")));
            }
            other => panic!("unexpected scheme {:?}", other),
        }
        let bad = serde_json::from_value::<SecurityScheme>(json!({"type": "apiKey", "name": "k", "in": "cookie"}));
        assert!(bad.is_err());
    }

    #[test]
    fn test_shared_definitions_accept_references() {
        let mut raw = petstore();
        raw["parameters"] = json!({
            "Limit": {"name": "limit", "in": "query", "type": "integer"},
            "Alias": {"$ref": "#/parameters/Limit"}
        });
        raw["responses"] = json!({
            "NotFound": {"description": "not found"},
            "Missing": {"$ref": "#/responses/NotFound"}
        });
        let doc: Swagger = serde_json::from_value(raw.clone()).unwrap();
        let parameters = doc.parameters.as_ref().unwrap();
        assert_eq!(parameters["Limit"].as_item().unwrap().name(), "limit");
        assert!(parameters["Alias"].is_reference());
        let responses = doc.responses.as_ref().unwrap();
        assert!(matches!(&responses["NotFound"], ReferenceOr::Item(_)));
        assert!(responses["Missing"].is_reference());
        assert_eq!(serde_json::to_value(&doc).unwrap(), raw);
    }

    #[test]
    fn test_operation_lookup() {
        let doc: Swagger = serde_json::from_value(petstore()).unwrap();
        let get = doc.find_operation("getPet").unwrap();
        assert_eq!(get.method, Method::GET);
        let responses = get.operation.responses.as_ref().unwrap();
        assert!(matches!(responses.status(200), Some(ReferenceOr::Item(_))));
        assert!(responses.default_response().is_some());
        assert_eq!(doc.operations().len(), 2);
    }
}
