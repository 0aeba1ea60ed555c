use crate::openapi_common::{ExtensibleMap, Reference, ReferenceOr, is_extension_key};
use crate::types::json_path::JsonPath;
use crate::types::version::SpecVersion;
use crate::types::{OperationView, ParameterKey, ParameterView, PathItemView};
use crate::{PARAMETERS_FIELD, PATHS_FIELD, REF_FIELD};
use http::Method;
use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::sync::OnceLock;

/// Fields whose values are payload data, so a `$ref` below them is not a reference.
const DATA_FIELDS: [&str; 4] = ["example", "default", "enum", "value"];
const EXAMPLES_FIELD: &str = "examples";
const CALLBACKS_FIELD: &str = "callbacks";

/// Fields whose values map user chosen names to objects.
const NAME_MAP_FIELDS: [&str; 16] = [
    PATHS_FIELD,
    "responses",
    "properties",
    "definitions",
    PARAMETERS_FIELD,
    "schemas",
    EXAMPLES_FIELD,
    "requestBodies",
    "headers",
    "securitySchemes",
    "securityDefinitions",
    "links",
    "content",
    "encoding",
    "variables",
    "scopes",
];

/// Where a JSON object sits, which decides how its keys are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    /// An object with fixed field names.
    Object,
    /// Keys are names, values are fixed-shape objects.
    Map,
    /// Keys are names, values are themselves name maps (`callbacks`).
    MapOfMaps,
}

impl NodeKind {
    fn of_field(key: &str) -> Self {
        if key == CALLBACKS_FIELD {
            NodeKind::MapOfMaps
        } else if NAME_MAP_FIELDS.contains(&key) {
            NodeKind::Map
        } else {
            NodeKind::Object
        }
    }
}

static TEMPLATE_VARIABLE: OnceLock<Option<Regex>> = OnceLock::new();

/// Error types that can occur while following references through a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraverserError<'a> {
    /// The pointer of a local reference leads nowhere.
    PathNotFound(Cow<'a, str>),

    /// A chain of reference objects leads back to itself.
    CyclicReference(Cow<'a, str>),

    /// The reference points into another document, which is never fetched.
    ExternalReference(Cow<'a, str>),
}

impl<'a> TraverserError<'a> {
    #[inline]
    pub(crate) fn path_not_found(message: impl Into<Cow<'a, str>>) -> Self {
        Self::PathNotFound(message.into())
    }

    #[inline]
    pub(crate) fn cyclic_reference(message: impl Into<Cow<'a, str>>) -> Self {
        Self::CyclicReference(message.into())
    }

    #[inline]
    pub(crate) fn external_reference(message: impl Into<Cow<'a, str>>) -> Self {
        Self::ExternalReference(message.into())
    }

    pub fn into_owned(self) -> TraverserError<'static> {
        match self {
            TraverserError::PathNotFound(m) => TraverserError::PathNotFound(m.into_owned().into()),
            TraverserError::CyclicReference(m) => {
                TraverserError::CyclicReference(m.into_owned().into())
            }
            TraverserError::ExternalReference(m) => {
                TraverserError::ExternalReference(m.into_owned().into())
            }
        }
    }
}

impl Display for TraverserError<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TraverserError::PathNotFound(reference) => {
                write!(f, "Path not found: {}", reference)
            }
            TraverserError::CyclicReference(reference) => {
                write!(f, "Cyclic reference: {}", reference)
            }
            TraverserError::ExternalReference(reference) => {
                write!(f, "External reference: {}", reference)
            }
        }
    }
}

impl std::error::Error for TraverserError<'_> {}

/// One operation together with where it sits in the document.
pub struct OperationEntry<'a, I>
where
    I: PathItemView,
{
    /// The path template the operation is mounted on, e.g. `/pets/{id}`.
    pub template: &'a str,
    pub method: Method,
    pub path_item: &'a I,
    pub operation: &'a I::Operation,
}

impl<'a, I> OperationEntry<'a, I>
where
    I: PathItemView,
{
    /// Location of the operation inside the document.
    pub fn pointer(&self) -> JsonPath {
        let mut path = JsonPath::new();
        path.add(PATHS_FIELD)
            .add(self.template)
            .add(self.method.as_str().to_lowercase());
        path
    }

    pub fn operation_id(&self) -> Option<&'a str> {
        self.operation.operation_id()
    }

    pub fn effective_parameters(
        &self,
    ) -> Vec<&'a ReferenceOr<<I::Operation as OperationView>::Parameter>> {
        merge_parameters(self.path_item.parameters(), self.operation.parameters())
    }
}

/// Lists every operation under `paths`, in path order and then method order.
pub fn operations<I>(paths: &ExtensibleMap<I>) -> Vec<OperationEntry<'_, I>>
where
    I: PathItemView,
{
    let mut entries = Vec::new();
    for (template, path_item) in paths.iter() {
        for (method, operation) in path_item.operations() {
            log::trace!("Found operation {} {}", method, template);
            entries.push(OperationEntry {
                template,
                method,
                path_item,
                operation,
            });
        }
    }
    entries
}

pub fn find_operation<'a, I>(
    paths: &'a ExtensibleMap<I>,
    operation_id: &str,
) -> Option<OperationEntry<'a, I>>
where
    I: PathItemView,
{
    operations(paths)
        .into_iter()
        .find(|entry| entry.operation_id() == Some(operation_id))
}

/// Merges path level parameters into an operation's own.
///
/// An operation parameter replaces the path level one with the same name and
/// location. References cannot be keyed without resolving them, so they are
/// always kept.
pub fn merge_parameters<'a, P>(
    path_level: &'a [ReferenceOr<P>],
    operation_level: &'a [ReferenceOr<P>],
) -> Vec<&'a ReferenceOr<P>>
where
    P: ParameterView,
{
    let overridden: HashSet<ParameterKey> = operation_level
        .iter()
        .filter_map(ReferenceOr::as_item)
        .map(ParameterView::key)
        .collect();
    path_level
        .iter()
        .filter(|parameter| match parameter {
            ReferenceOr::Item(item) => !overridden.contains(&item.key()),
            ReferenceOr::Reference(_) => true,
        })
        .chain(operation_level.iter())
        .collect()
}

/// Variable names in a path template, in order of appearance.
pub fn template_variables(template: &str) -> Vec<&str> {
    let pattern = TEMPLATE_VARIABLE
        .get_or_init(|| Regex::new(r"\{([^{}/]+)\}").ok())
        .as_ref();
    match pattern {
        Some(pattern) => pattern
            .captures_iter(template)
            .filter_map(|captures| captures.get(1))
            .map(|name| name.as_str())
            .collect(),
        None => Vec::new(),
    }
}

/// Follows `$ref` strings inside a raw document tree. Nothing is substituted.
pub struct ReferenceTraverser<'a> {
    document: &'a Value,
    version: SpecVersion,
}

impl<'a> ReferenceTraverser<'a> {
    pub fn new(document: &'a Value, version: SpecVersion) -> Self {
        Self { document, version }
    }

    /// Every `$ref` string in the document together with where it was found.
    ///
    /// Extension values and example payloads are skipped, since `$ref` inside
    /// them is plain data. Keys of name maps such as `responses` or
    /// `properties` are never treated as payload fields.
    pub fn collect_references(&self) -> Vec<(JsonPath, &'a str)> {
        let mut found = Vec::new();
        self.collect_from(self.document, NodeKind::Object, JsonPath::new(), &mut found);
        found
    }

    fn collect_from(
        &self,
        node: &'a Value,
        kind: NodeKind,
        path: JsonPath,
        found: &mut Vec<(JsonPath, &'a str)>,
    ) {
        match node {
            Value::Object(object) => {
                if kind == NodeKind::Object {
                    if let Some(reference) = object.get(REF_FIELD).and_then(Value::as_str) {
                        found.push((path.clone(), reference));
                    }
                }
                for (key, child) in object {
                    let child_kind = match kind {
                        NodeKind::Object => {
                            if key == REF_FIELD || self.is_data_field(key, child) {
                                continue;
                            }
                            NodeKind::of_field(key)
                        }
                        NodeKind::Map | NodeKind::MapOfMaps if is_extension_key(key) => continue,
                        NodeKind::Map => NodeKind::Object,
                        NodeKind::MapOfMaps => NodeKind::Map,
                    };
                    self.collect_from(child, child_kind, path.join(key), found);
                }
            }
            Value::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    self.collect_from(child, NodeKind::Object, path.join(index.to_string()), found);
                }
            }
            _ => {}
        }
    }

    /// Only asked of fields of a fixed-shape object.
    fn is_data_field(&self, key: &str, value: &Value) -> bool {
        if is_extension_key(key) || DATA_FIELDS.contains(&key) {
            return true;
        }
        // v2 response examples are keyed payloads; v3 `examples` maps hold
        // example objects, except on schemas where it is a plain array
        key == EXAMPLES_FIELD && (self.version == SpecVersion::Swagger2 || value.is_array())
    }

    /// Finds the node a local reference points at, following chains of pure
    /// reference objects.
    pub fn resolve(&self, reference: &'a str) -> Result<&'a Value, TraverserError<'a>> {
        let mut seen_references = HashSet::new();
        self.resolve_chain(reference, &mut seen_references)
    }

    fn resolve_chain(
        &self,
        reference: &'a str,
        seen_references: &mut HashSet<&'a str>,
    ) -> Result<&'a Value, TraverserError<'a>> {
        if !seen_references.insert(reference) {
            return Err(TraverserError::cyclic_reference(reference));
        }
        let pointer = Reference::new(reference)
            .pointer()
            .ok_or_else(|| TraverserError::external_reference(reference))?;
        let target = self
            .document
            .pointer(&pointer)
            .ok_or_else(|| TraverserError::path_not_found(reference))?;
        match Self::pure_reference(target) {
            Some(next) => self.resolve_chain(next, seen_references),
            None => Ok(target),
        }
    }

    fn pure_reference(node: &Value) -> Option<&str> {
        let object = node.as_object()?;
        if object.len() != 1 {
            return None;
        }
        object.get(REF_FIELD)?.as_str()
    }
}
