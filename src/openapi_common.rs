use crate::error::ShapeError;
use crate::{
    DEFAULT_RESPONSE, ENCODED_SLASH, ENCODED_TILDE, EXTENSION_PREFIX, PATH_SEPARATOR, REF_FIELD,
    TILDE,
};
use percent_encoding::percent_decode_str;
use serde::de::{DeserializeOwned, Deserializer, Error as DeError};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Open key space carried by every extensible object.
///
/// Any key an object does not name lands here, so documents survive a
/// parse/serialize round trip unchanged.
pub type Extensions = BTreeMap<String, Value>;

/// Lists the required scopes per security scheme name.
pub type SecurityRequirement = BTreeMap<String, Vec<String>>;

pub fn is_extension_key(key: &str) -> bool {
    key.starts_with(EXTENSION_PREFIX)
}

/// Keeps an explicit `null` as `Some(Value::Null)`. Pair with
/// `#[serde(default)]` so a missing field still reads as `None`.
pub(crate) fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Access to the specification extensions an object carries.
pub trait Extensible {
    fn extensions(&self) -> &Extensions;

    /// Looks up a single extension. Unknown keys are simply absent.
    fn extension(&self, key: &str) -> Option<&Value> {
        self.extensions().get(key)
    }

    /// Only the `x-` prefixed entries.
    fn vendor_extensions(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.extensions()
            .iter()
            .filter(|(key, _)| is_extension_key(key))
    }

    /// Keys held as extensions that lack the `x-` prefix.
    fn foreign_keys(&self) -> Vec<&str> {
        self.extensions()
            .keys()
            .filter(|key| !is_extension_key(key))
            .map(String::as_str)
            .collect()
    }
}

macro_rules! impl_extensible {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::openapi_common::Extensible for $ty {
                fn extensions(&self) -> &$crate::openapi_common::Extensions {
                    &self.extensions
                }
            }
        )+
    };
}
pub(crate) use impl_extensible;

/// A reference object. It holds nothing but the `$ref` string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "$ref")]
    pub reference: String,
}

impl Reference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
        }
    }

    /// True when the reference points into the same document.
    pub fn is_local(&self) -> bool {
        self.reference.starts_with('#')
    }

    /// The raw text after `#`, if any.
    pub fn fragment(&self) -> Option<&str> {
        self.reference
            .split_once('#')
            .map(|(_, fragment)| fragment)
    }

    /// The fragment decoded into a JSON pointer usable with [`Value::pointer`].
    ///
    /// Returns `None` for references into other documents.
    pub fn pointer(&self) -> Option<String> {
        if !self.is_local() {
            return None;
        }
        let fragment = self.fragment().unwrap_or_default();
        Some(percent_decode_str(fragment).decode_utf8_lossy().into_owned())
    }

    /// The last pointer segment with `~1` and `~0` unescaped,
    /// e.g. `Pet` for `#/components/schemas/Pet`.
    pub fn component_name(&self) -> Option<String> {
        let pointer = self.pointer()?;
        let last = pointer.rsplit(PATH_SEPARATOR).next()?;
        if last.is_empty() {
            return None;
        }
        Some(
            last.replace(ENCODED_SLASH, PATH_SEPARATOR)
                .replace(ENCODED_TILDE, TILDE),
        )
    }
}

/// Either a reference object or an inline value, never both.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReferenceOr<T> {
    Reference(Reference),
    Item(T),
}

impl<T> ReferenceOr<T> {
    pub fn reference(reference: impl Into<String>) -> Self {
        ReferenceOr::Reference(Reference::new(reference))
    }

    pub fn as_item(&self) -> Option<&T> {
        match self {
            ReferenceOr::Reference(_) => None,
            ReferenceOr::Item(item) => Some(item),
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            ReferenceOr::Reference(reference) => Some(reference),
            ReferenceOr::Item(_) => None,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, ReferenceOr::Reference(_))
    }
}

impl<'de, T> Deserialize<'de> for ReferenceOr<T>
where
    T: DeserializeOwned,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if let Some(reference) = value.get(REF_FIELD) {
            let reference = reference
                .as_str()
                .ok_or_else(|| D::Error::custom("`$ref` must be a string"))?;
            let siblings: Vec<&String> = value
                .as_object()
                .into_iter()
                .flat_map(|object| object.keys())
                .filter(|key| key.as_str() != REF_FIELD)
                .collect();
            if !siblings.is_empty() {
                return Err(D::Error::custom(ShapeError::reference_siblings(
                    reference, siblings,
                )));
            }
            return Ok(ReferenceOr::reference(reference));
        }
        serde_json::from_value(value)
            .map(ReferenceOr::Item)
            .map_err(D::Error::custom)
    }
}

/// A map of patterned fields (paths, responses, callbacks, scopes) that may
/// also carry `x-` extensions alongside the entries.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensibleMap<T> {
    pub entries: BTreeMap<String, T>,
    pub extensions: Extensions,
}

impl<T> Default for ExtensibleMap<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            extensions: Extensions::new(),
        }
    }
}

impl<T> ExtensibleMap<T> {
    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &T)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<R> ExtensibleMap<ReferenceOr<R>> {
    /// The `default` response, used for codes not declared explicitly.
    pub fn default_response(&self) -> Option<&ReferenceOr<R>> {
        self.get(DEFAULT_RESPONSE)
    }

    /// The response declared for `code`, falling back to its `NXX` range.
    pub fn status(&self, code: u16) -> Option<&ReferenceOr<R>> {
        self.get(&code.to_string())
            .or_else(|| self.get(&format!("{}XX", code / 100)))
    }
}

impl<T> FromIterator<(String, T)> for ExtensibleMap<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            extensions: Extensions::new(),
        }
    }
}

impl<T> Extensible for ExtensibleMap<T> {
    fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}

impl<T> Serialize for ExtensibleMap<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len() + self.extensions.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        for (key, value) in &self.extensions {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de, T> Deserialize<'de> for ExtensibleMap<T>
where
    T: DeserializeOwned,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        let mut map = ExtensibleMap::default();
        for (key, value) in raw {
            if is_extension_key(&key) {
                map.extensions.insert(key, value);
                continue;
            }
            let entry = serde_json::from_value(value)
                .map_err(|e| D::Error::custom(format!("`{}`: {}", key, e)))?;
            map.entries.insert(key, entry);
        }
        Ok(map)
    }
}

/// Metadata about the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// The title of the API.
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "termsOfService")]
    pub terms_of_service: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,

    /// The version of the API document, not of the format.
    pub version: String,

    #[serde(flatten)]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Additional external documentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalDocumentation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The URL for the target documentation.
    pub url: String,

    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Adds metadata to a tag used by operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "externalDocs")]
    pub external_docs: Option<ExternalDocumentation>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Fine-tunes the XML representation of a schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Xml {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapped: Option<bool>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

impl_extensible!(Info, Contact, License, ExternalDocumentation, Tag, Xml);

#[cfg(test)]
mod test {
    use crate::openapi_common::{
        Extensible, ExtensibleMap, Info, Reference, ReferenceOr, is_extension_key,
    };
    use serde_json::json;

    #[derive(Debug, serde::Deserialize, serde::Serialize, PartialEq)]
    struct Thing {
        name: String,
    }

    #[test]
    fn test_reference_or_reads_reference() {
        let parsed: ReferenceOr<Thing> =
            serde_json::from_value(json!({"$ref": "#/components/schemas/Pet"})).unwrap();
        assert_eq!(
            parsed,
            ReferenceOr::Reference(Reference::new("#/components/schemas/Pet"))
        );
    }

    #[test]
    fn test_reference_or_reads_inline_item() {
        let parsed: ReferenceOr<Thing> = serde_json::from_value(json!({"name": "x"})).unwrap();
        assert_eq!(parsed.as_item().unwrap().name, "x");
        assert!(!parsed.is_reference());
    }

    #[test]
    fn test_reference_or_rejects_siblings() {
        let parsed = serde_json::from_value::<ReferenceOr<Thing>>(json!({
            "$ref": "#/definitions/Pet",
            "description": "not allowed here"
        }));
        let err = parsed.unwrap_err().to_string();
        assert!(err.contains("description"), "{}", err);
    }

    #[test]
    fn test_reference_or_rejects_non_string_ref() {
        let parsed = serde_json::from_value::<ReferenceOr<Thing>>(json!({"$ref": 5}));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_reference_serializes_single_key() {
        let reference: ReferenceOr<Thing> = ReferenceOr::reference("#/definitions/Pet");
        assert_eq!(
            serde_json::to_value(&reference).unwrap(),
            json!({"$ref": "#/definitions/Pet"})
        );
    }

    #[test]
    fn test_reference_pointer_and_name() {
        let reference = Reference::new("#/components/schemas/Pet%20Food");
        assert!(reference.is_local());
        assert_eq!(
            reference.pointer().as_deref(),
            Some("/components/schemas/Pet Food")
        );
        assert_eq!(reference.component_name().as_deref(), Some("Pet Food"));

        let escaped = Reference::new("#/paths/~1pets~1{id}");
        assert_eq!(escaped.component_name().as_deref(), Some("/pets/{id}"));
    }

    #[test]
    fn test_external_reference_has_no_pointer() {
        let reference = Reference::new("common.yaml#/Pet");
        assert!(!reference.is_local());
        assert_eq!(reference.fragment(), Some("/Pet"));
        assert_eq!(reference.pointer(), None);
    }

    #[test]
    fn test_extensible_map_splits_extensions() {
        let map: ExtensibleMap<Thing> = serde_json::from_value(json!({
            "a": {"name": "first"},
            "x-order": [1, 2]
        }))
        .unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("a").unwrap().name, "first");
        assert_eq!(map.extension("x-order"), Some(&json!([1, 2])));
        assert_eq!(
            serde_json::to_value(&map).unwrap(),
            json!({"a": {"name": "first"}, "x-order": [1, 2]})
        );
    }

    #[test]
    fn test_extensible_map_reports_bad_entry_key() {
        let err = serde_json::from_value::<ExtensibleMap<Thing>>(json!({"a": {"title": 1}}))
            .unwrap_err()
            .to_string();
        assert!(err.starts_with("`a`"), "{}", err);
    }

    #[test]
    fn test_info_keeps_unknown_keys() {
        let raw = json!({
            "title": "Pets",
            "version": "1.0.0",
            "x-logo": {"url": "logo.png"},
            "legacy": true
        });
        let info: Info = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(info.extension("x-logo"), Some(&json!({"url": "logo.png"})));
        assert_eq!(info.vendor_extensions().count(), 1);
        assert_eq!(info.foreign_keys(), vec!["legacy"]);
        assert_eq!(serde_json::to_value(&info).unwrap(), raw);
    }

    #[test]
    fn test_extension_key_prefix() {
        assert!(is_extension_key("x-internal"));
        assert!(!is_extension_key("internal"));
        assert!(!is_extension_key("X-upper"));
    }
}
