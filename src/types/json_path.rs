use crate::{ENCODED_SLASH, ENCODED_TILDE, PATH_SEPARATOR, TILDE};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Location of a node inside a document, kept as already-escaped
/// JSON pointer segments.
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq, Hash)]
pub struct JsonPath(pub Vec<String>);

impl JsonPath {
    pub fn new() -> Self {
        JsonPath(Vec::new())
    }

    /// Starts a path at the given segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut path = JsonPath::new();
        for segment in segments {
            path.add(segment);
        }
        path
    }

    pub fn add(&mut self, segment: impl AsRef<str>) -> &mut Self {
        let segment = segment.as_ref();
        if segment.contains(TILDE) || segment.contains(PATH_SEPARATOR) {
            // `~` first, otherwise the `~` of `~1` would be escaped again
            let segment = segment
                .replace(TILDE, ENCODED_TILDE)
                .replace(PATH_SEPARATOR, ENCODED_SLASH);
            self.0.push(segment);
        } else {
            self.0.push(segment.to_owned());
        }

        self
    }

    /// A copy of this path extended by one segment.
    pub fn join(&self, segment: impl AsRef<str>) -> Self {
        let mut path = self.clone();
        path.add(segment);
        path
    }

    pub fn format_path(&self) -> String {
        self.0.join(PATH_SEPARATOR)
    }

    /// The path as an RFC 6901 pointer, suitable for [`serde_json::Value::pointer`].
    pub fn to_pointer(&self) -> String {
        if self.0.is_empty() {
            return String::new();
        }
        format!("{}{}", PATH_SEPARATOR, self.format_path())
    }
}

impl Display for JsonPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.to_pointer())
    }
}
