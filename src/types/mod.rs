pub mod json_path;
pub mod version;

use crate::openapi_common::{ReferenceOr, SecurityRequirement};
use http::Method;
use std::fmt::{Display, Formatter};

/// A parameter is unique within an operation by its name and location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParameterKey {
    pub name: String,
    pub location: &'static str,
}

impl Display for ParameterKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.location)
    }
}

/// What both document versions agree a parameter has.
pub trait ParameterView {
    fn name(&self) -> &str;

    /// The `in` value as it appears in the document.
    fn location(&self) -> &'static str;

    fn is_required(&self) -> bool;

    fn key(&self) -> ParameterKey {
        ParameterKey {
            name: self.name().to_string(),
            location: self.location(),
        }
    }

    fn is_path(&self) -> bool {
        self.location() == crate::PATH_LOCATION
    }
}

pub trait OperationView {
    type Parameter: ParameterView;

    fn operation_id(&self) -> Option<&str>;

    fn parameters(&self) -> &[ReferenceOr<Self::Parameter>];

    /// Operation level requirements; `None` inherits the document's.
    fn security(&self) -> Option<&[SecurityRequirement]>;
}

pub trait PathItemView {
    type Operation: OperationView;

    /// Operations in the order the format declares the methods.
    fn operations(&self) -> Vec<(Method, &Self::Operation)>;

    fn parameters(&self) -> &[ReferenceOr<<Self::Operation as OperationView>::Parameter>];
}
