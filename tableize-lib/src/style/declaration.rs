use crate::error::ArgumentError;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Property names the inliner treats specially.
pub mod properties {
    pub const WIDTH: &str = "width";
    pub const HEIGHT: &str = "height";
    pub const PADDING: &str = "padding";
    pub const TEXT_ALIGN: &str = "text-align";
    pub const VERTICAL_ALIGN: &str = "vertical-align";
    pub const BACKGROUND_COLOR: &str = "background-color";

    /// Private directive that turns an element into a one-cell table.
    pub const TABLEIZE: &str = "-tableize";
    /// Prefix of private properties that are written as plain attributes.
    pub const ATTRIBUTE_PREFIX: &str = "-attr-";
}

/// A single `property: value` pair, e.g. `font-size: large`.
///
/// The property is stored lower-cased. Two declarations are equal when their
/// textual forms (`property:value;`) are equal.
#[derive(Debug, Clone)]
pub struct Declaration {
    property: String,
    value: String,
}

impl Declaration {
    pub fn new(property: &str, value: &str) -> Result<Self, ArgumentError> {
        if value.is_empty() {
            return Err(ArgumentError::Empty("value"));
        }
        Self::parsed(property, value)
    }

    /// Builds a declaration read from CSS text, where `color:` is allowed and
    /// keeps an empty value.
    pub(crate) fn parsed(property: &str, value: &str) -> Result<Self, ArgumentError> {
        if property.is_empty() {
            return Err(ArgumentError::Empty("property"));
        }
        Ok(Declaration {
            property: property.to_ascii_lowercase(),
            value: value.to_string(),
        })
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_property(&self, name: &str) -> bool {
        self.property.eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{};", self.property, self.value)
    }
}

impl PartialEq for Declaration {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for Declaration {}

impl Hash for Declaration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}
