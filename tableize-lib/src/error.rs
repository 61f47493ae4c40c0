//! Error types for the inliner.
//!
//! Stylesheet parsing is all-or-nothing: the first [`CssError`] aborts the
//! call and carries the text that could not be parsed.

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Selector or declaration text could not be parsed
    #[error("CSS error: {0}")]
    Css(#[from] CssError),

    /// A required constructor input was missing
    #[error("Argument error: {0}")]
    Argument(#[from] ArgumentError),

    /// Reading a stylesheet or document failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while parsing stylesheet text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CssError {
    #[error("selectors cannot begin with a bracket ('{0}')")]
    BracketBeforeSelector(char),

    #[error("could not parse selector '{text}'")]
    Selector {
        text: String,
        #[source]
        source: Box<CssError>,
    },

    #[error("could not parse declarations '{text}'")]
    Declarations {
        text: String,
        #[source]
        source: Box<CssError>,
    },

    #[error("could not parse CSS declaration '{0}' because it had no ':'")]
    MissingColon(String),

    #[error("CSS declaration '{0}' has an empty property")]
    EmptyDeclaration(String),

    #[error("'{0}' is not a known HTML tag name")]
    UnknownTag(String),

    #[error("selector '{0}' contains an empty step")]
    EmptyStep(String),

    #[error("selector '{0}' uses an unsupported selector form")]
    UnsupportedSelector(String),

    #[error("selector text is empty")]
    EmptySelector,
}

/// Raised when a model type is constructed from missing input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
}
