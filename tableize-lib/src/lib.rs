//! Inlines `<style>` rules into HTML email markup.
//!
//! Email clients tend to drop `<style>` blocks and class attributes, so this
//! crate rewrites a document until all of its styling lives in inline `style`
//! attributes and legacy presentational attributes (`align`, `bgcolor`,
//! `width`, ...). Elements styled with the private `-tableize` property are
//! turned into one-cell tables.
//!
//! ```
//! use tableize_lib::tableize;
//!
//! let html = tableize::inline_html_to_string("<p style='-tableize:1'>Text</p>", None).unwrap();
//! assert_eq!(html, r#"<table cellspacing="0" border="0"><tr><td>Text</td></tr></table>"#);
//! ```

pub mod config;
pub mod dom;
pub mod error;
pub mod parser;
pub mod style;
pub mod tableize_generate;

pub use config::InlineOptions;
pub use dom::dom_tree::Document;
pub use error::{ArgumentError, CssError, Error, Result};
pub use tableize_generate::tableize;
