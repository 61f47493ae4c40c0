use crate::error::Result;
use crate::style::css_parser;
use crate::style::rule::Rule;
use crate::style::rule_dictionary::RuleDictionary;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// A parsed stylesheet together with the text it came from.
#[derive(Debug, Clone)]
pub struct StyleSheet {
    /// Where the sheet was read from; informational only.
    pub file_path: Option<PathBuf>,
    pub source_text: String,
    pub rules: Vec<Rule>,
}

impl StyleSheet {
    pub fn from_text(text: &str) -> Result<Self> {
        Ok(StyleSheet {
            file_path: None,
            source_text: text.to_string(),
            rules: css_parser::parse_rules(text)?,
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let mut sheet = Self::from_text(&text)?;
        debug!("loaded {} rules from {}", sheet.rules.len(), path.display());
        sheet.file_path = Some(path.to_path_buf());
        Ok(sheet)
    }

    pub fn to_rule_dictionary(&self) -> RuleDictionary {
        let mut dictionary = RuleDictionary::new();
        dictionary.add_rules(&self.rules);
        dictionary
    }
}
