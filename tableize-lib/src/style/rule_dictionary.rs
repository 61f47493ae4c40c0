use crate::error::CssError;
use crate::style::css_parser;
use crate::style::declaration::Declaration;
use crate::style::rule::Rule;
use std::collections::HashMap;

/// Declarations indexed by selector text.
///
/// Rules sharing a selector are merged into one entry, and a rule with several
/// selectors contributes to each of them. Declarations keep encounter order
/// and are never deduplicated.
#[derive(Debug, Default, Clone)]
pub struct RuleDictionary {
    entries: HashMap<String, Vec<Declaration>>,
    /// Keys in first-insertion order.
    order: Vec<String>,
}

impl RuleDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rules(&mut self, rules: &[Rule]) {
        for rule in rules {
            for selector in rule.selectors() {
                let key = selector.text();
                match self.entries.get_mut(&key) {
                    Some(existing) => existing.extend_from_slice(rule.declarations()),
                    None => {
                        self.order.push(key.clone());
                        self.entries.insert(key, rule.declarations().to_vec());
                    }
                }
            }
        }
    }

    /// Declarations for the exact selector text, if any rule used it.
    pub fn get(&self, selector: &str) -> Option<&[Declaration]> {
        self.entries.get(selector).map(Vec::as_slice)
    }

    pub fn class_declarations(&self, class_name: &str) -> Option<&[Declaration]> {
        self.get(&format!(".{}", class_name))
    }

    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Names of classes that have a rule of their own. Chained and descendant
    /// selectors are left out.
    pub fn class_names(&self) -> Result<Vec<String>, CssError> {
        let mut names = Vec::new();
        for key in self.selectors() {
            let selector = css_parser::parse_selector(key)?;
            if let Some(name) = selector.class_name() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::css_parser::parse_rules;
    use pretty_assertions::assert_eq;

    fn dictionary(css: &str) -> RuleDictionary {
        let mut dictionary = RuleDictionary::new();
        dictionary.add_rules(&parse_rules(css).unwrap());
        dictionary
    }

    fn texts(declarations: Option<&[Declaration]>) -> Vec<String> {
        declarations
            .unwrap_or_default()
            .iter()
            .map(Declaration::to_string)
            .collect()
    }

    #[test]
    fn merges_rules_with_the_same_selector() {
        let rules = dictionary("p { color: red } .x, p { font-size: 12px; color: blue }");

        assert_eq!(
            texts(rules.get("p")),
            vec!["color:red;", "font-size:12px;", "color:blue;"]
        );
        assert_eq!(texts(rules.class_declarations("x")), vec!["font-size:12px;", "color:blue;"]);
        assert_eq!(rules.get(".missing"), None);
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn keys_are_canonical_selector_text() {
        let rules = dictionary("TD { color: red } td{ width: 10px }");
        assert_eq!(rules.selectors().collect::<Vec<_>>(), vec!["td"]);
        assert_eq!(texts(rules.get("td")), vec!["color:red;", "width:10px;"]);
    }

    #[test]
    fn class_names_skip_chained_selectors() {
        let rules = dictionary(
            ".a { color: red } .b .c { color: blue } td.d { x: y } #e { x: y } .f { x: y }",
        );
        assert_eq!(rules.class_names().unwrap(), vec!["a", "f"]);
    }

    #[test]
    fn empty_dictionary() {
        let rules = RuleDictionary::new();
        assert!(rules.is_empty());
        assert_eq!(rules.selectors().count(), 0);
    }
}
