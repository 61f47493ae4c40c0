//! Hand-rolled stylesheet scanner.
//!
//! Rule blocks are delimited by braces and scanned in a single forward pass.
//! Declarations are split on the first `:` only, since values such as
//! `progid:DXImageTransform...` contain more colons.

use crate::error::CssError;
use crate::style::declaration::Declaration;
use crate::style::rule::Rule;
use crate::style::rule_dictionary::RuleDictionary;
use crate::style::selector::{Selector, SelectorBuilder, SelectorKind};
use log::{trace, warn};
use regex::Regex;
use std::sync::OnceLock;

/// Matches `// ...` line comments and `/* ... */` block comments.
fn comment_pattern() -> &'static Regex {
    static COMMENTS: OnceLock<Regex> = OnceLock::new();
    COMMENTS.get_or_init(|| {
        Regex::new(r"(//.*)|(?s:/\*.*?\*/)")
            .unwrap_or_else(|err| panic!("invalid comment regex: {err}"))
    })
}

/// Removes comments from stylesheet text.
pub fn strip_comments(source: &str) -> String {
    comment_pattern().replace_all(source, "").into_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Idle,
    Selector,
    Declarations,
}

/// Parses a stylesheet into its rules, in source order.
pub fn parse_rules(source: &str) -> Result<Vec<Rule>, CssError> {
    let source = strip_comments(source);

    let mut rules = Vec::new();
    let mut state = ScanState::Idle;
    let mut buffer = String::new();
    let mut selector_text = String::new();

    for ch in source.chars() {
        match state {
            ScanState::Idle => {
                if ch.is_whitespace() {
                    continue;
                }
                if ch == '{' || ch == '}' {
                    return Err(CssError::BracketBeforeSelector(ch));
                }
                buffer.clear();
                buffer.push(ch);
                state = ScanState::Selector;
            }
            ScanState::Selector => {
                if ch == '{' {
                    selector_text = buffer.trim().to_string();
                    buffer.clear();
                    state = ScanState::Declarations;
                } else {
                    buffer.push(ch);
                }
            }
            ScanState::Declarations => {
                if ch == '}' {
                    rules.push(build_rule(&selector_text, buffer.trim())?);
                    buffer.clear();
                    state = ScanState::Idle;
                } else {
                    buffer.push(ch);
                }
            }
        }
    }

    if state != ScanState::Idle {
        warn!(
            "ignoring unterminated rule at end of stylesheet: '{}'",
            buffer.trim()
        );
    }
    trace!("parsed {} css rules", rules.len());
    Ok(rules)
}

fn build_rule(selector_text: &str, declaration_text: &str) -> Result<Rule, CssError> {
    let selectors = parse_selector_list(selector_text).map_err(|err| CssError::Selector {
        text: selector_text.to_string(),
        source: Box::new(err),
    })?;
    let declarations =
        parse_declarations(declaration_text).map_err(|err| CssError::Declarations {
            text: declaration_text.to_string(),
            source: Box::new(err),
        })?;
    Ok(Rule::new(selectors, declarations))
}

/// Parses stylesheet text straight into a [`RuleDictionary`].
pub fn parse_rule_dictionary(source: &str) -> Result<RuleDictionary, CssError> {
    let mut dictionary = RuleDictionary::new();
    dictionary.add_rules(&parse_rules(source)?);
    Ok(dictionary)
}

/// Parses a comma separated selector group such as `h1, .title`.
pub fn parse_selector_list(text: &str) -> Result<Vec<Selector>, CssError> {
    let selectors = text
        .split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(parse_selector)
        .collect::<Result<Vec<_>, _>>()?;
    if selectors.is_empty() {
        return Err(CssError::EmptySelector);
    }
    Ok(selectors)
}

/// Parses one selector (no commas) into its chain of steps.
pub fn parse_selector(text: &str) -> Result<Selector, CssError> {
    let mut builder = SelectorBuilder::new(text);
    for ch in text.chars() {
        if let Some(kind) = SelectorKind::from_directive(ch) {
            builder.start_step(kind);
        } else if ch.is_whitespace() {
            builder.mark_descendant();
        } else {
            builder.push_char(ch)?;
        }
    }
    builder.finish()
}

/// Parses a declaration block body, e.g. `color: red; font-size: 12px`.
pub fn parse_declarations(text: &str) -> Result<Vec<Declaration>, CssError> {
    text.split(';')
        .filter(|piece| !piece.trim().is_empty())
        .map(parse_declaration)
        .collect()
}

/// Parses a single `property: value` pair. The value may be empty.
pub fn parse_declaration(text: &str) -> Result<Declaration, CssError> {
    let (property, value) = text
        .split_once(':')
        .ok_or_else(|| CssError::MissingColon(text.trim().to_string()))?;

    let property = property.trim();
    let value = value.trim();
    let value = value.strip_suffix(';').unwrap_or(value).trim_end();

    Declaration::parsed(property, value)
        .map_err(|_| CssError::EmptyDeclaration(text.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::selector::Relationship;
    use pretty_assertions::assert_eq;

    fn decl(property: &str, value: &str) -> Declaration {
        Declaration::new(property, value).unwrap()
    }

    #[test]
    fn parses_rules_in_order() {
        let rules = parse_rules(
            r#"
            p { color: white; -tableize: 1 }
            .title, h1 { font-size: 20px; font-weight: bold; }
            "#,
        )
        .unwrap();

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].selectors()[0].text(), "p");
        assert_eq!(
            rules[0].declarations(),
            &[decl("color", "white"), decl("-tableize", "1")]
        );
        let texts: Vec<String> = rules[1].selectors().iter().map(Selector::text).collect();
        assert_eq!(texts, vec![".title", "h1"]);
        assert_eq!(rules[1].declarations().len(), 2);
    }

    #[test]
    fn strips_line_and_block_comments() {
        let rules = parse_rules(
            "// heading styles\nh1 { /* large\n and bold */ font-size: 20px; }\n/* trailing */",
        )
        .unwrap();

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].declarations(), &[decl("font-size", "20px")]);
    }

    #[test]
    fn bracket_before_selector_is_an_error() {
        assert_eq!(
            parse_rules("{ color: red }"),
            Err(CssError::BracketBeforeSelector('{'))
        );
        assert_eq!(
            parse_rules("p { color: red } }"),
            Err(CssError::BracketBeforeSelector('}'))
        );
    }

    #[test]
    fn unknown_tag_fails_with_selector_text() {
        let err = parse_rules("foobar { color:red }").unwrap_err();
        match err {
            CssError::Selector { text, source } => {
                assert_eq!(text, "foobar");
                assert_eq!(*source, CssError::UnknownTag("foobar".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn bad_declaration_fails_with_block_text() {
        let err = parse_rules("p { color red }").unwrap_err();
        assert!(matches!(err, CssError::Declarations { ref text, .. } if text == "color red"));
    }

    #[test]
    fn unterminated_rule_is_dropped() {
        let rules = parse_rules("p { color: red } h1 { color: blue").unwrap();
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn first_colon_splits_declaration() {
        let filter = parse_declaration(
            "filter: progid:DXImageTransform.Microsoft.gradient(startColorstr='#fff')",
        )
        .unwrap();
        assert_eq!(filter.property(), "filter");
        assert_eq!(
            filter.value(),
            "progid:DXImageTransform.Microsoft.gradient(startColorstr='#fff')"
        );
    }

    #[test]
    fn declaration_edge_cases() {
        assert_eq!(
            parse_declaration(" Color : red ;").unwrap(),
            decl("color", "red")
        );
        assert_eq!(
            parse_declaration("color red"),
            Err(CssError::MissingColon("color red".to_string()))
        );
        let empty_value = parse_declaration("color:").unwrap();
        assert_eq!(empty_value.property(), "color");
        assert_eq!(empty_value.value(), "");
        assert_eq!(
            parse_declaration(": red"),
            Err(CssError::EmptyDeclaration(": red".to_string()))
        );
    }

    #[test]
    fn declarations_skip_blank_segments() {
        let decls = parse_declarations("color:red;; ;font-size:12px;").unwrap();
        assert_eq!(decls, vec![decl("color", "red"), decl("font-size", "12px")]);
        assert!(parse_declarations("   ").unwrap().is_empty());
    }

    #[test]
    fn declarations_survive_serialization() {
        let original = vec![
            decl("color", "red"),
            decl("filter", "progid:DXImageTransform.Microsoft.Alpha(opacity=80)"),
            decl("-attr-cellpadding", "4"),
        ];
        let text: String = original.iter().map(Declaration::to_string).collect();
        assert_eq!(parse_declarations(&text).unwrap(), original);
    }

    #[test]
    fn parses_combined_and_descendant_selectors() {
        let selector = parse_selector("td.field").unwrap();
        assert_eq!(selector.kind(), SelectorKind::Tag);
        assert_eq!(selector.inner_text(), "td");
        assert_eq!(selector.relationship(), Relationship::Combination);
        let child = selector.child().unwrap();
        assert_eq!(child.kind(), SelectorKind::Class);
        assert_eq!(child.inner_text(), "field");

        let selector = parse_selector("div  #main a:hover").unwrap();
        let kinds: Vec<SelectorKind> = selector.steps().map(Selector::kind).collect();
        assert_eq!(
            kinds,
            vec![
                SelectorKind::Tag,
                SelectorKind::Id,
                SelectorKind::Tag,
                SelectorKind::PseudoClass
            ]
        );
        assert_eq!(selector.text(), "div #main a:hover");
    }

    #[test]
    fn selector_text_is_stable() {
        let texts = [
            "p",
            ".title",
            "#main",
            "td.field",
            "div .note",
            "a:hover",
            ".a.b #c",
        ];
        for text in texts {
            let selector = parse_selector(text).unwrap();
            let reparsed = parse_selector(&selector.text()).unwrap();
            assert_eq!(reparsed.text(), selector.text());
            assert_eq!(selector.text(), text);
        }
    }

    #[test]
    fn tag_names_are_lower_cased() {
        assert_eq!(parse_selector("TD").unwrap().text(), "td");
        assert_eq!(parse_selector(".Title").unwrap().text(), ".Title");
    }

    #[test]
    fn unsupported_selectors_are_rejected() {
        for text in ["*", "div > p", "a[href]"] {
            assert!(matches!(
                parse_selector(text),
                Err(CssError::UnsupportedSelector(_))
            ));
        }
        assert!(matches!(parse_selector("."), Err(CssError::EmptyStep(_))));
        assert_eq!(parse_selector_list(" , "), Err(CssError::EmptySelector));
    }
}
