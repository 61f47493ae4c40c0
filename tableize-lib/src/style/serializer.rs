//! Writes rules back out as CSS text.
//!
//! Pretty output puts each declaration on its own tab-indented line; compact
//! output keeps a whole rule on one line.

use crate::error::CssError;
use crate::style::css_parser;
use crate::style::declaration::Declaration;
use crate::style::rule::Rule;
use crate::style::rule_dictionary::RuleDictionary;
use std::fmt::Write;

/// Strips comments and whitespace from a stylesheet.
pub fn compact(source: &str) -> Result<String, CssError> {
    Ok(serialize_rules(&css_parser::parse_rules(source)?, false))
}

pub fn serialize_declarations(declarations: &[Declaration], pretty: bool) -> String {
    let mut out = String::new();
    write_declarations(&mut out, declarations, pretty);
    out
}

pub fn serialize_rules(rules: &[Rule], pretty: bool) -> String {
    let mut out = String::new();
    for rule in rules {
        let selectors: Vec<String> = rule.selectors().iter().map(|s| s.text()).collect();
        write_block(&mut out, &selectors.join(", "), rule.declarations(), pretty);
    }
    out
}

pub fn serialize_rule_dictionary(rules: &RuleDictionary, pretty: bool) -> String {
    let mut out = String::new();
    for selector in rules.selectors() {
        let declarations = rules.get(selector).unwrap_or_default();
        write_block(&mut out, selector, declarations, pretty);
    }
    out
}

fn write_block(out: &mut String, selector: &str, declarations: &[Declaration], pretty: bool) {
    out.push_str(selector);
    if pretty {
        out.push_str("\n{\n");
    } else {
        out.push_str(" {");
    }
    write_declarations(out, declarations, pretty);
    if pretty {
        out.push_str("}\n");
    } else {
        out.push_str("} ");
    }
}

fn write_declarations(out: &mut String, declarations: &[Declaration], pretty: bool) {
    for decl in declarations {
        if pretty {
            let _ = writeln!(out, "\t{}", decl);
        } else {
            let _ = write!(out, "{}", decl);
        }
    }
}
