//! Moves stylesheet rules onto the elements they match.
//!
//! Only single tag selectors (`td`) and single class selectors (`.field`) are
//! matched. Everything else the parser accepts is kept in the dictionary but
//! never applied. Declarations already present in an element's inline style
//! are never overwritten, and a handful of properties are written as legacy
//! presentational attributes because email clients honour those more reliably
//! than CSS.

use crate::config::InlineOptions;
use crate::dom::dom_tree::{self, Document, Handle};
use crate::error::{CssError, Result};
use crate::parser::dom_indices::DomIndices;
use crate::style::css_parser;
use crate::style::declaration::{properties, Declaration};
use crate::style::rule_dictionary::RuleDictionary;
use crate::style::tableizer;
use log::{debug, trace};
use std::collections::HashSet;

/// Selectors of a dictionary that the inliner knows how to match.
#[derive(Debug, Default)]
pub struct MatchableSelectors {
    pub tags: HashSet<String>,
    pub classes: HashSet<String>,
}

/// Inlines the document's own `<style>` elements plus any extra CSS from
/// `options`, then converts elements marked with `-tableize` into tables.
pub fn inline_styles(document: &Document, options: &InlineOptions) -> Result<()> {
    let css = collect_stylesheet(document, options);
    let rules = css_parser::parse_rule_dictionary(&css)?;
    let matchable = classify_selectors(&rules)?;
    debug!(
        "inlining {} selectors ({} tags, {} classes)",
        rules.len(),
        matchable.tags.len(),
        matchable.classes.len()
    );

    // no rules can still leave inline -tableize directives to convert
    let indices = DomIndices::build(document);

    for tag in &matchable.tags {
        let Some(declarations) = rules.get(tag) else {
            continue;
        };
        for element in indices.by_tag(tag) {
            apply_declarations(element, declarations)?;
        }
    }

    for element in &indices.classed {
        let class_attr = dom_tree::get_attribute(element, "class").unwrap_or_default();
        for class_name in class_attr.split_whitespace() {
            if !matchable.classes.contains(class_name) {
                trace!("no rule for class '{}'", class_name);
                continue;
            }
            if let Some(declarations) = rules.class_declarations(class_name) {
                apply_declarations(element, declarations)?;
            }
        }
        if options.remove_class_attributes {
            dom_tree::remove_attribute(element, "class");
        }
    }

    for element in &indices.elements {
        let marked = dom_tree::get_attribute(element, "style")
            .is_some_and(|style| style.contains(properties::TABLEIZE));
        if marked {
            tableizer::convert_to_table(element)?;
        }
    }
    Ok(())
}

/// Concatenates the caller's CSS and the trimmed text of every `<style>`
/// element under `<head>`, removing those elements if asked to.
pub fn collect_stylesheet(document: &Document, options: &InlineOptions) -> String {
    let mut css = String::new();
    let extra_css = options.extra_css.as_deref();
    if let Some(extra) = extra_css.filter(|c| !c.trim().is_empty()) {
        css.push_str(extra);
        css.push('\n');
    }

    let Some(head) = document.head() else {
        return css;
    };
    let style_elements: Vec<Handle> = dom_tree::descendant_elements(&head)
        .into_iter()
        .filter(|node| dom_tree::tag_name(node).as_deref() == Some("style"))
        .collect();
    for style in &style_elements {
        css.push_str(dom_tree::text_content(style).trim());
        css.push('\n');
        if options.remove_style_elements {
            dom_tree::detach(style);
        }
    }
    debug!("collected {} <style> elements", style_elements.len());
    css
}

/// Splits dictionary keys into single tag and single class selectors.
pub fn classify_selectors(
    rules: &RuleDictionary,
) -> std::result::Result<MatchableSelectors, CssError> {
    let mut matchable = MatchableSelectors::default();
    for key in rules.selectors() {
        let selector = css_parser::parse_selector(key)?;
        if let Some(class_name) = selector.class_name() {
            matchable.classes.insert(class_name.to_string());
        } else if let Some(tag) = selector.tag_name() {
            matchable.tags.insert(tag.to_string());
        } else {
            debug!("selector '{}' is never matched", key);
        }
    }
    Ok(matchable)
}

/// Merges `declarations` into the element's inline style.
///
/// Properties already in the style attribute are skipped, and the first value
/// applied for a property wins. Declarations that map onto a legacy attribute
/// are written there instead of the style, unless the attribute already holds
/// a value, in which case they are dropped.
pub fn apply_declarations(
    element: &Handle,
    declarations: &[Declaration],
) -> std::result::Result<(), CssError> {
    let Some(tag) = dom_tree::tag_name(element) else {
        return Ok(());
    };

    let mut seen = HashSet::new();
    let mut style_text: Option<String> = None;
    if let Some(existing) = dom_tree::get_attribute(element, "style") {
        let existing_declarations = css_parser::parse_declarations(&existing)?;
        if !existing_declarations.is_empty() {
            seen.extend(
                existing_declarations
                    .iter()
                    .map(|d| d.property().to_string()),
            );
            let mut text = existing.trim().to_string();
            if !text.ends_with(';') {
                text.push(';');
            }
            style_text = Some(text);
        }
    }

    for declaration in declarations {
        if !seen.insert(declaration.property().to_string()) {
            continue;
        }
        match legacy_attribute(&tag, declaration) {
            Some((name, value)) => {
                if !set_attribute_if_empty(element, name, value) {
                    debug!(
                        "<{}> already has a '{}' attribute, dropping '{}'",
                        tag, name, declaration
                    );
                }
            }
            None => style_text
                .get_or_insert_with(String::new)
                .push_str(&declaration.to_string()),
        }
    }

    if let Some(text) = style_text {
        dom_tree::set_attribute(element, "style", &text);
    }
    Ok(())
}

fn is_table_cell(tag: &str) -> bool {
    matches!(tag, "td" | "th")
}

/// The presentational attribute a declaration is written to on `tag`, if any.
fn legacy_attribute<'a>(
    tag: &str,
    declaration: &'a Declaration,
) -> Option<(&'a str, &'a str)> {
    let value = declaration.value();
    let name = match declaration.property() {
        properties::TEXT_ALIGN if is_table_cell(tag) => "align",
        properties::VERTICAL_ALIGN if is_table_cell(tag) => "valign",
        property @ (properties::WIDTH | properties::HEIGHT)
            if matches!(tag, "table" | "td" | "img") =>
        {
            property
        }
        properties::BACKGROUND_COLOR if tag == "table" => "bgcolor",
        property => property
            .strip_prefix(properties::ATTRIBUTE_PREFIX)
            .filter(|name| !name.is_empty())?,
    };
    Some((name, value))
}

/// Sets the attribute unless it already holds a non-empty value.
pub(crate) fn set_attribute_if_empty(element: &Handle, name: &str, value: &str) -> bool {
    let occupied = dom_tree::get_attribute(element, name).is_some_and(|v| !v.is_empty());
    if occupied {
        return false;
    }
    dom_tree::set_attribute(element, name, value);
    true
}
