//! Rewrites an element carrying the `-tableize` directive as a one-cell table.
//!
//! `<div style="-tableize:1;width:300px;padding:5px">x</div>` becomes
//! `<table cellspacing="0" border="0" width="300px" cellpadding="5"><tr><td width="100%">x</td></tr></table>`.

use crate::dom::dom_tree::{self, Handle};
use crate::error::CssError;
use crate::style::css_parser;
use crate::style::declaration::properties;
use crate::style::inliner::set_attribute_if_empty;
use log::{trace, warn};

/// Replaces `element` with a `table > tr > td` holding its children.
///
/// Returns false, leaving the element untouched, when it has no parent to be
/// replaced in.
pub fn convert_to_table(element: &Handle) -> Result<bool, CssError> {
    let Some(tag) = dom_tree::tag_name(element) else {
        return Ok(false);
    };
    if element.borrow().parent().is_none() {
        warn!("<{}> has no parent and cannot be converted to a table", tag);
        return Ok(false);
    }

    let table = dom_tree::create_element("table");
    let tr = dom_tree::create_element("tr");
    let td = dom_tree::create_element("td");
    dom_tree::set_attribute(&table, "cellspacing", "0");
    dom_tree::set_attribute(&table, "border", "0");
    dom_tree::append_child(&table, &tr);
    dom_tree::append_child(&tr, &td);

    let attributes = element
        .borrow()
        .as_element()
        .map(|elem| elem.attributes.clone())
        .unwrap_or_default();
    for (name, value) in &attributes {
        if name.eq_ignore_ascii_case("style") {
            split_style(value, &table, &td)?;
        } else {
            dom_tree::set_attribute(&td, name, value);
        }
    }

    dom_tree::move_children(element, &td);
    dom_tree::replace_node(element, &table);
    trace!("converted <{}> to a table", tag);
    Ok(true)
}

/// Distributes the element's inline style between the new table and its cell.
fn split_style(style: &str, table: &Handle, td: &Handle) -> Result<(), CssError> {
    let mut td_style = String::new();
    for declaration in css_parser::parse_declarations(style)? {
        let value = declaration.value();
        match declaration.property() {
            properties::TABLEIZE => {}
            properties::WIDTH => {
                // single cell, so it can always fill the table
                dom_tree::set_attribute(table, "width", value);
                dom_tree::set_attribute(td, "width", "100%");
            }
            properties::PADDING => {
                let digits: String = value.chars().filter(char::is_ascii_digit).collect();
                dom_tree::set_attribute(table, "cellpadding", &digits);
            }
            properties::TEXT_ALIGN => {
                set_attribute_if_empty(td, "align", value);
            }
            properties::VERTICAL_ALIGN => {
                set_attribute_if_empty(td, "valign", value);
            }
            properties::BACKGROUND_COLOR => {
                set_attribute_if_empty(td, "bgcolor", value);
            }
            _ => td_style.push_str(&declaration.to_string()),
        }
    }
    if !td_style.is_empty() {
        dom_tree::set_attribute(td, "style", &td_style);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tableize_html::{create_dom_tree, to_html};
    use pretty_assertions::assert_eq;

    fn convert_first(html: &str, tag: &str) -> String {
        let document = create_dom_tree(html);
        let node = dom_tree::find_element(&document.root, tag).unwrap();
        assert!(convert_to_table(&node).unwrap());
        to_html(&document)
    }

    #[test]
    fn bare_directive() {
        assert_eq!(
            convert_first("<p style='-tableize:1'>Text</p>", "p"),
            "<table cellspacing=\"0\" border=\"0\"><tr><td>Text</td></tr></table>"
        );
    }

    #[test]
    fn width_and_padding_move_to_the_table() {
        assert_eq!(
            convert_first(
                "<div style='-tableize:1;width:300px;padding:5px'>x</div>",
                "div"
            ),
            "<table cellspacing=\"0\" border=\"0\" width=\"300px\" cellpadding=\"5\"><tr><td width=\"100%\">x</td></tr></table>"
        );
    }

    #[test]
    fn attributes_and_alignment_go_to_the_cell() {
        assert_eq!(
            convert_first(
                "<div id='box' style='text-align:center;background-color:#fff;color:red;-tableize:1' title='t' align='left'><b>x</b> y</div>",
                "div"
            ),
            "<table cellspacing=\"0\" border=\"0\"><tr><td id=\"box\" align=\"left\" bgcolor=\"#fff\" style=\"color:red;\" title=\"t\"><b>x</b> y</td></tr></table>"
        );
    }

    #[test]
    fn keeps_position_among_siblings() {
        assert_eq!(
            convert_first("<h1>a</h1><div style='-tableize:1'>b</div><p>c</p>", "div"),
            "<h1>a</h1><table cellspacing=\"0\" border=\"0\"><tr><td>b</td></tr></table><p>c</p>"
        );
    }

    #[test]
    fn detached_elements_are_left_alone() {
        let orphan = dom_tree::create_element("div");
        dom_tree::set_attribute(&orphan, "style", "-tableize:1");
        assert!(!convert_to_table(&orphan).unwrap());
        assert_eq!(dom_tree::tag_name(&orphan).as_deref(), Some("div"));
    }
}
