use crate::style::declaration::Declaration;
use crate::style::selector::Selector;
use std::fmt;

/// A set of declarations for one or more selectors, e.g.
///
/// ```css
/// .main-text, .hi {
///     font-size: smaller;
///     color: blue;
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    selectors: Vec<Selector>,
    /// May repeat a property; nothing here decides which one wins.
    declarations: Vec<Declaration>,
}

impl Rule {
    pub fn new(selectors: Vec<Selector>, declarations: Vec<Declaration>) -> Self {
        Rule {
            selectors,
            declarations,
        }
    }

    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// True if both lists hold the same declarations, in any order.
    pub fn has_equal_declarations(&self, other: &[Declaration]) -> bool {
        self.declarations.len() == other.len()
            && other.iter().all(|decl| self.declarations.contains(decl))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let selectors: Vec<String> = self.selectors.iter().map(Selector::text).collect();
        write!(f, "{} {{", selectors.join(", "))?;
        for decl in &self.declarations {
            write!(f, "{}", decl)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(property: &str, value: &str) -> Declaration {
        Declaration::new(property, value).unwrap()
    }

    #[test]
    fn equal_declarations_ignore_order() {
        let rule = Rule::new(
            vec![Selector::tag("p").unwrap()],
            vec![decl("color", "red"), decl("font-size", "12px")],
        );
        assert!(rule.has_equal_declarations(&[
            decl("font-size", "12px"),
            decl("color", "red")
        ]));
        assert!(!rule.has_equal_declarations(&[decl("color", "red")]));
        assert!(!rule.has_equal_declarations(&[
            decl("color", "red"),
            decl("font-size", "14px")
        ]));
    }

    #[test]
    fn displays_as_compact_css() {
        let rule = Rule::new(
            vec![Selector::tag("h1").unwrap(), Selector::class("title").unwrap()],
            vec![decl("color", "red")],
        );
        assert_eq!(rule.to_string(), "h1, .title {color:red;}");
    }
}
