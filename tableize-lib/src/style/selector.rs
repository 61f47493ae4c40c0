//! Selector model.
//!
//! A selector is a chain of steps such as `td.field` or `div .note`. Each step
//! owns an optional child step and records how it relates to that child.
//! Only the root step of a chain takes part in matching.

use crate::error::{ArgumentError, CssError};
use std::fmt;

/// HTML element names accepted in tag selectors.
const KNOWN_TAGS: &[&str] = &[
    "a", "abbr", "acronym", "address", "area", "article", "aside", "audio", "b", "base",
    "basefont", "bdi", "bdo", "bgsound", "big", "blockquote", "body", "br", "button", "canvas",
    "caption", "center", "cite", "code", "col", "colgroup", "data", "datalist", "dd", "del",
    "details", "dfn", "dialog", "dir", "div", "dl", "dt", "em", "embed", "fieldset",
    "figcaption", "figure", "font", "footer", "form", "frame", "frameset", "h1", "h2", "h3",
    "h4", "h5", "h6", "head", "header", "hgroup", "hr", "html", "i", "iframe", "img", "input",
    "ins", "isindex", "kbd", "label", "legend", "li", "link", "main", "map", "mark", "marquee",
    "menu", "meta", "meter", "nav", "nobr", "noframes", "noscript", "object", "ol", "optgroup",
    "option", "output", "p", "param", "picture", "pre", "progress", "q", "rp", "rt", "ruby",
    "s", "samp", "script", "section", "select", "small", "source", "span", "strike", "strong",
    "style", "sub", "summary", "sup", "table", "tbody", "td", "template", "textarea", "tfoot",
    "th", "thead", "time", "title", "tr", "track", "tt", "u", "ul", "var", "video", "wbr",
    "xml",
];

/// Characters that introduce selector forms the parser does not support.
const UNSUPPORTED_CHARS: &[char] = &['*', '>', '+', '~', '[', ']', ','];

/// Returns true if `name` is a known HTML element name (case-insensitive).
pub fn is_known_tag(name: &str) -> bool {
    KNOWN_TAGS.iter().any(|tag| tag.eq_ignore_ascii_case(name))
}

/// The kind of a single selector step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorKind {
    /// `p`, `td`
    Tag,
    /// `.warning`
    Class,
    /// `#header`
    Id,
    /// `:hover`
    PseudoClass,
}

impl SelectorKind {
    /// The character written before the inner text, if any.
    pub fn directive(self) -> Option<char> {
        match self {
            SelectorKind::Tag => None,
            SelectorKind::Class => Some('.'),
            SelectorKind::Id => Some('#'),
            SelectorKind::PseudoClass => Some(':'),
        }
    }

    pub fn from_directive(ch: char) -> Option<Self> {
        match ch {
            '.' => Some(SelectorKind::Class),
            '#' => Some(SelectorKind::Id),
            ':' => Some(SelectorKind::PseudoClass),
            _ => None,
        }
    }
}

/// How a step relates to its child step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Relationship {
    /// No whitespace between the steps, as in `p.warning`.
    #[default]
    Combination,
    /// The child applies to descendants of this step, as in `div p`.
    Descendant,
}

/// One selector step plus the rest of its chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    kind: SelectorKind,
    inner_text: String,
    relationship: Relationship,
    child: Option<Box<Selector>>,
}

impl Selector {
    /// A tag selector. The name must be a known HTML element and is lower-cased.
    pub fn tag(name: &str) -> Result<Self, CssError> {
        if name.is_empty() {
            return Err(CssError::EmptySelector);
        }
        if !is_known_tag(name) {
            return Err(CssError::UnknownTag(name.to_string()));
        }
        Ok(Self::leaf(SelectorKind::Tag, name.to_ascii_lowercase()))
    }

    pub fn class(name: &str) -> Result<Self, ArgumentError> {
        Self::named(SelectorKind::Class, name, "class name")
    }

    pub fn id(name: &str) -> Result<Self, ArgumentError> {
        Self::named(SelectorKind::Id, name, "element id")
    }

    pub fn pseudo_class(name: &str) -> Result<Self, ArgumentError> {
        Self::named(SelectorKind::PseudoClass, name, "pseudo-class")
    }

    fn named(kind: SelectorKind, name: &str, what: &'static str) -> Result<Self, ArgumentError> {
        if name.is_empty() {
            return Err(ArgumentError::Empty(what));
        }
        Ok(Self::leaf(kind, name.to_string()))
    }

    fn leaf(kind: SelectorKind, inner_text: String) -> Self {
        Selector {
            kind,
            inner_text,
            relationship: Relationship::Combination,
            child: None,
        }
    }

    /// Attaches `child` to the end of this chain.
    pub fn with_child(mut self, child: Selector, relationship: Relationship) -> Self {
        match self.child.take() {
            Some(existing) => {
                self.child = Some(Box::new(existing.with_child(child, relationship)));
            }
            None => {
                self.relationship = relationship;
                self.child = Some(Box::new(child));
            }
        }
        self
    }

    pub fn kind(&self) -> SelectorKind {
        self.kind
    }

    /// The text of this step without its directive character or children.
    pub fn inner_text(&self) -> &str {
        &self.inner_text
    }

    pub fn relationship(&self) -> Relationship {
        self.relationship
    }

    pub fn child(&self) -> Option<&Selector> {
        self.child.as_deref()
    }

    pub fn has_child(&self) -> bool {
        self.child.is_some()
    }

    /// True for a chain of exactly one step.
    pub fn is_simple(&self) -> bool {
        !self.has_child()
    }

    /// The class name if this is a single, unchained class selector.
    pub fn class_name(&self) -> Option<&str> {
        match self.kind {
            SelectorKind::Class if self.is_simple() => Some(&self.inner_text),
            _ => None,
        }
    }

    /// The tag name if this is a single, unchained tag selector.
    pub fn tag_name(&self) -> Option<&str> {
        match self.kind {
            SelectorKind::Tag if self.is_simple() => Some(&self.inner_text),
            _ => None,
        }
    }

    /// Iterates over the steps of the chain, root first.
    pub fn steps(&self) -> impl Iterator<Item = &Selector> {
        std::iter::successors(Some(self), |step| step.child())
    }

    /// Full selector text, including directive characters and child steps.
    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in self.steps() {
            if let Some(directive) = step.kind.directive() {
                write!(f, "{}", directive)?;
            }
            f.write_str(&step.inner_text)?;
            if step.has_child() && step.relationship == Relationship::Descendant {
                f.write_str(" ")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
struct PendingStep {
    kind: SelectorKind,
    text: String,
    relationship: Relationship,
}

/// Accumulates selector steps while scanning and links them once complete.
#[derive(Debug)]
pub(crate) struct SelectorBuilder<'a> {
    source: &'a str,
    steps: Vec<PendingStep>,
    accumulating: bool,
}

impl<'a> SelectorBuilder<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        SelectorBuilder {
            source,
            steps: Vec::new(),
            accumulating: false,
        }
    }

    /// Opens a new step; it becomes the child of the previous step.
    pub(crate) fn start_step(&mut self, kind: SelectorKind) {
        self.steps.push(PendingStep {
            kind,
            text: String::new(),
            relationship: Relationship::Combination,
        });
        self.accumulating = true;
    }

    /// Whitespace between steps turns the last relationship into a descendant one.
    pub(crate) fn mark_descendant(&mut self) {
        if let Some(last) = self.steps.last_mut() {
            last.relationship = Relationship::Descendant;
        }
        self.accumulating = false;
    }

    pub(crate) fn push_char(&mut self, ch: char) -> Result<(), CssError> {
        if UNSUPPORTED_CHARS.contains(&ch) {
            return Err(CssError::UnsupportedSelector(self.source.to_string()));
        }
        if !self.accumulating {
            self.start_step(SelectorKind::Tag);
        }
        if let Some(current) = self.steps.last_mut() {
            current.text.push(ch);
        }
        Ok(())
    }

    pub(crate) fn finish(mut self) -> Result<Selector, CssError> {
        if let Some(last) = self.steps.last_mut() {
            last.relationship = Relationship::Combination;
        }
        let mut chain: Option<Box<Selector>> = None;
        for step in self.steps.into_iter().rev() {
            let mut selector = match step.kind {
                SelectorKind::Tag => Selector::tag(&step.text)?,
                _ if step.text.is_empty() => {
                    return Err(CssError::EmptyStep(self.source.to_string()))
                }
                kind => Selector::leaf(kind, step.text),
            };
            selector.relationship = step.relationship;
            selector.child = chain;
            chain = Some(Box::new(selector));
        }
        chain.map(|root| *root).ok_or(CssError::EmptySelector)
    }
}
