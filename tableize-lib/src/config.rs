/// Inlining options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineOptions {
    /// Stylesheet text applied before any `<style>` element in the document
    pub extra_css: Option<String>,
    /// Remove `<style>` elements under `<head>` once their text is read
    pub remove_style_elements: bool,
    /// Remove `class` attributes after their rules are inlined
    pub remove_class_attributes: bool,
}

impl Default for InlineOptions {
    fn default() -> Self {
        Self {
            extra_css: None,
            remove_style_elements: true,
            remove_class_attributes: true,
        }
    }
}

impl InlineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extra_css(mut self, css: impl Into<String>) -> Self {
        self.extra_css = Some(css.into());
        self
    }

    pub fn with_remove_style_elements(mut self, remove: bool) -> Self {
        self.remove_style_elements = remove;
        self
    }

    pub fn with_remove_class_attributes(mut self, remove: bool) -> Self {
        self.remove_class_attributes = remove;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_clear_css_from_the_document() {
        let options = InlineOptions::new();
        assert!(options.remove_style_elements);
        assert!(options.remove_class_attributes);
        assert_eq!(options.extra_css, None);
    }

    #[test]
    fn builders_override_defaults() {
        let options = InlineOptions::new()
            .with_extra_css("p { color: red }")
            .with_remove_class_attributes(false);
        assert_eq!(options.extra_css.as_deref(), Some("p { color: red }"));
        assert!(!options.remove_class_attributes);
        assert!(options.remove_style_elements);
    }
}
