use crate::config::InlineOptions;
use crate::dom::dom_tree::Document;
use crate::error::Result;
use crate::parser::tableize_html;
use crate::style::inliner;

pub mod tableize {
    use super::*;
    use log::debug;
    use rayon::prelude::*;

    /// One document of a batch, with the stylesheet to apply to it.
    #[derive(Debug, Clone, Default)]
    pub struct InlineJob {
        pub html: String,
        pub options: InlineOptions,
    }

    impl InlineJob {
        pub fn new(html: impl Into<String>) -> Self {
            Self {
                html: html.into(),
                options: InlineOptions::default(),
            }
        }

        pub fn with_options(mut self, options: InlineOptions) -> Self {
            self.options = options;
            self
        }
    }

    /// Parses `html`, inlines its `<style>` elements and `css`, and returns
    /// the mutated tree.
    pub fn inline_html(html: &str, css: Option<&str>) -> Result<Document> {
        let options = InlineOptions {
            extra_css: css.map(str::to_string),
            ..Default::default()
        };
        inline_html_with_options(html, &options)
    }

    pub fn inline_html_with_options(html: &str, options: &InlineOptions) -> Result<Document> {
        let document = tableize_html::create_dom_tree(html);
        inliner::inline_styles(&document, options)?;
        Ok(document)
    }

    pub fn inline_html_to_string(html: &str, css: Option<&str>) -> Result<String> {
        Ok(inline_html(html, css)?.to_html())
    }

    /// Inlines independent documents in parallel. Results keep the order of
    /// `jobs`.
    pub fn inline_batch(jobs: &[InlineJob]) -> Vec<Result<String>> {
        debug!("inlining a batch of {} documents", jobs.len());
        jobs.par_iter()
            .map(|job| Ok(inline_html_with_options(&job.html, &job.options)?.to_html()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::tableize::*;
    use crate::config::InlineOptions;
    use crate::error::Error;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_inline_with_extra_css() {
        let html = "<p class='lead'>Hello</p>";
        let css = ".lead { font-weight: bold } p { color: green }";
        assert_eq!(
            inline_html_to_string(html, Some(css)).unwrap(),
            "<p style=\"color:green;font-weight:bold;\">Hello</p>"
        );
    }

    #[test]
    fn test_document_is_returned_for_further_edits() {
        let document = inline_html("<td>x</td>", Some("p { color: red }")).unwrap();
        assert!(document.fragment);
        assert!(document.body().is_some());
    }

    #[test]
    fn test_batch_keeps_order_and_errors() {
        let jobs = vec![
            InlineJob::new("<p>one</p>")
                .with_options(InlineOptions::new().with_extra_css("p { color: red }")),
            InlineJob::new(
                "<html><head><style>foobar { color: red }</style></head><body></body></html>",
            ),
            InlineJob::new("<div style='-tableize:1'>two</div>"),
        ];
        let results = inline_batch(&jobs);

        assert_eq!(results.len(), 3);
        assert_eq!(
            results[0].as_ref().unwrap(),
            "<p style=\"color:red;\">one</p>"
        );
        assert!(matches!(results[1], Err(Error::Css(_))));
        assert_eq!(
            results[2].as_ref().unwrap(),
            "<table cellspacing=\"0\" border=\"0\"><tr><td>two</td></tr></table>"
        );
    }
}
