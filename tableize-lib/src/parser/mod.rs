pub mod dom_indices;
pub mod tableize_html;
