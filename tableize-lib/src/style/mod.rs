pub mod css_parser;
pub mod declaration;
pub mod inliner;
pub mod rule;
pub mod rule_dictionary;
pub mod selector;
pub mod serializer;
pub mod stylesheet;
pub mod tableizer;
