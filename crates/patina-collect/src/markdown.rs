//! Markdown rendering for component descriptions.

use pulldown_cmark::{html, Options, Parser};

/// Render Markdown source to HTML.
pub fn render(source: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let parser = Parser::new_ext(source, options);

    let mut output = String::new();
    html::push_html(&mut output, parser);

    output
}
