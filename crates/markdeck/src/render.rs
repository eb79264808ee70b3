//! Markdown to sanitized HTML.
//!
//! Markdown is converted with pulldown-cmark, then cleaned by an ammonia
//! allow-list before it reaches a page. The result is wrapped in
//! [`SafeHtml`], the only value the page templates embed without escaping.

use std::sync::LazyLock;

use maud::Render;
use pulldown_cmark::{Event, Options, Parser, html as md_html};

/// Link `rel` added to every anchor in user content.
const LINK_REL: &str = "nofollow noopener noreferrer";

/// Task list markers, written as text so no form controls reach the page.
const TASK_DONE: &str = "\u{2611} ";
const TASK_OPEN: &str = "\u{2610} ";

static SANITIZER: LazyLock<ammonia::Builder<'static>> = LazyLock::new(|| {
    let mut builder = ammonia::Builder::default();
    builder.link_rel(Some(LINK_REL));
    // Footnote references link to `#<label>` on the definition block.
    builder.add_tag_attributes("div", &["id"]);
    builder
});

/// HTML that has been through the sanitizer.
///
/// Only [`to_safe_html`] constructs it, so templates may write it out
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeHtml(String);

impl SafeHtml {
    /// The sanitized markup.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Render for SafeHtml {
    fn render_to(&self, buffer: &mut String) {
        buffer.push_str(&self.0);
    }
}

/// Render Markdown to HTML that is safe to embed unescaped.
pub fn to_safe_html(markdown: &str) -> SafeHtml {
    let unsafe_html = markdown_to_html(markdown);
    SafeHtml(SANITIZER.clean(&unsafe_html).to_string())
}

/// Uses pulldown-cmark with common extensions (tables, footnotes,
/// strikethrough, task lists). Raw HTML in the input passes through here;
/// sanitizing is the caller's job.
fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::TaskListMarker(done) => {
            Event::Text(if done { TASK_DONE } else { TASK_OPEN }.into())
        }
        other => other,
    });
    let mut html_output = String::with_capacity(markdown.len() * 2);
    md_html::push_html(&mut html_output, parser);
    html_output
}
