//! Render pipeline: sanitized Markdown to display HTML.

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};

use crate::sanitize::{escape_html, escape_outside_code};

/// Render an assistant message for display.
///
/// Sanitizes first, then renders headings, emphasis, lists, tables and
/// fenced code blocks.
pub fn render_assistant(text: &str) -> String {
    render_markdown(&escape_outside_code(text))
}

/// Render a user message for display: escaped plain text, no markup.
pub fn render_user(text: &str) -> String {
    escape_html(text)
}

/// Render already-sanitized Markdown to HTML.
///
/// Raw HTML events are emitted as escaped text and links or images with
/// script-capable schemes lose their target, so the output never carries
/// active markup even if the input was not sanitized.
pub fn render_markdown(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(text, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: neutralize_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: neutralize_url(dest_url),
            title,
            id,
        }),
        other => other,
    });

    let mut out = String::with_capacity(text.len() + text.len() / 2);
    html::push_html(&mut out, parser);
    out
}

fn neutralize_url(url: CowStr<'_>) -> CowStr<'_> {
    let normalized: String = url
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .collect::<String>()
        .to_ascii_lowercase();

    let unsafe_scheme = ["javascript:", "vbscript:", "data:"]
        .iter()
        .any(|scheme| normalized.starts_with(scheme));

    if unsafe_scheme {
        CowStr::Borrowed("#")
    } else {
        url
    }
}
