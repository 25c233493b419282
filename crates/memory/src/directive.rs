//! Memory directive parser.
//!
//! A directive is a span `<append_to_memory>…</append_to_memory>` embedded in
//! assistant output. Markers are case-sensitive, the payload may span lines,
//! and each opener is paired with the *next* closer (shortest match). Spans
//! never nest: an opener seen while inside a span is payload text.
//!
//! The scanner is a two-state machine (outside / inside) that walks the text
//! once, so worst-case cost is linear in the input. An opener with no closer
//! after it produces no span and stays in the text verbatim.

use std::ops::Range;

pub const OPEN_TAG: &str = "<append_to_memory>";
pub const CLOSE_TAG: &str = "</append_to_memory>";

/// Byte offsets of one matched directive.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DirectiveSpan {
    /// Whole span including both markers.
    outer: Range<usize>,
    /// Payload between the markers.
    inner: Range<usize>,
}

enum ScanState {
    Outside,
    Inside { start: usize, content_start: usize },
}

fn scan(text: &str) -> Vec<DirectiveSpan> {
    let mut spans = Vec::new();
    let mut state = ScanState::Outside;
    let mut cursor = 0;

    loop {
        match state {
            ScanState::Outside => match text[cursor..].find(OPEN_TAG) {
                Some(offset) => {
                    let start = cursor + offset;
                    let content_start = start + OPEN_TAG.len();
                    state = ScanState::Inside {
                        start,
                        content_start,
                    };
                    cursor = content_start;
                }
                None => break,
            },
            ScanState::Inside {
                start,
                content_start,
            } => match text[cursor..].find(CLOSE_TAG) {
                Some(offset) => {
                    let content_end = cursor + offset;
                    let end = content_end + CLOSE_TAG.len();
                    spans.push(DirectiveSpan {
                        outer: start..end,
                        inner: content_start..content_end,
                    });
                    state = ScanState::Outside;
                    cursor = end;
                }
                // Unterminated: no later opener can have a closer either.
                None => break,
            },
        }
    }

    spans
}

/// Payloads of every directive in `text`, trimmed, in order of appearance.
///
/// Empty-after-trim payloads are kept; callers drop them before persisting.
pub fn extract_directives(text: &str) -> Vec<String> {
    scan(text)
        .into_iter()
        .map(|span| text[span.inner].trim().to_string())
        .collect()
}

/// `text` with every directive span (markers included) removed, then trimmed.
pub fn strip_directives(text: &str) -> String {
    strip_spans(text, &scan(text))
}

fn strip_spans(text: &str, spans: &[DirectiveSpan]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for span in spans {
        out.push_str(&text[last..span.outer.start]);
        last = span.outer.end;
    }
    out.push_str(&text[last..]);
    out.trim().to_string()
}

/// The result of parsing one assistant reply in a single pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReply {
    /// Trimmed directive payloads in extraction order (may contain empties).
    pub directives: Vec<String>,
    /// The reply with directives removed and surrounding whitespace trimmed.
    pub cleaned: String,
}

impl ParsedReply {
    /// Payloads worth remembering: the non-empty ones, in order.
    pub fn memories(&self) -> impl Iterator<Item = &str> {
        self.directives
            .iter()
            .map(String::as_str)
            .filter(|d| !d.is_empty())
    }
}

/// Extract and strip in one scan.
pub fn parse_reply(text: &str) -> ParsedReply {
    let spans = scan(text);
    let directives = spans
        .iter()
        .map(|span| text[span.inner.clone()].trim().to_string())
        .collect();
    ParsedReply {
        directives,
        cleaned: strip_spans(text, &spans),
    }
}
