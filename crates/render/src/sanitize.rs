//! Code-aware HTML escaping.
//!
//! Assistant text is walked line by line with a two-state machine:
//!
//! - **Plain**: the line is split into inline code spans (a backtick, any
//!   run of non-backticks, a backtick) and the text between them. Only the
//!   text between spans is escaped; spans are copied byte for byte.
//! - **Fenced**: the line is copied unchanged.
//!
//! A line whose trimmed content starts with ```` ``` ```` toggles the state
//! and is itself copied unchanged. An unmatched backtick on a plain line
//! opens nothing: the rest of that line is escaped like ordinary text.
//! An unterminated fence leaves the rest of the document in Fenced mode.
//!
//! Escaping is not idempotent. Run this exactly once per message, before
//! markup rendering.

const FENCE: &str = "```";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Plain,
    Fenced,
}

impl Mode {
    fn toggled(self) -> Self {
        match self {
            Mode::Plain => Mode::Fenced,
            Mode::Fenced => Mode::Plain,
        }
    }
}

/// Escape `&`, `<`, `>`, `"` and `'`.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(&mut out, text);
    out
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
}

/// Escape everything outside fenced blocks and inline code spans.
///
/// Lines are rejoined with `\n`.
pub fn escape_outside_code(text: &str) -> String {
    let mut mode = Mode::Plain;
    let mut lines: Vec<String> = Vec::new();

    for line in text.lines() {
        if line.trim().starts_with(FENCE) {
            mode = mode.toggled();
            lines.push(line.to_string());
            continue;
        }

        match mode {
            Mode::Plain => lines.push(escape_outside_inline_code(line)),
            Mode::Fenced => lines.push(line.to_string()),
        }
    }

    lines.join("\n")
}

fn escape_outside_inline_code(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(open) = rest.find('`') {
        push_escaped(&mut out, &rest[..open]);

        match rest[open + 1..].find('`') {
            Some(close) => {
                let end = open + 1 + close + 1;
                out.push_str(&rest[open..end]);
                rest = &rest[end..];
            }
            None => {
                // unmatched backtick
                push_escaped(&mut out, &rest[open..]);
                return out;
            }
        }
    }

    push_escaped(&mut out, rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_text_is_unchanged() {
        let text = "Hello world\nThis has no special characters.";
        assert_eq!(escape_outside_code(text), text);
    }

    #[test]
    fn markup_outside_code_is_escaped() {
        assert_eq!(escape_outside_code("<b>x</b>"), "&lt;b&gt;x&lt;/b&gt;");
    }

    #[test]
    fn quotes_and_ampersands_are_escaped() {
        assert_eq!(
            escape_html(r#"a & "b" 'c'"#),
            "a &amp; &quot;b&quot; &#x27;c&#x27;"
        );
    }

    #[test]
    fn inline_span_is_verbatim() {
        assert_eq!(escape_outside_code("`<b>x</b>`"), "`<b>x</b>`");
    }

    #[test]
    fn inline_span_mixed_with_text() {
        assert_eq!(
            escape_outside_code("use `a < b` when x > y"),
            "use `a < b` when x &gt; y"
        );
    }

    #[test]
    fn several_inline_spans_on_one_line() {
        assert_eq!(
            escape_outside_code("<i> `<a>` & `<b>` </i>"),
            "&lt;i&gt; `<a>` &amp; `<b>` &lt;/i&gt;"
        );
    }

    #[test]
    fn empty_inline_span() {
        assert_eq!(escape_outside_code("``<b>"), "``&lt;b&gt;");
    }

    #[test]
    fn unmatched_backtick_escapes_rest_of_line() {
        assert_eq!(
            escape_outside_code("a `b` c `<script>"),
            "a `b` c `&lt;script&gt;"
        );
    }

    #[test]
    fn unmatched_backtick_does_not_leak_to_next_line() {
        assert_eq!(escape_outside_code("`<a>\n<b>`"), "`&lt;a&gt;\n&lt;b&gt;`");
    }

    #[test]
    fn fenced_block_is_verbatim() {
        let input = "<script>before</script>\n```\n<script>inside</script>\n```\n<script>after</script>";
        let expected = "&lt;script&gt;before&lt;/script&gt;\n```\n<script>inside</script>\n```\n&lt;script&gt;after&lt;/script&gt;";
        assert_eq!(escape_outside_code(input), expected);
    }

    #[test]
    fn fence_with_language_and_indent() {
        let input = "  ```html\n<div class=\"x\">&nbsp;</div>\n  ```";
        assert_eq!(escape_outside_code(input), input);
    }

    #[test]
    fn fence_line_itself_is_never_escaped() {
        let input = "```<lang>\ncode\n```";
        assert_eq!(escape_outside_code(input), input);
    }

    #[test]
    fn backticks_inside_fence_are_literal() {
        let input = "```\nlet s = `<tag>`;\nlet t = \"`\";\n```\n`<ok>`";
        assert_eq!(escape_outside_code(input), input);
    }

    #[test]
    fn unterminated_fence_covers_rest_of_document() {
        let input = "text <b>\n```\n<b>raw</b>\n<i>still raw</i>";
        assert_eq!(
            escape_outside_code(input),
            "text &lt;b&gt;\n```\n<b>raw</b>\n<i>still raw</i>"
        );
    }

    #[test]
    fn two_fenced_blocks() {
        let input = "```\n<a>\n```\n<b>\n```\n<c>\n```";
        assert_eq!(
            escape_outside_code(input),
            "```\n<a>\n```\n&lt;b&gt;\n```\n<c>\n```"
        );
    }

    #[test]
    fn crlf_lines_are_rejoined_with_lf() {
        assert_eq!(escape_outside_code("a<\r\nb>"), "a&lt;\nb&gt;");
    }

    #[test]
    fn escaping_twice_double_escapes() {
        let once = escape_outside_code("<b>");
        let twice = escape_outside_code(&once);
        assert_eq!(once, "&lt;b&gt;");
        assert_eq!(twice, "&amp;lt;b&amp;gt;");
    }

    #[test]
    fn multibyte_text_is_preserved() {
        assert_eq!(
            escape_outside_code("naïve <ü> `ß<>` ☃"),
            "naïve &lt;ü&gt; `ß<>` ☃"
        );
    }
}
