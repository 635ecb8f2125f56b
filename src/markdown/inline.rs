//! Inline Formatter
//!
//! Turns the inline spans of a single line (or a paragraph already joined
//! into one line) into HTML. The input is escaped first; every pass after
//! that works on escaped text only.
//!
//! Passes run in a fixed order: images, links, bold, italic, inline code,
//! strikethrough. Markup emitted by a pass is moved into a [`Stash`] and
//! replaced by an opaque token, so later passes never see (and never
//! re-match) tags or attribute values that are already HTML. The tokens are
//! swapped back for their HTML once all passes have run.
//!
//! # Example
//! ```
//! use readme_genius::markdown::format_inline;
//!
//! let html = format_inline("**bold** and [docs](https://example.com)");
//! assert_eq!(
//!     html,
//!     "<strong>bold</strong> and <a href=\"https://example.com\" \
//!      target=\"_blank\" rel=\"noopener noreferrer\">docs</a>"
//! );
//! ```

use super::MarkdownOptions;
use regex::{Captures, Match, Regex};
use std::sync::OnceLock;

/// Start of a stash token. Private-use code point, never produced by escaping.
const TOKEN_OPEN: char = '\u{E000}';
/// End of a stash token.
const TOKEN_CLOSE: char = '\u{E001}';

// ─────────────────────────────────────────────────────────────────────────────
// Escaping
// ─────────────────────────────────────────────────────────────────────────────

/// HTML-escape a string (`&`, `<`, `>`, `"`, `'`).
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Inline Spans
// ─────────────────────────────────────────────────────────────────────────────

/// The inline constructs the formatter recognizes, one per pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineSpan {
    /// `![alt](url)`
    Image,
    /// `[text](url)`
    Link,
    /// `**text**`, `__text__` (and `***text***` as bold italic)
    Bold,
    /// `*text*`, `_text_`
    Italic,
    /// `` `code` ``
    InlineCode,
    /// `~~text~~`
    Strikethrough,
}

impl InlineSpan {
    /// Pass order. Images come before links because `![a](b)` also matches
    /// the link pattern; bold comes before italic so `**` is not eaten as two
    /// single markers.
    pub const PASSES: [InlineSpan; 6] = [
        InlineSpan::Image,
        InlineSpan::Link,
        InlineSpan::Bold,
        InlineSpan::Italic,
        InlineSpan::InlineCode,
        InlineSpan::Strikethrough,
    ];

    fn pattern(self) -> &'static Regex {
        static IMAGE: OnceLock<Regex> = OnceLock::new();
        static LINK: OnceLock<Regex> = OnceLock::new();
        static BOLD: OnceLock<Regex> = OnceLock::new();
        static ITALIC: OnceLock<Regex> = OnceLock::new();
        static CODE: OnceLock<Regex> = OnceLock::new();
        static STRIKE: OnceLock<Regex> = OnceLock::new();

        match self {
            InlineSpan::Image => IMAGE.get_or_init(|| compile(r"!\[(.*?)\]\((.*?)\)")),
            InlineSpan::Link => LINK.get_or_init(|| compile(r"\[(.*?)\]\((.*?)\)")),
            InlineSpan::Bold => {
                BOLD.get_or_init(|| compile(r"\*\*\*(.+?)\*\*\*|\*\*(.+?)\*\*|__(.+?)__"))
            }
            InlineSpan::Italic => ITALIC.get_or_init(|| compile(r"\*(.+?)\*|_(.+?)_")),
            InlineSpan::InlineCode => CODE.get_or_init(|| compile(r"`([^`]+?)`")),
            InlineSpan::Strikethrough => STRIKE.get_or_init(|| compile(r"~~(.+?)~~")),
        }
    }

    /// Run this span's pass over `text`, stashing whatever markup it emits.
    ///
    /// A rejected `_` run is rescanned from its next character, so
    /// `my_var or _this_` still finds `_this_`. Other rejected matches are
    /// skipped whole.
    fn apply(self, text: &str, stash: &mut Stash, options: &MarkdownOptions) -> String {
        let pattern = self.pattern();
        let mut out = String::with_capacity(text.len());
        let mut copied = 0;
        let mut at = 0;

        while let Some(caps) = pattern.captures_at(text, at) {
            let Some(whole) = caps.get(0) else { break };
            match self.replace(text, &caps, stash, options) {
                Some(html) => {
                    out.push_str(&text[copied..whole.start()]);
                    out.push_str(&html);
                    copied = whole.end();
                    at = whole.end();
                }
                None if whole.as_str().starts_with('_') => at = whole.start() + 1,
                None => at = whole.end(),
            }
            if at >= text.len() {
                break;
            }
        }

        out.push_str(&text[copied..]);
        out
    }

    /// Replacement for one match, or `None` to leave the match literal.
    fn replace(
        self,
        haystack: &str,
        caps: &Captures,
        stash: &mut Stash,
        options: &MarkdownOptions,
    ) -> Option<String> {
        match self {
            InlineSpan::Image => {
                let alt = &caps[1];
                let src = sanitize_url(caps[2].trim(), options.safe_urls, true);
                Some(stash.hold(
                    Fragment::Void,
                    format!(r#"<img src="{}" alt="{}" />"#, src, alt),
                ))
            }
            InlineSpan::Link => {
                let label = &caps[1];
                let url = caps[2].trim();
                // An image's markup must never end up inside an href.
                if url.contains(TOKEN_OPEN) || !stash.is_balanced(label) {
                    return None;
                }
                let href = sanitize_url(url, options.safe_urls, false);
                Some(stash.wrap(
                    format!(
                        r#"<a href="{}" target="_blank" rel="noopener noreferrer">"#,
                        href
                    ),
                    label,
                    "</a>",
                ))
            }
            InlineSpan::Bold => {
                if let Some(inner) = caps.get(1) {
                    if !stash.is_balanced(inner.as_str()) {
                        return None;
                    }
                    let em = stash.wrap("<em>".to_string(), inner.as_str(), "</em>");
                    return Some(stash.wrap("<strong>".to_string(), &em, "</strong>"));
                }
                let (inner, underscore) = match caps.get(2) {
                    Some(inner) => (inner, false),
                    None => (caps.get(3)?, true),
                };
                self.emphasis(haystack, caps, inner, underscore, stash, "strong")
            }
            InlineSpan::Italic => {
                let (inner, underscore) = match caps.get(1) {
                    Some(inner) => (inner, false),
                    None => (caps.get(2)?, true),
                };
                self.emphasis(haystack, caps, inner, underscore, stash, "em")
            }
            InlineSpan::InlineCode => {
                let inner = &caps[1];
                if !stash.is_balanced(inner) {
                    return None;
                }
                // Code content is frozen: nothing after this pass touches it.
                let code = format!("<code>{}</code>", stash.restore(inner));
                Some(stash.hold(Fragment::Void, code))
            }
            InlineSpan::Strikethrough => {
                let inner = &caps[1];
                if !stash.is_balanced(inner) {
                    return None;
                }
                Some(stash.wrap("<del>".to_string(), inner, "</del>"))
            }
        }
    }

    fn emphasis(
        self,
        haystack: &str,
        caps: &Captures,
        inner: Match,
        underscore: bool,
        stash: &mut Stash,
        tag: &str,
    ) -> Option<String> {
        if underscore && caps.get(0).is_some_and(|m| is_intraword(haystack, m)) {
            return None;
        }
        if !stash.is_balanced(inner.as_str()) {
            return None;
        }
        Some(stash.wrap(format!("<{}>", tag), inner.as_str(), &format!("</{}>", tag)))
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in inline pattern is valid")
}

/// `_` emphasis may not open right after, or close right before, a word
/// character (`snake_case_name` stays literal).
fn is_intraword(haystack: &str, m: Match) -> bool {
    let before = haystack[..m.start()].chars().next_back();
    let after = haystack[m.end()..].chars().next();
    before.is_some_and(char::is_alphanumeric) || after.is_some_and(char::is_alphanumeric)
}

/// Neutralize script-capable URL schemes. Works on already escaped text.
fn sanitize_url(url: &str, safe_urls: bool, is_image: bool) -> String {
    if !safe_urls {
        return url.to_string();
    }

    let scheme: String = url
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_control())
        .take(16)
        .collect::<String>()
        .to_ascii_lowercase();

    let dangerous = scheme.starts_with("javascript:")
        || scheme.starts_with("vbscript:")
        || (scheme.starts_with("data:") && !(is_image && scheme.starts_with("data:image/")));

    if dangerous {
        log::debug!("Blocked unsafe URL scheme in inline markup");
        "#".to_string()
    } else {
        url.to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Stash
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fragment {
    /// An opening tag whose closing tag is stashed separately
    Open,
    /// The matching closing tag
    Close,
    /// A complete element (`<img>`, a finished `<code>` span)
    Void,
}

/// Emitted HTML held out of the text while the remaining passes run.
#[derive(Debug, Default)]
struct Stash {
    fragments: Vec<(Fragment, String)>,
}

impl Stash {
    fn token_pattern() -> &'static Regex {
        static TOKEN: OnceLock<Regex> = OnceLock::new();
        TOKEN.get_or_init(|| compile(&format!("{}([0-9]+){}", TOKEN_OPEN, TOKEN_CLOSE)))
    }

    /// Store `html` and return the token that stands in for it.
    fn hold(&mut self, kind: Fragment, html: String) -> String {
        let token = format!("{}{}{}", TOKEN_OPEN, self.fragments.len(), TOKEN_CLOSE);
        self.fragments.push((kind, html));
        token
    }

    /// Stash an open/close tag pair around `inner`, which stays live text.
    fn wrap(&mut self, open: String, inner: &str, close: &str) -> String {
        let mut out = self.hold(Fragment::Open, open);
        out.push_str(inner);
        out.push_str(&self.hold(Fragment::Close, close.to_string()));
        out
    }

    /// Whether every tag opened inside `text` is also closed inside it.
    /// Wrapping an unbalanced run would produce crossing tags.
    fn is_balanced(&self, text: &str) -> bool {
        let mut depth = 0usize;
        for caps in Self::token_pattern().captures_iter(text) {
            let kind = caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|id| self.fragments.get(id))
                .map(|(kind, _)| *kind);
            match kind {
                Some(Fragment::Open) => depth += 1,
                Some(Fragment::Close) => match depth.checked_sub(1) {
                    Some(d) => depth = d,
                    None => return false,
                },
                Some(Fragment::Void) | None => {}
            }
        }
        depth == 0
    }

    /// Swap every token in `text` back for its HTML.
    fn restore(&self, text: &str) -> String {
        Self::token_pattern()
            .replace_all(text, |caps: &Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|id| self.fragments.get(id))
                    .map(|(_, html)| html.clone())
                    .unwrap_or_default()
            })
            .into_owned()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// Format inline Markdown with the default options.
pub fn format_inline(text: &str) -> String {
    format_inline_with(text, &MarkdownOptions::default())
}

/// Format inline Markdown.
///
/// `text` should not contain line breaks; the block renderer joins paragraph
/// lines before calling this.
pub fn format_inline_with(text: &str, options: &MarkdownOptions) -> String {
    let escaped = escape_html(text).replace(
        |c: char| c == TOKEN_OPEN || c == TOKEN_CLOSE,
        "\u{FFFD}",
    );

    let mut stash = Stash::default();
    let formatted = InlineSpan::PASSES
        .iter()
        .fold(escaped, |text, span| span.apply(&text, &mut stash, options));

    stash.restore(&formatted)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const LINK_ATTRS: &str = r#"target="_blank" rel="noopener noreferrer""#;

    #[test]
    fn test_plain_text_is_escaped() {
        assert_eq!(
            format_inline(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn test_bold_both_markers() {
        assert_eq!(format_inline("**a** __b__"), "<strong>a</strong> <strong>b</strong>");
    }

    #[test]
    fn test_italic_both_markers() {
        assert_eq!(format_inline("*a* _b_"), "<em>a</em> <em>b</em>");
    }

    #[test]
    fn test_triple_marker_is_bold_italic() {
        assert_eq!(
            format_inline("***both***"),
            "<strong><em>both</em></strong>"
        );
    }

    #[test]
    fn test_inline_code() {
        assert_eq!(format_inline("run `cargo test`"), "run <code>cargo test</code>");
    }

    #[test]
    fn test_inline_code_escapes_content() {
        assert_eq!(format_inline("`<div>`"), "<code>&lt;div&gt;</code>");
    }

    #[test]
    fn test_strikethrough() {
        assert_eq!(format_inline("~~old~~ new"), "<del>old</del> new");
    }

    #[test]
    fn test_link() {
        assert_eq!(
            format_inline("[Rust](https://www.rust-lang.org)"),
            format!(r#"<a href="https://www.rust-lang.org" {}>Rust</a>"#, LINK_ATTRS)
        );
    }

    #[test]
    fn test_image_before_link() {
        assert_eq!(
            format_inline("![logo](logo.png)"),
            r#"<img src="logo.png" alt="logo" />"#
        );
    }

    #[test]
    fn test_empty_alt_and_link_text() {
        assert_eq!(format_inline("![](a.png)"), r#"<img src="a.png" alt="" />"#);
        assert_eq!(
            format_inline("[](b)"),
            format!(r#"<a href="b" {}></a>"#, LINK_ATTRS)
        );
    }

    #[test]
    fn test_badge_image_inside_link() {
        let html = format_inline("[![ci](badge.svg)](https://ci.example.com)");
        assert_eq!(
            html,
            format!(
                r#"<a href="https://ci.example.com" {}><img src="badge.svg" alt="ci" /></a>"#,
                LINK_ATTRS
            )
        );
    }

    #[test]
    fn test_emphasis_markers_in_url_untouched() {
        let html = format_inline("[x](https://e.com/a_b_c/*d*)");
        assert!(html.contains(r#"href="https://e.com/a_b_c/*d*""#));
        assert!(!html.contains("<em>"));
    }

    #[test]
    fn test_bold_inside_link_text() {
        let html = format_inline("[**docs**](d.md)");
        assert_eq!(
            html,
            format!(r#"<a href="d.md" {}><strong>docs</strong></a>"#, LINK_ATTRS)
        );
    }

    #[test]
    fn test_bold_around_link() {
        let html = format_inline("**[docs](d.md)**");
        assert!(html.starts_with("<strong><a href=\"d.md\""));
        assert!(html.ends_with("</a></strong>"));
    }

    #[test]
    fn test_crossing_markers_stay_well_nested() {
        let html = format_inline("**a *b** c*");
        assert_eq!(html, "<strong>a *b</strong> c*");
    }

    #[test]
    fn test_unmatched_markers_stay_literal() {
        assert_eq!(format_inline("2 * 3 = 6"), "2 * 3 = 6");
        assert_eq!(format_inline("a ` b"), "a ` b");
        assert_eq!(format_inline("~~open"), "~~open");
    }

    #[test]
    fn test_snake_case_not_italic() {
        assert_eq!(format_inline("call my_func_name now"), "call my_func_name now");
    }

    #[test]
    fn test_underscore_span_after_snake_case() {
        assert_eq!(
            format_inline("use my_var or _this_ instead"),
            "use my_var or <em>this</em> instead"
        );
        assert_eq!(
            format_inline("a my__var or __this__"),
            "a my__var or <strong>this</strong>"
        );
    }

    #[test]
    fn test_bold_inside_code_is_formatted_first() {
        // Bold runs before inline code, so the code span wraps the bold tag.
        assert_eq!(
            format_inline("`**x**`"),
            "<code><strong>x</strong></code>"
        );
    }

    #[test]
    fn test_code_content_frozen_against_strikethrough() {
        assert_eq!(format_inline("`~~x~~`"), "<code>~~x~~</code>");
    }

    #[test]
    fn test_javascript_url_blocked() {
        let html = format_inline("[click](javascript:alert(1))");
        assert!(html.contains(r##"href="#""##));
        assert!(!html.contains("javascript"));
    }

    #[test]
    fn test_data_image_allowed_for_images_only() {
        let img = format_inline("![x](data:image/png;base64,AAAA)");
        assert!(img.contains(r#"src="data:image/png;base64,AAAA""#));

        let link = format_inline("[x](data:text/html;base64,AAAA)");
        assert!(link.contains(r##"href="#""##));
    }

    #[test]
    fn test_unsafe_urls_kept_when_disabled() {
        let options = MarkdownOptions { safe_urls: false };
        let html = format_inline_with("[x](javascript:void(0))", &options);
        assert!(html.contains("javascript:void(0"));
    }

    #[test]
    fn test_quotes_in_url_cannot_break_attribute() {
        let html = format_inline(r#"[x](a" onclick="evil)"#);
        assert!(html.contains("href=\"a&quot; onclick=&quot;evil\""));
    }

    #[test]
    fn test_sentinel_characters_are_scrubbed() {
        let html = format_inline("\u{E000}0\u{E001} **b**");
        assert_eq!(html, "\u{FFFD}0\u{FFFD} <strong>b</strong>");
    }

    #[test]
    fn test_unicode_content() {
        assert_eq!(format_inline("**Østersjøen** 你好"), "<strong>Østersjøen</strong> 你好");
    }

    #[test]
    fn test_escape_html_helper() {
        assert_eq!(escape_html("Hello"), "Hello");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("\"q\""), "&quot;q&quot;");
    }
}
