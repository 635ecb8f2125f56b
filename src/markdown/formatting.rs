//! Markdown Formatting Operations
//!
//! Toolbar formatting for the raw Markdown buffer. Every operation is a pure
//! function of `(buffer, selection, action)` returning the new buffer and
//! the new selection; nothing here touches UI state.
//!
//! # Supported Formatting Commands
//! - **Inline**: Bold, Italic, Inline Code, Strikethrough
//! - **Links**: Links, Images (URL supplied through a [`ValueSupplier`])
//! - **Blocks**: Code Block, Headings, Blockquote, Unordered List, Paragraph
//!
//! # Usage
//! ```
//! use readme_genius::markdown::{apply_format, SelectionRange, ToolbarCommand};
//!
//! let result = apply_format(
//!     "Hello world",
//!     SelectionRange::new(0, 5),
//!     &ToolbarCommand::Bold.action(),
//!     &mut None::<String>,
//! );
//! assert_eq!(result.text, "**Hello** world");
//! assert_eq!(result.selection, SelectionRange::new(2, 7));
//! ```

use crate::string_utils::{ceil_char_boundary, floor_char_boundary, line_end, line_start};
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Link text used when nothing is selected.
pub const LINK_PLACEHOLDER: &str = "link text";
/// Image alt text used when nothing is selected.
pub const IMAGE_PLACEHOLDER: &str = "image alt text";

// ─────────────────────────────────────────────────────────────────────────────
// Selection Range
// ─────────────────────────────────────────────────────────────────────────────

/// A selection in the buffer as byte offsets, `start <= end`.
///
/// A collapsed selection (`start == end`) is a plain cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionRange {
    pub start: usize,
    pub end: usize,
}

impl SelectionRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A collapsed selection at `offset`.
    pub fn cursor(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Order, clamp and snap this selection to character boundaries of `text`.
    pub fn normalized(self, text: &str) -> Self {
        let (start, end) = if self.start > self.end {
            (self.end, self.start)
        } else {
            (self.start, self.end)
        };
        Self {
            start: floor_char_boundary(text, start.min(text.len())),
            end: ceil_char_boundary(text, end.min(text.len())),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Format Action
// ─────────────────────────────────────────────────────────────────────────────

/// How an action changes the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatKind {
    /// Insert `prefix` before and `suffix` after the selection
    InlineWrap,
    /// Insert `prefix` at the start of the selected line(s)
    BlockLinePrefix,
    /// Remove a heading, quote or list marker from the current line
    ParagraphStrip,
    /// Replace the selection with `[text](url)`
    LinkInsert,
    /// Replace the selection with `![alt](url)`
    ImageInsert,
    /// Put a code fence around the selection
    FencedCodeWrap,
}

/// A toolbar-level formatting request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatAction {
    pub kind: FormatKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    /// Prefix every selected line instead of only the first
    #[serde(default)]
    pub multiline: bool,
}

impl FormatAction {
    pub fn new(kind: FormatKind) -> Self {
        Self {
            kind,
            prefix: None,
            suffix: None,
            multiline: false,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    fn prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or("")
    }

    fn suffix(&self) -> &str {
        self.suffix.as_deref().unwrap_or("")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Toolbar Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Formatting commands offered by the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarCommand {
    /// Bold text (**text**)
    Bold,
    /// Italic text (*text*)
    Italic,
    /// Heading level 1-6
    Heading(u8),
    /// Strip block markers from the line
    Paragraph,
    /// Blockquote (> text)
    Blockquote,
    /// Bullet list (- item)
    UnorderedList,
    /// Fenced code block
    CodeBlock,
    /// Inline code (`code`)
    InlineCode,
    /// Strikethrough (~~text~~)
    Strikethrough,
    /// Link ([text](url))
    Link,
    /// Image (![alt](url))
    Image,
}

/// The toolbar buttons, in display order.
pub const TOOLBAR: [ToolbarCommand; 12] = [
    ToolbarCommand::Bold,
    ToolbarCommand::Italic,
    ToolbarCommand::Heading(1),
    ToolbarCommand::Heading(2),
    ToolbarCommand::Heading(3),
    ToolbarCommand::Paragraph,
    ToolbarCommand::Blockquote,
    ToolbarCommand::UnorderedList,
    ToolbarCommand::CodeBlock,
    ToolbarCommand::InlineCode,
    ToolbarCommand::Link,
    ToolbarCommand::Image,
];

impl ToolbarCommand {
    /// The format action this command applies.
    pub fn action(&self) -> FormatAction {
        match self {
            Self::Bold => FormatAction::new(FormatKind::InlineWrap)
                .with_prefix("**")
                .with_suffix("**"),
            Self::Italic => FormatAction::new(FormatKind::InlineWrap)
                .with_prefix("*")
                .with_suffix("*"),
            Self::InlineCode => FormatAction::new(FormatKind::InlineWrap)
                .with_prefix("`")
                .with_suffix("`"),
            Self::Strikethrough => FormatAction::new(FormatKind::InlineWrap)
                .with_prefix("~~")
                .with_suffix("~~"),
            Self::Heading(level) => {
                let hashes = "#".repeat((*level).clamp(1, 6) as usize);
                FormatAction::new(FormatKind::BlockLinePrefix).with_prefix(format!("{} ", hashes))
            }
            Self::Paragraph => FormatAction::new(FormatKind::ParagraphStrip),
            Self::Blockquote => FormatAction::new(FormatKind::BlockLinePrefix)
                .with_prefix("> ")
                .multiline(),
            Self::UnorderedList => FormatAction::new(FormatKind::BlockLinePrefix)
                .with_prefix("- ")
                .multiline(),
            Self::CodeBlock => FormatAction::new(FormatKind::FencedCodeWrap)
                .with_prefix("```\n")
                .with_suffix("\n```")
                .multiline(),
            Self::Link => FormatAction::new(FormatKind::LinkInsert),
            Self::Image => FormatAction::new(FormatKind::ImageInsert),
        }
    }

    /// Short identifier, as accepted by [`FromStr`].
    pub fn name(&self) -> String {
        match self {
            Self::Bold => "bold".to_string(),
            Self::Italic => "italic".to_string(),
            Self::Heading(n) => format!("h{}", n),
            Self::Paragraph => "paragraph".to_string(),
            Self::Blockquote => "blockquote".to_string(),
            Self::UnorderedList => "ul".to_string(),
            Self::CodeBlock => "codeblock".to_string(),
            Self::InlineCode => "inlinecode".to_string(),
            Self::Strikethrough => "strikethrough".to_string(),
            Self::Link => "link".to_string(),
            Self::Image => "image".to_string(),
        }
    }

    /// Human-readable button label.
    pub fn label(&self) -> String {
        let name = match self {
            Self::Bold => "Bold",
            Self::Italic => "Italic",
            Self::Heading(n) => return format!("Heading {}", n),
            Self::Paragraph => "Paragraph",
            Self::Blockquote => "Blockquote",
            Self::UnorderedList => "Unordered List",
            Self::CodeBlock => "Code Block",
            Self::InlineCode => "Inline Code",
            Self::Strikethrough => "Strikethrough",
            Self::Link => "Link",
            Self::Image => "Image",
        };
        name.to_string()
    }
}

impl fmt::Display for ToolbarCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for ToolbarCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let command = match name.as_str() {
            "bold" => Self::Bold,
            "italic" => Self::Italic,
            "paragraph" | "p" => Self::Paragraph,
            "blockquote" | "quote" => Self::Blockquote,
            "ul" | "list" => Self::UnorderedList,
            "codeblock" | "code-block" => Self::CodeBlock,
            "inlinecode" | "code" => Self::InlineCode,
            "strikethrough" | "strike" => Self::Strikethrough,
            "link" => Self::Link,
            "image" | "img" => Self::Image,
            other => match other.strip_prefix('h').and_then(|n| n.parse::<u8>().ok()) {
                Some(level @ 1..=6) => Self::Heading(level),
                _ => return Err(format!("unknown formatting action '{}'", s)),
            },
        };
        Ok(command)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Value Supplier
// ─────────────────────────────────────────────────────────────────────────────

/// A request for a value the transform cannot compute itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValuePrompt {
    pub message: &'static str,
    /// Suggested value to pre-fill
    pub default: &'static str,
}

impl ValuePrompt {
    pub const LINK_URL: ValuePrompt = ValuePrompt {
        message: "Enter link URL:",
        default: "https://",
    };

    pub const IMAGE_URL: ValuePrompt = ValuePrompt {
        message: "Enter image URL:",
        default: "https://placehold.co/300x200.png",
    };
}

/// Supplies interactive values (the URL for links and images).
///
/// Returning `None` means the user cancelled.
pub trait ValueSupplier {
    fn supply(&mut self, prompt: &ValuePrompt) -> Option<String>;
}

impl<F> ValueSupplier for F
where
    F: FnMut(&ValuePrompt) -> Option<String>,
{
    fn supply(&mut self, prompt: &ValuePrompt) -> Option<String> {
        self(prompt)
    }
}

/// A fixed answer, taken at most once.
impl ValueSupplier for Option<String> {
    fn supply(&mut self, _prompt: &ValuePrompt) -> Option<String> {
        self.take()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Format Result
// ─────────────────────────────────────────────────────────────────────────────

/// Result of applying a formatting action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatResult {
    /// The new buffer
    pub text: String,
    /// New selection, always within `[0, text.len()]`
    pub selection: SelectionRange,
    /// False when the action was a no-op (e.g. cancelled URL prompt)
    pub applied: bool,
}

impl FormatResult {
    fn with_cursor(text: String, cursor: usize) -> Self {
        Self::with_selection(text, cursor, cursor)
    }

    fn with_selection(text: String, start: usize, end: usize) -> Self {
        let end = end.min(text.len());
        Self {
            selection: SelectionRange::new(start.min(end), end),
            text,
            applied: true,
        }
    }

    fn unchanged(text: &str, selection: SelectionRange) -> Self {
        Self {
            text: text.to_string(),
            selection,
            applied: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Applying Actions
// ─────────────────────────────────────────────────────────────────────────────

/// Apply a formatting action to `text` at `selection`.
///
/// `supplier` is asked for a URL by link and image actions only.
pub fn apply_format(
    text: &str,
    selection: SelectionRange,
    action: &FormatAction,
    supplier: &mut dyn ValueSupplier,
) -> FormatResult {
    let selection = selection.normalized(text);
    debug!("Applying {:?} at {:?}", action.kind, selection);

    match action.kind {
        FormatKind::InlineWrap => apply_inline_wrap(text, selection, action),
        FormatKind::FencedCodeWrap => apply_fence_wrap(text, selection, action),
        FormatKind::BlockLinePrefix => apply_line_prefix(text, selection, action),
        FormatKind::ParagraphStrip => apply_paragraph_strip(text, selection),
        FormatKind::LinkInsert => {
            apply_link_insert(text, selection, false, &ValuePrompt::LINK_URL, supplier)
        }
        FormatKind::ImageInsert => {
            apply_link_insert(text, selection, true, &ValuePrompt::IMAGE_URL, supplier)
        }
    }
}

/// Wrap the selection; the new selection is the original text between the markers.
fn apply_inline_wrap(text: &str, selection: SelectionRange, action: &FormatAction) -> FormatResult {
    let (prefix, suffix) = (action.prefix(), action.suffix());
    let selected = &text[selection.start..selection.end];

    let new_text = format!(
        "{}{}{}{}{}",
        &text[..selection.start],
        prefix,
        selected,
        suffix,
        &text[selection.end..]
    );
    let inner_start = selection.start + prefix.len();
    FormatResult::with_selection(new_text, inner_start, inner_start + selected.len())
}

/// Fence the selection; the cursor lands after the closing fence.
fn apply_fence_wrap(text: &str, selection: SelectionRange, action: &FormatAction) -> FormatResult {
    let (prefix, suffix) = (action.prefix(), action.suffix());
    let selected = &text[selection.start..selection.end];

    let new_text = format!(
        "{}{}{}{}{}",
        &text[..selection.start],
        prefix,
        selected,
        suffix,
        &text[selection.end..]
    );
    let cursor = selection.start + prefix.len() + selected.len() + suffix.len();
    FormatResult::with_cursor(new_text, cursor)
}

/// Prefix the line containing the selection start, or every selected line
/// for multiline actions.
fn apply_line_prefix(text: &str, selection: SelectionRange, action: &FormatAction) -> FormatResult {
    let prefix = action.prefix();
    let first_line = line_start(text, selection.start);

    let mut insert_at = vec![first_line];
    if action.multiline {
        // A trailing line the selection only touches at its first byte is not selected.
        insert_at.extend(
            text[selection.start..selection.end]
                .match_indices('\n')
                .map(|(i, _)| selection.start + i + 1)
                .filter(|&pos| pos < selection.end),
        );
    }

    let mut new_text = String::with_capacity(text.len() + prefix.len() * insert_at.len());
    let mut copied = 0;
    for &pos in &insert_at {
        new_text.push_str(&text[copied..pos]);
        new_text.push_str(prefix);
        copied = pos;
    }
    new_text.push_str(&text[copied..]);

    let cursor = selection.end + prefix.len() * insert_at.len();
    FormatResult::with_cursor(new_text, cursor)
}

fn block_marker_pattern() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        Regex::new(r"^(?:#+\s*|>+\s*|[-*+]\s+|\d+\.\s+)").expect("valid block marker pattern")
    })
}

/// Remove one leading heading, quote or list marker from the current line.
fn apply_paragraph_strip(text: &str, selection: SelectionRange) -> FormatResult {
    let start = line_start(text, selection.start);
    let end = line_end(text, selection.start);
    let line = &text[start..end];

    let cleaned = block_marker_pattern().replace(line, "");
    let new_text = format!("{}{}{}", &text[..start], cleaned, &text[end..]);
    let cursor = start + cleaned.len();
    FormatResult::with_cursor(new_text, cursor)
}

/// Replace the selection with a link or image once a URL is supplied.
fn apply_link_insert(
    text: &str,
    selection: SelectionRange,
    is_image: bool,
    prompt: &ValuePrompt,
    supplier: &mut dyn ValueSupplier,
) -> FormatResult {
    let url = match supplier.supply(prompt) {
        Some(url) if !url.is_empty() => url,
        _ => {
            debug!("No URL supplied, leaving buffer unchanged");
            return FormatResult::unchanged(text, selection);
        }
    };

    let selected = &text[selection.start..selection.end];
    let replacement = match (is_image, selection.is_collapsed()) {
        (false, true) => format!("[{}]({})", LINK_PLACEHOLDER, url),
        (false, false) => format!("[{}]({})", selected, url),
        (true, true) => format!("![{}]({})", IMAGE_PLACEHOLDER, url),
        (true, false) => format!("![{}]({})", selected, url),
    };

    let new_text = format!(
        "{}{}{}",
        &text[..selection.start],
        replacement,
        &text[selection.end..]
    );
    let cursor = selection.start + replacement.len();
    FormatResult::with_cursor(new_text, cursor)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(text: &str, start: usize, end: usize, command: ToolbarCommand) -> FormatResult {
        apply_format(
            text,
            SelectionRange::new(start, end),
            &command.action(),
            &mut None::<String>,
        )
    }

    fn apply_with_url(
        text: &str,
        start: usize,
        end: usize,
        command: ToolbarCommand,
        url: &str,
    ) -> FormatResult {
        apply_format(
            text,
            SelectionRange::new(start, end),
            &command.action(),
            &mut Some(url.to_string()),
        )
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inline Wrap Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_bold_with_selection() {
        let result = apply("hello world", 0, 5, ToolbarCommand::Bold);
        assert_eq!(result.text, "**hello** world");
        assert_eq!(result.selection, SelectionRange::new(2, 7));
        assert_eq!(&result.text[2..7], "hello");
        assert!(result.applied);
    }

    #[test]
    fn test_bold_without_selection_inserts_markers() {
        let result = apply("Hello", 5, 5, ToolbarCommand::Bold);
        assert_eq!(result.text, "Hello****");
        assert_eq!(result.selection, SelectionRange::cursor(7));
    }

    #[test]
    fn test_italic_with_selection() {
        let result = apply("Hello world", 6, 11, ToolbarCommand::Italic);
        assert_eq!(result.text, "Hello *world*");
        assert_eq!(result.selection, SelectionRange::new(7, 12));
    }

    #[test]
    fn test_inline_code_and_strikethrough() {
        assert_eq!(apply("x = 1", 0, 5, ToolbarCommand::InlineCode).text, "`x = 1`");
        assert_eq!(apply("gone", 0, 4, ToolbarCommand::Strikethrough).text, "~~gone~~");
    }

    #[test]
    fn test_reversed_selection_is_normalized() {
        let result = apply("hello world", 5, 0, ToolbarCommand::Bold);
        assert_eq!(result.text, "**hello** world");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Fenced Code Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_code_block_wraps_selection() {
        let result = apply("run: ls -la", 5, 11, ToolbarCommand::CodeBlock);
        assert_eq!(result.text, "run: ```\nls -la\n```");
        assert_eq!(result.selection, SelectionRange::cursor(result.text.len()));
    }

    #[test]
    fn test_code_block_multiline_selection() {
        let text = "a\nb\nc";
        let result = apply(text, 0, 3, ToolbarCommand::CodeBlock);
        assert_eq!(result.text, "```\na\nb\n```\nc");
        assert_eq!(result.selection, SelectionRange::cursor(11));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Line Prefix Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_heading_h1() {
        let result = apply("Hello world", 3, 3, ToolbarCommand::Heading(1));
        assert_eq!(result.text, "# Hello world");
        assert_eq!(result.selection, SelectionRange::cursor(5));
    }

    #[test]
    fn test_heading_on_second_line() {
        let result = apply("intro\nTitle", 8, 8, ToolbarCommand::Heading(2));
        assert_eq!(result.text, "intro\n## Title");
        assert_eq!(result.selection, SelectionRange::cursor(11));
    }

    #[test]
    fn test_heading_only_prefixes_first_line() {
        let result = apply("one\ntwo", 0, 7, ToolbarCommand::Heading(3));
        assert_eq!(result.text, "### one\ntwo");
    }

    #[test]
    fn test_blockquote_single_line() {
        let result = apply("A quote", 0, 0, ToolbarCommand::Blockquote);
        assert_eq!(result.text, "> A quote");
    }

    #[test]
    fn test_blockquote_multiline() {
        let result = apply("one\ntwo\nthree", 0, 13, ToolbarCommand::Blockquote);
        assert_eq!(result.text, "> one\n> two\n> three");
        assert_eq!(result.selection, SelectionRange::cursor(19));
    }

    #[test]
    fn test_list_multiline_from_middle_of_line() {
        let result = apply("x\nalpha\nbeta\ny", 4, 10, ToolbarCommand::UnorderedList);
        assert_eq!(result.text, "x\n- alpha\n- beta\ny");
        assert_eq!(result.selection, SelectionRange::cursor(14));
    }

    #[test]
    fn test_list_selection_ending_at_line_start() {
        let result = apply("a\nb\nc", 0, 4, ToolbarCommand::UnorderedList);
        assert_eq!(result.text, "- a\n- b\nc");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Paragraph Strip Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_paragraph_strips_heading() {
        let result = apply("## Heading", 0, 0, ToolbarCommand::Paragraph);
        assert_eq!(result.text, "Heading");
        assert_eq!(result.selection, SelectionRange::cursor(7));
    }

    #[test]
    fn test_paragraph_strips_markers() {
        assert_eq!(apply("> quoted", 2, 2, ToolbarCommand::Paragraph).text, "quoted");
        assert_eq!(apply("- item", 2, 2, ToolbarCommand::Paragraph).text, "item");
        assert_eq!(apply("12. item", 2, 2, ToolbarCommand::Paragraph).text, "item");
    }

    #[test]
    fn test_paragraph_strip_only_touches_current_line() {
        let result = apply("# A\n# B\n# C", 5, 5, ToolbarCommand::Paragraph);
        assert_eq!(result.text, "# A\nB\n# C");
        assert_eq!(result.selection, SelectionRange::cursor(5));
    }

    #[test]
    fn test_paragraph_keeps_bold_line() {
        let result = apply("**bold** start", 0, 0, ToolbarCommand::Paragraph);
        assert_eq!(result.text, "**bold** start");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Link / Image Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_link_with_selection() {
        let result = apply_with_url("Click here", 6, 10, ToolbarCommand::Link, "https://a.io");
        assert_eq!(result.text, "Click [here](https://a.io)");
        assert_eq!(result.selection, SelectionRange::cursor(result.text.len()));
    }

    #[test]
    fn test_link_placeholder() {
        let result = apply_with_url("", 0, 0, ToolbarCommand::Link, "u");
        assert_eq!(result.text, "[link text](u)");
    }

    #[test]
    fn test_link_reversed_selection_uses_text() {
        assert!(SelectionRange::cursor(3).is_collapsed());
        assert!(!SelectionRange::new(4, 0).is_collapsed());

        let result = apply_with_url("docs page", 4, 0, ToolbarCommand::Link, "d.md");
        assert_eq!(result.text, "[docs](d.md) page");
    }

    #[test]
    fn test_image_with_and_without_selection() {
        let result = apply_with_url("logo", 0, 4, ToolbarCommand::Image, "l.png");
        assert_eq!(result.text, "![logo](l.png)");

        let result = apply_with_url("see: ", 5, 5, ToolbarCommand::Image, "l.png");
        assert_eq!(result.text, "see: ![image alt text](l.png)");
        assert_eq!(result.selection, SelectionRange::cursor(result.text.len()));
    }

    #[test]
    fn test_link_cancelled_is_noop() {
        let result = apply("some text", 0, 4, ToolbarCommand::Link);
        assert_eq!(result.text, "some text");
        assert_eq!(result.selection, SelectionRange::new(0, 4));
        assert!(!result.applied);
    }

    #[test]
    fn test_empty_url_is_noop() {
        let result = apply_with_url("x", 0, 1, ToolbarCommand::Image, "");
        assert_eq!(result.text, "x");
        assert!(!result.applied);
    }

    #[test]
    fn test_closure_supplier_sees_prompt() {
        let mut seen = Vec::new();
        let mut supplier = |prompt: &ValuePrompt| {
            seen.push(prompt.message);
            Some(prompt.default.to_string())
        };
        let result = apply_format(
            "",
            SelectionRange::cursor(0),
            &ToolbarCommand::Image.action(),
            &mut supplier,
        );
        assert_eq!(result.text, "![image alt text](https://placehold.co/300x200.png)");
        assert_eq!(seen, vec!["Enter image URL:"]);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Command Metadata Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_command_names_round_trip() {
        for command in TOOLBAR {
            assert_eq!(command.name().parse::<ToolbarCommand>(), Ok(command));
        }
        assert_eq!("H6".parse::<ToolbarCommand>(), Ok(ToolbarCommand::Heading(6)));
        assert!("h7".parse::<ToolbarCommand>().is_err());
        assert!("table".parse::<ToolbarCommand>().is_err());
    }

    #[test]
    fn test_toolbar_action_kinds() {
        assert_eq!(ToolbarCommand::Bold.action().kind, FormatKind::InlineWrap);
        assert_eq!(ToolbarCommand::Heading(2).action().prefix.as_deref(), Some("## "));
        assert!(ToolbarCommand::Blockquote.action().multiline);
        assert!(!ToolbarCommand::Heading(1).action().multiline);
        assert_eq!(ToolbarCommand::Paragraph.action().kind, FormatKind::ParagraphStrip);
        assert_eq!(ToolbarCommand::CodeBlock.action().kind, FormatKind::FencedCodeWrap);
    }

    #[test]
    fn test_labels() {
        assert_eq!(ToolbarCommand::Heading(2).label(), "Heading 2");
        assert_eq!(ToolbarCommand::UnorderedList.label(), "Unordered List");
    }

    #[test]
    fn test_action_serializes_kebab_case() {
        let json = serde_json::to_string(&ToolbarCommand::Link.action()).unwrap();
        assert_eq!(json, r#"{"kind":"link-insert","multiline":false}"#);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // UTF-8 Safety and Bounds
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_bold_norwegian_chars() {
        let result = apply("Hei på deg", 4, 7, ToolbarCommand::Bold);
        assert_eq!(result.text, "Hei **på** deg");
    }

    #[test]
    fn test_mid_char_selection_snaps_outward() {
        // 6 is inside 'å'; the selection grows to cover the whole character.
        let result = apply("Hei på deg", 4, 6, ToolbarCommand::Bold);
        assert_eq!(result.text, "Hei **på** deg");
    }

    #[test]
    fn test_selection_always_in_bounds() {
        let text = "Hei på deg\n你好 🎉\n- item\n## h";
        let mut commands: Vec<ToolbarCommand> = TOOLBAR.to_vec();
        commands.push(ToolbarCommand::Strikethrough);

        for command in commands {
            for start in 0..=text.len() + 3 {
                for end in (start..=text.len() + 3).step_by(3) {
                    let result = apply_with_url(text, start, end, command, "https://x.y");
                    let sel = result.selection;
                    assert!(sel.start <= sel.end, "{:?} {:?}", command, sel);
                    assert!(sel.end <= result.text.len(), "{:?} {:?}", command, sel);
                    assert!(result.text.is_char_boundary(sel.start));
                    assert!(result.text.is_char_boundary(sel.end));
                }
            }
        }
    }
}
