//! Block Segmenter
//!
//! Phase one of rendering: a single top-to-bottom pass that classifies runs
//! of lines into typed [`Block`] values. Nothing here produces HTML.
//!
//! Every line of the document ends up in exactly one block. Runs of blank
//! lines become [`BlockKind::Blank`] blocks, which separate paragraphs and
//! lists and render to nothing.

use log::{debug, trace};
use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

// ─────────────────────────────────────────────────────────────────────────────
// Block Types
// ─────────────────────────────────────────────────────────────────────────────

/// Structural kind of a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    /// ATX heading, level 1-6
    Heading(u8),
    /// Fenced code block with an optional language token
    FencedCode { language: Option<String> },
    /// One or more consecutive `>` lines
    Blockquote,
    /// Consecutive `-`, `*` or `+` items
    UnorderedList,
    /// Consecutive `1.` style items
    OrderedList,
    /// `---`, `***` or `___`
    HorizontalRule,
    /// Any other run of non-blank lines
    Paragraph,
    /// One or more whitespace-only lines
    Blank,
}

impl BlockKind {
    /// Whether the rendered HTML of this kind is already block-level.
    pub fn is_block_level(&self) -> bool {
        !matches!(self, BlockKind::Paragraph | BlockKind::Blank)
    }
}

/// A classified span of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    /// Payload with block markers removed:
    /// - heading: the trimmed heading text
    /// - fenced code: the lines between the fences
    /// - blockquote: one line per source line, `>` stripped
    /// - lists: one item per line, marker stripped
    /// - paragraph, rule, blank: the source lines
    pub raw: String,
    /// Zero-based source line range covered by the block
    pub lines: Range<usize>,
    /// The block's HTML is block-level and must not be wrapped in `<p>`
    pub rendered: bool,
}

impl Block {
    fn new(kind: BlockKind, raw: String, lines: Range<usize>) -> Self {
        let rendered = kind.is_block_level();
        Self {
            kind,
            raw,
            lines,
            rendered,
        }
    }

    /// List items or quote lines, one per source line.
    pub fn items(&self) -> impl Iterator<Item = &str> {
        self.raw.split('\n')
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Line Classification
// ─────────────────────────────────────────────────────────────────────────────

/// What a single line could start, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind<'a> {
    Blank,
    Fence { language: Option<&'a str> },
    Heading { level: u8, text: &'a str },
    Rule,
    Quote(&'a str),
    Bullet(&'a str),
    Numbered(&'a str),
    Text,
}

fn heading_pattern() -> &'static Regex {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    HEADING.get_or_init(|| Regex::new(r"^(#{1,6})\s+(.*)$").expect("valid heading pattern"))
}

fn bullet_pattern() -> &'static Regex {
    static BULLET: OnceLock<Regex> = OnceLock::new();
    BULLET.get_or_init(|| Regex::new(r"^\s*[-*+] +(.*)$").expect("valid bullet pattern"))
}

fn numbered_pattern() -> &'static Regex {
    static NUMBERED: OnceLock<Regex> = OnceLock::new();
    NUMBERED.get_or_init(|| Regex::new(r"^\s*\d+\. +(.*)$").expect("valid numbered pattern"))
}

fn classify(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }

    // An info string holding a backtick (```x```) is inline code, not a fence.
    let indented = line.trim_start();
    if let Some(info) = indented.strip_prefix("```").filter(|info| !info.contains('`')) {
        return LineKind::Fence {
            language: info.split_whitespace().next(),
        };
    }

    if let Some(caps) = heading_pattern().captures(line) {
        if let (Some(hashes), Some(text)) = (caps.get(1), caps.get(2)) {
            return LineKind::Heading {
                level: hashes.as_str().len() as u8,
                text: text.as_str(),
            };
        }
    }

    if matches!(trimmed, "---" | "***" | "___") {
        return LineKind::Rule;
    }

    if let Some(rest) = indented.strip_prefix('>') {
        return LineKind::Quote(rest.strip_prefix(' ').unwrap_or(rest));
    }

    if let Some(item) = bullet_pattern().captures(line).and_then(|c| c.get(1)) {
        return LineKind::Bullet(item.as_str());
    }

    if let Some(item) = numbered_pattern().captures(line).and_then(|c| c.get(1)) {
        return LineKind::Numbered(item.as_str());
    }

    LineKind::Text
}

fn is_closing_fence(line: &str) -> bool {
    line.trim() == "```"
}

// ─────────────────────────────────────────────────────────────────────────────
// Segmentation
// ─────────────────────────────────────────────────────────────────────────────

/// Split a document into blocks.
///
/// The returned blocks cover every line of `document` exactly once, in
/// order. An unterminated code fence runs to the end of the document.
pub fn segment(document: &str) -> Vec<Block> {
    let lines: Vec<&str> = document.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let start = i;
        let block = match classify(lines[i]) {
            LineKind::Fence { language } => {
                i += 1;
                let body_start = i;
                while i < lines.len() && !is_closing_fence(lines[i]) {
                    i += 1;
                }
                let body = lines[body_start..i].join("\n");
                if i < lines.len() {
                    i += 1;
                } else {
                    debug!(
                        "Unterminated code fence at line {}, closing at end of document",
                        start + 1
                    );
                }
                Block::new(
                    BlockKind::FencedCode {
                        language: language.map(str::to_string),
                    },
                    body,
                    start..i,
                )
            }
            LineKind::Heading { level, text } => {
                i += 1;
                Block::new(BlockKind::Heading(level), text.trim().to_string(), start..i)
            }
            LineKind::Rule => {
                i += 1;
                Block::new(BlockKind::HorizontalRule, lines[start].to_string(), start..i)
            }
            LineKind::Quote(_) => {
                let run = take_run(&lines, &mut i, |kind| match kind {
                    LineKind::Quote(content) => Some(content),
                    _ => None,
                });
                Block::new(BlockKind::Blockquote, run.join("\n"), start..i)
            }
            LineKind::Bullet(_) => {
                let run = take_run(&lines, &mut i, |kind| match kind {
                    LineKind::Bullet(item) => Some(item),
                    _ => None,
                });
                Block::new(BlockKind::UnorderedList, run.join("\n"), start..i)
            }
            LineKind::Numbered(_) => {
                let run = take_run(&lines, &mut i, |kind| match kind {
                    LineKind::Numbered(item) => Some(item),
                    _ => None,
                });
                Block::new(BlockKind::OrderedList, run.join("\n"), start..i)
            }
            LineKind::Text => {
                take_run(&lines, &mut i, |kind| match kind {
                    LineKind::Text => Some(()),
                    _ => None,
                });
                Block::new(BlockKind::Paragraph, lines[start..i].join("\n"), start..i)
            }
            LineKind::Blank => {
                take_run(&lines, &mut i, |kind| match kind {
                    LineKind::Blank => Some(()),
                    _ => None,
                });
                Block::new(BlockKind::Blank, lines[start..i].join("\n"), start..i)
            }
        };

        trace!("{:?} covering lines {:?}", block.kind, block.lines);
        blocks.push(block);
    }

    debug!("Segmented {} lines into {} blocks", lines.len(), blocks.len());
    blocks
}

/// Consume consecutive lines for which `accept` returns `Some`, advancing `i`.
fn take_run<'a, T>(
    lines: &[&'a str],
    i: &mut usize,
    accept: impl Fn(LineKind<'a>) -> Option<T>,
) -> Vec<T> {
    let mut run = Vec::new();
    while let Some(value) = lines.get(*i).copied().and_then(|line| accept(classify(line))) {
        run.push(value);
        *i += 1;
    }
    run
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
