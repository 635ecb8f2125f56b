//! Rendering and formatting property tests.
//!
//! Exercises the public API end to end: escaping, block structure, export
//! and the toolbar transform, over a handful of hostile and realistic inputs.

use readme_genius::export::{export_document, to_markdown_file, ExportFormat};
use readme_genius::markdown::{
    apply_format, render, segment, BlockKind, FormatAction, FormatKind, SelectionRange,
    ToolbarCommand, TOOLBAR,
};
use readme_genius::state::{EditorSession, DEFAULT_TEMPLATE};
use regex::Regex;

const SAMPLES: &[&str] = &[
    "",
    "<script>alert('x')</script>",
    "# <img src=x onerror=alert(1)>",
    "- <b>one</b>\n- two < three\n- a > b",
    "> <iframe>\n> quoted & more",
    "```html\n<script></script>\n```",
    "```\nunterminated <div>",
    "**<em>** *<strong>* ~~<del>~~ `<code>`",
    "[<x>](http://a.io/?q=<y>) ![<alt>](<src>)",
    "1. <ol>\n2. </ol>",
    "---\n<hr>\n***",
    "plain \u{E000}0\u{E001} sentinel text",
    "**a *b** c* __x_y__ ***z***",
    DEFAULT_TEMPLATE,
];

/// Tags the renderer itself emits.
fn engine_tag() -> Regex {
    Regex::new(r"^</?(?:h[1-6]|p|ul|ol|li|pre|code|blockquote|br|hr|strong|em|del|a|img)\b")
        .unwrap()
}

// ============================================================================
// Rendering Properties
// ============================================================================

#[test]
fn test_no_unescaped_markup_from_input() {
    let tag = engine_tag();
    for sample in SAMPLES {
        let html = render(sample);
        assert!(!html.contains("<script"), "script leaked for {:?}", sample);
        assert!(!html.contains("<iframe"), "iframe leaked for {:?}", sample);

        for (i, _) in html.match_indices('<') {
            assert!(
                tag.is_match(&html[i..]),
                "stray '<' at {} in {:?} (from {:?})",
                i,
                html,
                sample
            );
        }
    }
}

#[test]
fn test_no_private_use_tokens_leak() {
    for sample in SAMPLES {
        let html = render(sample);
        assert!(!html.contains('\u{E000}'), "token leaked for {:?}", sample);
        assert!(!html.contains('\u{E001}'), "token leaked for {:?}", sample);
    }
}

#[test]
fn test_heading_level_fidelity() {
    let html = render("# A\n## B\n###### C");
    assert_eq!(html.matches("<h1>").count(), 1);
    assert_eq!(html.matches("<h2>").count(), 1);
    assert_eq!(html.matches("<h6>").count(), 1);
    assert!(html.contains("<h1>A</h1>"));
    assert!(html.contains("<h6>C</h6>"));
}

#[test]
fn test_list_grouping() {
    let html = render("- a\n- b\n- c");
    assert_eq!(html.matches("<ul>").count(), 1);
    assert_eq!(html.matches("<li>").count(), 3);
}

#[test]
fn test_blank_line_separates_lists() {
    let html = render("- a\n\n- b");
    assert_eq!(html.matches("<ul>").count(), 2);
}

#[test]
fn test_fenced_code_bypasses_inline_formatting() {
    let html = render("```\n**x**\n```");
    assert!(html.contains("<code class=\"language-plaintext\">**x**</code>"));
    assert!(!html.contains("<strong>x</strong>"));
}

#[test]
fn test_segmentation_is_total() {
    for sample in SAMPLES {
        let line_count = sample.lines().count();
        let blocks = segment(sample);

        let mut next = 0;
        for block in &blocks {
            assert_eq!(block.lines.start, next, "gap before {:?}", block.kind);
            assert!(block.lines.end > block.lines.start);
            next = block.lines.end;
        }
        assert_eq!(next, line_count, "lines left over in {:?}", sample);
    }
}

#[test]
fn test_template_structure() {
    let kinds: Vec<BlockKind> = segment(DEFAULT_TEMPLATE)
        .into_iter()
        .map(|b| b.kind)
        .filter(|k| *k != BlockKind::Blank)
        .collect();

    assert_eq!(kinds[0], BlockKind::Heading(1));
    assert!(kinds.contains(&BlockKind::UnorderedList));
    assert_eq!(
        kinds
            .iter()
            .filter(|k| matches!(k, BlockKind::FencedCode { language: Some(l) } if l == "bash"))
            .count(),
        2
    );
}

// ============================================================================
// Export Properties
// ============================================================================

#[test]
fn test_markdown_export_round_trip() {
    for sample in SAMPLES {
        assert_eq!(to_markdown_file(sample), *sample);
        let artifact = export_document(sample, "README", ExportFormat::Markdown);
        assert_eq!(artifact.content, *sample);
    }
}

#[test]
fn test_html_export_contains_preview() {
    for sample in SAMPLES {
        let artifact = export_document(sample, "README.md", ExportFormat::Html);
        assert_eq!(artifact.file_name, "README.html");
        assert!(artifact.content.contains(&render(sample)));
    }
}

// ============================================================================
// Toolbar Transform Properties
// ============================================================================

#[test]
fn test_bold_wrap_example() {
    let result = apply_format(
        "hello world",
        SelectionRange::new(0, 5),
        &ToolbarCommand::Bold.action(),
        &mut None::<String>,
    );
    assert_eq!(result.text, "**hello** world");
    assert_eq!(&result.text[result.selection.start..result.selection.end], "hello");
}

#[test]
fn test_paragraph_strip_example() {
    let result = apply_format(
        "## Heading",
        SelectionRange::cursor(0),
        &FormatAction::new(FormatKind::ParagraphStrip),
        &mut None::<String>,
    );
    assert_eq!(result.text, "Heading");
}

#[test]
fn test_no_url_cancellation() {
    let buffer = "see the docs";
    let selection = SelectionRange::new(8, 12);
    for command in [ToolbarCommand::Link, ToolbarCommand::Image] {
        let result = apply_format(buffer, selection, &command.action(), &mut None::<String>);
        assert_eq!(result.text, buffer);
        assert_eq!(result.selection, selection);
        assert!(!result.applied);
    }
}

#[test]
fn test_selection_bounds_over_samples() {
    let mut commands = TOOLBAR.to_vec();
    commands.push(ToolbarCommand::Strikethrough);

    for sample in SAMPLES {
        let len = sample.len();
        let offsets = [0, len / 3, len / 2, len, len + 10];
        for command in &commands {
            for &start in &offsets {
                for &end in &offsets {
                    let result = apply_format(
                        sample,
                        SelectionRange::new(start, end),
                        &command.action(),
                        &mut Some("https://example.com".to_string()),
                    );
                    let sel = result.selection;
                    assert!(sel.start <= sel.end);
                    assert!(sel.end <= result.text.len());
                }
            }
        }
    }
}

// ============================================================================
// Session Workflow
// ============================================================================

#[test]
fn test_session_edit_and_export() {
    let mut session = EditorSession::new();
    session.load_uploaded("Project.md", "Intro\n\nsteps".to_string());

    session.apply(
        ToolbarCommand::Heading(1),
        SelectionRange::cursor(0),
        &mut None::<String>,
    );
    let result = session.apply(
        ToolbarCommand::Link,
        SelectionRange::new(9, 14),
        &mut Some("https://docs.rs".to_string()),
    );
    assert!(result.applied);
    assert_eq!(session.content, "# Intro\n\n[steps](https://docs.rs)");
    assert!(session.has_unsaved_changes());

    let preview = session.preview_html();
    assert!(preview.starts_with("<h1>Intro</h1>\n<p><a href=\"https://docs.rs\""));

    let html = session.export(ExportFormat::Html);
    assert_eq!(html.file_name, "Project.html");
    assert!(html.content.contains(&preview));
    assert!(session.has_unsaved_changes());

    let md = session.export(ExportFormat::Markdown);
    assert_eq!(md.file_name, "Project.md");
    assert!(!session.has_unsaved_changes());
}
