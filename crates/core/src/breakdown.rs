//! Topic-breakdown markdown parsing.
//!
//! Before a batch is submitted, a high-level topic is broken down into
//! subtopics by the generation model, which returns a markdown document: one
//! `##` heading per subtopic, prose underneath. This module turns that
//! document into the ordered [`BatchInputItem`] list used as the batch
//! request file — the same list the result parser later links against.
//!
//! The model call itself is an external collaborator; only the markdown
//! parsing lives here.

use crate::model::{BatchInputItem, Language};

/// Cap on the accumulated topic body per item.
const MAX_TOPIC_CHARS: usize = 1000;

/// Title assigned to content that appears before the first `##` heading.
const IMPLICIT_TITLE: &str = "Introduction";

/// Parses a breakdown markdown document into batch input items.
///
/// Rules:
/// - a wrapping ```` ```markdown ```` code fence is removed first;
/// - `#` (level-1) headings are document titles and are skipped;
/// - each `##` heading opens a new item; the heading text, with surrounding
///   square brackets trimmed, becomes the item title;
/// - non-blank lines accumulate into the item topic, joined with single
///   spaces and capped at [`MAX_TOPIC_CHARS`] characters;
/// - items without body content are not emitted.
///
/// `source` is recorded as `input` on every item so a batch built from
/// several documents stays attributable.
pub fn parse_breakdown(
    markdown: &str,
    language: Language,
    source: &str,
    visual_style: &str,
) -> Vec<BatchInputItem> {
    let cleaned = markdown.replace("```markdown", "").replace("```", "");

    let mut items = Vec::new();
    let mut title = IMPLICIT_TITLE.to_owned();
    let mut body: Vec<&str> = Vec::new();

    for line in cleaned.trim().lines() {
        let line = line.trim();

        if line.starts_with("# ") {
            continue;
        }

        if let Some(heading) = line.strip_prefix("## ") {
            if !body.is_empty() {
                items.push(build_item(source, &title, &body, language, visual_style));
            }
            title = heading.trim().trim_matches(&['[', ']'][..]).to_owned();
            body.clear();
        } else if !line.is_empty() {
            body.push(line);
        }
    }

    if !title.is_empty() && !body.is_empty() {
        items.push(build_item(source, &title, &body, language, visual_style));
    }

    items
}

fn build_item(
    source: &str,
    title: &str,
    body: &[&str],
    language: Language,
    visual_style: &str,
) -> BatchInputItem {
    let joined = body.join(" ");
    let topic: String = joined.chars().take(MAX_TOPIC_CHARS).collect();

    BatchInputItem {
        input: source.to_owned(),
        title: title.to_owned(),
        topic,
        language,
        visual_style: visual_style.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# Heart Failure

Some preamble about the document.

## [Compensation Mechanisms]
The heart compensates through preload changes.
Frank-Starling effects matter here.

## Medications

ACE inhibitors reduce afterload.
";

    #[test]
    fn test_headings_open_items_and_h1_is_skipped() {
        let items = parse_breakdown(SAMPLE, Language::En, "Heart Failure", "cartoon");
        assert_eq!(items.len(), 3);

        assert_eq!(items[0].title, "Introduction");
        assert_eq!(items[0].topic, "Some preamble about the document.");

        assert_eq!(items[1].title, "Compensation Mechanisms");
        assert_eq!(
            items[1].topic,
            "The heart compensates through preload changes. Frank-Starling effects matter here."
        );

        assert_eq!(items[2].title, "Medications");
        assert_eq!(items[2].topic, "ACE inhibitors reduce afterload.");
    }

    #[test]
    fn test_items_carry_source_language_and_style() {
        let items = parse_breakdown(SAMPLE, Language::Es, "Insuficiencia", "watercolour");
        for item in &items {
            assert_eq!(item.input, "Insuficiencia");
            assert_eq!(item.language, Language::Es);
            assert_eq!(item.visual_style, "watercolour");
        }
    }

    #[test]
    fn test_markdown_fence_wrapper_is_removed() {
        let fenced = "```markdown\n## Topic One\nbody text\n```";
        let items = parse_breakdown(fenced, Language::En, "src", "cartoon");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Topic One");
        assert_eq!(items[0].topic, "body text");
    }

    #[test]
    fn test_heading_without_body_is_not_emitted() {
        let markdown = "## Empty Section\n\n## Real Section\ncontent";
        let items = parse_breakdown(markdown, Language::En, "src", "cartoon");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Real Section");
    }

    #[test]
    fn test_topic_body_is_capped() {
        let long_line = "x".repeat(3000);
        let markdown = format!("## Big\n{long_line}");
        let items = parse_breakdown(&markdown, Language::En, "src", "cartoon");
        assert_eq!(items[0].topic.chars().count(), MAX_TOPIC_CHARS);
    }

    #[test]
    fn test_empty_document_yields_no_items() {
        assert!(parse_breakdown("", Language::En, "src", "cartoon").is_empty());
        assert!(parse_breakdown("# Title only", Language::En, "src", "cartoon").is_empty());
    }
}
