// src/services/formatter.rs
use std::sync::LazyLock;

use regex::Regex;

use crate::render::RenderNode;
use crate::services::markdown::{MarkdownOptions, MarkdownRenderer};

/// Raw message split at fence boundaries, order preserved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Code {
        language: Option<String>,
        content: String,
    },
}

// Triple backtick, optional bare language token, mandatory newline,
// non-greedy body, closing fence. An unterminated fence never matches and
// falls through to the trailing text segment.
static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(\w*)\n(.*?)```").expect("fence pattern is valid")
});

/// Splits a raw assistant message into alternating text and code segments.
/// Text outside fences is kept verbatim; code bodies are trimmed and keep
/// their language tag. Whitespace-only gaps between fences are dropped.
pub fn split_fences(raw: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;
    for caps in FENCE.captures_iter(raw) {
        let Some(whole) = caps.get(0) else { continue };
        push_text(&mut segments, &raw[last..whole.start()]);
        let language = caps
            .get(1)
            .map(|m| m.as_str())
            .filter(|tag| !tag.is_empty())
            .map(str::to_string);
        let content = caps
            .get(2)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();
        segments.push(Segment::Code { language, content });
        last = whole.end();
    }
    push_text(&mut segments, &raw[last..]);
    segments
}

fn push_text(segments: &mut Vec<Segment>, chunk: &str) {
    if !chunk.trim().is_empty() {
        segments.push(Segment::Text(chunk.to_string()));
    }
}

/// Full formatting pipeline: text segments go through the injected markdown
/// collaborator, code segments pass through verbatim for the view to frame.
pub fn format(
    raw: &str,
    markdown: &dyn MarkdownRenderer,
    options: &MarkdownOptions,
) -> Vec<RenderNode> {
    split_fences(raw)
        .into_iter()
        .map(|segment| match segment {
            Segment::Text(text) => RenderNode::Markup(markdown.render(&text, options)),
            Segment::Code { language, content } => RenderNode::Code { language, content },
        })
        .collect()
}
