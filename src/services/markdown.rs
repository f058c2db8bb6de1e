// src/services/markdown.rs
use std::sync::LazyLock;

use regex::Regex;

use crate::render::escape_html;

/// Options handed to the rendering collaborator, mirroring what the
/// browser front-end passes to its markdown engine.
#[derive(Clone, Copy, Debug)]
pub struct MarkdownOptions {
    /// Treat single newlines as paragraph breaks.
    pub breaks: bool,
    /// GitHub-flavored extensions; only external engines honor this.
    pub gfm: bool,
    /// Escape the input before substitution.
    pub sanitize: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            breaks: true,
            gfm: true,
            sanitize: true,
        }
    }
}

/// External markdown-rendering collaborator. The engine is opaque to the
/// formatter; it only promises a fragment safe to hand to the view.
pub trait MarkdownRenderer {
    fn render(&self, text: &str, options: &MarkdownOptions) -> String;
}

static CITATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\d+\]").expect("citation pattern is valid")
});
static BOLD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern is valid")
});
static EMPHASIS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*(.*?)\*").expect("emphasis pattern is valid")
});
static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"`([^`]+)`").expect("inline code pattern is valid")
});

/// Built-in fallback engine: citation stripping, `**bold**`, `*emphasis*`,
/// backtick inline code, newline-split paragraphs with empties dropped.
/// Ignores `gfm`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicMarkdown;

impl MarkdownRenderer for BasicMarkdown {
    fn render(&self, text: &str, options: &MarkdownOptions) -> String {
        let stripped = CITATION.replace_all(text, "");
        let mut out = if options.sanitize {
            escape_html(&stripped)
        } else {
            stripped.into_owned()
        };
        out = BOLD.replace_all(&out, "<strong>$1</strong>").into_owned();
        out = EMPHASIS.replace_all(&out, "<em>$1</em>").into_owned();
        out = INLINE_CODE.replace_all(&out, "<code>$1</code>").into_owned();

        let paragraphs: Vec<&str> = out
            .split('\n')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if paragraphs.is_empty() {
            return String::new();
        }
        if options.breaks {
            paragraphs
                .iter()
                .map(|p| format!("<p>{p}</p>"))
                .collect()
        } else {
            format!("<p>{}</p>", paragraphs.join(" "))
        }
    }
}

/// Plain-text engine for the terminal view: drops the markup markers
/// instead of translating them.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainMarkdown;

impl MarkdownRenderer for PlainMarkdown {
    fn render(&self, text: &str, _options: &MarkdownOptions) -> String {
        let out = CITATION.replace_all(text, "");
        let out = BOLD.replace_all(&out, "$1");
        let out = EMPHASIS.replace_all(&out, "$1");
        let out = INLINE_CODE.replace_all(&out, "$1");
        out.split('\n')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
