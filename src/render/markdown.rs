//! Markdown to HTML conversion using pulldown-cmark.
//!
//! Headings get an `id` anchor derived from their text so in-page links
//! (`#getting-started`) keep working across reloads.

use std::sync::LazyLock;

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};
use regex::Regex;
use serde::Deserialize;

/// Runs of characters outside `[A-Za-z0-9_]` collapse into one `-`.
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").expect("static regex"));

/// Options for markdown conversion
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MarkdownOptions {
    /// Enable tables extension
    pub tables: bool,
    /// Enable footnotes extension
    pub footnotes: bool,
    /// Enable strikethrough extension
    pub strikethrough: bool,
    /// Enable task lists extension
    pub task_lists: bool,
    /// Render single newlines inside a paragraph as `<br>`
    pub breaks: bool,
}

impl Default for MarkdownOptions {
    /// GitHub-flavored defaults, soft breaks left as-is.
    fn default() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            task_lists: true,
            breaks: false,
        }
    }
}

impl MarkdownOptions {
    fn to_pulldown_options(&self) -> Options {
        let mut opts = Options::empty();
        if self.tables {
            opts.insert(Options::ENABLE_TABLES);
        }
        if self.footnotes {
            opts.insert(Options::ENABLE_FOOTNOTES);
        }
        if self.strikethrough {
            opts.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.task_lists {
            opts.insert(Options::ENABLE_TASKLISTS);
        }
        opts
    }
}

/// Render markdown source to an HTML fragment.
///
/// Pure: the same input and options always produce the same bytes.
pub fn render_markdown(markdown: &str, options: &MarkdownOptions) -> String {
    let parser = Parser::new_ext(markdown, options.to_pulldown_options());
    let events = anchor_headings(parser, options.breaks);

    let mut out = String::with_capacity(markdown.len() + markdown.len() / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

/// Slug used as a heading anchor: lowercase, non-word runs become `-`.
pub fn heading_slug(text: &str) -> String {
    NON_WORD
        .replace_all(&text.to_lowercase(), "-")
        .into_owned()
}

/// A heading whose end tag has not been seen yet.
struct PendingHeading<'a> {
    tag: Tag<'a>,
    inner: Vec<Event<'a>>,
    text: String,
}

/// Buffer each heading until its end tag so the anchor can be computed from
/// the full heading text, then re-emit it with the `id` set.
fn anchor_headings<'a>(events: impl Iterator<Item = Event<'a>>, breaks: bool) -> Vec<Event<'a>> {
    let mut out = Vec::new();
    let mut heading: Option<PendingHeading<'a>> = None;

    for event in events {
        let event = match event {
            Event::SoftBreak if breaks => Event::HardBreak,
            other => other,
        };

        match event {
            Event::Start(tag @ Tag::Heading { .. }) if heading.is_none() => {
                heading = Some(PendingHeading {
                    tag,
                    inner: Vec::new(),
                    text: String::new(),
                });
            }
            Event::End(end @ TagEnd::Heading(_)) => match heading.take() {
                Some(pending) => {
                    out.push(Event::Start(with_anchor(pending.tag, &pending.text)));
                    out.extend(pending.inner);
                    out.push(Event::End(end));
                }
                None => out.push(Event::End(end)),
            },
            event => match heading.as_mut() {
                Some(pending) => {
                    if let Event::Text(t) | Event::Code(t) = &event {
                        pending.text.push_str(t);
                    }
                    pending.inner.push(event);
                }
                None => out.push(event),
            },
        }
    }

    out
}

fn with_anchor<'a>(tag: Tag<'a>, text: &str) -> Tag<'a> {
    match tag {
        Tag::Heading {
            level,
            id,
            classes,
            attrs,
        } => Tag::Heading {
            level,
            id: id.or_else(|| Some(CowStr::from(heading_slug(text)))),
            classes,
            attrs,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(md: &str) -> String {
        render_markdown(md, &MarkdownOptions::default())
    }

    #[test]
    fn test_heading_gets_anchor() {
        assert_eq!(render("# Hello"), "<h1 id=\"hello\">Hello</h1>\n");
    }

    #[test]
    fn test_heading_and_paragraph() {
        let html = render("# Hello\n\nWorld");
        assert!(html.contains("<h1 id=\"hello\">Hello</h1>"));
        assert!(html.contains("<p>World</p>"));
    }

    #[test]
    fn test_heading_slug_rules() {
        assert_eq!(heading_slug("Getting Started"), "getting-started");
        assert_eq!(heading_slug("What's new?"), "what-s-new-");
        assert_eq!(heading_slug("snake_case stays"), "snake_case-stays");
    }

    #[test]
    fn test_heading_with_inline_code() {
        let html = render("## Using `serve`");
        assert!(html.contains("<h2 id=\"using-serve\">Using <code>serve</code></h2>"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let md = "# T\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\n- [x] done\n\n~~old~~[^1]\n\n[^1]: note\n";
        assert_eq!(render(md), render(md));
    }

    #[test]
    fn test_gfm_extensions() {
        let html = render("| a |\n|---|\n| 1 |\n\n~~gone~~\n\n- [ ] todo\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains("type=\"checkbox\""));
    }

    #[test]
    fn test_soft_breaks() {
        let soft = render("one\ntwo");
        assert!(!soft.contains("<br"));

        let options = MarkdownOptions {
            breaks: true,
            ..MarkdownOptions::default()
        };
        assert!(render_markdown("one\ntwo", &options).contains("<br />"));
    }

    #[test]
    fn test_code_block_language_class() {
        let html = render("```rust\nfn main() {}\n```");
        assert!(html.contains("<code class=\"language-rust\">"));
    }
}
