//! Document rendering: Markdown source to display markup.
//!
//! - `markdown` - pure, deterministic Markdown → HTML conversion
//! - `document` - the watched file: fresh read + render, error placeholder

mod document;
mod markdown;

pub use document::WatchedDocument;
pub use markdown::MarkdownOptions;
