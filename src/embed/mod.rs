//! Embedded static resources for mdview.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `serve` - Viewer page shell (viewer.html)
//!
//! # Usage
//!
//! ```ignore
//! use embed::serve::{VIEWER_HTML, ViewerVars};
//!
//! let html = VIEWER_HTML.render(&ViewerVars {
//!     title: "docs.md",
//!     content: "<h1 id=\"hello\">Hello</h1>",
//!     ws_port: 8081,
//! });
//! ```

mod template;

pub use template::{Template, TemplateVars};

pub mod serve {
    use super::{Template, TemplateVars};
    use crate::utils::html::escape;

    /// Variables for viewer.html.
    pub struct ViewerVars<'a> {
        /// Document file name, shown in the page title
        pub title: &'a str,
        /// Rendered markup (inserted as-is)
        pub content: &'a str,
        /// Live-reload socket port
        pub ws_port: u16,
    }

    impl TemplateVars for ViewerVars<'_> {
        fn apply(&self, content: &str) -> String {
            // Content goes last so placeholders inside the document stay untouched
            content
                .replace("__MDVIEW_TITLE__", &escape(self.title))
                .replace("__MDVIEW_WS_PORT__", &self.ws_port.to_string())
                .replace("__MDVIEW_CONTENT__", self.content)
        }
    }

    /// Viewer page: rendered document, live indicator, reload client.
    pub const VIEWER_HTML: Template<ViewerVars<'static>> =
        Template::new(include_str!("serve/viewer.html"));
}

#[cfg(test)]
mod tests {
    use super::serve::{VIEWER_HTML, ViewerVars};

    fn render(title: &str, content: &str) -> String {
        VIEWER_HTML.render(&ViewerVars {
            title,
            content,
            ws_port: 8123,
        })
    }

    #[test]
    fn test_viewer_injects_all_vars() {
        let html = render("docs.md", "<h1 id=\"hello\">Hello</h1>");
        assert!(html.contains("<title>Markdown Viewer - docs.md</title>"));
        assert!(html.contains("<h1 id=\"hello\">Hello</h1>"));
        assert!(html.contains("8123"));
        assert!(!html.contains("__MDVIEW_"));
    }

    #[test]
    fn test_viewer_has_content_container_and_indicator() {
        let html = render("docs.md", "");
        assert!(html.contains("id=\"content\""));
        assert!(html.contains("id=\"liveIndicator\""));
        assert!(html.contains("'reload'"));
    }

    #[test]
    fn test_title_is_escaped() {
        let html = render("<b>.md", "");
        assert!(html.contains("Markdown Viewer - &lt;b&gt;.md"));
    }

    #[test]
    fn test_placeholders_inside_content_survive() {
        let html = render("docs.md", "<p>__MDVIEW_TITLE__</p>");
        assert!(html.contains("<p>__MDVIEW_TITLE__</p>"));
    }
}
