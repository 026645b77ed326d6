//! The watched document: one file, read fresh on every render.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::markdown::{MarkdownOptions, render_markdown};
use crate::utils::html::escape;

/// Reading the document at request time failed.
#[derive(Debug, Error)]
#[error("cannot read `{}`: {source}", path.display())]
pub struct ReadError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// The single document this process serves.
///
/// The path is fixed for the process lifetime. Nothing is cached: every
/// render reads the file again, so a viewer never sees output older than
/// its own fetch.
#[derive(Debug, Clone)]
pub struct WatchedDocument {
    path: PathBuf,
    options: MarkdownOptions,
}

impl WatchedDocument {
    pub fn new(path: PathBuf, options: MarkdownOptions) -> Self {
        Self { path, options }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name for page titles and status lines.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Read the file, replacing invalid UTF-8 sequences.
    pub fn read(&self) -> Result<String, ReadError> {
        let bytes = std::fs::read(&self.path).map_err(|source| ReadError {
            path: self.path.clone(),
            source,
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Read the current content and render it.
    pub fn render(&self) -> Result<String, ReadError> {
        self.read()
            .map(|source| render_markdown(&source, &self.options))
    }

    /// Render, or produce the error placeholder if the file cannot be read.
    pub fn render_or_placeholder(&self) -> String {
        match self.render() {
            Ok(markup) => markup,
            Err(e) => {
                crate::log!("error"; "{}", e);
                error_placeholder(&e)
            }
        }
    }
}

/// Markup shown in place of the document when it cannot be read.
pub fn error_placeholder(error: &ReadError) -> String {
    format!(
        "<h1>Error loading markdown file</h1><pre>{}</pre>",
        escape(&error.to_string())
    )
}
