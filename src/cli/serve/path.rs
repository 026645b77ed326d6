//! URL to filesystem path resolution for static assets.

use std::path::{Path, PathBuf};

/// Whether the request targets the viewer page.
pub fn is_viewer_url(url: &str) -> bool {
    normalize_url(url).is_some_and(|path| path.is_empty())
}

/// Resolve URL to a file under `serve_root`.
///
/// Directories are not listed and never resolve.
pub fn resolve_path(url: &str, serve_root: &Path) -> Option<PathBuf> {
    let clean = normalize_url(url)?;

    // Reject paths with suspicious patterns early
    if clean.is_empty() || clean.contains("..") {
        return None;
    }

    let local = serve_root.join(&clean);

    // Canonicalize to resolve symlinks and verify path is under serve_root
    let canonical = local.canonicalize().ok()?;
    let root_canonical = serve_root.canonicalize().ok()?;

    if !canonical.starts_with(&root_canonical) {
        return None;
    }

    canonical.is_file().then_some(canonical)
}

/// Normalize URL: strip query string and fragment, decode, trim slashes.
///
/// `None` if the path does not decode to UTF-8.
fn normalize_url(url: &str) -> Option<String> {
    use percent_encoding::percent_decode_str;

    let path = url.split(['?', '#']).next().unwrap_or(url);
    let decoded = percent_decode_str(path).decode_utf8().ok()?;

    Some(decoded.trim_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_root() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("logo.png"), b"png").unwrap();
        fs::create_dir(dir.path().join("img")).unwrap();
        fs::write(dir.path().join("img").join("a b.svg"), b"<svg/>").unwrap();
        dir
    }

    #[test]
    fn test_viewer_url() {
        assert!(is_viewer_url("/"));
        assert!(is_viewer_url("/?t=1"));
        assert!(is_viewer_url(""));
        assert!(!is_viewer_url("/logo.png"));
    }

    #[test]
    fn test_undecodable_url_matches_nothing() {
        let root = make_root();
        assert!(!is_viewer_url("/%FF"));
        assert!(resolve_path("/%FF", root.path()).is_none());
    }

    #[test]
    fn test_resolves_file() {
        let root = make_root();
        let path = resolve_path("/logo.png?v=2", root.path()).unwrap();
        assert!(path.ends_with("logo.png"));
    }

    #[test]
    fn test_percent_decoded() {
        let root = make_root();
        let path = resolve_path("/img/a%20b.svg", root.path()).unwrap();
        assert!(path.ends_with("a b.svg"));
    }

    #[test]
    fn test_directory_and_missing_rejected() {
        let root = make_root();
        assert!(resolve_path("/img", root.path()).is_none());
        assert!(resolve_path("/nope.css", root.path()).is_none());
    }

    #[test]
    fn test_traversal_rejected() {
        let root = make_root();
        let inner = root.path().join("img");
        assert!(resolve_path("/../logo.png", &inner).is_none());
        assert!(resolve_path("/%2e%2e/logo.png", &inner).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escape_rejected() {
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("secret.txt"), b"secret").unwrap();

        let root = make_root();
        std::os::unix::fs::symlink(outside.path().join("secret.txt"), root.path().join("link.txt"))
            .unwrap();

        assert!(resolve_path("/link.txt", root.path()).is_none());
    }
}
