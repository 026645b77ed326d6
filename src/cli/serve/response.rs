//! HTTP response handlers.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::core::ServeContext;
use crate::embed::serve::{VIEWER_HTML, ViewerVars};
use crate::utils::mime::types::{HTML, PLAIN};

/// Respond with the viewer page around a fresh render of the document.
///
/// A read failure renders the error placeholder with status 200, so a
/// viewer's re-fetch keeps working until the file is back.
pub fn respond_viewer(request: Request, ctx: &ServeContext) -> Result<()> {
    if is_head_request(&request) {
        return send_head(request, 200, HTML);
    }

    let content = ctx.document.render_or_placeholder();
    let body = VIEWER_HTML.render(&ViewerVars {
        title: &ctx.document.file_name(),
        content: &content,
        ws_port: ctx.ws_port,
    });
    send_body(request, 200, HTML, body.into_bytes())
}

/// Respond with a static file.
pub fn respond_file(request: Request, path: &Path) -> Result<()> {
    let content_type = crate::utils::mime::from_path(path);

    if is_head_request(&request) {
        return send_head(request, 200, content_type);
    }

    let body = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    send_body(request, 200, content_type, body)
}

pub fn respond_not_found(request: Request) -> Result<()> {
    if is_head_request(&request) {
        return send_head(request, 404, PLAIN);
    }
    send_body(request, 404, PLAIN, b"404 Not Found".to_vec())
}

/// Respond with 405 for anything but GET and HEAD.
pub fn respond_method_not_allowed(request: Request) -> Result<()> {
    let response = Response::from_data(b"405 Method Not Allowed".to_vec())
        .with_status_code(StatusCode(405))
        .with_header(make_header("Content-Type", PLAIN)?)
        .with_header(make_header("Allow", "GET, HEAD")?);
    request.respond(response)?;
    Ok(())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(request, 503, PLAIN, b"503 Service Unavailable".to_vec())
}

pub fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_head(request: Request, status: u16, content_type: &'static str) -> Result<()> {
    let response = Response::empty(StatusCode(status))
        .with_header(make_header("Content-Type", content_type)?)
        .with_header(make_header("Cache-Control", "no-store")?);
    request.respond(response)?;
    Ok(())
}

fn send_body(request: Request, status: u16, content_type: &'static str, body: Vec<u8>) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type)?)
        .with_header(make_header("Cache-Control", "no-store")?);
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Result<Header> {
    Header::from_bytes(key, value).map_err(|()| anyhow!("invalid header {key}: {value}"))
}
