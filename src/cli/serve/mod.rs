//! Viewer server: HTTP endpoint plus the live sync system.

mod lifecycle;
mod path;
mod port;
mod response;

pub use port::PortError;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tiny_http::{Method, Request, Server};
use tokio::sync::mpsc;

use crate::actor::coordinator::{CHANNEL_BUFFER, SyncCoordinator};
use crate::actor::fs::FsActor;
use crate::actor::ws::ViewerRegistry;
use crate::actor::Coordinator;
use crate::config::ViewerConfig;
use crate::core::{ServeContext, Shutdown, StartupError};
use crate::reload::server::{spawn_acceptor, spawn_viewer_poller};
use crate::render::WatchedDocument;
use crate::{debug, log};

/// Requests handled concurrently.
const REQUEST_THREADS: usize = 4;

/// Start everything and serve until Ctrl+C.
///
/// Startup order: document check, HTTP port, live-socket port, watcher,
/// signal handler. Any failure up to that point is fatal.
pub fn serve(config: &ViewerConfig) -> Result<(), StartupError> {
    let document_path = &config.document;
    if !document_path.is_file() {
        return Err(StartupError::DocumentMissing(document_path.clone()));
    }

    let (server, http_addr) = lifecycle::bind_http(&config.serve)?;
    let (ws_listener, ws_port) = lifecycle::bind_live_socket(&config.serve, http_addr.port())?;

    let shutdown = Shutdown::new();
    let registry = ViewerRegistry::new();
    let (events_tx, events_rx) = mpsc::channel(CHANNEL_BUFFER);

    let fs = FsActor::new(document_path, events_tx.clone())?;
    let sync = SyncCoordinator::new(
        events_rx,
        registry.clone(),
        document_path,
        Duration::from_millis(config.serve.debounce_ms),
    );

    let server = Arc::new(server);
    lifecycle::install_shutdown_handler(Arc::clone(&server), shutdown.clone(), events_tx.clone())?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(REQUEST_THREADS)
        .build()
        .map_err(|e| StartupError::Spawn(std::io::Error::other(e)))?;

    let ctx = Arc::new(ServeContext {
        document: WatchedDocument::new(document_path.clone(), config.markdown.clone()),
        registry,
        http_addr,
        ws_port,
        assets_dir: config.assets_dir(),
        shutdown,
    });

    let actors = Coordinator::new(fs, sync).spawn().map_err(StartupError::Spawn)?;
    let acceptor = spawn_acceptor(ws_listener, events_tx, ctx.shutdown.clone());
    let poller = spawn_viewer_poller(ctx.registry.clone(), ctx.shutdown.clone());

    log!("serve"; "{}", ctx.url());
    log!("watch"; "{}", ctx.document.path().display());
    debug!("ws"; "live socket on port {}", ctx.ws_port);
    debug!("serve"; "assets from {}", ctx.assets_dir.display());
    log!("serve"; "press Ctrl+C to stop");

    run_request_loop(&server, &pool, &ctx);

    lifecycle::wait_for_shutdown(vec![actors, acceptor, poller]);
    log!("serve"; "stopped");
    Ok(())
}

/// Accept requests until the server is unblocked.
///
/// The scope returns only after every spawned handler finished, so no
/// in-flight response is cut off by shutdown.
fn run_request_loop(server: &Server, pool: &rayon::ThreadPool, ctx: &Arc<ServeContext>) {
    pool.in_place_scope(|scope| {
        for request in server.incoming_requests() {
            let ctx = Arc::clone(ctx);
            scope.spawn(move |_| {
                if let Err(e) = handle_request(request, &ctx) {
                    log!("serve"; "request error: {e:#}");
                }
            });
        }
    });
}

/// Handle a single HTTP request
fn handle_request(request: Request, ctx: &ServeContext) -> Result<()> {
    // Early exit if shutdown requested
    if ctx.shutdown.is_requested() {
        return response::respond_unavailable(request);
    }

    if !matches!(request.method(), Method::Get | Method::Head) {
        return response::respond_method_not_allowed(request);
    }

    if path::is_viewer_url(request.url()) {
        debug!("serve"; "{} {}", request.method(), request.url());
        return response::respond_viewer(request, ctx);
    }

    if let Some(file) = path::resolve_path(request.url(), &ctx.assets_dir) {
        return response::respond_file(request, &file);
    }

    response::respond_not_found(request)
}
