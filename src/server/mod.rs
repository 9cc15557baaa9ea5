//! Development server with live reload

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::{InvalidPagePolicy, SiteConfig};
use crate::helpers::url_for;
use crate::listing::parse_page_token;
use crate::Blog;

/// Live reload script injected into HTML pages
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
    ws.onclose = function() {
        console.log('Live reload disconnected. Attempting to reconnect...');
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
</body>
"#;

/// Server state
struct ServerState {
    public_dir: PathBuf,
    /// Replaced after every rebuild so config edits reach the resolver
    config: RwLock<SiteConfig>,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
}

impl ServerState {
    fn config(&self) -> SiteConfig {
        match self.config.read() {
            Ok(config) => config.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set_config(&self, config: SiteConfig) {
        match self.config.write() {
            Ok(mut guard) => *guard = config,
            Err(poisoned) => *poisoned.into_inner() = config,
        }
    }
}

/// How to answer a listing page route that has no generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingPage {
    Redirect(String),
    NotFound,
}

/// Resolve `/<blog_dir>/<locale>/<pagination_dir>/<token>/` when nothing was
/// generated for it. Returns `None` for paths that are not listing pages.
pub fn resolve_missing_page(config: &SiteConfig, path: &str) -> Option<MissingPage> {
    let root = config.root.trim_matches('/');
    let path = path.trim_matches('/');
    let path = if root.is_empty() {
        path
    } else {
        path.strip_prefix(root)?.trim_start_matches('/')
    };

    let blog_dir = config.blog_dir.trim_matches('/');
    let rest = path.strip_prefix(blog_dir)?.strip_prefix('/')?;

    let segments: Vec<&str> = rest.split('/').collect();
    let [code, dir, token] = segments.as_slice() else {
        return None;
    };
    if *dir != config.pagination_dir || config.locale(code).is_none() {
        return None;
    }

    let bare = url_for(config, &config.locale_prefix(code));
    let resolved = match parse_page_token(token) {
        Ok(page) if page.get() == 1 => MissingPage::Redirect(bare),
        Ok(page) => {
            tracing::debug!("Page {} of locale {} was not generated", page, code);
            MissingPage::NotFound
        }
        Err(e) => {
            tracing::debug!("{}", e);
            match config.invalid_page {
                InvalidPagePolicy::NotFound => MissingPage::NotFound,
                InvalidPagePolicy::FirstPage => MissingPage::Redirect(bare),
            }
        }
    };

    Some(resolved)
}

/// Start the development server
pub async fn start(blog: &Blog, ip: &str, port: u16, watch: bool, open: bool) -> Result<()> {
    // Create broadcast channel for live reload notifications
    let (reload_tx, _) = broadcast::channel::<()>(16);

    let state = Arc::new(ServerState {
        public_dir: blog.public_dir.clone(),
        config: RwLock::new(blog.config.clone()),
        reload_tx,
        live_reload: watch,
    });

    let app = Router::new()
        .route("/__livereload", get(livereload_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}{}", ip, port, url_for(&blog.config, "/"));
    println!("Server running at {}", url);
    if watch {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    if watch {
        let blog = blog.clone();
        let state = state.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_and_reload(blog, state) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Watch content, static assets and config; regenerate and notify clients
fn watch_and_reload(blog: Blog, state: Arc<ServerState>) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    // Create debouncer to avoid multiple rapid rebuilds
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    let config_path = blog.base_dir.join("_config.yml");
    for (path, mode) in [
        (blog.content_dir(), RecursiveMode::Recursive),
        (blog.static_dir.clone(), RecursiveMode::Recursive),
        (config_path, RecursiveMode::NonRecursive),
    ] {
        if path.exists() {
            debouncer.watcher().watch(&path, mode)?;
            tracing::debug!("Watching: {:?}", path);
        }
    }

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                // Editor swap files and VCS noise
                let relevant_events: Vec<_> = events
                    .iter()
                    .filter(|e| {
                        let path_str = e.path.to_string_lossy();
                        !path_str.contains(".git")
                            && !path_str.contains(".DS_Store")
                            && !path_str.ends_with('~')
                            && !path_str.ends_with(".swp")
                    })
                    .collect();

                if relevant_events.is_empty() {
                    continue;
                }

                for event in &relevant_events {
                    tracing::info!("File changed: {}", event.path.display());
                }

                tracing::info!("Regenerating...");
                let rebuilt = crate::commands::generate::reload(&blog).and_then(|blog| {
                    crate::commands::generate::run(&blog)?;
                    Ok(blog)
                });
                match rebuilt {
                    Ok(blog) => {
                        state.set_config(blog.config);
                        tracing::info!("Regenerated successfully");
                        let _ = state.reload_tx.send(());
                    }
                    Err(e) => {
                        tracing::error!("Generation failed: {}", e);
                    }
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

/// Handle WebSocket connection for live reload
async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Fallback handler that serves files and injects live reload script
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let config = state.config();
    let path = request.uri().path().to_string();

    let Some(clean_path) = site_relative_path(&config, &path) else {
        tracing::warn!("Rejected request path {:?}", path);
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    };

    let candidate = state.public_dir.join(&clean_path);
    let file_path = if candidate.is_dir() {
        candidate.join("index.html")
    } else {
        candidate
    };

    if !file_path.exists() {
        return match resolve_missing_page(&config, &path) {
            Some(MissingPage::Redirect(to)) => Redirect::temporary(&to).into_response(),
            _ => (StatusCode::NOT_FOUND, "Not found").into_response(),
        };
    }

    let is_html = file_path
        .extension()
        .map(|ext| ext == "html" || ext == "htm")
        .unwrap_or(false);

    if is_html && state.live_reload {
        match tokio::fs::read_to_string(&file_path).await {
            Ok(content) => Html(inject_live_reload(&content)).into_response(),
            Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        }
    } else {
        let mut service = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);
        let (mut parts, body) = request.into_parts();
        if let Ok(uri) = format!("/{}", clean_path).parse() {
            parts.uri = uri;
        }
        match service.try_call(Request::from_parts(parts, body)).await {
            Ok(response) => response.into_response(),
            Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
        }
    }
}

/// Request path relative to the public directory, without the root prefix.
/// `None` when the path would leave the public directory.
fn site_relative_path(config: &SiteConfig, path: &str) -> Option<String> {
    let root = config.root.trim_matches('/');
    let clean_path = path.trim_start_matches('/');
    let clean_path = if root.is_empty() {
        clean_path
    } else {
        clean_path
            .strip_prefix(root)
            .map(|p| p.trim_start_matches('/'))
            .unwrap_or(clean_path)
    };

    let escapes = Path::new(clean_path)
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return None;
    }
    Some(clean_path.to_string())
}

/// Inject live reload script into HTML content
fn inject_live_reload(html: &str) -> String {
    if html.contains("</body>") {
        html.replace("</body>", LIVE_RELOAD_SCRIPT)
    } else {
        format!("{}{}", html, LIVE_RELOAD_SCRIPT)
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
