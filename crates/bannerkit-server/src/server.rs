//! Editor server implementation.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        DefaultBodyLimit, State,
    },
    http::header,
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;

use bannerkit_core::{BannerConfig, BannerFields, EmbedOptions, PLACEHOLDER_PATH, PLACEHOLDER_SVG};

use crate::api::{self, Session, SharedState};
use crate::assets::AssetPipeline;
use crate::live::LiveMessage;
use crate::watcher::{ConfigWatcher, WatchEvent};

/// Configuration for the editor server.
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,

    /// Largest accepted image upload, in bytes
    pub max_upload_bytes: usize,

    /// Banner the session starts with
    pub banner: BannerConfig,

    /// Embed code options
    pub embed: EmbedOptions,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            port: 7777,
            host: "127.0.0.1".to_string(),
            open: true,
            max_upload_bytes: 10 * 1024 * 1024,
            banner: BannerConfig::default(),
            embed: EmbedOptions::default(),
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address {0}: {1}")]
    InvalidAddress(String, String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),
}

/// A file the banner fields can be re-read from.
pub trait BannerSource: Send + Sync + 'static {
    /// File to watch
    fn path(&self) -> &Path;

    /// Read the banner fields from the file.
    fn load(&self) -> Result<BannerFields, String>;
}

/// Editor server.
pub struct EditorServer {
    config: EditorConfig,
    source: Option<Arc<dyn BannerSource>>,
}

impl EditorServer {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            source: None,
        }
    }

    /// Reload banner fields whenever `source` changes on disk.
    pub fn watch(mut self, source: impl BannerSource) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Start the editor server.
    pub async fn start(self) -> Result<(), ServerError> {
        let host_port = format!("{}:{}", self.config.host, self.config.port);
        let addr: SocketAddr = host_port
            .parse()
            .map_err(|e: std::net::AddrParseError| {
                ServerError::InvalidAddress(host_port.clone(), e.to_string())
            })?;

        let state = Session::new(self.config.banner.clone(), self.config.embed).shared();

        if let Some(source) = self.source {
            spawn_reloader(source, SharedState::clone(&state))?;
        }

        let app = router(state).layer(DefaultBodyLimit::max(self.config.max_upload_bytes));

        tracing::info!("Starting banner editor at http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        if self.config.open {
            let url = format!("http://{}", addr);
            if let Err(e) = open::that(&url) {
                tracing::warn!("Could not open browser: {}", e);
            }
        }

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

/// Build the editor router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(api::index_handler))
        .route("/api/banner", get(api::get_banner))
        .route("/api/banner/embed", get(api::get_embed))
        .route("/api/banner/title", put(api::set_title))
        .route("/api/banner/subtitle", put(api::set_subtitle))
        .route("/api/banner/image-url", put(api::set_image_url))
        .route("/api/banner/image", post(api::upload_image))
        .route("/api/banner/code-panel", post(api::toggle_code_panel))
        .route(PLACEHOLDER_PATH, get(placeholder_handler))
        .route("/assets/editor.css", get(css_handler))
        .route("/assets/editor.js", get(js_handler))
        .route("/__live", get(ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Re-read the banner whenever the config file changes.
fn spawn_reloader(source: Arc<dyn BannerSource>, state: SharedState) -> Result<(), ServerError> {
    let (watcher, mut rx) =
        ConfigWatcher::new(source.path()).map_err(|e| ServerError::WatchError(e.to_string()))?;

    tracing::info!("Watching {} for changes", source.path().display());

    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                WatchEvent::Changed(path) => match source.load() {
                    Ok(fields) => {
                        tracing::info!("Config modified: {}", path.display());
                        let mut session = state.write().await;
                        match session.reload(fields) {
                            Ok(_) => session.live.send(LiveMessage::Notice {
                                title: "Баннер обновлён".to_string(),
                                description: path.display().to_string(),
                            }),
                            Err(e) => tracing::warn!("Failed to render reloaded banner: {}", e),
                        }
                    }
                    Err(e) => tracing::warn!("Ignoring invalid config: {}", e),
                },
                WatchEvent::Removed(path) => {
                    tracing::warn!("Config removed: {}; keeping current banner", path.display());
                }
            }
        }
        // Keep watcher alive
        drop(watcher);
    });

    Ok(())
}

async fn placeholder_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/svg+xml")], PLACEHOLDER_SVG)
}

async fn css_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], AssetPipeline::editor_css())
}

async fn js_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        AssetPipeline::editor_js(),
    )
}

/// Handler for the live update WebSocket endpoint.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<SharedState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Forward live messages to one page, starting with the current state.
async fn handle_ws(mut socket: WebSocket, state: SharedState) {
    let (mut rx, initial) = {
        let session = state.read().await;
        (session.live.subscribe(), session.snapshot())
    };

    let initial = match initial {
        Ok(snapshot) => vec![LiveMessage::Connected, LiveMessage::Snapshot(snapshot)],
        Err(e) => {
            tracing::warn!("Failed to render initial snapshot: {}", e);
            vec![LiveMessage::Connected]
        }
    };

    for msg in initial {
        if !send_message(&mut socket, &msg).await {
            return;
        }
    }

    loop {
        match rx.recv().await {
            Ok(msg) => {
                if !send_message(&mut socket, &msg).await {
                    break;
                }
            }
            Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::debug!("Live client lagged by {} messages", skipped);
            }
            Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
        }
    }
}

async fn send_message(socket: &mut WebSocket, msg: &LiveMessage) -> bool {
    let json = match serde_json::to_string(msg) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!("Failed to serialize live message: {}", e);
            return true;
        }
    };
    socket.send(Message::Text(json.into())).await.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use bannerkit_core::ImageFile;
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    fn app() -> (Router, SharedState) {
        let state = Session::default().shared();
        (router(SharedState::clone(&state)), state)
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn json_put(uri: &str, value: &str) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::json!({ "value": value }).to_string()))
            .unwrap()
    }

    fn multipart(file_name: &str, content_type: &str, bytes: &[u8]) -> Request<Body> {
        let boundary = "XBOUNDARYX";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/banner/image")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[test]
    fn creates_server_with_default_config() {
        let server = EditorServer::new(EditorConfig::default());
        assert_eq!(server.config.port, 7777);
        assert!(server.source.is_none());
    }

    #[tokio::test]
    async fn serves_editor_page() {
        let (app, _) = app();

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Конструктор баннеров"));
        assert!(html.contains("Займы онлайн на карту"));
    }

    #[tokio::test]
    async fn toggling_panel_then_generating_contains_defaults() {
        let (app, _) = app();

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/banner/code-panel")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::get("/api/banner/embed").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let code = body_text(response).await;

        assert!(code.contains("Займы онлайн на карту"));
        assert!(code.contains("Первый заём бесплатно*"));
    }

    #[tokio::test]
    async fn title_update_truncates_embed_only() {
        let (app, state) = app();

        let response = app
            .oneshot(json_put("/api/banner/title", "Line1\nLine2"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let snapshot: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        let code = snapshot["embed_code"].as_str().unwrap();
        assert!(code.contains("Line1"));
        assert!(!code.contains("Line2"));
        assert_eq!(state.read().await.banner.title, "Line1\nLine2");
    }

    #[tokio::test]
    async fn mutations_are_broadcast() {
        let (app, state) = app();
        let mut rx = state.read().await.live.subscribe();

        app.oneshot(json_put("/api/banner/subtitle", "Новый текст"))
            .await
            .unwrap();

        match rx.try_recv() {
            Ok(LiveMessage::Snapshot(snapshot)) => assert_eq!(snapshot.subtitle, "Новый текст"),
            other => panic!("Expected snapshot, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn upload_assigns_data_uri() {
        let (app, state) = app();

        let response = app
            .oneshot(multipart("hero.png", "image/png", b"\x89PNG\r\n\x1a\nIHDR"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let image = state.read().await.banner.image_source.clone();
        assert!(image.starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn overlapping_uploads_apply_once_each_and_last_wins() {
        let (app, state) = app();
        let mut rx = state.read().await.live.subscribe();
        let png = b"\x89PNG\r\n\x1a\nfirst-upload".to_vec();
        let gif = b"GIF89a-second-upload".to_vec();
        let png_uri = ImageFile::new(png.clone()).decode().unwrap().into_string();
        let gif_uri = ImageFile::new(gif.clone()).decode().unwrap().into_string();

        let (first, second) = tokio::join!(
            app.clone().oneshot(multipart("a.png", "image/png", &png)),
            app.oneshot(multipart("b.gif", "image/gif", &gif)),
        );

        assert_eq!(first.unwrap().status(), StatusCode::OK);
        assert_eq!(second.unwrap().status(), StatusCode::OK);

        let mut published = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            match msg {
                LiveMessage::Snapshot(snapshot) => published.push(snapshot.image_source),
                other => panic!("Unexpected message {:?}", other),
            }
        }

        assert_eq!(published.len(), 2);
        assert!(published.contains(&png_uri));
        assert!(published.contains(&gif_uri));

        let final_image = state.read().await.banner.image_source.clone();
        assert!(final_image == png_uri || final_image == gif_uri);
        assert_eq!(&final_image, published.last().unwrap());
    }

    #[tokio::test]
    async fn empty_upload_is_a_no_op() {
        let (app, state) = app();

        let response = app
            .oneshot(multipart("", "application/octet-stream", b""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            state.read().await.banner.image_source,
            bannerkit_core::DEFAULT_IMAGE_URL
        );
    }

    #[tokio::test]
    async fn non_image_upload_is_rejected() {
        let (app, state) = app();

        let response = app
            .oneshot(multipart("notes.txt", "text/plain", b"hello"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(
            state.read().await.banner.image_source,
            bannerkit_core::DEFAULT_IMAGE_URL
        );
    }

    #[tokio::test]
    async fn image_url_is_not_validated() {
        let (app, _) = app();

        let response = app
            .oneshot(json_put("/api/banner/image-url", "https://unreachable.invalid/x.png"))
            .await
            .unwrap();

        let snapshot: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert!(snapshot["embed_code"]
            .as_str()
            .unwrap()
            .contains("src=\"https://unreachable.invalid/x.png\""));
    }

    #[tokio::test]
    async fn serves_placeholder() {
        let (app, _) = app();

        let response = app
            .oneshot(Request::get("/placeholder.svg").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "image/svg+xml");
    }
}
