//! Development server with live reload.
//!
//! One listener, two request classes, no routing by path:
//! - websocket upgrade requests become push connections (`socket`)
//! - everything else gets the composed document (`document`)

mod document;
mod lifecycle;
mod socket;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::{ConnectInfo, State};
use axum::response::Response;

use crate::config::ServeConfig;
use crate::core::{set_serving, shutdown_signal};
use crate::log;
use crate::palette::Theme;
use crate::reload::Registry;

/// Shared by every request handler.
#[derive(Debug)]
pub struct ServeState {
    pub file: PathBuf,
    pub theme: Theme,
    pub registry: Arc<Registry>,
}

impl ServeState {
    pub fn new(config: &ServeConfig, registry: Arc<Registry>) -> Self {
        Self {
            file: config.file.clone(),
            theme: config.theme,
            registry,
        }
    }
}

pub fn router(state: Arc<ServeState>) -> Router {
    Router::new().fallback(handle).with_state(state)
}

async fn handle(
    State(state): State<Arc<ServeState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    match upgrade {
        Ok(upgrade) => {
            let registry = Arc::clone(&state.registry);
            upgrade.on_upgrade(move |ws| socket::run(ws, addr, registry))
        }
        Err(_) => document::respond(&state).await,
    }
}

/// Bind and serve until Ctrl+C.
pub async fn run(config: &ServeConfig, registry: Arc<Registry>) -> Result<()> {
    let (listener, addr) = lifecycle::bind_with_retry(&config.hostname, config.port).await?;
    log!("serve"; "listening at http://{}", addr);
    set_serving();

    let app = router(Arc::new(ServeState::new(config, registry)));
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::extract::connect_info::MockConnectInfo;
    use axum::http::{Request, StatusCode, header};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app(file: PathBuf) -> Router {
        let state = Arc::new(ServeState {
            file,
            theme: Theme::Slate,
            registry: Arc::new(Registry::new()),
        });
        router(state).layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))))
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, Option<String>, String) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    fn stylesheet(html: &str) -> &str {
        let start = html.find("<style>").unwrap() + "<style>".len();
        let end = html.find("</style>").unwrap();
        &html[start..end]
    }

    #[tokio::test]
    async fn test_document_has_style_and_script() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("index.html");
        std::fs::write(&file, r#"<html><head></head><body><div class="bg-primary p-4"></div></body></html>"#)
            .unwrap();

        let (status, content_type, body) = get(&app(file), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().starts_with("text/html"));
        assert_eq!(body.matches("<style>").count(), 1);
        assert_eq!(body.matches("<script>").count(), 1);
        assert!(body.find("</style><script>").unwrap() < body.find("</head>").unwrap());
        assert!(body.contains("new WebSocket(\"ws://\" + location.host)"));
        assert!(stylesheet(&body).contains(".bg-primary {"));
    }

    #[tokio::test]
    async fn test_same_file_same_stylesheet() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("index.html");
        std::fs::write(&file, r#"<div class="bg-primary p-4"></div>"#).unwrap();
        let app = app(file);

        let (_, _, first) = get(&app, "/").await;
        let (_, _, second) = get(&app, "/any/path").await;
        assert_eq!(stylesheet(&first), stylesheet(&second));
    }

    #[tokio::test]
    async fn test_edit_adds_rule() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("index.html");
        std::fs::write(&file, r#"<div class="bg-primary p-4"></div>"#).unwrap();
        let app = app(file.clone());

        let (_, _, before) = get(&app, "/").await;
        assert!(!stylesheet(&before).contains(".text-accent"));

        std::fs::write(&file, r#"<div class="bg-primary p-4 text-accent"></div>"#).unwrap();
        let (_, _, after) = get(&app, "/").await;
        assert!(stylesheet(&after).contains(".text-accent {"));
    }

    #[tokio::test]
    async fn test_missing_file_is_404_and_recovers() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("missing.html");
        let app = app(file.clone());

        let (status, content_type, body) = get(&app, "/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(content_type.unwrap().starts_with("text/plain"));
        assert_eq!(body, format!("File \"{}\" not found", file.display()));

        std::fs::write(&file, "<p>now here</p>").unwrap();
        let (status, _, body) = get(&app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<p>now here</p>"));
    }

    async fn wait_for(registry: &Registry, len: usize) {
        tokio::time::timeout(std::time::Duration::from_secs(5), async {
            while registry.len() != len {
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("registry never reached {len} connections"));
    }

    #[tokio::test]
    async fn test_socket_is_member_only_while_open() {
        use crate::reload::ChangeHandler;
        use futures_util::{SinkExt, StreamExt};
        use tokio_tungstenite::tungstenite::Message as Frame;

        let dir = TempDir::new().unwrap();
        let file = dir.path().join("index.html");
        std::fs::write(&file, "<p>x</p>").unwrap();
        let registry = Arc::new(Registry::new());
        let state = Arc::new(ServeState {
            file,
            theme: Theme::Slate,
            registry: Arc::clone(&registry),
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(
                listener,
                router(state).into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await;
        });

        let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/"))
            .await
            .unwrap();
        wait_for(&registry, 1).await;

        registry.on_change();
        let frame = ws.next().await.unwrap().unwrap();
        assert_eq!(frame.to_text().unwrap(), "reload");

        // Inbound frames do not close or echo.
        ws.send(Frame::text("hello")).await.unwrap();
        registry.on_change();
        let frame = ws.next().await.unwrap().unwrap();
        assert_eq!(frame.to_text().unwrap(), "reload");
        assert_eq!(registry.len(), 1);

        ws.close(None).await.unwrap();
        wait_for(&registry, 0).await;
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_plain_request_is_not_upgraded() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("index.html");
        std::fs::write(&file, "<p>x</p>").unwrap();
        let state = Arc::new(ServeState {
            file,
            theme: Theme::Zinc,
            registry: Arc::new(Registry::new()),
        });
        let app = router(Arc::clone(&state))
            .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40001))));

        let (status, _, _) = get(&app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(state.registry.is_empty());
    }
}
