//!
//! Portal shell server
//! -------------------
//! Axum HTTP surface hosting the route guard. The entry route is public; the
//! dashboard shell and everything under it sit behind the credential-cookie
//! guard. Feature content itself lives elsewhere; the shell only reports what
//! section was reached so navigation and guarding can be exercised end to end.

use std::net::SocketAddr;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::guard;

#[derive(Debug, Deserialize)]
struct EntryParams {
    from: Option<String>,
}

/// Public entry point. When a guard redirect carried the originally requested
/// path, echo a contextual sign-in message for it.
async fn entry(Query(params): Query<EntryParams>) -> impl IntoResponse {
    let body = match params.from {
        Some(from) => json!({
            "status": "ok",
            "portal": "doj",
            "message": format!("sign in to continue to {}", from),
            "from": from,
        }),
        None => json!({"status": "ok", "portal": "doj"}),
    };
    (StatusCode::OK, Json(body))
}

async fn dashboard_home() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok", "section": "dashboard"})))
}

async fn dashboard_section(Path(section): Path<String>) -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok", "section": section})))
}

/// Full route surface: entry plus the guarded dashboard shell.
pub fn router() -> Router {
    let protected = Router::new()
        .route(guard::PROTECTED_PREFIX, get(dashboard_home))
        .route(&format!("{}/{{*section}}", guard::PROTECTED_PREFIX), get(dashboard_section))
        .route_layer(middleware::from_fn(guard::require_portal_cookie));

    Router::new().route(guard::ENTRY_PATH, get(entry)).merge(protected)
}

pub async fn run_with_ports(http_port: u16) -> anyhow::Result<()> {
    let app = router();
    let addr: SocketAddr = format!("0.0.0.0:{}", http_port).parse()?;
    info!("Starting portal shell on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Convenience entry point using the default HTTP port.
pub async fn run() -> anyhow::Result<()> {
    run_with_ports(7070).await
}
