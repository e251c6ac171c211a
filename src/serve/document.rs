//! Document requests: read, style, compose.

use std::path::PathBuf;

use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

use super::ServeState;
use crate::document::{ComposeError, compose};
use crate::embed::serve::RELOAD_JS;
use crate::style::{self, StyleError};
use crate::{debug, log};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read \"{}\"", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build stylesheet")]
    Style(#[from] StyleError),

    #[error("failed to compose document")]
    Compose(#[from] ComposeError),
}

/// Current file text with the stylesheet and reload script injected.
pub async fn render(state: &ServeState) -> Result<String, DocumentError> {
    let markup = tokio::fs::read_to_string(&state.file)
        .await
        .map_err(|source| DocumentError::Read {
            path: state.file.clone(),
            source,
        })?;
    let css = style::build(&markup, state.theme).await?;
    Ok(compose(&markup, &css, RELOAD_JS)?)
}

/// Serve the document, or a 404 naming the file when anything fails.
pub async fn respond(state: &ServeState) -> Response {
    match render(state).await {
        Ok(html) => {
            debug!("serve"; "served {} ({} bytes)", state.file.display(), html.len());
            Html(html).into_response()
        }
        Err(e) => {
            log!("error"; "{:#}", anyhow::Error::new(e));
            not_found(state)
        }
    }
}

fn not_found(state: &ServeState) -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        format!("File \"{}\" not found", state.file.display()),
    )
        .into_response()
}
