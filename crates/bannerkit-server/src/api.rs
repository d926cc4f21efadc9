//! Editor session state and HTTP handlers.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use bannerkit_core::{
    generate_embed_code_with, render_preview, BannerConfig, BannerFields, EmbedOptions,
    ImageError, ImageFile,
};

use crate::live::{LiveHub, LiveMessage};
use crate::templates::PageTemplates;

/// State shared by all handlers.
pub type SharedState = Arc<RwLock<Session>>;

/// One editing session: the banner plus everything needed to re-render it.
pub struct Session {
    pub banner: BannerConfig,
    pub embed: EmbedOptions,
    pub live: LiveHub,
    templates: PageTemplates,
}

impl Session {
    pub fn new(banner: BannerConfig, embed: EmbedOptions) -> Self {
        Self {
            banner,
            embed,
            live: LiveHub::new(),
            templates: PageTemplates::new(),
        }
    }

    pub fn shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }

    /// Current embed code.
    pub fn embed_code(&self) -> String {
        generate_embed_code_with(&self.banner, self.embed)
    }

    /// Render the current state.
    pub fn snapshot(&self) -> Result<Snapshot, ApiError> {
        let preview_html = self.templates.render_preview(&render_preview(&self.banner))?;

        Ok(Snapshot {
            title: self.banner.title.clone(),
            subtitle: self.banner.subtitle.clone(),
            image_source: self.banner.image_source.clone(),
            code_panel_open: self.banner.code_panel_open,
            embed_code: self.embed_code(),
            preview_html,
        })
    }

    /// Render the current state and push it to every connected page.
    pub fn publish(&self) -> Result<Snapshot, ApiError> {
        let snapshot = self.snapshot()?;
        self.live.send(LiveMessage::Snapshot(snapshot.clone()));
        Ok(snapshot)
    }

    /// Apply fields re-read from a config file.
    pub fn reload(&mut self, fields: BannerFields) -> Result<Snapshot, ApiError> {
        self.banner.merge(fields);
        self.publish()
    }

    /// Render the full editor page.
    pub fn render_page(&self) -> Result<String, ApiError> {
        let preview = self.templates.render_preview(&render_preview(&self.banner))?;
        let page = self
            .templates
            .render_editor(&self.banner, &preview, &self.embed_code())?;
        Ok(page)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(BannerConfig::default(), EmbedOptions::default())
    }
}

/// Everything a page needs to redraw after a change.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub title: String,
    pub subtitle: String,
    pub image_source: String,
    pub code_panel_open: bool,
    pub embed_code: String,
    pub preview_html: String,
}

/// Body of the text field endpoints.
#[derive(Debug, Deserialize)]
pub struct FieldValue {
    pub value: String,
}

/// Errors returned by the API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Image(#[from] ImageError),

    #[error("Invalid upload: {0}")]
    Upload(String),

    #[error("Failed to render template: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Image decoding was interrupted: {0}")]
    Worker(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Image(ImageError::UnsupportedMediaType(_)) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            ApiError::Image(_) | ApiError::Upload(_) => StatusCode::BAD_REQUEST,
            ApiError::Template(_) | ApiError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}", self);
        }

        (status, self.to_string()).into_response()
    }
}

/// Handler for the editor page.
pub async fn index_handler(State(state): State<SharedState>) -> Result<Html<String>, ApiError> {
    let session = state.read().await;
    Ok(Html(session.render_page()?))
}

/// Handler returning the current snapshot.
pub async fn get_banner(State(state): State<SharedState>) -> Result<Json<Snapshot>, ApiError> {
    let session = state.read().await;
    Ok(Json(session.snapshot()?))
}

/// Handler returning only the embed code.
pub async fn get_embed(State(state): State<SharedState>) -> impl IntoResponse {
    let session = state.read().await;
    (
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        session.embed_code(),
    )
}

pub async fn set_title(
    State(state): State<SharedState>,
    Json(body): Json<FieldValue>,
) -> Result<Json<Snapshot>, ApiError> {
    let mut session = state.write().await;
    session.banner.set_title(body.value);
    Ok(Json(session.publish()?))
}

pub async fn set_subtitle(
    State(state): State<SharedState>,
    Json(body): Json<FieldValue>,
) -> Result<Json<Snapshot>, ApiError> {
    let mut session = state.write().await;
    session.banner.set_subtitle(body.value);
    Ok(Json(session.publish()?))
}

pub async fn set_image_url(
    State(state): State<SharedState>,
    Json(body): Json<FieldValue>,
) -> Result<Json<Snapshot>, ApiError> {
    let mut session = state.write().await;
    session.banner.set_image_from_url(body.value);
    Ok(Json(session.publish()?))
}

pub async fn toggle_code_panel(
    State(state): State<SharedState>,
) -> Result<Json<Snapshot>, ApiError> {
    let mut session = state.write().await;
    session.banner.toggle_code_panel();
    tracing::debug!("Code panel open: {}", session.banner.code_panel_open);
    Ok(Json(session.publish()?))
}

/// Handler for image uploads.
///
/// The file is decoded on a blocking worker without holding the session lock;
/// the result is assigned in one step once decoding completes. Concurrent
/// uploads race and the last one to finish wins.
pub async fn upload_image(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let Some(file) = read_upload(&mut multipart).await? else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    tracing::info!(
        "Decoding uploaded image {} ({} bytes)",
        file.file_name.as_deref().unwrap_or("<unnamed>"),
        file.bytes.len()
    );

    let uri = tokio::task::spawn_blocking(move || file.decode())
        .await
        .map_err(|e| ApiError::Worker(e.to_string()))??;

    let mut session = state.write().await;
    session.banner.apply_image(uri);
    Ok(Json(session.publish()?).into_response())
}

/// Pull the `file` field out of a multipart body. An empty part with no file
/// name means nothing was chosen.
async fn read_upload(multipart: &mut Multipart) -> Result<Option<ImageFile>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Upload(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(|name| name.to_string());
        let media_type = field.content_type().map(|ct| ct.to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::Upload(e.to_string()))?;

        if bytes.is_empty() && file_name.is_none() {
            return Ok(None);
        }

        return Ok(Some(ImageFile {
            bytes: bytes.to_vec(),
            file_name,
            media_type,
        }));
    }

    Ok(None)
}
