//! HTTP surface of the gateway.
//!
//! `POST /translate` takes a multipart form with `api_key` and `file` fields
//! and answers with the translated subtitles as an attachment. `GET /` is a
//! liveness probe.

use std::net::SocketAddr;

use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::{Config, ServerConfig};
use crate::error::{GatewayError, Result};
use crate::gateway::{Gateway, TranslatedFile, TranslationRequest};
use crate::subtitle::{attachment_disposition, UploadedFile};

/// Build the application router around an existing gateway
pub fn router(gateway: Gateway, config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(status))
        .route(
            "/translate",
            post(translate).layer(DefaultBodyLimit::max(config.max_upload_bytes)),
        )
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(gateway)
}

/// CORS restricted to `origins`, with credentials and any method or header
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// Bind to the configured address and serve until the process stops
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let gateway = Gateway::from_config(&config)?;
    let app = router(gateway, &config.server);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| GatewayError::Config(format!("Invalid listen address: {}", e)))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Subtitle gateway listening on http://{}", listener.local_addr()?);
    info!("Forwarding translations to {}", config.generation.generate_url());

    axum::serve(listener, app).await?;
    Ok(())
}

async fn status() -> Json<Value> {
    Json(json!({ "status": "Subtitle translator backend is running!" }))
}

async fn translate(
    State(gateway): State<Gateway>,
    multipart: Multipart,
) -> Result<TranslatedFile> {
    let request = read_translation_form(multipart).await?;
    gateway.handle(request).await
}

/// Collect the `api_key` and `file` fields of a translation form
async fn read_translation_form(mut multipart: Multipart) -> Result<TranslationRequest> {
    let mut api_key = None;
    let mut upload = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("api_key") => {
                api_key = Some(field.text().await.map_err(multipart_error)?);
            }
            Some("file") => {
                let filename = field.file_name().map(str::to_owned);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                upload = Some((filename, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let api_key = api_key
        .filter(|key| !key.is_empty())
        .ok_or(GatewayError::MissingField("api_key"))?;
    let (filename, bytes) = upload.ok_or(GatewayError::MissingField("file"))?;
    let filename = filename.ok_or(GatewayError::InvalidFilename)?;

    Ok(TranslationRequest {
        api_key,
        file: UploadedFile::new(filename, bytes)?,
    })
}

/// Keep the body limit distinct from other malformed-form failures
fn multipart_error(e: MultipartError) -> GatewayError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        GatewayError::PayloadTooLarge(e.body_text())
    } else {
        GatewayError::InvalidMultipart(e.body_text())
    }
}

impl IntoResponse for TranslatedFile {
    fn into_response(self) -> Response {
        let disposition = attachment_disposition(&self.filename);
        match HeaderValue::from_str(&disposition) {
            Ok(disposition) => (
                [
                    (header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8")),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                self.text,
            )
                .into_response(),
            Err(e) => GatewayError::Unknown(e.to_string()).into_response(),
        }
    }
}
