use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Invalid filename.")]
    InvalidFilename,

    #[error("Unsupported file type '{0}'. Only SRT, VTT or ASS files can be translated.")]
    UnsupportedFormat(String),

    #[error("Failed to read the uploaded file: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("The Gemini API key is invalid or the request was rejected.")]
    InvalidCredential,

    #[error("Gemini API returned an error: {body}")]
    Upstream { status: u16, body: String },

    #[error("Unexpected response format from the Gemini API.")]
    MalformedUpstreamResponse,

    #[error("Missing required form field: {0}")]
    MissingField(&'static str),

    #[error("Invalid multipart request: {0}")]
    InvalidMultipart(String),

    #[error("Uploaded file is too large: {0}")]
    PayloadTooLarge(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("An unknown error occurred: {0}")]
    Unknown(String),
}

impl GatewayError {
    /// HTTP status reported to the caller for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidFilename
            | Self::UnsupportedFormat(_)
            | Self::InvalidCredential
            | Self::InvalidMultipart(_) => StatusCode::BAD_REQUEST,
            Self::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            // Only reachable for codes outside 100..=999
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Decode(_)
            | Self::MalformedUpstreamResponse
            | Self::Config(_)
            | Self::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
