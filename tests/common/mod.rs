#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};

use subtitle_gateway::error::Result;
use subtitle_gateway::generate::{GenerationResult, TextGenerator};
use subtitle_gateway::prompt::PromptPayload;

pub const BOUNDARY: &str = "X-SUBTITLE-GATEWAY-BOUNDARY";

/// Generator that answers with the subtitle body embedded in the prompt,
/// upper-cased, so each response can be traced back to its request.
pub struct ShoutingGenerator;

#[async_trait]
impl TextGenerator for ShoutingGenerator {
    async fn generate(&self, _api_key: &str, prompt: &PromptPayload) -> Result<GenerationResult> {
        let content = prompt
            .instruction_text
            .rsplit("---\n")
            .next()
            .unwrap_or_default();
        tokio::task::yield_now().await;
        Ok(GenerationResult { translated_text: content.to_uppercase() })
    }
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, Option<&'a str>, &'a [u8]),
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, filename, bytes) => {
                let disposition = match filename {
                    Some(filename) => format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        name, filename
                    ),
                    None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", name),
                };
                body.extend_from_slice(disposition.as_bytes());
                body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn translate_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/translate")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

pub fn upload<'a>(api_key: &'a str, filename: &'a str, bytes: &'a [u8]) -> Vec<Part<'a>> {
    vec![
        Part::Text("api_key", api_key),
        Part::File("file", Some(filename), bytes),
    ]
}
