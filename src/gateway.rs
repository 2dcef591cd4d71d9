use std::fmt;
use std::sync::Arc;

use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::config::Config;
use crate::error::Result;
use crate::generate::{GeminiClient, TextGenerator};
use crate::prompt::build_prompt;
use crate::subtitle::{SubtitleFormat, UploadedFile};

/// One translation job: a caller's credential and their file
pub struct TranslationRequest {
    pub api_key: String,
    pub file: UploadedFile,
}

impl fmt::Debug for TranslationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationRequest")
            .field("api_key", &"<redacted>")
            .field("file", &self.file.name)
            .finish()
    }
}

/// Translated subtitles ready to hand back to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedFile {
    pub filename: String,
    pub format: SubtitleFormat,
    pub text: String,
}

/// Validates, prompts, calls the generator, and names the result
#[derive(Clone)]
pub struct Gateway {
    generator: Arc<dyn TextGenerator>,
    target_language: String,
}

impl Gateway {
    pub fn new(generator: Arc<dyn TextGenerator>, target_language: impl Into<String>) -> Self {
        Self {
            generator,
            target_language: target_language.into(),
        }
    }

    /// Gateway backed by the Gemini API as described by `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = GeminiClient::new(&config.generation)?;
        Ok(Self::new(Arc::new(client), config.generation.target_language.clone()))
    }

    pub async fn handle(&self, request: TranslationRequest) -> Result<TranslatedFile> {
        let span = info_span!(
            "translate",
            request_id = %Uuid::new_v4(),
            file = %request.file.name,
            format = %request.file.format,
        );

        async move {
            let TranslationRequest { api_key, file } = request;
            let filename = file.translated_name();
            let format = file.format;

            let content = file.decode()?;
            info!("Translating {} bytes of {} subtitles", content.len(), format);

            let prompt = build_prompt(format, &content, &self.target_language);
            let result = self.generator.generate(&api_key, &prompt).await?;

            info!("Translation complete: {}", filename);
            Ok(TranslatedFile {
                filename,
                format,
                text: result.translated_text,
            })
        }
        .instrument(span)
        .await
    }
}
