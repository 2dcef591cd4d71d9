use std::fmt;

use crate::error::{GatewayError, Result};

/// Subtitle formats the gateway knows how to prompt for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    Srt,
    Vtt,
    Ass,
}

impl SubtitleFormat {
    /// Resolve a format from a bare, case-insensitive extension
    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension.to_lowercase().as_str() {
            "srt" => Ok(Self::Srt),
            "vtt" => Ok(Self::Vtt),
            "ass" => Ok(Self::Ass),
            other => Err(GatewayError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Resolve a format from the text after the last `.` of a filename
    pub fn from_filename(filename: &str) -> Result<Self> {
        let (_, extension) = filename
            .rsplit_once('.')
            .ok_or(GatewayError::InvalidFilename)?;
        Self::from_extension(extension)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Vtt => "vtt",
            Self::Ass => "ass",
        }
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A subtitle file received from a caller, validated but not yet decoded
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub format: SubtitleFormat,
    pub raw_bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, raw_bytes: Vec<u8>) -> Result<Self> {
        let name = name.into();
        let format = SubtitleFormat::from_filename(&name)?;
        Ok(Self { name, format, raw_bytes })
    }

    /// Decode the body as UTF-8 text
    pub fn decode(self) -> Result<String> {
        Ok(String::from_utf8(self.raw_bytes)?)
    }

    /// Name of the translated file: `movie.srt` becomes `movie_translated.srt`
    pub fn translated_name(&self) -> String {
        translated_filename(&self.name, self.format)
    }
}

/// Strip the final extension from `filename` and append `_translated.<ext>`
pub fn translated_filename(filename: &str, format: SubtitleFormat) -> String {
    let stem = filename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(filename);
    format!("{}_translated.{}", stem, format.extension())
}

/// Value for a `Content-Disposition` header offering `filename` as a download
pub fn attachment_disposition(filename: &str) -> String {
    format!("attachment; filename*=UTF-8''{}", urlencoding::encode(filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_without_dot_is_invalid() {
        for name in ["movie", "", "subtitles_srt"] {
            assert!(matches!(
                SubtitleFormat::from_filename(name),
                Err(GatewayError::InvalidFilename)
            ));
        }
    }

    #[test]
    fn test_unsupported_extension() {
        for name in ["notes.txt", "movie.srt.bak", "archive.", "clip.SUB"] {
            assert!(matches!(
                SubtitleFormat::from_filename(name),
                Err(GatewayError::UnsupportedFormat(_))
            ));
        }
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert_eq!(SubtitleFormat::from_filename("Movie.SRT").unwrap(), SubtitleFormat::Srt);
        assert_eq!(SubtitleFormat::from_filename("talk.Vtt").unwrap(), SubtitleFormat::Vtt);
        assert_eq!(SubtitleFormat::from_filename("anime.ASS").unwrap(), SubtitleFormat::Ass);
    }

    #[test]
    fn test_translated_filename() {
        assert_eq!(translated_filename("movie.srt", SubtitleFormat::Srt), "movie_translated.srt");
        assert_eq!(translated_filename("a.b.vtt", SubtitleFormat::Vtt), "a.b_translated.vtt");
        assert_eq!(translated_filename("Show.ASS", SubtitleFormat::Ass), "Show_translated.ass");
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        let file = UploadedFile::new("bad.srt", vec![0xc3, 0x28]).unwrap();
        assert!(matches!(file.decode(), Err(GatewayError::Decode(_))));
    }

    #[test]
    fn test_attachment_disposition_encodes_name() {
        assert_eq!(
            attachment_disposition("movie_translated.srt"),
            "attachment; filename*=UTF-8''movie_translated.srt"
        );
        assert_eq!(
            attachment_disposition("film é.srt"),
            "attachment; filename*=UTF-8''film%20%C3%A9.srt"
        );
    }
}
