//! Subtitle Gateway - translate subtitle files through the Gemini API
//!
//! Accepts SRT, WebVTT and ASS files, asks the model to translate only the
//! dialogue while keeping timestamps and markup intact, and hands the result
//! back as a downloadable file.

pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod generate;
pub mod prompt;
pub mod server;
pub mod subtitle;
