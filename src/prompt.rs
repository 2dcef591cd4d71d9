//! Translation instructions sent to the generation model.
//!
//! Each subtitle format gets its own template spelling out which parts of the
//! file are structure and must come back untouched. The model is only asked to
//! follow these rules; nothing checks the reply against them.

use crate::subtitle::SubtitleFormat;

/// Instruction text for one generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPayload {
    pub instruction_text: String,
}

/// Build the translation instruction for `content` in the given format
pub fn build_prompt(format: SubtitleFormat, content: &str, target_language: &str) -> PromptPayload {
    let instruction_text = match format {
        SubtitleFormat::Srt => format!(
            r#"Translate the following SRT subtitle text to {target_language}.
**CRITICAL RULES:**
1. **DO NOT** change the timestamps.
2. **DO NOT** change the sequence numbers.
3. **PRESERVE** all original line breaks exactly as they are.
4. Only translate the dialogue text.
---
Here is the SRT content to translate:
---
{content}"#
        ),
        SubtitleFormat::Ass => format!(
            r#"Translate the dialogue in the following ASS subtitle text to {target_language}.
**CRITICAL RULES:**
1. **DO NOT** change anything except the dialogue text after the final comma in "Dialogue:" lines.
2. **PRESERVE** all formatting tags like {{\i1}}, {{\b1}}, etc.
3. Keep all other lines ([Script Info], [V4+ Styles], etc.) exactly the same.
---
Here is the ASS content to translate:
---
{content}"#
        ),
        SubtitleFormat::Vtt => format!(
            r#"Translate the following WebVTT subtitle text to {target_language}.
**CRITICAL RULES:**
1. **DO NOT** change the "WEBVTT" header or timestamps.
2. **PRESERVE** all original line breaks.
3. Only translate the dialogue text.
---
Here is the VTT content to translate:
---
{content}"#
        ),
    };

    PromptPayload { instruction_text }
}
