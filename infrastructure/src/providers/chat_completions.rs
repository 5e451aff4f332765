//! OpenAI-compatible chat completions wire types, shared by Groq and OpenRouter.

use super::http::{is_sse_done, malformed, parse_sse_data};
use fiesta_application::ProviderError;
use fiesta_domain::Message;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ResponseChoice>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, if any
    pub fn first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
    }
}

#[derive(Debug, Deserialize)]
pub struct ResponseChoice {
    pub message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    error: Option<StreamError>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: Option<StreamDelta>,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamError {
    message: String,
}

/// Collects the content deltas of a streamed completion into one string.
///
/// Bytes are buffered until a full line is available, so chunks may split
/// lines (and UTF-8 sequences) anywhere.
#[derive(Debug, Default)]
pub struct StreamCollector {
    pending: Vec<u8>,
    text: String,
    done: bool,
}

impl StreamCollector {
    /// Feed raw bytes. Returns `true` once the `[DONE]` marker was seen.
    pub fn push(&mut self, chunk: &[u8]) -> Result<bool, ProviderError> {
        self.pending.extend_from_slice(chunk);
        while !self.done
            && let Some(pos) = self.pending.iter().position(|b| *b == b'\n')
        {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            self.handle_line(line.trim_end())?;
        }
        Ok(self.done)
    }

    /// Flush any trailing line and return the collected text.
    pub fn finish(mut self) -> Result<String, ProviderError> {
        if !self.done && !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            let line = String::from_utf8_lossy(&rest);
            self.handle_line(line.trim_end())?;
        }
        if self.text.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(self.text)
    }

    fn handle_line(&mut self, line: &str) -> Result<(), ProviderError> {
        if is_sse_done(line) {
            self.done = true;
            return Ok(());
        }
        let Some(data) = parse_sse_data(line) else {
            return Ok(());
        };
        let chunk: StreamChunk = serde_json::from_str(data).map_err(malformed)?;
        if let Some(error) = chunk.error {
            return Err(ProviderError::Upstream(error.message));
        }
        for choice in chunk.choices {
            if let Some(content) = choice.delta.and_then(|d| d.content) {
                self.text.push_str(&content);
            }
        }
        Ok(())
    }
}
