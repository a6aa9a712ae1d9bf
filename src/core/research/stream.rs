//! Decoder for the web agent's server-sent-events response body.
//!
//! Bytes are buffered until a full line is available, so multi-byte UTF-8
//! sequences split across network chunks survive. Each `data:` payload is
//! classified as a replacement of the accumulated result, raw text to append,
//! or an event to ignore.

use serde_json::Value;

/// Returned when the stream carried no usable content
pub const EMPTY_CONTENT: &str = "No content retrieved";

#[derive(Debug, Clone, PartialEq)]
enum SseEvent {
    /// Structured result; supersedes anything accumulated so far
    Replace(String),
    /// Non-JSON payload
    Append(String),
    /// JSON without a result (progress, heartbeats)
    Ignore,
}

#[derive(Debug, Default)]
pub struct SseAccumulator {
    buffer: Vec<u8>,
    result: String,
}

impl SseAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one network chunk
    pub fn push_bytes(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);

        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            self.push_line(&line);
        }
    }

    fn push_line(&mut self, line: &str) {
        let line = line.trim_end_matches(|c: char| c == '\n' || c == '\r');
        let Some(data) = line.strip_prefix("data: ") else {
            return;
        };

        let data = data.trim();
        if data.is_empty() || data == "[DONE]" {
            return;
        }

        match decode_event(data) {
            SseEvent::Replace(result) => self.result = result,
            SseEvent::Append(raw) => self.result.push_str(&raw),
            SseEvent::Ignore => {}
        }
    }

    /// Flush any unterminated final line and return the accumulated content
    pub fn finish(mut self) -> String {
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&rest).into_owned();
            self.push_line(&line);
        }

        if self.result.is_empty() {
            EMPTY_CONTENT.to_string()
        } else {
            self.result
        }
    }
}

fn decode_event(data: &str) -> SseEvent {
    let value: Value = match serde_json::from_str(data) {
        Ok(value) => value,
        Err(_) => return SseEvent::Append(data.to_string()),
    };

    match value.get("resultJson") {
        Some(Value::String(raw)) if !raw.is_empty() => {
            // resultJson is itself JSON-encoded
            let decoded = match serde_json::from_str::<Value>(raw) {
                Ok(Value::String(text)) => text,
                Ok(other) => other.to_string(),
                Err(_) => raw.clone(),
            };
            return SseEvent::Replace(decoded);
        }
        Some(other) if !other.is_null() && !matches!(other, Value::String(_)) => {
            return SseEvent::Replace(other.to_string());
        }
        _ => {}
    }

    match value.get("result") {
        Some(Value::String(text)) if !text.is_empty() => SseEvent::Replace(text.clone()),
        _ => SseEvent::Ignore,
    }
}
