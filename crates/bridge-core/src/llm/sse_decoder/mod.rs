//! Line decoder for OpenAI-compatible streaming responses
//!
//! The remote wire format is newline-delimited text where each meaningful
//! line starts with `data:` and carries a JSON delta or the `[DONE]`
//! sentinel. Network reads split the text at arbitrary byte offsets, so the
//! decoder buffers raw bytes until a full line is available. Splitting on
//! `\n` at the byte level never cuts a UTF-8 sequence, which keeps
//! multi-byte characters intact across reads.

/// One decoded `data:` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseLine {
    /// Payload after `data:`, leading whitespace removed
    Data(String),
    /// The `[DONE]` sentinel
    Done,
}

/// Buffered line decoder that handles partial chunks
#[derive(Debug, Default)]
pub struct SseLineDecoder {
    buffer: Vec<u8>,
}

impl SseLineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes and extract every complete line
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseLine> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(parsed) = Self::parse_line(&line[..line.len() - 1]) {
                lines.push(parsed);
            }
        }
        lines
    }

    /// Flush trailing content that was never newline-terminated
    pub fn finish(&mut self) -> Option<SseLine> {
        let rest = std::mem::take(&mut self.buffer);
        Self::parse_line(&rest)
    }

    /// Whether bytes are waiting for a line terminator
    pub fn has_remaining(&self) -> bool {
        !self.buffer.is_empty()
    }

    fn parse_line(raw: &[u8]) -> Option<SseLine> {
        let text = String::from_utf8_lossy(raw);
        let line = text.trim_end_matches('\r').trim_start();

        // Blank separators, comments and other fields are ignored
        let payload = line.strip_prefix("data:")?.trim_start();
        if payload.trim_end() == "[DONE]" {
            Some(SseLine::Done)
        } else if payload.is_empty() {
            None
        } else {
            Some(SseLine::Data(payload.to_string()))
        }
    }
}
