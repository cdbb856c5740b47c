//! Frame reassembly for the streaming response body.
//!
//! The HTTP body arrives as arbitrary byte chunks; a chunk boundary may
//! fall anywhere, including mid-frame or inside a multi-byte UTF-8
//! character. The decoder keeps the unterminated tail as raw bytes
//! between pushes and only converts complete, newline-terminated lines
//! to text, so the decode is invariant under re-chunking.

/// Marker prefixing every payload-carrying line of the wire format.
const DATA_PREFIX: &str = "data:";

/// Stateful decoder that turns raw body chunks into complete frame
/// payloads.
///
/// Lines without the `data:` marker are discarded, the marker is
/// stripped, and blank payloads are dropped.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Bytes of the last, not-yet-terminated line
    tail: Vec<u8>,
}

impl FrameDecoder {
    /// Create a new frame decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, returning every complete frame payload it unlocked.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.tail.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(pos) = self.tail.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.tail.drain(..=pos).collect();
            // Drop the terminating '\n'; tolerate CRLF line endings.
            let text = String::from_utf8_lossy(&line[..line.len() - 1]);
            if let Some(payload) = frame_payload(text.trim_end_matches('\r')) {
                frames.push(payload);
            }
        }
        frames
    }

    /// Drain the unterminated tail once the body has ended.
    ///
    /// The wire format terminates every frame with a newline, so anything
    /// left here is an incomplete frame; callers log and discard it.
    pub fn finish(&mut self) -> Option<String> {
        if self.tail.is_empty() {
            return None;
        }
        let tail = std::mem::take(&mut self.tail);
        let text = String::from_utf8_lossy(&tail);
        Some(text.trim_end_matches('\r').to_string())
    }
}

/// Extract the payload from one complete line, if it carries one.
fn frame_payload(line: &str) -> Option<String> {
    let rest = line.strip_prefix(DATA_PREFIX)?;
    let payload = rest.trim();
    if payload.is_empty() {
        None
    } else {
        Some(payload.to_string())
    }
}
