//! Incremental parsing of server-sent-event byte streams.
//!
//! Both wire protocols deliver streamed responses as `data: <payload>` lines.
//! HTTP chunk boundaries do not align with line boundaries, so payload lines
//! (and even multi-byte characters) can be split across chunks. This buffer
//! accumulates raw bytes and yields only complete `data:` payloads.

/// Byte-level line buffer for SSE streams.
///
/// # Examples
///
/// ```
/// use atelier_models::SseLineBuffer;
///
/// let mut buf = SseLineBuffer::default();
/// assert!(buf.push(b"data: {\"a\"").is_empty());
/// assert_eq!(buf.push(b":1}\n"), vec!["{\"a\":1}".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    pending: Vec<u8>,
}

impl SseLineBuffer {
    /// Feed raw bytes; returns the `data:` payloads of every line completed
    /// by this chunk, in arrival order.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);

        let mut payloads = Vec::new();
        while let Some(newline) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line[..newline]);
            let line = line.trim_end_matches('\r');
            if let Some(payload) = line.strip_prefix("data:") {
                payloads.push(payload.trim_start().to_string());
            }
        }
        payloads
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_payloads_across_chunks() {
        let mut buf = SseLineBuffer::default();
        assert!(buf.push(b"data: hel").is_empty());
        assert_eq!(buf.push(b"lo\ndata: world\n"), vec!["hello", "world"]);
    }

    #[test]
    fn ignores_non_data_lines() {
        let mut buf = SseLineBuffer::default();
        assert_eq!(buf.push(b": keepalive\nevent: x\ndata: y\n\n"), vec!["y"]);
    }

    #[test]
    fn handles_crlf() {
        let mut buf = SseLineBuffer::default();
        assert_eq!(buf.push(b"data: a\r\ndata: b\r\n"), vec!["a", "b"]);
    }

    #[test]
    fn multibyte_character_split_across_chunks() {
        let mut buf = SseLineBuffer::default();
        let text = "data: caf\u{e9}\n".as_bytes();
        let (left, right) = text.split_at(10);
        assert!(buf.push(left).is_empty());
        assert_eq!(buf.push(right), vec!["caf\u{e9}"]);
    }
}
