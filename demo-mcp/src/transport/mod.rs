// Transport module for the MCP server
//
// Newline-delimited JSON framing over a duplex byte stream. The reader turns
// the inbound stream into discrete requests, the writer serializes responses
// back one line at a time.

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

use crate::errors::FrameError;
use crate::protocol::jsonrpc::{JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION};

/// Reads one JSON-RPC request per line
pub struct FrameReader<R> {
    reader: BufReader<R>,
    buf: Vec<u8>,
    max_frame_bytes: usize,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    pub fn new(reader: R, max_frame_bytes: usize) -> Self {
        Self {
            reader: BufReader::new(reader),
            buf: Vec::new(),
            max_frame_bytes,
        }
    }

    /// Wait for the next complete request.
    ///
    /// Returns `None` once the stream is closed. A malformed line yields
    /// `Some(Err(FrameError::Decode { .. }))` and the stream stays usable; an
    /// I/O failure yields `Some(Err(FrameError::Io(_)))`.
    pub async fn next_request(&mut self) -> Option<Result<JsonRpcRequest, FrameError>> {
        loop {
            self.buf.clear();
            let limit = self.max_frame_bytes as u64 + 1;
            let read = match (&mut self.reader).take(limit).read_until(b'\n', &mut self.buf).await {
                Ok(read) => read,
                Err(e) => return Some(Err(FrameError::Io(e))),
            };
            if read == 0 {
                return None;
            }

            if self.buf.len() > self.max_frame_bytes && self.buf.last() != Some(&b'\n') {
                if let Err(e) = self.discard_line().await {
                    return Some(Err(FrameError::Io(e)));
                }
                return Some(Err(FrameError::TooLarge {
                    limit: self.max_frame_bytes,
                }));
            }

            let line = trim_line(&self.buf);
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            return Some(decode(line));
        }
    }

    /// Skip the remainder of an oversized line
    async fn discard_line(&mut self) -> std::io::Result<()> {
        loop {
            let (consumed, done) = {
                let available = self.reader.fill_buf().await?;
                if available.is_empty() {
                    return Ok(());
                }
                match available.iter().position(|b| *b == b'\n') {
                    Some(pos) => (pos + 1, true),
                    None => (available.len(), false),
                }
            };
            self.reader.consume(consumed);
            if done {
                return Ok(());
            }
        }
    }
}

fn trim_line(buf: &[u8]) -> &[u8] {
    let mut end = buf.len();
    while end > 0 && matches!(buf[end - 1], b'\n' | b'\r') {
        end -= 1;
    }
    &buf[..end]
}

fn decode(line: &[u8]) -> Result<JsonRpcRequest, FrameError> {
    let value: Value = serde_json::from_slice(line).map_err(|e| FrameError::Decode {
        id: None,
        reason: format!("Invalid JSON: {}", e),
    })?;
    let id = value.get("id").cloned();

    let request: JsonRpcRequest = serde_json::from_value(value).map_err(|e| FrameError::Decode {
        id: id.clone(),
        reason: format!("Invalid request: {}", e),
    })?;
    if request.jsonrpc != JSONRPC_VERSION {
        return Err(FrameError::Decode {
            id,
            reason: format!("Unsupported jsonrpc version: {}", request.jsonrpc),
        });
    }
    Ok(request)
}

/// Writes one JSON-RPC response per line
pub struct FrameWriter<W> {
    writer: BufWriter<W>,
}

impl<W: AsyncWrite + Unpin> FrameWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// Serialize and flush a single response
    pub async fn send_response(&mut self, response: &JsonRpcResponse) -> Result<(), FrameError> {
        let mut line = serde_json::to_vec(response)?;
        line.push(b'\n');
        self.writer.write_all(&line).await?;
        self.writer.flush().await?;
        Ok(())
    }
}
