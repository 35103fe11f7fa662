// src/core/protocol/line_frame.rs

//! Implements the line framing of the gateway protocol as a `tokio_util` codec:
//! requests are `\n`-terminated UTF-8 lines, responses are written as a block of lines.

use super::response::Response;
use crate::core::GatewayError;
use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

const LF: u8 = b'\n';
const CR: u8 = b'\r';

/// Default upper bound for a single request line (1 MiB).
pub const DEFAULT_MAX_LINE_LENGTH: usize = 1024 * 1024;

/// A `tokio_util::codec` implementation decoding request lines and encoding `Response`s.
#[derive(Debug, Clone)]
pub struct LineCodec {
    max_line_length: usize,
    /// Bytes of the buffer already scanned for a terminator.
    next_index: usize,
}

impl LineCodec {
    pub fn new(max_line_length: usize) -> Self {
        Self {
            max_line_length,
            next_index: 0,
        }
    }

    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    fn take_line(&mut self, src: &mut BytesMut, len: usize, consumed: usize) -> String {
        let mut line = &src[..len];
        if line.last() == Some(&CR) {
            line = &line[..line.len() - 1];
        }
        let text = String::from_utf8_lossy(line).into_owned();
        src.advance(consumed);
        self.next_index = 0;
        text
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINE_LENGTH)
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = GatewayError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let scan_from = self.next_index.min(src.len());
        match src[scan_from..].iter().position(|b| *b == LF) {
            Some(offset) => {
                let end = scan_from + offset;
                if end > self.max_line_length {
                    return Err(GatewayError::LineTooLong(self.max_line_length));
                }
                Ok(Some(self.take_line(src, end, end + 1)))
            }
            None => {
                if src.len() > self.max_line_length {
                    return Err(GatewayError::LineTooLong(self.max_line_length));
                }
                self.next_index = src.len();
                Ok(None)
            }
        }
    }

    /// A final unterminated line is still a request once the peer half-closes.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }
        if src.is_empty() {
            return Ok(None);
        }
        let len = src.len();
        Ok(Some(self.take_line(src, len, len)))
    }
}

impl Encoder<Response> for LineCodec {
    type Error = GatewayError;

    fn encode(&mut self, item: Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        for line in item.lines() {
            dst.extend_from_slice(line.as_bytes());
            dst.extend_from_slice(&[LF]);
        }
        Ok(())
    }
}
