//! Content decoding for rewritable bodies.
//!
//! # Responsibilities
//! - Inflate gzip bodies so they can be inspected as plain bytes
//! - Remember the original coding so output is re-encoded symmetrically
//! - Degrade to opaque bytes when gzip framing is invalid
//!
//! Only `gzip` is understood. Any other coding is treated as plain bytes,
//! which means the rewriters will simply not find what they look for.

use std::io::{Read, Write};

use axum::body::Bytes;
use axum::http::{header, HeaderMap};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

/// Content coding declared by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentCoding {
    Identity,
    Gzip,
}

impl ContentCoding {
    /// Read the coding from a `Content-Encoding` header.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        match headers.get(header::CONTENT_ENCODING).map(|v| v.as_bytes()) {
            Some(value) if value.trim_ascii().eq_ignore_ascii_case(b"gzip") => ContentCoding::Gzip,
            _ => ContentCoding::Identity,
        }
    }
}

/// A backend body after decoding.
#[derive(Debug)]
pub enum Decoded {
    /// Decoded bytes, plus the coding to restore on output.
    Plain { bytes: Bytes, coding: ContentCoding },
    /// Declared gzip but did not inflate; the original bytes.
    Opaque(Bytes),
}

/// Decode a fully buffered body according to its declared coding.
pub fn decode(coding: ContentCoding, body: Bytes) -> Decoded {
    match coding {
        ContentCoding::Identity => Decoded::Plain { bytes: body, coding },
        ContentCoding::Gzip => match gunzip(&body) {
            Ok(inflated) => Decoded::Plain {
                bytes: Bytes::from(inflated),
                coding,
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to inflate gzip body, passing through");
                Decoded::Opaque(body)
            }
        },
    }
}

/// Re-encode transformed bytes to match the original coding.
pub fn encode(coding: ContentCoding, bytes: Vec<u8>) -> std::io::Result<Vec<u8>> {
    match coding {
        ContentCoding::Identity => Ok(bytes),
        ContentCoding::Gzip => gzip(&bytes),
    }
}

fn gunzip(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

fn gzip(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}
