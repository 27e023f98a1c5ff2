// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stream objects — a dictionary plus a binary payload, optionally deflated.
//
// The final payload and its `/Length` are fixed when the stream is built,
// so the declared length can never drift from the bytes that get written.

use std::io::Write;

use blattwerk_core::config::MAX_COMPRESSION_LEVEL;
use blattwerk_core::error::{BlattwerkError, Result};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use tracing::trace;

use super::value::{Dictionary, Name, Value};

/// Filter name recorded for zlib/deflate payloads.
pub const FLATE_DECODE: &str = "FlateDecode";

/// A stream object ready for serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    dictionary: Dictionary,
    payload: Vec<u8>,
    compressed: bool,
}

impl Stream {
    /// Build a stream, deflating the payload when `compress` is set.
    pub fn new(dictionary: Dictionary, payload: impl Into<Vec<u8>>, compress: bool) -> Result<Self> {
        let level = compress.then(Compression::default);
        Self::build(dictionary, payload.into(), level)
    }

    /// Build a stream with an explicit zlib level (0-9). `None` stores the
    /// payload uncompressed.
    pub fn with_level(
        dictionary: Dictionary,
        payload: impl Into<Vec<u8>>,
        level: Option<u32>,
    ) -> Result<Self> {
        if let Some(level) = level.filter(|&l| l > MAX_COMPRESSION_LEVEL) {
            return Err(BlattwerkError::InvalidConfig(format!(
                "compression level {level} is above {MAX_COMPRESSION_LEVEL}"
            )));
        }
        Self::build(dictionary, payload.into(), level.map(Compression::new))
    }

    fn build(mut dictionary: Dictionary, payload: Vec<u8>, level: Option<Compression>) -> Result<Self> {
        let raw_len = payload.len();
        let (payload, compressed) = match level {
            Some(level) => {
                let deflated = deflate(&payload, level)?;
                prepend_filter(&mut dictionary);
                (deflated, true)
            }
            None => (payload, false),
        };

        let length = i64::try_from(payload.len()).map_err(|_| BlattwerkError::EncodingOverflow {
            field: "stream length",
            value: payload.len() as u64,
            max: i64::MAX as u64,
        })?;
        dictionary.insert("Length", length);

        trace!(raw_len, encoded_len = payload.len(), compressed, "stream built");

        Ok(Self {
            dictionary,
            payload,
            compressed,
        })
    }

    /// Stream dictionary, `/Length` and `/Filter` included.
    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Payload bytes exactly as they will be written.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Value of the `/Length` entry.
    pub fn declared_length(&self) -> usize {
        self.payload.len()
    }

    /// Whether the payload was deflated.
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Append the dictionary, stream markers, and raw payload to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        self.dictionary.write_to(out);
        out.extend_from_slice(b"\nstream\n");
        out.extend_from_slice(&self.payload);
        out.extend_from_slice(b"\nendstream");
    }

    /// Encoded stream as a fresh buffer.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.payload.len() + 64);
        self.write_to(&mut out);
        out
    }
}

fn deflate(data: &[u8], level: Compression) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2 + 16), level);
    encoder
        .write_all(data)
        .map_err(|e| BlattwerkError::Compression(format!("write failed: {e}")))?;
    encoder
        .finish()
        .map_err(|e| BlattwerkError::Compression(format!("finish failed: {e}")))
}

/// Put `/FlateDecode` first in the filter chain. Filters already declared by
/// the caller describe the inner encoding and are kept after it.
fn prepend_filter(dictionary: &mut Dictionary) {
    let flate = Value::name(FLATE_DECODE);
    let filter = match dictionary.remove("Filter") {
        None => flate,
        Some(Value::Array(mut filters)) => {
            filters.insert(0, flate);
            Value::Array(filters)
        }
        Some(existing) => Value::Array(vec![flate, existing]),
    };
    dictionary.insert(Name::from("Filter"), filter);
}
