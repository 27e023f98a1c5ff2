// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Writer configuration.

use serde::{Deserialize, Serialize};

use crate::error::{BlattwerkError, Result};

/// Highest zlib compression level accepted by the stream encoder.
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

/// Settings that shape the serialized output of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Version written in the `%PDF-x.y` header.
    pub version: crate::PdfVersion,
    /// Emit the high-byte comment line after the header so transfer tools
    /// treat the file as binary.
    pub binary_marker: bool,
    /// Whether `Document::add_stream` compresses payloads.
    pub compress_streams: bool,
    /// zlib level 0-9, `None` uses the encoder default.
    pub compression_level: Option<u32>,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            version: crate::PdfVersion::V1_7,
            binary_marker: true,
            compress_streams: false,
            compression_level: None,
        }
    }
}

impl WriterConfig {
    /// Parse and validate a configuration from JSON. Missing fields take
    /// their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the encoder cannot honour.
    pub fn validate(&self) -> Result<()> {
        match self.compression_level {
            Some(level) if level > MAX_COMPRESSION_LEVEL => Err(BlattwerkError::InvalidConfig(
                format!("compression level {level} is above {MAX_COMPRESSION_LEVEL}"),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PdfVersion;

    #[test]
    fn defaults() {
        let config = WriterConfig::default();
        assert_eq!(config.version, PdfVersion::V1_7);
        assert!(config.binary_marker);
        assert!(!config.compress_streams);
        assert_eq!(config.compression_level, None);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = WriterConfig::from_json(r#"{"compress_streams": true}"#).unwrap();
        assert!(config.compress_streams);
        assert!(config.binary_marker);
        assert_eq!(config.version, PdfVersion::V1_7);
    }

    #[test]
    fn version_from_json() {
        let config = WriterConfig::from_json(r#"{"version": "V1_4"}"#).unwrap();
        assert_eq!(config.version.header(), "%PDF-1.4");
    }

    #[test]
    fn rejects_out_of_range_level() {
        let err = WriterConfig::from_json(r#"{"compression_level": 12}"#).unwrap_err();
        assert!(matches!(err, BlattwerkError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = WriterConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, BlattwerkError::Json(_)));
    }
}
