// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Blattwerk.

use thiserror::Error;

/// Top-level error type for all Blattwerk operations.
///
/// Every variant is a contract violation by the caller or a failing sink.
/// Nothing here is transient, so nothing is retried.
#[derive(Debug, Error)]
pub enum BlattwerkError {
    // -- Construction errors --
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    // -- Registry errors --
    #[error("object {number} is not registered in this document")]
    UnknownObject { number: u32 },

    #[error("object {number} was reserved but never filled")]
    UnfilledObject { number: u32 },

    #[error("object {number} already has content")]
    AlreadyFilled { number: u32 },

    #[error("no root object designated for the trailer")]
    MissingRoot,

    // -- Serialization errors --
    #[error("{field} value {value} exceeds the fixed-width maximum {max}")]
    EncodingOverflow {
        field: &'static str,
        value: u64,
        max: u64,
    },

    #[error("stream compression failed: {0}")]
    Compression(String),

    // -- Configuration --
    #[error("invalid writer configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    // -- Output sink --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BlattwerkError>;
