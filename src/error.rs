// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! Error types for circuit loading and reliability analysis.

use thiserror::Error;

/// Result alias used throughout the analysis core.
pub type Result<T> = std::result::Result<T, RelError>;

/// Error raised by the reliability analysis engine.
#[derive(Debug, Error)]
pub enum RelError {
    /// A conditional matrix does not have `2^|L|` rows for its
    /// fanout-source list. This means the engine state is corrupt and the
    /// analysis cannot continue.
    #[error("matrix has {rows} rows but the fanout source list of length {sources} requires {expected}")]
    ShapeMismatch {
        rows: usize,
        sources: usize,
        expected: usize,
    },

    /// A fanout-source list refers to a node index outside the AIG.
    #[error("fanout source list refers to unknown node {0}")]
    UnknownNode(usize),

    /// Rejected configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Forwarded loader error.
    #[error("{0}")]
    Aiger(#[from] AigerError),

    /// Forwarded trace error.
    #[error("{0}")]
    Trace(#[from] TraceError),
}

/// Error raised while extracting a nominal trace from a waveform.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The configured clock signal was not found in the waveform.
    #[error("clock signal `{0}` not found in waveform")]
    ClockNotFound(String),

    /// The requested scope path does not exist in the waveform.
    #[error("scope `{0}` not found in waveform")]
    ScopeNotFound(String),

    /// No waveform variable could be mapped to any AIG node.
    #[error("no waveform signal maps to an AIG node")]
    NoMappedSignals,
}

/// Error raised while reading an AIGER circuit file.
#[derive(Debug, Error)]
pub enum AigerError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The `aag`/`aig` M I L O A header line is missing or malformed.
    #[error("malformed header: {0}")]
    Header(String),

    #[error("invalid literal: {0}")]
    Literal(String),

    /// Well-formed AIGER that uses a feature the loader does not support.
    #[error("unsupported feature: {0}")]
    Unsupported(String),
}
