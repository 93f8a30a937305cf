// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! Project configuration file (`aigrel.toml`) support.
//!
//! Provides optional TOML-based project configuration that stores the
//! circuit path, trace settings and analysis parameters. CLI arguments
//! always override config file values.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Project configuration loaded from `aigrel.toml`.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct AigrelConfig {
    pub design: DesignConfig,
    pub trace: TraceConfig,
    pub analysis: AnalysisConfig,
}

/// Circuit parameters.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct DesignConfig {
    /// AIGER circuit path (`.aag` or `.aig`).
    pub circuit: Option<PathBuf>,
}

/// Nominal trace settings.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct TraceConfig {
    /// Reference waveform path. When omitted, stimuli are generated.
    pub vcd: Option<PathBuf>,
    /// Clock signal name in the waveform.
    pub clock: Option<String>,
    /// Scope path of the design in the waveform.
    pub scope: Option<String>,
    /// Seed for generated stimuli.
    pub seed: Option<u64>,
}

/// Analysis parameters.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Number of clock cycles to analyze.
    pub cycles: Option<usize>,
    /// Per-gate transient fault rate.
    pub fault_rate: Option<f64>,
    /// Fanout-source list size budget.
    pub max_fs: Option<usize>,
    /// Priority pre-score attenuation.
    pub theta: Option<f64>,
    /// Priority weight of the pre-score.
    pub lambda_pre: Option<f64>,
    /// Priority weight of the suc-score.
    pub lambda_suc: Option<f64>,
    /// Output CSV path for the reliability records.
    pub output: Option<PathBuf>,
}

impl AigrelConfig {
    /// Parse a config file. Relative paths inside it are resolved
    /// against the file's own directory, so the returned config is
    /// usable from any working directory.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
        let mut config: AigrelConfig =
            toml::from_str(&content).map_err(|e| format!("cannot parse {}: {}", path.display(), e))?;
        let base = path.parent().unwrap_or(Path::new("."));
        for p in [
            &mut config.design.circuit,
            &mut config.trace.vcd,
            &mut config.analysis.output,
        ]
        .into_iter()
        .flatten()
        {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        }
        Ok(config)
    }

    /// Find the nearest `aigrel.toml` in the working directory or any
    /// of its ancestors. A file that exists but does not parse is
    /// reported and treated as absent.
    pub fn discover() -> Option<(Self, PathBuf)> {
        let cwd = std::env::current_dir().ok()?;
        for dir in cwd.ancestors() {
            let candidate = dir.join("aigrel.toml");
            if !candidate.exists() {
                continue;
            }
            return match Self::load(&candidate) {
                Ok(config) => Some((config, candidate)),
                Err(e) => {
                    clilog::warn!("ignoring discovered config: {}", e);
                    None
                }
            };
        }
        None
    }
}
