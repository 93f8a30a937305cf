// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! CLI for the aigrel signal reliability analyzer.
//!
//! Loads an AIGER circuit and a nominal trace (a reference-simulator
//! VCD, or stimuli generated on the fly), runs the cycle-by-cycle
//! analysis and reports one reliability value per output per cycle.
//!
//! Usage:
//!   aigrel <circuit.aag> [--vcd <trace.vcd>] [--cycles N] [options]

use std::io::Write;
use std::path::PathBuf;

use aigrel::analyzer::{AnalysisOptions, Analyzer, EndpointKind, ReliabilityRecord};
use aigrel::config::AigrelConfig;
use aigrel::priority::PriorityWeights;
use aigrel::trace::NominalTrace;
use aigrel::{aiger, sim};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "aigrel")]
#[command(about = "Signal reliability analysis for sequential AIGs", version)]
struct Args {
    /// AIGER circuit path (.aag or .aig).
    ///
    /// Can also be set via `design.circuit` in aigrel.toml.
    circuit: Option<PathBuf>,

    /// Reference waveform with the nominal values (VCD).
    ///
    /// When omitted, the built-in simulator generates the nominal trace
    /// from seeded random stimuli.
    #[clap(long)]
    vcd: Option<PathBuf>,

    /// Clock signal name in the waveform.
    #[clap(long, default_value = "clock")]
    clock: String,

    /// Scope path of the design in the waveform (e.g. "tb/uut").
    #[clap(long)]
    vcd_scope: Option<String>,

    /// Number of clock cycles to analyze.
    #[clap(long, default_value_t = 1)]
    cycles: usize,

    /// Per-gate transient fault rate.
    #[clap(long, default_value_t = 0.01)]
    fault_rate: f64,

    /// Fanout-source list size budget.
    #[clap(long, default_value_t = 5)]
    max_fs: usize,

    /// Priority pre-score attenuation, in (0, 1].
    #[clap(long, default_value_t = 0.8)]
    theta: f64,

    /// Priority weight of the backward pre-score.
    #[clap(long, default_value_t = 0.75)]
    lambda_pre: f64,

    /// Priority weight of the forward suc-score.
    #[clap(long, default_value_t = 0.25)]
    lambda_suc: f64,

    /// Seed for generated stimuli (ignored with --vcd).
    #[clap(long, default_value_t = 1)]
    seed: u64,

    /// Write records as CSV (`cycle,kind,index,reliability`) here
    /// instead of stdout.
    #[clap(long)]
    output: Option<PathBuf>,

    /// Also report register endpoints (always 1.0 by convention).
    #[clap(long)]
    report_registers: bool,

    /// Path to project configuration file.
    ///
    /// If not specified, aigrel searches for `aigrel.toml` in the
    /// current directory and parent directories.
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (can be repeated: -vv for trace level).
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (can be repeated: -qq for error level).
    #[clap(short, long, action = clap::ArgAction::Count)]
    quiet: u8,
}

fn init_logging(verbose: u8, quiet: u8) {
    use simplelog::*;
    let level = match (verbose, quiet) {
        (0, 0) => LevelFilter::Info,
        (1, 0) => LevelFilter::Debug,
        (v, 0) if v >= 2 => LevelFilter::Trace,
        (0, 1) => LevelFilter::Warn,
        (0, _) => LevelFilter::Error,
        // Both set: verbose takes precedence
        (1, _) => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    TermLogger::init(
        level,
        ConfigBuilder::new()
            .set_location_level(LevelFilter::Debug)
            .set_thread_level(LevelFilter::Trace)
            .build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .unwrap();
}

/// The config file in effect: an explicit --config path (fatal when
/// unreadable), or else the nearest discovered aigrel.toml.
fn effective_config(explicit: Option<&PathBuf>) -> Option<AigrelConfig> {
    let (config, path) = match explicit {
        Some(path) => {
            let config = AigrelConfig::load(path).unwrap_or_else(|e| {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            });
            (config, path.clone())
        }
        None => AigrelConfig::discover()?,
    };
    clilog::info!("Using config {}", path.display());
    Some(config)
}

fn write_records(
    records: &[ReliabilityRecord],
    out: &mut impl Write,
    report_registers: bool,
) -> std::io::Result<()> {
    writeln!(out, "cycle,kind,index,reliability")?;
    for r in records {
        let kind = match r.kind {
            EndpointKind::PrimaryOutput => "po",
            EndpointKind::RegisterInput => "reg",
        };
        if r.kind == EndpointKind::RegisterInput && !report_registers {
            continue;
        }
        writeln!(out, "{},{},{},{:.9}", r.cycle, kind, r.index, r.reliability)?;
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let config = effective_config(args.config.as_ref());

    // Merge CLI args with config file (CLI wins)
    let circuit = args
        .circuit
        .or_else(|| config.as_ref().and_then(|c| c.design.circuit.clone()))
        .unwrap_or_else(|| {
            eprintln!(
                "Error: circuit is required (positional arg or design.circuit in aigrel.toml)"
            );
            std::process::exit(1);
        });
    let vcd = args
        .vcd
        .or_else(|| config.as_ref().and_then(|c| c.trace.vcd.clone()));
    let clock = config
        .as_ref()
        .and_then(|c| c.trace.clock.clone())
        .filter(|_| args.clock == "clock")
        .unwrap_or(args.clock);
    let scope = args
        .vcd_scope
        .or_else(|| config.as_ref().and_then(|c| c.trace.scope.clone()))
        .unwrap_or_default();
    let cfg_analysis = config.as_ref().map(|c| &c.analysis);
    let pick_usize = |cli: usize, default: usize, file: Option<usize>| {
        if cli != default {
            cli
        } else {
            file.unwrap_or(default)
        }
    };
    let pick_f64 = |cli: f64, default: f64, file: Option<f64>| {
        if cli != default {
            cli
        } else {
            file.unwrap_or(default)
        }
    };
    let cycles = pick_usize(args.cycles, 1, cfg_analysis.and_then(|a| a.cycles));
    let fault_rate = pick_f64(args.fault_rate, 0.01, cfg_analysis.and_then(|a| a.fault_rate));
    let max_fs = pick_usize(args.max_fs, 5, cfg_analysis.and_then(|a| a.max_fs));
    let weights = PriorityWeights {
        theta: pick_f64(args.theta, 0.8, cfg_analysis.and_then(|a| a.theta)),
        lambda_pre: pick_f64(args.lambda_pre, 0.75, cfg_analysis.and_then(|a| a.lambda_pre)),
        lambda_suc: pick_f64(args.lambda_suc, 0.25, cfg_analysis.and_then(|a| a.lambda_suc)),
    };
    let seed = config
        .as_ref()
        .and_then(|c| c.trace.seed)
        .filter(|_| args.seed == 1)
        .unwrap_or(args.seed);
    let output = args
        .output
        .or_else(|| config.as_ref().and_then(|c| c.analysis.output.clone()));

    clilog::info!("Loading circuit: {}", circuit.display());
    let aig = match aiger::from_file(&circuit) {
        Ok(aig) => aig,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    clilog::info!(
        "Circuit: {} nodes, {} inputs, {} latches, {} outputs, depth {}",
        aig.num_nodes,
        aig.inputs.len(),
        aig.num_latches(),
        aig.outputs.len(),
        aig.depth
    );

    let trace = match &vcd {
        Some(path) => {
            clilog::info!("Reading nominal trace: {}", path.display());
            match NominalTrace::from_vcd(path, &aig, &clock, &scope) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        None => {
            clilog::info!(
                "No waveform given; simulating {} cycles of seeded random stimuli (seed {})",
                cycles,
                seed
            );
            let stimuli = sim::random_stimuli(&aig, cycles, seed);
            sim::simulate(&aig, &stimuli)
        }
    };

    let opts = AnalysisOptions {
        num_cycles: cycles,
        fault_rate,
        max_fs,
        weights,
    };
    let timer_analysis = clilog::stimer!("analysis");
    let records = Analyzer::new(&aig, &trace, opts)
        .and_then(|mut a| a.run())
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });
    clilog::finish!(timer_analysis);

    let emitted = records
        .iter()
        .filter(|r| r.kind == EndpointKind::PrimaryOutput)
        .count();
    clilog::info!("Analysis produced {} primary-output records", emitted);

    match &output {
        Some(path) => {
            let mut file = std::fs::File::create(path).unwrap_or_else(|e| {
                eprintln!("Error: cannot write {}: {}", path.display(), e);
                std::process::exit(1);
            });
            write_records(&records, &mut file, args.report_registers).unwrap();
            clilog::info!("Wrote {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            write_records(&records, &mut stdout.lock(), args.report_registers).unwrap();
        }
    }
}
