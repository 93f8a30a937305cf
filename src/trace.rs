// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! Nominal value traces.
//!
//! A [`NominalTrace`] stores, for every cycle and node, the `[P0, P1]`
//! probability vector of the fault-free reference value: `[1,0]` or
//! `[0,1]` when the value is known, `[0.5, 0.5]` for `x`/`z`. Traces
//! come from a reference-simulator VCD waveform or from the built-in
//! nominal simulator.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};
use std::path::Path;

use vcd_ng::{FFValueChange, FastFlow, FastFlowToken, Parser, ScopeItem, Var};

use crate::aig::Aig;
use crate::error::TraceError;

/// The unknown-value probability vector.
pub const UNKNOWN: [f64; 2] = [0.5, 0.5];

/// Per-cycle nominal probability vectors for every node.
///
/// Cycles are numbered from 1.
#[derive(Debug, Clone)]
pub struct NominalTrace {
    num_nodes: usize,
    cycles: Vec<Vec<Option<[f64; 2]>>>,
}

impl NominalTrace {
    pub fn new(num_nodes: usize) -> NominalTrace {
        NominalTrace {
            num_nodes,
            cycles: Vec::new(),
        }
    }

    pub fn num_cycles(&self) -> usize {
        self.cycles.len()
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Append an empty cycle and return its (1-based) number.
    pub fn push_cycle(&mut self) -> usize {
        self.cycles.push(vec![None; self.num_nodes]);
        self.cycles.len()
    }

    pub fn set(&mut self, cycle: usize, node: usize, v: [f64; 2]) {
        self.cycles[cycle - 1][node] = Some(v);
    }

    pub fn set_bool(&mut self, cycle: usize, node: usize, value: bool) {
        self.set(cycle, node, if value { [0.0, 1.0] } else { [1.0, 0.0] });
    }

    /// The nominal vector of a node at a cycle, if the trace has it.
    pub fn value(&self, node: usize, cycle: usize) -> Option<[f64; 2]> {
        self.cycles
            .get(cycle - 1)
            .and_then(|c| c.get(node).copied())
            .flatten()
    }

    /// All node vectors of one cycle, with the unknown vector filled in
    /// for nodes the trace does not cover.
    pub fn node_vectors(&self, cycle: usize) -> Vec<[f64; 2]> {
        match self.cycles.get(cycle - 1) {
            Some(c) => c.iter().map(|v| v.unwrap_or(UNKNOWN)).collect(),
            None => vec![UNKNOWN; self.num_nodes],
        }
    }

    /// Extract a trace from a VCD waveform.
    ///
    /// Variables are mapped to AIG nodes by symbol name (input, latch
    /// and output names from the AIGER symbol table), with a fallback
    /// that reads a trailing node index out of generated names such as
    /// `n42` or `signal_42`. One sample is taken per rising edge of the
    /// clock signal, after all value changes of the edge timestamp have
    /// been applied.
    pub fn from_vcd(
        path: &Path,
        aig: &Aig,
        clock: &str,
        scope: &str,
    ) -> Result<NominalTrace, TraceError> {
        let io_err = |e: std::io::Error| TraceError::Io {
            path: path.display().to_string(),
            source: e,
        };

        let file = File::open(path).map_err(io_err)?;
        let mut bufrd = BufReader::with_capacity(65536, file);
        let mut vcd_parser = Parser::new(&mut bufrd);
        let header = vcd_parser.parse_header().map_err(io_err)?;
        drop(vcd_parser);
        let mut vcd_file = bufrd.into_inner();
        vcd_file.seek(SeekFrom::Start(0)).map_err(io_err)?;
        let mut vcdflow = FastFlow::new(vcd_file, 65536);

        let top_items: &[ScopeItem] = match scoped_items(&header.items[..], scope) {
            Some(items) => items,
            // a scope-less dump puts its variables at the top level
            None if scope.is_empty() => &header.items[..],
            None => return Err(TraceError::ScopeNotFound(scope.to_string())),
        };

        let name2node = symbol_map(aig);
        let mut code2node: HashMap<u64, (usize, bool)> = HashMap::new();
        let mut clock_code = None;
        collect_vars(top_items, &mut |var: &Var| {
            if var.size != 1 {
                return;
            }
            let name = var.reference.as_str();
            if name == clock {
                clock_code = Some(var.code.0);
                return;
            }
            if let Some(&(node, invert)) = name2node.get(name) {
                code2node.insert(var.code.0, (node, invert));
            } else if let Some(node) = trailing_index(name) {
                if node > 0 && node < aig.num_nodes {
                    code2node.entry(var.code.0).or_insert((node, false));
                }
            }
        });

        let clock_code = clock_code.ok_or_else(|| TraceError::ClockNotFound(clock.to_string()))?;
        if code2node.is_empty() {
            return Err(TraceError::NoMappedSignals);
        }
        clilog::info!(
            "mapped {} waveform signals onto AIG nodes",
            code2node.len()
        );

        let mut trace = NominalTrace::new(aig.num_nodes);
        let mut cur: HashMap<usize, [f64; 2]> = HashMap::new();
        let mut clock_high = false;
        let mut pending_edge = false;
        let mut commit = |cur: &HashMap<usize, [f64; 2]>, trace: &mut NominalTrace| {
            let cycle = trace.push_cycle();
            for (&node, &v) in cur {
                trace.set(cycle, node, v);
            }
        };
        while let Some(tok) = vcdflow.next_token().map_err(io_err)? {
            match tok {
                FastFlowToken::Timestamp(_) => {
                    if pending_edge {
                        commit(&cur, &mut trace);
                        pending_edge = false;
                    }
                }
                FastFlowToken::Value(FFValueChange { id, bits }) => {
                    let b = match bits.first() {
                        Some(&b) => b,
                        None => continue,
                    };
                    if id.0 == clock_code {
                        let high = b == b'1';
                        if high && !clock_high {
                            pending_edge = true;
                        }
                        clock_high = high;
                    } else if let Some(&(node, invert)) = code2node.get(&id.0) {
                        // stored at node polarity: an inverted output
                        // symbol observes the complement of its node
                        cur.insert(
                            node,
                            match (b, invert) {
                                (b'0', false) | (b'1', true) => [1.0, 0.0],
                                (b'1', false) | (b'0', true) => [0.0, 1.0],
                                _ => UNKNOWN,
                            },
                        );
                    }
                }
            }
        }
        if pending_edge {
            commit(&cur, &mut trace);
        }

        clilog::info!("extracted {} clock cycles from waveform", trace.num_cycles());
        Ok(trace)
    }
}

/// Names from the AIGER symbol table mapped to their nodes, with the
/// polarity the named signal observes the node at.
fn symbol_map(aig: &Aig) -> HashMap<String, (usize, bool)> {
    let mut map = HashMap::new();
    for (ord, &node) in aig.inputs.iter().enumerate() {
        if let Some(Some(name)) = aig.input_names.get(ord) {
            map.insert(name.clone(), (node, false));
        }
    }
    for (idx, latch) in aig.latches.iter().enumerate() {
        if let Some(Some(name)) = aig.latch_names.get(idx) {
            map.insert(name.clone(), (latch.q, false));
        }
    }
    for (idx, &o_iv) in aig.outputs.iter().enumerate() {
        if let Some(Some(name)) = aig.output_names.get(idx) {
            if o_iv >> 1 != 0 {
                map.insert(name.clone(), (o_iv >> 1, o_iv & 1 == 1));
            }
        }
    }
    map
}

/// A trailing decimal run in a generated signal name, e.g. `n42`,
/// `signal_42` or `uut.g42`.
fn trailing_index(name: &str) -> Option<usize> {
    let digits: String = name
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if digits.is_empty() || digits.len() == name.len() {
        return None;
    }
    digits.parse().ok()
}

fn collect_vars(items: &[ScopeItem], f: &mut impl FnMut(&Var)) {
    for item in items {
        match item {
            ScopeItem::Var(var) => f(var),
            ScopeItem::Scope(scope) => collect_vars(&scope.children[..], f),
            _ => {}
        }
    }
}

/// Descend the scope hierarchy along a `/`-separated path and return
/// the items of the scope it names. An empty path selects the first
/// top-level scope, the usual single testbench wrapper of a dump.
fn scoped_items<'i>(items: &'i [ScopeItem], path: &str) -> Option<&'i [ScopeItem]> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return items.iter().find_map(|item| match item {
            ScopeItem::Scope(s) => Some(&s.children[..]),
            _ => None,
        });
    }
    let mut cur = items;
    for name in segments {
        cur = cur.iter().find_map(|item| match item {
            ScopeItem::Scope(s) if s.identifier.as_str() == name => Some(&s.children[..]),
            _ => None,
        })?;
    }
    Some(cur)
}
