// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! Cycle-by-cycle reliability analysis driver.
//!
//! Walks the AIG in topological order once per cycle, building each
//! node's fanout-source list and conditional output matrix from its
//! fanins, then reduces every combinational output down to a `1x2`
//! distribution and contracts it with the nominal value. Register
//! inputs hand their reduced matrix to the next cycle's register-output
//! node; nothing else crosses cycles.

use indexmap::{IndexMap, IndexSet};
use nalgebra::{DMatrix, RowDVector};
use rayon::prelude::*;

use crate::aig::{Aig, DriverType};
use crate::error::{RelError, Result};
use crate::fslist::{dedup_preserve, FsEntry};
use crate::priority::{compute_priorities, removal_list, PriorityWeights};
use crate::ptm::GatePtm;
use crate::reduce::marginalize;
use crate::trace::{NominalTrace, UNKNOWN};

/// Which kind of endpoint a record was collected at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    PrimaryOutput,
    RegisterInput,
}

/// One reliability result: the probability that the faulty circuit
/// matches the nominal value at this endpoint in this cycle.
#[derive(Debug, Clone)]
pub struct ReliabilityRecord {
    pub cycle: usize,
    /// Output ordinal for primary outputs, latch index for registers.
    pub index: usize,
    pub kind: EndpointKind,
    pub reliability: f64,
}

/// Analysis configuration.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub num_cycles: usize,
    /// Per-gate transient fault rate, in `[0, 1]`.
    pub fault_rate: f64,
    /// Fanout-source list size budget, at least 1.
    pub max_fs: usize,
    pub weights: PriorityWeights,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            num_cycles: 1,
            fault_rate: 0.01,
            max_fs: 5,
            weights: PriorityWeights::default(),
        }
    }
}

impl AnalysisOptions {
    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.fault_rate) {
            return Err(RelError::Config(format!(
                "fault rate {} outside [0, 1]",
                self.fault_rate
            )));
        }
        if self.num_cycles < 1 {
            return Err(RelError::Config("cycle count must be at least 1".into()));
        }
        if self.max_fs < 1 {
            return Err(RelError::Config(
                "fanout-source budget must be at least 1".into(),
            ));
        }
        if !(0.0 < self.weights.theta && self.weights.theta <= 1.0) {
            return Err(RelError::Config(format!(
                "pre-score attenuation {} outside (0, 1]",
                self.weights.theta
            )));
        }
        Ok(())
    }
}

/// Per-node per-cycle analysis state: the fanout-source list and the
/// conditional output matrix indexed by it.
#[derive(Debug, Clone)]
struct NodeState {
    fs: Vec<usize>,
    opt: DMatrix<f64>,
}

impl NodeState {
    fn from_row(v: [f64; 2]) -> NodeState {
        NodeState {
            fs: Vec::new(),
            opt: DMatrix::from_row_slice(1, 2, &v),
        }
    }
}

enum EndpointTarget {
    Po { ord: usize, o_iv: usize },
    Reg { idx: usize, d_iv: usize },
}

/// The reliability analyzer. Borrows the immutable AIG and trace; all
/// mutable state is per-cycle.
pub struct Analyzer<'a> {
    aig: &'a Aig,
    trace: &'a NominalTrace,
    opts: AnalysisOptions,
    ptms: Vec<GatePtm>,
    /// Fanout-source list lengths of the previous cycle, feeding the
    /// priority pre-scores.
    prev_fs_len: Vec<usize>,
    /// Matrices handed from register inputs to the next cycle, per latch.
    inherited: Vec<Option<RowDVector<f64>>>,
}

impl<'a> Analyzer<'a> {
    pub fn new(aig: &'a Aig, trace: &'a NominalTrace, opts: AnalysisOptions) -> Result<Analyzer<'a>> {
        opts.validate()?;
        if trace.num_nodes() != aig.num_nodes {
            return Err(RelError::Config(format!(
                "trace covers {} nodes but the circuit has {}",
                trace.num_nodes(),
                aig.num_nodes
            )));
        }
        if trace.num_cycles() < opts.num_cycles {
            clilog::warn!(
                "trace covers {} cycles but {} requested; uncovered values read as unknown",
                trace.num_cycles(),
                opts.num_cycles
            );
        }
        let ptms = (0..aig.num_nodes)
            .map(|u| GatePtm::for_node(aig, u, opts.fault_rate))
            .collect();
        Ok(Analyzer {
            aig,
            trace,
            prev_fs_len: vec![0; aig.num_nodes],
            inherited: vec![None; aig.num_latches()],
            ptms,
            opts,
        })
    }

    /// Run the analysis over all configured cycles.
    pub fn run(&mut self) -> Result<Vec<ReliabilityRecord>> {
        let mut records = Vec::new();
        for cycle in 1..=self.opts.num_cycles {
            clilog::debug!("analysis cycle {} start", cycle);
            self.run_cycle(cycle, &mut records)?;
        }
        Ok(records)
    }

    fn run_cycle(&mut self, cycle: usize, records: &mut Vec<ReliabilityRecord>) -> Result<()> {
        let op_vectors = self.trace.node_vectors(cycle);
        let priorities = compute_priorities(self.aig, &self.prev_fs_len, &self.opts.weights);

        // topological walk: build every node's (fs, optM)
        let mut states: Vec<NodeState> = vec![NodeState::from_row([1.0, 0.0]); self.aig.num_nodes];
        for &u in &self.aig.topo {
            states[u] = match self.aig.drivers[u] {
                DriverType::Tie0 => NodeState::from_row([1.0, 0.0]),
                DriverType::InputPort(_) => {
                    NodeState::from_row(self.trace.value(u, cycle).unwrap_or(UNKNOWN))
                }
                DriverType::Latch(idx) => {
                    if cycle == 1 {
                        NodeState::from_row([1.0, 0.0])
                    } else {
                        match &self.inherited[idx] {
                            Some(row) => NodeState {
                                fs: Vec::new(),
                                opt: DMatrix::from_row_slice(1, 2, row.as_slice()),
                            },
                            None => NodeState::from_row([1.0, 0.0]),
                        }
                    }
                }
                DriverType::AndGate(a_iv, b_iv) => {
                    self.track_node(&states, &priorities, &op_vectors, u, a_iv, b_iv)?
                }
            };
        }
        for u in 0..self.aig.num_nodes {
            self.prev_fs_len[u] = states[u].fs.len();
        }

        // endpoints: primary outputs and register inputs. Several
        // endpoints may share one node, so group by node and reduce
        // each node once, in parallel (read-only against this cycle's
        // states).
        let mut targets: Vec<EndpointTarget> = Vec::new();
        for (ord, &o_iv) in self.aig.outputs.iter().enumerate() {
            targets.push(EndpointTarget::Po { ord, o_iv });
        }
        for (idx, latch) in self.aig.latches.iter().enumerate() {
            targets.push(EndpointTarget::Reg {
                idx,
                d_iv: latch.d_iv,
            });
        }
        let mut endpoint_nodes: IndexSet<usize> = IndexSet::new();
        for t in &targets {
            endpoint_nodes.insert(match t {
                EndpointTarget::Po { o_iv, .. } => o_iv >> 1,
                EndpointTarget::Reg { d_iv, .. } => d_iv >> 1,
            });
        }
        let node_list: Vec<usize> = endpoint_nodes.iter().copied().collect();
        let reduced: Vec<Result<RowDVector<f64>>> = node_list
            .par_iter()
            .map(|&node| self.iterative_reduce(&states, &priorities, &op_vectors, node))
            .collect();
        let mut by_node: IndexMap<usize, RowDVector<f64>> = IndexMap::new();
        for (&node, re) in node_list.iter().zip(reduced) {
            by_node.insert(node, re?);
        }

        for target in &targets {
            match *target {
                EndpointTarget::Po { ord, o_iv } => {
                    let node = o_iv >> 1;
                    let v = match self.trace.value(node, cycle) {
                        Some(v) => v,
                        None => {
                            clilog::warn!(
                                "no nominal value for output {} (node {}) in cycle {}; endpoint skipped",
                                ord,
                                node,
                                cycle
                            );
                            continue;
                        }
                    };
                    let re = &by_node[&node];
                    // the trace stores node-polarity values, so an
                    // inverted output needs no swap here: flipping both
                    // the faulty and the nominal value preserves the
                    // match probability
                    records.push(ReliabilityRecord {
                        cycle,
                        index: ord,
                        kind: EndpointKind::PrimaryOutput,
                        reliability: re[0] * v[0] + re[1] * v[1],
                    });
                }
                EndpointTarget::Reg { idx, d_iv } => {
                    let mut re = by_node[&(d_iv >> 1)].clone();
                    if d_iv & 1 == 1 {
                        re.swap_columns(0, 1);
                    }
                    self.inherited[idx] = Some(re);
                    // the signal reliability is accounted at the
                    // consuming endpoint in a later cycle
                    records.push(ReliabilityRecord {
                        cycle,
                        index: idx,
                        kind: EndpointKind::RegisterInput,
                        reliability: 1.0,
                    });
                }
            }
        }
        Ok(())
    }

    /// The merge operand a fanin signal presents to its consumer:
    /// branching fanins become sources read through the identity,
    /// linear fanins expose their own list and matrix, constants a
    /// fixed row. Inverters swap the operand's columns.
    fn operand(&self, states: &[NodeState], f_iv: usize) -> FsEntry {
        let p = f_iv >> 1;
        let mut entry = if p == 0 {
            FsEntry::row(1.0, 0.0)
        } else if self.aig.fanout_size(p) > 1 {
            FsEntry::branch(p)
        } else {
            FsEntry {
                sources: states[p].fs.clone(),
                mat: states[p].opt.clone(),
            }
        };
        if f_iv & 1 == 1 {
            entry.invert();
        }
        entry
    }

    /// Build one and-gate's state, reducing the fanin operands first
    /// when the merged source list would overflow the budget.
    fn track_node(
        &self,
        states: &[NodeState],
        priorities: &[f64],
        op_vectors: &[[f64; 2]],
        u: usize,
        a_iv: usize,
        b_iv: usize,
    ) -> Result<NodeState> {
        let mut candidates: Vec<usize> = Vec::new();
        for f_iv in [a_iv, b_iv] {
            let p = f_iv >> 1;
            if p == 0 {
                continue;
            }
            if self.aig.fanout_size(p) > 1 {
                candidates.push(p);
            } else {
                candidates.extend_from_slice(&states[p].fs);
            }
        }
        dedup_preserve(&mut candidates);
        let removal = removal_list(&mut candidates, self.opts.max_fs, priorities);
        if !removal.is_empty() {
            clilog::debug!(
                "node {}: marginalizing {} of {} sources",
                u,
                removal.len(),
                removal.len() + candidates.len()
            );
        }

        let mut acc = FsEntry::unit();
        for f_iv in [a_iv, b_iv] {
            let mut op = self.operand(states, f_iv);
            if !removal.is_empty() {
                op = marginalize(&op, &removal, |e| op_vectors[e])?;
            }
            acc.merge(&op);
        }
        acc.check_shape()?;

        let ptm = self.ptms[u].as_comb().ok_or_else(|| {
            RelError::Config(format!("node {} has no combinational transfer matrix", u))
        })?;
        let opt = &acc.mat * ptm;
        Ok(NodeState {
            fs: acc.sources,
            opt,
        })
    }

    /// Reduce an endpoint's matrix to a `1x2` distribution.
    ///
    /// Repeatedly takes the highest-index source of the current list,
    /// replaces it with its own upstream view, re-trims to the budget,
    /// and folds the step's reducer into the accumulated one. Index
    /// order parallels topological order, so every substitution moves
    /// strictly toward the inputs and the list eventually empties.
    fn iterative_reduce(
        &self,
        states: &[NodeState],
        priorities: &[f64],
        op_vectors: &[[f64; 2]],
        node: usize,
    ) -> Result<RowDVector<f64>> {
        let st = &states[node];
        let mut com_red: Option<DMatrix<f64>> = None;
        let mut cur = st.fs.clone();

        while !cur.is_empty() {
            let max = *cur.iter().max().unwrap();
            if max >= states.len() {
                return Err(RelError::UnknownNode(max));
            }
            let ls = &states[max];

            // candidate list after substituting the source's own view
            let mut tmp: Vec<usize> = Vec::with_capacity(cur.len() + ls.fs.len());
            for &e in &cur {
                if e == max {
                    tmp.extend_from_slice(&ls.fs);
                } else {
                    tmp.push(e);
                }
            }
            let removal = removal_list(&mut tmp, self.opts.max_fs, priorities);

            let mut red = FsEntry::seeded(tmp);
            for &e in &cur {
                let op = if e == max {
                    FsEntry {
                        sources: ls.fs.clone(),
                        mat: ls.opt.clone(),
                    }
                } else {
                    FsEntry::branch(e)
                };
                let op = marginalize(&op, &removal, |s| op_vectors[s])?;
                red.merge(&op);
            }

            com_red = Some(match com_red {
                None => red.mat,
                Some(prev) => &red.mat * &prev,
            });
            cur = red.sources;
        }

        let re = match com_red {
            None => st.opt.clone(),
            Some(m) => &m * &st.opt,
        };
        if re.nrows() != 1 || re.ncols() != 2 {
            return Err(RelError::ShapeMismatch {
                rows: re.nrows(),
                sources: 0,
                expected: 1,
            });
        }
        Ok(re.row(0).clone_owned())
    }
}

/// One-call entry point matching the core interface.
pub fn analyze(
    aig: &Aig,
    trace: &NominalTrace,
    num_cycles: usize,
    max_fs: usize,
    fault_rate: f64,
) -> Result<Vec<ReliabilityRecord>> {
    Analyzer::new(
        aig,
        trace,
        AnalysisOptions {
            num_cycles,
            fault_rate,
            max_fs,
            weights: PriorityWeights::default(),
        },
    )?
    .run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aiger;
    use crate::sim;

    fn po_records(records: &[ReliabilityRecord]) -> Vec<&ReliabilityRecord> {
        records
            .iter()
            .filter(|r| r.kind == EndpointKind::PrimaryOutput)
            .collect()
    }

    #[test]
    fn test_single_and_gate() {
        let src = "aag 3 2 0 1 1\n2\n4\n6\n6 2 4\n";
        let aig = aiger::from_str(src).unwrap();
        let trace = sim::simulate(&aig, &sim::const_stimuli(&aig, 1, true));
        let records = analyze(&aig, &trace, 1, 8, 0.01).unwrap();
        let pos = po_records(&records);
        assert_eq!(pos.len(), 1);
        assert!((pos[0].reliability - 0.99).abs() < 1e-12);
    }

    #[test]
    fn test_reconvergent_cone() {
        // g1 = a & b, g2 = a & g1: the two views of `a` must stay
        // correlated, so only the double-fault term compensates:
        // R = (1-f)^2 + f^2
        let src = "aag 4 2 0 1 2\n2\n4\n8\n6 2 4\n8 2 6\n";
        let aig = aiger::from_str(src).unwrap();
        let trace = sim::simulate(&aig, &sim::const_stimuli(&aig, 1, true));
        let f = 0.01;
        let records = analyze(&aig, &trace, 1, 8, f).unwrap();
        let pos = po_records(&records);
        let expect = (1.0 - f) * (1.0 - f) + f * f;
        assert!((pos[0].reliability - expect).abs() < 1e-9);
    }

    #[test]
    fn test_latch_inherits_input_reliability() {
        // d = a & q fed back into the latch; q is also the output.
        // With a = 1 and q0 = 0, q stays 0 and its reliability at
        // cycle t is the register-input reliability of cycle t-1.
        let src = "aag 3 1 1 1 1\n2\n4 6\n4\n6 2 4\n";
        let aig = aiger::from_str(src).unwrap();
        let trace = sim::simulate(&aig, &sim::const_stimuli(&aig, 3, true));
        let f = 0.01;
        let records = analyze(&aig, &trace, 3, 8, f).unwrap();
        let pos = po_records(&records);
        assert_eq!(pos.len(), 3);
        assert!((pos[0].reliability - 1.0).abs() < 1e-12);
        assert!((pos[1].reliability - 0.99).abs() < 1e-9);
        let c3 = (1.0 - f) * 0.99 + f * 0.01;
        assert!((pos[2].reliability - c3).abs() < 1e-9);
        // register records are reported as 1.0 by convention
        for r in records.iter().filter(|r| r.kind == EndpointKind::RegisterInput) {
            assert_eq!(r.reliability, 1.0);
        }
    }

    #[test]
    fn test_and_chain_recurrence() {
        // 10 chained and gates, all-ones inputs. Every node has linear
        // fanout, so no sources ever form and the output distribution
        // follows p_k = p_{k-1}(1-f) + (1-p_{k-1})f from p_0 = 1.
        let f = 0.05;
        let n = 10;
        let mut src = format!("aag {} {} 0 1 {}\n", 2 * n + 1, n + 1, n);
        for i in 0..=n {
            src += &format!("{}\n", 2 * (i + 1));
        }
        src += &format!("{}\n", 2 * (2 * n + 1));
        let mut prev = 2; // a0
        for i in 0..n {
            let lhs = 2 * (n + 2 + i);
            src += &format!("{} {} {}\n", lhs, prev, 2 * (i + 2));
            prev = lhs;
        }
        let aig = aiger::from_str(&src).unwrap();
        let trace = sim::simulate(&aig, &sim::const_stimuli(&aig, 1, true));
        let records = analyze(&aig, &trace, 1, 8, f).unwrap();
        let pos = po_records(&records);
        let mut p = 1.0f64;
        for _ in 0..n {
            p = p * (1.0 - f) + (1.0 - p) * f;
        }
        assert!((pos[0].reliability - p).abs() < 1e-9);
    }

    #[test]
    fn test_zero_fault_rate_is_exact() {
        let src = "aag 4 2 0 1 2\n2\n4\n8\n6 2 4\n8 2 6\n";
        let aig = aiger::from_str(src).unwrap();
        for stim in [
            sim::const_stimuli(&aig, 1, true),
            sim::const_stimuli(&aig, 1, false),
            sim::random_stimuli(&aig, 4, 7),
        ] {
            let trace = sim::simulate(&aig, &stim);
            let records = analyze(&aig, &trace, stim.len(), 8, 0.0).unwrap();
            for r in po_records(&records) {
                assert!((r.reliability - 1.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_monotone_in_fault_rate() {
        let src = "aag 4 2 0 1 2\n2\n4\n8\n6 2 4\n8 2 6\n";
        let aig = aiger::from_str(src).unwrap();
        let trace = sim::simulate(&aig, &sim::const_stimuli(&aig, 1, true));
        let mut last = 1.0f64 + 1e-12;
        for f in [0.0, 0.05, 0.15, 0.3, 0.5] {
            let records = analyze(&aig, &trace, 1, 8, f).unwrap();
            let r = po_records(&records)[0].reliability;
            assert!(r <= last + 1e-12, "reliability rose from {} to {} at f={}", last, r, f);
            last = r;
        }
    }

    /// A small sequential benchmark: three latches, a handful of gates,
    /// reconvergent fanout through the state bits.
    fn small_sequential() -> crate::aig::Aig {
        let src = "\
aag 12 2 3 2 7
2
4
6 18
8 20
10 24
16
24
12 2 6
14 4 8
16 13 15
18 12 10
20 16 11
22 16 18
24 22 3
";
        aiger::from_str(src).unwrap()
    }

    #[test]
    fn test_sequential_determinism_and_range() {
        let aig = small_sequential();
        let stim = sim::random_stimuli(&aig, 5, 11);
        let trace = sim::simulate(&aig, &stim);
        let a = analyze(&aig, &trace, 5, 5, 0.01).unwrap();
        let b = analyze(&aig, &trace, 5, 5, 0.01).unwrap();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.reliability, y.reliability);
            assert_eq!((x.cycle, x.index), (y.cycle, y.index));
        }
        for r in po_records(&a) {
            assert!(
                (0.80..=1.0 + 1e-12).contains(&r.reliability),
                "cycle {} output {} out of range: {}",
                r.cycle,
                r.index,
                r.reliability
            );
        }
    }

    #[test]
    fn test_budget_only_approximates_mildly() {
        // two-bit ripple adder: s0, s1 and an inverted carry-out, with
        // heavy reconvergence through the xor trees
        let src = "\
aag 14 4 0 3 10
2
4
6
8
14
26
29
10 2 6
12 3 7
14 11 13
16 4 8
18 5 9
20 17 19
22 20 10
24 21 11
26 23 25
28 17 23
";
        let aig = aiger::from_str(src).unwrap();
        let trials = 100;
        let stim = sim::random_stimuli(&aig, trials, 3);
        let trace = sim::simulate(&aig, &stim);
        let full = analyze(&aig, &trace, trials, 64, 0.02).unwrap();
        let tight = analyze(&aig, &trace, trials, 3, 0.02).unwrap();
        assert_eq!(full.len(), tight.len());
        for (a, b) in full.iter().zip(&tight) {
            assert!(
                (a.reliability - b.reliability).abs() <= 0.05 * a.reliability,
                "cycle {} output {}: {} vs {}",
                a.cycle,
                a.index,
                a.reliability,
                b.reliability
            );
        }
    }

    #[test]
    fn test_budget_trim_exact_at_zero_fault_rate() {
        // max_fs = 2 forces source removal inside the tracker, but
        // with deterministic nominal vectors the marginalization
        // selects exactly the nominal slice, so a fault-free analysis
        // stays exact
        let src = "aag 14 4 0 3 10\n2\n4\n6\n8\n14\n26\n29\n10 2 6\n12 3 7\n14 11 13\n16 4 8\n18 5 9\n20 17 19\n22 20 10\n24 21 11\n26 23 25\n28 17 23\n";
        let aig = aiger::from_str(src).unwrap();
        let trace = sim::simulate(&aig, &sim::const_stimuli(&aig, 1, true));
        let a = analyze(&aig, &trace, 1, 2, 0.0).unwrap();
        for r in po_records(&a) {
            assert!((r.reliability - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_unused_budget_levels_agree() {
        // two budgets that are both never hit must produce identical
        // records
        let src = "aag 4 2 0 1 2\n2\n4\n8\n6 2 4\n8 2 6\n";
        let aig = aiger::from_str(src).unwrap();
        let trace = sim::simulate(&aig, &sim::const_stimuli(&aig, 1, true));
        let a = analyze(&aig, &trace, 1, 64, 0.01).unwrap();
        let b = analyze(&aig, &trace, 1, 1000, 0.01).unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.reliability, y.reliability);
        }
    }

    #[test]
    fn test_missing_nominal_skips_endpoint() {
        let src = "aag 3 2 0 1 1\n2\n4\n6\n6 2 4\n";
        let aig = aiger::from_str(src).unwrap();
        // trace covers the inputs but not the output node
        let mut trace = crate::trace::NominalTrace::new(aig.num_nodes);
        let c = trace.push_cycle();
        trace.set_bool(c, 1, true);
        trace.set_bool(c, 2, true);
        let records = analyze(&aig, &trace, 1, 8, 0.01).unwrap();
        assert!(po_records(&records).is_empty());
    }

    #[test]
    fn test_config_rejected_at_entry() {
        let src = "aag 3 2 0 1 1\n2\n4\n6\n6 2 4\n";
        let aig = aiger::from_str(src).unwrap();
        let trace = sim::simulate(&aig, &sim::const_stimuli(&aig, 1, true));
        assert!(analyze(&aig, &trace, 1, 8, 1.5).is_err());
        assert!(analyze(&aig, &trace, 0, 8, 0.01).is_err());
        assert!(analyze(&aig, &trace, 1, 0, 0.01).is_err());
    }

    #[test]
    fn test_inverted_output_polarity() {
        // y = !(a & b) with a = b = 1: nominal y = 0, and the faulty
        // gate matches it with probability 1 - f
        let src = "aag 3 2 0 1 1\n2\n4\n7\n6 2 4\n";
        let aig = aiger::from_str(src).unwrap();
        let trace = sim::simulate(&aig, &sim::const_stimuli(&aig, 1, true));
        let f = 0.01;
        let records = analyze(&aig, &trace, 1, 8, f).unwrap();
        let pos = po_records(&records);
        assert!((pos[0].reliability - (1.0 - f)).abs() < 1e-12);
    }
}
