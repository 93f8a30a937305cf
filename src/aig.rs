// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! And-inverter graph representation for reliability analysis.
//!
//! Nodes are numbered from 0 (the constant-zero node) to `num_nodes - 1`.
//! Signals are encoded as `node << 1 | invert`, so signal 0 is constant
//! false and signal 1 constant true.

/// A D-latch. The output node `q` at cycle `t` carries the value the
/// input signal `d_iv` had at cycle `t - 1`; at the first cycle it is 0.
#[derive(Debug, Default, Clone)]
pub struct Latch {
    /// The next-state input signal with invert (last bit).
    pub d_iv: usize,
    /// The output node.
    pub q: usize,
}

/// The driver type of an AIG node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverType {
    /// Driven by a two-input and gate.
    ///
    /// The inversion bit is stored as the last bit of the two input
    /// signals. Only this type has combinational fan-in.
    AndGate(usize, usize),
    /// Driven by a primary input port (with its input ordinal).
    InputPort(usize),
    /// Driven by a latch output (with its latch index).
    Latch(usize),
    /// Tied to zero. Only node 0 is allowed to have this.
    Tie0,
}

/// A sequential and-inverter graph.
///
/// The structure is immutable after loading; the analysis engine only
/// issues index-based queries against it.
#[derive(Debug, Default)]
pub struct Aig {
    /// Total node count, including the constant node 0.
    pub num_nodes: usize,
    /// The driver of every node, indexed by node.
    pub drivers: Vec<DriverType>,
    /// Primary input nodes, in declaration order.
    pub inputs: Vec<usize>,
    /// Primary output signals with invert (last bit), in declaration order.
    pub outputs: Vec<usize>,
    /// Latches, in declaration order.
    pub latches: Vec<Latch>,
    /// Consumer count per node: and-gate fanins, latch inputs and primary
    /// outputs all count. Indexed by node.
    pub fanout_counts: Vec<u32>,
    /// Nodes in a topological order (fanins before consumers).
    pub topo: Vec<usize>,
    /// Combinational level per node. Inputs, latch outputs and the
    /// constant are at level 0.
    pub levels: Vec<u32>,
    /// Maximum level over all nodes.
    pub depth: u32,
    /// Symbol names from the AIGER symbol table, if present.
    pub input_names: Vec<Option<String>>,
    pub latch_names: Vec<Option<String>>,
    pub output_names: Vec<Option<String>>,
}

impl Aig {
    pub fn is_constant(&self, node: usize) -> bool {
        matches!(self.drivers[node], DriverType::Tie0)
    }

    pub fn is_input(&self, node: usize) -> bool {
        matches!(self.drivers[node], DriverType::InputPort(_))
    }

    /// Whether `node` is a latch (register) output.
    pub fn is_latch_output(&self, node: usize) -> bool {
        matches!(self.drivers[node], DriverType::Latch(_))
    }

    pub fn is_and_gate(&self, node: usize) -> bool {
        matches!(self.drivers[node], DriverType::AndGate(_, _))
    }

    pub fn fanin_size(&self, node: usize) -> usize {
        match self.drivers[node] {
            DriverType::AndGate(_, _) => 2,
            _ => 0,
        }
    }

    pub fn fanout_size(&self, node: usize) -> usize {
        self.fanout_counts[node] as usize
    }

    pub fn num_latches(&self) -> usize {
        self.latches.len()
    }

    /// The local truth table of a node, LSB-first over fanin positions.
    /// Fanin polarity is not part of the local function. Empty for
    /// nodes without combinational fanin.
    pub fn node_function(&self, node: usize) -> Vec<bool> {
        match self.drivers[node] {
            DriverType::AndGate(_, _) => vec![false, false, false, true],
            _ => Vec::new(),
        }
    }

    /// Compute fanout counts, a topological order and levels.
    ///
    /// Called once by the loader after all nodes are in place.
    pub(crate) fn finalize(&mut self) {
        self.fanout_counts = vec![0; self.num_nodes];
        for driver in &self.drivers {
            if let DriverType::AndGate(a_iv, b_iv) = *driver {
                if (a_iv >> 1) != 0 {
                    self.fanout_counts[a_iv >> 1] += 1;
                }
                if (b_iv >> 1) != 0 {
                    self.fanout_counts[b_iv >> 1] += 1;
                }
            }
        }
        for latch in &self.latches {
            if (latch.d_iv >> 1) != 0 {
                self.fanout_counts[latch.d_iv >> 1] += 1;
            }
        }
        for &o_iv in &self.outputs {
            if (o_iv >> 1) != 0 {
                self.fanout_counts[o_iv >> 1] += 1;
            }
        }

        self.topo = self.topo_traverse();

        self.levels = vec![0; self.num_nodes];
        self.depth = 0;
        for &u in &self.topo {
            if let DriverType::AndGate(a_iv, b_iv) = self.drivers[u] {
                let la = self.levels[a_iv >> 1];
                let lb = self.levels[b_iv >> 1];
                self.levels[u] = la.max(lb) + 1;
                self.depth = self.depth.max(self.levels[u]);
            }
        }
    }

    /// Depth-first topological order over all nodes. Fanins of every and
    /// gate appear before the gate itself; inputs and latch outputs may
    /// appear in any relative order.
    ///
    /// Iterative with an explicit stack: deep circuits overflow a
    /// recursive walk.
    fn topo_traverse(&self) -> Vec<usize> {
        let mut vis = vec![false; self.num_nodes];
        let mut ret = Vec::with_capacity(self.num_nodes);
        let mut stack: Vec<(usize, bool)> = Vec::new();
        for root in 0..self.num_nodes {
            if vis[root] {
                continue;
            }
            stack.push((root, false));
            while let Some((u, expanded)) = stack.pop() {
                if expanded {
                    ret.push(u);
                    continue;
                }
                if vis[u] {
                    continue;
                }
                vis[u] = true;
                stack.push((u, true));
                if let DriverType::AndGate(a_iv, b_iv) = self.drivers[u] {
                    for f_iv in [b_iv, a_iv] {
                        if (f_iv >> 1) != 0 && !vis[f_iv >> 1] {
                            stack.push((f_iv >> 1, false));
                        }
                    }
                }
            }
        }
        ret
    }
}
