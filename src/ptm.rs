// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! Probabilistic transfer matrix construction.
//!
//! Each AIG node gets one matrix when the analysis starts. Fanin
//! polarity is never folded into the matrix: inverters are handled by
//! the tracker as a column swap on the upstream operand, so the matrix
//! stays a pure function of the node's truth table.

use nalgebra::DMatrix;

use crate::aig::{Aig, DriverType};

/// The transfer behavior of one node, selected by its driver type.
#[derive(Debug, Clone)]
pub enum GatePtm {
    /// The constant-zero node. No transfer matrix; its distribution is
    /// `[1, 0]`.
    Constant,
    /// A primary input. Its distribution comes from the nominal trace.
    Input,
    /// A latch output. Its distribution is inherited from the previous
    /// cycle's register input; faults are accounted there.
    LatchOutput,
    /// A combinational gate with a `(2^k, 2)` row-stochastic matrix.
    Comb(DMatrix<f64>),
}

impl GatePtm {
    /// Build the matrix for one node under the given fault rate.
    pub fn for_node(aig: &Aig, node: usize, fault_rate: f64) -> GatePtm {
        match aig.drivers[node] {
            DriverType::Tie0 => GatePtm::Constant,
            DriverType::InputPort(_) => GatePtm::Input,
            DriverType::Latch(_) => GatePtm::LatchOutput,
            DriverType::AndGate(_, _) => {
                GatePtm::Comb(comb_from_truth_table(&aig.node_function(node), fault_rate))
            }
        }
    }

    pub fn as_comb(&self) -> Option<&DMatrix<f64>> {
        match self {
            GatePtm::Comb(m) => Some(m),
            _ => None,
        }
    }
}

/// Build a `(2^k, 2)` transfer matrix from a truth table of `2^k` bits.
///
/// Row `i` is indexed LSB-first over fanin positions. A set truth-table
/// bit makes the row `[0, 1]`, a clear bit `[1, 0]`; the fault rate then
/// perturbs every row by `p <- p*(1-f) + (1-p)*f`.
pub fn comb_from_truth_table(tt: &[bool], fault_rate: f64) -> DMatrix<f64> {
    let rows = tt.len();
    debug_assert!(rows.is_power_of_two());
    let f = fault_rate;
    DMatrix::from_fn(rows, 2, |i, j| {
        let p = match (tt[i], j) {
            (true, 1) | (false, 0) => 1.0,
            _ => 0.0,
        };
        p * (1.0 - f) + (1.0 - p) * f
    })
}
