// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! Built-in nominal logic simulator.
//!
//! Evaluates the AIG cycle by cycle under deterministic input stimuli,
//! producing the fault-free reference trace the analysis contracts
//! against. Latches initialize to 0 and capture their input at the end
//! of each cycle.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::aig::{Aig, DriverType};
use crate::trace::NominalTrace;

/// Simulate `stimuli.len()` cycles; `stimuli[t][k]` is the value of the
/// `k`-th primary input during cycle `t + 1`. Missing entries read as 0.
///
/// The returned trace covers every node of the AIG.
pub fn simulate(aig: &Aig, stimuli: &[Vec<bool>]) -> NominalTrace {
    let mut trace = NominalTrace::new(aig.num_nodes);
    let mut latch_state = vec![false; aig.num_latches()];
    let mut values = vec![false; aig.num_nodes];

    for cycle_inputs in stimuli {
        let cycle = trace.push_cycle();
        for &u in &aig.topo {
            values[u] = match aig.drivers[u] {
                DriverType::Tie0 => false,
                DriverType::InputPort(ord) => cycle_inputs.get(ord).copied().unwrap_or(false),
                DriverType::Latch(idx) => latch_state[idx],
                DriverType::AndGate(a_iv, b_iv) => {
                    let a = values[a_iv >> 1] ^ (a_iv & 1 == 1);
                    let b = values[b_iv >> 1] ^ (b_iv & 1 == 1);
                    a && b
                }
            };
            trace.set_bool(cycle, u, values[u]);
        }
        for (idx, latch) in aig.latches.iter().enumerate() {
            latch_state[idx] = values[latch.d_iv >> 1] ^ (latch.d_iv & 1 == 1);
        }
    }
    trace
}

/// Reproducible uniform-random input stimuli for `cycles` cycles.
pub fn random_stimuli(aig: &Aig, cycles: usize, seed: u64) -> Vec<Vec<bool>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..cycles)
        .map(|_| (0..aig.inputs.len()).map(|_| rng.gen()).collect())
        .collect()
}

/// All-ones stimuli, handy for chain benchmarks.
pub fn const_stimuli(aig: &Aig, cycles: usize, value: bool) -> Vec<Vec<bool>> {
    vec![vec![value; aig.inputs.len()]; cycles]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aiger;

    #[test]
    fn test_combinational_eval() {
        // g1 = a & b, g2 = g1 & !a  (always 0)
        let src = "aag 4 2 0 2 2\n2\n4\n6\n8\n6 2 4\n8 6 3\n";
        let aig = aiger::from_str(src).unwrap();
        let trace = simulate(&aig, &[vec![true, true]]);
        assert_eq!(trace.value(3, 1), Some([0.0, 1.0]));
        assert_eq!(trace.value(4, 1), Some([1.0, 0.0]));
    }

    #[test]
    fn test_latch_delays_by_one_cycle() {
        // latch q with next-state = a
        let src = "aag 2 1 1 1 0\n2\n4 2\n4\n";
        let aig = aiger::from_str(src).unwrap();
        let stim = vec![vec![true], vec![false], vec![true]];
        let trace = simulate(&aig, &stim);
        // q starts 0, then mirrors a with one cycle delay
        assert_eq!(trace.value(2, 1), Some([1.0, 0.0]));
        assert_eq!(trace.value(2, 2), Some([0.0, 1.0]));
        assert_eq!(trace.value(2, 3), Some([1.0, 0.0]));
    }

    #[test]
    fn test_random_stimuli_reproducible() {
        let src = "aag 2 2 0 0 0\n2\n4\n";
        let aig = aiger::from_str(src).unwrap();
        let a = random_stimuli(&aig, 16, 42);
        let b = random_stimuli(&aig, 16, 42);
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
        assert_eq!(a[0].len(), 2);
    }
}
