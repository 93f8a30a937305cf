// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! Source priorities and removal-list selection.
//!
//! A node's priority estimates how expensive it is to keep that node
//! explicit in downstream fanout-source lists. When a list overflows the
//! budget, the highest-priority sources are marginalized first.

use crate::aig::{Aig, DriverType};
use crate::fslist::dedup_preserve;

/// Weights of the priority combination.
#[derive(Debug, Clone, Copy)]
pub struct PriorityWeights {
    /// Attenuation of the backward pre-score, in `(0, 1]`.
    pub theta: f64,
    /// Weight of the normalized pre-score.
    pub lambda_pre: f64,
    /// Weight of the normalized suc-score.
    pub lambda_suc: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        PriorityWeights {
            theta: 0.8,
            lambda_pre: 0.75,
            lambda_suc: 0.25,
        }
    }
}

/// Compute the per-node priorities for one cycle.
///
/// The pre-score accumulates attenuated fanin scores plus the node's
/// fanout-source list length; list lengths are taken from the previous
/// cycle (`prev_fs_len`, zeros at the first cycle) since the current
/// cycle's lists do not exist yet when the walk starts. The suc-score is
/// the forward distance to the deepest level. Both are normalized by
/// their sums before weighting.
pub fn compute_priorities(aig: &Aig, prev_fs_len: &[usize], w: &PriorityWeights) -> Vec<f64> {
    let n = aig.num_nodes;
    let mut pre = vec![0.0f64; n];
    for &u in &aig.topo {
        pre[u] = match aig.drivers[u] {
            DriverType::AndGate(a_iv, b_iv) => {
                w.theta * (pre[a_iv >> 1] + pre[b_iv >> 1]) + prev_fs_len[u] as f64
            }
            _ => 1.0,
        };
    }
    let mut suc = vec![0.0f64; n];
    for u in 0..n {
        suc[u] = (aig.depth - aig.levels[u]) as f64;
    }

    let pre_sum: f64 = pre.iter().sum();
    let suc_sum: f64 = suc.iter().sum();
    let pre_norm = if pre_sum > 0.0 { pre_sum } else { 1.0 };
    let suc_norm = if suc_sum > 0.0 { suc_sum } else { 1.0 };

    (0..n)
        .map(|u| w.lambda_pre * pre[u] / pre_norm + w.lambda_suc * suc[u] / suc_norm)
        .collect()
}

/// Trim a candidate source list to the budget.
///
/// Deduplicates `candidates` in place; if it still exceeds `m_fs`,
/// selects the `len - m_fs` highest-priority sources (ties broken by
/// smaller node index), removes them from `candidates` and returns them,
/// most expensive first. Returns an empty list when within budget.
pub fn removal_list(
    candidates: &mut Vec<usize>,
    m_fs: usize,
    priorities: &[f64],
) -> Vec<usize> {
    dedup_preserve(candidates);
    if candidates.len() <= m_fs {
        return Vec::new();
    }
    let remove_count = candidates.len() - m_fs;
    let mut ranked: Vec<usize> = candidates.clone();
    ranked.sort_by(|&a, &b| {
        priorities[b]
            .partial_cmp(&priorities[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    let removal: Vec<usize> = ranked.into_iter().take(remove_count).collect();
    candidates.retain(|e| !removal.contains(e));
    removal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aiger;

    #[test]
    fn test_pre_scores_accumulate_along_chain() {
        // g1 = a & b, g2 = g1 & a
        let src = "aag 4 2 0 1 2\n2\n4\n8\n6 2 4\n8 6 2\n";
        let aig = aiger::from_str(src).unwrap();
        let w = PriorityWeights::default();
        let prev = vec![0usize; aig.num_nodes];
        let p = compute_priorities(&aig, &prev, &w);
        // deeper nodes accumulate more pre-score but lose suc-score;
        // with default weights the pre term dominates on this chain
        assert!(p[4] > p[3]);
        assert!(p[3] > 0.0);
    }

    #[test]
    fn test_removal_selects_highest_priority_first() {
        let priorities = vec![0.0, 0.5, 0.9, 0.1, 0.7];
        let mut cand = vec![1, 2, 3, 4];
        let removed = removal_list(&mut cand, 2, &priorities);
        assert_eq!(removed, vec![2, 4]);
        assert_eq!(cand, vec![1, 3]);
    }

    #[test]
    fn test_removal_ties_break_by_index() {
        let priorities = vec![0.0, 0.5, 0.5, 0.5];
        let mut cand = vec![3, 1, 2];
        let removed = removal_list(&mut cand, 1, &priorities);
        assert_eq!(removed, vec![1, 2]);
        assert_eq!(cand, vec![3]);
    }

    #[test]
    fn test_no_removal_at_exact_budget() {
        let priorities = vec![0.0; 8];
        let mut cand = vec![5, 6, 7];
        let removed = removal_list(&mut cand, 3, &priorities);
        assert!(removed.is_empty());
        assert_eq!(cand, vec![5, 6, 7]);
    }

    #[test]
    fn test_removal_dedups_before_counting() {
        let priorities = vec![0.0; 8];
        let mut cand = vec![5, 6, 5, 6, 7];
        let removed = removal_list(&mut cand, 3, &priorities);
        assert!(removed.is_empty());
        assert_eq!(cand, vec![5, 6, 7]);
    }
}
