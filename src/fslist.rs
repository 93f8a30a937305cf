// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! Fanout-source list algebra.
//!
//! An [`FsEntry`] pairs an ordered list of source node indices with a
//! conditional matrix whose rows are indexed MSB-first by the list
//! positions: the bit for `sources[j]` sits at position `len - 1 - j` of
//! the row code. Merging two entries is the only place tensor growth
//! happens.

use nalgebra::DMatrix;

use crate::error::{RelError, Result};

/// An ordered fanout-source list together with its conditional matrix.
#[derive(Debug, Clone)]
pub struct FsEntry {
    pub sources: Vec<usize>,
    pub mat: DMatrix<f64>,
}

impl FsEntry {
    /// The neutral merge operand: no sources, a single scalar row `[1]`.
    pub fn unit() -> FsEntry {
        FsEntry {
            sources: Vec::new(),
            mat: DMatrix::from_element(1, 1, 1.0),
        }
    }

    /// A branching source read through the identity: `({node}, I2)`.
    pub fn branch(node: usize) -> FsEntry {
        FsEntry {
            sources: vec![node],
            mat: DMatrix::identity(2, 2),
        }
    }

    /// A sourceless `1x2` distribution row.
    pub fn row(p0: f64, p1: f64) -> FsEntry {
        FsEntry {
            sources: Vec::new(),
            mat: DMatrix::from_row_slice(1, 2, &[p0, p1]),
        }
    }

    /// An accumulator pre-seeded with a source list but the scalar
    /// matrix. Row lookups fall back to row 0 until a merge widens the
    /// matrix, which the modulo indexing of [`merge`] handles.
    pub fn seeded(sources: Vec<usize>) -> FsEntry {
        FsEntry {
            sources,
            mat: DMatrix::from_element(1, 1, 1.0),
        }
    }

    /// Apply an inverter: swap the two output columns.
    pub fn invert(&mut self) {
        debug_assert_eq!(self.mat.ncols(), 2);
        self.mat.swap_columns(0, 1);
    }

    /// Check the row-count invariant against the source list.
    pub fn check_shape(&self) -> Result<()> {
        let expected = 1usize << self.sources.len();
        if self.mat.nrows() != expected {
            return Err(RelError::ShapeMismatch {
                rows: self.mat.nrows(),
                sources: self.sources.len(),
                expected,
            });
        }
        Ok(())
    }

    /// Merge another operand into this one.
    ///
    /// The combined source list is `self.sources` followed by the unseen
    /// entries of `other.sources`; each row of the result is the
    /// Kronecker product of the operand rows selected by decomposing the
    /// joint row code. A source shared by both operands drives both row
    /// selections from the same bit, which is what identifies the two
    /// views of that source.
    pub fn merge(&mut self, other: &FsEntry) {
        let mut joint = self.sources.clone();
        for &e in &other.sources {
            if !joint.contains(&e) {
                joint.push(e);
            }
        }

        let rows = 1usize << joint.len();
        let cols = self.mat.ncols() * other.mat.ncols();
        let mut out = DMatrix::zeros(rows, cols);
        for code in 0..rows {
            let c1 = decompose_code(code, &joint, &self.sources);
            let c2 = decompose_code(code, &joint, &other.sources);
            let r1 = self.mat.row(c1 % self.mat.nrows());
            let r2 = other.mat.row(c2 % other.mat.nrows());
            out.row_mut(code).copy_from(&r1.kronecker(&r2));
        }

        self.sources = joint;
        self.mat = out;
    }
}

/// Extract the sub-code of `part` out of a row code over `joint`.
///
/// For each element of `part`, its bit is read from the MSB-first
/// position of its occurrence in `joint` and written to the MSB-first
/// position within `part`. Elements absent from `joint` contribute 0.
pub fn decompose_code(code: usize, joint: &[usize], part: &[usize]) -> usize {
    let mut sub = 0usize;
    for (j, &e) in part.iter().enumerate() {
        if let Some(pos) = joint.iter().position(|&x| x == e) {
            if code & (1 << (joint.len() - 1 - pos)) != 0 {
                sub |= 1 << (part.len() - 1 - j);
            }
        }
    }
    sub
}

/// Deduplicate in place, keeping the first occurrence of each index.
pub fn dedup_preserve(list: &mut Vec<usize>) {
    let mut seen = Vec::with_capacity(list.len());
    list.retain(|&e| {
        if seen.contains(&e) {
            false
        } else {
            seen.push(e);
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompose_code() {
        let joint = vec![7, 3, 5];
        // code 0b101: node 7 -> 1, node 3 -> 0, node 5 -> 1
        assert_eq!(decompose_code(0b101, &joint, &[7]), 1);
        assert_eq!(decompose_code(0b101, &joint, &[3]), 0);
        assert_eq!(decompose_code(0b101, &joint, &[5, 7]), 0b11);
        assert_eq!(decompose_code(0b101, &joint, &[3, 5]), 0b01);
    }

    #[test]
    fn test_merge_disjoint_sources() {
        let mut a = FsEntry::branch(1);
        a.merge(&FsEntry::branch(2));
        assert_eq!(a.sources, vec![1, 2]);
        assert_eq!(a.mat.nrows(), 4);
        assert_eq!(a.mat.ncols(), 4);
        // row code (n1, n2) = (1, 0) selects column (1, 0)
        let expect = DMatrix::identity(4, 4);
        assert_eq!(a.mat, expect);
    }

    #[test]
    fn test_merge_commutes_up_to_column_permutation() {
        let mut ab = FsEntry::branch(1);
        ab.merge(&FsEntry::branch(2));
        let mut ba = FsEntry::branch(2);
        ba.merge(&FsEntry::branch(1));
        assert_eq!(ba.sources, vec![2, 1]);
        // entry [(x1,x2) row, (c1,c2) col] of ab equals
        // [(x2,x1) row, (c2,c1) col] of ba
        for x1 in 0..2 {
            for x2 in 0..2 {
                for c1 in 0..2 {
                    for c2 in 0..2 {
                        assert_eq!(
                            ab.mat[(x1 * 2 + x2, c1 * 2 + c2)],
                            ba.mat[(x2 * 2 + x1, c2 * 2 + c1)]
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_merge_shared_source_adds_no_rows() {
        let mut a = FsEntry::branch(4);
        a.merge(&FsEntry::row(0.3, 0.7));
        let before_rows = a.mat.nrows();
        let before = a.clone();
        a.merge(&FsEntry::branch(4));
        assert_eq!(a.sources, before.sources);
        assert_eq!(a.mat.nrows(), before_rows);
        // the shared bit drives both views: each row keeps its old
        // payload in the half selected by its own code
        for code in 0..2 {
            for c in 0..before.mat.ncols() {
                assert_eq!(a.mat[(code, c * 2 + code)], before.mat[(code, c)]);
                assert_eq!(a.mat[(code, c * 2 + (1 - code))], 0.0);
            }
        }
    }

    #[test]
    fn test_merge_into_unit_keeps_operand() {
        let mut acc = FsEntry::unit();
        let op = FsEntry::row(0.25, 0.75);
        acc.merge(&op);
        assert!(acc.sources.is_empty());
        assert_eq!(acc.mat, op.mat);
    }

    #[test]
    fn test_seeded_accumulator_broadcasts() {
        // seeded list [5, 2] with scalar matrix: merging a 1x2 row over
        // [5] must produce 4 rows selecting the operand by node 5's bit
        let mut acc = FsEntry::seeded(vec![5, 2]);
        let op = FsEntry {
            sources: vec![5],
            mat: DMatrix::from_row_slice(2, 2, &[0.9, 0.1, 0.2, 0.8]),
        };
        acc.merge(&op);
        assert_eq!(acc.sources, vec![5, 2]);
        assert_eq!(acc.mat.nrows(), 4);
        for code in 0..4 {
            let bit5 = code >> 1;
            assert_eq!(acc.mat[(code, 0)], op.mat[(bit5, 0)]);
            assert_eq!(acc.mat[(code, 1)], op.mat[(bit5, 1)]);
        }
    }

    #[test]
    fn test_check_shape() {
        let good = FsEntry::branch(3);
        assert!(good.check_shape().is_ok());
        let bad = FsEntry {
            sources: vec![1, 2],
            mat: DMatrix::identity(2, 2),
        };
        assert!(bad.check_shape().is_err());
    }

    #[test]
    fn test_dedup_preserve() {
        let mut v = vec![3, 1, 3, 2, 1];
        dedup_preserve(&mut v);
        assert_eq!(v, vec![3, 1, 2]);
    }
}
