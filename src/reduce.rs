// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! Dimension reduction of conditional matrices.
//!
//! Marginalizing a source out of a downstream matrix contracts its row
//! dimension against the source's nominal distribution. This is exact
//! when the source's contribution factorizes through its nominal value
//! and a controlled approximation otherwise; it is the accuracy/size
//! trade-off that keeps matrix heights bounded.

use nalgebra::DMatrix;

use crate::error::Result;
use crate::fslist::FsEntry;

/// Marginalize the sources in `removal` out of `(sources, mat)`.
///
/// Walks `sources` in order building a row selector: a kept source
/// tensors in `I2` and stays in the output list, a removed source
/// tensors in its nominal `1x2` distribution row. The selector applied
/// to `mat` yields the reduced matrix over the surviving sources.
pub fn marginalize(
    entry: &FsEntry,
    removal: &[usize],
    nominal: impl Fn(usize) -> [f64; 2],
) -> Result<FsEntry> {
    entry.check_shape()?;

    let mut selector = DMatrix::from_element(1, 1, 1.0);
    let mut kept = Vec::with_capacity(entry.sources.len());
    let identity2 = DMatrix::<f64>::identity(2, 2);
    for &e in &entry.sources {
        if removal.contains(&e) {
            let v = nominal(e);
            let v_row = DMatrix::from_row_slice(1, 2, &v);
            selector = selector.kronecker(&v_row);
        } else {
            selector = selector.kronecker(&identity2);
            kept.push(e);
        }
    }

    let out = FsEntry {
        sources: kept,
        mat: &selector * &entry.mat,
    };
    out.check_shape()?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    fn uniform(_: usize) -> [f64; 2] {
        [0.5, 0.5]
    }

    #[test]
    fn test_empty_removal_is_identity() {
        let entry = FsEntry {
            sources: vec![3, 5],
            mat: DMatrix::from_fn(4, 2, |i, j| (i * 2 + j) as f64),
        };
        let out = marginalize(&entry, &[], uniform).unwrap();
        assert_eq!(out.sources, entry.sources);
        assert_eq!(out.mat, entry.mat);
    }

    #[test]
    fn test_marginalize_branch_operand_yields_nominal_row() {
        let entry = FsEntry::branch(7);
        let out = marginalize(&entry, &[7], |_| [0.9, 0.1]).unwrap();
        assert!(out.sources.is_empty());
        assert_eq!(out.mat.nrows(), 1);
        assert!((out.mat[(0, 0)] - 0.9).abs() < 1e-12);
        assert!((out.mat[(0, 1)] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_marginalize_one_of_two_sources() {
        // rows indexed (s3, s5) MSB-first; remove s5 against [0.25, 0.75]
        let entry = FsEntry {
            sources: vec![3, 5],
            mat: DMatrix::from_row_slice(
                4,
                2,
                &[
                    1.0, 0.0, //
                    0.0, 1.0, //
                    0.5, 0.5, //
                    0.2, 0.8,
                ],
            ),
        };
        let out = marginalize(&entry, &[5], |e| {
            assert_eq!(e, 5);
            [0.25, 0.75]
        })
        .unwrap();
        assert_eq!(out.sources, vec![3]);
        assert_eq!(out.mat.nrows(), 2);
        // row (s3=0) = 0.25*row00 + 0.75*row01
        assert!((out.mat[(0, 0)] - 0.25).abs() < 1e-12);
        assert!((out.mat[(0, 1)] - 0.75).abs() < 1e-12);
        // row (s3=1) = 0.25*row10 + 0.75*row11
        assert!((out.mat[(1, 0)] - (0.25 * 0.5 + 0.75 * 0.2)).abs() < 1e-12);
        assert!((out.mat[(1, 1)] - (0.25 * 0.5 + 0.75 * 0.8)).abs() < 1e-12);
    }

    #[test]
    fn test_shape_mismatch_is_fatal() {
        let entry = FsEntry {
            sources: vec![1, 2],
            mat: DMatrix::identity(2, 2),
        };
        assert!(marginalize(&entry, &[], uniform).is_err());
    }
}
