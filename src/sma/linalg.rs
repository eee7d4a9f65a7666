// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Linear-algebra primitives the SMA kernel needs: LU-based solve,
//! passive-subset extraction and scatter. Any thread-safe,
//! allocation-explicit linear-algebra facility would do here; this
//! crate uses `nalgebra`, which none of the published behaviour depends
//! on the internals of.

use itertools::iproduct;
use nalgebra::{DMatrix, DVector};

/// Solve `a * x = b` via LU decomposition. Returns `None` if `a` is
/// singular; callers treat that the same as a non-convergent subsystem
/// (best-effort, no error propagated).
pub fn lu_solve(a: &DMatrix<f64>, b: &DVector<f64>) -> Option<DVector<f64>> {
    a.clone().lu().solve(b)
}

/// Extract the square submatrix of `full` at the rows and columns named
/// by `indices`, in the order given.
pub fn select_submatrix(full: &DMatrix<f64>, indices: &[usize]) -> DMatrix<f64> {
    let n = indices.len();
    let mut sub = DMatrix::<f64>::zeros(n, n);
    for (r, c) in iproduct!(0..n, 0..n) {
        sub[(r, c)] = full[(indices[r], indices[c])];
    }
    sub
}

/// Extract the subvector of `full` at `indices`, in the order given.
pub fn select_subvector(full: &DVector<f64>, indices: &[usize]) -> DVector<f64> {
    DVector::from_fn(indices.len(), |r, _| full[indices[r]])
}

/// Scatter `values` (indexed the same way as `passive`) into `dest` at
/// those positions, and zero every position named by `active`.
pub fn scatter(dest: &mut DVector<f64>, passive: &[usize], active: &[usize], values: &DVector<f64>) {
    for &i in active {
        dest[i] = 0.0;
    }
    for (k, &i) in passive.iter().enumerate() {
        dest[i] = values[k];
    }
}
