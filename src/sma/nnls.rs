// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Lawson-Hanson non-negative least squares (Lawson & Hanson 1974,
//! "Solving Least Squares Problems"), the active-set algorithm behind
//! the `positivity` SMA mode.
//!
//! Maintains a passive set `P` (indices currently free to take a
//! positive value) and an active set `R` (indices held at zero). The
//! sentinel used for "not a candidate for min-ratio" is `f64::MAX`: any
//! sufficiently large finite float works equivalently, and `f64::MAX`
//! cannot itself be the true minimum ratio because a real ratio is
//! always produced by at least one candidate once the inner loop's
//! condition is true.

use nalgebra::{DMatrix, DVector};

use super::linalg::{lu_solve, scatter, select_subvector, select_submatrix};
use crate::constants::NNLS_ITMAX_FACTOR;

/// Solve `zt_z * d ~= zt_x` for `d >= 0` by Lawson-Hanson NNLS. Never
/// fails: if the iteration cap is reached before convergence, the
/// current best `d` is returned rather than propagating an error.
pub fn solve(zt_z: &DMatrix<f64>, zt_x: &DVector<f64>) -> DVector<f64> {
    let m = zt_z.nrows();
    let itmax = NNLS_ITMAX_FACTOR * m;
    let tol = f64::MIN_POSITIVE;
    const NOT_A_CANDIDATE: f64 = f64::MAX;

    let mut passive: Vec<usize> = Vec::with_capacity(m);
    let mut active: Vec<usize> = (0..m).collect();
    let mut d = DVector::<f64>::zeros(m);
    let mut s = DVector::<f64>::zeros(m);
    let mut iterations = 0usize;

    let mut w = zt_x - zt_z * &d;

    loop {
        let candidate = active
            .iter()
            .copied()
            .max_by(|&i, &j| w[i].partial_cmp(&w[j]).unwrap());
        let Some(chosen) = candidate else { break };
        if w[chosen] <= tol {
            break;
        }

        active.retain(|&i| i != chosen);
        passive.push(chosen);

        let mut s_p = solve_passive(zt_z, zt_x, &passive);
        scatter(&mut s, &passive, &active, &s_p);

        while passive.iter().any(|&i| s[i] <= 0.0) && iterations < itmax {
            iterations += 1;

            let mut alpha = NOT_A_CANDIDATE;
            for &i in &passive {
                if s[i] <= tol {
                    let ratio = d[i] / (d[i] - s[i]);
                    if ratio < alpha {
                        alpha = ratio;
                    }
                }
            }

            for i in 0..m {
                d[i] += alpha * (s[i] - d[i]);
            }

            let mut demoted = Vec::new();
            passive.retain(|&i| {
                if d[i].abs() < tol {
                    demoted.push(i);
                    false
                } else {
                    true
                }
            });
            active.extend(demoted);

            s_p = solve_passive(zt_z, zt_x, &passive);
            scatter(&mut s, &passive, &active, &s_p);
        }

        d.copy_from(&s);
        w = zt_x - zt_z * &d;
        for &i in &passive {
            w[i] = -1.0;
        }

        if iterations >= itmax {
            break;
        }
    }

    d
}

fn solve_passive(zt_z: &DMatrix<f64>, zt_x: &DVector<f64>, passive: &[usize]) -> DVector<f64> {
    if passive.is_empty() {
        return DVector::zeros(0);
    }
    let sub_a = select_submatrix(zt_z, passive);
    let sub_b = select_subvector(zt_x, passive);
    lu_solve(&sub_a, &sub_b).unwrap_or_else(|| DVector::zeros(passive.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nnls_recovers_exact_convex_combination() {
        // Z = [[0.1, 0.4], [0.5, 0.2]]; x = 0.5*E1 + 0.5*E2 = [0.25, 0.35].
        let z = DMatrix::from_row_slice(2, 2, &[0.1, 0.4, 0.5, 0.2]);
        let x = DVector::from_vec(vec![0.25, 0.35]);
        let zt_z = z.transpose() * &z;
        let zt_x = z.transpose() * &x;

        let d = solve(&zt_z, &zt_x);
        assert!(d.iter().all(|&v| v >= -1e-9));
        assert!((d[0] - 0.5).abs() < 1e-6);
        assert!((d[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn nnls_enforces_non_negativity_when_unconstrained_solution_is_negative() {
        // Pick Z, x such that the unconstrained least-squares solution has
        // a negative component; NNLS must still return d >= 0.
        let z = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 0.0, 1.0]);
        let x = DVector::from_vec(vec![0.1, 10.0]);
        let zt_z = z.transpose() * &z;
        let zt_x = z.transpose() * &x;

        let d = solve(&zt_z, &zt_x);
        assert!(d.iter().all(|&v| v >= -1e-9));
    }
}
