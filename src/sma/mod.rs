// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Per-pixel Spectral Mixture Analysis (Adams et al. 1986), the hardest
//! subsystem: a linear-algebra inner loop (LU inversion on a changing
//! active subset, when `positivity` is set) inside a parallel pixel
//! loop.

pub mod linalg;
pub mod nnls;

use log::{debug, trace};
use nalgebra::{DMatrix, DVector};
use ndarray::{parallel::prelude::*, prelude::*};
use serde::{Deserialize, Serialize};

use crate::constants::SCALE_10000;
use crate::data::ArdFrame;

/// Parameters governing one SMA dispatch. `selected_endmember` is
/// 1-based.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SmaParams {
    pub positivity: bool,
    pub sum_to_one: bool,
    pub shade_normalize: bool,
    pub emit_rms: bool,
    pub selected_endmember: usize,
}

/// Round `value` to the nearest integer and clip it into `i16`,
/// substituting `nodata` on overflow. SMA fraction/RMSE outputs are
/// rounded rather than truncated, unlike the truncate-toward-zero
/// scalar kernels.
#[inline]
fn round_to_i16(value: f64, nodata: i16) -> i16 {
    if !value.is_finite() {
        return nodata;
    }
    let rounded = value.round();
    if rounded < i16::MIN as f64 || rounded > i16::MAX as f64 {
        nodata
    } else {
        rounded as i16
    }
}

/// Precomputed, read-shared state for one SMA dispatch: the (possibly
/// sum-to-one-augmented) endmember matrix and its Gram matrix `Z^T Z`,
/// computed once outside the pixel loop.
pub struct EndmemberModel {
    z: DMatrix<f64>,
    zt_z: DMatrix<f64>,
    num_endmembers: usize,
}

impl EndmemberModel {
    /// `endmembers` has shape `(num_bands, num_endmembers)`, in
    /// reflectance units already (i.e. not scaled integers).
    pub fn new(endmembers: ArrayView2<f64>, sum_to_one: bool) -> Self {
        let (num_bands, num_endmembers) = (endmembers.shape()[0], endmembers.shape()[1]);
        let effective_rows = if sum_to_one { num_bands + 1 } else { num_bands };

        let z = DMatrix::from_fn(effective_rows, num_endmembers, |r, c| {
            if sum_to_one && r == effective_rows - 1 {
                1.0
            } else {
                endmembers[[r, c]]
            }
        });
        let zt_z = z.transpose() * &z;

        Self {
            z,
            zt_z,
            num_endmembers,
        }
    }

    fn effective_rows(&self) -> usize {
        self.z.nrows()
    }
}

/// Solve the unmixing problem for one pixel's observation vector and
/// write the retained fraction (and, if requested, the residual RMSE)
/// to the caller's output buffers.
///
/// Parallel over the pixel axis with a dynamic, 1-pixel granularity
/// partition: the NNLS inner loop's runtime varies widely between
/// pixels, so a static chunked split would leave threads imbalanced.
pub fn run_sma(
    model: &EndmemberModel,
    params: &SmaParams,
    ard: &[ArdFrame],
    global_mask: Option<ArrayView1<u8>>,
    mut tss: ArrayViewMut2<i16>,
    mut rms: Option<ArrayViewMut2<i16>>,
    nodata: i16,
) {
    debug!(
        "Running SMA: {} endmembers, positivity={}, sum_to_one={}, shade_normalize={}",
        model.num_endmembers, params.positivity, params.sum_to_one, params.shade_normalize
    );

    let num_dates = ard.len();
    let num_bands = ard.first().map(|f| f.num_bands()).unwrap_or(0);

    // `tss` and (when present) `rms` are written by the same worker for
    // a given pixel, so the two cases are driven separately rather than
    // threading an `Option` through one zipped iterator.
    match rms.as_mut() {
        Some(rms) => {
            tss.axis_iter_mut(Axis(1))
                .into_par_iter()
                .with_min_len(1)
                .zip(rms.axis_iter_mut(Axis(1)).into_par_iter())
                .enumerate()
                .for_each(|(p, (mut tss_col, mut rms_col))| {
                    if mask_rejects(global_mask.as_ref(), p) {
                        tss_col.fill(nodata);
                        rms_col.fill(nodata);
                        return;
                    }
                    for (t, frame) in ard.iter().enumerate() {
                        if !frame.is_valid(p) {
                            tss_col[t] = nodata;
                            rms_col[t] = nodata;
                            continue;
                        }
                        let (retained, residual_rms) =
                            solve_pixel(model, params, frame, p, num_bands, nodata);
                        tss_col[t] = retained;
                        rms_col[t] = residual_rms.unwrap_or(nodata);
                    }
                });
        }
        None => {
            tss.axis_iter_mut(Axis(1))
                .into_par_iter()
                .with_min_len(1)
                .enumerate()
                .for_each(|(p, mut tss_col)| {
                    if mask_rejects(global_mask.as_ref(), p) {
                        tss_col.fill(nodata);
                        return;
                    }
                    for (t, frame) in ard.iter().enumerate() {
                        if !frame.is_valid(p) {
                            tss_col[t] = nodata;
                            continue;
                        }
                        let (retained, _) = solve_pixel(model, params, frame, p, num_bands, nodata);
                        tss_col[t] = retained;
                    }
                });
        }
    }

    trace!("SMA pixel loop complete for {} dates", num_dates);
}

#[inline]
fn mask_rejects(global_mask: Option<&ArrayView1<u8>>, p: usize) -> bool {
    matches!(global_mask, Some(mask) if mask[p] == 0)
}

/// Solve the unmixing problem for a single (date, pixel) cell. Returns
/// the scaled, clipped retained fraction and (if RMSE is wanted by the
/// caller) the scaled, clipped residual RMSE.
fn solve_pixel(
    model: &EndmemberModel,
    params: &SmaParams,
    frame: &ArdFrame,
    p: usize,
    num_bands: usize,
    nodata: i16,
) -> (i16, Option<i16>) {
    let x = build_observation(frame, p, num_bands, model.effective_rows(), params.sum_to_one);
    let zt_x = model.z.transpose() * &x;

    let mut d = if params.positivity {
        nnls::solve(&model.zt_z, &zt_x)
    } else {
        linalg::lu_solve(&model.zt_z, &zt_x).unwrap_or_else(|| DVector::zeros(model.num_endmembers))
    };

    let residual_rms = if params.emit_rms {
        let residual = &x - &model.z * &d;
        let l = model.effective_rows() as f64;
        let rmse = (residual.dot(&residual) / l).sqrt();
        Some(round_to_i16(rmse * SCALE_10000, nodata))
    } else {
        None
    };

    if params.shade_normalize {
        apply_shade_normalization(&mut d);
    }

    let selected = d[params.selected_endmember - 1];
    (round_to_i16(selected * SCALE_10000, nodata), residual_rms)
}

fn build_observation(
    frame: &ArdFrame,
    p: usize,
    num_bands: usize,
    effective_rows: usize,
    sum_to_one: bool,
) -> DVector<f64> {
    DVector::from_fn(effective_rows, |r, _| {
        if sum_to_one && r == effective_rows - 1 {
            1.0
        } else {
            debug_assert!(r < num_bands);
            frame.band_value(r, p) as f64 / SCALE_10000
        }
    })
}

/// Treat the last endmember as shade (Shimabukuro & Smith 1991):
/// `f = 1 / (1 - d[M-1])`, scale the rest by `f`, and zero the shade
/// fraction. Applied after residual computation, before fraction
/// selection.
fn apply_shade_normalization(d: &mut DVector<f64>) {
    let m = d.len();
    let shade = d[m - 1];
    let f = 1.0 / (1.0 - shade);
    for i in 0..m - 1 {
        d[i] *= f;
    }
    d[m - 1] = 0.0;
}
