// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Shared per-pixel/per-date driver for the closed-form scalar kernels:
//! normalized-difference, ratio, kernelized, resistance, Tasseled Cap
//! and continuum removal. Every kernel in this module family plugs into
//! [`run_scalar_kernel`], which owns the mask-dominance logic, the
//! static pixel partition, and the scaled-short clipping; a kernel only
//! has to provide the per-(date, pixel) formula.

pub mod band;
pub mod continuum;
pub mod kndvi;
pub mod norm_diff;
pub mod ratio;
pub mod resistance;
pub mod tasseled_cap;

use ndarray::{parallel::prelude::*, prelude::*};

use crate::data::ArdFrame;

/// A closed-form per-pixel index formula. Implementors are handed the
/// date and pixel index and must return the *scaled* result (already
/// multiplied by whatever factor the family uses), or `None` if the
/// result is domain-invalid (division by zero, out-of-domain input,
/// ...). [`run_scalar_kernel`] takes care of masking and short-clipping.
pub trait ScalarKernel: Sync {
    fn eval_scaled(&self, t: usize, p: usize) -> Option<f64>;
}

/// Truncate `value` toward zero into `i16`, substituting `nodata` if it
/// over/underflows the signed 16-bit range. The single place an
/// out-of-range scaled value gets turned into nodata.
#[inline]
pub fn clip_to_i16(value: f64, nodata: i16) -> i16 {
    if !value.is_finite() {
        return nodata;
    }
    let truncated = value.trunc();
    if truncated < i16::MIN as f64 || truncated > i16::MAX as f64 {
        nodata
    } else {
        truncated as i16
    }
}

/// Run `kernel` over every `(t, p)` cell of `tss`, honouring mask
/// dominance: a pixel rejected by the global mask gets nodata for every
/// date without even consulting the kernel; a date rejected by the
/// per-frame mask gets nodata for that cell only.
///
/// The pixel axis (`tss`'s second axis) is partitioned statically across
/// worker threads; unlike SMA's inner solve, the per-pixel cost here is
/// uniform enough that a static partition doesn't starve any thread.
pub fn run_scalar_kernel<K: ScalarKernel>(
    kernel: &K,
    ard: &[ArdFrame],
    global_mask: Option<ArrayView1<u8>>,
    mut tss: ArrayViewMut2<i16>,
    nodata: i16,
) {
    let num_dates = ard.len();
    debug_assert_eq!(tss.shape()[0], num_dates);

    tss.axis_iter_mut(Axis(1))
        .into_par_iter()
        .enumerate()
        .for_each(|(p, mut column)| {
            if let Some(mask) = global_mask.as_ref() {
                if mask[p] == 0 {
                    column.fill(nodata);
                    return;
                }
            }
            for (t, frame) in ard.iter().enumerate() {
                column[t] = if !frame.is_valid(p) {
                    nodata
                } else {
                    match kernel.eval_scaled(t, p) {
                        Some(value) => clip_to_i16(value, nodata),
                        None => nodata,
                    }
                };
            }
        });
}
