// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Continuum removal (Clark & Roush 1984): subtract a linearly
//! interpolated baseline between two bracketing bands from a central
//! band at a known wavelength, isolating an absorption feature.
//!
//! The raw difference is not guaranteed to fit in a signed 16-bit
//! range, so this implementation routes through the same
//! [`crate::kernels::clip_to_i16`] nodata-on-overflow path every other
//! kernel uses, rather than silently wrapping around.

use crate::data::ArdFrame;
use crate::kernels::ScalarKernel;

pub struct ContinuumRemoval<'a> {
    ard: &'a [ArdFrame<'a>],
    mid: usize,
    left: usize,
    right: usize,
    w_mid: f64,
    w_left: f64,
    w_right: f64,
}

impl<'a> ContinuumRemoval<'a> {
    pub fn new(
        ard: &'a [ArdFrame<'a>],
        mid: usize,
        left: usize,
        right: usize,
        w_mid: f64,
        w_left: f64,
        w_right: f64,
    ) -> Self {
        Self {
            ard,
            mid,
            left,
            right,
            w_mid,
            w_left,
            w_right,
        }
    }
}

impl ScalarKernel for ContinuumRemoval<'_> {
    fn eval_scaled(&self, t: usize, p: usize) -> Option<f64> {
        let frame = &self.ard[t];
        let b_mid = frame.band_value(self.mid, p) as f64;
        let b_left = frame.band_value(self.left, p) as f64;
        let b_right = frame.band_value(self.right, p) as f64;

        let span = self.w_right - self.w_left;
        if span == 0.0 {
            return None;
        }
        let baseline =
            (b_left * (self.w_right - self.w_mid) + b_right * (self.w_mid - self.w_left)) / span;
        Some(b_mid - baseline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuum_removal() {
        let bands = ndarray::array![[1600i16], [2000], [1200]]; // mid, left, right
        let mask = ndarray::array![1u8];
        let f = ArdFrame::new(bands.view(), mask.view());
        let ard = [f];
        let kernel = ContinuumRemoval::new(&ard, 0, 1, 2, 1.61, 0.86, 2.20);
        let v = kernel.eval_scaled(0, 0).unwrap();
        assert!((v - 47.76).abs() < 0.1);
    }
}
