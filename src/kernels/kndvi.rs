// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Kernelized NDVI (Camps-Valls et al. 2021): invalid if either band is
//! <= 0, else `sigma = 0.5*(b1+b2)`, `delta = b1-b2`,
//! `k = exp(-delta^2 / (2*sigma^2))`, output `((1-k)/(1+k)) * 10000`.

use crate::constants::SCALE_10000;
use crate::data::ArdFrame;
use crate::kernels::ScalarKernel;

pub struct KernelNdvi<'a> {
    ard: &'a [ArdFrame<'a>],
    b1: usize,
    b2: usize,
}

impl<'a> KernelNdvi<'a> {
    pub fn new(ard: &'a [ArdFrame<'a>], b1: usize, b2: usize) -> Self {
        Self { ard, b1, b2 }
    }
}

impl ScalarKernel for KernelNdvi<'_> {
    fn eval_scaled(&self, t: usize, p: usize) -> Option<f64> {
        let frame = &self.ard[t];
        let b1 = frame.band_value(self.b1, p) as f64;
        let b2 = frame.band_value(self.b2, p) as f64;
        if b1 <= 0.0 || b2 <= 0.0 {
            return None;
        }
        let sigma = 0.5 * (b1 + b2);
        let delta = b1 - b2;
        let k = (-(delta * delta) / (2.0 * sigma * sigma)).exp();
        Some(((1.0 - k) / (1.0 + k)) * SCALE_10000)
    }
}
