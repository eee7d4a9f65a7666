// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Ratio-minus-one, the red-edge chlorophyll index `CIre` (Gitelson et
//! al. 2003), and the MSR-like modified simple ratio `MSRre`/`MSRren`
//! (Chen 1996).

use crate::constants::{SCALE_1000, SCALE_10000};
use crate::data::ArdFrame;
use crate::kernels::ScalarKernel;

/// `((b1/b2) - 1) * 1000`.
pub struct RatioMinusOne<'a> {
    ard: &'a [ArdFrame<'a>],
    b1: usize,
    b2: usize,
}

impl<'a> RatioMinusOne<'a> {
    pub fn new(ard: &'a [ArdFrame<'a>], b1: usize, b2: usize) -> Self {
        Self { ard, b1, b2 }
    }
}

impl ScalarKernel for RatioMinusOne<'_> {
    fn eval_scaled(&self, t: usize, p: usize) -> Option<f64> {
        let frame = &self.ard[t];
        let b1 = frame.band_value(self.b1, p) as f64;
        let b2 = frame.band_value(self.b2, p) as f64;
        if b2 == 0.0 {
            return None;
        }
        Some(((b1 / b2) - 1.0) * SCALE_1000)
    }
}

/// `((r - 1) / sqrt(r + 1)) * 10000`, `r = b1/b2`.
pub struct ModifiedSimpleRatio<'a> {
    ard: &'a [ArdFrame<'a>],
    b1: usize,
    b2: usize,
}

impl<'a> ModifiedSimpleRatio<'a> {
    pub fn new(ard: &'a [ArdFrame<'a>], b1: usize, b2: usize) -> Self {
        Self { ard, b1, b2 }
    }
}

impl ScalarKernel for ModifiedSimpleRatio<'_> {
    fn eval_scaled(&self, t: usize, p: usize) -> Option<f64> {
        let frame = &self.ard[t];
        let b1 = frame.band_value(self.b1, p) as f64;
        let b2 = frame.band_value(self.b2, p) as f64;
        if b2 == 0.0 {
            return None;
        }
        let r = b1 / b2;
        if r + 1.0 <= 0.0 {
            return None;
        }
        Some(((r - 1.0) / (r + 1.0).sqrt()) * SCALE_10000)
    }
}
