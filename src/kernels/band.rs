// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! `index_band(b)`: a lossless copy of one band plane through the
//! mask-dominance logic. No rescaling.

use crate::data::ArdFrame;
use crate::kernels::ScalarKernel;

pub struct BandCopy<'a> {
    ard: &'a [ArdFrame<'a>],
    band: usize,
}

impl<'a> BandCopy<'a> {
    pub fn new(ard: &'a [ArdFrame<'a>], band: usize) -> Self {
        Self { ard, band }
    }
}

impl ScalarKernel for BandCopy<'_> {
    fn eval_scaled(&self, t: usize, p: usize) -> Option<f64> {
        Some(self.ard[t].band_value(self.band, p) as f64)
    }
}
