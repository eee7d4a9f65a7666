// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Normalized difference: `(b1 - b2) / (b1 + b2) * 10000`. Backs NDVI
//! (Rouse et al. 1974; Tucker 1979), NBR (Key & Benson 2006), NDBI (Zha
//! et al. 2003), NDWI (McFeeters 1996), MNDWI/NDSI (Xu 2006; Hall et al.
//! 1995), NDTI, NDMI (Wilson & Sader 2002), the red-edge NDRE/NDVIre
//! variants, and CCI.

use crate::constants::SCALE_10000;
use crate::data::ArdFrame;
use crate::kernels::ScalarKernel;

pub struct NormDiff<'a> {
    ard: &'a [ArdFrame<'a>],
    b1: usize,
    b2: usize,
}

impl<'a> NormDiff<'a> {
    pub fn new(ard: &'a [ArdFrame<'a>], b1: usize, b2: usize) -> Self {
        Self { ard, b1, b2 }
    }
}

impl ScalarKernel for NormDiff<'_> {
    fn eval_scaled(&self, t: usize, p: usize) -> Option<f64> {
        let frame = &self.ard[t];
        let b1 = frame.band_value(self.b1, p) as f64;
        let b2 = frame.band_value(self.b2, p) as f64;
        let s = b1 + b2;
        if s == 0.0 {
            return None;
        }
        let d = b1 - b2;
        let ratio = d / s;
        if !(-1.0..=1.0).contains(&ratio) {
            return None;
        }
        Some(ratio * SCALE_10000)
    }
}
