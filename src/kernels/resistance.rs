// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Soil/atmosphere-resistance family, parameterised by the literal
//! preset tuples in [`crate::constants::resistance_presets`] to
//! reproduce EVI, EV2, SARVI, SAVI, SARVI-with-RBC and ARVI.
//!
//! Only `D == 0` triggers nodata; an `ind < -1 || ind > 1` bound is
//! deliberately not enforced, so EVI and friends can legitimately
//! produce shorts outside [-10000, 10000].

use crate::constants::SCALE_10000;
use crate::data::ArdFrame;
use crate::kernels::ScalarKernel;

pub struct ResistanceParams {
    pub f1: f64,
    pub f2: f64,
    pub f3: f64,
    pub f4: f64,
    /// Red-blue correction: substitute `red <- 2*red - blue` first.
    pub rbc: bool,
}

impl ResistanceParams {
    pub fn new(f1: f64, f2: f64, f3: f64, f4: f64, rbc: bool) -> Self {
        Self { f1, f2, f3, f4, rbc }
    }

    pub fn from_preset((f1, f2, f3, f4, rbc): (f64, f64, f64, f64, bool)) -> Self {
        Self::new(f1, f2, f3, f4, rbc)
    }
}

pub struct Resistance<'a> {
    ard: &'a [ArdFrame<'a>],
    nir: usize,
    red: usize,
    blue: usize,
    params: ResistanceParams,
}

impl<'a> Resistance<'a> {
    pub fn new(ard: &'a [ArdFrame<'a>], nir: usize, red: usize, blue: usize, params: ResistanceParams) -> Self {
        Self { ard, nir, red, blue, params }
    }
}

impl ScalarKernel for Resistance<'_> {
    fn eval_scaled(&self, t: usize, p: usize) -> Option<f64> {
        let frame = &self.ard[t];
        let nir = frame.band_value(self.nir, p) as f64;
        let blue = frame.band_value(self.blue, p) as f64;
        let mut red = frame.band_value(self.red, p) as f64;
        if self.params.rbc {
            red -= blue - red;
        }
        let d = nir + self.params.f2 * red - self.params.f3 * blue + self.params.f4 * SCALE_10000;
        if d == 0.0 {
            return None;
        }
        Some((self.params.f1 * (nir - red) / d) * SCALE_10000)
    }
}
