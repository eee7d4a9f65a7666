// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tasseled Cap transform (Kauth & Thomas 1976; coefficients per Crist
//! 1985 / Baig et al. 2014): fixed 3x6 linear combination of blue,
//! green, red, nir, swir1, swir2 producing brightness, greenness,
//! wetness and the disturbance composite `TCD = TCB - TCG - TCW`.
//! Outputs are unscaled (pass-through).

use crate::constants::TASSELED_CAP_COEFFS;
use crate::data::ArdFrame;
use crate::kernels::ScalarKernel;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TasseledComponent {
    Brightness,
    Greenness,
    Wetness,
    /// `TCB - TCG - TCW`.
    Disturbance,
}

pub struct TasseledCap<'a> {
    ard: &'a [ArdFrame<'a>],
    /// Band indices in order: blue, green, red, nir, swir1, swir2.
    bands: [usize; 6],
    component: TasseledComponent,
}

impl<'a> TasseledCap<'a> {
    pub fn new(ard: &'a [ArdFrame<'a>], bands: [usize; 6], component: TasseledComponent) -> Self {
        Self { ard, bands, component }
    }

    fn dot(&self, row: usize, values: &[f64; 6]) -> f64 {
        TASSELED_CAP_COEFFS[row]
            .iter()
            .zip(values)
            .map(|(c, v)| c * v)
            .sum()
    }
}

impl ScalarKernel for TasseledCap<'_> {
    fn eval_scaled(&self, t: usize, p: usize) -> Option<f64> {
        let frame = &self.ard[t];
        let mut values = [0.0f64; 6];
        for (i, &b) in self.bands.iter().enumerate() {
            values[i] = frame.band_value(b, p) as f64;
        }
        Some(match self.component {
            TasseledComponent::Brightness => self.dot(0, &values),
            TasseledComponent::Greenness => self.dot(1, &values),
            TasseledComponent::Wetness => self.dot(2, &values),
            TasseledComponent::Disturbance => {
                self.dot(0, &values) - self.dot(1, &values) - self.dot(2, &values)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(b: i16, g: i16, r: i16, n: i16, s1: i16, s2: i16) -> (ndarray::Array2<i16>, ndarray::Array1<u8>) {
        (ndarray::array![[b], [g], [r], [n], [s1], [s2]], ndarray::array![1u8])
    }

    #[test]
    fn brightness_preset() {
        let (bands, mask) = frame(500, 700, 900, 3000, 1500, 1000);
        let f = ArdFrame::new(bands.view(), mask.view());
        let ard = [f];
        let kernel = TasseledCap::new(&ard, [0, 1, 2, 3, 4, 5], TasseledComponent::Brightness);
        let v = kernel.eval_scaled(0, 0).unwrap();
        // 0.2043*500 + 0.4158*700 + 0.5524*900 + 0.5741*3000 + 0.3124*1500 + 0.2303*1000
        assert!((v - 3311.57).abs() < 1e-6);
    }

    #[test]
    fn disturbance_identity() {
        let (bands, mask) = frame(500, 700, 900, 3000, 1500, 1000);
        let f = ArdFrame::new(bands.view(), mask.view());
        let ard = [f];
        let b = TasseledCap::new(&ard, [0, 1, 2, 3, 4, 5], TasseledComponent::Brightness)
            .eval_scaled(0, 0)
            .unwrap();
        let g = TasseledCap::new(&ard, [0, 1, 2, 3, 4, 5], TasseledComponent::Greenness)
            .eval_scaled(0, 0)
            .unwrap();
        let w = TasseledCap::new(&ard, [0, 1, 2, 3, 4, 5], TasseledComponent::Wetness)
            .eval_scaled(0, 0)
            .unwrap();
        let d = TasseledCap::new(&ard, [0, 1, 2, 3, 4, 5], TasseledComponent::Disturbance)
            .eval_scaled(0, 0)
            .unwrap();
        assert!((d - (b - g - w)).abs() < 1e-9);
    }
}
