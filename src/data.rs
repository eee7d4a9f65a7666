// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
The data model shared by every kernel: ARD frames, the global mask, and
the sensor band-role map.
 */

use indexmap::IndexMap;
use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// A semantic band name, resolved to a concrete band index by a
/// [`SensorMap`]. Central wavelengths (used by continuum removal) are
/// only meaningful for a subset of these.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
pub enum BandRole {
    Blue,
    Green,
    Red,
    Nir,
    Swir0,
    Swir1,
    Swir2,
    Bnir,
    RedEdge1,
    RedEdge2,
    RedEdge3,
    Vv,
    Vh,
}

/// Maps band roles to band indices (and, where relevant, central
/// wavelengths in micrometres) for one sensor. Built once per caller
/// invocation and borrowed for the duration of `compute_index`.
#[derive(Debug, Clone, Default)]
pub struct SensorMap {
    bands: IndexMap<BandRole, usize>,
    wavelengths: IndexMap<BandRole, f64>,
}

impl SensorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a role -> band index binding.
    pub fn with_band(mut self, role: BandRole, band_index: usize) -> Self {
        self.bands.insert(role, band_index);
        self
    }

    /// Register a role's central wavelength (micrometres), needed only
    /// for continuum removal.
    pub fn with_wavelength(mut self, role: BandRole, wavelength_um: f64) -> Self {
        self.wavelengths.insert(role, wavelength_um);
        self
    }

    pub fn band(&self, role: BandRole) -> Option<usize> {
        self.bands.get(&role).copied()
    }

    pub fn wavelength(&self, role: BandRole) -> Option<f64> {
        self.wavelengths.get(&role).copied()
    }
}

/// One date's worth of co-registered band planes plus the per-pixel
/// validity mask. All frames in a stack share `(num_bands, num_pixels)`.
///
/// Kernels never mutate an `ArdFrame`; it borrows the caller's buffers
/// for the duration of the call.
#[derive(Clone, Copy)]
pub struct ArdFrame<'a> {
    /// Shape `(num_bands, num_pixels)`, row-major.
    bands: ArrayView2<'a, i16>,
    /// Shape `(num_pixels,)`; nonzero means valid.
    mask: ArrayView1<'a, u8>,
}

impl<'a> ArdFrame<'a> {
    /// Panics if `bands`'s pixel axis and `mask`'s length disagree;
    /// callers assemble frames once per date and this is a cheap,
    /// deterministic check worth paying for at construction.
    pub fn new(bands: ArrayView2<'a, i16>, mask: ArrayView1<'a, u8>) -> Self {
        assert_eq!(
            bands.shape()[1],
            mask.len(),
            "ArdFrame: band plane pixel count must match mask length"
        );
        Self { bands, mask }
    }

    pub fn num_bands(&self) -> usize {
        self.bands.shape()[0]
    }

    pub fn num_pixels(&self) -> usize {
        self.bands.shape()[1]
    }

    /// The raw scaled value of band `b` at pixel `p`.
    #[inline]
    pub fn band_value(&self, b: usize, p: usize) -> i16 {
        self.bands[[b, p]]
    }

    /// Whether pixel `p` is valid in this frame.
    #[inline]
    pub fn is_valid(&self, p: usize) -> bool {
        self.mask[p] != 0
    }
}
