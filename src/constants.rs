// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All kernels compute in `f64` and only convert to the caller's scaled
`i16` encoding at the very end, to keep rounding error out of the domain
checks.
 */

/// Scaled-integer encoding of reflectance: a raw band value of
/// `REFLECTANCE_SCALE` represents a reflectance of 1.0.
pub const REFLECTANCE_SCALE: f64 = 10_000.0;

/// Output scale for normalized-difference, resistance, kernelized and
/// SMA fraction/RMSE families.
pub const SCALE_10000: f64 = 10_000.0;

/// Output scale for the ratio-minus-one family.
pub const SCALE_1000: f64 = 1_000.0;

/// Lawson-Hanson NNLS iteration cap, expressed as a multiplier of the
/// endmember count `M` (`itmax = NNLS_ITMAX_FACTOR * M`).
pub const NNLS_ITMAX_FACTOR: usize = 30;

/// Fixed 3x6 Tasseled Cap coefficient matrix: rows are brightness,
/// greenness, wetness; columns are blue, green, red, nir, swir1, swir2.
pub const TASSELED_CAP_COEFFS: [[f64; 6]; 3] = [
    [0.2043, 0.4158, 0.5524, 0.5741, 0.3124, 0.2303],
    [-0.1603, -0.2819, -0.4934, 0.7940, -0.0002, -0.1446],
    [0.0315, 0.2021, 0.3102, 0.1594, -0.6806, -0.6109],
];

/// Literal parameter tuples for the soil/atmosphere-resistance family:
/// `(f1, f2, f3, f4, rbc)`. Reproduces EVI (Huete et al. 1997), the
/// two-band EVI2 (Jiang et al. 2008), ARVI (Kaufman & Tanré 1992) and
/// SAVI/SARVI (Huete 1988). See `dispatch.rs` for the per-index binding.
pub mod resistance_presets {
    /// `(f1, f2, f3, f4, red_blue_correction)`
    pub const EVI: (f64, f64, f64, f64, bool) = (2.5, 6.0, 7.5, 1.0, false);
    pub const EV2: (f64, f64, f64, f64, bool) = (2.4, 1.0, 0.0, 1.0, false);
    pub const ARVI: (f64, f64, f64, f64, bool) = (1.0, 1.0, 0.0, 0.0, true);
    pub const SAVI: (f64, f64, f64, f64, bool) = (1.5, 1.0, 0.0, 0.5, false);
    pub const SARVI: (f64, f64, f64, f64, bool) = (1.5, 1.0, 0.0, 0.5, true);
}
