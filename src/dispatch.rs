// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Dispatcher: a pure function from `(index_id,
//! sensor_map, parameters)` to a kernel invocation. Resolves band roles,
//! fills in literal preset parameters, emits one citation per dispatched
//! index identifier, and invokes the chosen kernel.

use std::fmt;

use log::{trace, warn};
use ndarray::{ArrayView1, ArrayView2, ArrayViewMut2};

use crate::citation::CitationRegistry;
use crate::constants::resistance_presets;
use crate::data::{ArdFrame, BandRole, SensorMap};
use crate::error::EngineError;
use crate::kernels::{
    band::BandCopy,
    continuum::ContinuumRemoval,
    kndvi::KernelNdvi,
    norm_diff::NormDiff,
    ratio::{ModifiedSimpleRatio, RatioMinusOne},
    resistance::{Resistance, ResistanceParams},
    run_scalar_kernel,
    tasseled_cap::{TasseledCap, TasseledComponent},
};
use crate::sma::{run_sma, EndmemberModel, SmaParams};

/// Every index identifier the dispatcher knows how to bind to a kernel.
///
/// `Display` is implemented by hand rather than derived: the `Band`
/// variant carries a [`BandRole`] payload, which `strum`'s string-enum
/// derives don't support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum IndexId {
    NDVI,
    NBR,
    NDBI,
    NDWI,
    MNDWI,
    NDSI,
    NDTI,
    NDMI,
    NDRE1,
    NDRE2,
    NDVIre1,
    NDVIre2,
    NDVIre3,
    NDVIre1n,
    NDVIre2n,
    NDVIre3n,
    CCI,
    CIre,
    MSRre,
    MSRren,
    kNDVI,
    EVI,
    EV2,
    ARVI,
    SAVI,
    SARVI,
    TCB,
    TCG,
    TCW,
    TCD,
    CSW,
    /// Pass-through copy of a single named band.
    Band(BandRole),
    /// Spectral Mixture Analysis.
    SMA,
}

impl fmt::Display for IndexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexId::Band(role) => write!(f, "Band({role})"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Everything the dispatcher needs beyond the index identifier: the
/// caller's ARD stack, masks, output buffers, sensor map, nodata
/// sentinel and (for SMA) endmembers/parameters.
pub struct DispatchRequest<'a> {
    pub ard: &'a [ArdFrame<'a>],
    pub global_mask: Option<ArrayView1<'a, u8>>,
    pub sensor_map: &'a SensorMap,
    pub nodata: i16,
    pub sma_params: Option<SmaParams>,
    pub endmembers: Option<ArrayView2<'a, f64>>,
}

/// Resolve `index_id` against `request` and write into `tss` (and, for
/// SMA with `emit_rms`, `rms`). Unknown identifiers are a diagnostic
/// only: the engine still returns `Ok(())`.
pub fn dispatch(
    index_id: IndexId,
    request: &DispatchRequest,
    tss: ArrayViewMut2<i16>,
    rms: Option<ArrayViewMut2<i16>>,
    citations: &dyn CitationRegistry,
) -> Result<(), EngineError> {
    trace!("Dispatching index {index_id}");

    let sm = request.sensor_map;
    let ard = request.ard;
    let nodata = request.nodata;
    let mask = request.global_mask;

    macro_rules! need {
        ($role:expr) => {
            match sm.band($role) {
                Some(b) => b,
                None => {
                    warn!("Dispatch of {index_id}: sensor map has no band for {:?}", $role);
                    return Ok(());
                }
            }
        };
    }

    match index_id {
        IndexId::NDVI => norm_diff(ard, mask, tss, nodata, need!(BandRole::Nir), need!(BandRole::Red)),
        IndexId::NBR => norm_diff(ard, mask, tss, nodata, need!(BandRole::Nir), need!(BandRole::Swir2)),
        IndexId::NDBI => norm_diff(ard, mask, tss, nodata, need!(BandRole::Swir1), need!(BandRole::Nir)),
        IndexId::NDWI => norm_diff(ard, mask, tss, nodata, need!(BandRole::Green), need!(BandRole::Nir)),
        IndexId::MNDWI | IndexId::NDSI => {
            norm_diff(ard, mask, tss, nodata, need!(BandRole::Green), need!(BandRole::Swir1))
        }
        IndexId::NDTI => norm_diff(ard, mask, tss, nodata, need!(BandRole::Swir1), need!(BandRole::Swir2)),
        IndexId::NDMI => norm_diff(ard, mask, tss, nodata, need!(BandRole::Nir), need!(BandRole::Swir1)),
        IndexId::NDRE1 => norm_diff(ard, mask, tss, nodata, need!(BandRole::RedEdge2), need!(BandRole::RedEdge1)),
        IndexId::NDRE2 => norm_diff(ard, mask, tss, nodata, need!(BandRole::RedEdge3), need!(BandRole::RedEdge1)),
        IndexId::NDVIre1 => norm_diff(ard, mask, tss, nodata, need!(BandRole::Bnir), need!(BandRole::RedEdge1)),
        IndexId::NDVIre2 => norm_diff(ard, mask, tss, nodata, need!(BandRole::Bnir), need!(BandRole::RedEdge2)),
        IndexId::NDVIre3 => norm_diff(ard, mask, tss, nodata, need!(BandRole::Bnir), need!(BandRole::RedEdge3)),
        IndexId::NDVIre1n => norm_diff(ard, mask, tss, nodata, need!(BandRole::Nir), need!(BandRole::RedEdge1)),
        IndexId::NDVIre2n => norm_diff(ard, mask, tss, nodata, need!(BandRole::Nir), need!(BandRole::RedEdge2)),
        IndexId::NDVIre3n => norm_diff(ard, mask, tss, nodata, need!(BandRole::Nir), need!(BandRole::RedEdge3)),
        IndexId::CCI => norm_diff(ard, mask, tss, nodata, need!(BandRole::Green), need!(BandRole::Red)),

        IndexId::CIre => {
            let kernel = RatioMinusOne::new(ard, need!(BandRole::RedEdge3), need!(BandRole::RedEdge1));
            run_scalar_kernel(&kernel, ard, mask, tss, nodata);
        }
        IndexId::MSRre => {
            let kernel = ModifiedSimpleRatio::new(ard, need!(BandRole::Bnir), need!(BandRole::RedEdge1));
            run_scalar_kernel(&kernel, ard, mask, tss, nodata);
        }
        IndexId::MSRren => {
            let kernel = ModifiedSimpleRatio::new(ard, need!(BandRole::Nir), need!(BandRole::RedEdge1));
            run_scalar_kernel(&kernel, ard, mask, tss, nodata);
        }
        IndexId::kNDVI => {
            let kernel = KernelNdvi::new(ard, need!(BandRole::Nir), need!(BandRole::Red));
            run_scalar_kernel(&kernel, ard, mask, tss, nodata);
        }

        IndexId::EVI => {
            resistance(ard, mask, tss, nodata, need!(BandRole::Nir), need!(BandRole::Red), need!(BandRole::Blue), resistance_presets::EVI)
        }
        // EV2's f3 preset coefficient is 0.0, so its formula never reads
        // blue; pass red again rather than requiring a blue band binding.
        IndexId::EV2 => {
            let nir = need!(BandRole::Nir);
            let red = need!(BandRole::Red);
            resistance(ard, mask, tss, nodata, nir, red, red, resistance_presets::EV2)
        }
        IndexId::ARVI => {
            resistance(ard, mask, tss, nodata, need!(BandRole::Nir), need!(BandRole::Red), need!(BandRole::Blue), resistance_presets::ARVI)
        }
        IndexId::SAVI => {
            resistance(ard, mask, tss, nodata, need!(BandRole::Nir), need!(BandRole::Red), need!(BandRole::Blue), resistance_presets::SAVI)
        }
        IndexId::SARVI => {
            resistance(ard, mask, tss, nodata, need!(BandRole::Nir), need!(BandRole::Red), need!(BandRole::Blue), resistance_presets::SARVI)
        }

        IndexId::TCB | IndexId::TCG | IndexId::TCW | IndexId::TCD => {
            let bands = [
                need!(BandRole::Blue),
                need!(BandRole::Green),
                need!(BandRole::Red),
                need!(BandRole::Nir),
                need!(BandRole::Swir1),
                need!(BandRole::Swir2),
            ];
            let component = match index_id {
                IndexId::TCB => TasseledComponent::Brightness,
                IndexId::TCG => TasseledComponent::Greenness,
                IndexId::TCW => TasseledComponent::Wetness,
                _ => TasseledComponent::Disturbance,
            };
            let kernel = TasseledCap::new(ard, bands, component);
            run_scalar_kernel(&kernel, ard, mask, tss, nodata);
        }

        IndexId::CSW => {
            let mid = need!(BandRole::Swir1);
            let left = need!(BandRole::Nir);
            let right = need!(BandRole::Swir2);
            let w_mid = sm.wavelength(BandRole::Swir1).unwrap_or(0.0);
            let w_left = sm.wavelength(BandRole::Nir).unwrap_or(0.0);
            let w_right = sm.wavelength(BandRole::Swir2).unwrap_or(0.0);
            let kernel = ContinuumRemoval::new(ard, mid, left, right, w_mid, w_left, w_right);
            run_scalar_kernel(&kernel, ard, mask, tss, nodata);
        }

        IndexId::Band(role) => {
            let band = need!(role);
            let kernel = BandCopy::new(ard, band);
            run_scalar_kernel(&kernel, ard, mask, tss, nodata);
        }

        IndexId::SMA => {
            let params = request.sma_params.ok_or(EngineError::MissingEndmembers)?;
            let endmembers = request.endmembers.ok_or(EngineError::MissingEndmembers)?;
            let ard_bands = ard.first().map(|f| f.num_bands()).unwrap_or(0);
            if endmembers.shape()[0] != ard_bands {
                return Err(EngineError::ShapeMismatch {
                    endmember_bands: endmembers.shape()[0],
                    ard_bands,
                });
            }
            let model = EndmemberModel::new(endmembers, params.sum_to_one);
            run_sma(&model, &params, ard, mask, tss, rms, nodata);
        }
    }

    citations.cite(&index_id.to_string());
    Ok(())
}

fn norm_diff(
    ard: &[ArdFrame],
    mask: Option<ArrayView1<u8>>,
    tss: ArrayViewMut2<i16>,
    nodata: i16,
    b1: usize,
    b2: usize,
) {
    let kernel = NormDiff::new(ard, b1, b2);
    run_scalar_kernel(&kernel, ard, mask, tss, nodata);
}

#[allow(clippy::too_many_arguments)]
fn resistance(
    ard: &[ArdFrame],
    mask: Option<ArrayView1<u8>>,
    tss: ArrayViewMut2<i16>,
    nodata: i16,
    nir: usize,
    red: usize,
    blue: usize,
    preset: (f64, f64, f64, f64, bool),
) {
    let kernel = Resistance::new(ard, nir, red, blue, ResistanceParams::from_preset(preset));
    run_scalar_kernel(&kernel, ard, mask, tss, nodata);
}

/// Unknown identifiers arrive here only when a caller round-trips a raw
/// string that didn't parse into [`IndexId`]; the dispatcher itself
/// never produces one, since `strum`'s `FromStr` already rejected it
/// upstream. Kept so the diagnostic-and-continue contract has one
/// obvious place to land if that changes.
pub fn dispatch_unknown(raw: &str) {
    warn!("Unknown index identifier '{raw}'; outputs left untouched");
}
