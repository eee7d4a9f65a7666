// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`spectral-tsa`: a per-pixel spectral-index and spectral-mixture-analysis
engine for time series of co-registered Earth-observation imagery.

The crate owns none of the surrounding pipeline: no raster I/O, no
endmember-table parsing, no CLI, no config files. Callers hand it
co-registered band planes and a validity mask per date, get back
signed-16-bit index time series, and are free to wire whatever
raster/endmember/citation backing store their pipeline already uses.
 */

pub mod citation;
pub mod constants;
pub mod data;
pub mod dispatch;
pub mod error;
pub mod kernels;
pub mod sma;

use log::debug;
use ndarray::{ArrayView1, ArrayView2, ArrayViewMut2};

pub use citation::{CitationRegistry, InMemoryCitationRegistry, NullCitationRegistry};
pub use data::{ArdFrame, BandRole, SensorMap};
pub use dispatch::IndexId;
pub use error::EngineError;
pub use sma::SmaParams;

/// The engine's single entry point. Synchronous: on return, every cell
/// of `tss` (and `rms`, if supplied) has been written exactly once.
///
/// Returns `Err` only for structural failures (`L != B`, empty ARD
/// stack, mismatched buffer shape). Every per-pixel domain failure, SMA
/// non-convergence, and unknown index identifier is handled internally
/// and still yields `Ok(())`.
#[allow(clippy::too_many_arguments)]
pub fn compute_index(
    ard: &[ArdFrame],
    global_mask: Option<ArrayView1<u8>>,
    tss: ArrayViewMut2<i16>,
    rms: Option<ArrayViewMut2<i16>>,
    index_id: IndexId,
    nodata: i16,
    sensor_map: &SensorMap,
    sma_params: Option<SmaParams>,
    endmembers: Option<ArrayView2<f64>>,
    citations: &dyn CitationRegistry,
) -> Result<(), EngineError> {
    if ard.is_empty() {
        return Err(EngineError::EmptyArdStack);
    }

    let num_dates = ard.len();
    let num_pixels = ard[0].num_pixels();

    if tss.shape()[0] != num_dates || tss.shape()[1] != num_pixels {
        return Err(EngineError::BufferShape {
            buffer: "tss",
            actual: (tss.shape()[0], tss.shape()[1]),
            expected: (num_dates, num_pixels),
        });
    }
    if let Some(rms) = rms.as_ref() {
        if rms.shape()[0] != num_dates || rms.shape()[1] != num_pixels {
            return Err(EngineError::BufferShape {
                buffer: "rms",
                actual: (rms.shape()[0], rms.shape()[1]),
                expected: (num_dates, num_pixels),
            });
        }
    }

    debug!(
        "compute_index: index={index_id} dates={num_dates} pixels={num_pixels} nodata={nodata}"
    );

    let request = dispatch::DispatchRequest {
        ard,
        global_mask,
        sensor_map,
        nodata,
        sma_params,
        endmembers,
    };

    dispatch::dispatch(index_id, &request, tss, rms, citations)
}
