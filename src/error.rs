// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all engine-related errors. This should be the *only*
//! error enum that is publicly visible.
//!
//! Per-pixel domain errors (division by zero, out of range,
//! non-convergence) are never surfaced here: they're encoded into the
//! output as the nodata sentinel. Only structural contract violations
//! reach [`EngineError`].

use thiserror::Error;

/// The *only* publicly visible error from `spectral-tsa`.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The endmember matrix's band count doesn't match the ARD stack's
    /// band count. Fatal: reporting a diagnostic and terminating is the
    /// caller's contract for a structural mismatch like this one.
    #[error("endmember matrix has {endmember_bands} bands but the ARD stack has {ard_bands}")]
    ShapeMismatch {
        endmember_bands: usize,
        ard_bands: usize,
    },

    /// The ARD stack has no frames; there is nothing to index.
    #[error("ARD stack is empty (T == 0)")]
    EmptyArdStack,

    /// A caller-supplied output buffer doesn't match the expected
    /// `(T, N)` shape.
    #[error("{buffer} has shape {actual:?}, expected {expected:?}")]
    BufferShape {
        buffer: &'static str,
        actual: (usize, usize),
        expected: (usize, usize),
    },

    /// SMA was selected but no endmember matrix was supplied.
    #[error("SMA index requires an endmember matrix, but none was supplied")]
    MissingEndmembers,
}
