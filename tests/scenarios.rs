// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! End-to-end scenarios driven through the public `compute_index` entry
//! point, plus the invariants that don't belong to one kernel.

use approx::assert_abs_diff_eq;
use ndarray::{array, Array2};
use spectral_tsa::sma::SmaParams;
use spectral_tsa::{compute_index, ArdFrame, BandRole, IndexId, InMemoryCitationRegistry, SensorMap};

const NODATA: i16 = -9999;

fn single_pixel_frame(values: &[i16], mask: u8) -> (Array2<i16>, ndarray::Array1<u8>) {
    let bands = Array2::from_shape_vec((values.len(), 1), values.to_vec()).unwrap();
    let mask = ndarray::array![mask];
    (bands, mask)
}

#[test]
fn ndvi_single_pixel() {
    let sensor_map = SensorMap::new().with_band(BandRole::Red, 0).with_band(BandRole::Nir, 1);
    let (bands, mask) = single_pixel_frame(&[1000, 3000], 1);
    let frame = ArdFrame::new(bands.view(), mask.view());
    let ard = [frame];
    let citations = InMemoryCitationRegistry::new();

    let mut tss = Array2::<i16>::zeros((1, 1));
    compute_index(
        &ard,
        None,
        tss.view_mut(),
        None,
        IndexId::NDVI,
        NODATA,
        &sensor_map,
        None,
        None,
        &citations,
    )
    .unwrap();

    assert_eq!(tss[[0, 0]], 5000);
    assert_eq!(citations.cited(), vec!["NDVI".to_string()]);
}

#[test]
fn ndvi_divide_by_zero() {
    let sensor_map = SensorMap::new().with_band(BandRole::Red, 0).with_band(BandRole::Nir, 1);
    let (bands, mask) = single_pixel_frame(&[0, 0], 1);
    let frame = ArdFrame::new(bands.view(), mask.view());
    let ard = [frame];
    let citations = InMemoryCitationRegistry::new();

    let mut tss = Array2::<i16>::zeros((1, 1));
    compute_index(
        &ard,
        None,
        tss.view_mut(),
        None,
        IndexId::NDVI,
        NODATA,
        &sensor_map,
        None,
        None,
        &citations,
    )
    .unwrap();

    assert_eq!(tss[[0, 0]], NODATA);
}

#[test]
fn evi_preset() {
    let sensor_map = SensorMap::new()
        .with_band(BandRole::Nir, 0)
        .with_band(BandRole::Red, 1)
        .with_band(BandRole::Blue, 2);
    let (bands, mask) = single_pixel_frame(&[3000, 1000, 500], 1);
    let frame = ArdFrame::new(bands.view(), mask.view());
    let ard = [frame];
    let citations = InMemoryCitationRegistry::new();

    let mut tss = Array2::<i16>::zeros((1, 1));
    compute_index(
        &ard,
        None,
        tss.view_mut(),
        None,
        IndexId::EVI,
        NODATA,
        &sensor_map,
        None,
        None,
        &citations,
    )
    .unwrap();

    assert_eq!(tss[[0, 0]], 3278);
}

#[test]
fn tasseled_cap_brightness() {
    let sensor_map = SensorMap::new()
        .with_band(BandRole::Blue, 0)
        .with_band(BandRole::Green, 1)
        .with_band(BandRole::Red, 2)
        .with_band(BandRole::Nir, 3)
        .with_band(BandRole::Swir1, 4)
        .with_band(BandRole::Swir2, 5);
    let (bands, mask) = single_pixel_frame(&[500, 700, 900, 3000, 1500, 1000], 1);
    let frame = ArdFrame::new(bands.view(), mask.view());
    let ard = [frame];
    let citations = InMemoryCitationRegistry::new();

    let mut tss = Array2::<i16>::zeros((1, 1));
    compute_index(
        &ard,
        None,
        tss.view_mut(),
        None,
        IndexId::TCB,
        NODATA,
        &sensor_map,
        None,
        None,
        &citations,
    )
    .unwrap();

    // 0.2043*500 + 0.4158*700 + 0.5524*900 + 0.5741*3000 + 0.3124*1500 + 0.2303*1000 = 3311.57,
    // truncated toward zero.
    assert_eq!(tss[[0, 0]], 3311);
}

#[test]
fn sma_positivity_sum_to_one() {
    let endmembers = array![[0.1, 0.4], [0.5, 0.2]];
    let (bands, mask) = single_pixel_frame(&[2500, 3500], 1);
    let frame = ArdFrame::new(bands.view(), mask.view());
    let ard = [frame];
    let citations = InMemoryCitationRegistry::new();
    let sensor_map = SensorMap::new();

    let params = SmaParams {
        positivity: true,
        sum_to_one: true,
        shade_normalize: false,
        emit_rms: false,
        selected_endmember: 1,
    };

    let mut tss = Array2::<i16>::zeros((1, 1));
    compute_index(
        &ard,
        None,
        tss.view_mut(),
        None,
        IndexId::SMA,
        NODATA,
        &sensor_map,
        Some(params),
        Some(endmembers.view()),
        &citations,
    )
    .unwrap();

    assert!((tss[[0, 0]] as f64 - 5000.0).abs() <= 2.0);
}

#[test]
fn continuum_removal_interpolated_baseline() {
    let sensor_map = SensorMap::new()
        .with_band(BandRole::Swir1, 0)
        .with_band(BandRole::Nir, 1)
        .with_band(BandRole::Swir2, 2)
        .with_wavelength(BandRole::Swir1, 1.61)
        .with_wavelength(BandRole::Nir, 0.86)
        .with_wavelength(BandRole::Swir2, 2.20);
    let (bands, mask) = single_pixel_frame(&[1600, 2000, 1200], 1);
    let frame = ArdFrame::new(bands.view(), mask.view());
    let ard = [frame];
    let citations = InMemoryCitationRegistry::new();

    let mut tss = Array2::<i16>::zeros((1, 1));
    compute_index(
        &ard,
        None,
        tss.view_mut(),
        None,
        IndexId::CSW,
        NODATA,
        &sensor_map,
        None,
        None,
        &citations,
    )
    .unwrap();

    assert_abs_diff_eq!(tss[[0, 0]] as f64, 47.0, epsilon = 2.0);
}

#[test]
fn mask_dominance_global_overrides_per_frame() {
    let sensor_map = SensorMap::new().with_band(BandRole::Red, 0).with_band(BandRole::Nir, 1);
    let bands = array![[1000i16, 1000], [3000, 3000]];
    let mask = array![1u8, 1];
    let frame = ArdFrame::new(bands.view(), mask.view());
    let ard = [frame];
    let global_mask = array![0u8, 1]; // pixel 0 globally masked
    let citations = InMemoryCitationRegistry::new();

    let mut tss = Array2::<i16>::zeros((1, 2));
    compute_index(
        &ard,
        Some(global_mask.view()),
        tss.view_mut(),
        None,
        IndexId::NDVI,
        NODATA,
        &sensor_map,
        None,
        None,
        &citations,
    )
    .unwrap();

    assert_eq!(tss[[0, 0]], NODATA);
    assert_eq!(tss[[0, 1]], 5000);
}

#[test]
fn band_copy_is_lossless_end_to_end() {
    let sensor_map = SensorMap::new().with_band(BandRole::Nir, 0);
    let bands = array![[1234i16, -500]];
    let mask = array![1u8, 1];
    let frame = ArdFrame::new(bands.view(), mask.view());
    let ard = [frame];
    let citations = InMemoryCitationRegistry::new();

    let mut tss = Array2::<i16>::zeros((1, 2));
    compute_index(
        &ard,
        None,
        tss.view_mut(),
        None,
        IndexId::Band(BandRole::Nir),
        NODATA,
        &sensor_map,
        None,
        None,
        &citations,
    )
    .unwrap();

    assert_eq!(tss[[0, 0]], 1234);
    assert_eq!(tss[[0, 1]], -500);
}

#[test]
fn shape_mismatch_between_endmembers_and_ard_is_fatal() {
    let sensor_map = SensorMap::new();
    let (bands, mask) = single_pixel_frame(&[2500, 3500], 1);
    let frame = ArdFrame::new(bands.view(), mask.view());
    let ard = [frame];
    let citations = InMemoryCitationRegistry::new();
    // endmembers claim 3 bands, ARD stack has 2.
    let endmembers = array![[0.1, 0.4], [0.5, 0.2], [0.2, 0.3]];
    let params = SmaParams {
        positivity: false,
        sum_to_one: false,
        shade_normalize: false,
        emit_rms: false,
        selected_endmember: 1,
    };

    let mut tss = Array2::<i16>::zeros((1, 1));
    let result = compute_index(
        &ard,
        None,
        tss.view_mut(),
        None,
        IndexId::SMA,
        NODATA,
        &sensor_map,
        Some(params),
        Some(endmembers.view()),
        &citations,
    );

    assert!(matches!(
        result,
        Err(spectral_tsa::EngineError::ShapeMismatch { .. })
    ));
}

#[test]
fn determinism_across_repeated_invocations() {
    let sensor_map = SensorMap::new().with_band(BandRole::Red, 0).with_band(BandRole::Nir, 1);
    let bands = array![[1000i16, 1700, 250], [3000, 1900, 9000]];
    let mask = array![1u8, 1, 1];
    let frame = ArdFrame::new(bands.view(), mask.view());
    let ard = [frame];
    let citations = InMemoryCitationRegistry::new();

    let mut first = Array2::<i16>::zeros((1, 3));
    let mut second = Array2::<i16>::zeros((1, 3));
    for tss in [&mut first, &mut second] {
        compute_index(
            &ard,
            None,
            tss.view_mut(),
            None,
            IndexId::NDVI,
            NODATA,
            &sensor_map,
            None,
            None,
            &citations,
        )
        .unwrap();
    }
    assert_eq!(first, second);
}
