use super::helpers::point;
use crate::perturbation::{compute_orbit, compute_series, ReferenceOrbit};
use deepbrot_core::FixedComplex;

const BAILOUT_SQ: f64 = 1024.0 * 1024.0;

#[test]
fn initial_coefficients_and_equal_lengths() {
    let orbit = ReferenceOrbit::compute(&point(-0.75, 0.1, 128), 256, BAILOUT_SQ);
    let series = &orbit.series;

    assert_eq!(series.a[0], FixedComplex::ONE);
    assert_eq!(series.b[0], FixedComplex::ZERO);
    assert_eq!(series.c[0], FixedComplex::ZERO);
    assert_eq!(series.a.len(), orbit.len());
    assert_eq!(series.b.len(), orbit.len());
    assert_eq!(series.c.len(), orbit.len());
}

#[test]
fn origin_orbit_has_constant_coefficients() {
    // X_i = 0 gives A_i = 1, B_i = 1, C_i = 2 for i ≥ 1
    let series = compute_series(&[FixedComplex::ZERO; 8]);
    for i in 1..8 {
        assert_eq!(series.a[i], FixedComplex::ONE);
        assert_eq!(series.b[i], FixedComplex::ONE);
        assert_eq!(series.c[i], FixedComplex::new(2.0, 0.0));
    }
}

#[test]
fn empty_orbit_gives_empty_series() {
    assert!(compute_series(&[]).is_empty());
}

#[test]
fn series_tracks_nearby_orbit() {
    let reference = ReferenceOrbit::compute(&point(-0.5, 0.1, 128), 30, BAILOUT_SQ);
    let delta = FixedComplex::new(1e-6, -2e-6);
    let pixel = reference.c_ref().add_fixed(&delta);
    let exact = compute_orbit(&pixel, 30, BAILOUT_SQ);

    let delta_sq = delta.square();
    let delta_cube = delta_sq.mul(&delta);
    let series = &reference.series;
    for i in 0..reference.len().min(exact.len()) {
        let approx = reference.orbit_f64[i]
            .add(&series.a[i].mul(&delta))
            .add(&series.b[i].mul(&delta_sq))
            .add(&series.c[i].mul(&delta_cube));
        let actual = exact[i].to_fixed();
        let error = FixedComplex::new(approx.re - actual.re, approx.im - actual.im).norm_sq();
        assert!(error < 1e-20, "series drifted at {}: {:?} vs {:?}", i, approx, actual);
    }
}
