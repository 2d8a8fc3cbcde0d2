use crate::perturbation::{escape_hardware, escape_perturbed, probe_deepest_orbit};
use deepbrot_core::{calculate_precision_bits, BigFloat, EngineConfig, ViewWindow};

/// Compare both evaluators on every pixel of a 30×40 window just below the
/// hardware threshold.
fn assert_paths_agree(center_re: &str, center_im: &str, max_iterations: u32) {
    let config = EngineConfig::default();
    let (rows, cols) = (30, 40);
    let step = BigFloat::from_string("1.4e-16", 128).unwrap();
    let precision = calculate_precision_bits(&step, &config);
    assert!(precision > 64);

    let window =
        ViewWindow::from_strings(center_re, center_im, "1.4e-16", "1.4e-16", precision).unwrap();
    let reference = probe_deepest_orbit(&window, rows, cols, max_iterations, config.bailout_sq());

    let mut agree = 0;
    for r in 0..rows {
        for c in 0..cols {
            let point = window.point_at(r, c, 1, rows, cols);
            let perturbed = escape_perturbed(&point, &reference, max_iterations, &config);
            let hardware = escape_hardware(point.to_fixed(), max_iterations, &config);
            if perturbed.iterations == hardware.iterations {
                agree += 1;
                assert!(
                    (perturbed.smoothing - hardware.smoothing).abs() < 1e-3,
                    "smoothing differs at ({}, {}): {:?} vs {:?}",
                    r,
                    c,
                    perturbed,
                    hardware
                );
            }
        }
    }
    assert!(
        agree * 100 >= rows * cols * 99,
        "only {} of {} pixels agree",
        agree,
        rows * cols
    );
}

#[test]
fn paths_agree_on_the_real_axis() {
    // c = 0.3 escapes at index 15
    assert_paths_agree("0.3", "0", 256);
}

#[test]
fn paths_agree_near_the_seahorse_valley() {
    // c = -0.75 + 0.1i escapes at index 35
    assert_paths_agree("-0.75", "0.1", 256);
}
