//! Perturbation theory computation for deep Mandelbrot zoom.
//!
//! Computes reference orbits at high precision, then evaluates individual
//! pixels as small f64 offsets from the reference.

mod pixel;
mod reference_orbit;
mod series;

pub use pixel::{
    bisect_escape, escape_hardware, escape_perturbed, escape_perturbed_traced, glitch_backoff,
    is_unstable, series_deltas, smoothing, EscapePath,
};
pub use reference_orbit::{compute_orbit, probe_candidates, probe_deepest_orbit, ReferenceOrbit};
pub use series::{compute_series, SeriesCoefficients};

#[cfg(test)]
mod tests;
