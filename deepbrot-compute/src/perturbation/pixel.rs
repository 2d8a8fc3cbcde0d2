//! Per-pixel escape-time evaluation.
//!
//! Shallow views iterate in plain f64. Deep views evaluate the series
//! approximation against a reference orbit, bisect its valid prefix for the
//! escape index, and fall back to exact iteration at the working precision
//! once the series is exhausted.

use super::ReferenceOrbit;
use crate::cardioid::{in_main_bulbs, in_main_bulbs_arbitrary};
use deepbrot_core::{ArbitraryComplex, EngineConfig, EscapeResult, FixedComplex};

/// Which evaluation produced a perturbed result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EscapePath {
    /// Closed-form cardioid or period-2 membership.
    Interior,
    /// Escape found inside the valid series prefix.
    SeriesBisection,
    /// Exact iteration past the end of the valid series prefix.
    ExactFallback,
}

/// Fractional escape correction `1 − log2(ln|z| / ln(bailout))`.
#[inline]
pub fn smoothing(norm_sq: f64, bailout: f64) -> f64 {
    1.0 - (0.5 * norm_sq.ln() / bailout.ln()).log2()
}

/// Plain f64 escape time. Index `i` is the position after `i` squarings past
/// `z₀ = c`, matching reference orbit indices.
pub fn escape_hardware(c: FixedComplex, max_iterations: u32, config: &EngineConfig) -> EscapeResult {
    if in_main_bulbs(&c) {
        return EscapeResult::interior(max_iterations);
    }

    let bailout_sq = config.bailout_sq();
    let mut z = c;
    for i in 0..max_iterations {
        let norm_sq = z.norm_sq();
        if norm_sq > bailout_sq {
            return EscapeResult::escaped(i, smoothing(norm_sq, config.bailout));
        }
        z = z.square().add(&c);
    }
    EscapeResult::interior(max_iterations)
}

pub fn escape_perturbed(
    point: &ArbitraryComplex,
    reference: &ReferenceOrbit,
    max_iterations: u32,
    config: &EngineConfig,
) -> EscapeResult {
    escape_perturbed_traced(point, reference, max_iterations, config).0
}

/// Perturbed escape time, also reporting the path that produced it.
pub fn escape_perturbed_traced(
    point: &ArbitraryComplex,
    reference: &ReferenceOrbit,
    max_iterations: u32,
    config: &EngineConfig,
) -> (EscapeResult, EscapePath) {
    if in_main_bulbs_arbitrary(point) {
        return (EscapeResult::interior(max_iterations), EscapePath::Interior);
    }

    let delta = point.sub(reference.c_ref()).to_fixed();
    let deltas = series_deltas(reference, delta, max_iterations, config);
    let last = deltas.len() - 1;
    let bailout_sq = config.bailout_sq();

    let approximated = reference.orbit_f64[last].add(&deltas[last]);
    if approximated.norm_sq() > bailout_sq {
        let index = bisect_escape(&reference.orbit_f64, &deltas, bailout_sq);
        let z = reference.orbit_f64[index].add(&deltas[index]);
        return (
            EscapeResult::escaped(index as u32, smoothing(z.norm_sq(), config.bailout)),
            EscapePath::SeriesBisection,
        );
    }

    let mut z = reference.orbit[last].add_fixed(&deltas[last]);
    for n in deltas.len() as u32..max_iterations {
        z = z.square_add(point);
        let norm_sq = z.norm_sq_f64();
        if norm_sq > bailout_sq {
            return (
                EscapeResult::escaped(n, smoothing(norm_sq, config.bailout)),
                EscapePath::ExactFallback,
            );
        }
    }
    (
        EscapeResult::interior(max_iterations),
        EscapePath::ExactFallback,
    )
}

/// Series offsets `d_i` for pixel offset `delta`, truncated to the valid
/// prefix. Never empty: `d_0 = delta`.
pub fn series_deltas(
    reference: &ReferenceOrbit,
    delta: FixedComplex,
    max_iterations: u32,
    config: &EngineConfig,
) -> Vec<FixedComplex> {
    let series = &reference.series;
    let len = series.len().min(max_iterations.max(1) as usize).max(1);
    let delta_sq = delta.square();
    let delta_cube = delta_sq.mul(&delta);

    let mut deltas = Vec::with_capacity(len);
    deltas.push(delta);
    for i in 1..len {
        let linear = series.a[i].mul(&delta);
        let quadratic = series.b[i].mul(&delta_sq);
        let cubic = series.c[i].mul(&delta_cube);
        if !linear.is_finite() || is_unstable(&quadratic, &cubic, config.glitch_ratio) {
            deltas.truncate(glitch_backoff(i, config.glitch_backoff));
            break;
        }
        deltas.push(linear.add(&quadratic).add(&cubic));
    }
    deltas
}

/// The cubic term is no longer negligible next to the quadratic one.
///
/// A zero quadratic term is stable; a non-finite term is not.
pub fn is_unstable(quadratic: &FixedComplex, cubic: &FixedComplex, ratio: f64) -> bool {
    if !quadratic.is_finite() || !cubic.is_finite() {
        return true;
    }
    let quadratic_mag = quadratic.norm_sq();
    quadratic_mag != 0.0 && ratio * cubic.norm_sq() >= quadratic_mag
}

/// Length of the prefix kept after a glitch at index `i`.
#[inline]
pub fn glitch_backoff(i: usize, backoff: usize) -> usize {
    i.saturating_sub(backoff).max(1)
}

/// Smallest index whose approximated position escapes.
///
/// `deltas` must be non-empty and its last position must escape; escape is
/// assumed monotonic over the prefix.
pub fn bisect_escape(orbit: &[FixedComplex], deltas: &[FixedComplex], bailout_sq: f64) -> usize {
    let escaped = |i: usize| orbit[i].add(&deltas[i]).norm_sq() > bailout_sq;
    let (mut lo, mut hi) = (0, deltas.len() - 1);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if escaped(mid) {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    lo
}
