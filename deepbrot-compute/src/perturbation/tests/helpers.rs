use deepbrot_core::{ArbitraryComplex, EngineConfig, EscapeResult};

use crate::perturbation::smoothing;

/// Ground truth: exact iteration at the point's own precision, indexed like
/// the reference orbit.
pub fn compute_direct(c: &ArbitraryComplex, max_iterations: u32) -> EscapeResult {
    let config = EngineConfig::default();
    let mut z = c.clone();
    for n in 0..max_iterations {
        let norm_sq = z.norm_sq_f64();
        if norm_sq > config.bailout_sq() {
            return EscapeResult::escaped(n, smoothing(norm_sq, config.bailout));
        }
        z = z.square_add(c);
    }
    EscapeResult::interior(max_iterations)
}

pub fn point(re: f64, im: f64, precision_bits: usize) -> ArbitraryComplex {
    ArbitraryComplex::from_f64(re, im, precision_bits)
}
