//! Working precision for arbitrary precision values.
//!
//! The precision tracks the per-pixel step: deeper zooms need more mantissa
//! bits so the least significant representable digit of a coordinate stays
//! below the noise floor relative to one pixel.

use crate::{BigFloat, EngineConfig};

/// Required precision bits for a view whose per-pixel step is `step`.
///
/// `bits = max(min_bits, 64 − exponent(step) + log2(noise_floor))`
pub fn calculate_precision_bits(step: &BigFloat, config: &EngineConfig) -> usize {
    let exponent = step.exponent() as f64;
    let bits = (64.0 - exponent + config.noise_floor_log2).floor();
    if bits <= config.min_precision_bits as f64 {
        config.min_precision_bits
    } else {
        bits as usize
    }
}
