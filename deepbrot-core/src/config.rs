//! Engine configuration.
//!
//! Numerical constants for escape testing, glitch detection and precision
//! management, plus the defaults a fresh engine starts from.

use serde::{Deserialize, Serialize};

/// Configuration for the escape-time engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Escape radius. Generous so the log-based smoothing stays well defined.
    pub bailout: f64,
    /// Per-pixel step at or above which plain f64 iteration is used.
    pub hardware_step_threshold: f64,
    /// The series is trusted while `glitch_ratio · |cubic|² < |quadratic|²`.
    pub glitch_ratio: f64,
    /// Steps to back off from a detected glitch.
    pub glitch_backoff: usize,
    /// Lower bound for the working precision.
    pub min_precision_bits: usize,
    /// log2 of the relative noise floor kept below one pixel step.
    ///
    /// Defaults to -20, not `log2(1e-20)` (about -66.4). The smaller
    /// magnitude keeps more bits: `64 - exponent(step) - 20` exceeds 64 once
    /// the step drops below about 2^-21, so a 10^15 zoom from the default
    /// view already leaves the f64 path.
    pub noise_floor_log2: f64,
    /// Canvas (cols, rows) that legacy view-state steps are calibrated to.
    pub legacy_canvas: (usize, usize),
    /// Smallest step exponent the f64 pixel deltas can carry.
    pub depth_limit_exponent: isize,
    /// Iteration cap of a fresh engine.
    pub default_max_iterations: u32,
    /// View center of a fresh engine.
    pub default_center: (f64, f64),
    /// Visible (width, height) of a fresh engine in fractal space.
    pub default_extent: (f64, f64),
}

impl EngineConfig {
    #[inline]
    pub fn bailout_sq(&self) -> f64 {
        self.bailout * self.bailout
    }

    /// Parse a configuration; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bailout: 1024.0,
            hardware_step_threshold: 1.5e-16,
            glitch_ratio: 1e5,
            glitch_backoff: 3,
            min_precision_bits: 64,
            noise_floor_log2: -20.0,
            legacy_canvas: (800, 600),
            depth_limit_exponent: -1000,
            default_max_iterations: 256,
            default_center: (-0.5, 0.0),
            default_extent: (4.0, 3.0),
        }
    }
}
