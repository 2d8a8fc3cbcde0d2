//! Reference orbit computation for perturbation rendering.
//!
//! Computes the orbit of one reference point at the working precision and
//! keeps a double precision copy plus the series coefficients derived from
//! it, so per-pixel work never touches arbitrary precision unless the series
//! runs out.

use super::series::{compute_series, SeriesCoefficients};
use deepbrot_core::{ArbitraryComplex, FixedComplex, ViewWindow};

/// A pre-computed reference orbit for perturbation rendering.
#[derive(Clone, Debug)]
pub struct ReferenceOrbit {
    /// Positions X_n at the working precision; `orbit[0]` is the reference point.
    pub orbit: Vec<ArbitraryComplex>,
    /// X_n descended to f64
    pub orbit_f64: Vec<FixedComplex>,
    pub series: SeriesCoefficients,
}

impl ReferenceOrbit {
    /// Compute the orbit of `c_ref` and derive its series coefficients.
    pub fn compute(c_ref: &ArbitraryComplex, max_iterations: u32, bailout_sq: f64) -> Self {
        Self::from_orbit(compute_orbit(c_ref, max_iterations, bailout_sq))
    }

    pub fn from_orbit(orbit: Vec<ArbitraryComplex>) -> Self {
        let orbit_f64: Vec<FixedComplex> = orbit.iter().map(ArbitraryComplex::to_fixed).collect();
        let series = compute_series(&orbit_f64);
        Self {
            orbit,
            orbit_f64,
            series,
        }
    }

    pub fn c_ref(&self) -> &ArbitraryComplex {
        &self.orbit[0]
    }

    pub fn len(&self) -> usize {
        self.orbit.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orbit.is_empty()
    }

    pub fn precision_bits(&self) -> usize {
        self.c_ref().precision_bits()
    }
}

/// Iterate `z ← z² + c` from `z₀ = c`, storing at most `max_iterations`
/// positions and stopping before the first one beyond the bailout.
///
/// Position 0 is always stored.
pub fn compute_orbit(
    c_ref: &ArbitraryComplex,
    max_iterations: u32,
    bailout_sq: f64,
) -> Vec<ArbitraryComplex> {
    let capacity = max_iterations.max(1) as usize;
    let mut orbit = Vec::with_capacity(capacity);
    let mut z = c_ref.clone();
    orbit.push(z.clone());

    while orbit.len() < capacity {
        z = z.square_add(c_ref);
        if z.norm_sq_f64() > bailout_sq {
            break;
        }
        orbit.push(z.clone());
    }

    orbit
}

/// Pixels tried as reference candidates on a `rows × cols` grid.
///
/// Three horizontal lines at a quarter, half and three quarters of the
/// height sampled on even columns, then the vertical center line sampled on
/// even rows.
pub fn probe_candidates(rows: usize, cols: usize) -> impl Iterator<Item = (usize, usize)> {
    let horizontal = (0..cols)
        .step_by(2)
        .flat_map(move |col| [(rows / 4, col), (rows / 2, col), (3 * rows / 4, col)]);
    let vertical = (0..rows).step_by(2).map(move |row| (row, cols / 2));
    horizontal.chain(vertical)
}

/// Probe the candidate pixels of `window` and keep the deepest orbit.
///
/// Only a strictly longer orbit replaces the current one, so ties go to the
/// earliest candidate. A full-length orbit ends the search.
pub fn probe_deepest_orbit(
    window: &ViewWindow,
    rows: usize,
    cols: usize,
    max_iterations: u32,
    bailout_sq: f64,
) -> ReferenceOrbit {
    let full_length = max_iterations.max(1) as usize;

    let deepest = probe_candidates(rows, cols).fold(
        None::<Vec<ArbitraryComplex>>,
        |deepest, (row, col)| {
            if matches!(&deepest, Some(orbit) if orbit.len() >= full_length) {
                return deepest;
            }
            let point = window.point_at(row, col, 1, rows, cols);
            let candidate = compute_orbit(&point, max_iterations, bailout_sq);
            match deepest {
                Some(orbit) if orbit.len() >= candidate.len() => Some(orbit),
                _ => Some(candidate),
            }
        },
    );

    // An empty grid has no candidates; fall back to the view center.
    let orbit = deepest
        .unwrap_or_else(|| compute_orbit(&window.center, max_iterations, bailout_sq));

    log::info!("Deepest probe was {} / {} iterations", orbit.len(), full_length);

    ReferenceOrbit::from_orbit(orbit)
}
