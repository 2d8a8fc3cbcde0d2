//! Closed-form interior tests for the two largest hyperbolic components.
//!
//! With `q = (x - 1/4)² + y²` a point lies in the main cardioid iff
//! `q·(q + x - 1/4) < y²/4`, and in the period-2 disk iff
//! `(x + 1)² + y² < 1/16`.

use deepbrot_core::{ArbitraryComplex, BigFloat, FixedComplex};

/// Interior test in double precision.
pub fn in_main_bulbs(c: &FixedComplex) -> bool {
    let (x, y) = (c.re, c.im);
    let y_sq = y * y;

    let xs = x - 0.25;
    let q = xs * xs + y_sq;
    if q * (q + xs) < 0.25 * y_sq {
        return true;
    }

    let xp = x + 1.0;
    xp * xp + y_sq < 0.0625
}

/// Interior test at the working precision of `c`.
pub fn in_main_bulbs_arbitrary(c: &ArbitraryComplex) -> bool {
    let precision = c.precision_bits();
    let quarter = BigFloat::with_precision(0.25, precision);
    let y_sq = c.im.mul(&c.im);

    let xs = c.re.sub(&quarter);
    let q = xs.mul(&xs).add(&y_sq);
    if q.mul(&q.add(&xs)) < quarter.mul(&y_sq) {
        return true;
    }

    let xp = c.re.add_f64(1.0);
    xp.mul(&xp).add(&y_sq) < BigFloat::with_precision(0.0625, precision)
}
