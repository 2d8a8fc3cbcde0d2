//! Series approximation coefficients.
//!
//! For a pixel offset δ from the reference point the orbit position is
//! approximated by `X_i + A_i·δ + B_i·δ² + C_i·δ³`, with
//!
//! ```text
//! A_0 = 1, B_0 = 0, C_0 = 0
//! A_i = 2·X_{i-1}·A_{i-1} + 1
//! B_i = 2·X_{i-1}·B_{i-1} + A_i²
//! C_i = 2·X_{i-1}·C_{i-1} + 2·A_i·B_i
//! ```

use deepbrot_core::FixedComplex;

/// Coefficient sequences A, B, C, one entry per orbit position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeriesCoefficients {
    pub a: Vec<FixedComplex>,
    pub b: Vec<FixedComplex>,
    pub c: Vec<FixedComplex>,
}

impl SeriesCoefficients {
    pub fn len(&self) -> usize {
        self.a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }
}

pub fn compute_series(orbit: &[FixedComplex]) -> SeriesCoefficients {
    let len = orbit.len();
    let mut a = Vec::with_capacity(len);
    let mut b = Vec::with_capacity(len);
    let mut c = Vec::with_capacity(len);
    if len == 0 {
        return SeriesCoefficients { a, b, c };
    }

    a.push(FixedComplex::ONE);
    b.push(FixedComplex::ZERO);
    c.push(FixedComplex::ZERO);

    for i in 1..len {
        let two_x = orbit[i - 1].scale(2.0);
        let a_i = two_x.mul(&a[i - 1]).add(&FixedComplex::ONE);
        let b_i = two_x.mul(&b[i - 1]).add(&a_i.square());
        let c_i = two_x.mul(&c[i - 1]).add(&a_i.mul(&b_i).scale(2.0));
        a.push(a_i);
        b.push(b_i);
        c.push(c_i);
    }

    SeriesCoefficients { a, b, c }
}
