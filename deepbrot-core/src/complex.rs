//! Complex number types for the two precision tiers.
//!
//! `ArbitraryComplex` carries reference orbits, view centers and pixel
//! coordinates at the working precision. `FixedComplex` carries everything
//! that stays numerically small regardless of zoom depth: perturbation
//! deltas and series coefficients.

use crate::BigFloat;
use serde::{Deserialize, Serialize};

/// Double precision complex number.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FixedComplex {
    pub re: f64,
    pub im: f64,
}

impl FixedComplex {
    pub const ZERO: Self = Self { re: 0.0, im: 0.0 };
    pub const ONE: Self = Self { re: 1.0, im: 0.0 };

    #[inline]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    #[inline]
    pub fn add(&self, other: &Self) -> Self {
        Self {
            re: self.re + other.re,
            im: self.im + other.im,
        }
    }

    #[inline]
    pub fn mul(&self, other: &Self) -> Self {
        Self {
            re: self.re * other.re - self.im * other.im,
            im: self.re * other.im + self.im * other.re,
        }
    }

    #[inline]
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            re: self.re * factor,
            im: self.im * factor,
        }
    }

    #[inline]
    pub fn square(&self) -> Self {
        Self {
            re: self.re * self.re - self.im * self.im,
            im: 2.0 * self.re * self.im,
        }
    }

    /// Magnitude squared.
    #[inline]
    pub fn norm_sq(&self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }
}

/// Arbitrary precision complex number; both parts share one precision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArbitraryComplex {
    pub re: BigFloat,
    pub im: BigFloat,
}

impl ArbitraryComplex {
    pub fn new(re: BigFloat, im: BigFloat) -> Self {
        Self { re, im }
    }

    pub fn from_f64(re: f64, im: f64, precision_bits: usize) -> Self {
        Self {
            re: BigFloat::with_precision(re, precision_bits),
            im: BigFloat::with_precision(im, precision_bits),
        }
    }

    pub fn zero(precision_bits: usize) -> Self {
        Self::from_f64(0.0, 0.0, precision_bits)
    }

    pub fn precision_bits(&self) -> usize {
        self.re.precision_bits().max(self.im.precision_bits())
    }

    /// Re-round both parts to a new working precision.
    pub fn to_precision(&self, precision_bits: usize) -> Self {
        Self {
            re: self.re.to_precision(precision_bits),
            im: self.im.to_precision(precision_bits),
        }
    }

    /// Descend to double precision.
    pub fn to_fixed(&self) -> FixedComplex {
        FixedComplex::new(self.re.to_f64(), self.im.to_f64())
    }

    pub fn add(&self, other: &Self) -> Self {
        Self {
            re: self.re.add(&other.re),
            im: self.im.add(&other.im),
        }
    }

    pub fn sub(&self, other: &Self) -> Self {
        Self {
            re: self.re.sub(&other.re),
            im: self.im.sub(&other.im),
        }
    }

    /// `self + offset`, with the offset lifted to this value's precision.
    pub fn add_fixed(&self, offset: &FixedComplex) -> Self {
        Self {
            re: self.re.add_f64(offset.re),
            im: self.im.add_f64(offset.im),
        }
    }

    /// One Mandelbrot step: `self² + c`.
    pub fn square_add(&self, c: &Self) -> Self {
        let re_sq = self.re.mul(&self.re);
        let im_sq = self.im.mul(&self.im);
        // 2·re·im computed as (re·im)·2
        let cross = self.re.mul(&self.im).mul_f64(2.0);
        Self {
            re: re_sq.sub(&im_sq).add(&c.re),
            im: cross.add(&c.im),
        }
    }

    /// Magnitude squared of the double precision descent.
    ///
    /// Escape checks only need this much: positions near bailout are far
    /// inside the f64 range.
    pub fn norm_sq_f64(&self) -> f64 {
        self.to_fixed().norm_sq()
    }
}
