use crate::{ArbitraryComplex, BigFloat, EngineConfig};
use serde::{Deserialize, Serialize};

/// View window in fractal space with BigFloat precision
///
/// - `center`: the point drawn at pixel `(rows/2 - 1, cols/2)`
/// - `step`: fractal-space size of one pixel along each axis
///
/// Pixel rows grow downwards while the imaginary axis grows upwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewWindow {
    pub center: ArbitraryComplex,
    pub step: ArbitraryComplex,
}

impl ViewWindow {
    pub fn new(center: ArbitraryComplex, step: ArbitraryComplex) -> Self {
        Self { center, step }
    }

    /// Create new view window from f64 values with explicit precision
    pub fn from_f64(
        center_re: f64,
        center_im: f64,
        step_re: f64,
        step_im: f64,
        precision_bits: usize,
    ) -> Self {
        Self {
            center: ArbitraryComplex::from_f64(center_re, center_im, precision_bits),
            step: ArbitraryComplex::from_f64(step_re, step_im, precision_bits),
        }
    }

    /// Create view window from string representations (for extreme precision coordinates)
    ///
    /// Returns an error if any string cannot be parsed.
    pub fn from_strings(
        center_re: &str,
        center_im: &str,
        step_re: &str,
        step_im: &str,
        precision_bits: usize,
    ) -> Result<Self, String> {
        Ok(Self {
            center: ArbitraryComplex::new(
                BigFloat::from_string(center_re, precision_bits)?,
                BigFloat::from_string(center_im, precision_bits)?,
            ),
            step: ArbitraryComplex::new(
                BigFloat::from_string(step_re, precision_bits)?,
                BigFloat::from_string(step_im, precision_bits)?,
            ),
        })
    }

    /// The configured default view fitted to a `rows × cols` canvas.
    pub fn fitted(config: &EngineConfig, rows: usize, cols: usize, precision_bits: usize) -> Self {
        let (width, height) = config.default_extent;
        let step_re = BigFloat::with_precision(width, precision_bits)
            .div(&BigFloat::with_precision(cols.max(1) as f64, precision_bits));
        let step_im = BigFloat::with_precision(height, precision_bits)
            .div(&BigFloat::with_precision(rows.max(1) as f64, precision_bits));
        Self {
            center: ArbitraryComplex::from_f64(
                config.default_center.0,
                config.default_center.1,
                precision_bits,
            ),
            step: ArbitraryComplex::new(step_re, step_im),
        }
    }

    /// Get the precision bits of this view window
    pub fn precision_bits(&self) -> usize {
        self.step.re.precision_bits()
    }

    /// Re-round center and step to `precision_bits`.
    pub fn set_precision(&mut self, precision_bits: usize) {
        self.center = self.center.to_precision(precision_bits);
        self.step = self.step.to_precision(precision_bits);
    }

    /// Real coordinate of pixel column `col` on a grid `scale` times denser
    /// than `cols`.
    pub fn real_at(&self, col: usize, scale: usize, cols: usize) -> BigFloat {
        let offset = (scale * col) as i64 - (cols / 2) as i64;
        self.center.re.add(&self.step.re.mul_f64(offset as f64))
    }

    /// Imaginary coordinate of pixel row `row`.
    pub fn imag_at(&self, row: usize, scale: usize, rows: usize) -> BigFloat {
        let offset = (rows / 2) as i64 - (scale * row) as i64 - 1;
        self.center.im.add(&self.step.im.mul_f64(offset as f64))
    }

    pub fn point_at(
        &self,
        row: usize,
        col: usize,
        scale: usize,
        rows: usize,
        cols: usize,
    ) -> ArbitraryComplex {
        ArbitraryComplex::new(
            self.real_at(col, scale, cols),
            self.imag_at(row, scale, rows),
        )
    }

    /// Pan by a pixel drag: the content follows the pointer.
    pub fn translate(&mut self, d_row: i64, d_col: i64, scale: usize) {
        let scale = scale as i64;
        self.center.re = self
            .center
            .re
            .sub(&self.step.re.mul_f64((d_col * scale) as f64));
        self.center.im = self
            .center
            .im
            .add(&self.step.im.mul_f64((d_row * scale) as f64));
    }

    /// Divide the per-pixel step by `factor` (zoom in when `factor > 1`).
    pub fn divide_step(&mut self, factor: f64) {
        let precision = self.precision_bits();
        let divisor = BigFloat::with_precision(factor, precision);
        self.step = ArbitraryComplex::new(self.step.re.div(&divisor), self.step.im.div(&divisor));
    }

    pub fn multiply_step(&mut self, factor: f64) {
        self.step = ArbitraryComplex::new(
            self.step.re.mul_f64(factor),
            self.step.im.mul_f64(factor),
        );
    }

    /// Zoom by `factor` keeping the fractal point under pixel `(row, col)` fixed.
    pub fn zoom_at(
        &mut self,
        factor: f64,
        row: usize,
        col: usize,
        scale: usize,
        rows: usize,
        cols: usize,
    ) {
        let anchor = self.point_at(row, col, scale, rows, cols);
        self.divide_step(factor);
        let re_offset = (scale * col) as i64 - (cols / 2) as i64;
        let im_offset = (rows / 2) as i64 - (scale * row) as i64 - 1;
        self.center = ArbitraryComplex::new(
            anchor.re.sub(&self.step.re.mul_f64(re_offset as f64)),
            anchor.im.sub(&self.step.im.mul_f64(im_offset as f64)),
        );
    }
}
