//! The escape-time engine.
//!
//! `FractalEngine` owns the view window, the iteration cap and the escape
//! grid. Every view mutation re-derives the working precision and drops the
//! pass kernel; `precompute()` chooses a new one and `compute_row` fills the
//! grid with it.

use crate::perturbation::{escape_hardware, escape_perturbed, probe_deepest_orbit, ReferenceOrbit};
use crate::EngineError;
use deepbrot_core::{
    calculate_precision_bits, ArbitraryComplex, BigFloat, EngineConfig, EscapeGrid, EscapeResult,
    FixedComplex, LegacyViewState, ViewState, ViewWindow,
};
use rayon::prelude::*;

/// Per-pass choice of evaluator.
#[derive(Clone, Debug)]
pub enum PassKernel {
    /// Plain f64 iteration.
    Hardware,
    /// Series approximation against a reference orbit.
    Perturbed(ReferenceOrbit),
}

pub struct FractalEngine {
    config: EngineConfig,
    window: ViewWindow,
    grid: EscapeGrid,
    max_iterations: u32,
    precision_bits: usize,
    kernel: Option<PassKernel>,
}

/// Shared read-only state for filling rows.
struct RowContext<'a> {
    kernel: &'a PassKernel,
    window: &'a ViewWindow,
    config: &'a EngineConfig,
    max_iterations: u32,
    rows: usize,
    cols: usize,
}

impl RowContext<'_> {
    fn fill_row(&self, row: usize, out: &mut [EscapeResult]) {
        let imag = self.window.imag_at(row, 1, self.rows);
        match self.kernel {
            PassKernel::Hardware => {
                let im = imag.to_f64();
                for (col, cell) in out.iter_mut().enumerate() {
                    let re = self.window.real_at(col, 1, self.cols).to_f64();
                    *cell = escape_hardware(
                        FixedComplex::new(re, im),
                        self.max_iterations,
                        self.config,
                    );
                }
            }
            PassKernel::Perturbed(reference) => {
                for (col, cell) in out.iter_mut().enumerate() {
                    let point =
                        ArbitraryComplex::new(self.window.real_at(col, 1, self.cols), imag.clone());
                    *cell = escape_perturbed(&point, reference, self.max_iterations, self.config);
                }
            }
        }
    }
}

impl FractalEngine {
    /// Engine over a `rows × cols` grid showing the default view.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_config(rows, cols, EngineConfig::default())
    }

    pub fn with_config(rows: usize, cols: usize, config: EngineConfig) -> Self {
        let window = ViewWindow::fitted(&config, rows, cols, config.min_precision_bits);
        let mut engine = Self {
            max_iterations: config.default_max_iterations.max(1),
            precision_bits: config.min_precision_bits,
            grid: EscapeGrid::new(rows, cols),
            window,
            config,
            kernel: None,
        };
        engine.refresh_view();
        engine
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Set the iteration cap (at least 1). Keeps the current kernel; the
    /// next `precompute()` picks up the new cap.
    pub fn set_max_iterations(&mut self, max_iterations: u32) {
        self.max_iterations = max_iterations.max(1);
    }

    pub fn precision_bits(&self) -> usize {
        self.precision_bits
    }

    pub fn window(&self) -> &ViewWindow {
        &self.window
    }

    pub fn kernel(&self) -> Option<&PassKernel> {
        self.kernel.as_ref()
    }

    pub fn reference_orbit(&self) -> Option<&ReferenceOrbit> {
        match &self.kernel {
            Some(PassKernel::Perturbed(reference)) => Some(reference),
            _ => None,
        }
    }

    /// Both step components are coarse enough for plain f64 iteration.
    pub fn use_hardware(&self) -> bool {
        let threshold = self.config.hardware_step_threshold;
        self.window.step.re.to_f64().abs() >= threshold
            && self.window.step.im.to_f64().abs() >= threshold
    }

    /// Choose the pass kernel for the current view, probing a reference
    /// orbit when the view is too deep for f64.
    pub fn precompute(&mut self) -> Result<(), EngineError> {
        let exponent = self
            .window
            .step
            .re
            .exponent()
            .min(self.window.step.im.exponent());
        if exponent < self.config.depth_limit_exponent {
            self.kernel = None;
            return Err(EngineError::DepthLimitExceeded {
                exponent,
                limit: self.config.depth_limit_exponent,
            });
        }

        let kernel = if self.use_hardware() {
            log::debug!("Hardware pass at step {}", self.window.step.re);
            PassKernel::Hardware
        } else {
            log::debug!(
                "Perturbed pass at {} bits, step {}",
                self.precision_bits,
                self.window.step.re
            );
            PassKernel::Perturbed(probe_deepest_orbit(
                &self.window,
                self.rows(),
                self.cols(),
                self.max_iterations,
                self.config.bailout_sq(),
            ))
        };
        self.kernel = Some(kernel);
        Ok(())
    }

    /// Evaluate every pixel of `row` with the current kernel.
    pub fn compute_row(&mut self, row: usize) -> Result<(), EngineError> {
        let rows = self.grid.rows();
        if row >= rows {
            return Err(EngineError::RowOutOfRange { row, rows });
        }
        let kernel = self.kernel.as_ref().ok_or(EngineError::NotPrecomputed)?;
        let context = RowContext {
            kernel,
            window: &self.window,
            config: &self.config,
            max_iterations: self.max_iterations,
            rows,
            cols: self.grid.cols(),
        };
        context.fill_row(row, self.grid.row_mut(row));
        Ok(())
    }

    /// Evaluate all rows on the rayon pool. Rows for which `skip_row`
    /// returns true are left untouched.
    pub fn compute_rows_parallel<F>(&mut self, skip_row: F) -> Result<usize, EngineError>
    where
        F: Fn(usize) -> bool + Sync,
    {
        if self.kernel.is_none() {
            return Err(EngineError::NotPrecomputed);
        }
        let cols = self.grid.cols();
        if cols == 0 || self.grid.rows() == 0 {
            return Ok(0);
        }

        let Self {
            kernel,
            window,
            config,
            grid,
            max_iterations,
            ..
        } = self;
        let context = RowContext {
            kernel: kernel.as_ref().ok_or(EngineError::NotPrecomputed)?,
            window,
            config,
            max_iterations: *max_iterations,
            rows: grid.rows(),
            cols,
        };

        let completed: usize = grid
            .values_mut()
            .par_chunks_mut(cols)
            .enumerate()
            .map(|(row, out)| {
                if skip_row(row) {
                    0
                } else {
                    context.fill_row(row, out);
                    1
                }
            })
            .sum();
        Ok(completed)
    }

    /// Complex coordinate of pixel `(row, col)` on a grid `scale` times
    /// denser than the engine's.
    pub fn point_at(&self, row: usize, col: usize, scale: usize) -> ArbitraryComplex {
        self.window
            .point_at(row, col, scale, self.grid.rows(), self.grid.cols())
    }

    /// Pan by a pixel drag of `(d_row, d_col)`.
    pub fn translate(&mut self, d_row: i64, d_col: i64, scale: usize) {
        self.window.translate(d_row, d_col, scale);
        self.refresh_view();
    }

    pub fn zoom(&mut self, factor: f64) {
        self.window.divide_step(factor);
        self.refresh_view();
    }

    /// Zoom keeping the point under pixel `(row, col)` fixed.
    pub fn zoom_at(&mut self, factor: f64, row: usize, col: usize, scale: usize) {
        let (rows, cols) = (self.grid.rows(), self.grid.cols());
        self.window.zoom_at(factor, row, col, scale, rows, cols);
        self.refresh_view();
    }

    pub fn at(&self, row: usize, col: usize) -> EscapeResult {
        *self.grid.at(row, col)
    }

    pub fn block_average(&self, row: usize, col: usize, scale: usize) -> EscapeResult {
        self.grid.block_average(row, col, scale)
    }

    pub fn grid(&self) -> &EscapeGrid {
        &self.grid
    }

    /// Grow the grid `scale` times per axis; each pixel now covers a
    /// `1/scale` step.
    pub fn scale_up(&mut self, scale: usize) {
        if scale <= 1 {
            return;
        }
        self.grid = self.grid.scaled_up(scale);
        self.window.divide_step(scale as f64);
        self.refresh_view();
    }

    /// Shrink the grid `scale` times per axis by block averaging.
    pub fn scale_down(&mut self, scale: usize) {
        if scale <= 1 {
            return;
        }
        self.grid = self.grid.scaled_down(scale);
        self.window.multiply_step(scale as f64);
        self.refresh_view();
    }

    /// Adopt a legacy view, rescaling its steps from the legacy canvas.
    pub fn load_legacy(&mut self, state: &LegacyViewState) {
        let (legacy_cols, legacy_rows) = self.config.legacy_canvas;
        let precision = state.step.precision_bits();
        let cols = BigFloat::with_precision(self.grid.cols().max(1) as f64, precision);
        let rows = BigFloat::with_precision(self.grid.rows().max(1) as f64, precision);

        self.window = ViewWindow::new(
            state.center.clone(),
            ArbitraryComplex::new(
                state.step.re.mul_f64(legacy_cols as f64).div(&cols),
                state.step.im.mul_f64(legacy_rows as f64).div(&rows),
            ),
        );
        self.max_iterations = state.max_iterations.max(1);
        self.refresh_view();
    }

    /// The current view in legacy form, steps scaled to the legacy canvas.
    pub fn legacy_state(&self) -> LegacyViewState {
        let (legacy_cols, legacy_rows) = self.config.legacy_canvas;
        let precision = self.precision_bits;
        let legacy_cols = BigFloat::with_precision(legacy_cols as f64, precision);
        let legacy_rows = BigFloat::with_precision(legacy_rows as f64, precision);

        LegacyViewState {
            max_iterations: self.max_iterations,
            center: self.window.center.clone(),
            step: ArbitraryComplex::new(
                self.window
                    .step
                    .re
                    .mul_f64(self.grid.cols() as f64)
                    .div(&legacy_cols),
                self.window
                    .step
                    .im
                    .mul_f64(self.grid.rows() as f64)
                    .div(&legacy_rows),
            ),
        }
    }

    pub fn view_state(&self) -> ViewState {
        ViewState {
            max_iterations: self.max_iterations,
            window: self.window.clone(),
        }
    }

    pub fn restore_view_state(&mut self, state: ViewState) {
        self.window = state.window;
        self.max_iterations = state.max_iterations.max(1);
        self.refresh_view();
    }

    /// Re-derive the working precision and drop the kernel.
    fn refresh_view(&mut self) {
        let precision = calculate_precision_bits(&self.window.step.re, &self.config);
        if precision != self.precision_bits {
            log::debug!("Precision {} -> {} bits", self.precision_bits, precision);
        }
        self.precision_bits = precision;
        self.window.set_precision(precision);
        self.kernel = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_engine_uses_defaults() {
        let engine = FractalEngine::new(60, 80);
        assert_eq!((engine.rows(), engine.cols()), (60, 80));
        assert_eq!(engine.max_iterations(), 256);
        assert_eq!(engine.precision_bits(), 64);
        assert!(engine.use_hardware());
        assert!(engine.kernel().is_none());
    }

    #[test]
    fn compute_row_requires_precompute() {
        let mut engine = FractalEngine::new(4, 4);
        assert_eq!(engine.compute_row(0), Err(EngineError::NotPrecomputed));
        engine.precompute().unwrap();
        assert!(engine.compute_row(3).is_ok());
        assert_eq!(
            engine.compute_row(4),
            Err(EngineError::RowOutOfRange { row: 4, rows: 4 })
        );
    }

    #[test]
    fn iteration_cap_is_clamped_and_keeps_kernel() {
        let mut engine = FractalEngine::new(4, 4);
        engine.precompute().unwrap();
        engine.set_max_iterations(0);
        assert_eq!(engine.max_iterations(), 1);
        assert!(engine.kernel().is_some());
    }

    fn assert_drops_kernel(mutate: impl FnOnce(&mut FractalEngine)) {
        let mut engine = FractalEngine::new(8, 8);
        engine.precompute().unwrap();
        assert!(engine.kernel().is_some());
        mutate(&mut engine);
        assert!(engine.kernel().is_none());
    }

    #[test]
    fn every_view_mutation_drops_the_kernel() {
        assert_drops_kernel(|e| e.translate(1, -2, 1));
        assert_drops_kernel(|e| e.zoom(2.0));
        assert_drops_kernel(|e| e.zoom_at(2.0, 1, 1, 1));
        assert_drops_kernel(|e| e.scale_up(2));
        assert_drops_kernel(|e| e.scale_down(2));
        assert_drops_kernel(|e| e.restore_view_state(e.view_state()));
        assert_drops_kernel(|e| {
            let legacy = e.legacy_state();
            e.load_legacy(&legacy)
        });
    }

    #[test]
    fn depth_limit_is_reported() {
        let mut engine = FractalEngine::new(4, 4);
        let state = ViewState {
            max_iterations: 64,
            window: ViewWindow::from_strings("-0.5", "0", "1e-400", "1e-400", 1500).unwrap(),
        };
        engine.restore_view_state(state);
        assert!(matches!(
            engine.precompute(),
            Err(EngineError::DepthLimitExceeded { limit: -1000, .. })
        ));
        assert!(engine.kernel().is_none());
    }

    #[test]
    fn hardware_rows_match_direct_evaluation() {
        let mut engine = FractalEngine::new(6, 8);
        engine.precompute().unwrap();
        engine.compute_row(2).unwrap();
        for col in 0..8 {
            let c = engine.point_at(2, col, 1).to_fixed();
            assert_eq!(
                engine.at(2, col),
                escape_hardware(c, 256, engine.config())
            );
        }
    }

    #[test]
    fn parallel_rows_match_sequential_rows() {
        let mut sequential = FractalEngine::new(12, 16);
        sequential.precompute().unwrap();
        for row in 0..12 {
            sequential.compute_row(row).unwrap();
        }

        let mut parallel = FractalEngine::new(12, 16);
        parallel.precompute().unwrap();
        assert_eq!(parallel.compute_rows_parallel(|_| false), Ok(12));
        assert_eq!(parallel.grid(), sequential.grid());
    }

    #[test]
    fn scale_up_then_down_restores_step_and_size() {
        let mut engine = FractalEngine::new(6, 8);
        engine.scale_up(3);
        assert_eq!((engine.rows(), engine.cols()), (18, 24));
        assert!((engine.window().step.re.to_f64() - 0.5 / 3.0).abs() < 1e-15);
        engine.scale_down(3);
        assert_eq!((engine.rows(), engine.cols()), (6, 8));
        assert!((engine.window().step.re.to_f64() - 0.5).abs() < 1e-15);
    }

    #[test]
    fn scale_of_zero_or_one_is_a_no_op() {
        let mut engine = FractalEngine::new(6, 8);
        engine.precompute().unwrap();
        engine.scale_up(1);
        engine.scale_down(0);
        assert_eq!((engine.rows(), engine.cols()), (6, 8));
        assert!(engine.kernel().is_some());
    }
}
