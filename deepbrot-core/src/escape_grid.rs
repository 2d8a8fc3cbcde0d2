//! Per-pixel escape results.

use serde::{Deserialize, Serialize};

/// Escape-time result for one pixel.
///
/// `iterations == max_iterations` means the point never escaped, in which case
/// `smoothing` is 0 and carries no meaning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EscapeResult {
    pub iterations: u32,
    /// Continuous dwell correction for interpolated coloring.
    pub smoothing: f32,
}

impl EscapeResult {
    pub fn escaped(iterations: u32, smoothing: f64) -> Self {
        Self {
            iterations,
            smoothing: smoothing as f32,
        }
    }

    pub fn interior(max_iterations: u32) -> Self {
        Self {
            iterations: max_iterations,
            smoothing: 0.0,
        }
    }

    pub fn did_escape(&self, max_iterations: u32) -> bool {
        self.iterations < max_iterations
    }

    /// Iteration count with the smoothing fraction folded in.
    pub fn continuous(&self) -> f64 {
        self.iterations as f64 + self.smoothing as f64
    }
}

/// Dense row-major grid of escape results.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EscapeGrid {
    rows: usize,
    cols: usize,
    values: Vec<EscapeResult>,
}

impl EscapeGrid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: vec![EscapeResult::default(); rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn at(&self, row: usize, col: usize) -> &EscapeResult {
        &self.values[row * self.cols + col]
    }

    pub fn at_mut(&mut self, row: usize, col: usize) -> &mut EscapeResult {
        &mut self.values[row * self.cols + col]
    }

    pub fn row(&self, row: usize) -> &[EscapeResult] {
        &self.values[row * self.cols..(row + 1) * self.cols]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [EscapeResult] {
        &mut self.values[row * self.cols..(row + 1) * self.cols]
    }

    /// All cells in row-major order; rows are consecutive `cols`-sized chunks.
    pub fn values_mut(&mut self) -> &mut [EscapeResult] {
        &mut self.values
    }

    pub fn values(&self) -> &[EscapeResult] {
        &self.values
    }

    /// Average of the `scale × scale` block whose top-left cell is
    /// `(scale·row, scale·col)`.
    ///
    /// Whole iterations are summed exactly and only the remainder goes
    /// through floating point, so a block of identical cells reads back its
    /// own iteration count.
    pub fn block_average(&self, row: usize, col: usize, scale: usize) -> EscapeResult {
        let scale = scale.max(1);
        let mut iteration_sum: u64 = 0;
        let mut smoothing_sum: f64 = 0.0;
        for r in scale * row..scale * (row + 1) {
            for c in scale * col..scale * (col + 1) {
                let cell = self.at(r, c);
                iteration_sum += cell.iterations as u64;
                smoothing_sum += cell.smoothing as f64;
            }
        }

        let count = (scale * scale) as u64;
        let mut whole = iteration_sum / count;
        let mut fraction =
            (iteration_sum % count) as f64 / count as f64 + smoothing_sum / count as f64;
        while fraction >= 1.0 {
            whole += 1;
            fraction -= 1.0;
        }
        while fraction < 0.0 && whole > 0 {
            whole -= 1;
            fraction += 1.0;
        }

        EscapeResult::escaped(whole as u32, fraction)
    }

    /// Grid grown by `scale` per axis, each cell duplicated into its block.
    pub fn scaled_up(&self, scale: usize) -> Self {
        let scale = scale.max(1);
        let mut scaled = Self::new(self.rows * scale, self.cols * scale);
        for r in 0..scaled.rows {
            let source = self.row(r / scale);
            for (c, cell) in scaled.row_mut(r).iter_mut().enumerate() {
                *cell = source[c / scale];
            }
        }
        scaled
    }

    /// Grid shrunk by `scale` per axis, each cell the average of its block.
    pub fn scaled_down(&self, scale: usize) -> Self {
        let scale = scale.max(1);
        let mut scaled = Self::new(self.rows / scale, self.cols / scale);
        for r in 0..scaled.rows {
            for c in 0..scaled.cols {
                *scaled.at_mut(r, c) = self.block_average(r, c, scale);
            }
        }
        scaled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_grid() -> EscapeGrid {
        let mut grid = EscapeGrid::new(3, 4);
        for r in 0..3 {
            for c in 0..4 {
                *grid.at_mut(r, c) = EscapeResult::escaped((r * 4 + c) as u32, 0.25);
            }
        }
        grid
    }

    #[test]
    fn grid_is_row_major() {
        let grid = sample_grid();
        assert_eq!(grid.values()[5].iterations, 5);
        assert_eq!(grid.at(1, 1).iterations, 5);
        assert_eq!(grid.row(2)[3].iterations, 11);
    }

    #[test]
    fn interior_result_reports_no_escape() {
        let result = EscapeResult::interior(256);
        assert!(!result.did_escape(256));
        assert_eq!(result.smoothing, 0.0);
        assert!(EscapeResult::escaped(3, 0.5).did_escape(256));
    }

    #[test]
    fn block_average_resplits_integer_and_fraction() {
        let mut grid = EscapeGrid::new(2, 2);
        *grid.at_mut(0, 0) = EscapeResult::escaped(10, 0.5);
        *grid.at_mut(0, 1) = EscapeResult::escaped(11, 0.5);
        *grid.at_mut(1, 0) = EscapeResult::escaped(10, 0.0);
        *grid.at_mut(1, 1) = EscapeResult::escaped(12, 0.0);
        // (10.5 + 11.5 + 10 + 12) / 4 = 11
        let avg = grid.block_average(0, 0, 2);
        assert_eq!(avg.iterations, 11);
        assert!(avg.smoothing.abs() < 1e-6);
    }

    #[test]
    fn scaled_down_shrinks_dimensions() {
        let grid = EscapeGrid::new(6, 9).scaled_down(3);
        assert_eq!((grid.rows(), grid.cols()), (2, 3));
    }

    #[test]
    fn scale_one_is_identity() {
        let grid = sample_grid();
        assert_eq!(grid.scaled_up(1), grid);
        assert_eq!(grid.scaled_down(1), grid);
    }

    proptest! {
        #[test]
        fn scale_up_then_block_average_reproduces_cells(
            iterations in proptest::collection::vec(0u32..100_000, 6),
            smoothing in proptest::collection::vec(0.0f32..1.0, 6),
            scale in 1usize..5,
        ) {
            let mut grid = EscapeGrid::new(2, 3);
            for (i, cell) in grid.values_mut().iter_mut().enumerate() {
                *cell = EscapeResult { iterations: iterations[i], smoothing: smoothing[i] };
            }

            let up = grid.scaled_up(scale);
            prop_assert_eq!(up.rows(), 2 * scale);
            prop_assert_eq!(up.cols(), 3 * scale);

            let tolerance = 1.0 / (scale * scale) as f32;
            for r in 0..2 {
                for c in 0..3 {
                    let original = grid.at(r, c);
                    let back = up.block_average(r, c, scale);
                    prop_assert_eq!(back.iterations, original.iterations);
                    prop_assert!((back.smoothing - original.smoothing).abs() <= tolerance);
                }
            }
        }
    }
}
