//! Render pass driving.
//!
//! A pass is `precompute()` followed by every row, polling the cancellation
//! checker before each row. A cancelled pass leaves the rows it finished in
//! the grid.

use crate::{CancellationChecker, EngineError, FractalEngine};
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOutcome {
    pub rows_completed: usize,
    pub cancelled: bool,
    pub elapsed: Duration,
}

pub fn render_pass<C: CancellationChecker>(
    engine: &mut FractalEngine,
    checker: &C,
) -> Result<RenderOutcome, EngineError> {
    let start = Instant::now();
    engine.precompute()?;

    let rows = engine.rows();
    let mut rows_completed = 0;
    for row in 0..rows {
        if checker.is_cancelled() {
            break;
        }
        engine.compute_row(row)?;
        rows_completed += 1;
    }

    Ok(finish(rows_completed, rows, start))
}

/// Like `render_pass`, with rows distributed over the rayon pool. Rows not
/// yet started when cancellation is observed are skipped.
pub fn render_pass_parallel<C: CancellationChecker + Sync>(
    engine: &mut FractalEngine,
    checker: &C,
) -> Result<RenderOutcome, EngineError> {
    let start = Instant::now();
    engine.precompute()?;

    let rows = engine.rows();
    let rows_completed = engine.compute_rows_parallel(|_| checker.is_cancelled())?;

    Ok(finish(rows_completed, rows, start))
}

fn finish(rows_completed: usize, rows: usize, start: Instant) -> RenderOutcome {
    let outcome = RenderOutcome {
        rows_completed,
        cancelled: rows_completed < rows,
        elapsed: start.elapsed(),
    };
    if outcome.cancelled {
        log::debug!(
            "Render cancelled after {} / {} rows ({:.1}ms)",
            rows_completed,
            rows,
            outcome.elapsed.as_secs_f64() * 1000.0
        );
    } else {
        log::info!(
            "Rendered {} rows in {:.1}ms",
            rows,
            outcome.elapsed.as_secs_f64() * 1000.0
        );
    }
    outcome
}
