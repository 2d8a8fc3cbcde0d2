use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Row {row} out of range for a grid of {rows} rows")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("No pass kernel: precompute() must run before rows are computed")]
    NotPrecomputed,

    #[error("Step exponent {exponent} is below the depth limit {limit}")]
    DepthLimitExceeded { exponent: isize, limit: isize },
}
