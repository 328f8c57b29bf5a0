use rhdl::prelude::RHDLError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("cannot read job file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed job file: {0}")]
    Csv(#[from] csv::Error),

    #[error("simulation failed: {0}")]
    Simulation(#[from] RHDLError),

    #[error("{delivered} results for {offered} jobs")]
    ResultCount { offered: usize, delivered: usize },

    #[error("job {index}: no output_valid within {limit} cycles of acceptance")]
    Timeout { index: usize, limit: usize },

    #[error("job {index}: expected {expected}, PE produced {actual}")]
    Mismatch { index: usize, expected: i64, actual: i64 },

    #[error("product element ({row}, {col}): expected {expected}, PE produced {actual}")]
    MatrixMismatch { row: usize, col: usize, expected: i32, actual: i32 },

    #[error("partial sum {value} at ({row}, {col}) does not fit the accumulator input")]
    PartialSumRange { row: usize, col: usize, value: i64 },

    #[error("matrix shapes {left:?} x {right:?} do not chain")]
    Shape { left: (usize, usize), right: (usize, usize) },
}
