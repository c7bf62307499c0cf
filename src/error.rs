use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("worker count must be at least 1, got {0}")]
    InvalidWorkerCount(usize),
    #[error("matrix dimension must be at least 1")]
    EmptyMatrix,
    #[error("dimension mismatch: expected {expected}x{expected}, got {got}x{got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("expected {expected} elements for a square matrix, got {got}")]
    ElementCount { expected: usize, got: usize },
    #[error("row ranges do not tile [0, {dim}): {reason}")]
    BadPartition { dim: usize, reason: String },
    #[error("failed to spawn worker {worker}: {source}")]
    Spawn {
        worker: usize,
        #[source]
        source: io::Error,
    },
    #[error("worker start gate was aborted before release")]
    StartAborted,
    #[error("worker {worker} panicked")]
    WorkerPanicked { worker: usize },
}

pub type Result<T> = std::result::Result<T, EngineError>;
