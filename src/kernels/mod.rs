//! Inner-loop kernels for matrix multiplication.
//!
//! `transposed_dot` computes output rows from A and B^T, reading two
//! contiguous rows per output cell. Shared by the serial path and every
//! worker of the threaded engine.

pub mod transposed_dot;
