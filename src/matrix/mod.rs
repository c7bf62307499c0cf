//! Square matrix storage and the layout work done before a run.
//!
//! - `square`: the owned row-major `Matrix`
//! - `transpose`: builds the transposed copy of an operand
//! - `layout`: prepares A, B, B^T and C for one run
//! - `naive_ijk`: strided reference product, used to check results

pub mod layout;
pub mod naive_ijk;
pub mod square;
pub mod transpose;
