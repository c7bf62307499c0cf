//! Output of a finished run: the result dump and the timing report.

pub mod dump;
pub mod profile;
