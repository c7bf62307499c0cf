//! Multi-threaded multiplication engine.
//!
//! - `partition`: splits output rows into one contiguous range per worker
//! - `rendezvous`: the start gate workers and orchestrator meet at
//! - `multiplier`: spawns the workers, releases them together, times the run

pub mod multiplier;
pub mod partition;
pub mod rendezvous;
