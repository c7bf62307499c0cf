//! Barrier-synchronized multi-threaded multiply.
//!
//! One scoped worker per [`RowRange`]. Each worker owns a disjoint
//! `&mut` slice of C's rows, parks on the shared [`Rendezvous`], and
//! starts computing only once the orchestrator has taken its start
//! timestamp and released the gate. Timing stops after every worker has
//! been joined.

use std::io;
use std::mem;
use std::thread::{self, Scope, ScopedJoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use super::partition::{RowRange, partition, validate};
use super::rendezvous::{AbortOnDrop, Rendezvous};
use crate::error::{EngineError, Result};
use crate::kernels::transposed_dot::multiply_rows;
use crate::matrix::layout::Operands;
use crate::matrix::square::Matrix;

/// What one worker observed about its own run.
#[derive(Debug, Clone, Copy)]
pub struct WorkerStats {
    pub worker: usize,
    pub range: RowRange,
    /// Taken right after the worker left the gate.
    pub computing_at: Instant,
    pub finished_at: Instant,
}

#[derive(Debug, Clone)]
pub struct RunStats {
    /// Orchestrator's start timestamp, taken before the gate opened.
    pub started_at: Instant,
    /// From `started_at` until the last worker was joined.
    pub elapsed: Duration,
    pub workers: Vec<WorkerStats>,
}

/// Runs C = A × B over a fixed set of row ranges, one thread per range.
#[derive(Debug, Clone)]
pub struct SyncMultiplier {
    ranges: Vec<RowRange>,
    stack_size: Option<usize>,
    #[cfg(test)]
    fail_spawn_at: Option<usize>,
}

impl SyncMultiplier {
    pub fn new(ranges: Vec<RowRange>) -> Self {
        SyncMultiplier {
            ranges,
            stack_size: None,
            #[cfg(test)]
            fail_spawn_at: None,
        }
    }

    /// Partition `n` rows across `workers` threads (clamped to `n`).
    pub fn for_dim(n: usize, workers: usize) -> Result<Self> {
        Ok(Self::new(partition(n, workers)?))
    }

    /// Stack size for worker threads. Platform default when unset.
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    pub fn ranges(&self) -> &[RowRange] {
        &self.ranges
    }

    pub fn workers(&self) -> usize {
        self.ranges.len()
    }

    /// Compute C = A × B where `b_t` is B already transposed.
    ///
    /// Every cell of `c` is overwritten. If any worker thread cannot be
    /// created the gate is aborted, the workers already started are
    /// joined without computing, and the error is returned; `c` must not
    /// be trusted in that case.
    pub fn run(&self, a: &Matrix, b_t: &Matrix, c: &mut Matrix) -> Result<RunStats> {
        let n = a.dim();
        for m in [b_t, &*c] {
            if m.dim() != n {
                return Err(EngineError::DimensionMismatch {
                    expected: n,
                    got: m.dim(),
                });
            }
        }
        validate(n, &self.ranges)?;

        let workers = self.ranges.len();
        let gate = Rendezvous::new(workers + 1);

        let mut slices = Vec::with_capacity(workers);
        let mut rest = c.as_mut_slice();
        for range in &self.ranges {
            let (head, tail) = mem::take(&mut rest).split_at_mut(range.len() * n);
            slices.push(head);
            rest = tail;
        }

        debug!(dim = n, workers, "spawning workers");

        thread::scope(|s| {
            let _abort = AbortOnDrop::new(&gate);
            let mut handles = Vec::with_capacity(workers);

            for (w, (range, rows)) in self.ranges.iter().copied().zip(slices).enumerate() {
                let gate = &gate;
                let job = move || -> Option<WorkerStats> {
                    gate.arrive().ok()?;
                    let computing_at = Instant::now();
                    debug!(worker = w, range = %range, "computing");
                    multiply_rows(a, b_t, rows, range);
                    Some(WorkerStats {
                        worker: w,
                        range,
                        computing_at,
                        finished_at: Instant::now(),
                    })
                };

                match self.spawn_worker(s, w, job) {
                    Ok(handle) => handles.push(handle),
                    Err(source) => {
                        error!(worker = w, %source, "failed to spawn worker, aborting run");
                        gate.abort();
                        // Parked workers wake with Aborted and exit without touching C.
                        let _ = join_all(handles);
                        return Err(EngineError::Spawn { worker: w, source });
                    }
                }
            }

            let started_at = gate.lead().map_err(|_| EngineError::StartAborted)?;
            let stats = join_all(handles)?;
            let elapsed = started_at.elapsed();

            info!(
                dim = n,
                workers,
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                "multiplication finished"
            );
            Ok(RunStats {
                started_at,
                elapsed,
                workers: stats,
            })
        })
    }

    fn spawn_worker<'scope, 'env, F>(
        &self,
        scope: &'scope Scope<'scope, 'env>,
        worker: usize,
        job: F,
    ) -> io::Result<ScopedJoinHandle<'scope, Option<WorkerStats>>>
    where
        F: FnOnce() -> Option<WorkerStats> + Send + 'scope,
    {
        #[cfg(test)]
        if self.fail_spawn_at == Some(worker) {
            return Err(io::Error::other("injected spawn failure"));
        }

        let mut builder = thread::Builder::new().name(format!("matmul-worker-{}", worker));
        if let Some(bytes) = self.stack_size {
            builder = builder.stack_size(bytes);
        }
        builder.spawn_scoped(scope, job)
    }
}

/// Join every handle, even after a failure, so no panic is left for the
/// scope to re-raise. Reports the first failure.
fn join_all(handles: Vec<ScopedJoinHandle<'_, Option<WorkerStats>>>) -> Result<Vec<WorkerStats>> {
    let mut stats = Vec::with_capacity(handles.len());
    let mut first_err = None;
    for (w, handle) in handles.into_iter().enumerate() {
        match handle.join() {
            Ok(Some(s)) => stats.push(s),
            Ok(None) => {
                first_err.get_or_insert(EngineError::StartAborted);
            }
            Err(_) => {
                error!(worker = w, "worker panicked");
                first_err.get_or_insert(EngineError::WorkerPanicked { worker: w });
            }
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(stats),
    }
}

/// Partition, then run over prepared operands. Overwrites `ops.c`.
pub fn run_parallel(ops: &mut Operands, workers: usize) -> Result<RunStats> {
    let engine = SyncMultiplier::for_dim(ops.dim(), workers)?;
    engine.run(&ops.a, &ops.b_t, &mut ops.c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::transposed_dot::multiply_serial;
    use crate::matrix::layout::prepare;

    fn serial_product(n: usize) -> Matrix {
        let mut ops = prepare(n);
        multiply_serial(&ops.a, &ops.b_t, &mut ops.c);
        ops.c
    }

    #[test]
    fn test_matches_serial_for_every_worker_count() {
        let n = 13;
        let expected = serial_product(n);
        for t in 1..=n {
            let mut ops = prepare(n);
            let stats = run_parallel(&mut ops, t).unwrap();
            assert_eq!(stats.workers.len(), t);
            assert_eq!(ops.c, expected, "t={}", t);
        }
    }

    #[test]
    fn test_workers_start_after_orchestrator_timestamp() {
        let mut ops = prepare(32);
        let stats = run_parallel(&mut ops, 8).unwrap();
        for w in &stats.workers {
            assert!(w.computing_at >= stats.started_at, "worker {}", w.worker);
            assert!(w.finished_at >= w.computing_at);
            assert!(stats.started_at + stats.elapsed >= w.finished_at);
        }
    }

    #[test]
    fn test_overwrites_stale_result() {
        let mut ops = prepare(6);
        ops.c.as_mut_slice().fill(-1);
        run_parallel(&mut ops, 4).unwrap();
        assert_eq!(ops.c, serial_product(6));
    }

    #[test]
    fn test_spawn_failure_aborts_and_joins() {
        let mut ops = prepare(8);
        let mut engine = SyncMultiplier::for_dim(8, 4).unwrap();
        engine.fail_spawn_at = Some(2);
        let err = engine.run(&ops.a, &ops.b_t, &mut ops.c).unwrap_err();
        assert!(matches!(err, EngineError::Spawn { worker: 2, .. }));
        // workers 0 and 1 were released by the abort, never computed
        assert!(ops.c.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_spawn_failure_on_first_worker() {
        let mut ops = prepare(4);
        let mut engine = SyncMultiplier::for_dim(4, 2).unwrap();
        engine.fail_spawn_at = Some(0);
        assert!(matches!(
            engine.run(&ops.a, &ops.b_t, &mut ops.c),
            Err(EngineError::Spawn { worker: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_mismatched_dims() {
        let ops = prepare(4);
        let mut c = Matrix::zeros(5);
        let engine = SyncMultiplier::for_dim(4, 2).unwrap();
        assert!(matches!(
            engine.run(&ops.a, &ops.b_t, &mut c),
            Err(EngineError::DimensionMismatch { expected: 4, got: 5 })
        ));
    }

    #[test]
    fn test_rejects_ranges_that_do_not_tile() {
        let mut ops = prepare(4);
        let engine = SyncMultiplier::new(vec![RowRange::new(0, 2), RowRange::new(3, 4)]);
        assert!(matches!(
            engine.run(&ops.a, &ops.b_t, &mut ops.c),
            Err(EngineError::BadPartition { dim: 4, .. })
        ));
    }

    #[test]
    fn test_for_dim_clamps_and_exposes_ranges() {
        let engine = SyncMultiplier::for_dim(10, 3).unwrap();
        assert_eq!(engine.workers(), 3);
        assert_eq!(engine.ranges()[0], RowRange::new(0, 4));
        assert_eq!(engine.ranges()[2], RowRange::new(7, 10));
        assert_eq!(SyncMultiplier::for_dim(2, 8).unwrap().workers(), 2);
    }

    #[test]
    fn test_custom_stack_size() {
        let mut ops = prepare(10);
        let engine = SyncMultiplier::for_dim(10, 3)
            .unwrap()
            .with_stack_size(256 * 1024);
        engine.run(&ops.a, &ops.b_t, &mut ops.c).unwrap();
        assert_eq!(ops.c, serial_product(10));
    }
}
