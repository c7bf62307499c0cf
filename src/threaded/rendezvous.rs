//! One-shot start gate shared by the orchestrator and its workers.
//!
//! Every worker calls [`Rendezvous::arrive`] once and blocks. The
//! orchestrator calls [`Rendezvous::lead`], which waits for the other
//! participants, takes the start timestamp while still holding the gate,
//! and only then releases everyone. No worker can observe the release
//! before that timestamp exists.
//!
//! There is no timeout: a participant that never arrives stalls the run.
//! [`Rendezvous::abort`] is the only way out, and it is what the
//! orchestrator uses when it fails to bring up the full roster.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use thiserror::Error;

/// Returned to participants of a gate that was aborted instead of released.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("rendezvous aborted before release")]
pub struct Aborted;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Waiting,
    Released,
    Aborted,
}

#[derive(Debug)]
struct GateState {
    arrived: usize,
    phase: Phase,
}

#[derive(Debug)]
pub struct Rendezvous {
    parties: usize,
    state: Mutex<GateState>,
    cond: Condvar,
}

impl Rendezvous {
    /// Gate for `parties` participants, orchestrator included.
    pub fn new(parties: usize) -> Self {
        assert!(parties >= 1, "rendezvous needs at least one participant");
        Rendezvous {
            parties,
            state: Mutex::new(GateState {
                arrived: 0,
                phase: Phase::Waiting,
            }),
            cond: Condvar::new(),
        }
    }

    // The guarded state is two plain fields; a panic elsewhere cannot leave
    // it half-updated.
    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Worker arrival. Blocks until the leader releases or aborts the gate.
    pub fn arrive(&self) -> Result<(), Aborted> {
        let mut state = self.lock();
        if state.phase == Phase::Aborted {
            return Err(Aborted);
        }
        state.arrived += 1;
        debug_assert!(state.arrived <= self.parties, "too many arrivals");
        self.cond.notify_all();

        let state = self
            .cond
            .wait_while(state, |s| s.phase == Phase::Waiting)
            .unwrap_or_else(PoisonError::into_inner);
        match state.phase {
            Phase::Released => Ok(()),
            _ => Err(Aborted),
        }
    }

    /// Leader arrival. Waits for the other `parties - 1` participants,
    /// records the start instant, then releases them all at once.
    pub fn lead(&self) -> Result<Instant, Aborted> {
        let mut state = self.lock();
        if state.phase == Phase::Aborted {
            return Err(Aborted);
        }
        state.arrived += 1;

        let mut state = self
            .cond
            .wait_while(state, |s| s.phase == Phase::Waiting && s.arrived < self.parties)
            .unwrap_or_else(PoisonError::into_inner);
        if state.phase == Phase::Aborted {
            return Err(Aborted);
        }

        let started = Instant::now();
        state.phase = Phase::Released;
        self.cond.notify_all();
        Ok(started)
    }

    /// Wake every waiter with [`Aborted`]. No effect once released.
    pub fn abort(&self) {
        let mut state = self.lock();
        if state.phase == Phase::Waiting {
            state.phase = Phase::Aborted;
            self.cond.notify_all();
        }
    }
}

/// Aborts the gate when dropped, so an early return out of the spawn loop
/// never leaves workers parked forever.
pub struct AbortOnDrop<'a>(&'a Rendezvous);

impl<'a> AbortOnDrop<'a> {
    pub fn new(gate: &'a Rendezvous) -> Self {
        AbortOnDrop(gate)
    }
}

impl Drop for AbortOnDrop<'_> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_leader_timestamp_precedes_release() {
        let gate = Rendezvous::new(5);
        let g = &gate;
        let (started, seen) = thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    s.spawn(move || {
                        let gate = g;
                        gate.arrive().unwrap();
                        Instant::now()
                    })
                })
                .collect();
            let started = gate.lead().unwrap();
            let seen: Vec<Instant> = handles.into_iter().map(|h| h.join().unwrap()).collect();
            (started, seen)
        });
        assert_eq!(gate.lock().phase, Phase::Released);
        assert!(seen.iter().all(|&t| t >= started));
    }

    #[test]
    fn test_single_party_leads_immediately() {
        let gate = Rendezvous::new(1);
        assert!(gate.lead().is_ok());
    }

    #[test]
    fn test_abort_wakes_waiting_workers() {
        let gate = Rendezvous::new(4);
        let results = thread::scope(|s| {
            let g = &gate;
            let handles: Vec<_> = (0..2).map(|_| s.spawn(move || g.arrive())).collect();
            // wait until both are parked before aborting
            while gate.lock().arrived < 2 {
                thread::yield_now();
            }
            gate.abort();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .collect::<Vec<_>>()
        });
        assert_eq!(results, vec![Err(Aborted), Err(Aborted)]);
        assert_eq!(gate.arrive(), Err(Aborted));
        assert_eq!(gate.lead(), Err(Aborted));
    }

    #[test]
    fn test_guard_aborts_on_drop() {
        let gate = Rendezvous::new(2);
        {
            let _guard = AbortOnDrop::new(&gate);
        }
        assert_eq!(gate.arrive(), Err(Aborted));
    }

    #[test]
    fn test_abort_after_release_is_noop() {
        let gate = Rendezvous::new(1);
        gate.lead().unwrap();
        gate.abort();
        assert_eq!(gate.lock().phase, Phase::Released);
    }
}
