//! Phase timings, estimated operation counts, and the report built from them.

use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initialization,
    Multiplication,
    Output,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Initialization => "initialization",
            Phase::Multiplication => "multiplication",
            Phase::Output => "printing/output",
        };
        f.write_str(name)
    }
}

/// Wall-clock time spent in each phase of one run.
#[derive(Debug, Clone, Copy, Default)]
pub struct Timings {
    pub init: Duration,
    pub mult: Duration,
    pub print: Duration,
    pub total: Duration,
}

/// Estimated basic operations for an N×N run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpCounts {
    /// Two arithmetic ops per cell for A and B, plus one store for C.
    pub init: u64,
    pub mul: u64,
    pub add: u64,
    /// One write per output cell.
    pub print: u64,
}

impl OpCounts {
    pub fn for_dim(n: usize) -> Self {
        let n = n as u64;
        let cells = n * n;
        OpCounts {
            init: cells * 3,
            mul: cells * n,
            add: cells * n,
            print: cells,
        }
    }

    pub fn mult_total(&self) -> u64 {
        self.mul + self.add
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Profile {
    pub timings: Timings,
    pub ops: OpCounts,
}

fn per_op(d: Duration, ops: u64) -> f64 {
    if ops == 0 {
        0.0
    } else {
        d.as_secs_f64() / ops as f64
    }
}

impl Profile {
    pub fn new(timings: Timings, ops: OpCounts) -> Self {
        Profile { timings, ops }
    }

    pub fn sec_per_init_op(&self) -> f64 {
        per_op(self.timings.init, self.ops.init)
    }

    pub fn sec_per_mult_op(&self) -> f64 {
        per_op(self.timings.mult, self.ops.mult_total())
    }

    pub fn sec_per_print_op(&self) -> f64 {
        per_op(self.timings.print, self.ops.print)
    }

    /// Slowest phase. Ties go to multiplication, then initialization.
    pub fn bottleneck(&self) -> Phase {
        let Timings {
            init, mult, print, ..
        } = self.timings;
        if mult >= init && mult >= print {
            Phase::Multiplication
        } else if init >= mult && init >= print {
            Phase::Initialization
        } else {
            Phase::Output
        }
    }

    /// Human-readable summary, as printed to stdout.
    pub fn write_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let t = &self.timings;
        writeln!(out, "Profiling summary:")?;
        writeln!(out, "  init:  {} s", t.init.as_secs_f64())?;
        writeln!(out, "  mult:  {} s", t.mult.as_secs_f64())?;
        writeln!(out, "  print: {} s", t.print.as_secs_f64())?;
        writeln!(out, "  total: {} s", t.total.as_secs_f64())?;
        writeln!(out, "Estimated basic ops:")?;
        writeln!(out, "  init ops:  {}", self.ops.init)?;
        writeln!(out, "  mult muls: {}", self.ops.mul)?;
        writeln!(out, "  mult adds: {}", self.ops.add)?;
        writeln!(out, "  print ops: {}", self.ops.print)?;
        writeln!(out, "Time per init-op:  {} s", self.sec_per_init_op())?;
        writeln!(out, "Time per mult-op:  {} s", self.sec_per_mult_op())?;
        writeln!(out, "Time per print-op: {} s", self.sec_per_print_op())?;
        writeln!(out, "Bottleneck: {}", self.bottleneck())
    }

    /// One `key value` pair per line, for tools that embed the results.
    pub fn write_key_values<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let t = &self.timings;
        writeln!(out, "init {}", t.init.as_secs_f64())?;
        writeln!(out, "mult {}", t.mult.as_secs_f64())?;
        writeln!(out, "print {}", t.print.as_secs_f64())?;
        writeln!(out, "total {}", t.total.as_secs_f64())?;
        writeln!(out, "init_ops {}", self.ops.init)?;
        writeln!(out, "mul_ops {}", self.ops.mul)?;
        writeln!(out, "add_ops {}", self.ops.add)?;
        writeln!(out, "print_ops {}", self.ops.print)?;
        writeln!(out, "sec_per_init_op {}", self.sec_per_init_op())?;
        writeln!(out, "sec_per_mult_op {}", self.sec_per_mult_op())?;
        writeln!(out, "sec_per_print_op {}", self.sec_per_print_op())
    }
}
