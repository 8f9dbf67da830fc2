//! Discrete-time simulation of single-CPU scheduling policies.
//!
//! Every policy consumes the same workload of [`Process`] records and
//! produces one [`ScheduleEntry`] per process. Runs own all of their state, so
//! they are deterministic and can be run side by side.
//!
//! ```
//! use cpusim::{Process, fifo};
//!
//! let procs = [Process::new(1, 0, 5), Process::new(2, 1, 3)];
//! let schedule = fifo(&procs).unwrap();
//! assert_eq!(schedule[1].start_time, 5);
//! ```

pub mod core;
pub mod error;
pub mod report;
pub mod scheduler;
pub mod sim;
pub mod stats;
pub mod workload;

use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

pub use crate::core::{Pid, SimEvent, Slice, Ticks};
pub use crate::error::{Result, SimError};
pub use crate::scheduler::{
    FifoScheduler, MlfqConfig, MlfqScheduler, PolicyKind, RoundRobinScheduler, Scheduler,
    SjfScheduler, StcfScheduler,
};
pub use crate::sim::{Process, ScheduleEntry, Sim, SimOutcome};

pub const DEFAULT_TIME_QUANTUM: Ticks = 2;

/// Parameters for the policies that take any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimConfig {
    pub time_quantum: Ticks,
    pub mlfq: MlfqConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            time_quantum: DEFAULT_TIME_QUANTUM,
            mlfq: MlfqConfig::default(),
        }
    }
}

fn rr_quantum(time_quantum: Ticks) -> Result<NonZeroU64> {
    NonZeroU64::new(time_quantum).ok_or_else(|| {
        SimError::InvalidConfiguration("round robin time quantum must be positive".into())
    })
}

/// First in, first out. Entries are in completion order.
pub fn fifo(processes: &[Process]) -> Result<Vec<ScheduleEntry>> {
    Ok(Sim::<FifoScheduler>::new(processes, &())?.run().schedule)
}

/// Non-preemptive shortest job first. Entries are in completion order.
pub fn sjf(processes: &[Process]) -> Result<Vec<ScheduleEntry>> {
    Ok(Sim::<SjfScheduler>::new(processes, &())?.run().schedule)
}

/// Preemptive shortest time to completion first. Entries are in input order.
pub fn stcf(processes: &[Process]) -> Result<Vec<ScheduleEntry>> {
    Ok(Sim::<StcfScheduler>::new(processes, &())?.run().schedule)
}

/// Round robin with a fixed `time_quantum`, which must be positive. Entries
/// are in arrival order.
pub fn round_robin(processes: &[Process], time_quantum: Ticks) -> Result<Vec<ScheduleEntry>> {
    let quantum = rr_quantum(time_quantum)?;
    Ok(Sim::<RoundRobinScheduler>::new(processes, &quantum)?.run().schedule)
}

/// Multi-level feedback queue. Use [`MlfqConfig::default`] for three levels
/// with quanta 4, 8 and 16. Entries are in arrival order.
pub fn mlfq(processes: &[Process], config: &MlfqConfig) -> Result<Vec<ScheduleEntry>> {
    Ok(Sim::<MlfqScheduler>::new(processes, config)?.run().schedule)
}

/// Run one policy and keep its execution trace.
pub fn simulate(kind: PolicyKind, processes: &[Process], config: &SimConfig) -> Result<SimOutcome> {
    let outcome = match kind {
        PolicyKind::Fifo => Sim::<FifoScheduler>::new(processes, &())?.run(),
        PolicyKind::Sjf => Sim::<SjfScheduler>::new(processes, &())?.run(),
        PolicyKind::Stcf => Sim::<StcfScheduler>::new(processes, &())?.run(),
        PolicyKind::RoundRobin => {
            let quantum = rr_quantum(config.time_quantum)?;
            Sim::<RoundRobinScheduler>::new(processes, &quantum)?.run()
        }
        PolicyKind::Mlfq => Sim::<MlfqScheduler>::new(processes, &config.mlfq)?.run(),
    };
    Ok(outcome)
}

/// Run every policy in the order FIFO, SJF, STCF, RR, MLFQ.
pub fn simulate_all(processes: &[Process], config: &SimConfig) -> Result<Vec<SimOutcome>> {
    PolicyKind::ALL
        .iter()
        .map(|&kind| simulate(kind, processes, config))
        .collect()
}
