pub mod fifo;
pub mod mlfq;
pub mod rr;
pub mod sjf;
pub mod stcf;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::core::{
    Ticks,
    state::{ProcKey, SimCtx},
};
pub use fifo::FifoScheduler;
pub use mlfq::{MlfqConfig, MlfqScheduler};
pub use rr::RoundRobinScheduler;
pub use sjf::SjfScheduler;
pub use stcf::StcfScheduler;

pub type EnqueueFlags = u64;

// First enqueue after arrival
pub const ENQ_ARRIVAL: EnqueueFlags = 1 << 0;
// Slice ended with work left
pub const ENQ_PREEMPT: EnqueueFlags = 1 << 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub proc: ProcKey,
    pub slice: Ticks,
}

impl Dispatch {
    // Non-preemptive dispatch: run until the burst is exhausted
    pub fn to_completion(ctx: &SimCtx, proc: ProcKey) -> Self {
        Self {
            proc,
            slice: ctx.proc(proc).remaining,
        }
    }
}

/// Order in which a policy reports its finished schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOrder {
    Completion,
    Input,
    Arrival,
}

pub trait Scheduler {
    /// Validated configuration needed to build the scheduler.
    type Params;

    const NAME: &'static str;
    const ORDER: ScheduleOrder;

    fn init(ctx: &mut SimCtx, params: &Self::Params) -> Self;

    fn enqueue(&mut self, ctx: &mut SimCtx, proc: ProcKey, flags: EnqueueFlags);

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Dispatch>;

    // Called once the slice is accounted, before the process is settled
    fn stopping(&mut self, _ctx: &mut SimCtx, _proc: ProcKey, _ran: Ticks, _runnable: bool) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyKind {
    #[serde(rename = "FIFO")]
    Fifo,
    #[serde(rename = "SJF")]
    Sjf,
    #[serde(rename = "STCF")]
    Stcf,
    #[serde(rename = "RR")]
    RoundRobin,
    #[serde(rename = "MLFQ")]
    Mlfq,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 5] = [
        PolicyKind::Fifo,
        PolicyKind::Sjf,
        PolicyKind::Stcf,
        PolicyKind::RoundRobin,
        PolicyKind::Mlfq,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PolicyKind::Fifo => FifoScheduler::NAME,
            PolicyKind::Sjf => SjfScheduler::NAME,
            PolicyKind::Stcf => StcfScheduler::NAME,
            PolicyKind::RoundRobin => RoundRobinScheduler::NAME,
            PolicyKind::Mlfq => MlfqScheduler::NAME,
        }
    }

    pub fn is_preemptive(self) -> bool {
        !matches!(self, PolicyKind::Fifo | PolicyKind::Sjf)
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fifo" | "fcfs" => Ok(PolicyKind::Fifo),
            "sjf" => Ok(PolicyKind::Sjf),
            "stcf" | "srtf" => Ok(PolicyKind::Stcf),
            "rr" | "round-robin" => Ok(PolicyKind::RoundRobin),
            "mlfq" => Ok(PolicyKind::Mlfq),
            other => Err(format!(
                "unknown policy '{other}', expected one of fifo, sjf, stcf, rr, mlfq"
            )),
        }
    }
}
