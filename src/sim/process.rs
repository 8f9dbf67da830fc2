use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::{
    core::state::{Pid, Ticks},
    error::{Result, SimError},
};

/// One unit of CPU-bound work in the workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    pub id: Pid,
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
}

impl Process {
    pub fn new(id: Pid, arrival_time: Ticks, burst_time: Ticks) -> Self {
        Self {
            id,
            arrival_time,
            burst_time,
        }
    }
}

/// When a process first got the CPU and when it finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub pid: Pid,
    pub start_time: Ticks,
    pub finish_time: Ticks,
}

impl ScheduleEntry {
    // Wall-clock span from first run to completion, gaps included
    pub fn span(&self) -> Ticks {
        self.finish_time - self.start_time
    }
}

pub fn validate_workload(processes: &[Process]) -> Result<()> {
    let mut seen = FxHashSet::default();
    // Every process finishes by the last arrival plus all burst time
    let mut total_burst: Ticks = 0;
    let mut last_arrival: Option<&Process> = None;
    for p in processes {
        if p.id == 0 {
            return Err(SimError::InvalidProcess {
                pid: p.id,
                reason: "process id must be positive",
            });
        }
        if p.burst_time == 0 {
            return Err(SimError::InvalidProcess {
                pid: p.id,
                reason: "burst time must be positive",
            });
        }
        if !seen.insert(p.id) {
            return Err(SimError::InvalidProcess {
                pid: p.id,
                reason: "duplicate process id",
            });
        }
        total_burst = total_burst
            .checked_add(p.burst_time)
            .ok_or(SimError::InvalidProcess {
                pid: p.id,
                reason: "total burst time overflows the clock",
            })?;
        if last_arrival.is_none_or(|last| p.arrival_time > last.arrival_time) {
            last_arrival = Some(p);
        }
    }

    if let Some(last) = last_arrival {
        if last.arrival_time.checked_add(total_burst).is_none() {
            return Err(SimError::InvalidProcess {
                pid: last.id,
                reason: "arrival time leaves no room to finish the workload",
            });
        }
    }
    Ok(())
}
