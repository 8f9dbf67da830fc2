use average::{Estimate, Mean};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::{
    core::{Pid, Ticks},
    sim::{Process, ScheduleEntry},
};

/// Per-policy summary over a finished schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStats {
    pub avg_turnaround: f64,
    pub avg_response: f64,
    pub avg_waiting: f64,
    pub makespan: Ticks,
}

pub fn summarize(processes: &[Process], schedule: &[ScheduleEntry]) -> ScheduleStats {
    let by_pid: FxHashMap<Pid, &Process> = processes.iter().map(|p| (p.id, p)).collect();
    let rows = schedule
        .iter()
        .filter_map(|entry| by_pid.get(&entry.pid).map(|p| (*p, entry)));

    let mut turnaround = Mean::new();
    let mut response = Mean::new();
    let mut waiting = Mean::new();
    let mut makespan = 0;

    // Saturating, since the schedule may come from a different workload
    for (p, entry) in rows {
        let ta = entry.finish_time.saturating_sub(p.arrival_time);
        turnaround.add(ta as f64);
        response.add(entry.start_time.saturating_sub(p.arrival_time) as f64);
        waiting.add(ta.saturating_sub(p.burst_time) as f64);
        makespan = makespan.max(entry.finish_time);
    }

    ScheduleStats {
        avg_turnaround: turnaround.estimate(),
        avg_response: response.estimate(),
        avg_waiting: waiting.estimate(),
        makespan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fifo;

    #[test]
    fn fifo_two_process_averages() {
        let procs = [Process::new(1, 0, 5), Process::new(2, 1, 3)];
        let stats = summarize(&procs, &fifo(&procs).unwrap());

        // turnaround 5 and 7, response 0 and 4, waiting 0 and 4
        assert_eq!(stats.avg_turnaround, 6.0);
        assert_eq!(stats.avg_response, 2.0);
        assert_eq!(stats.avg_waiting, 2.0);
        assert_eq!(stats.makespan, 8);
    }

    #[test]
    fn mismatched_schedule_clamps_at_zero() {
        // Entry finishes before the process claims to arrive
        let procs = [Process::new(1, 10, 4)];
        let schedule = [ScheduleEntry {
            pid: 1,
            start_time: 2,
            finish_time: 6,
        }];
        let stats = summarize(&procs, &schedule);

        assert_eq!(stats.avg_turnaround, 0.0);
        assert_eq!(stats.avg_response, 0.0);
        assert_eq!(stats.avg_waiting, 0.0);
        assert_eq!(stats.makespan, 6);
    }

    #[test]
    fn entries_for_unknown_pids_are_skipped() {
        let procs = [Process::new(1, 0, 2)];
        let schedule = [
            ScheduleEntry {
                pid: 1,
                start_time: 0,
                finish_time: 2,
            },
            ScheduleEntry {
                pid: 9,
                start_time: 0,
                finish_time: 50,
            },
        ];
        let stats = summarize(&procs, &schedule);
        assert_eq!(stats.avg_turnaround, 2.0);
        assert_eq!(stats.makespan, 2);
    }
}
