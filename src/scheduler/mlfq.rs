use log::debug;
use serde::{Deserialize, Serialize};

use super::{Dispatch, EnqueueFlags, ProcKey, ScheduleOrder, Scheduler, SimCtx, Ticks};
use crate::{core::QueueId, error::SimError};

pub const DEFAULT_NUM_QUEUES: usize = 3;
pub const DEFAULT_TIME_QUANTA: [Ticks; DEFAULT_NUM_QUEUES] = [4, 8, 16];

/// Queue count and per-level quanta. Level 0 is the highest priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMlfqConfig", into = "RawMlfqConfig")]
pub struct MlfqConfig {
    time_quanta: Vec<Ticks>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMlfqConfig {
    #[serde(default = "default_num_queues")]
    number_of_queues: usize,
    #[serde(default = "default_time_quanta")]
    time_quanta: Vec<Ticks>,
}

fn default_num_queues() -> usize {
    DEFAULT_NUM_QUEUES
}

fn default_time_quanta() -> Vec<Ticks> {
    DEFAULT_TIME_QUANTA.to_vec()
}

impl TryFrom<RawMlfqConfig> for MlfqConfig {
    type Error = SimError;

    fn try_from(raw: RawMlfqConfig) -> Result<Self, Self::Error> {
        MlfqConfig::new(raw.number_of_queues, raw.time_quanta)
    }
}

impl From<MlfqConfig> for RawMlfqConfig {
    fn from(config: MlfqConfig) -> Self {
        RawMlfqConfig {
            number_of_queues: config.time_quanta.len(),
            time_quanta: config.time_quanta,
        }
    }
}

impl Default for MlfqConfig {
    fn default() -> Self {
        Self {
            time_quanta: DEFAULT_TIME_QUANTA.to_vec(),
        }
    }
}

impl MlfqConfig {
    pub fn new(number_of_queues: usize, time_quanta: Vec<Ticks>) -> Result<Self, SimError> {
        if number_of_queues == 0 {
            return Err(SimError::InvalidConfiguration(
                "MLFQ needs at least one queue".into(),
            ));
        }
        if time_quanta.len() != number_of_queues {
            return Err(SimError::InvalidConfiguration(format!(
                "{} time quanta given for {number_of_queues} queues",
                time_quanta.len()
            )));
        }
        if let Some(level) = time_quanta.iter().position(|&q| q == 0) {
            return Err(SimError::InvalidConfiguration(format!(
                "time quantum of queue {level} must be positive"
            )));
        }
        Ok(Self { time_quanta })
    }

    pub fn number_of_queues(&self) -> usize {
        self.time_quanta.len()
    }

    pub fn time_quanta(&self) -> &[Ticks] {
        &self.time_quanta
    }

    pub fn lowest_level(&self) -> usize {
        self.time_quanta.len() - 1
    }
}

/// Multi-level feedback queue.
///
/// The head of the highest non-empty level runs one unit at a time. A process
/// that uses up its level's quantum drops one level; at the lowest level it
/// just goes back to the tail. There is no priority boost.
pub struct MlfqScheduler {
    levels: Vec<QueueId>,
    config: MlfqConfig,
}

impl MlfqScheduler {
    fn quantum(&self, level: usize) -> Ticks {
        self.config.time_quanta[level]
    }
}

impl Scheduler for MlfqScheduler {
    type Params = MlfqConfig;

    const NAME: &'static str = "MLFQ";
    const ORDER: ScheduleOrder = ScheduleOrder::Arrival;

    fn init(ctx: &mut SimCtx, config: &MlfqConfig) -> Self {
        let levels = (0..config.number_of_queues())
            .map(|_| ctx.create_queue_fifo())
            .collect();
        Self {
            levels,
            config: config.clone(),
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, proc: ProcKey, _flags: EnqueueFlags) {
        let lowest = self.config.lowest_level();
        let record = ctx.proc(proc);
        let mut level = record.level;

        if record.level_used >= self.quantum(level) {
            let demoted = (level + 1).min(lowest);
            debug!(
                "t={} pid={} exhausted level {level} quantum, moving to level {demoted}",
                ctx.now, record.pid
            );
            level = demoted;
            let record = ctx.proc_mut(proc);
            record.level = level;
            record.level_used = 0;
        }

        ctx.queue_push_back(self.levels[level], proc);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Dispatch> {
        let level = self.levels.iter().position(|&q| !ctx.queue_is_empty(q))?;
        let proc = ctx.queue_pop(self.levels[level])?;
        debug_assert_eq!(ctx.proc(proc).level, level);

        // Preemptible every unit so arrivals and level peers interleave
        Some(Dispatch { proc, slice: 1 })
    }

    fn stopping(&mut self, ctx: &mut SimCtx, proc: ProcKey, ran: Ticks, runnable: bool) {
        let record = ctx.proc_mut(proc);
        record.level_used = if runnable { record.level_used + ran } else { 0 };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_three_levels() {
        let config = MlfqConfig::default();
        assert_eq!(config.number_of_queues(), 3);
        assert_eq!(config.time_quanta(), &[4, 8, 16]);
    }

    #[test]
    fn mismatched_quanta_length_is_rejected() {
        let err = MlfqConfig::new(3, vec![4, 8]).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfiguration(_)));
    }

    #[test]
    fn zero_queues_are_rejected() {
        assert!(MlfqConfig::new(0, vec![]).is_err());
    }

    #[test]
    fn zero_quantum_is_rejected() {
        assert!(MlfqConfig::new(2, vec![4, 0]).is_err());
    }

    #[test]
    fn config_deserializes_with_defaults_and_validation() {
        let config: MlfqConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, MlfqConfig::default());

        let config: MlfqConfig =
            serde_json::from_str(r#"{"numberOfQueues": 2, "timeQuanta": [1, 2]}"#).unwrap();
        assert_eq!(config.time_quanta(), &[1, 2]);

        assert!(serde_json::from_str::<MlfqConfig>(r#"{"numberOfQueues": 2}"#).is_err());
    }
}
