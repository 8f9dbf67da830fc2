use std::num::NonZeroU64;

use super::{Dispatch, EnqueueFlags, ProcKey, ScheduleOrder, Scheduler, SimCtx};
use crate::core::QueueId;

/// Round robin over a single FIFO ready queue.
///
/// Processes that arrive while a slice runs are admitted before the
/// preempted process goes back to the tail, so on a simultaneous arrival and
/// requeue the newcomer runs first.
pub struct RoundRobinScheduler {
    ready: QueueId,
    quantum: NonZeroU64,
}

impl Scheduler for RoundRobinScheduler {
    type Params = NonZeroU64;

    const NAME: &'static str = "RR";
    const ORDER: ScheduleOrder = ScheduleOrder::Arrival;

    fn init(ctx: &mut SimCtx, quantum: &NonZeroU64) -> Self {
        Self {
            ready: ctx.create_queue_fifo(),
            quantum: *quantum,
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, proc: ProcKey, _flags: EnqueueFlags) {
        ctx.queue_push_back(self.ready, proc);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Dispatch> {
        let proc = ctx.queue_pop(self.ready)?;
        Some(Dispatch {
            proc,
            slice: self.quantum.get(),
        })
    }
}
