use super::{Dispatch, ENQ_PREEMPT, EnqueueFlags, ProcKey, ScheduleOrder, Scheduler, SimCtx};
use crate::core::QueueId;

/// Runs processes in arrival order, each to completion.
pub struct FifoScheduler {
    ready: QueueId,
}

impl Scheduler for FifoScheduler {
    type Params = ();

    const NAME: &'static str = "FIFO";
    const ORDER: ScheduleOrder = ScheduleOrder::Completion;

    fn init(ctx: &mut SimCtx, _params: &()) -> Self {
        Self {
            ready: ctx.create_queue_fifo(),
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, proc: ProcKey, flags: EnqueueFlags) {
        debug_assert_eq!(flags & ENQ_PREEMPT, 0, "FIFO never preempts");
        ctx.queue_push_back(self.ready, proc);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Dispatch> {
        let proc = ctx.queue_pop(self.ready)?;
        Some(Dispatch::to_completion(ctx, proc))
    }
}
