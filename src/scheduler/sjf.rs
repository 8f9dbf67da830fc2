use super::{Dispatch, ENQ_PREEMPT, EnqueueFlags, ProcKey, ScheduleOrder, Scheduler, SimCtx};
use crate::core::{QueueId, Urgency};

/// Non-preemptive shortest job first. Picks the arrived process with the
/// smallest total burst and runs it to completion; long jobs may starve.
pub struct SjfScheduler {
    global_priq: QueueId,
}

impl Scheduler for SjfScheduler {
    type Params = ();

    const NAME: &'static str = "SJF";
    const ORDER: ScheduleOrder = ScheduleOrder::Completion;

    fn init(ctx: &mut SimCtx, _params: &()) -> Self {
        Self {
            global_priq: ctx.create_queue_priq(),
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, proc: ProcKey, flags: EnqueueFlags) {
        debug_assert_eq!(flags & ENQ_PREEMPT, 0, "SJF never preempts");
        let record = ctx.proc(proc);
        let urgency = Urgency {
            cost: record.burst_time,
            index: record.index,
        };
        ctx.queue_push_priq(self.global_priq, proc, urgency);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Dispatch> {
        let proc = ctx.queue_pop(self.global_priq)?;
        Some(Dispatch::to_completion(ctx, proc))
    }
}
