use super::{Dispatch, EnqueueFlags, ProcKey, ScheduleOrder, Scheduler, SimCtx};
use crate::core::{QueueId, Urgency};

/// Shortest time-to-completion first.
///
/// Semantically the choice is re-made every time unit. Between two arrivals
/// the running process only gets shorter, so it keeps winning; the slice
/// therefore runs up to the next arrival (or completion) in one step.
pub struct StcfScheduler {
    global_priq: QueueId,
}

impl Scheduler for StcfScheduler {
    type Params = ();

    const NAME: &'static str = "STCF";
    const ORDER: ScheduleOrder = ScheduleOrder::Input;

    fn init(ctx: &mut SimCtx, _params: &()) -> Self {
        Self {
            global_priq: ctx.create_queue_priq(),
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, proc: ProcKey, _flags: EnqueueFlags) {
        let record = ctx.proc(proc);
        let urgency = Urgency {
            cost: record.remaining,
            index: record.index,
        };
        ctx.queue_push_priq(self.global_priq, proc, urgency);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Dispatch> {
        let proc = ctx.queue_pop(self.global_priq)?;
        let remaining = ctx.proc(proc).remaining;
        let slice = match ctx.next_arrival {
            Some(arrival) if arrival > ctx.now => remaining.min(arrival - ctx.now),
            _ => remaining,
        };
        Some(Dispatch { proc, slice })
    }
}
