use super::{
    event::{SimEvent, Slice},
    state::{ProcState, SimCtx},
};

/// Records what the core did and checks run-queue bookkeeping after every
/// step in debug builds.
#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
    events: Vec<SimEvent>,
    trace: Vec<Slice>,
}

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    // Back-to-back slices of one process collapse into a single bar
    pub fn record_slice(&mut self, slice: Slice) {
        if slice.is_empty() {
            return;
        }
        match self.trace.last_mut() {
            Some(last) if last.pid == slice.pid && last.end == slice.start => last.end = slice.end,
            _ => self.trace.push(slice),
        }
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn trace(&self) -> &[Slice] {
        &self.trace
    }

    pub fn into_trace(self) -> Vec<Slice> {
        self.trace
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, ctx: &SimCtx) {
        self.step += 1;

        if let Some(proc) = ctx.running {
            let record = ctx.proc(proc);
            debug_assert_eq!(
                record.state,
                ProcState::Running,
                "ctx.running process {} must be Running",
                record.pid
            );
        }

        for (&proc, &queue) in &ctx.proc_to_queue {
            let record = ctx.proc(proc);
            debug_assert_eq!(
                record.state,
                ProcState::Ready,
                "Enqueued process {} must be Ready",
                record.pid
            );
            if let Some(rq) = ctx.queues.get(queue) {
                debug_assert!(
                    rq.contains(proc),
                    "proc_to_queue claims process {} in {queue:?}, but queue does not contain it",
                    record.pid
                );
            } else {
                debug_assert!(false, "proc_to_queue references unknown queue {queue:?}");
            }
        }

        debug_assert!(
            self.trace.windows(2).all(|w| w[0].end <= w[1].start),
            "Execution slices overlap on the single CPU"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_slices_of_same_process_are_coalesced() {
        let mut observer = Observer::new();
        observer.record_slice(Slice { pid: 1, start: 0, end: 2 });
        observer.record_slice(Slice { pid: 1, start: 2, end: 5 });
        observer.record_slice(Slice { pid: 2, start: 5, end: 6 });
        observer.record_slice(Slice { pid: 1, start: 7, end: 8 });

        assert_eq!(
            observer.trace(),
            &[
                Slice { pid: 1, start: 0, end: 5 },
                Slice { pid: 2, start: 5, end: 6 },
                Slice { pid: 1, start: 7, end: 8 },
            ]
        );
    }

    #[test]
    fn drained_events_are_not_returned_twice() {
        let mut observer = Observer::new();
        observer.record(SimEvent::Arrived { pid: 3, at: 0 });

        assert_eq!(observer.drain_events().len(), 1);
        assert!(observer.drain_events().is_empty());
    }
}
