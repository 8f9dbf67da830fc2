use log::trace;

use super::{
    event::{SimEvent, Slice},
    observer::Observer,
    state::{ProcKey, SimCtx, Ticks},
};
use crate::scheduler::{Dispatch, ENQ_ARRIVAL, ENQ_PREEMPT, EnqueueFlags, Scheduler};

/// Outcome of one slice on the CPU, handed back to the workload driver so it
/// can admit arrivals before the process is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stopped {
    pub proc: ProcKey,
    pub runnable: bool,
}

pub struct SchedCore<S: Scheduler> {
    pub ctx: SimCtx,
    pub scheduler: S,
    observer: Observer,
    // Requeued at the end of the last slice; only a preemption once another
    // process takes the CPU
    requeued: Option<(ProcKey, SimEvent)>,
}

impl<S: Scheduler> SchedCore<S> {
    pub fn new(mut ctx: SimCtx, params: &S::Params) -> Self {
        let scheduler = S::init(&mut ctx, params);
        Self {
            ctx,
            scheduler,
            observer: Observer::new(),
            requeued: None,
        }
    }

    pub fn wake_proc(&mut self, proc: ProcKey) {
        self.ctx.mark_ready(proc);
        self.observer.record(SimEvent::Arrived {
            pid: self.ctx.proc(proc).pid,
            at: self.ctx.now,
        });
        self.scheduler.enqueue(&mut self.ctx, proc, ENQ_ARRIVAL);
    }

    /// Ask the scheduler for work and run it for its slice. Returns None if
    /// the scheduler left the CPU idle.
    pub fn run_slice(&mut self) -> Option<Stopped> {
        let Dispatch { proc, slice } = self.scheduler.dispatch(&mut self.ctx)?;
        debug_assert!(slice > 0, "Scheduler dispatched an empty slice");

        if let Some((prev, preempted)) = self.requeued.take() {
            if prev != proc {
                self.observer.record(preempted);
            }
        }

        let start = self.ctx.now;
        let first_run = self.ctx.set_running(proc);
        let (pid, remaining) = {
            let record = self.ctx.proc(proc);
            (record.pid, record.remaining)
        };
        let ran = slice.min(remaining);
        trace!("t={start} run pid={pid} for {ran} (first_run={first_run})");
        self.observer.record(SimEvent::Dispatched {
            pid,
            at: start,
            slice: ran,
        });

        self.ctx.consume(proc, ran);
        let runnable = self.ctx.proc(proc).remaining > 0;

        self.scheduler.stopping(&mut self.ctx, proc, ran, runnable);
        self.observer.record_slice(Slice {
            pid,
            start,
            end: self.ctx.now,
        });

        Some(Stopped { proc, runnable })
    }

    // Return the ProcKey if the stopped process has completed
    pub fn settle(&mut self, stopped: Stopped) -> Option<ProcKey> {
        let Stopped { proc, runnable } = stopped;
        self.ctx.clear_running();
        let now = self.ctx.now;
        let pid = self.ctx.proc(proc).pid;

        let completed = if runnable {
            self.ctx.mark_ready(proc);
            let preempted = SimEvent::Preempted {
                pid,
                at: now,
                remaining: self.ctx.proc(proc).remaining,
            };
            self.requeued = Some((proc, preempted));
            let flags: EnqueueFlags = ENQ_PREEMPT;
            self.scheduler.enqueue(&mut self.ctx, proc, flags);
            None
        } else {
            self.ctx.mark_completed(proc, now);
            self.observer.record(SimEvent::Completed { pid, at: now });
            trace!("t={now} pid={pid} completed");
            Some(proc)
        };

        self.observer.observe(&self.ctx);
        completed
    }

    pub fn idle_until(&mut self, until: Ticks) {
        let from = self.ctx.now;
        if until <= from {
            return;
        }
        trace!("t={from} cpu idle until {until}");
        self.observer.record(SimEvent::Idle { from, until });
        self.ctx.advance_time(until - from);
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut Observer {
        &mut self.observer
    }

    pub fn into_observer(self) -> Observer {
        self.observer
    }
}
