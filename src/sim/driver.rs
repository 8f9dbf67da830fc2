use log::debug;
use serde::Serialize;

use super::process::{Process, ScheduleEntry, validate_workload};
use crate::{
    core::{
        SimEvent, Slice,
        driver::SchedCore,
        state::{ProcKey, ProcRecord, SimCtx, Ticks},
    },
    error::Result,
    scheduler::{ScheduleOrder, Scheduler},
};

/// Result of running one policy over a workload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimOutcome {
    pub policy: &'static str,
    pub schedule: Vec<ScheduleEntry>,
    pub trace: Vec<Slice>,
}

impl SimOutcome {
    // CPU time actually handed out, summed over every slice
    pub fn executed(&self) -> Ticks {
        self.trace.iter().map(Slice::len).sum()
    }
}

pub struct Sim<S: Scheduler> {
    pub core: SchedCore<S>,
    // Caller's order
    input: Vec<ProcKey>,
    // Sorted by arrival, ties by input order
    arrivals: Vec<ProcKey>,
    arrival_cursor: usize,
    completions: Vec<ProcKey>,
}

impl<S: Scheduler> Sim<S> {
    /// Validates the workload and sets up a fresh simulation. Scheduler
    /// params are already validated by their constructors.
    pub fn new(processes: &[Process], params: &S::Params) -> Result<Self> {
        validate_workload(processes)?;

        let mut ctx = SimCtx::with_capacity(processes.len());
        let input: Vec<ProcKey> = processes
            .iter()
            .enumerate()
            .map(|(index, p)| {
                ctx.add_proc(ProcRecord::new(p.id, index, p.arrival_time, p.burst_time))
            })
            .collect();

        let mut arrivals = input.clone();
        arrivals.sort_by_key(|&proc| {
            let record = ctx.proc(proc);
            (record.arrival_time, record.index)
        });
        ctx.next_arrival = arrivals.first().map(|&proc| ctx.proc(proc).arrival_time);

        Ok(Self {
            core: SchedCore::<S>::new(ctx, params),
            completions: Vec::with_capacity(input.len()),
            input,
            arrivals,
            arrival_cursor: 0,
        })
    }

    /// Runs one scheduling decision (a slice or an idle gap) and returns the
    /// events it produced.
    pub fn step(&mut self) -> Vec<SimEvent> {
        self.advance();
        self.core.observer_mut().drain_events()
    }

    // False if nothing could happen
    fn advance(&mut self) -> bool {
        self.handle_arrivals();

        if let Some(stopped) = self.core.run_slice() {
            // Newcomers go ahead of the process that just ran
            self.handle_arrivals();
            if let Some(proc) = self.core.settle(stopped) {
                self.completions.push(proc);
            }
            return true;
        }

        match self.core.ctx.next_arrival {
            Some(arrival) => {
                self.core.idle_until(arrival);
                true
            }
            None => false,
        }
    }

    fn handle_arrivals(&mut self) {
        let now = self.core.now();
        // Contiguous, since arrivals are sorted
        while let Some(&proc) = self.arrivals.get(self.arrival_cursor) {
            if self.core.ctx.proc(proc).arrival_time > now {
                break;
            }
            self.core.wake_proc(proc);
            self.arrival_cursor += 1;
        }

        self.core.ctx.next_arrival = self
            .arrivals
            .get(self.arrival_cursor)
            .map(|&proc| self.core.ctx.proc(proc).arrival_time);
    }

    pub fn all_procs_completed(&self) -> bool {
        self.completions.len() == self.input.len()
    }

    pub fn run(mut self) -> SimOutcome {
        while !self.all_procs_completed() {
            if !self.advance() {
                debug_assert!(false, "{} stranded runnable processes", S::NAME);
                break;
            }
            self.core.observer_mut().drain_events();
        }

        debug!(
            "{}: {} processes done at t={} in {} steps",
            S::NAME,
            self.input.len(),
            self.core.now(),
            self.core.observer().steps()
        );

        let schedule = self.schedule();
        SimOutcome {
            policy: S::NAME,
            schedule,
            trace: self.core.into_observer().into_trace(),
        }
    }

    /// Entries for every completed process, in the policy's report order.
    pub fn schedule(&self) -> Vec<ScheduleEntry> {
        let order = match S::ORDER {
            ScheduleOrder::Completion => &self.completions,
            ScheduleOrder::Input => &self.input,
            ScheduleOrder::Arrival => &self.arrivals,
        };
        order.iter().filter_map(|&proc| self.entry(proc)).collect()
    }

    fn entry(&self, proc: ProcKey) -> Option<ScheduleEntry> {
        let record = self.core.ctx.proc(proc);
        Some(ScheduleEntry {
            pid: record.pid,
            start_time: record.start_time?,
            finish_time: record.finish_time?,
        })
    }

    pub fn procs_map<T>(&self, f: impl Fn(&ProcRecord) -> T) -> impl Iterator<Item = T> {
        self.input.iter().map(move |&proc| f(self.core.ctx.proc(proc)))
    }
}
