use serde::Serialize;

use crate::core::{Pid, Ticks};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum SimEvent {
    Arrived {
        pid: Pid,
        at: Ticks,
    },
    Dispatched {
        pid: Pid,
        at: Ticks,
        slice: Ticks,
    },
    // Slice ended with work left and a different process got the CPU next.
    // Reported when that process is dispatched.
    Preempted {
        pid: Pid,
        at: Ticks,
        remaining: Ticks,
    },
    Completed {
        pid: Pid,
        at: Ticks,
    },
    // CPU idle even after dispatch()
    Idle {
        from: Ticks,
        until: Ticks,
    },
}

/// A contiguous stretch of CPU time given to one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slice {
    pub pid: Pid,
    pub start: Ticks,
    pub end: Ticks,
}

impl Slice {
    pub fn len(&self) -> Ticks {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}
