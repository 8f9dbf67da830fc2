use keyed_priority_queue::KeyedPriorityQueue;
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use std::collections::VecDeque;

pub type Ticks = u64;
pub type Pid = u64;

new_key_type! {
    pub struct ProcKey;
    pub struct QueueId;
}

/// Priority of a process on a priority run queue: smaller `cost` runs first,
/// then the lower input index.
#[derive(PartialEq, Eq, Hash, Debug, Copy, Clone)]
pub struct Urgency {
    pub cost: Ticks,
    pub index: usize,
}

// KeyedPriorityQueue is a max-heap, so we need to flip-flop Urgency's Ord
impl PartialOrd for Urgency {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Urgency {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.index.cmp(&self.index))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcState {
    // Not yet arrived
    Pending,
    Ready,
    Running,
    Completed,
}

#[derive(Debug, Clone)]
pub struct ProcRecord {
    pub pid: Pid,
    // Position in the caller's input slice; used for tie-breaks
    pub index: usize,
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
    pub remaining: Ticks,
    pub state: ProcState,
    pub start_time: Option<Ticks>,
    pub finish_time: Option<Ticks>,
    // Multi-level queue bookkeeping; untouched by single-queue policies
    pub level: usize,
    pub level_used: Ticks,
}

impl ProcRecord {
    pub fn new(pid: Pid, index: usize, arrival_time: Ticks, burst_time: Ticks) -> Self {
        Self {
            pid,
            index,
            arrival_time,
            burst_time,
            remaining: burst_time,
            state: ProcState::Pending,
            start_time: None,
            finish_time: None,
            level: 0,
            level_used: 0,
        }
    }
}

#[derive(Debug)]
pub enum RunQueue {
    Fifo {
        procs: VecDeque<ProcKey>,
    },
    Priq {
        procs: KeyedPriorityQueue<ProcKey, Urgency>,
    },
}

impl RunQueue {
    pub fn new_fifo() -> Self {
        Self::Fifo {
            procs: VecDeque::new(),
        }
    }

    pub fn new_priq() -> Self {
        Self::Priq {
            procs: KeyedPriorityQueue::new(),
        }
    }

    pub fn contains(&self, proc: ProcKey) -> bool {
        match self {
            Self::Fifo { procs } => procs.contains(&proc),
            Self::Priq { procs } => procs.iter().any(|p| *p.0 == proc),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Fifo { procs } => procs.len(),
            Self::Priq { procs } => procs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything one simulation run owns: the clock, the process arena and the
/// run queues created by the scheduler.
#[derive(Debug)]
pub struct SimCtx {
    pub now: Ticks,
    pub procs: SlotMap<ProcKey, ProcRecord>,
    pub queues: SlotMap<QueueId, RunQueue>,
    pub proc_to_queue: FxHashMap<ProcKey, QueueId>,
    pub running: Option<ProcKey>,
    // Earliest arrival not yet admitted, maintained by the workload driver
    pub next_arrival: Option<Ticks>,
}

impl Default for SimCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl SimCtx {
    pub fn new() -> Self {
        Self {
            now: 0,
            procs: SlotMap::with_key(),
            queues: SlotMap::with_key(),
            proc_to_queue: FxHashMap::default(),
            running: None,
            next_arrival: None,
        }
    }

    pub fn with_capacity(num_procs: usize) -> Self {
        Self {
            procs: SlotMap::with_capacity_and_key(num_procs),
            ..Self::new()
        }
    }

    pub fn add_proc(&mut self, record: ProcRecord) -> ProcKey {
        self.procs.insert(record)
    }

    // Workload validation bounds the horizon, so this never overflows
    pub fn advance_time(&mut self, delta: Ticks) {
        self.now += delta;
    }

    pub fn create_queue_fifo(&mut self) -> QueueId {
        self.queues.insert(RunQueue::new_fifo())
    }

    pub fn create_queue_priq(&mut self) -> QueueId {
        self.queues.insert(RunQueue::new_priq())
    }

    fn queue_push(&mut self, queue: QueueId, proc: ProcKey, urgency: Option<Urgency>) {
        assert!(
            !self.proc_to_queue.contains_key(&proc),
            "Process {} already present in some run queue",
            self.proc(proc).pid
        );
        debug_assert_eq!(
            self.proc(proc).state,
            ProcState::Ready,
            "Process {} must be Ready when enqueued",
            self.proc(proc).pid
        );

        let rq = self.queues.get_mut(queue).expect("Unknown run queue");
        match rq {
            RunQueue::Fifo { procs } => procs.push_back(proc),
            RunQueue::Priq { procs } => {
                procs.push(
                    proc,
                    urgency.expect("Attempted to push to a priority queue with no urgency"),
                );
            }
        };

        self.proc_to_queue.insert(proc, queue);
    }

    pub fn queue_push_back(&mut self, queue: QueueId, proc: ProcKey) {
        self.queue_push(queue, proc, None);
    }

    pub fn queue_push_priq(&mut self, queue: QueueId, proc: ProcKey, urgency: Urgency) {
        self.queue_push(queue, proc, Some(urgency));
    }

    pub fn queue_pop(&mut self, queue: QueueId) -> Option<ProcKey> {
        let rq = self.queues.get_mut(queue)?;
        let proc = match rq {
            RunQueue::Fifo { procs } => procs.pop_front(),
            RunQueue::Priq { procs } => procs.pop().map(|p| p.0),
        }?;

        let removed = self.proc_to_queue.remove(&proc);
        debug_assert!(removed.is_some(), "Process missing run queue membership");

        Some(proc)
    }

    pub fn queue_is_empty(&self, queue: QueueId) -> bool {
        self.queues.get(queue).is_none_or(RunQueue::is_empty)
    }

    pub fn proc_in_any_queue(&self, proc: ProcKey) -> bool {
        self.proc_to_queue.contains_key(&proc)
    }

    pub fn proc(&self, proc: ProcKey) -> &ProcRecord {
        &self.procs[proc]
    }

    pub fn proc_mut(&mut self, proc: ProcKey) -> &mut ProcRecord {
        &mut self.procs[proc]
    }

    pub fn mark_ready(&mut self, proc: ProcKey) {
        let record = self.proc_mut(proc);
        debug_assert!(
            record.state != ProcState::Completed,
            "Completed process {} cannot be ready",
            record.pid
        );
        record.state = ProcState::Ready;
    }

    /// Put `proc` on the CPU. Returns true on its first execution.
    pub fn set_running(&mut self, proc: ProcKey) -> bool {
        debug_assert!(
            !self.proc_to_queue.contains_key(&proc),
            "Running process {} must not be enqueued",
            self.proc(proc).pid
        );
        debug_assert!(self.running.is_none(), "CPU already running a process");

        let now = self.now;
        self.running = Some(proc);
        let record = self.proc_mut(proc);
        record.state = ProcState::Running;
        if record.start_time.is_none() {
            record.start_time = Some(now);
            true
        } else {
            false
        }
    }

    // Charge `delta` units of CPU to the running process and move the clock
    pub fn consume(&mut self, proc: ProcKey, delta: Ticks) {
        debug_assert_eq!(self.running, Some(proc), "Only the running process consumes CPU");
        let record = self.proc_mut(proc);
        debug_assert!(delta <= record.remaining, "Process {} overran its burst", record.pid);
        record.remaining -= delta;
        self.advance_time(delta);
    }

    pub fn clear_running(&mut self) {
        self.running = None;
    }

    pub fn mark_completed(&mut self, proc: ProcKey, finish_time: Ticks) {
        debug_assert!(
            !self.proc_to_queue.contains_key(&proc),
            "Completing process {} that is still enqueued",
            self.proc(proc).pid
        );

        let record = &mut self.procs[proc];
        debug_assert!(
            record.state == ProcState::Running,
            "Process {} must have been running before marked complete",
            record.pid
        );
        debug_assert_eq!(record.remaining, 0);

        record.state = ProcState::Completed;
        record.finish_time = Some(finish_time);
    }
}
