pub mod driver;
pub mod event;
pub mod observer;
pub mod state;

pub use driver::{SchedCore, Stopped};
pub use event::{SimEvent, Slice};
pub use observer::Observer;
pub use state::{
    Pid, ProcKey, ProcRecord, ProcState, QueueId, RunQueue, SimCtx, Ticks, Urgency,
};
