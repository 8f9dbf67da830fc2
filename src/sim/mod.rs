pub mod driver;
pub mod process;

pub use driver::{Sim, SimOutcome};
pub use process::{Process, ScheduleEntry, validate_workload};
