use std::fmt;

use crate::core::Pid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Scheduler parameters that cannot describe a runnable policy.
    InvalidConfiguration(String),
    /// A workload record that breaks the process invariants.
    InvalidProcess { pid: Pid, reason: &'static str },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidConfiguration(msg) => write!(f, "invalid configuration: {msg}"),
            SimError::InvalidProcess { pid, reason } => {
                write!(f, "invalid process {pid}: {reason}")
            }
        }
    }
}

impl std::error::Error for SimError {}

pub type Result<T> = std::result::Result<T, SimError>;
