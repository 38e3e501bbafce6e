pub mod core;
pub mod error;
pub mod input;

pub use crate::core::driver::{Executed, Simulator};
pub use crate::core::process::{Pid, ProcessStatus, ResourceKind, Ticks};
pub use error::{SimError, SimResult};
