pub mod cores;
pub mod driver;
pub mod event;
pub mod observer;
pub mod process;
pub mod schedule;

pub use cores::CorePool;
pub use driver::{Executed, Simulator, Snapshot};
pub use event::{Event, EventKind};
pub use observer::Observer;
pub use process::{Pid, Process, ProcessStatus, ProcessTable, Request, ResourceKind, Ticks};
pub use schedule::{EventKey, EventSchedule};
