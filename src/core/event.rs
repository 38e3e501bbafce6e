use std::fmt;

use super::process::Pid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Arrive,
    CoreRequested,
    CoreFreed,
    ResourceRequested,
    ResourceReleased,
}

/// A scheduled state transition for one process. The time it fires at is the
/// schedule key, not part of the event itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub pid: Pid,
}

impl Event {
    pub fn new(kind: EventKind, pid: Pid) -> Self {
        Self { kind, pid }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EventKind::Arrive => write!(f, "Process {} arrives", self.pid),
            EventKind::CoreRequested => write!(f, "Process {} requests a core", self.pid),
            EventKind::CoreFreed => write!(f, "Process {} frees a core", self.pid),
            EventKind::ResourceRequested => write!(f, "Process {} requests a resource", self.pid),
            EventKind::ResourceReleased => write!(f, "Process {} releases a resource", self.pid),
        }
    }
}
