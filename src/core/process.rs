use std::fmt;

use rustc_hash::FxHashMap;

use crate::error::{SimError, SimResult};

pub type Pid = u64;
pub type Ticks = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Core,
    Disk,
    Terminal,
}

/// One unit of resource demand within a process's ordered work list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub kind: ResourceKind,
    pub duration: Ticks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    NotYetArrived,
    Arrived,
    Waiting,
    Running,
    Completed,
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ProcessStatus::NotYetArrived => "not yet arrived",
            ProcessStatus::Arrived => "arrived",
            ProcessStatus::Waiting => "waiting",
            ProcessStatus::Running => "running",
            ProcessStatus::Completed => "completed",
        };
        f.write_str(text)
    }
}

#[derive(Debug)]
pub struct Process {
    pub id: Pid,
    pub arrival_time: Ticks,
    requests: Vec<Request>,
    cursor: usize,
    status: ProcessStatus,
    started_at: Option<Ticks>,
    completion_time: Option<Ticks>,
}

impl Process {
    fn new(id: Pid, arrival_time: Ticks) -> Self {
        Self {
            id,
            arrival_time,
            requests: Vec::new(),
            cursor: 0,
            status: ProcessStatus::NotYetArrived,
            started_at: None,
            completion_time: None,
        }
    }

    pub fn push_request(&mut self, request: Request) {
        self.requests.push(request);
    }

    /// The request the process is working on (or about to work on), `None`
    /// once the request list has been exhausted.
    pub fn current_request(&self) -> Option<Request> {
        self.requests.get(self.cursor).copied()
    }

    /// Consume the current request. Completes the process when the cursor
    /// moves past the last request; this and [`Process::complete`] are the
    /// only paths to `Completed`.
    pub fn advance(&mut self, now: Ticks) {
        debug_assert!(
            self.cursor < self.requests.len(),
            "Process {} advanced past the end of its request list",
            self.id
        );
        self.cursor += 1;
        if self.cursor == self.requests.len() {
            self.complete(now);
        }
    }

    /// Mark the process completed. Used directly only when a dispatch finds
    /// an empty request list.
    pub fn complete(&mut self, now: Ticks) {
        self.status = ProcessStatus::Completed;
        self.completion_time = Some(now);
    }

    /// Transition to `Running`, recording the first time the process got a
    /// resource.
    pub fn run_at(&mut self, now: Ticks) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
        self.status = ProcessStatus::Running;
    }

    pub fn set_status(&mut self, status: ProcessStatus) {
        debug_assert_ne!(
            self.status,
            ProcessStatus::Completed,
            "Process {} is terminal and cannot change status",
            self.id
        );
        self.status = status;
    }

    pub fn status(&self) -> ProcessStatus {
        self.status
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn request_count(&self) -> usize {
        self.requests.len()
    }

    pub fn started_at(&self) -> Option<Ticks> {
        self.started_at
    }

    pub fn completion_time(&self) -> Option<Ticks> {
        self.completion_time
    }
}

/// Owner of every simulated process for the lifetime of a run.
#[derive(Debug, Default)]
pub struct ProcessTable {
    processes: FxHashMap<Pid, Process>,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_process(&mut self, id: Pid, arrival_time: Ticks) -> SimResult<()> {
        if self.processes.contains_key(&id) {
            return Err(SimError::DuplicateProcess(id));
        }
        self.processes.insert(id, Process::new(id, arrival_time));
        Ok(())
    }

    pub fn add_request(&mut self, id: Pid, kind: ResourceKind, duration: Ticks) -> SimResult<()> {
        self.get_mut(id)?.push_request(Request { kind, duration });
        Ok(())
    }

    pub fn get(&self, id: Pid) -> SimResult<&Process> {
        self.processes.get(&id).ok_or(SimError::UnknownProcess(id))
    }

    pub fn get_mut(&mut self, id: Pid) -> SimResult<&mut Process> {
        self.processes
            .get_mut(&id)
            .ok_or(SimError::UnknownProcess(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.processes.values()
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }
}
