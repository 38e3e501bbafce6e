use std::collections::VecDeque;

use tracing::debug;

use super::cores::CorePool;
use super::event::{Event, EventKind};
use super::observer::Observer;
use super::process::{Pid, ProcessStatus, ProcessTable, ResourceKind, Ticks};
use super::schedule::EventSchedule;
use crate::error::SimResult;

/// One executed event, as reported to the trace consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Executed {
    pub time: Ticks,
    pub event: Event,
    /// True when the event's process reached `Completed` while handling it.
    pub completed: bool,
}

/// Final status of every process plus the wait-queue depth, for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub statuses: Vec<(Pid, ProcessStatus)>,
    pub waiting: usize,
}

/// The simulation driver: interprets each scheduled event, mutates process
/// and core state, and schedules the follow-up events. Strictly sequential;
/// `now` only advances by dequeuing the next event.
pub struct Simulator {
    table: ProcessTable,
    schedule: EventSchedule,
    cores: CorePool,
    wait_queue: VecDeque<Pid>,
    now: Ticks,
    observer: Observer,
}

impl Simulator {
    pub fn new(core_count: usize) -> Self {
        Self {
            table: ProcessTable::new(),
            schedule: EventSchedule::new(),
            cores: CorePool::new(core_count),
            wait_queue: VecDeque::new(),
            now: 0,
            observer: Observer::new(),
        }
    }

    /// Define a process and seed its arrival event.
    pub fn add_process(&mut self, id: Pid, arrival_time: Ticks) -> SimResult<()> {
        self.table.add_process(id, arrival_time)?;
        self.schedule
            .add(arrival_time, Event::new(EventKind::Arrive, id));
        Ok(())
    }

    pub fn add_request(&mut self, id: Pid, kind: ResourceKind, duration: Ticks) -> SimResult<()> {
        self.table.add_request(id, kind, duration)
    }

    pub fn now(&self) -> Ticks {
        self.now
    }

    pub fn table(&self) -> &ProcessTable {
        &self.table
    }

    pub fn cores(&self) -> &CorePool {
        &self.cores
    }

    pub fn wait_queue_len(&self) -> usize {
        self.wait_queue.len()
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut statuses: Vec<_> = self
            .table
            .iter()
            .map(|process| (process.id, process.status()))
            .collect();
        statuses.sort_by_key(|&(pid, _)| pid);
        Snapshot {
            statuses,
            waiting: self.wait_queue.len(),
        }
    }

    /// Execute the next scheduled event. Returns `Ok(None)` once the schedule
    /// has drained, the end-of-simulation condition; `now` is left at the
    /// last executed event's time.
    pub fn step(&mut self) -> SimResult<Option<Executed>> {
        let (key, event) = match self.schedule.peek_next() {
            Some(next) => next,
            None => return Ok(None),
        };
        self.now = key.time;

        match event.kind {
            EventKind::Arrive => self.on_arrive(event.pid)?,
            EventKind::CoreRequested => self.on_core_requested(event.pid)?,
            EventKind::CoreFreed => self.on_core_freed(event.pid)?,
            EventKind::ResourceRequested => self.on_resource_requested(event.pid)?,
            EventKind::ResourceReleased => self.on_resource_released(event.pid)?,
        }
        self.schedule.remove(key);

        let completed = self.table.get(event.pid)?.status() == ProcessStatus::Completed;
        self.observer
            .observe(&self.table, &self.cores, &self.wait_queue);
        Ok(Some(Executed {
            time: self.now,
            event,
            completed,
        }))
    }

    /// Drain the schedule, invoking `on_event` for every executed event.
    /// Returns the end-of-simulation time.
    pub fn run(&mut self, mut on_event: impl FnMut(Executed)) -> SimResult<Ticks> {
        while let Some(executed) = self.step()? {
            on_event(executed);
        }
        Ok(self.now)
    }

    fn on_arrive(&mut self, pid: Pid) -> SimResult<()> {
        self.table.get_mut(pid)?.set_status(ProcessStatus::Arrived);
        self.dispatch_current(pid)
    }

    /// Route the process's current request: core requests go through the
    /// contention path, other kinds are granted immediately. Used for the
    /// arrival dispatch and for every re-dispatch after an advance.
    fn dispatch_current(&mut self, pid: Pid) -> SimResult<()> {
        match self.table.get(pid)?.current_request() {
            None => {
                self.table.get_mut(pid)?.complete(self.now);
                debug!(pid, "process has no requests left, completing");
            }
            Some(request) if request.kind == ResourceKind::Core => {
                self.schedule
                    .add(self.now, Event::new(EventKind::CoreRequested, pid));
            }
            Some(_) => {
                self.schedule
                    .add(self.now, Event::new(EventKind::ResourceRequested, pid));
            }
        }
        Ok(())
    }

    fn on_core_requested(&mut self, pid: Pid) -> SimResult<()> {
        if self.cores.try_acquire(self.now) {
            let duration = self.current_duration(pid)?;
            self.schedule
                .add(self.now + duration, Event::new(EventKind::CoreFreed, pid));
            self.table.get_mut(pid)?.run_at(self.now);
        } else {
            self.wait_queue.push_back(pid);
            self.table.get_mut(pid)?.set_status(ProcessStatus::Waiting);
            debug!(pid, queued = self.wait_queue.len(), "no core free, process queued");
        }
        Ok(())
    }

    /// A core request has run to completion: consume it, re-dispatch the
    /// process if it has more work, then hand the core to the head of the
    /// wait queue. The releasing process re-queues through the event path,
    /// behind every process already waiting.
    fn on_core_freed(&mut self, pid: Pid) -> SimResult<()> {
        self.advance_and_redispatch(pid)?;
        self.free_core()
    }

    fn free_core(&mut self) -> SimResult<()> {
        self.cores.release(self.now)?;
        if let Some(next) = self.wait_queue.pop_front() {
            let granted = self.cores.try_acquire(self.now);
            debug_assert!(granted, "a core was released just above");
            let duration = self.current_duration(next)?;
            self.schedule
                .add(self.now + duration, Event::new(EventKind::CoreFreed, next));
            self.table.get_mut(next)?.run_at(self.now);
            debug!(pid = next, "granted freed core to queue head");
        }
        Ok(())
    }

    fn on_resource_requested(&mut self, pid: Pid) -> SimResult<()> {
        // Disk and terminal resources model no contention.
        let duration = self.current_duration(pid)?;
        self.schedule.add(
            self.now + duration,
            Event::new(EventKind::ResourceReleased, pid),
        );
        self.table.get_mut(pid)?.run_at(self.now);
        Ok(())
    }

    fn on_resource_released(&mut self, pid: Pid) -> SimResult<()> {
        self.advance_and_redispatch(pid)
    }

    fn advance_and_redispatch(&mut self, pid: Pid) -> SimResult<()> {
        let now = self.now;
        let process = self.table.get_mut(pid)?;
        process.advance(now);
        if process.status() == ProcessStatus::Completed {
            return Ok(());
        }
        self.dispatch_current(pid)
    }

    fn current_duration(&self, pid: Pid) -> SimResult<Ticks> {
        let request = self
            .table
            .get(pid)?
            .current_request()
            .expect("dispatched process must have a current request");
        Ok(request.duration)
    }
}
