use std::collections::VecDeque;

use super::cores::CorePool;
use super::process::{Pid, ProcessStatus, ProcessTable};

/// Audits engine state after every executed event. All checks are
/// `debug_assert!`s; a violation is an engine bug, not a recoverable state.
#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self { step: 0 }
    }

    pub fn observe(&mut self, table: &ProcessTable, cores: &CorePool, wait_queue: &VecDeque<Pid>) {
        self.step += 1;

        debug_assert!(
            cores.busy_count() <= cores.core_count(),
            "busy count {} exceeds core count {} at step {}",
            cores.busy_count(),
            cores.core_count(),
            self.step
        );

        let mut waiting = 0;
        for process in table.iter() {
            debug_assert!(
                process.cursor() <= process.request_count(),
                "Process {} cursor {} ran past its {} requests",
                process.id,
                process.cursor(),
                process.request_count()
            );
            if process.status() == ProcessStatus::Completed {
                debug_assert_eq!(
                    process.cursor(),
                    process.request_count(),
                    "Process {} completed with requests left",
                    process.id
                );
            } else if process.cursor() > 0 {
                debug_assert!(
                    process.cursor() < process.request_count(),
                    "Process {} consumed every request but is not Completed",
                    process.id
                );
            }
            if process.status() == ProcessStatus::Waiting {
                waiting += 1;
            }
        }

        debug_assert_eq!(
            wait_queue.len(),
            waiting,
            "wait queue holds {} pids but {} processes are Waiting",
            wait_queue.len(),
            waiting
        );
        for &pid in wait_queue {
            let status = table.get(pid).map(|process| process.status());
            debug_assert_eq!(
                status,
                Ok(ProcessStatus::Waiting),
                "queued process {pid} is not Waiting"
            );
        }
    }
}
