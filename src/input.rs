//! Text-line directive parser.
//!
//! Grammar, one directive per line:
//! - `p <id> <arrival>` defines a process.
//! - `c <duration>` / `d <duration>` / `t <duration>` append a core, disk, or
//!   terminal request to the most recently defined process.
//!
//! Lines that do not match a directive are skipped.

use std::io::BufRead;

use thiserror::Error;
use tracing::warn;

use crate::core::driver::Simulator;
use crate::core::process::{Pid, ResourceKind, Ticks};
use crate::error::SimError;

#[derive(Debug, Error)]
pub enum InputError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Sim(#[from] SimError),
}

/// Populate `sim` with the directives read from `reader`.
pub fn load(sim: &mut Simulator, reader: impl BufRead) -> Result<(), InputError> {
    let mut last_pid: Option<Pid> = None;

    for line in reader.lines() {
        let line = line?;
        let mut fields = line.split_whitespace();
        let directive = match fields.next() {
            Some(directive) => directive,
            None => continue,
        };

        match directive {
            "p" => {
                let id: Option<Pid> = fields.next().and_then(|f| f.parse().ok());
                let arrival: Option<Ticks> = fields.next().and_then(|f| f.parse().ok());
                match (id, arrival) {
                    (Some(id), Some(arrival)) => {
                        sim.add_process(id, arrival)?;
                        last_pid = Some(id);
                    }
                    _ => warn!(line = %line, "skipping malformed process directive"),
                }
            }
            "c" | "d" | "t" => {
                let kind = match directive {
                    "c" => ResourceKind::Core,
                    "d" => ResourceKind::Disk,
                    _ => ResourceKind::Terminal,
                };
                let duration: Option<Ticks> = fields.next().and_then(|f| f.parse().ok());
                match (last_pid, duration) {
                    (Some(pid), Some(duration)) => sim.add_request(pid, kind, duration)?,
                    (None, _) => warn!(line = %line, "request precedes any process definition"),
                    _ => warn!(line = %line, "skipping malformed request directive"),
                }
            }
            _ => warn!(line = %line, "skipping unrecognized directive"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::process::{ProcessStatus, Request};

    #[test]
    fn directives_build_processes_and_requests() {
        let mut sim = Simulator::new(1);
        let text = "p 1 0\nc 5\nd 2\np 2 3\nt 1\n";
        load(&mut sim, text.as_bytes()).unwrap();

        let one = sim.table().get(1).unwrap();
        assert_eq!(one.request_count(), 2);
        assert_eq!(
            one.current_request(),
            Some(Request {
                kind: ResourceKind::Core,
                duration: 5
            })
        );

        let two = sim.table().get(2).unwrap();
        assert_eq!(two.arrival_time, 3);
        assert_eq!(
            two.current_request(),
            Some(Request {
                kind: ResourceKind::Terminal,
                duration: 1
            })
        );
        assert_eq!(two.status(), ProcessStatus::NotYetArrived);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let mut sim = Simulator::new(1);
        let text = "c 5\n\nnonsense\np one 0\np 1 0\nc\nc 4\n";
        load(&mut sim, text.as_bytes()).unwrap();

        assert_eq!(sim.table().len(), 1);
        assert_eq!(sim.table().get(1).unwrap().request_count(), 1);
    }

    #[test]
    fn duplicate_process_aborts_the_load() {
        let mut sim = Simulator::new(1);
        let text = "p 1 0\np 1 2\n";
        let err = load(&mut sim, text.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            InputError::Sim(SimError::DuplicateProcess(1))
        ));
    }
}
