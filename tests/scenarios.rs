//! End-to-end simulation scenarios driven through the public API.

use procsim::core::driver::Simulator;
use procsim::core::event::EventKind;
use procsim::{ProcessStatus, ResourceKind, Ticks};

/// Collect the full trace as the binary would print it.
fn trace(sim: &mut Simulator) -> (Vec<String>, Ticks) {
    let mut lines = Vec::new();
    let end = sim
        .run(|executed| {
            lines.push(format!("{} at {}", executed.event, executed.time));
            if executed.completed {
                lines.push(format!(
                    "Process {} completed at {}",
                    executed.event.pid, executed.time
                ));
            }
        })
        .expect("simulation must run to completion");
    (lines, end)
}

#[test]
fn single_core_contention() {
    // Process 1 runs 0..5; process 2 waits 1..5 then runs 5..8. The single
    // core is busy for the whole run.
    let mut sim = Simulator::new(1);
    sim.add_process(1, 0).unwrap();
    sim.add_request(1, ResourceKind::Core, 5).unwrap();
    sim.add_process(2, 1).unwrap();
    sim.add_request(2, ResourceKind::Core, 3).unwrap();

    let (lines, end) = trace(&mut sim);
    assert_eq!(end, 8);
    assert_eq!(
        lines,
        vec![
            "Process 1 arrives at 0",
            "Process 1 requests a core at 0",
            "Process 2 arrives at 1",
            "Process 2 requests a core at 1",
            "Process 1 frees a core at 5",
            "Process 1 completed at 5",
            "Process 2 frees a core at 8",
            "Process 2 completed at 8",
        ]
    );
    assert_eq!(sim.cores().per_slot_utilization(end), vec![100.0]);
    assert_eq!(sim.cores().aggregate_utilization(end), 100.0);
}

#[test]
fn zero_duration_requests_complete_within_one_timestamp() {
    let mut sim = Simulator::new(1);
    sim.add_process(1, 3).unwrap();
    sim.add_request(1, ResourceKind::Core, 0).unwrap();
    sim.add_request(1, ResourceKind::Disk, 0).unwrap();

    while let Some(executed) = sim.step().unwrap() {
        assert_eq!(executed.time, 3);
        assert_eq!(sim.wait_queue_len(), 0);
    }
    assert_eq!(sim.now(), 3);
    assert_eq!(
        sim.table().get(1).unwrap().status(),
        ProcessStatus::Completed
    );
    assert_eq!(sim.table().get(1).unwrap().completion_time(), Some(3));
}

#[test]
fn process_with_no_requests_completes_on_arrival() {
    let mut sim = Simulator::new(1);
    sim.add_process(1, 2).unwrap();

    let (lines, end) = trace(&mut sim);
    assert_eq!(end, 2);
    assert_eq!(
        lines,
        vec!["Process 1 arrives at 2", "Process 1 completed at 2"]
    );
    assert_eq!(
        sim.table().get(1).unwrap().status(),
        ProcessStatus::Completed
    );
    assert_eq!(sim.wait_queue_len(), 0);
}

#[test]
fn two_cores_cover_two_overlapping_processes() {
    let mut sim = Simulator::new(2);
    sim.add_process(1, 0).unwrap();
    sim.add_request(1, ResourceKind::Core, 6).unwrap();
    sim.add_process(2, 2).unwrap();
    sim.add_request(2, ResourceKind::Core, 6).unwrap();

    let mut max_busy = 0;
    let mut queue_seen = 0;
    while sim.step().unwrap().is_some() {
        max_busy = max_busy.max(sim.cores().busy_count());
        queue_seen = queue_seen.max(sim.wait_queue_len());
    }
    assert_eq!(max_busy, 2);
    assert_eq!(queue_seen, 0);
    assert_eq!(sim.table().get(1).unwrap().completion_time(), Some(6));
    assert_eq!(sim.table().get(2).unwrap().completion_time(), Some(8));
}

#[test]
fn waiters_are_served_in_fifo_order() {
    // Four processes pile up on one core; the grant order must match the
    // order they started waiting.
    let mut sim = Simulator::new(1);
    sim.add_process(1, 0).unwrap();
    sim.add_request(1, ResourceKind::Core, 10).unwrap();
    for pid in 2..=5 {
        sim.add_process(pid, pid - 1).unwrap();
        sim.add_request(pid, ResourceKind::Core, 1).unwrap();
    }

    let mut completions = Vec::new();
    sim.run(|executed| {
        if executed.completed {
            completions.push(executed.event.pid);
        }
    })
    .unwrap();
    assert_eq!(completions, vec![1, 2, 3, 4, 5]);
}

#[test]
fn busy_count_stays_within_pool_bounds() {
    let mut sim = Simulator::new(2);
    for pid in 1..=6 {
        sim.add_process(pid, pid / 2).unwrap();
        sim.add_request(pid, ResourceKind::Core, 3).unwrap();
        sim.add_request(pid, ResourceKind::Disk, 1).unwrap();
    }

    while sim.step().unwrap().is_some() {
        assert!(sim.cores().busy_count() <= sim.cores().core_count());
    }

    let end = sim.now();
    for pct in sim.cores().per_slot_utilization(end) {
        assert!((0.0..=100.0).contains(&pct));
    }
}

#[test]
fn identical_inputs_produce_identical_traces() {
    let build = || {
        let mut sim = Simulator::new(2);
        sim.add_process(1, 0).unwrap();
        sim.add_request(1, ResourceKind::Core, 4).unwrap();
        sim.add_request(1, ResourceKind::Terminal, 2).unwrap();
        sim.add_process(2, 0).unwrap();
        sim.add_request(2, ResourceKind::Core, 4).unwrap();
        sim.add_process(3, 1).unwrap();
        sim.add_request(3, ResourceKind::Core, 5).unwrap();
        sim
    };

    let (first, first_end) = trace(&mut build());
    let (second, second_end) = trace(&mut build());
    assert_eq!(first, second);
    assert_eq!(first_end, second_end);
}

#[test]
fn same_time_arrivals_execute_in_insertion_order() {
    let mut sim = Simulator::new(1);
    sim.add_process(7, 0).unwrap();
    sim.add_request(7, ResourceKind::Core, 1).unwrap();
    sim.add_process(8, 0).unwrap();
    sim.add_request(8, ResourceKind::Core, 1).unwrap();

    let mut first_arrival = None;
    sim.run(|executed| {
        if executed.event.kind == EventKind::Arrive && first_arrival.is_none() {
            first_arrival = Some(executed.event.pid);
        }
    })
    .unwrap();

    // Process 7 was seeded first, so it arrives first and runs first.
    assert_eq!(first_arrival, Some(7));
    assert_eq!(sim.table().get(7).unwrap().completion_time(), Some(1));
    assert_eq!(sim.table().get(8).unwrap().completion_time(), Some(2));
}
