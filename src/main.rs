use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::Context;
use average::Estimate;
use clap::{Parser, Subcommand};
use rand::prelude::*;

use procsim::core::driver::{Executed, Simulator};
use procsim::core::process::{Pid, ResourceKind, Ticks};
use procsim::input;

#[derive(Parser)]
#[command(about = "Discrete-event simulation of processes contending for compute cores")]
struct AppArg {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Simulate a directive file (stdin when no file is given)
    Run {
        #[arg(short = 'f', long = "input")]
        input: Option<PathBuf>,
        #[arg(short = 'c', long = "cores", default_value_t = 1)]
        cores: usize,
    },
    /// Simulate a seeded random workload and report summary statistics
    Gen {
        #[arg(long = "ticks", default_value_t = 100)]
        ticks: Ticks,
        #[arg(short = 'c', long = "cores", default_value_t = 2)]
        cores: usize,
        #[arg(long = "seed", default_value_t = 0)]
        seed: u64,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    match AppArg::parse().command {
        Command::Run { input, cores } => run(input, cores),
        Command::Gen { ticks, cores, seed } => gen(ticks, cores, seed),
    }
}

fn run(input: Option<PathBuf>, cores: usize) -> anyhow::Result<()> {
    let mut sim = Simulator::new(cores);
    match input {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
            input::load(&mut sim, BufReader::new(file))?;
        }
        None => input::load(&mut sim, io::stdin().lock())?,
    }

    let end = sim.run(print_event)?;
    println!("Simulation completed at {end}");
    report(&sim, end);
    Ok(())
}

fn gen(ticks: Ticks, cores: usize, seed: u64) -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut sim = Simulator::new(cores);

    let mut next_pid: Pid = 1;
    for t in 0..ticks {
        if rng.gen::<f64>() < 0.3 {
            sim.add_process(next_pid, t)?;
            for _ in 0..rng.gen_range(1..=3) {
                let kind = match rng.gen_range(0..10) {
                    0..=6 => ResourceKind::Core,
                    7..=8 => ResourceKind::Disk,
                    _ => ResourceKind::Terminal,
                };
                let duration = if rng.gen::<f64>() < 0.5 { 2 } else { 6 };
                sim.add_request(next_pid, kind, duration)?;
            }
            next_pid += 1;
        }
    }

    let end = sim.run(|_| {})?;
    println!(
        "{} processes on {} cores, finished at {}",
        sim.table().len(),
        cores,
        end
    );

    // Time to first grant, and total time in the system.
    let response = avg(sim.table().iter().filter_map(|process| {
        Some((process.started_at()? - process.arrival_time) as f64)
    }));
    let turnaround = avg(sim.table().iter().filter_map(|process| {
        Some((process.completion_time()? - process.arrival_time) as f64)
    }));
    println!("Average response time: {response:.2} ticks");
    println!("Average turnaround time: {turnaround:.2} ticks");
    println!(
        "Pool utilization: {:.1}%",
        sim.cores().aggregate_utilization(end)
    );
    Ok(())
}

fn print_event(executed: Executed) {
    println!("{} at {}", executed.event, executed.time);
    if executed.completed {
        println!("Process {} completed at {}", executed.event.pid, executed.time);
    }
}

fn report(sim: &Simulator, end: Ticks) {
    println!();
    for (pid, status) in sim.snapshot().statuses {
        println!("Process {pid}: {status}");
    }
    for (slot, pct) in sim.cores().per_slot_utilization(end).iter().enumerate() {
        println!("Core slot {slot}: {pct:.1}% busy");
    }
    println!(
        "Pool utilization: {:.1}%",
        sim.cores().aggregate_utilization(end)
    );
}

fn avg(iter: impl Iterator<Item = f64>) -> f64 {
    iter.collect::<average::Mean>().estimate()
}
