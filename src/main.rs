use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cpusim::{
    MlfqConfig, PolicyKind, Process, SimConfig, SimOutcome, Ticks,
    report::{self, Report},
    simulate,
    stats::{self, ScheduleStats},
    workload::{self, WorkloadSpec},
};
use log::{debug, info};
use serde::Serialize;

/// Simulate classical CPU scheduling policies over a workload and print the
/// resulting per-process timetables.
#[derive(Debug, Parser)]
#[command(name = "cpusim", version)]
struct Opts {
    /// Number of processes to generate when no workload file is given.
    #[clap(short = 'n', long, default_value = "5")]
    num_processes: usize,

    /// Seed for the workload generator. Picked at random if omitted.
    #[clap(short = 's', long)]
    seed: Option<u64>,

    /// Read the workload from a JSON array of {id, arrivalTime, burstTime}
    /// objects instead of generating one.
    #[clap(short = 'w', long)]
    workload: Option<PathBuf>,

    /// Round robin time quantum.
    #[clap(short = 'q', long, default_value = "2")]
    quantum: Ticks,

    /// MLFQ time quanta, highest priority level first.
    #[clap(long, value_delimiter = ',', default_value = "4,8,16")]
    mlfq_quanta: Vec<Ticks>,

    /// Number of MLFQ queues. Defaults to the number of quanta.
    #[clap(long)]
    mlfq_queues: Option<usize>,

    /// Policies to run, comma separated (fifo, sjf, stcf, rr, mlfq). All of
    /// them if omitted.
    #[clap(short = 'p', long = "policy", value_delimiter = ',')]
    policies: Vec<PolicyKind>,

    /// Output format.
    #[clap(short = 'f', long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Page height of the text report in layout units, 10 per line.
    #[clap(long, default_value_t = report::DEFAULT_PAGE_HEIGHT)]
    page_height: u32,

    /// Print average turnaround, response and waiting time per policy.
    #[clap(long)]
    stats: bool,

    /// Enable verbose output, including per-slice tracing. Specify multiple
    /// times to increase verbosity.
    #[clap(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PolicyResult<'a> {
    #[serde(flatten)]
    outcome: &'a SimOutcome,
    stats: ScheduleStats,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    seed: Option<u64>,
    workload: &'a [Process],
    results: Vec<PolicyResult<'a>>,
}

fn init_logging(verbose: u8) -> Result<()> {
    let llv = match verbose {
        0 => simplelog::LevelFilter::Info,
        1 => simplelog::LevelFilter::Debug,
        _ => simplelog::LevelFilter::Trace,
    };
    let mut lcfg = simplelog::ConfigBuilder::new();
    lcfg.set_time_level(simplelog::LevelFilter::Error)
        .set_location_level(simplelog::LevelFilter::Off)
        .set_target_level(simplelog::LevelFilter::Off)
        .set_thread_level(simplelog::LevelFilter::Off);
    simplelog::TermLogger::init(
        llv,
        lcfg.build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;
    Ok(())
}

fn load_workload(opts: &Opts) -> Result<(Vec<Process>, Option<u64>)> {
    if let Some(path) = &opts.workload {
        let procs = workload::load(path)?;
        info!("Loaded {} processes from {}", procs.len(), path.display());
        return Ok((procs, None));
    }

    let seed = opts.seed.unwrap_or_else(rand::random);
    let procs = workload::generate(opts.num_processes, &WorkloadSpec::default(), seed)?;
    info!("Generated {} processes (seed {seed})", procs.len());
    Ok((procs, Some(seed)))
}

fn sim_config(opts: &Opts) -> Result<SimConfig> {
    let queues = opts.mlfq_queues.unwrap_or(opts.mlfq_quanta.len());
    let mlfq = MlfqConfig::new(queues, opts.mlfq_quanta.clone())
        .context("Invalid MLFQ configuration")?;
    Ok(SimConfig {
        time_quantum: opts.quantum,
        mlfq,
    })
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    init_logging(opts.verbose)?;

    let config = sim_config(&opts)?;
    let (procs, seed) = load_workload(&opts)?;
    for p in &procs {
        debug!("{p:?}");
    }

    let policies = if opts.policies.is_empty() {
        PolicyKind::ALL.to_vec()
    } else {
        opts.policies.clone()
    };

    let outcomes = policies
        .iter()
        .map(|&kind| {
            simulate(kind, &procs, &config).with_context(|| format!("{kind} simulation failed"))
        })
        .collect::<Result<Vec<_>>>()?;

    match opts.format {
        Format::Json => {
            let results = outcomes
                .iter()
                .map(|outcome| PolicyResult {
                    outcome,
                    stats: stats::summarize(&procs, &outcome.schedule),
                })
                .collect();
            let out = JsonOutput {
                seed,
                workload: &procs,
                results,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Text => {
            print!("{}", Report::from_outcomes(&outcomes, opts.page_height)?);
            if opts.stats {
                println!();
                for outcome in &outcomes {
                    let s = stats::summarize(&procs, &outcome.schedule);
                    println!(
                        "{:<5} turnaround {:>6.2}  response {:>6.2}  waiting {:>6.2}  makespan {}",
                        outcome.policy, s.avg_turnaround, s.avg_response, s.avg_waiting, s.makespan
                    );
                }
            }
        }
    }

    Ok(())
}
