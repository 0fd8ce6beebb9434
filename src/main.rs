use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;

use intersection_sim::simulation::{
    evaluate, mean_reward, DecisionAgent, EnvConfig, LongestQueueAgent, RoundRobinAgent,
    SignalConfig, Simulation, TrafficEnv, DEFAULT_ALL_RED, DEFAULT_ARRIVAL_RATE,
    DEFAULT_EPISODE_LENGTH, DEFAULT_GREEN_MIN, DEFAULT_SERVICE_RATE, DEFAULT_SWITCH_THRESHOLD,
    DEFAULT_YELLOW,
};

#[derive(Parser)]
#[command(name = "intersection_sim")]
#[command(about = "Single-intersection traffic signal simulation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the intersection tick by tick and print its state
    Run(RunArgs),
    /// Play episodes of the learning environment with a baseline agent
    Episodes(EpisodeArgs),
}

/// Signal timing shared by every mode
#[derive(Args)]
struct TimingArgs {
    /// Minimum green time in seconds
    #[arg(long, default_value_t = DEFAULT_GREEN_MIN)]
    green_min: u32,

    /// Yellow time in seconds
    #[arg(long, default_value_t = DEFAULT_YELLOW)]
    yellow: u32,

    /// All-red clearance time in seconds
    #[arg(long, default_value_t = DEFAULT_ALL_RED)]
    all_red: u32,

    /// Vehicles served per green second
    #[arg(long, default_value_t = DEFAULT_SERVICE_RATE)]
    service_rate: u32,

    /// How many more vehicles another approach needs to take the green
    #[arg(long, default_value_t = DEFAULT_SWITCH_THRESHOLD)]
    switch_threshold: u32,
}

impl TimingArgs {
    fn to_config(&self) -> Result<SignalConfig> {
        SignalConfig::new(
            self.green_min,
            self.yellow,
            self.all_red,
            self.service_rate,
            self.switch_threshold,
        )
        .context("Invalid signal timing")
    }
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    timing: TimingArgs,

    /// Number of ticks (simulated seconds) to run
    #[arg(long, default_value = "120")]
    ticks: u64,

    /// Mean background arrivals per direction per tick
    #[arg(long, default_value_t = DEFAULT_ARRIVAL_RATE)]
    arrival_rate: f64,

    /// Seed for reproducible arrivals
    #[arg(long)]
    seed: Option<u64>,

    /// Decision agent consulted when the clearance interval ends
    #[arg(long, value_enum, default_value = "none")]
    agent: RunAgent,

    /// Vehicles queued before the first tick, e.g. `N,N,E`
    #[arg(long, value_delimiter = ',')]
    inject: Vec<String>,

    /// Pace ticks at one per second
    #[arg(long)]
    realtime: bool,

    /// Print a summary every this many ticks
    #[arg(long, default_value = "30")]
    report_every: u64,
}

#[derive(Args)]
struct EpisodeArgs {
    #[command(flatten)]
    timing: TimingArgs,

    /// Number of episodes to play
    #[arg(long, default_value = "10")]
    count: u32,

    /// Ticks per episode
    #[arg(long, default_value_t = DEFAULT_EPISODE_LENGTH)]
    episode_length: u64,

    /// Mean arrivals per direction per tick
    #[arg(long, default_value_t = DEFAULT_ARRIVAL_RATE)]
    arrival_rate: f64,

    /// Base seed; episode i uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Policy choosing the approach to open
    #[arg(long, value_enum, default_value = "heuristic")]
    agent: EpisodeAgent,
}

#[derive(Clone, Copy, ValueEnum)]
enum RunAgent {
    None,
    Longest,
    RoundRobin,
}

#[derive(Clone, Copy, ValueEnum)]
enum EpisodeAgent {
    Heuristic,
    Longest,
    RoundRobin,
}

fn baseline_agent(longest: bool) -> Box<dyn DecisionAgent> {
    if longest {
        Box::new(LongestQueueAgent)
    } else {
        Box::new(RoundRobinAgent)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run_simulation(args),
        Command::Episodes(args) => run_episodes(args),
    }
}

/// Run the interactive simulation headless
fn run_simulation(args: RunArgs) -> Result<()> {
    let config = args.timing.to_config()?;
    let mut sim = Simulation::new(config)?
        .with_random_arrivals(args.arrival_rate, args.seed)
        .context("Invalid arrival rate")?;

    match args.agent {
        RunAgent::None => {}
        RunAgent::Longest => sim.set_agent(Some(baseline_agent(true))),
        RunAgent::RoundRobin => sim.set_agent(Some(baseline_agent(false))),
    }

    for name in &args.inject {
        sim.add_car_named(name)
            .with_context(|| format!("Cannot inject vehicle on `{}`", name))?;
    }

    info!(
        "Running intersection for {} ticks (arrival rate {}/s per approach)",
        args.ticks, args.arrival_rate
    );
    println!("Initial state:");
    sim.print_summary();
    println!();

    let report_every = args.report_every.max(1);
    for _ in 0..args.ticks {
        sim.tick();

        if sim.clock() % report_every == 0 {
            println!("--- After tick {} ---", sim.clock());
            sim.print_summary();
            println!();
        }

        if args.realtime {
            std::thread::sleep(Duration::from_secs(1));
        }
    }

    println!("=== Final State ===");
    sim.print_summary();

    let snapshot = sim.snapshot();
    info!("=== SIMULATION COMPLETE ===");
    info!("Ticks run: {}", snapshot.tick);
    info!("Vehicles served: {}", snapshot.served_count);
    info!("Average wait: {:.2}s", snapshot.average_wait);
    info!("Vehicles waiting: {}", snapshot.total_queue());
    Ok(())
}

/// Play environment episodes and report the mean reward
fn run_episodes(args: EpisodeArgs) -> Result<()> {
    let signal = args.timing.to_config()?;
    let config = EnvConfig::new(signal, args.episode_length, args.arrival_rate)
        .context("Invalid environment configuration")?;
    let mut env = TrafficEnv::new(config, args.seed)?;

    let mut agent = match args.agent {
        EpisodeAgent::Heuristic => None,
        EpisodeAgent::Longest => Some(baseline_agent(true)),
        EpisodeAgent::RoundRobin => Some(baseline_agent(false)),
    };

    let summaries = evaluate(&mut env, agent.as_deref_mut(), args.count, args.seed);
    info!(
        "Mean reward over {} episodes: {:.2}",
        summaries.len(),
        mean_reward(&summaries)
    );
    Ok(())
}
