mod narrate;

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use zoo_common::ZooConfig;
use zoo_kernel::{LifeEvent, RunConfig, SimulationHandle, SplitMix64, Zoo};
use zoo_roster::{HttpRoster, Roster};

use narrate::Narrator;

#[derive(Parser)]
#[command(name = "zoo-cli", about = "Run and inspect a zoo hunger simulation")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version info
    Info,
    /// Print the default configuration as YAML
    Config,
    /// Open the zoo and let the clock run until every animal is dead
    Run {
        #[command(flatten)]
        zoo: ZooArgs,
        /// Override the tick interval in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,
        /// Stop after this many ticks even if animals remain
        #[arg(short, long)]
        ticks: Option<u64>,
        /// Skip the staff roster fetch
        #[arg(long)]
        no_roster: bool,
        /// Emit events as JSON lines instead of narration
        #[arg(long)]
        json: bool,
    },
    /// Step the zoo without a timer and print what happened
    Simulate {
        #[command(flatten)]
        zoo: ZooArgs,
        /// Maximum number of ticks to step
        #[arg(short, long, default_value = "40")]
        ticks: u64,
        /// Emit events as JSON lines instead of narration
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct ZooArgs {
    /// YAML config file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Seed for stocking the cages
    #[arg(short, long)]
    seed: Option<u64>,
}

impl ZooArgs {
    fn load(&self) -> anyhow::Result<ZooConfig> {
        let mut config = match &self.config {
            Some(path) => ZooConfig::load(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => ZooConfig::default(),
        };
        if self.seed.is_some() {
            config.simulation.seed = self.seed;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("zoo-cli v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Config => {
            print!("{}", ZooConfig::default().to_yaml()?);
        }
        Commands::Run {
            zoo,
            interval_ms,
            ticks,
            no_roster,
            json,
        } => {
            let mut config = zoo.load()?;
            if let Some(ms) = interval_ms {
                config.simulation.interval_ms = ms;
            }
            config.validate()?;

            let roster = if no_roster || !config.roster.enabled {
                Roster::default()
            } else {
                let source = HttpRoster::new(
                    config.roster.url.clone(),
                    Duration::from_secs(config.roster.timeout_secs),
                );
                let roster = zoo_roster::fetch_or_default(&source);
                if !roster.is_empty() && !json {
                    println!("We employed people!");
                }
                roster
            };

            let zoo = open(&config);
            let narrator = Narrator::new(roster);
            if !json {
                for line in Narrator::welcome(&zoo) {
                    println!("{line}");
                }
            }

            let run = RunConfig {
                max_ticks: ticks,
                stop_when_extinct: true,
                ..RunConfig::from(&config.simulation)
            };
            let mut handle = SimulationHandle::spawn(zoo, run)?;
            while let Some(report) = handle.next_report() {
                for event in &report.events {
                    emit(&narrator, event, json)?;
                }
            }
            let zoo = handle.wait()?;
            if !json {
                print_census(&zoo);
            }
        }
        Commands::Simulate { zoo, ticks, json } => {
            let config = zoo.load()?;
            let mut zoo = open(&config);
            let narrator = Narrator::new(Roster::default());
            while zoo.tick() < ticks && !zoo.is_extinct() {
                let events = zoo.step();
                if !json && !events.is_empty() {
                    println!("-- tick {} --", zoo.tick());
                }
                for event in &events {
                    emit(&narrator, event, json)?;
                }
            }
            if !json {
                print_census(&zoo);
            }
        }
    }

    Ok(())
}

fn open(config: &ZooConfig) -> Zoo {
    let seed = config.simulation.seed.unwrap_or_else(clock_seed);
    tracing::info!(seed, "stocking zoo");
    Zoo::open(config, &mut SplitMix64::new(seed))
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn emit(narrator: &Narrator, event: &LifeEvent, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(event)?);
    } else {
        println!("{}", narrator.event(event));
    }
    Ok(())
}

fn print_census(zoo: &Zoo) {
    println!(
        "After {} ticks: {} alive, {} dead",
        zoo.tick(),
        zoo.alive_count(),
        zoo.dead_count()
    );
    println!("  {}", Narrator::thresholds_line(zoo));
    for entry in zoo.census() {
        println!("  {}", Narrator::census_line(&entry));
    }
}
