//! nvlog CLI
//!
//! Drives the log and status flag on a device image file, so the firmware
//! behavior can be exercised (and power-cycled) from a host.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use nvlog::console::run_session;
use nvlog::flag::{load_flag, FlagSlot};
use nvlog::store::{FileStore, RetryingStore};
use nvlog::{Config, Engine, LogManager, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// nvlog device simulator
#[derive(Parser, Debug)]
#[command(name = "nvlog")]
#[command(about = "Checksummed EEPROM event log on a device image file")]
#[command(version)]
struct Args {
    /// Device image file
    #[arg(short, long, default_value = "./nvlog.img")]
    image: PathBuf,

    /// JSON config file (defaults to the reference board)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the post-write settle delay in milliseconds
    #[arg(long)]
    settle_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Append a text record
    Append {
        /// The text to log
        text: String,
    },

    /// Print every valid entry
    Dump,

    /// Zero the log region
    Erase,

    /// Scan the region and print the recovered cursor
    Recover,

    /// Run the boot sequence (boot record + status flag)
    Boot,

    /// Boot, then flip one status bit and log the change
    Toggle {
        /// Bit index 0-7
        #[arg(value_parser = clap::value_parser!(u8).range(0..8))]
        bit: u8,
    },

    /// Print the stored status flag without booting
    Status,

    /// Boot, then read `read` / `erase` commands from stdin
    Console,

    /// Print the effective configuration as JSON
    Config,
}

type DeviceStore = RetryingStore<FileStore>;

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,nvlog=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(ms) = args.settle_ms {
        config.settle_delay_ms = ms;
    }
    config.validate()?;

    tracing::debug!("nvlog v{} on image {}", nvlog::VERSION, args.image.display());

    match args.command {
        Commands::Append { text } => {
            let mut log = open_log(&args.image, &config)?;
            let address = log.append(&text)?;
            println!("Log written at address: {}", address);
        }
        Commands::Dump => {
            let mut log = open_log(&args.image, &config)?;
            for record in log.entries() {
                let record = record?;
                println!("{:>5}  {}", record.address, record.entry.text());
            }
        }
        Commands::Erase => {
            let mut log = open_log(&args.image, &config)?;
            log.erase_all()?;
            println!("Log erased.");
        }
        Commands::Recover => {
            let mut log = open_log(&args.image, &config)?;
            let report = log.recover()?;
            println!(
                "cursor={} valid_entries={} stop={:?}",
                report.cursor, report.valid_entries, report.stop
            );
        }
        Commands::Boot => {
            let engine = open_engine(&args.image, config)?;
            let boot = engine.boot_report();
            println!(
                "Booted: boot record at {}, status 0x{:02X} ({})",
                boot.boot_address,
                boot.status,
                if boot.status_restored { "restored" } else { "default" }
            );
        }
        Commands::Toggle { bit } => {
            let mut engine = open_engine(&args.image, config)?;
            let status = engine.toggle_status(1 << bit)?;
            println!("Status: 0x{:02X}", status);
        }
        Commands::Status => {
            let mut store = open_store(&args.image, &config)?;
            let loaded = load_flag(&mut store, FlagSlot::new(config.status_flag_address)?)?;
            if loaded.valid {
                println!("Status: 0x{:02X}", loaded.value);
            } else {
                println!("Status: invalid (stored 0x{:02X})", loaded.value);
            }
        }
        Commands::Console => {
            let mut engine = open_engine(&args.image, config)?;
            let stdin = io::stdin();
            let executed = run_session(&mut engine, stdin.lock(), io::stdout())?;
            tracing::debug!("Console closed after {} commands", executed);
        }
        Commands::Config => {
            println!("{}", config.to_json()?);
        }
    }

    Ok(())
}

fn open_store(image: &Path, config: &Config) -> Result<DeviceStore> {
    let file = FileStore::open(image, config.store_capacity)?
        .with_settle_delay(Duration::from_millis(config.settle_delay_ms));
    Ok(RetryingStore::new(file, config.retry))
}

fn open_log(image: &Path, config: &Config) -> Result<LogManager<DeviceStore>> {
    LogManager::from_config(open_store(image, config)?, config)
}

fn open_engine(image: &Path, config: Config) -> Result<Engine<DeviceStore>> {
    let store = open_store(image, &config)?;
    Engine::open(config, store)
}
