use clap::{Parser, Subcommand};
use scout_apdu_core::{CardExecutor, ExecutorConfig, FileId};
use scout_apdu_transport_pcsc::{PcscConfig, PcscDeviceManager};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

mod commands;
mod progress;
mod utils;

use commands::*;
use utils::{HexBytes, parse_hex, parse_int, reader};

#[derive(Parser)]
#[command(version, about = "Discover the commands, files and data objects a smart card answers to")]
struct Cli {
    /// Optional reader name to use (will auto-detect if not specified)
    #[arg(short, long)]
    reader: Option<String>,

    /// Use the first card whose ATR equals this hex string
    #[arg(long, value_parser = parse_hex, conflicts_with = "reader")]
    atr: Option<HexBytes>,

    /// Debug level output
    #[arg(short, long)]
    verbose: bool,

    /// Allow extended length APDUs
    #[arg(short, long)]
    extended: bool,

    /// Select this DF by name (hex AID) before scanning
    #[arg(long, value_parser = parse_hex)]
    aid: Option<HexBytes>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available readers
    List,

    /// Find the class and instruction bytes the card accepts
    ClaIns {
        /// First class byte
        #[arg(long, default_value = "0x00", value_parser = parse_int::<u16>)]
        cla_start: u16,

        /// End of the class byte range (exclusive)
        #[arg(long, default_value = "0x100", value_parser = parse_int::<u16>)]
        cla_end: u16,

        /// First instruction byte
        #[arg(long, default_value = "0x00", value_parser = parse_int::<u16>)]
        ins_start: u16,

        /// End of the instruction byte range (exclusive)
        #[arg(long, default_value = "0x100", value_parser = parse_int::<u16>)]
        ins_end: u16,
    },

    /// Find the P1/P2 values one instruction accepts
    #[command(name = "p1-p2")]
    P1P2 {
        /// Class byte
        #[arg(value_parser = parse_int::<u8>)]
        cla: u8,

        /// Instruction byte
        #[arg(value_parser = parse_int::<u8>)]
        ins: u8,

        /// First P1 value
        #[arg(long, default_value = "0x00", value_parser = parse_int::<u16>)]
        p1_start: u16,

        /// End of the P1 value range (exclusive)
        #[arg(long, default_value = "0x100", value_parser = parse_int::<u16>)]
        p1_end: u16,

        /// First P2 value
        #[arg(long, default_value = "0x00", value_parser = parse_int::<u16>)]
        p2_start: u16,

        /// End of the P2 value range (exclusive)
        #[arg(long, default_value = "0x100", value_parser = parse_int::<u16>)]
        p2_end: u16,
    },

    /// Infer the attributes of one elementary file
    AttributeEf {
        /// File identifier
        #[arg(value_parser = parse_int::<u16>)]
        id: u16,

        /// Class byte
        #[arg(long, default_value = "0x00", value_parser = parse_int::<u8>)]
        cla: u8,
    },

    /// Find the elementary files under the current DF
    Ef {
        /// Class byte
        #[arg(long, default_value = "0x00", value_parser = parse_int::<u8>)]
        cla: u8,

        /// First file identifier
        #[arg(long, default_value = "0x0000", value_parser = parse_int::<u32>)]
        start: u32,

        /// End of the file identifier range (exclusive)
        #[arg(long, default_value = "0x10000", value_parser = parse_int::<u32>)]
        end: u32,
    },

    /// Find the data objects retrievable with GET DATA
    Do {
        /// Class byte
        #[arg(long, default_value = "0x00", value_parser = parse_int::<u8>)]
        cla: u8,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let manager = PcscDeviceManager::new()?;

    if let Commands::List = cli.command {
        reader::list_readers(&manager)?;
        return Ok(());
    }

    let transport = reader::connect(
        &manager,
        cli.reader.as_deref(),
        cli.atr.clone(),
        PcscConfig::default(),
    )?;
    info!("Using reader: {}", transport.reader_name());

    let config = ExecutorConfig::default().with_extended_apdu(cli.extended);
    let mut executor = CardExecutor::with_config(transport, config);

    if let Some(aid) = &cli.aid {
        select_aid(&mut executor, aid)?;
    }

    match cli.command {
        Commands::List => {}
        Commands::ClaIns {
            cla_start,
            cla_end,
            ins_start,
            ins_end,
        } => cla_ins_command(&mut executor, cla_start..cla_end, ins_start..ins_end)?,
        Commands::P1P2 {
            cla,
            ins,
            p1_start,
            p1_end,
            p2_start,
            p2_end,
        } => p1_p2_command(&mut executor, cla, ins, p1_start..p1_end, p2_start..p2_end)?,
        Commands::AttributeEf { id, cla } => {
            attribute_ef_command(&mut executor, FileId::new(id), cla)?
        }
        Commands::Ef { cla, start, end } => ef_command(&mut executor, cla, start..end)?,
        Commands::Do { cla } => do_command(&mut executor, cla)?,
    }

    Ok(())
}

fn setup_logging(verbose: bool) {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, &directives))
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .init();
}

/// `RUST_LOG`-style directives, falling back to a level chosen by `--verbose`
fn log_filter(verbose: bool, directives: &str) -> EnvFilter {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(directives)
}
