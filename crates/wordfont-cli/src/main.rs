//! wordfont CLI - Command-line interface for building SF2 banks from words
//!
//! This binary builds instrument banks from directories of word samples,
//! encodes intermediate representation files and inspects SF2 output.

use clap::{Parser, Subcommand, ValueEnum};
use env_logger::{Builder, Env};
use std::path::PathBuf;
use std::process::ExitCode;

use wordfont_bank::SampleOrder;
use wordfont_cli::commands;
use wordfont_cli::commands::build::{BuildArgs, DEFAULT_START_NOTE};

/// wordfont - Word Sample Bank Builder
#[derive(Parser)]
#[command(name = "wordfont")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an SF2 bank from a directory of mono WAV files
    Build {
        /// Directory containing the word samples
        #[arg(short, long)]
        samples_dir: PathBuf,

        /// Bank name (default: directory name)
        #[arg(short, long)]
        name: Option<String>,

        /// Author (default: WordPlay)
        #[arg(long)]
        author: Option<String>,

        /// Copyright (default: 2024 WordPlay)
        #[arg(long)]
        copyright: Option<String>,

        /// Comments (default: Created by WordPlay)
        #[arg(long)]
        comments: Option<String>,

        /// MIDI key of the first sample
        #[arg(long, default_value_t = DEFAULT_START_NOTE)]
        start_note: u32,

        /// Order of discovered samples on the keyboard
        #[arg(long, value_enum, default_value_t = OrderArg::Name)]
        order: OrderArg,

        /// Word-slice manifest (JSON) to use instead of directory discovery
        #[arg(long)]
        slices: Option<PathBuf>,

        /// JSON file with bank metadata; flags take precedence
        #[arg(long)]
        info: Option<PathBuf>,

        /// SF2 output path (default: <samples_dir>/<name>.sf2)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report bank problems (duplicate presets, key ranges, long names)
        #[arg(long)]
        validate: bool,

        /// Only write the IR JSON
        #[arg(long)]
        json_only: bool,
    },

    /// Encode an IR JSON file into an SF2 file
    Encode {
        /// Path to the IR JSON file
        input: String,

        /// Output path (default: input with .json dropped, or .sf2 appended)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print the chunk structure of an SF2 file
    Inspect {
        /// Path to the SF2 file
        file: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OrderArg {
    /// File name
    Name,
    /// Modification time, oldest first
    Modified,
}

impl From<OrderArg> for SampleOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Name => SampleOrder::Name,
            OrderArg::Modified => SampleOrder::Modified,
        }
    }
}

fn setup_logger() {
    // RUST_LOG overrides, e.g. `RUST_LOG=debug` for chunk sizes
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .try_init()
        .unwrap_or(());
}

fn main() -> ExitCode {
    setup_logger();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build {
            samples_dir,
            name,
            author,
            copyright,
            comments,
            start_note,
            order,
            slices,
            info,
            output,
            validate,
            json_only,
        } => commands::build::run(&BuildArgs {
            samples_dir,
            name,
            author,
            copyright,
            comments,
            start_note,
            order: order.into(),
            slices,
            info,
            output,
            validate,
            json_only,
        }),
        Commands::Encode { input, output } => commands::encode::run(&input, output.as_deref()),
        Commands::Inspect { file, json } => commands::inspect::run(&file, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
