//! Pixsort CLI: pixel-sort videos and still images.
//!
//! Usage:
//!   pixsort video <INPUT> --save <OUT>   Sort every frame of a video
//!   pixsort image <INPUT> <OUTPUT>       Sort a single image
//!   pixsort info <INPUT>                 Show video properties
//!   pixsort check                        Check for ffmpeg/ffprobe
//!   pixsort config [--init]              Show or create the config file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use pixsort_common::config::AppConfig;

mod commands;

use commands::SortArgs;

#[derive(Parser)]
#[command(
    name = "pixsort",
    about = "Sort the pixels of every video frame along rows or columns",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pixel-sort every frame of a video
    Video {
        /// Input video file
        input: PathBuf,

        /// Output video file
        #[arg(short, long)]
        save: Option<PathBuf>,

        #[command(flatten)]
        sort: SortArgs,

        /// Output frame rate (defaults to the input rate)
        #[arg(long)]
        fps: Option<f64>,

        /// ffmpeg video codec for the output
        #[arg(long)]
        codec: Option<String>,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Pixel-sort a single image
    Image {
        /// Input image file
        input: PathBuf,

        /// Output image file
        output: PathBuf,

        #[command(flatten)]
        sort: SortArgs,
    },

    /// Show video properties
    Info {
        /// Input video file
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that ffmpeg and ffprobe are installed
    Check,

    /// Show the effective configuration
    Config {
        /// Write the default configuration file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, config_error) = AppConfig::load();

    // Initialize logging
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    pixsort_common::logging::init_logging(&config.logging);
    if let Some(e) = config_error {
        tracing::warn!(
            "Failed to load config at {:?}, using defaults: {}",
            pixsort_common::config::config_file_path(),
            e
        );
    }

    match cli.command {
        Commands::Video {
            input,
            save,
            sort,
            fps,
            codec,
            quiet,
        } => commands::video::run(&config, input, save, sort, fps, codec, quiet).await,
        Commands::Image {
            input,
            output,
            sort,
        } => commands::image::run(&config, input, output, sort).await,
        Commands::Info { input, json } => commands::info::run(input, json),
        Commands::Check => commands::check::run(),
        Commands::Config { init } => commands::config::run(&config, init),
    }
}
