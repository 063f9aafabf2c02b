//! micclip CLI: record clips, relay chat segments and write test tones

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use micclip::commands;

#[derive(Parser)]
#[command(name = "micclip")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (default: ~/.config/micclip/settings.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sine tone to a new WAV file
    Tone {
        /// Output file (must not exist)
        #[arg(short, long)]
        out: PathBuf,

        #[arg(long, default_value_t = 440.0)]
        freq: f32,

        #[arg(long, default_value_t = 1.0)]
        secs: f32,

        #[arg(long, default_value_t = 44100)]
        rate: u32,
    },

    /// Record a clip from the synthetic capture source
    Record {
        /// Seconds of audio to feed; recording stops early at the configured max length
        #[arg(long, default_value_t = 10.0)]
        secs: f32,

        #[arg(long, default_value_t = 440.0)]
        freq: f32,
    },

    /// Relay the synthetic capture source in segments and save each one
    Chat {
        #[arg(long, default_value_t = 5.0)]
        secs: f32,

        /// Directory for received segments (default: <save_dir>/chat)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

fn main() -> ExitCode {
    // Load .env file if present (for development convenience)
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Tone {
            out,
            freq,
            secs,
            rate,
        } => commands::tone(&out, freq, secs, rate),
        Commands::Record { secs, freq } => {
            commands::load(cli.config.as_deref()).and_then(|s| commands::record(&s, secs, freq))
        }
        Commands::Chat { secs, out_dir } => commands::load(cli.config.as_deref())
            .and_then(|s| commands::chat(&s, secs, out_dir)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
