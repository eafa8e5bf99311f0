use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod generate;
mod health;
mod wiring;

/// Rachel, the stock narration voice.
const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";

#[derive(Debug, Parser)]
#[command(name = "newscast")]
#[command(about = "Generate spoken news briefings of a requested length")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Collect news, write a script, and render it to audio
    Generate(GenerateArgs),
    /// Check that the search, text, and speech services are reachable
    Health,
}

#[derive(Debug, Args)]
pub(crate) struct GenerateArgs {
    /// Topic to cover (repeat for several topics)
    #[arg(long = "topic", required = true)]
    topics: Vec<String>,
    /// Target length in seconds (60-900)
    #[arg(long, default_value = "180")]
    duration: u32,
    /// Voice identifier
    #[arg(long, default_value = DEFAULT_VOICE_ID)]
    voice: String,
    /// Language tag, e.g. en or es-MX
    #[arg(long)]
    language: Option<String>,
    /// professional, conversational, analytical, or upbeat
    #[arg(long)]
    tone: Option<String>,
    /// Output file; defaults to a generated name in the output directory
    #[arg(long)]
    out: Option<std::path::PathBuf>,
    /// Stop before the next attempt once this many seconds have passed
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Print the result as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = newscast_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate(args) => generate::run_generate(&config, args).await,
        Commands::Health => health::run_health(&config).await,
    }
}
