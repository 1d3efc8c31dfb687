use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fangage_backend::api;
use fangage_backend::caption::{CaptionClient, DEFAULT_TONE};
use fangage_backend::config::FangageConfig;
use fangage_backend::store::ContentStore;
use fangage_backend::telemetry;

#[derive(Parser)]
#[command(author, version, about = "Fangage backend daemon and caption CLI")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (Axum) for REST/API access
    Serve,
    /// Generate a single caption on stdout and exit
    Caption {
        /// Topic the caption should cover
        topic: String,
        /// Writing tone, defaults to the composer's tone
        #[arg(long)]
        tone: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    let args = Args::parse();

    let config = FangageConfig::from_env();

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let store = ContentStore::with_seed_data();
            let (users, posts, media) = store.with_state(|state| {
                (
                    state.users().len(),
                    state.posts().len(),
                    state.media().len(),
                )
            })?;
            tracing::info!(users, posts, media, "content store seeded");
            api::serve_http(config, store).await
        }
        Command::Caption { topic, tone } => {
            let http_client = reqwest::Client::builder()
                .user_agent("Fangage/0.1.0")
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .context("failed to build HTTP client")?;
            let captions = CaptionClient::new(config.caption, http_client);
            let tone = tone.unwrap_or_else(|| DEFAULT_TONE.to_string());
            println!("{}", captions.generate(&topic, &tone).await);
            Ok(())
        }
    }
}
