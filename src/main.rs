use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use runo_client::config::DEFAULT_ENDPOINT;
use runo_client::{telemetry, ClientConfig, GameContext, Lobby};
use url::Url;

#[derive(Parser)]
#[command(name = "runo")]
#[command(about = "runo - play a game hosted by a runo rules service from the terminal")]
struct Cli {
    /// Root URL of the rules service
    #[arg(long, env = "RUNO_URL", default_value = DEFAULT_ENDPOINT, global = true)]
    url: Url,
    /// Poll interval in milliseconds
    #[arg(long, env = "RUNO_POLL_MS", default_value_t = 2000, global = true)]
    poll_ms: u64,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a game and sit at it as admin
    New {
        #[arg(short, long)]
        name: String,
    },
    /// Join a game that has not started yet
    Join {
        #[arg(short, long)]
        game: String,
        #[arg(short, long)]
        name: String,
    },
    /// Take back a seat you already hold
    Play {
        #[arg(short, long)]
        game: String,
        #[arg(short, long)]
        player: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();
    let cli = Cli::parse();

    let config = ClientConfig::new(cli.url.clone()).with_poll_interval(Duration::from_millis(cli.poll_ms));

    let ctx = match cli.command {
        Commands::New { name } => {
            let lobby = Lobby::new(cli.url, config.request_timeout)?;
            let ctx = lobby.new_game(&name).await.context("creating a game")?;
            println!("🚀 Created game {} - share this id so others can join", ctx.game_id);
            ctx
        }
        Commands::Join { game, name } => {
            let lobby = Lobby::new(cli.url, config.request_timeout)?;
            match lobby.join(&game, &name).await.context("joining the game")? {
                Some(ctx) => ctx,
                None => bail!("game {game} is no longer accepting players"),
            }
        }
        Commands::Play { game, player } => GameContext::new(cli.url, game, player),
    };

    runo::terminal::play(ctx, config).await
}
