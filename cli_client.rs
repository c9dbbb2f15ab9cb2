use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use runo_client::config::DEFAULT_ENDPOINT;
use runo_client::{telemetry, ClientConfig, Lobby};
use url::Url;

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();
    println!("🎮 runo CLI Client");
    println!("==================");

    let player_name = prompt("Enter your name: ")?;
    if player_name.is_empty() {
        println!("❌ Name cannot be empty");
        return Ok(());
    }

    let url = std::env::var("RUNO_URL").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
    let endpoint = Url::parse(&url).with_context(|| format!("invalid service url {url}"))?;
    let config = ClientConfig::new(endpoint.clone());
    println!("🔗 Using rules service at {endpoint}");

    let lobby = Lobby::new(endpoint, config.request_timeout)?;
    let game_id = prompt("Game id to join (empty to create a new game): ")?;
    let ctx = if game_id.is_empty() {
        let ctx = lobby.new_game(&player_name).await.context("creating a game")?;
        println!("🚀 Created game {}", ctx.game_id);
        ctx
    } else {
        println!("🚪 Joining game '{game_id}'...");
        match lobby.join(&game_id, &player_name).await.context("joining the game")? {
            Some(ctx) => ctx,
            None => bail!("game {game_id} is no longer accepting players"),
        }
    };

    runo::terminal::play(ctx, config).await
}
