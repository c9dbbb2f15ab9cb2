//! Requests to the external rules service.
//!
//! Every call sends exactly one request. Nothing here deduplicates
//! responses; callers match them against their own request tokens.

use async_trait::async_trait;
use runo_protocol::{
    truncate_player_name, ActionResult, CardId, Color, JoinResponse, NewGameResponse, Snapshot,
};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::{route, GameContext};
use crate::error::GatewayError;

/// A state-changing request issued on behalf of the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Start,
    PlayCard { card: CardId, color: Option<Color> },
    Draw,
    Quit,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::PlayCard { .. } => "playcard",
            Action::Draw => "draw",
            Action::Quit => "quit",
        }
    }
}

#[async_trait]
pub trait ActionGateway: Send + Sync {
    async fn fetch_state(&self) -> Result<Snapshot, GatewayError>;
    async fn start(&self) -> Result<bool, GatewayError>;
    async fn play_card(&self, card: &CardId, color: Option<Color>) -> Result<bool, GatewayError>;
    async fn draw(&self) -> Result<bool, GatewayError>;
    async fn quit(&self) -> Result<bool, GatewayError>;

    async fn perform(&self, action: &Action) -> Result<bool, GatewayError> {
        match action {
            Action::Start => self.start().await,
            Action::PlayCard { card, color } => self.play_card(card, *color).await,
            Action::Draw => self.draw().await,
            Action::Quit => self.quit().await,
        }
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, GatewayError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: Url,
    query: &[(&str, &str)],
) -> Result<T, GatewayError> {
    let resp = client.get(url).query(query).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(GatewayError::Status(status.as_u16()));
    }
    let body = resp.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Gateway bound to one seat in one game.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    ctx: GameContext,
}

impl HttpGateway {
    pub fn new(ctx: GameContext, timeout: Duration) -> Result<Self, GatewayError> {
        Ok(Self { client: build_client(timeout)?, ctx })
    }

    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    async fn call<T: DeserializeOwned>(
        &self,
        path: &str,
        extra: &[(&str, &str)],
    ) -> Result<T, GatewayError> {
        let url = self.ctx.route(path)?;
        let mut query = vec![
            ("game_id", self.ctx.game_id.as_str()),
            ("player_id", self.ctx.player_id.as_str()),
        ];
        query.extend_from_slice(extra);
        debug!(%url, "request");
        get_json(&self.client, url, &query).await
    }

    async fn action(&self, path: &str, extra: &[(&str, &str)]) -> Result<bool, GatewayError> {
        let ActionResult { result } = self.call(path, extra).await?;
        Ok(result)
    }
}

#[async_trait]
impl ActionGateway for HttpGateway {
    async fn fetch_state(&self) -> Result<Snapshot, GatewayError> {
        self.call("getstate", &[]).await
    }

    async fn start(&self) -> Result<bool, GatewayError> {
        self.action("start", &[]).await
    }

    async fn play_card(&self, card: &CardId, color: Option<Color>) -> Result<bool, GatewayError> {
        match color {
            Some(color) => {
                self.action(
                    "playcard",
                    &[("card_id", card.as_str()), ("selected_color", color.as_str())],
                )
                .await
            }
            None => self.action("playcard", &[("card_id", card.as_str())]).await,
        }
    }

    async fn draw(&self) -> Result<bool, GatewayError> {
        self.action("draw", &[]).await
    }

    /// The service answers `/quit` with a redirect; any final 2xx is an ack.
    async fn quit(&self) -> Result<bool, GatewayError> {
        let url = self.ctx.route("quit")?;
        let resp = self
            .client
            .get(url)
            .query(&[
                ("game_id", self.ctx.game_id.as_str()),
                ("player_id", self.ctx.player_id.as_str()),
            ])
            .send()
            .await?;
        let status = resp.status();
        if status.is_success() {
            Ok(true)
        } else {
            Err(GatewayError::Status(status.as_u16()))
        }
    }
}

/// Game creation and joining, before a seat (and so a [`GameContext`]) exists.
#[derive(Debug, Clone)]
pub struct Lobby {
    client: reqwest::Client,
    endpoint: Url,
}

impl Lobby {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, GatewayError> {
        Ok(Self { client: build_client(timeout)?, endpoint })
    }

    /// Create a game with the caller as its admin.
    pub async fn new_game(&self, player_name: &str) -> Result<GameContext, GatewayError> {
        let name = truncate_player_name(player_name);
        let url = route(&self.endpoint, "newgame")?;
        let created: NewGameResponse =
            get_json(&self.client, url, &[("player_name", name.as_str())]).await?;
        Ok(GameContext::new(self.endpoint.clone(), created.game_id, created.player_id))
    }

    /// `Ok(None)` when the game is no longer accepting players.
    pub async fn join(
        &self,
        game_id: &str,
        player_name: &str,
    ) -> Result<Option<GameContext>, GatewayError> {
        let name = truncate_player_name(player_name);
        let url = route(&self.endpoint, "join")?;
        let joined: JoinResponse =
            get_json(&self.client, url, &[("game_id", game_id), ("name", name.as_str())]).await?;
        Ok(joined
            .player_id
            .map(|player_id| GameContext::new(self.endpoint.clone(), game_id, player_id)))
    }
}
