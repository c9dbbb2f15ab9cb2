//! Tokio driver for the engine.
//!
//! One loop owns the `Engine` and feeds it messages one at a time. Effects
//! become spawned tasks that post their result back over the channel.

use std::sync::Arc;

use runo_protocol::CardRef;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinSet;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::app::Engine;
use crate::gateway::ActionGateway;
use crate::messages::{ActionOutcome, Effect, Msg};
use crate::ui::view::{TableView, ViewChange};

/// Whatever shows the table to the player.
pub trait Frontend {
    fn render(&mut self, view: &TableView, changes: &[ViewChange]);

    /// Ask for a color; the answer comes back as `Msg::ColorChosen`.
    fn prompt_color(&mut self, card: &CardRef);
}

pub struct Runtime<G> {
    engine: Engine,
    gateway: Arc<G>,
    tx: UnboundedSender<Msg>,
    rx: UnboundedReceiver<Msg>,
    timers: JoinSet<()>,
    polls: JoinSet<()>,
    actions: JoinSet<()>,
}

impl<G: ActionGateway + 'static> Runtime<G> {
    pub fn new(engine: Engine, gateway: Arc<G>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            engine,
            gateway,
            tx,
            rx,
            timers: JoinSet::new(),
            polls: JoinSet::new(),
            actions: JoinSet::new(),
        }
    }

    /// Sender for player input.
    pub fn handle(&self) -> UnboundedSender<Msg> {
        self.tx.clone()
    }

    /// Drive the engine until it asks to shut down. Returns it for inspection.
    pub async fn run<F: Frontend>(mut self, frontend: &mut F) -> Engine {
        let config = self.engine.config();
        let mut ticker = time::interval(config.poll_interval.max(config.min_poll_interval));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(game_id = %self.engine.context().game_id, "engine running");
        frontend.render(&self.engine.view(), &[]);

        loop {
            let msg = tokio::select! {
                _ = ticker.tick() => Msg::PollTick,
                Some(msg) = self.rx.recv() => msg,
                Some(_) = self.timers.join_next(), if !self.timers.is_empty() => continue,
                Some(_) = self.polls.join_next(), if !self.polls.is_empty() => continue,
                Some(_) = self.actions.join_next(), if !self.actions.is_empty() => continue,
            };

            let mut stop = false;
            for effect in self.engine.update(msg) {
                stop |= self.execute(effect, frontend);
            }
            let changes = self.engine.drain_changes();
            if !changes.is_empty() {
                frontend.render(&self.engine.view(), &changes);
            }
            if stop {
                break;
            }
        }

        self.shutdown().await;
        self.engine
    }

    /// Returns `true` when the effect asks the loop to stop.
    fn execute<F: Frontend>(&mut self, effect: Effect, frontend: &mut F) -> bool {
        match effect {
            Effect::Fetch { seq } => {
                let gateway = Arc::clone(&self.gateway);
                let tx = self.tx.clone();
                self.polls.spawn(async move {
                    let result = gateway.fetch_state().await.map_err(Arc::new);
                    let _ = tx.send(Msg::SnapshotFetched { seq, result });
                });
            }
            Effect::Dispatch { token, origin, action } => {
                debug!(?token, action = action.name(), "dispatching action");
                let gateway = Arc::clone(&self.gateway);
                let tx = self.tx.clone();
                self.actions.spawn(async move {
                    let outcome = ActionOutcome::from(gateway.perform(&action).await);
                    let _ = tx.send(Msg::ActionResolved { token, origin, outcome });
                });
            }
            Effect::Schedule { delay, msg } => {
                let tx = self.tx.clone();
                self.timers.spawn(async move {
                    time::sleep(delay).await;
                    let _ = tx.send(msg);
                });
            }
            Effect::PromptColor { card } => frontend.prompt_color(&card),
            Effect::Shutdown => return true,
        }
        false
    }

    /// Cancel polling and choreography; let action requests (quit included)
    /// finish. Their answers are never read.
    async fn shutdown(&mut self) {
        self.timers.abort_all();
        self.polls.abort_all();
        let timeout = self.engine.config().request_timeout;
        let drain = async {
            while self.actions.join_next().await.is_some() {}
        };
        if time::timeout(timeout, drain).await.is_err() {
            warn!("action requests still running at shutdown");
            self.actions.abort_all();
        }
        info!(game_id = %self.engine.context().game_id, "engine stopped");
    }
}
