//! The reconciliation engine.
//!
//! `Engine::update` is the only entry point: it takes one message, mutates
//! the reconcilers, and returns the effects its driver must carry out.
//! Nothing inside awaits, so one update never interleaves with another.

use std::mem;

use runo_protocol::{FlashKind, Snapshot};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::{ClientConfig, GameContext};
use crate::error::ProtocolAnomaly;
use crate::messages::{ActionOutcome, Effect, Msg, Origin, Outbox};
use crate::polling::{PollTrigger, PollingLoop};
use crate::ui::actions::ControlBar;
use crate::ui::choreography::{Choreographer, Group};
use crate::ui::element::{Resolution, TokenSource};
use crate::ui::flash::FlashNotifier;
use crate::ui::hand::HandReconciler;
use crate::ui::players::PlayerListReconciler;
use crate::ui::tray::TrayReconciler;
use crate::ui::view::{Header, TableView, ViewChange, ViewKey};

pub struct Engine {
    config: ClientConfig,
    ctx: GameContext,
    polling: PollingLoop,
    hand: HandReconciler,
    tray: TrayReconciler,
    players: PlayerListReconciler,
    controls: ControlBar,
    flash: FlashNotifier,
    tokens: TokenSource,
    header: Header,
    missing_viewer_reported: bool,
    closed: bool,
    changes: Vec<ViewChange>,
}

impl Engine {
    pub fn new(ctx: GameContext, config: ClientConfig) -> Self {
        let hand = HandReconciler::new(
            Choreographer::new(Group::Hand, config.activate_delay, config.deactivate_delay),
            config.settle_delay,
        );
        let tray = TrayReconciler::new(Choreographer::new(
            Group::DrawPile,
            config.activate_delay,
            config.deactivate_delay,
        ));
        Self {
            polling: PollingLoop::new(config.min_poll_interval, config.request_timeout),
            hand,
            tray,
            players: PlayerListReconciler::new(),
            controls: ControlBar::new(),
            flash: FlashNotifier::new(config.flash_duration),
            tokens: TokenSource::default(),
            header: Header::default(),
            missing_viewer_reported: false,
            closed: false,
            changes: Vec::new(),
            config,
            ctx,
        }
    }

    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        self.update_at(msg, Instant::now())
    }

    pub fn update_at(&mut self, msg: Msg, now: Instant) -> Vec<Effect> {
        if self.closed {
            debug!(?msg, "engine closed, message dropped");
            return Vec::new();
        }

        let mut out = Outbox::default();
        match msg {
            Msg::PollTick => self.poll(PollTrigger::Timer, now, &mut out),
            Msg::SnapshotFetched { seq, result } => {
                match result {
                    Ok(snapshot) => {
                        // Drained server-side on every fetch; relayed even when the state is stale.
                        for message in &snapshot.messages {
                            out.notify(message.data.clone(), message.kind);
                        }
                        if self.polling.complete(seq, now, true) {
                            self.apply_snapshot(&snapshot, &mut out);
                        }
                    }
                    Err(e) => {
                        warn!(seq, error = %e, "snapshot fetch failed");
                        self.polling.complete(seq, now, false);
                    }
                }
                if let Some(seq) = self.polling.take_queued_refresh(now) {
                    out.effect(Effect::Fetch { seq });
                }
            }

            Msg::Choreography { group: Group::Hand, generation } => self.hand.fire(generation, &mut out),
            Msg::Choreography { group: Group::DrawPile, generation } => self.tray.fire(generation, &mut out),
            Msg::Settle { card, generation } => self.hand.settle(&card, generation, &mut out),

            Msg::CardClicked(card) => self.hand.click(&card, &mut self.tokens, &mut out),
            Msg::ColorChosen { card, color } => {
                self.hand.choose_color(&card, color, &mut self.tokens, &mut out)
            }
            Msg::DrawClicked => self.tray.click_draw(&mut self.tokens, &mut out),
            Msg::StartClicked => self.controls.click_start(&mut self.tokens, &mut out),
            Msg::QuitClicked => {
                info!(game_id = %self.ctx.game_id, "quitting the game");
                self.controls.click_quit(&mut self.tokens, &mut out);
                self.close();
            }
            Msg::DismissFlash(id) => self.flash.dismiss(id, &mut out),
            Msg::FlashExpired(id) => self.flash.expire(id, &mut out),

            Msg::ActionResolved { token, origin, outcome } => {
                if let ActionOutcome::Failed(e) = &outcome {
                    warn!(?origin, error = %e, "action request failed");
                }
                let resolution = match &origin {
                    Origin::HandCard(card) => self.hand.resolve(card, token, &outcome, &mut out),
                    Origin::DrawPile => self.tray.resolve_draw(token, &outcome, &mut out),
                    Origin::Start => self.controls.resolve_start(token, &outcome, &mut out),
                    Origin::Quit => Resolution::Stale,
                };
                if resolution == Resolution::Accepted {
                    self.poll(PollTrigger::Action, now, &mut out);
                }
            }

            Msg::Close => {
                info!(game_id = %self.ctx.game_id, "leaving the table");
                out.effect(Effect::Shutdown);
                self.close();
            }
        }

        self.finish(out)
    }

    fn poll(&mut self, trigger: PollTrigger, now: Instant, out: &mut Outbox) {
        if let Some(seq) = self.polling.request(trigger, now) {
            out.effect(Effect::Fetch { seq });
        }
    }

    /// Fan one snapshot out to every reconciler.
    fn apply_snapshot(&mut self, snapshot: &Snapshot, out: &mut Outbox) {
        let started = snapshot.has_started();
        let ended = snapshot.has_ended();

        let header = Header {
            name: snapshot.name.clone(),
            started,
            ended,
            reverse: snapshot.reverse,
            points_to_win: snapshot.points_to_win,
        };
        if header != self.header {
            if started && !self.header.started {
                info!(game_id = %snapshot.game_id, "game started");
            }
            if ended && !self.header.ended {
                info!(game_id = %snapshot.game_id, "game ended");
            }
            self.header = header;
            out.change(ViewChange::Updated(ViewKey::Header));
        }

        let viewer = snapshot.viewer();
        match viewer {
            Some(me) => {
                self.missing_viewer_reported = false;
                let hand = me.hand.as_deref().unwrap_or_default();
                self.hand.apply(hand, me.active, out);
                self.tray.apply(snapshot.last_discard.as_ref(), me.active, out);
            }
            None if !self.missing_viewer_reported => {
                self.missing_viewer_reported = true;
                out.anomaly(ProtocolAnomaly::MissingViewer);
            }
            None => {}
        }
        self.tray.set_pile_sizes(snapshot.draw_pile_size, snapshot.discard_pile_size, out);
        self.players.apply(&snapshot.players, started, out);
        self.controls.apply(viewer.is_some_and(|me| me.is_admin), started, ended, out);
    }

    fn close(&mut self) {
        self.hand.cancel();
        self.tray.cancel();
        self.closed = true;
    }

    fn finish(&mut self, mut out: Outbox) -> Vec<Effect> {
        for anomaly in mem::take(&mut out.anomalies) {
            error!(%anomaly, "protocol anomaly");
            self.flash.show(anomaly.to_string(), FlashKind::Danger, &mut out);
        }
        for (message, kind) in mem::take(&mut out.notices) {
            self.flash.show(message, kind, &mut out);
        }
        self.changes.append(&mut out.changes);
        out.effects
    }

    /// Mutations applied since the last call.
    pub fn drain_changes(&mut self) -> Vec<ViewChange> {
        mem::take(&mut self.changes)
    }

    pub fn view(&self) -> TableView {
        let (draw_pile_size, discard_pile_size) = self.tray.pile_sizes();
        TableView {
            header: self.header.clone(),
            hand: self.hand.slots(),
            discard: self.tray.discard().cloned(),
            draw_pile: self.tray.draw_state(),
            draw_pile_size,
            discard_pile_size,
            rows: self.players.rows().to_vec(),
            controls: self.controls.visible(),
            flashes: self.flash.flashes().to_vec(),
        }
    }
}
