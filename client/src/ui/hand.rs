//! The viewer's hand, diffed by card id against every snapshot.

use std::collections::HashSet;
use std::time::Duration;

use runo_protocol::{CardId, CardRef, Color, FlashKind};
use tracing::debug;

use crate::error::ProtocolAnomaly;
use crate::messages::{ActionOutcome, Effect, Msg, Origin, Outbox};
use crate::ui::cards::{CardView, CardViewFactory, Placement};
use crate::ui::choreography::{Choreographer, Generation, Phase};
use crate::ui::element::{Click, ElementState, RequestToken, Resolution, TokenSource};
use crate::ui::view::{CardSlot, ViewChange, ViewKey};

#[derive(Debug, Clone)]
pub struct HandReconciler {
    cards: Vec<CardView>,
    choreo: Choreographer,
    settle_delay: Duration,
}

impl HandReconciler {
    pub fn new(choreo: Choreographer, settle_delay: Duration) -> Self {
        Self { cards: Vec::new(), choreo, settle_delay }
    }

    pub fn phase(&self) -> Phase {
        self.choreo.phase()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn state_of(&self, id: &CardId) -> Option<ElementState> {
        self.find(id).and_then(|c| c.element()).map(|el| el.state())
    }

    pub fn slots(&self) -> Vec<CardSlot> {
        self.cards
            .iter()
            .filter_map(|view| {
                let card = view.card()?.clone();
                let state = view.element().map_or(ElementState::Disabled, |el| el.state());
                Some(CardSlot { card, state })
            })
            .collect()
    }

    fn awaiting_color(&self) -> Option<&CardId> {
        self.cards
            .iter()
            .find(|c| c.element().is_some_and(|el| el.state() == ElementState::AwaitingColorChoice))
            .and_then(|c| c.id())
    }

    fn find(&self, id: &CardId) -> Option<&CardView> {
        self.cards.iter().find(|c| c.id() == Some(id))
    }

    fn find_mut(&mut self, id: &CardId) -> Option<&mut CardView> {
        self.cards.iter_mut().find(|c| c.id() == Some(id))
    }

    /// Reconcile against the hand in a new snapshot.
    ///
    /// Surviving cards keep their view (and any open interaction); identity
    /// wins over content, so a changed value under a known id is ignored.
    pub fn apply(&mut self, hand: &[CardRef], active: bool, out: &mut Outbox) {
        let mut seen: HashSet<&CardId> = HashSet::with_capacity(hand.len());
        let mut reported: HashSet<&CardId> = HashSet::new();
        let mut incoming: Vec<&CardRef> = Vec::with_capacity(hand.len());
        for card in hand {
            if seen.insert(&card.id) {
                incoming.push(card);
            } else if reported.insert(&card.id) {
                out.anomaly(ProtocolAnomaly::DuplicateCardId(card.id.clone()));
            }
        }

        // removal
        let mut kept = Vec::with_capacity(self.cards.len());
        for view in self.cards.drain(..) {
            let Some(id) = view.id().cloned() else { continue };
            if seen.contains(&id) {
                kept.push(view);
                continue;
            }
            if let Some(state) = view.element().map(|el| el.state()).filter(|s| s.is_busy()) {
                debug!(card = %id, ?state, "card left the hand mid-interaction");
            }
            out.change(ViewChange::Unmounted(ViewKey::HandCard(id)));
        }
        self.cards = kept;

        // addition
        for card in incoming {
            if self.find(&card.id).is_some() {
                continue;
            }
            self.cards.push(CardViewFactory::build(card.clone(), Placement::Hand));
            out.change(ViewChange::Mounted(ViewKey::HandCard(card.id.clone())));
            if self.choreo.phase() == Phase::Active {
                out.schedule(
                    self.settle_delay,
                    Msg::Settle { card: card.id.clone(), generation: self.choreo.generation() },
                );
            }
        }

        // activation sync
        let cue = if active { self.choreo.activate() } else { self.choreo.deactivate() };
        if let Some(cue) = cue {
            out.cue(cue);
        }
    }

    /// A choreography timer for this hand went off.
    pub fn fire(&mut self, generation: Generation, out: &mut Outbox) {
        let Some(phase) = self.choreo.fire(generation) else {
            debug!(?generation, "stale hand choreography timer");
            return;
        };
        for view in &mut self.cards {
            let changed = match phase {
                Phase::Active => view.enable(),
                _ => view.disable(),
            };
            if changed {
                emit_state(view, out);
            }
        }
    }

    /// Enable a card dealt into an already active hand once layout settled.
    pub fn settle(&mut self, id: &CardId, generation: Generation, out: &mut Outbox) {
        if !self.choreo.is_active_in(generation) {
            return;
        }
        if let Some(view) = self.find_mut(id) {
            if view.enable() {
                emit_state(view, out);
            }
        }
    }

    /// The color prompt is modal: while one card awaits a color, clicks on the
    /// rest of the hand are ignored.
    pub fn click(&mut self, id: &CardId, tokens: &mut TokenSource, out: &mut Outbox) {
        if let Some(open) = self.awaiting_color().filter(|open| *open != id) {
            debug!(card = %id, prompt = %open, "click ignored while a color prompt is open");
            return;
        }
        let Some(view) = self.find_mut(id) else {
            debug!(card = %id, "click on a card no longer in the hand");
            return;
        };
        let click = view.click(tokens);
        follow_up(view, click, None, out);
    }

    pub fn choose_color(
        &mut self,
        id: &CardId,
        color: Option<Color>,
        tokens: &mut TokenSource,
        out: &mut Outbox,
    ) {
        let Some(view) = self.find_mut(id) else {
            debug!(card = %id, "color chosen for a card no longer in the hand");
            return;
        };
        let click = view.choose_color(color, tokens);
        follow_up(view, click, color, out);
    }

    pub fn resolve(
        &mut self,
        id: &CardId,
        token: RequestToken,
        outcome: &ActionOutcome,
        out: &mut Outbox,
    ) -> Resolution {
        let Some(view) = self.find_mut(id) else {
            debug!(card = %id, ?token, "answer for a destroyed card dropped");
            return Resolution::Stale;
        };
        let resolution = view.resolve(token, outcome.is_accepted());
        match resolution {
            Resolution::Stale => debug!(card = %id, ?token, "stale play answer dropped"),
            Resolution::Accepted => {}
            Resolution::Rejected => {
                emit_state(view, out);
                match outcome {
                    ActionOutcome::Failed(e) => out.notify(format!("Could not reach the game: {e}"), FlashKind::Danger),
                    _ => out.notify("You can't play that card right now", FlashKind::Warning),
                }
            }
        }
        resolution
    }

    /// Strand every outstanding timer (shutdown).
    pub fn cancel(&mut self) {
        self.choreo.cancel();
    }
}

fn emit_state(view: &CardView, out: &mut Outbox) {
    if let (Some(id), Some(el)) = (view.id(), view.element()) {
        out.change(ViewChange::State(ViewKey::HandCard(id.clone()), el.state()));
    }
}

fn follow_up(view: &CardView, click: Click, color: Option<Color>, out: &mut Outbox) {
    let Some(card) = view.card() else { return };
    match click {
        Click::Ignored => debug!(card = %card.id, "click ignored"),
        Click::ChooseColor => {
            emit_state(view, out);
            out.effect(Effect::PromptColor { card: card.clone() });
        }
        Click::Cancelled => emit_state(view, out),
        Click::Dispatch(token) => {
            emit_state(view, out);
            if let Some(action) = view.action(color) {
                out.effect(Effect::Dispatch { token, origin: Origin::HandCard(card.id.clone()), action });
            }
        }
    }
}
