//! Discard pile top card and the draw pile control.

use runo_protocol::{CardRef, FlashKind};
use tracing::debug;

use crate::error::ProtocolAnomaly;
use crate::gateway::Action;
use crate::messages::{ActionOutcome, Effect, Origin, Outbox};
use crate::ui::cards::{CardView, CardViewFactory, Placement};
use crate::ui::choreography::{Choreographer, Generation, Phase};
use crate::ui::element::{Click, ElementState, RequestToken, Resolution, TokenSource};
use crate::ui::view::{ViewChange, ViewKey};

#[derive(Debug, Clone)]
pub struct TrayReconciler {
    discard: Option<CardView>,
    draw: CardView,
    choreo: Choreographer,
    draw_pile_size: usize,
    discard_pile_size: usize,
}

impl TrayReconciler {
    pub fn new(choreo: Choreographer) -> Self {
        Self {
            discard: None,
            draw: CardViewFactory::draw_pile(),
            choreo,
            draw_pile_size: 0,
            discard_pile_size: 0,
        }
    }

    pub fn discard(&self) -> Option<&CardRef> {
        self.discard.as_ref().and_then(|v| v.card())
    }

    pub fn draw_state(&self) -> ElementState {
        self.draw.element().map_or(ElementState::Disabled, |el| el.state())
    }

    pub fn phase(&self) -> Phase {
        self.choreo.phase()
    }

    pub fn pile_sizes(&self) -> (usize, usize) {
        (self.draw_pile_size, self.discard_pile_size)
    }

    /// Reconcile the discard slot and drive the draw control.
    ///
    /// The discard pile only grows, so a different id in an occupied slot is
    /// reported as an anomaly before the slot follows the service.
    pub fn apply(&mut self, last_discard: Option<&CardRef>, draw_enabled: bool, out: &mut Outbox) {
        if let Some(top) = last_discard {
            let shown = self.discard.as_ref().and_then(|v| v.id()).cloned();
            match shown {
                Some(shown) if shown == top.id => {}
                Some(shown) => {
                    out.change(ViewChange::Unmounted(ViewKey::Discard(shown.clone())));
                    out.anomaly(ProtocolAnomaly::DiscardReplaced { previous: shown, current: top.id.clone() });
                    self.mount_discard(top, out);
                }
                None => self.mount_discard(top, out),
            }
        }

        let cue = if draw_enabled { self.choreo.activate() } else { self.choreo.deactivate() };
        if let Some(cue) = cue {
            out.cue(cue);
        }
    }

    fn mount_discard(&mut self, top: &CardRef, out: &mut Outbox) {
        self.discard = Some(CardViewFactory::build(top.clone(), Placement::Discard));
        out.change(ViewChange::Mounted(ViewKey::Discard(top.id.clone())));
    }

    pub fn set_pile_sizes(&mut self, draw_pile_size: usize, discard_pile_size: usize, out: &mut Outbox) {
        if (draw_pile_size, discard_pile_size) != (self.draw_pile_size, self.discard_pile_size) {
            self.draw_pile_size = draw_pile_size;
            self.discard_pile_size = discard_pile_size;
            out.change(ViewChange::Updated(ViewKey::Piles));
        }
    }

    pub fn fire(&mut self, generation: Generation, out: &mut Outbox) {
        let Some(phase) = self.choreo.fire(generation) else {
            debug!(?generation, "stale draw pile choreography timer");
            return;
        };
        let changed = match phase {
            Phase::Active => self.draw.enable(),
            _ => self.draw.disable(),
        };
        if changed {
            out.change(ViewChange::State(ViewKey::DrawPile, self.draw_state()));
        }
    }

    pub fn click_draw(&mut self, tokens: &mut TokenSource, out: &mut Outbox) {
        match self.draw.click(tokens) {
            Click::Dispatch(token) => {
                out.change(ViewChange::State(ViewKey::DrawPile, self.draw_state()));
                out.effect(Effect::Dispatch { token, origin: Origin::DrawPile, action: Action::Draw });
            }
            _ => debug!("draw click ignored"),
        }
    }

    pub fn resolve_draw(&mut self, token: RequestToken, outcome: &ActionOutcome, out: &mut Outbox) -> Resolution {
        let resolution = self.draw.resolve(token, outcome.is_accepted());
        match resolution {
            Resolution::Stale => debug!(?token, "stale draw answer dropped"),
            _ => {
                out.change(ViewChange::State(ViewKey::DrawPile, self.draw_state()));
                if resolution == Resolution::Rejected {
                    match outcome {
                        ActionOutcome::Failed(e) => out.notify(format!("Could not reach the game: {e}"), FlashKind::Danger),
                        _ => out.notify("You can't draw right now", FlashKind::Warning),
                    }
                }
            }
        }
        resolution
    }

    pub fn cancel(&mut self) {
        self.choreo.cancel();
    }
}
