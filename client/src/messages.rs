use std::sync::Arc;
use std::time::Duration;

use runo_protocol::{CardId, CardRef, Color, FlashKind, Snapshot};

use crate::error::{GatewayError, ProtocolAnomaly};
use crate::gateway::Action;
use crate::ui::choreography::{Cue, Generation, Group};
use crate::ui::element::RequestToken;
use crate::ui::flash::FlashId;
use crate::ui::view::ViewChange;

#[derive(Debug, Clone)]
pub enum Msg {
    // Polling
    PollTick,
    SnapshotFetched { seq: u64, result: Result<Snapshot, Arc<GatewayError>> },

    // Choreography timers
    Choreography { group: Group, generation: Generation },
    Settle { card: CardId, generation: Generation },

    // Player input
    CardClicked(CardId),
    ColorChosen { card: CardId, color: Option<Color> },
    DrawClicked,
    StartClicked,
    QuitClicked,
    DismissFlash(FlashId),

    // Gateway answers
    ActionResolved { token: RequestToken, origin: Origin, outcome: ActionOutcome },

    FlashExpired(FlashId),

    // Leave the table without quitting the game
    Close,
}

/// Which control issued an action; routes the answer back to its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    HandCard(CardId),
    DrawPile,
    Start,
    Quit,
}

#[derive(Debug, Clone)]
pub enum ActionOutcome {
    Accepted,
    Rejected,
    Failed(Arc<GatewayError>),
}

impl ActionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ActionOutcome::Accepted)
    }
}

impl From<Result<bool, GatewayError>> for ActionOutcome {
    fn from(result: Result<bool, GatewayError>) -> Self {
        match result {
            Ok(true) => ActionOutcome::Accepted,
            Ok(false) => ActionOutcome::Rejected,
            Err(e) => ActionOutcome::Failed(Arc::new(e)),
        }
    }
}

/// Work the engine hands to its driver.
#[derive(Debug, Clone)]
pub enum Effect {
    Fetch { seq: u64 },
    Dispatch { token: RequestToken, origin: Origin, action: Action },
    Schedule { delay: Duration, msg: Msg },
    PromptColor { card: CardRef },
    Shutdown,
}

/// Collects everything one update produces.
#[derive(Debug, Default)]
pub struct Outbox {
    pub effects: Vec<Effect>,
    pub changes: Vec<ViewChange>,
    pub anomalies: Vec<ProtocolAnomaly>,
    pub notices: Vec<(String, FlashKind)>,
}

impl Outbox {
    pub fn effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn schedule(&mut self, delay: Duration, msg: Msg) {
        self.effects.push(Effect::Schedule { delay, msg });
    }

    pub fn cue(&mut self, cue: Cue) {
        self.schedule(cue.delay, Msg::Choreography { group: cue.group, generation: cue.generation });
    }

    pub fn change(&mut self, change: ViewChange) {
        self.changes.push(change);
    }

    pub fn anomaly(&mut self, anomaly: ProtocolAnomaly) {
        self.anomalies.push(anomaly);
    }

    pub fn notify(&mut self, message: impl Into<String>, kind: FlashKind) {
        self.notices.push((message.into(), kind));
    }
}
