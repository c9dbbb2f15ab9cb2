//! The rendered table: what the reconcilers currently show, plus the
//! journal of mutations each update applied to it.

use runo_protocol::{CardId, CardRef};

use crate::ui::actions::Control;
use crate::ui::element::ElementState;
use crate::ui::flash::{Flash, FlashId};
use crate::ui::players::PlayerRow;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewKey {
    Header,
    HandCard(CardId),
    Discard(CardId),
    DrawPile,
    Piles,
    Row(String),
    Control(Control),
    Flash(FlashId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewChange {
    Mounted(ViewKey),
    Unmounted(ViewKey),
    Updated(ViewKey),
    State(ViewKey, ElementState),
    Highlighted(ViewKey, bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSlot {
    pub card: CardRef,
    pub state: ElementState,
}

/// Game-level facts shown above the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    pub name: Option<String>,
    pub started: bool,
    pub ended: bool,
    pub reverse: bool,
    pub points_to_win: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub header: Header,
    pub hand: Vec<CardSlot>,
    pub discard: Option<CardRef>,
    pub draw_pile: ElementState,
    pub draw_pile_size: usize,
    pub discard_pile_size: usize,
    pub rows: Vec<PlayerRow>,
    pub controls: Vec<Control>,
    pub flashes: Vec<Flash>,
}

impl TableView {
    pub fn card_state(&self, id: &CardId) -> Option<ElementState> {
        self.hand.iter().find(|s| &s.card.id == id).map(|s| s.state)
    }

    /// The hand card currently waiting on a color choice, if any.
    pub fn awaiting_color(&self) -> Option<&CardRef> {
        self.hand
            .iter()
            .find(|s| s.state == ElementState::AwaitingColorChoice)
            .map(|s| &s.card)
    }
}
