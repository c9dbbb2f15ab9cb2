use runo_protocol::{CardId, CardRef, Color};

use crate::gateway::Action;
use crate::ui::element::{Click, InteractiveElement, RequestToken, Resolution, TokenSource};

/// Where a card is shown decides which variant the factory builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Hand,
    Discard,
}

/// A visual card, owned by exactly one reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardView {
    /// Display only (discard pile top).
    Static { card: CardRef },
    /// Held card played as-is.
    Interactive { card: CardRef, element: InteractiveElement },
    /// Held wild card; needs a color before it can be played.
    Wild { card: CardRef, element: InteractiveElement },
    /// Face-down draw pile control.
    DrawPile { element: InteractiveElement },
}

/// Builds the right [`CardView`] variant for a card descriptor.
pub struct CardViewFactory;

impl CardViewFactory {
    pub fn build(card: CardRef, placement: Placement) -> CardView {
        match placement {
            Placement::Discard => CardView::Static { card },
            Placement::Hand if card.value.requires_color_choice() => CardView::Wild {
                card,
                element: InteractiveElement::new(),
            },
            Placement::Hand => CardView::Interactive { card, element: InteractiveElement::new() },
        }
    }

    pub fn draw_pile() -> CardView {
        CardView::DrawPile { element: InteractiveElement::new() }
    }
}

impl CardView {
    pub fn card(&self) -> Option<&CardRef> {
        match self {
            CardView::Static { card } | CardView::Interactive { card, .. } | CardView::Wild { card, .. } => {
                Some(card)
            }
            CardView::DrawPile { .. } => None,
        }
    }

    pub fn id(&self) -> Option<&CardId> {
        self.card().map(|c| &c.id)
    }

    pub fn element(&self) -> Option<&InteractiveElement> {
        match self {
            CardView::Static { .. } => None,
            CardView::Interactive { element, .. }
            | CardView::Wild { element, .. }
            | CardView::DrawPile { element } => Some(element),
        }
    }

    pub fn element_mut(&mut self) -> Option<&mut InteractiveElement> {
        match self {
            CardView::Static { .. } => None,
            CardView::Interactive { element, .. }
            | CardView::Wild { element, .. }
            | CardView::DrawPile { element } => Some(element),
        }
    }

    pub fn needs_color(&self) -> bool {
        matches!(self, CardView::Wild { .. })
    }

    /// The request this card sends once clicked (and colored, for wilds).
    pub fn action(&self, color: Option<Color>) -> Option<Action> {
        match self {
            CardView::Static { .. } => None,
            CardView::Interactive { card, .. } => Some(Action::PlayCard { card: card.id.clone(), color: None }),
            CardView::Wild { card, .. } => Some(Action::PlayCard { card: card.id.clone(), color }),
            CardView::DrawPile { .. } => Some(Action::Draw),
        }
    }

    /// Played cards wait in `Pending` for the snapshot that removes them;
    /// the draw pile stays on the table and goes back to rest.
    fn holds_on_success(&self) -> bool {
        !matches!(self, CardView::DrawPile { .. })
    }

    pub fn enable(&mut self) -> bool {
        self.element_mut().map_or(false, |el| el.enable())
    }

    pub fn disable(&mut self) -> bool {
        self.element_mut().map_or(false, |el| el.disable())
    }

    pub fn click(&mut self, tokens: &mut TokenSource) -> Click {
        let needs_color = self.needs_color();
        match self.element_mut() {
            Some(el) => el.click(needs_color, tokens),
            None => Click::Ignored,
        }
    }

    pub fn choose_color(&mut self, color: Option<Color>, tokens: &mut TokenSource) -> Click {
        match self {
            CardView::Wild { element, .. } => element.choose_color(color, tokens),
            _ => Click::Ignored,
        }
    }

    pub fn resolve(&mut self, token: RequestToken, accepted: bool) -> Resolution {
        let hold = self.holds_on_success();
        match self.element_mut() {
            Some(el) => el.resolve(token, accepted, hold),
            None => Resolution::Stale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runo_protocol::CardValue;

    fn card(id: &str, value: CardValue, color: Option<Color>) -> CardRef {
        CardRef { id: id.into(), value, color }
    }

    #[test]
    fn factory_picks_variant_from_value_and_placement() {
        let wild = CardViewFactory::build(card("w", CardValue::WildDrawFour, None), Placement::Hand);
        assert!(matches!(wild, CardView::Wild { .. }));
        assert!(wild.needs_color());

        let skip = CardViewFactory::build(card("s", CardValue::Skip, Some(Color::Red)), Placement::Hand);
        assert!(matches!(skip, CardView::Interactive { .. }));

        let top = CardViewFactory::build(card("t", CardValue::Wild, Some(Color::Blue)), Placement::Discard);
        assert!(matches!(top, CardView::Static { .. }));
        assert!(top.element().is_none());
    }

    #[test]
    fn actions_carry_the_card_identity() {
        let five = CardViewFactory::build(card("c5", CardValue::Five, Some(Color::Red)), Placement::Hand);
        assert_eq!(
            five.action(Some(Color::Green)),
            Some(Action::PlayCard { card: "c5".into(), color: None })
        );

        let wild = CardViewFactory::build(card("w", CardValue::Wild, None), Placement::Hand);
        assert_eq!(
            wild.action(Some(Color::Green)),
            Some(Action::PlayCard { card: "w".into(), color: Some(Color::Green) })
        );
        assert_eq!(CardViewFactory::draw_pile().action(None), Some(Action::Draw));
    }

    #[test]
    fn draw_pile_rests_after_an_accepted_draw() {
        let mut tokens = TokenSource::default();
        let mut pile = CardViewFactory::draw_pile();
        pile.enable();
        let Click::Dispatch(token) = pile.click(&mut tokens) else { panic!("expected dispatch") };
        assert_eq!(pile.resolve(token, true), Resolution::Accepted);
        assert!(pile.element().unwrap().state() == crate::ui::element::ElementState::Enabled);
    }

    #[test]
    fn static_cards_ignore_clicks() {
        let mut tokens = TokenSource::default();
        let mut top = CardViewFactory::build(card("t", CardValue::Two, Some(Color::Yellow)), Placement::Discard);
        assert!(!top.enable());
        assert_eq!(top.click(&mut tokens), Click::Ignored);
    }
}
