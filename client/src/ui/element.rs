//! Clickable-entity lifecycle shared by every interactive card.
//!
//! ```text
//! Disabled ⇄ Enabled → { Pending | AwaitingColorChoice } → Enabled | Disabled
//! ```
//!
//! `armed` tracks what the owning group last asked for, so an element that
//! finishes a request after its group was switched off lands on `Disabled`.

use runo_protocol::Color;

/// Identifies one dispatched action so its response can be matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(pub u64);

/// Hands out strictly increasing request tokens.
#[derive(Debug, Default)]
pub struct TokenSource {
    last: u64,
}

impl TokenSource {
    pub fn next(&mut self) -> RequestToken {
        self.last += 1;
        RequestToken(self.last)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementState {
    Disabled,
    Enabled,
    Pending(RequestToken),
    AwaitingColorChoice,
}

impl ElementState {
    pub fn is_busy(&self) -> bool {
        matches!(self, ElementState::Pending(_) | ElementState::AwaitingColorChoice)
    }
}

/// What a click (or a color choice) asks the owner to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Click {
    Ignored,
    /// Show the color prompt; nothing is sent yet.
    ChooseColor,
    /// Send the action tagged with this token.
    Dispatch(RequestToken),
    /// The color prompt was dismissed; nothing is sent.
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The response belongs to a request this element no longer waits for.
    Stale,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractiveElement {
    state: ElementState,
    armed: bool,
}

impl Default for InteractiveElement {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractiveElement {
    pub fn new() -> Self {
        Self { state: ElementState::Disabled, armed: false }
    }

    pub fn state(&self) -> ElementState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    fn resting(&self) -> ElementState {
        if self.armed {
            ElementState::Enabled
        } else {
            ElementState::Disabled
        }
    }

    /// Returns true when the visible state changed.
    pub fn enable(&mut self) -> bool {
        self.armed = true;
        if self.state == ElementState::Disabled {
            self.state = ElementState::Enabled;
            return true;
        }
        false
    }

    /// An open color prompt is abandoned; an in-flight request is left to resolve.
    pub fn disable(&mut self) -> bool {
        self.armed = false;
        match self.state {
            ElementState::Enabled | ElementState::AwaitingColorChoice => {
                self.state = ElementState::Disabled;
                true
            }
            ElementState::Disabled | ElementState::Pending(_) => false,
        }
    }

    pub fn click(&mut self, needs_color: bool, tokens: &mut TokenSource) -> Click {
        if self.state != ElementState::Enabled {
            return Click::Ignored;
        }
        if needs_color {
            self.state = ElementState::AwaitingColorChoice;
            return Click::ChooseColor;
        }
        let token = tokens.next();
        self.state = ElementState::Pending(token);
        Click::Dispatch(token)
    }

    pub fn choose_color(&mut self, color: Option<Color>, tokens: &mut TokenSource) -> Click {
        if self.state != ElementState::AwaitingColorChoice {
            return Click::Ignored;
        }
        match color {
            Some(_) => {
                let token = tokens.next();
                self.state = ElementState::Pending(token);
                Click::Dispatch(token)
            }
            None => {
                self.state = self.resting();
                Click::Cancelled
            }
        }
    }

    /// Apply the answer to request `token`.
    ///
    /// `accepted` is false for both a rejection and a transport failure.
    /// With `hold_on_success` the element stays `Pending` after an accepted
    /// request, waiting to be torn down by the next reconciliation.
    pub fn resolve(&mut self, token: RequestToken, accepted: bool, hold_on_success: bool) -> Resolution {
        if self.state != ElementState::Pending(token) {
            return Resolution::Stale;
        }
        if accepted {
            if !hold_on_success {
                self.state = self.resting();
            }
            Resolution::Accepted
        } else {
            self.state = self.resting();
            Resolution::Rejected
        }
    }
}
