//! The game-level controls: Start for the admin, Quit for everyone.

use runo_protocol::FlashKind;
use tracing::debug;

use crate::gateway::Action;
use crate::messages::{ActionOutcome, Effect, Origin, Outbox};
use crate::ui::element::{RequestToken, Resolution, TokenSource};
use crate::ui::view::{ViewChange, ViewKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Start,
    Quit,
}

#[derive(Debug, Clone, Default)]
pub struct ControlBar {
    start_visible: bool,
    start_pending: Option<RequestToken>,
    quit_visible: bool,
    quitting: bool,
}

impl ControlBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visible(&self) -> Vec<Control> {
        let mut controls = Vec::with_capacity(2);
        if self.start_visible {
            controls.push(Control::Start);
        }
        if self.quit_visible {
            controls.push(Control::Quit);
        }
        controls
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    pub fn apply(&mut self, viewer_is_admin: bool, started: bool, ended: bool, out: &mut Outbox) {
        let show_start = viewer_is_admin && !started && !ended;
        if show_start != self.start_visible {
            self.start_visible = show_start;
            let key = ViewKey::Control(Control::Start);
            out.change(if show_start { ViewChange::Mounted(key) } else { ViewChange::Unmounted(key) });
        }
        if !self.quit_visible {
            self.quit_visible = true;
            out.change(ViewChange::Mounted(ViewKey::Control(Control::Quit)));
        }
    }

    pub fn click_start(&mut self, tokens: &mut TokenSource, out: &mut Outbox) {
        if !self.start_visible || self.quitting {
            debug!("start clicked while hidden");
            return;
        }
        if let Some(token) = self.start_pending {
            debug!(?token, "start already in flight");
            return;
        }
        let token = tokens.next();
        self.start_pending = Some(token);
        out.effect(Effect::Dispatch { token, origin: Origin::Start, action: Action::Start });
    }

    pub fn resolve_start(&mut self, token: RequestToken, outcome: &ActionOutcome, out: &mut Outbox) -> Resolution {
        if self.start_pending != Some(token) {
            debug!(?token, "stale start answer dropped");
            return Resolution::Stale;
        }
        self.start_pending = None;
        match outcome {
            ActionOutcome::Accepted => return Resolution::Accepted,
            ActionOutcome::Rejected => out.notify("The game can't be started yet", FlashKind::Warning),
            ActionOutcome::Failed(e) => out.notify(format!("Could not reach the game: {e}"), FlashKind::Danger),
        }
        Resolution::Rejected
    }

    /// Send `/quit` once and ask the driver to stop.
    pub fn click_quit(&mut self, tokens: &mut TokenSource, out: &mut Outbox) {
        if self.quitting {
            return;
        }
        self.quitting = true;
        out.effect(Effect::Dispatch { token: tokens.next(), origin: Origin::Quit, action: Action::Quit });
        out.effect(Effect::Shutdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatches(out: &Outbox) -> usize {
        out.effects.iter().filter(|e| matches!(e, Effect::Dispatch { .. })).count()
    }

    #[test]
    fn start_is_only_offered_to_the_admin_before_the_game() {
        let mut bar = ControlBar::new();
        let mut out = Outbox::default();
        bar.apply(false, false, false, &mut out);
        assert_eq!(bar.visible(), vec![Control::Quit]);

        bar.apply(true, false, false, &mut out);
        assert_eq!(bar.visible(), vec![Control::Start, Control::Quit]);

        let mut out = Outbox::default();
        bar.apply(true, true, false, &mut out);
        assert_eq!(out.changes, vec![ViewChange::Unmounted(ViewKey::Control(Control::Start))]);
    }

    #[test]
    fn start_is_single_flight() {
        let mut bar = ControlBar::new();
        let mut tokens = TokenSource::default();
        let mut out = Outbox::default();
        bar.apply(true, false, false, &mut out);

        let mut out = Outbox::default();
        bar.click_start(&mut tokens, &mut out);
        bar.click_start(&mut tokens, &mut out);
        assert_eq!(dispatches(&out), 1);

        let resolution = bar.resolve_start(RequestToken(1), &ActionOutcome::Rejected, &mut out);
        assert_eq!(resolution, Resolution::Rejected);
        assert_eq!(out.notices.len(), 1);
        bar.click_start(&mut tokens, &mut out);
        assert_eq!(dispatches(&out), 2);
    }

    #[test]
    fn repeated_start_answer_is_stale() {
        let mut bar = ControlBar::new();
        let mut tokens = TokenSource::default();
        let mut out = Outbox::default();
        bar.apply(true, false, false, &mut out);
        bar.click_start(&mut tokens, &mut out);
        let token = out
            .effects
            .iter()
            .find_map(|e| match e {
                Effect::Dispatch { token, .. } => Some(*token),
                _ => None,
            })
            .unwrap();

        assert_eq!(bar.resolve_start(token, &ActionOutcome::Accepted, &mut out), Resolution::Accepted);
        assert_eq!(bar.resolve_start(token, &ActionOutcome::Accepted, &mut out), Resolution::Stale);
        assert!(out.notices.is_empty());
    }

    #[test]
    fn quit_dispatches_once_then_shuts_down() {
        let mut bar = ControlBar::new();
        let mut tokens = TokenSource::default();
        let mut out = Outbox::default();
        bar.click_quit(&mut tokens, &mut out);
        bar.click_quit(&mut tokens, &mut out);
        assert_eq!(dispatches(&out), 1);
        assert!(matches!(out.effects.last(), Some(Effect::Shutdown)));
        assert!(bar.is_quitting());
    }
}
