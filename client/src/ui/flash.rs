//! Transient notices shown over the table.

use std::time::Duration;

use runo_protocol::FlashKind;

use crate::messages::{Msg, Outbox};
use crate::ui::view::{ViewChange, ViewKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlashId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub id: FlashId,
    pub message: String,
    pub kind: FlashKind,
}

#[derive(Debug, Clone)]
pub struct FlashNotifier {
    next: u64,
    flashes: Vec<Flash>,
    duration: Duration,
}

impl FlashNotifier {
    pub fn new(duration: Duration) -> Self {
        Self { next: 0, flashes: Vec::new(), duration }
    }

    pub fn flashes(&self) -> &[Flash] {
        &self.flashes
    }

    /// Mount a notice and schedule its expiry.
    pub fn show(&mut self, message: impl Into<String>, kind: FlashKind, out: &mut Outbox) -> FlashId {
        self.next += 1;
        let id = FlashId(self.next);
        self.flashes.push(Flash { id, message: message.into(), kind });
        out.change(ViewChange::Mounted(ViewKey::Flash(id)));
        out.schedule(self.duration, Msg::FlashExpired(id));
        id
    }

    pub fn expire(&mut self, id: FlashId, out: &mut Outbox) {
        self.remove(id, out);
    }

    pub fn dismiss(&mut self, id: FlashId, out: &mut Outbox) {
        self.remove(id, out);
    }

    fn remove(&mut self, id: FlashId, out: &mut Outbox) {
        let before = self.flashes.len();
        self.flashes.retain(|f| f.id != id);
        if self.flashes.len() != before {
            out.change(ViewChange::Unmounted(ViewKey::Flash(id)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Effect;

    #[test]
    fn shown_flash_schedules_its_expiry() {
        let mut notifier = FlashNotifier::new(Duration::from_secs(3));
        let mut out = Outbox::default();
        let id = notifier.show("Game started", FlashKind::Success, &mut out);

        assert_eq!(out.changes, vec![ViewChange::Mounted(ViewKey::Flash(id))]);
        assert!(matches!(
            out.effects.as_slice(),
            [Effect::Schedule { delay, msg: Msg::FlashExpired(expiring) }]
                if *delay == Duration::from_secs(3) && *expiring == id
        ));
    }

    #[test]
    fn dismissed_flash_does_not_unmount_twice() {
        let mut notifier = FlashNotifier::new(Duration::from_secs(3));
        let mut out = Outbox::default();
        let id = notifier.show("Not your turn", FlashKind::Warning, &mut out);

        let mut out = Outbox::default();
        notifier.dismiss(id, &mut out);
        notifier.expire(id, &mut out);
        assert_eq!(out.changes, vec![ViewChange::Unmounted(ViewKey::Flash(id))]);
        assert!(notifier.flashes().is_empty());
    }
}
