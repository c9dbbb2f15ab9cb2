//! Scoreboard rows, keyed by the player's display id.

use runo_protocol::{FlashKind, PlayerSnapshot};
use tracing::debug;

use crate::messages::Outbox;
use crate::ui::view::{ViewChange, ViewKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRow {
    pub display_id: String,
    pub name: String,
    pub points: u32,
    pub rounds_won: u32,
    pub hand_size: usize,
    pub active: bool,
    pub is_admin: bool,
    pub is_game_winner: bool,
    pub draw_required: bool,
    pub is_viewer: bool,
}

impl From<&PlayerSnapshot> for PlayerRow {
    fn from(p: &PlayerSnapshot) -> Self {
        Self {
            display_id: p.display_id.clone(),
            name: p.name.clone(),
            points: p.points,
            rounds_won: p.rounds_won,
            hand_size: p.hand_size,
            active: p.active,
            is_admin: p.is_admin,
            is_game_winner: p.is_game_winner,
            draw_required: p.draw_required,
            is_viewer: p.is_viewer(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlayerListReconciler {
    rows: Vec<PlayerRow>,
}

impl PlayerListReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[PlayerRow] {
        &self.rows
    }

    pub fn apply(&mut self, players: &[PlayerSnapshot], game_started: bool, out: &mut Outbox) {
        let mut incoming: Vec<&PlayerSnapshot> = Vec::with_capacity(players.len());
        for p in players {
            if incoming.iter().any(|q| q.display_id == p.display_id) {
                debug!(display_id = %p.display_id, "repeated scoreboard row skipped");
                continue;
            }
            incoming.push(p);
        }

        self.rows.retain(|row| {
            let keep = incoming.iter().any(|p| p.display_id == row.display_id);
            if !keep {
                out.change(ViewChange::Unmounted(ViewKey::Row(row.display_id.clone())));
            }
            keep
        });

        for p in incoming {
            let next = PlayerRow::from(p);
            let key = ViewKey::Row(next.display_id.clone());
            match self.rows.iter_mut().find(|r| r.display_id == next.display_id) {
                Some(row) => {
                    if row.is_viewer && !row.is_admin && next.is_admin && !game_started {
                        out.notify("The admin left... You are now the game admin!", FlashKind::Info);
                    }
                    if row.active != next.active {
                        out.change(ViewChange::Highlighted(key.clone(), next.active));
                    }
                    if *row != next {
                        *row = next;
                        out.change(ViewChange::Updated(key));
                    }
                }
                None => {
                    let active = next.active;
                    self.rows.push(next);
                    out.change(ViewChange::Mounted(key.clone()));
                    if active {
                        out.change(ViewChange::Highlighted(key, true));
                    }
                }
            }
        }
    }
}
