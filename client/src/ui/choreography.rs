//! Timed enable/disable transitions for a group of elements.
//!
//! Every `activate`/`deactivate` that changes direction bumps the group's
//! generation. A timer only takes effect if the generation it captured is
//! still current, so the most recent request always wins.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Hand,
    DrawPile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Inactive,
    Activating,
    Active,
    Deactivating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(pub u64);

/// A timer the owner must schedule; it fires back as `fire(generation)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cue {
    pub group: Group,
    pub generation: Generation,
    pub delay: Duration,
}

#[derive(Debug, Clone)]
pub struct Choreographer {
    group: Group,
    phase: Phase,
    generation: Generation,
    activate_delay: Duration,
    deactivate_delay: Duration,
}

impl Choreographer {
    pub fn new(group: Group, activate_delay: Duration, deactivate_delay: Duration) -> Self {
        Self {
            group,
            phase: Phase::Inactive,
            generation: Generation(0),
            activate_delay,
            deactivate_delay,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    fn bump(&mut self, phase: Phase, delay: Duration) -> Cue {
        self.generation = Generation(self.generation.0 + 1);
        self.phase = phase;
        Cue { group: self.group, generation: self.generation, delay }
    }

    pub fn activate(&mut self) -> Option<Cue> {
        match self.phase {
            Phase::Active | Phase::Activating => None,
            Phase::Inactive | Phase::Deactivating => Some(self.bump(Phase::Activating, self.activate_delay)),
        }
    }

    pub fn deactivate(&mut self) -> Option<Cue> {
        match self.phase {
            Phase::Inactive | Phase::Deactivating => None,
            Phase::Active | Phase::Activating => Some(self.bump(Phase::Deactivating, self.deactivate_delay)),
        }
    }

    /// Settle a transition. Returns the phase reached, or `None` for a stale timer.
    pub fn fire(&mut self, generation: Generation) -> Option<Phase> {
        if generation != self.generation {
            return None;
        }
        self.phase = match self.phase {
            Phase::Activating => Phase::Active,
            Phase::Deactivating => Phase::Inactive,
            Phase::Active | Phase::Inactive => return None,
        };
        Some(self.phase)
    }

    /// True while `generation` is current and the group is fully active.
    pub fn is_active_in(&self, generation: Generation) -> bool {
        self.generation == generation && self.phase == Phase::Active
    }

    /// Invalidate every outstanding timer without changing direction.
    pub fn cancel(&mut self) {
        self.generation = Generation(self.generation.0 + 1);
    }
}
