//! Single-flight snapshot polling.
//!
//! Every fetch gets a sequence number in issue order. At most one fetch is
//! outstanding; a response is applied only if nothing issued later has been
//! applied already.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollTrigger {
    /// The periodic interval.
    Timer,
    /// A locally-initiated action was accepted.
    Action,
}

#[derive(Debug, Clone)]
pub struct PollingLoop {
    next_seq: u64,
    in_flight: Option<(u64, Instant)>,
    last_completed: Option<Instant>,
    applied: u64,
    refresh_queued: bool,
    min_interval: Duration,
    stale_after: Duration,
}

impl PollingLoop {
    pub fn new(min_interval: Duration, stale_after: Duration) -> Self {
        Self {
            next_seq: 0,
            in_flight: None,
            last_completed: None,
            applied: 0,
            refresh_queued: false,
            min_interval,
            stale_after,
        }
    }

    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight.map(|(seq, _)| seq)
    }

    /// Sequence number of the newest snapshot applied so far.
    pub fn applied(&self) -> u64 {
        self.applied
    }

    /// Decide whether a fetch should go out now. Returns its sequence number.
    pub fn request(&mut self, trigger: PollTrigger, now: Instant) -> Option<u64> {
        if let Some((seq, issued)) = self.in_flight {
            if now.duration_since(issued) < self.stale_after {
                if trigger == PollTrigger::Action {
                    debug!(seq, "refresh queued behind in-flight fetch");
                    self.refresh_queued = true;
                } else {
                    debug!(seq, "tick skipped, fetch in flight");
                }
                return None;
            }
            warn!(seq, "abandoning hung snapshot fetch");
            self.in_flight = None;
        }

        if trigger == PollTrigger::Timer {
            if let Some(done) = self.last_completed {
                if now.duration_since(done) < self.min_interval {
                    debug!("tick skipped, snapshot is fresh");
                    return None;
                }
            }
        }

        Some(self.issue(now))
    }

    fn issue(&mut self, now: Instant) -> u64 {
        self.next_seq += 1;
        self.refresh_queued = false;
        self.in_flight = Some((self.next_seq, now));
        self.next_seq
    }

    /// Record a finished fetch. Returns `true` when its snapshot should be applied.
    pub fn complete(&mut self, seq: u64, now: Instant, ok: bool) -> bool {
        if self.in_flight() == Some(seq) {
            self.in_flight = None;
        }
        if !ok {
            return false;
        }
        if seq <= self.applied {
            debug!(seq, applied = self.applied, "out-of-order snapshot discarded");
            return false;
        }
        self.applied = seq;
        self.last_completed = Some(now);
        true
    }

    /// Issue the refresh that was coalesced behind the previous fetch, if any.
    pub fn take_queued_refresh(&mut self, now: Instant) -> Option<u64> {
        if self.refresh_queued && self.in_flight.is_none() {
            Some(self.issue(now))
        } else {
            None
        }
    }
}
