//! Client configuration: service endpoint, game identity and timing.

use std::time::Duration;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8080/";

/// Timing knobs for polling, choreography and notices.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: Url,
    /// Regular `/getstate` cadence.
    pub poll_interval: Duration,
    /// A tick landing this soon after a completed poll is skipped.
    pub min_poll_interval: Duration,
    pub activate_delay: Duration,
    pub deactivate_delay: Duration,
    /// Delay before a card dealt into an already active hand becomes clickable.
    pub settle_delay: Duration,
    pub flash_duration: Duration,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            poll_interval: Duration::from_millis(2000),
            min_poll_interval: Duration::from_millis(100),
            activate_delay: Duration::from_millis(750),
            deactivate_delay: Duration::from_millis(500),
            settle_delay: Duration::from_millis(25),
            flash_duration: Duration::from_millis(3000),
            request_timeout: Duration::from_secs(10),
        }
    }

    /// Never faster than `min_poll_interval`.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(self.min_poll_interval);
        self
    }
}

/// Which game this client is seated in. Fixed for the lifetime of an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameContext {
    pub endpoint: Url,
    pub game_id: String,
    pub player_id: String,
}

impl GameContext {
    pub fn new(endpoint: Url, game_id: impl Into<String>, player_id: impl Into<String>) -> Self {
        Self {
            endpoint,
            game_id: game_id.into(),
            player_id: player_id.into(),
        }
    }

    /// Resolve a route such as `getstate` against the endpoint root.
    pub fn route(&self, path: &str) -> Result<Url, url::ParseError> {
        route(&self.endpoint, path)
    }
}

/// `Url::join` drops the last path segment unless the base ends in `/`.
pub fn route(endpoint: &Url, path: &str) -> Result<Url, url::ParseError> {
    if endpoint.path().ends_with('/') {
        endpoint.join(path)
    } else {
        let mut base = endpoint.clone();
        base.set_path(&format!("{}/", endpoint.path()));
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_resolve_under_a_sub_path() {
        let ctx = GameContext::new(Url::parse("http://host:5000/runo").unwrap(), "g", "p");
        assert_eq!(ctx.route("getstate").unwrap().as_str(), "http://host:5000/runo/getstate");

        let ctx = GameContext::new(Url::parse("http://host:5000/").unwrap(), "g", "p");
        assert_eq!(ctx.route("draw").unwrap().as_str(), "http://host:5000/draw");
    }

    fn endpoint() -> Url {
        Url::parse(DEFAULT_ENDPOINT).unwrap()
    }

    #[test]
    fn default_timings() {
        let cfg = ClientConfig::new(endpoint());
        assert_eq!(cfg.poll_interval, Duration::from_millis(2000));
        assert_eq!(cfg.activate_delay, Duration::from_millis(750));
        assert_eq!(cfg.deactivate_delay, Duration::from_millis(500));
        assert_eq!(cfg.settle_delay, Duration::from_millis(25));
        assert_eq!(cfg.flash_duration, Duration::from_millis(3000));
        assert_eq!(cfg.endpoint.as_str(), DEFAULT_ENDPOINT);
    }

    #[test]
    fn poll_interval_is_clamped_to_the_minimum() {
        let cfg = ClientConfig::new(endpoint()).with_poll_interval(Duration::ZERO);
        assert_eq!(cfg.poll_interval, Duration::from_millis(100));

        let cfg = ClientConfig::new(endpoint()).with_poll_interval(Duration::from_millis(500));
        assert_eq!(cfg.poll_interval, Duration::from_millis(500));
    }
}
