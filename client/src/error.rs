use runo_protocol::CardId;
use thiserror::Error;

/// A request to the rules service did not produce a usable answer.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("rules service answered {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("bad route: {0}")]
    Route(#[from] url::ParseError),
}

/// The service broke an identity invariant the reconcilers rely on.
///
/// Never repaired silently: every anomaly is logged and flashed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProtocolAnomaly {
    #[error("discard pile top changed identity from {previous} to {current}")]
    DiscardReplaced { previous: CardId, current: CardId },
    #[error("card id {0} appears more than once in the hand")]
    DuplicateCardId(CardId),
    #[error("snapshot has no record for this player")]
    MissingViewer,
}
