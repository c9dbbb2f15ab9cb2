use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest display name the rules service accepts, in characters.
pub const MAX_PLAYER_NAME_LENGTH: usize = 32;

/// Cut a display name down to [`MAX_PLAYER_NAME_LENGTH`] characters.
///
/// Counts `char`s, not bytes, so multi-byte names are never split mid-codepoint.
pub fn truncate_player_name(name: &str) -> String {
    name.trim().chars().take(MAX_PLAYER_NAME_LENGTH).collect()
}

/// ---- Colors ----
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
}

impl Color {
    pub const ALL: [Color; 4] = [Color::Red, Color::Blue, Color::Green, Color::Yellow];

    /// Query-string form used by `/playcard`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "RED",
            Color::Blue => "BLUE",
            Color::Green => "GREEN",
            Color::Yellow => "YELLOW",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(pub String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown color '{}'", self.0)
    }
}

impl std::error::Error for ParseColorError {}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RED" | "R" => Ok(Color::Red),
            "BLUE" | "B" => Ok(Color::Blue),
            "GREEN" | "G" => Ok(Color::Green),
            "YELLOW" | "Y" => Ok(Color::Yellow),
            _ => Err(ParseColorError(s.to_string())),
        }
    }
}

/// ---- Cards ----
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CardValue {
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "SKIP")]
    Skip,
    #[serde(rename = "REVERSE")]
    Reverse,
    #[serde(rename = "DRAW_TWO")]
    DrawTwo,
    #[serde(rename = "WILD")]
    Wild,
    #[serde(rename = "WILD_DRAW_FOUR")]
    WildDrawFour,
}

impl CardValue {
    /// Wild cards need a color picked by the player before they can be played.
    pub fn requires_color_choice(&self) -> bool {
        matches!(self, CardValue::Wild | CardValue::WildDrawFour)
    }
}

impl fmt::Display for CardValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CardValue::Zero => "0",
            CardValue::One => "1",
            CardValue::Two => "2",
            CardValue::Three => "3",
            CardValue::Four => "4",
            CardValue::Five => "5",
            CardValue::Six => "6",
            CardValue::Seven => "7",
            CardValue::Eight => "8",
            CardValue::Nine => "9",
            CardValue::Skip => "Skip",
            CardValue::Reverse => "Reverse",
            CardValue::DrawTwo => "+2",
            CardValue::Wild => "Wild",
            CardValue::WildDrawFour => "Wild +4",
        };
        f.write_str(s)
    }
}

/// Server-assigned card identity. Stable for the lifetime of a card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct CardId(pub String);

impl CardId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(s: &str) -> Self {
        CardId(s.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardRef {
    pub id: CardId,
    pub value: CardValue,
    #[serde(default)]
    pub color: Option<Color>,
}

impl fmt::Display for CardRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.color {
            Some(color) => write!(f, "{} {}", color, self.value),
            None => write!(f, "{}", self.value),
        }
    }
}

/// ---- Flash messages ----
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Info,
    Warning,
    Danger,
}

impl Default for FlashKind {
    fn default() -> Self {
        FlashKind::Info
    }
}

impl fmt::Display for FlashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlashKind::Success => write!(f, "success"),
            FlashKind::Info => write!(f, "info"),
            FlashKind::Warning => write!(f, "warning"),
            FlashKind::Danger => write!(f, "danger"),
        }
    }
}

/// Notice queued by the rules service for one viewer, drained on every `/getstate`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerMessage {
    pub data: String,
    #[serde(rename = "type", default)]
    pub kind: FlashKind,
}

/// ---- Snapshots ----
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerSnapshot {
    /// Only the viewer's own record carries its id; everyone else is `null`.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "ux_id")]
    pub display_id: String,
    pub name: String,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub rounds_won: u32,
    #[serde(default)]
    pub hand_size: usize,
    #[serde(default)]
    pub active: bool,
    #[serde(rename = "admin", default)]
    pub is_admin: bool,
    #[serde(rename = "game_winner", default)]
    pub is_game_winner: bool,
    #[serde(default)]
    pub draw_required: bool,
    #[serde(default)]
    pub hand: Option<Vec<CardRef>>,
}

impl PlayerSnapshot {
    pub fn is_viewer(&self) -> bool {
        self.id.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Snapshot {
    #[serde(rename = "id", default)]
    pub game_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub players: Vec<PlayerSnapshot>,
    #[serde(default)]
    pub last_discard: Option<CardRef>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub ended_at: Option<String>,
    /// Game in progress (started and not yet ended).
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub reverse: bool,
    #[serde(default)]
    pub draw_pile_size: usize,
    #[serde(default)]
    pub discard_pile_size: usize,
    #[serde(default)]
    pub points_to_win: Option<u32>,
    #[serde(default)]
    pub min_players: Option<usize>,
    #[serde(default)]
    pub max_players: Option<usize>,
    #[serde(default)]
    pub messages: Vec<ServerMessage>,
}

impl Snapshot {
    /// The record belonging to whoever issued the `/getstate` call.
    pub fn viewer(&self) -> Option<&PlayerSnapshot> {
        self.players.iter().find(|p| p.is_viewer())
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn has_ended(&self) -> bool {
        self.ended_at.is_some()
    }
}

/// ---- Action responses ----
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionResult {
    pub result: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewGameResponse {
    pub game_id: String,
    pub player_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JoinResponse {
    /// `None` once the game stopped accepting players.
    pub player_id: Option<String>,
}
