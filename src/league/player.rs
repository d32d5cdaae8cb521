// Player identity and roster position codes.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Football roster positions used for league requirement maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
    Kicker,
    Defense,
    Flex,
    Bench,
}

impl Position {
    /// Parse a position code into a Position enum.
    ///
    /// Handles common aliases:
    /// - "DST"/"D/ST" -> Defense
    /// - "W/R/T" -> Flex
    /// - "BN" -> Bench
    pub fn from_code(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "K" => Some(Position::Kicker),
            "DEF" | "DST" | "D/ST" => Some(Position::Defense),
            "FLEX" | "W/R/T" => Some(Position::Flex),
            "BENCH" | "BN" => Some(Position::Bench),
            _ => None,
        }
    }

    /// Return the canonical code for this position.
    pub fn code(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Kicker => "K",
            Position::Defense => "DEF",
            Position::Flex => "FLEX",
            Position::Bench => "BENCH",
        }
    }

    /// Whether a player at this position may fill a FLEX slot.
    pub fn is_flex_eligible(&self) -> bool {
        matches!(
            self,
            Position::RunningBack | Position::WideReceiver | Position::TightEnd
        )
    }

    /// Deterministic ordering index for requirement-map display.
    pub fn sort_order(&self) -> u8 {
        match self {
            Position::Quarterback => 0,
            Position::RunningBack => 1,
            Position::WideReceiver => 2,
            Position::TightEnd => 3,
            Position::Flex => 4,
            Position::Kicker => 5,
            Position::Defense => 6,
            Position::Bench => 7,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A drafted player. Created from caller-supplied [`PlayerData`] at draft
/// time, never mutated afterwards, and owned by exactly one pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Unique player record ID.
    pub id: String,
    /// Display name (e.g. "Josh Allen").
    pub name: String,
    /// Position code as supplied by the caller (e.g. "QB", "RB").
    pub position: String,
    /// NFL team abbreviation (e.g. "BUF").
    pub nfl_team: String,
    /// External overall ranking, if known.
    pub etr_rank: Option<u32>,
    /// Average draft position, if known.
    pub adp: Option<f64>,
    /// Rank within the player's position, if known.
    pub pos_rank: Option<u32>,
}

impl Player {
    /// Build a new Player record (fresh ID) from caller-supplied attributes.
    pub fn from_data(data: PlayerData) -> Self {
        Player {
            id: Uuid::new_v4().to_string(),
            name: data.name,
            position: data.position,
            nfl_team: data.nfl_team,
            etr_rank: data.etr_rank,
            adp: data.adp,
            pos_rank: data.pos_rank,
        }
    }
}

/// Player attributes as supplied by the caller of a draft operation.
///
/// Resolved upstream (player search, manual entry); the ledger accepts
/// these as-is and assigns the record ID itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerData {
    pub name: String,
    pub position: String,
    pub nfl_team: String,
    #[serde(default)]
    pub etr_rank: Option<u32>,
    #[serde(default)]
    pub adp: Option<f64>,
    #[serde(default)]
    pub pos_rank: Option<u32>,
}
