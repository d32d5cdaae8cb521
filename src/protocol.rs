// JSON protocol spoken over the WebSocket service boundary.
//
// Every text frame from a client is one `ClientRequest`; every request is
// answered by exactly one `ServiceReply` frame.

use serde::{Deserialize, Serialize};

use crate::league::player::PlayerData;
use crate::league::{League, LeagueSpec};
use crate::ledger::{LedgerError, TeamRename};

/// One request from a client, tagged by operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientRequest {
    CreateLeague {
        config: LeagueSpec,
    },
    CreateDemoLeague,
    GetLeague {
        league_id: String,
    },
    ListLeagues,
    DraftPick {
        league_id: String,
        team_id: String,
        player: PlayerData,
        amount: u32,
    },
    UndoPick {
        league_id: String,
        pick_id: String,
    },
    UpdateSettings {
        league_id: String,
        config: LeagueSpec,
    },
    RenameTeam {
        league_id: String,
        team_id: String,
        #[serde(default)]
        update: TeamRename,
    },
    SearchPlayers {
        #[serde(default)]
        query: String,
        #[serde(default)]
        position: Option<String>,
        #[serde(default)]
        limit: Option<usize>,
    },
}

/// One reply to a client, tagged by payload shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServiceReply {
    League { league: Box<League> },
    Leagues { leagues: Vec<League> },
    Players { players: Vec<PlayerData> },
    Error { kind: String, message: String },
}

impl ServiceReply {
    pub fn league(league: League) -> Self {
        ServiceReply::League {
            league: Box::new(league),
        }
    }

    /// Map a ledger error onto the wire: a stable machine-readable kind
    /// plus the error's display message.
    pub fn from_error(err: &LedgerError) -> Self {
        let kind = match err {
            LedgerError::LeagueNotFound { .. }
            | LedgerError::TeamNotFound { .. }
            | LedgerError::PickNotFound { .. } => "not_found",
            LedgerError::InvalidBid { .. } => "invalid_bid",
            LedgerError::SettingsConflict { .. } => "settings_conflict",
            LedgerError::Inconsistent { .. } => "inconsistency",
            LedgerError::Storage(_) => "storage",
        };
        ServiceReply::Error {
            kind: kind.to_string(),
            message: err.to_string(),
        }
    }

    /// An error reply for a frame that couldn't be parsed as a request.
    pub fn bad_request(message: impl Into<String>) -> Self {
        ServiceReply::Error {
            kind: "bad_request".to_string(),
            message: message.into(),
        }
    }
}
