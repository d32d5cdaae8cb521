// Individual draft pick records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::player::{Player, PlayerData};

/// The record of one player acquired by one team for one bid amount.
///
/// Created by a draft operation, destroyed by an undo, immutable in
/// between. The embedded [`Player`] is owned by this pick; `team_id` is a
/// back-reference to the owning team, not ownership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftPick {
    /// Unique pick ID.
    pub id: String,
    /// The drafted player (owned, embedded).
    pub player: Player,
    /// ID of the team that won the player.
    pub team_id: String,
    /// Winning bid amount in auction dollars.
    pub amount: u32,
    /// When the pick was committed.
    pub timestamp: DateTime<Utc>,
}

impl DraftPick {
    /// Commit a new pick for `team_id` from caller-supplied player data.
    pub fn commit(player: PlayerData, team_id: &str, amount: u32) -> Self {
        DraftPick {
            id: Uuid::new_v4().to_string(),
            player: Player::from_data(player),
            team_id: team_id.to_string(),
            amount,
            timestamp: Utc::now(),
        }
    }
}
