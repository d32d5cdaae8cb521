// Bundled player directory used to resolve draft payloads.
//
// The ledger never queries this: it only accepts already-resolved player
// attributes. The directory exists so the service surface can answer
// player searches before a draft request is assembled.

use crate::league::player::PlayerData;

/// Default bound on search results.
pub const DEFAULT_SEARCH_LIMIT: usize = 50;

/// An in-memory searchable table of draftable NFL players.
pub struct PlayerDirectory {
    players: Vec<PlayerData>,
}

impl PlayerDirectory {
    /// The bundled sample directory.
    pub fn bundled() -> Self {
        let players = SAMPLE_PLAYERS
            .iter()
            .map(|&(name, position, nfl_team, etr_rank, adp, pos_rank)| PlayerData {
                name: name.to_string(),
                position: position.to_string(),
                nfl_team: nfl_team.to_string(),
                etr_rank: Some(etr_rank),
                adp: Some(adp),
                pos_rank: Some(pos_rank),
            })
            .collect();
        PlayerDirectory { players }
    }

    /// Build a directory from explicit entries (useful for tests).
    pub fn with_players(players: Vec<PlayerData>) -> Self {
        PlayerDirectory { players }
    }

    /// Search by case-insensitive substring over player name and NFL team,
    /// optionally filtered to one position code, bounded by `limit`.
    /// An empty query matches everything.
    pub fn search(&self, query: &str, position: Option<&str>, limit: usize) -> Vec<PlayerData> {
        let query = query.to_lowercase();
        self.players
            .iter()
            .filter(|p| {
                query.is_empty()
                    || p.name.to_lowercase().contains(&query)
                    || p.nfl_team.to_lowercase().contains(&query)
            })
            .filter(|p| match position {
                Some(pos) => p.position.eq_ignore_ascii_case(pos),
                None => true,
            })
            .take(limit)
            .cloned()
            .collect()
    }
}

/// (name, position, nfl_team, etr_rank, adp, pos_rank)
const SAMPLE_PLAYERS: &[(&str, &str, &str, u32, f64, u32)] = &[
    ("Josh Allen", "QB", "BUF", 1, 12.5, 1),
    ("Lamar Jackson", "QB", "BAL", 3, 18.9, 2),
    ("Jalen Hurts", "QB", "PHI", 9, 24.3, 3),
    ("Patrick Mahomes", "QB", "KC", 12, 28.7, 4),
    ("Christian McCaffrey", "RB", "SF", 2, 3.2, 1),
    ("Saquon Barkley", "RB", "PHI", 5, 8.1, 2),
    ("Bijan Robinson", "RB", "ATL", 7, 9.4, 3),
    ("Derrick Henry", "RB", "BAL", 14, 19.6, 4),
    ("Jahmyr Gibbs", "RB", "DET", 10, 13.2, 5),
    ("Tyreek Hill", "WR", "MIA", 8, 15.7, 1),
    ("CeeDee Lamb", "WR", "DAL", 6, 11.3, 2),
    ("Ja'Marr Chase", "WR", "CIN", 4, 6.8, 3),
    ("Justin Jefferson", "WR", "MIN", 11, 10.9, 4),
    ("Amon-Ra St. Brown", "WR", "DET", 13, 16.4, 5),
    ("Travis Kelce", "TE", "KC", 15, 22.1, 1),
    ("Mark Andrews", "TE", "BAL", 25, 35.6, 2),
    ("Sam LaPorta", "TE", "DET", 28, 40.2, 3),
    ("Justin Tucker", "K", "BAL", 180, 165.3, 1),
    ("Harrison Butker", "K", "KC", 185, 170.8, 2),
    ("San Francisco", "DEF", "SF", 165, 155.2, 1),
    ("Baltimore", "DEF", "BAL", 170, 160.5, 2),
];
