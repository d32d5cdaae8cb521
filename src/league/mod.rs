// League aggregates: teams, rules, and the full pick history.

pub mod pick;
pub mod player;
pub mod team;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use pick::DraftPick;
use player::Position;
use team::Team;

/// Display name of the fixed demo preset. Demo creation is keyed on this
/// name: any prior league called this is purged before the new one is
/// inserted.
pub const DEMO_LEAGUE_NAME: &str = "Pipelayer Pro Bowl";

/// A configured auction-draft instance.
///
/// `all_picks` is a denormalized flat index over every team's roster: each
/// pick appears here and in exactly one team's roster, and the two views
/// must always agree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    /// Unique league ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Number of teams in the league.
    pub total_teams: u32,
    /// Auction budget allocated to each team.
    pub budget_per_team: u32,
    /// Total roster slots per team, starters plus bench.
    pub roster_size: u32,
    /// Required slot count per position code.
    pub position_requirements: HashMap<String, u32>,
    /// All teams, in creation order.
    pub teams: Vec<Team>,
    /// Flat index of every pick in the league, in draft order.
    pub all_picks: Vec<DraftPick>,
    /// When the league was created.
    pub created_at: DateTime<Utc>,
}

impl League {
    /// Build a new League from a configuration request, seeding
    /// `total_teams` fresh teams named "Team 1".."Team N". Each team's
    /// derived metrics are computed before the league is returned, so a
    /// freshly created team already shows its correct max bid.
    pub fn provision(spec: &LeagueSpec) -> Self {
        warn_unknown_codes(&spec.position_requirements);

        let teams = (1..=spec.total_teams)
            .map(|i| {
                Team::provision(
                    &format!("Team {i}"),
                    spec.budget_per_team,
                    spec.position_requirements.clone(),
                    spec.roster_size,
                )
            })
            .collect();

        League {
            id: Uuid::new_v4().to_string(),
            name: spec.name.clone(),
            total_teams: spec.total_teams,
            budget_per_team: spec.budget_per_team,
            roster_size: spec.roster_size,
            position_requirements: spec.position_requirements.clone(),
            teams,
            all_picks: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Look up a team by ID.
    pub fn team(&self, team_id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == team_id)
    }

    /// Get a mutable reference to a team by ID.
    pub fn team_mut(&mut self, team_id: &str) -> Option<&mut Team> {
        self.teams.iter_mut().find(|t| t.id == team_id)
    }

    /// Total spend across all teams.
    pub fn total_spent(&self) -> u32 {
        self.teams.iter().map(|t| t.spent).sum()
    }
}

/// A league configuration request, used both to create a league and to
/// update the settings of an existing one. Every field except `name` has
/// a wire-level default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueSpec {
    pub name: String,
    #[serde(default = "default_total_teams")]
    pub total_teams: u32,
    #[serde(default = "default_budget_per_team")]
    pub budget_per_team: u32,
    #[serde(default = "default_roster_size")]
    pub roster_size: u32,
    #[serde(default = "default_position_requirements")]
    pub position_requirements: HashMap<String, u32>,
}

impl LeagueSpec {
    /// The fixed demo preset: 14 teams, $300 budget, 16 roster slots,
    /// canonical requirement map.
    pub fn demo() -> Self {
        LeagueSpec {
            name: DEMO_LEAGUE_NAME.to_string(),
            total_teams: 14,
            budget_per_team: 300,
            roster_size: 16,
            position_requirements: default_position_requirements(),
        }
    }
}

fn default_total_teams() -> u32 {
    12
}

fn default_budget_per_team() -> u32 {
    200
}

fn default_roster_size() -> u32 {
    16
}

/// Canonical default requirement map: QB 1, RB 2, WR 2, TE 1, K 1, DEF 1,
/// BENCH 7.
pub fn default_position_requirements() -> HashMap<String, u32> {
    let mut m = HashMap::new();
    m.insert("QB".to_string(), 1);
    m.insert("RB".to_string(), 2);
    m.insert("WR".to_string(), 2);
    m.insert("TE".to_string(), 1);
    m.insert("K".to_string(), 1);
    m.insert("DEF".to_string(), 1);
    m.insert("BENCH".to_string(), 7);
    m
}

/// Log a warning for requirement-map keys that aren't recognized position
/// codes. Custom slot names are stored as-is; the ledger never rejects a
/// commissioner's requirement map over them.
pub(crate) fn warn_unknown_codes(requirements: &HashMap<String, u32>) {
    for code in requirements.keys() {
        if Position::from_code(code).is_none() {
            warn!("unrecognized position code '{}' in requirement map", code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::player::PlayerData;

    fn spec(total_teams: u32, budget: u32, roster_size: u32) -> LeagueSpec {
        LeagueSpec {
            name: "Test League".to_string(),
            total_teams,
            budget_per_team: budget,
            roster_size,
            position_requirements: default_position_requirements(),
        }
    }

    #[test]
    fn provision_seeds_sequentially_named_teams() {
        let league = League::provision(&spec(12, 200, 16));
        assert_eq!(league.teams.len(), 12);
        assert_eq!(league.teams[0].name, "Team 1");
        assert_eq!(league.teams[11].name, "Team 12");
        assert!(league.all_picks.is_empty());
    }

    #[test]
    fn provision_computes_initial_metrics() {
        let league = League::provision(&spec(12, 200, 16));
        for team in &league.teams {
            assert_eq!(team.budget, 200);
            assert_eq!(team.remaining, 200);
            assert_eq!(team.remaining_spots, 16);
            // 200 - 15 = 185
            assert_eq!(team.max_bid, 185);
        }
    }

    #[test]
    fn provision_copies_requirements_per_team() {
        let league = League::provision(&spec(2, 200, 16));
        assert_eq!(
            league.teams[0].roster_spots,
            league.position_requirements
        );
        assert_eq!(
            league.teams[1].roster_spots,
            league.position_requirements
        );
    }

    #[test]
    fn team_ids_are_unique() {
        let league = League::provision(&spec(14, 300, 16));
        let mut ids: Vec<_> = league.teams.iter().map(|t| t.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 14);
    }

    #[test]
    fn team_lookup() {
        let league = League::provision(&spec(4, 200, 16));
        let id = league.teams[2].id.clone();
        assert_eq!(league.team(&id).unwrap().name, "Team 3");
        assert!(league.team("nonexistent").is_none());
    }

    #[test]
    fn demo_preset_values() {
        let demo = LeagueSpec::demo();
        assert_eq!(demo.name, DEMO_LEAGUE_NAME);
        assert_eq!(demo.total_teams, 14);
        assert_eq!(demo.budget_per_team, 300);
        assert_eq!(demo.roster_size, 16);
        assert_eq!(demo.position_requirements.get("BENCH"), Some(&7));
    }

    #[test]
    fn demo_league_initial_max_bid() {
        let league = League::provision(&LeagueSpec::demo());
        assert_eq!(league.teams.len(), 14);
        for team in &league.teams {
            assert_eq!(team.max_bid, 285);
        }
    }

    #[test]
    fn spec_wire_defaults() {
        let spec: LeagueSpec = serde_json::from_str(r#"{"name":"Min"}"#).unwrap();
        assert_eq!(spec.total_teams, 12);
        assert_eq!(spec.budget_per_team, 200);
        assert_eq!(spec.roster_size, 16);
        assert_eq!(spec.position_requirements, default_position_requirements());
    }

    #[test]
    fn total_spent_sums_all_teams() {
        let mut league = League::provision(&spec(2, 200, 16));
        let team_id = league.teams[0].id.clone();
        let pick = DraftPick::commit(
            PlayerData {
                name: "Tyreek Hill".to_string(),
                position: "WR".to_string(),
                nfl_team: "MIA".to_string(),
                etr_rank: Some(8),
                adp: Some(15.7),
                pos_rank: Some(1),
            },
            &team_id,
            45,
        );
        league.teams[0].roster.push(pick.clone());
        league.teams[0].spent += 45;
        league.all_picks.push(pick);
        assert_eq!(league.total_spent(), 45);
    }
}
