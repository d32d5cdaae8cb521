// The auction ledger: owns League/Team/DraftPick state and applies every
// mutation as an atomic read-modify-write over one persisted document.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::league::pick::DraftPick;
use crate::league::player::PlayerData;
use crate::league::team::{recompute_metrics, Team};
use crate::league::{warn_unknown_codes, League, LeagueSpec, DEMO_LEAGUE_NAME};
use crate::store::LeagueStore;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("league not found: {id}")]
    LeagueNotFound { id: String },

    #[error("team not found: {id}")]
    TeamNotFound { id: String },

    #[error("pick not found: {id}")]
    PickNotFound { id: String },

    #[error("bid of ${amount} exceeds team's remaining budget of ${remaining}")]
    InvalidBid { amount: u32, remaining: i64 },

    #[error("settings conflict on team '{team}': {detail}")]
    SettingsConflict { team: String, detail: String },

    /// The flat pick index and a team roster disagree. Never expected while
    /// the invariants hold; surfaced loudly instead of silently repaired.
    #[error("ledger inconsistency: {detail}")]
    Inconsistent { detail: String },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// The validated team-rename request. `name` is the only recognized field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamRename {
    #[serde(default)]
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// All league mutations and reads.
///
/// Mutations are serialized per league: each operation holds that league's
/// lock across the whole fetch-mutate-replace cycle, so two concurrent
/// drafts against the same league can never both read stale budget state.
/// Operations on different leagues proceed independently.
pub struct Ledger {
    store: Arc<LeagueStore>,
    /// Bound on the list-leagues page.
    page_size: usize,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Ledger {
    pub fn new(store: Arc<LeagueStore>, page_size: usize) -> Self {
        Ledger {
            store,
            page_size,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// The mutation lock for a league id, created on first use.
    fn league_lock(&self, league_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().expect("lock registry poisoned");
        locks
            .entry(league_id.to_string())
            .or_default()
            .clone()
    }

    fn fetch(&self, league_id: &str) -> Result<League, LedgerError> {
        self.store
            .fetch_league(league_id)?
            .ok_or_else(|| LedgerError::LeagueNotFound {
                id: league_id.to_string(),
            })
    }

    // -----------------------------------------------------------------
    // Provisioning
    // -----------------------------------------------------------------

    /// Create a new league from a configuration request.
    pub fn create_league(&self, spec: &LeagueSpec) -> Result<League, LedgerError> {
        let league = League::provision(spec);
        self.store.insert_league(&league)?;
        info!(
            "Created league '{}' ({} teams, ${} budget, {} roster slots)",
            league.name, league.total_teams, league.budget_per_team, league.roster_size
        );
        Ok(league)
    }

    /// Create the fixed demo league, purging any prior league with the demo
    /// name first. Idempotent by name: calling twice leaves exactly one
    /// demo league.
    pub fn create_demo_league(&self) -> Result<League, LedgerError> {
        let purged = self.store.delete_leagues_named(DEMO_LEAGUE_NAME)?;
        if purged > 0 {
            info!("Purged {} prior demo league(s)", purged);
        }
        self.create_league(&LeagueSpec::demo())
    }

    // -----------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------

    pub fn get_league(&self, league_id: &str) -> Result<League, LedgerError> {
        self.fetch(league_id)
    }

    pub fn list_leagues(&self) -> Result<Vec<League>, LedgerError> {
        Ok(self.store.fetch_all_leagues(self.page_size)?)
    }

    // -----------------------------------------------------------------
    // Draft / undo
    // -----------------------------------------------------------------

    /// Commit a draft pick: build the player record, append the pick to the
    /// winning team's roster and the league's flat pick index, and
    /// recompute that team's metrics. Only the winning team is touched.
    ///
    /// The bid is validated against the team's remaining budget only; a bid
    /// above `max_bid` but within `remaining` is accepted.
    pub fn draft_pick(
        &self,
        league_id: &str,
        team_id: &str,
        player: PlayerData,
        amount: u32,
    ) -> Result<League, LedgerError> {
        let lock = self.league_lock(league_id);
        let _guard = lock.lock().expect("league lock poisoned");

        let mut league = self.fetch(league_id)?;
        let roster_size = league.roster_size;
        let team = league
            .team_mut(team_id)
            .ok_or_else(|| LedgerError::TeamNotFound {
                id: team_id.to_string(),
            })?;

        if amount as i64 > team.remaining {
            return Err(LedgerError::InvalidBid {
                amount,
                remaining: team.remaining,
            });
        }

        let pick = DraftPick::commit(player, team_id, amount);
        info!(
            "Drafting {} to {} for ${}",
            pick.player.name, team.name, amount
        );

        team.roster.push(pick.clone());
        team.spent += amount;
        recompute_metrics(team, roster_size);
        league.all_picks.push(pick);

        self.store.replace_league(&league)?;
        Ok(league)
    }

    /// Undo a committed pick: remove it from the flat index and the owning
    /// team's roster, refund the bid, and recompute that team's metrics.
    ///
    /// A pick whose owning team (or whose roster entry) cannot be located
    /// means the flat index and the rosters disagree; the operation fails
    /// with [`LedgerError::Inconsistent`] and nothing is persisted.
    pub fn undo_pick(&self, league_id: &str, pick_id: &str) -> Result<League, LedgerError> {
        let lock = self.league_lock(league_id);
        let _guard = lock.lock().expect("league lock poisoned");

        let mut league = self.fetch(league_id)?;
        let index = league
            .all_picks
            .iter()
            .position(|p| p.id == pick_id)
            .ok_or_else(|| LedgerError::PickNotFound {
                id: pick_id.to_string(),
            })?;
        let pick = league.all_picks.remove(index);

        let roster_size = league.roster_size;
        let team =
            league
                .team_mut(&pick.team_id)
                .ok_or_else(|| LedgerError::Inconsistent {
                    detail: format!(
                        "pick {} references team {} which does not exist",
                        pick.id, pick.team_id
                    ),
                })?;
        let roster_index = team
            .roster
            .iter()
            .position(|p| p.id == pick.id)
            .ok_or_else(|| LedgerError::Inconsistent {
                detail: format!(
                    "pick {} is in the league index but not on team {}'s roster",
                    pick.id, pick.team_id
                ),
            })?;

        info!(
            "Undoing pick of {} from {} (refunding ${})",
            pick.player.name, team.name, pick.amount
        );

        team.roster.remove(roster_index);
        team.spent = team.spent.saturating_sub(pick.amount);
        recompute_metrics(team, roster_size);

        self.store.replace_league(&league)?;
        Ok(league)
    }

    // -----------------------------------------------------------------
    // Settings reconciliation
    // -----------------------------------------------------------------

    /// Apply a new configuration to an existing league and reconcile every
    /// team against it: rebudget, resize the team list, resync per-team
    /// requirement maps, and re-derive all metrics.
    ///
    /// All guards run before any state is touched, so a rejected update
    /// leaves the league exactly as it was:
    /// - removing a team that holds picks is a [`LedgerError::SettingsConflict`]
    /// - shrinking `roster_size` below a team's committed pick count is too
    ///
    /// A budget decrease below a team's spend is accepted; it surfaces as a
    /// negative `remaining` with `max_bid` clamped to zero.
    pub fn update_settings(
        &self,
        league_id: &str,
        spec: &LeagueSpec,
    ) -> Result<League, LedgerError> {
        let lock = self.league_lock(league_id);
        let _guard = lock.lock().expect("league lock poisoned");

        let mut league = self.fetch(league_id)?;

        let new_total = spec.total_teams as usize;
        if new_total < league.teams.len() {
            for team in &league.teams[new_total..] {
                if !team.roster.is_empty() {
                    return Err(LedgerError::SettingsConflict {
                        team: team.name.clone(),
                        detail: format!(
                            "cannot remove a team holding {} drafted player(s)",
                            team.roster.len()
                        ),
                    });
                }
            }
        }
        for team in &league.teams {
            if team.roster.len() as u32 > spec.roster_size {
                return Err(LedgerError::SettingsConflict {
                    team: team.name.clone(),
                    detail: format!(
                        "roster size {} is below the team's {} committed pick(s)",
                        spec.roster_size,
                        team.roster.len()
                    ),
                });
            }
        }

        warn_unknown_codes(&spec.position_requirements);

        let budget_changed = league.budget_per_team != spec.budget_per_team;
        league.name = spec.name.clone();
        league.total_teams = spec.total_teams;
        league.budget_per_team = spec.budget_per_team;
        league.roster_size = spec.roster_size;
        league.position_requirements = spec.position_requirements.clone();

        // Shrink: every removed team was verified empty above.
        league.teams.truncate(new_total);

        // Grow: continue the "Team N" sequence with fully seeded teams.
        while league.teams.len() < new_total {
            let n = league.teams.len() + 1;
            league.teams.push(Team::provision(
                &format!("Team {n}"),
                spec.budget_per_team,
                spec.position_requirements.clone(),
                spec.roster_size,
            ));
        }

        // Reconcile every team: spent is preserved, never rescaled.
        for team in &mut league.teams {
            if budget_changed {
                team.budget = spec.budget_per_team;
            }
            team.roster_spots = spec.position_requirements.clone();
            recompute_metrics(team, spec.roster_size);
        }

        info!(
            "Updated settings for league '{}' ({} teams, ${} budget)",
            league.name, league.total_teams, league.budget_per_team
        );

        self.store.replace_league(&league)?;
        Ok(league)
    }

    // -----------------------------------------------------------------
    // Team rename
    // -----------------------------------------------------------------

    /// Rename a team. Name is not metrics-bearing, so nothing is
    /// recomputed. A request without a name is a no-op that still returns
    /// the current league.
    pub fn rename_team(
        &self,
        league_id: &str,
        team_id: &str,
        update: &TeamRename,
    ) -> Result<League, LedgerError> {
        let lock = self.league_lock(league_id);
        let _guard = lock.lock().expect("league lock poisoned");

        let mut league = self.fetch(league_id)?;
        let team = league
            .team_mut(team_id)
            .ok_or_else(|| LedgerError::TeamNotFound {
                id: team_id.to_string(),
            })?;

        if let Some(name) = &update.name {
            info!("Renaming team '{}' to '{}'", team.name, name);
            team.name = name.clone();
            self.store.replace_league(&league)?;
        }

        Ok(league)
    }
}
