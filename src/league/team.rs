// Team state and derived budget metrics.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::pick::DraftPick;

/// One participant's budget and roster within a league.
///
/// `budget`, `spent`, and the roster are the authoritative state; the five
/// derived fields (`remaining`, `max_bid`, `remaining_spots`,
/// `avg_per_spot`, `budget_utilization`) are recomputed via
/// [`recompute_metrics`] after every mutation. `remaining` is signed: a
/// settings update can lower the budget below what a team has already
/// spent, and that deficit must be representable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    /// Unique team ID.
    pub id: String,
    /// Display name of the team.
    pub name: String,
    /// Total allowed spend.
    pub budget: u32,
    /// Total committed spend across the roster.
    pub spent: u32,
    /// Budget left: `budget - spent`. Negative after a budget shrink.
    pub remaining: i64,
    /// Committed picks, in draft order.
    pub roster: Vec<DraftPick>,
    /// Required slot count per position code. Seeded from the league's
    /// requirement map and resynced whenever league settings change.
    pub roster_spots: HashMap<String, u32>,
    /// Highest legal bid on the next pick (see [`recompute_metrics`]).
    pub max_bid: u32,
    /// Roster slots not yet filled by a committed pick.
    pub remaining_spots: u32,
    /// Remaining budget spread evenly over the open slots.
    pub avg_per_spot: f64,
    /// Percentage of the budget already spent.
    pub budget_utilization: f64,
}

impl Team {
    /// Seed a fresh team with an empty roster and metrics already derived,
    /// so a just-created team shows the correct `max_bid` immediately.
    pub fn provision(
        name: &str,
        budget: u32,
        roster_spots: HashMap<String, u32>,
        roster_size: u32,
    ) -> Self {
        let mut team = Team {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            budget,
            spent: 0,
            remaining: budget as i64,
            roster: Vec::new(),
            roster_spots,
            max_bid: 0,
            remaining_spots: 0,
            avg_per_spot: 0.0,
            budget_utilization: 0.0,
        };
        recompute_metrics(&mut team, roster_size);
        team
    }
}

/// Recompute every derived metric on `team` from its budget/roster state.
///
/// Pure and total: no failure modes, no I/O. Must run after every mutation
/// that touches `budget`, `spent`, or the roster.
///
/// The max-bid ceiling reserves a $1 floor for each *other* still-open
/// slot: `max(0, remaining - max(0, remaining_spots - 1))`. A team with
/// zero or one open slot may bid its full remaining budget.
pub fn recompute_metrics(team: &mut Team, roster_size: u32) {
    team.remaining = team.budget as i64 - team.spent as i64;

    // Roster length never exceeds roster_size through validated operations;
    // the clamp guards the calculator itself.
    team.remaining_spots = roster_size.saturating_sub(team.roster.len() as u32);

    let reserve = team.remaining_spots.saturating_sub(1) as i64;
    team.max_bid = (team.remaining - reserve).max(0) as u32;

    team.avg_per_spot = if team.remaining_spots > 0 {
        round1(team.remaining as f64 / team.remaining_spots as f64)
    } else {
        0.0
    };

    team.budget_utilization = if team.budget > 0 {
        round1(team.spent as f64 * 100.0 / team.budget as f64)
    } else {
        0.0
    };
}

/// Round to one decimal place, half away from zero.
fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::player::PlayerData;

    fn spots() -> HashMap<String, u32> {
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

    fn pick_for(team: &Team, amount: u32) -> DraftPick {
        DraftPick::commit(
            PlayerData {
                name: "Player".to_string(),
                position: "RB".to_string(),
                nfl_team: "SF".to_string(),
                etr_rank: None,
                adp: None,
                pos_rank: None,
            },
            &team.id,
            amount,
        )
    }

    #[test]
    fn fresh_team_metrics() {
        let team = Team::provision("Team 1", 300, spots(), 16);
        assert_eq!(team.remaining, 300);
        assert_eq!(team.remaining_spots, 16);
        // 300 - (16 - 1) = 285
        assert_eq!(team.max_bid, 285);
        assert_eq!(team.avg_per_spot, 18.8); // 300 / 16 = 18.75
        assert_eq!(team.budget_utilization, 0.0);
    }

    #[test]
    fn metrics_after_one_pick() {
        let mut team = Team::provision("Team 1", 300, spots(), 16);
        let pick = pick_for(&team, 50);
        team.roster.push(pick);
        team.spent += 50;
        recompute_metrics(&mut team, 16);

        assert_eq!(team.remaining, 250);
        assert_eq!(team.remaining_spots, 15);
        // 250 - (15 - 1) = 236
        assert_eq!(team.max_bid, 236);
    }

    #[test]
    fn one_open_slot_allows_full_remaining() {
        let mut team = Team::provision("Team 1", 200, spots(), 16);
        for _ in 0..15 {
            let pick = pick_for(&team, 10);
            team.roster.push(pick);
            team.spent += 10;
        }
        recompute_metrics(&mut team, 16);

        assert_eq!(team.remaining, 50);
        assert_eq!(team.remaining_spots, 1);
        assert_eq!(team.max_bid, 50);
        assert_eq!(team.avg_per_spot, 50.0);
    }

    #[test]
    fn zero_open_slots_clamps() {
        let mut team = Team::provision("Team 1", 200, spots(), 2);
        for _ in 0..2 {
            let pick = pick_for(&team, 60);
            team.roster.push(pick);
            team.spent += 60;
        }
        recompute_metrics(&mut team, 2);

        assert_eq!(team.remaining, 80);
        assert_eq!(team.remaining_spots, 0);
        // No reserve with no open slots: max_bid degrades to remaining.
        assert_eq!(team.max_bid, 80);
        assert_eq!(team.avg_per_spot, 0.0);
    }

    #[test]
    fn roster_longer_than_size_clamps_spots() {
        let mut team = Team::provision("Team 1", 100, spots(), 1);
        for _ in 0..3 {
            let pick = pick_for(&team, 10);
            team.roster.push(pick);
            team.spent += 10;
        }
        recompute_metrics(&mut team, 1);
        assert_eq!(team.remaining_spots, 0);
    }

    #[test]
    fn zero_budget_team() {
        let team = Team::provision("Team 1", 0, spots(), 16);
        assert_eq!(team.remaining, 0);
        assert_eq!(team.max_bid, 0);
        assert_eq!(team.avg_per_spot, 0.0);
        assert_eq!(team.budget_utilization, 0.0);
    }

    #[test]
    fn overspent_budget_goes_negative_and_max_bid_clamps() {
        let mut team = Team::provision("Team 1", 300, spots(), 16);
        let pick = pick_for(&team, 250);
        team.roster.push(pick);
        team.spent += 250;
        // Budget shrunk below spent by a settings update.
        team.budget = 200;
        recompute_metrics(&mut team, 16);

        assert_eq!(team.remaining, -50);
        assert_eq!(team.max_bid, 0);
        assert_eq!(team.budget_utilization, 125.0);
    }

    #[test]
    fn budget_utilization_rounds_to_one_decimal() {
        let mut team = Team::provision("Team 1", 300, spots(), 16);
        let pick = pick_for(&team, 100);
        team.roster.push(pick);
        team.spent += 100;
        recompute_metrics(&mut team, 16);
        // 100 / 300 = 33.333...
        assert_eq!(team.budget_utilization, 33.3);
    }

    #[test]
    fn round1_half_away_from_zero() {
        // .25 values are exactly representable in binary, so these pin the
        // half-away-from-zero rule without float noise.
        assert_eq!(round1(10.25), 10.3);
        assert_eq!(round1(6.25), 6.3);
        assert_eq!(round1(-10.25), -10.3);
        assert_eq!(round1(18.75), 18.8);
    }

    #[test]
    fn avg_per_spot_boundary() {
        let mut team = Team::provision("Team 1", 41, spots(), 16);
        // 12 picks leave 4 open slots; 41 remaining / 4 = 10.25 -> 10.3
        for _ in 0..12 {
            let pick = pick_for(&team, 0);
            team.roster.push(pick);
        }
        recompute_metrics(&mut team, 16);
        assert_eq!(team.remaining_spots, 4);
        assert_eq!(team.avg_per_spot, 10.3);
    }

    #[test]
    fn provision_copies_requirement_map() {
        let team = Team::provision("Team 9", 200, spots(), 16);
        assert_eq!(team.roster_spots.get("BENCH"), Some(&7));
        assert_eq!(team.roster_spots.len(), 7);
        assert!(team.roster.is_empty());
        assert_eq!(team.spent, 0);
    }
}
