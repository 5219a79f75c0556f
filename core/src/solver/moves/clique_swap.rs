//! Clique swap: move a 2-person preference clique into a different team,
//! displacing two of that team's non-clique members in exchange. Sizes of
//! both teams are unchanged, so this is always size-window-safe.

use super::super::{State, W_SKILL};
use super::fours_and_floor_delta;

impl State {
    /// Non-clique members of `team`, candidates to be displaced by an incoming
    /// clique.
    pub fn movable_non_clique_members(&self, team: usize) -> Vec<usize> {
        self.teams[team]
            .iter()
            .copied()
            .filter(|&p| self.person_to_clique[p].is_none())
            .collect()
    }

    pub fn is_clique_swap_feasible(&self, clique_idx: usize, target_team: usize, swap_out: [usize; 2]) -> bool {
        let clique = &self.cliques[clique_idx];
        if clique.len() != 2 {
            return false;
        }
        let source_team = self.assignment[clique[0]];
        if source_team == target_team {
            return false;
        }
        if swap_out[0] == swap_out[1] {
            return false;
        }
        if !self.teams[target_team].contains(&swap_out[0]) || !self.teams[target_team].contains(&swap_out[1]) {
            return false;
        }
        if self.person_to_clique[swap_out[0]].is_some() || self.person_to_clique[swap_out[1]].is_some() {
            return false;
        }

        let clique_missing: u32 = clique.iter().filter(|&&p| self.missing[p]).count() as u32;
        let swap_out_missing: u32 = swap_out.iter().filter(|&&p| self.missing[p]).count() as u32;

        let source_missing_after =
            self.team_missing_count[source_team] - clique_missing + swap_out_missing;
        let target_missing_after =
            self.team_missing_count[target_team] - swap_out_missing + clique_missing;

        source_missing_after <= 1 && target_missing_after <= 1
    }

    pub fn calculate_clique_swap_cost_delta(
        &self,
        clique_idx: usize,
        target_team: usize,
        swap_out: [usize; 2],
    ) -> f64 {
        if !self.is_clique_swap_feasible(clique_idx, target_team, swap_out) {
            return f64::INFINITY;
        }
        let clique = self.cliques[clique_idx].clone();
        let source_team = self.assignment[clique[0]];

        let conflict_delta = {
            let source_others: Vec<usize> = self.teams[source_team]
                .iter()
                .copied()
                .filter(|p| !clique.contains(p))
                .collect();
            let target_others: Vec<usize> = self.teams[target_team]
                .iter()
                .copied()
                .filter(|p| !swap_out.contains(p))
                .collect();

            let old_source: f64 = clique
                .iter()
                .flat_map(|&c| source_others.iter().map(move |&o| (c, o)))
                .map(|(c, o)| self.conflict_between(c, o))
                .sum();
            let old_target: f64 = swap_out
                .iter()
                .flat_map(|&s| target_others.iter().map(move |&o| (s, o)))
                .map(|(s, o)| self.conflict_between(s, o))
                .sum();

            let new_source: f64 = swap_out
                .iter()
                .flat_map(|&s| source_others.iter().map(move |&o| (s, o)))
                .map(|(s, o)| self.conflict_between(s, o))
                .sum();
            let new_target: f64 = clique
                .iter()
                .flat_map(|&c| target_others.iter().map(move |&o| (c, o)))
                .map(|(c, o)| self.conflict_between(c, o))
                .sum();

            (new_source + new_target) - (old_source + old_target)
        };

        let clique_skill: u32 = clique.iter().map(|&p| self.total_skill[p]).sum();
        let swap_out_skill: u32 = swap_out.iter().map(|&p| self.total_skill[p]).sum();

        let source_size = self.teams[source_team].len();
        let target_size = self.teams[target_team].len();
        let source_new_skill = self.team_skill[source_team] - clique_skill + swap_out_skill;
        let target_new_skill = self.team_skill[target_team] - swap_out_skill + clique_skill;

        let fours_floor_delta = fours_and_floor_delta(
            (source_size, self.team_skill[source_team]),
            (source_size, source_new_skill),
        ) + fours_and_floor_delta(
            (target_size, self.team_skill[target_team]),
            (target_size, target_new_skill),
        );

        let old_skill_diff = self.current_skill_diff();
        let new_skill_diff = self.skill_diff_with_overrides(&[
            (source_team, source_size, source_new_skill),
            (target_team, target_size, target_new_skill),
        ]);
        let skill_diff_delta = new_skill_diff as f64 - old_skill_diff as f64;

        let objective_delta = fours_floor_delta - conflict_delta - W_SKILL * skill_diff_delta;
        -objective_delta
    }

    pub fn apply_clique_swap(&mut self, clique_idx: usize, target_team: usize, swap_out: [usize; 2]) {
        debug_assert!(self.is_clique_swap_feasible(clique_idx, target_team, swap_out));
        let delta = self.calculate_clique_swap_cost_delta(clique_idx, target_team, swap_out);
        debug_assert!(delta.is_finite());

        let clique = self.cliques[clique_idx].clone();
        let source_team = self.assignment[clique[0]];

        self.teams[source_team].retain(|p| !clique.contains(p));
        self.teams[target_team].retain(|p| !swap_out.contains(p));
        self.teams[target_team].extend_from_slice(&clique);
        self.teams[source_team].extend_from_slice(&swap_out);

        for &c in &clique {
            self.assignment[c] = target_team;
        }
        for &s in &swap_out {
            self.assignment[s] = source_team;
        }

        let clique_skill: u32 = clique.iter().map(|&p| self.total_skill[p]).sum();
        let swap_out_skill: u32 = swap_out.iter().map(|&p| self.total_skill[p]).sum();
        self.team_skill[source_team] = self.team_skill[source_team] - clique_skill + swap_out_skill;
        self.team_skill[target_team] = self.team_skill[target_team] - swap_out_skill + clique_skill;

        let clique_missing: u32 = clique.iter().filter(|&&p| self.missing[p]).count() as u32;
        let swap_out_missing: u32 = swap_out.iter().filter(|&&p| self.missing[p]).count() as u32;
        self.team_missing_count[source_team] =
            self.team_missing_count[source_team] - clique_missing + swap_out_missing;
        self.team_missing_count[target_team] =
            self.team_missing_count[target_team] - swap_out_missing + clique_missing;

        self.current_cost += delta;
    }
}
