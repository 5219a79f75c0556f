//! Objective computation for the solver state.
//!
//! `recalculate_all` rebuilds every incrementally-tracked field from scratch;
//! moves update the same fields incrementally and are periodically checked
//! against a full recalculation via `debug_assert_eq!`, the same belt-and-braces
//! pattern.

use super::{State, FLOOR, SIZE_MAX, SIZE_MIN, W_FLOOR, W_FOUR, W_PREF, W_SIZE, W_SKILL};

impl State {
    pub(super) fn recalculate_all(&mut self) {
        for g in 0..self.team_count {
            self.team_skill[g] = self.teams[g].iter().map(|&p| self.total_skill[p]).sum();
            self.team_missing_count[g] = self.teams[g].iter().filter(|&&p| self.missing[p]).count() as u32;
        }
        self.current_cost = -self.calculate_objective();
    }

    /// Recomputes the objective (to be maximized) from the current assignment.
    /// Used both to seed `current_cost` and as the ground truth for consistency
    /// checks against incremental move updates.
    pub(super) fn calculate_objective(&self) -> f64 {
        let mut total_fours = 0u32;
        let mut skill_floor_violation = 0u32;
        let mut undersized_count = 0u32;
        let mut conflict_penalty = 0.0;
        let mut min_skill = u32::MAX;
        let mut max_skill = 0u32;
        let mut any_used = false;

        for g in 0..self.team_count {
            let size = self.teams[g].len();
            if size == 0 {
                continue;
            }
            any_used = true;
            if size == SIZE_MAX {
                total_fours += 1;
            }
            if size < SIZE_MIN {
                undersized_count += 1;
            }
            let required = FLOOR * size as u32;
            if self.team_skill[g] < required {
                skill_floor_violation += required - self.team_skill[g];
            }
            min_skill = min_skill.min(self.team_skill[g]);
            max_skill = max_skill.max(self.team_skill[g]);
            conflict_penalty += self.team_conflict(g);
        }
        let skill_diff = if any_used { max_skill - min_skill } else { 0 };

        // pref_score: structurally equal to the edge count once cliques are
        // respected (every clique member shares a team by construction); kept
        // as an explicit recount rather than assumed from clique size alone.
        let mut pref_score = 0u32;
        for clique in &self.cliques {
            if clique.len() >= 2 {
                let team = self.assignment[clique[0]];
                if clique.iter().all(|&p| self.assignment[p] == team) {
                    pref_score += self.pref_edge_count_for_clique(clique);
                }
            }
        }

        W_FOUR * total_fours as f64 + W_PREF * pref_score as f64 - conflict_penalty
            - W_SKILL * skill_diff as f64
            - W_FLOOR * skill_floor_violation as f64
            - W_SIZE * undersized_count as f64
    }

    /// Aggregate skill spread across occupied teams, with `overrides` (team,
    /// new_size, new_skill) applied first. Used by move delta calculations,
    /// which know ahead of time which one or two teams a move would change and
    /// by how much, without rebuilding the whole `team_skill` vector.
    pub(super) fn skill_diff_with_overrides(&self, overrides: &[(usize, usize, u32)]) -> u32 {
        let mut min_skill = u32::MAX;
        let mut max_skill = 0u32;
        let mut any_used = false;

        for g in 0..self.team_count {
            let (size, skill) = match overrides.iter().find(|&&(team, _, _)| team == g) {
                Some(&(_, size, skill)) => (size, skill),
                None => (self.teams[g].len(), self.team_skill[g]),
            };
            if size == 0 {
                continue;
            }
            any_used = true;
            min_skill = min_skill.min(skill);
            max_skill = max_skill.max(skill);
        }

        if any_used {
            max_skill - min_skill
        } else {
            0
        }
    }

    pub(super) fn current_skill_diff(&self) -> u32 {
        self.skill_diff_with_overrides(&[])
    }

    fn pref_edge_count_for_clique(&self, clique: &[usize]) -> u32 {
        // Every clique here has at most 2 members (each participant names at
        // most one preferred partner), so this is 0 or 1 edge; written generally
        // in case that assumption is ever relaxed.
        clique.len().saturating_sub(1) as u32
    }
}
