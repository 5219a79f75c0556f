//! Swap move: exchange two non-clique participants between their teams.
//! Team sizes are unaffected, so the size window invariant is preserved for
//! free — only the missing-cap and skill/conflict objective terms can move.

use super::super::{State, W_SKILL};
use super::fours_and_floor_delta;

impl State {
    pub fn is_swap_feasible(&self, p1: usize, p2: usize) -> bool {
        let t1 = self.assignment[p1];
        let t2 = self.assignment[p2];
        if t1 == t2 {
            return false;
        }
        if self.person_to_clique[p1].is_some() || self.person_to_clique[p2].is_some() {
            return false;
        }

        let t1_missing_after = self.team_missing_count[t1] - self.missing[p1] as u32 + self.missing[p2] as u32;
        let t2_missing_after = self.team_missing_count[t2] - self.missing[p2] as u32 + self.missing[p1] as u32;
        if t1_missing_after > 1 || t2_missing_after > 1 {
            return false;
        }

        true
    }

    pub fn calculate_swap_cost_delta(&self, p1: usize, p2: usize) -> f64 {
        if !self.is_swap_feasible(p1, p2) {
            return f64::INFINITY;
        }
        let t1 = self.assignment[p1];
        let t2 = self.assignment[p2];

        let conflict_delta = {
            let old: f64 = self.teams[t1]
                .iter()
                .filter(|&&m| m != p1)
                .map(|&m| self.conflict_between(p1, m))
                .sum::<f64>()
                + self.teams[t2]
                    .iter()
                    .filter(|&&m| m != p2)
                    .map(|&m| self.conflict_between(p2, m))
                    .sum::<f64>();
            let new: f64 = self.teams[t1]
                .iter()
                .filter(|&&m| m != p1)
                .map(|&m| self.conflict_between(p2, m))
                .sum::<f64>()
                + self.teams[t2]
                    .iter()
                    .filter(|&&m| m != p2)
                    .map(|&m| self.conflict_between(p1, m))
                    .sum::<f64>();
            new - old
        };

        let skill1 = self.total_skill[p1];
        let skill2 = self.total_skill[p2];
        let size1 = self.teams[t1].len();
        let size2 = self.teams[t2].len();
        let t1_new_skill = self.team_skill[t1] - skill1 + skill2;
        let t2_new_skill = self.team_skill[t2] - skill2 + skill1;

        let fours_floor_delta = fours_and_floor_delta((size1, self.team_skill[t1]), (size1, t1_new_skill))
            + fours_and_floor_delta((size2, self.team_skill[t2]), (size2, t2_new_skill));

        let old_skill_diff = self.current_skill_diff();
        let new_skill_diff =
            self.skill_diff_with_overrides(&[(t1, size1, t1_new_skill), (t2, size2, t2_new_skill)]);
        let skill_diff_delta = new_skill_diff as f64 - old_skill_diff as f64;

        let objective_delta = fours_floor_delta - conflict_delta - W_SKILL * skill_diff_delta;
        -objective_delta
    }

    pub fn apply_swap(&mut self, p1: usize, p2: usize) {
        debug_assert!(self.is_swap_feasible(p1, p2));
        let delta = self.calculate_swap_cost_delta(p1, p2);
        debug_assert!(delta.is_finite());

        let t1 = self.assignment[p1];
        let t2 = self.assignment[p2];
        let skill1 = self.total_skill[p1];
        let skill2 = self.total_skill[p2];

        for slot in self.teams[t1].iter_mut() {
            if *slot == p1 {
                *slot = p2;
            }
        }
        for slot in self.teams[t2].iter_mut() {
            if *slot == p2 {
                *slot = p1;
            }
        }
        self.assignment[p1] = t2;
        self.assignment[p2] = t1;

        self.team_skill[t1] = self.team_skill[t1] - skill1 + skill2;
        self.team_skill[t2] = self.team_skill[t2] - skill2 + skill1;
        if self.missing[p1] != self.missing[p2] {
            if self.missing[p1] {
                self.team_missing_count[t1] -= 1;
                self.team_missing_count[t2] += 1;
            } else {
                self.team_missing_count[t2] -= 1;
                self.team_missing_count[t1] += 1;
            }
        }

        self.current_cost += delta;
    }
}
