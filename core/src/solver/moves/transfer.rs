//! Single-person transfer: move one non-clique participant to a team with
//! spare capacity, without requiring an exchange.

use super::super::{State, SIZE_MAX, W_SKILL};
use super::fours_and_floor_delta;

impl State {
    /// A transfer is feasible if the person is not locked into a preference
    /// clique, the source and target teams differ, the target team has spare
    /// capacity, and the target would not end up with two missing participants.
    ///
    /// The source team is allowed to end up below `SIZE_MIN` (including down
    /// to a single remaining member) rather than being blocked — an undersized
    /// source is priced as a soft penalty in `calculate_transfer_cost_delta`
    /// instead, the same way the skill floor is. Blocking it outright would
    /// leave the search with no way to route through a team of 1 or 2 once
    /// every occupied team sits at size 2 or 3, since swap and clique-swap
    /// never change a team's size at all.
    pub fn is_transfer_feasible(&self, person: usize, from: usize, to: usize) -> bool {
        if from == to {
            return false;
        }
        if self.person_to_clique[person].is_some() {
            return false;
        }
        if self.assignment[person] != from {
            return false;
        }
        if self.teams[to].len() >= SIZE_MAX {
            return false;
        }
        if self.missing[person] && self.team_missing_count[to] >= 1 {
            return false;
        }

        true
    }

    /// Cost delta (in the minimize sense) of transferring `person` from `from`
    /// to `to`. `f64::INFINITY` if the move is infeasible.
    pub fn calculate_transfer_cost_delta(&self, person: usize, from: usize, to: usize) -> f64 {
        if !self.is_transfer_feasible(person, from, to) {
            return f64::INFINITY;
        }

        let conflict_delta = {
            let lost: f64 = self.teams[from]
                .iter()
                .filter(|&&m| m != person)
                .map(|&m| self.conflict_between(person, m))
                .sum();
            let gained: f64 = self.teams[to].iter().map(|&m| self.conflict_between(person, m)).sum();
            gained - lost
        };

        let from_old = (self.teams[from].len(), self.team_skill[from]);
        let to_old = (self.teams[to].len(), self.team_skill[to]);
        let skill = self.total_skill[person];
        let from_new = (from_old.0 - 1, from_old.1 - skill);
        let to_new = (to_old.0 + 1, to_old.1 + skill);

        let fours_floor_delta =
            fours_and_floor_delta(from_old, from_new) + fours_and_floor_delta(to_old, to_new);

        let old_skill_diff = self.current_skill_diff();
        let new_skill_diff =
            self.skill_diff_with_overrides(&[(from, from_new.0, from_new.1), (to, to_new.0, to_new.1)]);
        let skill_diff_delta = new_skill_diff as f64 - old_skill_diff as f64;

        let objective_delta = fours_floor_delta - conflict_delta - W_SKILL * skill_diff_delta;
        -objective_delta
    }

    /// Applies a transfer, updating the assignment and every incrementally
    /// tracked field. Caller must have already confirmed feasibility (e.g. via
    /// a finite `calculate_transfer_cost_delta`).
    pub fn apply_transfer(&mut self, person: usize, from: usize, to: usize) {
        debug_assert!(self.is_transfer_feasible(person, from, to));
        let delta = self.calculate_transfer_cost_delta(person, from, to);
        debug_assert!(delta.is_finite());

        let skill = self.total_skill[person];
        self.teams[from].retain(|&p| p != person);
        self.teams[to].push(person);
        self.assignment[person] = to;

        self.team_skill[from] -= skill;
        self.team_skill[to] += skill;
        if self.missing[person] {
            self.team_missing_count[from] -= 1;
            self.team_missing_count[to] += 1;
        }

        self.current_cost += delta;
    }
}
