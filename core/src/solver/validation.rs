//! Invariant checks, run at the end of a solve (and optionally during search
//! under debug assertions) to catch drift between incremental bookkeeping and
//! the actual assignment.

use super::{SolverError, State};

impl State {
    /// Checks every hard invariant the assignment must satisfy once the search
    /// is done. Does not check the skill floor (a soft stand-in during search,
    /// but a hard acceptance gate — see `State::skill_floor_satisfied`).
    pub fn validate_no_duplicate_assignments(&self) -> Result<(), SolverError> {
        let mut seen = vec![false; self.n];
        for (team, members) in self.teams.iter().enumerate() {
            for &person in members {
                if seen[person] {
                    return Err(SolverError::ModelBuildError(format!(
                        "participant index {} assigned to more than one team",
                        person
                    )));
                }
                seen[person] = true;
                if self.assignment[person] != team {
                    return Err(SolverError::ModelBuildError(format!(
                        "participant index {} assignment/location mismatch",
                        person
                    )));
                }
            }
        }
        if seen.iter().any(|&s| !s) {
            return Err(SolverError::ModelBuildError(
                "not every participant is assigned to a team".to_string(),
            ));
        }
        Ok(())
    }

    /// Recomputes the objective from scratch and compares it with the
    /// incrementally tracked `current_cost`. Used periodically by the
    /// annealing loop as a cheap self-check rather than trusting incremental
    /// updates forever.
    pub(crate) fn assert_cost_consistent(&self) {
        let recomputed = -self.calculate_objective();
        debug_assert!(
            (recomputed - self.current_cost).abs() < 1e-6,
            "cost drift detected: incremental={}, recomputed={}",
            self.current_cost,
            recomputed
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Modality, Participant, Skills};

    fn participant(email: &str, total_skill: u32) -> Participant {
        Participant {
            id: email.to_string(),
            name: email.to_string(),
            email: email.to_string(),
            github_username: "user".to_string(),
            skills: Skills {
                ruby: (total_skill / 3) as u8,
                html_css: (total_skill / 3) as u8,
                js: (total_skill - 2 * (total_skill / 3)) as u8,
            },
            modality: Modality::NoPreference,
            availability: Default::default(),
            section: String::new(),
            preferred_partner_email: None,
            assigned_team: None,
        }
    }

    #[test]
    fn fresh_state_has_no_duplicate_assignments() {
        let participants: Vec<_> = (0..6).map(|i| participant(&format!("p{i}@x.com"), 15)).collect();
        let state = State::new(&participants).unwrap();
        state.validate_no_duplicate_assignments().unwrap();
    }
}
