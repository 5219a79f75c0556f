//! Team assignment: given a normalized roster, find a partition into teams of
//! 3-4 that satisfies the hard constraints (size window, preference-clique
//! colocation, one-missing-participant cap, skill floor) and optimizes the
//! soft objective (team-of-four count, preference satisfaction, conflict
//! minimization, skill balance).
//!
//! ```text
//! RawParticipant -> normalizer::normalize -> Participant
//!                -> solver::State::new        (Model Builder)
//!                -> algorithms::SimulatedAnnealing::solve  (Solver Driver)
//!                -> renumber                   -> Partition
//! ```
//!
//! The normalizer is a separate, explicit step — `assign_teams` takes
//! already-normalized participants rather than raw roster rows.

pub mod algorithms;
pub mod models;
pub mod normalizer;
pub mod solver;

use algorithms::simulated_annealing::{SimulatedAnnealing, SimulatedAnnealingParams};
use algorithms::{ProgressCallback, Solver, SolverOutcome};
use models::{Participant, Partition};
use solver::{SolverError, State};
use thiserror::Error;

/// Errors `assign_teams` can return. Wraps the inner `SolverError` the same
/// way the normalizer's and solver's errors stay distinct types all the way
/// down — callers pattern-match on the variant, not a string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssignError {
    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// Tuning parameters for a solve. `max_time_seconds` has no default and must
/// be supplied explicitly; every other knob has a reasonable default and a
/// builder-style setter, mirroring `SimulatedAnnealingParams`'s shape.
#[derive(Debug, Clone)]
pub struct SolverParams {
    max_time_seconds: u64,
    max_iterations: u64,
    initial_temperature: f64,
    final_temperature: f64,
    no_improvement_iterations: Option<u64>,
    /// Independent annealing restarts; the best of the lot is kept. Realized
    /// sequentially in this crate, not as a thread-per-worker portfolio — see
    /// DESIGN.md.
    num_search_workers: u32,
    log_search_progress: bool,
}

impl SolverParams {
    pub fn new(max_time_seconds: u64) -> Self {
        Self {
            max_time_seconds,
            max_iterations: 500_000,
            initial_temperature: 10.0,
            final_temperature: 0.01,
            no_improvement_iterations: None,
            num_search_workers: 6,
            log_search_progress: false,
        }
    }

    pub fn max_iterations(mut self, value: u64) -> Self {
        self.max_iterations = value;
        self
    }

    pub fn initial_temperature(mut self, value: f64) -> Self {
        self.initial_temperature = value;
        self
    }

    pub fn final_temperature(mut self, value: f64) -> Self {
        self.final_temperature = value;
        self
    }

    pub fn no_improvement_iterations(mut self, value: u64) -> Self {
        self.no_improvement_iterations = Some(value);
        self
    }

    pub fn num_search_workers(mut self, value: u32) -> Self {
        self.num_search_workers = value.max(1);
        self
    }

    pub fn log_search_progress(mut self, value: bool) -> Self {
        self.log_search_progress = value;
        self
    }
}

impl Default for SolverParams {
    /// A 60-second default budget, used only by tests and `proptest`
    /// strategies that need a `SolverParams` without caring about timing.
    /// `assign_teams` callers should prefer `SolverParams::new`.
    fn default() -> Self {
        Self::new(60)
    }
}

/// Runs the Solver Driver procedure: build a `State`, anneal it, validate the
/// best state found against every hard constraint, stamp and renumber.
///
/// Returns `Ok(Partition::empty())` (with a `log::warn!`) rather than an
/// error when the search cannot certify a feasible assignment within budget
/// — a structurally infeasible roster is a reportable outcome, not a bug.
pub fn assign_teams(participants: Vec<Participant>, params: SolverParams) -> Result<Partition, AssignError> {
    if participants.is_empty() {
        return Ok(Partition::empty());
    }

    let callback: Option<&ProgressCallback> = None;
    let mut best_outcome: Option<SolverOutcome> = None;

    for worker in 0..params.num_search_workers {
        let mut state = State::new(&participants)?;
        log::info!(
            "worker {worker}: model built ({} participants, {} teams, {} cliques)",
            state.n(),
            state.team_count(),
            state.num_cliques()
        );
        log::debug!("worker {worker}: initial {}", state.format_score_breakdown());

        let sa = SimulatedAnnealing::new(SimulatedAnnealingParams {
            max_iterations: params.max_iterations,
            initial_temperature: params.initial_temperature,
            final_temperature: params.final_temperature,
            max_time_seconds: params.max_time_seconds,
            no_improvement_iterations: params.no_improvement_iterations,
        });

        let outcome = if params.log_search_progress {
            let log_callback = |update: &algorithms::ProgressUpdate| {
                log::info!(
                    "worker {worker}: iter={} temp={:.4} cost={:.2} best={:.2} no_improve={}",
                    update.iteration,
                    update.temperature,
                    update.current_cost,
                    update.best_cost,
                    update.no_improvement_count
                );
                true
            };
            sa.solve(&mut state, Some(&log_callback))?
        } else {
            sa.solve(&mut state, callback)?
        };

        log::info!(
            "worker {worker}: final_cost={:.2} iterations_run={}",
            outcome.final_cost,
            outcome.iterations_run
        );

        let is_better = best_outcome.as_ref().map_or(true, |best| outcome.final_cost < best.final_cost);
        if is_better {
            best_outcome = Some(outcome);
        }
    }

    let outcome = best_outcome.expect("num_search_workers is clamped to at least 1");

    let mut final_state = State::new(&participants)?;
    final_state.restore_teams(outcome.teams);

    if !final_state.is_feasible() {
        log::warn!(
            "assign_teams: no feasible assignment found within budget ({})",
            final_state.format_score_breakdown()
        );
        return Ok(Partition::empty());
    }

    let mut participants = participants;
    for (team_idx, members) in final_state.to_raw_teams().iter().enumerate() {
        for &person in members {
            participants[person].assigned_team = Some(team_idx as u32 + 1);
        }
    }

    Ok(renumber(&participants))
}

/// Groups participants by `assigned_team`, drops empty buckets, and
/// renumbers surviving teams `1..=K'` in first-appearance order — the same
/// normalization applied so a sparse or skipped team numbering never
/// leaks into the output.
fn renumber(participants: &[Participant]) -> Partition {
    use std::collections::HashMap;

    let mut old_to_new: HashMap<u32, usize> = HashMap::new();
    let mut teams: Vec<Vec<usize>> = Vec::new();

    for (index, participant) in participants.iter().enumerate() {
        let Some(old_team) = participant.assigned_team else {
            continue;
        };
        let new_team = *old_to_new.entry(old_team).or_insert_with(|| {
            teams.push(Vec::new());
            teams.len() - 1
        });
        teams[new_team].push(index);
    }

    Partition { teams }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Skills;

    fn participant(assigned_team: Option<u32>) -> Participant {
        Participant {
            id: "x".to_string(),
            name: "x".to_string(),
            email: "x@example.com".to_string(),
            github_username: "x".to_string(),
            skills: Skills::default(),
            modality: crate::models::Modality::NoPreference,
            availability: Default::default(),
            section: String::new(),
            preferred_partner_email: None,
            assigned_team,
        }
    }

    #[test]
    fn renumber_drops_empty_and_reassigns_in_first_appearance_order() {
        // Teams 5 and 2 are used, in that order of first appearance; team 9
        // never appears and must not leave a gap.
        let participants = vec![
            participant(Some(5)),
            participant(Some(2)),
            participant(Some(5)),
            participant(Some(2)),
        ];
        let out = renumber(&participants);
        assert_eq!(out.teams.len(), 2);
        assert_eq!(out.teams[0], vec![0, 2]);
        assert_eq!(out.teams[1], vec![1, 3]);
    }

    #[test]
    fn renumber_is_idempotent() {
        let participants = vec![participant(Some(7)), participant(Some(7)), participant(Some(3))];
        let first = renumber(&participants);

        let mut restamped = participants.clone();
        for (team_idx, members) in first.teams.iter().enumerate() {
            for &person in members {
                restamped[person].assigned_team = Some(team_idx as u32 + 1);
            }
        }
        let second = renumber(&restamped);
        assert_eq!(first.teams, second.teams);
    }

    #[test]
    fn empty_roster_returns_empty_partition() {
        let out = assign_teams(Vec::new(), SolverParams::new(1)).unwrap();
        assert!(out.is_empty());
    }
}
