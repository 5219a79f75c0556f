//! A simulated annealing [`Solver`].
//!
//! Each iteration proposes one of three moves against the current state —
//! single-person transfer, person-pair swap, or 2-for-2 preference-clique
//! swap — scores it with the `State`'s incremental delta-cost methods, and
//! accepts or rejects it with the Metropolis criterion:
//!
//! ```text
//! accept if delta < 0, otherwise with probability exp(-delta / temperature)
//! ```
//!
//! Temperature follows geometric cooling:
//!
//! ```text
//! temperature(i) = initial * (final / initial) ^ (i / max_iterations)
//! ```
//!
//! The search tracks the best state seen and returns it, not necessarily the
//! state it happens to end on — annealing can wander uphill near the end of
//! a run.

use super::{ProgressCallback, ProgressUpdate, Solver, SolverOutcome};
use crate::solver::{SolverError, State};
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::{Duration, Instant};

/// Tuning parameters for [`SimulatedAnnealing`]. `max_time_seconds` has no
/// default — callers must decide a budget, since "run until it feels done"
/// is not a schedulable stop condition.
#[derive(Debug, Clone)]
pub struct SimulatedAnnealingParams {
    pub max_iterations: u64,
    pub initial_temperature: f64,
    pub final_temperature: f64,
    pub max_time_seconds: u64,
    pub no_improvement_iterations: Option<u64>,
}

impl Default for SimulatedAnnealingParams {
    fn default() -> Self {
        Self {
            max_iterations: 200_000,
            initial_temperature: 10.0,
            final_temperature: 0.01,
            max_time_seconds: 60,
            no_improvement_iterations: None,
        }
    }
}

pub struct SimulatedAnnealing {
    params: SimulatedAnnealingParams,
}

impl SimulatedAnnealing {
    pub fn new(params: SimulatedAnnealingParams) -> Self {
        Self { params }
    }

    fn temperature(&self, iteration: u64) -> f64 {
        let max = self.params.max_iterations.max(1) as f64;
        let ratio = self.params.final_temperature / self.params.initial_temperature;
        self.params.initial_temperature * ratio.powf(iteration as f64 / max)
    }
}

const MOVE_LOG_INTERVAL: u64 = 256;

enum Move {
    Transfer { person: usize, to: usize },
    Swap { p1: usize, p2: usize },
    CliqueSwap { clique_idx: usize, target_team: usize, swap_out: [usize; 2] },
}

impl Solver for SimulatedAnnealing {
    /// Runs the annealing loop until `max_iterations`, `max_time_seconds`, or
    /// `no_improvement_iterations` (whichever is set and fires first) is
    /// reached, then returns the best assignment found.
    fn solve(
        &self,
        state: &mut State,
        progress_callback: Option<&ProgressCallback>,
    ) -> Result<SolverOutcome, SolverError> {
        let start = Instant::now();
        let mut rng = rand::rng();

        let mut best_teams = state.to_raw_teams();
        let mut best_cost = state.current_cost();
        let mut no_improvement: u64 = 0;
        let mut iterations_run: u64 = 0;
        let mut last_callback = Instant::now();

        if state.n() == 0 {
            return Ok(SolverOutcome { teams: best_teams, final_cost: best_cost, iterations_run: 0, no_improvement_count: 0 });
        }

        for i in 0..self.params.max_iterations {
            iterations_run = i;

            if start.elapsed() >= Duration::from_secs(self.params.max_time_seconds) {
                log::debug!("simulated annealing stopping: time budget exhausted at iteration {i}");
                break;
            }
            if let Some(limit) = self.params.no_improvement_iterations {
                if no_improvement >= limit {
                    log::debug!("simulated annealing stopping: no improvement for {limit} iterations");
                    break;
                }
            }

            let temperature = self.temperature(i);

            if i % MOVE_LOG_INTERVAL == 0 {
                state.assert_cost_consistent();
            }

            let mut improved = false;
            if let Some(mv) = self.propose_move(state, &mut rng) {
                let delta = self.delta_of(state, &mv);
                let accept = delta < 0.0 || rng.random::<f64>() < (-delta / temperature.max(1e-12)).exp();
                if accept {
                    self.apply(state, mv);
                    let cost = state.current_cost();
                    if cost < best_cost - 1e-9 {
                        best_cost = cost;
                        best_teams = state.to_raw_teams();
                        improved = true;
                    }
                }
            }

            if improved {
                no_improvement = 0;
            } else {
                no_improvement += 1;
            }

            if let Some(callback) = progress_callback {
                if last_callback.elapsed() >= Duration::from_millis(100) {
                    last_callback = Instant::now();
                    let update = ProgressUpdate {
                        iteration: i,
                        max_iterations: self.params.max_iterations,
                        temperature,
                        current_cost: state.current_cost(),
                        best_cost,
                        no_improvement_count: no_improvement,
                        elapsed_seconds: start.elapsed().as_secs_f64(),
                    };
                    if !callback(&update) {
                        log::debug!("simulated annealing stopping: progress callback requested termination");
                        break;
                    }
                }
            }
        }

        state.assert_cost_consistent();
        log::debug!("{}", state.format_score_breakdown());

        Ok(SolverOutcome {
            teams: best_teams,
            final_cost: best_cost,
            iterations_run,
            no_improvement_count: no_improvement,
        })
    }
}

impl SimulatedAnnealing {
    /// Picks one of the three move types at random and fills in its operands,
    /// returning `None` when no legal move of the chosen type exists right
    /// now (e.g. no cliques, or too few movable people).
    fn propose_move(&self, state: &State, rng: &mut impl Rng) -> Option<Move> {
        let has_cliques = state.num_cliques() > 0;
        let selector: f64 = rng.random();

        let clique_swap_share = if has_cliques { 0.15 } else { 0.0 };
        let transfer_share = 0.5 * (1.0 - clique_swap_share);

        if selector < clique_swap_share {
            self.propose_clique_swap(state, rng)
        } else if selector < clique_swap_share + transfer_share {
            self.propose_transfer(state, rng)
        } else {
            self.propose_swap(state, rng)
        }
    }

    fn propose_transfer(&self, state: &State, rng: &mut impl Rng) -> Option<Move> {
        let movable: Vec<usize> = (0..state.n()).filter(|&p| state.person_is_free(p)).collect();
        if movable.is_empty() {
            return None;
        }
        let person = movable[rng.random_range(0..movable.len())];
        let from = state.assignment_of(person);
        let targets: Vec<usize> = (0..state.team_count())
            .filter(|&t| t != from && state.is_transfer_feasible(person, from, t))
            .collect();
        if targets.is_empty() {
            return None;
        }
        let to = targets[rng.random_range(0..targets.len())];
        Some(Move::Transfer { person, to })
    }

    fn propose_swap(&self, state: &State, rng: &mut impl Rng) -> Option<Move> {
        let movable: Vec<usize> = (0..state.n()).filter(|&p| state.person_is_free(p)).collect();
        if movable.len() < 2 {
            return None;
        }
        let p1 = movable[rng.random_range(0..movable.len())];
        let candidates: Vec<usize> = movable
            .iter()
            .copied()
            .filter(|&p| p != p1 && state.is_swap_feasible(p1, p))
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let p2 = candidates[rng.random_range(0..candidates.len())];
        Some(Move::Swap { p1, p2 })
    }

    fn propose_clique_swap(&self, state: &State, rng: &mut impl Rng) -> Option<Move> {
        let clique_idx = rng.random_range(0..state.num_cliques());
        if state.clique_members(clique_idx).len() != 2 {
            return None;
        }
        let source_team = state.assignment_of(state.clique_members(clique_idx)[0]);
        let targets: Vec<usize> = (0..state.team_count())
            .filter(|&t| t != source_team && state.movable_non_clique_members(t).len() >= 2)
            .collect();
        if targets.is_empty() {
            return None;
        }
        let target_team = targets[rng.random_range(0..targets.len())];
        let mut candidates = state.movable_non_clique_members(target_team);
        candidates.shuffle(rng);
        let swap_out = [candidates[0], candidates[1]];
        if state.is_clique_swap_feasible(clique_idx, target_team, swap_out) {
            Some(Move::CliqueSwap { clique_idx, target_team, swap_out })
        } else {
            None
        }
    }

    fn delta_of(&self, state: &State, mv: &Move) -> f64 {
        match *mv {
            Move::Transfer { person, to } => {
                let from = state.assignment_of(person);
                state.calculate_transfer_cost_delta(person, from, to)
            }
            Move::Swap { p1, p2 } => state.calculate_swap_cost_delta(p1, p2),
            Move::CliqueSwap { clique_idx, target_team, swap_out } => {
                state.calculate_clique_swap_cost_delta(clique_idx, target_team, swap_out)
            }
        }
    }

    fn apply(&self, state: &mut State, mv: Move) {
        match mv {
            Move::Transfer { person, to } => {
                let from = state.assignment_of(person);
                state.apply_transfer(person, from, to);
            }
            Move::Swap { p1, p2 } => state.apply_swap(p1, p2),
            Move::CliqueSwap { clique_idx, target_team, swap_out } => {
                state.apply_clique_swap(clique_idx, target_team, swap_out);
            }
        }
    }
}
