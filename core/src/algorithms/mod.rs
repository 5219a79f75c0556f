//! The search strategy layer: anything that can turn a starting [`crate::solver::State`]
//! into a better one implements [`Solver`]. `crate::solver::State` owns the data and the
//! incremental scoring; this module owns the move-selection and acceptance strategy.

pub mod simulated_annealing;

use crate::solver::{SolverError, State};

/// Called periodically during a solve with a snapshot of search progress.
/// Returning `false` requests early termination.
pub type ProgressCallback = dyn Fn(&ProgressUpdate) -> bool;

/// A snapshot of annealing progress, suitable for a CLI progress bar or a
/// structured log line. Trimmed to what a single, non-multi-session solve
/// can report.
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub iteration: u64,
    pub max_iterations: u64,
    pub temperature: f64,
    pub current_cost: f64,
    pub best_cost: f64,
    pub no_improvement_count: u64,
    pub elapsed_seconds: f64,
}

/// The outcome of a solve: the best assignment found plus enough bookkeeping
/// to explain how the search ended.
#[derive(Debug, Clone)]
pub struct SolverOutcome {
    pub teams: Vec<Vec<usize>>,
    pub final_cost: f64,
    pub iterations_run: u64,
    pub no_improvement_count: u64,
}

/// A strategy that searches for a low-cost team assignment starting from a
/// given [`State`]. Implementations own their own stopping rules; `solve`
/// returns the best assignment found, not necessarily a feasible one — the
/// caller checks feasibility and decides whether to report failure.
///
/// ```
/// use team_assign_core::algorithms::{ProgressUpdate, Solver, SolverOutcome};
/// use team_assign_core::solver::{SolverError, State};
///
/// struct FirstImprovement;
///
/// impl Solver for FirstImprovement {
///     fn solve(
///         &self,
///         state: &mut State,
///         _progress_callback: Option<&team_assign_core::algorithms::ProgressCallback>,
///     ) -> Result<SolverOutcome, SolverError> {
///         // A real strategy would try moves here; this one just reports
///         // the state it was handed.
///         Ok(SolverOutcome {
///             teams: state.to_raw_teams(),
///             final_cost: state.current_cost(),
///             iterations_run: 0,
///             no_improvement_count: 0,
///         })
///     }
/// }
/// ```
pub trait Solver {
    fn solve(
        &self,
        state: &mut State,
        progress_callback: Option<&ProgressCallback>,
    ) -> Result<SolverOutcome, SolverError>;
}
