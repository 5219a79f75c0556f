//! Move operations for the solver.
//!
//! Three move types:
//! - **Transfer**: move a single non-clique person to a team with spare capacity
//! - **Swap**: exchange two non-clique people between teams
//! - **Clique swap**: move a 2-person preference clique into another team,
//!   displacing two of that team's non-clique members in exchange

mod clique_swap;
mod swap;
mod transfer;

use super::{FLOOR, SIZE_MAX, SIZE_MIN, W_FLOOR, W_FOUR, W_SIZE};

/// `(is_four, floor_violation, is_undersized)` for a hypothetical team of the
/// given size and aggregate skill. Shared by every move's delta computation so
/// the floor/fours/size-window bookkeeping is defined in exactly one place.
fn team_contribution(size: usize, skill: u32) -> (bool, u32, bool) {
    if size == 0 {
        return (false, 0, false);
    }
    let is_four = size == SIZE_MAX;
    let required = FLOOR * size as u32;
    let violation = required.saturating_sub(skill);
    let undersized = size < SIZE_MIN;
    (is_four, violation, undersized)
}

/// Objective delta (maximize-sense) contributed by two teams' fours/floor/size
/// terms changing from `(old_size, old_skill)` to `(new_size, new_skill)`.
fn fours_and_floor_delta(old: (usize, u32), new: (usize, u32)) -> f64 {
    let (old_four, old_violation, old_undersized) = team_contribution(old.0, old.1);
    let (new_four, new_violation, new_undersized) = team_contribution(new.0, new.1);
    let fours_delta = new_four as i32 - old_four as i32;
    let violation_delta = new_violation as i64 - old_violation as i64;
    let undersized_delta = new_undersized as i32 - old_undersized as i32;
    W_FOUR * fours_delta as f64 - W_FLOOR * violation_delta as f64 - W_SIZE * undersized_delta as f64
}
