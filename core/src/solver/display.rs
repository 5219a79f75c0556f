//! Formatting helpers for debugging and progress logging.

use super::State;

impl State {
    /// A compact, human-readable breakdown of the current solution's score
    /// components. Intended for `log::debug!`/`log::info!` output, not for
    /// parsing.
    pub fn format_score_breakdown(&self) -> String {
        let occupied: Vec<usize> = (0..self.team_count).filter(|&g| !self.teams[g].is_empty()).collect();
        let fours = occupied.iter().filter(|&&g| self.teams[g].len() == super::SIZE_MAX).count();
        let undersized = occupied.iter().filter(|&&g| self.teams[g].len() < super::SIZE_MIN).count();
        let floor_violations: u32 = occupied
            .iter()
            .map(|&g| {
                let required = super::FLOOR * self.teams[g].len() as u32;
                required.saturating_sub(self.team_skill[g])
            })
            .sum();
        let conflict: f64 = occupied.iter().map(|&g| self.team_conflict(g)).sum();

        format!(
            "cost={:.2} teams_used={} fours={} undersized={} skill_diff={} floor_violations={} conflict={:.1}",
            self.current_cost,
            occupied.len(),
            fours,
            undersized,
            self.current_skill_diff(),
            floor_violations,
            conflict
        )
    }
}
