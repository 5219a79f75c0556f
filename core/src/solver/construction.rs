//! Model Builder: turns normalized participants into a `State`, including
//! preference-clique preprocessing and a greedy randomized initial placement
//! that simulated annealing then improves on.

use super::{build_cliques, State, SolverError, SIZE_MAX, SIZE_MIN};
use crate::models::Participant;
use crate::normalizer::preference_edges;
use rand::seq::SliceRandom;

impl State {
    pub fn new(participants: &[Participant]) -> Result<Self, SolverError> {
        let n = participants.len();
        let team_count = n.div_ceil(SIZE_MIN);
        if team_count == 0 && n > 0 {
            return Err(SolverError::ModelBuildError(
                "computed zero teams for a non-empty roster".to_string(),
            ));
        }

        let edges = preference_edges(participants);
        let (cliques, person_to_clique) = build_cliques(n, &edges)?;

        let total_skill: Vec<u32> = participants.iter().map(|p| p.skills.total()).collect();
        let missing: Vec<bool> = participants.iter().map(|p| p.is_missing()).collect();
        let modality = participants.iter().map(|p| p.modality).collect();
        let availability = participants.iter().map(|p| p.availability.clone()).collect();
        let section = participants.iter().map(|p| p.section.clone()).collect();

        let mut state = State {
            n,
            team_count,
            assignment: vec![usize::MAX; n],
            teams: vec![Vec::new(); team_count],
            total_skill,
            missing,
            modality,
            availability,
            section,
            cliques,
            person_to_clique,
            team_skill: vec![0; team_count],
            team_missing_count: vec![0; team_count],
            current_cost: 0.0,
        };

        state.place_initial()?;
        state.recalculate_all();
        Ok(state)
    }

    /// Rebuilds `teams`/`assignment` from an externally supplied partition
    /// (e.g. the best-so-far snapshot a solver tracked separately from its
    /// working state) and recomputes every incrementally tracked field from
    /// scratch. Used to evaluate a solver's result against a state shaped
    /// like the one it was built from.
    pub(crate) fn restore_teams(&mut self, teams: Vec<Vec<usize>>) {
        debug_assert_eq!(teams.len(), self.team_count);
        let mut assignment = vec![usize::MAX; self.n];
        for (team_idx, members) in teams.iter().enumerate() {
            for &person in members {
                assignment[person] = team_idx;
            }
        }
        self.teams = teams;
        self.assignment = assignment;
        self.recalculate_all();
    }

    /// Greedy randomized initial placement: cliques are placed as units first
    /// (so the hard colocation constraint holds from the start), then
    /// remaining participants are scattered into teams with spare capacity,
    /// a shuffled group-order scan for both passes so no team is
    /// systematically favored.
    fn place_initial(&mut self) -> Result<(), SolverError> {
        let mut rng = rand::rng();
        let mut remaining_capacity = vec![SIZE_MAX; self.team_count];
        let mut placed = vec![false; self.n];

        let clique_order: Vec<usize> = {
            let mut order: Vec<usize> = (0..self.cliques.len()).collect();
            order.shuffle(&mut rng);
            order
        };

        for clique_idx in clique_order {
            let clique = self.cliques[clique_idx].clone();
            let mut team_order: Vec<usize> = (0..self.team_count).collect();
            team_order.shuffle(&mut rng);

            let target = team_order
                .into_iter()
                .find(|&g| remaining_capacity[g] >= clique.len());
            let Some(target) = target else {
                return Err(SolverError::ModelBuildError(format!(
                    "could not place preference clique of size {} in any team",
                    clique.len()
                )));
            };

            for &member in &clique {
                self.teams[target].push(member);
                self.assignment[member] = target;
                placed[member] = true;
            }
            remaining_capacity[target] -= clique.len();
        }

        let singles: Vec<usize> = (0..self.n).filter(|&p| !placed[p]).collect();
        for person in singles {
            let mut team_order: Vec<usize> = (0..self.team_count).collect();
            team_order.shuffle(&mut rng);
            let target = team_order.into_iter().find(|&g| remaining_capacity[g] > 0);
            let Some(target) = target else {
                return Err(SolverError::ModelBuildError(format!(
                    "could not place participant index {} in any team",
                    person
                )));
            };
            self.teams[target].push(person);
            self.assignment[person] = target;
            remaining_capacity[target] -= 1;
        }

        Ok(())
    }
}
