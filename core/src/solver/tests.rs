use super::*;
use crate::models::{Modality, Participant, Skills};

fn participant(email: &str, total_skill: u32, preferred: Option<&str>) -> Participant {
    Participant {
        id: email.to_string(),
        name: email.to_string(),
        email: email.to_string(),
        github_username: "someone".to_string(),
        skills: Skills {
            ruby: (total_skill / 3) as u8,
            html_css: (total_skill / 3) as u8,
            js: (total_skill - 2 * (total_skill / 3)) as u8,
        },
        modality: Modality::NoPreference,
        availability: Default::default(),
        section: String::new(),
        preferred_partner_email: preferred.map(str::to_string),
        assigned_team: None,
    }
}

#[test]
fn team_count_is_ceil_n_over_size_min() {
    let participants: Vec<_> = (0..10).map(|i| participant(&format!("p{i}@x.com"), 15, None)).collect();
    let state = State::new(&participants).unwrap();
    assert_eq!(state.team_count(), 10usize.div_ceil(SIZE_MIN));
}

#[test]
fn construction_places_every_participant_exactly_once() {
    let participants: Vec<_> = (0..13).map(|i| participant(&format!("p{i}@x.com"), 15, None)).collect();
    let state = State::new(&participants).unwrap();
    state.validate_no_duplicate_assignments().unwrap();
}

#[test]
fn construction_respects_size_window_and_cliques() {
    let mut participants: Vec<_> = (0..12).map(|i| participant(&format!("p{i}@x.com"), 15, None)).collect();
    participants[0].preferred_partner_email = Some("p1@x.com".to_string());
    let state = State::new(&participants).unwrap();
    assert!(state.size_window_satisfied());
    assert!(state.cliques_satisfied());
}

#[test]
fn build_cliques_rejects_oversized_component() {
    // Three mutual preferences chained into a single 4-person component is
    // fine (equal to SIZE_MAX); a 5th edge pulling in a 5th person is not.
    let edges = [
        crate::models::PreferenceEdge { from: 0, to: 1 },
        crate::models::PreferenceEdge { from: 1, to: 2 },
        crate::models::PreferenceEdge { from: 2, to: 3 },
        crate::models::PreferenceEdge { from: 3, to: 4 },
    ];
    let err = build_cliques(5, &edges).unwrap_err();
    assert!(matches!(err, SolverError::ModelBuildError(_)));
}

#[test]
fn build_cliques_accepts_component_at_max_size() {
    let edges = [
        crate::models::PreferenceEdge { from: 0, to: 1 },
        crate::models::PreferenceEdge { from: 1, to: 2 },
        crate::models::PreferenceEdge { from: 2, to: 3 },
    ];
    let (cliques, person_to_clique) = build_cliques(6, &edges).unwrap();
    assert_eq!(cliques.len(), 1);
    assert_eq!(cliques[0].len(), 4);
    assert!(person_to_clique[0].is_some());
    assert!(person_to_clique[4].is_none());
}

#[test]
fn skill_floor_satisfied_reflects_team_skill() {
    let participants: Vec<_> = (0..8).map(|i| participant(&format!("p{i}@x.com"), 15, None)).collect();
    let state = State::new(&participants).unwrap();
    // Every participant carries skill 15, well above FLOOR * 4 = 20 for a
    // team of four or FLOOR * 3 = 15 for a triple, so the floor always holds.
    assert!(state.skill_floor_satisfied());
}

#[test]
fn conflict_between_sums_independent_trait_weights() {
    let mut a = participant("a@x.com", 15, None);
    let mut b = participant("b@x.com", 15, None);
    a.modality = Modality::InPerson;
    b.modality = Modality::Remote;
    a.section = "A".to_string();
    b.section = "B".to_string();
    a.availability = ["Mon".to_string()].into_iter().collect();
    b.availability = ["Tue".to_string()].into_iter().collect();

    let participants = vec![a, b, participant("c@x.com", 15, None)];
    let state = State::new(&participants).unwrap();
    assert_eq!(
        state.conflict_between(0, 1),
        WEIGHT_AVAILABILITY_CONFLICT + WEIGHT_MODALITY_CONFLICT + WEIGHT_SECTION_CONFLICT
    );
}

#[test]
fn conflict_between_ignores_empty_traits() {
    let a = participant("a@x.com", 15, None);
    let b = participant("b@x.com", 15, None);
    let participants = vec![a, b, participant("c@x.com", 15, None)];
    let state = State::new(&participants).unwrap();
    assert_eq!(state.conflict_between(0, 1), 0.0);
}
