//! Core data types for the team assignment problem.
//!
//! These mirror the shape of the raw roster data as it arrives (`RawParticipant`),
//! the validated/canonicalized form the solver actually works with (`Participant`),
//! and the output partition. Kept free of solver logic — see `normalizer` and
//! `solver` for that.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A participant record as it arrives before validation.
///
/// Skill fields are strings because upstream CSV ingestion (out of scope for this
/// crate) hands us whatever the form produced; the normalizer is responsible for
/// coercing them to integers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawParticipant {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub github_username: String,
    pub ruby_skill: String,
    pub html_css_skill: String,
    pub js_skill: String,
    #[serde(default)]
    pub modality: String,
    #[serde(default)]
    pub availability: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub preferred_partner_email: Option<String>,
}

/// A participant's self-reported skill levels, each in `[0, 5]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct Skills {
    pub ruby: u8,
    pub html_css: u8,
    pub js: u8,
}

impl Skills {
    pub fn total(&self) -> u32 {
        self.ruby as u32 + self.html_css as u32 + self.js as u32
    }
}

/// Meeting-modality preference, canonicalized at normalization time.
///
/// Anything other than the two exact strings recognized by the normalizer
/// collapses to `NoPreference` rather than being rejected — see `normalizer::normalize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modality {
    InPerson,
    Remote,
    NoPreference,
}

/// A validated, normalized participant with stable index-free identity.
///
/// Participants are addressed by their position in the `Vec<Participant>` returned
/// by `normalizer::normalize` everywhere in the solver; `id` is carried through only
/// for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub email: String,
    pub github_username: String,
    pub skills: Skills,
    pub modality: Modality,
    pub availability: HashSet<String>,
    pub section: String,
    pub preferred_partner_email: Option<String>,
    /// Populated by `assign_teams` after a successful solve; `None` beforehand.
    pub assigned_team: Option<u32>,
}

impl Participant {
    /// A participant with no GitHub account on file. Such participants are capped
    /// at one per team (the "missing student" constraint).
    pub fn is_missing(&self) -> bool {
        self.github_username.trim().is_empty()
    }
}

/// A directed preference edge `from -> to` derived from `preferred_partner_email`,
/// over normalized participant indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreferenceEdge {
    pub from: usize,
    pub to: usize,
}

/// The result of a successful solve: teams of participant indices, each team
/// already renumbered 1..=K by first-appearance order, in input order within
/// the team.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Partition {
    pub teams: Vec<Vec<usize>>,
}

impl Partition {
    pub fn empty() -> Self {
        Partition { teams: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}
