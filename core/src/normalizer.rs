//! Input Normalizer: turns raw roster records into the validated, stable-indexed
//! `Vec<Participant>` the rest of the crate works with. No solver logic lives here.

use crate::models::{Modality, Participant, RawParticipant, Skills};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("participant {index} has an invalid {field} skill value {value:?} (must be an integer 0-5)")]
    InvalidSkill {
        index: usize,
        field: &'static str,
        value: String,
    },
    #[error("duplicate email {email:?}: first seen at index {first_index}, again at index {dupe_index}")]
    DuplicateEmail {
        email: String,
        first_index: usize,
        dupe_index: usize,
    },
}

fn parse_skill(index: usize, field: &'static str, raw: &str) -> Result<u8, NormalizeError> {
    let trimmed = raw.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| NormalizeError::InvalidSkill {
            index,
            field,
            value: raw.to_string(),
        })?;
    if !(0..=5).contains(&value) {
        return Err(NormalizeError::InvalidSkill {
            index,
            field,
            value: raw.to_string(),
        });
    }
    Ok(value as u8)
}

fn canonicalize_modality(raw: &str) -> Modality {
    match raw.trim() {
        "In Person" => Modality::InPerson,
        "Remote" => Modality::Remote,
        _ => Modality::NoPreference,
    }
}

fn parse_availability(raw: &str) -> std::collections::HashSet<String> {
    raw.split(',')
        .map(|token| token.trim())
        .filter(|token| !token.is_empty())
        .map(|token| token.to_string())
        .collect()
}

/// Validates and canonicalizes raw roster records.
///
/// Returns participants in the same order as `records`, with stable indices
/// `0..records.len()` that every other component (preference edges, team
/// assignment) addresses by.
pub fn normalize(records: &[RawParticipant]) -> Result<Vec<Participant>, NormalizeError> {
    let mut participants = Vec::with_capacity(records.len());
    let mut email_to_index: HashMap<String, usize> = HashMap::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        let email = record.email.trim().to_string();
        if let Some(&first_index) = email_to_index.get(&email) {
            return Err(NormalizeError::DuplicateEmail {
                email,
                first_index,
                dupe_index: index,
            });
        }
        email_to_index.insert(email.clone(), index);

        let skills = Skills {
            ruby: parse_skill(index, "ruby", &record.ruby_skill)?,
            html_css: parse_skill(index, "html_css", &record.html_css_skill)?,
            js: parse_skill(index, "js", &record.js_skill)?,
        };

        let preferred_partner_email = record
            .preferred_partner_email
            .as_deref()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        participants.push(Participant {
            id: record.id.clone(),
            name: record.name.clone(),
            email,
            github_username: record.github_username.clone(),
            skills,
            modality: canonicalize_modality(&record.modality),
            availability: parse_availability(&record.availability),
            section: record.section.trim().to_string(),
            preferred_partner_email,
            assigned_team: None,
        });
    }

    Ok(participants)
}

/// Builds the directed preference-edge list from normalized participants.
///
/// Self-edges are dropped (a participant cannot prefer themself); references to
/// an email with no matching participant are dropped silently, per spec.
pub fn preference_edges(participants: &[Participant]) -> Vec<crate::models::PreferenceEdge> {
    let email_to_index: HashMap<&str, usize> = participants
        .iter()
        .enumerate()
        .map(|(i, p)| (p.email.as_str(), i))
        .collect();

    let mut edges = Vec::new();
    for (from, participant) in participants.iter().enumerate() {
        let Some(preferred) = participant.preferred_partner_email.as_deref() else {
            continue;
        };
        let Some(&to) = email_to_index.get(preferred) else {
            continue;
        };
        if to == from {
            continue;
        }
        edges.push(crate::models::PreferenceEdge { from, to });
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(email: &str, ruby: &str, html: &str, js: &str) -> RawParticipant {
        RawParticipant {
            id: email.to_string(),
            name: email.to_string(),
            email: email.to_string(),
            github_username: "someone".to_string(),
            ruby_skill: ruby.to_string(),
            html_css_skill: html.to_string(),
            js_skill: js.to_string(),
            modality: "No Preference".to_string(),
            availability: String::new(),
            section: String::new(),
            preferred_partner_email: None,
        }
    }

    #[test]
    fn trims_and_parses_skills() {
        let mut r = raw("a@b.com", " 3 ", "4", "5");
        r.email = "  a@b.com  ".to_string();
        let out = normalize(&[r]).unwrap();
        assert_eq!(out[0].email, "a@b.com");
        assert_eq!(out[0].skills.total(), 12);
    }

    #[test]
    fn rejects_out_of_range_skill() {
        let r = raw("a@b.com", "6", "0", "0");
        let err = normalize(&[r]).unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidSkill { .. }));
    }

    #[test]
    fn rejects_unparseable_skill() {
        let r = raw("a@b.com", "high", "0", "0");
        let err = normalize(&[r]).unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidSkill { .. }));
    }

    #[test]
    fn rejects_duplicate_email() {
        let r1 = raw("dup@b.com", "1", "1", "1");
        let r2 = raw("dup@b.com", "2", "2", "2");
        let err = normalize(&[r1, r2]).unwrap_err();
        assert!(matches!(err, NormalizeError::DuplicateEmail { .. }));
    }

    #[test]
    fn empty_github_username_is_missing() {
        let mut r = raw("a@b.com", "1", "1", "1");
        r.github_username = "   ".to_string();
        let out = normalize(&[r]).unwrap();
        assert!(out[0].is_missing());
    }

    #[test]
    fn unknown_modality_becomes_no_preference() {
        let mut r = raw("a@b.com", "1", "1", "1");
        r.modality = "Hybrid".to_string();
        let out = normalize(&[r]).unwrap();
        assert_eq!(out[0].modality, Modality::NoPreference);
    }

    #[test]
    fn availability_drops_empty_tokens() {
        let mut r = raw("a@b.com", "1", "1", "1");
        r.availability = "Mon, , Wed ,".to_string();
        let out = normalize(&[r]).unwrap();
        assert_eq!(out[0].availability.len(), 2);
        assert!(out[0].availability.contains("Mon"));
        assert!(out[0].availability.contains("Wed"));
    }

    #[test]
    fn dangling_preference_is_dropped_silently() {
        let mut r1 = raw("a@b.com", "1", "1", "1");
        r1.preferred_partner_email = Some("ghost@b.com".to_string());
        let participants = normalize(&[r1]).unwrap();
        let edges = preference_edges(&participants);
        assert!(edges.is_empty());
    }

    #[test]
    fn self_preference_is_dropped() {
        let mut r1 = raw("a@b.com", "1", "1", "1");
        r1.preferred_partner_email = Some("a@b.com".to_string());
        let participants = normalize(&[r1]).unwrap();
        let edges = preference_edges(&participants);
        assert!(edges.is_empty());
    }

    #[test]
    fn raw_participant_roundtrips_through_json() {
        let json = r#"[{
            "id": "1", "name": "Alice", "email": "alice@x.com", "github_username": "alicegh",
            "ruby_skill": "4", "html_css_skill": "3", "js_skill": "2",
            "modality": "In Person", "availability": "Mon, Wed", "section": "A",
            "preferred_partner_email": "bob@x.com"
        }]"#;
        let records: Vec<RawParticipant> = serde_json::from_str(json).unwrap();
        let out = normalize(&records).unwrap();
        assert_eq!(out[0].skills.total(), 9);
        assert_eq!(out[0].modality, Modality::InPerson);
    }

    #[test]
    fn valid_preference_edge_is_kept() {
        let mut r1 = raw("a@b.com", "1", "1", "1");
        r1.preferred_partner_email = Some("b@b.com".to_string());
        let r2 = raw("b@b.com", "1", "1", "1");
        let participants = normalize(&[r1, r2]).unwrap();
        let edges = preference_edges(&participants);
        assert_eq!(edges, vec![crate::models::PreferenceEdge { from: 0, to: 1 }]);
    }
}
