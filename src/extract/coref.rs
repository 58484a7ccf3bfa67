//! Coreference resolution for deictic references.
//!
//! A deictic span ("the Member who just spoke", "my honourable friend
//! opposite") carries no name to look up; the referent comes from the
//! conversation itself. Resolution works over a bounded window of
//! preceding speaker turns:
//!
//! 1. Build the candidate pool from prior turns, excluding the current
//!    speaker (a member never refers to themselves deictically in the
//!    third person).
//! 2. If the wording implies "opposite", keep only candidates from a
//!    different party; "my … friend" without "opposite" keeps only the
//!    same party. "Opposite" wins when both appear.
//! 3. If the wording signals recency ("who just spoke", "previous
//!    speaker"), take the latest turn in the pool.
//! 4. Otherwise default to the most recent remaining candidate.
//!
//! An empty pool yields `None`; the caller logs the span as unresolved.

use crate::registry::Registry;

/// One prior turn in the conversation window, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerTurn {
    /// Speaker identity of the turn (registry id when resolved).
    pub member_id: String,
    /// Index of the segment the turn came from.
    pub segment_index: usize,
}

/// Wording cues extracted from a deictic mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AffiliationCue {
    /// "opposite" — referent sits across the aisle.
    Opposite,
    /// "my … friend" — referent shares the speaker's party.
    SameParty,
    /// No affiliation signal.
    None,
}

fn affiliation_cue(mention: &str) -> AffiliationCue {
    let lower = mention.to_lowercase();
    if lower.contains("opposite") {
        AffiliationCue::Opposite
    } else if lower.contains("friend") {
        AffiliationCue::SameParty
    } else {
        AffiliationCue::None
    }
}

fn signals_recency(mention: &str) -> bool {
    let lower = mention.to_lowercase();
    lower.contains("just spoke") || lower.contains("previous speaker") || lower.contains("who spoke")
}

/// Resolve a deictic mention against the speaker history.
///
/// `history` is oldest-first. Returns the referent's id, or `None` when
/// the pool is empty after filtering.
#[must_use]
pub fn resolve_deictic(
    mention: &str,
    speaker_id: &str,
    history: &[SpeakerTurn],
    registry: &Registry,
) -> Option<String> {
    // Never the current speaker.
    let mut pool: Vec<&SpeakerTurn> = history
        .iter()
        .filter(|turn| turn.member_id != speaker_id)
        .collect();

    match affiliation_cue(mention) {
        AffiliationCue::None => {}
        cue => {
            // Affiliation filtering needs both parties on record; when
            // the current speaker is still an anonymous label, the cue
            // cannot be applied and recency alone decides.
            if let Some(speaker) = registry.member(speaker_id) {
                pool.retain(|turn| {
                    registry.member(&turn.member_id).is_some_and(|candidate| {
                        match cue {
                            AffiliationCue::Opposite => candidate.party != speaker.party,
                            AffiliationCue::SameParty => candidate.party == speaker.party,
                            AffiliationCue::None => true,
                        }
                    })
                });
            }
        }
    }

    if pool.is_empty() {
        return None;
    }

    // Recency cues and the default heuristic both take the most recent
    // remaining turn; the distinction matters only for logging.
    let chosen = pool.last()?;
    if signals_recency(mention) {
        log::debug!(
            "Deictic '{}' resolved by recency to {} (segment {})",
            mention,
            chosen.member_id,
            chosen.segment_index
        );
    }
    Some(chosen.member_id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{
        Member, MemberKind, Party, Registry, RegistryMetadata, SeatStatus,
    };

    fn member(id: &str, party: Party) -> Member {
        Member {
            id: id.into(),
            full_name: id.into(),
            common_name: id.into(),
            party,
            constituency: format!("{id} constituency"),
            is_cabinet: false,
            is_opposition_frontbench: false,
            kind: MemberKind::Debater,
            seat_status: SeatStatus::Active,
            first_elected: None,
            portfolios: vec![],
            aliases: vec![],
            special_roles: vec![],
            notes: None,
        }
    }

    fn registry() -> Registry {
        Registry {
            metadata: RegistryMetadata {
                version: "test".into(),
                parliament: "14th".into(),
                parliament_start: "2021-10-06".into(),
                total_seats: 39,
                last_updated: "2024-01-01".into(),
                compiled_by: None,
                source_document: None,
            },
            members: vec![
                member("mp_davis_brave", Party::PLP),
                member("mp_cooper_chester", Party::PLP),
                member("mp_mitchell_fred", Party::PLP),
                member("mp_minnis_hubert", Party::FNM),
            ],
            deceased_members: vec![],
            alias_collisions: vec![],
            geographic_index: None,
        }
    }

    fn turns(ids: &[&str]) -> Vec<SpeakerTurn> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| SpeakerTurn {
                member_id: (*id).into(),
                segment_index: i,
            })
            .collect()
    }

    #[test]
    fn just_spoke_resolves_to_most_recent() {
        let registry = registry();
        let history = turns(&["mp_davis_brave", "mp_cooper_chester"]);
        let resolved = resolve_deictic(
            "the Member who just spoke",
            "mp_mitchell_fred",
            &history,
            &registry,
        );
        assert_eq!(resolved.as_deref(), Some("mp_cooper_chester"));
    }

    #[test]
    fn previous_speaker_resolves_to_most_recent() {
        let registry = registry();
        let history = turns(&["mp_davis_brave", "mp_cooper_chester"]);
        let resolved = resolve_deictic(
            "the previous speaker",
            "mp_mitchell_fred",
            &history,
            &registry,
        );
        assert_eq!(resolved.as_deref(), Some("mp_cooper_chester"));
    }

    #[test]
    fn never_returns_current_speaker() {
        let registry = registry();
        let history = turns(&["mp_davis_brave", "mp_cooper_chester"]);
        let resolved = resolve_deictic(
            "the Member who just spoke",
            "mp_cooper_chester",
            &history,
            &registry,
        );
        assert_eq!(resolved.as_deref(), Some("mp_davis_brave"));
    }

    #[test]
    fn friend_filters_to_same_party() {
        let registry = registry();
        let history = turns(&["mp_minnis_hubert", "mp_cooper_chester"]);
        // Davis (PLP) speaking; Minnis is FNM, Cooper PLP.
        let resolved = resolve_deictic(
            "my honourable friend",
            "mp_davis_brave",
            &history,
            &registry,
        );
        assert_eq!(resolved.as_deref(), Some("mp_cooper_chester"));

        let history = turns(&["mp_cooper_chester", "mp_minnis_hubert"]);
        let resolved = resolve_deictic(
            "my honourable friend",
            "mp_davis_brave",
            &history,
            &registry,
        );
        // Most recent is Minnis (FNM), but the friend cue keeps PLP.
        assert_eq!(resolved.as_deref(), Some("mp_cooper_chester"));
    }

    #[test]
    fn opposite_filters_to_other_party() {
        let registry = registry();
        let history = turns(&["mp_cooper_chester", "mp_minnis_hubert"]);
        let resolved = resolve_deictic(
            "the Member opposite",
            "mp_davis_brave",
            &history,
            &registry,
        );
        assert_eq!(resolved.as_deref(), Some("mp_minnis_hubert"));
    }

    #[test]
    fn opposite_wins_over_friend() {
        let registry = registry();
        let history = turns(&["mp_cooper_chester", "mp_minnis_hubert"]);
        let resolved = resolve_deictic(
            "my honourable friend opposite",
            "mp_davis_brave",
            &history,
            &registry,
        );
        assert_eq!(resolved.as_deref(), Some("mp_minnis_hubert"));
    }

    #[test]
    fn empty_history_returns_none() {
        let registry = registry();
        let resolved = resolve_deictic(
            "the Member who just spoke",
            "mp_davis_brave",
            &[],
            &registry,
        );
        assert!(resolved.is_none());
    }

    #[test]
    fn unknown_speaker_skips_affiliation_filter() {
        let registry = registry();
        let history = turns(&["mp_minnis_hubert"]);
        // Speaker is an anonymous label; "friend" cue cannot check the
        // party, so recency decides.
        let resolved = resolve_deictic("my honourable friend", "SPEAKER_03", &history, &registry);
        assert_eq!(resolved.as_deref(), Some("mp_minnis_hubert"));
    }

    #[test]
    fn filtered_pool_can_be_empty() {
        let registry = registry();
        let history = turns(&["mp_cooper_chester"]);
        // Davis (PLP) asking for "opposite" with only PLP history.
        let resolved = resolve_deictic(
            "the Member opposite",
            "mp_davis_brave",
            &history,
            &registry,
        );
        assert!(resolved.is_none());
    }
}
