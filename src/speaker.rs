//! Speaker resolution: anonymous diarization labels → member ids.
//!
//! Diarization assigns channel labels ("SPEAKER_00") with no identity
//! information. Four independent heuristics each produce a partial
//! mapping from behavioral evidence, and the mappings are folded under
//! a fixed priority:
//!
//! ```text
//! portfolio fingerprinting  <  self-reference  <  recognition chaining  <  chair detection
//! ```
//!
//! Later mappings overwrite earlier ones for the same label, so the
//! priority is a visible property of the fold order rather than ad hoc
//! overwriting. Labels bound to conflicting identities by two or more
//! heuristics are logged with every candidate before the fold decides.
//! Bindings below the confidence threshold are dropped after the fold.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::registry::Registry;
use crate::resolver::{normalize, AliasIndex};
use crate::transcript::{Segment, Transcript};
use crate::types::Confidence;

/// Which heuristic produced a binding. Variants are ordered by merge
/// priority, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeakerMethod {
    /// Topic keywords matched a member's current portfolios.
    PortfolioFingerprinting,
    /// Self-referential language (reserved extension point).
    SelfReference,
    /// A recognition phrase chained to the next substantial turn.
    RecognitionChaining,
    /// Procedural chair language bound to the presiding officer.
    ChairDetection,
}

impl SpeakerMethod {
    /// Label string used in exports and logs.
    #[must_use]
    pub fn as_label(&self) -> &'static str {
        match self {
            SpeakerMethod::PortfolioFingerprinting => "portfolio_fingerprinting",
            SpeakerMethod::SelfReference => "self_reference",
            SpeakerMethod::RecognitionChaining => "recognition_chaining",
            SpeakerMethod::ChairDetection => "chair_detection",
        }
    }
}

/// A single diarization-label binding. One per unique label per
/// transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeakerResolution {
    /// The diarization label, e.g. "SPEAKER_00".
    pub speaker_label: String,
    /// Resolved member id.
    pub member_id: Option<String>,
    /// Binding confidence.
    pub confidence: Confidence,
    /// Which heuristic produced the binding.
    pub method: SpeakerMethod,
    /// Supporting evidence strings for review.
    pub evidence: Vec<String>,
}

/// Speaker resolver configuration. All fields have defaults; the
/// portfolio constants are empirical and deliberately tunable.
#[derive(Debug, Clone)]
pub struct SpeakerConfig {
    /// Bindings below this confidence are dropped after the merge.
    pub confidence_threshold: f64,
    /// Minimum topic keyword hits before portfolio fingerprinting
    /// binds a label.
    pub min_topic_hits: usize,
    /// Confidence cap for portfolio fingerprinting, kept well below
    /// the other heuristics.
    pub topic_confidence_cap: f64,
    /// How many segments recognition chaining looks ahead.
    pub lookahead: usize,
    /// A turn with more words than this counts as substantial.
    pub substantial_words: usize,
}

impl Default for SpeakerConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            min_topic_hits: 3,
            topic_confidence_cap: 0.6,
            lookahead: 3,
            substantial_words: 10,
        }
    }
}

// =============================================================================
// Pattern tables
// =============================================================================

/// Procedural chair language.
static CHAIR_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        (
            "chair-recognizes",
            Regex::new(r"(?i)\bthe\s+chair\s+recogni[sz]es?\b").unwrap(),
        ),
        (
            "i-recognize",
            Regex::new(r"(?i)\bi\s+recogni[sz]e\s+the\s+(?:honou?rable|hon\.?|member)\b").unwrap(),
        ),
        (
            "speaker-yields",
            Regex::new(r"(?i)\b(?:madam|mr\.?)\s+speaker\s+(?:yields|recogni[sz]es)\b").unwrap(),
        ),
        (
            "has-the-floor",
            Regex::new(r"(?i)\bthe\s+(?:member|minister)\s+(?:has|will\s+have)\s+the\s+floor\b")
                .unwrap(),
        ),
        ("order-order", Regex::new(r"(?i)\border,?\s+order\b").unwrap()),
        (
            "house-to-order",
            Regex::new(
                r"(?i)\bthe\s+house\s+(?:will\s+(?:come\s+to\s+)?order|is\s+now\s+in\s+session)\b",
            )
            .unwrap(),
        ),
    ]
});

/// Capitalized word run for recognized names/constituencies/titles,
/// allowing lowercase connectors ("Minister of Finance", "Exumas and
/// Ragged Island").
const RECOGNIZED_RUN: &str = r"[A-Z][A-Za-z']*(?:,?\s+(?:(?:of|for|and|the)\s+)?[A-Z][A-Za-z']*)*";

/// Explicit recognition phrases with a capture for who was recognized.
static RECOGNITION_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        (
            "chair-recognizes",
            Regex::new(&format!(
                r"(?:[Tt]he\s+Chair|I)\s+recogni[sz]es?\s+(?:the\s+)?(?:Honou?rable\s+|Honorable\s+|Hon\.?\s+)?(?:Member\s+for\s+|Minister\s+of\s+|Minister\s+for\s+)?({RECOGNIZED_RUN})"
            ))
            .unwrap(),
        ),
        (
            "has-the-floor",
            Regex::new(&format!(
                r"(?:[Tt]he\s+)?(?:Honou?rable|Honorable|Hon\.?)\s+({RECOGNIZED_RUN})\s+(?:has|will\s+have)\s+the\s+floor"
            ))
            .unwrap(),
        ),
    ]
});

/// Portfolio-title fragment → topic keywords. Single terms match whole
/// words; phrases (containing a space) match as substrings.
const TOPIC_KEYWORDS: &[(&str, &[&str])] = &[
    ("finance", &["budget", "finance", "tax", "revenue"]),
    ("tourism", &["tourism", "tourist", "visitors"]),
    ("foreign affairs", &["foreign", "international", "diplomatic"]),
    ("health", &["health", "hospital", "medical"]),
    ("education", &["education", "school", "students"]),
    ("transport", &["transport", "airport", "aviation", "airline"]),
    ("aviation", &["airport", "aviation", "airline"]),
    ("agriculture", &["agriculture", "farmers", "fisheries", "farming"]),
    ("marine", &["marine", "fisheries", "fishing"]),
    ("housing", &["housing", "mortgage", "residential"]),
    (
        "national security",
        &["national security", "crime", "police", "law enforcement"],
    ),
    ("youth", &["youth", "sports", "culture"]),
    ("labour", &["labour", "workers", "wages", "unions"]),
    ("environment", &["environment", "climate", "pollution"]),
    ("energy", &["energy", "electricity", "power", "solar"]),
    ("immigration", &["immigration", "migrants", "deportation"]),
    ("social services", &["social services", "welfare", "assistance"]),
    ("disaster", &["disaster", "hurricane", "emergency", "reconstruction"]),
    ("works", &["infrastructure", "roads", "utilities", "construction"]),
];

// =============================================================================
// Resolver
// =============================================================================

/// Resolves diarization labels to member ids via behavioral heuristics.
///
/// Shares the registry's alias index with the alias resolver; holds no
/// per-transcript state, so one instance can serve many transcripts.
pub struct SpeakerResolver {
    registry: Arc<Registry>,
    index: Arc<AliasIndex>,
    config: SpeakerConfig,
    constituency_to_member: HashMap<String, String>,
    name_to_member: HashMap<String, String>,
}

impl SpeakerResolver {
    /// Create a resolver with default configuration.
    #[must_use]
    pub fn new(registry: Arc<Registry>) -> Self {
        let index = Arc::new(AliasIndex::build(&registry));
        Self::with_index(registry, index, SpeakerConfig::default())
    }

    /// Create a resolver sharing a prebuilt alias index.
    #[must_use]
    pub fn with_index(
        registry: Arc<Registry>,
        index: Arc<AliasIndex>,
        config: SpeakerConfig,
    ) -> Self {
        let mut constituency_to_member = HashMap::new();
        let mut name_to_member = HashMap::new();
        for member in &registry.members {
            constituency_to_member.insert(member.constituency.to_lowercase(), member.id.clone());
            name_to_member.insert(member.common_name.to_lowercase(), member.id.clone());
        }
        Self {
            registry,
            index,
            config,
            constituency_to_member,
            name_to_member,
        }
    }

    /// Resolve all diarization labels in a transcript.
    ///
    /// Heuristics run independently, the partial mappings are folded in
    /// priority order, conflicts are logged, and bindings below the
    /// confidence threshold are dropped. An empty transcript is a
    /// boundary error.
    pub fn resolve_speakers(
        &self,
        transcript: &Transcript,
    ) -> crate::error::Result<HashMap<String, SpeakerResolution>> {
        if transcript.segments.is_empty() {
            return Err(crate::error::Error::invalid_input(format!(
                "transcript '{}' has no segments",
                transcript.session_id
            )));
        }
        let segments = &transcript.segments;

        let staged: Vec<(SpeakerMethod, HashMap<String, SpeakerResolution>)> = vec![
            (
                SpeakerMethod::PortfolioFingerprinting,
                self.resolve_by_portfolio(segments),
            ),
            (
                SpeakerMethod::SelfReference,
                self.resolve_by_self_reference(segments),
            ),
            (
                SpeakerMethod::RecognitionChaining,
                self.resolve_by_recognition(segments),
            ),
            (SpeakerMethod::ChairDetection, self.detect_chair(segments)),
        ];

        self.log_conflicts(&staged);

        let mut merged: HashMap<String, SpeakerResolution> = HashMap::new();
        for (_, mapping) in staged {
            merged.extend(mapping);
        }

        merged.retain(|label, resolution| {
            let keep = resolution
                .confidence
                .meets(self.config.confidence_threshold);
            if keep {
                log::info!(
                    "Resolved {} -> {} (confidence {:.2}, method {})",
                    label,
                    resolution.member_id.as_deref().unwrap_or("?"),
                    resolution.confidence.get(),
                    resolution.method.as_label()
                );
            } else {
                log::debug!(
                    "Dropped low-confidence binding {} -> {:?} ({:.2})",
                    label,
                    resolution.member_id,
                    resolution.confidence.get()
                );
            }
            keep
        });
        Ok(merged)
    }

    /// Rewrite segment speaker ids for every resolved label, so mention
    /// extraction sees member ids instead of channel labels.
    pub fn apply_resolutions(
        &self,
        transcript: &mut Transcript,
        resolutions: &HashMap<String, SpeakerResolution>,
    ) {
        for segment in &mut transcript.segments {
            if let Some(resolution) = resolutions.get(&segment.speaker_label) {
                if let Some(id) = &resolution.member_id {
                    segment.speaker_id = Some(id.clone());
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Heuristic 1: chair detection
    // -------------------------------------------------------------------------

    /// Score each label by procedural-chair phrase occurrences; the top
    /// scorer binds to the presiding officer, a clear second (score
    /// >= 2) to the deputy. Confidence scales with hit count, capped
    /// below 1.0.
    fn detect_chair(&self, segments: &[Segment]) -> HashMap<String, SpeakerResolution> {
        let mut scores: HashMap<&str, usize> = HashMap::new();
        let mut evidence: HashMap<&str, Vec<String>> = HashMap::new();

        for segment in segments {
            let label = segment.speaker_label.as_str();
            if label.is_empty() {
                continue;
            }
            for (name, pattern) in CHAIR_PATTERNS.iter() {
                let hits = pattern.find_iter(&segment.text).count();
                if hits > 0 {
                    *scores.entry(label).or_default() += hits;
                    evidence
                        .entry(label)
                        .or_default()
                        .push(format!("Chair pattern '{name}' matched {hits} time(s)"));
                }
            }
        }

        let mut ranked: Vec<(&str, usize)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

        let mut resolutions = HashMap::new();
        let Some(&(primary, primary_score)) = ranked.first() else {
            return resolutions;
        };

        if let Some(speaker) = self.registry.presiding_officer() {
            let confidence = (0.6 + primary_score as f64 / 10.0).min(0.9);
            let mut ev = evidence.remove(primary).unwrap_or_default();
            ev.truncate(5);
            resolutions.insert(
                primary.to_string(),
                SpeakerResolution {
                    speaker_label: primary.to_string(),
                    member_id: Some(speaker.id.clone()),
                    confidence: Confidence::saturating(confidence),
                    method: SpeakerMethod::ChairDetection,
                    evidence: ev,
                },
            );
        }

        if let (Some(&(secondary, secondary_score)), Some(deputy)) =
            (ranked.get(1), self.registry.deputy_presiding_officer())
        {
            if secondary_score >= 2 {
                let confidence = (0.5 + secondary_score as f64 / 15.0).min(0.8);
                let mut ev = evidence.remove(secondary).unwrap_or_default();
                ev.truncate(5);
                resolutions.insert(
                    secondary.to_string(),
                    SpeakerResolution {
                        speaker_label: secondary.to_string(),
                        member_id: Some(deputy.id.clone()),
                        confidence: Confidence::saturating(confidence),
                        method: SpeakerMethod::ChairDetection,
                        evidence: ev,
                    },
                );
            }
        }

        resolutions
    }

    // -------------------------------------------------------------------------
    // Heuristic 2: recognition chaining
    // -------------------------------------------------------------------------

    /// When the chair recognizes someone, the next substantial turn
    /// from a different label is very likely that person. Confidence
    /// decays with look-ahead distance; brief interjections and the
    /// recognizing label's own segments are skipped but still consume
    /// distance.
    fn resolve_by_recognition(&self, segments: &[Segment]) -> HashMap<String, SpeakerResolution> {
        const DECAY: &[f64] = &[0.75, 0.65, 0.55];

        let mut resolutions = HashMap::new();
        for (i, segment) in segments.iter().enumerate() {
            let recognized = RECOGNITION_PATTERNS.iter().find_map(|(_, pattern)| {
                pattern
                    .captures(&segment.text)
                    .and_then(|c| c.get(1))
                    .map(|g| g.as_str().trim().to_string())
            });
            let Some(recognized_text) = recognized else {
                continue;
            };
            let Some(member_id) = self.resolve_recognized(&recognized_text) else {
                log::debug!("Recognition phrase '{recognized_text}' did not resolve");
                continue;
            };

            for offset in 1..=self.config.lookahead.min(DECAY.len()) {
                let Some(next) = segments.get(i + offset) else {
                    break;
                };
                let label = next.speaker_label.as_str();
                if label.is_empty()
                    || label == segment.speaker_label
                    || next.word_count() <= self.config.substantial_words
                {
                    continue;
                }
                let confidence = DECAY[offset - 1];
                resolutions.insert(
                    label.to_string(),
                    SpeakerResolution {
                        speaker_label: label.to_string(),
                        member_id: Some(member_id.clone()),
                        confidence: Confidence::saturating(confidence),
                        method: SpeakerMethod::RecognitionChaining,
                        evidence: vec![
                            format!("Recognized as '{recognized_text}' in segment {i}"),
                            format!(
                                "Began speaking in segment {} with {} words",
                                i + offset,
                                next.word_count()
                            ),
                        ],
                    },
                );
                break;
            }
        }
        resolutions
    }

    /// Resolve a recognized entity (name, constituency, or title) to a
    /// member id using the same registry lookups as alias resolution,
    /// with a length-guarded partial-match fallback.
    fn resolve_recognized(&self, text: &str) -> Option<String> {
        let needle = normalize(text);
        if needle.is_empty() {
            return None;
        }

        // Exact alias index hit (covers titles like "Deputy Prime
        // Minister" and honorific name forms).
        if let Some(claimants) = self.index.claimants(&needle) {
            let mut ids: Vec<&String> = claimants.iter().collect();
            ids.sort_unstable();
            return ids.first().map(|id| (*id).clone());
        }

        if let Some(id) = self.constituency_to_member.get(&needle) {
            return Some(id.clone());
        }
        if let Some(id) = self.name_to_member.get(&needle) {
            return Some(id.clone());
        }

        // Partial containment, guarded so short fragments cannot hit
        // spuriously.
        if needle.len() >= 4 {
            let mut partial: Vec<&String> = self
                .constituency_to_member
                .iter()
                .filter(|(constituency, _)| {
                    constituency.len() >= 4
                        && (constituency.contains(&needle) || needle.contains(constituency.as_str()))
                })
                .map(|(_, id)| id)
                .collect();
            partial.sort_unstable();
            if let Some(id) = partial.first() {
                return Some((*id).clone());
            }

            let mut partial: Vec<&String> = self
                .name_to_member
                .iter()
                .filter(|(name, _)| {
                    name.len() >= 4 && (name.contains(&needle) || needle.contains(name.as_str()))
                })
                .map(|(_, id)| id)
                .collect();
            partial.sort_unstable();
            if let Some(id) = partial.first() {
                return Some((*id).clone());
            }
        }

        None
    }

    // -------------------------------------------------------------------------
    // Heuristic 3: self-reference (reserved)
    // -------------------------------------------------------------------------

    /// Reserved extension point: binding labels from self-referential
    /// language ("as the Member for X, I..."). Currently produces no
    /// bindings; it keeps its slot in the merge order so adding it
    /// later cannot silently change priorities.
    fn resolve_by_self_reference(&self, _segments: &[Segment]) -> HashMap<String, SpeakerResolution> {
        HashMap::new()
    }

    // -------------------------------------------------------------------------
    // Heuristic 4: portfolio fingerprinting
    // -------------------------------------------------------------------------

    /// Match discussion topics against members' current portfolio
    /// titles. A weak signal: whole-word keyword counts, a minimum hit
    /// floor, and a confidence cap well below the other heuristics.
    fn resolve_by_portfolio(&self, segments: &[Segment]) -> HashMap<String, SpeakerResolution> {
        // member id -> keywords, from current (open-ended) portfolios.
        let mut member_keywords: HashMap<&str, Vec<&'static str>> = HashMap::new();
        for member in &self.registry.members {
            for tenure in &member.portfolios {
                if tenure.end_date.is_some() {
                    continue;
                }
                let title = tenure.title.to_lowercase();
                for (fragment, keywords) in TOPIC_KEYWORDS {
                    if title.contains(fragment) {
                        member_keywords
                            .entry(member.id.as_str())
                            .or_default()
                            .extend_from_slice(keywords);
                    }
                }
            }
        }
        for keywords in member_keywords.values_mut() {
            keywords.sort_unstable();
            keywords.dedup();
        }

        // (label, member) -> keyword hit count.
        let mut scores: HashMap<&str, HashMap<&str, usize>> = HashMap::new();
        for segment in segments {
            let label = segment.speaker_label.as_str();
            if label.is_empty() {
                continue;
            }
            let text = segment.text.to_lowercase();
            for (member_id, keywords) in &member_keywords {
                let hits: usize = keywords.iter().map(|kw| count_keyword(&text, kw)).sum();
                if hits > 0 {
                    *scores.entry(label).or_default().entry(*member_id).or_default() += hits;
                }
            }
        }

        let mut resolutions = HashMap::new();
        for (label, member_scores) in scores {
            let mut ranked: Vec<(&str, usize)> = member_scores.into_iter().collect();
            ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
            let Some(&(member_id, score)) = ranked.first() else {
                continue;
            };
            if score < self.config.min_topic_hits {
                continue;
            }
            let confidence = (0.3 + score as f64 / 20.0).min(self.config.topic_confidence_cap);
            resolutions.insert(
                label.to_string(),
                SpeakerResolution {
                    speaker_label: label.to_string(),
                    member_id: Some(member_id.to_string()),
                    confidence: Confidence::saturating(confidence),
                    method: SpeakerMethod::PortfolioFingerprinting,
                    evidence: vec![format!("Portfolio keywords matched {score} time(s)")],
                },
            );
        }
        resolutions
    }

    // -------------------------------------------------------------------------
    // Conflict logging
    // -------------------------------------------------------------------------

    fn log_conflicts(&self, staged: &[(SpeakerMethod, HashMap<String, SpeakerResolution>)]) {
        let mut by_label: HashMap<&str, Vec<&SpeakerResolution>> = HashMap::new();
        for (_, mapping) in staged {
            for resolution in mapping.values() {
                by_label
                    .entry(resolution.speaker_label.as_str())
                    .or_default()
                    .push(resolution);
            }
        }

        for (label, candidates) in by_label {
            let mut ids: Vec<&str> = candidates
                .iter()
                .filter_map(|r| r.member_id.as_deref())
                .collect();
            ids.sort_unstable();
            ids.dedup();
            if ids.len() < 2 {
                continue;
            }
            // The fold takes the highest-priority stage; candidates
            // arrive in fold order, so the last one wins.
            let winner = candidates.last().expect("non-empty by construction");
            let listing: Vec<String> = candidates
                .iter()
                .map(|r| {
                    format!(
                        "{}={} ({:.2})",
                        r.method.as_label(),
                        r.member_id.as_deref().unwrap_or("?"),
                        r.confidence.get()
                    )
                })
                .collect();
            log::warn!(
                "Conflict for {label}: multiple heuristics disagree [{}]. Resolution: {} via {}",
                listing.join(", "),
                winner.member_id.as_deref().unwrap_or("?"),
                winner.method.as_label()
            );
        }
    }
}

/// Count keyword occurrences in lowercased text: whole words for single
/// terms, substring matches for phrases.
fn count_keyword(text: &str, keyword: &str) -> usize {
    if keyword.contains(' ') {
        text.matches(keyword).count()
    } else {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|word| *word == keyword)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{
        Member, MemberKind, Party, PortfolioTenure, RegistryMetadata, SeatStatus,
    };
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn member(id: &str, common: &str, constituency: &str) -> Member {
        Member {
            id: id.into(),
            full_name: common.into(),
            common_name: common.into(),
            party: Party::PLP,
            constituency: constituency.into(),
            is_cabinet: false,
            is_opposition_frontbench: false,
            kind: MemberKind::Debater,
            seat_status: SeatStatus::Active,
            first_elected: None,
            portfolios: vec![],
            aliases: vec![common.into()],
            special_roles: vec![],
            notes: None,
        }
    }

    fn test_registry() -> Arc<Registry> {
        let mut deveaux = member("mp_deveaux_patricia", "Patricia Deveaux", "Bamboo Town");
        deveaux.kind = MemberKind::Control;
        deveaux.special_roles.push("Speaker of the House".into());

        let mut moxey = member("mp_moxey_sylvanus", "Sylvanus Moxey", "West Grand Bahama");
        moxey.special_roles.push("Deputy Speaker".into());

        let munroe = member("mp_munroe_wayne", "Wayne Munroe", "Freetown");
        let mitchell = member("mp_mitchell_fred", "Fred Mitchell", "Fox Hill");
        let cooper = member(
            "mp_cooper_chester",
            "Chester Cooper",
            "The Exumas and Ragged Island",
        );

        let mut halkitis = member("mp_halkitis_michael", "Michael Halkitis", "Golden Isles");
        halkitis.portfolios.push(PortfolioTenure {
            title: "Minister of Economic Affairs and Finance".into(),
            short_title: "Minister of Finance".into(),
            start_date: ymd(2021, 9, 17),
            end_date: None,
        });

        let mut coleby = member("mp_coleby_davis_jobeth", "JoBeth Coleby-Davis", "Elizabeth");
        coleby.portfolios.push(PortfolioTenure {
            title: "Minister of Housing and Urban Renewal".into(),
            short_title: "Minister of Housing".into(),
            start_date: ymd(2021, 9, 17),
            end_date: None,
        });

        Arc::new(Registry {
            metadata: RegistryMetadata {
                version: "test".into(),
                parliament: "14th".into(),
                parliament_start: "2021-10-06".into(),
                total_seats: 39,
                last_updated: "2024-01-01".into(),
                compiled_by: None,
                source_document: None,
            },
            members: vec![deveaux, moxey, munroe, mitchell, cooper, halkitis, coleby],
            deceased_members: vec![],
            alias_collisions: vec![],
            geographic_index: None,
        })
    }

    fn seg(label: &str, text: &str, start: f64, end: f64) -> Segment {
        Segment {
            speaker_label: label.into(),
            speaker_id: None,
            start_time: start,
            end_time: end,
            text: text.into(),
            confidence: 1.0,
            exclude_from_extraction: false,
        }
    }

    fn transcript(segments: Vec<Segment>) -> Transcript {
        Transcript {
            session_id: "test-session".into(),
            segments,
        }
    }

    fn resolver() -> SpeakerResolver {
        SpeakerResolver::new(test_registry())
    }

    fn chair_transcript() -> Transcript {
        transcript(vec![
            seg("SPEAKER_00", "The Chair recognizes the Member for Fox Hill.", 0.0, 3.0),
            seg(
                "SPEAKER_01",
                "Thank you Madam Speaker. I rise today to speak on the matters before this House.",
                3.5,
                10.0,
            ),
            seg("SPEAKER_00", "Order, order. The House will come to order.", 10.5, 13.0),
            seg("SPEAKER_00", "The Member has the floor.", 13.5, 15.0),
        ])
    }

    #[test]
    fn chair_detected_from_procedural_language() {
        let resolutions = resolver().resolve_speakers(&chair_transcript()).unwrap();
        let chair = resolutions.get("SPEAKER_00").expect("chair must resolve");
        assert_eq!(chair.member_id.as_deref(), Some("mp_deveaux_patricia"));
        assert_eq!(chair.method, SpeakerMethod::ChairDetection);
        assert!(chair.confidence.get() >= 0.6);
        assert!(chair.confidence.get() < 1.0);
        assert!(!chair.evidence.is_empty());
    }

    #[test]
    fn repeated_procedural_phrases_bind_chair_with_solid_confidence() {
        // Three chair phrases on one label, nothing comparable
        // elsewhere -> presiding officer at confidence >= 0.6.
        let t = transcript(vec![
            seg("SPEAKER_00", "The Chair recognizes the Member for Fox Hill.", 0.0, 3.0),
            seg("SPEAKER_00", "Order, order.", 3.0, 4.0),
            seg("SPEAKER_00", "The House will come to order.", 4.0, 6.0),
            seg("SPEAKER_01", "Thank you. I want to speak about the roads in my area today, at length.", 6.0, 12.0),
        ]);
        let resolutions = resolver().resolve_speakers(&t).unwrap();
        let chair = resolutions.get("SPEAKER_00").unwrap();
        assert_eq!(chair.member_id.as_deref(), Some("mp_deveaux_patricia"));
        assert!(chair.confidence.get() >= 0.6);
    }

    #[test]
    fn recognition_chains_to_next_substantial_turn() {
        let resolutions = resolver().resolve_speakers(&chair_transcript()).unwrap();
        let chained = resolutions.get("SPEAKER_01").expect("chained label");
        assert_eq!(chained.member_id.as_deref(), Some("mp_mitchell_fred"));
        assert_eq!(chained.method, SpeakerMethod::RecognitionChaining);
        assert_eq!(chained.confidence.get(), 0.75);
    }

    #[test]
    fn recognition_by_constituency() {
        let t = transcript(vec![
            seg("SPEAKER_00", "The Chair recognises the Honourable Member for Freetown.", 0.0, 3.0),
            seg(
                "SPEAKER_01",
                "Thank you Madam Speaker. I rise to discuss infrastructure development in my constituency.",
                3.5,
                10.0,
            ),
        ]);
        let resolutions = resolver().resolve_speakers(&t).unwrap();
        assert_eq!(
            resolutions.get("SPEAKER_01").unwrap().member_id.as_deref(),
            Some("mp_munroe_wayne")
        );
    }

    #[test]
    fn recognition_trailing_clause_not_captured() {
        let t = transcript(vec![
            seg("SPEAKER_00", "I recognize the Member for Golden Isles to speak on this matter.", 0.0, 3.0),
            seg(
                "SPEAKER_01",
                "Thank you Madam Speaker. I want to address the important legislation before us today.",
                3.5,
                10.0,
            ),
        ]);
        let resolutions = resolver().resolve_speakers(&t).unwrap();
        assert_eq!(
            resolutions.get("SPEAKER_01").unwrap().member_id.as_deref(),
            Some("mp_halkitis_michael")
        );
    }

    #[test]
    fn recognition_decays_over_interjections() {
        let t = transcript(vec![
            seg("SPEAKER_00", "The Chair recognizes the Member for Freetown.", 0.0, 3.0),
            seg("SPEAKER_03", "Order!", 3.5, 4.0),
            seg(
                "SPEAKER_01",
                "Thank you Madam Speaker. I rise to discuss infrastructure development in my constituency.",
                4.5,
                10.0,
            ),
        ]);
        let resolutions = resolver().resolve_speakers(&t).unwrap();
        let chained = resolutions.get("SPEAKER_01").unwrap();
        assert_eq!(chained.member_id.as_deref(), Some("mp_munroe_wayne"));
        assert_eq!(chained.confidence.get(), 0.65);
    }

    #[test]
    fn recognition_decays_twice_at_third_lookahead() {
        let t = transcript(vec![
            seg("SPEAKER_00", "The Chair recognizes the Member for Freetown.", 0.0, 3.0),
            seg("SPEAKER_03", "Order!", 3.5, 4.0),
            seg("SPEAKER_04", "Hear, hear!", 4.2, 4.5),
            seg(
                "SPEAKER_01",
                "Thank you Madam Speaker. I rise to discuss infrastructure development in my constituency.",
                5.0,
                12.0,
            ),
        ]);
        let resolutions = resolver().resolve_speakers(&t).unwrap();
        let chained = resolutions.get("SPEAKER_01").unwrap();
        assert_eq!(chained.member_id.as_deref(), Some("mp_munroe_wayne"));
        assert_eq!(chained.confidence.get(), 0.55);
    }

    #[test]
    fn recognition_skips_recognizing_labels_own_segments() {
        let t = transcript(vec![
            seg("SPEAKER_00", "The Chair recognizes the Member for Freetown.", 0.0, 3.0),
            seg(
                "SPEAKER_00",
                "Order, order. The member has the floor and should be heard by everyone present.",
                3.5,
                7.0,
            ),
            seg(
                "SPEAKER_01",
                "Thank you Madam Speaker. I rise to discuss infrastructure development in my constituency.",
                7.5,
                14.0,
            ),
        ]);
        let resolutions = resolver().resolve_speakers(&t).unwrap();
        let chained = resolutions.get("SPEAKER_01").unwrap();
        assert_eq!(chained.member_id.as_deref(), Some("mp_munroe_wayne"));
        assert_eq!(chained.confidence.get(), 0.65);
    }

    #[test]
    fn recognition_nothing_beyond_lookahead() {
        let t = transcript(vec![
            seg("SPEAKER_00", "The Chair recognizes the Member for Freetown.", 0.0, 3.0),
            seg("SPEAKER_03", "Order!", 3.5, 4.0),
            seg("SPEAKER_04", "Hear, hear!", 4.2, 4.5),
            seg("SPEAKER_05", "Point of order!", 4.6, 5.0),
            seg(
                "SPEAKER_01",
                "Thank you Madam Speaker. I rise to discuss infrastructure development in my constituency.",
                5.5,
                12.0,
            ),
        ]);
        let resolutions = resolver().resolve_speakers(&t).unwrap();
        // The substantial turn sits at i+4, past the window.
        assert!(resolutions
            .get("SPEAKER_01")
            .map_or(true, |r| r.method != SpeakerMethod::RecognitionChaining));
    }

    #[test]
    fn recognition_by_title_via_alias_index() {
        let t = transcript(vec![
            seg("SPEAKER_00", "The Honourable Minister of Finance has the floor.", 0.0, 3.0),
            seg(
                "SPEAKER_02",
                "Thank you. The budget before this House reflects our commitment to fiscal discipline and growth.",
                3.5,
                12.0,
            ),
        ]);
        let resolutions = resolver().resolve_speakers(&t).unwrap();
        assert_eq!(
            resolutions.get("SPEAKER_02").unwrap().member_id.as_deref(),
            Some("mp_halkitis_michael")
        );
    }

    #[test]
    fn portfolio_fingerprinting_binds_weakly() {
        let t = transcript(vec![seg(
            "SPEAKER_07",
            "We need more affordable housing for our people. The mortgage assistance program \
             and residential developments are priorities. Housing is a right, and housing \
             delivery must accelerate.",
            0.0,
            20.0,
        )]);
        let config = SpeakerConfig {
            confidence_threshold: 0.0,
            ..SpeakerConfig::default()
        };
        let resolver =
            SpeakerResolver::with_index(test_registry(), Arc::new(AliasIndex::build(&test_registry())), config);
        let resolutions = resolver.resolve_speakers(&t).unwrap();
        let binding = resolutions.get("SPEAKER_07").expect("portfolio binding");
        assert_eq!(binding.member_id.as_deref(), Some("mp_coleby_davis_jobeth"));
        assert_eq!(binding.method, SpeakerMethod::PortfolioFingerprinting);
        assert!(binding.confidence.get() < 0.7);
    }

    #[test]
    fn portfolio_respects_min_hit_floor() {
        let t = transcript(vec![seg(
            "SPEAKER_07",
            "One brief word about housing and nothing else of relevance to anyone here.",
            0.0,
            5.0,
        )]);
        let config = SpeakerConfig {
            confidence_threshold: 0.0,
            ..SpeakerConfig::default()
        };
        let resolver =
            SpeakerResolver::with_index(test_registry(), Arc::new(AliasIndex::build(&test_registry())), config);
        let resolutions = resolver.resolve_speakers(&t).unwrap();
        // A single hit stays below the floor of 3.
        assert!(resolutions.get("SPEAKER_07").is_none());
    }

    #[test]
    fn keyword_matching_is_whole_word() {
        assert_eq!(count_keyword("tax taxes taxation tax", "tax"), 2);
        assert_eq!(count_keyword("the budget and budgets", "budget"), 1);
        assert_eq!(count_keyword("national security is paramount", "national security"), 1);
        assert_eq!(count_keyword("internationally", "national security"), 0);
    }

    #[test]
    fn merge_priority_chair_overrides_portfolio() {
        // SPEAKER_00 emits chair language and housing keywords; chair
        // detection has priority in the fold.
        let t = transcript(vec![
            seg(
                "SPEAKER_00",
                "Order, order. The House will come to order. The Chair recognizes the Member for Elizabeth.",
                0.0,
                6.0,
            ),
            seg(
                "SPEAKER_00",
                "Housing, housing, housing. The mortgage backlog and residential permits concern this chair greatly.",
                6.0,
                12.0,
            ),
            seg(
                "SPEAKER_01",
                "Thank you Madam Speaker. Housing delivery in Elizabeth is my priority, and I will say more.",
                12.5,
                20.0,
            ),
        ]);
        let resolutions = resolver().resolve_speakers(&t).unwrap();
        let chair = resolutions.get("SPEAKER_00").unwrap();
        assert_eq!(chair.method, SpeakerMethod::ChairDetection);
        assert_eq!(chair.member_id.as_deref(), Some("mp_deveaux_patricia"));
    }

    #[test]
    fn threshold_filters_low_confidence() {
        let t = transcript(vec![seg(
            "SPEAKER_07",
            "Housing housing housing mortgage residential housing is what I will speak about now.",
            0.0,
            10.0,
        )]);
        // Default threshold 0.5; portfolio confidence for ~6 hits is
        // 0.3 + 6/20 = 0.6 capped at 0.6 -> passes. Raise the bar.
        let config = SpeakerConfig {
            confidence_threshold: 0.7,
            ..SpeakerConfig::default()
        };
        let resolver =
            SpeakerResolver::with_index(test_registry(), Arc::new(AliasIndex::build(&test_registry())), config);
        assert!(resolver.resolve_speakers(&t).unwrap().is_empty());
    }

    #[test]
    fn self_reference_slot_is_reserved_and_empty() {
        let r = resolver();
        assert!(r
            .resolve_by_self_reference(&chair_transcript().segments)
            .is_empty());
    }

    #[test]
    fn empty_transcript_is_boundary_error() {
        assert!(resolver().resolve_speakers(&transcript(vec![])).is_err());
    }

    #[test]
    fn apply_resolutions_rewrites_only_resolved_labels() {
        let mut t = chair_transcript();
        let r = resolver();
        let resolutions = r.resolve_speakers(&t).unwrap();
        assert!(resolutions.contains_key("SPEAKER_00"));

        r.apply_resolutions(&mut t, &resolutions);
        for segment in &t.segments {
            match resolutions.get(&segment.speaker_label) {
                Some(resolution) => {
                    assert_eq!(segment.speaker_id, resolution.member_id);
                }
                None => assert!(segment.speaker_id.is_none()),
            }
        }
    }

    #[test]
    fn resolve_recognized_length_guard() {
        let r = resolver();
        // Two-letter fragments must not partial-match anything.
        assert!(r.resolve_recognized("Fo").is_none());
        // Full constituency still resolves.
        assert_eq!(
            r.resolve_recognized("Fox Hill").as_deref(),
            Some("mp_mitchell_fred")
        );
        // Partial containment with the guard satisfied.
        assert_eq!(
            r.resolve_recognized("Exumas and Ragged Island").as_deref(),
            Some("mp_cooper_chester")
        );
    }
}
