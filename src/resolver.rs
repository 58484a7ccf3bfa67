//! Alias resolution: raw mention text → canonical member identity.
//!
//! The resolver runs a three-stage cascade over an inverted alias index
//! built once per registry load:
//!
//! 1. **Exact** — normalized lookup, temporally filtered when a
//!    reference date is supplied. Unambiguous hit → confidence 1.0.
//!    Colliding aliases resolve deterministically with a warning.
//! 2. **Fuzzy** — only when the exact stage is empty. A unique partial
//!    constituency match scores 0.95; otherwise the best token-sort
//!    ratio above the threshold (default 0.85) wins with the score as
//!    confidence.
//! 3. **Unresolved** — confidence 0.0, appended to the per-instance
//!    unresolved log for human review.
//!
//! No stage raises on empty or garbage input; everything degrades to
//! unresolved. The index and registry are immutable after construction
//! and may be shared across per-transcript workers; the unresolved log
//! is per-instance.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::dialect;
use crate::error::Result;
use crate::registry::Registry;
use crate::similarity::{edit_distance, token_sort_ratio};
use crate::types::{Confidence, MentionClass, ResolutionMethod};

/// Result of a single alias resolution attempt.
///
/// Produced fresh per call and immutable; consumed into a
/// [`MentionRecord`](crate::extract::MentionRecord) or a speaker
/// binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// Resolved member id, or `None` when unresolved.
    pub member_id: Option<String>,
    /// Confidence in [0, 1]: 1.0 exact, the similarity score for fuzzy,
    /// 0.0 unresolved.
    pub confidence: Confidence,
    /// Which stage produced the result.
    pub method: ResolutionMethod,
    /// Present when the alias is claimed by more than one member.
    pub collision_warning: Option<String>,
}

impl ResolutionResult {
    fn unresolved() -> Self {
        Self {
            member_id: None,
            confidence: Confidence::NONE,
            method: ResolutionMethod::Unresolved,
            collision_warning: None,
        }
    }
}

/// One entry in the unresolved log, retained for human review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnresolvedMention {
    /// The raw text that failed to resolve.
    pub mention: String,
    /// Session the mention came from, when known.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Segment index within the session, when known.
    #[serde(default)]
    pub segment_index: Option<usize>,
    /// Reference date supplied to the resolution call.
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
    /// Surrounding context text, when known.
    #[serde(default)]
    pub context: Option<String>,
    /// Standard or deictic, when the mention came from the extractor.
    #[serde(default)]
    pub mention_class: Option<MentionClass>,
    /// Speaker of the segment containing the mention, when known.
    #[serde(default)]
    pub speaker_id: Option<String>,
    /// When the resolution attempt happened.
    pub timestamp: DateTime<Utc>,
}

/// Inverted index: normalized alias text → claiming member ids.
///
/// Built once per registry load. Case-insensitive and
/// whitespace-normalized. An alias claimed by two or more members is a
/// recorded collision.
#[derive(Debug, Clone)]
pub struct AliasIndex {
    entries: HashMap<String, Vec<String>>,
}

impl AliasIndex {
    /// Build the index from a registry's derived alias sets.
    #[must_use]
    pub fn build(registry: &Registry) -> Self {
        let mut entries: HashMap<String, Vec<String>> = HashMap::new();
        for member in &registry.members {
            for alias in member.all_aliases() {
                let normalized = normalize(&alias);
                if normalized.is_empty() {
                    continue;
                }
                let claimants = entries.entry(normalized).or_default();
                if !claimants.contains(&member.id) {
                    claimants.push(member.id.clone());
                }
            }
        }
        log::debug!(
            "Alias index built: {} unique aliases, {} collisions",
            entries.len(),
            entries.values().filter(|c| c.len() > 1).count()
        );
        Self { entries }
    }

    /// Claimants of a normalized alias.
    #[must_use]
    pub fn claimants(&self, normalized_alias: &str) -> Option<&[String]> {
        self.entries.get(normalized_alias).map(Vec::as_slice)
    }

    /// Number of unique aliases indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Aliases claimed by two or more members.
    pub fn collisions(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .filter(|(_, claimants)| claimants.len() > 1)
            .map(|(alias, claimants)| (alias.as_str(), claimants.as_slice()))
    }
}

/// Configuration for the alias resolver. All fields have defaults; none
/// are required.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Minimum token-sort similarity for a fuzzy match, in [0, 1].
    pub fuzzy_threshold: f64,
    /// Apply dialect + honorific normalization before matching.
    pub normalize_dialect: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.85,
            normalize_dialect: true,
        }
    }
}

/// Resolves raw mention strings to canonical member ids.
///
/// Holds a shared read-only registry and index plus a per-instance
/// append-only unresolved log. Create one instance per transcript
/// worker; the registry/index `Arc`s can be shared freely.
pub struct AliasResolver {
    registry: Arc<Registry>,
    index: Arc<AliasIndex>,
    config: ResolverConfig,
    unresolved: Vec<UnresolvedMention>,
}

impl AliasResolver {
    /// Create a resolver with default configuration, building a fresh
    /// index from the registry.
    #[must_use]
    pub fn new(registry: Arc<Registry>) -> Self {
        let index = Arc::new(AliasIndex::build(&registry));
        Self::with_index(registry, index, ResolverConfig::default())
    }

    /// Create a resolver sharing a prebuilt index (one index per
    /// registry load, many resolvers).
    #[must_use]
    pub fn with_index(
        registry: Arc<Registry>,
        index: Arc<AliasIndex>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            registry,
            index,
            config,
            unresolved: Vec::new(),
        }
    }

    /// The shared alias index.
    #[must_use]
    pub fn index(&self) -> &Arc<AliasIndex> {
        &self.index
    }

    /// The shared registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Resolve a raw mention to a member id.
    ///
    /// With a reference date, portfolio aliases outside their tenure
    /// window do not match. Collisions resolve to the lexicographically
    /// smallest claimant id (stable across snapshot re-orderings) and
    /// carry a warning.
    pub fn resolve(&mut self, mention: &str, on: Option<NaiveDate>) -> ResolutionResult {
        let cleaned = if self.config.normalize_dialect {
            dialect::normalize_mention(mention)
        } else {
            mention.to_string()
        };
        let normalized = normalize(&cleaned);

        if let Some(result) = self.exact_match(&normalized, on) {
            return result;
        }
        if let Some(result) = self.fuzzy_match(&normalized, on) {
            return result;
        }

        self.log_unresolved(mention, on);
        ResolutionResult::unresolved()
    }

    fn exact_match(&self, normalized: &str, on: Option<NaiveDate>) -> Option<ResolutionResult> {
        let claimants = self.index.claimants(normalized)?;

        let mut candidates: Vec<&str> = match on {
            Some(date) => claimants
                .iter()
                .filter(|id| {
                    self.registry.member(id).is_some_and(|m| {
                        m.aliases_on(date).iter().any(|a| normalize(a) == normalized)
                    })
                })
                .map(String::as_str)
                .collect(),
            None => claimants.iter().map(String::as_str).collect(),
        };

        if candidates.is_empty() {
            return None;
        }

        let collision_warning = if candidates.len() > 1 {
            let known = self
                .registry
                .alias_collisions
                .iter()
                .find(|c| normalize(&c.alias) == normalized);
            Some(match known {
                Some(c) => format!("Alias collision: {}", c.resolution_strategy),
                None => format!("Unexpected alias collision: {}", candidates.join(", ")),
            })
        } else {
            None
        };

        // Deterministic tie-break: smallest id wins.
        candidates.sort_unstable();

        Some(ResolutionResult {
            member_id: Some(candidates[0].to_string()),
            confidence: Confidence::CERTAIN,
            method: ResolutionMethod::Exact,
            collision_warning,
        })
    }

    fn fuzzy_match(&self, normalized: &str, on: Option<NaiveDate>) -> Option<ResolutionResult> {
        if normalized.is_empty() {
            return None;
        }

        if let Some(result) = self.partial_constituency_match(normalized) {
            return Some(result);
        }

        // Best (score, -edit distance, alias, id) over every indexed
        // alias, honoring the temporal filter.
        let mut best: Option<(f64, usize, String, String)> = None;
        for member in &self.registry.members {
            let aliases = match on {
                Some(date) => member.aliases_on(date),
                None => member.all_aliases(),
            };
            for alias in aliases {
                let candidate = normalize(&alias);
                let score = token_sort_ratio(normalized, &candidate);
                let distance = edit_distance(normalized, &candidate);
                let contender = (score, distance, candidate, member.id.clone());
                best = Some(match best.take() {
                    None => contender,
                    Some(current) => {
                        if better_fuzzy(&contender, &current) {
                            contender
                        } else {
                            current
                        }
                    }
                });
            }
        }

        let (score, _, _, member_id) = best?;
        if score < self.config.fuzzy_threshold {
            return None;
        }

        Some(ResolutionResult {
            member_id: Some(member_id),
            confidence: Confidence::saturating(score),
            method: ResolutionMethod::Fuzzy,
            collision_warning: None,
        })
    }

    /// "Member for <fragment>" where the fragment names part of exactly
    /// one constituency. Multi-seat constituencies are long ("Cat
    /// Island, Rum Cay and San Salvador"); speakers use fragments.
    /// Ambiguous fragments fall through to the similarity scan.
    fn partial_constituency_match(&self, normalized: &str) -> Option<ResolutionResult> {
        let fragment = normalized
            .strip_prefix("the ")
            .unwrap_or(normalized)
            .strip_prefix("member for ")?
            .trim();
        if fragment.len() < 4 {
            return None;
        }

        let mut matches: Vec<&str> = self
            .registry
            .members
            .iter()
            .filter(|m| {
                let constituency = m.constituency.to_lowercase();
                constituency.contains(fragment) || fragment.contains(&constituency)
            })
            .map(|m| m.id.as_str())
            .collect();
        matches.sort_unstable();
        matches.dedup();

        if matches.len() != 1 {
            return None;
        }

        Some(ResolutionResult {
            member_id: Some(matches[0].to_string()),
            confidence: Confidence::saturating(0.95),
            method: ResolutionMethod::Fuzzy,
            collision_warning: None,
        })
    }

    fn log_unresolved(&mut self, mention: &str, on: Option<NaiveDate>) {
        log::debug!("Unresolved mention: '{mention}'");
        self.unresolved.push(UnresolvedMention {
            mention: mention.to_string(),
            session_id: None,
            segment_index: None,
            reference_date: on,
            context: None,
            mention_class: None,
            speaker_id: None,
            timestamp: Utc::now(),
        });
    }

    /// The unresolved log accumulated by this instance.
    #[must_use]
    pub fn unresolved_log(&self) -> &[UnresolvedMention] {
        &self.unresolved
    }

    /// Write the unresolved log to a JSON file.
    pub fn save_unresolved_log(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.unresolved)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Export the inverted index with collision statistics, for
    /// inspection and curator review.
    pub fn save_index(&self, path: impl AsRef<Path>) -> Result<()> {
        #[derive(Serialize)]
        struct IndexExport<'a> {
            exported_at: DateTime<Utc>,
            total_aliases: usize,
            collision_count: usize,
            aliases: std::collections::BTreeMap<&'a str, &'a [String]>,
        }

        let aliases: std::collections::BTreeMap<&str, &[String]> = self
            .index
            .entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
            .collect();
        let export = IndexExport {
            exported_at: Utc::now(),
            total_aliases: self.index.len(),
            collision_count: self.index.collisions().count(),
            aliases,
        };
        let json = serde_json::to_string_pretty(&export)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Normalize text for index matching: trim, case-fold, collapse
/// whitespace.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Ordering for fuzzy contenders: higher score, then smaller edit
/// distance, then lexically smaller alias, then smaller id.
fn better_fuzzy(a: &(f64, usize, String, String), b: &(f64, usize, String, String)) -> bool {
    if (a.0 - b.0).abs() > 1e-9 {
        return a.0 > b.0;
    }
    if a.1 != b.1 {
        return a.1 < b.1;
    }
    if a.2 != b.2 {
        return a.2 < b.2;
    }
    a.3 < b.3
}
