//! Mention extraction: finds references to members in transcript text
//! and resolves each one to a canonical identity.
//!
//! Per segment the extractor:
//!
//! 1. skips segments flagged for exclusion upstream (audio quality) and
//!    empty segments;
//! 2. runs the deictic pattern table, then the standard pattern table
//!    and the optional pluggable name recognizer, with deictic spans
//!    taking precedence over anything they overlap and a nationality
//!    guard excluding foreign-leader forms;
//! 3. deduplicates candidate spans (start offset ascending, length
//!    descending, keep non-overlapping);
//! 4. resolves standard spans through the alias cascade and deictic
//!    spans through coreference over the preceding turn window;
//! 5. emits one [`MentionRecord`] per surviving span with interpolated
//!    timestamps, a ±1-sentence context window, and a self-reference
//!    flag; unresolved spans are appended to the per-instance log.
//!
//! A bad segment never aborts the transcript; segments are processed
//! independently.

pub mod coref;
pub mod patterns;
pub mod recognizer;

use std::path::Path;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::resolver::{AliasResolver, UnresolvedMention};
use crate::transcript::{Segment, Transcript};
use crate::types::{Confidence, MentionClass, ResolutionMethod};

use coref::SpeakerTurn;
use patterns::CandidateSpan;
use recognizer::{NameRecognizer, NoopRecognizer};

/// A single member-to-member mention extracted from a transcript.
///
/// Immutable once created; consumed by the external sentiment and
/// interaction-graph stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentionRecord {
    /// Session the mention came from.
    pub session_id: String,
    /// Who made the mention (the speaker of the segment).
    pub source_id: String,
    /// Who was mentioned, once resolved.
    pub target_id: Option<String>,
    /// Exact text as transcribed.
    pub raw_mention: String,
    /// Which stage resolved the mention.
    pub method: ResolutionMethod,
    /// Resolution confidence.
    pub confidence: Confidence,
    /// Estimated mention start, seconds from session start.
    pub timestamp_start: f64,
    /// Estimated mention end, seconds from session start.
    pub timestamp_end: f64,
    /// Surrounding text (±1 sentence) for verification.
    pub context: String,
    /// Index of the segment containing the mention.
    pub segment_index: usize,
    /// True iff the resolved target is the speaker.
    pub is_self_reference: bool,
}

/// A procedural interruption ("point of order") detected in a
/// transcript. Input for the external interaction-graph stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointOfOrderEvent {
    /// Session the event came from.
    pub session_id: String,
    /// Who rose on the point of order.
    pub source_id: String,
    /// The matched text.
    pub raw_text: String,
    /// Segment start time.
    pub start_time: f64,
    /// Segment end time.
    pub end_time: f64,
    /// Index of the segment.
    pub segment_index: usize,
}

/// Extractor configuration. All fields have defaults; none are
/// required.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// How many preceding speaker turns the coreference window holds.
    pub coref_window: usize,
    /// Confidence assigned to coreference resolutions.
    pub coref_confidence: f64,
    /// Demonym that never triggers the foreign-leader guard.
    pub home_demonym: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            coref_window: 3,
            coref_confidence: 0.7,
            home_demonym: "Bahamian".into(),
        }
    }
}

/// Extracts and resolves member mentions from diarized transcripts.
///
/// Owns its alias resolver and unresolved log; create one instance per
/// transcript worker and share the registry `Arc` between them.
pub struct MentionExtractor {
    resolver: AliasResolver,
    recognizer: Box<dyn NameRecognizer>,
    config: ExtractorConfig,
    unresolved: Vec<UnresolvedMention>,
}

impl MentionExtractor {
    /// Create an extractor with default configuration and no name
    /// recognizer.
    #[must_use]
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_config(registry, ExtractorConfig::default())
    }

    /// Create an extractor with explicit configuration.
    #[must_use]
    pub fn with_config(registry: Arc<Registry>, config: ExtractorConfig) -> Self {
        Self {
            resolver: AliasResolver::new(registry),
            recognizer: Box::new(NoopRecognizer),
            config,
            unresolved: Vec::new(),
        }
    }

    /// Attach a pluggable person-name recognizer.
    #[must_use]
    pub fn with_recognizer(mut self, recognizer: Box<dyn NameRecognizer>) -> Self {
        self.recognizer = recognizer;
        self
    }

    /// Extract all member mentions from a transcript, in segment order.
    ///
    /// `reference_date` enables temporal alias filtering (portfolio
    /// reshuffles). An empty transcript is a boundary error; a segment
    /// that yields nothing is not.
    pub fn extract_mentions(
        &mut self,
        transcript: &Transcript,
        reference_date: Option<NaiveDate>,
    ) -> Result<Vec<MentionRecord>> {
        if transcript.segments.is_empty() {
            return Err(Error::invalid_input(format!(
                "transcript '{}' has no segments",
                transcript.session_id
            )));
        }

        let mut records = Vec::new();
        for (index, segment) in transcript.segments.iter().enumerate() {
            if segment.exclude_from_extraction || segment.text.trim().is_empty() {
                continue;
            }
            records.extend(self.extract_from_segment(
                segment,
                index,
                &transcript.session_id,
                &transcript.segments,
                reference_date,
            ));
        }
        log::info!(
            "Extracted {} mentions from '{}' ({} unresolved so far)",
            records.len(),
            transcript.session_id,
            self.unresolved.len()
        );
        Ok(records)
    }

    fn extract_from_segment(
        &mut self,
        segment: &Segment,
        index: usize,
        session_id: &str,
        segments: &[Segment],
        reference_date: Option<NaiveDate>,
    ) -> Vec<MentionRecord> {
        let text = &segment.text;
        let source_id = segment.speaker_identity().to_string();

        let mut spans = patterns::detect_spans(text, &self.config.home_demonym);
        spans.extend(self.recognizer_spans(text, &spans));
        let spans = patterns::deduplicate(spans);

        let mut records = Vec::new();
        for span in spans {
            let (target_id, method, confidence) = match span.class {
                MentionClass::Standard => {
                    let result = self.resolver.resolve(&span.text, reference_date);
                    (result.member_id, result.method, result.confidence)
                }
                MentionClass::Deictic => {
                    let history = self.build_speaker_history(index, segments);
                    match coref::resolve_deictic(
                        &span.text,
                        &source_id,
                        &history,
                        self.resolver.registry(),
                    ) {
                        Some(id) => (
                            Some(id),
                            ResolutionMethod::Coreference,
                            Confidence::saturating(self.config.coref_confidence),
                        ),
                        None => (None, ResolutionMethod::Unresolved, Confidence::NONE),
                    }
                }
            };

            let context = context_window(text, span.start, span.end);
            if target_id.is_none() {
                self.log_unresolved(&span, session_id, index, &source_id, &context, reference_date);
            }

            let (timestamp_start, timestamp_end) = interpolate_timestamps(
                text,
                span.start,
                span.end,
                segment.start_time,
                segment.end_time,
            );
            let is_self_reference = target_id.as_deref() == Some(source_id.as_str());

            records.push(MentionRecord {
                session_id: session_id.to_string(),
                source_id: source_id.clone(),
                target_id,
                raw_mention: span.text,
                method,
                confidence,
                timestamp_start,
                timestamp_end,
                context,
                segment_index: index,
                is_self_reference,
            });
        }
        records
    }

    /// Spans from the pluggable recognizer, mapped into candidate
    /// spans. Recognizer output is subject to the same deictic
    /// precedence as the standard table.
    fn recognizer_spans(&self, text: &str, existing: &[CandidateSpan]) -> Vec<CandidateSpan> {
        self.recognizer
            .recognize(text)
            .into_iter()
            .filter(|s| s.start < s.end && s.end <= text.len() && text.is_char_boundary(s.start) && text.is_char_boundary(s.end))
            .map(|s| CandidateSpan {
                pattern: "recognizer",
                class: MentionClass::Standard,
                start: s.start,
                end: s.end,
                text: text[s.start..s.end].to_string(),
            })
            .filter(|candidate| {
                !existing
                    .iter()
                    .any(|d| d.class == MentionClass::Deictic && d.overlaps(candidate))
            })
            .collect()
    }

    /// The bounded window of prior speaker turns, oldest first.
    /// Unknown speakers are skipped; anonymous labels pass through so
    /// that transcripts rewritten by the speaker resolver chain
    /// correctly.
    fn build_speaker_history(&self, index: usize, segments: &[Segment]) -> Vec<SpeakerTurn> {
        let mut turns: Vec<SpeakerTurn> = Vec::new();
        for (i, segment) in segments.iter().enumerate().take(index) {
            let identity = segment.speaker_identity();
            if identity == "UNKNOWN" {
                continue;
            }
            turns.push(SpeakerTurn {
                member_id: identity.to_string(),
                segment_index: i,
            });
        }
        let window = self.config.coref_window;
        if turns.len() > window {
            turns.split_off(turns.len() - window)
        } else {
            turns
        }
    }

    fn log_unresolved(
        &mut self,
        span: &CandidateSpan,
        session_id: &str,
        segment_index: usize,
        source_id: &str,
        context: &str,
        reference_date: Option<NaiveDate>,
    ) {
        log::debug!(
            "Unresolved {} mention '{}' in {} segment {}",
            match span.class {
                MentionClass::Standard => "standard",
                MentionClass::Deictic => "deictic",
            },
            span.text,
            session_id,
            segment_index
        );
        self.unresolved.push(UnresolvedMention {
            mention: span.text.clone(),
            session_id: Some(session_id.to_string()),
            segment_index: Some(segment_index),
            reference_date,
            context: Some(context.to_string()),
            mention_class: Some(span.class),
            speaker_id: Some(source_id.to_string()),
            timestamp: Utc::now(),
        });
    }

    /// Detect procedural "point of order" interruptions.
    ///
    /// These are deliberately not mention records: rising on a point of
    /// order addresses the chair, not a member.
    #[must_use]
    pub fn detect_points_of_order(&self, transcript: &Transcript) -> Vec<PointOfOrderEvent> {
        let mut events = Vec::new();
        for (index, segment) in transcript.segments.iter().enumerate() {
            if segment.exclude_from_extraction {
                continue;
            }
            if let Some(m) = patterns::POINT_OF_ORDER.find(&segment.text) {
                events.push(PointOfOrderEvent {
                    session_id: transcript.session_id.clone(),
                    source_id: segment.speaker_identity().to_string(),
                    raw_text: m.as_str().to_string(),
                    start_time: segment.start_time,
                    end_time: segment.end_time,
                    segment_index: index,
                });
            }
        }
        events
    }

    /// Unresolved spans logged by this extractor instance.
    #[must_use]
    pub fn unresolved_log(&self) -> &[UnresolvedMention] {
        &self.unresolved
    }

    /// Number of unresolved spans logged so far.
    #[must_use]
    pub fn unresolved_count(&self) -> usize {
        self.unresolved.len()
    }

    /// Clear the unresolved log.
    pub fn clear_unresolved_log(&mut self) {
        self.unresolved.clear();
    }

    /// Write the unresolved log to a JSON file with a count header, for
    /// human review.
    pub fn save_unresolved_log(&self, path: impl AsRef<Path>) -> Result<()> {
        #[derive(Serialize)]
        struct LogExport<'a> {
            total_unresolved: usize,
            mentions: &'a [UnresolvedMention],
        }
        let export = LogExport {
            total_unresolved: self.unresolved.len(),
            mentions: &self.unresolved,
        };
        let json = serde_json::to_string_pretty(&export)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Interpolate mention timestamps from character position within the
/// segment bounds.
fn interpolate_timestamps(
    text: &str,
    byte_start: usize,
    byte_end: usize,
    segment_start: f64,
    segment_end: f64,
) -> (f64, f64) {
    let total_chars = text.chars().count();
    if total_chars == 0 || segment_end <= segment_start {
        return (segment_start, segment_end.max(segment_start));
    }
    let char_start = text[..byte_start].chars().count();
    let char_end = text[..byte_end].chars().count();
    let duration = segment_end - segment_start;
    let start = segment_start + duration * (char_start as f64 / total_chars as f64);
    let end = segment_start + duration * (char_end as f64 / total_chars as f64);
    (start, end.min(segment_end))
}

/// Byte ranges of sentences split on `.`, `!`, `?`.
fn split_sentences(text: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if matches!(c, '.' | '!' | '?') {
            let end = i + c.len_utf8();
            if text[start..end].trim().len() > 0 {
                ranges.push((start, end));
            }
            start = end;
        }
    }
    if start < text.len() && !text[start..].trim().is_empty() {
        ranges.push((start, text.len()));
    }
    if ranges.is_empty() && !text.is_empty() {
        ranges.push((0, text.len()));
    }
    ranges
}

/// The ±1-sentence context around a span; the whole segment when
/// sentence boundaries cannot be found.
fn context_window(text: &str, span_start: usize, _span_end: usize) -> String {
    let sentences = split_sentences(text);
    let Some(position) = sentences
        .iter()
        .position(|&(s, e)| span_start >= s && span_start < e)
    else {
        return text.trim().to_string();
    };
    let from = position.saturating_sub(1);
    let to = (position + 1).min(sentences.len() - 1);
    let (start, _) = sentences[from];
    let (_, end) = sentences[to];
    text[start..end].trim().to_string()
}
