//! Transcript input model from the upstream transcription/diarization
//! stage.
//!
//! A transcript is a session id plus ordered, timestamped segments. Each
//! segment carries the anonymous diarization label assigned by the audio
//! stage, optionally a pre-resolved speaker id (when the speaker
//! resolver has already run and rewritten the transcript), and an
//! audio-quality exclusion flag which downstream consumers must honor by
//! skipping the segment.

use serde::{Deserialize, Serialize};

/// One speaker turn from the diarized transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Anonymous diarization label, e.g. "SPEAKER_00".
    pub speaker_label: String,
    /// Registry member id, once resolved. `None` until the speaker
    /// resolver (or a human) has mapped the label.
    #[serde(default)]
    pub speaker_id: Option<String>,
    /// Segment start, seconds from session start.
    pub start_time: f64,
    /// Segment end, seconds from session start.
    pub end_time: f64,
    /// Transcribed text.
    pub text: String,
    /// Transcription confidence in [0, 1].
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    /// Set upstream when audio quality is too poor for extraction.
    /// Honored by skipping the segment.
    #[serde(default)]
    pub exclude_from_extraction: bool,
}

fn default_confidence() -> f64 {
    1.0
}

impl Segment {
    /// The best available speaker identity: resolved id if present,
    /// else the diarization label, else "UNKNOWN".
    #[must_use]
    pub fn speaker_identity(&self) -> &str {
        match &self.speaker_id {
            Some(id) if !id.is_empty() => id,
            _ => {
                if self.speaker_label.is_empty() {
                    "UNKNOWN"
                } else {
                    &self.speaker_label
                }
            }
        }
    }

    /// Word count of the segment text.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// A diarized transcript for one sitting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Session identifier, e.g. "2023-11-15-debate".
    pub session_id: String,
    /// Ordered speaker turns.
    pub segments: Vec<Segment>,
}

impl Transcript {
    /// Unique diarization labels appearing in the transcript, in first
    /// occurrence order.
    #[must_use]
    pub fn speaker_labels(&self) -> Vec<&str> {
        let mut labels = Vec::new();
        for segment in &self.segments {
            let label = segment.speaker_label.as_str();
            if !label.is_empty() && !labels.contains(&label) {
                labels.push(label);
            }
        }
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(label: &str, text: &str) -> Segment {
        Segment {
            speaker_label: label.into(),
            speaker_id: None,
            start_time: 0.0,
            end_time: 5.0,
            text: text.into(),
            confidence: 1.0,
            exclude_from_extraction: false,
        }
    }

    #[test]
    fn speaker_identity_fallback_chain() {
        let mut seg = segment("SPEAKER_00", "hello");
        assert_eq!(seg.speaker_identity(), "SPEAKER_00");

        seg.speaker_id = Some("mp_davis_brave".into());
        assert_eq!(seg.speaker_identity(), "mp_davis_brave");

        let anonymous = Segment {
            speaker_label: String::new(),
            ..segment("", "hello")
        };
        assert_eq!(anonymous.speaker_identity(), "UNKNOWN");
    }

    #[test]
    fn labels_deduplicated_in_order() {
        let transcript = Transcript {
            session_id: "s".into(),
            segments: vec![
                segment("SPEAKER_01", "a"),
                segment("SPEAKER_00", "b"),
                segment("SPEAKER_01", "c"),
            ],
        };
        assert_eq!(transcript.speaker_labels(), vec!["SPEAKER_01", "SPEAKER_00"]);
    }

    #[test]
    fn segment_deserializes_with_defaults() {
        let json = r#"{
            "speaker_label": "SPEAKER_02",
            "start_time": 1.0,
            "end_time": 2.5,
            "text": "Order, order."
        }"#;
        let seg: Segment = serde_json::from_str(json).unwrap();
        assert_eq!(seg.confidence, 1.0);
        assert!(!seg.exclude_from_extraction);
        assert!(seg.speaker_id.is_none());
    }
}
