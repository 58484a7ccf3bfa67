//! # chamber
//!
//! Entity resolution for parliamentary debate transcripts.
//!
//! Debate recordings arrive as noisy diarized transcripts: anonymous
//! speaker channels, dialectal spellings, honorifics instead of names,
//! anaphora instead of either, and a membership roster that changes
//! under cabinet reshuffles. Everything downstream — sentiment
//! attribution, interaction graphs, dashboards — is only as good as the
//! answer to "who said this, and who does it refer to". This crate is
//! that answer.
//!
//! ## Components
//!
//! | Component | Module | Job |
//! |-----------|--------|-----|
//! | Entity registry | [`registry`] | Versioned member catalog with time-bounded portfolio aliases |
//! | Alias resolver | [`resolver`] | Text → identity via exact / fuzzy / unresolved cascade |
//! | Mention extractor | [`extract`] | Finds reference spans, resolves direct and anaphoric forms |
//! | Speaker resolver | [`speaker`] | Diarization labels → identities via behavioral heuristics |
//!
//! The registry loads once per run and is shared read-only; both
//! resolvers reuse its inverted alias index. The mention extractor and
//! speaker resolver are independent consumers of a transcript, merged
//! by an external pipeline.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chamber::{MentionExtractor, Registry, SpeakerResolver, Transcript};
//!
//! # fn main() -> chamber::Result<()> {
//! let registry = Arc::new(Registry::load("roster.json")?);
//! let mut transcript: Transcript = serde_json::from_str("...")?;
//!
//! // Bind diarization labels to identities, rewrite the transcript.
//! let speakers = SpeakerResolver::new(Arc::clone(&registry));
//! let bindings = speakers.resolve_speakers(&transcript)?;
//! speakers.apply_resolutions(&mut transcript, &bindings);
//!
//! // Extract who-mentions-whom.
//! let mut extractor = MentionExtractor::new(registry);
//! let mentions = extractor.extract_mentions(&transcript, None)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Design
//!
//! - Resolvers are pure objects over an immutable index built once and
//!   injected explicitly; no global mutable state. Sharing the
//!   registry/index `Arc`s across per-transcript workers needs no
//!   synchronization.
//! - Ambiguity never raises: collisions resolve deterministically with
//!   a warning, unresolvable spans come back with confidence 0.0 and a
//!   log entry. Only boundary violations (bad snapshot, bad date,
//!   empty transcript) are `Err`.
//! - Pattern sets are name→matcher tables, so new parliamentary
//!   conventions are new rows, not new code paths.

#![warn(missing_docs)]

pub mod dialect;
mod error;
pub mod extract;
pub mod registry;
pub mod resolver;
pub mod similarity;
pub mod speaker;
pub mod transcript;
pub mod types;

pub use error::{Error, Result};
pub use extract::{ExtractorConfig, MentionExtractor, MentionRecord, PointOfOrderEvent};
pub use registry::{
    AliasCollision, DeceasedMember, Member, MemberKind, Party, PortfolioTenure, Registry,
    RegistryMetadata, SeatStatus, parse_reference_date,
};
pub use resolver::{AliasIndex, AliasResolver, ResolutionResult, ResolverConfig, UnresolvedMention};
pub use speaker::{SpeakerConfig, SpeakerMethod, SpeakerResolution, SpeakerResolver};
pub use transcript::{Segment, Transcript};
pub use types::{Confidence, MentionClass, ResolutionMethod};

pub mod prelude {
    //! Commonly used items, re-exported for convenience.
    //!
    //! ```rust
    //! use chamber::prelude::*;
    //! ```
    pub use crate::error::{Error, Result};
    pub use crate::extract::{MentionExtractor, MentionRecord};
    pub use crate::registry::{Member, Registry};
    pub use crate::resolver::{AliasResolver, ResolutionResult};
    pub use crate::speaker::{SpeakerResolution, SpeakerResolver};
    pub use crate::transcript::{Segment, Transcript};
    pub use crate::types::{Confidence, MentionClass, ResolutionMethod};
}
