//! Canonical member registry: the versioned catalog every resolver
//! shares.
//!
//! The registry is loaded once per run from a serialized snapshot and
//! then treated as immutable. Member identifiers are stable and never
//! reused across snapshot versions, which is what makes cross-session
//! identity tracking possible.
//!
//! Alias sets are derived, not stored: the snapshot carries manually
//! curated aliases, and the registry expands them with constituency
//! phrases ("Member for X"), portfolio phrases (tenure titles, with
//! temporal validity), honorific forms ("Hon. X"), and the legal name.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Party affiliation (closed set for the current parliament).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Party {
    /// Progressive Liberal Party.
    PLP,
    /// Free National Movement.
    FNM,
    /// Coalition of Independents.
    COI,
    /// Independent.
    IND,
    /// Democratic National Alliance.
    DNA,
}

impl std::fmt::Display for Party {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Party::PLP => "PLP",
            Party::FNM => "FNM",
            Party::COI => "COI",
            Party::IND => "IND",
            Party::DNA => "DNA",
        };
        write!(f, "{s}")
    }
}

/// Distinguishes ordinary debaters from procedural-control roles
/// (the presiding officer chairs the sitting; their "speech" is
/// procedure, not debate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    /// An ordinary debating member.
    Debater,
    /// A procedural-control role (presiding officer).
    Control,
}

/// Seat status at snapshot time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    /// Currently seated.
    Active,
    /// Resigned during the term.
    Resigned,
    /// Died during the term.
    Deceased,
    /// Suspended from the chamber.
    Suspended,
}

/// A single portfolio held over a specific time window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioTenure {
    /// Full official title, e.g. "Minister of Works and Utilities".
    pub title: String,
    /// Commonly used short form, e.g. "Minister of Works".
    pub short_title: String,
    /// First day of the tenure.
    pub start_date: NaiveDate,
    /// Last day of the tenure; `None` = currently active.
    pub end_date: Option<NaiveDate>,
}

impl PortfolioTenure {
    /// Whether this tenure was active on the given date (inclusive
    /// bounds; an open end date is active indefinitely).
    #[must_use]
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        if date < self.start_date {
            return false;
        }
        match self.end_date {
            Some(end) => date <= end,
            None => true,
        }
    }
}

/// Canonical profile for a single registry member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// Stable unique identifier. Never reused across snapshot versions.
    pub id: String,
    /// Legal full name.
    pub full_name: String,
    /// Name in common usage.
    pub common_name: String,
    /// Party affiliation.
    pub party: Party,
    /// Official constituency name.
    pub constituency: String,
    /// Sits in cabinet.
    #[serde(default)]
    pub is_cabinet: bool,
    /// Sits on the opposition front bench.
    #[serde(default)]
    pub is_opposition_frontbench: bool,
    /// Debater or procedural-control role.
    pub kind: MemberKind,
    /// Seat status at snapshot time.
    pub seat_status: SeatStatus,
    /// First election year, if recorded.
    #[serde(default)]
    pub first_elected: Option<String>,
    /// Portfolio tenures, each with its own validity window.
    #[serde(default)]
    pub portfolios: Vec<PortfolioTenure>,
    /// Manually curated aliases (nicknames, initials, surname forms).
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Special role tags, e.g. "Speaker of the House".
    #[serde(default)]
    pub special_roles: Vec<String>,
    /// Curator notes (not used in resolution).
    #[serde(default)]
    pub notes: Option<String>,
}

impl Member {
    /// The full derived alias set, in first-occurrence order with
    /// duplicates removed: manual aliases, constituency phrases,
    /// portfolio phrases (all tenures), honorific forms, legal name.
    #[must_use]
    pub fn all_aliases(&self) -> Vec<String> {
        self.alias_set(None)
    }

    /// The derived alias set restricted to a date: portfolio phrases
    /// are included only for tenures active on `date`. All other alias
    /// sources are date-independent.
    #[must_use]
    pub fn aliases_on(&self, date: NaiveDate) -> Vec<String> {
        self.alias_set(Some(date))
    }

    fn alias_set(&self, on: Option<NaiveDate>) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut push = |alias: String, out: &mut Vec<String>| {
            let key = alias.trim().to_lowercase();
            if !key.is_empty() && seen.insert(key) {
                out.push(alias);
            }
        };

        for alias in &self.aliases {
            push(alias.clone(), &mut out);
        }

        push(format!("Member for {}", self.constituency), &mut out);
        push(format!("The Member for {}", self.constituency), &mut out);

        for tenure in &self.portfolios {
            if let Some(date) = on {
                if !tenure.is_active_on(date) {
                    continue;
                }
            }
            for title in [&tenure.title, &tenure.short_title] {
                push(title.clone(), &mut out);
                push(format!("The {title}"), &mut out);
            }
        }

        push(format!("Hon. {}", self.common_name), &mut out);
        push(format!("The Honourable {}", self.common_name), &mut out);
        push(self.full_name.clone(), &mut out);

        out
    }

    /// Whether the member carries a given special-role tag
    /// (case-insensitive).
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.special_roles
            .iter()
            .any(|r| r.eq_ignore_ascii_case(role))
    }

    /// Portfolio tenures active on a date.
    pub fn portfolios_on(&self, date: NaiveDate) -> impl Iterator<Item = &PortfolioTenure> {
        self.portfolios
            .iter()
            .filter(move |t| t.is_active_on(date))
    }
}

/// Record for a member who died during the parliamentary term.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeceasedMember {
    /// Stable identifier (still never reused).
    pub id: String,
    /// Legal full name.
    pub full_name: String,
    /// Name in common usage.
    pub common_name: String,
    /// Party affiliation.
    pub party: Party,
    /// Constituency held at death.
    pub constituency: String,
    /// Date of death.
    pub date_of_death: NaiveDate,
    /// Role held at death.
    pub role_at_death: String,
    /// Successor member id, if a by-election has been held.
    #[serde(default)]
    pub replaced_by: Option<String>,
    /// Manually curated aliases.
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// A known alias shared by multiple members, with the curator's note on
/// how to break the tie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasCollision {
    /// The colliding alias text.
    pub alias: String,
    /// Member ids sharing this alias.
    pub claimants: Vec<String>,
    /// Curator's disambiguation note, quoted in collision warnings.
    pub resolution_strategy: String,
}

/// Snapshot metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryMetadata {
    /// Snapshot version string.
    pub version: String,
    /// Parliament designation, e.g. "14th Parliament".
    pub parliament: String,
    /// First sitting date of the parliament (ISO).
    pub parliament_start: String,
    /// Total seats in the chamber.
    pub total_seats: u32,
    /// Last snapshot update (ISO).
    pub last_updated: String,
    /// Curator identification.
    #[serde(default)]
    pub compiled_by: Option<String>,
    /// Source document reference.
    #[serde(default)]
    pub source_document: Option<String>,
}

/// The registry: the complete entity knowledge base for one parliament.
///
/// Loaded once, shared read-only. Safe to share across concurrent
/// per-transcript workers (wrap in `Arc`); nothing here mutates after
/// load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registry {
    /// Snapshot metadata.
    pub metadata: RegistryMetadata,
    /// Seated members.
    pub members: Vec<Member>,
    /// Members deceased during the term.
    #[serde(default)]
    pub deceased_members: Vec<DeceasedMember>,
    /// Known alias collisions with curator notes.
    #[serde(default)]
    pub alias_collisions: Vec<AliasCollision>,
    /// Optional region → constituency names index.
    #[serde(default)]
    pub geographic_index: Option<std::collections::BTreeMap<String, Vec<String>>>,
}

impl Registry {
    /// Parse and validate a registry snapshot from JSON text.
    ///
    /// Schema violations (missing fields, malformed dates, duplicate or
    /// empty ids) fail loudly here; a member is never silently dropped.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let registry: Registry = serde_json::from_str(json)
            .map_err(|e| Error::snapshot(format!("snapshot does not validate: {e}")))?;
        registry.validate()?;
        Ok(registry)
    }

    /// Load a registry snapshot from a file path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::snapshot(format!("cannot read snapshot {}: {e}", path.display()))
        })?;
        let registry = Self::from_json_str(&json)?;
        log::info!(
            "Loaded registry snapshot {} ({} members, {} collisions)",
            registry.metadata.version,
            registry.members.len(),
            registry.alias_collisions.len()
        );
        Ok(registry)
    }

    fn validate(&self) -> Result<()> {
        if self.members.is_empty() {
            return Err(Error::snapshot("snapshot contains no members"));
        }
        let mut seen = HashSet::new();
        for member in &self.members {
            if member.id.trim().is_empty() {
                return Err(Error::snapshot(format!(
                    "member '{}' has an empty id",
                    member.full_name
                )));
            }
            if !seen.insert(member.id.as_str()) {
                return Err(Error::snapshot(format!(
                    "duplicate member id '{}'",
                    member.id
                )));
            }
            for tenure in &member.portfolios {
                if let Some(end) = tenure.end_date {
                    if end < tenure.start_date {
                        return Err(Error::snapshot(format!(
                            "{}: tenure '{}' ends before it starts",
                            member.id, tenure.title
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Look up a member by id.
    #[must_use]
    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    /// Members who held a portfolio (matched against title or short
    /// title, case-insensitive) on the given date.
    #[must_use]
    pub fn who_held_portfolio(&self, title: &str, date: NaiveDate) -> Vec<&Member> {
        self.members
            .iter()
            .filter(|m| {
                m.portfolios_on(date).any(|t| {
                    t.title.eq_ignore_ascii_case(title)
                        || t.short_title.eq_ignore_ascii_case(title)
                })
            })
            .collect()
    }

    /// Members whose derived alias set contains `alias` (normalized
    /// compare), optionally restricted to aliases valid on a date.
    #[must_use]
    pub fn resolve_alias_candidates(
        &self,
        alias: &str,
        on: Option<NaiveDate>,
    ) -> Vec<&Member> {
        let needle = alias.trim().to_lowercase();
        self.members
            .iter()
            .filter(|m| {
                let aliases = match on {
                    Some(date) => m.aliases_on(date),
                    None => m.all_aliases(),
                };
                aliases.iter().any(|a| a.trim().to_lowercase() == needle)
            })
            .collect()
    }

    /// The presiding officer (special role "Speaker of the House"),
    /// if the snapshot flags one.
    #[must_use]
    pub fn presiding_officer(&self) -> Option<&Member> {
        self.members.iter().find(|m| m.has_role("Speaker of the House"))
    }

    /// The deputy presiding officer (special role "Deputy Speaker").
    #[must_use]
    pub fn deputy_presiding_officer(&self) -> Option<&Member> {
        self.members.iter().find(|m| m.has_role("Deputy Speaker"))
    }
}

/// Parse an ISO `YYYY-MM-DD` reference date supplied by a caller.
///
/// Malformed dates fail fast at the boundary; resolution never guesses
/// a date.
pub fn parse_reference_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| Error::date_parse(format!("'{date}': {e}")))
}
