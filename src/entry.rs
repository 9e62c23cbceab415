// 📋 Entry Model - The watch-list record and its value types
// Wire shape is fixed: existing list files must keep loading unchanged.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Literal stored when a start date is unknown
pub const SENTINEL_DATE: &str = "0000-00-00";

/// Placeholder title when a lookup fails
pub const UNKNOWN_TITLE: &str = "N/A";

// ============================================================================
// COMPLETION STATUS
// ============================================================================

/// Watch status for a list entry.
///
/// The declared order doubles as the conflict tie-break order during merges:
/// `PlanToWatch < OnHold < Dropped < Watching < Completed`. It is a fixed
/// total order inherited from the store format, not a quality ranking.
/// Wire code is the discriminant (0 = PlanToWatch … 4 = Completed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Completion {
    PlanToWatch = 0,
    OnHold = 1,
    Dropped = 2,
    Watching = 3,
    Completed = 4,
}

impl Completion {
    pub const ALL: [Completion; 5] = [
        Completion::PlanToWatch,
        Completion::OnHold,
        Completion::Dropped,
        Completion::Watching,
        Completion::Completed,
    ];

    /// Human-readable name for display
    pub fn as_str(&self) -> &'static str {
        match self {
            Completion::PlanToWatch => "Plan to Watch",
            Completion::OnHold => "On Hold",
            Completion::Dropped => "Dropped",
            Completion::Watching => "Watching",
            Completion::Completed => "Completed",
        }
    }

    /// Parse the status spellings used by external exports and the CLI.
    ///
    /// Platforms disagree on naming ("Plan to Watch", "plan-to-watch",
    /// "On-Hold", "On Hold", ...), so matching ignores case and any
    /// non-alphanumeric characters. Bare wire codes ("0".."4") also work.
    pub fn parse(raw: &str) -> Option<Completion> {
        let folded: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match folded.as_str() {
            "plantowatch" | "planned" | "ptw" | "0" => Some(Completion::PlanToWatch),
            "onhold" | "hold" | "paused" | "1" => Some(Completion::OnHold),
            "dropped" | "2" => Some(Completion::Dropped),
            "watching" | "current" | "3" => Some(Completion::Watching),
            "completed" | "complete" | "4" => Some(Completion::Completed),
            _ => None,
        }
    }
}

impl From<Completion> for u8 {
    fn from(completion: Completion) -> u8 {
        completion as u8
    }
}

impl TryFrom<u8> for Completion {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Completion::PlanToWatch),
            1 => Ok(Completion::OnHold),
            2 => Ok(Completion::Dropped),
            3 => Ok(Completion::Watching),
            4 => Ok(Completion::Completed),
            other => Err(format!("unknown completion code {other}")),
        }
    }
}

impl FromStr for Completion {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Completion::parse(raw).ok_or_else(|| {
            format!(
                "unknown status '{raw}' (expected one of: plan-to-watch, on-hold, dropped, watching, completed)"
            )
        })
    }
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// START DATE
// ============================================================================

/// A start date that may be unknown.
///
/// The store writes `"0000-00-00"` when no date is known; imported files
/// occasionally carry dates that do not parse at all. Both collapse to
/// `Unknown` here so the merge logic has a single concept to reason about
/// instead of comparing magic strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum WatchDate {
    Known(NaiveDate),
    Unknown,
}

impl WatchDate {
    /// Decode a stored or imported date string. Never fails: the sentinel,
    /// an empty field, and anything unparseable all become `Unknown`.
    pub fn decode(raw: &str) -> WatchDate {
        let raw = raw.trim();
        if raw.is_empty() || raw == SENTINEL_DATE {
            return WatchDate::Unknown;
        }
        match parse_date(raw) {
            Some(date) => WatchDate::Known(date),
            None => WatchDate::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, WatchDate::Known(_))
    }
}

/// Parse a date from user or import input (supports YYYY-MM-DD, MM/DD/YYYY
/// and YYYY/MM/DD)
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    for format in ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw.trim(), format) {
            return Some(date);
        }
    }
    None
}

impl From<String> for WatchDate {
    fn from(raw: String) -> WatchDate {
        WatchDate::decode(&raw)
    }
}

impl From<WatchDate> for String {
    fn from(date: WatchDate) -> String {
        date.to_string()
    }
}

impl fmt::Display for WatchDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchDate::Known(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            WatchDate::Unknown => f.write_str(SENTINEL_DATE),
        }
    }
}

// ============================================================================
// ENTRY
// ============================================================================

/// One watch-list record, keyed by MyAnimeList id.
///
/// Field names are the store's wire contract - do not rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Display title (not identity - ids are identity)
    pub name: String,

    /// Stable external key, unique within a reconciled list
    pub mal_id: u32,

    /// Watch status (integer-coded on the wire)
    pub completion: Completion,

    /// Start date, or the sentinel when unknown
    pub start_date: WatchDate,
}

impl Entry {
    pub fn new(name: impl Into<String>, mal_id: u32, completion: Completion, start_date: WatchDate) -> Self {
        Entry {
            name: name.into(),
            mal_id,
            completion,
            start_date,
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>6}  {:<13}  {}  {}",
            self.mal_id,
            self.completion.as_str(),
            self.start_date,
            self.name
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
