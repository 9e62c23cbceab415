// ⚖️ Reconciliation Engine - Merge two lists into one deduplicated list
//
// The engine is a set of pure functions over entry collections: it never
// touches the store, and every operation returns a new collection (or a
// typed error) instead of mutating shared state.

use crate::entry::{Completion, Entry, WatchDate};
use crate::error::{ListError, ListResult};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// MERGE
// ============================================================================

/// Merge two collections into one entry per distinct id, ascending by id.
///
/// `existing` is folded first, then `incoming`, so when a conflict is an
/// exact tie the incoming side wins. Entries present on only one side pass
/// through untouched. The ascending order of the result is a contract, not
/// an implementation detail.
pub fn merge(existing: Vec<Entry>, incoming: Vec<Entry>) -> Vec<Entry> {
    let mut by_id: BTreeMap<u32, Entry> = BTreeMap::new();

    for candidate in existing.into_iter().chain(incoming) {
        match by_id.get(&candidate.mal_id) {
            Some(stored) if !prefer_candidate(stored, &candidate) => {}
            _ => {
                by_id.insert(candidate.mal_id, candidate);
            }
        }
    }

    by_id.into_values().collect()
}

/// Conflict resolver for two entries with the same id.
///
/// With both dates known, the later (or equal) start date wins - whoever
/// started the show more recently has the fresher record. If either date is
/// unknown there is nothing chronological to compare, so the entry further
/// along the completion order wins instead; on a completion tie the stored
/// entry stays.
fn prefer_candidate(stored: &Entry, candidate: &Entry) -> bool {
    match (stored.start_date, candidate.start_date) {
        (WatchDate::Known(stored_date), WatchDate::Known(candidate_date)) => {
            candidate_date >= stored_date
        }
        _ => stored.completion < candidate.completion,
    }
}

// ============================================================================
// SINGLE-ENTRY OPERATIONS
// ============================================================================

/// Add a new entry. Rejects ids that are already present.
pub fn add_entry(list: Vec<Entry>, entry: Entry) -> ListResult<Vec<Entry>> {
    if list.iter().any(|e| e.mal_id == entry.mal_id) {
        return Err(ListError::DuplicateId(entry.mal_id));
    }

    // Single-element merge: no conflict possible, but the result comes back
    // deduplicated and sorted like every other engine output.
    Ok(merge(list, vec![entry]))
}

/// Remove the entry with the given id, keeping the order of the rest.
pub fn remove_entry(mut list: Vec<Entry>, mal_id: u32) -> ListResult<Vec<Entry>> {
    let index = list
        .iter()
        .position(|e| e.mal_id == mal_id)
        .ok_or(ListError::IdNotFound(mal_id))?;

    list.remove(index);
    Ok(list)
}

/// Replace the completion status of the entry with the given id.
pub fn set_completion(
    mut list: Vec<Entry>,
    mal_id: u32,
    completion: Completion,
) -> ListResult<Vec<Entry>> {
    let entry = list
        .iter_mut()
        .find(|e| e.mal_id == mal_id)
        .ok_or(ListError::IdNotFound(mal_id))?;

    entry.completion = completion;
    Ok(list)
}

/// Replace the start date of the entry with the given id.
///
/// Input is parsed leniently (YYYY-MM-DD, MM/DD/YYYY, YYYY/MM/DD) and stored
/// canonically as YYYY-MM-DD. Unparseable input is rejected - the sentinel
/// cannot be set through this operation.
pub fn set_start_date(mut list: Vec<Entry>, mal_id: u32, raw: &str) -> ListResult<Vec<Entry>> {
    let date = crate::entry::parse_date(raw).ok_or_else(|| ListError::InvalidDate(raw.to_string()))?;

    let entry = list
        .iter_mut()
        .find(|e| e.mal_id == mal_id)
        .ok_or(ListError::IdNotFound(mal_id))?;

    entry.start_date = WatchDate::Known(date);
    Ok(list)
}

/// First entry whose title contains the search term, case-insensitively.
pub fn find_by_name<'a>(list: &'a [Entry], term: &str) -> Option<&'a Entry> {
    let term = term.to_lowercase();
    list.iter().find(|e| e.name.to_lowercase().contains(&term))
}

// ============================================================================
// STATS
// ============================================================================

/// Per-status counts over a list. The five buckets always sum to `total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListStats {
    pub total: usize,
    pub plan_to_watch: usize,
    pub on_hold: usize,
    pub dropped: usize,
    pub watching: usize,
    pub completed: usize,
}

impl ListStats {
    pub fn count_for(&self, completion: Completion) -> usize {
        match completion {
            Completion::PlanToWatch => self.plan_to_watch,
            Completion::OnHold => self.on_hold,
            Completion::Dropped => self.dropped,
            Completion::Watching => self.watching,
            Completion::Completed => self.completed,
        }
    }
}

impl fmt::Display for ListStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} total", self.total)?;
        writeln!(f, "{} completed", self.completed)?;
        writeln!(f, "{} watching", self.watching)?;
        writeln!(f, "{} planned", self.plan_to_watch)?;
        writeln!(f, "{} dropped", self.dropped)?;
        write!(f, "{} on hold", self.on_hold)
    }
}

/// Count entries per completion status.
pub fn compute_stats(list: &[Entry]) -> ListStats {
    let mut stats = ListStats {
        total: list.len(),
        plan_to_watch: 0,
        on_hold: 0,
        dropped: 0,
        watching: 0,
        completed: 0,
    };

    for entry in list {
        match entry.completion {
            Completion::PlanToWatch => stats.plan_to_watch += 1,
            Completion::OnHold => stats.on_hold += 1,
            Completion::Dropped => stats.dropped += 1,
            Completion::Watching => stats.watching += 1,
            Completion::Completed => stats.completed += 1,
        }
    }

    stats
}

// ============================================================================
// TESTS
// ============================================================================
