// 💾 Entry Store - Flat JSON list on disk
//
// The whole list is rewritten on every save; there is no partial update.
// A missing store is not an error: it bootstraps to an empty list so first
// runs need no setup step.

use crate::entry::Entry;
use crate::error::ListResult;
use std::fs;
use std::path::Path;

/// Load the list from `path`.
///
/// If the file does not exist (or exists but is empty), an empty list is
/// written there and returned. A store that exists but does not decode is an
/// error - the file is left untouched rather than reset.
pub fn load_list(path: &Path) -> ListResult<Vec<Entry>> {
    if !path.exists() {
        bootstrap_empty(path)?;
        return Ok(Vec::new());
    }

    let raw = fs::read_to_string(path)?;
    if raw.trim().is_empty() {
        bootstrap_empty(path)?;
        return Ok(Vec::new());
    }

    let list: Vec<Entry> = serde_json::from_str(&raw)?;
    Ok(list)
}

/// Overwrite the store at `path` with `list`, pretty-printed.
pub fn save_list(path: &Path, list: &[Entry]) -> ListResult<()> {
    let json = serde_json::to_string_pretty(list)?;
    fs::write(path, json)?;
    Ok(())
}

fn bootstrap_empty(path: &Path) -> ListResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, "[]")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{Completion, WatchDate};
    use crate::error::ListError;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_file_bootstraps_empty_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("list.json");

        let list = load_list(&path).unwrap();

        assert!(list.is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");

        // Second load goes through the normal read path
        assert!(load_list(&path).unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("list.json");

        let list = vec![
            Entry::new("Cowboy Bebop", 1, Completion::Completed, WatchDate::decode("1998-04-03")),
            Entry::new("Trigun", 6, Completion::Watching, WatchDate::Unknown),
        ];

        save_list(&path, &list).unwrap();
        let loaded = load_list(&path).unwrap();

        assert_eq!(loaded, list);
    }

    #[test]
    fn test_save_overwrites_previous_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("list.json");

        let first = vec![Entry::new("A", 1, Completion::Watching, WatchDate::Unknown)];
        let second = vec![Entry::new("B", 2, Completion::Completed, WatchDate::Unknown)];

        save_list(&path, &first).unwrap();
        save_list(&path, &second).unwrap();

        assert_eq!(load_list(&path).unwrap(), second);
    }

    #[test]
    fn test_corrupt_store_is_an_error_not_a_reset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("list.json");
        fs::write(&path, "{ definitely not a list").unwrap();

        let err = load_list(&path).unwrap_err();

        assert!(matches!(err, ListError::Corrupt(_)));
        // The broken file must survive for the user to inspect
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ definitely not a list");
    }

    #[test]
    fn test_load_reads_legacy_wire_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("list.json");
        fs::write(
            &path,
            r#"[{"name":"Monster","mal_id":19,"completion":3,"start_date":"0000-00-00"}]"#,
        )
        .unwrap();

        let list = load_list(&path).unwrap();

        assert_eq!(list.len(), 1);
        assert_eq!(list[0].mal_id, 19);
        assert_eq!(list[0].completion, Completion::Watching);
        assert_eq!(list[0].start_date, WatchDate::Unknown);
    }
}
