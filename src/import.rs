// 🏗️ Import Adapters - External list exports → canonical entries
//
// One importer per source format. Importers only translate; deduplication
// against the local list happens in the reconciliation engine afterwards.

use crate::entry::{Completion, Entry, WatchDate, UNKNOWN_TITLE};
use anyhow::{bail, Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Which platform an export came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// MyAnimeList XML export
    Mal,
    /// Kitsu export (MAL-compatible XML)
    Kitsu,
    /// HiAnime bookmark JSON export
    HiAnime,
    /// Another anilog list file
    Native,
}

impl SourceKind {
    /// Human-readable name for display
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::Mal => "MyAnimeList",
            SourceKind::Kitsu => "Kitsu",
            SourceKind::HiAnime => "HiAnime",
            SourceKind::Native => "anilog",
        }
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "mal" | "myanimelist" => Ok(SourceKind::Mal),
            "kitsu" => Ok(SourceKind::Kitsu),
            "hianime" => Ok(SourceKind::HiAnime),
            "native" | "anilog" => Ok(SourceKind::Native),
            _ => Err(format!(
                "unknown import source '{raw}' (expected mal, kitsu, hianime or native)"
            )),
        }
    }
}

/// ListImporter - translate one export format into canonical entries
///
/// Implementations must be total over their format: a single odd record is
/// skipped, not fatal. Only an unreadable document is an error.
pub trait ListImporter {
    /// Parse an export's raw contents into canonical entries
    fn parse(&self, raw: &str) -> Result<Vec<Entry>>;

    /// Get the source this importer handles
    fn source(&self) -> SourceKind;
}

/// Get the importer for a source kind
pub fn importer_for(kind: SourceKind) -> Box<dyn ListImporter> {
    match kind {
        SourceKind::Mal => Box::new(MalImporter),
        SourceKind::Kitsu => Box::new(KitsuImporter),
        SourceKind::HiAnime => Box::new(HiAnimeImporter),
        SourceKind::Native => Box::new(NativeImporter),
    }
}

/// Read `path` and run it through the importer for `kind`.
pub fn import_file(kind: SourceKind, path: &Path) -> Result<Vec<Entry>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {} export {}", kind.name(), path.display()))?;
    importer_for(kind).parse(&raw)
}

// ============================================================================
// MAL / KITSU (XML)
// ============================================================================

pub struct MalImporter;

impl ListImporter for MalImporter {
    fn parse(&self, raw: &str) -> Result<Vec<Entry>> {
        parse_mal_xml(raw)
    }

    fn source(&self) -> SourceKind {
        SourceKind::Mal
    }
}

/// Kitsu exports in the MAL XML shape, so the parse is shared.
pub struct KitsuImporter;

impl ListImporter for KitsuImporter {
    fn parse(&self, raw: &str) -> Result<Vec<Entry>> {
        parse_mal_xml(raw)
    }

    fn source(&self) -> SourceKind {
        SourceKind::Kitsu
    }
}

/// Fields collected from one `<anime>` element
#[derive(Default)]
struct MalFields {
    id: Option<u32>,
    title: Option<String>,
    start_date: Option<String>,
    status: Option<String>,
}

impl MalFields {
    fn into_entry(self) -> Option<Entry> {
        // No usable id means the record cannot be keyed - skip it
        let mal_id = self.id?;

        let completion = self
            .status
            .as_deref()
            .and_then(Completion::parse)
            .unwrap_or(Completion::PlanToWatch);

        let start_date = self
            .start_date
            .as_deref()
            .map(WatchDate::decode)
            .unwrap_or(WatchDate::Unknown);

        Some(Entry::new(
            self.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            mal_id,
            completion,
            start_date,
        ))
    }
}

/// Which `<anime>` child element text is currently being read
#[derive(Clone, Copy)]
enum MalField {
    Id,
    Title,
    StartDate,
    Status,
}

fn store_mal_text(fields: &mut MalFields, target: MalField, text: &str) {
    match target {
        MalField::Id => fields.id = text.parse().ok(),
        MalField::Title => fields.title = Some(text.to_string()),
        MalField::StartDate => fields.start_date = Some(text.to_string()),
        MalField::Status => fields.status = Some(text.to_string()),
    }
}

fn parse_mal_xml(raw: &str) -> Result<Vec<Entry>> {
    let mut reader = Reader::from_str(raw);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut fields: Option<MalFields> = None;
    let mut text_target: Option<MalField> = None;
    let mut buf = Vec::new();

    loop {
        match reader
            .read_event_into(&mut buf)
            .context("malformed MAL export XML")?
        {
            Event::Start(ref e) => match e.name().as_ref() {
                b"anime" => fields = Some(MalFields::default()),
                b"series_animedb_id" if fields.is_some() => text_target = Some(MalField::Id),
                b"series_title" if fields.is_some() => text_target = Some(MalField::Title),
                b"my_start_date" if fields.is_some() => text_target = Some(MalField::StartDate),
                b"my_status" if fields.is_some() => text_target = Some(MalField::Status),
                _ => {}
            },
            Event::Text(ref e) => {
                if let (Some(target), Some(fields)) = (text_target, fields.as_mut()) {
                    let text = e.unescape().context("malformed MAL export XML")?;
                    store_mal_text(fields, target, text.trim());
                }
            }
            Event::CData(ref e) => {
                if let (Some(target), Some(fields)) = (text_target, fields.as_mut()) {
                    let text = String::from_utf8_lossy(e.as_ref());
                    store_mal_text(fields, target, text.trim());
                }
            }
            Event::End(ref e) => match e.name().as_ref() {
                b"anime" => {
                    if let Some(entry) = fields.take().and_then(MalFields::into_entry) {
                        entries.push(entry);
                    }
                }
                _ => text_target = None,
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(entries)
}

// ============================================================================
// HIANIME (JSON BOOKMARKS)
// ============================================================================

/// HiAnime bookmark export: folders of `{link, name}` pairs.
///
/// Folder names are user-defined. A folder whose name spells a status maps
/// straight to it; anything else lands in Plan to Watch. Bookmarks carry no
/// dates, so every imported entry starts with the date unknown.
pub struct HiAnimeImporter;

#[derive(serde::Deserialize)]
struct HiAnimeBookmark {
    link: String,
    name: String,
}

impl ListImporter for HiAnimeImporter {
    fn parse(&self, raw: &str) -> Result<Vec<Entry>> {
        let folders: BTreeMap<String, Vec<HiAnimeBookmark>> =
            serde_json::from_str(raw).context("malformed HiAnime bookmark export")?;

        let mut entries = Vec::new();
        for (folder, bookmarks) in folders {
            let completion = Completion::parse(&folder).unwrap_or(Completion::PlanToWatch);

            for bookmark in bookmarks {
                let Some(mal_id) = id_from_link(&bookmark.link) else {
                    continue;
                };
                entries.push(Entry::new(bookmark.name, mal_id, completion, WatchDate::Unknown));
            }
        }

        Ok(entries)
    }

    fn source(&self) -> SourceKind {
        SourceKind::HiAnime
    }
}

/// Pull the numeric id out of a bookmark link.
///
/// Links end in a slug like `/one-piece-100` (optionally with a query
/// string); the trailing digit run is the identifier.
fn id_from_link(link: &str) -> Option<u32> {
    let path = link.split(['?', '#']).next().unwrap_or(link);
    let slug = path.trim_end_matches('/').rsplit('/').next()?;
    slug.rsplit('-').next()?.parse().ok()
}

// ============================================================================
// NATIVE (ANOTHER LIST FILE)
// ============================================================================

pub struct NativeImporter;

impl ListImporter for NativeImporter {
    fn parse(&self, raw: &str) -> Result<Vec<Entry>> {
        if raw.trim().is_empty() {
            bail!("native list file is empty");
        }
        let entries: Vec<Entry> =
            serde_json::from_str(raw).context("malformed anilog list file")?;
        Ok(entries)
    }

    fn source(&self) -> SourceKind {
        SourceKind::Native
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const MAL_EXPORT: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<myanimelist>
  <myinfo>
    <user_name>saubuny</user_name>
    <user_total_anime>3</user_total_anime>
  </myinfo>
  <anime>
    <series_animedb_id>21</series_animedb_id>
    <series_title><![CDATA[One Piece]]></series_title>
    <my_start_date>2020-06-01</my_start_date>
    <my_status>Watching</my_status>
  </anime>
  <anime>
    <series_animedb_id>30</series_animedb_id>
    <series_title><![CDATA[Neon Genesis Evangelion]]></series_title>
    <my_start_date>0000-00-00</my_start_date>
    <my_status>Plan to Watch</my_status>
  </anime>
  <anime>
    <series_animedb_id>170</series_animedb_id>
    <series_title>Slam Dunk &amp; Friends</series_title>
    <my_start_date>1994-10-16</my_start_date>
    <my_status>On-Hold</my_status>
  </anime>
</myanimelist>"#;

    #[test]
    fn test_mal_import_basic_fields() {
        let entries = MalImporter.parse(MAL_EXPORT).unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].mal_id, 21);
        assert_eq!(entries[0].name, "One Piece");
        assert_eq!(entries[0].completion, Completion::Watching);
        assert_eq!(entries[0].start_date, WatchDate::decode("2020-06-01"));
    }

    #[test]
    fn test_mal_import_sentinel_date_and_status_spelling() {
        let entries = MalImporter.parse(MAL_EXPORT).unwrap();

        assert_eq!(entries[1].start_date, WatchDate::Unknown);
        assert_eq!(entries[1].completion, Completion::PlanToWatch);
        // "On-Hold" is MAL's spelling
        assert_eq!(entries[2].completion, Completion::OnHold);
    }

    #[test]
    fn test_mal_import_unescapes_entities() {
        let entries = MalImporter.parse(MAL_EXPORT).unwrap();
        assert_eq!(entries[2].name, "Slam Dunk & Friends");
    }

    #[test]
    fn test_mal_import_skips_records_without_id() {
        let export = r#"<myanimelist>
  <anime>
    <series_title><![CDATA[No Id Here]]></series_title>
    <my_status>Completed</my_status>
  </anime>
  <anime>
    <series_animedb_id>5</series_animedb_id>
    <series_title><![CDATA[Kept]]></series_title>
    <my_status>Completed</my_status>
  </anime>
</myanimelist>"#;

        let entries = MalImporter.parse(export).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].mal_id, 5);
    }

    #[test]
    fn test_mal_import_rejects_mismatched_tags() {
        assert!(MalImporter.parse("<myanimelist><anime></wrong></myanimelist>").is_err());
    }

    #[test]
    fn test_kitsu_uses_mal_shape() {
        let entries = KitsuImporter.parse(MAL_EXPORT).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(KitsuImporter.source(), SourceKind::Kitsu);
    }

    #[test]
    fn test_hianime_import() {
        let export = r#"{
          "Watching": [
            {"link": "https://hianime.to/watch/one-piece-100?ref=search", "name": "One Piece"}
          ],
          "My Favorites": [
            {"link": "https://hianime.to/watch/cowboy-bebop-27", "name": "Cowboy Bebop"},
            {"link": "https://hianime.to/watch/no-id-here", "name": "Broken Link"}
          ]
        }"#;

        let entries = HiAnimeImporter.parse(export).unwrap();

        assert_eq!(entries.len(), 2);

        let bebop = entries.iter().find(|e| e.mal_id == 27).unwrap();
        assert_eq!(bebop.name, "Cowboy Bebop");
        // Folder name spells no status, so the entry lands in Plan to Watch
        assert_eq!(bebop.completion, Completion::PlanToWatch);
        assert_eq!(bebop.start_date, WatchDate::Unknown);

        let one_piece = entries.iter().find(|e| e.mal_id == 100).unwrap();
        assert_eq!(one_piece.completion, Completion::Watching);
    }

    #[test]
    fn test_id_from_link() {
        assert_eq!(id_from_link("https://hianime.to/watch/one-piece-100"), Some(100));
        assert_eq!(id_from_link("/watch/one-piece-100?ref=search"), Some(100));
        assert_eq!(id_from_link("/watch/12345/"), Some(12345));
        assert_eq!(id_from_link("/watch/no-digits"), None);
    }

    #[test]
    fn test_native_import_round_trips_store_format() {
        let raw = r#"[{"name":"Monster","mal_id":19,"completion":4,"start_date":"2019-03-03"}]"#;

        let entries = NativeImporter.parse(raw).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].completion, Completion::Completed);
    }

    #[test]
    fn test_source_kind_from_str() {
        assert_eq!("mal".parse::<SourceKind>().unwrap(), SourceKind::Mal);
        assert_eq!("MyAnimeList".parse::<SourceKind>().unwrap(), SourceKind::Mal);
        assert_eq!("kitsu".parse::<SourceKind>().unwrap(), SourceKind::Kitsu);
        assert_eq!("hianime".parse::<SourceKind>().unwrap(), SourceKind::HiAnime);
        assert_eq!("native".parse::<SourceKind>().unwrap(), SourceKind::Native);
        assert!("netflix".parse::<SourceKind>().is_err());
    }

    #[test]
    fn test_importer_for_dispatch() {
        for kind in [SourceKind::Mal, SourceKind::Kitsu, SourceKind::HiAnime, SourceKind::Native] {
            assert_eq!(importer_for(kind).source(), kind);
        }
    }
}
