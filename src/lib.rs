// anilog - Anime Watch-List Core Library
// Exposes all modules for use in the CLI and tests

pub mod config;
pub mod entry;
pub mod error;
pub mod import;
pub mod lookup;
pub mod reconcile;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use entry::{Completion, Entry, WatchDate, SENTINEL_DATE, UNKNOWN_TITLE};
pub use error::{ListError, ListResult};
pub use import::{import_file, importer_for, ListImporter, SourceKind};
pub use lookup::{JikanAnime, JikanClient};
pub use reconcile::{
    add_entry, compute_stats, find_by_name, merge, remove_entry, set_completion, set_start_date,
    ListStats,
};
pub use store::{load_list, save_list};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
