// anilog CLI - one list operation per run
// Every subcommand is a full load → compute → save cycle against the store.

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use anilog::{
    add_entry, compute_stats, find_by_name, import_file, load_list, merge, remove_entry,
    save_list, set_completion, set_start_date, Completion, Config, Entry, JikanClient,
    SourceKind, WatchDate,
};

#[derive(Parser)]
#[command(name = "anilog")]
#[command(about = "Personal anime watch-list manager")]
#[command(version)]
struct Cli {
    /// Path to the list file (overrides the config file)
    #[arg(long, global = true, value_name = "FILE")]
    list: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find an entry in your list by title
    Search {
        /// Substring to look for (case-insensitive)
        term: String,
    },

    /// Print every entry in your list
    List,

    /// Add an anime by MAL id (title is resolved online)
    Add {
        /// MyAnimeList id
        mal_id: u32,
    },

    /// Remove an anime by MAL id
    Remove {
        /// MyAnimeList id
        mal_id: u32,
    },

    /// Merge an exported list into your list
    Import {
        /// Export format: mal, kitsu, hianime or native
        source: SourceKind,

        /// Path to the export file
        file: PathBuf,
    },

    /// Change an entry's completion status
    SetCompletion {
        /// MyAnimeList id
        mal_id: u32,

        /// plan-to-watch, on-hold, dropped, watching or completed
        completion: Completion,
    },

    /// Change an entry's start date
    SetDate {
        /// MyAnimeList id
        mal_id: u32,

        /// Date, e.g. 2024-12-25
        date: String,
    },

    /// Show per-status counts for your list
    Stats,

    /// Search MyAnimeList for anime to add
    SearchMal {
        /// Title to search for
        query: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("❌ {err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load();
    let list_path = config.list_path(cli.list);

    match cli.command {
        Commands::Search { term } => {
            let list = load_list(&list_path)?;
            let entry = find_by_name(&list, &term)
                .ok_or_else(|| anyhow!("no match in list for '{term}'"))?;
            println!("{entry}");
        }

        Commands::List => {
            let list = load_list(&list_path)?;
            if list.is_empty() {
                println!("List is empty. Add something with: anilog add <id>");
                return Ok(());
            }
            for entry in &list {
                println!("{entry}");
            }
        }

        Commands::Add { mal_id } => {
            let list = load_list(&list_path)?;

            // A failed lookup still adds the entry, just with the
            // placeholder title.
            let name = JikanClient::new().resolve_name(mal_id).await;

            let today = WatchDate::Known(Local::now().date_naive());
            let entry = Entry::new(name.clone(), mal_id, Completion::PlanToWatch, today);

            let updated = add_entry(list, entry)?;
            save_list(&list_path, &updated)?;
            println!("✓ Added {name} to list");
        }

        Commands::Remove { mal_id } => {
            let list = load_list(&list_path)?;
            let name = list
                .iter()
                .find(|e| e.mal_id == mal_id)
                .map(|e| e.name.clone())
                .unwrap_or_default();

            let updated = remove_entry(list, mal_id)?;
            save_list(&list_path, &updated)?;
            println!("✓ Removed {name} from list");
        }

        Commands::Import { source, file } => {
            let list = load_list(&list_path)?;
            let imported = import_file(source, &file)?;
            let imported_count = imported.len();

            let updated = merge(list, imported);
            save_list(&list_path, &updated)?;
            println!(
                "✓ Imported {} entries from {} ({} total in list)",
                imported_count,
                source.name(),
                updated.len()
            );
        }

        Commands::SetCompletion { mal_id, completion } => {
            let list = load_list(&list_path)?;
            let updated = set_completion(list, mal_id, completion)?;
            save_list(&list_path, &updated)?;
            println!("✓ Marked {mal_id} as {completion}");
        }

        Commands::SetDate { mal_id, date } => {
            let list = load_list(&list_path)?;
            let updated = set_start_date(list, mal_id, &date)?;
            save_list(&list_path, &updated)?;
            let stored = updated
                .iter()
                .find(|e| e.mal_id == mal_id)
                .map(|e| e.start_date.to_string())
                .unwrap_or_default();
            println!("✓ Start date for {mal_id} set to {stored}");
        }

        Commands::Stats => {
            let list = load_list(&list_path)?;
            println!("{}", compute_stats(&list));
        }

        Commands::SearchMal { query } => {
            let results = JikanClient::new()
                .search_anime(&query, 10)
                .await
                .context("MyAnimeList search failed")?;

            if results.is_empty() {
                println!("No results for '{query}'");
                return Ok(());
            }

            for anime in results {
                let episodes = anime
                    .episodes
                    .map(|n| format!("{n} eps"))
                    .unwrap_or_else(|| "? eps".to_string());
                let score = anime
                    .score
                    .map(|s| format!("{s:.2}"))
                    .unwrap_or_else(|| "-".to_string());
                println!("{:>6}  {:<7}  {:>5}  {}", anime.mal_id, episodes, score, anime.title);
            }
        }
    }

    Ok(())
}
