use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;

use tagbox::config::{AppPaths, Tools};
use tagbox::commands;
use tagbox::errors::Result;
use tagbox::external;
use tagbox::notes;
use tagbox::storage::TagStore;
use tagbox::storage::sqlite::SqliteStore;

#[derive(Parser)]
#[command(name = "tagbox", version, about = "Tag text notes and find them again by tag")]
struct Cli {
    /// Output results as JSON
    #[arg(short = 'j', long = "json", global = true)]
    json: bool,

    /// Data directory (defaults to $TAGBOX_HOME or ~/.tagbox)
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a note, edit it, then tag it
    New {
        /// Note name, e.g. `ideas.rs` (stored as ideas.rs.md)
        name: String,

        /// Comma-separated tags; prompted for when omitted
        #[arg(short, long)]
        tags: Option<String>,
    },

    /// Add tags to an existing note
    Tag {
        /// Note name without the .md extension
        name: String,

        /// Comma-separated tags
        tags: String,
    },

    /// Remove tags from a note
    Untag {
        /// Note name without the .md extension
        name: String,

        /// Comma-separated tags
        tags: String,
    },

    /// Show notes carrying any of the given tags
    Search {
        /// Comma-separated tags
        tags: String,

        /// Print matching paths instead of opening the pager
        #[arg(short, long)]
        list: bool,
    },

    /// List all tags with their file counts
    Tags,

    /// List registered files and their tags
    Files,

    /// Show store statistics
    Stats,
}

#[derive(Serialize)]
struct StatusResponse {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    skipped: Vec<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let json = cli.json;

    if let Err(e) = run(cli) {
        if json {
            eprintln!("{}", serde_json::json!({"error": e.to_string()}));
        } else {
            eprintln!("error: {}", e);
        }
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let paths = match cli.home {
        Some(base) => AppPaths::from_base(base)?,
        None => AppPaths::new()?,
    };
    let json = cli.json;
    let store = SqliteStore::open(&paths.db_path)?;

    match cli.command {
        None | Some(Commands::Tags) => cmd_tags(&store, json),
        Some(Commands::New { name, tags }) => cmd_new(&store, &paths, &name, tags, json),
        Some(Commands::Tag { name, tags }) => cmd_tag(&store, &paths, &name, &tags, json),
        Some(Commands::Untag { name, tags }) => cmd_untag(&store, &paths, &name, &tags, json),
        Some(Commands::Search { tags, list }) => cmd_search(&store, &tags, list, json),
        Some(Commands::Files) => cmd_files(&store, json),
        Some(Commands::Stats) => cmd_stats(&store, json),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

fn report(json: bool, response: StatusResponse) -> Result<()> {
    if json {
        print_json(&response)
    } else {
        println!("{}", response.message);
        Ok(())
    }
}

fn prompt_tags() -> Result<String> {
    if !io::stdin().is_terminal() {
        return Ok(String::new());
    }
    print!("Enter comma-separated tags (or leave empty): ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

fn cmd_new(
    store: &SqliteStore,
    paths: &AppPaths,
    name: &str,
    tags: Option<String>,
    json: bool,
) -> Result<()> {
    let path = notes::create_note(&paths.repo_dir, name)?;
    external::open_in_editor(&Tools::from_env().editor, &path)?;

    let raw = match tags {
        Some(raw) => raw,
        None if json || !path.exists() => String::new(),
        None => prompt_tags()?,
    };
    let Some(tags) = commands::finish_new_note(store, &path, &raw)? else {
        return report(
            json,
            StatusResponse {
                success: false,
                message: "File not saved.".into(),
                tags: Vec::new(),
                skipped: Vec::new(),
            },
        );
    };

    let message = if tags.is_empty() {
        format!("Saved {}. No tags added.", path.display())
    } else {
        format!("Saved {} tagged with: {}", path.display(), tags.join(", "))
    };
    report(json, StatusResponse { success: true, message, tags, skipped: Vec::new() })
}

fn cmd_tag(store: &SqliteStore, paths: &AppPaths, name: &str, raw: &str, json: bool) -> Result<()> {
    let tags = commands::tag_note(store, &paths.repo_dir, name, raw)?;
    let message = format!("Added tags [{}] to {}.md", tags.join(", "), name);
    report(json, StatusResponse { success: true, message, tags, skipped: Vec::new() })
}

fn cmd_untag(store: &SqliteStore, paths: &AppPaths, name: &str, raw: &str, json: bool) -> Result<()> {
    let outcome = commands::untag_note(store, &paths.repo_dir, name, raw)?;
    let message = outcome.message(name);
    let mut skipped = outcome.not_linked;
    skipped.extend(outcome.unknown);
    report(json, StatusResponse { success: true, message, tags: outcome.removed, skipped })
}

fn cmd_search(store: &SqliteStore, raw: &str, list: bool, json: bool) -> Result<()> {
    let outcome = commands::search(store, raw)?;
    if json {
        return print_json(&outcome.paths());
    }
    if let Some(message) = outcome.message() {
        println!("{}", message);
        return Ok(());
    }
    if list {
        return commands::write_list(&mut io::stdout().lock(), outcome.paths());
    }
    external::page(&Tools::from_env().pager, &notes::render_matches(outcome.paths()))
}

fn cmd_tags(store: &SqliteStore, json: bool) -> Result<()> {
    let tags = store.list_tags()?;
    if json {
        return print_json(&tags);
    }
    if tags.is_empty() {
        println!("No tags yet.");
        return Ok(());
    }
    for tag in &tags {
        println!("{:>4}  {}", tag.file_count, tag.name);
    }
    Ok(())
}

fn cmd_files(store: &SqliteStore, json: bool) -> Result<()> {
    let files = store.list_files()?;
    if json {
        return print_json(&files);
    }
    if files.is_empty() {
        println!("No files registered.");
        return Ok(());
    }
    for file in &files {
        let tags = if file.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", file.tags.join(", "))
        };
        println!("{}  {}{}", file.created_at.format("%Y-%m-%d"), file.path, tags);
    }
    Ok(())
}

fn cmd_stats(store: &SqliteStore, json: bool) -> Result<()> {
    let stats = store.stats()?;
    if json {
        return print_json(&stats);
    }
    println!("Tag Store Statistics");
    println!("────────────────────");
    println!("Files:        {}", stats.total_files);
    println!("Tags:         {}", stats.total_tags);
    println!("  Orphaned:   {}", stats.orphan_tags);
    println!("Links:        {}", stats.total_links);
    Ok(())
}
