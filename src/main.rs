use anyhow::Result;
use servicefinder::{
    search::SearchHit, table::Row, Directory, DirectoryConfig, DirectoryError, SearchMode,
};
use std::{env, sync::Arc};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

const HELP: &str = "commands:
  categories                 list browsable categories
  keywords                   featured search terms
  suggest [n]                most common words in resource names
  search keyword <query>     whole-word search across every field
  search category <query>    resources inside matching category blocks
  detail <position>          all populated fields of one resource
  status                     data readiness
  reload                     re-read the source table
  quit";

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,servicefinder=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    info!("startup");

    // ─── 2) resolve config; a path argument wins over env and YAML ───
    let mut cfg = DirectoryConfig::load()?;
    if let Some(path) = env::args().nth(1) {
        cfg = cfg.with_source(path);
    }

    // ─── 3) load the table off the async runtime ─────────────────────
    let dir = Arc::new(tokio::task::spawn_blocking(move || Directory::open(cfg)).await?);
    let status = dir.status();
    if !status.ready {
        warn!(
            reason = status.reason.as_deref().unwrap_or("unknown"),
            "resource data unavailable; queries will return nothing"
        );
    }

    // ─── 4) command loop ─────────────────────────────────────────────
    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
        match cmd {
            "quit" | "exit" => break,
            "help" => println!("{HELP}"),
            "status" => println!("{}", serde_json::to_string_pretty(&dir.status())?),
            "categories" => {
                if !ensure_ready(&dir) {
                    continue;
                }
                for category in dir.list_categories() {
                    println!("{category}");
                }
            }
            "keywords" => println!("{}", dir.featured_keywords().join(", ")),
            "suggest" => {
                let n = rest
                    .trim()
                    .parse()
                    .unwrap_or(dir.config().suggestion_count);
                for k in dir.suggested_keywords(n) {
                    println!("{:<20} {}", k.word, k.resources);
                }
            }
            "search" => {
                if !ensure_ready(&dir) {
                    continue;
                }
                let (mode, query) = rest.trim().split_once(' ').unwrap_or((rest.trim(), ""));
                let mode = SearchMode::from_param(mode);
                let hits = dir.search(query, mode);
                print_hits(&dir, mode, query, &hits);
            }
            "detail" => match rest.trim().parse::<usize>() {
                Ok(pos) => match dir.resolve_detail(pos) {
                    Ok(detail) => {
                        println!("{}", detail.display_name);
                        for (label, value) in &detail.fields {
                            println!("  {label}: {value}");
                        }
                    }
                    Err(e @ DirectoryError::NotFound { .. }) => {
                        println!("Resource not found (invalid index): {e}")
                    }
                    Err(e) => println!("Data Error: {e}"),
                },
                Err(_) => println!("detail expects a row position"),
            },
            "reload" => {
                let dir = Arc::clone(&dir);
                match tokio::task::spawn_blocking(move || dir.reload()).await {
                    Ok(status) => println!("{}", serde_json::to_string_pretty(&status)?),
                    Err(e) => error!("reload task failed: {}", e),
                }
            }
            other => println!("unknown command {other:?}; try `help`"),
        }
    }

    info!("all done");
    Ok(())
}

fn ensure_ready(dir: &Directory) -> bool {
    let status = dir.status();
    if !status.ready {
        println!(
            "Error: Could not load data from {}. Please ensure the file is present.",
            status.source.display()
        );
    }
    status.ready
}

fn print_hits(dir: &Directory, mode: SearchMode, query: &str, hits: &[SearchHit]) {
    let query = query.trim().to_uppercase();
    if query.is_empty() {
        println!("Please enter a search term or pick a category.");
        return;
    }
    println!("Results for {} search: \"{}\"", mode.as_str(), query);
    if hits.is_empty() {
        println!(
            "No resources found matching \"{query}\" or all matching resources are marked '{}'.",
            dir.config().closed_marker
        );
        return;
    }
    for hit in hits {
        println!("  [{}] {}", hit.position, display_name(&hit.row, dir.config()));
    }
}

fn display_name<'a>(row: &'a Row, cfg: &'a DirectoryConfig) -> &'a str {
    match row.cell(cfg.columns.name).trim() {
        "" => cfg.fallback_name.as_str(),
        name => name,
    }
}
