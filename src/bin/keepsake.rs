//! keepsake CLI — run queries against a file of memory records.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use keepsake::config::Config;
use keepsake::criteria::{CriteriaInput, DateRangeInput};
use keepsake::presets::PresetRegistry;
use keepsake::query::{Facets, QueryEngine};
use keepsake::source::load_records;
use keepsake::telemetry::{TelemetryConfig, init_telemetry};
use keepsake::{FilterCriteria, Record};

#[derive(Parser)]
#[command(name = "keepsake", about = "Filter and rank shared family memories")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Filter and sort records
    Query {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filter: FilterArgs,
        /// Print results as JSON instead of a table
        #[arg(long)]
        json: bool,
        /// Show at most this many results
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Count types, authors and tags across the filtered records
    Facets {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filter: FilterArgs,
        /// Number of tags to list
        #[arg(long, default_value_t = 10)]
        top_tags: usize,
    },
    /// List saved presets
    Presets,
}

#[derive(Args)]
struct SourceArgs {
    /// JSON file with an array of records (defaults to KEEPSAKE_RECORDS)
    #[arg(long)]
    records: Option<PathBuf>,
}

/// Filter flags. Each flag given replaces the matching preset field whole.
#[derive(Args)]
struct FilterArgs {
    /// Start from a saved preset
    #[arg(long)]
    preset: Option<String>,
    /// Allowed media type (photo, video, audio, story); repeatable
    #[arg(long = "type")]
    types: Vec<String>,
    /// Allowed author; repeatable
    #[arg(long = "author")]
    authors: Vec<String>,
    /// Tag to match; repeatable
    #[arg(long = "tag")]
    tags: Vec<String>,
    /// How --tag values combine: any (default) or all
    #[arg(long)]
    tag_match: Option<String>,
    /// Earliest date, inclusive (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    from: Option<String>,
    /// Latest date, inclusive (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    to: Option<String>,
    /// Free-text search over titles, descriptions, places, authors and tags
    #[arg(long)]
    text: Option<String>,
    /// date, relevance or author
    #[arg(long)]
    sort_by: Option<String>,
    /// asc or desc
    #[arg(long)]
    order: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env()?;

    let _guard = init_telemetry(TelemetryConfig {
        endpoint: config.otel_endpoint.clone(),
        service_name: "keepsake".to_string(),
        log_level: config.log_level.clone(),
    })?;

    let presets = load_presets(&config.presets_dir)?;
    let engine = QueryEngine::new();

    match cli.command {
        Command::Query {
            source,
            filter,
            json,
            limit,
        } => {
            let records = records(&config, source)?;
            let criteria = build_criteria(&config, &presets, filter)?;
            cmd_query(&engine, &records, &criteria, json, limit)
        }
        Command::Facets {
            source,
            filter,
            top_tags,
        } => {
            let records = records(&config, source)?;
            let criteria = build_criteria(&config, &presets, filter)?;
            cmd_facets(&engine, &records, &criteria, top_tags)
        }
        Command::Presets => cmd_presets(&presets),
    }
}

fn load_presets(dir: &Path) -> anyhow::Result<PresetRegistry> {
    if dir.is_dir() {
        Ok(PresetRegistry::load_from_dir(dir)?)
    } else {
        tracing::debug!(dir = %dir.display(), "no preset directory");
        Ok(PresetRegistry::empty())
    }
}

fn records(config: &Config, args: SourceArgs) -> anyhow::Result<Vec<Record>> {
    let Some(path) = args.records.or_else(|| config.records_path.clone()) else {
        anyhow::bail!("no records file: pass --records or set KEEPSAKE_RECORDS");
    };
    Ok(load_records(&path)?)
}

fn build_criteria(
    config: &Config,
    presets: &PresetRegistry,
    args: FilterArgs,
) -> anyhow::Result<FilterCriteria> {
    let base = match args.preset {
        Some(ref name) => match presets.get(name) {
            Some(preset) => preset.input.clone(),
            None => anyhow::bail!("unknown preset '{name}'"),
        },
        None => CriteriaInput::default(),
    };

    let date_range = (args.from.is_some() || args.to.is_some()).then(|| DateRangeInput {
        start: args.from,
        end: args.to,
    });
    let flags = CriteriaInput {
        date_range,
        types: args.types,
        authors: args.authors,
        tags: args.tags,
        tag_match: args.tag_match,
        text: args.text,
        sort_by: args.sort_by,
        sort_order: args.order,
    };

    let input = base
        .overlay(flags)
        .with_default_sort(config.default_sort_by, config.default_sort_order);
    Ok(input.validate()?)
}

fn cmd_query(
    engine: &QueryEngine,
    records: &[Record],
    criteria: &FilterCriteria,
    json: bool,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let mut results = engine.evaluate(records, criteria);
    let total = results.len();
    if let Some(n) = limit {
        results.truncate(n);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No memories match.");
        return Ok(());
    }

    println!(
        "{:<12}  {:<10}  {:<6}  {:<18}  {:>5}  TAGS",
        "ID", "DATE", "TYPE", "AUTHOR", "SCORE"
    );
    println!("{}", "-".repeat(80));

    for record in &results {
        let tags: Vec<&str> = record.tags.iter().map(String::as_str).collect();
        println!(
            "{:<12}  {:<10}  {:<6}  {:<18}  {:>5}  {}",
            truncate(record.id.as_str(), 12),
            record.date.format("%Y-%m-%d"),
            record.kind.to_string(),
            truncate(&record.author, 18),
            record.engagement(),
            tags.join(", ")
        );
    }

    if results.len() < total {
        println!("\n{} of {} memories", results.len(), total);
    } else {
        println!("\n{total} memories");
    }
    Ok(())
}

fn cmd_facets(
    engine: &QueryEngine,
    records: &[Record],
    criteria: &FilterCriteria,
    top_tags: usize,
) -> anyhow::Result<()> {
    let facets: Facets = engine.facets(records, criteria);

    println!("Memories:   {}", facets.total);
    if let (Some(earliest), Some(latest)) = (facets.earliest, facets.latest) {
        println!(
            "Span:       {} to {}",
            earliest.format("%Y-%m-%d"),
            latest.format("%Y-%m-%d")
        );
    }

    println!("---");
    for (kind, count) in &facets.types {
        println!("{:<18}  {count}", kind.to_string());
    }
    println!("---");
    for (author, count) in &facets.authors {
        println!("{:<18}  {count}", truncate(author, 18));
    }
    println!("---");
    for (tag, count) in facets.top_tags(top_tags) {
        println!("#{:<17}  {count}", truncate(tag, 17));
    }
    Ok(())
}

fn cmd_presets(presets: &PresetRegistry) -> anyhow::Result<()> {
    if presets.is_empty() {
        println!("No presets found.");
        return Ok(());
    }
    for preset in presets.iter() {
        println!(
            "{:<24}  {}",
            preset.name,
            preset.description.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
