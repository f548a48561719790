use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use mapsearch::{
    GameState, SearchEngine, Settings, compile_query, format_thing_result, format_world_result,
    interactive::InteractiveSearch, parse_query, trace,
};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "mapsearch",
    version,
    about = "Search pawns, items and world locations in a game state snapshot",
    long_about = None
)]
struct Cli {
    /// Search query (optional flag prefix followed by a label)
    #[arg(required_unless_present_any = ["interactive", "help_query", "set_default_term"])]
    query: Option<String>,

    /// Path to the game state snapshot (JSON)
    #[arg(short, long, env = "MAPSEARCH_STATE")]
    state: Option<PathBuf>,

    /// Also search world-map locations
    #[arg(short = 'w', long)]
    world: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Show query syntax help
    #[arg(long)]
    help_query: bool,

    /// Interactive search mode
    #[arg(short = 'i', long)]
    interactive: bool,

    /// Persist a new default search term for interactive sessions
    #[arg(long = "set-default-term")]
    set_default_term: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    trace::init_tracing();

    if cli.help_query {
        print_query_help();
        return Ok(());
    }

    let mut settings = Settings::load();
    if let Some(term) = cli.set_default_term {
        settings.default_search_term = term;
        settings.save()?;
        eprintln!(
            "Default search term set to {:?}",
            settings.default_search_term
        );
        if cli.query.is_none() && !cli.interactive {
            return Ok(());
        }
    }

    let state_path = cli
        .state
        .context("a game state snapshot is required (--state or MAPSEARCH_STATE)")?;
    let state = GameState::load(&state_path)?;

    if cli.verbose {
        eprintln!(
            "Loaded {} maps, {} world objects from {}",
            state.maps.len(),
            state.world_objects.len(),
            state_path.display()
        );
    }

    // Interactive mode
    if cli.interactive {
        let mut interactive = InteractiveSearch::new(state, &settings, cli.world);
        return interactive.run();
    }

    // One-shot mode - query is required
    let raw = cli
        .query
        .context("query argument is required (use --interactive for interactive mode)")?;

    let mut query = parse_query(&raw);
    if cli.world {
        query.world_map = true;
    }

    if cli.verbose {
        eprintln!("Query: {query:?}");
    }

    let compiled = compile_query(&query);
    let started = std::time::Instant::now();
    let results = SearchEngine::new().evaluate(&compiled, &state);
    let duration = started.elapsed();

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match cli.format {
        OutputFormat::Text => {
            if results.is_empty() {
                println!("No results found.");
            } else {
                let use_color = !cli.no_color;

                print_section(&mut handle, "Pawns", {
                    let mut lines: Vec<String> = results
                        .pawns
                        .iter()
                        .filter_map(|&id| format_thing_result(&state, id, use_color))
                        .collect();
                    lines.sort();
                    lines
                })?;
                print_section(&mut handle, "Things", {
                    let mut lines: Vec<String> = results
                        .things
                        .iter()
                        .filter_map(|&id| format_thing_result(&state, id, use_color))
                        .collect();
                    lines.sort();
                    lines
                })?;
                print_section(&mut handle, "World locations", {
                    let mut lines: Vec<String> = results
                        .world_objects
                        .iter()
                        .filter_map(|&id| format_world_result(&state, id, use_color))
                        .collect();
                    lines.sort();
                    lines
                })?;

                eprintln!(
                    "\nFound {} results in {}ms",
                    results.len(),
                    duration.as_millis()
                );
            }
        }
        OutputFormat::Json => {
            let mut pawns: Vec<u32> = results.pawns.iter().map(|id| id.0).collect();
            pawns.sort_unstable();
            let mut things: Vec<u32> = results.things.iter().map(|id| id.0).collect();
            things.sort_unstable();
            let mut world_objects: Vec<u32> =
                results.world_objects.iter().map(|id| id.0).collect();
            world_objects.sort_unstable();

            let output = serde_json::json!({
                "pawns": pawns,
                "things": things,
                "world_objects": world_objects,
                "total_count": results.len(),
                "duration_ms": duration.as_millis(),
            });
            serde_json::to_writer_pretty(&mut handle, &output)?;
            writeln!(&mut handle)?;
        }
    }

    Ok(())
}

fn print_section(handle: &mut impl Write, title: &str, lines: Vec<String>) -> Result<()> {
    if lines.is_empty() {
        return Ok(());
    }
    writeln!(handle, "{} ({}):", title, lines.len())?;
    for line in lines {
        writeln!(handle, "  {line}")?;
    }
    Ok(())
}

fn print_query_help() {
    println!(
        r#"Map Search Query Syntax Help

A query is an optional run of flag characters followed by a label:

  FLAGS:
    !    Search every map, not just the current one
    -    Include pawns
    .    Include haulable items
    #    Only entities belonging to the player colony
    *    Match everything (ignore the label)

  LABEL:
    Matched case-insensitively as a substring of an entity's label
    (pawns also match on their kind). World-map locations match
    their label case-sensitively.

EXAMPLES:
  -joe          Pawns on the current map whose label or kind contains "joe"
  .steel        Haulable items containing "steel"
  !-.chunk      Pawns and items on every map containing "chunk"
  -.#           All colony pawns and items on the current map
  -.*           Everything visible on the current map

NOTES:
  - Flags may appear in any order; duplicates are harmless
  - A query without - or . selects nothing on maps; pick at least one
  - Fogged positions never match
  - Use --world to also search world-map locations"#
    );
}
