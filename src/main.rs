mod app;
mod config;
mod db;
mod export;
mod import;
mod logging;
mod query;
mod seed;
mod sighting;
mod ui;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;

use app::App;
use config::Config;

#[derive(Default)]
struct CliArgs {
    config_path: Option<PathBuf>,
    import_dir: Option<PathBuf>,
    export_path: Option<PathBuf>,
    seed_demo: bool,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = CliArgs::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("lifelist {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    parsed.config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                } else {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
            }
            "--import" => {
                if i + 1 < args.len() {
                    parsed.import_dir = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                } else {
                    eprintln!("Error: --import requires a directory argument");
                    std::process::exit(1);
                }
            }
            "--export" => {
                if i + 1 < args.len() {
                    parsed.export_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                } else {
                    eprintln!("Error: --export requires a file argument");
                    std::process::exit(1);
                }
            }
            "--seed-demo" => parsed.seed_demo = true,
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    parsed
}

fn print_help() {
    println!(
        r#"lifelist - TUI birding journal

USAGE:
    lifelist [OPTIONS]

OPTIONS:
    --config, -c PATH   Path to config file
    --import DIR        Import photos from DIR as sightings, then exit
    --export FILE       Export all sightings to FILE (.csv or .json), then exit
    --seed-demo         Seed demo sightings into an empty store
    --version, -V       Show version
    --help, -h          Show this help message

ENVIRONMENT:
    LIFELIST_LOG        Log level (trace, debug, info, warn, error)

Config file location: $XDG_CONFIG_HOME/lifelist/config.toml"#
    );
}

/// Insert one sighting per image found under `dir`, prefilled from EXIF.
/// Already-recorded photo paths are skipped so the command is safe to
/// repeat.
fn run_import(db: &db::Database, config: &Config, dir: &PathBuf) -> Result<()> {
    let images = import::discover_images(dir, &config.import.image_extensions)?;
    let known: std::collections::HashSet<String> = db
        .get_all_sightings()?
        .into_iter()
        .map(|s| s.file_path)
        .collect();

    let mut imported = 0usize;
    for path in &images {
        let input = import::sighting_from_photo(path);
        if known.contains(&input.file_path) || !sighting::validate(&input).is_valid() {
            continue;
        }
        db.insert_sighting(&input)?;
        imported += 1;
    }
    println!(
        "Imported {} of {} photos from {}",
        imported,
        images.len(),
        dir.display()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args();

    let _ = logging::init(Some(Config::config_dir().join("logs")));

    let config = match args.config_path {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // One resolver decision per process; every consumer gets this handle.
    let db = db::Database::resolve(&config.database)?;
    db.initialize()?;

    if args.seed_demo {
        let seeded = seed::seed_if_empty(&db)?;
        println!("Seeded {} demo sightings", seeded);
    }

    // One-shot modes run headless.
    if let Some(ref dir) = args.import_dir {
        run_import(&db, &config, dir)?;
        return Ok(());
    }
    if let Some(ref path) = args.export_path {
        let format = export::ExportFormat::from_path(path);
        let count = export::export_sightings(&db, path, format)?;
        println!("Exported {} sightings to {}", count, path.display());
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(config, db)?;
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
