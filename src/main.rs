use clap::Parser;
use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;

use modhub::core::config::{self, ResolvedConfig};
use modhub::core::navigation::{HubLayout, NavOutcome};
use modhub::tui;
use modhub::tui::demo::{DemoSettings, demo_hub};

#[derive(Parser)]
#[command(name = "modhub", about = "In-game settings hub for mods")]
struct Args {
    /// Display slots, including NEXT and BACK
    #[arg(short, long)]
    capacity: Option<usize>,

    /// Log level written to modhub.log (off, error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,

    /// Print the demo hub's screens as JSON instead of starting the TUI
    #[arg(long)]
    snapshot: bool,
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = config::load_config();
    let cli_log_level = args
        .log_level
        .as_deref()
        .and_then(|level| level.parse::<LevelFilter>().ok());
    let resolved = match &file_config {
        Ok(c) => config::resolve(c, args.capacity, cli_log_level),
        Err(_) => config::resolve(&Default::default(), args.capacity, cli_log_level),
    };

    // Initialize file logger - writes to modhub.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("modhub.log") {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    if let Err(e) = &file_config {
        log::error!("Ignoring config file: {}", e);
    }
    log::info!(
        "Modhub starting up with capacity {} (log level {})",
        resolved.capacity,
        resolved.log_level
    );

    if args.snapshot {
        return print_snapshot(&resolved);
    }
    tui::run(resolved)
}

/// Open the demo hub, walk every index window and every page, and print
/// the screens as one JSON array.
fn print_snapshot(config: &ResolvedConfig) -> std::io::Result<()> {
    let demo = DemoSettings::default();
    let mut hub = demo_hub(config.hub.clone(), &demo)
        .map_err(|e| std::io::Error::other(format!("failed to register demo pages: {e}")))?;
    let capacity = config.capacity;

    let mut screens = Vec::new();
    hub.open();
    while let Some(frame) = hub.render(capacity) {
        let next = frame.next_row.filter(|_| frame.has_next);
        screens.push(frame);
        match next {
            Some(row) => {
                hub.select(capacity, row, 0);
            }
            None => break,
        }
    }

    if let Some(layout) = HubLayout::new(capacity)
        && layout.list_slots > 0
        && let Some(next_row) = layout.next_row
    {
        for page in 0..hub.pages().len() {
            hub.open();
            for _ in 0..page / layout.step {
                hub.select(capacity, next_row, 0);
            }
            if let NavOutcome::OpenedPage(_) = hub.select(capacity, page % layout.step, 0)
                && let Some(frame) = hub.render(capacity)
            {
                screens.push(frame);
            }
        }
    }
    hub.close();

    let json = serde_json::to_string_pretty(&screens).map_err(std::io::Error::other)?;
    println!("{json}");
    Ok(())
}
