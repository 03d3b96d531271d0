mod bootstrap;
mod prompt;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use bikeshare_core::models::CityCatalog;
use bikeshare_core::settings::{LastUsedParams, Settings};
use bikeshare_data::analysis::{explore, ExplorationReport};
use bikeshare_data::filter::FilteredView;
use bikeshare_data::pager::pages;
use bikeshare_data::reader::RecordStore;
use bikeshare_ui::report_view::render_report;
use bikeshare_ui::table_view::render_page;

use crate::prompt::Prompter;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Bikeshare explorer v{} starting", env!("CARGO_PKG_VERSION"));

    let data_dir = bootstrap::discover_data_path(settings.data_dir.as_deref()).unwrap_or_else(|| {
        tracing::warn!("No city sources found in ./data, . or ~/.bikeshare/data");
        PathBuf::from("data")
    });
    tracing::info!("Reading city sources from {}", data_dir.display());

    let store = RecordStore::new(CityCatalog::new(data_dir));

    match settings.city.clone() {
        Some(city) => run_once(&settings, &store, &city),
        None => run_interactive(&settings, &store),
    }
}

// ── Non-interactive run ────────────────────────────────────────────────────────

/// One report for the city and filters given on the command line.
fn run_once(settings: &Settings, store: &RecordStore, city: &str) -> Result<()> {
    let selection = settings.selection().context("invalid --month or --day")?;
    let exploration =
        explore(store, city, selection).with_context(|| format!("exploring {city}"))?;
    let view = exploration.view();
    let report = exploration.report(&view);

    let mut stdout = io::stdout().lock();
    print_report(&mut stdout, &report, settings.wants_json())?;

    let mut last_used = settings.last_used.clone();
    last_used.remember_selection(exploration.dataset().city().id(), &selection);
    persist(&last_used);
    Ok(())
}

// ── Interactive loop ───────────────────────────────────────────────────────────

fn run_interactive(settings: &Settings, store: &RecordStore) -> Result<()> {
    let mut prompter = Prompter::new(io::stdin().lock(), io::stdout().lock());
    let mut last_used = settings.last_used.clone();
    let page_size = settings.page_size as usize;

    writeln!(prompter.output(), "Hello! Let's explore some US bikeshare data!")?;

    loop {
        let defaults = [
            last_used.city.as_deref(),
            last_used.month.as_deref(),
            last_used.day.as_deref(),
        ];
        let Some((city, selection)) = prompter.ask_filters(defaults)? else {
            break;
        };

        match explore(store, city.id(), selection) {
            Ok(exploration) => {
                let view = exploration.view();
                let report = exploration.report(&view);
                print_report(prompter.output(), &report, settings.wants_json())?;
                show_rows(&mut prompter, &view, page_size)?;

                last_used.remember_selection(city.id(), &selection);
                persist(&last_used);
            }
            Err(e) => {
                tracing::error!("Loading {} failed: {}", city, e);
                writeln!(prompter.output(), "\nCould not load data for {city}: {e}")?;
            }
        }

        if !prompter.ask_yes_no("Would you like to restart?")? {
            break;
        }
    }

    tracing::info!("Goodbye");
    Ok(())
}

/// Offer the filtered rows page by page until declined or exhausted.
fn show_rows<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    view: &FilteredView<'_>,
    page_size: usize,
) -> Result<()> {
    let mut question = "Would you like to see the filtered data?".to_string();
    for page in pages(view, page_size) {
        if !prompter.ask_yes_no(&question)? {
            break;
        }
        writeln!(prompter.output(), "\n{}", render_page(&page, view))?;

        let next_first = page.last_row_number() + 1;
        let next_last = (page.last_row_number() + page_size).min(view.len());
        question = format!("Would you like to see data for rows {next_first} to {next_last}?");
    }
    Ok(())
}

fn print_report(out: &mut impl Write, report: &ExplorationReport, json: bool) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&report.to_json())?)?;
    } else {
        writeln!(out, "{}", render_report(report))?;
    }
    Ok(())
}

fn persist(params: &LastUsedParams) {
    if let Err(e) = params.save() {
        tracing::warn!("Could not save last-used parameters: {}", e);
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
