// Clinic Agenda
// Command-line entry point: prints the agenda grid for a snapshot

use std::path::PathBuf;

use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveDateTime, Utc};
use clap::Parser;

use clinic_agenda::grid::text::render_text;
use clinic_agenda::grid::{GridView, Viewport};
use clinic_agenda::models::settings::GridSettings;
use clinic_agenda::services::settings::SettingsService;
use clinic_agenda::services::snapshot::load_snapshot;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Print the clinic agenda grid for a snapshot", long_about = None)]
struct CliArgs {
    /// Agenda snapshot (JSON)
    #[clap(value_name = "AGENDA_JSON")]
    snapshot: PathBuf,
    /// Anchor date, defaults to today in the clinic timezone
    #[clap(long, value_name = "YYYY-MM-DD")]
    date: Option<NaiveDate>,
    /// Render only the rows visible in this scroll window
    #[clap(long = "virtual", num_args = 2, allow_negative_numbers = true, value_names = ["SCROLL_TOP", "VIEWPORT_HEIGHT"])]
    window: Option<Vec<f32>>,
}

impl CliArgs {
    fn viewport(&self) -> Option<Viewport> {
        match self.window.as_deref() {
            Some([scroll_top, height]) => Some(Viewport::new(*scroll_top, *height)),
            _ => None,
        }
    }
}

/// Wall-clock "now" in the clinic's timezone, or the local one
fn clinic_now(settings: &GridSettings) -> NaiveDateTime {
    match settings.resolve_timezone() {
        Ok(Some(tz)) => Utc::now().with_timezone(&tz).naive_local(),
        Ok(None) => Local::now().naive_local(),
        Err(err) => {
            log::warn!("{}; falling back to local time", err);
            Local::now().naive_local()
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = CliArgs::parse();
    let viewport = args.viewport();

    let mut settings = SettingsService::from_env().load()?;
    let snapshot = load_snapshot(&args.snapshot)?;

    let now = clinic_now(&settings);
    let anchor = args.date.unwrap_or_else(|| now.date());

    if viewport.is_some() {
        settings.virtualize = true;
    }
    // without --virtual the whole day fits the window
    let viewport = viewport.unwrap_or(Viewport::new(0.0, f32::MAX));

    log::info!("Rendering {} view anchored on {}", settings.view_mode, anchor);

    let mut grid = GridView::new(settings, snapshot.into_agenda_data(), anchor);
    let frame = grid.render(viewport, now);
    print!("{}", render_text(&frame));

    grid.unmount();
    Ok(())
}
