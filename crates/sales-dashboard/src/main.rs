mod bootstrap;

use anyhow::{Context, Result};
use dashboard_core::models::DateRange;
use dashboard_core::settings::Settings;
use dashboard_data::analysis::build_report;
use dashboard_data::reader::load_orders;
use dashboard_ui::app::{App, DisplayOptions};
use dashboard_ui::text_report::render_text_report;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    // The dashboard owns the terminal, so its logs go to a file by default.
    let log_file = match (&settings.log_file, settings.view.as_str()) {
        (Some(path), _) => Some(path.clone()),
        (None, "dashboard") => Some(bootstrap::default_dashboard_log()),
        (None, _) => None,
    };
    bootstrap::setup_logging(&settings.log_level, log_file.as_ref())?;

    tracing::info!("Sales Dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Theme: {}, Missing categories: {}",
        settings.view,
        settings.theme,
        settings.missing_categories
    );

    let data_path = bootstrap::discover_data_path(settings.data.as_deref())?;
    let dataset = load_orders(&data_path)
        .with_context(|| format!("could not load {}", data_path.display()))?;

    let range = resolve_range(&settings, dataset.full_range())?;
    let options = DisplayOptions::from(&settings);
    let policy = settings.missing_categories;

    match settings.view.as_str() {
        "dashboard" => {
            let app = App::new(dataset, range, policy, options, &settings.theme)?;
            app.run()?;
        }
        "report" => {
            let report = build_report(&dataset, &range, policy)?;
            print!("{}", render_text_report(&report, &options));
        }
        "json" => {
            let report = build_report(&dataset, &range, policy)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        unknown => anyhow::bail!("Unknown view mode: {unknown}"),
    }

    Ok(())
}

/// The filter range: CLI dates where given, the dataset's own span otherwise.
fn resolve_range(settings: &Settings, full: Option<DateRange>) -> Result<DateRange> {
    let start = settings.start_date.or(full.map(|r| r.start()));
    let end = settings.end_date.or(full.map(|r| r.end()));
    match (start, end) {
        (Some(start), Some(end)) => Ok(DateRange::new(start, end)?),
        _ => anyhow::bail!("the dataset has no orders; pass both --start-date and --end-date"),
    }
}
