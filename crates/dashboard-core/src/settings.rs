use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;
use crate::formatting::NumberLocale;
use crate::models::MissingKeyPolicy;

/// Directory under the user's home that holds logs and persisted settings.
pub const APP_DIR_NAME: &str = ".sales-dashboard";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Order analytics dashboard: monthly trend, best-selling categories and RFM
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sales-dashboard",
    about = "Order analytics dashboard: monthly trend, best-selling categories and RFM",
    version
)]
pub struct Settings {
    /// Path to the order-line CSV (auto-discovered if not specified)
    #[arg(long, env = "SALES_DASHBOARD_DATA")]
    pub data: Option<PathBuf>,

    /// View mode
    #[arg(long, default_value = "dashboard", value_parser = ["dashboard", "report", "json"])]
    pub view: String,

    /// First day of the date filter, YYYY-MM-DD (defaults to the earliest order)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Last day of the date filter, YYYY-MM-DD (defaults to the latest order)
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    /// How rows without a product category are grouped
    #[arg(long, value_enum, default_value_t = MissingKeyPolicy::RetainMissing)]
    pub missing_categories: MissingKeyPolicy,

    /// Number of categories shown in the best-sellers chart (1-50)
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u16).range(1..=50))]
    pub top_categories: u16,

    /// Number of categories shown in each RFM chart (1-20)
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u16).range(1..=20))]
    pub top_rfm: u16,

    /// ISO 4217 currency code used for monetary figures
    #[arg(long, default_value = "USD")]
    pub currency: String,

    /// Number formatting locale
    #[arg(long, value_enum, default_value_t = NumberLocale::EnUs)]
    pub locale: NumberLocale,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.sales-dashboard/last_used.json`.
///
/// Date bounds are dataset-specific and never persisted.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_categories: Option<MissingKeyPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_categories: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_rfm: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<NumberLocale>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(APP_DIR_NAME).join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        Self::read_from(path).unwrap_or_else(|e| {
            tracing::warn!("ignoring unreadable settings file {}: {}", path.display(), e);
            Self::default()
        })
    }

    fn read_from(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;

        // Write to a temp file then rename.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<()> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!("could not clear {}: {}", config_path.display(), e);
            }
            return Self::resolve_overrides(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI (and env for `data`) always wins over persisted values.
        if !is_arg_explicitly_set(&matches, "data") && settings.data.is_none() {
            settings.data = last.data;
        }
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
        }
        // clap stores the arg id using the field name (underscores).
        if !is_arg_explicitly_set(&matches, "missing_categories") {
            if let Some(v) = last.missing_categories {
                settings.missing_categories = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "top_categories") {
            if let Some(v) = last.top_categories {
                settings.top_categories = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "top_rfm") {
            if let Some(v) = last.top_rfm {
                settings.top_rfm = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "currency") {
            if let Some(v) = last.currency {
                settings.currency = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "locale") {
            if let Some(v) = last.locale {
                settings.locale = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }

        settings = Self::resolve_overrides(settings);

        let params = LastUsedParams::from(&settings);
        if let Err(e) = params.save_to(config_path) {
            tracing::warn!("could not persist settings to {}: {}", config_path.display(), e);
        }

        settings
    }

    /// Apply flags that override other settings.
    fn resolve_overrides(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings.currency = settings.currency.to_uppercase();
        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            data: s.data.clone(),
            view: Some(s.view.clone()),
            missing_categories: Some(s.missing_categories),
            top_categories: Some(s.top_categories),
            top_rfm: Some(s.top_rfm),
            currency: Some(s.currency.clone()),
            locale: Some(s.locale),
            theme: Some(s.theme.clone()),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line.
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
