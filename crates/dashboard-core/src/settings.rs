use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::formatting::Currency;
use crate::timestamps::TimestampParser;

/// Dataset location used when neither the CLI nor last-used params name one.
pub const DEFAULT_DATA_PATH: &str = "dashboard/all_data.csv";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Sales, category and seller-city dashboard for e-commerce order data
#[derive(Parser, Debug, Clone)]
#[command(
    name = "olist-dashboard",
    about = "Sales, category and seller-city dashboard for e-commerce order data",
    version
)]
pub struct Settings {
    /// Path to the joined orders CSV
    #[arg(long, default_value = DEFAULT_DATA_PATH)]
    pub data_path: PathBuf,

    /// First day of the date range (YYYY-MM-DD, inclusive)
    #[arg(long, value_parser = parse_cli_date)]
    pub start_date: Option<NaiveDate>,

    /// Last day of the date range (YYYY-MM-DD, inclusive)
    #[arg(long, value_parser = parse_cli_date)]
    pub end_date: Option<NaiveDate>,

    /// Rows in each top / bottom ranking (1-50)
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..=50))]
    pub top_n: u32,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Currency used for revenue figures
    #[arg(long, default_value = "BRL", value_parser = ["BRL", "USD"])]
    pub currency: String,

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

/// clap value parser for `YYYY-MM-DD` dates.
fn parse_cli_date(s: &str) -> Result<NaiveDate, String> {
    TimestampParser::parse_date(s).ok_or_else(|| format!("expected YYYY-MM-DD, got {s:?}"))
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.olist-dashboard/last_used.json`.
///
/// The date range is deliberately absent: it always defaults to the
/// dataset's full span on a new run.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_n: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl LastUsedParams {
    /// Default path of the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Config path rooted at `base_dir`.
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".olist-dashboard").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Atomically write params to `path`, creating parent directories if
    /// needed.
    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at `path` if it exists.
    pub fn clear_at(path: &Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process command line. No files are read or written, so
    /// this can run before logging is installed.
    pub fn parse_cli() -> (Self, clap::ArgMatches) {
        Self::parse_args(std::env::args_os().collect())
    }

    /// Parse `args`, applying `--debug`.  The returned matches record which
    /// values came from the command line.
    pub fn parse_args(args: Vec<std::ffi::OsString>) -> (Self, clap::ArgMatches) {
        let matches = Settings::command().get_matches_from(args.clone());
        let settings = Settings::parse_from(args).apply_debug_flag();
        (settings, matches)
    }

    /// Merge last-used params from the default config path and persist the
    /// result.
    pub fn merge_last_used(self, matches: &clap::ArgMatches) -> Self {
        self.merge_last_used_at(matches, &LastUsedParams::config_path())
    }

    /// Fill values not given on the command line from `config_path`, then
    /// write the merged values back.  With `--clear` the file is removed
    /// instead and nothing is merged.
    pub fn merge_last_used_at(mut self, matches: &clap::ArgMatches, config_path: &Path) -> Self {
        if self.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!("Failed to clear {}: {}", config_path.display(), e);
            }
            return self;
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins over persisted values.
        if !is_arg_explicitly_set(matches, "data_path") {
            if let Some(v) = last.data_path {
                self.data_path = v;
            }
        }
        if !is_arg_explicitly_set(matches, "theme") {
            if let Some(v) = last.theme {
                self.theme = v;
            }
        }
        if !is_arg_explicitly_set(matches, "top_n") {
            if let Some(v) = last.top_n.filter(|n| (1..=50).contains(n)) {
                self.top_n = v;
            }
        }
        if !is_arg_explicitly_set(matches, "currency") {
            if let Some(v) = last.currency {
                self.currency = v;
            }
        }

        if let Err(e) = LastUsedParams::from(&self).save_to(config_path) {
            tracing::warn!("Failed to persist settings: {}", e);
        }

        self
    }

    /// [`parse_args`](Self::parse_args) followed by
    /// [`merge_last_used_at`](Self::merge_last_used_at).
    pub fn load_with_last_used_impl(args: Vec<std::ffi::OsString>, config_path: &Path) -> Self {
        let (settings, matches) = Self::parse_args(args);
        settings.merge_last_used_at(&matches, config_path)
    }

    /// `--debug` overrides the log level.
    fn apply_debug_flag(mut self) -> Self {
        if self.debug {
            self.log_level = "DEBUG".to_string();
        }
        self
    }

    /// Parsed display currency; unknown codes fall back to BRL.
    pub fn currency(&self) -> Currency {
        self.currency.parse().unwrap_or_default()
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            theme: Some(s.theme.clone()),
            data_path: Some(s.data_path.clone()),
            top_n: Some(s.top_n),
            currency: Some(s.currency.clone()),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tmp_config_path(tmp: &TempDir) -> PathBuf {
        LastUsedParams::config_path_in(tmp.path())
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_last_used_params_save_load() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        let params = LastUsedParams {
            theme: Some("dark".to_string()),
            data_path: Some(PathBuf::from("/data/orders.csv")),
            top_n: Some(5),
            currency: Some("USD".to_string()),
        };
        params.save_to(&path).expect("save");

        let loaded = LastUsedParams::load_from(&path);
        assert_eq!(loaded.theme, Some("dark".to_string()));
        assert_eq!(loaded.data_path, Some(PathBuf::from("/data/orders.csv")));
        assert_eq!(loaded.top_n, Some(5));
        assert_eq!(loaded.currency, Some("USD".to_string()));
    }

    #[test]
    fn test_last_used_params_default_when_missing_or_corrupt() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        assert!(LastUsedParams::load_from(&path).theme.is_none());

        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        assert!(LastUsedParams::load_from(&path).top_n.is_none());
    }

    #[test]
    fn test_last_used_params_clear() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        LastUsedParams::default().save_to(&path).expect("save");
        assert!(path.exists());

        LastUsedParams::clear_at(&path).expect("clear");
        assert!(!path.exists());
        // Clearing a missing file is not an error.
        LastUsedParams::clear_at(&path).expect("clear again");
    }

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["olist-dashboard"]);

        assert_eq!(settings.data_path, PathBuf::from(DEFAULT_DATA_PATH));
        assert!(settings.start_date.is_none());
        assert!(settings.end_date.is_none());
        assert_eq!(settings.top_n, 10);
        assert_eq!(settings.theme, "auto");
        assert_eq!(settings.currency, "BRL");
        assert_eq!(settings.currency(), Currency::Brl);
        assert_eq!(settings.log_level, "INFO");
        assert!(settings.log_file.is_none());
        assert!(!settings.debug);
        assert!(!settings.clear);
    }

    #[test]
    fn test_settings_cli_dates() {
        let settings = Settings::parse_from([
            "olist-dashboard",
            "--start-date",
            "2017-01-01",
            "--end-date",
            "2017-12-31",
        ]);
        assert_eq!(settings.start_date, Some(day(2017, 1, 1)));
        assert_eq!(settings.end_date, Some(day(2017, 12, 31)));
    }

    #[test]
    fn test_settings_cli_rejects_bad_date() {
        let result = Settings::try_parse_from(["olist-dashboard", "--start-date", "01/02/2017"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_cli_top_n_range() {
        assert!(Settings::try_parse_from(["olist-dashboard", "--top-n", "0"]).is_err());
        assert!(Settings::try_parse_from(["olist-dashboard", "--top-n", "51"]).is_err());
        let settings = Settings::parse_from(["olist-dashboard", "--top-n", "3"]);
        assert_eq!(settings.top_n, 3);
    }

    #[test]
    fn test_load_with_last_used_merges_persisted_values() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("dark".to_string()),
            data_path: Some(PathBuf::from("/srv/all_data.csv")),
            top_n: Some(7),
            currency: Some("USD".to_string()),
        }
        .save_to(&config_path)
        .expect("save");

        let settings =
            Settings::load_with_last_used_impl(vec!["olist-dashboard".into()], &config_path);
        assert_eq!(settings.theme, "dark");
        assert_eq!(settings.data_path, PathBuf::from("/srv/all_data.csv"));
        assert_eq!(settings.top_n, 7);
        assert_eq!(settings.currency(), Currency::Usd);
    }

    #[test]
    fn test_load_with_last_used_cli_overrides_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("dark".to_string()),
            top_n: Some(7),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec![
                "olist-dashboard".into(),
                "--theme".into(),
                "light".into(),
                "--top-n".into(),
                "3".into(),
            ],
            &config_path,
        );
        assert_eq!(settings.theme, "light");
        assert_eq!(settings.top_n, 3);
    }

    #[test]
    fn test_load_with_last_used_ignores_out_of_range_top_n() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            top_n: Some(500),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings =
            Settings::load_with_last_used_impl(vec!["olist-dashboard".into()], &config_path);
        assert_eq!(settings.top_n, 10);
    }

    #[test]
    fn test_load_with_last_used_clear_removes_file() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("classic".to_string()),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec!["olist-dashboard".into(), "--clear".into()],
            &config_path,
        );

        assert!(!config_path.exists(), "file must be gone after --clear");
        assert_eq!(settings.theme, "auto");
    }

    #[test]
    fn test_load_with_last_used_debug_overrides_log_level() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let settings = Settings::load_with_last_used_impl(
            vec!["olist-dashboard".into(), "--debug".into()],
            &config_path,
        );
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_load_with_last_used_persists_without_dates() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        Settings::load_with_last_used_impl(
            vec![
                "olist-dashboard".into(),
                "--theme".into(),
                "classic".into(),
                "--start-date".into(),
                "2017-01-01".into(),
            ],
            &config_path,
        );

        assert!(config_path.exists(), "config must be persisted after run");
        let content = std::fs::read_to_string(&config_path).unwrap();
        assert!(!content.contains("2017-01-01"));
        let loaded = LastUsedParams::load_from(&config_path);
        assert_eq!(loaded.theme, Some("classic".to_string()));
    }

    #[test]
    fn test_parse_args_leaves_config_untouched() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("dark".to_string()),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");
        let before = std::fs::read_to_string(&config_path).unwrap();

        let (settings, matches) = Settings::parse_args(vec![
            "olist-dashboard".into(),
            "--debug".into(),
            "--top-n".into(),
            "4".into(),
        ]);
        assert_eq!(settings.log_level, "DEBUG");
        assert_eq!(settings.theme, "auto");
        assert_eq!(std::fs::read_to_string(&config_path).unwrap(), before);

        let merged = settings.merge_last_used_at(&matches, &config_path);
        assert_eq!(merged.theme, "dark");
        assert_eq!(merged.top_n, 4);
        assert_eq!(merged.log_level, "DEBUG");
        assert_eq!(LastUsedParams::load_from(&config_path).top_n, Some(4));
    }
}
