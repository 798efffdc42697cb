use crate::error::{AppError, Result};
use crate::sheets::CellRange;
use chrono_tz::Tz;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const CONFIG_DIR_PREFIX: &str = "billy-sheets-sync";
const CONFIG_FILE_NAME: &str = "config.toml";

pub const DEFAULT_API_BASE_URL: &str = "https://api.billysbilling.com/v2/";
pub const DEFAULT_FINANCIAL_YEAR: i32 = 2017;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub billy: BillyConfig,
    pub google: GoogleConfig,
    pub export: ExportConfig,
    #[serde(skip)]
    pub layout: LayoutConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BillyConfig {
    pub api_token: String,
    pub api_base_url: String,
    /// Verify the API's TLS certificate chain. Off unless explicitly enabled.
    pub verify_tls: bool,
}

impl Default for BillyConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            verify_tls: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct GoogleConfig {
    pub spreadsheet_id: String,
    /// Service account key, the JSON document itself rather than a path
    pub credentials: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ExportConfig {
    pub financial_year: i32,
    pub excluded_accounts: AccountRanges,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            financial_year: DEFAULT_FINANCIAL_YEAR,
            excluded_accounts: AccountRanges::default(),
        }
    }
}

/// Half-open range of account numbers, `start..end`.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct AccountRange {
    pub start: u32,
    pub end: u32,
}

impl AccountRange {
    pub fn contains(&self, account_no: u32) -> bool {
        (self.start..self.end).contains(&account_no)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct AccountRanges(Vec<AccountRange>);

impl AccountRanges {
    pub fn contains(&self, account_no: u32) -> bool {
        self.0.iter().any(|range| range.contains(account_no))
    }

    fn validate(&self) -> Result<()> {
        match self.0.iter().find(|range| range.start >= range.end) {
            Some(range) => Err(AppError::Config(format!(
                "Excluded account range {}-{} is empty",
                range.start, range.end
            ))),
            None => Ok(()),
        }
    }
}

impl Default for AccountRanges {
    fn default() -> Self {
        Self(vec![AccountRange {
            start: 62000,
            end: 63000,
        }])
    }
}

/// Parses `62000-63000,70000-70100`. An empty string means no exclusions.
impl FromStr for AccountRanges {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let mut ranges = Vec::new();

        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (start, end) = part.split_once('-').ok_or_else(|| {
                AppError::Config(format!("Expected START-END in account range '{}'", part))
            })?;
            let parse = |value: &str| {
                value.trim().parse::<u32>().map_err(|e| {
                    AppError::Config(format!("Invalid account number in '{}': {}", part, e))
                })
            };
            ranges.push(AccountRange {
                start: parse(start)?,
                end: parse(end)?,
            });
        }

        Ok(Self(ranges))
    }
}

/// Positional layout of the target spreadsheet.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub worksheet_index: usize,
    pub data_range: CellRange,
    pub account_slots: usize,
    pub metadata_range: CellRange,
    pub timezone: Tz,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            worksheet_index: 1,
            data_range: CellRange::new(2, 150, 1, 4),
            account_slots: 37,
            metadata_range: CellRange::new(4, 5, 6, 6),
            timezone: chrono_tz::Europe::Copenhagen,
        }
    }
}

/// Values taken from the command line or environment, applied on top of the
/// config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_token: Option<String>,
    pub spreadsheet_id: Option<String>,
    pub credentials: Option<String>,
    pub financial_year: Option<i32>,
    pub excluded_accounts: Option<AccountRanges>,
}

impl Config {
    /// Load the config file if there is one. An explicit `path` must exist;
    /// without one a missing default file yields the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) if !path.exists() => {
                return Err(AppError::Config(format!(
                    "Config file not found at {:?}",
                    path
                )));
            }
            Some(path) => Some(path.to_path_buf()),
            None => Self::xdg_dirs().find_config_file(CONFIG_FILE_NAME),
        };

        let Some(config_path) = config_path else {
            return Ok(Self::default());
        };

        let contents = fs::read_to_string(&config_path)?;
        toml::from_str(&contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(api_token) = overrides.api_token {
            self.billy.api_token = api_token;
        }
        if let Some(spreadsheet_id) = overrides.spreadsheet_id {
            self.google.spreadsheet_id = spreadsheet_id;
        }
        if let Some(credentials) = overrides.credentials {
            self.google.credentials = credentials;
        }
        if let Some(financial_year) = overrides.financial_year {
            self.export.financial_year = financial_year;
        }
        if let Some(excluded_accounts) = overrides.excluded_accounts {
            self.export.excluded_accounts = excluded_accounts;
        }
        self
    }

    /// Check that everything needed for a run is present. Google settings are
    /// only required when the spreadsheet is going to be written.
    pub fn validate(&self, require_google: bool) -> Result<()> {
        if self.billy.api_token.is_empty() {
            return Err(AppError::Config(
                "Billy API token must be set (BILLY_API_TOKEN)".to_string(),
            ));
        }

        if require_google && self.google.spreadsheet_id.is_empty() {
            return Err(AppError::Config(
                "Spreadsheet id must be set (GOOGLE_SPREADSHEET_ID)".to_string(),
            ));
        }

        if require_google && self.google.credentials.is_empty() {
            return Err(AppError::Config(
                "Service account credentials must be set (GOOGLE_CREDENTIALS)".to_string(),
            ));
        }

        self.export.excluded_accounts.validate()
    }

    fn xdg_dirs() -> xdg::BaseDirectories {
        xdg::BaseDirectories::with_prefix(CONFIG_DIR_PREFIX)
    }

    /// Get the config file path
    pub fn config_file() -> Result<PathBuf> {
        Self::xdg_dirs()
            .place_config_file(CONFIG_FILE_NAME)
            .map_err(|e| AppError::Config(format!("Failed to create config directory: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_toml() {
        let contents = r#"
            [billy]
            api_token = "token"

            [google]
            spreadsheet_id = "sheet"

            [export]
            financial_year = 2019
            excluded_accounts = [{ start = 1000, end = 2000 }]
        "#;

        let config: Config = toml::from_str(contents).unwrap();

        assert_eq!(config.billy.api_token, "token");
        assert_eq!(config.billy.api_base_url, DEFAULT_API_BASE_URL);
        assert!(!config.billy.verify_tls);
        assert_eq!(config.google.spreadsheet_id, "sheet");
        assert_eq!(config.export.financial_year, 2019);
        assert!(config.export.excluded_accounts.contains(1500));
        assert!(!config.export.excluded_accounts.contains(62500));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.export.financial_year, 2017);
        assert!(config.export.excluded_accounts.contains(62000));
        assert!(config.export.excluded_accounts.contains(62999));
        assert!(!config.export.excluded_accounts.contains(63000));
        assert!(!config.export.excluded_accounts.contains(61999));
        assert_eq!(config.layout.worksheet_index, 1);
        assert_eq!(config.layout.account_slots, 37);
        assert_eq!(config.layout.timezone, chrono_tz::Europe::Copenhagen);
    }

    #[test]
    fn test_account_ranges_from_str() {
        let ranges: AccountRanges = "62000-63000, 70000-70100".parse().unwrap();
        assert_eq!(
            ranges,
            AccountRanges(vec![
                AccountRange {
                    start: 62000,
                    end: 63000
                },
                AccountRange {
                    start: 70000,
                    end: 70100
                },
            ])
        );

        let empty: AccountRanges = "".parse().unwrap();
        assert!(!empty.contains(62500));

        assert!("62000".parse::<AccountRanges>().is_err());
        assert!("abc-63000".parse::<AccountRanges>().is_err());
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let config = Config::default().with_overrides(Overrides {
            api_token: Some("env-token".to_string()),
            financial_year: Some(2020),
            ..Default::default()
        });

        assert_eq!(config.billy.api_token, "env-token");
        assert_eq!(config.export.financial_year, 2020);
        assert_eq!(config.export.excluded_accounts, AccountRanges::default());
    }

    #[test]
    fn test_validate() {
        let mut config = Config::default();
        assert!(config.validate(false).is_err());

        config.billy.api_token = "token".to_string();
        assert!(config.validate(false).is_ok());
        assert!(config.validate(true).is_err());

        config.google.spreadsheet_id = "sheet".to_string();
        config.google.credentials = "{}".to_string();
        assert!(config.validate(true).is_ok());

        config.export.excluded_accounts = "63000-62000".parse().unwrap();
        assert!(config.validate(true).is_err());
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let result = Config::load(Some(Path::new("/nonexistent/billy-sheets-sync.toml")));
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
