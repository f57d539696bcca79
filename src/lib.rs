//! NBA team box score collection
//!
//! Fetches box score tables and the daily schedule from nba.com through the
//! ScrapingAnt proxy, parses the HTML into per-team rows, and reshapes them
//! into one record per game with home and visitor columns side by side.

pub mod data;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Team identifier embedded in nba.com URLs (e.g. "1610612740")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamId(pub String);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ten-digit game identifier embedded in nba.com URLs (e.g. "0022200191")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameId(pub String);

impl GameId {
    /// Season start year encoded in the id.
    ///
    /// Digit 3 is the game kind (2 = regular season), digits 4-5 are the
    /// two-digit season year: "0022200191" -> 2022.
    pub fn season(&self) -> Option<u16> {
        let digits = self.0.get(3..5)?;
        let yy: u16 = digits.parse().ok()?;
        Some(2000 + yy)
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Season in nba.com query form, e.g. "2022-23"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season(pub String);

impl Season {
    /// Build a season label from its start year: 2022 -> "2022-23"
    pub fn from_start_year(year: u16) -> Self {
        Season(format!("{}-{:02}", year, (year + 1) % 100))
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Box score table variant on nba.com/stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatType {
    #[default]
    Standard,
    Advanced,
    FourFactors,
    Misc,
    Scoring,
}

impl StatType {
    /// URL suffix appended to the boxscores path, None for the standard table
    pub fn url_suffix(&self) -> Option<&'static str> {
        match self {
            StatType::Standard => None,
            StatType::Advanced => Some("advanced"),
            StatType::FourFactors => Some("four-factors"),
            StatType::Misc => Some("misc"),
            StatType::Scoring => Some("scoring"),
        }
    }
}

impl FromStr for StatType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(StatType::Standard),
            "advanced" => Ok(StatType::Advanced),
            "four-factors" => Ok(StatType::FourFactors),
            "misc" => Ok(StatType::Misc),
            "scoring" => Ok(StatType::Scoring),
            _ => Err(format!(
                "Unknown stat type: {}. Use standard, advanced, four-factors, misc, or scoring.",
                s
            )),
        }
    }
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.url_suffix() {
            Some(suffix) => write!(f, "{}", suffix),
            None => write!(f, "standard"),
        }
    }
}

/// Pages we scrape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Boxscores,
    Schedule,
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Page::Boxscores => write!(f, "box scores"),
            Page::Schedule => write!(f, "schedule"),
        }
    }
}

/// One game with home and visitor stats merged into a single row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    #[serde(rename = "GAME_DATE_EST")]
    pub game_date_est: NaiveDate,
    #[serde(rename = "GAME_ID")]
    pub game_id: GameId,
    #[serde(rename = "HOME_TEAM_ID")]
    pub home_team_id: TeamId,
    #[serde(rename = "VISITOR_TEAM_ID")]
    pub visitor_team_id: TeamId,
    #[serde(rename = "SEASON")]
    pub season: u16,
    #[serde(rename = "PTS_home")]
    pub pts_home: u16,
    #[serde(rename = "FG_PCT_home")]
    pub fg_pct_home: f32,
    #[serde(rename = "FT_PCT_home")]
    pub ft_pct_home: f32,
    #[serde(rename = "FG3_PCT_home")]
    pub fg3_pct_home: f32,
    #[serde(rename = "AST_home")]
    pub ast_home: u16,
    #[serde(rename = "REB_home")]
    pub reb_home: u16,
    #[serde(rename = "PTS_away")]
    pub pts_away: u16,
    #[serde(rename = "FG_PCT_away")]
    pub fg_pct_away: f32,
    #[serde(rename = "FT_PCT_away")]
    pub ft_pct_away: f32,
    #[serde(rename = "FG3_PCT_away")]
    pub fg3_pct_away: f32,
    #[serde(rename = "AST_away")]
    pub ast_away: u16,
    #[serde(rename = "REB_away")]
    pub reb_away: u16,
    #[serde(rename = "HOME_TEAM_WINS")]
    pub home_team_wins: bool,
}

impl GameRecord {
    /// Column names of the output schema, in CSV order
    pub const COLUMNS: [&'static str; 18] = [
        "GAME_DATE_EST",
        "GAME_ID",
        "HOME_TEAM_ID",
        "VISITOR_TEAM_ID",
        "SEASON",
        "PTS_home",
        "FG_PCT_home",
        "FT_PCT_home",
        "FG3_PCT_home",
        "AST_home",
        "REB_home",
        "PTS_away",
        "FG_PCT_away",
        "FT_PCT_away",
        "FG3_PCT_away",
        "AST_away",
        "REB_away",
        "HOME_TEAM_WINS",
    ];
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum BoxScoreError {
    #[error("Scrape failed for {page}: {message}")]
    Scrape { page: Page, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Proxy returned HTTP {status} for {url}")]
    Proxy { status: u16, url: String },

    #[error("No API key: set SCRAPINGANT_API_KEY or api_key in config.toml")]
    MissingApiKey,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, BoxScoreError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub scraper: ScraperConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// ScrapingAnt API token; the SCRAPINGANT_API_KEY env var takes priority
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub data_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            scraper: ScraperConfig {
                api_key: None,
                timeout_secs: 30,
            },
            output: OutputConfig {
                data_dir: "data".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BoxScoreError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| BoxScoreError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| BoxScoreError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolve the ScrapingAnt token: env var first, then the config file
    pub fn api_key(&self) -> Result<String> {
        if let Ok(key) = std::env::var("SCRAPINGANT_API_KEY") {
            if !key.is_empty() {
                return Ok(key);
            }
        }
        self.scraper
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or(BoxScoreError::MissingApiKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_id_season() {
        assert_eq!(GameId("0022200191".to_string()).season(), Some(2022));
        assert_eq!(GameId("0021900005".to_string()).season(), Some(2019));
        assert_eq!(GameId("xx".to_string()).season(), None);
    }

    #[test]
    fn test_season_from_start_year() {
        assert_eq!(Season::from_start_year(2022).0, "2022-23");
        assert_eq!(Season::from_start_year(1999).0, "1999-00");
        assert_eq!(Season::from_start_year(2009).0, "2009-10");
    }

    #[test]
    fn test_stat_type_from_str() {
        assert_eq!("standard".parse::<StatType>(), Ok(StatType::Standard));
        assert_eq!("Four-Factors".parse::<StatType>(), Ok(StatType::FourFactors));
        assert_eq!("scoring".parse::<StatType>(), Ok(StatType::Scoring));
        assert!("rebounding".parse::<StatType>().is_err());
    }

    #[test]
    fn test_stat_type_suffix() {
        assert_eq!(StatType::Standard.url_suffix(), None);
        assert_eq!(StatType::Advanced.url_suffix(), Some("advanced"));
        assert_eq!(StatType::FourFactors.url_suffix(), Some("four-factors"));
    }
}
