//! NBA box score CLI
//!
//! Pulls team box scores and the daily schedule from nba.com via the
//! ScrapingAnt proxy and emits a per-game dataset.

use clap::{Parser, Subcommand};
use boxscore::{Config, Result};

#[derive(Parser)]
#[command(name = "boxscore")]
#[command(about = "NBA team box score scraper and per-game dataset builder", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch team box scores and build the per-game dataset
    Boxscores {
        /// Season label like 2022-23 (defaults to the current season)
        #[arg(long)]
        season: Option<String>,
        /// Start of the date window, YYYY-MM-DD
        #[arg(long)]
        date_from: Option<String>,
        /// End of the date window, YYYY-MM-DD
        #[arg(long)]
        date_to: Option<String>,
        /// Table variant: standard, advanced, four-factors, misc, scoring
        #[arg(long, default_value = "standard")]
        stat_type: boxscore::StatType,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
        /// Also write the dataset as CSV to this file (relative paths land
        /// in the configured data directory)
        #[arg(long)]
        output: Option<String>,
    },
    /// List today's matchups from the schedule page
    Schedule {
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Initialize a default config file
    Init,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use table, json, or csv.", s)),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    // Run command
    let result = match cli.command {
        Commands::Boxscores {
            season,
            date_from,
            date_to,
            stat_type,
            format,
            output,
        } => commands::boxscores(&config, season, date_from, date_to, stat_type, format, output),
        Commands::Schedule { format } => commands::schedule(&config, format),
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use boxscore::data::dataset;
    use boxscore::data::scrapers::boxscores::{BoxScoreQuery, BoxScoreScraper};
    use boxscore::data::scrapers::schedule::ScheduleScraper;
    use boxscore::data::ProxyClient;
    use boxscore::{BoxScoreError, GameRecord, Season, StatType};
    use chrono::NaiveDate;
    use std::path::Path;

    fn proxy_client(config: &Config) -> Result<ProxyClient> {
        let api_key = config.api_key()?;
        Ok(ProxyClient::with_timeout(&api_key, config.scraper.timeout_secs))
    }

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        std::fs::create_dir_all(&config.output.data_dir)?;
        println!("Created {}/ directory", config.output.data_dir);

        println!("\nNext steps:");
        println!("  1. Put your ScrapingAnt token in {} (or export SCRAPINGANT_API_KEY)", config_path);
        println!("  2. Run 'boxscore boxscores --season 2022-23' to build a season dataset");
        println!("  3. Run 'boxscore schedule' to list today's matchups");

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn boxscores(
        config: &Config,
        season: Option<String>,
        date_from: Option<String>,
        date_to: Option<String>,
        stat_type: StatType,
        format: OutputFormat,
        output: Option<String>,
    ) -> Result<()> {
        let query = BoxScoreQuery {
            season: season.map(Season),
            date_from: parse_cli_date(date_from.as_deref())?,
            date_to: parse_cli_date(date_to.as_deref())?,
            stat_type,
        };

        let scraper = BoxScoreScraper::new(proxy_client(config)?);
        let rows = scraper.fetch(&query)?;
        let records = dataset::build(rows)?;

        match format {
            OutputFormat::Table => print_game_table(&records),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&records)
                        .map_err(|e| BoxScoreError::Parse(e.to_string()))?
                );
            }
            OutputFormat::Csv => print!("{}", games_to_csv(&records)),
        }

        if let Some(file) = output {
            let path = resolve_output_path(&config.output.data_dir, &file);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, games_to_csv(&records))?;
            println!("Wrote {} games to {}", records.len(), path.display());
        }

        Ok(())
    }

    pub fn schedule(config: &Config, format: OutputFormat) -> Result<()> {
        let scraper = ScheduleScraper::new(proxy_client(config)?);
        let schedule = scraper.fetch_today()?;

        match format {
            OutputFormat::Table => {
                println!("{} games today", schedule.matchups.len());
                println!("{:>12} {:>12} {:>12}", "VISITOR", "HOME", "GAME_ID");
                for (i, m) in schedule.matchups.iter().enumerate() {
                    let game_id = schedule
                        .game_ids
                        .get(i)
                        .map(|g| g.to_string())
                        .unwrap_or_default();
                    println!(
                        "{:>12} {:>12} {:>12}",
                        m.visitor.to_string(),
                        m.home.to_string(),
                        game_id
                    );
                }
            }
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "matchups": schedule
                        .matchups
                        .iter()
                        .map(|m| serde_json::json!({"visitor": m.visitor, "home": m.home}))
                        .collect::<Vec<_>>(),
                    "game_ids": schedule.game_ids,
                });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json)
                        .map_err(|e| BoxScoreError::Parse(e.to_string()))?
                );
            }
            OutputFormat::Csv => {
                println!("VISITOR_TEAM_ID,HOME_TEAM_ID,GAME_ID");
                for (i, m) in schedule.matchups.iter().enumerate() {
                    let game_id = schedule
                        .game_ids
                        .get(i)
                        .map(|g| g.to_string())
                        .unwrap_or_default();
                    println!("{},{},{}", m.visitor, m.home, game_id);
                }
            }
        }

        Ok(())
    }

    fn parse_cli_date(value: Option<&str>) -> Result<Option<NaiveDate>> {
        match value {
            None => Ok(None),
            Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| {
                    BoxScoreError::Config(format!("Invalid date {:?}, expected YYYY-MM-DD", s))
                }),
        }
    }

    fn resolve_output_path(data_dir: &str, file: &str) -> std::path::PathBuf {
        let path = Path::new(file);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            Path::new(data_dir).join(path)
        }
    }

    fn print_game_table(records: &[GameRecord]) {
        println!("{} games", records.len());
        println!(
            "{:>12} {:>12} {:>12} {:>12} {:>9} {:>9} {:>5}",
            "DATE", "GAME_ID", "HOME", "VISITOR", "PTS_home", "PTS_away", "W"
        );
        for r in records {
            println!(
                "{:>12} {:>12} {:>12} {:>12} {:>9} {:>9} {:>5}",
                r.game_date_est.format("%Y-%m-%d").to_string(),
                r.game_id.to_string(),
                r.home_team_id.to_string(),
                r.visitor_team_id.to_string(),
                r.pts_home,
                r.pts_away,
                if r.home_team_wins { 1 } else { 0 },
            );
        }
    }

    fn games_to_csv(records: &[GameRecord]) -> String {
        let mut out = String::new();
        out.push_str(&GameRecord::COLUMNS.join(","));
        out.push('\n');

        for r in records {
            out.push_str(&format!(
                "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}\n",
                r.game_date_est.format("%Y-%m-%d"),
                r.game_id,
                r.home_team_id,
                r.visitor_team_id,
                r.season,
                r.pts_home,
                r.fg_pct_home,
                r.ft_pct_home,
                r.fg3_pct_home,
                r.ast_home,
                r.reb_home,
                r.pts_away,
                r.fg_pct_away,
                r.ft_pct_away,
                r.fg3_pct_away,
                r.ast_away,
                r.reb_away,
                if r.home_team_wins { 1 } else { 0 },
            ));
        }

        out
    }

}
