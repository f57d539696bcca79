//! Team box score scraper
//!
//! Parses the team box scores table at nba.com/stats into one raw row per
//! team per game. TEAM_ID and GAME_ID are not table columns; they are
//! recovered from the href attributes of anchors inside the table.

use super::anchor_hrefs;
use crate::data::proxy::ProxyClient;
use crate::data::table::{find_table, has_class, DataTable};
use crate::{BoxScoreError, GameId, Page, Result, Season, StatType, TeamId};
use chrono::NaiveDate;
use scraper::{ElementRef, Html};

const BOXSCORES_URL: &str = "https://www.nba.com/stats/teams/boxscores";

// Class names determined by inspection of nba.com page source
const TABLE_CLASS: &str = "Crom_table__p1iZz";
const ANCHOR_CLASS: &str = "Anchor_anchor__cSc3P";
const PAGINATION_CLASS: &str = "Pagination_pageDropdown__KgjBU";

/// Query parameters for the box scores page.
///
/// Without a season nba.com defaults to the current one, so the URL carries
/// only the date window; with a season the dates are appended only when a
/// bound is actually set.
#[derive(Debug, Clone, Default)]
pub struct BoxScoreQuery {
    pub season: Option<Season>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub stat_type: StatType,
}

impl BoxScoreQuery {
    pub fn for_season(season: Season) -> Self {
        BoxScoreQuery {
            season: Some(season),
            ..Default::default()
        }
    }

    /// Build the page URL
    pub fn url(&self) -> String {
        let mut url = match self.stat_type.url_suffix() {
            None => BOXSCORES_URL.to_string(),
            Some(suffix) => format!("{}-{}", BOXSCORES_URL, suffix),
        };

        let from = self.date_from.map(fmt_date).unwrap_or_default();
        let to = self.date_to.map(fmt_date).unwrap_or_default();

        match &self.season {
            None => {
                url.push_str(&format!("?DateFrom={}&DateTo={}", from, to));
            }
            Some(season) => {
                if self.date_from.is_none() && self.date_to.is_none() {
                    url.push_str(&format!("?Season={}", season));
                } else {
                    url.push_str(&format!("?Season={}&DateFrom={}&DateTo={}", season, from, to));
                }
            }
        }

        url
    }
}

fn fmt_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

/// One table row: a single team's line for a single game
#[derive(Debug, Clone)]
pub struct RawBoxScoreRow {
    pub team: String,
    pub matchup: String,
    pub game_date: String,
    /// Empty for games still in progress
    pub win_loss: String,
    pub pts: String,
    pub fg_pct: String,
    pub fg3_pct: String,
    pub ft_pct: String,
    pub reb: String,
    pub ast: String,
    pub team_id: TeamId,
    pub game_id: GameId,
}

/// Scraper for the team box scores table
pub struct BoxScoreScraper {
    client: ProxyClient,
}

impl BoxScoreScraper {
    pub fn new(client: ProxyClient) -> Self {
        BoxScoreScraper { client }
    }

    /// Fetch the box scores page for a query and parse it
    pub fn fetch(&self, query: &BoxScoreQuery) -> Result<Vec<RawBoxScoreRow>> {
        let url = query.url();
        log::info!("Fetching box scores from {}", url);

        let html = self.client.fetch(&url)?;
        let rows = self.parse_page(&html)?;
        log::info!("Parsed {} team rows", rows.len());
        Ok(rows)
    }

    /// Parse a box scores page
    pub fn parse_page(&self, html: &str) -> Result<Vec<RawBoxScoreRow>> {
        let document = Html::parse_document(html);

        // Single conditional check; the table is normally one page but long
        // date ranges split it over several
        if has_class(&document, PAGINATION_CLASS) {
            log::warn!("Box score table is paginated; only the first page was parsed");
        }

        let table = find_table(&document, TABLE_CLASS).ok_or_else(|| BoxScoreError::Scrape {
            page: Page::Boxscores,
            message: format!("no table with class {}", TABLE_CLASS),
        })?;

        let data = DataTable::from_element(table);
        let (team_ids, game_ids) = parse_ids(table);

        if team_ids.len() != data.rows.len() || game_ids.len() != data.rows.len() {
            return Err(BoxScoreError::Scrape {
                page: Page::Boxscores,
                message: format!(
                    "{} rows but {} team links and {} game links",
                    data.rows.len(),
                    team_ids.len(),
                    game_ids.len()
                ),
            });
        }

        let team = column(&data, "Team")?;
        let matchup = column(&data, "Match Up")?;
        let game_date = column(&data, "Game Date")?;
        let win_loss = column(&data, "W/L")?;
        let pts = column(&data, "PTS")?;
        let fg_pct = column(&data, "FG%")?;
        let fg3_pct = column(&data, "3P%")?;
        let ft_pct = column(&data, "FT%")?;
        let reb = column(&data, "REB")?;
        let ast = column(&data, "AST")?;

        let width = [team, matchup, game_date, win_loss, pts, fg_pct, fg3_pct, ft_pct, reb, ast]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1;

        let mut rows = Vec::with_capacity(data.rows.len());
        for ((cells, team_id), game_id) in data.rows.into_iter().zip(team_ids).zip(game_ids) {
            if cells.len() < width {
                return Err(BoxScoreError::Scrape {
                    page: Page::Boxscores,
                    message: format!("row has {} cells, expected at least {}", cells.len(), width),
                });
            }

            rows.push(RawBoxScoreRow {
                team: cells[team].clone(),
                matchup: cells[matchup].clone(),
                game_date: cells[game_date].clone(),
                win_loss: cells[win_loss].clone(),
                pts: cells[pts].clone(),
                fg_pct: cells[fg_pct].clone(),
                fg3_pct: cells[fg3_pct].clone(),
                ft_pct: cells[ft_pct].clone(),
                reb: cells[reb].clone(),
                ast: cells[ast].clone(),
                team_id,
                game_id,
            });
        }

        Ok(rows)
    }
}

fn column(data: &DataTable, name: &str) -> Result<usize> {
    data.column_index(name).ok_or_else(|| BoxScoreError::Scrape {
        page: Page::Boxscores,
        message: format!("missing column {:?}", name),
    })
}

/// Recover TEAM_ID and GAME_ID from anchors inside the table, in DOM order.
///
/// Team links look like /stats/team/1610612740 and game links like
/// /game/0022200191; the id is the last 10 characters of the href.
fn parse_ids(table: ElementRef) -> (Vec<TeamId>, Vec<GameId>) {
    let links = anchor_hrefs(table, ANCHOR_CLASS);

    let mut team_ids = Vec::new();
    let mut game_ids = Vec::new();

    for href in &links {
        if href.contains("stats") {
            if let Some(id) = last_ten(href) {
                team_ids.push(TeamId(id.to_string()));
            }
        }
        if href.contains("/game/") {
            if let Some(id) = last_ten(href) {
                game_ids.push(GameId(id.to_string()));
            }
        }
    }

    (team_ids, game_ids)
}

fn last_ten(s: &str) -> Option<&str> {
    if s.len() >= 10 && s.is_char_boundary(s.len() - 10) {
        Some(&s[s.len() - 10..])
    } else {
        None
    }
}
