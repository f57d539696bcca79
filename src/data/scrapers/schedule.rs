//! Daily schedule scraper
//!
//! Scrapes nba.com/schedule for the teams playing today. The page sometimes
//! lists yesterday's results before today's games, so the first day block is
//! only used when its heading matches today's date.

use super::anchor_hrefs;
use crate::data::proxy::ProxyClient;
use crate::{BoxScoreError, GameId, Page, Result, TeamId};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

const SCHEDULE_URL: &str = "https://www.nba.com/schedule";

// Class names determined by inspection of nba.com page source
const GAMES_PER_DAY_CLASS: &str = "ScheduleDay_sdGames__NGdO5";
const DAY_HEADING_CLASS: &str = "ScheduleDay_sdDay__3s2Xt";
const TEAM_ANCHOR_CLASSES: &str = "Anchor_anchor__cSc3P Link_styled__okbXW";
const GAME_ANCHOR_CLASSES: &str = "Anchor_anchor__cSc3P TabLink_link__f_15h";

/// One scheduled game; anchor order in the DOM is visitor first, home second
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matchup {
    pub visitor: TeamId,
    pub home: TeamId,
}

/// Today's games as listed on the schedule page
#[derive(Debug, Clone)]
pub struct DailySchedule {
    pub matchups: Vec<Matchup>,
    pub game_ids: Vec<GameId>,
}

/// Scraper for the schedule page
pub struct ScheduleScraper {
    client: ProxyClient,
}

impl ScheduleScraper {
    pub fn new(client: ProxyClient) -> Self {
        ScheduleScraper { client }
    }

    /// Fetch the schedule page and return today's matchups
    pub fn fetch_today(&self) -> Result<DailySchedule> {
        log::info!("Fetching schedule from {}", SCHEDULE_URL);

        let html = self.client.fetch(SCHEDULE_URL)?;
        let today = chrono::Local::now().format("%A, %B %d").to_string();
        self.parse_page(&html, &today)
    }

    /// Parse the schedule page; `today` is in "Wednesday, February 1" form
    pub fn parse_page(&self, html: &str, today: &str) -> Result<DailySchedule> {
        let document = Html::parse_document(html);
        let block = todays_block(&document, today)?;

        let matchups = parse_matchups(block);
        let game_ids = parse_game_ids(block);

        log::info!(
            "Found {} matchups and {} game links",
            matchups.len(),
            game_ids.len()
        );

        Ok(DailySchedule { matchups, game_ids })
    }
}

/// Select the day block holding today's games.
///
/// Heading comparison uses only the first three letters (the weekday
/// abbreviation) to avoid issues with the leading zero in the day of month.
fn todays_block<'a>(document: &'a Html, today: &str) -> Result<ElementRef<'a>> {
    let games_selector = Selector::parse(&format!("div.{}", GAMES_PER_DAY_CLASS)).unwrap();
    let day_selector = Selector::parse(&format!("h4.{}", DAY_HEADING_CLASS)).unwrap();

    let mut blocks = document.select(&games_selector);
    let first = blocks.next().ok_or_else(|| BoxScoreError::Scrape {
        page: Page::Schedule,
        message: "no game blocks on schedule page".to_string(),
    })?;

    let heading = document
        .select(&day_selector)
        .next()
        .ok_or_else(|| BoxScoreError::Scrape {
            page: Page::Schedule,
            message: "no day heading on schedule page".to_string(),
        })?;
    let heading_text: String = heading.text().collect();

    if same_weekday(heading_text.trim(), today) {
        Ok(first)
    } else {
        blocks.next().ok_or_else(|| BoxScoreError::Scrape {
            page: Page::Schedule,
            message: "first day block is not today and no second block follows".to_string(),
        })
    }
}

fn same_weekday(heading: &str, today: &str) -> bool {
    heading.chars().take(3).eq(today.chars().take(3))
}

/// Pair team anchors into matchups; the second id of each pair is the home
/// team
fn parse_matchups(block: ElementRef) -> Vec<Matchup> {
    let ids: Vec<TeamId> = anchor_hrefs(block, TEAM_ANCHOR_CLASSES)
        .iter()
        .map(|href| TeamId(team_id_fragment(href).to_string()))
        .collect();

    if ids.len() % 2 != 0 {
        log::warn!("Odd number of team links ({}); dropping the unpaired one", ids.len());
    }

    ids.chunks_exact(2)
        .map(|pair| Matchup {
            visitor: pair[0].clone(),
            home: pair[1].clone(),
        })
        .collect()
}

/// Extract the team id from an href like /team/1610612743/nuggets/
fn team_id_fragment(href: &str) -> &str {
    href.split("team/")
        .nth(1)
        .and_then(|rest| rest.split('/').next())
        .unwrap_or("")
}

/// Collect game ids from PREVIEW links.
///
/// Each game has two anchors with the same classes, one PREVIEW and one for
/// tickets; only the PREVIEW href carries the game id
/// (/game/sac-vs-mem-0022200547).
fn parse_game_ids(block: ElementRef) -> Vec<GameId> {
    let css = format!(
        "a.{}",
        GAME_ANCHOR_CLASSES.split_whitespace().collect::<Vec<_>>().join(".")
    );
    let selector = Selector::parse(&css).unwrap();
    let id_pattern = Regex::new(r"-(\d{10})(?:\?.*)?$").unwrap();

    block
        .select(&selector)
        .filter(|a| a.text().collect::<String>().contains("PREVIEW"))
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| id_pattern.captures(href))
        .map(|caps| GameId(caps[1].to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
        <html><body>
        <h4 class="ScheduleDay_sdDay__3s2Xt">Tuesday, January 31</h4>
        <div class="ScheduleDay_sdGames__NGdO5">
          <a href="/team/1610612759/spurs/" class="Anchor_anchor__cSc3P Link_styled__okbXW">Spurs</a>
          <a href="/team/1610612748/heat/" class="Anchor_anchor__cSc3P Link_styled__okbXW">Heat</a>
          <a class="Anchor_anchor__cSc3P TabLink_link__f_15h" href="/game/sas-vs-mia-0022200120">PREVIEW</a>
        </div>
        <h4 class="ScheduleDay_sdDay__3s2Xt">Wednesday, February 1</h4>
        <div class="ScheduleDay_sdGames__NGdO5">
          <a href="/team/1610612758/kings/" class="Anchor_anchor__cSc3P Link_styled__okbXW">Kings</a>
          <a href="/team/1610612763/grizzlies/" class="Anchor_anchor__cSc3P Link_styled__okbXW">Grizzlies</a>
          <a class="Anchor_anchor__cSc3P TabLink_link__f_15h" href="/game/sac-vs-mem-0022200547?watch=true">PREVIEW</a>
          <a class="Anchor_anchor__cSc3P TabLink_link__f_15h" href="https://www.ticketmaster.com/event/1A00">BUY TICKETS</a>
          <a href="/team/1610612743/nuggets/" class="Anchor_anchor__cSc3P Link_styled__okbXW">Nuggets</a>
          <a href="/team/1610612744/warriors/" class="Anchor_anchor__cSc3P Link_styled__okbXW">Warriors</a>
          <a class="Anchor_anchor__cSc3P TabLink_link__f_15h" href="/game/den-vs-gsw-0022200548">PREVIEW</a>
        </div>
        </body></html>
    "#;

    fn scraper() -> ScheduleScraper {
        ScheduleScraper::new(ProxyClient::new("test-key"))
    }

    #[test]
    fn test_skips_yesterdays_block() {
        let schedule = scraper().parse_page(FIXTURE, "Wednesday, February 01").unwrap();

        assert_eq!(
            schedule.matchups,
            vec![
                Matchup {
                    visitor: TeamId("1610612758".to_string()),
                    home: TeamId("1610612763".to_string()),
                },
                Matchup {
                    visitor: TeamId("1610612743".to_string()),
                    home: TeamId("1610612744".to_string()),
                },
            ]
        );
        assert_eq!(
            schedule.game_ids,
            vec![
                GameId("0022200547".to_string()),
                GameId("0022200548".to_string()),
            ]
        );
    }

    #[test]
    fn test_uses_first_block_when_heading_is_today() {
        let schedule = scraper().parse_page(FIXTURE, "Tuesday, January 31").unwrap();

        assert_eq!(schedule.matchups.len(), 1);
        assert_eq!(schedule.matchups[0].visitor, TeamId("1610612759".to_string()));
        assert_eq!(schedule.matchups[0].home, TeamId("1610612748".to_string()));
        assert_eq!(schedule.game_ids, vec![GameId("0022200120".to_string())]);
    }

    #[test]
    fn test_no_blocks_is_an_error() {
        let err = scraper()
            .parse_page("<html><body></body></html>", "Tuesday, January 31")
            .unwrap_err();
        assert!(matches!(err, BoxScoreError::Scrape { page: Page::Schedule, .. }));
    }

    #[test]
    fn test_team_id_fragment() {
        assert_eq!(team_id_fragment("/team/1610612743/nuggets/"), "1610612743");
        assert_eq!(team_id_fragment("/somewhere/else"), "");
    }
}
