//! Per-game dataset assembly
//!
//! Each game arrives as two table rows, one per team. Conversion types the
//! retained columns and the pivot joins the home and visitor rows on the
//! game id into a single record per game.

use crate::data::scrapers::boxscores::RawBoxScoreRow;
use crate::{BoxScoreError, GameId, GameRecord, Result, TeamId};
use chrono::NaiveDate;
use std::collections::HashMap;

/// A single team's converted line for one game
#[derive(Debug, Clone)]
pub struct TeamGame {
    pub game_date_est: NaiveDate,
    pub is_home: bool,
    pub won: bool,
    pub pts: u16,
    pub reb: u16,
    pub ast: u16,
    pub fg_pct: f32,
    pub fg3_pct: f32,
    pub ft_pct: f32,
    pub team_id: TeamId,
    pub game_id: GameId,
}

/// Convert raw table rows into typed team rows.
///
/// Rows without a W/L value are games still in progress and are dropped.
/// A matchup containing `@` marks the home row.
pub fn convert_rows(rows: Vec<RawBoxScoreRow>) -> Result<Vec<TeamGame>> {
    let mut games = Vec::with_capacity(rows.len());
    let mut incomplete = 0usize;

    for row in rows {
        if row.win_loss.trim().is_empty() {
            incomplete += 1;
            continue;
        }

        games.push(TeamGame {
            game_date_est: parse_game_date(&row.game_date)?,
            is_home: row.matchup.contains('@'),
            won: row.win_loss.contains('W'),
            pts: parse_int(&row.pts, "PTS")?,
            reb: parse_int(&row.reb, "REB")?,
            ast: parse_int(&row.ast, "AST")?,
            fg_pct: parse_float(&row.fg_pct, "FG%")?,
            fg3_pct: parse_float(&row.fg3_pct, "3P%")?,
            ft_pct: parse_float(&row.ft_pct, "FT%")?,
            team_id: row.team_id,
            game_id: row.game_id,
        });
    }

    if incomplete > 0 {
        log::debug!("Dropped {} rows without a W/L value", incomplete);
    }

    Ok(games)
}

/// Join each home row with its visitor row on the game id.
///
/// The visitor's date and win/loss are discarded; the home side is
/// authoritative. Unpaired rows are logged and skipped.
pub fn combine_home_visitor(games: Vec<TeamGame>) -> Vec<GameRecord> {
    let (home_rows, visitor_rows): (Vec<_>, Vec<_>) = games.into_iter().partition(|g| g.is_home);

    let mut visitors: HashMap<GameId, TeamGame> = visitor_rows
        .into_iter()
        .map(|g| (g.game_id.clone(), g))
        .collect();

    let mut records = Vec::with_capacity(home_rows.len());
    for home in home_rows {
        let visitor = match visitors.remove(&home.game_id) {
            Some(v) => v,
            None => {
                log::warn!("No visitor row for game {}; skipping", home.game_id);
                continue;
            }
        };

        let season = match home.game_id.season() {
            Some(s) => s,
            None => {
                log::warn!("Cannot derive season from game id {}; skipping", home.game_id);
                continue;
            }
        };

        records.push(GameRecord {
            game_date_est: home.game_date_est,
            game_id: home.game_id,
            home_team_id: home.team_id,
            visitor_team_id: visitor.team_id,
            season,
            pts_home: home.pts,
            fg_pct_home: home.fg_pct,
            ft_pct_home: home.ft_pct,
            fg3_pct_home: home.fg3_pct,
            ast_home: home.ast,
            reb_home: home.reb,
            pts_away: visitor.pts,
            fg_pct_away: visitor.fg_pct,
            ft_pct_away: visitor.ft_pct,
            fg3_pct_away: visitor.fg3_pct,
            ast_away: visitor.ast,
            reb_away: visitor.reb,
            home_team_wins: home.won,
        });
    }

    if !visitors.is_empty() {
        log::warn!("{} visitor rows had no home row", visitors.len());
    }

    records.sort_by(|a, b| {
        (a.game_date_est, &a.game_id).cmp(&(b.game_date_est, &b.game_id))
    });
    records
}

/// Convert and pivot in one step
pub fn build(rows: Vec<RawBoxScoreRow>) -> Result<Vec<GameRecord>> {
    Ok(combine_home_visitor(convert_rows(rows)?))
}

fn parse_game_date(s: &str) -> Result<NaiveDate> {
    for format in ["%m/%d/%Y", "%b %d, %Y", "%Y-%m-%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Ok(date);
        }
    }
    Err(BoxScoreError::Parse(format!("unrecognized game date {:?}", s)))
}

fn parse_int(s: &str, col: &str) -> Result<u16> {
    s.trim()
        .parse()
        .map_err(|_| BoxScoreError::Parse(format!("bad {} value {:?}", col, s)))
}

fn parse_float(s: &str, col: &str) -> Result<f32> {
    s.trim()
        .parse()
        .map_err(|_| BoxScoreError::Parse(format!("bad {} value {:?}", col, s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_row(team_id: &str, game_id: &str, matchup: &str, wl: &str, pts: &str) -> RawBoxScoreRow {
        RawBoxScoreRow {
            team: matchup.split_whitespace().next().unwrap_or("").to_string(),
            matchup: matchup.to_string(),
            game_date: "02/01/2023".to_string(),
            win_loss: wl.to_string(),
            pts: pts.to_string(),
            fg_pct: "49.5".to_string(),
            fg3_pct: "39.5".to_string(),
            ft_pct: "81.8".to_string(),
            reb: "44".to_string(),
            ast: "28".to_string(),
            team_id: TeamId(team_id.to_string()),
            game_id: GameId(game_id.to_string()),
        }
    }

    #[test]
    fn test_convert_types_fields() {
        let games = convert_rows(vec![raw_row(
            "1610612742",
            "0022200191",
            "DAL vs. POR",
            "W",
            "130",
        )])
        .unwrap();

        assert_eq!(games.len(), 1);
        let g = &games[0];
        assert_eq!(g.game_date_est, NaiveDate::from_ymd_opt(2023, 2, 1).unwrap());
        assert!(!g.is_home);
        assert!(g.won);
        assert_eq!(g.pts, 130);
        assert_eq!(g.reb, 44);
        assert_eq!(g.ast, 28);
        assert!((g.fg_pct - 49.5).abs() < 1e-6);
    }

    #[test]
    fn test_convert_home_flag_from_matchup() {
        let games = convert_rows(vec![
            raw_row("1610612742", "0022200191", "DAL vs. POR", "W", "130"),
            raw_row("1610612757", "0022200191", "POR @ DAL", "L", "110"),
        ])
        .unwrap();

        assert!(!games[0].is_home);
        assert!(games[1].is_home);
    }

    #[test]
    fn test_convert_drops_rows_without_win_loss() {
        let games = convert_rows(vec![
            raw_row("1610612742", "0022200191", "DAL vs. POR", "W", "130"),
            raw_row("1610612748", "0022200200", "MIA vs. BOS", "", "55"),
            raw_row("1610612738", "0022200200", "BOS @ MIA", "  ", "60"),
        ])
        .unwrap();

        assert_eq!(games.len(), 1);
    }

    #[test]
    fn test_convert_bad_number_is_an_error() {
        let err = convert_rows(vec![raw_row(
            "1610612742",
            "0022200191",
            "DAL vs. POR",
            "W",
            "-",
        )])
        .unwrap_err();
        assert!(matches!(err, BoxScoreError::Parse(_)));
    }

    #[test]
    fn test_date_formats() {
        assert_eq!(
            parse_game_date("02/01/2023").unwrap(),
            NaiveDate::from_ymd_opt(2023, 2, 1).unwrap()
        );
        assert_eq!(
            parse_game_date("Feb 1, 2023").unwrap(),
            NaiveDate::from_ymd_opt(2023, 2, 1).unwrap()
        );
        assert_eq!(
            parse_game_date("2023-02-01").unwrap(),
            NaiveDate::from_ymd_opt(2023, 2, 1).unwrap()
        );
        assert!(parse_game_date("yesterday").is_err());
    }

    #[test]
    fn test_combine_merges_one_row_per_game() {
        let records = build(vec![
            raw_row("1610612757", "0022200191", "POR @ DAL", "W", "110"),
            raw_row("1610612742", "0022200191", "DAL vs. POR", "L", "130"),
        ])
        .unwrap();

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.game_id, GameId("0022200191".to_string()));
        assert_eq!(r.home_team_id, TeamId("1610612757".to_string()));
        assert_eq!(r.visitor_team_id, TeamId("1610612742".to_string()));
        assert_eq!(r.season, 2022);
        assert_eq!(r.pts_home, 110);
        assert_eq!(r.pts_away, 130);
        assert!(r.home_team_wins);
    }

    #[test]
    fn test_combine_skips_unpaired_rows() {
        let records = build(vec![
            raw_row("1610612757", "0022200191", "POR @ DAL", "W", "110"),
            raw_row("1610612742", "0022200191", "DAL vs. POR", "L", "130"),
            // Home row with no matching visitor row
            raw_row("1610612738", "0022200200", "BOS @ MIA", "L", "98"),
        ])
        .unwrap();

        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_combine_sorts_by_date_then_game_id() {
        let mut early = raw_row("1610612757", "0022200150", "POR @ DAL", "W", "110");
        early.game_date = "01/15/2023".to_string();
        let mut early_opp = raw_row("1610612742", "0022200150", "DAL vs. POR", "L", "100");
        early_opp.game_date = "01/15/2023".to_string();

        let records = build(vec![
            raw_row("1610612748", "0022200191", "MIA @ BOS", "W", "120"),
            raw_row("1610612738", "0022200191", "BOS vs. MIA", "L", "115"),
            early,
            early_opp,
        ])
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].game_id, GameId("0022200150".to_string()));
        assert_eq!(records[1].game_id, GameId("0022200191".to_string()));
    }
}
