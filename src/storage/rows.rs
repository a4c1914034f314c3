//! Row types returned by the stats store.

use serde::Serialize;
use sqlx::FromRow;

/// Denormalized per-player projection: identity, team, season, and the stat
/// columns the query's source populated. Most stats are nullable because not
/// every source fills every column (the leaders join in particular leaves
/// gaps for players missing from the aggregate table).
///
/// Percentage columns hold raw fractions (0-1); formatting to percent is the
/// presentation layer's job.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PlayerStatRow {
    pub player_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_abbreviation: Option<String>,
    pub season: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub college: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gp: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pts: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ast: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stl: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blk: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tov: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fgm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fga: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fg_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fg3m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fg3a: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fg3_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ftm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ft_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub efg_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oreb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dreb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plus_minus: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dd2: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub td3: Option<i32>,
}

impl PlayerStatRow {
    /// Read the value backing a metric, when the source populated it.
    /// `All` resolves to points, mirroring its ORDER BY fallback.
    pub fn stat(&self, metric: crate::query::types::Metric) -> Option<f64> {
        use crate::query::types::Metric;
        match metric {
            Metric::Ppg | Metric::All => self.pts,
            Metric::Rpg => self.reb,
            Metric::Apg => self.ast,
            Metric::Spg => self.stl,
            Metric::Bpg => self.blk,
            Metric::Topg => self.tov,
            Metric::Mpg => self.min,
            Metric::FgPct => self.fg_pct,
            Metric::ThreePct => self.fg3_pct,
            Metric::FtPct => self.ft_pct,
            Metric::EfgPct => self.efg_pct,
            Metric::TsPct => self.ts_pct,
            Metric::Fgm => self.fgm,
            Metric::Fga => self.fga,
            Metric::ThreePm => self.fg3m,
            Metric::ThreePa => self.fg3a,
            Metric::Ftm => self.ftm,
            Metric::Fta => self.fta,
            Metric::Oreb => self.oreb,
            Metric::Dreb => self.dreb,
            Metric::PlusMinus => self.plus_minus,
            Metric::Gp => self.gp.map(f64::from),
            Metric::Age => self.age,
            Metric::Salary => self.salary,
            Metric::DoubleDoubles => self.dd2.map(f64::from),
            Metric::TripleDoubles => self.td3.map(f64::from),
        }
    }
}

/// One standings row as stored.
#[derive(Debug, Clone, FromRow)]
pub struct StandingRow {
    pub team_abbreviation: String,
    pub team_name: String,
    pub conference: String,
    pub seed: Option<i32>,
    pub wins: i32,
    pub losses: i32,
}

/// A top scorer embedded in a single-team answer.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TeamPlayer {
    pub player_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pts: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ast: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gp: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
}

/// Team standing plus, for single-team answers, up to five top scorers.
#[derive(Debug, Clone, Serialize)]
pub struct TeamData {
    pub team_abbreviation: String,
    pub team_name: String,
    pub conference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i32>,
    pub wins: i32,
    pub losses: i32,
    pub win_pct: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub top_scorers: Vec<TeamPlayer>,
}

impl TeamData {
    /// Win percentage with the winless-and-lossless case pinned to 0.0.
    pub fn win_percentage(wins: i32, losses: i32) -> f64 {
        let games = wins + losses;
        if games == 0 {
            return 0.0;
        }
        f64::from(wins) / f64::from(games)
    }

    pub fn from_standing(row: StandingRow) -> Self {
        let win_pct = Self::win_percentage(row.wins, row.losses);
        Self {
            team_abbreviation: row.team_abbreviation,
            team_name: row.team_name,
            conference: row.conference,
            seed: row.seed,
            wins: row.wins,
            losses: row.losses,
            win_pct,
            top_scorers: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_percentage() {
        assert_eq!(TeamData::win_percentage(41, 41), 0.5);
        assert_eq!(TeamData::win_percentage(82, 0), 1.0);
        // Zero games is 0.0, not NaN.
        assert_eq!(TeamData::win_percentage(0, 0), 0.0);
    }

    #[test]
    fn test_row_serialization_skips_missing_stats() {
        let row = PlayerStatRow {
            player_name: "Stephen Curry".to_string(),
            team_abbreviation: Some("GSW".to_string()),
            season: 2025,
            position: None,
            college: None,
            country: None,
            draft_year: None,
            gp: Some(70),
            min: None,
            pts: Some(27.3),
            reb: None,
            ast: None,
            stl: None,
            blk: None,
            tov: None,
            fgm: None,
            fga: None,
            fg_pct: None,
            fg3m: None,
            fg3a: None,
            fg3_pct: None,
            ftm: None,
            fta: None,
            ft_pct: None,
            efg_pct: None,
            ts_pct: None,
            oreb: None,
            dreb: None,
            plus_minus: None,
            age: None,
            salary: None,
            dd2: None,
            td3: None,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["pts"], 27.3);
        assert!(json.get("reb").is_none());
    }
}
