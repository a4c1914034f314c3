//! Team standing and roster-summary queries.

use std::cmp::Ordering;

use sqlx::PgPool;
use tracing::debug;

use crate::error::DataError;
use crate::query::types::{OrderDirection, Query, TEAM_LIMIT_CAP};

use super::rows::{StandingRow, TeamData, TeamPlayer};

/// Bench noise cutoffs for the embedded top-scorer list.
const TOP_SCORER_MIN_GAMES: i64 = 10;
const TOP_SCORER_MIN_MINUTES: f64 = 10.0;
const TOP_SCORER_COUNT: i64 = 5;

/// Answers `task == team` queries from the standings table.
pub struct TeamQueryPlanner {
    pool: PgPool,
}

/// A named team, or no explicit limit, means "tell me about this one team":
/// the answer is a single standing enriched with its top scorers. Anything
/// else is a bare ranked list.
pub fn is_single_team_request(query: &Query) -> bool {
    !query.teams.is_empty() || !query.explicit_limit
}

/// Sort standings by win percentage with deterministic tie-breaks: raw win
/// count first, then losses. Ascending flips the whole ordering for "worst
/// team" questions. Computed here, independently of the games-back math used
/// for league standings pages.
pub fn rank_standings(teams: &mut [TeamData], direction: OrderDirection) {
    teams.sort_by(|a, b| {
        let best_first = b
            .win_pct
            .partial_cmp(&a.win_pct)
            .unwrap_or(Ordering::Equal)
            .then(b.wins.cmp(&a.wins))
            .then(a.losses.cmp(&b.losses));
        match direction {
            OrderDirection::Desc => best_first,
            OrderDirection::Asc => best_first.reverse(),
        }
    });
}

impl TeamQueryPlanner {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn execute(&self, query: &Query) -> Result<Vec<TeamData>, DataError> {
        let single = is_single_team_request(query);

        let mut sql = String::from(
            "SELECT team_abbreviation, team_name, conference, seed, wins, losses \
             FROM standings WHERE season = $1",
        );
        if !query.teams.is_empty() {
            let placeholders: Vec<String> = (0..query.teams.len())
                .map(|i| format!("${}", i + 2))
                .collect();
            sql.push_str(&format!(
                " AND team_abbreviation IN ({})",
                placeholders.join(", ")
            ));
        }

        let mut statement = sqlx::query_as::<_, StandingRow>(&sql).bind(query.season);
        for team in &query.teams {
            statement = statement.bind(team.to_uppercase());
        }
        let standings = statement
            .fetch_all(&self.pool)
            .await
            .map_err(DataError::Query)?;

        let mut teams: Vec<TeamData> = standings.into_iter().map(TeamData::from_standing).collect();
        rank_standings(&mut teams, query.order_direction);

        let keep = if single {
            1
        } else {
            query.limit.min(TEAM_LIMIT_CAP) as usize
        };
        teams.truncate(keep);
        debug!(teams = teams.len(), single, "team query finished");

        if single {
            if let Some(team) = teams.first_mut() {
                team.top_scorers = self
                    .top_scorers(query.season, &team.team_abbreviation)
                    .await?;
            }
        }

        Ok(teams)
    }

    /// Top five scorers with enough games and minutes to exclude
    /// end-of-bench noise.
    async fn top_scorers(
        &self,
        season: i32,
        team_abbreviation: &str,
    ) -> Result<Vec<TeamPlayer>, DataError> {
        sqlx::query_as::<_, TeamPlayer>(
            "SELECT player_name, pts, reb, ast, gp, min FROM season_averages \
             WHERE season = $1 AND team_abbreviation = $2 AND gp >= $3 AND min >= $4 \
             ORDER BY pts DESC NULLS LAST LIMIT $5",
        )
        .bind(season)
        .bind(team_abbreviation)
        .bind(TOP_SCORER_MIN_GAMES)
        .bind(TOP_SCORER_MIN_MINUTES)
        .bind(TOP_SCORER_COUNT)
        .fetch_all(&self.pool)
        .await
        .map_err(DataError::Query)
    }
}

// ============================================================================
// Tests
// ============================================================================
