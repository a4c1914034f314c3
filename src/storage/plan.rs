//! Execution strategy selection and SQL assembly.
//!
//! A requested statistic may live in one of several differently-shaped
//! tables, so strategy selection is an explicit variant dispatch keyed on
//! (task, metric class, filter set) - adding a fourth storage shape later is
//! a new variant, not a patch to existing branches. SQL is assembled here as
//! pure values (`SqlPlan`) with every user-influenced operand as a bound
//! parameter, never interpolated into the statement text.

use crate::query::types::{BasicStat, Query, Task, PLAYER_LIMIT_CAP};

// ============================================================================
// Strategy selection
// ============================================================================

/// The three physical data-access strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Side-by-side rows for named players, from the aggregate table,
    /// ordered by name.
    Compare,
    /// Precomputed per-stat ranking table joined back to the aggregate table.
    StatLeaders(BasicStat),
    /// Incremental WHERE over the full season-aggregate table.
    SeasonScan,
}

/// Pick the strategy for a validated query.
///
/// The leaders tables only index the five basic counting stats in regular
/// context; player/draft-year/college filters (and clutch) are not
/// expressible against them and force the aggregate scan.
pub fn select_strategy(query: &Query) -> ExecutionStrategy {
    if query.task == Task::Compare && !query.filters.players.is_empty() {
        return ExecutionStrategy::Compare;
    }

    if matches!(query.task, Task::Rank | Task::Leaders) && !query.clutch {
        if let Some(stat) = query.metric.basic_stat() {
            let filters = &query.filters;
            if filters.players.is_empty()
                && filters.draft_year_range.is_none()
                && filters.colleges.is_empty()
            {
                return ExecutionStrategy::StatLeaders(stat);
            }
        }
    }

    ExecutionStrategy::SeasonScan
}

// ============================================================================
// Plans
// ============================================================================

/// A bound SQL parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i64),
    Float(f64),
    Text(String),
}

/// A parameterized statement ready for execution.
#[derive(Debug, Clone)]
pub struct SqlPlan {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

/// Accumulates parameters and hands back their `$n` placeholders.
struct PlanBuilder {
    params: Vec<SqlParam>,
}

impl PlanBuilder {
    fn new() -> Self {
        Self { params: Vec::new() }
    }

    fn bind(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        format!("${}", self.params.len())
    }

    fn finish(self, sql: String) -> SqlPlan {
        SqlPlan {
            sql,
            params: self.params,
        }
    }
}

/// Ceiling for the compare path, which applies no meaningful limit: a guard
/// against runaway joins, not a pagination knob.
const COMPARE_LIMIT_CEILING: i64 = 100;

/// Identity columns present in the aggregate table.
const IDENTITY_COLUMNS: &[&str] = &[
    "player_name",
    "team_abbreviation",
    "season",
    "position",
    "college",
    "country",
    "draft_year",
];

/// Stat columns in the aggregate table, in projection order.
const STAT_COLUMNS: &[&str] = &[
    "gp", "min", "pts", "reb", "ast", "stl", "blk", "tov", "fgm", "fga", "fg_pct", "fg3m", "fg3a",
    "fg3_pct", "ftm", "fta", "ft_pct", "efg_pct", "ts_pct", "oreb", "dreb", "plus_minus", "age",
    "salary", "dd2", "td3",
];

/// Aggregate source: the regular or the clutch-context season table.
fn source_table(clutch: bool) -> &'static str {
    if clutch {
        "clutch_season_averages"
    } else {
        "season_averages"
    }
}

fn select_list() -> String {
    IDENTITY_COLUMNS
        .iter()
        .chain(STAT_COLUMNS.iter())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the plan for a query according to its selected strategy.
pub fn build_plan(query: &Query) -> SqlPlan {
    match select_strategy(query) {
        ExecutionStrategy::Compare => compare_plan(query),
        ExecutionStrategy::StatLeaders(stat) => leaders_plan(query, stat),
        ExecutionStrategy::SeasonScan => scan_plan(query),
    }
}

// ============================================================================
// Compare path
// ============================================================================

/// Side-by-side view of named players. Ordered by name, not by metric: the
/// caller wants the named entities next to each other, not a ranking.
/// Name matching is case-insensitive substring on purpose - it tolerates
/// spelling and punctuation variance at the cost of substring false
/// positives.
fn compare_plan(query: &Query) -> SqlPlan {
    let mut b = PlanBuilder::new();
    let table = source_table(query.clutch);

    let season = b.bind(SqlParam::Int(i64::from(query.season)));
    let name_matches: Vec<String> = query
        .filters
        .players
        .iter()
        .map(|name| {
            let ph = b.bind(SqlParam::Text(format!("%{}%", name.to_lowercase())));
            format!("LOWER(player_name) LIKE {ph}")
        })
        .collect();

    let sql = format!(
        "SELECT {cols} FROM {table} WHERE season = {season} AND ({names}) \
         ORDER BY player_name ASC LIMIT {limit}",
        cols = select_list(),
        names = name_matches.join(" OR "),
        limit = b.bind(SqlParam::Int(COMPARE_LIMIT_CEILING)),
    );
    b.finish(sql)
}

// ============================================================================
// Leaders path
// ============================================================================

/// One primary join against the precomputed rank table for the requested
/// stat, left-joining the remaining basic stats and shooting splits from the
/// aggregate table to assemble a complete row. Avoids a scan-and-sort when a
/// precomputed order already exists.
fn leaders_plan(query: &Query, stat: BasicStat) -> SqlPlan {
    let mut b = PlanBuilder::new();

    let mut columns: Vec<String> = vec![
        "l.player_name".into(),
        "l.team_abbreviation".into(),
        "l.season".into(),
        "sa.position".into(),
        "sa.college".into(),
        "sa.country".into(),
        "sa.draft_year".into(),
    ];
    for col in STAT_COLUMNS {
        if *col == stat.column() {
            columns.push(format!("l.value AS {col}"));
        } else {
            columns.push(format!("sa.{col}"));
        }
    }

    let season = b.bind(SqlParam::Int(i64::from(query.season)));
    let mut conditions = vec![format!("l.season = {season}")];

    if !query.teams.is_empty() {
        let placeholders: Vec<String> = query
            .teams
            .iter()
            .map(|t| b.bind(SqlParam::Text(t.to_uppercase())))
            .collect();
        conditions.push(format!(
            "l.team_abbreviation IN ({})",
            placeholders.join(", ")
        ));
    }

    if let Some(position) = query.position {
        let placeholders: Vec<String> = position
            .codes()
            .iter()
            .map(|code| b.bind(SqlParam::Text((*code).to_string())))
            .collect();
        conditions.push(format!("sa.position IN ({})", placeholders.join(", ")));
    }

    let filters = &query.filters;
    if let Some(min_games) = filters.min_games {
        let ph = b.bind(SqlParam::Int(min_games));
        conditions.push(format!("sa.gp >= {ph}"));
    }
    push_range(&mut b, &mut conditions, "sa.age", &filters.age_range);
    push_range(&mut b, &mut conditions, "sa.min", &filters.minutes_range);
    push_range(&mut b, &mut conditions, "sa.salary", &filters.salary_range);
    if !filters.countries.is_empty() {
        push_name_matches(&mut b, &mut conditions, "sa.country", &filters.countries);
    }
    if let Some(threshold) = filters.min_metric_value {
        let ph = b.bind(SqlParam::Float(threshold));
        match filters.filter_by_metric {
            Some(metric) => conditions.push(format!("sa.{} >= {ph}", metric.column())),
            // Filter and rank metric coincide: threshold the ranked value.
            None => conditions.push(format!("l.value >= {ph}")),
        }
    }

    let sql = format!(
        "SELECT {cols} FROM {table} l \
         LEFT JOIN season_averages sa \
         ON LOWER(sa.player_name) = LOWER(l.player_name) AND sa.season = l.season \
         WHERE {conditions} \
         ORDER BY l.value {dir}, l.rank ASC LIMIT {limit}",
        cols = columns.join(", "),
        table = stat.leaders_table(),
        conditions = conditions.join(" AND "),
        dir = query.order_direction.sql(),
        limit = b.bind(SqlParam::Int(query.limit.min(PLAYER_LIMIT_CAP))),
    );
    b.finish(sql)
}

// ============================================================================
// Aggregate scan path
// ============================================================================

/// The catch-all: advanced metrics, percentage metrics, `metric == all`, and
/// every filter combination the leaders tables cannot express. WHERE is
/// built incrementally with the season always bound first.
fn scan_plan(query: &Query) -> SqlPlan {
    let mut b = PlanBuilder::new();
    let table = source_table(query.clutch);
    let filters = &query.filters;

    let season = b.bind(SqlParam::Int(i64::from(query.season)));
    let mut conditions = vec![format!("season = {season}")];

    if !query.teams.is_empty() {
        let placeholders: Vec<String> = query
            .teams
            .iter()
            .map(|t| b.bind(SqlParam::Text(t.to_uppercase())))
            .collect();
        conditions.push(format!("team_abbreviation IN ({})", placeholders.join(", ")));
    }

    if let Some(position) = query.position {
        let placeholders: Vec<String> = position
            .codes()
            .iter()
            .map(|code| b.bind(SqlParam::Text((*code).to_string())))
            .collect();
        conditions.push(format!("position IN ({})", placeholders.join(", ")));
    }

    if let Some(range) = &filters.draft_year_range {
        if let Some(gte) = range.gte {
            let ph = b.bind(SqlParam::Int(gte as i64));
            conditions.push(format!("draft_year >= {ph}"));
        }
        if let Some(lte) = range.lte {
            let ph = b.bind(SqlParam::Int(lte as i64));
            conditions.push(format!("draft_year <= {ph}"));
        }
    }

    if !filters.colleges.is_empty() {
        push_name_matches(&mut b, &mut conditions, "college", &filters.colleges);
    }
    if !filters.countries.is_empty() {
        push_name_matches(&mut b, &mut conditions, "country", &filters.countries);
    }
    if !filters.players.is_empty() {
        push_name_matches(&mut b, &mut conditions, "player_name", &filters.players);
    }

    if let Some(min_games) = filters.min_games {
        let ph = b.bind(SqlParam::Int(min_games));
        conditions.push(format!("gp >= {ph}"));
    }
    push_range(&mut b, &mut conditions, "age", &filters.age_range);
    push_range(&mut b, &mut conditions, "min", &filters.minutes_range);
    push_range(&mut b, &mut conditions, "salary", &filters.salary_range);

    if let Some(threshold) = filters.min_metric_value {
        let column = filters
            .filter_by_metric
            .unwrap_or(query.metric)
            .column();
        let ph = b.bind(SqlParam::Float(threshold));
        conditions.push(format!("{column} >= {ph}"));
    }

    let order_column = if filters.order_by_age {
        "age"
    } else {
        query.metric.column()
    };

    let sql = format!(
        "SELECT {cols} FROM {table} WHERE {conditions} \
         ORDER BY {order_column} {dir} NULLS LAST, player_name ASC LIMIT {limit}",
        cols = select_list(),
        conditions = conditions.join(" AND "),
        dir = query.order_direction.sql(),
        limit = b.bind(SqlParam::Int(query.limit.min(PLAYER_LIMIT_CAP))),
    );
    b.finish(sql)
}

// ============================================================================
// Shared fragments
// ============================================================================

/// Case-insensitive substring match over a name-ish column, one bound
/// parameter per candidate.
fn push_name_matches(
    b: &mut PlanBuilder,
    conditions: &mut Vec<String>,
    column: &str,
    values: &[String],
) {
    let matches: Vec<String> = values
        .iter()
        .map(|value| {
            let ph = b.bind(SqlParam::Text(format!("%{}%", value.to_lowercase())));
            format!("LOWER({column}) LIKE {ph}")
        })
        .collect();
    conditions.push(format!("({})", matches.join(" OR ")));
}

fn push_range(
    b: &mut PlanBuilder,
    conditions: &mut Vec<String>,
    column: &str,
    range: &Option<crate::query::types::NumericRange>,
) {
    let Some(range) = range else { return };
    if let Some(gte) = range.gte {
        let ph = b.bind(SqlParam::Float(gte));
        conditions.push(format!("{column} >= {ph}"));
    }
    if let Some(lte) = range.lte {
        let ph = b.bind(SqlParam::Float(lte));
        conditions.push(format!("{column} <= {ph}"));
    }
}

// ============================================================================
// Tests
// ============================================================================
