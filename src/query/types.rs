//! Types for the natural language statistics query system.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Task
// ============================================================================

/// Intent category of a structured query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    /// Rank players by a metric.
    Rank,
    /// League leaders phrasing ("top", "best", "leaders").
    Leaders,
    /// Single-entity stat lookup.
    Lookup,
    /// Side-by-side comparison of named players.
    Compare,
    /// Team standing / roster summary.
    Team,
    /// Find historically similar players via the cluster backend.
    HistoricalComparison,
    /// Single-player cluster profile via the backend.
    Solo,
}

impl Task {
    pub fn display_name(&self) -> &str {
        match self {
            Self::Rank => "Rank",
            Self::Leaders => "Leaders",
            Self::Lookup => "Lookup",
            Self::Compare => "Compare",
            Self::Team => "Team",
            Self::HistoricalComparison => "Historical Comparison",
            Self::Solo => "Player Profile",
        }
    }

    /// Tasks answered by the cluster backend rather than the stats store.
    pub fn requires_backend(&self) -> bool {
        matches!(self, Self::HistoricalComparison | Self::Solo)
    }

    /// Tasks that must resolve a specific player name before execution.
    pub fn requires_player_name(&self) -> bool {
        matches!(self, Self::HistoricalComparison | Self::Solo)
    }
}

// ============================================================================
// Metric
// ============================================================================

/// A single named statistic a query ranks, filters, or reports on.
///
/// `All` is a sentinel requesting the full stat line instead of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Ppg,
    Rpg,
    Apg,
    Spg,
    Bpg,
    Topg,
    Mpg,
    FgPct,
    ThreePct,
    FtPct,
    EfgPct,
    TsPct,
    Fgm,
    Fga,
    ThreePm,
    ThreePa,
    Ftm,
    Fta,
    Oreb,
    Dreb,
    PlusMinus,
    Gp,
    Age,
    Salary,
    DoubleDoubles,
    TripleDoubles,
    All,
}

impl Metric {
    /// Column in the season-average table backing this metric. `All` has no
    /// direct mapping and falls back to points, which keeps ORDER BY valid.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Ppg | Self::All => "pts",
            Self::Rpg => "reb",
            Self::Apg => "ast",
            Self::Spg => "stl",
            Self::Bpg => "blk",
            Self::Topg => "tov",
            Self::Mpg => "min",
            Self::FgPct => "fg_pct",
            Self::ThreePct => "fg3_pct",
            Self::FtPct => "ft_pct",
            Self::EfgPct => "efg_pct",
            Self::TsPct => "ts_pct",
            Self::Fgm => "fgm",
            Self::Fga => "fga",
            Self::ThreePm => "fg3m",
            Self::ThreePa => "fg3a",
            Self::Ftm => "ftm",
            Self::Fta => "fta",
            Self::Oreb => "oreb",
            Self::Dreb => "dreb",
            Self::PlusMinus => "plus_minus",
            Self::Gp => "gp",
            Self::Age => "age",
            Self::Salary => "salary",
            Self::DoubleDoubles => "dd2",
            Self::TripleDoubles => "td3",
        }
    }

    /// Percentage metrics are stored as fractions (0-1); presentation layers
    /// multiply by 100. The store always returns raw fractions.
    pub fn is_percentage(&self) -> bool {
        matches!(
            self,
            Self::FgPct | Self::ThreePct | Self::FtPct | Self::EfgPct | Self::TsPct
        )
    }

    /// The five basic counting stats with a dedicated precomputed rank table.
    pub fn basic_stat(&self) -> Option<BasicStat> {
        match self {
            Self::Ppg => Some(BasicStat::Points),
            Self::Rpg => Some(BasicStat::Rebounds),
            Self::Apg => Some(BasicStat::Assists),
            Self::Spg => Some(BasicStat::Steals),
            Self::Bpg => Some(BasicStat::Blocks),
            _ => None,
        }
    }

    /// Human-readable label for narration.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ppg => "points per game",
            Self::Rpg => "rebounds per game",
            Self::Apg => "assists per game",
            Self::Spg => "steals per game",
            Self::Bpg => "blocks per game",
            Self::Topg => "turnovers per game",
            Self::Mpg => "minutes per game",
            Self::FgPct => "field goal percentage",
            Self::ThreePct => "three point percentage",
            Self::FtPct => "free throw percentage",
            Self::EfgPct => "effective field goal percentage",
            Self::TsPct => "true shooting percentage",
            Self::Fgm => "field goals made",
            Self::Fga => "field goal attempts",
            Self::ThreePm => "three pointers made",
            Self::ThreePa => "three point attempts",
            Self::Ftm => "free throws made",
            Self::Fta => "free throw attempts",
            Self::Oreb => "offensive rebounds",
            Self::Dreb => "defensive rebounds",
            Self::PlusMinus => "plus-minus",
            Self::Gp => "games played",
            Self::Age => "age",
            Self::Salary => "salary",
            Self::DoubleDoubles => "double-doubles",
            Self::TripleDoubles => "triple-doubles",
            Self::All => "overall stat line",
        }
    }
}

/// The five counting stats served by precomputed per-stat leader tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicStat {
    Points,
    Rebounds,
    Assists,
    Steals,
    Blocks,
}

impl BasicStat {
    pub fn leaders_table(&self) -> &'static str {
        match self {
            Self::Points => "leaders_points",
            Self::Rebounds => "leaders_rebounds",
            Self::Assists => "leaders_assists",
            Self::Steals => "leaders_steals",
            Self::Blocks => "leaders_blocks",
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            Self::Points => "pts",
            Self::Rebounds => "reb",
            Self::Assists => "ast",
            Self::Steals => "stl",
            Self::Blocks => "blk",
        }
    }
}

// ============================================================================
// Position / Ordering / Team selection
// ============================================================================

/// Positional group filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Guards,
    Forwards,
    Centers,
}

impl Position {
    /// Roster position codes covered by this group.
    pub fn codes(&self) -> &'static [&'static str] {
        match self {
            Self::Guards => &["PG", "SG", "G"],
            Self::Forwards => &["SF", "PF", "F"],
            Self::Centers => &["C"],
        }
    }
}

/// Sort direction. Descending is the default for every ranking question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderDirection {
    Asc,
    #[default]
    Desc,
}

impl OrderDirection {
    pub fn sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Team field as emitted by the model: a single abbreviation or a list.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum TeamSelector {
    One(String),
    Many(Vec<String>),
}

impl TeamSelector {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(team) => vec![team],
            Self::Many(teams) => teams,
        }
    }
}

/// How many historical comparisons to return: a count or everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ComparisonCount {
    Count(u32),
    Keyword(AllComparisons),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AllComparisons {
    All,
}

impl ComparisonCount {
    /// Query-string form for the backend proxy.
    pub fn as_param(&self) -> String {
        match self {
            Self::Count(n) => n.to_string(),
            Self::Keyword(_) => "all".to_string(),
        }
    }
}

// ============================================================================
// Filters
// ============================================================================

/// Inclusive numeric range; either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NumericRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<f64>,
}

impl NumericRange {
    pub fn is_empty(&self) -> bool {
        self.gte.is_none() && self.lte.is_none()
    }
}

/// Validated filter set of a query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filters {
    /// Explicit player names. Always wins over heuristic extraction.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub players: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_games: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft_year_range: Option<NumericRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colleges: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub countries: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_range: Option<NumericRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes_range: Option<NumericRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<NumericRange>,
    /// Threshold applied to `filter_by_metric` (or the rank metric when the
    /// two coincide and `filter_by_metric` is omitted).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_metric_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_by_metric: Option<Metric>,
    /// Override the sort column to age ("youngest/oldest players who...").
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub order_by_age: bool,
}

// ============================================================================
// Query
// ============================================================================

/// Row ceiling for player queries.
pub const PLAYER_LIMIT_CAP: i64 = 25;
/// Row ceiling for team queries.
pub const TEAM_LIMIT_CAP: i64 = 30;
/// Default limit when a question does not name one.
pub const DEFAULT_LIMIT: i64 = 10;

/// The validated, canonical structured intent.
///
/// Immutable after validation: downstream stages derive new queries via
/// copy-with-override helpers, never in-place mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub task: Task,
    pub metric: Metric,
    pub season: i32,
    #[serde(rename = "team", default, skip_serializing_if = "Vec::is_empty")]
    pub teams: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub clutch: bool,
    #[serde(default)]
    pub order_direction: OrderDirection,
    pub limit: i64,
    #[serde(default)]
    pub filters: Filters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_comparison_count: Option<ComparisonCount>,
    /// Whether the question named a limit explicitly. Drives the team
    /// planner's "one team vs ranked list" decision; not part of the wire
    /// shape.
    #[serde(skip)]
    pub explicit_limit: bool,
}

impl Query {
    /// The deterministic fallback query: always executable, always sensible.
    pub fn fallback(season: i32) -> Self {
        Self {
            task: Task::Rank,
            metric: Metric::Ppg,
            season,
            teams: Vec::new(),
            position: None,
            clutch: false,
            order_direction: OrderDirection::Desc,
            limit: DEFAULT_LIMIT,
            filters: Filters::default(),
            historical_comparison_count: None,
            explicit_limit: false,
        }
    }

    /// Minimal placeholder for response envelopes of backend-answered tasks.
    pub fn placeholder(task: Task, season: i32, player: &str) -> Self {
        let mut query = Self::fallback(season);
        query.task = task;
        query.filters.players = vec![player.to_string()];
        query
    }

    /// Copy-with-override: supply heuristically extracted player names.
    /// Structured extraction wins; the heuristic is advisory only.
    pub fn with_extracted_players(&self, extracted: Vec<String>) -> Self {
        if !self.filters.players.is_empty() || extracted.is_empty() {
            return self.clone();
        }
        let mut query = self.clone();
        query.filters.players = extracted;
        query
    }
}

// ============================================================================
// Raw (model-facing) shape
// ============================================================================

/// The shape the model is asked to produce. Every field is optional so the
/// repair step can fill defaults; the JSON schema handed to the model is
/// generated from this type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RawQuery {
    pub task: Option<Task>,
    pub metric: Option<Metric>,
    pub season: Option<i32>,
    pub team: Option<TeamSelector>,
    pub position: Option<Position>,
    pub clutch: Option<bool>,
    pub order_direction: Option<OrderDirection>,
    pub limit: Option<i64>,
    pub filters: Option<RawFilters>,
    pub historical_comparison_count: Option<ComparisonCount>,
}

/// Model-facing filter object. Strict: unrecognized keys are a schema
/// violation, caught before this type ever deserializes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct RawFilters {
    pub players: Option<Vec<String>>,
    pub min_games: Option<i64>,
    pub draft_year_range: Option<NumericRange>,
    pub colleges: Option<Vec<String>>,
    pub countries: Option<Vec<String>>,
    pub age_range: Option<NumericRange>,
    pub minutes_range: Option<NumericRange>,
    pub salary_range: Option<NumericRange>,
    pub min_metric_value: Option<f64>,
    pub filter_by_metric: Option<Metric>,
    pub order_by_age: Option<bool>,
}

/// Keys accepted inside `filters`, used by the strict structural check.
pub const FILTER_KEYS: &[&str] = &[
    "players",
    "min_games",
    "draft_year_range",
    "colleges",
    "countries",
    "age_range",
    "minutes_range",
    "salary_range",
    "min_metric_value",
    "filter_by_metric",
    "order_by_age",
];

// ============================================================================
// Tests
// ============================================================================
