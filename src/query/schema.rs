//! Structured-query validation.
//!
//! The model is an untrusted producer: it emits `null` for unused fields,
//! empty strings, empty arrays, and occasionally values outside the closed
//! enums. [`normalize`] coerces the representational noise to "absent"
//! *before* structural validation runs, so a legitimate omission spelled as
//! an explicit `null` is never rejected. [`validate_value`] then enforces the
//! closed enums and assembles the immutable [`Query`].

use serde_json::{Map, Value};

use crate::error::SchemaViolation;

use super::types::*;

// ============================================================================
// Normalization
// ============================================================================

/// Coerce `null`, `""`, `[]`, and `{}` values to "absent" by dropping the
/// keys, recursively. Idempotent: normalizing twice yields the same value.
pub fn normalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, val) in map {
                let normalized = normalize(val);
                if is_absent(&normalized) {
                    continue;
                }
                out.insert(key.clone(), normalized);
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Normalize and validate an arbitrary JSON-like value into a [`Query`].
pub fn validate_value(value: &Value) -> Result<Query, SchemaViolation> {
    let value = normalize(value);

    let obj = value
        .as_object()
        .ok_or_else(|| SchemaViolation::new("query", "expected a JSON object"))?;

    // Closed-enum and type checks first, so violations name the field
    // precisely instead of surfacing as a generic deserialization error.
    let task: Task = required_field(obj, "task")?;
    check_optional::<Metric>(obj, "metric")?;
    check_optional::<Position>(obj, "position")?;
    check_optional::<OrderDirection>(obj, "order_direction")?;
    check_optional::<TeamSelector>(obj, "team")?;
    check_optional::<ComparisonCount>(obj, "historical_comparison_count")?;

    if task != Task::Team && !obj.contains_key("metric") {
        return Err(SchemaViolation::new("metric", "required for player tasks"));
    }

    let season = obj
        .get("season")
        .ok_or_else(|| SchemaViolation::new("season", "required"))?;
    if !season.is_i64() && !season.is_u64() {
        return Err(SchemaViolation::new("season", "must be a year number"));
    }

    if let Some(limit) = obj.get("limit") {
        if !limit.is_i64() && !limit.is_u64() {
            return Err(SchemaViolation::new("limit", "must be a number"));
        }
    }
    if let Some(clutch) = obj.get("clutch") {
        if !clutch.is_boolean() {
            return Err(SchemaViolation::new("clutch", "must be a boolean"));
        }
    }

    if let Some(filters) = obj.get("filters") {
        let filters = filters
            .as_object()
            .ok_or_else(|| SchemaViolation::new("filters", "expected an object"))?;
        for key in filters.keys() {
            if !FILTER_KEYS.contains(&key.as_str()) {
                return Err(SchemaViolation::new(
                    format!("filters.{key}"),
                    "unrecognized filter",
                ));
            }
        }
    }

    let raw: RawQuery = serde_json::from_value(value)
        .map_err(|e| SchemaViolation::new("query", e.to_string()))?;
    build(raw)
}

fn required_field<T: serde::de::DeserializeOwned>(
    obj: &Map<String, Value>,
    field: &str,
) -> Result<T, SchemaViolation> {
    let value = obj
        .get(field)
        .ok_or_else(|| SchemaViolation::new(field, "required"))?;
    serde_json::from_value(value.clone())
        .map_err(|_| SchemaViolation::new(field, format!("unknown value `{value}`")))
}

fn check_optional<T: serde::de::DeserializeOwned>(
    obj: &Map<String, Value>,
    field: &str,
) -> Result<(), SchemaViolation> {
    if let Some(value) = obj.get(field) {
        serde_json::from_value::<T>(value.clone())
            .map_err(|_| SchemaViolation::new(field, format!("unknown value `{value}`")))?;
    }
    Ok(())
}

/// Assemble the canonical query: fill defaults, clamp the limit to the
/// task-appropriate ceiling, and collapse degenerate filters.
fn build(raw: RawQuery) -> Result<Query, SchemaViolation> {
    let task = raw
        .task
        .ok_or_else(|| SchemaViolation::new("task", "required"))?;
    // A team query carries no meaningful metric; points stands in.
    let metric = raw.metric.unwrap_or(Metric::Ppg);
    let season = raw
        .season
        .ok_or_else(|| SchemaViolation::new("season", "required"))?;

    let cap = if task == Task::Team {
        TEAM_LIMIT_CAP
    } else {
        PLAYER_LIMIT_CAP
    };
    let explicit_limit = raw.limit.is_some();
    let limit = raw.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, cap);

    let filters = raw.filters.map(|f| build_filters(f, metric)).unwrap_or_default();

    Ok(Query {
        task,
        metric,
        season,
        teams: raw.team.map(TeamSelector::into_vec).unwrap_or_default(),
        position: raw.position,
        clutch: raw.clutch.unwrap_or(false),
        order_direction: raw.order_direction.unwrap_or_default(),
        limit,
        filters,
        historical_comparison_count: raw.historical_comparison_count,
        explicit_limit,
    })
}

fn build_filters(raw: RawFilters, metric: Metric) -> Filters {
    // filter_by_metric duplicating the rank metric is redundant; drop it so
    // the planner applies min_metric_value to the rank column directly.
    let filter_by_metric = raw.filter_by_metric.filter(|m| *m != metric);

    Filters {
        players: raw.players.unwrap_or_default(),
        min_games: raw.min_games,
        draft_year_range: raw.draft_year_range.filter(|r| !r.is_empty()),
        colleges: raw.colleges.unwrap_or_default(),
        countries: raw.countries.unwrap_or_default(),
        age_range: raw.age_range.filter(|r| !r.is_empty()),
        minutes_range: raw.minutes_range.filter(|r| !r.is_empty()),
        salary_range: raw.salary_range.filter(|r| !r.is_empty()),
        min_metric_value: raw.min_metric_value,
        filter_by_metric,
        order_by_age: raw.order_by_age.unwrap_or(false),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepts_valid_query() {
        let query = validate_value(&json!({
            "task": "leaders",
            "metric": "ppg",
            "season": 2025,
            "team": "BOS",
            "limit": 5,
            "filters": {"min_games": 20}
        }))
        .unwrap();
        assert_eq!(query.task, Task::Leaders);
        assert_eq!(query.metric, Metric::Ppg);
        assert_eq!(query.teams, vec!["BOS"]);
        assert_eq!(query.limit, 5);
        assert!(query.explicit_limit);
        assert_eq!(query.filters.min_games, Some(20));
    }

    #[test]
    fn test_rejects_unknown_task() {
        let err = validate_value(&json!({
            "task": "predict",
            "metric": "ppg",
            "season": 2025
        }))
        .unwrap_err();
        assert_eq!(err.field, "task");
    }

    #[test]
    fn test_rejects_unknown_metric() {
        let err = validate_value(&json!({
            "task": "rank",
            "metric": "dunks_per_game",
            "season": 2025
        }))
        .unwrap_err();
        assert_eq!(err.field, "metric");
    }

    #[test]
    fn test_rejects_missing_metric_for_player_task() {
        let err = validate_value(&json!({"task": "rank", "season": 2025})).unwrap_err();
        assert_eq!(err.field, "metric");
    }

    #[test]
    fn test_team_task_needs_no_metric() {
        let query = validate_value(&json!({"task": "team", "season": 2025})).unwrap();
        assert_eq!(query.task, Task::Team);
        assert_eq!(query.metric, Metric::Ppg);
    }

    #[test]
    fn test_rejects_non_numeric_season() {
        let err = validate_value(&json!({
            "task": "rank",
            "metric": "ppg",
            "season": "this year"
        }))
        .unwrap_err();
        assert_eq!(err.field, "season");
    }

    #[test]
    fn test_rejects_unrecognized_filter_key() {
        let err = validate_value(&json!({
            "task": "rank",
            "metric": "ppg",
            "season": 2025,
            "filters": {"shoe_size": 15}
        }))
        .unwrap_err();
        assert_eq!(err.field, "filters.shoe_size");
    }

    #[test]
    fn test_nulls_coerced_to_absent_before_validation() {
        // The model spells "unused" as explicit nulls and empties; all of
        // them must validate as legitimate omissions.
        let query = validate_value(&json!({
            "task": "rank",
            "metric": "apg",
            "season": 2025,
            "team": null,
            "position": null,
            "order_direction": "",
            "filters": {
                "players": [],
                "colleges": null,
                "draft_year_range": {"gte": null, "lte": null},
                "min_games": null
            }
        }))
        .unwrap();
        assert!(query.teams.is_empty());
        assert!(query.position.is_none());
        assert_eq!(query.order_direction, OrderDirection::Desc);
        assert!(query.filters.players.is_empty());
        assert!(query.filters.draft_year_range.is_none());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let raw = json!({
            "task": "rank",
            "metric": null,
            "filters": {"players": [], "colleges": ["", ""], "age_range": {}}
        });
        let once = normalize(&raw);
        let twice = normalize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_validation_is_deterministic() {
        let raw = json!({
            "task": "rank",
            "metric": "ppg",
            "season": 2025,
            "filters": {"min_games": null, "players": []}
        });
        let first = validate_value(&raw).unwrap();
        let second = validate_value(&serde_json::to_value(&first).unwrap()).unwrap();
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    #[test]
    fn test_limit_defaults_and_caps() {
        let query =
            validate_value(&json!({"task": "rank", "metric": "ppg", "season": 2025})).unwrap();
        assert_eq!(query.limit, DEFAULT_LIMIT);
        assert!(!query.explicit_limit);

        let query = validate_value(&json!({
            "task": "rank", "metric": "ppg", "season": 2025, "limit": 500
        }))
        .unwrap();
        assert_eq!(query.limit, PLAYER_LIMIT_CAP);

        let query = validate_value(&json!({"task": "team", "season": 2025, "limit": 500})).unwrap();
        assert_eq!(query.limit, TEAM_LIMIT_CAP);
    }

    #[test]
    fn test_team_array_form() {
        let query = validate_value(&json!({
            "task": "compare",
            "metric": "all",
            "season": 2025,
            "team": ["BOS", "LAL"]
        }))
        .unwrap();
        assert_eq!(query.teams, vec!["BOS", "LAL"]);
    }

    #[test]
    fn test_coinciding_filter_metric_dropped() {
        let query = validate_value(&json!({
            "task": "rank",
            "metric": "ppg",
            "season": 2025,
            "filters": {"filter_by_metric": "ppg", "min_metric_value": 20.0}
        }))
        .unwrap();
        assert!(query.filters.filter_by_metric.is_none());
        assert_eq!(query.filters.min_metric_value, Some(20.0));

        let query = validate_value(&json!({
            "task": "rank",
            "metric": "fg_pct",
            "season": 2025,
            "filters": {"filter_by_metric": "ppg", "min_metric_value": 20.0}
        }))
        .unwrap();
        assert_eq!(query.filters.filter_by_metric, Some(Metric::Ppg));
    }
}
