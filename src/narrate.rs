//! Result narration.
//!
//! Turns result rows into a short natural-language summary via the
//! completion model, falling back to a deterministic template that never
//! fails. Narration failures are invisible to the user.

use std::sync::Arc;

use tracing::debug;

use crate::llm::CompletionClient;
use crate::query::types::{Metric, Query, Task};
use crate::storage::PlayerStatRow;

/// Summarizes query results.
pub struct Narrator {
    llm: Arc<dyn CompletionClient>,
}

impl Narrator {
    pub fn new(llm: Arc<dyn CompletionClient>) -> Self {
        Self { llm }
    }

    /// Produce a summary. Total: any model failure resolves to the
    /// deterministic template.
    pub async fn summarize(&self, query: &Query, rows: &[PlayerStatRow]) -> String {
        match self.model_summary(query, rows).await {
            Some(summary) => summary,
            None => fallback_summary(query, rows),
        }
    }

    async fn model_summary(&self, query: &Query, rows: &[PlayerStatRow]) -> Option<String> {
        let shown: Vec<&PlayerStatRow> = rows.iter().take(5).collect();
        let prompt = format!(
            "Summarize this basketball stats answer in two sentences for a fan. \
             Mention the leading player and the {metric}. Plain text only.\n\n\
             Question intent: {task}\nRows: {rows}\n",
            metric = query.metric.label(),
            task = query.task.display_name(),
            rows = serde_json::to_string(&shown).ok()?,
        );

        match self.llm.complete_text(&prompt).await {
            Ok(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Ok(_) => None,
            Err(e) => {
                debug!(error = %e, "narration failed, using template summary");
                None
            }
        }
    }
}

/// Format a metric value for humans: percentages are stored as fractions and
/// scale to percent here; everything else rounds to one decimal.
pub fn format_metric_value(metric: Metric, value: f64) -> String {
    if metric.is_percentage() {
        format!("{:.1}%", value * 100.0)
    } else {
        format!("{value:.1}")
    }
}

/// Deterministic template summary. Never fails and never returns empty.
///
/// Compare answers and `all`-metric answers get the full stat line: a single
/// metric would be misleading when the user asked for an overall assessment.
pub fn fallback_summary(query: &Query, rows: &[PlayerStatRow]) -> String {
    let Some(top) = rows.first() else {
        return "No qualified players matched this question.".to_string();
    };

    if query.task == Task::Compare || query.metric == Metric::All {
        return rows
            .iter()
            .take(4)
            .map(stat_line)
            .collect::<Vec<_>>()
            .join(" ");
    }

    let metric = query.metric;
    let mut summary = match top.stat(metric) {
        Some(value) => format!(
            "{} leads with {} {}",
            top.player_name,
            format_metric_value(metric, value),
            metric.label()
        ),
        None => format!("{} tops this list", top.player_name),
    };

    if let Some(second) = rows.get(1) {
        match second.stat(metric) {
            Some(value) => {
                summary.push_str(&format!(
                    ", ahead of {} at {}",
                    second.player_name,
                    format_metric_value(metric, value)
                ));
            }
            None => summary.push_str(&format!(", ahead of {}", second.player_name)),
        }
    }
    summary.push('.');
    summary
}

/// Full stat line: points/assists/rebounds/steals/blocks plus the three-point
/// shooting split.
fn stat_line(row: &PlayerStatRow) -> String {
    let per_game = |v: Option<f64>| format!("{:.1}", v.unwrap_or(0.0));
    format!(
        "{}: {} points, {} assists, {} rebounds, {} steals and {} blocks per game, \
         hitting {} threes at {}.",
        row.player_name,
        per_game(row.pts),
        per_game(row.ast),
        per_game(row.reb),
        per_game(row.stl),
        per_game(row.blk),
        per_game(row.fg3m),
        format_metric_value(Metric::ThreePct, row.fg3_pct.unwrap_or(0.0)),
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockCompletion;

    fn row(name: &str, pts: f64) -> PlayerStatRow {
        PlayerStatRow {
            player_name: name.to_string(),
            team_abbreviation: None,
            season: 2025,
            position: None,
            college: None,
            country: None,
            draft_year: None,
            gp: Some(70),
            min: Some(34.0),
            pts: Some(pts),
            reb: Some(8.2),
            ast: Some(5.1),
            stl: Some(1.2),
            blk: Some(0.7),
            tov: None,
            fgm: None,
            fga: None,
            fg_pct: Some(0.472),
            fg3m: Some(3.1),
            fg3a: None,
            fg3_pct: Some(0.389),
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
        }
    }

    #[test]
    fn test_format_percentage_scales_fraction() {
        assert_eq!(format_metric_value(Metric::FgPct, 0.472), "47.2%");
        assert_eq!(format_metric_value(Metric::Ppg, 27.26), "27.3");
    }

    #[test]
    fn test_fallback_describes_top_two_rows() {
        let query = Query::fallback(2025);
        let rows = vec![row("Luka Doncic", 33.8), row("Joel Embiid", 33.1)];
        let summary = fallback_summary(&query, &rows);
        assert!(summary.contains("Luka Doncic leads with 33.8 points per game"));
        assert!(summary.contains("ahead of Joel Embiid at 33.1"));
    }

    #[test]
    fn test_fallback_single_row() {
        let query = Query::fallback(2025);
        let summary = fallback_summary(&query, &[row("Luka Doncic", 33.8)]);
        assert!(summary.contains("Luka Doncic"));
        assert!(!summary.contains("ahead of"));
    }

    #[test]
    fn test_fallback_empty_rows_is_non_empty() {
        let query = Query::fallback(2025);
        assert!(!fallback_summary(&query, &[]).is_empty());
    }

    #[test]
    fn test_compare_gets_full_stat_line() {
        let mut query = Query::fallback(2025);
        query.task = Task::Compare;
        query.metric = Metric::All;
        let rows = vec![row("Jayson Tatum", 27.1), row("Luka Doncic", 33.8)];
        let summary = fallback_summary(&query, &rows);
        assert!(summary.contains("assists"));
        assert!(summary.contains("rebounds"));
        assert!(summary.contains("steals"));
        assert!(summary.contains("blocks"));
        assert!(summary.contains("threes"));
        assert!(summary.contains("38.9%"));
    }

    #[test]
    fn test_percentage_metric_summary_scaled() {
        let mut query = Query::fallback(2025);
        query.metric = Metric::FgPct;
        let summary = fallback_summary(&query, &[row("Nikola Jokic", 26.0)]);
        assert!(summary.contains("47.2%"));
    }

    #[tokio::test]
    async fn test_summarize_uses_model_when_available() {
        let narrator = Narrator::new(Arc::new(MockCompletion::replying(
            "Luka Doncic is scoring at will this season.",
        )));
        let query = Query::fallback(2025);
        let summary = narrator.summarize(&query, &[row("Luka Doncic", 33.8)]).await;
        assert_eq!(summary, "Luka Doncic is scoring at will this season.");
    }

    #[tokio::test]
    async fn test_summarize_falls_back_when_model_unavailable() {
        let narrator = Narrator::new(Arc::new(MockCompletion::failing("offline")));
        let query = Query::fallback(2025);
        let summary = narrator.summarize(&query, &[row("Luka Doncic", 33.8)]).await;
        assert!(summary.contains("Luka Doncic leads with 33.8"));
    }
}
