//! Question-to-query translation.
//!
//! The completion model is an imprecise function approximator; this module
//! defends against its failure modes. Raw output is repaired (missing or
//! invalid fields defaulted), normalized, then validated. Any failure along
//! the way, transport included, resolves to the deterministic fallback query,
//! so translation is total: it never propagates an error to the caller.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::{LlmError, Result};
use crate::llm::CompletionClient;

use super::prompt::translation_prompt;
use super::schema;
use super::types::{Metric, Query, RawQuery};

/// Translates free-text questions into validated queries.
pub struct QueryTranslator {
    llm: Arc<dyn CompletionClient>,
    current_season: i32,
}

impl QueryTranslator {
    pub fn new(llm: Arc<dyn CompletionClient>, current_season: i32) -> Self {
        Self {
            llm,
            current_season,
        }
    }

    /// Translate a question. Total: always returns a valid query.
    pub async fn translate(&self, question: &str) -> Query {
        match self.try_translate(question).await {
            Ok(query) => query,
            Err(e) => {
                warn!(error = %e, "translation failed, substituting fallback query");
                Query::fallback(self.current_season)
            }
        }
    }

    async fn try_translate(&self, question: &str) -> Result<Query> {
        let prompt = translation_prompt(question, self.current_season);
        let response_schema = serde_json::to_value(schemars::schema_for!(RawQuery))?;

        let text = self.llm.complete_json(&prompt, &response_schema).await?;
        let value: Value = serde_json::from_str(strip_code_fences(&text))
            .map_err(|e| LlmError::Malformed(e.to_string()))?;

        let repaired = repair(value, self.current_season);
        let query = schema::validate_value(&repaired)?;
        debug!(task = ?query.task, metric = ?query.metric, season = query.season, "translated question");
        Ok(query)
    }
}

/// Defensive repair of raw model output, run before schema validation:
/// missing/invalid `metric` becomes `ppg`, missing `task` becomes `rank`,
/// missing `season` becomes the current season. An *invalid* task is left
/// for validation to reject, which resolves to the fallback query.
pub fn repair(value: Value, current_season: i32) -> Value {
    let mut value = schema::normalize(&value);
    let Some(obj) = value.as_object_mut() else {
        return value;
    };

    let metric_valid = obj
        .get("metric")
        .map(|v| serde_json::from_value::<Metric>(v.clone()).is_ok())
        .unwrap_or(false);
    if !metric_valid {
        obj.insert("metric".to_string(), json!("ppg"));
    }

    if !obj.contains_key("task") {
        obj.insert("task".to_string(), json!("rank"));
    }

    let season_valid = obj
        .get("season")
        .map(|v| v.is_i64() || v.is_u64())
        .unwrap_or(false);
    if !season_valid {
        obj.insert("season".to_string(), json!(current_season));
    }

    value
}

/// Models occasionally wrap JSON in markdown fences despite instructions.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

// ============================================================================
// Tests
// ============================================================================
