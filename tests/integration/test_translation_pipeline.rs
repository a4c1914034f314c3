//! Question → query translation pipeline, driven by a scripted model.

use std::sync::Arc;

use async_trait::async_trait;
use courtside::{
    drop_college_collisions, extract_player_names, CompletionClient, LlmError, Metric,
    OrderDirection, Query, QueryTranslator, QuestionClassifier, Task,
};

/// Completion client scripted per-call.
struct ScriptedModel {
    reply: Result<String, String>,
}

impl ScriptedModel {
    fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: Err("model unavailable".to_string()),
        })
    }
}

#[async_trait]
impl CompletionClient for ScriptedModel {
    async fn complete_json(
        &self,
        _prompt: &str,
        _schema: &serde_json::Value,
    ) -> Result<String, LlmError> {
        self.reply.clone().map_err(|m| LlmError::Api {
            status: 503,
            message: m,
        })
    }

    async fn complete_text(&self, _prompt: &str) -> Result<String, LlmError> {
        self.reply.clone().map_err(|m| LlmError::Api {
            status: 503,
            message: m,
        })
    }
}

const SEASON: i32 = 2025;

#[tokio::test]
async fn top_scoring_rookies_scenario() {
    let reply = format!(
        r#"{{"task": "leaders", "metric": "ppg", "season": {SEASON},
            "filters": {{"draft_year_range": {{"gte": {SEASON}, "lte": {SEASON}}}}}}}"#
    );
    let translator = QueryTranslator::new(ScriptedModel::replying(&reply), SEASON);

    let query = translator
        .translate("who are the top scoring rookies in the NBA this year")
        .await;

    assert!(matches!(query.task, Task::Leaders | Task::Rank));
    assert_eq!(query.metric, Metric::Ppg);
    assert_eq!(query.season, SEASON);
    let range = query.filters.draft_year_range.expect("rookie draft filter");
    assert_eq!(range.gte, Some(f64::from(SEASON)));
    assert_eq!(range.lte, Some(f64::from(SEASON)));
    assert_eq!(query.limit, 10);
    assert_eq!(query.order_direction, OrderDirection::Desc);
}

#[tokio::test]
async fn least_points_scenario_is_ascending() {
    let reply = format!(
        r#"{{"task": "rank", "metric": "ppg", "season": {SEASON}, "order_direction": "asc"}}"#
    );
    let translator = QueryTranslator::new(ScriptedModel::replying(&reply), SEASON);

    let query = translator
        .translate("who is averaging the least amount of points")
        .await;
    assert_eq!(query.order_direction, OrderDirection::Asc);
}

#[tokio::test]
async fn translation_is_total_over_arbitrary_questions() {
    // A dead model and assorted degenerate questions: the translator still
    // returns the schema-valid fallback every time.
    let translator = QueryTranslator::new(ScriptedModel::failing(), SEASON);

    for question in ["", "   ", "what", "💥", "SELECT * FROM players; DROP TABLE players"] {
        let query = translator.translate(question).await;
        assert_eq!(query, Query::fallback(SEASON));
    }
}

#[tokio::test]
async fn malformed_model_output_falls_back() {
    for reply in [
        "Sure! Here's your query.",
        r#"{"task": "summon", "metric": "ppg", "season": 2025}"#,
        r#"{"task": ["rank"], "metric": "ppg", "season": 2025}"#,
        "[1, 2, 3]",
    ] {
        let translator = QueryTranslator::new(ScriptedModel::replying(reply), SEASON);
        let query = translator.translate("who scores the most").await;
        assert_eq!(query, Query::fallback(SEASON));
    }
}

#[tokio::test]
async fn structured_players_win_over_extraction() {
    let reply = format!(
        r#"{{"task": "compare", "metric": "all", "season": {SEASON},
            "filters": {{"players": ["Jayson Tatum", "Luka Doncic"]}}}}"#
    );
    let translator = QueryTranslator::new(ScriptedModel::replying(&reply), SEASON);

    let question = "compare Jayson Tatum and Luka Doncic";
    let query = translator.translate(question).await;

    let extracted = extract_player_names(question);
    let extracted = drop_college_collisions(extracted, &query.filters.colleges);
    let merged = query.with_extracted_players(extracted);

    // The model already declared the players; the heuristic changes nothing.
    assert_eq!(merged.filters.players, vec!["Jayson Tatum", "Luka Doncic"]);
}

#[tokio::test]
async fn extraction_fills_in_missing_players() {
    let reply = format!(r#"{{"task": "lookup", "metric": "apg", "season": {SEASON}}}"#);
    let translator = QueryTranslator::new(ScriptedModel::replying(&reply), SEASON);

    let question = "how many assists does Tyrese Haliburton average";
    let query = translator.translate(question).await;
    assert!(query.filters.players.is_empty());

    let merged = query.with_extracted_players(extract_player_names(question));
    assert_eq!(merged.filters.players, vec!["Tyrese Haliburton"]);
}

#[tokio::test]
async fn college_filter_scrubs_colliding_extraction() {
    let reply = format!(
        r#"{{"task": "rank", "metric": "ppg", "season": {SEASON},
            "filters": {{"colleges": ["North Carolina"]}}}}"#
    );
    let translator = QueryTranslator::new(ScriptedModel::replying(&reply), SEASON);

    let question = "best scorers who played at North Carolina";
    let query = translator.translate(question).await;

    let extracted = extract_player_names(question);
    assert_eq!(extracted, vec!["North Carolina"]);
    let extracted = drop_college_collisions(extracted, &query.filters.colleges);
    assert!(extracted.is_empty());

    let merged = query.with_extracted_players(extracted);
    assert!(merged.filters.players.is_empty());
}

#[tokio::test]
async fn classifier_gates_informational_questions() {
    let classifier = QuestionClassifier::new(ScriptedModel::replying("NO"));
    assert!(!classifier.is_stats_question("what is the NBA").await);

    let classifier = QuestionClassifier::new(ScriptedModel::replying("YES"));
    assert!(classifier.is_stats_question("who leads in steals").await);

    // Classifier outage fails open toward attempting translation.
    let classifier = QuestionClassifier::new(ScriptedModel::failing());
    assert!(classifier.is_stats_question("who leads in steals").await);
}

#[tokio::test]
async fn salary_threshold_round_trips() {
    let reply = format!(
        r#"{{"task": "rank", "metric": "ppg", "season": {SEASON},
            "filters": {{"salary_range": {{"gte": 50000000}}}}}}"#
    );
    let translator = QueryTranslator::new(ScriptedModel::replying(&reply), SEASON);

    let query = translator
        .translate("which players making more than 50 million score the most")
        .await;
    assert_eq!(query.filters.salary_range.unwrap().gte, Some(50_000_000.0));
}
