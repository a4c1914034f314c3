//! REST API request handlers and the question-answering pipeline.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::backend::BackendClient;
use crate::config::Config;
use crate::error::{CourtsideError, Result, UpstreamError};
use crate::llm::{CompletionClient, HttpCompletionClient};
use crate::narrate::Narrator;
use crate::query::classifier::{QuestionClassifier, SUGGESTED_QUESTIONS};
use crate::query::names::{drop_college_collisions, extract_player_names};
use crate::query::translator::QueryTranslator;
use crate::query::types::{Query, Task};
use crate::storage::{self, PlayerQueryExecutor, PlayerStatRow, TeamData, TeamQueryPlanner};

/// Application state shared across handlers. Every collaborator is an
/// explicitly constructed dependency so tests can substitute fakes.
pub struct AppState {
    pub classifier: QuestionClassifier,
    pub translator: QueryTranslator,
    pub players: PlayerQueryExecutor,
    pub teams: TeamQueryPlanner,
    pub narrator: Narrator,
    pub backend: Option<BackendClient>,
}

impl AppState {
    /// Wire up the pipeline from configuration: one shared completion
    /// client, one bounded connection pool.
    pub async fn initialize(config: &Config) -> Result<Self> {
        let llm: Arc<dyn CompletionClient> = Arc::new(HttpCompletionClient::new(&config.llm));
        let pool = storage::connect(&config.database).await?;

        Ok(Self {
            classifier: QuestionClassifier::new(llm.clone()),
            translator: QueryTranslator::new(llm.clone(), config.league.current_season),
            players: PlayerQueryExecutor::new(pool.clone()),
            teams: TeamQueryPlanner::new(pool),
            narrator: Narrator::new(llm),
            backend: BackendClient::from_config(&config.backend),
        })
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Ask request body.
#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    pub question: String,
    #[serde(default)]
    pub narrate: bool,
}

/// Successful answer envelope.
#[derive(Debug, Clone, Serialize)]
pub struct AskResponse {
    pub query: Query,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<PlayerStatRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teams: Option<Vec<TeamData>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Outcome of the pipeline, before HTTP status mapping.
pub enum AskOutcome {
    Answer(Box<AskResponse>),
    Rejected {
        error: String,
        suggestions: Vec<String>,
    },
}

// ============================================================================
// Pipeline
// ============================================================================

/// Run the full pipeline for one question.
///
/// Control flow: classify (reject informational) → translate (total, never
/// fails) → branch on task: team planner, backend proxy, or the player
/// executor with heuristic name merging.
pub async fn answer_question(state: &AppState, question: &str, narrate: bool) -> Result<AskOutcome> {
    let question = question.trim();
    if question.is_empty() {
        return Ok(rejected("The question was empty."));
    }

    if !state.classifier.is_stats_question(question).await {
        return Ok(rejected(
            "That looks like a general basketball question rather than a stats request.",
        ));
    }

    let query = state.translator.translate(question).await;
    tracing::info!(task = ?query.task, metric = ?query.metric, season = query.season, "answering question");

    if query.task == Task::Team {
        let teams = state.teams.execute(&query).await?;
        return Ok(answer(AskResponse {
            query,
            rows: None,
            teams: Some(teams),
            comparison: None,
            summary: None,
        }));
    }

    // Advisory name extraction; structured filters win on conflict, and
    // college names masquerading as player names are dropped first.
    let extracted = extract_player_names(question);
    let extracted = drop_college_collisions(extracted, &query.filters.colleges);
    let query = query.with_extracted_players(extracted);

    if query.task.requires_backend() {
        let player = query
            .filters
            .players
            .first()
            .cloned()
            .ok_or(CourtsideError::NoPlayerNameFound)?;
        let backend = state
            .backend
            .as_ref()
            .ok_or(CourtsideError::Upstream(UpstreamError::NotConfigured))?;

        let lookup = match query.task {
            Task::Solo => backend.player_cluster(&player).await?,
            _ => {
                backend
                    .historical_comparisons(&player, query.historical_comparison_count)
                    .await?
            }
        };

        // The envelope carries a synthesized minimal query for these tasks.
        let placeholder = Query::placeholder(query.task, query.season, &player);
        return Ok(answer(AskResponse {
            query: placeholder,
            rows: None,
            teams: None,
            comparison: Some(serde_json::to_value(lookup)?),
            summary: None,
        }));
    }

    let rows = state.players.execute(&query).await?;
    let summary = if narrate {
        Some(state.narrator.summarize(&query, &rows).await)
    } else {
        None
    };

    Ok(answer(AskResponse {
        query,
        rows: Some(rows),
        teams: None,
        comparison: None,
        summary,
    }))
}

fn answer(response: AskResponse) -> AskOutcome {
    AskOutcome::Answer(Box::new(response))
}

fn rejected(message: &str) -> AskOutcome {
    AskOutcome::Rejected {
        error: message.to_string(),
        suggestions: SUGGESTED_QUESTIONS.iter().map(|s| s.to_string()).collect(),
    }
}

// ============================================================================
// Handler Functions
// ============================================================================

/// POST /api/ask - Answer a natural-language stats question.
pub async fn ask_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AskRequest>,
) -> impl IntoResponse {
    match answer_question(&state, &request.question, request.narrate).await {
        Ok(AskOutcome::Answer(response)) => (StatusCode::OK, Json(*response)).into_response(),
        Ok(AskOutcome::Rejected { error, suggestions }) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error,
                suggestions: Some(suggestions),
                details: None,
            }),
        )
            .into_response(),
        Err(CourtsideError::NoPlayerNameFound) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: CourtsideError::NoPlayerNameFound.to_string(),
                suggestions: Some(
                    SUGGESTED_QUESTIONS.iter().map(|s| s.to_string()).collect(),
                ),
                details: None,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "question pipeline failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "failed to answer the question".to_string(),
                    suggestions: None,
                    details: Some(e.to_string()),
                }),
            )
                .into_response()
        }
    }
}

/// GET /api/health - Liveness probe.
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "courtside",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok",
    }))
}

// ============================================================================
// Tests
// ============================================================================
