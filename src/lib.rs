//! Courtside: natural-language basketball statistics service.
//!
//! Answers free-text stats questions by translating them into a constrained
//! structured query, executing it against the relational stats store, and
//! optionally narrating the result.

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod llm;
pub mod narrate;
pub mod query;
pub mod storage;

pub use api::{answer_question, create_router, AppState, AskOutcome, AskRequest, AskResponse};
pub use backend::{BackendClient, ClusterLookup};
pub use config::Config;
pub use error::{
    ConfigError, CourtsideError, DataError, LlmError, Result, SchemaViolation, UpstreamError,
};
pub use llm::{CompletionClient, HttpCompletionClient};
pub use narrate::{fallback_summary, format_metric_value, Narrator};
pub use query::{
    drop_college_collisions, extract_player_names, ComparisonCount, Filters, Metric,
    OrderDirection, Position, Query, QueryTranslator, QuestionClassifier, RawQuery, Task,
};
pub use storage::{
    build_plan, select_strategy, ExecutionStrategy, PlayerQueryExecutor, PlayerStatRow, SqlPlan,
    TeamData, TeamQueryPlanner,
};
