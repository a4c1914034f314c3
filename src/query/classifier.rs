//! Question gate.
//!
//! Separates data questions ("who leads the league in assists") from
//! informational ones ("what is the NBA") with a single narrow yes/no
//! completion call. Ambiguity and transport failures fail open: a question we
//! cannot classify is treated as in-domain so legitimate queries are never
//! blocked by a flaky classifier.

use std::sync::Arc;

use tracing::debug;

use crate::llm::CompletionClient;

use super::prompt::classification_prompt;

/// Example questions offered when an off-topic question is rejected.
pub const SUGGESTED_QUESTIONS: &[&str] = &[
    "Who leads the league in scoring this season?",
    "Compare Jayson Tatum and Luka Doncic",
    "Which team has the best record?",
    "Who are the top scoring rookies this year?",
    "Which guards average over 6 assists per game?",
];

/// Classifies questions as in-domain data requests or off-topic.
pub struct QuestionClassifier {
    llm: Arc<dyn CompletionClient>,
}

impl QuestionClassifier {
    pub fn new(llm: Arc<dyn CompletionClient>) -> Self {
        Self { llm }
    }

    /// True when the question should enter the translation pipeline.
    pub async fn is_stats_question(&self, question: &str) -> bool {
        let prompt = classification_prompt(question);
        match self.llm.complete_text(&prompt).await {
            Ok(answer) => {
                let verdict = parse_verdict(&answer);
                debug!(answer = %answer.trim(), verdict, "classified question");
                verdict
            }
            Err(e) => {
                debug!(error = %e, "classification failed, treating as in-domain");
                true
            }
        }
    }
}

/// Only an unambiguous leading NO rejects; everything else passes through.
fn parse_verdict(answer: &str) -> bool {
    let upper = answer.trim().to_uppercase();
    let first_word = upper
        .split(|c: char| !c.is_ascii_alphabetic())
        .find(|t| !t.is_empty());
    !matches!(first_word, Some("NO"))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockCompletion;

    #[tokio::test]
    async fn test_yes_is_in_domain() {
        let classifier = QuestionClassifier::new(Arc::new(MockCompletion::replying("YES")));
        assert!(classifier.is_stats_question("who leads in assists").await);
    }

    #[tokio::test]
    async fn test_no_is_rejected() {
        let classifier = QuestionClassifier::new(Arc::new(MockCompletion::replying("NO")));
        assert!(!classifier.is_stats_question("what is the NBA").await);
    }

    #[tokio::test]
    async fn test_ambiguous_answer_fails_open() {
        let classifier =
            QuestionClassifier::new(Arc::new(MockCompletion::replying("it depends on context")));
        assert!(classifier.is_stats_question("is Curry good").await);
    }

    #[tokio::test]
    async fn test_transport_failure_fails_open() {
        let classifier = QuestionClassifier::new(Arc::new(MockCompletion::failing("offline")));
        assert!(classifier.is_stats_question("who scores the most").await);
    }

    #[test]
    fn test_verdict_parsing() {
        assert!(!parse_verdict("no"));
        assert!(!parse_verdict("  No, that is informational."));
        assert!(parse_verdict("YES"));
        assert!(parse_verdict("yes."));
        assert!(parse_verdict(""));
    }

    #[test]
    fn test_suggestions_non_empty() {
        assert!(!SUGGESTED_QUESTIONS.is_empty());
    }
}
