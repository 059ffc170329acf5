//! Technical accuracy judge.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crewcheck_core::{AgentAdapter, AgentInput, AgentReply, ChatMessage};

use crate::judge::render_report;
use crate::scorer::{round_tenths, Criterion, HeuristicScorer, Scorer};
use crate::transcript::Transcript;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalEvaluation {
    pub technical_accuracy_score: f64,
    pub solution_quality_score: f64,
    pub guidance_clarity_score: f64,
    pub overall_technical_score: f64,
    pub technical_issues_identified: Vec<String>,
    pub solution_completeness: String,
    pub recommendation: String,
}

pub struct TechnicalJudge {
    scorer: Arc<dyn Scorer>,
}

impl Default for TechnicalJudge {
    fn default() -> Self {
        Self::new()
    }
}

impl TechnicalJudge {
    pub fn new() -> Self {
        Self::with_scorer(Arc::new(HeuristicScorer))
    }

    pub fn with_scorer(scorer: Arc<dyn Scorer>) -> Self {
        Self { scorer }
    }

    pub fn evaluate(&self, transcript: &Transcript) -> TechnicalEvaluation {
        let accuracy = self.scorer.score(Criterion::TechnicalAccuracy, transcript);
        let solution = self.scorer.score(Criterion::SolutionQuality, transcript);
        let clarity = self.scorer.score(Criterion::GuidanceClarity, transcript);

        TechnicalEvaluation {
            technical_accuracy_score: accuracy,
            solution_quality_score: solution,
            guidance_clarity_score: clarity,
            overall_technical_score: round_tenths((accuracy + solution + clarity) / 3.0),
            technical_issues_identified: issues(transcript),
            solution_completeness: completeness(transcript).to_string(),
            recommendation: recommendation(transcript).to_string(),
        }
    }

    pub fn evaluate_messages(&self, messages: &[ChatMessage]) -> TechnicalEvaluation {
        self.evaluate(&Transcript::from_messages(messages))
    }
}

fn issues(transcript: &Transcript) -> Vec<String> {
    let mut found = Vec::new();
    if transcript.contains_exact("API") && !transcript.mentions("key") {
        found.push("API discussion without mentioning authentication keys".to_string());
    }
    if transcript.mentions("error") && !transcript.mentions("code") {
        found.push("Error discussion without requesting error codes".to_string());
    }
    found
}

fn completeness(transcript: &Transcript) -> &'static str {
    if transcript.as_str().matches("step").count() >= 2 {
        "Complete - Multi-step solution provided"
    } else if transcript.mentions("try") {
        "Partial - Basic troubleshooting suggested"
    } else {
        "Incomplete - No clear solution provided"
    }
}

fn recommendation(transcript: &Transcript) -> &'static str {
    if transcript.contains_exact("API") {
        "Good technical engagement. Consider providing more specific API documentation references."
    } else {
        "Maintain technical accuracy and provide step-by-step solutions."
    }
}

#[async_trait]
impl AgentAdapter for TechnicalJudge {
    fn name(&self) -> &str {
        "technical_accuracy_judge"
    }

    async fn call(&self, input: AgentInput) -> AgentReply {
        AgentReply::Text(render_report(&self.evaluate_messages(&input.messages)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_conversation_without_key() {
        let eval = TechnicalJudge::new().evaluate_messages(&[
            ChatMessage::user("My API integration returns an error"),
            ChatMessage::assistant("Try restarting the service."),
        ]);
        assert_eq!(
            eval.technical_issues_identified,
            vec![
                "API discussion without mentioning authentication keys".to_string(),
                "Error discussion without requesting error codes".to_string(),
            ]
        );
        assert_eq!(eval.solution_completeness, "Partial - Basic troubleshooting suggested");
        assert!(eval.recommendation.contains("API documentation"));
    }

    #[test]
    fn multi_step_answer_is_complete() {
        let eval = TechnicalJudge::new().evaluate_messages(&[
            ChatMessage::user("How do I rotate my key?"),
            ChatMessage::assistant(
                "Here's how: step one, open settings. Then step two, generate a new key and verify it.",
            ),
        ]);
        assert!(eval.technical_issues_identified.is_empty());
        assert_eq!(eval.solution_completeness, "Complete - Multi-step solution provided");
        assert_eq!(
            eval.recommendation,
            "Maintain technical accuracy and provide step-by-step solutions."
        );
    }

    #[test]
    fn overall_is_rounded_mean() {
        let eval = TechnicalJudge::new().evaluate(&Transcript::from_text("nothing technical"));
        assert_eq!(eval.technical_accuracy_score, 7.0);
        assert_eq!(eval.solution_quality_score, 6.0);
        assert_eq!(eval.guidance_clarity_score, 6.0);
        assert_eq!(eval.overall_technical_score, 6.3);
        assert_eq!(eval.solution_completeness, "Incomplete - No clear solution provided");
    }
}
