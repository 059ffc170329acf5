//! Customer-service quality judge: soft skills and overall experience.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crewcheck_core::{AgentAdapter, AgentInput, AgentReply, ChatMessage};

use crate::judge::render_report;
use crate::scorer::{round_tenths, Criterion, HeuristicScorer, Scorer};
use crate::transcript::Transcript;

/// Criteria the quality judge reports on, in report order.
pub const QUALITY_CRITERIA: [Criterion; 6] = [
    Criterion::Empathy,
    Criterion::Professionalism,
    Criterion::Listening,
    Criterion::Communication,
    Criterion::ProblemSolving,
    Criterion::CustomerFocus,
];

/// Transcripts longer than this count as "good" engagement.
const ENGAGED_TRANSCRIPT_LEN: usize = 200;
/// Fewer agent turns than this suggests the agent did not engage.
const MIN_ACTIVE_AGENT_TURNS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScores {
    pub empathy: f64,
    pub professionalism: f64,
    pub listening: f64,
    pub communication: f64,
    pub problem_solving: f64,
    pub customer_focus: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityEvaluation {
    pub overall_score: f64,
    pub criterion_scores: CriterionScores,
    pub detailed_analysis: String,
    pub positive_examples: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub recommendation: String,
}

pub struct QualityJudge {
    scorer: Arc<dyn Scorer>,
}

impl Default for QualityJudge {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityJudge {
    pub fn new() -> Self {
        Self::with_scorer(Arc::new(HeuristicScorer))
    }

    pub fn with_scorer(scorer: Arc<dyn Scorer>) -> Self {
        Self { scorer }
    }

    pub fn evaluate(&self, transcript: &Transcript) -> QualityEvaluation {
        let score = |c| self.scorer.score(c, transcript);
        let criterion_scores = CriterionScores {
            empathy: score(Criterion::Empathy),
            professionalism: score(Criterion::Professionalism),
            listening: score(Criterion::Listening),
            communication: score(Criterion::Communication),
            problem_solving: score(Criterion::ProblemSolving),
            customer_focus: score(Criterion::CustomerFocus),
        };
        let overall = (criterion_scores.empathy
            + criterion_scores.professionalism
            + criterion_scores.communication)
            / 3.0;
        debug!(overall, "Quality evaluation scored");

        QualityEvaluation {
            overall_score: round_tenths(overall),
            criterion_scores,
            detailed_analysis: detailed_analysis(transcript),
            positive_examples: positive_examples(transcript),
            areas_for_improvement: improvements(transcript),
            recommendation: recommendation(overall).to_string(),
        }
    }

    pub fn evaluate_messages(&self, messages: &[ChatMessage]) -> QualityEvaluation {
        self.evaluate(&Transcript::from_messages(messages))
    }
}

fn detailed_analysis(transcript: &Transcript) -> String {
    let engagement = if transcript.len() > ENGAGED_TRANSCRIPT_LEN {
        "good"
    } else {
        "limited"
    };
    format!(
        "The conversation shows {engagement} engagement between agent and customer. \
         The agent demonstrates professional communication and attempts to address \
         customer concerns systematically."
    )
}

fn positive_examples(transcript: &Transcript) -> Vec<String> {
    let checks = [
        ("I understand", "Agent showed empathy with 'I understand'"),
        ("let me help", "Agent offered proactive assistance"),
        ("thank you", "Agent maintained polite communication"),
    ];
    let found: Vec<String> = checks
        .iter()
        .filter(|(phrase, _)| transcript.contains_exact(phrase))
        .map(|(_, example)| example.to_string())
        .collect();
    if found.is_empty() {
        vec!["Agent maintained professional tone throughout".to_string()]
    } else {
        found
    }
}

fn improvements(transcript: &Transcript) -> Vec<String> {
    let mut found = Vec::new();
    if !transcript.mentions("sorry") {
        found.push("Could show more empathy and acknowledgment of customer concerns".to_string());
    }
    if transcript.agent_turns() < MIN_ACTIVE_AGENT_TURNS {
        found.push("Could engage more actively in problem-solving".to_string());
    }
    if found.is_empty() {
        found.push("Continue maintaining current service quality".to_string());
    }
    found
}

fn recommendation(overall: f64) -> &'static str {
    if overall >= 8.0 {
        "Excellent customer service quality. Continue current approach."
    } else if overall >= 6.0 {
        "Good customer service with room for improvement in empathy and communication."
    } else {
        "Customer service quality needs significant improvement. Focus on empathy, professionalism, and problem-solving."
    }
}

#[async_trait]
impl AgentAdapter for QualityJudge {
    fn name(&self) -> &str {
        "customer_service_quality_judge"
    }

    async fn call(&self, input: AgentInput) -> AgentReply {
        AgentReply::Text(render_report(&self.evaluate_messages(&input.messages)))
    }
}
