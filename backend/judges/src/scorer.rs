//! Per-criterion scoring.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::transcript::Transcript;

pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 10.0;

/// Clamp a raw score into `[1.0, 10.0]`.
pub fn clamp_score(score: f64) -> f64 {
    score.clamp(MIN_SCORE, MAX_SCORE)
}

/// Round to one decimal place.
pub fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// A named evaluation dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Empathy,
    Professionalism,
    Listening,
    Communication,
    ProblemSolving,
    CustomerFocus,
    TechnicalAccuracy,
    SolutionQuality,
    GuidanceClarity,
}

impl Criterion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Criterion::Empathy => "empathy",
            Criterion::Professionalism => "professionalism",
            Criterion::Listening => "listening",
            Criterion::Communication => "communication",
            Criterion::ProblemSolving => "problem_solving",
            Criterion::CustomerFocus => "customer_focus",
            Criterion::TechnicalAccuracy => "technical_accuracy",
            Criterion::SolutionQuality => "solution_quality",
            Criterion::GuidanceClarity => "guidance_clarity",
        }
    }

    /// Rubric wording used in evaluator prompts.
    pub fn description(&self) -> &'static str {
        match self {
            Criterion::Empathy => "Empathy and emotional intelligence",
            Criterion::Professionalism => "Professional tone and language",
            Criterion::Listening => "Active listening and acknowledgment",
            Criterion::Communication => "Clear and helpful communication",
            Criterion::ProblemSolving => "Problem-solving approach",
            Criterion::CustomerFocus => "Customer satisfaction focus",
            Criterion::TechnicalAccuracy => "Accuracy of technical information",
            Criterion::SolutionQuality => "Quality of the technical solution",
            Criterion::GuidanceClarity => "Clarity of technical guidance",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Produces a score in `[1.0, 10.0]` for one criterion of a transcript.
pub trait Scorer: Send + Sync {
    fn score(&self, criterion: Criterion, transcript: &Transcript) -> f64;
}

// ---------------------------------------------------------------------------
// Heuristic scorer
// ---------------------------------------------------------------------------

/// Keyword table for one criterion. Each indicator counts once, however many
/// times it appears.
struct Rubric {
    base: f64,
    bonus: f64,
    positive: &'static [&'static str],
    penalty: f64,
    negative: &'static [&'static str],
}

const EMPATHY: Rubric = Rubric {
    base: 5.0,
    bonus: 0.5,
    positive: &[
        "understand", "sorry", "apologize", "frustrating", "difficult", "appreciate",
        "thank you", "i can see", "i realize",
    ],
    penalty: 0.0,
    negative: &[],
};

const PROFESSIONALISM: Rubric = Rubric {
    base: 7.0,
    bonus: 0.3,
    positive: &["please", "thank you", "i'll help", "let me", "i can assist"],
    penalty: 1.0,
    negative: &["whatever", "i don't know", "not my problem", "can't help"],
};

const LISTENING: Rubric = Rubric {
    base: 6.0,
    bonus: 0.5,
    positive: &[
        "you mentioned", "you said", "i understand that", "to clarify", "let me make sure",
        "if i understand correctly",
    ],
    penalty: 0.0,
    negative: &[],
};

const PROBLEM_SOLVING: Rubric = Rubric {
    base: 5.0,
    bonus: 0.4,
    positive: &[
        "let me check", "i'll investigate", "here's what we can do", "solution", "resolve",
        "fix", "help you with",
    ],
    penalty: 0.0,
    negative: &[],
};

const CUSTOMER_FOCUS: Rubric = Rubric {
    base: 6.0,
    bonus: 0.3,
    positive: &[
        "for you", "your needs", "your experience", "your satisfaction", "what works best",
        "your preference",
    ],
    penalty: 0.0,
    negative: &[],
};

const TECHNICAL_ACCURACY: Rubric = Rubric {
    base: 7.0,
    bonus: 0.2,
    positive: &["api", "authentication", "error", "code", "integration", "configuration"],
    penalty: 0.0,
    negative: &[],
};

const SOLUTION_QUALITY: Rubric = Rubric {
    base: 6.0,
    bonus: 0.3,
    positive: &[
        "step by step", "first", "then", "next", "finally", "check", "verify", "test", "try",
    ],
    penalty: 0.0,
    negative: &[],
};

const GUIDANCE_CLARITY: Rubric = Rubric {
    base: 6.0,
    bonus: 0.4,
    positive: &[
        "here's how", "follow these steps", "you need to", "make sure", "ensure that",
        "double-check",
    ],
    penalty: 0.0,
    negative: &[],
};

/// Penalty for telling someone with an API problem to restart their computer.
const API_MISADVICE_PENALTY: f64 = 2.0;

impl Rubric {
    fn apply(&self, transcript: &Transcript) -> f64 {
        let hits = self.positive.iter().filter(|i| transcript.mentions(i)).count() as f64;
        let misses = self.negative.iter().filter(|i| transcript.mentions(i)).count() as f64;
        self.base + hits * self.bonus - misses * self.penalty
    }
}

/// Keyword-counting scorer. A placeholder with no claim to evaluative accuracy.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicScorer;

impl HeuristicScorer {
    /// Score by mean agent response length: medium answers beat very short or very long ones.
    pub fn communication(transcript: &Transcript) -> f64 {
        let spans = transcript.agent_spans();
        if spans.is_empty() {
            return 5.0;
        }
        let words: usize = spans.iter().map(|s| s.split_whitespace().count()).sum();
        let mean = words as f64 / spans.len() as f64;
        if (10.0..=50.0).contains(&mean) {
            8.0
        } else if (5.0..10.0).contains(&mean) || (mean > 50.0 && mean <= 100.0) {
            6.0
        } else {
            4.0
        }
    }

    fn technical_accuracy(transcript: &Transcript) -> f64 {
        let mut score = TECHNICAL_ACCURACY.apply(transcript);
        if transcript.mentions("restart your computer") && transcript.contains_exact("API") {
            score -= API_MISADVICE_PENALTY;
        }
        score
    }
}

impl Scorer for HeuristicScorer {
    fn score(&self, criterion: Criterion, transcript: &Transcript) -> f64 {
        let raw = match criterion {
            Criterion::Empathy => EMPATHY.apply(transcript),
            Criterion::Professionalism => PROFESSIONALISM.apply(transcript),
            Criterion::Listening => LISTENING.apply(transcript),
            Criterion::Communication => Self::communication(transcript),
            Criterion::ProblemSolving => PROBLEM_SOLVING.apply(transcript),
            Criterion::CustomerFocus => CUSTOMER_FOCUS.apply(transcript),
            Criterion::TechnicalAccuracy => Self::technical_accuracy(transcript),
            Criterion::SolutionQuality => SOLUTION_QUALITY.apply(transcript),
            Criterion::GuidanceClarity => GUIDANCE_CLARITY.apply(transcript),
        };
        clamp_score(raw)
    }
}
