//! Transcript judges.
//!
//! Each judge renders the conversation into a [`Transcript`], asks a
//! [`Scorer`] for per-criterion scores and folds them into a fixed-shape
//! report. [`HeuristicScorer`] is a keyword-counting placeholder; a
//! model-backed scorer can be swapped in through the trait without touching
//! the judges.

pub mod escalation;
pub mod judge;
pub mod prompt;
pub mod quality;
pub mod scorer;
pub mod technical;
pub mod transcript;

pub use escalation::{EscalationAssessment, EscalationJudge, EscalationNeed, EscalationTiming, ProcessQuality, Severity};
pub use judge::{JudgeKind, JudgeVerdict};
pub use prompt::quality_prompt;
pub use quality::{CriterionScores, QualityEvaluation, QualityJudge, QUALITY_CRITERIA};
pub use scorer::{clamp_score, round_tenths, Criterion, HeuristicScorer, Scorer};
pub use technical::{TechnicalEvaluation, TechnicalJudge};
pub use transcript::Transcript;
