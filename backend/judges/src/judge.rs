//! Judge selection by name and the verdict every judge reduces to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crewcheck_core::{ChatMessage, CrewcheckError};

use crate::escalation::EscalationJudge;
use crate::quality::QualityJudge;
use crate::technical::TechnicalJudge;
use crate::transcript::Transcript;

/// Which judge to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JudgeKind {
    Quality,
    Technical,
    Escalation,
}

impl JudgeKind {
    pub const ALL: [JudgeKind; 3] = [JudgeKind::Quality, JudgeKind::Technical, JudgeKind::Escalation];

    pub fn as_str(&self) -> &'static str {
        match self {
            JudgeKind::Quality => "quality",
            JudgeKind::Technical => "technical",
            JudgeKind::Escalation => "escalation",
        }
    }

    /// Run this judge over a conversation with the default heuristic scorer.
    pub fn evaluate(&self, messages: &[ChatMessage]) -> JudgeVerdict {
        let transcript = Transcript::from_messages(messages);
        let (score, report) = match self {
            JudgeKind::Quality => {
                let eval = QualityJudge::new().evaluate(&transcript);
                (eval.overall_score, to_value(&eval))
            }
            JudgeKind::Technical => {
                let eval = TechnicalJudge::new().evaluate(&transcript);
                (eval.overall_technical_score, to_value(&eval))
            }
            JudgeKind::Escalation => {
                let eval = EscalationJudge::new().evaluate(&transcript);
                (eval.escalation_score, to_value(&eval))
            }
        };
        info!(judge = self.as_str(), score, messages = messages.len(), "Judge verdict");
        JudgeVerdict {
            judge: *self,
            score,
            report,
        }
    }
}

impl fmt::Display for JudgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JudgeKind {
    type Err = CrewcheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quality" => Ok(JudgeKind::Quality),
            "technical" => Ok(JudgeKind::Technical),
            "escalation" => Ok(JudgeKind::Escalation),
            other => Err(CrewcheckError::Config(format!("unknown judge '{other}'"))),
        }
    }
}

/// Headline score plus the judge's full report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeVerdict {
    pub judge: JudgeKind,
    pub score: f64,
    pub report: serde_json::Value,
}

impl JudgeVerdict {
    pub fn passes(&self, threshold: f64) -> bool {
        self.score >= threshold
    }
}

fn to_value<T: Serialize>(report: &T) -> serde_json::Value {
    serde_json::to_value(report).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to encode judge report");
        serde_json::Value::Null
    })
}

/// Pretty JSON for adapter replies.
pub(crate) fn render_report<T: Serialize>(report: &T) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to encode judge report");
        format!("{{\"error\": \"{e}\"}}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convo() -> Vec<ChatMessage> {
        vec![
            ChatMessage::user("My API calls fail with an authentication error"),
            ChatMessage::assistant("Let me check. First, verify your API key, then try again."),
        ]
    }

    #[test]
    fn parses_kind_names() {
        assert_eq!("Quality".parse::<JudgeKind>().unwrap(), JudgeKind::Quality);
        assert_eq!(" escalation ".parse::<JudgeKind>().unwrap(), JudgeKind::Escalation);
        assert!("vibes".parse::<JudgeKind>().is_err());
    }

    #[test]
    fn verdict_score_matches_report() {
        for kind in JudgeKind::ALL {
            let v = kind.evaluate(&convo());
            assert_eq!(v.judge, kind);
            assert!((1.0..=10.0).contains(&v.score), "{kind}: {}", v.score);
            let key = match kind {
                JudgeKind::Quality => "overall_score",
                JudgeKind::Technical => "overall_technical_score",
                JudgeKind::Escalation => "escalation_score",
            };
            assert_eq!(v.report[key].as_f64(), Some(v.score));
        }
    }

    #[test]
    fn threshold_check() {
        let v = JudgeVerdict {
            judge: JudgeKind::Quality,
            score: 6.0,
            report: serde_json::Value::Null,
        };
        assert!(v.passes(6.0));
        assert!(!v.passes(6.1));
    }
}
