//! Escalation appropriateness judge: was escalation needed, was it timed
//! well, and was the hand-off handled properly.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crewcheck_core::{AgentAdapter, AgentInput, AgentReply, ChatMessage};

use crate::judge::render_report;
use crate::scorer::clamp_score;
use crate::transcript::Transcript;

const TRIGGERS: &[&str] = &[
    "manager",
    "supervisor",
    "escalate",
    "higher level",
    "weeks",
    "months",
    "frustrated",
    "angry",
    "unacceptable",
];

const SATISFIED: &[&str] = &["thank you", "appreciate", "helpful"];
const DISSATISFIED: &[&str] = &["still not", "waste of time", "ridiculous"];

/// The keyword that marks the escalation point.
const ESCALATION_MARKER: &str = "manager";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    fn from_trigger_count(n: usize) -> Self {
        match n {
            0 => Severity::Low,
            1 | 2 => Severity::Medium,
            _ => Severity::High,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationTiming {
    TooEarly,
    Appropriate,
    TooLate,
    None,
}

impl EscalationTiming {
    /// Classify by the number of agent turns before the escalation point.
    pub fn from_agent_turns(turns: Option<usize>) -> Self {
        match turns {
            None => EscalationTiming::None,
            Some(0..=2) => EscalationTiming::TooEarly,
            Some(3..=5) => EscalationTiming::Appropriate,
            Some(_) => EscalationTiming::TooLate,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            EscalationTiming::TooEarly => "Too early - should attempt resolution first",
            EscalationTiming::Appropriate => "Appropriate timing",
            EscalationTiming::TooLate => "Too late - should have escalated sooner",
            EscalationTiming::None => "No escalation occurred",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationNeed {
    pub escalation_warranted: bool,
    pub triggers_identified: Vec<String>,
    pub severity_level: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessQuality {
    pub explanation_provided: bool,
    pub expectations_set: bool,
    pub information_gathered: bool,
    pub professional_handoff: bool,
}

impl ProcessQuality {
    pub fn passed(&self) -> usize {
        [
            self.explanation_provided,
            self.expectations_set,
            self.information_gathered,
            self.professional_handoff,
        ]
        .iter()
        .filter(|&&b| b)
        .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationAssessment {
    pub escalation_needed: EscalationNeed,
    pub escalation_timing: EscalationTiming,
    pub escalation_process: ProcessQuality,
    pub customer_satisfaction_with_escalation: String,
    pub escalation_score: f64,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct EscalationJudge;

impl EscalationJudge {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(&self, transcript: &Transcript) -> EscalationAssessment {
        let need = assess_need(transcript);
        let timing = EscalationTiming::from_agent_turns(
            transcript.agent_turns_before(ESCALATION_MARKER),
        );
        let process = ProcessQuality {
            explanation_provided: transcript.mentions("escalate") || transcript.mentions("manager"),
            expectations_set: sets_expectations(transcript),
            information_gathered: transcript.mentions("account") || transcript.mentions("details"),
            professional_handoff: transcript.mentions("transfer") || transcript.mentions("connect"),
        };
        let escalated = transcript.mentions(ESCALATION_MARKER);

        EscalationAssessment {
            escalation_score: score(&need, timing, &process, escalated),
            recommendations: recommendations(&need, escalated, process.expectations_set),
            customer_satisfaction_with_escalation: satisfaction(transcript).to_string(),
            escalation_needed: need,
            escalation_timing: timing,
            escalation_process: process,
        }
    }

    pub fn evaluate_messages(&self, messages: &[ChatMessage]) -> EscalationAssessment {
        self.evaluate(&Transcript::from_messages(messages))
    }
}

fn assess_need(transcript: &Transcript) -> EscalationNeed {
    let triggers: Vec<String> = TRIGGERS
        .iter()
        .filter(|t| transcript.mentions(t))
        .map(|t| t.to_string())
        .collect();
    EscalationNeed {
        escalation_warranted: triggers.len() >= 2,
        severity_level: Severity::from_trigger_count(triggers.len()),
        triggers_identified: triggers,
    }
}

fn sets_expectations(transcript: &Transcript) -> bool {
    transcript.mentions("will contact") || transcript.mentions("within")
}

fn satisfaction(transcript: &Transcript) -> &'static str {
    if SATISFIED.iter().any(|s| transcript.mentions(s)) {
        "Satisfied with escalation process"
    } else if DISSATISFIED.iter().any(|s| transcript.mentions(s)) {
        "Dissatisfied with escalation process"
    } else {
        "Neutral - no clear satisfaction indicators"
    }
}

fn score(
    need: &EscalationNeed,
    timing: EscalationTiming,
    process: &ProcessQuality,
    escalated: bool,
) -> f64 {
    let mut score = 5.0;
    match (need.escalation_warranted, escalated) {
        (true, true) => score += 2.0,
        (false, false) => score += 1.0,
        _ => {}
    }
    match timing {
        EscalationTiming::Appropriate => score += 1.0,
        EscalationTiming::TooEarly | EscalationTiming::TooLate => score -= 1.0,
        EscalationTiming::None => {}
    }
    score += process.passed() as f64 * 0.5;
    clamp_score(score)
}

fn recommendations(need: &EscalationNeed, escalated: bool, expectations_set: bool) -> Vec<String> {
    let mut recs = Vec::new();
    if need.escalation_warranted && !escalated {
        recs.push("Should have escalated to manager given customer frustration level".to_string());
    }
    if escalated && !expectations_set {
        recs.push("Should set clear expectations for escalation timeline".to_string());
    }
    if recs.is_empty() {
        recs.push("Escalation handling was appropriate for this situation".to_string());
    }
    recs
}

#[async_trait]
impl AgentAdapter for EscalationJudge {
    fn name(&self) -> &str {
        "escalation_appropriateness_judge"
    }

    async fn call(&self, input: AgentInput) -> AgentReply {
        AgentReply::Text(render_report(&self.evaluate_messages(&input.messages)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escalating_customer() -> Vec<ChatMessage> {
        vec![
            ChatMessage::user("I'm having trouble with my account and I'm really frustrated!"),
            ChatMessage::assistant(
                "I understand your frustration and I'm here to help. Let me look into your account issue right away.",
            ),
            ChatMessage::user("This has been going on for weeks! I want to speak to a manager!"),
            ChatMessage::assistant(
                "I completely understand why you'd want to escalate this. Let me gather some information and connect you with my manager who can provide additional assistance.",
            ),
        ]
    }

    /// `agent_turns` exchanges, then the customer asks for a manager.
    fn manager_after(agent_turns: usize) -> Transcript {
        let mut msgs = Vec::new();
        for _ in 0..agent_turns {
            msgs.push(ChatMessage::user("it's broken"));
            msgs.push(ChatMessage::assistant("let me look"));
        }
        msgs.push(ChatMessage::user("get me a manager"));
        Transcript::from_messages(&msgs)
    }

    #[test]
    fn timing_follows_agent_turns_before_manager() {
        let judge = EscalationJudge::new();
        assert_eq!(judge.evaluate(&manager_after(1)).escalation_timing, EscalationTiming::TooEarly);
        assert_eq!(judge.evaluate(&manager_after(3)).escalation_timing, EscalationTiming::Appropriate);
        assert_eq!(judge.evaluate(&manager_after(6)).escalation_timing, EscalationTiming::TooLate);
        let calm = Transcript::from_messages(&[ChatMessage::user("quick question")]);
        assert_eq!(judge.evaluate(&calm).escalation_timing, EscalationTiming::None);
    }

    #[test]
    fn sample_escalation_assessment() {
        let a = EscalationJudge::new().evaluate_messages(&escalating_customer());
        assert!(a.escalation_needed.escalation_warranted);
        assert_eq!(
            a.escalation_needed.triggers_identified,
            vec!["manager", "escalate", "weeks", "frustrated"]
        );
        assert_eq!(a.escalation_needed.severity_level, Severity::High);
        assert_eq!(a.escalation_timing, EscalationTiming::TooEarly);
        assert_eq!(
            a.escalation_process,
            ProcessQuality {
                explanation_provided: true,
                expectations_set: false,
                information_gathered: true,
                professional_handoff: true,
            }
        );
        // 5 + 2 (escalated when warranted) - 1 (too early) + 3 * 0.5
        assert_eq!(a.escalation_score, 7.5);
        assert_eq!(
            a.customer_satisfaction_with_escalation,
            "Neutral - no clear satisfaction indicators"
        );
        assert_eq!(
            a.recommendations,
            vec!["Should set clear expectations for escalation timeline".to_string()]
        );
    }

    #[test]
    fn missed_escalation_is_flagged() {
        let a = EscalationJudge::new().evaluate_messages(&[
            ChatMessage::user("This is unacceptable, I've waited for months and I'm angry."),
            ChatMessage::assistant("Please wait."),
        ]);
        assert!(a.escalation_needed.escalation_warranted);
        assert_eq!(a.escalation_timing, EscalationTiming::None);
        assert_eq!(
            a.recommendations,
            vec!["Should have escalated to manager given customer frustration level".to_string()]
        );
        assert_eq!(a.escalation_score, 5.0);
    }

    #[test]
    fn calm_conversation_scores_well() {
        let a = EscalationJudge::new().evaluate_messages(&[
            ChatMessage::user("Can you update my account details? Thank you"),
            ChatMessage::assistant("Done, anything else?"),
        ]);
        assert!(!a.escalation_needed.escalation_warranted);
        assert_eq!(a.escalation_needed.severity_level, Severity::Low);
        // 5 + 1 (no escalation needed or done) + 0.5 (information gathered)
        assert_eq!(a.escalation_score, 6.5);
        assert_eq!(a.customer_satisfaction_with_escalation, "Satisfied with escalation process");
    }

    #[test]
    fn timing_serializes_snake_case() {
        let json = serde_json::to_string(&EscalationTiming::TooEarly).unwrap();
        assert_eq!(json, "\"too_early\"");
        assert_eq!(EscalationTiming::TooLate.description(), "Too late - should have escalated sooner");
    }
}
