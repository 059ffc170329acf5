//! Evaluator prompt for a model-backed quality scorer.

use crate::scorer::Criterion;
use crate::transcript::Transcript;

/// Render the evaluation prompt, including the JSON shape the evaluator must
/// answer with.
pub fn quality_prompt(transcript: &Transcript, criteria: &[Criterion]) -> String {
    let criteria_list = criteria
        .iter()
        .map(|c| format!("- {}", c.description()))
        .collect::<Vec<_>>()
        .join("\n");
    let score_fields = criteria
        .iter()
        .map(|c| format!("        \"{}\": <1-10>", c.as_str()))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        r#"You are an expert customer service quality evaluator. Analyze this customer service conversation and provide a detailed evaluation.

CONVERSATION:
{conversation}

EVALUATION CRITERIA:
{criteria_list}

Please provide:
1. Overall quality score (1-10)
2. Detailed analysis for each criterion
3. Specific examples from the conversation
4. Areas for improvement
5. What the agent did well

Format your response as JSON with the following structure:
{{
    "overall_score": <1-10>,
    "criterion_scores": {{
{score_fields}
    }},
    "detailed_analysis": "...",
    "positive_examples": ["..."],
    "areas_for_improvement": ["..."],
    "recommendation": "..."
}}
"#,
        conversation = transcript.as_str(),
    )
}
