// Prompt template for interview evaluation.
// Reuses cross-cutting fragments from llm_client::prompts.

use std::fmt::Write;

use crate::evaluation::conversation::ConversationExchange;
use crate::evaluation::report::{Category, CATEGORIES};
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

/// Replace `{job_description}`, `{conversation}`, `{criteria}`, `{response_shape}`
/// and `{json_only}` before sending.
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"You are an expert HR professional and technical interviewer. Analyze the following interview conversation and provide a comprehensive evaluation of the candidate's performance.

JOB DESCRIPTION:
{job_description}

INTERVIEW CONVERSATION:
{conversation}

Please evaluate the candidate across the following dimensions and provide scores from 1-10 (10 being excellent):

{criteria}
Please provide your evaluation in the following JSON format. IMPORTANT: Return ONLY the JSON object, no additional text or explanation:

{response_shape}

{json_only} Return only the JSON object above with all fields properly filled out."#;

/// Stamps the model is asked to echo back in `evaluation_metadata`.
#[derive(Debug, Clone)]
pub struct PromptMetadata<'a> {
    pub evaluated_by: &'a str,
    pub evaluation_date: &'a str,
    pub evaluation_version: &'a str,
}

/// Renders the transcript as `ROLE: content` blocks separated by blank lines.
pub fn render_conversation(conversation: &[ConversationExchange]) -> String {
    conversation
        .iter()
        .map(|ex| format!("{}: {}", ex.role.as_str().to_uppercase(), ex.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn evaluation_prompt(
    conversation: &[ConversationExchange],
    job_description: &str,
    metadata: &PromptMetadata<'_>,
) -> String {
    EVALUATION_PROMPT_TEMPLATE
        .replace("{criteria}", &render_criteria(CATEGORIES))
        .replace("{response_shape}", &render_response_shape(CATEGORIES, metadata))
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{conversation}", &render_conversation(conversation))
        .replace("{job_description}", job_description)
}

fn render_criteria(categories: &[Category]) -> String {
    let mut out = String::new();
    for (idx, category) in categories.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} ({:.0}% weight):",
            idx + 1,
            category.label,
            category.weight * 100.0
        );
        for (_, label, question) in category.sub_criteria {
            let _ = writeln!(out, "   - {label}: {question}");
        }
        out.push('\n');
    }
    out
}

fn render_response_shape(categories: &[Category], metadata: &PromptMetadata<'_>) -> String {
    let mut out = String::from(
        r#"{
    "evaluation_summary": {
        "overall_score": <1-10>,
        "overall_rating": "<Excellent/Good/Average/Below Average/Poor>",
        "recommendation": "<Strong Hire/Hire/Maybe/No Hire/Strong No Hire>",
        "summary_feedback": "<2-3 sentence overall summary>"
    },
    "detailed_scores": {
"#,
    );

    for (idx, category) in categories.iter().enumerate() {
        let _ = writeln!(out, "        \"{}\": {{", category.key);
        out.push_str("            \"overall_score\": <1-10>,\n");
        for (key, _, _) in category.sub_criteria {
            let _ = writeln!(out, "            \"{key}\": <1-10>,");
        }
        out.push_str("            \"feedback\": \"<detailed feedback>\"\n");
        out.push_str(if idx + 1 < categories.len() {
            "        },\n"
        } else {
            "        }\n"
        });
    }

    let _ = write!(
        out,
        r#"    }},
    "strengths": ["<list of candidate's key strengths>"],
    "areas_for_improvement": ["<list of areas where candidate can improve>"],
    "specific_examples": ["<specific examples from the conversation that support the evaluation>"],
    "follow_up_questions": ["<suggested follow-up questions for next rounds>"],
    "evaluation_metadata": {{
        "evaluated_by": "{}",
        "evaluation_date": "{}",
        "evaluation_version": "{}",
        "job_relevance_score": <1-10>
    }}
}}"#,
        metadata.evaluated_by, metadata.evaluation_date, metadata.evaluation_version
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::conversation::Role;

    fn metadata() -> PromptMetadata<'static> {
        PromptMetadata {
            evaluated_by: "Evaluator",
            evaluation_date: "2024-01-01T00:00:00Z",
            evaluation_version: "1.0",
        }
    }

    #[test]
    fn test_conversation_rendered_as_role_blocks() {
        let conversation = vec![
            ConversationExchange::new(Role::Assistant, "Why Rust?"),
            ConversationExchange::new(Role::User, "Memory safety."),
        ];
        assert_eq!(
            render_conversation(&conversation),
            "ASSISTANT: Why Rust?\n\nUSER: Memory safety."
        );
    }

    #[test]
    fn test_prompt_declares_weights_and_embeds_inputs() {
        let conversation = vec![ConversationExchange::new(Role::User, "I built a compiler.")];
        let prompt = evaluation_prompt(&conversation, "Compiler engineer role", &metadata());

        assert!(prompt.contains("Compiler engineer role"));
        assert!(prompt.contains("USER: I built a compiler."));
        assert!(prompt.contains("1. TECHNICAL COMPETENCY (30% weight):"));
        assert!(prompt.contains("5. OVERALL PERFORMANCE (10% weight):"));
        assert!(prompt.contains("   - Time Management: Did they manage time effectively"));
        assert!(prompt.contains("\"evaluation_date\": \"2024-01-01T00:00:00Z\""));
        assert!(prompt.contains(JSON_ONLY_INSTRUCTION));
        assert!(!prompt.contains("{job_description}"));
    }

    #[test]
    fn test_response_shape_lists_every_sub_criterion() {
        let shape = render_response_shape(CATEGORIES, &metadata());
        for category in CATEGORIES {
            assert!(shape.contains(&format!("\"{}\": {{", category.key)));
            for (key, _, _) in category.sub_criteria {
                assert!(shape.contains(&format!("\"{key}\": <1-10>")), "{key}");
            }
        }
        assert!(shape.contains("\"system_design_understanding\": <1-10>,\n            \"feedback\""));
    }
}
