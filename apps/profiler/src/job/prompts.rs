// Prompt templates for job-description field extraction.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{LIST_DELIMITER_INSTRUCTION, OPEN_INSTRUCTION};
use crate::schema::fields::{Coercion, FieldSpec, PromptVariant};

/// Replace `{job_description}` before sending.
pub const TITLE_PROMPT_TEMPLATE: &str = r#"From this job description, extract ONLY the job title/position name:

{job_description}

Look for the job title at the beginning or in headers. Return only the exact title, nothing else.
{open_instruction}"#;

pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"From this job description, extract a brief summary of what the job involves:

{job_description}

Extract the key points about what the role entails. Keep it concise and focused.
Combine related information into 1-2 sentences maximum.
{open_instruction}"#;

pub const TECHNICAL_SKILLS_PROMPT_TEMPLATE: &str = r#"From this job description, extract technical skills, technologies, or programming requirements:

{job_description}

Look for:
- Programming languages (Python, Java, JavaScript, etc.)
- Technologies and frameworks
- Software tools
- Technical skills or experience mentioned (including "programming experience")
- Any coding or development requirements
- Technical qualifications

{list_instruction} Include experience levels if mentioned.
{open_instruction}"#;

pub const SOFT_SKILLS_PROMPT_TEMPLATE: &str = r#"From this job description, extract soft skills or personal qualities required:

{job_description}

Look for:
- Communication skills
- Teamwork, collaboration
- Leadership abilities
- Problem-solving skills
- Interpersonal skills
- Work ethic qualities
- Personal attributes mentioned

{list_instruction}
{open_instruction}"#;

pub const DUTIES_PROMPT_TEMPLATE: &str = r#"From this job description, extract specific daily tasks, duties, or responsibilities:

{job_description}

Look for what the person will do day-to-day. {list_instruction}
{open_instruction}"#;

pub const EXPERIENCE_PROMPT_TEMPLATE: &str = r#"From this job description, extract experience requirements:

{job_description}

Look for required experience, background, or qualifications mentioned.
{open_instruction}"#;

pub const SALARY_PROMPT_TEMPLATE: &str = r#"From this job description, extract salary or compensation information:

{job_description}

Look for salary ranges, pay rates, compensation mentioned. Include the currency symbol or code.
{open_instruction}"#;

/// Replace `{description}`, `{keywords}` and `{job_description}` before sending.
pub const GENERIC_PROMPT_TEMPLATE: &str = r#"From this job description, extract information for: {description}

{job_description}

Keywords to look for: {keywords}

Extract only the relevant information. {list_hint}{open_instruction}"#;

/// Single-call prompt. Replace `{job_description}` and `{field_lines}` before sending.
pub const BLOCK_PROMPT_TEMPLATE: &str = r#"You are a job description analyzer. Analyze the following job description and extract ALL relevant information in a structured format.

Job Description:
{job_description}

Respond in this EXACT format, one field per line:

{field_lines}

Rules:
- Extract only information that is explicitly mentioned or can be reasonably inferred
- If information is not available, respond with: FIELD_NAME: OPEN
- For numeric fields (salary, years), provide only the number
- For boolean fields, respond with true or false
- Separate multiple items with | character

Extract the information now:"#;

/// Builds the per-field prompt for `spec`.
pub fn field_prompt(spec: &FieldSpec, job_description: &str) -> String {
    let template = match spec.prompt {
        PromptVariant::Title => TITLE_PROMPT_TEMPLATE,
        PromptVariant::Summary => SUMMARY_PROMPT_TEMPLATE,
        PromptVariant::TechnicalSkills => TECHNICAL_SKILLS_PROMPT_TEMPLATE,
        PromptVariant::SoftSkills => SOFT_SKILLS_PROMPT_TEMPLATE,
        PromptVariant::Duties => DUTIES_PROMPT_TEMPLATE,
        PromptVariant::ExperienceDescription => EXPERIENCE_PROMPT_TEMPLATE,
        PromptVariant::Salary => SALARY_PROMPT_TEMPLATE,
        PromptVariant::Generic => GENERIC_PROMPT_TEMPLATE,
    };

    let list_hint = if is_list(spec) {
        format!("{LIST_DELIMITER_INSTRUCTION}\n")
    } else {
        String::new()
    };

    template
        .replace("{description}", spec.description)
        .replace("{keywords}", &spec.keywords.join(", "))
        .replace("{list_hint}", &list_hint)
        .replace("{list_instruction}", LIST_DELIMITER_INSTRUCTION)
        .replace("{open_instruction}", OPEN_INSTRUCTION)
        // Last, so text inside the description is never treated as a placeholder.
        .replace("{job_description}", job_description)
}

/// Builds the single `KEY: value` prompt covering every extracted field.
pub fn block_prompt(specs: &[FieldSpec], job_description: &str) -> String {
    let field_lines = specs
        .iter()
        .filter(|spec| spec.is_extracted())
        .map(|spec| {
            let suffix = if is_list(spec) {
                " - separate multiple with |"
            } else {
                ""
            };
            format!("{}: [{}{}]", spec.key, spec.description.to_lowercase(), suffix)
        })
        .collect::<Vec<_>>()
        .join("\n");

    BLOCK_PROMPT_TEMPLATE
        .replace("{field_lines}", &field_lines)
        .replace("{job_description}", job_description)
}

fn is_list(spec: &FieldSpec) -> bool {
    matches!(spec.coercion, Coercion::TextList | Coercion::ObjectiveList)
}
