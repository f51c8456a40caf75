//! Section prompt construction. Each known section has its own instruction
//! template; unknown sections get a generic one that still pins the output
//! to the input structure. Replace `{job_description}` and
//! `{original_content}` before sending.

use serde_json::Value;

use super::styles::{resolve_style, StyleRules};

/// Substituted for the job description when none is provided.
const NOT_PROVIDED: &str = "Not provided";

const BASICS_PROMPT: &str = r#"Enhance the professional summary and basic information section.

INSTRUCTIONS:
- Create a powerful, concise professional summary that highlights core expertise.
- CRITICAL: Summary MUST strictly adhere to {summary_length} - this is non-negotiable.
- Ensure the job title/label accurately reflects skills and experience.
- Keep all other personal information (name, contact, location) unchanged.

JOB DESCRIPTION CONTEXT:
{job_description}

ORIGINAL CONTENT:
{original_content}

Return ONLY the enhanced JSON for this section.
Maintain the EXACT SAME structure but enhance the content."#;

const WORK_PROMPT: &str = r#"Enhance the work experience section.

INSTRUCTIONS:
- CRITICAL: Transform each bullet point into powerful achievement statements following these STRICT rules:
- {experience_length}
- DEFAULT to two-line entries (28-32 words) unless content absolutely cannot be expanded.
- Each bullet MUST start with a strong action verb.
- Each bullet MUST include at least one metric, percentage, or quantifiable achievement.
- Focus on specific challenges faced, actions taken, and measurable results.
- Keep company names, job titles, and dates unchanged.

JOB DESCRIPTION CONTEXT:
{job_description}

ORIGINAL CONTENT:
{original_content}

Return ONLY the enhanced JSON for this section.
Maintain the EXACT SAME structure but enhance the content."#;

const EDUCATION_PROMPT: &str = r#"Enhance the education section.

INSTRUCTIONS:
- CRITICAL: MUST strictly follow these formatting rules: {education_length}
- Each bullet point MUST be exactly 10-13 words.
- Highlight relevant coursework and projects that align with target role.
- Add academic achievements if applicable.
- Keep institution names, degrees, and dates unchanged.

JOB DESCRIPTION CONTEXT:
{job_description}

ORIGINAL CONTENT:
{original_content}

Return ONLY the enhanced JSON for this section.
Maintain the EXACT SAME structure but enhance the content."#;

const SKILLS_PROMPT: &str = r#"Enhance the skills section.

INSTRUCTIONS:
- CRITICAL: MUST strictly follow these formatting rules: {skills_format}
- Prioritize skills mentioned in the job description.
- Organize skills in order of relevance to the position.
- Each skill MUST be a specific, concise term (1-3 words maximum).
- Add any relevant skills that may be missing based on experience.

JOB DESCRIPTION CONTEXT:
{job_description}

ORIGINAL CONTENT:
{original_content}

Return ONLY the enhanced JSON for this section.
Maintain the EXACT SAME structure but enhance the content."#;

const PROJECTS_PROMPT: &str = r#"Enhance the projects section.

INSTRUCTIONS:
- CRITICAL: MUST strictly follow these formatting rules: {projects_length}
- DEFAULT to two-line entries (28-32 words) unless content absolutely cannot be expanded.
- Each bullet MUST start with a strong action verb.
- Each bullet MUST highlight specific technologies, methodologies, or frameworks used.
- Each bullet MUST include at least one quantifiable outcome or result.
- Connect project outcomes to business impact where possible.

JOB DESCRIPTION CONTEXT:
{job_description}

ORIGINAL CONTENT:
{original_content}

Return ONLY the enhanced JSON for this section.
Maintain the EXACT SAME structure but enhance the content."#;

const PUBLICATIONS_PROMPT: &str = r#"Enhance the publications section.

INSTRUCTIONS:
- Each publication description MUST be exactly 25-30 words.
- Emphasize the relevance of the publication to the target position.
- Highlight your specific contribution if multiple authors.
- Use industry-specific terminology that aligns with the job.
- Keep publication dates and formal details unchanged.

JOB DESCRIPTION CONTEXT:
{job_description}

ORIGINAL CONTENT:
{original_content}

Return ONLY the enhanced JSON for this section.
Maintain the EXACT SAME structure but enhance the content."#;

const AWARDS_PROMPT: &str = r#"Enhance the awards section.

INSTRUCTIONS:
- CRITICAL: MUST strictly follow these formatting rules: {awards_format}
- Each award summary MUST be exactly 20-25 words.
- Each award summary MUST include at least one metric or quantifiable achievement.
- Emphasize the significance and exclusivity of each award.
- Connect awards to specific achievements or skills.
- Keep award names, issuers, and dates unchanged.

JOB DESCRIPTION CONTEXT:
{job_description}

ORIGINAL CONTENT:
{original_content}

Return ONLY the enhanced JSON for this section.
Maintain the EXACT SAME structure but enhance the content."#;

/// Fallback for section names without a dedicated template.
const GENERIC_PROMPT: &str = r#"Enhance the {section_name} section.

STRICT RULES:
Maintain the EXACT SAME structure but enhance the content ensure that the input/output is same.

INSTRUCTIONS:
- Transform content to be more impactful and relevant to the target position.
- Use strong, action-oriented language.
- Add specific details and metrics where possible.

JOB DESCRIPTION CONTEXT:
{job_description}

ORIGINAL CONTENT:
{original_content}

Return ONLY the enhanced JSON for this section."#;

fn section_template(section_name: &str) -> Option<&'static str> {
    match section_name {
        "basics" => Some(BASICS_PROMPT),
        "work" => Some(WORK_PROMPT),
        "education" => Some(EDUCATION_PROMPT),
        "skills" => Some(SKILLS_PROMPT),
        "projects" => Some(PROJECTS_PROMPT),
        "publications" => Some(PUBLICATIONS_PROMPT),
        "awards" => Some(AWARDS_PROMPT),
        _ => None,
    }
}

fn apply_style(template: &str, rules: &StyleRules) -> String {
    template
        .replace("{summary_length}", rules.summary_length)
        .replace("{experience_length}", rules.experience_length)
        .replace("{education_length}", rules.education_length)
        .replace("{projects_length}", rules.projects_length)
        .replace("{skills_format}", rules.skills_format)
        .replace("{awards_format}", rules.awards_format)
}

/// Builds the full instruction text for one section. Pure function of its
/// inputs: the section content is embedded as 2-space-indented JSON, the job
/// description verbatim (or "Not provided" when absent or empty).
pub fn build_section_prompt(
    section_name: &str,
    section_content: &Value,
    job_description: Option<&str>,
    style_template: &str,
) -> String {
    let rules = resolve_style(style_template);
    let jd = job_description
        .filter(|jd| !jd.is_empty())
        .unwrap_or(NOT_PROVIDED);
    let content = serde_json::to_string_pretty(section_content)
        .unwrap_or_else(|_| section_content.to_string());

    let template = match section_template(section_name) {
        Some(template) => apply_style(template, rules),
        None => GENERIC_PROMPT.replace("{section_name}", section_name),
    };

    template
        .replace("{job_description}", jd)
        .replace("{original_content}", &content)
}
