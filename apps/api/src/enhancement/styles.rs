//! Style templates: named bundles of length/format rules substituted into
//! every section prompt. Unknown template names resolve to the default.

/// The six formatting rules every style template defines. Each section
/// prompt substitutes the one rule relevant to that section.
#[derive(Debug, Clone, Copy)]
pub struct StyleRules {
    pub summary_length: &'static str,
    pub experience_length: &'static str,
    pub education_length: &'static str,
    pub projects_length: &'static str,
    pub skills_format: &'static str,
    pub awards_format: &'static str,
}

pub static SIMPLE: StyleRules = StyleRules {
    summary_length: "Generate a concise and impactful summary of exactly 45-50 words, \
        highlighting core skills, key strengths, and measurable impact. Avoid fluff or vague \
        language; focus on tangible achievements.",
    experience_length: "Each experience section MUST contain exactly 5 bullet points. DEFAULT \
        to two-line entries (28-32 words each) that showcase skills applied and quantifiable \
        results. Only use one-line entries (15-16 words) when content absolutely cannot be \
        expanded. Each bullet MUST start with a strong action verb.",
    education_length: "Education details MUST include exactly 3 bullet points. Each point MUST \
        be 10-13 words long, highlighting major achievements, skills, or key projects. Use \
        degree abbreviations such as 'BSc', 'MSc', 'BA', 'MA', and 'BE' for consistency.",
    projects_length: "Each project entry MUST include exactly 5 bullet points. DEFAULT to \
        two-line entries (28-32 words) focusing on impact, technologies used, and measurable \
        outcomes. Only use one-line entries (15-16 words) when content absolutely cannot be \
        expanded. Each bullet MUST start with a strong action verb.",
    skills_format: "Organize skills into exactly 4 categorized headers, listing exactly 4 core \
        skills per category. Use only concise terms that directly reflect key competencies. No \
        descriptions or explanations allowed.",
    awards_format: "Summarize each award in a single impactful sentence of exactly 20-25 words \
        that emphasizes the achievement's significance, outcome, or recognition criteria. Each \
        summary MUST include at least one metric or quantifiable impact.",
};

pub static SOFTWARE_ENGINEER: StyleRules = StyleRules {
    summary_length: "Generate a technical summary of exactly 55-60 words focusing on \
        specialized programming skills, achievements, and measurable impact. MUST incorporate \
        at least 5 ATS-relevant technical keywords for improved searchability.",
    experience_length: "Each experience section MUST contain exactly 5 bullet points. DEFAULT \
        to two-line entries (28-32 words) that demonstrate technical challenges solved and \
        measurable outcomes. Only use one-line entries (15-16 words) when content absolutely \
        cannot be expanded. Each bullet MUST start with a technical action verb.",
    education_length: "Degree name should be in short like ME,BE. Education details MUST \
        include exactly 3 bullet points. Each point MUST be 10-13 words long, highlighting \
        relevant technical coursework, certifications, or achievements. Strictly use degree \
        abbreviations like 'BSc', 'MSc', 'BE', 'BTech' etc.",
    projects_length: "Each project section MUST include exactly 5 bullet points. DEFAULT to \
        two-line entries (28-32 words) focusing on technical challenges solved and \
        quantifiable outcomes. Only use one-line entries (15-16 words) when content absolutely \
        cannot be expanded. Each bullet MUST include at least one technical term or \
        technology.",
    skills_format: "List skills under exactly 5 technical categories with exactly 4 \
        specialized skills per category. Each skill MUST be a specific technology, language, \
        framework, or methodology relevant to software engineering.",
    awards_format: "Summarize each award in a single impactful sentence of exactly 20-25 \
        words highlighting technical achievements, innovation metrics, or leadership outcomes. \
        Each summary MUST include at least one technical term or quantifiable result.",
};

/// Resolves a style template by name; unknown names fall back to "simple".
pub fn resolve_style(name: &str) -> &'static StyleRules {
    match name {
        "software_engineer" => &SOFTWARE_ENGINEER,
        _ => &SIMPLE,
    }
}
