//! Prompt for turning raw resume text into the structured JSON schema.

use super::pdf::Hyperlink;

/// Placeholders: `{resume_text}`, `{hyperlinks}`.
const EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract and structure resume information from the provided text into JSON format.
Below is the resume content:
{resume_text}

Hyperlinks Extracted:
{hyperlinks}

Follow this exact structure:
{
  "basics": {
    "name": "string",
    "label": "string",
    "email": "string",
    "phone": "string",
    "url": "string",
    "summary": "string",
    "location": {
      "city": "string",
      "countryCode": "string"
    },
    "profiles": [
      {
        "network": "string",
        "username": "string",
        "url": "string"
      }
    ]
  },
  "work": [
    {
      "name": "string",
      "position": "string",
      "location": "string",
      "startDate": "string",
      "endDate": "string",
      "highlights": [
        "string"
      ]
    }
  ],
  "education": [
    {
      "institution": "string",
      "area": "string",
      "studyType": "string",
      "startDate": "string",
      "endDate": "string",
      "courses": [
        "string"
      ]
    }
  ],
  "skills": [
    {
      "name": "string",
      "keywords": [
        "string"
      ]
    }
  ],
  "projects": [
    {
      "name": "string",
      "description": "string",
      "startDate": "string",
      "endDate": "string"
    }
  ],
  "publications": [
    {
      "name": "string",
      "releaseDate": "string",
      "authors": [
        "string"
      ],
      "doi": "string",
      "url": "string"
    }
  ],
  "awards": [
    {
      "title": "string",
      "awarder": "string"
    }
  ]
}


### Instructions:
- Extract ALL information present in the resume
- Extract summary from indirect mentions like "highlights", "key details", or introductory sections
- Standardize education titles: Convert Bachelor variations (BE, BS, etc.) to 'B.Tech'
- Format phone numbers to international format: '+[Country Code] [Number]'
- Extract and structure project descriptions with objectives, technologies, and outcomes
- Use 'YYYY-MM' format for dates, default to January if only year provided
- Extract technical keywords as skills
- Map scattered work experience appropriately
- Group similar skills under categories
- Preserve exact text for important details
- Break down compound information into appropriate fields
- Return only valid JSON without additional text"#;

/// Interpolates resume text and the extracted hyperlink list (serialized as
/// pretty JSON, matching the schema example's indentation).
pub fn build_extraction_prompt(resume_text: &str, hyperlinks: &[Hyperlink]) -> String {
    let hyperlinks_json =
        serde_json::to_string_pretty(hyperlinks).unwrap_or_else(|_| "[]".to_string());
    EXTRACTION_PROMPT_TEMPLATE
        .replace("{resume_text}", resume_text)
        .replace("{hyperlinks}", &hyperlinks_json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_interpolates_text_and_links() {
        let links = vec![Hyperlink {
            page: 1,
            url: "https://github.com/ada".to_string(),
        }];
        let prompt = build_extraction_prompt("Ada Lovelace\nEngineer", &links);
        assert!(prompt.contains("Ada Lovelace\nEngineer"));
        assert!(prompt.contains("\"url\": \"https://github.com/ada\""));
        assert!(!prompt.contains("{resume_text}"));
        assert!(!prompt.contains("{hyperlinks}"));
    }

    #[test]
    fn test_prompt_renders_empty_link_list() {
        let prompt = build_extraction_prompt("text", &[]);
        assert!(prompt.contains("Hyperlinks Extracted:\n[]"));
    }

    #[test]
    fn test_prompt_keeps_schema_and_instructions() {
        let prompt = build_extraction_prompt("text", &[]);
        assert!(prompt.contains("\"publications\""));
        assert!(prompt.contains("\"countryCode\": \"string\""));
        assert!(prompt.contains("- Return only valid JSON without additional text"));
    }
}
