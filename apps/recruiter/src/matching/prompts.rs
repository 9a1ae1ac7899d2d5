// Prompts for competency extraction. JSON-only instructions come from
// llm_client::prompts.

/// Role preamble for the extraction system prompt.
pub const COMPETENCY_EXTRACTION_ROLE: &str =
    "You are an expert IT recruiter who turns job competency descriptions into structured data.";

/// Extraction prompt template. Replace `{competency_text}` before sending.
pub const COMPETENCY_EXTRACTION_PROMPT_TEMPLATE: &str = r#"Analyse the competency description of an IT job opening and extract it as JSON.

Description: "{competency_text}"

Identify:
1. `obrigatorias`: the 5 most essential technical competencies (languages, frameworks, platforms).
2. `desejaveis`: every other technical or behavioural competency mentioned.
3. `sinonimos`: for each competency in `obrigatorias`, 2-3 synonyms or related technologies a strong candidate might mention instead.

Return ONLY the JSON object. Example:
{
  "obrigatorias": ["Python", "Django", "API REST", "PostgreSQL", "AWS"],
  "desejaveis": ["React", "Docker", "Agile"],
  "sinonimos": {
    "Python": ["Pandas", "Numpy", "Flask"],
    "AWS": ["EC2", "S3", "Lambda"]
  }
}"#;

pub fn build_extraction_prompt(competency_text: &str) -> String {
    COMPETENCY_EXTRACTION_PROMPT_TEMPLATE.replace("{competency_text}", competency_text)
}
