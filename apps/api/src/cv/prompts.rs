// CV extraction prompt template.
// The model's reply is parsed by `cv::extraction`; anything that is not a JSON object
// is kept verbatim as a fallback summary.

pub const CV_EXTRACTION_PROMPT: &str = r#"Extract the following information from this CV and format it as valid JSON.
Return only the JSON object.

OUTPUT SCHEMA:
{
  "name": "string",
  "email": "string",
  "skills": ["string"],
  "experience": [
    { "title": "string", "company": "string", "duration": "string" }
  ],
  "education": [
    { "degree": "string", "institution": "string", "year": "string" }
  ],
  "summary": "string"
}

CV TEXT:
{cv_text}"#;

pub fn build_extraction_prompt(cv_text: &str) -> String {
    CV_EXTRACTION_PROMPT.replace("{cv_text}", cv_text)
}
