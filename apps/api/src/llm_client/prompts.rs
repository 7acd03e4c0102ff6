// Prompt constants for the suggestion and rewrite services.
// Placeholders `{resume_text}` and `{jd_text}` are replaced before sending.

/// Text2text prompt for resume suggestions.
pub const SUGGESTION_PROMPT_TEMPLATE: &str = "You are an ATS and hiring expert. \
    Given the Resume and Job Description, write exactly 3 short, actionable bullet-point \
    suggestions to improve the resume. Be specific, focus on keywords, measurable results, \
    and structure. Output only the three bullets, one per line, no extra commentary.\n\n\
    Resume:\n{resume_text}\n\n\
    Job Description:\n{jd_text}\n\n\
    Suggestions:\n";

/// System prompt for the resume rewrite.
pub const REWRITE_SYSTEM: &str = "You are a professional resume writer. \
    Your task is to optimize the provided resume for the role described in the job description, \
    making it ATS-friendly and industry-standard. Strictly follow these rules:\n\
    1. Use plain structured text with clear section headers (Summary, Education, Technical Skills, \
    Projects, Experience, Additional Information).\n\
    2. Do not use any Markdown symbols like *, **, or -.\n\
    3. Present information in bullet points where appropriate, using indentation.\n\
    4. Integrate the key skills and tools named in the job description where the resume supports them.\n\
    5. Rephrase project descriptions to an 'action-result' format, highlighting measurable outcomes \
    (e.g., 'Increased accuracy by 30%').\n\
    6. The tone must be professional, concise, and impact-driven.\n\
    7. The final output must be only the clean, structured resume text, ready for a DOCX or PDF file.";

/// User prompt for the resume rewrite.
pub const REWRITE_PROMPT_TEMPLATE: &str = "Optimize the following resume based on the provided Job Description.\n\n\
    --- Original Resume ---\n{resume_text}\n\n\
    --- Job Description ---\n{jd_text}";

const RESUME_PLACEHOLDER: &str = "{resume_text}";
const JD_PLACEHOLDER: &str = "{jd_text}";

/// Fills both placeholders of a prompt template in a single left-to-right pass.
/// Substituted text is never scanned again, so placeholder-like text inside a
/// resume or job description is kept verbatim.
pub fn render(template: &str, resume_text: &str, jd_text: &str) -> String {
    let mut out = String::with_capacity(template.len() + resume_text.len() + jd_text.len());
    let mut rest = template;

    loop {
        let next = [(RESUME_PLACEHOLDER, resume_text), (JD_PLACEHOLDER, jd_text)]
            .into_iter()
            .filter_map(|(placeholder, value)| {
                rest.find(placeholder).map(|idx| (idx, placeholder, value))
            })
            .min_by_key(|(idx, _, _)| *idx);

        match next {
            Some((idx, placeholder, value)) => {
                out.push_str(&rest[..idx]);
                out.push_str(value);
                rest = &rest[idx + placeholder.len()..];
            }
            None => {
                out.push_str(rest);
                return out;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_fills_both_placeholders() {
        let prompt = render(SUGGESTION_PROMPT_TEMPLATE, "RESUME BODY", "JD BODY");
        assert!(prompt.contains("Resume:\nRESUME BODY"));
        assert!(prompt.contains("Job Description:\nJD BODY"));
        assert!(!prompt.contains("{resume_text}"));
        assert!(!prompt.contains("{jd_text}"));
    }

    #[test]
    fn test_placeholders_inside_inputs_are_kept_verbatim() {
        let prompt = render(REWRITE_PROMPT_TEMPLATE, "MY RESUME", "Paste {resume_text} here");
        assert!(prompt.contains("--- Original Resume ---\nMY RESUME"));
        assert!(prompt.ends_with("--- Job Description ---\nPaste {resume_text} here"));

        let prompt = render(SUGGESTION_PROMPT_TEMPLATE, "uses {jd_text} literally", "JD");
        assert!(prompt.contains("Resume:\nuses {jd_text} literally"));
        assert!(prompt.contains("Job Description:\nJD"));
    }

    #[test]
    fn test_template_without_placeholders_is_unchanged() {
        assert_eq!(render("plain", "r", "j"), "plain");
    }

    #[test]
    fn test_rewrite_prompt_sections() {
        let prompt = render(REWRITE_PROMPT_TEMPLATE, "r", "j");
        assert!(prompt.contains("--- Original Resume ---\nr"));
        assert!(prompt.ends_with("--- Job Description ---\nj"));
    }
}
