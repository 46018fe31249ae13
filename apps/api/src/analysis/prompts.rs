// All LLM prompt constants for the analysis module.
// Templates use `{placeholder}` markers replaced before sending.

/// Summary prompt template. Replace `{resume_text}` before sending.
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Analyze the following resume and provide a concise summary in 4-5 sentences that captures:
1. The candidate's professional level and main expertise
2. Key skills and technologies
3. Years of experience (if mentioned)
4. Most recent or notable position
5. Career focus or specialization

Resume Text:
{resume_text}

Summary:"#;

/// Detailed analysis prompt template.
/// Replace `{resume_text}` and `{current_date}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"As an expert HR analyst and ATS specialist, provide a comprehensive analysis of this resume.

Today's date is {current_date}. Evaluate employment dates, gaps, and recency against it.

Full Resume Text:
{resume_text}

Please analyze and provide detailed feedback on:
1. **ATS Compatibility & Format**: Section organization, headers, keyword optimization.
2. **Content Quality & Structure**: Summary effectiveness, work experience, skills, education, contact info.
3. **Experience & Achievements**: Quantifiable metrics, career progression, relevance, impact.
4. **Skills & Technical Competencies**: Hard vs soft skills, industry tech, categorization, gaps.
5. **Areas for Improvement**: Missing sections, weak points, formatting suggestions.
6. **Overall Strengths**: Standout qualities, competitive advantages, well-executed sections.

Provide specific, actionable recommendations for each area in a section-wise markdown format."#;

/// Wellness-score prompt template.
/// Replace `{analysis_text}` and `{current_date}` before sending.
///
/// The weighting scheme and the optional trailing `Note:` block are
/// instructions to the model, not logic this program enforces.
pub const WELLNESS_PROMPT_TEMPLATE: &str = r#"Based on the following resume analysis, provide a "Wellness Score" from 0.0 to 10.0 that represents the overall quality and effectiveness of the resume.

Today's date is {current_date}.

Consider these factors in your scoring:
- ATS compatibility (25%)
- Content quality and relevance (25%)
- Professional presentation (20%)
- Completeness of information (15%)
- Achievement quantification (15%)

Analysis:
{analysis_text}

Provide ONLY a numeric score between 0.0 and 10.0, followed by a brief 2-3 sentence explanation of the score. If the score is low, explain why. If the resume lacks a summary or objective section, add a final line starting with "Note:" that says so.

Format your response exactly as:
Score: X.X
Explanation: [Brief explanation]"#;
