//! The three resume-analysis calls: summary, detailed analysis, wellness score.
//!
//! Each function is a pure formatting step over a prompt template followed by
//! one delegated call to the LLM client. The detailed analysis and the
//! wellness score take the current date so the model can judge employment
//! recency correctly; the wellness score consumes the detailed-analysis text,
//! which is why the handler runs the three calls strictly in sequence.

pub mod prompts;
pub mod wellness;

use crate::llm_client::{LlmError, TextModel};

/// Generates a concise professional summary from the resume transcript.
pub async fn summarize(model: &dyn TextModel, resume_text: &str) -> Result<String, LlmError> {
    let prompt = prompts::SUMMARY_PROMPT_TEMPLATE.replace("{resume_text}", resume_text);
    model.generate(&prompt).await
}

/// Produces the section-wise detailed critique in Markdown.
pub async fn detailed_analysis(
    model: &dyn TextModel,
    resume_text: &str,
    current_date: &str,
) -> Result<String, LlmError> {
    let prompt = prompts::ANALYSIS_PROMPT_TEMPLATE
        .replace("{resume_text}", resume_text)
        .replace("{current_date}", current_date);
    model.generate(&prompt).await
}

/// Asks the model to score the detailed analysis; the raw response is parsed
/// by [`wellness::parse_wellness_response`].
pub async fn wellness_score(
    model: &dyn TextModel,
    analysis_text: &str,
    current_date: &str,
) -> Result<String, LlmError> {
    let prompt = prompts::WELLNESS_PROMPT_TEMPLATE
        .replace("{analysis_text}", analysis_text)
        .replace("{current_date}", current_date);
    model.generate(&prompt).await
}
