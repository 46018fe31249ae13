//! ATS scoring — compares the resume transcript against a job description.
//!
//! One prompt, one LLM call, then best-effort extraction of
//! `ATS Score: <int>/100` and the analysis text that follows the
//! `**Analysis:**` marker. An LLM failure never aborts the request: the
//! report degrades to score 0 with the error text in the analysis field.

pub mod prompts;

use regex::Regex;
use tracing::warn;

use crate::llm_client::TextModel;

#[derive(Debug, Clone)]
pub struct AtsReport {
    pub score: u32,
    pub analysis: String,
}

pub async fn calculate_ats_score(
    model: &dyn TextModel,
    resume_text: &str,
    job_description: &str,
) -> AtsReport {
    let prompt = prompts::ATS_PROMPT_TEMPLATE
        .replace("{resume_text}", resume_text)
        .replace("{job_description}", job_description);

    match model.generate(&prompt).await {
        Ok(raw) => parse_ats_response(&raw),
        Err(e) => {
            warn!("ATS scoring failed: {e}");
            AtsReport {
                score: 0,
                analysis: e.to_string(),
            }
        }
    }
}

pub fn parse_ats_response(raw: &str) -> AtsReport {
    let score = Regex::new(r"(?i)ATS Score:\s*(\d+)\s*/\s*100")
        .ok()
        .and_then(|re| re.captures(raw))
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .unwrap_or(0);

    // The analysis is everything after the first "**Analysis:**" heading
    let analysis = Regex::new(r"(?i)\*\*Analysis:\*\*")
        .ok()
        .and_then(|re| {
            let mut split = re.splitn(raw, 2);
            split.next();
            split.next()
        })
        .map(|tail| tail.trim().to_string())
        .filter(|tail| !tail.is_empty())
        .unwrap_or_else(|| "Could not parse analysis.".to_string());

    AtsReport { score, analysis }
}
