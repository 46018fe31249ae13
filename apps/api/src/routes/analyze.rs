//! The upload form and the analysis pipeline behind POST /analyze.
//!
//! The pipeline runs strictly in sequence: validate upload, extract text,
//! summary, detailed analysis, wellness score (which consumes the analysis),
//! then the optional ATS comparison. Validation failures re-render the upload
//! page before any model call; model failures degrade the affected fields but
//! still render a results page.

use askama::Template;
use axum::{
    extract::{Multipart, State},
    response::Html,
};
use bytes::Bytes;
use chrono::Local;
use tracing::{info, warn};

use crate::analysis;
use crate::analysis::wellness::{parse_wellness_response, WellnessScore};
use crate::ats;
use crate::errors::AppError;
use crate::extract::extract_pdf_text;
use crate::render::markdown_to_html;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "upload.html")]
struct UploadPage {
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "result.html")]
struct ResultPage {
    summary: String,
    detailed_analysis_html: String,
    wellness_score_value: f64,
    wellness_score_percent: f64,
    wellness_score_explanation: String,
    ats_score: u32,
    ats_analysis_html: String,
    jd_provided: bool,
}

/// GET /
pub async fn upload_page() -> Result<Html<String>, AppError> {
    let page = UploadPage { error: None };
    Ok(Html(page.render()?))
}

fn upload_error(message: &str) -> Result<Html<String>, AppError> {
    let page = UploadPage {
        error: Some(message.to_string()),
    };
    Ok(Html(page.render()?))
}

/// POST /analyze
pub async fn analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let mut resume_bytes: Option<Bytes> = None;
    let mut resume_content_type: Option<String> = None;
    let mut job_description = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart form: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("resume") => {
                resume_content_type = field.content_type().map(str::to_string);
                resume_bytes = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?,
                );
            }
            Some("job_description") => {
                job_description = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
            }
            _ => {}
        }
    }

    // 1. Validate the upload before any model call
    let Some(bytes) = resume_bytes else {
        return upload_error("No resume file was uploaded.");
    };
    if resume_content_type.as_deref() != Some("application/pdf") {
        return upload_error("Invalid file type. Please upload a PDF.");
    }

    // 2. Extract the transcript
    let resume_text = match extract_pdf_text(bytes.to_vec()).await {
        Ok(text) => text,
        Err(e) => {
            warn!("PDF extraction failed: {e:?}");
            return upload_error("Could not read the uploaded PDF. Please upload a valid, unencrypted PDF file.");
        }
    };
    if resume_text.trim().is_empty() {
        return upload_error(
            "Could not find any text to analyze. Please ensure your PDF is text-based and not an image or a scan.",
        );
    }

    info!("Analyzing resume ({} extracted characters)", resume_text.len());

    // 3. AI analysis, strictly sequential; the date feeds recency judgments
    let current_date = Local::now().format("%B %d, %Y").to_string();
    let model = state.model.as_ref();

    let summary = match analysis::summarize(model, &resume_text).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Summary generation failed: {e}");
            format!("Summary unavailable: {e}")
        }
    };

    let (detailed_analysis, wellness) =
        match analysis::detailed_analysis(model, &resume_text, &current_date).await {
            Ok(analysis_text) => {
                let wellness =
                    match analysis::wellness_score(model, &analysis_text, &current_date).await {
                        Ok(raw) => parse_wellness_response(&raw),
                        Err(e) => {
                            warn!("Wellness scoring failed: {e}");
                            WellnessScore::unavailable(format!("Wellness score unavailable: {e}"))
                        }
                    };
                (analysis_text, wellness)
            }
            Err(e) => {
                warn!("Detailed analysis failed: {e}");
                // The wellness call consumes the analysis text, so it is
                // skipped when there is nothing to score
                (
                    format!("Detailed analysis unavailable: {e}"),
                    WellnessScore::unavailable(format!("Wellness score unavailable: {e}")),
                )
            }
        };

    // 4. ATS comparison only when a job description was actually supplied
    let jd_provided = !job_description.trim().is_empty();
    let (ats_score, ats_analysis_html) = if jd_provided {
        let report = ats::calculate_ats_score(model, &resume_text, &job_description).await;
        (report.score, markdown_to_html(&report.analysis))
    } else {
        (0, String::new())
    };

    let page = ResultPage {
        summary,
        detailed_analysis_html: markdown_to_html(&detailed_analysis),
        wellness_score_value: wellness.value,
        wellness_score_percent: wellness.percent,
        wellness_score_explanation: wellness.explanation,
        ats_score,
        ats_analysis_html,
        jd_provided,
    };
    Ok(Html(page.render()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::llm_client::{LlmError, TextModel};
    use crate::routes::build_router;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    /// Records every prompt it receives and answers each analysis stage with
    /// a plausibly formatted response.
    struct ScriptedModel {
        prompts: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl TextModel for ScriptedModel {
        async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if prompt.contains("Wellness Score") {
                Ok("Score: 7.5\nExplanation: Good structure.".to_string())
            } else if prompt.contains("ATS compatibility score") {
                Ok("ATS Score: 82/100\n**Analysis:**\nStrong keyword overlap.".to_string())
            } else {
                Ok("A solid mid-level backend engineer.".to_string())
            }
        }
    }

    fn test_app() -> (axum::Router, Arc<Mutex<Vec<String>>>) {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let state = AppState {
            model: Arc::new(ScriptedModel {
                prompts: prompts.clone(),
            }),
            config: Config {
                google_api_keys: vec![],
                port: 0,
                static_dir: "static".to_string(),
                rust_log: "info".to_string(),
            },
        };
        (build_router(state), prompts)
    }

    const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

    fn multipart_body(file: Option<(&str, &[u8])>, job_description: Option<&str>) -> Vec<u8> {
        let mut body = Vec::new();
        if let Some((content_type, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; \
                     filename=\"resume.pdf\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        if let Some(jd) = job_description {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; \
                     name=\"job_description\"\r\n\r\n{jd}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn analyze_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    /// A minimal single-page PDF with one line of Helvetica text, built with
    /// byte-accurate xref offsets so pdf-extract accepts it.
    fn pdf_with_text(text: &str) -> Vec<u8> {
        let stream = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
                .to_string(),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
            format!(
                "<< /Length {} >>\nstream\n{stream}\nendstream",
                stream.len()
            ),
        ];

        let mut out = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n");
        let mut offsets = Vec::new();
        for (i, object) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n{object}\nendobj\n", i + 1).as_bytes());
        }
        let xref_offset = out.len();
        out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
        out.extend_from_slice(b"0000000000 65535 f \n");
        for offset in offsets {
            out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        out.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
                objects.len() + 1
            )
            .as_bytes(),
        );
        out
    }

    #[tokio::test]
    async fn test_non_pdf_upload_is_rejected_without_model_calls() {
        let (app, prompts) = test_app();
        let body = multipart_body(Some(("text/plain", b"just some text")), None);

        let response = app.oneshot(analyze_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Invalid file type"));
        assert!(prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_rejected_without_model_calls() {
        let (app, prompts) = test_app();
        let body = multipart_body(None, Some("some job description"));

        let response = app.oneshot(analyze_request(body)).await.unwrap();
        let html = body_string(response).await;
        assert!(html.contains("No resume file was uploaded."));
        assert!(prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_pdf_is_rejected_without_model_calls() {
        let (app, prompts) = test_app();
        let body = multipart_body(Some(("application/pdf", b"not really a pdf")), None);

        let response = app.oneshot(analyze_request(body)).await.unwrap();
        let html = body_string(response).await;
        assert!(html.contains("Could not read the uploaded PDF"));
        assert!(prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_whitespace_only_pdf_is_rejected_without_model_calls() {
        let (app, prompts) = test_app();
        // Parses fine, but the transcript is blank
        let pdf = pdf_with_text("   ");
        let body = multipart_body(Some(("application/pdf", &pdf)), None);

        let response = app.oneshot(analyze_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Could not find any text to analyze"));
        assert!(prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_job_description_skips_ats() {
        let (app, prompts) = test_app();
        let pdf = pdf_with_text("Jane Doe - Backend Engineer");
        let body = multipart_body(Some(("application/pdf", &pdf)), Some("   \n  "));

        let response = app.oneshot(analyze_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;

        // Summary, detailed analysis, wellness — and nothing else
        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.len(), 3);
        assert!(!prompts.iter().any(|p| p.contains("ATS compatibility score")));

        assert!(html.contains("7.5"));
        assert!(html.contains("Good structure."));
    }

    #[tokio::test]
    async fn test_job_description_triggers_ats() {
        let (app, prompts) = test_app();
        let pdf = pdf_with_text("Jane Doe - Backend Engineer");
        let body = multipart_body(
            Some(("application/pdf", &pdf)),
            Some("Senior Rust developer, Tokio and Axum required."),
        );

        let response = app.oneshot(analyze_request(body)).await.unwrap();
        let html = body_string(response).await;

        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.len(), 4);
        assert!(prompts.iter().any(|p| p.contains("ATS compatibility score")));

        assert!(html.contains("82"));
        assert!(html.contains("Strong keyword overlap."));
    }
}
