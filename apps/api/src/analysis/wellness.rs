//! Best-effort parsing of the wellness-score response.
//!
//! The model is asked for `Score: X.X` / `Explanation: ...` with an optional
//! trailing `Note:` line, but nothing guarantees it complies. Every pattern
//! that fails to match degrades to a default instead of failing the request.

use regex::Regex;

/// Parsed wellness result. `percent` is always `value * 10` for the 0-100
/// progress bar on the results page.
#[derive(Debug, Clone)]
pub struct WellnessScore {
    pub value: f64,
    pub percent: f64,
    pub explanation: String,
}

impl WellnessScore {
    /// Placeholder result used when the wellness call itself failed or was
    /// skipped because the analysis it depends on is missing.
    pub fn unavailable(reason: String) -> Self {
        Self {
            value: 0.0,
            percent: 0.0,
            explanation: reason,
        }
    }
}

pub fn parse_wellness_response(raw: &str) -> WellnessScore {
    let value = capture(r"Score:\s*([0-9.]+)", raw)
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);

    let mut parts: Vec<String> = Vec::new();

    // Main explanation, stopping before an optional "Note:"
    if let Some(explanation) = capture(r"(?s)Explanation:\s*(.*?)(?:\nNote:|$)", raw) {
        let explanation = explanation.trim();
        if !explanation.is_empty() {
            parts.push(explanation.to_string());
        }
    }

    // The optional note, kept as its own trailing segment
    if let Some(note) = capture(r"(?s)Note:\s*(.*)", raw) {
        parts.push(format!("Note: {}", note.trim()));
    }

    let explanation = if parts.is_empty() {
        "Could not parse score.".to_string()
    } else {
        parts.join("\n")
    };

    WellnessScore {
        value,
        percent: value * 10.0,
        explanation,
    }
}

fn capture(pattern: &str, haystack: &str) -> Option<String> {
    Regex::new(pattern)
        .ok()?
        .captures(haystack)?
        .get(1)
        .map(|m| m.as_str().to_string())
}
