use std::fmt::Write;

use crate::domain::PredictionResult;

use super::form::{FormState, SubmitControl};

pub const TITLE: &str = "YouTube Spam Classifier";
const INPUT_LABEL: &str = "Enter a YouTube comment";

pub fn label(is_spam: bool) -> &'static str {
    if is_spam { "Spam" } else { "Not Spam" }
}

/// `0.827` -> `82.7%`. Ties round away from zero (`0.5625` -> `56.3%`).
pub fn format_probability(probability: f64) -> String {
    format!("{:.1}%", (probability * 1000.0).round() / 10.0)
}

pub fn render_result(result: &PredictionResult) -> String {
    let mut out = String::new();
    let mut lines = result.comment.lines();
    let _ = writeln!(out, "- {}", lines.next().unwrap_or_default());
    for line in lines {
        let _ = writeln!(out, "  {line}");
    }
    let _ = writeln!(
        out,
        "  [{}]  Spam probability: {}",
        label(result.is_spam),
        format_probability(result.spam_probability)
    );
    out
}

pub fn render_results(results: &[PredictionResult]) -> String {
    results.iter().map(render_result).collect()
}

pub fn render_view(form: &FormState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{TITLE}");
    let _ = writeln!(out, "{}", "=".repeat(TITLE.len()));
    let _ = writeln!(out, "{INPUT_LABEL}:");

    if form.input().is_empty() {
        let _ = writeln!(out, "  > ");
    } else {
        for line in form.input().split('\n') {
            let _ = writeln!(out, "  > {line}");
        }
    }

    let control = match form.submit_control() {
        SubmitControl::Enabled => "[Analyze]",
        SubmitControl::Disabled => "[Analyze (disabled)]",
        SubmitControl::Busy => "[Analyzing...]",
    };
    let _ = writeln!(out, "{control}");

    if let Some(error) = form.error() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{error}");
    }

    if !form.results().is_empty() {
        let _ = writeln!(out);
        match form.analyzed_at() {
            Some(at) => {
                let _ = writeln!(out, "Results (analyzed {}):", at.format("%H:%M:%S"));
            }
            None => {
                let _ = writeln!(out, "Results:");
            }
        }
        out.push_str(&render_results(form.results()));
    }
    out
}
