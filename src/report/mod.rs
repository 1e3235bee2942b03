use anyhow::Result;
use serde_json::Value;
use tracing::info;

use crate::model::{ReportData, ReportSection, ReportType};
use crate::util::{now_utc_string, sha256_text};

mod envelope;
mod error;
mod failure;
mod html;
mod inline;
mod payload;
mod rating;
mod segment;
mod structure;
mod table;
#[cfg(test)]
mod tests;
mod text;
mod theme;

pub use envelope::decode_envelope;
pub use failure::{FailureKind, ReportFailure};
pub use html::ReportHtmlRenderer;
pub use inline::RenderOptions;
pub use payload::ReportParser;
pub use structure::AnalysisStructurer;

#[cfg(test)]
use error::*;
#[cfg(test)]
use inline::*;
#[cfg(test)]
use payload::*;
#[cfg(test)]
use rating::*;
#[cfg(test)]
use segment::*;
#[cfg(test)]
use structure::*;
#[cfg(test)]
use table::*;
#[cfg(test)]
use theme::*;

const SUMMARY_KEYS: [&str; 3] = ["summary", "요약", "conclusion"];

/// Turns one generation payload into an immutable [`ReportData`].
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    parser: ReportParser,
}

impl ReportBuilder {
    pub fn new() -> Result<Self> {
        Ok(Self {
            parser: ReportParser::new()?,
        })
    }

    pub fn build(&self, payload: &Value, report_type: ReportType) -> ReportData {
        let parsed = self.parser.parse_complex_content(payload);
        let parsed_count = parsed.len();
        let sections = retain_meaningful_sections(parsed);

        let report = ReportData {
            report_type,
            report_name: report_name(payload, report_type),
            sections,
            summary: summary(payload, report_type),
            generated_at: now_utc_string(),
            source_sha256: sha256_text(&payload.to_string()),
        };

        info!(
            report_type = report_type.as_str(),
            parsed_sections = parsed_count,
            kept_sections = report.sections.len(),
            "built report"
        );

        report
    }
}

/// Drops empty sections, keeping `***`-wrapped heading sections.
pub fn retain_meaningful_sections(sections: Vec<ReportSection>) -> Vec<ReportSection> {
    let kept = sections
        .into_iter()
        .filter(|section| section.is_top_level() || !section.content.trim().is_empty())
        .collect::<Vec<_>>();

    if kept.is_empty() {
        return vec![ReportSection::new(
            segment::EMPTY_ANALYSIS_TITLE,
            segment::EMPTY_ANALYSIS_CONTENT,
        )];
    }

    kept
}

fn lookup_text<'a>(payload: &'a Value, keys: &[&str]) -> Option<&'a str> {
    let scopes = [Some(payload), payload.get("analysis")];
    scopes.into_iter().flatten().find_map(|scope| {
        keys.iter()
            .filter_map(|key| scope.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .find(|value| !value.is_empty())
    })
}

fn report_name(payload: &Value, report_type: ReportType) -> String {
    lookup_text(payload, &["reportName"])
        .unwrap_or(report_type.report_name())
        .to_string()
}

fn summary(payload: &Value, report_type: ReportType) -> String {
    lookup_text(payload, &SUMMARY_KEYS)
        .unwrap_or(report_type.default_summary())
        .to_string()
}
