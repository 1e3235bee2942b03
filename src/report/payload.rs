use anyhow::Result;
use serde_json::Value;
use tracing::{debug, warn};

use crate::model::ReportSection;
use crate::report::error::ReportParseError;
use crate::report::segment::{SectionSegmenter, placeholder_title};

pub const ERROR_SECTION_TITLE: &str = "오류 발생";

const MAX_PAYLOAD_DEPTH: usize = 64;

/// The accepted shapes of an AI analysis payload, in dispatch order.
#[derive(Debug, Clone, Copy)]
pub enum AnalysisPayload<'a> {
    Structured(&'a [Value]),
    RawAnalysis(&'a str),
    Text(&'a str),
    Other(&'a Value),
}

impl<'a> AnalysisPayload<'a> {
    pub fn classify(value: &'a Value) -> Result<Self, ReportParseError> {
        match value {
            Value::Null => Err(ReportParseError::NullPayload),
            Value::String(text) => Ok(Self::Text(text)),
            Value::Object(_) => {
                if let Some(entries) = structured_sections(value) {
                    return Ok(Self::Structured(entries));
                }
                if let Some(text) = raw_analysis(value) {
                    return Ok(Self::RawAnalysis(text));
                }
                Ok(Self::Other(value))
            }
            _ => Ok(Self::Other(value)),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Structured(_) => "structured",
            Self::RawAnalysis(_) => "raw_analysis",
            Self::Text(_) => "text",
            Self::Other(_) => "other",
        }
    }
}

fn structured_sections(value: &Value) -> Option<&[Value]> {
    value
        .get("analysis")
        .and_then(|analysis| analysis.get("sections"))
        .and_then(Value::as_array)
        .or_else(|| value.get("sections").and_then(Value::as_array))
        .map(Vec::as_slice)
}

fn raw_analysis(value: &Value) -> Option<&str> {
    value
        .get("rawAnalysis")
        .and_then(Value::as_str)
        .or_else(|| {
            value
                .get("analysis")
                .and_then(|analysis| analysis.get("rawAnalysis"))
                .and_then(Value::as_str)
        })
}

#[derive(Debug, Clone)]
pub struct ReportParser {
    segmenter: SectionSegmenter,
}

impl ReportParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            segmenter: SectionSegmenter::new()?,
        })
    }

    /// Never fails: a payload that cannot be parsed becomes a single
    /// error section carrying the failure message.
    pub fn parse_complex_content(&self, value: &Value) -> Vec<ReportSection> {
        match self.try_parse(value, true) {
            Ok(sections) => sections,
            Err(err) => {
                warn!(error = %err, "report payload could not be parsed");
                vec![ReportSection::new(ERROR_SECTION_TITLE, err.to_string())]
            }
        }
    }

    pub fn parse_raw_analysis(&self, text: &str) -> Vec<ReportSection> {
        self.segmenter.segment(text)
    }

    fn try_parse(
        &self,
        value: &Value,
        allow_embedded_json: bool,
    ) -> Result<Vec<ReportSection>, ReportParseError> {
        if exceeds_depth(value, MAX_PAYLOAD_DEPTH) {
            return Err(ReportParseError::TooDeep {
                limit: MAX_PAYLOAD_DEPTH,
            });
        }

        let payload = AnalysisPayload::classify(value)?;
        debug!(kind = payload.kind(), "dispatching report payload");

        match payload {
            AnalysisPayload::Structured(entries) => self.map_structured(entries),
            AnalysisPayload::RawAnalysis(text) => Ok(self.parse_raw_analysis(text)),
            AnalysisPayload::Text(text) => {
                if allow_embedded_json && let Some(decoded) = decode_embedded_object(text) {
                    return self.try_parse(&decoded, false);
                }
                Ok(self.parse_raw_analysis(text))
            }
            AnalysisPayload::Other(value) => {
                let text = serde_json::to_string_pretty(value)?;
                Ok(self.parse_raw_analysis(&text))
            }
        }
    }

    /// Titles are kept as given; only a missing or blank title is defaulted.
    fn map_structured(&self, entries: &[Value]) -> Result<Vec<ReportSection>, ReportParseError> {
        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| -> Result<ReportSection, ReportParseError> {
                let ordinal = index + 1;
                if !entry.is_object() {
                    return Err(ReportParseError::InvalidSection { index: ordinal });
                }

                let title = ["title", "name"]
                    .iter()
                    .filter_map(|key| entry.get(*key).and_then(Value::as_str))
                    .map(str::trim)
                    .find(|value| !value.is_empty())
                    .map(ToOwned::to_owned)
                    .unwrap_or_else(|| placeholder_title(ordinal));

                let content = match entry.get("content") {
                    None | Some(Value::Null) => String::new(),
                    Some(Value::String(text)) => text.clone(),
                    Some(other) => serde_json::to_string_pretty(other)?,
                };

                Ok(ReportSection { title, content })
            })
            .collect()
    }
}

fn decode_embedded_object(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if !trimmed.starts_with('{') {
        return None;
    }

    serde_json::from_str::<Value>(trimmed)
        .ok()
        .filter(Value::is_object)
}

fn exceeds_depth(value: &Value, remaining: usize) -> bool {
    match value {
        Value::Array(items) => {
            remaining == 0 || items.iter().any(|item| exceeds_depth(item, remaining - 1))
        }
        Value::Object(map) => {
            remaining == 0 || map.values().any(|item| exceeds_depth(item, remaining - 1))
        }
        _ => false,
    }
}
