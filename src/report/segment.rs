use anyhow::{Context, Result};
use regex::Regex;

use crate::model::ReportSection;
use crate::report::text::{char_len, normalize_newlines};

pub const FALLBACK_TITLE: &str = "분석 결과";
pub const EMPTY_ANALYSIS_TITLE: &str = "분석 결과 없음";
pub const EMPTY_ANALYSIS_CONTENT: &str = "분석 데이터가 없습니다.";

const MAX_PARAGRAPH_TITLE_CHARS: usize = 50;

pub fn placeholder_title(ordinal: usize) -> String {
    format!("섹션 {ordinal}")
}

pub fn synthesized_title(ordinal: usize) -> String {
    format!("분석 내용 {ordinal}")
}

/// Splits free-form AI report text into titled sections.
///
/// Markdown headings win over numbered lines, which win over blank-line
/// paragraphs. Only the first strategy that yields a section is used.
#[derive(Debug, Clone)]
pub struct SectionSegmenter {
    heading: Regex,
    numbered_line: Regex,
    title_prefix: Regex,
}

impl SectionSegmenter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            heading: Regex::new(r"(?m)^#{1,3}\s+(.+)$")
                .context("failed to compile markdown heading regex")?,
            numbered_line: Regex::new(r"^(\d+(?:\.\d+)*\.?\s+)(.+)$")
                .context("failed to compile numbered line regex")?,
            title_prefix: Regex::new(r"^[#\d.\-\s]+")
                .context("failed to compile title prefix regex")?,
        })
    }

    pub fn segment(&self, raw_text: &str) -> Vec<ReportSection> {
        let text = normalize_newlines(raw_text);
        if text.trim().is_empty() {
            return vec![ReportSection::new(
                EMPTY_ANALYSIS_TITLE,
                EMPTY_ANALYSIS_CONTENT,
            )];
        }

        let mut sections = self.split_on_headings(&text);
        if sections.is_empty() {
            sections = self.split_on_numbered_lines(&text);
        }
        if sections.is_empty() {
            sections = self.split_on_paragraphs(&text);
        }

        if sections.is_empty() {
            return vec![ReportSection::new(FALLBACK_TITLE, text.trim())];
        }

        sections
    }

    /// Strips leading `#`, digits, dots, dashes and whitespace.
    pub fn clean_title(&self, raw_title: &str, ordinal: usize) -> String {
        let cleaned = self.title_prefix.replace(raw_title.trim(), "");
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            placeholder_title(ordinal)
        } else {
            cleaned.to_string()
        }
    }

    fn split_on_headings(&self, text: &str) -> Vec<ReportSection> {
        let matches = self
            .heading
            .captures_iter(text)
            .filter_map(|captures| {
                let whole = captures.get(0)?;
                let title = captures.get(1)?;
                Some((whole.start(), whole.end(), title.as_str().trim().to_string()))
            })
            .collect::<Vec<_>>();

        matches
            .iter()
            .enumerate()
            .map(|(index, (_, end, title))| {
                let next_start = matches
                    .get(index + 1)
                    .map(|(start, _, _)| *start)
                    .unwrap_or(text.len());
                let content = text[*end..next_start].trim();
                ReportSection::new(self.clean_title(title, index + 1), content)
            })
            .collect()
    }

    fn split_on_numbered_lines(&self, text: &str) -> Vec<ReportSection> {
        let mut sections = Vec::<ReportSection>::new();
        let mut current_title: Option<String> = None;
        let mut current_lines = Vec::<&str>::new();

        for line in text.lines() {
            if let Some(captures) = self.numbered_line.captures(line) {
                if let Some(title) = current_title.take() {
                    let ordinal = sections.len() + 1;
                    sections.push(ReportSection::new(
                        self.clean_title(&title, ordinal),
                        current_lines.join("\n").trim(),
                    ));
                }

                current_title = captures
                    .get(2)
                    .map(|value| value.as_str().trim().to_string());
                current_lines.clear();
                continue;
            }

            if current_title.is_some() && !line.trim().is_empty() {
                current_lines.push(line);
            }
        }

        if let Some(title) = current_title.take() {
            let ordinal = sections.len() + 1;
            sections.push(ReportSection::new(
                self.clean_title(&title, ordinal),
                current_lines.join("\n").trim(),
            ));
        }

        sections
    }

    fn split_on_paragraphs(&self, text: &str) -> Vec<ReportSection> {
        text.split("\n\n")
            .map(str::trim)
            .filter(|paragraph| !paragraph.is_empty())
            .enumerate()
            .map(|(index, paragraph)| {
                let ordinal = index + 1;
                let lines = paragraph.split('\n').collect::<Vec<&str>>();
                let first_line = lines.first().copied().unwrap_or_default();

                if char_len(first_line) > MAX_PARAGRAPH_TITLE_CHARS {
                    return ReportSection::new(synthesized_title(ordinal), paragraph);
                }

                let content = if lines.len() > 1 {
                    lines[1..].join("\n").trim().to_string()
                } else {
                    paragraph.to_string()
                };
                ReportSection::new(self.clean_title(first_line, ordinal), content)
            })
            .collect()
    }
}
