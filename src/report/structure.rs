use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::model::{AnalysisIssue, QualityMetrics, ReportSection, ReportType, StructuredAnalysis};
use crate::report::segment::synthesized_title;
use crate::report::text::{char_len, normalize_newlines, truncate_chars};
use crate::util::now_utc_string;

const MIN_PARAGRAPH_SECTION_CHARS: usize = 50;
const PARAGRAPH_TITLE_CHARS: usize = 50;
const MIN_SENTENCE_CHARS: usize = 20;
const SENTENCES_PER_GROUP: usize = 3;
const MIN_GROUP_CHARS: usize = 50;
const SHORT_REPORT_CHARS: usize = 100;

const ANALYSIS_ERROR_TITLE: &str = "**분석 오류**";
const EMPTY_RESPONSE_MESSAGE: &str = "AI가 응답을 생성하지 못했습니다. 다시 시도해주세요.";
const REFERENCE_NOTE_TITLE: &str = "**분석 참고사항**";
const REFERENCE_NOTE_CONTENT: &str = "이 분석은 제공된 특허 데이터를 바탕으로 AI가 생성한 결과입니다. 더 상세한 분석을 원하시면 다시 시도해주세요.";

/// Builds the `{ reportName, sections, rawAnalysis, qualityMetrics }` object
/// stored alongside a generated report.
#[derive(Debug, Clone)]
pub struct AnalysisStructurer {
    atx_header: Regex,
    bold_header: Regex,
    underscore_header: Regex,
    stage_header: Regex,
    label_header: Regex,
    labelled_bullet: Regex,
    labelled_line: Regex,
    numbered_item: Regex,
    symbol_bullet: Regex,
    bullet: Regex,
    blank_run: Regex,
    paragraph_break: Regex,
    sentence_break: Regex,
    bold_span: Regex,
    figure: Regex,
}

impl AnalysisStructurer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            atx_header: Regex::new(r"^#{1,6}\s+(.+)$")
                .context("failed to compile atx header regex")?,
            bold_header: Regex::new(r"^\*\*([^*]+)\*\*$")
                .context("failed to compile bold header regex")?,
            underscore_header: Regex::new(r"^__(.+)__$")
                .context("failed to compile underscore header regex")?,
            stage_header: Regex::new(r"^(\d+)단계:\s*(.+)$")
                .context("failed to compile stage header regex")?,
            label_header: Regex::new(r"^\*\*([^*]+)\*\*:\s*$")
                .context("failed to compile label header regex")?,
            labelled_bullet: Regex::new(r"^-\s*\*\*([^*]+)\*\*:\s*(.+)$")
                .context("failed to compile labelled bullet regex")?,
            labelled_line: Regex::new(r"^\*\*([^*]+)\*\*:\s*(.+)$")
                .context("failed to compile labelled line regex")?,
            numbered_item: Regex::new(r"^(\d+)\.\s*(.+)$")
                .context("failed to compile numbered item regex")?,
            symbol_bullet: Regex::new(r"^[•·▪▫]\s*(.+)$")
                .context("failed to compile symbol bullet regex")?,
            bullet: Regex::new(r"^[-•·▪▫]\s*(.+)$").context("failed to compile bullet regex")?,
            blank_run: Regex::new(r"\n{3,}").context("failed to compile blank run regex")?,
            paragraph_break: Regex::new(r"\n\s*\n")
                .context("failed to compile paragraph break regex")?,
            sentence_break: Regex::new(r"[.!?]\s+")
                .context("failed to compile sentence break regex")?,
            bold_span: Regex::new(r"\*\*([^*]+)\*\*").context("failed to compile bold regex")?,
            figure: Regex::new(r"(\d+(?:%|억|조|년|개월))")
                .context("failed to compile figure regex")?,
        })
    }

    pub fn structure(&self, raw_text: &str, report_type: ReportType) -> StructuredAnalysis {
        let report_name = report_type.report_name().to_string();
        let text = normalize_newlines(raw_text);

        if text.trim().is_empty() {
            warn!(report_type = report_type.as_str(), "empty analysis text");
            let sections = vec![ReportSection::new(
                ANALYSIS_ERROR_TITLE,
                EMPTY_RESPONSE_MESSAGE,
            )];
            return StructuredAnalysis {
                report_name,
                quality_metrics: quality_metrics(&sections),
                sections,
                raw_analysis: raw_text.to_string(),
                error: Some(AnalysisIssue {
                    issue_type: "EMPTY_RESPONSE".to_string(),
                    message: "Empty analysis text provided".to_string(),
                    timestamp: now_utc_string(),
                }),
            };
        }

        let (mut sections, found_header) = self.split_on_headers(&text, report_type);

        if !found_header || sections.is_empty() {
            debug!("no headers found, splitting analysis into paragraphs");
            sections.extend(self.split_on_paragraphs(&text));
        }

        sections.retain(|section| !section.content.trim().is_empty());

        if sections.is_empty() {
            warn!("no structured sections found, falling back to sentence groups");
            sections = self.group_sentences(&text);
        }

        if sections.is_empty() {
            sections.push(ReportSection::new(
                format!("**{report_name}**"),
                text.trim(),
            ));
        }

        let total_chars = content_chars(&sections);
        if total_chars < SHORT_REPORT_CHARS {
            sections.push(ReportSection::new(
                REFERENCE_NOTE_TITLE,
                REFERENCE_NOTE_CONTENT,
            ));
        }

        let quality_metrics = quality_metrics(&sections);
        info!(
            report_type = report_type.as_str(),
            sections = quality_metrics.total_sections,
            content_chars = quality_metrics.total_content_length,
            "structured analysis"
        );

        StructuredAnalysis {
            report_name,
            sections,
            raw_analysis: raw_text.to_string(),
            quality_metrics,
            error: None,
        }
    }

    fn split_on_headers(&self, text: &str, report_type: ReportType) -> (Vec<ReportSection>, bool) {
        let business = report_type == ReportType::BusinessInsights;
        let mut sections = Vec::<ReportSection>::new();
        let mut current_title: Option<String> = None;
        let mut current_lines = Vec::<String>::new();
        let mut found_header = false;

        for raw_line in text.lines() {
            let line = raw_line.trim();
            if line.is_empty() {
                if !current_lines.is_empty() {
                    current_lines.push(String::new());
                }
                continue;
            }

            if let Some(title) = self.detect_header(line, business) {
                if let Some(previous) = current_title.take() {
                    self.push_section(&mut sections, &previous, &current_lines, business);
                }
                debug!(title = %title, "found analysis header");
                current_title = Some(title);
                current_lines.clear();
                found_header = true;
                continue;
            }

            if business {
                current_lines.push(self.format_business_line(line));
            } else {
                current_lines.push(line.to_string());
            }
        }

        if let Some(previous) = current_title.take() {
            self.push_section(&mut sections, &previous, &current_lines, business);
        }

        (sections, found_header)
    }

    fn detect_header(&self, line: &str, business: bool) -> Option<String> {
        let generic = [&self.atx_header, &self.bold_header, &self.underscore_header]
            .into_iter()
            .find_map(|regex| regex.captures(line))
            .and_then(|captures| captures.get(1))
            .map(|value| value.as_str().trim().to_string());
        if generic.is_some() || !business {
            return generic;
        }

        if self.stage_header.is_match(line) {
            return Some(line.to_string());
        }

        self.label_header
            .captures(line)
            .and_then(|captures| captures.get(1))
            .map(|value| value.as_str().trim().to_string())
    }

    fn push_section(
        &self,
        sections: &mut Vec<ReportSection>,
        title: &str,
        lines: &[String],
        business: bool,
    ) {
        let mut content = lines.join("\n").trim().to_string();
        if business && !content.is_empty() {
            content = self.format_business_content(&content);
        }
        if !content.is_empty() {
            sections.push(ReportSection::new(format!("**{title}**"), content));
        }
    }

    fn format_business_line(&self, line: &str) -> String {
        if let Some(captures) = self
            .labelled_bullet
            .captures(line)
            .or_else(|| self.labelled_line.captures(line))
        {
            return format!("\n**{}**\n{}", &captures[1], &captures[2]);
        }
        if let Some(captures) = self.numbered_item.captures(line) {
            return format!("\n{}. {}", &captures[1], &captures[2]);
        }
        if let Some(captures) = self.symbol_bullet.captures(line) {
            return format!("\n• {}", &captures[1]);
        }
        line.to_string()
    }

    /// Normalizes business-insight section bodies: label lines become
    /// sub-headings, bullets are unified and key figures are bolded.
    pub fn format_business_content(&self, content: &str) -> String {
        let collapsed = self.blank_run.replace_all(content, "\n\n");
        let mut lines = Vec::<String>::new();
        let mut in_list = false;

        for raw_line in collapsed.split('\n') {
            let trimmed = raw_line.trim();
            if trimmed.is_empty() {
                lines.push(String::new());
                in_list = false;
                continue;
            }

            if let Some(captures) = self.label_header.captures(trimmed) {
                lines.push(String::new());
                lines.push(format!("### {}", captures[1].trim()));
                lines.push(String::new());
                in_list = false;
                continue;
            }

            if let Some(captures) = self.labelled_line.captures(trimmed) {
                lines.push(format!("**{}**: {}", &captures[1], &captures[2]));
                in_list = true;
                continue;
            }

            if let Some(captures) = self.bullet.captures(trimmed) {
                let indented = raw_line.starts_with("  ") || raw_line.starts_with('\t');
                let prefix = if indented { "  - " } else { "- " };
                lines.push(format!("{prefix}{}", &captures[1]));
                in_list = true;
                continue;
            }

            if let Some(captures) = self.numbered_item.captures(trimmed) {
                lines.push(format!("{}. **{}**", &captures[1], &captures[2]));
                in_list = true;
                continue;
            }

            if let Some(captures) = self.stage_header.captures(trimmed) {
                lines.push(String::new());
                lines.push(format!("#### {}단계: {}", &captures[1], &captures[2]));
                lines.push(String::new());
                in_list = false;
                continue;
            }

            if in_list && !trimmed.starts_with('-') {
                lines.push(format!("  {trimmed}"));
            } else {
                lines.push(trimmed.to_string());
            }
        }

        let joined = lines.join("\n");
        let tidied = self
            .bold_span
            .replace_all(&joined, |captures: &regex::Captures| {
                format!("**{}**", captures[1].trim())
            });
        let collapsed = self.blank_run.replace_all(&tidied, "\n\n");

        collapsed
            .trim()
            .split('\n')
            .map(|line| {
                if self.figure.is_match(line) {
                    self.figure
                        .replace_all(line.trim(), "**$1**")
                        .into_owned()
                } else {
                    line.to_string()
                }
            })
            .collect::<Vec<String>>()
            .join("\n")
    }

    fn split_on_paragraphs(&self, text: &str) -> Vec<ReportSection> {
        let paragraphs = self
            .paragraph_break
            .split(text)
            .map(str::trim)
            .filter(|paragraph| !paragraph.is_empty())
            .collect::<Vec<&str>>();

        if paragraphs.len() < 2 {
            return Vec::new();
        }

        paragraphs
            .into_iter()
            .filter(|paragraph| char_len(paragraph) > MIN_PARAGRAPH_SECTION_CHARS)
            .map(|paragraph| {
                let first_sentence = self.sentence_break.split(paragraph).next().unwrap_or_default();
                let mut title = truncate_chars(first_sentence, PARAGRAPH_TITLE_CHARS);
                if char_len(first_sentence) > PARAGRAPH_TITLE_CHARS {
                    title.push_str("...");
                }
                ReportSection::new(format!("**{title}**"), paragraph)
            })
            .collect()
    }

    fn group_sentences(&self, text: &str) -> Vec<ReportSection> {
        let sentences = self
            .sentence_break
            .split(text)
            .map(str::trim)
            .filter(|sentence| char_len(sentence) > MIN_SENTENCE_CHARS)
            .collect::<Vec<&str>>();

        if sentences.len() <= SENTENCES_PER_GROUP {
            return Vec::new();
        }

        sentences
            .chunks(SENTENCES_PER_GROUP)
            .enumerate()
            .filter_map(|(index, group)| {
                let joined = format!("{}.", group.join(". "));
                (char_len(&joined) > MIN_GROUP_CHARS).then(|| {
                    ReportSection::new(format!("**{}**", synthesized_title(index + 1)), joined)
                })
            })
            .collect()
    }
}

fn content_chars(sections: &[ReportSection]) -> usize {
    sections
        .iter()
        .map(|section| char_len(&section.content))
        .sum()
}

pub fn quality_metrics(sections: &[ReportSection]) -> QualityMetrics {
    let total_content_length = content_chars(sections);
    let average_content_length = if sections.is_empty() {
        0
    } else {
        (total_content_length as f64 / sections.len() as f64).round() as usize
    };

    QualityMetrics {
        total_sections: sections.len(),
        total_content_length,
        average_content_length,
    }
}
