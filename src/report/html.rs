use anyhow::Result;

use crate::model::{ReportData, ReportSection};
use crate::report::inline::{InlineRenderer, RenderOptions};
use crate::report::rating::{RatingExtractor, render_stars};
use crate::report::text::{TextCleaner, char_len, escape_html};
use crate::report::theme::classify_theme;

const MIN_TITLE_CHARS: usize = 2;
const MIN_CONTENT_CHARS: usize = 10;

#[derive(Debug, Clone)]
pub struct ReportHtmlRenderer {
    inline: InlineRenderer,
    ratings: RatingExtractor,
    cleaner: TextCleaner,
}

impl ReportHtmlRenderer {
    pub fn new(options: RenderOptions) -> Result<Self> {
        Ok(Self {
            inline: InlineRenderer::new(options)?,
            ratings: RatingExtractor::new()?,
            cleaner: TextCleaner::new()?,
        })
    }

    /// Sections with a meaningless title or next to no content are hidden.
    /// `***` heading sections need no content.
    pub fn is_renderable(&self, section: &ReportSection) -> bool {
        let title = self.cleaner.display_title(&section.title);
        let lowered = title.to_lowercase();

        char_len(&title) >= MIN_TITLE_CHARS
            && !title
                .chars()
                .all(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '-') || ch.is_whitespace())
            && !lowered.contains("undefined")
            && !lowered.contains("null")
            && (section.is_top_level()
                || char_len(section.content.trim()) >= MIN_CONTENT_CHARS)
    }

    pub fn render_section(&self, section: &ReportSection, index: usize) -> String {
        let title = self.cleaner.display_title(&section.title);
        let theme = classify_theme(&title, index);

        if section.is_top_level() && section.content.trim().is_empty() {
            return format!(
                "<section class=\"report-heading\" data-theme=\"{}\"><h2>{}</h2></section>",
                theme.as_str(),
                escape_html(&title)
            );
        }

        let mut html = format!(
            "<section class=\"report-section\" data-theme=\"{}\"><h2><span class=\"ordinal\">{}</span> {}</h2>",
            theme.as_str(),
            index + 1,
            escape_html(&title)
        );

        if let Some(rating) = self.ratings.extract(&section.content) {
            html.push_str(&format!(
                "<div class=\"rating\" data-rating=\"{rating}\">{}</div>",
                render_stars(rating)
            ));
        }

        html.push_str(&self.inline.render_html(&section.content));
        html.push_str("</section>");
        html
    }

    pub fn render_document(&self, report: &ReportData) -> String {
        let mut body = String::new();
        let visible = report
            .sections
            .iter()
            .filter(|section| self.is_renderable(section));
        for (index, section) in visible.enumerate() {
            body.push_str(&self.render_section(section, index));
            body.push('\n');
        }

        format!(
            "<!DOCTYPE html>\n<html lang=\"ko\">\n<head>\n<meta charset=\"utf-8\">\n<title>{name}</title>\n</head>\n<body data-report-type=\"{report_type}\">\n<header><h1>{name}</h1><p class=\"summary\">{summary}</p></header>\n<main>\n{body}</main>\n<footer>AI 생성 리포트 · 생성일시: {generated_at}</footer>\n</body>\n</html>\n",
            name = escape_html(&report.report_name),
            report_type = report.report_type.as_str(),
            summary = escape_html(&report.summary),
            generated_at = escape_html(&report.generated_at),
        )
    }
}
