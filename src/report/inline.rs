use std::collections::HashSet;

use anyhow::{Context, Result};
use regex::Regex;

use crate::model::ReportType;
use crate::report::table::{is_table_line, parse_markdown_table};
use crate::report::text::{TextCleaner, char_len, escape_html, normalize_newlines};

/// Lines this short carry no content and are dropped.
const MIN_LINE_CHARS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(String),
    UnorderedList(Vec<String>),
    OrderedList(Vec<String>),
    Rule,
}

/// The two report viewers diverge here: the market view strips emoji and
/// `[...]` placeholders and drops repeated lines, the business view keeps
/// the text as generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub strip_decorations: bool,
    pub dedupe_lines: bool,
}

impl RenderOptions {
    pub fn for_report(report_type: ReportType) -> Self {
        match report_type {
            ReportType::MarketAnalysis => Self {
                strip_decorations: true,
                dedupe_lines: true,
            },
            ReportType::BusinessInsights => Self {
                strip_decorations: false,
                dedupe_lines: false,
            },
        }
    }
}

#[derive(Debug)]
enum PendingList {
    Unordered(Vec<String>),
    Ordered(Vec<String>),
}

#[derive(Debug, Default)]
struct BlockBuilder {
    blocks: Vec<Block>,
    pending: Option<PendingList>,
}

impl BlockBuilder {
    fn push_unordered(&mut self, item: String) {
        match self.pending.as_mut() {
            Some(PendingList::Unordered(items)) => items.push(item),
            _ => {
                self.flush();
                self.pending = Some(PendingList::Unordered(vec![item]));
            }
        }
    }

    fn push_ordered(&mut self, item: String) {
        match self.pending.as_mut() {
            Some(PendingList::Ordered(items)) => items.push(item),
            _ => {
                self.flush();
                self.pending = Some(PendingList::Ordered(vec![item]));
            }
        }
    }

    fn push_paragraph(&mut self, text: String) {
        self.flush();
        self.blocks.push(Block::Paragraph(text));
    }

    fn push_rule(&mut self) {
        self.flush();
        self.blocks.push(Block::Rule);
    }

    fn flush(&mut self) {
        match self.pending.take() {
            Some(PendingList::Unordered(items)) => self.blocks.push(Block::UnorderedList(items)),
            Some(PendingList::Ordered(items)) => self.blocks.push(Block::OrderedList(items)),
            None => {}
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush();
        self.blocks
    }
}

#[derive(Debug, Clone)]
pub struct InlineRenderer {
    options: RenderOptions,
    cleaner: TextCleaner,
    rule: Regex,
    bullet: Regex,
    ordered: Regex,
    heading_marker: Regex,
    bold: Regex,
    dedupe_markup: Regex,
    space_run: Regex,
}

impl InlineRenderer {
    pub fn new(options: RenderOptions) -> Result<Self> {
        Ok(Self {
            options,
            cleaner: TextCleaner::new()?,
            rule: Regex::new(r"^-{3,}$").context("failed to compile rule regex")?,
            bullet: Regex::new(r"^[-•*]\s+(.+)$").context("failed to compile bullet regex")?,
            ordered: Regex::new(r"^\d+\.\s*(.+)$")
                .context("failed to compile ordered item regex")?,
            heading_marker: Regex::new(r"^#{1,6}\s*")
                .context("failed to compile heading marker regex")?,
            bold: Regex::new(r"\*\*(.+?)\*\*").context("failed to compile bold regex")?,
            dedupe_markup: Regex::new(r"[#*`]").context("failed to compile markup regex")?,
            space_run: Regex::new(r"[ \t]{2,}").context("failed to compile space run regex")?,
        })
    }

    pub fn blocks(&self, content: &str) -> Vec<Block> {
        let content = normalize_newlines(content);
        let mut builder = BlockBuilder::default();
        let mut seen = HashSet::<String>::new();

        for raw_line in content.split('\n') {
            let line = if self.options.strip_decorations {
                let without_emoji = self.cleaner.strip_emoji(raw_line);
                let stripped = self.cleaner.strip_placeholders(&without_emoji);
                self.space_run.replace_all(&stripped, " ").into_owned()
            } else {
                raw_line.to_string()
            };
            let line = line.trim();

            if self.rule.is_match(line) {
                builder.push_rule();
                continue;
            }

            if char_len(line) < MIN_LINE_CHARS {
                continue;
            }

            if self.options.dedupe_lines {
                let key = self
                    .dedupe_markup
                    .replace_all(line, "")
                    .trim()
                    .to_lowercase();
                if !seen.insert(key) {
                    continue;
                }
            }

            if let Some(item) = self.bullet.captures(line).and_then(|captures| captures.get(1)) {
                builder.push_unordered(self.format_inline(item.as_str()));
                continue;
            }

            if let Some(item) = self.ordered.captures(line).and_then(|captures| captures.get(1)) {
                builder.push_ordered(self.format_inline(item.as_str()));
                continue;
            }

            builder.push_paragraph(self.format_inline(line));
        }

        builder.finish()
    }

    /// Tables take precedence: content with a table is emitted as the
    /// escaped surrounding text followed by the table, without inline
    /// conversion.
    pub fn render_html(&self, content: &str) -> String {
        let content = normalize_newlines(content);
        let escaped_text = content
            .split('\n')
            .map(|line| {
                if is_table_line(line) {
                    line.to_string()
                } else {
                    escape_html(line)
                }
            })
            .collect::<Vec<String>>()
            .join("\n");

        let converted = parse_markdown_table(&escaped_text);
        if converted == escaped_text {
            return blocks_to_html(&self.blocks(&content));
        }

        format!("<div class=\"report-text\">{}</div>", converted.trim())
    }

    fn format_inline(&self, text: &str) -> String {
        let without_heading = self.heading_marker.replace(text.trim(), "");
        let without_code = without_heading.replace('`', "");
        let escaped = escape_html(without_code.trim());
        self.bold
            .replace_all(&escaped, "<strong>$1</strong>")
            .into_owned()
    }
}

pub fn blocks_to_html(blocks: &[Block]) -> String {
    let mut html = String::from("<div class=\"report-content\">");
    for block in blocks {
        match block {
            Block::Paragraph(text) => {
                html.push_str("<p>");
                html.push_str(text);
                html.push_str("</p>");
            }
            Block::UnorderedList(items) => push_list(&mut html, "ul", items),
            Block::OrderedList(items) => push_list(&mut html, "ol", items),
            Block::Rule => html.push_str("<hr>"),
        }
    }
    html.push_str("</div>");
    html
}

fn push_list(html: &mut String, tag: &str, items: &[String]) {
    html.push('<');
    html.push_str(tag);
    html.push('>');
    for item in items {
        html.push_str("<li>");
        html.push_str(item);
        html.push_str("</li>");
    }
    html.push_str("</");
    html.push_str(tag);
    html.push('>');
}
