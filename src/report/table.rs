use crate::report::text::escape_html;

/// Header, separator or data, and at least one more row.
pub const MIN_TABLE_LINES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Lines without `|`, in input order.
    pub surrounding_text: String,
}

impl MarkdownTable {
    /// Collects every `|` line of `content` into one table.
    pub fn extract(content: &str) -> Option<Self> {
        let lines = content.split('\n').collect::<Vec<&str>>();
        let table_lines = lines
            .iter()
            .copied()
            .filter(|line| is_table_line(line))
            .collect::<Vec<&str>>();

        if table_lines.len() < MIN_TABLE_LINES {
            return None;
        }

        let mut header = Vec::new();
        let mut rows = Vec::new();
        for (index, line) in table_lines.iter().enumerate() {
            if index == 0 {
                header = split_cells(line);
                continue;
            }
            if index == 1 && line.contains("---") {
                continue;
            }
            rows.push(split_cells(line));
        }

        let surrounding_text = lines
            .iter()
            .copied()
            .filter(|line| !is_table_line(line))
            .collect::<Vec<&str>>()
            .join("\n");

        Some(Self {
            header,
            rows,
            surrounding_text,
        })
    }

    pub fn to_html(&self) -> String {
        let mut html = String::from("<div class=\"report-table\"><table><thead><tr>");
        for cell in &self.header {
            html.push_str("<th>");
            html.push_str(&escape_html(cell));
            html.push_str("</th>");
        }
        html.push_str("</tr></thead><tbody>");

        for row in &self.rows {
            html.push_str("<tr>");
            for cell in row {
                html.push_str("<td>");
                html.push_str(&escape_html(cell));
                html.push_str("</td>");
            }
            html.push_str("</tr>");
        }

        html.push_str("</tbody></table></div>");
        html
    }
}

/// Replaces the `|` lines of `content` with an HTML table placed after the
/// remaining text. Content without enough table lines is returned as is.
pub fn parse_markdown_table(content: &str) -> String {
    match MarkdownTable::extract(content) {
        Some(table) => format!("{}{}", table.surrounding_text, table.to_html()),
        None => content.to_string(),
    }
}

pub fn is_table_line(line: &str) -> bool {
    line.contains('|') && !line.trim().is_empty()
}

fn split_cells(line: &str) -> Vec<String> {
    line.split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
