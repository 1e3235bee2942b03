use anyhow::{Context, Result};
use regex::Regex;

/// Emoji blocks the report viewers strip before display.
const EMOJI_PATTERN: &str = r"[\x{1F600}-\x{1F64F}\x{1F300}-\x{1F5FF}\x{1F680}-\x{1F6FF}\x{1F900}-\x{1F9FF}\x{1F1E0}-\x{1F1FF}\x{2600}-\x{26FF}\x{2700}-\x{27BF}\x{FE0F}]";

#[derive(Debug, Clone)]
pub struct TextCleaner {
    emoji: Regex,
    placeholder: Regex,
}

impl TextCleaner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            emoji: Regex::new(EMOJI_PATTERN).context("failed to compile emoji regex")?,
            placeholder: Regex::new(r"\[[^\]\n]*\]")
                .context("failed to compile placeholder regex")?,
        })
    }

    pub fn strip_emoji(&self, text: &str) -> String {
        self.emoji.replace_all(text, "").into_owned()
    }

    pub fn strip_placeholders(&self, text: &str) -> String {
        self.placeholder.replace_all(text, "").into_owned()
    }

    /// Title as shown to the reader: no emoji, no `*` wrapping.
    pub fn display_title(&self, title: &str) -> String {
        let without_emoji = self.strip_emoji(title);
        without_emoji
            .trim()
            .trim_matches('*')
            .trim()
            .to_string()
    }
}

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub fn char_len(input: &str) -> usize {
    input.chars().count()
}

pub fn truncate_chars(input: &str, max_chars: usize) -> String {
    input.chars().take(max_chars).collect()
}

pub fn normalize_newlines(input: &str) -> String {
    input.replace("\r\n", "\n")
}
