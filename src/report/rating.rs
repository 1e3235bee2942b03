use anyhow::{Context, Result};
use regex::Regex;

/// Keyword families checked in order; the first family that matches sets
/// the star count.
const RATING_FAMILIES: [(u8, &str); 3] = [
    (
        5,
        r"(?i)매우\s*높|높음|강함|우수|확실|\b(?:very high|high|strong|excellent|certain)\b",
    ),
    (3, r"(?i)보통|중간|평균|\b(?:medium|average|moderate)\b"),
    (
        1,
        r"(?i)낮음|약함|부족|부정적|\b(?:low|weak|insufficient|negative|poor)\b",
    ),
];

#[derive(Debug, Clone)]
pub struct RatingExtractor {
    families: Vec<(u8, Regex)>,
}

impl RatingExtractor {
    pub fn new() -> Result<Self> {
        let families = RATING_FAMILIES
            .iter()
            .map(|(stars, pattern)| {
                Regex::new(pattern)
                    .map(|regex| (*stars, regex))
                    .with_context(|| format!("failed to compile {stars}-star rating regex"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { families })
    }

    pub fn extract(&self, content: &str) -> Option<u8> {
        self.families
            .iter()
            .find(|(_, regex)| regex.is_match(content))
            .map(|(stars, _)| *stars)
    }
}

pub fn render_stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{} {rating}/5", "★".repeat(filled), "☆".repeat(5 - filled))
}
