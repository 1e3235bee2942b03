#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SectionTheme {
    Market,
    Competition,
    Customer,
    Global,
    Opportunity,
    Value,
    Industry,
    Technology,
    Risk,
    Analysis,
    Forecast,
    Trend,
    Target,
    Award,
}

const THEME_KEYWORDS: [(SectionTheme, &[&str]); 11] = [
    (SectionTheme::Market, &["시장", "market", "규모"]),
    (
        SectionTheme::Competition,
        &["경쟁", "competitive", "competitor"],
    ),
    (
        SectionTheme::Customer,
        &["고객", "사용자", "user", "customer"],
    ),
    (SectionTheme::Global, &["글로벌", "global", "지역", "region"]),
    (SectionTheme::Opportunity, &["기회", "opportunity", "잠재"]),
    (SectionTheme::Value, &["가치", "value", "수익", "revenue"]),
    (SectionTheme::Industry, &["산업", "industry", "분야"]),
    (SectionTheme::Technology, &["기술", "technology", "tech"]),
    (SectionTheme::Risk, &["위험", "risk", "리스크"]),
    (SectionTheme::Analysis, &["분석", "analysis", "데이터"]),
    (
        SectionTheme::Forecast,
        &["전망", "예측", "forecast", "trend"],
    ),
];

const DEFAULT_THEMES: [SectionTheme; 4] = [
    SectionTheme::Trend,
    SectionTheme::Market,
    SectionTheme::Target,
    SectionTheme::Award,
];

impl SectionTheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Market => "market",
            Self::Competition => "competition",
            Self::Customer => "customer",
            Self::Global => "global",
            Self::Opportunity => "opportunity",
            Self::Value => "value",
            Self::Industry => "industry",
            Self::Technology => "technology",
            Self::Risk => "risk",
            Self::Analysis => "analysis",
            Self::Forecast => "forecast",
            Self::Trend => "trend",
            Self::Target => "target",
            Self::Award => "award",
        }
    }
}

/// First matching keyword family wins; untagged titles cycle through the
/// defaults by position.
pub fn classify_theme(title: &str, index: usize) -> SectionTheme {
    let lowered = title.to_lowercase();
    THEME_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map(|(theme, _)| *theme)
        .unwrap_or(DEFAULT_THEMES[index % DEFAULT_THEMES.len()])
}
