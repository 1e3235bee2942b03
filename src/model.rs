use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    #[value(name = "market", alias = "market-analysis")]
    MarketAnalysis,
    #[value(name = "business", alias = "business-insights")]
    BusinessInsights,
}

impl ReportType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MarketAnalysis => "market_analysis",
            Self::BusinessInsights => "business_insights",
        }
    }

    pub fn report_name(self) -> &'static str {
        match self {
            Self::MarketAnalysis => "시장 분석 리포트",
            Self::BusinessInsights => "비즈니스 인사이트 리포트",
        }
    }

    pub fn default_summary(self) -> &'static str {
        match self {
            Self::MarketAnalysis => "시장 분석이 완료되었습니다.",
            Self::BusinessInsights => "비즈니스 인사이트 분석이 완료되었습니다.",
        }
    }

    pub fn parse_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "market" | "market_analysis" | "market-analysis" => Some(Self::MarketAnalysis),
            "business" | "business_insight" | "business_insights" | "business-insights" => {
                Some(Self::BusinessInsights)
            }
            _ => None,
        }
    }
}

/// One titled block of a generated report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    pub title: String,
    pub content: String,
}

impl ReportSection {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Heading-only sections are marked by a title wrapped in `***`.
    pub fn is_top_level(&self) -> bool {
        let title = self.title.trim();
        title.len() > 6 && title.starts_with("***") && title.ends_with("***")
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub report_type: ReportType,
    pub report_name: String,
    pub sections: Vec<ReportSection>,
    pub summary: String,
    pub generated_at: String,
    pub source_sha256: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    pub total_sections: usize,
    pub total_content_length: usize,
    pub average_content_length: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisIssue {
    #[serde(rename = "type")]
    pub issue_type: String,
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredAnalysis {
    pub report_name: String,
    pub sections: Vec<ReportSection>,
    pub raw_analysis: String,
    pub quality_metrics: QualityMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<AnalysisIssue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArchivedReportCount {
    pub report_type: String,
    pub count: i64,
    pub latest_created_at: Option<String>,
}
