use serde::Serialize;
use thiserror::Error;

/// Why a report generation request failed, as shown to the reader.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Network,
    Timeout,
    Authentication,
    Quota,
    Validation,
    AiService,
    Database,
    General,
}

impl FailureKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::Validation,
            401 | 403 => Self::Authentication,
            408 | 504 => Self::Timeout,
            429 => Self::Quota,
            503 => Self::Network,
            _ => Self::General,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let kind = match code.trim().to_ascii_uppercase().as_str() {
            "TIMEOUT_ERROR" | "TIMEOUT" => Self::Timeout,
            "AUTH_ERROR" | "AUTHENTICATION" | "API" => Self::Authentication,
            "QUOTA_ERROR" | "QUOTA" | "RATE_LIMIT_EXCEEDED" => Self::Quota,
            "NETWORK_ERROR" | "NETWORK" => Self::Network,
            "VALIDATION_ERROR" | "VALIDATION" | "INVALID_INPUT" => Self::Validation,
            "PARSE_ERROR" | "MODEL_ERROR" | "EMPTY_RESPONSE" | "AI_ERROR" => Self::AiService,
            "DATABASE_ERROR" | "DB_ERROR" => Self::Database,
            "GENERAL_ERROR" | "UNKNOWN_ERROR" | "GENERAL" => Self::General,
            _ => return None,
        };
        Some(kind)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Authentication => "authentication",
            Self::Quota => "quota",
            Self::Validation => "validation",
            Self::AiService => "ai_service",
            Self::Database => "database",
            Self::General => "general",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Network => "네트워크 연결 오류",
            Self::Timeout => "AI 분석 시간 초과",
            Self::Authentication => "AI 서비스 인증 오류",
            Self::Quota => "AI 서비스 사용량 한도 초과",
            Self::Validation => "데이터 검증 오류",
            Self::AiService => "AI 응답 처리 오류",
            Self::Database => "데이터 저장 오류",
            Self::General => "리포트 생성 오류",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Network => "인터넷 연결에 문제가 있습니다.",
            Self::Timeout => "분석 시간이 예상보다 오래 걸리고 있습니다.",
            Self::Authentication => "AI 서비스 접근에 문제가 발생했습니다.",
            Self::Quota => "AI 서비스 사용량 한도에 도달했습니다.",
            Self::Validation => "입력된 특허 데이터에 문제가 있습니다.",
            Self::AiService => "AI 응답을 처리하는 중 문제가 발생했습니다.",
            Self::Database => "리포트를 저장하는 중 문제가 발생했습니다.",
            Self::General => "알 수 없는 오류가 발생했습니다.",
        }
    }

    pub fn tips(self) -> &'static [&'static str] {
        match self {
            Self::Network => &[
                "Wi-Fi 또는 이더넷 연결 상태 확인",
                "VPN 연결 해제 후 재시도",
                "방화벽 또는 보안 소프트웨어 설정 확인",
                "다른 네트워크에서 시도",
            ],
            Self::Timeout => &[
                "잠시 후 다시 시도해주세요",
                "복잡한 특허 데이터는 분석 시간이 오래 걸릴 수 있습니다",
                "네트워크 연결 상태를 확인해주세요",
                "브라우저를 새로고침 후 재시도",
            ],
            Self::Authentication => &[
                "잠시 후 다시 시도해주세요",
                "문제가 지속되면 관리자에게 문의하세요",
                "브라우저 쿠키 및 캐시를 삭제해보세요",
            ],
            Self::Quota => &[
                "잠시 후 다시 시도해주세요",
                "사용량이 초기화될 때까지 기다려주세요",
                "관리자에게 사용량 증설을 요청하세요",
            ],
            Self::Validation => &[
                "특허 데이터를 다시 확인해주세요",
                "필수 정보가 누락되었는지 확인하세요",
                "다른 특허로 시도해보세요",
                "페이지를 새로고침 후 재시도",
            ],
            Self::AiService => &[
                "잠시 후 다시 시도해주세요",
                "문제가 지속되면 관리자에게 문의하세요",
            ],
            Self::Database => &[
                "잠시 후 다시 시도해주세요",
                "생성된 리포트는 다시 생성해야 할 수 있습니다",
                "문제가 지속되면 관리자에게 문의하세요",
            ],
            Self::General => &[
                "페이지를 새로고침 후 재시도",
                "브라우저 캐시를 삭제해보세요",
                "다른 브라우저에서 시도해보세요",
                "문제가 지속되면 관리자에게 문의하세요",
            ],
        }
    }
}

#[derive(Debug, Clone, Error, Serialize)]
#[error("{message}")]
pub struct ReportFailure {
    pub kind: FailureKind,
    pub status: Option<u16>,
    pub message: String,
}

impl ReportFailure {
    /// Error codes take precedence over the HTTP status; an empty message
    /// falls back to the kind's description.
    pub fn classify(status: Option<u16>, code: Option<&str>, message: Option<&str>) -> Self {
        let kind = code
            .and_then(FailureKind::from_code)
            .or_else(|| status.map(FailureKind::from_status))
            .unwrap_or(FailureKind::General);

        let message = message
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| kind.description().to_string());

        Self {
            kind,
            status,
            message,
        }
    }
}
