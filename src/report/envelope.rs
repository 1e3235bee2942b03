use serde_json::Value;

use crate::report::failure::{FailureKind, ReportFailure};

const MISSING_DATA_MESSAGE: &str = "리포트 데이터를 받지 못했습니다.";

/// Unwraps a report-generation response body into the analysis payload.
///
/// Accepts `{ success, data: { content | analysis | rawAnalysis } }` and the
/// flatter `{ success, content }`. A non-2xx `status` or `success: false`
/// becomes a [`ReportFailure`] built from the body's `error`/`message`.
pub fn decode_envelope(body: &Value, status: Option<u16>) -> Result<Value, ReportFailure> {
    let code = body.get("error").and_then(Value::as_str);
    let message = body.get("message").and_then(Value::as_str);

    if let Some(status) = status
        && !(200..300).contains(&status)
    {
        return Err(ReportFailure::classify(Some(status), code, message));
    }

    if body.get("success").and_then(Value::as_bool) != Some(true) {
        return Err(ReportFailure::classify(status, code, message));
    }

    let data = body.get("data").filter(|value| !value.is_null());
    let payload = data
        .and_then(|data| {
            ["content", "analysis"]
                .iter()
                .filter_map(|key| data.get(*key))
                .find(|value| !value.is_null())
                .or_else(|| {
                    data.get("rawAnalysis")
                        .filter(|value| value.is_string())
                        .map(|_| data)
                })
        })
        .or_else(|| body.get("content").filter(|value| !value.is_null()));

    payload.cloned().ok_or_else(|| ReportFailure {
        kind: FailureKind::General,
        status,
        message: message.unwrap_or(MISSING_DATA_MESSAGE).to_string(),
    })
}
