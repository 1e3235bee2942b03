use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cli::PayloadArgs;
use crate::report::{ReportFailure, decode_envelope};
use crate::util::read_text;

pub mod archive;
pub mod classify_error;
pub mod parse;
pub mod render;
pub mod status;
pub mod structure;

pub(crate) struct LoadedPayload {
    pub value: Value,
    pub raw: String,
}

/// Reads the payload file; text that is not JSON is taken as a bare string.
pub(crate) fn load_payload(args: &PayloadArgs) -> Result<LoadedPayload> {
    let raw = read_text(&args.input)?;
    let value = match serde_json::from_str::<Value>(&raw) {
        Ok(value) => value,
        Err(err) => {
            debug!(path = %args.input.display(), error = %err, "input is not json, using plain text");
            Value::String(raw.clone())
        }
    };

    if !args.envelope {
        return Ok(LoadedPayload { value, raw });
    }

    match decode_envelope(&value, args.status_code) {
        Ok(payload) => Ok(LoadedPayload {
            raw: payload.to_string(),
            value: payload,
        }),
        Err(failure) => {
            log_failure(&failure);
            Err(failure).with_context(|| {
                format!("generation response reported failure: {}", args.input.display())
            })
        }
    }
}

pub(crate) fn log_failure(failure: &ReportFailure) {
    warn!(
        kind = failure.kind.as_str(),
        status = failure.status.unwrap_or_default(),
        title = failure.kind.title(),
        message = %failure.message,
        "report generation failed"
    );
    for tip in failure.kind.tips() {
        warn!(tip = *tip, "remediation");
    }
}
