use anyhow::{Result, bail};
use serde::Serialize;
use tracing::info;

use crate::cli::ClassifyErrorArgs;
use crate::report::{FailureKind, ReportFailure};
use crate::util::print_json_pretty;

#[derive(Debug, Serialize)]
struct FailureExplanation<'a> {
    kind: FailureKind,
    status: Option<u16>,
    title: &'a str,
    description: &'a str,
    message: &'a str,
    tips: &'a [&'a str],
}

pub fn run(args: ClassifyErrorArgs) -> Result<()> {
    if args.status.is_none() && args.code.is_none() && args.message.is_none() {
        bail!("at least one of --status, --code or --message is required");
    }

    let failure = ReportFailure::classify(args.status, args.code.as_deref(), args.message.as_deref());

    if args.json {
        return print_json_pretty(&FailureExplanation {
            kind: failure.kind,
            status: failure.status,
            title: failure.kind.title(),
            description: failure.kind.description(),
            message: &failure.message,
            tips: failure.kind.tips(),
        });
    }

    info!(
        kind = failure.kind.as_str(),
        title = failure.kind.title(),
        description = failure.kind.description(),
        message = %failure.message,
        "classified report failure"
    );
    for tip in failure.kind.tips() {
        info!(tip = *tip, "remediation");
    }

    Ok(())
}
