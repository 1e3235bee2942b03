use anyhow::Result;
use tracing::info;

use crate::cli::ParseArgs;
use crate::commands::load_payload;
use crate::report::ReportBuilder;
use crate::util::{print_json_pretty, write_json_pretty};

pub fn run(args: ParseArgs) -> Result<()> {
    let payload = load_payload(&args.payload)?;
    let builder = ReportBuilder::new()?;
    let report = builder.build(&payload.value, args.payload.report_type);

    match &args.output {
        Some(path) => {
            write_json_pretty(path, &report)?;
            info!(path = %path.display(), sections = report.sections.len(), "wrote report data");
        }
        None => print_json_pretty(&report)?,
    }

    Ok(())
}
