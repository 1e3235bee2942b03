use anyhow::Result;
use tracing::info;

use crate::cli::RenderArgs;
use crate::commands::load_payload;
use crate::report::{RenderOptions, ReportBuilder, ReportHtmlRenderer};
use crate::util::write_text;

pub fn run(args: RenderArgs) -> Result<()> {
    let payload = load_payload(&args.payload)?;
    let report = ReportBuilder::new()?.build(&payload.value, args.payload.report_type);

    let mut options = RenderOptions::for_report(args.payload.report_type);
    if args.keep_decorations {
        options.strip_decorations = false;
    }
    if args.keep_duplicates {
        options.dedupe_lines = false;
    }

    let renderer = ReportHtmlRenderer::new(options)?;
    let html = renderer.render_document(&report);
    let visible = report
        .sections
        .iter()
        .filter(|section| renderer.is_renderable(section))
        .count();

    match &args.output {
        Some(path) => {
            write_text(path, &html)?;
            info!(
                path = %path.display(),
                sections = report.sections.len(),
                visible_sections = visible,
                "wrote report html"
            );
        }
        None => print!("{html}"),
    }

    Ok(())
}
