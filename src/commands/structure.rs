use anyhow::Result;
use tracing::info;

use crate::cli::StructureArgs;
use crate::report::AnalysisStructurer;
use crate::util::{print_json_pretty, read_text, write_json_pretty};

pub fn run(args: StructureArgs) -> Result<()> {
    let text = read_text(&args.input)?;
    let structurer = AnalysisStructurer::new()?;
    let analysis = structurer.structure(&text, args.report_type);

    match &args.output {
        Some(path) => {
            write_json_pretty(path, &analysis)?;
            info!(
                path = %path.display(),
                sections = analysis.quality_metrics.total_sections,
                "wrote structured analysis"
            );
        }
        None => print_json_pretty(&analysis)?,
    }

    Ok(())
}
