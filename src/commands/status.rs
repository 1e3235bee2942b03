use anyhow::Result;
use tracing::{info, warn};

use crate::archive::ReportArchive;
use crate::cli::{StatusArgs, resolve_db_path};
use crate::model::ReportType;

pub fn run(args: StatusArgs) -> Result<()> {
    let db_path = resolve_db_path(&args.cache_root, args.db_path.as_ref());

    info!(cache_root = %args.cache_root.display(), "status requested");

    if !db_path.exists() {
        warn!(path = %db_path.display(), "report archive missing");
        return Ok(());
    }

    let archive = ReportArchive::open(&db_path)?;
    info!(path = %db_path.display(), reports = archive.total()?, "report archive status");

    for entry in archive.counts_by_type()? {
        let report_name = ReportType::parse_label(&entry.report_type)
            .map(ReportType::report_name)
            .unwrap_or("unknown");
        info!(
            report_type = %entry.report_type,
            report_name,
            count = entry.count,
            latest_created_at = entry.latest_created_at.as_deref().unwrap_or("-"),
            "archived reports"
        );
    }

    Ok(())
}
