use anyhow::Result;
use tracing::info;

use crate::archive::ReportArchive;
use crate::cli::{ArchiveArgs, resolve_db_path};
use crate::commands::load_payload;
use crate::model::ReportSection;
use crate::report::ReportBuilder;
use crate::util::ensure_directory;

pub fn run(args: ArchiveArgs) -> Result<()> {
    let payload = load_payload(&args.payload)?;
    let report = ReportBuilder::new()?.build(&payload.value, args.payload.report_type);

    let db_path = resolve_db_path(&args.cache_root, args.db_path.as_ref());
    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_directory(parent)?;
    }

    let archive = ReportArchive::open(&db_path)?;
    let inserted = archive.insert(&report, &payload.raw, args.application_number.as_deref())?;

    if inserted {
        info!(
            path = %db_path.display(),
            sha256 = %report.source_sha256,
            sections = report.sections.len(),
            "archived report"
        );
    } else {
        let stored_sections = archive
            .find_sections_json(&report.source_sha256)?
            .and_then(|json| serde_json::from_str::<Vec<ReportSection>>(&json).ok())
            .map(|sections| sections.len())
            .unwrap_or_default();
        info!(
            sha256 = %report.source_sha256,
            stored_sections,
            "report already archived"
        );
    }

    Ok(())
}
