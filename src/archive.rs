use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use crate::model::{ArchivedReportCount, ReportData};

pub struct ReportArchive {
    connection: Connection,
}

impl ReportArchive {
    pub fn open(db_path: &Path) -> Result<Self> {
        let connection = Connection::open(db_path)
            .with_context(|| format!("failed to open {}", db_path.display()))?;
        connection
            .pragma_update(None, "journal_mode", "WAL")
            .context("failed to set journal_mode=WAL")?;
        Self::from_connection(connection)
    }

    pub fn from_connection(connection: Connection) -> Result<Self> {
        ensure_schema(&connection)?;
        Ok(Self { connection })
    }

    /// Returns `false` when a report with the same payload fingerprint is
    /// already archived.
    pub fn insert(
        &self,
        report: &ReportData,
        raw_payload: &str,
        application_number: Option<&str>,
    ) -> Result<bool> {
        let sections_json =
            serde_json::to_string(&report.sections).context("failed to serialize sections")?;

        let inserted = self
            .connection
            .execute(
                "
                INSERT OR IGNORE INTO analysis_reports (
                  application_number, report_type, report_name, source_sha256,
                  summary, sections_json, raw_payload, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ",
                params![
                    application_number,
                    report.report_type.as_str(),
                    report.report_name,
                    report.source_sha256,
                    report.summary,
                    sections_json,
                    raw_payload,
                    report.generated_at,
                ],
            )
            .context("failed to insert analysis report")?;

        Ok(inserted > 0)
    }

    pub fn find_sections_json(&self, source_sha256: &str) -> Result<Option<String>> {
        self.connection
            .query_row(
                "SELECT sections_json FROM analysis_reports WHERE source_sha256 = ?1",
                params![source_sha256],
                |row| row.get(0),
            )
            .optional()
            .context("failed to look up analysis report")
    }

    pub fn total(&self) -> Result<i64> {
        let count = self
            .connection
            .query_row("SELECT COUNT(*) FROM analysis_reports", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn counts_by_type(&self) -> Result<Vec<ArchivedReportCount>> {
        let mut statement = self.connection.prepare(
            "
            SELECT report_type, COUNT(*), MAX(created_at)
            FROM analysis_reports
            GROUP BY report_type
            ORDER BY report_type
            ",
        )?;

        let rows = statement.query_map([], |row| {
            Ok(ArchivedReportCount {
                report_type: row.get(0)?,
                count: row.get(1)?,
                latest_created_at: row.get(2)?,
            })
        })?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .context("failed to read archived report counts")
    }
}

fn ensure_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(
            "
            CREATE TABLE IF NOT EXISTS analysis_reports (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              application_number TEXT,
              report_type TEXT NOT NULL,
              report_name TEXT NOT NULL,
              source_sha256 TEXT NOT NULL UNIQUE,
              summary TEXT,
              sections_json TEXT NOT NULL,
              raw_payload TEXT NOT NULL,
              created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_analysis_reports_type
              ON analysis_reports(report_type);
            ",
        )
        .context("failed to create analysis report schema")
}
