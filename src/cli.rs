use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::model::ReportType;

#[derive(Parser, Debug)]
#[command(
    name = "patent-report",
    version,
    about = "Parse, render and archive AI-generated patent analysis reports"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Parse(ParseArgs),
    Render(RenderArgs),
    Structure(StructureArgs),
    ClassifyError(ClassifyErrorArgs),
    Archive(ArchiveArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PayloadArgs {
    /// JSON payload file; files that are not valid JSON are read as plain text.
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long, value_enum, default_value_t = ReportType::MarketAnalysis)]
    pub report_type: ReportType,

    /// Treat the input as a full generation response (`{ success, data }`).
    #[arg(long, default_value_t = false)]
    pub envelope: bool,

    /// HTTP status the generation response was returned with.
    #[arg(long)]
    pub status_code: Option<u16>,
}

#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    #[command(flatten)]
    pub payload: PayloadArgs,

    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub payload: PayloadArgs,

    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Override the report profile: keep emoji and `[...]` placeholders.
    #[arg(long, default_value_t = false)]
    pub keep_decorations: bool,

    /// Override the report profile: keep repeated lines.
    #[arg(long, default_value_t = false)]
    pub keep_duplicates: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StructureArgs {
    /// Raw AI analysis text.
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long, value_enum, default_value_t = ReportType::MarketAnalysis)]
    pub report_type: ReportType,

    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ClassifyErrorArgs {
    #[arg(long)]
    pub status: Option<u16>,

    #[arg(long)]
    pub code: Option<String>,

    #[arg(long)]
    pub message: Option<String>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ArchiveArgs {
    #[command(flatten)]
    pub payload: PayloadArgs,

    #[arg(long, default_value = ".cache/patent-report")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[arg(long)]
    pub application_number: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = ".cache/patent-report")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,
}

pub fn resolve_db_path(cache_root: &std::path::Path, db_path: Option<&PathBuf>) -> PathBuf {
    db_path
        .cloned()
        .unwrap_or_else(|| cache_root.join("reports.sqlite"))
}
