use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::aggregate::Report;
use super::filter::FilterState;

/// The JSON document written by File → Export summary…
#[derive(Debug, Serialize)]
struct ExportDocument<'a> {
    filter: &'a FilterState,
    #[serde(flatten)]
    report: &'a Report,
}

/// Serialize the current selection and its report as pretty JSON.
pub fn write_report<W: Write>(writer: W, filter: &FilterState, report: &Report) -> Result<()> {
    serde_json::to_writer_pretty(writer, &ExportDocument { filter, report })
        .context("serializing report")
}

pub fn export_report(path: &Path, filter: &FilterState, report: &Report) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = std::io::BufWriter::new(file);
    write_report(&mut writer, filter, report)?;
    writer.flush().context("flushing report")
}
