// repairlog - app/analyze.rs
//
// Orchestrates the analysis pipeline:
// missing-file check -> read rows -> group/deduplicate -> export.

use crate::core::export;
use crate::core::group::{build_instructions, GroupingResult};
use crate::core::ingest::read_records;
use crate::core::model::ExportFormat;
use crate::platform::fs;
use crate::util::error::{ExportError, IngestError, Result};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Everything needed for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Exported maintenance log (CSV).
    pub input: PathBuf,
    /// Destination document; `-` for stdout.
    pub output: PathBuf,
    pub format: ExportFormat,
    pub solution_separator: String,
}

/// Summary of a completed analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub format: ExportFormat,
    pub rows_total: usize,
    pub rows_extracted: usize,
    pub rows_skipped: usize,
    pub instructions_written: usize,
}

/// Read and group a maintenance log without writing anything.
pub fn analyze_file(input: &Path, separator: &str) -> Result<GroupingResult> {
    if !input.exists() {
        return Err(IngestError::FileNotFound {
            path: input.to_path_buf(),
        }
        .into());
    }
    if !input.is_file() {
        return Err(IngestError::NotAFile {
            path: input.to_path_buf(),
        }
        .into());
    }

    let reader = fs::open_buffered(input).map_err(|e| IngestError::Io {
        path: input.to_path_buf(),
        source: e,
    })?;
    let records = read_records(reader, input)?;

    Ok(build_instructions(&records, separator))
}

/// Run the full pipeline and write the instruction document.
pub fn run_analysis(request: &AnalysisRequest) -> Result<AnalysisReport> {
    let started = Instant::now();
    tracing::info!(
        input = %request.input.display(),
        output = %request.output.display(),
        format = %request.format,
        "Analysis started"
    );

    let grouped = analyze_file(&request.input, &request.solution_separator)?;

    let writer = fs::create_output(&request.output).map_err(|e| ExportError::Io {
        path: request.output.clone(),
        source: e,
    })?;
    let written = export::export(&grouped.instructions, request.format, writer, &request.output)?;

    tracing::info!(
        rows = grouped.rows_total,
        extracted = grouped.rows_extracted,
        skipped = grouped.rows_skipped,
        instructions = written,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Analysis complete"
    );

    Ok(AnalysisReport {
        input: request.input.clone(),
        output: request.output.clone(),
        format: request.format,
        rows_total: grouped.rows_total,
        rows_extracted: grouped.rows_extracted,
        rows_skipped: grouped.rows_skipped,
        instructions_written: written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::error::RepairLogError;

    #[test]
    fn test_missing_input_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = analyze_file(&dir.path().join("absent.csv"), "; ");
        assert!(
            matches!(
                result,
                Err(RepairLogError::Ingest(IngestError::FileNotFound { .. }))
            ),
            "{result:?}"
        );
    }

    #[test]
    fn test_directory_input_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = analyze_file(dir.path(), "; ");
        assert!(matches!(
            result,
            Err(RepairLogError::Ingest(IngestError::NotAFile { .. }))
        ));
    }

    #[test]
    fn test_run_analysis_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("log.csv");
        std::fs::write(
            &input,
            "area,machine_name,mechanism_node,comments\n\
             A,M,N,\"Что Произошло: Шум; Что ты сделал: Смазал\"\n",
        )
        .unwrap();

        let request = AnalysisRequest {
            input,
            output: dir.path().join("out").join("instructions.json"),
            format: ExportFormat::Json,
            solution_separator: "; ".to_string(),
        };
        let report = run_analysis(&request).unwrap();
        assert_eq!(report.instructions_written, 1);
        assert_eq!(report.rows_total, 1);

        let written = std::fs::read_to_string(&request.output).unwrap();
        assert!(written.contains("\"solution\": \"Смазал\""));
    }
}
