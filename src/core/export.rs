// repairlog - core/export.rs
//
// JSON and CSV serialisation of repair instructions.
// Core layer: writes to any Write trait object.

use crate::core::model::{ExportFormat, RepairInstruction};
use crate::util::constants;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

/// Export instructions in the requested format. Returns the entry count.
pub fn export<W: Write>(
    instructions: &[RepairInstruction],
    format: ExportFormat,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    match format {
        ExportFormat::Json => export_json(instructions, writer, export_path),
        ExportFormat::Csv => export_csv(instructions, writer, export_path),
    }
}

/// Export instructions as a pretty-printed JSON array.
///
/// Non-ASCII text is written as UTF-8, not as `\u` escapes.
pub fn export_json<W: Write>(
    instructions: &[RepairInstruction],
    mut writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(&mut writer, instructions).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(instructions.len())
}

/// Export instructions as CSV.
///
/// Writes: area, equipment_group, component, problem, solution
pub fn export_csv<W: Write>(
    instructions: &[RepairInstruction],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let csv_err = |e: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    csv_writer
        .write_record(constants::EXPORT_CSV_HEADER)
        .map_err(csv_err)?;

    for inst in instructions {
        csv_writer
            .write_record([
                &inst.area,
                &inst.equipment_group,
                &inst.component,
                &inst.problem,
                &inst.solution,
            ])
            .map_err(csv_err)?;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(instructions.len())
}
