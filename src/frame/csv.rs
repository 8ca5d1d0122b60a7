//! CSV ingestion into a [`Frame`].

use std::path::Path;

use crate::error::{ProfileError, ProfileResult};

use super::{ColumnBuffer, ColumnSpec, Frame, FrameBuilder};

/// Read a CSV file into a [`Frame`].
///
/// Rules:
///
/// - CSV must have headers.
/// - Headers must contain every requested column (order can differ, extra columns are ignored).
/// - Numeric columns parse as `f64` (`inf`, `-inf` and `NaN` are accepted); categorical columns
///   keep the trimmed text as the category label.
/// - Empty cells are missing values (NaN in the frame).
pub fn read_csv_frame_from_path(path: impl AsRef<Path>, columns: &[ColumnSpec]) -> ProfileResult<Frame> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    read_csv_frame(&mut rdr, columns)
}

/// Read CSV data from an existing reader into a [`Frame`].
pub fn read_csv_frame<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    columns: &[ColumnSpec],
) -> ProfileResult<Frame> {
    let headers = rdr.headers()?.clone();

    let mut csv_idxs = Vec::with_capacity(columns.len());
    for spec in columns {
        let Some(idx) = headers.iter().position(|h| h == spec.name) else {
            return Err(ProfileError::SchemaMismatch {
                message: format!(
                    "missing required column '{}'. headers={:?}",
                    spec.name,
                    headers.iter().collect::<Vec<_>>()
                ),
            });
        };
        csv_idxs.push(idx);
    }

    let mut buffers: Vec<ColumnBuffer> = columns
        .iter()
        .map(|spec| ColumnBuffer::for_kind(spec.kind()))
        .collect();

    for (row_idx0, result) in rdr.records().enumerate() {
        // 1-based, plus the header line.
        let user_row = row_idx0 + 2;
        let record = result?;

        for ((spec, &csv_idx), buffer) in columns.iter().zip(&csv_idxs).zip(buffers.iter_mut()) {
            let raw = record.get(csv_idx).unwrap_or("");
            push_cell(buffer, user_row, spec, raw)?;
        }
    }

    columns
        .iter()
        .zip(buffers)
        .fold(FrameBuilder::new(), |builder, (spec, buffer)| builder.push(spec.name.clone(), buffer))
        .build()
}

fn push_cell(buffer: &mut ColumnBuffer, row: usize, spec: &ColumnSpec, raw: &str) -> ProfileResult<()> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        buffer.push_missing();
        return Ok(());
    }

    match buffer {
        ColumnBuffer::Numeric(values) => {
            let value = trimmed.parse::<f64>().map_err(|e| ProfileError::ParseError {
                row,
                column: spec.name.clone(),
                raw: raw.to_owned(),
                message: e.to_string(),
            })?;
            values.push(value);
        }
        ColumnBuffer::Categorical { codes, dictionary } => {
            codes.push(dictionary.encode(trimmed));
        }
    }
    Ok(())
}
