use std::path::Path;

use crate::catalog::normalize::normalize_record;
use crate::catalog::record::RawRecord;
use crate::error::Result;

pub const HEADER: [&str; 2] = ["Course Code", "Prerequisites"];

/// Loads the persisted `Course Code,Prerequisites` schema. The second field
/// holds a comma-separated prerequisite list; a blank field means no
/// prerequisites.
pub fn load_records(path: &Path) -> Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let code = row.get(0).unwrap_or("").to_string();
        let prerequisites = split_prerequisites(row.get(1).unwrap_or(""));
        records.push(RawRecord {
            code,
            prerequisites,
        });
    }
    Ok(records)
}

pub fn save_records(path: &Path, records: &[RawRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADER)?;
    for record in records {
        let prerequisites = record.prerequisites.join(", ");
        writer.write_record([record.code.as_str(), prerequisites.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Rewrites a raw catalog CSV with every code in canonical form. Malformed
/// rows abort the rewrite; a partially formatted file is never left as the
/// apparent output.
pub fn format_csv(input: &Path, output: &Path) -> Result<usize> {
    let raw = load_records(input)?;

    let mut formatted = Vec::with_capacity(raw.len());
    for record in &raw {
        let normalized = normalize_record(record)?;
        let code = if normalized.not_offered {
            format!("*{}", normalized.id)
        } else {
            normalized.id.to_string()
        };
        let prerequisites: Vec<String> = normalized
            .prerequisites
            .iter()
            .map(|id| id.to_string())
            .collect();
        formatted.push(RawRecord {
            code,
            prerequisites,
        });
    }

    save_records(output, &formatted)?;
    Ok(formatted.len())
}

fn split_prerequisites(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}
