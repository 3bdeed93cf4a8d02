use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::catalog::record::{CourseId, NormalizedRecord, RawRecord};
use crate::error::{PrereqError, Result};

fn letter_digit_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([A-Za-z])(\d)").expect("valid boundary regex"))
}

/// Normalizes one raw course code into a canonical [`CourseId`] and its
/// not-offered flag. Applied rules: trim, strip a leading `*` marker,
/// dashes become spaces, a missing letter/digit separator is inserted, and
/// the number/suffix tokens are rejoined without internal spaces.
///
/// Codes with no recognizable department/number split are an error, never
/// coerced into a placeholder node.
pub fn normalize_code(raw: &str) -> Result<(CourseId, bool)> {
    let mut code = raw.trim();
    let mut not_offered = false;
    if let Some(rest) = code.strip_prefix('*') {
        not_offered = true;
        code = rest.trim_start();
    }

    let spaced = code.replace('-', " ");
    let spaced = letter_digit_boundary().replace_all(&spaced, "$1 $2");

    let mut tokens = spaced.split_whitespace();
    let department = tokens.next().unwrap_or("");
    let number: String = tokens.collect();

    if department.is_empty()
        || number.is_empty()
        || !department.chars().all(|c| c.is_ascii_alphabetic())
    {
        return Err(PrereqError::MalformedCode {
            code: raw.to_string(),
            record: raw.to_string(),
        });
    }

    Ok((CourseId::new(format!("{} {}", department, number)), not_offered))
}

/// Normalizes a full `(course, prerequisites)` record. Empty prerequisite
/// strings (the CSV absence placeholder) yield an empty set rather than a
/// node named `""`. A not-offered marker on a prerequisite is stripped and
/// dropped; only the course's own record decides its flag.
pub fn normalize_record(raw: &RawRecord) -> Result<NormalizedRecord> {
    let (id, not_offered) =
        normalize_code(&raw.code).map_err(|err| in_record(err, &raw.code))?;

    let mut prerequisites = BTreeSet::new();
    for prereq in &raw.prerequisites {
        if prereq.trim().is_empty() {
            continue;
        }
        let (prereq_id, _) = normalize_code(prereq).map_err(|err| in_record(err, &raw.code))?;
        prerequisites.insert(prereq_id);
    }

    Ok(NormalizedRecord {
        id,
        not_offered,
        prerequisites,
    })
}

pub fn normalize_records(raw: &[RawRecord]) -> Result<Vec<NormalizedRecord>> {
    raw.iter().map(normalize_record).collect()
}

fn in_record(err: PrereqError, record: &str) -> PrereqError {
    match err {
        PrereqError::MalformedCode { code, .. } => PrereqError::MalformedCode {
            code,
            record: record.to_string(),
        },
        other => other,
    }
}
