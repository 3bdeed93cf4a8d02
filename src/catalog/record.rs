use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical course key, `"<DEPT> <NUMBER><SUFFIX>"` (e.g. `"COMP 251"`).
/// The not-offered marker is carried out-of-band so lookups stay consistent
/// regardless of offering status.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(String);

impl CourseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Department prefix: the token before the first space.
    pub fn department(&self) -> &str {
        self.0.split(' ').next().unwrap_or(&self.0)
    }

    pub fn number_token(&self) -> Option<&str> {
        self.0.split_once(' ').map(|(_, number)| number)
    }

    /// Leading digit of the number token, 0 when not numeric-leading.
    pub fn level(&self) -> u8 {
        self.number_token()
            .and_then(|number| number.chars().next())
            .and_then(|c| c.to_digit(10))
            .map(|d| d as u8)
            .unwrap_or(0)
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A row as delivered by the scraper or the CSV loader, untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub code: String,
    pub prerequisites: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub id: CourseId,
    pub not_offered: bool,
    pub prerequisites: BTreeSet<CourseId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseNode {
    pub id: CourseId,
    pub label: String,
    pub level: u8,
    pub department: String,
    pub not_offered: bool,
}

impl CourseNode {
    pub fn new(id: CourseId, not_offered: bool) -> Self {
        let level = id.level();
        let label = display_label(&id, level, not_offered);
        let department = id.department().to_string();
        Self {
            id,
            label,
            level,
            department,
            not_offered,
        }
    }
}

/// Pure function of `(id, level, not_offered)`; recomputed whenever the
/// not-offered flag changes so node labels can never drift out of sync.
pub fn display_label(id: &CourseId, level: u8, not_offered: bool) -> String {
    let base = if level > 0 {
        format!("lvl {} - {}", level, id.as_str())
    } else {
        id.as_str().to_string()
    };
    if not_offered {
        format!("{} (not offered)", base)
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_id_accessors() {
        let id = CourseId::new("COMP 251");
        assert_eq!(id.department(), "COMP");
        assert_eq!(id.number_token(), Some("251"));
        assert_eq!(id.level(), 2);
    }

    #[test]
    fn level_defaults_to_zero_when_not_numeric_leading() {
        assert_eq!(CourseId::new("COMP D51").level(), 0);
        assert_eq!(CourseId::new("COMP").level(), 0);
    }

    #[test]
    fn label_includes_level_and_offering_suffix() {
        let id = CourseId::new("ANAT 321");
        assert_eq!(
            display_label(&id, id.level(), true),
            "lvl 3 - ANAT 321 (not offered)"
        );
        assert_eq!(display_label(&id, id.level(), false), "lvl 3 - ANAT 321");
    }

    #[test]
    fn label_omits_level_annotation_at_level_zero() {
        let id = CourseId::new("COMP D51");
        assert_eq!(display_label(&id, 0, false), "COMP D51");
    }
}
