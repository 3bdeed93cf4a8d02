use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use crate::catalog::record::CourseId;
use crate::graph::CourseGraph;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LayoutOptions {
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
    #[serde(default = "default_x_increment")]
    pub x_increment: f64,
    #[serde(default = "default_y_increment")]
    pub y_increment: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            max_rows: default_max_rows(),
            x_increment: default_x_increment(),
            y_increment: default_y_increment(),
        }
    }
}

/// Grid coordinates for a department-expansion view. Members are grouped by
/// course level into fixed-height columns; a level that overflows
/// `max_rows` spills into an extra column, shifting every later level right
/// to avoid collision. Cross-department frontier members land in one
/// trailing column block to the right of the highest used slot. The result
/// is deterministic for identical input.
pub fn assign_positions(
    graph: &CourseGraph,
    department: &str,
    frontier: &BTreeSet<CourseId>,
    opts: &LayoutOptions,
) -> BTreeMap<CourseId, (f64, f64)> {
    let max_rows = opts.max_rows.max(1);

    let mut by_level: [Vec<&CourseId>; 10] = Default::default();
    let mut outside: Vec<&CourseId> = Vec::new();
    for id in frontier {
        match graph.node(id) {
            Some(node) if node.department == department => {
                by_level[(node.level % 10) as usize].push(id);
            }
            Some(_) => outside.push(id),
            None => {}
        }
    }

    let mut positions = BTreeMap::new();
    let mut spillover = 0usize;
    let mut highest_used = 0usize;
    let mut any_placed = false;

    for (level, ids) in by_level.iter().enumerate() {
        if ids.is_empty() {
            continue;
        }
        // column offset for level L = (L + spillover of all levels < L)
        let base = level + spillover;
        for (index, id) in ids.iter().enumerate() {
            let column = base + index / max_rows;
            let row = index % max_rows;
            positions.insert(
                (*id).clone(),
                (
                    column as f64 * opts.x_increment,
                    row as f64 * opts.y_increment,
                ),
            );
            highest_used = highest_used.max(column);
            any_placed = true;
        }
        spillover += (ids.len() - 1) / max_rows;
    }

    let trailing = if any_placed { highest_used + 1 } else { 0 };
    for (index, id) in outside.iter().enumerate() {
        let column = trailing + index / max_rows;
        let row = index % max_rows;
        positions.insert(
            (*id).clone(),
            (
                column as f64 * opts.x_increment,
                row as f64 * opts.y_increment,
            ),
        );
    }

    positions
}

fn default_max_rows() -> usize {
    10
}

fn default_x_increment() -> f64 {
    180.0
}

fn default_y_increment() -> f64 {
    60.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::record::NormalizedRecord;
    use crate::graph::builder::{build, SelfLoopPolicy};

    fn id(code: &str) -> CourseId {
        CourseId::new(code)
    }

    fn graph_from(records: &[(&str, &[&str])]) -> CourseGraph {
        let normalized: Vec<NormalizedRecord> = records
            .iter()
            .map(|(code, prereqs)| NormalizedRecord {
                id: id(code),
                not_offered: false,
                prerequisites: prereqs.iter().copied().map(CourseId::new).collect(),
            })
            .collect();
        build(&normalized, SelfLoopPolicy::Warn).expect("build")
    }

    fn opts(max_rows: usize) -> LayoutOptions {
        LayoutOptions {
            max_rows,
            x_increment: 100.0,
            y_increment: 10.0,
        }
    }

    #[test]
    fn levels_occupy_their_own_columns() {
        let graph = graph_from(&[("COMP 250", &[]), ("COMP 251", &[]), ("COMP 350", &[])]);
        let frontier: BTreeSet<CourseId> = graph.node_ids().cloned().collect();
        let positions = assign_positions(&graph, "COMP", &frontier, &opts(10));

        assert_eq!(positions[&id("COMP 250")], (200.0, 0.0));
        assert_eq!(positions[&id("COMP 251")], (200.0, 10.0));
        assert_eq!(positions[&id("COMP 350")], (300.0, 0.0));
    }

    #[test]
    fn overflow_spills_into_a_new_column_and_shifts_later_levels() {
        let mut records: Vec<(String, Vec<String>)> = Vec::new();
        for n in 0..12 {
            records.push((format!("COMP 2{:02}", n), Vec::new()));
        }
        records.push(("COMP 300".to_string(), Vec::new()));

        const NO_PREREQS: &[&str] = &[];
        let borrowed: Vec<(&str, &[&str])> = records
            .iter()
            .map(|(code, _)| (code.as_str(), NO_PREREQS))
            .collect();
        let graph = graph_from(&borrowed);
        let frontier: BTreeSet<CourseId> = graph.node_ids().cloned().collect();
        let positions = assign_positions(&graph, "COMP", &frontier, &opts(10));

        // level 2 fills column 2 and spills two nodes into column 3
        assert_eq!(positions[&id("COMP 200")], (200.0, 0.0));
        assert_eq!(positions[&id("COMP 209")], (200.0, 90.0));
        assert_eq!(positions[&id("COMP 210")], (300.0, 0.0));
        assert_eq!(positions[&id("COMP 211")], (300.0, 10.0));
        // level 3 shifts right by the spillover column
        assert_eq!(positions[&id("COMP 300")], (400.0, 0.0));
    }

    #[test]
    fn cross_department_members_land_in_a_trailing_column() {
        let graph = graph_from(&[
            ("COMP 250", &[]),
            ("COMP 251", &["COMP 250", "MATH 240"]),
            ("MATH 240", &[]),
        ]);
        let frontier: BTreeSet<CourseId> = graph.node_ids().cloned().collect();
        let positions = assign_positions(&graph, "COMP", &frontier, &opts(10));

        let comp_max_x = positions[&id("COMP 250")].0;
        let (math_x, math_y) = positions[&id("MATH 240")];
        assert!(math_x > comp_max_x);
        assert_eq!(math_y, 0.0);
    }

    #[test]
    fn identical_input_yields_identical_coordinates() {
        let graph = graph_from(&[
            ("COMP 250", &[]),
            ("COMP 251", &["COMP 250"]),
            ("COMP 350", &[]),
        ]);
        let frontier: BTreeSet<CourseId> = graph.node_ids().cloned().collect();
        let first = assign_positions(&graph, "COMP", &frontier, &opts(10));
        let second = assign_positions(&graph, "COMP", &frontier, &opts(10));
        assert_eq!(first, second);
    }

    #[test]
    fn empty_frontier_produces_no_positions() {
        let graph = CourseGraph::new();
        let frontier = BTreeSet::new();
        let positions = assign_positions(&graph, "COMP", &frontier, &opts(10));
        assert!(positions.is_empty());
    }
}
