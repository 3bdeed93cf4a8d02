use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;

use crate::catalog::record::CourseId;
use crate::graph::CourseGraph;

/// A department cluster: the member courses plus the one display color
/// assigned at build time. Colors are never reassigned afterwards, so the
/// overview stays stable across navigation.
#[derive(Debug, Clone)]
pub struct Department {
    pub name: String,
    pub color: String,
    pub members: BTreeSet<CourseId>,
}

#[derive(Debug, Default)]
pub struct ClusterIndex {
    departments: BTreeMap<String, Department>,
}

impl ClusterIndex {
    /// Partitions the graph's nodes by department prefix. Each newly seen
    /// department gets a color exactly once; re-querying never generates a
    /// new one.
    pub fn build(graph: &CourseGraph) -> Self {
        let mut departments: BTreeMap<String, Department> = BTreeMap::new();
        for node in graph.nodes() {
            let entry = departments
                .entry(node.department.clone())
                .or_insert_with(|| Department {
                    name: node.department.clone(),
                    color: light_color(),
                    members: BTreeSet::new(),
                });
            entry.members.insert(node.id.clone());
        }
        Self { departments }
    }

    /// Departments in lexicographic order, for a stable overview.
    pub fn departments(&self) -> impl Iterator<Item = &Department> {
        self.departments.values()
    }

    pub fn get(&self, name: &str) -> Option<&Department> {
        self.departments.get(name)
    }

    pub fn contains_department(&self, name: &str) -> bool {
        self.departments.contains_key(name)
    }

    pub fn color_of(&self, name: &str) -> Option<&str> {
        self.departments.get(name).map(|dept| dept.color.as_str())
    }

    pub fn len(&self) -> usize {
        self.departments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.departments.is_empty()
    }
}

/// Random RGB with every channel in [100, 255], so dark node labels stay
/// legible over the fill.
fn light_color() -> String {
    let mut rng = rand::thread_rng();
    format!(
        "#{:02x}{:02x}{:02x}",
        rng.gen_range(100..=255u8),
        rng.gen_range(100..=255u8),
        rng.gen_range(100..=255u8)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::record::{CourseId, NormalizedRecord};
    use crate::graph::builder::{build, SelfLoopPolicy};

    fn graph_from(records: &[(&str, &[&str])]) -> CourseGraph {
        let normalized: Vec<NormalizedRecord> = records
            .iter()
            .map(|(code, prereqs)| NormalizedRecord {
                id: CourseId::new(*code),
                not_offered: false,
                prerequisites: prereqs.iter().copied().map(CourseId::new).collect(),
            })
            .collect();
        build(&normalized, SelfLoopPolicy::Warn).expect("build")
    }

    #[test]
    fn every_node_lands_in_exactly_one_department() {
        let graph = graph_from(&[
            ("COMP 250", &[]),
            ("COMP 251", &["COMP 250", "MATH 240"]),
            ("MATH 240", &[]),
        ]);
        let clusters = ClusterIndex::build(&graph);

        assert_eq!(clusters.len(), 2);
        let comp = clusters.get("COMP").expect("COMP cluster");
        assert_eq!(comp.members.len(), 2);
        let math = clusters.get("MATH").expect("MATH cluster");
        assert_eq!(math.members.len(), 1);

        let total: usize = clusters.departments().map(|d| d.members.len()).sum();
        assert_eq!(total, graph.node_count());
    }

    #[test]
    fn departments_iterate_in_lexicographic_order() {
        let graph = graph_from(&[("MATH 240", &[]), ("ANAT 214", &[]), ("COMP 250", &[])]);
        let clusters = ClusterIndex::build(&graph);
        let names: Vec<&str> = clusters.departments().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["ANAT", "COMP", "MATH"]);
    }

    #[test]
    fn colors_are_memoized_and_in_the_light_range() {
        let graph = graph_from(&[("COMP 250", &[]), ("COMP 251", &[])]);
        let clusters = ClusterIndex::build(&graph);

        let first = clusters.color_of("COMP").expect("color").to_string();
        let second = clusters.color_of("COMP").expect("color").to_string();
        assert_eq!(first, second);

        assert_eq!(first.len(), 7);
        assert!(first.starts_with('#'));
        for chunk in [&first[1..3], &first[3..5], &first[5..7]] {
            let channel = u8::from_str_radix(chunk, 16).expect("hex channel");
            assert!(channel >= 100, "channel {channel} below light range");
        }
    }

    #[test]
    fn empty_graph_yields_empty_index() {
        let graph = CourseGraph::new();
        let clusters = ClusterIndex::build(&graph);
        assert!(clusters.is_empty());
    }
}
