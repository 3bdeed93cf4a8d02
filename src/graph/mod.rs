use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::record::{display_label, CourseId, CourseNode};

pub mod builder;
pub mod cluster;
pub mod layout;
pub mod nav;
pub mod viz;

pub use builder::{build, SelfLoopPolicy};
pub use cluster::{ClusterIndex, Department};
pub use layout::LayoutOptions;
pub use nav::{Action, LayoutHint, Navigator, ViewEdge, ViewModel, ViewNode, ViewState};

/// Directed prerequisite graph. An edge `prereq -> course` means the source
/// must be completed before the target. Both adjacency directions are kept
/// so one-hop closures are cheap either way. Acyclicity is not assumed;
/// catalog data may contain cycles and traversals must tolerate them.
#[derive(Debug, Default)]
pub struct CourseGraph {
    nodes: BTreeMap<CourseId, CourseNode>,
    forward: BTreeMap<CourseId, BTreeSet<CourseId>>,
    reverse: BTreeMap<CourseId, BTreeSet<CourseId>>,
    edge_count: usize,
}

impl CourseGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent node creation. The not-offered flag is OR-combined so the
    /// outcome cannot depend on record order; the label is recomputed when
    /// the flag flips.
    pub(crate) fn ensure_node(&mut self, id: &CourseId, not_offered: bool) {
        match self.nodes.get_mut(id) {
            Some(node) => {
                if not_offered && !node.not_offered {
                    node.not_offered = true;
                    node.label = display_label(&node.id, node.level, true);
                }
            }
            None => {
                self.nodes
                    .insert(id.clone(), CourseNode::new(id.clone(), not_offered));
            }
        }
    }

    /// Idempotent edge insertion; reinserting an existing edge is a no-op.
    pub(crate) fn insert_edge(&mut self, prerequisite: &CourseId, dependent: &CourseId) -> bool {
        debug_assert!(self.nodes.contains_key(prerequisite));
        debug_assert!(self.nodes.contains_key(dependent));

        let inserted = self
            .forward
            .entry(prerequisite.clone())
            .or_default()
            .insert(dependent.clone());
        if inserted {
            self.reverse
                .entry(dependent.clone())
                .or_default()
                .insert(prerequisite.clone());
            self.edge_count += 1;
        }
        inserted
    }

    pub fn contains(&self, id: &CourseId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: &CourseId) -> Option<&CourseNode> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &CourseNode> {
        self.nodes.values()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &CourseId> {
        self.nodes.keys()
    }

    /// Courses that list `id` as a prerequisite.
    pub fn successors(&self, id: &CourseId) -> impl Iterator<Item = &CourseId> {
        self.forward.get(id).into_iter().flatten()
    }

    /// Prerequisites of `id`.
    pub fn predecessors(&self, id: &CourseId) -> impl Iterator<Item = &CourseId> {
        self.reverse.get(id).into_iter().flatten()
    }

    pub fn has_edge(&self, prerequisite: &CourseId, dependent: &CourseId) -> bool {
        self.forward
            .get(prerequisite)
            .map(|targets| targets.contains(dependent))
            .unwrap_or(false)
    }

    pub fn edges(&self) -> impl Iterator<Item = (&CourseId, &CourseId)> {
        self.forward
            .iter()
            .flat_map(|(source, targets)| targets.iter().map(move |target| (source, target)))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
