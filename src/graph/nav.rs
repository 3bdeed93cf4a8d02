use std::collections::BTreeSet;

use serde::Serialize;

use crate::catalog::record::CourseId;
use crate::graph::cluster::ClusterIndex;
use crate::graph::layout::{assign_positions, LayoutOptions};
use crate::graph::CourseGraph;

const FALLBACK_COLOR: &str = "#888888";

/// The current rendering request. States carry their derived node sets so
/// the renderer never has to recompute them, but they hold no identity: a
/// state is rebuilt from scratch on every action and discarded after
/// render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// One node per department, fully collapsed.
    Overview,
    DepartmentExpanded {
        department: String,
        core: BTreeSet<CourseId>,
        frontier: BTreeSet<CourseId>,
    },
    CourseFocused {
        course: CourseId,
        frontier: BTreeSet<CourseId>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Reset,
    Click(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutHint {
    Grid,
    Preset,
    ForceDirected,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewNode {
    pub id: String,
    pub label: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewEdge {
    pub source: String,
    pub target: String,
    pub emphasized: bool,
}

/// Everything the rendering collaborator needs for one navigation state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub nodes: Vec<ViewNode>,
    pub edges: Vec<ViewEdge>,
    pub layout_hint: LayoutHint,
}

/// Pure `(state, action) -> state` reducer over an immutable graph and
/// cluster index. Nothing here mutates after construction, so computations
/// are re-entrant; stale or unknown click targets fall back to the current
/// state instead of raising.
pub struct Navigator<'g> {
    graph: &'g CourseGraph,
    clusters: &'g ClusterIndex,
    layout: LayoutOptions,
}

impl<'g> Navigator<'g> {
    pub fn new(graph: &'g CourseGraph, clusters: &'g ClusterIndex, layout: LayoutOptions) -> Self {
        Self {
            graph,
            clusters,
            layout,
        }
    }

    pub fn initial(&self) -> ViewState {
        ViewState::Overview
    }

    pub fn reduce(&self, state: &ViewState, action: &Action) -> ViewState {
        match action {
            Action::Reset => ViewState::Overview,
            Action::Click(target) => {
                if self.clusters.contains_department(target) {
                    if let Some(next) = self.expand_department(target) {
                        return next;
                    }
                }
                // course clicks are only reachable from a detail view; in
                // the overview they can only come from stale UI state
                if !matches!(state, ViewState::Overview) {
                    let id = CourseId::new(target.clone());
                    if let Some(next) = self.focus_course(&id) {
                        return next;
                    }
                }
                state.clone()
            }
        }
    }

    /// One-hop closure of the department's members, both directions, so the
    /// expanded view shows the immediate cross-department prerequisites and
    /// dependents.
    pub fn expand_department(&self, department: &str) -> Option<ViewState> {
        let dept = self.clusters.get(department)?;
        let core = dept.members.clone();
        let mut frontier = core.clone();
        for id in &core {
            frontier.extend(self.graph.successors(id).cloned());
            frontier.extend(self.graph.predecessors(id).cloned());
        }
        Some(ViewState::DepartmentExpanded {
            department: department.to_string(),
            core,
            frontier,
        })
    }

    /// The focused course plus its direct prerequisites and dependents.
    pub fn focus_course(&self, course: &CourseId) -> Option<ViewState> {
        if !self.graph.contains(course) {
            return None;
        }
        let mut frontier: BTreeSet<CourseId> = BTreeSet::new();
        frontier.insert(course.clone());
        frontier.extend(self.graph.successors(course).cloned());
        frontier.extend(self.graph.predecessors(course).cloned());
        Some(ViewState::CourseFocused {
            course: course.clone(),
            frontier,
        })
    }

    pub fn view(&self, state: &ViewState) -> ViewModel {
        match state {
            ViewState::Overview => ViewModel {
                nodes: self
                    .clusters
                    .departments()
                    .map(|dept| ViewNode {
                        id: dept.name.clone(),
                        label: dept.name.clone(),
                        color: dept.color.clone(),
                        position: None,
                    })
                    .collect(),
                edges: Vec::new(),
                layout_hint: LayoutHint::Grid,
            },
            ViewState::DepartmentExpanded {
                department,
                frontier,
                ..
            } => {
                let positions = assign_positions(self.graph, department, frontier, &self.layout);
                let nodes = frontier
                    .iter()
                    .filter_map(|id| self.graph.node(id))
                    .map(|node| ViewNode {
                        id: node.id.to_string(),
                        label: node.label.clone(),
                        color: self.node_color(&node.department),
                        position: positions.get(&node.id).copied(),
                    })
                    .collect();
                ViewModel {
                    nodes,
                    // the full induced subgraph on the frontier, cross-
                    // department edges included
                    edges: self.induced_edges(frontier, |_, _| false),
                    layout_hint: LayoutHint::Preset,
                }
            }
            ViewState::CourseFocused { course, frontier } => {
                let nodes = frontier
                    .iter()
                    .filter_map(|id| self.graph.node(id))
                    .map(|node| ViewNode {
                        id: node.id.to_string(),
                        label: node.label.clone(),
                        color: self.node_color(&node.department),
                        position: None,
                    })
                    .collect();
                ViewModel {
                    nodes,
                    edges: self
                        .induced_edges(frontier, |source, target| {
                            source == course || target == course
                        }),
                    layout_hint: LayoutHint::ForceDirected,
                }
            }
        }
    }

    fn node_color(&self, department: &str) -> String {
        self.clusters
            .color_of(department)
            .unwrap_or(FALLBACK_COLOR)
            .to_string()
    }

    fn induced_edges<F>(&self, frontier: &BTreeSet<CourseId>, emphasize: F) -> Vec<ViewEdge>
    where
        F: Fn(&CourseId, &CourseId) -> bool,
    {
        let mut edges = Vec::new();
        for source in frontier {
            for target in self.graph.successors(source) {
                if frontier.contains(target) {
                    edges.push(ViewEdge {
                        source: source.to_string(),
                        target: target.to_string(),
                        emphasized: emphasize(source, target),
                    });
                }
            }
        }
        edges
    }
}
