use crate::catalog::record::CourseId;
use crate::graph::nav::ViewModel;
use crate::graph::CourseGraph;

/// Graphviz export of a view model. Emphasized edges get a heavier pen so
/// direct prerequisite relationships stand out from one-hop siblings.
pub fn render_dot(model: &ViewModel) -> String {
    let mut out = String::from("digraph prereqmap {\n");
    for node in &model.nodes {
        let escaped = escape_dot_label(&node.label);
        out.push_str(&format!(
            "  \"{}\" [label=\"{}\", fillcolor=\"{}\", style=filled];\n",
            node.id, escaped, node.color
        ));
    }
    for edge in &model.edges {
        if edge.emphasized {
            out.push_str(&format!(
                "  \"{}\" -> \"{}\" [penwidth=2.0, color=\"#cc3333\"];\n",
                edge.source, edge.target
            ));
        } else {
            out.push_str(&format!("  \"{}\" -> \"{}\";\n", edge.source, edge.target));
        }
    }
    out.push_str("}\n");
    out
}

/// Prerequisite tree for one course: each child is something you must take
/// first. Cycles in the catalog are marked instead of recursed into.
pub fn render_tree(graph: &CourseGraph, course: &CourseId) -> String {
    let mut out = String::new();
    let label = graph
        .node(course)
        .map(|node| node.label.as_str())
        .unwrap_or_else(|| course.as_str());
    out.push_str(label);
    out.push('\n');
    let mut path = vec![course.clone()];
    render_tree_children(graph, course, "", &mut path, &mut out);
    out
}

fn render_tree_children(
    graph: &CourseGraph,
    node: &CourseId,
    prefix: &str,
    path: &mut Vec<CourseId>,
    out: &mut String,
) {
    let children: Vec<&CourseId> = graph.predecessors(node).collect();
    for (idx, child) in children.iter().enumerate() {
        let is_last = idx + 1 == children.len();
        out.push_str(prefix);
        out.push_str(if is_last { "`-- " } else { "|-- " });
        let label = graph
            .node(child)
            .map(|n| n.label.as_str())
            .unwrap_or_else(|| child.as_str());
        out.push_str(label);
        if path.iter().any(|id| id == *child) {
            out.push_str(" (cycle)");
            out.push('\n');
            continue;
        }
        out.push('\n');
        path.push((*child).clone());
        let mut next_prefix = prefix.to_string();
        if is_last {
            next_prefix.push_str("    ");
        } else {
            next_prefix.push_str("|   ");
        }
        render_tree_children(graph, child, &next_prefix, path, out);
        path.pop();
    }
}

fn escape_dot_label(label: &str) -> String {
    label.replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::record::NormalizedRecord;
    use crate::graph::builder::{build, SelfLoopPolicy};
    use crate::graph::cluster::ClusterIndex;
    use crate::graph::layout::LayoutOptions;
    use crate::graph::nav::Navigator;

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

    #[test]
    fn dot_output_includes_nodes_and_emphasized_edges() {
        let graph = graph_from(&[("COMP 250", &[]), ("COMP 251", &["COMP 250"])]);
        let clusters = ClusterIndex::build(&graph);
        let nav = Navigator::new(&graph, &clusters, LayoutOptions::default());
        let focused = nav.focus_course(&id("COMP 250")).expect("focus");

        let dot = render_dot(&nav.view(&focused));
        assert!(dot.starts_with("digraph prereqmap {"));
        assert!(dot.contains("\"COMP 250\""));
        assert!(dot.contains("\"COMP 250\" -> \"COMP 251\" [penwidth=2.0"));
    }

    #[test]
    fn tree_shows_transitive_prerequisites() {
        let graph = graph_from(&[
            ("COMP 302", &["COMP 250"]),
            ("COMP 250", &["MATH 133"]),
            ("MATH 133", &[]),
        ]);
        let tree = render_tree(&graph, &id("COMP 302"));
        assert_eq!(
            tree,
            "lvl 3 - COMP 302\n`-- lvl 2 - COMP 250\n    `-- lvl 1 - MATH 133\n"
        );
    }

    #[test]
    fn tree_marks_cycles_instead_of_recursing() {
        let graph = graph_from(&[
            ("COMP 250", &["COMP 251"]),
            ("COMP 251", &["COMP 250"]),
        ]);
        let tree = render_tree(&graph, &id("COMP 250"));
        assert!(tree.contains("(cycle)"));
        // bounded output despite the cycle
        assert!(tree.lines().count() <= 3);
    }
}
