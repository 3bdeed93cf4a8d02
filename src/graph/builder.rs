use serde::Deserialize;

use crate::catalog::record::NormalizedRecord;
use crate::error::{PrereqError, Result};
use crate::graph::CourseGraph;
use crate::util::output;

/// What to do when a course lists itself as its own prerequisite. Catalog
/// data is inconsistent here, so the choice is configuration rather than a
/// hard-coded rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelfLoopPolicy {
    /// Abort the build with an error naming the course.
    Reject,
    /// Log the course and skip the self-edge.
    #[default]
    Warn,
    /// Insert the self-edge as given.
    Allow,
}

impl SelfLoopPolicy {
    pub fn parse(input: &str) -> Result<Self> {
        match input.to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "warn" => Ok(Self::Warn),
            "allow" => Ok(Self::Allow),
            other => Err(PrereqError::Other(anyhow::anyhow!(
                "unknown self-loop policy '{}'",
                other
            ))),
        }
    }
}

/// Builds the prerequisite graph from normalized records. Every course
/// appearing as either a course or a prerequisite becomes a node, island
/// nodes included, so edge endpoints always exist. Node creation and edge
/// insertion are idempotent; permuting the input records yields the same
/// graph.
pub fn build(records: &[NormalizedRecord], self_loops: SelfLoopPolicy) -> Result<CourseGraph> {
    let mut graph = CourseGraph::new();

    for record in records {
        graph.ensure_node(&record.id, record.not_offered);
        for prerequisite in &record.prerequisites {
            if prerequisite == &record.id {
                match self_loops {
                    SelfLoopPolicy::Reject => {
                        return Err(PrereqError::SelfLoop(record.id.clone()));
                    }
                    SelfLoopPolicy::Warn => {
                        output::warn(&format!(
                            "{} lists itself as a prerequisite; edge skipped",
                            record.id
                        ));
                        continue;
                    }
                    SelfLoopPolicy::Allow => {}
                }
            }
            graph.ensure_node(prerequisite, false);
            graph.insert_edge(prerequisite, &record.id);
        }
    }

    Ok(graph)
}
