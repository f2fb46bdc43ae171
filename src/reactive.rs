//! Dependency-tracked recomputation.
//!
//! ```text
//!   inputs            derived
//!   ──────            ───────
//!   dataset ──┐
//!   mass_max ─┼──▶  view ──┬──▶ count
//!   species ──┘            ├──▶ mean bill length / depth ◀─┐
//!                          ├──▶ scatter                 ◀─┼── dataset
//!                          └──▶ grid                    ◀─┘
//! ```
//!
//! The graph only tracks versions; the values live with their owner (see
//! [`crate::state::Session`]). A derived node is stale when a dependency's
//! version moved since the node was last committed. Committing a node bumps
//! its own version only if its value actually changed, which keeps
//! downstream nodes fresh when an upstream recomputation is a no-op.

use thiserror::Error;

/// Handle to a node in a [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("node {0:?} does not exist in this graph")]
    UnknownNode(NodeId),
    #[error("node '{0}' is an input and cannot be committed")]
    NotDerived(&'static str),
}

#[derive(Debug, Clone)]
struct Node {
    label: &'static str,
    input: bool,
    deps: Vec<NodeId>,
    /// Bumped whenever this node's value changes.
    version: u64,
    /// Dependency versions at the last commit; `None` before the first.
    observed: Option<Vec<u64>>,
    evaluations: u64,
}

impl Node {
    fn is_input(&self) -> bool {
        self.input
    }
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source node whose changes are signalled with [`Graph::set_changed`].
    pub fn input(&mut self, label: &'static str) -> NodeId {
        self.push(label, true, Vec::new())
    }

    /// Add a node computed from `deps`, which must already exist.
    ///
    /// Since dependencies always precede their dependents, node order is a
    /// topological order and cycles cannot be built.
    pub fn derived(&mut self, label: &'static str, deps: &[NodeId]) -> Result<NodeId, GraphError> {
        if let Some(missing) = deps.iter().find(|d| d.0 >= self.nodes.len()) {
            return Err(GraphError::UnknownNode(*missing));
        }
        Ok(self.push(label, false, deps.to_vec()))
    }

    fn push(&mut self, label: &'static str, input: bool, deps: Vec<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            label,
            input,
            deps,
            version: 0,
            observed: None,
            evaluations: 0,
        });
        id
    }

    fn node(&self, id: NodeId) -> Result<&Node, GraphError> {
        self.nodes.get(id.0).ok_or(GraphError::UnknownNode(id))
    }

    fn dep_versions(&self, node: &Node) -> Vec<u64> {
        node.deps.iter().map(|d| self.nodes[d.0].version).collect()
    }

    /// Signal that the value behind `id` changed.
    pub fn set_changed(&mut self, id: NodeId) -> Result<(), GraphError> {
        let node = self
            .nodes
            .get_mut(id.0)
            .ok_or(GraphError::UnknownNode(id))?;
        node.version += 1;
        log::trace!("input '{}' -> v{}", node.label, node.version);
        Ok(())
    }

    /// Whether `id` must be recomputed before it can be read. Inputs are
    /// never stale.
    pub fn is_stale(&self, id: NodeId) -> Result<bool, GraphError> {
        let node = self.node(id)?;
        if node.is_input() {
            return Ok(false);
        }
        Ok(match &node.observed {
            None => true,
            Some(seen) => *seen != self.dep_versions(node),
        })
    }

    /// Record that `id` was just recomputed. `changed` says whether the new
    /// value differs from the previous one.
    pub fn commit(&mut self, id: NodeId, changed: bool) -> Result<(), GraphError> {
        let node = self.node(id)?;
        if node.is_input() {
            return Err(GraphError::NotDerived(node.label));
        }
        let first = node.observed.is_none();
        let seen = self.dep_versions(node);
        let node = &mut self.nodes[id.0];
        node.observed = Some(seen);
        node.evaluations += 1;
        if changed || first {
            node.version += 1;
        }
        log::debug!(
            "recomputed '{}' (evaluation #{}, changed: {})",
            node.label,
            node.evaluations,
            changed
        );
        Ok(())
    }

    /// Derived nodes in evaluation order.
    pub fn derived_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| !n.is_input())
            .map(|(i, _)| NodeId(i))
    }

    pub fn label(&self, id: NodeId) -> Result<&'static str, GraphError> {
        Ok(self.node(id)?.label)
    }

    /// How many times `id` has been committed.
    pub fn evaluations(&self, id: NodeId) -> Result<u64, GraphError> {
        Ok(self.node(id)?.evaluations)
    }

    pub fn version(&self, id: NodeId) -> Result<u64, GraphError> {
        Ok(self.node(id)?.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> (Graph, NodeId, NodeId, NodeId) {
        let mut g = Graph::new();
        let a = g.input("a");
        let b = g.derived("b", &[a]).unwrap();
        let c = g.derived("c", &[b]).unwrap();
        (g, a, b, c)
    }

    #[test]
    fn fresh_derived_nodes_start_stale() {
        let (g, a, b, c) = chain();
        assert!(!g.is_stale(a).unwrap());
        assert!(g.is_stale(b).unwrap());
        assert!(g.is_stale(c).unwrap());
    }

    #[test]
    fn commit_clears_staleness_until_input_changes() {
        let (mut g, a, b, c) = chain();
        g.commit(b, true).unwrap();
        g.commit(c, true).unwrap();
        assert!(!g.is_stale(b).unwrap());
        assert!(!g.is_stale(c).unwrap());

        g.set_changed(a).unwrap();
        assert!(g.is_stale(b).unwrap());
        assert!(!g.is_stale(c).unwrap(), "c only sees b's version");
    }

    #[test]
    fn unchanged_result_does_not_propagate() {
        let (mut g, a, b, c) = chain();
        g.commit(b, true).unwrap();
        g.commit(c, true).unwrap();

        g.set_changed(a).unwrap();
        g.commit(b, false).unwrap();
        assert!(!g.is_stale(c).unwrap());

        g.set_changed(a).unwrap();
        g.commit(b, true).unwrap();
        assert!(g.is_stale(c).unwrap());
    }

    #[test]
    fn unknown_dependency_is_rejected() {
        let mut g = Graph::new();
        let mut other = Graph::new();
        other.input("x");
        let far = other.input("y");
        assert_eq!(g.derived("z", &[far]), Err(GraphError::UnknownNode(far)));
    }

    #[test]
    fn inputs_cannot_be_committed() {
        let (mut g, a, _, _) = chain();
        assert_eq!(g.commit(a, true), Err(GraphError::NotDerived("a")));
    }

    #[test]
    fn derived_nodes_iterate_in_declaration_order() {
        let (g, _, b, c) = chain();
        assert_eq!(g.derived_nodes().collect::<Vec<_>>(), vec![b, c]);
        assert_eq!(g.label(c).unwrap(), "c");
    }

    #[test]
    fn evaluations_are_counted() {
        let (mut g, _, b, _) = chain();
        assert_eq!(g.evaluations(b).unwrap(), 0);
        g.commit(b, true).unwrap();
        g.commit(b, false).unwrap();
        assert_eq!(g.evaluations(b).unwrap(), 2);
        assert_eq!(g.version(b).unwrap(), 1);
    }
}
