//! Layer assignment for topic graphs.
//!
//! The [`Layerizer`] places every node of a [`TopicGraph`] in a discrete
//! layer so that, for an acyclic graph, every prerequisite sits in an earlier
//! layer than the topics that build on it. The layer of a node is the length
//! of the longest prerequisite chain leading to it.
//!
//! Layering always terminates and always covers every node. When the graph has
//! no roots, the first node in input order is placed by hand. When a cycle
//! blocks progress, the restart node is the first unplaced cycle member that
//! already has a placed prerequisite, else the first unplaced node with a
//! placed prerequisite, else the first unplaced node. Each such step is
//! recorded as a [`Rescue`].

use log::{debug, trace, warn};

use crate::{
    diagnostic::{Diagnostic, RescueReason},
    graph::{NodeIndex, TopicGraph},
};

/// A node that was placed without all of its prerequisites being placed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rescue {
    node: NodeIndex,
    layer: usize,
    reason: RescueReason,
}

impl Rescue {
    pub fn node(&self) -> NodeIndex {
        self.node
    }

    pub fn layer(&self) -> usize {
        self.layer
    }

    pub fn reason(&self) -> RescueReason {
        self.reason
    }

    /// Converts the rescue into a diagnostic naming the topic.
    pub fn to_diagnostic(&self, graph: &TopicGraph) -> Option<Diagnostic> {
        graph.topic(self.node).map(|topic| Diagnostic::LayerRescue {
            topic: topic.id(),
            layer: self.layer,
            reason: self.reason,
        })
    }
}

/// The result of layering: ordered layers of node indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layering {
    layers: Vec<Vec<NodeIndex>>,
    placement: Vec<(usize, usize)>,
    rescues: Vec<Rescue>,
}

impl Layering {
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layers(&self) -> &[Vec<NodeIndex>] {
        &self.layers
    }

    /// The layer and the index within that layer of `node`.
    pub fn placement(&self, node: NodeIndex) -> Option<(usize, usize)> {
        self.placement.get(node.index()).copied()
    }

    pub fn layer_of(&self, node: NodeIndex) -> Option<usize> {
        self.placement(node).map(|(layer, _)| layer)
    }

    /// Size of the widest layer.
    pub fn max_layer_len(&self) -> usize {
        self.layers.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn rescues(&self) -> &[Rescue] {
        &self.rescues
    }
}

/// Assigns layers with a frontier sweep over the edge list.
///
/// The first layer holds every root in input order. Each following layer
/// holds the unplaced targets of edges whose prerequisites are all placed,
/// in the order they are found while scanning the edge list.
#[derive(Debug, Clone, Copy, Default)]
pub struct Layerizer;

impl Layerizer {
    pub fn new() -> Self {
        Self
    }

    pub fn layerize(&self, graph: &TopicGraph) -> Layering {
        let count = graph.len();
        let mut pending: Vec<usize> = graph.node_indices().map(|n| graph.in_degree(n)).collect();
        let mut placed = vec![false; count];
        let mut placed_count = 0;
        let mut layering = Layering {
            layers: Vec::new(),
            placement: vec![(0, 0); count],
            rescues: Vec::new(),
        };

        let mut in_cycle: Option<Vec<bool>> = None;

        let mut frontier: Vec<NodeIndex> = graph.roots().collect();
        if frontier.is_empty() && count > 0 {
            let first = NodeIndex::new(0);
            frontier.push(self.rescue(&mut layering, graph, first, RescueReason::NoRoots));
        }

        while !frontier.is_empty() {
            let layer = layering.layers.len();
            for (index, node) in frontier.iter().enumerate() {
                placed[node.index()] = true;
                layering.placement[node.index()] = (layer, index);
                for successor in graph.successors(*node) {
                    pending[successor.index()] = pending[successor.index()].saturating_sub(1);
                }
            }
            placed_count += frontier.len();
            trace!(layer = layer, nodes_count = frontier.len(); "Layer assigned");
            layering.layers.push(frontier);

            if placed_count == count {
                break;
            }

            let mut next = Vec::new();
            let mut queued = vec![false; count];
            for edge in graph.edges() {
                let target = edge.to().index();
                if placed[edge.from().index()] && !placed[target] && !queued[target] && pending[target] == 0
                {
                    queued[target] = true;
                    next.push(edge.to());
                }
            }

            if next.is_empty() {
                let in_cycle = in_cycle.get_or_insert_with(|| cycle_members(graph));
                let node = stalled_seed(graph, &placed, in_cycle);
                next.push(self.rescue(&mut layering, graph, node, RescueReason::Stalled));
            }
            frontier = next;
        }

        debug!(
            layers_count = layering.layer_count(),
            rescues_count = layering.rescues.len();
            "Layering complete"
        );
        layering
    }

    fn rescue(
        &self,
        layering: &mut Layering,
        graph: &TopicGraph,
        node: NodeIndex,
        reason: RescueReason,
    ) -> NodeIndex {
        let rescue = Rescue {
            node,
            layer: layering.layers.len(),
            reason,
        };
        if let Some(diagnostic) = rescue.to_diagnostic(graph) {
            warn!(code = diagnostic.code(); "{diagnostic}");
        }
        layering.rescues.push(rescue);
        node
    }
}

fn cycle_members(graph: &TopicGraph) -> Vec<bool> {
    let mut members = vec![false; graph.len()];
    for node in graph.cycles().into_iter().flatten() {
        members[node.index()] = true;
    }
    members
}

/// The node to restart from when no candidate is admissible.
fn stalled_seed(graph: &TopicGraph, placed: &[bool], in_cycle: &[bool]) -> NodeIndex {
    let unplaced = || graph.node_indices().filter(|node| !placed[node.index()]);
    let touches_placed =
        |node: &NodeIndex| graph.predecessors(*node).any(|pred| placed[pred.index()]);

    unplaced()
        .filter(|node| in_cycle[node.index()])
        .find(touches_placed)
        .or_else(|| unplaced().find(touches_placed))
        .or_else(|| unplaced().next())
        .unwrap_or(NodeIndex::new(0))
}

#[cfg(test)]
mod tests {
    use weakmap_core::topic::Topic;

    use super::*;
    use crate::graph::GraphBuilder;

    fn layerize(topics: &[Topic]) -> (TopicGraph, Layering) {
        let (graph, _) = GraphBuilder::new().build(topics);
        let layering = Layerizer::new().layerize(&graph);
        (graph, layering)
    }

    fn layer_of(graph: &TopicGraph, layering: &Layering, id: &str) -> usize {
        let node = graph.index_of(id.into()).unwrap();
        layering.layer_of(node).unwrap()
    }

    fn layer_ids(graph: &TopicGraph, layering: &Layering) -> Vec<Vec<String>> {
        layering
            .layers()
            .iter()
            .map(|layer| {
                layer
                    .iter()
                    .map(|node| graph.topic(*node).unwrap().id().to_string())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let (_, layering) = layerize(&[]);

        assert!(layering.is_empty());
        assert_eq!(layering.max_layer_len(), 0);
        assert!(layering.rescues().is_empty());
    }

    #[test]
    fn test_diamond() {
        let topics = vec![
            Topic::new("1", "A"),
            Topic::new("2", "B").with_prerequisites(["1"]),
            Topic::new("3", "C").with_prerequisites(["1"]),
            Topic::new("4", "D").with_prerequisites(["2", "3"]),
        ];
        let (graph, layering) = layerize(&topics);

        assert_eq!(layer_of(&graph, &layering, "1"), 0);
        assert_eq!(layer_of(&graph, &layering, "2"), 1);
        assert_eq!(layer_of(&graph, &layering, "3"), 1);
        assert_eq!(layer_of(&graph, &layering, "4"), 2);
        assert_eq!(layering.max_layer_len(), 2);
        assert!(layering.rescues().is_empty());
    }

    #[test]
    fn test_disjoint_chains_start_at_layer_zero() {
        let topics = vec![
            Topic::new("a", "A"),
            Topic::new("b", "B").with_prerequisites(["a"]),
            Topic::new("c", "C"),
            Topic::new("d", "D").with_prerequisites(["c"]),
        ];
        let (graph, layering) = layerize(&topics);

        assert_eq!(
            layer_ids(&graph, &layering),
            vec![vec!["a", "c"], vec!["b", "d"]]
        );
    }

    #[test]
    fn test_transitive_edge_keeps_monotonicity() {
        let topics = vec![
            Topic::new("a", "A"),
            Topic::new("b", "B").with_prerequisites(["a"]),
            Topic::new("c", "C").with_prerequisites(["a", "b"]),
        ];
        let (graph, layering) = layerize(&topics);

        assert_eq!(layer_ids(&graph, &layering), vec![vec!["a"], vec!["b"], vec!["c"]]);
        for edge in graph.edges() {
            assert!(layering.layer_of(edge.from()) < layering.layer_of(edge.to()));
        }
    }

    #[test]
    fn test_discovery_order_follows_edge_list() {
        let topics = vec![
            Topic::new("root", "Root"),
            Topic::new("late", "Late").with_prerequisites(["root"]),
            Topic::new("early", "Early").with_prerequisites(["root"]),
        ];
        let (graph, layering) = layerize(&topics);

        assert_eq!(
            layer_ids(&graph, &layering),
            vec![vec!["root"], vec!["late", "early"]]
        );
        let late = graph.index_of("late".into()).unwrap();
        assert_eq!(layering.placement(late), Some((1, 0)));
    }

    #[test]
    fn test_mutual_cycle_terminates() {
        let topics = vec![
            Topic::new("a", "A").with_prerequisites(["b"]),
            Topic::new("b", "B").with_prerequisites(["a"]),
        ];
        let (graph, layering) = layerize(&topics);

        assert_eq!(layer_ids(&graph, &layering), vec![vec!["a"], vec!["b"]]);
        assert_eq!(layering.rescues().len(), 1);
        assert_eq!(layering.rescues()[0].reason(), RescueReason::NoRoots);
        assert_eq!(layering.rescues()[0].layer(), 0);
    }

    #[test]
    fn test_cycle_behind_root_stalls_and_rescues() {
        let topics = vec![
            Topic::new("r", "Root"),
            Topic::new("a", "A").with_prerequisites(["r", "b"]),
            Topic::new("b", "B").with_prerequisites(["a"]),
        ];
        let (graph, layering) = layerize(&topics);

        assert_eq!(layer_ids(&graph, &layering), vec![vec!["r"], vec!["a"], vec!["b"]]);
        let rescue = layering.rescues()[0];
        assert_eq!(rescue.reason(), RescueReason::Stalled);
        assert_eq!(rescue.layer(), 1);
        assert_eq!(
            rescue.to_diagnostic(&graph).map(|d| d.code()),
            Some("layer_rescue")
        );
    }

    #[test]
    fn test_stall_restarts_inside_the_cycle() {
        let topics = vec![
            Topic::new("r", "Root"),
            Topic::new("x", "X").with_prerequisites(["b"]),
            Topic::new("a", "A").with_prerequisites(["r", "b"]),
            Topic::new("b", "B").with_prerequisites(["a"]),
        ];
        let (graph, layering) = layerize(&topics);

        assert_eq!(
            layer_ids(&graph, &layering),
            vec![vec!["r"], vec!["a"], vec!["b"], vec!["x"]]
        );
        assert_eq!(layering.rescues().len(), 1);
        assert_eq!(layering.rescues()[0].node(), graph.index_of("a".into()).unwrap());
        assert!(layer_of(&graph, &layering, "x") > layer_of(&graph, &layering, "b"));
    }

    #[test]
    fn test_stall_prefers_cycle_member_over_earlier_dependent() {
        let topics = vec![
            Topic::new("r", "Root"),
            Topic::new("x", "X").with_prerequisites(["r", "b"]),
            Topic::new("a", "A").with_prerequisites(["r", "b"]),
            Topic::new("b", "B").with_prerequisites(["a"]),
        ];
        let (graph, layering) = layerize(&topics);

        assert_eq!(layering.rescues()[0].node(), graph.index_of("a".into()).unwrap());
        assert_eq!(layer_of(&graph, &layering, "x"), 3);
    }

    #[test]
    fn test_unreachable_cycle_restarts_at_first_unplaced() {
        let topics = vec![
            Topic::new("r", "Root"),
            Topic::new("c", "C").with_prerequisites(["d"]),
            Topic::new("d", "D").with_prerequisites(["c"]),
        ];
        let (graph, layering) = layerize(&topics);

        assert_eq!(layer_ids(&graph, &layering), vec![vec!["r"], vec!["c"], vec!["d"]]);
        assert_eq!(layering.rescues()[0].reason(), RescueReason::Stalled);
    }

    #[test]
    fn test_dangling_reference_still_places_node() {
        let topics = vec![
            Topic::new("a", "A").with_prerequisites(["ghost"]),
            Topic::new("b", "B").with_prerequisites(["a"]),
        ];
        let (graph, layering) = layerize(&topics);

        assert_eq!(layer_of(&graph, &layering, "a"), 0);
        assert_eq!(layer_of(&graph, &layering, "b"), 1);
    }

    #[test]
    fn test_every_node_is_covered() {
        let topics = vec![
            Topic::new("a", "A").with_prerequisites(["c"]),
            Topic::new("b", "B").with_prerequisites(["a"]),
            Topic::new("c", "C").with_prerequisites(["b"]),
            Topic::new("d", "D"),
            Topic::new("e", "E").with_prerequisites(["d", "a"]),
        ];
        let (graph, layering) = layerize(&topics);

        let placed: usize = layering.layers().iter().map(Vec::len).sum();
        assert_eq!(placed, graph.len());
        for node in graph.node_indices() {
            assert!(layering.layer_of(node).is_some());
        }
    }
}
