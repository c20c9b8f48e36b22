//! Prerequisite graph construction.
//!
//! This module turns a flat list of [`Topic`] records into a [`TopicGraph`]:
//! a validated node set in input order plus a deduplicated edge list in
//! discovery order. An edge always points from the prerequisite to the topic
//! that builds on it.
//!
//! # Architecture
//!
//! - [`Resolver`]: two-pass lookup of a reference (by id, then by name)
//! - [`GraphBuilder`]: configurable builder producing the graph and its diagnostics
//! - [`TopicGraph`]: immutable result with adjacency, root and cycle queries
//!
//! Construction never fails. References that cannot be resolved, self
//! references and duplicate ids are dropped and reported as [`Diagnostic`]s.

use std::{
    collections::{HashMap, HashSet},
    fmt,
    str::FromStr,
};

use log::{debug, trace, warn};
use petgraph::{algo::tarjan_scc, graph::DiGraph};
use serde::{Deserialize, Serialize};

use weakmap_core::{identifier::Id, topic::Topic};

use crate::diagnostic::{Diagnostic, ReferenceKind};

/// Position of a node in its graph, which is also its input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// A directed edge from a prerequisite (`from`) to a dependent topic (`to`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    from: NodeIndex,
    to: NodeIndex,
}

impl Edge {
    pub fn new(from: NodeIndex, to: NodeIndex) -> Self {
        Self { from, to }
    }

    pub fn from(&self) -> NodeIndex {
        self.from
    }

    pub fn to(&self) -> NodeIndex {
        self.to
    }
}

/// Which reference lists produce edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeSource {
    /// `prerequisite -> topic` for every entry of `prerequisites`.
    #[default]
    Prerequisites,
    /// `topic -> dependency` for every entry of `dependencies`.
    Dependencies,
    /// The union of both, prerequisite-derived edges first.
    Both,
}

impl EdgeSource {
    fn uses(self, kind: ReferenceKind) -> bool {
        matches!(
            (self, kind),
            (Self::Both, _)
                | (Self::Prerequisites, ReferenceKind::Prerequisite)
                | (Self::Dependencies, ReferenceKind::Dependency)
        )
    }
}

impl FromStr for EdgeSource {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prerequisites" => Ok(Self::Prerequisites),
            "dependencies" => Ok(Self::Dependencies),
            "both" => Ok(Self::Both),
            _ => Err("Unsupported edge source"),
        }
    }
}

impl fmt::Display for EdgeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prerequisites => f.write_str("prerequisites"),
            Self::Dependencies => f.write_str("dependencies"),
            Self::Both => f.write_str("both"),
        }
    }
}

/// Outcome of resolving one reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The reference equals a topic id.
    ById(NodeIndex),
    /// The reference equals a topic name and no topic id.
    ByName(NodeIndex),
    Unresolved,
}

impl Resolution {
    pub fn node(self) -> Option<NodeIndex> {
        match self {
            Self::ById(node) | Self::ByName(node) => Some(node),
            Self::Unresolved => None,
        }
    }
}

/// Resolves topic references against a fixed node set.
///
/// Ids are tried first, names second. When several topics share a name the
/// first one in input order wins.
#[derive(Debug, Default)]
pub struct Resolver {
    by_id: HashMap<Id, NodeIndex>,
    by_name: HashMap<Id, NodeIndex>,
}

impl Resolver {
    pub fn new(topics: &[Topic]) -> Self {
        let mut resolver = Self::default();
        for (index, topic) in topics.iter().enumerate() {
            let node = NodeIndex(index);
            resolver.by_id.entry(topic.id()).or_insert(node);
            resolver.by_name.entry(Id::new(topic.name())).or_insert(node);
        }
        resolver
    }

    pub fn resolve(&self, reference: Id) -> Resolution {
        if let Some(node) = self.by_id.get(&reference) {
            Resolution::ById(*node)
        } else if let Some(node) = self.by_name.get(&reference) {
            Resolution::ByName(*node)
        } else {
            Resolution::Unresolved
        }
    }
}

/// Builds a [`TopicGraph`] from topic records.
///
/// # Examples
///
/// ```
/// use weakmap::graph::GraphBuilder;
/// use weakmap_core::topic::Topic;
///
/// let topics = vec![
///     Topic::new("fractions", "分数"),
///     Topic::new("ratio", "割合").with_prerequisites(["fractions", "missing"]),
/// ];
///
/// let (graph, diagnostics) = GraphBuilder::new().build(&topics);
/// assert_eq!(graph.edges().len(), 1);
/// assert_eq!(diagnostics.len(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphBuilder {
    edge_source: EdgeSource,
    check_consistency: bool,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_edge_source(mut self, edge_source: EdgeSource) -> Self {
        self.edge_source = edge_source;
        self
    }

    /// Report prerequisite/dependency pairs that are not mirrored on the other topic.
    pub fn with_consistency_check(mut self, check_consistency: bool) -> Self {
        self.check_consistency = check_consistency;
        self
    }

    /// Builds the graph and collects the diagnostics found on the way.
    pub fn build(&self, topics: &[Topic]) -> (TopicGraph, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();

        let mut seen = HashSet::with_capacity(topics.len());
        let mut nodes = Vec::with_capacity(topics.len());
        for (position, topic) in topics.iter().enumerate() {
            if seen.insert(topic.id()) {
                nodes.push(topic.clone());
            } else {
                diagnostics.push(Diagnostic::DuplicateTopic {
                    id: topic.id(),
                    position,
                });
            }
        }

        let resolver = Resolver::new(&nodes);
        let prerequisites = resolve_lists(&nodes, &resolver, ReferenceKind::Prerequisite);
        let dependencies = resolve_lists(&nodes, &resolver, ReferenceKind::Dependency);

        let mut graph = TopicGraph::with_nodes(nodes);
        let mut pairs = HashSet::new();

        for (kind, lists) in [
            (ReferenceKind::Prerequisite, &prerequisites),
            (ReferenceKind::Dependency, &dependencies),
        ] {
            if !self.edge_source.uses(kind) {
                continue;
            }
            for (index, list) in lists.iter().enumerate() {
                let node = NodeIndex(index);
                let topic = graph.topics[index].id();
                for (reference, resolution) in list {
                    let Some(other) = resolution.node() else {
                        diagnostics.push(Diagnostic::UnresolvedReference {
                            topic,
                            reference: *reference,
                            list: kind,
                        });
                        continue;
                    };
                    if other == node {
                        diagnostics.push(Diagnostic::SelfReference { topic, list: kind });
                        continue;
                    }
                    if let Resolution::ByName(_) = resolution {
                        trace!(topic:%, reference:%; "Reference resolved by name");
                    }
                    let edge = match kind {
                        ReferenceKind::Prerequisite => Edge::new(other, node),
                        ReferenceKind::Dependency => Edge::new(node, other),
                    };
                    if pairs.insert(edge) {
                        graph.add_edge(edge);
                    }
                }
            }
        }

        if self.check_consistency {
            check_consistency(&graph, &prerequisites, &dependencies, &mut diagnostics);
        }

        for diagnostic in &diagnostics {
            warn!(code = diagnostic.code(); "{diagnostic}");
        }
        debug!(
            nodes_count = graph.len(),
            edges_count = graph.edges.len(),
            diagnostics_count = diagnostics.len();
            "Topic graph built"
        );

        (graph, diagnostics)
    }
}

type ResolvedList = Vec<(Id, Resolution)>;

fn resolve_lists(nodes: &[Topic], resolver: &Resolver, kind: ReferenceKind) -> Vec<ResolvedList> {
    nodes
        .iter()
        .map(|topic| {
            let references = match kind {
                ReferenceKind::Prerequisite => topic.prerequisites(),
                ReferenceKind::Dependency => topic.dependencies(),
            };
            references
                .iter()
                .map(|reference| (*reference, resolver.resolve(*reference)))
                .collect()
        })
        .collect()
}

fn check_consistency(
    graph: &TopicGraph,
    prerequisites: &[ResolvedList],
    dependencies: &[ResolvedList],
    diagnostics: &mut Vec<Diagnostic>,
) {
    let lists_contain = |lists: &[ResolvedList], owner: NodeIndex, target: NodeIndex| {
        lists[owner.0]
            .iter()
            .any(|(_, resolution)| resolution.node() == Some(target))
    };

    for (kind, own, mirror) in [
        (ReferenceKind::Prerequisite, prerequisites, dependencies),
        (ReferenceKind::Dependency, dependencies, prerequisites),
    ] {
        for (index, list) in own.iter().enumerate() {
            let node = NodeIndex(index);
            let mut reported = HashSet::new();
            for (_, resolution) in list {
                let Some(other) = resolution.node() else {
                    continue;
                };
                if other == node || !reported.insert(other) {
                    continue;
                }
                if !lists_contain(mirror, other, node) {
                    diagnostics.push(Diagnostic::InconsistentDependency {
                        topic: graph.topics[index].id(),
                        other: graph.topics[other.0].id(),
                        list: kind,
                    });
                }
            }
        }
    }
}

/// Validated topics with resolved prerequisite edges.
///
/// Nodes keep their input order and edges keep their discovery order; both
/// orders are part of the layering contract.
#[derive(Debug, Clone, Default)]
pub struct TopicGraph {
    topics: Vec<Topic>,
    index: HashMap<Id, NodeIndex>,
    edges: Vec<Edge>,
    incoming: Vec<Vec<usize>>,
    outgoing: Vec<Vec<usize>>,
}

impl TopicGraph {
    fn with_nodes(topics: Vec<Topic>) -> Self {
        let index = topics
            .iter()
            .enumerate()
            .map(|(i, topic)| (topic.id(), NodeIndex(i)))
            .collect();
        let count = topics.len();
        Self {
            topics,
            index,
            edges: Vec::new(),
            incoming: vec![Vec::new(); count],
            outgoing: vec![Vec::new(); count],
        }
    }

    fn add_edge(&mut self, edge: Edge) {
        debug_assert!(edge.from.0 < self.topics.len(), "edge source out of range");
        debug_assert!(edge.to.0 < self.topics.len(), "edge target out of range");

        let edge_idx = self.edges.len();
        self.edges.push(edge);
        self.outgoing[edge.from.0].push(edge_idx);
        self.incoming[edge.to.0].push(edge_idx);
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Topics in input order, duplicates removed.
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn topic(&self, node: NodeIndex) -> Option<&Topic> {
        self.topics.get(node.0)
    }

    pub fn index_of(&self, id: Id) -> Option<NodeIndex> {
        self.index.get(&id).copied()
    }

    /// Iterates node indices in input order.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        (0..self.topics.len()).map(NodeIndex)
    }

    /// Edges in discovery order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn in_degree(&self, node: NodeIndex) -> usize {
        self.incoming.get(node.0).map_or(0, Vec::len)
    }

    pub fn out_degree(&self, node: NodeIndex) -> usize {
        self.outgoing.get(node.0).map_or(0, Vec::len)
    }

    /// Direct prerequisites of `node`.
    pub fn predecessors(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.incoming
            .get(node.0)
            .into_iter()
            .flatten()
            .map(|idx| self.edges[*idx].from)
    }

    /// Topics that directly build on `node`.
    pub fn successors(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.outgoing
            .get(node.0)
            .into_iter()
            .flatten()
            .map(|idx| self.edges[*idx].to)
    }

    /// Nodes without prerequisites, in input order.
    pub fn roots(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.node_indices().filter(|node| self.in_degree(*node) == 0)
    }

    /// Groups of topics that form prerequisite cycles.
    ///
    /// Each group is sorted by input order and the groups are ordered by their
    /// first member. Acyclic graphs return an empty list.
    pub fn cycles(&self) -> Vec<Vec<NodeIndex>> {
        let mut graph = DiGraph::<(), ()>::with_capacity(self.topics.len(), self.edges.len());
        let indices: Vec<_> = self.topics.iter().map(|_| graph.add_node(())).collect();
        for edge in &self.edges {
            graph.add_edge(indices[edge.from.0], indices[edge.to.0], ());
        }

        let mut cycles: Vec<Vec<NodeIndex>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| {
                let mut members: Vec<_> = component
                    .into_iter()
                    .map(|idx| NodeIndex(idx.index()))
                    .collect();
                members.sort();
                members
            })
            .collect();
        cycles.sort();
        cycles
    }
}
